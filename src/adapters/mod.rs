// Adapters layer: concrete store connections behind the domain ports.

pub mod memory;
pub mod postgres;

pub use memory::{MemoryConnector, MemoryUserStore};
pub use postgres::{PgConnector, PgUserStore};
