pub mod handler;
pub mod request;
pub mod response;

pub use crate::domain::model::{NewUser, User};
pub use crate::domain::ports::{ConnectionRole, Connector, UserStore};
pub use crate::utils::error::Result;
