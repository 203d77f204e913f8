use crate::domain::model::{NewUser, User};
use crate::utils::error::Result;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectionRole {
    /// Schema setup, seeding and inserts.
    Writer,
    /// Listing, pointed at a read replica.
    Reader,
}

impl fmt::Display for ConnectionRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionRole::Writer => write!(f, "writer"),
            ConnectionRole::Reader => write!(f, "reader"),
        }
    }
}

pub trait Connector: Send + Sync {
    type Store: UserStore;

    fn connect(
        &self,
        role: ConnectionRole,
    ) -> impl std::future::Future<Output = Result<Self::Store>> + Send;
}

/// One open connection to the users table.
pub trait UserStore: Send {
    fn ensure_schema(&mut self) -> impl std::future::Future<Output = Result<()>> + Send;
    fn count_users(&mut self) -> impl std::future::Future<Output = Result<i64>> + Send;
    fn insert_user(
        &mut self,
        user: &NewUser,
    ) -> impl std::future::Future<Output = Result<User>> + Send;
    fn list_users(&mut self) -> impl std::future::Future<Output = Result<Vec<User>>> + Send;
    fn close(self) -> impl std::future::Future<Output = Result<()>> + Send;
}
