//! In-memory stand-in for the users table.
//!
//! Every connection handed out by a [`MemoryConnector`] shares one table, so
//! a writer insert is immediately visible to a reader. The store enforces the
//! same constraints as the Postgres schema and reports violations with the
//! same wording. It also counts opened and closed connections per role so
//! callers can check that nothing leaks.

use crate::domain::model::{NewUser, User};
use crate::domain::ports::{ConnectionRole, Connector, UserStore};
use crate::utils::error::{HandlerError, Result};
use chrono::Utc;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

const MAX_VARCHAR: usize = 100;

#[derive(Debug, Default)]
struct MemoryState {
    table_exists: bool,
    rows: Vec<User>,
    last_id: i32,
    schema_runs: usize,
    opened: HashMap<ConnectionRole, usize>,
    closed: HashMap<ConnectionRole, usize>,
    refuse_connect: HashSet<ConnectionRole>,
    fail_close: HashSet<ConnectionRole>,
}

impl MemoryState {
    fn insert(&mut self, user: &NewUser) -> Result<User> {
        if !self.table_exists {
            return Err(missing_relation());
        }
        let name = required_column("name", user.name.as_deref())?;
        let email = required_column("email", user.email.as_deref())?;
        if self.rows.iter().any(|row| row.email == email) {
            return Err(HandlerError::store(
                "duplicate key value violates unique constraint \"users_email_key\"",
            ));
        }

        self.last_id += 1;
        let row = User {
            id: self.last_id,
            name: name.to_string(),
            email: email.to_string(),
            created_at: Some(Utc::now()),
        };
        self.rows.push(row.clone());
        Ok(row)
    }
}

fn missing_relation() -> HandlerError {
    HandlerError::store("relation \"users\" does not exist")
}

fn required_column<'a>(column: &str, value: Option<&'a str>) -> Result<&'a str> {
    let value = value.ok_or_else(|| {
        HandlerError::store(format!(
            "null value in column \"{}\" of relation \"users\" violates not-null constraint",
            column
        ))
    })?;
    if value.chars().count() > MAX_VARCHAR {
        return Err(HandlerError::store(format!(
            "value too long for type character varying({})",
            MAX_VARCHAR
        )));
    }
    Ok(value)
}

#[derive(Debug, Clone, Default)]
pub struct MemoryConnector {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryConnector {
    /// A store whose table has not been created yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose table already exists and holds `users`.
    pub fn with_users(users: &[NewUser]) -> Result<Self> {
        let connector = Self::new();
        {
            let mut state = connector.lock();
            state.table_exists = true;
            for user in users {
                state.insert(user)?;
            }
        }
        Ok(connector)
    }

    /// Makes every later `connect` for `role` fail.
    pub fn refuse_connections(self, role: ConnectionRole) -> Self {
        self.lock().refuse_connect.insert(role);
        self
    }

    /// Makes every later `close` for `role` fail after the connection is
    /// counted as closed.
    pub fn fail_on_close(self, role: ConnectionRole) -> Self {
        self.lock().fail_close.insert(role);
        self
    }

    pub fn users(&self) -> Vec<User> {
        self.lock().rows.clone()
    }

    pub fn table_exists(&self) -> bool {
        self.lock().table_exists
    }

    pub fn schema_runs(&self) -> usize {
        self.lock().schema_runs
    }

    pub fn opened(&self, role: ConnectionRole) -> usize {
        self.lock().opened.get(&role).copied().unwrap_or(0)
    }

    pub fn closed(&self, role: ConnectionRole) -> usize {
        self.lock().closed.get(&role).copied().unwrap_or(0)
    }

    /// Connections opened but not yet closed, across both roles.
    pub fn open_connections(&self) -> usize {
        let state = self.lock();
        let opened: usize = state.opened.values().sum();
        let closed: usize = state.closed.values().sum();
        opened.saturating_sub(closed)
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Connector for MemoryConnector {
    type Store = MemoryUserStore;

    async fn connect(&self, role: ConnectionRole) -> Result<MemoryUserStore> {
        let mut state = self.lock();
        if state.refuse_connect.contains(&role) {
            return Err(HandlerError::store(format!(
                "connection refused for {} connection",
                role
            )));
        }
        *state.opened.entry(role).or_insert(0) += 1;
        Ok(MemoryUserStore {
            state: Arc::clone(&self.state),
            role,
        })
    }
}

pub struct MemoryUserStore {
    state: Arc<Mutex<MemoryState>>,
    role: ConnectionRole,
}

impl MemoryUserStore {
    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl UserStore for MemoryUserStore {
    async fn ensure_schema(&mut self) -> Result<()> {
        let mut state = self.lock();
        state.schema_runs += 1;
        state.table_exists = true;
        Ok(())
    }

    async fn count_users(&mut self) -> Result<i64> {
        let state = self.lock();
        if !state.table_exists {
            return Err(missing_relation());
        }
        Ok(state.rows.len() as i64)
    }

    async fn insert_user(&mut self, user: &NewUser) -> Result<User> {
        self.lock().insert(user)
    }

    async fn list_users(&mut self) -> Result<Vec<User>> {
        let state = self.lock();
        if !state.table_exists {
            return Err(missing_relation());
        }
        Ok(state.rows.clone())
    }

    async fn close(self) -> Result<()> {
        let mut state = self.lock();
        *state.closed.entry(self.role).or_insert(0) += 1;
        if state.fail_close.contains(&self.role) {
            return Err(HandlerError::store(format!(
                "{} connection terminated unexpectedly",
                self.role
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::block_on;

    #[test]
    fn test_constraints_match_schema() {
        let connector = MemoryConnector::with_users(&[NewUser::new("Ann", "ann@x.com")]).unwrap();
        let mut store = block_on(connector.connect(ConnectionRole::Writer)).unwrap();

        let duplicate = block_on(store.insert_user(&NewUser::new("Other Ann", "ann@x.com")));
        assert!(duplicate
            .unwrap_err()
            .to_string()
            .contains("users_email_key"));

        let no_email = NewUser {
            name: Some("Nobody".to_string()),
            email: None,
        };
        let err = block_on(store.insert_user(&no_email)).unwrap_err();
        assert!(err.to_string().contains("\"email\""));

        let too_long = NewUser::new("x".repeat(101), "long@x.com");
        assert!(block_on(store.insert_user(&too_long)).is_err());

        assert_eq!(connector.users().len(), 1);
        block_on(store.close()).unwrap();
        assert_eq!(connector.open_connections(), 0);
    }

    #[test]
    fn test_ids_are_monotonic() {
        let connector = MemoryConnector::with_users(&[
            NewUser::new("A", "a@x.com"),
            NewUser::new("B", "b@x.com"),
        ])
        .unwrap();
        let ids: Vec<i32> = connector.users().iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_queries_before_schema_fail() {
        let connector = MemoryConnector::new();
        let mut store = block_on(connector.connect(ConnectionRole::Writer)).unwrap();
        let err = block_on(store.count_users()).unwrap_err();
        assert_eq!(err.to_string(), "relation \"users\" does not exist");
    }
}
