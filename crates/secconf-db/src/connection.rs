//! Store provisioning.
//!
//! Reads go through the default, read-only account on the configured
//! database. Writes must be made
//! with credentials supplied by the caller; they are forwarded to the store
//! unchanged, and the store decides whether the account may write.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    error::{DbError, Result},
    store::{
        mysql::MYSQL_DENIED_CODES, sqlite::SQLITE_DENIED_CODES, MySqlStore, SqliteStore, Store,
        StoreError,
    },
};

pub const DEFAULT_DATABASE: &str = "secconfdb";
pub const DEFAULT_USERNAME: &str = "secconfdb";
pub const DEFAULT_MYSQL_PORT: u16 = 3306;

/// Account used to open a store.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Credentials {
    pub database: String,
    pub username: String,
    pub password: String,
}

impl Default for Credentials {
    fn default() -> Self {
        Self {
            database: DEFAULT_DATABASE.to_string(),
            username: DEFAULT_USERNAME.to_string(),
            password: String::new(),
        }
    }
}

impl Credentials {
    /// The default read-only account on `database`.
    pub fn reader(database: impl Into<String>) -> Self {
        Self {
            database: database.into(),
            ..Self::default()
        }
    }
}

/// Where the listings live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Backend {
    MySql { host: String, port: u16 },
    Sqlite { path: PathBuf },
}

impl Default for Backend {
    fn default() -> Self {
        Backend::MySql {
            host: "localhost".to_string(),
            port: DEFAULT_MYSQL_PORT,
        }
    }
}

/// Opens `database` for reading with the default account.
pub fn open_reader(backend: &Backend, database: &str) -> Result<Box<dyn Store>> {
    open(backend, &Credentials::reader(database), true)
}

/// Opens a store with caller-supplied credentials, for writes.
pub fn open_writer(backend: &Backend, credentials: &Credentials) -> Result<Box<dyn Store>> {
    open(backend, credentials, false)
}

fn open(backend: &Backend, credentials: &Credentials, read_only: bool) -> Result<Box<dyn Store>> {
    match backend {
        Backend::MySql {
            host,
            port,
        } => {
            let store = MySqlStore::connect(host, *port, credentials)
                .map_err(|err| connect_error(err, MYSQL_DENIED_CODES))?;
            Ok(Box::new(store))
        }
        Backend::Sqlite {
            path,
        } => {
            debug!(
                "sqlite has no accounts, ignoring user {}",
                credentials.username
            );
            let store = SqliteStore::open(path, read_only)
                .map_err(|err| connect_error(err, SQLITE_DENIED_CODES))?;
            Ok(Box::new(store))
        }
    }
}

/// Bad credentials surface as unauthorized, anything else as a connection failure.
fn connect_error(err: StoreError, denied_codes: &[i32]) -> DbError {
    match DbError::from_store(err, denied_codes) {
        DbError::Store {
            message, ..
        } => DbError::Connection(message),
        unauthorized => unauthorized,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_credentials() {
        let credentials = Credentials::default();
        assert_eq!(credentials.database, "secconfdb");
        assert_eq!(credentials.username, "secconfdb");
        assert!(credentials.password.is_empty());
    }

    #[test]
    fn test_reader_credentials_keep_default_account() {
        let credentials = Credentials::reader("listings_staging");
        assert_eq!(credentials.database, "listings_staging");
        assert_eq!(credentials.username, DEFAULT_USERNAME);
        assert!(credentials.password.is_empty());
    }

    #[test]
    fn test_bad_credentials_are_unauthorized() {
        let err = StoreError::new(Some(1045), "Access denied");
        assert!(connect_error(err, MYSQL_DENIED_CODES).is_unauthorized());

        let err = StoreError::new(None, "Connection refused");
        assert!(matches!(
            connect_error(err, MYSQL_DENIED_CODES),
            DbError::Connection(_)
        ));
    }

    #[test]
    fn test_missing_sqlite_file_fails_read_only() {
        let backend = Backend::Sqlite {
            path: PathBuf::from("/nonexistent/secconf/listings.db"),
        };
        assert!(open_reader(&backend, DEFAULT_DATABASE).is_err());
    }
}
