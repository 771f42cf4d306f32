use std::{
    fs,
    path::PathBuf,
    sync::{LazyLock, RwLock},
};

use secconf_db::connection::{
    Backend, Credentials, DEFAULT_DATABASE, DEFAULT_MYSQL_PORT, DEFAULT_USERNAME,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    error::{ConfigError, Result},
    path::{resolve_path, xdg_config_home},
};

/// Which kind of store holds the listings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    #[default]
    Mysql,
    Sqlite,
}

/// Application's configuration
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Config {
    /// Store holding the listings: "mysql" or "sqlite".
    #[serde(default)]
    pub backend: BackendKind,

    /// MySQL server host.
    /// Default: localhost
    pub host: Option<String>,

    /// MySQL server port.
    /// Default: 3306
    pub port: Option<u16>,

    /// Database file for the sqlite backend. `~` and `$VARS` are expanded.
    pub db_path: Option<String>,

    /// Database name, used for both reads and writes.
    /// Default: secconfdb
    pub database: Option<String>,

    /// Account used for writes. Reads always go through the default
    /// read-only account on `database`.
    /// Default: secconfdb
    pub username: Option<String>,

    /// Password for `username`. Prefer SECCONF_DB_PASSWORD over storing it here.
    pub password: Option<String>,
}

pub static CONFIG_PATH: LazyLock<RwLock<PathBuf>> = LazyLock::new(|| {
    RwLock::new(match std::env::var("SECCONF_CONFIG") {
        Ok(path_str) => PathBuf::from(path_str),
        Err(_) => xdg_config_home().join("secconf").join("config.toml"),
    })
});

/// Points later loads at a different config file.
pub fn set_config_path(path: PathBuf) {
    let mut config_path = CONFIG_PATH.write().unwrap();
    *config_path = path;
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}

impl Config {
    pub fn default_config() -> Self {
        Self {
            backend: BackendKind::Mysql,
            host: Some("localhost".to_string()),
            port: Some(DEFAULT_MYSQL_PORT),
            db_path: None,
            database: Some(DEFAULT_DATABASE.to_string()),
            username: Some(DEFAULT_USERNAME.to_string()),
            password: None,
        }
    }

    /// Loads the config file, falling back to defaults when there is none.
    pub fn new() -> Result<Self> {
        let config_path = CONFIG_PATH.read().unwrap().to_path_buf();

        let mut config = match fs::read_to_string(&config_path) {
            Ok(content) => toml::from_str(&content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(
                    "no config at {}, using defaults",
                    config_path.display()
                );
                Self::default_config()
            }
            Err(err) => return Err(ConfigError::IoError(err)),
        };

        config.resolve()?;

        Ok(config)
    }

    pub fn resolve(&mut self) -> Result<()> {
        if self.database.as_deref().is_some_and(|db| db.trim().is_empty()) {
            return Err(ConfigError::EmptyDatabaseName);
        }

        if self.backend == BackendKind::Sqlite
            && self.db_path.is_none()
            && std::env::var("SECCONF_DB_PATH").is_err()
        {
            return Err(ConfigError::MissingDbPath);
        }

        self.host.get_or_insert_with(|| "localhost".to_string());
        self.port.get_or_insert(DEFAULT_MYSQL_PORT);
        self.database
            .get_or_insert_with(|| DEFAULT_DATABASE.to_string());
        self.username
            .get_or_insert_with(|| DEFAULT_USERNAME.to_string());

        Ok(())
    }

    /// The store to open. SECCONF_DB_PATH selects a sqlite file regardless
    /// of the configured backend.
    pub fn get_backend(&self) -> Result<Backend> {
        if let Ok(env_path) = std::env::var("SECCONF_DB_PATH") {
            return Ok(Backend::Sqlite {
                path: resolve_path(&env_path)?,
            });
        }

        match self.backend {
            BackendKind::Mysql => {
                Ok(Backend::MySql {
                    host: self
                        .host
                        .clone()
                        .unwrap_or_else(|| "localhost".to_string()),
                    port: self.port.unwrap_or(DEFAULT_MYSQL_PORT),
                })
            }
            BackendKind::Sqlite => {
                let db_path = self.db_path.as_deref().ok_or(ConfigError::MissingDbPath)?;
                Ok(Backend::Sqlite {
                    path: resolve_path(db_path)?,
                })
            }
        }
    }

    pub fn get_database(&self) -> &str {
        self.database.as_deref().unwrap_or(DEFAULT_DATABASE)
    }

    /// Account for writes. SECCONF_DB_PASSWORD wins over the file.
    pub fn get_credentials(&self) -> Credentials {
        let defaults = Credentials::default();
        let password = std::env::var("SECCONF_DB_PASSWORD")
            .ok()
            .or_else(|| self.password.clone())
            .unwrap_or(defaults.password);

        Credentials {
            database: self.database.clone().unwrap_or(defaults.database),
            username: self.username.clone().unwrap_or(defaults.username),
            password,
        }
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

/// Writes the default configuration to the config path.
pub fn generate_default_config() -> Result<PathBuf> {
    let config_path = CONFIG_PATH.read().unwrap().to_path_buf();

    if config_path.exists() {
        return Err(ConfigError::ConfigAlreadyExists);
    }

    let content = format!(
        "# secconf configuration\n# backend = \"sqlite\" with db_path = \"~/secconf.db\" reads a local file\n\n{}",
        Config::default_config().to_toml()?
    );

    if let Some(parent) = config_path.parent() {
        fs::create_dir_all(parent)?;
    }

    fs::write(&config_path, content)?;
    info!(
        "Default configuration file generated at: {}",
        config_path.display()
    );
    Ok(config_path)
}

#[cfg(test)]
mod tests {
    use serial_test::serial;
    use tempfile::TempDir;

    use super::*;
    use crate::test_utils::with_env;

    fn with_config_file<F: FnOnce(&TempDir)>(content: Option<&str>, f: F) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        if let Some(content) = content {
            fs::write(&path, content).unwrap();
        }

        let previous = CONFIG_PATH.read().unwrap().clone();
        set_config_path(path);
        f(&dir);
        set_config_path(previous);
    }

    #[test]
    fn test_default_config() {
        let config = Config::default_config();

        assert_eq!(config.backend, BackendKind::Mysql);
        assert_eq!(config.host.as_deref(), Some("localhost"));
        assert_eq!(config.port, Some(3306));
        assert_eq!(config.database.as_deref(), Some("secconfdb"));
        assert_eq!(config.username.as_deref(), Some("secconfdb"));
        assert!(config.password.is_none());
    }

    #[test]
    #[serial]
    fn test_missing_file_gives_defaults() {
        with_env(vec![("SECCONF_DB_PATH", None)], || {
            with_config_file(None, |_| {
                let config = Config::new().unwrap();
                assert_eq!(config.backend, BackendKind::Mysql);
                assert_eq!(
                    config.get_backend().unwrap(),
                    Backend::MySql {
                        host: "localhost".to_string(),
                        port: 3306
                    }
                );
            });
        });
    }

    #[test]
    #[serial]
    fn test_load_sqlite_config() {
        with_env(vec![("SECCONF_DB_PATH", None)], || {
            with_config_file(
                Some("backend = \"sqlite\"\ndb_path = \"/srv/secconf/listings.db\"\n"),
                |_| {
                    let config = Config::new().unwrap();
                    assert_eq!(config.backend, BackendKind::Sqlite);
                    assert_eq!(config.database.as_deref(), Some("secconfdb"));
                    assert_eq!(
                        config.get_backend().unwrap(),
                        Backend::Sqlite {
                            path: PathBuf::from("/srv/secconf/listings.db")
                        }
                    );
                },
            );
        });
    }

    #[test]
    #[serial]
    fn test_invalid_toml() {
        with_config_file(Some("backend = [unterminated"), |_| {
            assert!(matches!(Config::new(), Err(ConfigError::TomlDeError(_))));
        });
        with_config_file(Some("backend = \"postgres\""), |_| {
            assert!(matches!(Config::new(), Err(ConfigError::TomlDeError(_))));
        });
    }

    #[test]
    #[serial]
    fn test_resolve_rejects_sqlite_without_path() {
        with_env(vec![("SECCONF_DB_PATH", None)], || {
            let mut config = Config::default_config();
            config.backend = BackendKind::Sqlite;
            assert!(matches!(config.resolve(), Err(ConfigError::MissingDbPath)));
        });

        with_env(vec![("SECCONF_DB_PATH", Some("/tmp/listings.db"))], || {
            let mut config = Config::default_config();
            config.backend = BackendKind::Sqlite;
            assert!(config.resolve().is_ok());
        });
    }

    #[test]
    fn test_resolve_rejects_empty_database() {
        let mut config = Config::default_config();
        config.database = Some("  ".to_string());
        assert!(matches!(
            config.resolve(),
            Err(ConfigError::EmptyDatabaseName)
        ));
    }

    #[test]
    fn test_database_applies_to_reads_and_writes() {
        let config: Config = toml::from_str("database = \"listings_staging\"").unwrap();
        assert_eq!(config.get_database(), "listings_staging");
        assert_eq!(config.get_credentials().database, "listings_staging");

        let config: Config = toml::from_str("host = \"db.example.org\"").unwrap();
        assert_eq!(config.get_database(), "secconfdb");
    }

    #[test]
    fn test_resolve_fills_defaults() {
        let mut config: Config = toml::from_str("host = \"db.example.org\"").unwrap();
        config.resolve().unwrap();

        assert_eq!(config.host.as_deref(), Some("db.example.org"));
        assert_eq!(config.port, Some(3306));
        assert_eq!(config.username.as_deref(), Some("secconfdb"));
    }

    #[test]
    #[serial]
    fn test_env_overrides() {
        with_env(
            vec![
                ("SECCONF_DB_PATH", Some("/tmp/override.db")),
                ("SECCONF_DB_PASSWORD", Some("s3cret")),
            ],
            || {
                let mut config = Config::default_config();
                config.password = Some("from-file".to_string());

                assert_eq!(
                    config.get_backend().unwrap(),
                    Backend::Sqlite {
                        path: PathBuf::from("/tmp/override.db")
                    }
                );
                assert_eq!(config.get_credentials().password, "s3cret");
            },
        );

        with_env(vec![("SECCONF_DB_PASSWORD", None)], || {
            let mut config = Config::default_config();
            assert_eq!(config.get_credentials().password, "");

            config.password = Some("from-file".to_string());
            config.username = Some("editor".to_string());
            let credentials = config.get_credentials();
            assert_eq!(credentials.password, "from-file");
            assert_eq!(credentials.username, "editor");
        });
    }

    #[test]
    #[serial]
    fn test_generate_default_config() {
        with_config_file(None, |dir| {
            let path = generate_default_config().unwrap();
            assert_eq!(path, dir.path().join("config.toml"));

            let content = fs::read_to_string(&path).unwrap();
            let parsed: Config = toml::from_str(&content).unwrap();
            assert_eq!(parsed.backend, BackendKind::Mysql);
            assert_eq!(parsed.port, Some(3306));

            assert!(matches!(
                generate_default_config(),
                Err(ConfigError::ConfigAlreadyExists)
            ));
        });
    }
}
