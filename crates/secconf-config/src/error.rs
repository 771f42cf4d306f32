use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum ConfigError {
    #[error("TOML serialization error: {0}")]
    #[diagnostic(
        code(secconf_config::toml_serialize),
        help("Check your configuration structure for invalid values")
    )]
    TomlSerError(#[from] toml::ser::Error),

    #[error("TOML deserialization error: {0}")]
    #[diagnostic(
        code(secconf_config::toml_deserialize),
        help("Check your config.toml syntax and structure")
    )]
    TomlDeError(#[from] toml::de::Error),

    #[error("Configuration file already exists")]
    #[diagnostic(
        code(secconf_config::already_exists),
        help("Remove the existing config file or use a different location")
    )]
    ConfigAlreadyExists,

    #[error("The sqlite backend needs a database path")]
    #[diagnostic(
        code(secconf_config::missing_db_path),
        help("Set `db_path` in your config file or export SECCONF_DB_PATH")
    )]
    MissingDbPath,

    #[error("Database name cannot be empty")]
    #[diagnostic(
        code(secconf_config::empty_database),
        help("Remove the `database` key to use the default name")
    )]
    EmptyDatabaseName,

    #[error("Path cannot be empty")]
    #[diagnostic(code(secconf_config::empty_path))]
    EmptyPath,

    #[error("Unclosed variable in path: {input}")]
    #[diagnostic(
        code(secconf_config::unclosed_variable),
        help("Close the variable with `}}`")
    )]
    UnclosedVariable { input: String },

    #[error("Environment variable `{var}` used in `{input}` is not set")]
    #[diagnostic(code(secconf_config::missing_env_var))]
    MissingEnvVar { input: String, var: String },

    #[error("IO error: {0}")]
    #[diagnostic(code(secconf_config::io))]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
