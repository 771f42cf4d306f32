use miette::Result;
use secconf_config::config::Config;
use secconf_db::Value;
use tracing::{info, warn};

use crate::list::Repository;

fn writer(config: &Config) -> Result<Repository> {
    let backend = config.get_backend()?;
    Ok(Repository::writer(
        &backend,
        &config.get_credentials(),
    )?)
}

pub fn update_row(
    config: &Config,
    table: &str,
    key: (String, i64),
    values: Vec<(String, Value)>,
) -> Result<()> {
    let mut repo = writer(config)?;
    let changed = repo.update(table, (key.0.as_str(), key.1), values)?;

    if changed == 0 {
        warn!("No row of {table} has {} = {}", key.0, key.1);
    } else {
        info!("Updated {changed} row(s) of {table}");
    }
    Ok(())
}

pub fn create_row(config: &Config, table: &str, values: Vec<(String, Value)>) -> Result<()> {
    let mut repo = writer(config)?;
    let inserted = repo.create(table, values)?;

    info!("Inserted {inserted} row(s) into {table}");
    Ok(())
}
