use anyhow::Context;
use unbound_exporter_domain::{CliOverrides, Config};

/// Loads the configuration file, applies overrides and refuses to continue on
/// an invalid result (missing credentials included).
pub fn load_config(path: Option<&str>, overrides: CliOverrides) -> anyhow::Result<Config> {
    let config = Config::load(path, overrides).context("failed to load configuration")?;
    config.validate().context("invalid configuration")?;
    Ok(config)
}
