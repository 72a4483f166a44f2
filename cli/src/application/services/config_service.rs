//! Application service: configuration use-cases.

use anyhow::Result;
use bastion_common::config::StackConfig;
use tracing::debug;

use crate::application::ports::ConfigStore;
use crate::domain::config::apply_config_values;

/// Load configuration.
pub fn load_config(store: &impl ConfigStore) -> Result<StackConfig> {
    store.load()
}

/// Validate and persist one or more `key = value` settings together.
///
/// Nothing is written unless the resulting configuration is valid as a whole.
pub fn set_values(store: &impl ConfigStore, pairs: &[(&str, &str)]) -> Result<StackConfig> {
    let mut config = store.load()?;
    apply_config_values(&mut config, pairs)?;
    store.save(&config)?;
    debug!(settings = pairs.len(), "config: saved settings");
    Ok(config)
}
