//! Application service: stack declaration use-cases.

use anyhow::{Context, Result};
use bastion_common::stack::Stack;
use serde::Serialize;

use crate::application::ports::{ConfigStore, ProgressReporter, PublicKeySource};
use crate::application::services::keygen_service::{self, KeySummary};

/// A rendered stack document and the key it carries.
#[derive(Debug, Serialize)]
pub struct RenderedStack {
    pub name: String,
    pub resources: Vec<&'static str>,
    pub key: KeySummary,
    pub document: String,
}

/// Load configuration, obtain a public key, declare the stack and render it.
///
/// Configuration is validated before any key is generated, so an invalid
/// config never costs a prime search.
///
/// # Errors
///
/// Returns an error if the configuration is invalid, the key source fails,
/// or rendering fails.
pub async fn render(
    store: &impl ConfigStore,
    source: &impl PublicKeySource,
    reporter: &impl ProgressReporter,
) -> Result<RenderedStack> {
    let config = store.load()?;
    bastion_common::stack::validate_config(&config).with_context(|| {
        let path = store
            .path()
            .map_or_else(|_| "configuration".to_string(), |p| p.display().to_string());
        format!("invalid stack configuration in {path}")
    })?;

    let key = keygen_service::obtain_key(source, config.key.modulus_bits, reporter).await?;

    if !config.instance.associate_public_ip {
        reporter.warn("instance.associate_public_ip is false: the `instance ip` output will be empty");
    }

    reporter.step("Declaring resources");
    let stack = Stack::declare(&config, key.public_key.clone())?;
    let document = stack.to_yaml()?;
    reporter.success(&format!(
        "Declared {} resources for {}",
        stack.resources().len(),
        stack.name()
    ));

    Ok(RenderedStack {
        name: stack.name().to_string(),
        resources: stack.resources().iter().map(|r| r.name).collect(),
        key,
        document,
    })
}
