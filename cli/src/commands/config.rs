//! `bastion config`: show and set configuration values.

use std::process::ExitCode;

use anyhow::Result;
use clap::Subcommand;

use crate::app::AppContext;
use crate::application::ports::ConfigStore;
use crate::application::services::config_service;
use crate::domain::config::{config_entries, pair_up};
use crate::infra::config::CONFIG_ENV;
use crate::output::json;

/// Config subcommands.
#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show,
    /// Set one or more configuration values
    ///
    /// Settings given together are validated together, e.g.
    /// `bastion config set network.vpc_cidr 192.168.0.0/16 network.subnet_cidr 192.168.1.0/24`
    Set {
        /// Alternating configuration keys and values
        #[arg(required = true, num_args = 2.., value_names = ["KEY", "VALUE"])]
        pairs: Vec<String>,
    },
}

/// Run the config command.
///
/// # Errors
///
/// Returns an error if the configuration cannot be read, or if the key or
/// value is rejected.
pub fn run(app: &AppContext, cmd: ConfigCommand) -> Result<ExitCode> {
    match cmd {
        ConfigCommand::Show => show_config(app),
        ConfigCommand::Set { pairs } => set_config(app, &pairs),
    }
}

fn show_config(app: &AppContext) -> Result<ExitCode> {
    let config = config_service::load_config(&app.config_store)?;
    let path = app.config_store.path()?;

    if app.is_json() {
        let out = serde_json::json!({
            "path": path.display().to_string(),
            "config": config,
        });
        println!("{}", json::to_pretty(&out)?);
        return Ok(ExitCode::SUCCESS);
    }

    app.output.header("Configuration");
    for (key, value) in config_entries(&config) {
        app.output.kv(&format!("{key:<30}"), &value);
    }
    if !app.output.quiet {
        println!();
    }
    app.output.kv(
        "file",
        &format!("{} (override with {CONFIG_ENV})", path.display()),
    );
    Ok(ExitCode::SUCCESS)
}

fn set_config(app: &AppContext, words: &[String]) -> Result<ExitCode> {
    let pairs = pair_up(words)?;
    let config = config_service::set_values(&app.config_store, &pairs)?;

    // CIDRs are stored in canonical form, so report what was saved.
    let saved = config_entries(&config);
    let stored = |key: &str| {
        saved
            .iter()
            .find(|(k, _)| *k == key)
            .map_or_else(String::new, |(_, v)| v.clone())
    };

    if app.is_json() {
        let set: serde_json::Map<String, serde_json::Value> = pairs
            .iter()
            .map(|(key, _)| ((*key).to_string(), serde_json::Value::String(stored(key))))
            .collect();
        println!("{}", json::to_pretty(&serde_json::json!({ "set": set }))?);
    } else {
        for (key, _) in &pairs {
            app.output.success(&format!("Set {key} = {}", stored(key)));
        }
    }
    Ok(ExitCode::SUCCESS)
}
