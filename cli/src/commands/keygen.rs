//! `bastion keygen`: generate a key pair and emit its public key.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::ports::ProgressReporter as _;
use crate::application::services::config_service;
use crate::application::services::keygen_service::{self, KeySummary};
use crate::infra::keys::GeneratedKey;
use crate::output::{SilentReporter, json, progress};

/// Arguments for the keygen command.
#[derive(Args)]
pub struct KeygenArgs {
    /// Also write the public key line to this file
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

/// Run the keygen command.
///
/// # Errors
///
/// Returns an error if the configuration cannot be loaded, generation fails,
/// or the output file cannot be written.
pub async fn run(app: &AppContext, args: &KeygenArgs) -> Result<ExitCode> {
    let config = config_service::load_config(&app.config_store)?;
    let bits = config.key.modulus_bits;

    let summary = if app.output.show_progress() && !app.is_json() {
        let pb = progress::spinner(&format!("Generating {bits}-bit RSA key..."));
        match keygen_service::obtain_key(&GeneratedKey, bits, &SilentReporter).await {
            Ok(summary) => {
                progress::finish_ok(&pb, &format!("Generated {}", summary.fingerprint));
                summary
            }
            Err(e) => {
                progress::finish_error(&pb, "Key generation failed");
                return Err(e);
            }
        }
    } else {
        keygen_service::obtain_key(&GeneratedKey, bits, &app.reporter()).await?
    };

    if let Some(path) = &args.output {
        app.write_output(path, &format!("{}\n", summary.public_key))?;
    }

    if app.is_json() {
        render_json(&summary)?;
    } else {
        render_human(app, &summary, args.output.as_deref());
    }
    Ok(ExitCode::SUCCESS)
}

fn render_json(summary: &KeySummary) -> Result<()> {
    let mut value = serde_json::to_value(summary)?;
    if let Some(obj) = value.as_object_mut() {
        obj.insert(
            "generated_at".to_string(),
            serde_json::Value::String(chrono::Utc::now().to_rfc3339()),
        );
    }
    println!("{}", json::to_pretty(&value)?);
    Ok(())
}

fn render_human(app: &AppContext, summary: &KeySummary, written: Option<&std::path::Path>) {
    // stdout carries the bare key line so it can be piped into authorized_keys
    println!("{}", summary.public_key);
    if app.output.is_tty {
        app.output.kv("fingerprint", &summary.fingerprint);
        app.output
            .kv("type", &format!("{} {}", summary.algorithm, summary.modulus_bits));
    }
    if let Some(path) = written {
        app.reporter().success(&format!("Wrote {}", path.display()));
    }
}
