//! `bastion stack`: declare the server stack around a public key.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::app::AppContext;
use crate::application::ports::{ProgressReporter as _, PublicKeySource};
use crate::application::services::stack_service::{self, RenderedStack};
use crate::infra::keys::{AuthorizedKeyFile, GeneratedKey};
use crate::output::json;

/// Stack subcommands.
#[derive(Subcommand)]
pub enum StackCommand {
    /// Render the stack document
    Render(RenderArgs),
}

/// Arguments for `stack render`.
#[derive(Args)]
pub struct RenderArgs {
    /// Attach this authorized-key file instead of generating a new key
    #[arg(long, value_name = "PATH")]
    pub public_key_file: Option<PathBuf>,

    /// Write the document to this file instead of stdout
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

/// Run the stack command.
///
/// # Errors
///
/// Returns an error if the configuration is invalid, the key cannot be
/// obtained, or the document cannot be written.
pub async fn run(app: &AppContext, cmd: StackCommand) -> Result<ExitCode> {
    match cmd {
        StackCommand::Render(args) => match &args.public_key_file {
            Some(path) => render(app, &AuthorizedKeyFile::new(path.clone()), &args).await,
            None => render(app, &GeneratedKey, &args).await,
        },
    }
}

async fn render(
    app: &AppContext,
    source: &impl PublicKeySource,
    args: &RenderArgs,
) -> Result<ExitCode> {
    let reporter = app.reporter();
    let rendered = stack_service::render(&app.config_store, source, &reporter).await?;

    if let Some(path) = &args.output {
        app.write_output(path, &rendered.document)?;
        reporter.success(&format!("Wrote {}", path.display()));
    }

    if app.is_json() {
        println!("{}", json::to_pretty(&rendered)?);
    } else if args.output.is_none() {
        print!("{}", rendered.document);
    } else {
        render_summary(app, &rendered);
    }
    Ok(ExitCode::SUCCESS)
}

fn render_summary(app: &AppContext, rendered: &RenderedStack) {
    app.output.header(&rendered.name);
    for name in &rendered.resources {
        app.output.kv("resource", name);
    }
    app.output.kv("key", &rendered.key.fingerprint);
}
