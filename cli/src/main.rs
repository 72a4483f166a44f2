//! bastion - RSA SSH key generation and server stack declaration

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use bastion_cli::cli::Cli;
use bastion_cli::output::json;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let json_mode = cli.json;
    match cli.run().await {
        Ok(code) => code,
        Err(e) => {
            if json_mode {
                match json::format_error(&format!("{e:#}"), json::error_code(&e)) {
                    Ok(out) => println!("{out}"),
                    Err(_) => eprintln!("Error: {e:#}"),
                }
            } else {
                eprintln!("Error: {e:#}");
            }
            ExitCode::FAILURE
        }
    }
}
