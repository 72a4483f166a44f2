//! Version command

use std::process::ExitCode;

use anyhow::Result;

use crate::app::AppContext;

/// Run the version command.
#[allow(clippy::unnecessary_wraps)] // same signature as every other command
pub fn run(app: &AppContext) -> Result<ExitCode> {
    let version = env!("CARGO_PKG_VERSION");

    if app.is_json() {
        println!(r#"{{"version":"{version}"}}"#);
    } else {
        println!("bastion {version}");
    }
    Ok(ExitCode::SUCCESS)
}
