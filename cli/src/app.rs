//! Application context: unified state passed to every command handler.
//!
//! Constructed once in `Cli::run()` and passed as `&AppContext` to all
//! command handlers.

use std::path::Path;

use anyhow::Result;

use crate::application::ports::ArtifactWriter;
use crate::domain::error::OutputFileError;
use crate::infra::config::YamlConfigStore;
use crate::infra::fs::LocalFs;
use crate::output::{OutputContext, Reporter, SilentReporter, TerminalReporter};

/// Output rendering mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-readable terminal output (default).
    Human,
    /// Machine-readable JSON output.
    Json,
}

/// Output rendering flags.
pub struct OutputFlags {
    /// Disable ANSI color output.
    pub no_color: bool,
    /// Suppress non-error output.
    pub quiet: bool,
    /// Enable JSON output mode.
    pub json: bool,
}

/// Behaviour flags.
pub struct BehaviourFlags {
    /// Skip interactive prompts (also set by `CI` / `BASTION_YES` env vars).
    pub yes: bool,
}

/// Flags passed from the top-level CLI to `AppContext::new`.
pub struct AppFlags {
    /// Output rendering options.
    pub output: OutputFlags,
    /// Behaviour options.
    pub behaviour: BehaviourFlags,
}

/// Unified application context passed to every command handler.
pub struct AppContext {
    /// Terminal output context (colors, quiet mode).
    pub output: OutputContext,
    /// Output rendering mode (human vs JSON).
    pub mode: OutputMode,
    /// Configuration persistence.
    pub config_store: YamlConfigStore,
    /// Destination for `--output` files.
    pub fs: LocalFs,
    /// When `true`, skip interactive prompts and use defaults.
    ///
    /// Set when `--yes` / `-y` is passed, or when the `CI` or `BASTION_YES`
    /// environment variables are present.
    pub non_interactive: bool,
}

impl AppContext {
    /// Construct an `AppContext` from top-level CLI flags.
    #[must_use]
    pub fn new(flags: &AppFlags) -> Self {
        let ci_env = std::env::var("CI").is_ok() || std::env::var("BASTION_YES").is_ok();
        let non_interactive = flags.behaviour.yes || ci_env;

        let mode = if flags.output.json {
            OutputMode::Json
        } else {
            OutputMode::Human
        };

        Self {
            output: OutputContext::new(flags.output.no_color, flags.output.quiet),
            mode,
            config_store: YamlConfigStore,
            fs: LocalFs,
            non_interactive,
        }
    }

    /// Returns `true` when JSON output mode is active.
    #[must_use]
    pub fn is_json(&self) -> bool {
        self.mode == OutputMode::Json
    }

    /// Progress reporter for application services. Silent in JSON mode so
    /// stdout and stderr carry nothing but the document and errors.
    #[must_use]
    pub fn reporter(&self) -> Reporter<'_> {
        if self.is_json() || self.output.quiet {
            Reporter::Silent(SilentReporter)
        } else {
            Reporter::Terminal(TerminalReporter::new(&self.output))
        }
    }

    /// Ask the user for confirmation.
    ///
    /// When `non_interactive` is `true` (CI, `--yes` flag, or `BASTION_YES`
    /// env), returns `default` immediately without prompting.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal prompt fails (e.g. no TTY available).
    pub fn confirm(&self, prompt: &str, default: bool) -> Result<bool> {
        if self.non_interactive {
            return Ok(default);
        }
        let confirmed = dialoguer::Confirm::new()
            .with_prompt(prompt)
            .default(default)
            .interact()?;
        Ok(confirmed)
    }

    /// Write `contents` to `path`, asking before replacing an existing file.
    ///
    /// With `--yes` an existing file is replaced. Without a terminal to ask
    /// on, the write is refused.
    ///
    /// # Errors
    ///
    /// Returns `OutputFileError` if the file exists and may not be replaced,
    /// or any I/O error from the write.
    pub fn write_output(&self, path: &Path, contents: &str) -> Result<()> {
        if self.fs.exists(path) {
            let shown = path.display().to_string();
            if !self.non_interactive {
                if !console::Term::stderr().is_term() {
                    return Err(OutputFileError::Exists(shown).into());
                }
                if !self.confirm(&format!("Overwrite {shown}?"), false)? {
                    return Err(OutputFileError::Declined(shown).into());
                }
            }
        }
        self.fs.write_atomic(path, contents)
    }
}
