//! CLI error types with miette diagnostics.
//!
//! Provider failures never get here; they are logged where they happen
//! and the action still exits 0. What remains is configuration and usage.

use miette::Diagnostic;
use thiserror::Error;

use cfban_config::ConfigError;
use cfban_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const CONFIG: i32 = 3;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Usage ────────────────────────────────────────────────────────

    #[error("Invalid target '{target}': {reason}")]
    #[diagnostic(
        code(cfban::invalid_target),
        help("ban and unban take a single IPv4 address, e.g. `cfban ban 203.0.113.5`")
    )]
    InvalidTarget { target: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error(transparent)]
    #[diagnostic(
        code(cfban::config),
        help(
            "logtarget and pidfile are read from fail2ban.conf, cftoken, cfaccount\n\
             and cfzone from jail.conf, each overridable in the matching .local file.\n\
             Set CFBAN_CONFIG_DIR if the files are not under /etc/fail2ban/."
        )
    )]
    Config(#[from] ConfigError),

    #[error("Could not open log target '{target}'")]
    #[diagnostic(
        code(cfban::log_target),
        help("Check logtarget in fail2ban.conf and that its directory is writable.")
    )]
    LogTarget {
        target: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    // ── Runtime ──────────────────────────────────────────────────────

    #[error("Could not set up the Cloudflare API client")]
    #[diagnostic(code(cfban::client_setup))]
    ClientSetup(#[from] CoreError),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidTarget { .. } => exit_code::USAGE,
            Self::Config(_) | Self::LogTarget { .. } => exit_code::CONFIG,
            Self::ClientSetup(_) => exit_code::GENERAL,
        }
    }
}
