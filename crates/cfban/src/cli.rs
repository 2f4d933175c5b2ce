//! Clap derive structures for the `cfban` action.
//!
//! fail2ban calls the action as `cfban <action> [target]`, so there are no
//! subcommands and no flags beyond `--help` and `--version`.

use clap::{Parser, ValueEnum};

/// cfban -- fail2ban action for Cloudflare IP lists
#[derive(Debug, Parser)]
#[command(
    name = "cfban",
    version,
    about = "Mirror fail2ban bans into a Cloudflare IP list",
    long_about = "A fail2ban action that keeps a Cloudflare account list named 'fail2ban',\n\
        a zone filter and a blocking firewall rule in sync with the jail.\n\n\
        Credentials are read from jail.conf (cftoken, cfaccount, cfzone),\n\
        the log target and PID file from fail2ban.conf. Set CFBAN_CONFIG_DIR,\n\
        CFBAN_STATE_DIR, CFBAN_API_URL or CFBAN_TIMEOUT_SECS to relocate them.",
    arg_required_else_help = true
)]
pub struct Cli {
    /// Action requested by fail2ban
    #[arg(value_enum)]
    pub action: Action,

    /// IPv4 address to ban or unban
    #[arg(required_if_eq_any([("action", "ban"), ("action", "unban")]))]
    pub target: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Action {
    /// Remove leftovers, then create the list, filter and firewall rule
    Start,
    /// Remove the list, filter and firewall rule
    Stop,
    /// Add the target address to the list
    Ban,
    /// Remove the target address from the list
    Unban,
    /// Check that the API token is valid and active
    TokenTest,
    /// Show the accounts and zones the token can see
    Setup,
    /// Placeholder; check token permissions manually
    PermissionTest,
}
