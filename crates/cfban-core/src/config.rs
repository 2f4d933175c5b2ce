// ── Runtime configuration ──
//
// These types describe *what* to operate on and *where* local state lives.
// They carry credential data but never touch disk; the binary reads the
// fail2ban configuration and hands a `ContextConfig` in.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use url::Url;

/// Provider credentials, fixed for the lifetime of the process.
#[derive(Debug, Clone)]
pub struct Credentials {
    /// Scoped API token (needs list edit, zone read, firewall edit).
    pub api_token: SecretString,
    /// Account owning the IP list.
    pub account_id: String,
    /// Zone carrying the filter and firewall rule.
    pub zone_id: String,
}

/// Everything needed to build a [`Context`](crate::Context).
#[derive(Debug, Clone)]
pub struct ContextConfig {
    pub credentials: Credentials,
    /// Versioned API root, e.g. `https://api.cloudflare.com/client/v4/`.
    pub api_url: Url,
    /// Directory holding the cached list id file.
    pub state_dir: PathBuf,
    /// Per-request timeout.
    pub timeout: Duration,
}
