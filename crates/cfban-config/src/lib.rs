//! Configuration for the cfban action.
//!
//! Two sources: the fail2ban configuration files the action is installed
//! into (`.local` overrides checked before `.conf`), and the tool's own
//! settings, which only relocate fixed paths and are layered with figment
//! from defaults and `CFBAN_*` environment variables.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Serialized},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use cfban_core::{ContextConfig, Credentials};

/// Section holding the daemon's `logtarget` and `pidfile`.
pub const DAEMON_SECTION: &str = "fail2ban";
/// Section holding `cftoken`, `cfaccount` and `cfzone`.
pub const JAIL_SECTION: &str = "jail";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration file '{}' could not be found", path.display())]
    MissingFile { path: PathBuf },

    #[error("could not find config value '{key}' in '{section}.conf'")]
    MissingKey { section: String, key: String },

    #[error("cannot read '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid PID file '{}': {reason}", path.display())]
    Pid { path: PathBuf, reason: String },

    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("settings loading failed: {0}")]
    Figment(Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── Tool settings ───────────────────────────────────────────────────

/// Where things live. Every field can be overridden with `CFBAN_<FIELD>`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    /// fail2ban configuration directory.
    pub config_dir: PathBuf,
    /// Versioned provider API root.
    pub api_url: String,
    /// Directory holding the cached list id.
    pub state_dir: PathBuf,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            config_dir: PathBuf::from("/etc/fail2ban/"),
            api_url: "https://api.cloudflare.com/client/v4/".into(),
            state_dir: PathBuf::from("/tmp/"),
            timeout_secs: 30,
        }
    }
}

impl Settings {
    pub fn api_url(&self) -> Result<Url, ConfigError> {
        Url::parse(&self.api_url).map_err(|e| ConfigError::Validation {
            field: "api_url".into(),
            reason: format!("'{}' is not a URL: {e}", self.api_url),
        })
    }
}

/// Defaults merged with `CFBAN_*` environment variables.
pub fn load_settings() -> Result<Settings, ConfigError> {
    let settings: Settings = Figment::new()
        .merge(Serialized::defaults(Settings::default()))
        .merge(Env::prefixed("CFBAN_"))
        .extract()?;

    settings.api_url()?;
    if settings.timeout_secs == 0 {
        return Err(ConfigError::Validation {
            field: "timeout_secs".into(),
            reason: "must be greater than zero".into(),
        });
    }
    Ok(settings)
}

// ── fail2ban configuration files ────────────────────────────────────

/// Look up `key` in `<dir>/<section>.local`, then `<dir>/<section>.conf`.
///
/// A missing `.local` is fine. A missing `.conf` is an error unless the
/// key was already found in `.local`.
pub fn read_option(dir: &Path, section: &str, key: &str) -> Result<String, ConfigError> {
    let local = dir.join(format!("{section}.local"));
    if let Some(contents) = read_if_exists(&local)? {
        if let Some(value) = find_value(&contents, key) {
            return Ok(value);
        }
    }

    let conf = dir.join(format!("{section}.conf"));
    let contents = read_if_exists(&conf)?.ok_or(ConfigError::MissingFile { path: conf })?;
    find_value(&contents, key).ok_or_else(|| ConfigError::MissingKey {
        section: section.into(),
        key: key.into(),
    })
}

fn read_if_exists(path: &Path) -> Result<Option<String>, ConfigError> {
    match fs::read_to_string(path) {
        Ok(contents) => Ok(Some(contents)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(source) => Err(ConfigError::Read {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Value of the first `key = value` line, with one pair of surrounding
/// double quotes removed.
fn find_value(contents: &str, key: &str) -> Option<String> {
    contents.lines().find_map(|line| {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            return None;
        }
        let (name, value) = line.split_once('=')?;
        if name.trim() != key {
            return None;
        }
        let value = value.trim();
        let value = value
            .strip_prefix('"')
            .and_then(|v| v.strip_suffix('"'))
            .unwrap_or(value);
        Some(value.to_owned())
    })
}

/// The numeric PID on the first line of `path`.
pub fn read_pid(path: &Path) -> Result<u32, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|e| ConfigError::Pid {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let line = contents.lines().next().unwrap_or_default().trim();
    line.parse().map_err(|_| ConfigError::Pid {
        path: path.to_path_buf(),
        reason: format!("'{line}' is not a process id"),
    })
}

// ── Resolved identities ─────────────────────────────────────────────

/// The fail2ban daemon the action runs under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DaemonIdentity {
    /// `STDOUT`, `STDERR`, `SYSLOG`, `SYSOUT` or a file path.
    pub log_target: String,
    pub pid_file: PathBuf,
}

impl DaemonIdentity {
    pub fn pid(&self) -> Result<u32, ConfigError> {
        read_pid(&self.pid_file)
    }
}

pub fn load_daemon(settings: &Settings) -> Result<DaemonIdentity, ConfigError> {
    let log_target = read_option(&settings.config_dir, DAEMON_SECTION, "logtarget")?;
    let pid_file = read_option(&settings.config_dir, DAEMON_SECTION, "pidfile")?;
    Ok(DaemonIdentity {
        log_target,
        pid_file: PathBuf::from(pid_file),
    })
}

/// `cftoken`, `cfaccount` and `cfzone` from the jail configuration.
pub fn load_credentials(settings: &Settings) -> Result<Credentials, ConfigError> {
    let read = |key: &str| -> Result<String, ConfigError> {
        let value = read_option(&settings.config_dir, JAIL_SECTION, key)?;
        if value.is_empty() {
            return Err(ConfigError::Validation {
                field: key.into(),
                reason: "must not be empty".into(),
            });
        }
        Ok(value)
    };

    Ok(Credentials {
        api_token: SecretString::from(read("cftoken")?),
        account_id: read("cfaccount")?,
        zone_id: read("cfzone")?,
    })
}

/// Everything `cfban_core::Context::new` needs.
pub fn context_config(
    settings: &Settings,
    credentials: Credentials,
) -> Result<ContextConfig, ConfigError> {
    Ok(ContextConfig {
        credentials,
        api_url: settings.api_url()?,
        state_dir: settings.state_dir.clone(),
        timeout: Duration::from_secs(settings.timeout_secs),
    })
}
