//! fail2ban-compatible log lines.
//!
//! Events are rendered the way fail2ban writes its own log, so the action's
//! output interleaves cleanly with the daemon's:
//!
//! ```text
//! 2024-05-01 12:00:00,123 fail2ban.actions        [4711]: NOTICE  [cloudflare] Unbanned 203.0.113.5
//! ```
//!
//! `tracing` has no NOTICE or CRITICAL level. Those are carried in a
//! `severity` field, set by the [`notice!`](crate::notice) and
//! [`critical!`](crate::critical) macros.

use std::fmt::{self, Write as _};

use strum::{Display, EnumString};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;

#[doc(hidden)]
pub use tracing as __tracing;

const FACILITY: &str = "fail2ban.actions";
const TAG: &str = "cloudflare";

/// fail2ban's six severities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "UPPERCASE")]
pub enum Severity {
    Info,
    Notice,
    Warning,
    Error,
    Critical,
    Debug,
}

impl Severity {
    pub fn from_level(level: Level) -> Self {
        match level {
            Level::ERROR => Self::Error,
            Level::WARN => Self::Warning,
            Level::INFO => Self::Info,
            _ => Self::Debug,
        }
    }
}

/// Log at fail2ban's NOTICE severity (an INFO event underneath).
#[macro_export]
macro_rules! notice {
    ($($arg:tt)+) => {
        $crate::logging::__tracing::info!(severity = "NOTICE", $($arg)+)
    };
}

/// Log at fail2ban's CRITICAL severity (an ERROR event underneath).
#[macro_export]
macro_rules! critical {
    ($($arg:tt)+) => {
        $crate::logging::__tracing::error!(severity = "CRITICAL", $($arg)+)
    };
}

/// `FormatEvent` producing one fail2ban log line per event.
#[derive(Debug, Clone)]
pub struct Fail2banFormat {
    pid: String,
}

impl Fail2banFormat {
    /// `pid` is the fail2ban server's pid, shown in brackets on every line.
    pub fn new(pid: impl Into<String>) -> Self {
        Self { pid: pid.into() }
    }
}

impl<S, N> FormatEvent<S, N> for Fail2banFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let mut line = LineVisitor::default();
        event.record(&mut line);

        let severity = line
            .severity
            .unwrap_or_else(|| Severity::from_level(*event.metadata().level()));
        let now = chrono::Local::now().format("%Y-%m-%d %H:%M:%S,%3f");
        let label = severity.to_string();

        writeln!(
            writer,
            "{now} {FACILITY:<24}[{pid}]: {label:<8}[{TAG}] {message}{fields}",
            pid = self.pid,
            message = line.message,
            fields = line.fields,
        )
    }
}

#[derive(Default)]
struct LineVisitor {
    message: String,
    severity: Option<Severity>,
    fields: String,
}

impl Visit for LineVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        match field.name() {
            "severity" => self.severity = value.parse().ok(),
            "message" => value.clone_into(&mut self.message),
            name => {
                let _ = write!(self.fields, " {name}={value}");
            }
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        match field.name() {
            "message" => self.message = format!("{value:?}"),
            name => {
                let _ = write!(self.fields, " {name}={value:?}");
            }
        }
    }
}
