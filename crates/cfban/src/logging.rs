//! Logging bootstrap: fail2ban-formatted lines into the daemon's log target.

use std::io;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::EnvFilter;

use cfban_core::Fail2banFormat;

use crate::error::CliError;

/// Install the global subscriber. The returned guard flushes pending lines
/// when dropped and must outlive every log call.
///
/// `STDOUT` and `STDERR` name the streams. `SYSLOG` and `SYSOUT` are not
/// supported and fall back to stderr. Anything else is a file path, opened
/// in append mode.
pub fn init(log_target: &str, pid: &str) -> Result<WorkerGuard, CliError> {
    let (writer, guard) = match log_target {
        "STDOUT" => tracing_appender::non_blocking(io::stdout()),
        "STDERR" | "SYSLOG" | "SYSOUT" => tracing_appender::non_blocking(io::stderr()),
        path => tracing_appender::non_blocking(file_appender(log_target, Path::new(path))?),
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_ansi(false)
        .event_format(Fail2banFormat::new(pid))
        .with_writer(writer)
        .init();

    Ok(guard)
}

fn file_appender(target: &str, path: &Path) -> Result<RollingFileAppender, CliError> {
    let failed = |reason: String| CliError::LogTarget {
        target: target.into(),
        source: reason.into(),
    };

    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| failed("not a file path".into()))?;
    let dir = path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name)
        .build(dir)
        .map_err(|e| CliError::LogTarget {
            target: target.into(),
            source: Box::new(e),
        })
}
