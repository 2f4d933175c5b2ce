// Shared log output for action outcomes.

use cfban_api::ApiMessage;
use tracing::{error, info};

/// One ERROR line per provider error entry.
pub(crate) fn api_errors(errors: &[ApiMessage]) {
    for e in errors {
        error!("Code: {} Message: {}", e.code, e.message);
    }
}

/// A request that produced no usable envelope at all.
pub(crate) fn transport_failure(err: &cfban_api::Error) {
    if err.is_connect() {
        error!("Transport failure, provider unreachable: {err}");
    } else {
        error!("Transport failure: {err}");
    }
}

/// Section header framed by rules, preceded by a blank line.
pub(crate) fn banner(title: &str) {
    let rule = "=".repeat(title.len());
    info!("");
    info!("{rule}");
    info!("{title}");
    info!("{rule}");
}
