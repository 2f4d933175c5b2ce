// cfban-core: Provisioning and ban reconciliation on top of cfban-api.
//
// Everything here runs strictly in sequence inside one process invocation.
// Provider errors are logged where they happen and never propagate as `Err`.

pub mod config;
pub mod context;
pub mod diagnostics;
pub mod error;
pub mod logging;
pub mod provision;
pub mod reconcile;
pub mod resources;
pub mod state;

mod report;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{ContextConfig, Credentials};
pub use context::Context;
pub use error::CoreError;
pub use logging::{Fail2banFormat, Severity};
pub use provision::{CleanupReport, FilterHandle, PassReport, ProvisionReport};
pub use reconcile::{BanOutcome, UnbanOutcome};
pub use state::ListIdStore;
