// ── Diagnostic actions ──
//
// Read-only checks an operator runs by hand while installing the action.
// None of them touch the managed resources or the list-id cache.

use cfban_api::Outcome;
use tracing::{error, info, warn};

use crate::context::Context;
use crate::report;

const PERMISSION_HINT: &str = "Check 'token-test' and token permissions.";

/// `token-test`: is the configured token valid and active?
pub async fn token_test(ctx: &Context) -> bool {
    report::banner("Cloudflare API token-test");
    info!("Testing api token");

    match ctx.client().verify_token().await {
        Ok(Outcome::Success(token)) if token.status == "active" => {
            info!("This API Token is valid and active");
            info!("You can now run setup and permission-test");
            true
        }
        Ok(Outcome::Success(token)) => {
            error!("The API Token is not active, status: {}", token.status);
            false
        }
        Ok(Outcome::Failure(errors)) => {
            report::api_errors(&errors);
            false
        }
        Err(e) => {
            report::transport_failure(&e);
            false
        }
    }
}

/// `setup`: print the accounts and zones the token can see, so their ids
/// can be copied into the jail configuration. An empty listing counts as a
/// failure.
pub async fn setup(ctx: &Context) -> bool {
    report::banner("Cloudflare API setup");

    info!("Try to list account information");
    let accounts = match ctx.client().list_accounts().await {
        Ok(Outcome::Success(accounts)) if !accounts.is_empty() => {
            for account in &accounts {
                info!(
                    "Found account, ID: {} Name: {} Type: {}",
                    account.id,
                    account.name,
                    account.account_type.as_deref().unwrap_or("-"),
                );
            }
            true
        }
        Ok(Outcome::Success(_)) => {
            error!("Cant obtain account information. {PERMISSION_HINT}");
            false
        }
        Ok(Outcome::Failure(errors)) => {
            error!("Cant obtain account information. {PERMISSION_HINT}");
            report::api_errors(&errors);
            false
        }
        Err(e) => {
            error!("Cant obtain account information. {PERMISSION_HINT}");
            report::transport_failure(&e);
            false
        }
    };
    info!("");

    info!("Try to list zone id's");
    let zones = match ctx.client().list_zones().await {
        Ok(Outcome::Success(zones)) if !zones.is_empty() => {
            for zone in &zones {
                info!(
                    "Found zone, ID: {} Name: {} Status: {}",
                    zone.id,
                    zone.name,
                    zone.status.as_deref().unwrap_or("-"),
                );
            }
            true
        }
        Ok(Outcome::Success(_)) => {
            error!("Cant obtain zone information. {PERMISSION_HINT}");
            false
        }
        Ok(Outcome::Failure(errors)) => {
            error!("Cant obtain zone information. {PERMISSION_HINT}");
            report::api_errors(&errors);
            false
        }
        Err(e) => {
            error!("Cant obtain zone information. {PERMISSION_HINT}");
            report::transport_failure(&e);
            false
        }
    };

    accounts && zones
}

/// `permission-test`: placeholder; permissions are checked manually.
pub fn permission_test() {
    report::banner("Cloudflare API permission-test");
    warn!("permission-test is currently not implemented");
    warn!("please check your permissions according to the install manual");
}
