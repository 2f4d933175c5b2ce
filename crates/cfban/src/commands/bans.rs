use std::net::{IpAddr, Ipv4Addr};

use tracing::{debug, error};

use cfban_core::{Context, reconcile};

use crate::error::CliError;

pub async fn ban(ctx: &Context, target: Option<&str>) -> Result<(), CliError> {
    let Some(address) = parse_target(target)? else {
        return Ok(());
    };
    let outcome = reconcile::ban(ctx, address).await;
    debug!(?outcome, "ban finished");
    Ok(())
}

pub async fn unban(ctx: &Context, target: Option<&str>) -> Result<(), CliError> {
    let Some(address) = parse_target(target)? else {
        return Ok(());
    };
    let outcome = reconcile::unban(ctx, address).await;
    debug!(?outcome, "unban finished");
    Ok(())
}

/// The IPv4 address to act on. IPv6 targets are logged and skipped
/// (`Ok(None)`); anything that is not an address is a usage error.
fn parse_target(target: Option<&str>) -> Result<Option<Ipv4Addr>, CliError> {
    let Some(raw) = target else {
        return Err(CliError::InvalidTarget {
            target: String::new(),
            reason: "no address given".into(),
        });
    };

    match raw.trim().parse::<IpAddr>() {
        Ok(IpAddr::V4(address)) => Ok(Some(address)),
        Ok(IpAddr::V6(address)) => {
            error!("IPv6 is not supported, ignoring {address}");
            Ok(None)
        }
        Err(e) => Err(CliError::InvalidTarget {
            target: raw.into(),
            reason: e.to_string(),
        }),
    }
}
