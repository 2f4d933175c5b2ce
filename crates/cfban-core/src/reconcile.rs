//! Ban reconciler: single-address insert and removal on the managed list.
//!
//! Items can only be deleted by their provider-assigned id, so `unban`
//! scans the whole list for the address first. Neither direction checks
//! for duplicates beforehand.

use std::net::Ipv4Addr;

use cfban_api::Outcome;
use cfban_api::models::{ListItem, NewListItem};
use tracing::{debug, error, info};

use crate::context::Context;
use crate::notice;
use crate::report;
use crate::resources;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BanOutcome {
    Banned,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnbanOutcome {
    Removed,
    /// The address was not on the list; not an error.
    NotListed,
    Failed,
}

/// Add `address` to the managed list.
pub async fn ban(ctx: &Context, address: Ipv4Addr) -> BanOutcome {
    let Some(list_id) = resolve_list_id(ctx).await else {
        error!("Could not ban {address}: no fail2ban list id available.");
        return BanOutcome::Failed;
    };

    let item = NewListItem {
        ip: address.to_string(),
    };
    let outcome = ctx.client().add_item(ctx.account(), &list_id, &item).await;

    match outcome {
        Ok(Outcome::Success(_)) => {
            info!("Banned {address}");
            BanOutcome::Banned
        }
        Ok(Outcome::Failure(errors)) => {
            error!("Could not ban {address}");
            report::api_errors(&errors);
            BanOutcome::Failed
        }
        Err(e) => {
            error!("Could not ban {address}");
            report::transport_failure(&e);
            BanOutcome::Failed
        }
    }
}

/// Remove `address` from the managed list, if it is there.
pub async fn unban(ctx: &Context, address: Ipv4Addr) -> UnbanOutcome {
    let Some(list_id) = resolve_list_id(ctx).await else {
        error!("Could not unban {address}: no fail2ban list id available.");
        return UnbanOutcome::Failed;
    };

    let items = match ctx.client().list_items(ctx.account(), &list_id).await {
        Ok(Outcome::Success(items)) => items,
        Ok(Outcome::Failure(errors)) => {
            error!("Could not get list items.");
            report::api_errors(&errors);
            return UnbanOutcome::Failed;
        }
        Err(e) => {
            error!("Could not get list items.");
            report::transport_failure(&e);
            return UnbanOutcome::Failed;
        }
    };

    let Some(item_id) = find_item(&items, address) else {
        notice!("Could not find {address} in list.");
        return UnbanOutcome::NotListed;
    };
    debug!(item_id, "found list item");

    match ctx
        .client()
        .delete_items(ctx.account(), &list_id, &[item_id])
        .await
    {
        Ok(Outcome::Success(_)) => {
            notice!("Unbanned {address}");
            UnbanOutcome::Removed
        }
        Ok(Outcome::Failure(errors)) => {
            error!("Could not unban {address}");
            report::api_errors(&errors);
            UnbanOutcome::Failed
        }
        Err(e) => {
            error!("Could not unban {address}");
            report::transport_failure(&e);
            UnbanOutcome::Failed
        }
    }
}

/// The cached list id, or the id of the provider's managed list which is
/// then cached. `None` when neither exists.
pub async fn resolve_list_id(ctx: &Context) -> Option<String> {
    if let Some(id) = ctx.store().load() {
        return Some(id);
    }

    info!("No cached list id, looking up the fail2ban list.");
    let lists = match ctx.client().list_lists(ctx.account()).await {
        Ok(Outcome::Success(lists)) => lists,
        Ok(Outcome::Failure(errors)) => {
            error!("Could not get list information. Check 'token-test' and token permissions.");
            report::api_errors(&errors);
            return None;
        }
        Err(e) => {
            error!("Could not get list information. Check 'token-test' and token permissions.");
            report::transport_failure(&e);
            return None;
        }
    };

    let Some(list) = lists.into_iter().find(resources::is_managed_list) else {
        error!("No fail2ban list exists. Run the 'start' action first.");
        return None;
    };

    if ctx.store().save(&list.id) {
        info!("List id stored.");
    } else {
        error!("Could not store list id.");
    }
    Some(list.id)
}

/// Id of the item holding `address`. The last match wins if the provider
/// returns duplicates.
fn find_item(items: &[ListItem], address: Ipv4Addr) -> Option<&str> {
    items
        .iter()
        .rev()
        .find(|item| {
            item.ip
                .as_deref()
                .and_then(|ip| ip.trim().parse::<Ipv4Addr>().ok())
                == Some(address)
        })
        .map(|item| item.id.as_str())
}
