//! Provisioning engine: the managed list, filter and firewall rule.
//!
//! `start` always cleans up before creating, so a crashed or repeated start
//! still leaves exactly one managed triple behind. Cleanup deletes in
//! referential order (rules, then filters, then lists) and matches by the
//! fixed marker, because the cached list id may be stale or missing. After a
//! listed list pass the cache is kept only if it names a list whose delete
//! failed.
//!
//! Provider failures are logged and the next step still runs. A step that
//! needs an earlier step's result (the rule needs the filter) is skipped
//! with a logged reason instead. A filter whose rule could not be created
//! is deleted again, so filter and rule only ever exist as a pair.

use cfban_api::Outcome;
use serde_json::Value;
use tracing::{debug, error, info};

use crate::context::Context;
use crate::notice;
use crate::report;
use crate::resources;

/// Identity of the filter created during `start`, needed by the rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterHandle {
    pub id: String,
    pub reference: String,
}

/// What `start` managed to create.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProvisionReport {
    pub list_id: Option<String>,
    pub filter: Option<FilterHandle>,
    pub rule_id: Option<String>,
}

/// Result of one cleanup pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassReport {
    /// Whether listing the resources succeeded; the pass is skipped if not.
    pub listed: bool,
    pub deleted: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanupReport {
    pub rules: PassReport,
    pub filters: PassReport,
    pub lists: PassReport,
}

// ── Actions ─────────────────────────────────────────────────────────

/// `start`: clean up leftovers, then create list, filter and rule.
pub async fn startup(ctx: &Context) -> ProvisionReport {
    report::banner("Cloudflare API start");
    info!("Cloudflare cleanup and init process for list, filter rule and firewall rule.");
    info!("");

    cleanup(ctx).await;

    let list_id = create_list(ctx).await;
    info!("");

    let (filter, rule_id) = match create_filter(ctx).await {
        Some(handle) => {
            info!("");
            match create_rule(ctx, &handle).await {
                Some(rule_id) => (Some(handle), Some(rule_id)),
                None => {
                    let kept = !discard_filter(ctx, &handle).await;
                    (kept.then_some(handle), None)
                }
            }
        }
        None => {
            info!("");
            error!("Skipping firewall rule creation: no fail2ban filter to attach it to.");
            (None, None)
        }
    };
    info!("");
    notice!("Init finish");
    info!("");

    let report = ProvisionReport {
        list_id,
        filter,
        rule_id,
    };
    debug!(?report, "startup finished");
    report
}

/// `stop`: remove every managed resource without recreating anything.
pub async fn teardown(ctx: &Context) -> CleanupReport {
    report::banner("Cloudflare API stop");
    info!("Cloudflare cleanup process for list, filter rule and firewall rule.");
    info!("");

    cleanup(ctx).await
}

/// Three independent delete passes: rules, filters, lists.
pub async fn cleanup(ctx: &Context) -> CleanupReport {
    let rules = purge_rules(ctx).await;
    info!("");
    let filters = purge_filters(ctx).await;
    info!("");
    let lists = purge_lists(ctx).await;
    info!("");
    info!("Cleanup finish");
    info!("");

    let report = CleanupReport {
        rules,
        filters,
        lists,
    };
    debug!(?report, "cleanup finished");
    report
}

// ── Create steps ────────────────────────────────────────────────────

async fn create_list(ctx: &Context) -> Option<String> {
    info!("Creating new fail2ban list.");
    let outcome = ctx
        .client()
        .create_list(ctx.account(), &resources::new_list())
        .await;

    match outcome {
        Ok(Outcome::Success(list)) => {
            info!("Fail2ban list successfully created.");
            if ctx.store().save(&list.id) {
                info!("List id stored.");
            } else {
                error!("Could not store list id.");
            }
            Some(list.id)
        }
        Ok(Outcome::Failure(errors)) => {
            error!("Could not create fail2ban list.");
            report::api_errors(&errors);
            None
        }
        Err(e) => {
            error!("Could not create fail2ban list.");
            report::transport_failure(&e);
            None
        }
    }
}

async fn create_filter(ctx: &Context) -> Option<FilterHandle> {
    info!("Create new filter rule");
    let outcome = ctx
        .client()
        .create_filter(ctx.zone(), &resources::new_filter())
        .await
        .map(|o| o.map(|filters| filters.into_iter().next()));

    match outcome {
        Ok(Outcome::Success(Some(filter))) => {
            info!("Fail2ban filter successfully created.");
            Some(FilterHandle {
                reference: filter
                    .reference
                    .unwrap_or_else(|| resources::MARKER.to_owned()),
                id: filter.id,
            })
        }
        Ok(Outcome::Success(None)) => {
            error!("Could not create fail2ban filter: the provider returned no filter.");
            None
        }
        Ok(Outcome::Failure(errors)) => {
            error!("Could not create fail2ban filter.");
            report::api_errors(&errors);
            None
        }
        Err(e) => {
            error!("Could not create fail2ban filter.");
            report::transport_failure(&e);
            None
        }
    }
}

async fn create_rule(ctx: &Context, filter: &FilterHandle) -> Option<String> {
    info!("Create new firewall rule");
    let rule = resources::new_rule(&filter.id, &filter.reference);
    let outcome = ctx.client().create_firewall_rule(ctx.zone(), &rule).await;

    match outcome {
        Ok(Outcome::Success(rules)) => {
            let created = rules.into_iter().next().map(|r| r.id);
            if created.is_some() {
                info!("Fail2ban firewall successfully created.");
            } else {
                error!("Could not create fail2ban firewall: the provider returned no rule.");
            }
            created
        }
        Ok(Outcome::Failure(errors)) => {
            error!("Could not create fail2ban firewall.");
            report::api_errors(&errors);
            None
        }
        Err(e) => {
            error!("Could not create fail2ban firewall.");
            report::transport_failure(&e);
            None
        }
    }
}

/// Delete a filter whose rule could not be created, so no filter is left
/// without its rule. Returns whether the filter is gone.
async fn discard_filter(ctx: &Context, filter: &FilterHandle) -> bool {
    info!("Removing the fail2ban filter left without a firewall rule.");
    let outcome = ctx.client().delete_filter(ctx.zone(), &filter.id).await;
    let mut pass = PassReport::default();
    let failure = format!("Could not remove orphaned filter rule {}", filter.id);
    let removed = record_delete(&mut pass, outcome, &failure);
    if removed {
        info!("Filter rule successfully deleted.");
    }
    removed
}

// ── Cleanup passes ──────────────────────────────────────────────────

async fn purge_rules(ctx: &Context) -> PassReport {
    info!("Check for existing firewall rule");
    let listing = ctx.client().list_firewall_rules(ctx.zone()).await;
    let Some(rules) = candidates("firewall", listing, resources::is_managed_rule) else {
        return PassReport::default();
    };

    let mut pass = PassReport {
        listed: true,
        ..PassReport::default()
    };
    for rule in rules {
        info!("Found old firewall rule, try deleting it.");
        let outcome = ctx.client().delete_firewall_rule(ctx.zone(), &rule.id).await;
        let failure = format!("Could not delete old firewall rule {}", rule.id);
        if record_delete(&mut pass, outcome, &failure) {
            info!("Firewall rule successfully deleted.");
        }
    }
    pass
}

async fn purge_filters(ctx: &Context) -> PassReport {
    info!("Check for existing filter rule");
    let listing = ctx.client().list_filters(ctx.zone()).await;
    let Some(filters) = candidates("filter", listing, resources::is_managed_filter) else {
        return PassReport::default();
    };

    let mut pass = PassReport {
        listed: true,
        ..PassReport::default()
    };
    for filter in filters {
        info!("Found old filter rule, try deleting it.");
        let outcome = ctx.client().delete_filter(ctx.zone(), &filter.id).await;
        let failure = format!("Could not delete old filter rule {}", filter.id);
        if record_delete(&mut pass, outcome, &failure) {
            info!("Filter rule successfully deleted.");
        }
    }
    pass
}

async fn purge_lists(ctx: &Context) -> PassReport {
    info!("Check for existing lists");
    let listing = ctx.client().list_lists(ctx.account()).await;
    let Some(lists) = candidates("list", listing, resources::is_managed_list) else {
        return PassReport::default();
    };

    let mut pass = PassReport {
        listed: true,
        ..PassReport::default()
    };
    let mut surviving = Vec::new();
    for list in lists {
        info!("Old fail2ban list found, try to delete it.");
        let outcome = ctx.client().delete_list(ctx.account(), &list.id).await;
        let failure = format!("Could not delete fail2ban list {}.", list.id);
        if record_delete(&mut pass, outcome, &failure) {
            info!("Fail2ban list successfully deleted.");
        } else {
            surviving.push(list.id);
        }
    }

    // The cache may only name a managed list that still exists.
    let stale = ctx
        .store()
        .load()
        .is_some_and(|cached| !surviving.contains(&cached));
    if stale && !ctx.store().clear() {
        error!("Could not remove the stale cached list id.");
    }
    pass
}

/// Keep the managed resources of a listing, or log why the pass is skipped.
fn candidates<T>(
    kind: &str,
    listing: Result<Outcome<Vec<T>>, cfban_api::Error>,
    is_managed: impl Fn(&T) -> bool,
) -> Option<Vec<T>> {
    match listing {
        Ok(Outcome::Success(all)) => {
            let managed: Vec<T> = all.into_iter().filter(|r| is_managed(r)).collect();
            debug!(kind, count = managed.len(), "managed resources found");
            Some(managed)
        }
        Ok(Outcome::Failure(errors)) => {
            error!(
                "Could not get {kind} information. Check 'token-test' and token permissions."
            );
            report::api_errors(&errors);
            None
        }
        Err(e) => {
            error!(
                "Could not get {kind} information. Check 'token-test' and token permissions."
            );
            report::transport_failure(&e);
            None
        }
    }
}

/// Count a delete attempt, logging `failure` and the cause when it failed.
fn record_delete(
    pass: &mut PassReport,
    outcome: Result<Outcome<Value>, cfban_api::Error>,
    failure: &str,
) -> bool {
    match outcome {
        Ok(Outcome::Success(_)) => {
            pass.deleted += 1;
            true
        }
        Ok(Outcome::Failure(errors)) => {
            pass.failed += 1;
            error!("{failure}");
            report::api_errors(&errors);
            false
        }
        Err(e) => {
            pass.failed += 1;
            error!("{failure}");
            report::transport_failure(&e);
            false
        }
    }
}
