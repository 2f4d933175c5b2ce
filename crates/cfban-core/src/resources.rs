// ── Managed provider resources ──
//
// The list, filter and firewall rule this tool owns are recognised by a
// fixed marker, never by the provider-assigned id.

use cfban_api::models::{Filter, FirewallRule, IpList, NewFilter, NewFirewallRule, NewList};

/// List name, filter ref and filter description of every managed resource.
pub const MARKER: &str = "fail2ban";

pub const LIST_KIND: &str = "ip";
pub const LIST_DESCRIPTION: &str = "Fail2Ban automatic ban list";
pub const RULE_ACTION: &str = "block";

/// Membership test against the managed list, referenced by name.
pub fn filter_expression() -> String {
    format!("(ip.src in ${MARKER})")
}

pub fn new_list() -> NewList {
    NewList {
        name: MARKER.into(),
        kind: LIST_KIND.into(),
        description: LIST_DESCRIPTION.into(),
    }
}

pub fn new_filter() -> NewFilter {
    NewFilter {
        id: None,
        expression: filter_expression(),
        paused: false,
        description: MARKER.into(),
        reference: MARKER.into(),
    }
}

/// Rule body embedding the filter created just before it.
pub fn new_rule(filter_id: &str, filter_ref: &str) -> NewFirewallRule {
    NewFirewallRule {
        action: RULE_ACTION.into(),
        filter: NewFilter {
            id: Some(filter_id.into()),
            reference: filter_ref.into(),
            ..new_filter()
        },
    }
}

pub fn is_managed_list(list: &IpList) -> bool {
    list.name == MARKER
}

pub fn is_managed_filter(filter: &Filter) -> bool {
    filter.reference.as_deref() == Some(MARKER)
}

pub fn is_managed_rule(rule: &FirewallRule) -> bool {
    rule.filter
        .as_ref()
        .and_then(|f| f.description.as_deref())
        == Some(MARKER)
}
