// Firewall rule endpoints

use reqwest::Method;
use serde_json::Value;
use tracing::debug;

use crate::client::CloudflareClient;
use crate::error::Error;
use crate::models::{FirewallRule, NewFirewallRule, Outcome};

impl CloudflareClient {
    /// List all firewall rules of a zone.
    ///
    /// `GET zones/{zone}/firewall/rules`
    pub async fn list_firewall_rules(&self, zone: &str) -> Result<Outcome<Vec<FirewallRule>>, Error> {
        self.request(&format!("zones/{zone}/firewall/rules"), Method::GET, None, false)
            .await
    }

    /// Create one firewall rule bound to an existing filter.
    ///
    /// `POST zones/{zone}/firewall/rules` with `[{action, filter: {...}}]`
    pub async fn create_firewall_rule(
        &self,
        zone: &str,
        rule: &NewFirewallRule,
    ) -> Result<Outcome<Vec<FirewallRule>>, Error> {
        debug!(action = %rule.action, "creating firewall rule");
        let body = serde_json::to_value(rule)?;
        self.request(
            &format!("zones/{zone}/firewall/rules"),
            Method::POST,
            Some(&body),
            true,
        )
        .await
    }

    /// Delete a firewall rule by id.
    ///
    /// `DELETE zones/{zone}/firewall/rules/{rule_id}`
    pub async fn delete_firewall_rule(
        &self,
        zone: &str,
        rule_id: &str,
    ) -> Result<Outcome<Value>, Error> {
        self.request(
            &format!("zones/{zone}/firewall/rules/{rule_id}"),
            Method::DELETE,
            None,
            false,
        )
        .await
    }
}
