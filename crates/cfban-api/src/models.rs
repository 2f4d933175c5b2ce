// Cloudflare v4 response and request types
//
// Every endpoint answers with the same envelope:
// `{ "success": bool, "result": ..., "errors": [{code, message}], "result_info": {...} }`.
// The envelope is decoded once in the client and handed to callers as an
// `Outcome<T>`. Resource fields use `#[serde(default)]` wherever the API
// omits them on some endpoints.

use serde::{Deserialize, Serialize};

// ── Response Envelope ────────────────────────────────────────────────

/// Raw provider envelope, before the `result` payload is typed.
#[derive(Debug, Deserialize)]
pub(crate) struct RawEnvelope {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub result: serde_json::Value,
    #[serde(default)]
    pub errors: Vec<ApiMessage>,
    #[serde(default)]
    pub result_info: Option<ResultInfo>,
}

/// One entry of the envelope's `errors` collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiMessage {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub message: String,
}

/// Pagination metadata. Only the cursor form is consumed.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ResultInfo {
    #[serde(default)]
    pub cursors: Option<Cursors>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct Cursors {
    #[serde(default)]
    pub after: Option<String>,
}

impl ResultInfo {
    pub(crate) fn next_cursor(self) -> Option<String> {
        self.cursors
            .and_then(|c| c.after)
            .filter(|after| !after.is_empty())
    }
}

/// Decoded provider answer: either the typed payload or the error entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    Success(T),
    Failure(Vec<ApiMessage>),
}

impl<T> Outcome<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Self::Success(value) => Outcome::Success(f(value)),
            Self::Failure(errors) => Outcome::Failure(errors),
        }
    }
}

// ── Lists ────────────────────────────────────────────────────────────

/// Account-level custom list (`accounts/{account}/rules/lists`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IpList {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub num_items: Option<u64>,
}

/// Body for creating a list.
#[derive(Debug, Clone, Serialize)]
pub struct NewList {
    pub name: String,
    pub kind: String,
    pub description: String,
}

/// One entry of a list. `ip` is absent for non-IP list kinds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListItem {
    pub id: String,
    #[serde(default)]
    pub ip: Option<String>,
    #[serde(default)]
    pub comment: Option<String>,
}

/// Body entry for adding an IP to a list.
#[derive(Debug, Clone, Serialize)]
pub struct NewListItem {
    pub ip: String,
}

// ── Filters ──────────────────────────────────────────────────────────

/// Zone filter (`zones/{zone}/filters`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Filter {
    pub id: String,
    #[serde(default)]
    pub expression: String,
    #[serde(default)]
    pub paused: bool,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, rename = "ref")]
    pub reference: Option<String>,
}

/// Body for creating a filter. Also embedded in a new firewall rule,
/// where `id` points at the already-created filter.
#[derive(Debug, Clone, Serialize)]
pub struct NewFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub expression: String,
    pub paused: bool,
    pub description: String,
    #[serde(rename = "ref")]
    pub reference: String,
}

// ── Firewall rules ───────────────────────────────────────────────────

/// Zone firewall rule (`zones/{zone}/firewall/rules`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FirewallRule {
    pub id: String,
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub filter: Option<Filter>,
}

/// Body for creating a firewall rule bound to an existing filter.
#[derive(Debug, Clone, Serialize)]
pub struct NewFirewallRule {
    pub action: String,
    pub filter: NewFilter,
}

// ── Diagnostics ──────────────────────────────────────────────────────

/// Result of `user/tokens/verify`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenStatus {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "type")]
    pub account_type: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Zone {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub status: Option<String>,
}
