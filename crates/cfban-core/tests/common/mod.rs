#![allow(clippy::unwrap_used, dead_code)]
// Shared harness for cfban-core integration tests: a wiremock server, a
// context pointed at it with a temporary state dir, and a log capture
// rendering fail2ban lines.

use std::collections::BTreeMap;
use std::io;
use std::sync::{Arc, Mutex};

use secrecy::SecretString;
use serde_json::{Value, json};
use tempfile::TempDir;
use tracing::subscriber::DefaultGuard;
use url::Url;
use wiremock::matchers::any;
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

use cfban_api::{CloudflareClient, TransportConfig};
use cfban_core::{Context, Credentials, Fail2banFormat, ListIdStore};

pub const ACCOUNT: &str = "acc-1";
pub const ZONE: &str = "zone-1";

// ── Harness ─────────────────────────────────────────────────────────

pub struct Harness {
    pub server: MockServer,
    pub ctx: Context,
    pub state: TempDir,
    logs: Capture,
    _guard: DefaultGuard,
}

pub async fn harness() -> Harness {
    let server = MockServer::start().await;
    let base_url = Url::parse(&format!("{}/client/v4/", server.uri())).unwrap();
    let token = SecretString::from("test-token".to_string());
    let client = CloudflareClient::new(base_url, &token, &TransportConfig::default()).unwrap();

    let state = TempDir::new().unwrap();
    let credentials = Credentials {
        api_token: token,
        account_id: ACCOUNT.into(),
        zone_id: ZONE.into(),
    };
    let ctx = Context::from_parts(credentials, client, ListIdStore::new(state.path()));

    let logs = Capture::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_ansi(false)
        .event_format(Fail2banFormat::new("4711"))
        .with_writer(move || writer.clone())
        .finish();
    let guard = tracing::subscriber::set_default(subscriber);

    Harness {
        server,
        ctx,
        state,
        logs,
        _guard: guard,
    }
}

impl Harness {
    /// `(severity, message)` of every captured line.
    pub fn log(&self) -> Vec<(String, String)> {
        let bytes = self.logs.0.lock().unwrap().clone();
        String::from_utf8(bytes)
            .unwrap()
            .lines()
            .filter_map(|line| {
                let (_, rest) = line.split_once("]: ")?;
                let (label, message) = rest.split_once("[cloudflare] ")?;
                Some((label.trim().to_owned(), message.to_owned()))
            })
            .collect()
    }

    /// Messages logged at `severity`.
    pub fn logged(&self, severity: &str) -> Vec<String> {
        self.log()
            .into_iter()
            .filter(|(label, _)| label == severity)
            .map(|(_, message)| message)
            .collect()
    }

    pub fn cached_list_id(&self) -> Option<String> {
        self.ctx.store().load()
    }

    /// Route every request to an in-memory provider.
    pub async fn mount_fake(&self, fake: &FakeCloudflare) {
        Mock::given(any())
            .respond_with(fake.clone())
            .mount(&self.server)
            .await;
    }
}

#[derive(Clone, Default)]
struct Capture(Arc<Mutex<Vec<u8>>>);

impl io::Write for Capture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

// ── Envelopes ───────────────────────────────────────────────────────

pub fn ok(result: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "success": true,
        "errors": [],
        "messages": [],
        "result": result,
    }))
}

pub fn failure(status: u16, code: i64, message: &str) -> ResponseTemplate {
    ResponseTemplate::new(status).set_body_json(json!({
        "success": false,
        "errors": [{ "code": code, "message": message }],
        "messages": [],
        "result": null,
    }))
}

// ── In-memory provider ──────────────────────────────────────────────

/// Stateful stand-in for the lists, filters and firewall rules endpoints.
#[derive(Clone, Default)]
pub struct FakeCloudflare {
    state: Arc<Mutex<FakeState>>,
}

#[derive(Default)]
pub struct FakeState {
    next_id: u32,
    /// list id -> list object
    pub lists: BTreeMap<String, Value>,
    /// list id -> items
    pub items: BTreeMap<String, Vec<Value>>,
    /// filter id -> filter object
    pub filters: BTreeMap<String, Value>,
    /// rule id -> rule object
    pub rules: BTreeMap<String, Value>,
}

impl FakeState {
    fn id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}-{}", self.next_id)
    }
}

impl FakeCloudflare {
    pub fn with<R>(&self, f: impl FnOnce(&mut FakeState) -> R) -> R {
        f(&mut self.state.lock().unwrap())
    }

    pub fn add_list(&self, name: &str) -> String {
        self.with(|s| {
            let id = s.id("list");
            s.lists.insert(id.clone(), json!({ "id": id, "name": name, "kind": "ip" }));
            s.items.insert(id.clone(), Vec::new());
            id
        })
    }

    pub fn add_filter(&self, reference: &str, description: &str) -> String {
        self.with(|s| {
            let id = s.id("filter");
            s.filters.insert(
                id.clone(),
                json!({ "id": id, "ref": reference, "description": description,
                        "expression": "(ip.src in $other)", "paused": false }),
            );
            id
        })
    }

    pub fn add_rule(&self, filter_description: &str) -> String {
        self.with(|s| {
            let id = s.id("rule");
            s.rules.insert(
                id.clone(),
                json!({ "id": id, "action": "block",
                        "filter": { "id": "f-x", "description": filter_description } }),
            );
            id
        })
    }

    pub fn item_ips(&self, list_id: &str) -> Vec<String> {
        self.with(|s| {
            s.items
                .get(list_id)
                .map(|items| {
                    items
                        .iter()
                        .filter_map(|i| i["ip"].as_str().map(str::to_owned))
                        .collect()
                })
                .unwrap_or_default()
        })
    }

    pub fn counts(&self) -> (usize, usize, usize) {
        self.with(|s| (s.lists.len(), s.filters.len(), s.rules.len()))
    }
}

impl Respond for FakeCloudflare {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let path = request
            .url
            .path()
            .trim_start_matches("/client/v4/")
            .to_owned();
        let segments: Vec<&str> = path.split('/').collect();
        let method = request.method.to_string();
        let body: Value = serde_json::from_slice(&request.body).unwrap_or(Value::Null);
        let mut s = self.state.lock().unwrap();

        match (method.as_str(), segments.as_slice()) {
            ("GET", ["accounts", ACCOUNT, "rules", "lists"]) => {
                ok(Value::Array(s.lists.values().cloned().collect()))
            }
            ("POST", ["accounts", ACCOUNT, "rules", "lists"]) => {
                let id = s.id("list");
                let mut list = body;
                list["id"] = json!(id);
                s.lists.insert(id.clone(), list.clone());
                s.items.insert(id, Vec::new());
                ok(list)
            }
            ("DELETE", ["accounts", ACCOUNT, "rules", "lists", id]) => {
                if s.lists.remove(*id).is_some() {
                    s.items.remove(*id);
                    ok(json!({ "id": id }))
                } else {
                    failure(404, 10000, "list not found")
                }
            }
            ("GET", ["accounts", ACCOUNT, "rules", "lists", id, "items"]) => {
                match s.items.get(*id) {
                    Some(items) => ok(Value::Array(items.clone())),
                    None => failure(404, 10000, "list not found"),
                }
            }
            ("POST", ["accounts", ACCOUNT, "rules", "lists", id, "items"]) => {
                if !s.items.contains_key(*id) {
                    return failure(404, 10000, "list not found");
                }
                let new: Vec<Value> = body
                    .as_array()
                    .cloned()
                    .unwrap_or_default()
                    .into_iter()
                    .map(|mut item| {
                        item["id"] = json!(s.id("item"));
                        item
                    })
                    .collect();
                s.items.entry((*id).to_owned()).or_default().extend(new);
                ok(json!({ "operation_id": "op-1" }))
            }
            ("DELETE", ["accounts", ACCOUNT, "rules", "lists", id, "items"]) => {
                let doomed: Vec<String> = body["items"]
                    .as_array()
                    .cloned()
                    .unwrap_or_default()
                    .iter()
                    .filter_map(|i| i["id"].as_str().map(str::to_owned))
                    .collect();
                match s.items.get_mut(*id) {
                    Some(items) => {
                        items.retain(|i| !doomed.iter().any(|d| i["id"] == json!(d)));
                        ok(json!({ "operation_id": "op-2" }))
                    }
                    None => failure(404, 10000, "list not found"),
                }
            }
            ("GET", ["zones", ZONE, "filters"]) => {
                ok(Value::Array(s.filters.values().cloned().collect()))
            }
            ("POST", ["zones", ZONE, "filters"]) => {
                let mut created = Vec::new();
                for mut filter in body.as_array().cloned().unwrap_or_default() {
                    let id = s.id("filter");
                    filter["id"] = json!(id);
                    s.filters.insert(id, filter.clone());
                    created.push(filter);
                }
                ok(Value::Array(created))
            }
            ("DELETE", ["zones", ZONE, "filters", id]) => match s.filters.remove(*id) {
                Some(_) => ok(json!({ "id": id })),
                None => failure(404, 10000, "filter not found"),
            },
            ("GET", ["zones", ZONE, "firewall", "rules"]) => {
                ok(Value::Array(s.rules.values().cloned().collect()))
            }
            ("POST", ["zones", ZONE, "firewall", "rules"]) => {
                let mut created = Vec::new();
                for mut rule in body.as_array().cloned().unwrap_or_default() {
                    let id = s.id("rule");
                    rule["id"] = json!(id);
                    s.rules.insert(id, rule.clone());
                    created.push(rule);
                }
                ok(Value::Array(created))
            }
            ("DELETE", ["zones", ZONE, "firewall", "rules", id]) => match s.rules.remove(*id) {
                Some(_) => ok(json!({ "id": id })),
                None => failure(404, 10000, "rule not found"),
            },
            _ => failure(404, 7003, "Could not route to the requested path"),
        }
    }
}
