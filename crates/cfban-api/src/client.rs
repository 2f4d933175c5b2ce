// Cloudflare API HTTP client
//
// Wraps `reqwest::Client` with base-URL joining, body encoding and envelope
// decoding. Endpoint families (lists, filters, firewall rules, accounts)
// are implemented as inherent methods in separate files to keep this
// module focused on transport mechanics.

use reqwest::Method;
use secrecy::SecretString;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::models::{Outcome, RawEnvelope, ResultInfo};
use crate::transport::TransportConfig;

/// Raw HTTP client for the Cloudflare v4 API.
///
/// HTTP status codes are never interpreted: whether a call succeeded is
/// decided by the envelope's `success` flag alone.
pub struct CloudflareClient {
    http: reqwest::Client,
    base_url: Url,
}

impl CloudflareClient {
    /// Create a client that authenticates every request with `token`.
    ///
    /// `base_url` is the versioned API root, e.g.
    /// `https://api.cloudflare.com/client/v4/`.
    pub fn new(
        base_url: Url,
        token: &SecretString,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let http = transport.build_client(token)?;
        Ok(Self { http, base_url })
    }

    /// Create a client around a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    /// Build a full URL by appending `endpoint` to the API root.
    pub(crate) fn endpoint_url(&self, endpoint: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let endpoint = endpoint.trim_start_matches('/');
        Ok(Url::parse(&format!("{base}/{endpoint}"))?)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Issue a request and decode the envelope into an [`Outcome`].
    ///
    /// An empty `body` is never sent. With `wrap_in_array` a non-empty body
    /// is sent as a single-element array, which the filter, firewall rule and
    /// list item create endpoints require.
    pub async fn request<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        method: Method,
        body: Option<&Value>,
        wrap_in_array: bool,
    ) -> Result<Outcome<T>, Error> {
        let (outcome, _) = self
            .exchange(endpoint, &[], method, body, wrap_in_array)
            .await?;
        Ok(outcome)
    }

    /// A GET like [`request`](Self::request), with `query` encoded onto the
    /// URL, additionally returning the cursor of the next page when the
    /// provider reports one.
    pub(crate) async fn request_page<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, &str)],
    ) -> Result<(Outcome<T>, Option<String>), Error> {
        let (outcome, info) = self
            .exchange(endpoint, query, Method::GET, None, false)
            .await?;
        Ok((outcome, info.and_then(ResultInfo::next_cursor)))
    }

    async fn exchange<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, &str)],
        method: Method,
        body: Option<&Value>,
        wrap_in_array: bool,
    ) -> Result<(Outcome<T>, Option<ResultInfo>), Error> {
        let mut url = self.endpoint_url(endpoint)?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        debug!("{method} {url}");

        let mut builder = self.http.request(method, url);
        if let Some(payload) = encode_body(body, wrap_in_array) {
            trace!(%payload, "request body");
            builder = builder.body(payload.to_string());
        }

        let resp = builder.send().await.map_err(Error::Transport)?;
        let text = resp.text().await.map_err(Error::Transport)?;

        decode_envelope(&text)
    }
}

/// Decide what, if anything, goes on the wire for `body`.
///
/// `None`, `null`, `{}` and `[]` all count as empty and yield `None`,
/// regardless of method.
pub fn encode_body(body: Option<&Value>, wrap_in_array: bool) -> Option<Value> {
    let body = body?;
    let empty = match body {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    };
    if empty {
        return None;
    }
    if wrap_in_array {
        Some(Value::Array(vec![body.clone()]))
    } else {
        Some(body.clone())
    }
}

/// Parse the envelope, typing `result` only when the call succeeded.
fn decode_envelope<T: DeserializeOwned>(
    text: &str,
) -> Result<(Outcome<T>, Option<ResultInfo>), Error> {
    let envelope: RawEnvelope = serde_json::from_str(text).map_err(|e| {
        let preview: String = text.chars().take(200).collect();
        Error::Deserialization {
            message: format!("{e} (body preview: {preview:?})"),
            body: text.to_owned(),
        }
    })?;

    if !envelope.success {
        return Ok((Outcome::Failure(envelope.errors), envelope.result_info));
    }

    let result = serde_json::from_value(envelope.result).map_err(|e| Error::Deserialization {
        message: format!("unexpected result shape: {e}"),
        body: text.to_owned(),
    })?;
    Ok((Outcome::Success(result), envelope.result_info))
}
