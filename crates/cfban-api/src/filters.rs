// Filter endpoints
//
// Zone-scoped filter expressions. Create takes an array payload and
// answers with an array of created filters.

use reqwest::Method;
use serde_json::Value;
use tracing::debug;

use crate::client::CloudflareClient;
use crate::error::Error;
use crate::models::{Filter, NewFilter, Outcome};

impl CloudflareClient {
    /// List all filters of a zone.
    ///
    /// `GET zones/{zone}/filters`
    pub async fn list_filters(&self, zone: &str) -> Result<Outcome<Vec<Filter>>, Error> {
        self.request(&format!("zones/{zone}/filters"), Method::GET, None, false)
            .await
    }

    /// Create one filter.
    ///
    /// `POST zones/{zone}/filters` with `[{expression, paused, description, ref}]`
    pub async fn create_filter(
        &self,
        zone: &str,
        filter: &NewFilter,
    ) -> Result<Outcome<Vec<Filter>>, Error> {
        debug!(expression = %filter.expression, "creating filter");
        let body = serde_json::to_value(filter)?;
        self.request(&format!("zones/{zone}/filters"), Method::POST, Some(&body), true)
            .await
    }

    /// Delete a filter by id.
    ///
    /// `DELETE zones/{zone}/filters/{filter_id}`
    pub async fn delete_filter(&self, zone: &str, filter_id: &str) -> Result<Outcome<Value>, Error> {
        self.request(
            &format!("zones/{zone}/filters/{filter_id}"),
            Method::DELETE,
            None,
            false,
        )
        .await
    }
}
