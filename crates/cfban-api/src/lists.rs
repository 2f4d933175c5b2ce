// List endpoints
//
// Account-scoped custom lists and their items. The provider has no
// delete-by-value for items, so removal always goes through item ids.

use reqwest::Method;
use serde_json::{Value, json};
use tracing::debug;

use crate::client::CloudflareClient;
use crate::error::Error;
use crate::models::{IpList, ListItem, NewList, NewListItem, Outcome};

impl CloudflareClient {
    /// List all custom lists of an account.
    ///
    /// `GET accounts/{account}/rules/lists`
    pub async fn list_lists(&self, account: &str) -> Result<Outcome<Vec<IpList>>, Error> {
        self.request(&format!("accounts/{account}/rules/lists"), Method::GET, None, false)
            .await
    }

    /// Create a list.
    ///
    /// `POST accounts/{account}/rules/lists`
    pub async fn create_list(&self, account: &str, list: &NewList) -> Result<Outcome<IpList>, Error> {
        debug!(name = %list.name, "creating list");
        let body = serde_json::to_value(list)?;
        self.request(
            &format!("accounts/{account}/rules/lists"),
            Method::POST,
            Some(&body),
            false,
        )
        .await
    }

    /// Delete a list by id.
    ///
    /// `DELETE accounts/{account}/rules/lists/{list_id}`
    pub async fn delete_list(&self, account: &str, list_id: &str) -> Result<Outcome<Value>, Error> {
        self.request(
            &format!("accounts/{account}/rules/lists/{list_id}"),
            Method::DELETE,
            None,
            false,
        )
        .await
    }

    /// Fetch every item of a list, following cursor pagination.
    ///
    /// `GET accounts/{account}/rules/lists/{list_id}/items[?cursor=...]`
    pub async fn list_items(
        &self,
        account: &str,
        list_id: &str,
    ) -> Result<Outcome<Vec<ListItem>>, Error> {
        let endpoint = format!("accounts/{account}/rules/lists/{list_id}/items");
        let mut items = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let query: Vec<(&str, &str)> = cursor
                .as_deref()
                .map(|after| ("cursor", after))
                .into_iter()
                .collect();

            let (outcome, next) = self
                .request_page::<Vec<ListItem>>(&endpoint, &query)
                .await?;
            match outcome {
                Outcome::Success(page) => items.extend(page),
                Outcome::Failure(errors) => return Ok(Outcome::Failure(errors)),
            }

            match next {
                Some(after) if cursor.as_deref() != Some(after.as_str()) => {
                    debug!(cursor = %after, "fetching next page of list items");
                    cursor = Some(after);
                }
                _ => break,
            }
        }

        Ok(Outcome::Success(items))
    }

    /// Add a single IP to a list.
    ///
    /// `POST accounts/{account}/rules/lists/{list_id}/items` with `[{"ip": "..."}]`
    pub async fn add_item(
        &self,
        account: &str,
        list_id: &str,
        item: &NewListItem,
    ) -> Result<Outcome<Value>, Error> {
        let body = serde_json::to_value(item)?;
        self.request(
            &format!("accounts/{account}/rules/lists/{list_id}/items"),
            Method::POST,
            Some(&body),
            true,
        )
        .await
    }

    /// Remove items by their provider-assigned ids.
    ///
    /// `DELETE accounts/{account}/rules/lists/{list_id}/items` with `{"items": [{"id": "..."}]}`
    pub async fn delete_items(
        &self,
        account: &str,
        list_id: &str,
        item_ids: &[&str],
    ) -> Result<Outcome<Value>, Error> {
        let items: Vec<Value> = item_ids.iter().map(|id| json!({ "id": id })).collect();
        let body = json!({ "items": items });
        self.request(
            &format!("accounts/{account}/rules/lists/{list_id}/items"),
            Method::DELETE,
            Some(&body),
            false,
        )
        .await
    }
}
