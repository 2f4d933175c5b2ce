// Read-only endpoints used by the diagnostic actions.
//
// Token verification and account/zone discovery are not scoped to the
// configured account or zone.

use reqwest::Method;

use crate::client::CloudflareClient;
use crate::error::Error;
use crate::models::{Account, Outcome, TokenStatus, Zone};

impl CloudflareClient {
    /// `GET user/tokens/verify`
    pub async fn verify_token(&self) -> Result<Outcome<TokenStatus>, Error> {
        self.request("user/tokens/verify", Method::GET, None, false).await
    }

    /// `GET accounts`
    pub async fn list_accounts(&self) -> Result<Outcome<Vec<Account>>, Error> {
        self.request("accounts", Method::GET, None, false).await
    }

    /// `GET zones`
    pub async fn list_zones(&self) -> Result<Outcome<Vec<Zone>>, Error> {
        self.request("zones", Method::GET, None, false).await
    }
}
