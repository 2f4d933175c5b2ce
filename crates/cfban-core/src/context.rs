// ── Action context ──
//
// Built once at startup and passed by reference into every action. No
// component reads ambient process state.

use cfban_api::{CloudflareClient, TransportConfig};

use crate::config::{ContextConfig, Credentials};
use crate::error::CoreError;
use crate::state::ListIdStore;

/// Credentials, API client and list-id cache for one invocation.
pub struct Context {
    credentials: Credentials,
    client: CloudflareClient,
    store: ListIdStore,
}

impl Context {
    /// Build the API client from `config`. Does not contact the provider.
    pub fn new(config: ContextConfig) -> Result<Self, CoreError> {
        let transport = TransportConfig {
            timeout: config.timeout,
            ..TransportConfig::default()
        };
        let client = CloudflareClient::new(
            config.api_url,
            &config.credentials.api_token,
            &transport,
        )?;
        let store = ListIdStore::new(&config.state_dir);

        Ok(Self {
            credentials: config.credentials,
            client,
            store,
        })
    }

    /// Assemble a context from pre-built parts.
    pub fn from_parts(credentials: Credentials, client: CloudflareClient, store: ListIdStore) -> Self {
        Self {
            credentials,
            client,
            store,
        }
    }

    pub fn client(&self) -> &CloudflareClient {
        &self.client
    }

    pub fn store(&self) -> &ListIdStore {
        &self.store
    }

    pub fn account(&self) -> &str {
        &self.credentials.account_id
    }

    pub fn zone(&self) -> &str {
        &self.credentials.zone_id
    }
}
