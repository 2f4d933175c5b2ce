// ── Core error types ──
//
// Only setup can fail with an `Err`. Provider and transport failures during
// an action are logged at their origin instead.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Cannot set up the Cloudflare client: {message}")]
    ClientSetup { message: String },
}

impl From<cfban_api::Error> for CoreError {
    fn from(err: cfban_api::Error) -> Self {
        CoreError::ClientSetup {
            message: err.to_string(),
        }
    }
}
