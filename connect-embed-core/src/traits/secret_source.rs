//! Secret source abstraction Trait

use async_trait::async_trait;

use crate::error::SecretFetchError;
use crate::types::ClientSecret;

/// Secret source Trait
///
/// Returns the short-lived client secret that authorizes the embedded SDK
/// for the current dashboard session. Called at most once per attempt.
///
/// Platform implementations:
/// - `HttpSecretSource` (connect-embed-app): POST to the account-session endpoint
#[async_trait]
pub trait SecretSource: Send + Sync {
    /// Fetch a fresh client secret
    async fn fetch_secret(&self) -> Result<ClientSecret, SecretFetchError>;
}
