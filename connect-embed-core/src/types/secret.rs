//! Client secret and SDK initialization parameters

use std::fmt;

use super::Appearance;

/// Short-lived secret returned by the account-session endpoint.
///
/// `Debug` is redacted; use [`ClientSecret::expose`] to read the value.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientSecret(String);

impl ClientSecret {
    #[must_use]
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for ClientSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ClientSecret(***)")
    }
}

/// Arguments of `SdkFactory::initialize`
#[derive(Debug, Clone)]
pub struct SdkInitParams {
    pub publishable_key: String,
    pub client_secret: ClientSecret,
    pub appearance: Appearance,
}
