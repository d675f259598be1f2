//! Unified error type definition

use serde::Serialize;
use thiserror::Error;

/// Failure while fetching the client secret from the platform backend.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "code", content = "details")]
pub enum SecretFetchError {
    /// Connection-level failure (DNS, refused, reset, ...)
    #[error("Network error: {0}")]
    Network(String),

    /// The HTTP client gave up waiting for the endpoint
    #[error("Secret endpoint timed out: {0}")]
    Timeout(String),

    /// The backend rejected the dashboard session (HTTP 401/403)
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Transient server-side failure (HTTP 5xx, 429)
    #[error("Server error (HTTP {status}): {body}")]
    Server { status: u16, body: String },

    /// Any other non-success status
    #[error("Unexpected status (HTTP {status}): {body}")]
    Status { status: u16, body: String },

    /// Body could not be parsed or carried an empty secret
    #[error("Invalid secret response: {0}")]
    InvalidResponse(String),
}

impl SecretFetchError {
    /// Whether another attempt may succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Network(_) | Self::Timeout(_) | Self::Server { .. }
        )
    }
}

/// Rejection from the vendor SDK factory.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "code", content = "details")]
pub enum SdkInitError {
    /// Publishable key is malformed or unknown
    #[error("Invalid publishable key: {0}")]
    InvalidKey(String),

    /// Client secret is malformed or expired
    #[error("Invalid client secret: {0}")]
    InvalidSecret(String),

    /// Anything else reported by the vendor library
    #[error("Vendor SDK error: {0}")]
    Vendor(String),
}

/// Terminal failure of an acquisition, carried by `AcquisitionState::Failed`.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "code", content = "details")]
pub enum AcquisitionError {
    /// Step 1 failed
    #[error("Failed to fetch client secret: {0}")]
    SecretFetch(SecretFetchError),

    /// Step 2 failed
    #[error("Failed to initialize embedded SDK: {0}")]
    SdkInit(SdkInitError),

    /// A single attempt exceeded `ProviderOptions::attempt_timeout`
    #[error("Acquisition attempt timed out after {millis} ms")]
    Timeout { millis: u64 },

    /// `AsyncInstanceProvider::cancel` was called before completion
    #[error("Acquisition cancelled")]
    Cancelled,

    /// No Tokio runtime was available to drive the acquisition
    #[error("Runtime error: {0}")]
    Runtime(String),
}

impl AcquisitionError {
    /// Whether the retry policy may start another attempt.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::SecretFetch(e) => e.is_retryable(),
            Self::Timeout { .. } => true,
            Self::SdkInit(_) | Self::Cancelled | Self::Runtime(_) => false,
        }
    }

    /// Whether it is expected behavior (bad configuration, user cancelled, etc.), used for log classification.
    ///
    /// Level `warn` should be used when returning `true` and level `error` when returning `false`.
    /// **Please update this method simultaneously when new variants are added. **
    #[must_use]
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            Self::Cancelled
                | Self::SdkInit(SdkInitError::InvalidKey(_) | SdkInitError::InvalidSecret(_))
                | Self::SecretFetch(SecretFetchError::Unauthorized(_))
        )
    }
}

/// Core layer error type
#[derive(Error, Debug, Serialize)]
#[serde(tag = "code", content = "details")]
pub enum CoreError {
    /// Acquisition ended in `Failed`
    #[error("{0}")]
    Acquisition(#[from] AcquisitionError),

    /// The instance is not ready yet
    #[error("Instance not ready")]
    NotReady,

    /// Configuration could not be read or parsed
    #[error("Config error: {0}")]
    ConfigError(String),

    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl CoreError {
    /// Whether it is expected behavior, used for log classification.
    #[must_use]
    pub fn is_expected(&self) -> bool {
        match self {
            Self::Acquisition(e) => e.is_expected(),
            Self::NotReady | Self::ValidationError(_) => true,
            Self::ConfigError(_) => false,
        }
    }
}

/// Core layer Result type alias
pub type CoreResult<T> = std::result::Result<T, CoreError>;
