//! SDK factory abstraction Trait

use async_trait::async_trait;

use super::InstanceHandle;
use crate::error::SdkInitError;
use crate::types::SdkInitParams;

/// Vendor SDK factory Trait
///
/// Wraps the vendor's initialization entry point. Implementations that are
/// synchronous with an internal readiness gate should resolve only once the
/// instance can create widgets.
#[async_trait]
pub trait SdkFactory: Send + Sync {
    /// Initialize an SDK instance
    ///
    /// # Arguments
    /// * `params` - publishable key, client secret and appearance
    async fn initialize(&self, params: SdkInitParams) -> Result<InstanceHandle, SdkInitError>;
}
