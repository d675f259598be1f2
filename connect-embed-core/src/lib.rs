//! Connect Embed Core Library
//!
//! Loads the embedded Connect SDK for the organizer dashboard and keeps the
//! vendor-rendered finance widgets mounted, including:
//! - Single-flight SDK instance acquisition (`AsyncInstanceProvider`)
//! - Container/widget lifecycle binding (`ManagedMountPoint`)
//! - Appearance derivation from the UI color scheme
//!
//! The secret endpoint, the vendor SDK, the theme signal and the UI containers
//! are all abstracted through traits, so the library carries no UI framework
//! and no network stack of its own.

pub mod error;
pub mod services;
pub mod traits;
pub mod types;

#[cfg(test)]
mod test_utils;

// Re-export common types
pub use error::{AcquisitionError, CoreError, CoreResult, SdkInitError, SecretFetchError};
pub use services::{AsyncInstanceProvider, ManagedMountPoint, ObserverId, ProviderOptions};
pub use traits::{
    Container, ContainerHandle, EmbeddedInstance, InMemoryContainer, InstanceHandle, SdkFactory,
    SecretSource, StateObserver, StaticThemeSource, ThemeSource, Widget, WidgetHandle,
};
pub use types::{
    AcquisitionState, AcquisitionStats, Appearance, AppearanceConfig, ClientSecret, ColorScheme,
    ContainerId, MountState, RenderView, RetryPolicy, SdkInitParams, WidgetId, WidgetKind,
};
