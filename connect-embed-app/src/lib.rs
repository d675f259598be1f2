//! Platform-agnostic bootstrap for the embedded Connect widgets.
//!
//! Provides `EmbedAppState` (provider container), `EmbedAppStateBuilder`
//! (adapter injection) and the default adapters (`HttpSecretSource`,
//! `WatchThemeSource`) configured from `EmbedConfig`.

pub mod adapters;
pub mod config;

use std::sync::Arc;

use connect_embed_core::error::{CoreError, CoreResult};
use connect_embed_core::services::{AsyncInstanceProvider, ManagedMountPoint};
use connect_embed_core::traits::{SdkFactory, SecretSource, ThemeSource};
use tokio::task::JoinHandle;

use adapters::{HttpSecretSource, ThemeController, WatchThemeSource};
pub use config::EmbedConfig;

/// Platform-agnostic application state.
///
/// Holds the shared instance provider. Every frontend constructs this once
/// at startup via `EmbedAppStateBuilder` and hands out mount points from it.
pub struct EmbedAppState {
    /// Validated configuration
    pub config: EmbedConfig,
    /// Shared SDK instance provider
    pub provider: AsyncInstanceProvider,
    /// Present when the default watch theme source is in use
    pub theme_controller: Option<ThemeController>,
}

impl EmbedAppState {
    /// New mount point subscribed to the shared provider
    pub fn mount_point(&self) -> ManagedMountPoint {
        ManagedMountPoint::new(&self.provider)
    }

    /// Start the acquisition eagerly and wait for it to settle.
    pub async fn warm_up(&self) -> CoreResult<()> {
        match self.provider.wait_ready().await {
            Ok(_) => {
                log::info!(
                    "Embedded SDK warm-up complete after {} attempt(s)",
                    self.provider.stats().attempts
                );
                Ok(())
            }
            Err(e) => {
                if e.is_expected() {
                    log::warn!("Embedded SDK warm-up failed: {e}");
                } else {
                    log::error!("Embedded SDK warm-up failed: {e}");
                }
                Err(e)
            }
        }
    }

    /// Re-derive the appearance on every color-scheme change.
    ///
    /// Returns `None` when a custom theme source was injected or when called
    /// outside a Tokio runtime.
    pub fn spawn_theme_follower(&self) -> Option<JoinHandle<()>> {
        let controller = self.theme_controller.as_ref()?;
        let handle = tokio::runtime::Handle::try_current().ok()?;
        let mut rx = controller.subscribe();
        let provider = self.provider.clone();

        Some(handle.spawn(async move {
            while rx.changed().await.is_ok() {
                let scheme = *rx.borrow_and_update();
                log::debug!("Color scheme changed to {scheme}");
                provider.refresh_appearance();
            }
        }))
    }
}

/// Builder for constructing `EmbedAppState` with platform-specific adapters.
///
/// # Required
/// - `config`: publishable key, secret endpoint, acquisition tuning
/// - `sdk_factory`: the vendor SDK binding
///
/// # Optional
/// - `secret_source`: defaults to `HttpSecretSource` from `config.secret_endpoint`
/// - `theme_source`: defaults to a `WatchThemeSource` seeded from
///   `config.appearance.default_scheme`
pub struct EmbedAppStateBuilder {
    config: Option<EmbedConfig>,
    sdk_factory: Option<Arc<dyn SdkFactory>>,
    secret_source: Option<Arc<dyn SecretSource>>,
    theme_source: Option<Arc<dyn ThemeSource>>,
}

impl EmbedAppStateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: None,
            sdk_factory: None,
            secret_source: None,
            theme_source: None,
        }
    }

    #[must_use]
    pub fn config(mut self, config: EmbedConfig) -> Self {
        self.config = Some(config);
        self
    }

    #[must_use]
    pub fn sdk_factory(mut self, factory: Arc<dyn SdkFactory>) -> Self {
        self.sdk_factory = Some(factory);
        self
    }

    #[must_use]
    pub fn secret_source(mut self, source: Arc<dyn SecretSource>) -> Self {
        self.secret_source = Some(source);
        self
    }

    #[must_use]
    pub fn theme_source(mut self, source: Arc<dyn ThemeSource>) -> Self {
        self.theme_source = Some(source);
        self
    }

    /// Build the `EmbedAppState`.
    ///
    /// # Errors
    /// Returns `CoreError::ValidationError` if required adapters are missing
    /// or the configuration is invalid.
    pub fn build(self) -> CoreResult<EmbedAppState> {
        let config = self
            .config
            .ok_or_else(|| CoreError::ValidationError("config is required".to_string()))?;
        config.validate()?;
        let sdk_factory = self
            .sdk_factory
            .ok_or_else(|| CoreError::ValidationError("sdk_factory is required".to_string()))?;

        let secret_source: Arc<dyn SecretSource> = match self.secret_source {
            Some(source) => source,
            None => Arc::new(HttpSecretSource::new(config.secret_endpoint.clone())?),
        };

        let (theme_source, theme_controller) = match self.theme_source {
            Some(source) => (source, None),
            None => {
                let (source, controller) =
                    WatchThemeSource::channel(config.appearance.default_scheme);
                (Arc::new(source) as Arc<dyn ThemeSource>, Some(controller))
            }
        };

        let provider = AsyncInstanceProvider::new(
            secret_source,
            sdk_factory,
            theme_source,
            config.provider_options(),
        );

        Ok(EmbedAppState {
            config,
            provider,
            theme_controller,
        })
    }
}

impl Default for EmbedAppStateBuilder {
    fn default() -> Self {
        Self::new()
    }
}
