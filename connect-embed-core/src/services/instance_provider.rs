//! Embedded SDK instance provider
//!
//! Performs the single-flight acquisition of the shared SDK instance
//! (client secret → vendor factory) and broadcasts its status to every
//! consumer.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use chrono::Utc;
use tokio::sync::{watch, Notify};

use crate::error::{AcquisitionError, CoreError, CoreResult, SecretFetchError};
use crate::traits::{InstanceHandle, SdkFactory, SecretSource, StateObserver, ThemeSource};
use crate::types::{
    AcquisitionState, AcquisitionStats, Appearance, AppearanceConfig, RetryPolicy, SdkInitParams,
};

/// Handle returned by [`AsyncInstanceProvider::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

/// Acquisition options
#[derive(Debug, Clone)]
pub struct ProviderOptions {
    /// Publishable key passed to the SDK factory
    pub publishable_key: String,
    /// Retry policy for retryable failures
    pub retry: RetryPolicy,
    /// Limit for a single attempt (secret fetch + initialization)
    pub attempt_timeout: Option<Duration>,
    /// Palettes used to derive the appearance
    pub appearance: AppearanceConfig,
}

impl ProviderOptions {
    #[must_use]
    pub fn new(publishable_key: impl Into<String>) -> Self {
        Self {
            publishable_key: publishable_key.into(),
            retry: RetryPolicy::default(),
            attempt_timeout: None,
            appearance: AppearanceConfig::default(),
        }
    }

    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    #[must_use]
    pub fn with_attempt_timeout(mut self, timeout: Duration) -> Self {
        self.attempt_timeout = Some(timeout);
        self
    }

    #[must_use]
    pub fn with_appearance(mut self, appearance: AppearanceConfig) -> Self {
        self.appearance = appearance;
        self
    }
}

/// Single-flight provider of the embedded SDK instance
///
/// Cheap to clone; every clone shares the same acquisition. The acquisition
/// starts lazily on the first subscription and settles exactly once.
#[derive(Clone)]
pub struct AsyncInstanceProvider {
    inner: Arc<ProviderInner>,
}

struct ProviderInner {
    secret_source: Arc<dyn SecretSource>,
    sdk_factory: Arc<dyn SdkFactory>,
    theme_source: Arc<dyn ThemeSource>,
    options: ProviderOptions,
    state: watch::Sender<AcquisitionState>,
    started: AtomicBool,
    cancel: Notify,
    /// Set under the state lock; turns the next terminal state into `Cancelled`
    cancel_requested: AtomicBool,
    observers: Mutex<Vec<(ObserverId, Arc<dyn StateObserver>)>>,
    next_observer_id: AtomicU64,
    stats: Mutex<AcquisitionStats>,
}

impl AsyncInstanceProvider {
    /// Create a provider in the `Idle` state
    #[must_use]
    pub fn new(
        secret_source: Arc<dyn SecretSource>,
        sdk_factory: Arc<dyn SdkFactory>,
        theme_source: Arc<dyn ThemeSource>,
        options: ProviderOptions,
    ) -> Self {
        let (state, _) = watch::channel(AcquisitionState::Idle);
        Self {
            inner: Arc::new(ProviderInner {
                secret_source,
                sdk_factory,
                theme_source,
                options,
                state,
                started: AtomicBool::new(false),
                cancel: Notify::new(),
                cancel_requested: AtomicBool::new(false),
                observers: Mutex::new(Vec::new()),
                next_observer_id: AtomicU64::new(1),
                stats: Mutex::new(AcquisitionStats::default()),
            }),
        }
    }

    /// Current acquisition state (no side effects)
    pub fn status(&self) -> AcquisitionState {
        self.inner.state.borrow().clone()
    }

    /// Register `observer` for transitions; starts the acquisition on first use
    pub fn subscribe(&self, observer: Arc<dyn StateObserver>) -> ObserverId {
        let id = ObserverId(self.inner.next_observer_id.fetch_add(1, Ordering::Relaxed));
        self.inner.lock_observers().push((id, observer));
        self.ensure_started();
        id
    }

    /// Remove an observer. Returns `false` if it was not registered.
    pub fn unsubscribe(&self, id: ObserverId) -> bool {
        let mut observers = self.inner.lock_observers();
        let before = observers.len();
        observers.retain(|(observer_id, _)| *observer_id != id);
        observers.len() != before
    }

    pub fn observer_count(&self) -> usize {
        self.inner.lock_observers().len()
    }

    /// Watch channel of the state; counts as a subscription
    pub fn watch(&self) -> watch::Receiver<AcquisitionState> {
        let rx = self.inner.state.subscribe();
        self.ensure_started();
        rx
    }

    /// Subscribe and wait for the terminal state
    pub async fn wait_ready(&self) -> CoreResult<InstanceHandle> {
        let mut rx = self.watch();
        let settled = rx
            .wait_for(AcquisitionState::is_terminal)
            .await
            .map(|state| (*state).clone());

        match settled {
            Ok(AcquisitionState::Ready(instance)) => Ok(instance),
            Ok(AcquisitionState::Failed(e)) => Err(CoreError::Acquisition(e)),
            Ok(_) | Err(_) => Err(CoreError::NotReady),
        }
    }

    /// Appearance derived from the current theme sample
    pub fn appearance(&self) -> Appearance {
        self.inner.current_appearance()
    }

    /// Re-derive the appearance and push it to a ready instance.
    ///
    /// Never re-acquires. Returns `false` when no instance is ready yet.
    pub fn refresh_appearance(&self) -> bool {
        let appearance = self.appearance();
        match self.status() {
            AcquisitionState::Ready(instance) => {
                log::debug!("Applying {} appearance to embedded SDK", appearance.scheme);
                instance.update_appearance(&appearance);
                true
            }
            _ => false,
        }
    }

    /// Cancel the acquisition if it has not settled yet.
    ///
    /// Returns `true` only if the acquisition will settle as
    /// `Failed(Cancelled)`, even when the instance resolves concurrently.
    /// A provider cancelled before any subscription fails on its first one.
    pub fn cancel(&self) -> bool {
        let mut requested = false;
        self.inner.state.send_if_modified(|current| {
            if !current.is_terminal() {
                self.inner.cancel_requested.store(true, Ordering::SeqCst);
                requested = true;
            }
            false
        });
        if !requested {
            return false;
        }
        log::info!("Cancelling embedded SDK acquisition");
        self.inner.cancel.notify_one();
        true
    }

    pub fn stats(&self) -> AcquisitionStats {
        self.inner
            .stats
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn options(&self) -> &ProviderOptions {
        &self.inner.options
    }

    fn ensure_started(&self) {
        if self.inner.started.swap(true, Ordering::AcqRel) {
            return;
        }

        self.inner.update_stats(|stats| stats.started_at = Some(Utc::now()));
        log::info!("Starting embedded SDK acquisition");
        self.inner.publish(&AcquisitionState::Loading);

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let inner = Arc::clone(&self.inner);
                handle.spawn(inner.run());
            }
            Err(e) => {
                log::error!("No Tokio runtime available for embedded SDK acquisition: {e}");
                self.inner.update_stats(|stats| stats.settled_at = Some(Utc::now()));
                self.inner
                    .publish(&AcquisitionState::Failed(AcquisitionError::Runtime(e.to_string())));
            }
        }
    }
}

impl ProviderInner {
    fn lock_observers(&self) -> std::sync::MutexGuard<'_, Vec<(ObserverId, Arc<dyn StateObserver>)>> {
        self.observers.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn update_stats(&self, f: impl FnOnce(&mut AcquisitionStats)) {
        f(&mut self.stats.lock().unwrap_or_else(PoisonError::into_inner));
    }

    fn status_is_ready(&self) -> bool {
        self.state.borrow().is_ready()
    }

    fn current_appearance(&self) -> Appearance {
        self.options
            .appearance
            .resolve(self.theme_source.color_scheme())
    }

    /// Publish `next` unless a terminal state was already published.
    ///
    /// A pending cancellation replaces any terminal `next` with
    /// `Failed(Cancelled)`.
    fn publish(&self, next: &AcquisitionState) -> bool {
        let mut published = None;
        self.state.send_if_modified(|current| {
            if current.is_terminal() {
                return false;
            }
            let cancelled = self.cancel_requested.load(Ordering::SeqCst);
            let effective = if next.is_terminal() && cancelled {
                AcquisitionState::Failed(AcquisitionError::Cancelled)
            } else {
                next.clone()
            };
            *current = effective.clone();
            published = Some(effective);
            true
        });

        let Some(published) = published else {
            log::warn!(
                "Ignoring {} transition after terminal acquisition state",
                next.label()
            );
            return false;
        };
        if published.is_terminal() {
            log::debug!("Acquisition settled as {}", published.label());
        }

        let observers: Vec<Arc<dyn StateObserver>> = self
            .lock_observers()
            .iter()
            .map(|(_, observer)| Arc::clone(observer))
            .collect();
        for observer in observers {
            observer.on_transition(&published);
        }
        true
    }

    async fn run(self: Arc<Self>) {
        let outcome = tokio::select! {
            biased;
            () = self.cancel.notified() => Err(AcquisitionError::Cancelled),
            result = self.acquire_with_retry() => result,
        };

        self.update_stats(|stats| stats.settled_at = Some(Utc::now()));

        match outcome {
            Ok((instance, used)) => {
                if !self.publish(&AcquisitionState::Ready(Arc::clone(&instance))) {
                    return;
                }
                if !self.status_is_ready() {
                    log::warn!("Embedded SDK instance resolved after cancellation");
                    return;
                }
                log::info!("Embedded SDK instance ready");
                // Sampled after publishing: a theme change before this point
                // found the provider still loading and was not applied.
                let latest = self.current_appearance();
                if latest != used {
                    log::debug!("Applying {} appearance to embedded SDK", latest.scheme);
                    instance.update_appearance(&latest);
                }
            }
            Err(e) => {
                if e.is_expected() {
                    log::warn!("Embedded SDK acquisition failed: {e}");
                } else {
                    log::error!("Embedded SDK acquisition failed: {e}");
                }
                self.publish(&AcquisitionState::Failed(e));
            }
        }
    }

    async fn acquire_with_retry(&self) -> Result<(InstanceHandle, Appearance), AcquisitionError> {
        let policy = self.options.retry;
        let max_attempts = policy.attempts();
        let mut attempt = 0;

        loop {
            self.update_stats(|stats| stats.attempts += 1);
            match self.attempt_once().await {
                Ok(acquired) => return Ok(acquired),
                Err(e) if attempt + 1 < max_attempts && e.is_retryable() => {
                    let delay = policy.delay_after(attempt);
                    log::warn!(
                        "Acquisition failed (attempt {}/{}), retrying in {:.1}s: {}",
                        attempt + 1,
                        max_attempts,
                        delay.as_secs_f32(),
                        e
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn attempt_once(&self) -> Result<(InstanceHandle, Appearance), AcquisitionError> {
        match self.options.attempt_timeout {
            Some(limit) => tokio::time::timeout(limit, self.fetch_and_initialize())
                .await
                .map_err(|_| AcquisitionError::Timeout {
                    millis: u64::try_from(limit.as_millis()).unwrap_or(u64::MAX),
                })?,
            None => self.fetch_and_initialize().await,
        }
    }

    async fn fetch_and_initialize(&self) -> Result<(InstanceHandle, Appearance), AcquisitionError> {
        // 1. Client secret
        let client_secret = self
            .secret_source
            .fetch_secret()
            .await
            .map_err(AcquisitionError::SecretFetch)?;
        if client_secret.is_empty() {
            return Err(AcquisitionError::SecretFetch(
                SecretFetchError::InvalidResponse("empty client secret".to_string()),
            ));
        }

        // 2. Vendor instance
        let appearance = self.current_appearance();
        log::debug!(
            "Initializing embedded SDK with {} appearance",
            appearance.scheme
        );
        let params = SdkInitParams {
            publishable_key: self.options.publishable_key.clone(),
            client_secret,
            appearance: appearance.clone(),
        };
        let instance = self
            .sdk_factory
            .initialize(params)
            .await
            .map_err(AcquisitionError::SdkInit)?;

        Ok((instance, appearance))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SdkInitError;
    use crate::test_utils::{
        create_test_provider, MockSdkFactory, MockSecretSource, MockThemeSource,
        RecordingObserver,
    };
    use crate::types::ColorScheme;

    #[tokio::test]
    async fn first_subscribe_acquires_with_fetched_secret() {
        let secret = Arc::new(MockSecretSource::new("secret_123"));
        let factory = Arc::new(MockSdkFactory::new("instance_A"));
        let provider = create_test_provider(
            &secret,
            &factory,
            Arc::new(MockThemeSource::new(ColorScheme::Light)),
            ProviderOptions::new("pk_test_X"),
        );

        assert!(matches!(provider.status(), AcquisitionState::Idle));
        provider.subscribe(Arc::new(RecordingObserver::new()));
        assert!(matches!(provider.status(), AcquisitionState::Loading));

        let instance = provider.wait_ready().await.unwrap();
        assert_eq!(instance.description(), "instance_A");
        assert!(provider.status().is_ready());

        assert_eq!(secret.calls(), 1);
        assert_eq!(factory.calls(), 1);
        let params = factory.last_params().unwrap();
        assert_eq!(params.client_secret.expose(), "secret_123");
        assert_eq!(params.publishable_key, "pk_test_X");
        assert_eq!(params.appearance.scheme, ColorScheme::Light);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_subscriptions_collapse_into_one_acquisition() {
        let (secret, gate) = MockSecretSource::gated("secret_123");
        let secret = Arc::new(secret);
        let factory = Arc::new(MockSdkFactory::new("instance_A"));
        let provider = create_test_provider(
            &secret,
            &factory,
            Arc::new(MockThemeSource::new(ColorScheme::Light)),
            ProviderOptions::new("pk_test_X"),
        );

        let mut tasks = Vec::new();
        for i in 0..16 {
            let provider = provider.clone();
            tasks.push(tokio::spawn(async move {
                if i % 2 == 0 {
                    provider.subscribe(Arc::new(RecordingObserver::new()));
                }
                provider.wait_ready().await.map(|instance| instance.description())
            }));
        }

        tokio::task::yield_now().await;
        gate.notify_one();

        for task in futures::future::join_all(tasks).await {
            assert_eq!(task.unwrap().unwrap(), "instance_A");
        }
        assert_eq!(secret.calls(), 1);
        assert_eq!(factory.calls(), 1);
        assert_eq!(provider.stats().attempts, 1);
    }

    #[tokio::test]
    async fn factory_rejection_is_terminal() {
        let secret = Arc::new(MockSecretSource::new("secret_123"));
        let factory = Arc::new(MockSdkFactory::failing(SdkInitError::InvalidKey(
            "pk_test_X".to_string(),
        )));
        let provider = create_test_provider(
            &secret,
            &factory,
            Arc::new(MockThemeSource::new(ColorScheme::Light)),
            ProviderOptions::new("pk_test_X"),
        );

        let result = provider.wait_ready().await;
        assert!(matches!(
            result,
            Err(CoreError::Acquisition(AcquisitionError::SdkInit(
                SdkInitError::InvalidKey(_)
            )))
        ));

        provider.subscribe(Arc::new(RecordingObserver::new()));
        let _ = provider.wait_ready().await;

        assert!(matches!(
            provider.status(),
            AcquisitionState::Failed(AcquisitionError::SdkInit(SdkInitError::InvalidKey(_)))
        ));
        assert_eq!(secret.calls(), 1);
        assert_eq!(factory.calls(), 1);
    }

    #[tokio::test]
    async fn status_is_monotonic() {
        let provider = create_test_provider(
            &Arc::new(MockSecretSource::new("secret_123")),
            &Arc::new(MockSdkFactory::new("instance_A")),
            Arc::new(MockThemeSource::new(ColorScheme::Light)),
            ProviderOptions::new("pk_test_X"),
        );
        let observer = Arc::new(RecordingObserver::new());
        provider.subscribe(observer.clone());
        provider.wait_ready().await.unwrap();

        assert!(!provider.cancel());
        assert!(!provider.inner.publish(&AcquisitionState::Loading));
        assert!(!provider
            .inner
            .publish(&AcquisitionState::Failed(AcquisitionError::Cancelled)));

        assert!(provider.status().is_ready());
        assert_eq!(observer.labels(), vec!["loading", "ready"]);
    }

    #[tokio::test]
    async fn retryable_errors_are_retried() {
        let secret = Arc::new(MockSecretSource::new("secret_123"));
        secret.push_error(SecretFetchError::Network("connection reset".to_string()));
        secret.push_error(SecretFetchError::Server {
            status: 503,
            body: "unavailable".to_string(),
        });
        let factory = Arc::new(MockSdkFactory::new("instance_A"));
        let provider = create_test_provider(
            &secret,
            &factory,
            Arc::new(MockThemeSource::new(ColorScheme::Light)),
            ProviderOptions::new("pk_test_X").with_retry(RetryPolicy {
                max_attempts: 3,
                base_delay_ms: 1,
                max_delay_ms: 5,
            }),
        );

        provider.wait_ready().await.unwrap();
        assert_eq!(secret.calls(), 3);
        assert_eq!(factory.calls(), 1);
        assert_eq!(provider.stats().attempts, 3);
    }

    #[tokio::test]
    async fn retries_are_bounded() {
        let secret = Arc::new(MockSecretSource::new("secret_123"));
        for _ in 0..5 {
            secret.push_error(SecretFetchError::Network("down".to_string()));
        }
        let provider = create_test_provider(
            &secret,
            &Arc::new(MockSdkFactory::new("instance_A")),
            Arc::new(MockThemeSource::new(ColorScheme::Light)),
            ProviderOptions::new("pk_test_X").with_retry(RetryPolicy {
                max_attempts: 2,
                base_delay_ms: 1,
                max_delay_ms: 5,
            }),
        );

        assert!(provider.wait_ready().await.is_err());
        assert_eq!(secret.calls(), 2);
    }

    #[tokio::test]
    async fn unauthorized_is_not_retried() {
        let secret = Arc::new(MockSecretSource::new("secret_123"));
        secret.push_error(SecretFetchError::Unauthorized("session expired".to_string()));
        let factory = Arc::new(MockSdkFactory::new("instance_A"));
        let provider = create_test_provider(
            &secret,
            &factory,
            Arc::new(MockThemeSource::new(ColorScheme::Light)),
            ProviderOptions::new("pk_test_X").with_retry(RetryPolicy::with_max_attempts(3)),
        );

        let result = provider.wait_ready().await;
        assert!(matches!(
            result,
            Err(CoreError::Acquisition(AcquisitionError::SecretFetch(
                SecretFetchError::Unauthorized(_)
            )))
        ));
        assert_eq!(secret.calls(), 1);
        assert_eq!(factory.calls(), 0);
    }

    #[tokio::test]
    async fn empty_secret_fails() {
        let provider = create_test_provider(
            &Arc::new(MockSecretSource::new("")),
            &Arc::new(MockSdkFactory::new("instance_A")),
            Arc::new(MockThemeSource::new(ColorScheme::Light)),
            ProviderOptions::new("pk_test_X"),
        );

        assert!(matches!(
            provider.wait_ready().await,
            Err(CoreError::Acquisition(AcquisitionError::SecretFetch(
                SecretFetchError::InvalidResponse(_)
            )))
        ));
    }

    #[tokio::test]
    async fn attempt_timeout_fails_acquisition() {
        let (secret, _gate) = MockSecretSource::gated("secret_123");
        let provider = create_test_provider(
            &Arc::new(secret),
            &Arc::new(MockSdkFactory::new("instance_A")),
            Arc::new(MockThemeSource::new(ColorScheme::Light)),
            ProviderOptions::new("pk_test_X").with_attempt_timeout(Duration::from_millis(20)),
        );

        let result = provider.wait_ready().await;
        assert!(matches!(
            result,
            Err(CoreError::Acquisition(AcquisitionError::Timeout { millis: 20 }))
        ));
    }

    #[tokio::test]
    async fn cancel_mid_fetch() {
        let (secret, _gate) = MockSecretSource::gated("secret_123");
        let secret = Arc::new(secret);
        let factory = Arc::new(MockSdkFactory::new("instance_A"));
        let provider = create_test_provider(
            &secret,
            &factory,
            Arc::new(MockThemeSource::new(ColorScheme::Light)),
            ProviderOptions::new("pk_test_X"),
        );

        let _rx = provider.watch();
        tokio::task::yield_now().await;
        assert!(provider.cancel());

        assert!(matches!(
            provider.wait_ready().await,
            Err(CoreError::Acquisition(AcquisitionError::Cancelled))
        ));
        assert_eq!(factory.calls(), 0);
        assert!(!provider.cancel());
    }

    #[tokio::test]
    async fn cancel_before_start_fails_first_subscription() {
        let secret = Arc::new(MockSecretSource::new("secret_123"));
        let provider = create_test_provider(
            &secret,
            &Arc::new(MockSdkFactory::new("instance_A")),
            Arc::new(MockThemeSource::new(ColorScheme::Light)),
            ProviderOptions::new("pk_test_X"),
        );

        assert!(provider.cancel());
        assert!(matches!(provider.status(), AcquisitionState::Idle));
        assert!(matches!(
            provider.wait_ready().await,
            Err(CoreError::Acquisition(AcquisitionError::Cancelled))
        ));
        assert_eq!(secret.calls(), 0);
    }

    #[tokio::test]
    async fn refresh_appearance_does_not_reacquire() {
        let theme = Arc::new(MockThemeSource::new(ColorScheme::Light));
        let factory = Arc::new(MockSdkFactory::new("instance_A"));
        let provider = create_test_provider(
            &Arc::new(MockSecretSource::new("secret_123")),
            &factory,
            theme.clone(),
            ProviderOptions::new("pk_test_X"),
        );

        assert!(!provider.refresh_appearance());
        provider.wait_ready().await.unwrap();

        theme.set(ColorScheme::Dark);
        assert_eq!(provider.appearance().scheme, ColorScheme::Dark);
        assert!(provider.refresh_appearance());

        let applied = factory.instance().appearances();
        assert_eq!(applied.last().map(|a| a.scheme), Some(ColorScheme::Dark));
        assert_eq!(factory.calls(), 1);
    }

    #[tokio::test]
    async fn theme_change_while_initializing_is_applied_once_ready() {
        let theme = Arc::new(MockThemeSource::new(ColorScheme::Light));
        let (factory, gate) = MockSdkFactory::gated("instance_A");
        let factory = Arc::new(factory);
        let provider = create_test_provider(
            &Arc::new(MockSecretSource::new("secret_123")),
            &factory,
            theme.clone(),
            ProviderOptions::new("pk_test_X"),
        );

        let _rx = provider.watch();
        while factory.calls() == 0 {
            tokio::task::yield_now().await;
        }

        theme.set(ColorScheme::Dark);
        assert!(!provider.refresh_appearance());
        gate.notify_one();
        provider.wait_ready().await.unwrap();

        let params = factory.last_params().unwrap();
        assert_eq!(params.appearance.scheme, ColorScheme::Light);
        let applied = factory.instance().appearances();
        assert_eq!(applied.last().map(|a| a.scheme), Some(ColorScheme::Dark));
        assert_eq!(factory.calls(), 1);
    }

    /// Flips the theme when the instance becomes ready, without refreshing
    struct DarkenOnReady {
        theme: Arc<MockThemeSource>,
    }

    impl StateObserver for DarkenOnReady {
        fn on_transition(&self, state: &AcquisitionState) {
            if state.is_ready() {
                self.theme.set(ColorScheme::Dark);
            }
        }
    }

    #[tokio::test]
    async fn theme_change_during_ready_transition_is_applied() {
        let theme = Arc::new(MockThemeSource::new(ColorScheme::Light));
        let factory = Arc::new(MockSdkFactory::new("instance_A"));
        let provider = create_test_provider(
            &Arc::new(MockSecretSource::new("secret_123")),
            &factory,
            theme.clone(),
            ProviderOptions::new("pk_test_X"),
        );

        provider.subscribe(Arc::new(DarkenOnReady {
            theme: theme.clone(),
        }));
        provider.wait_ready().await.unwrap();

        let applied = factory.instance().appearances();
        assert_eq!(applied.len(), 1);
        assert_eq!(applied[0].scheme, ColorScheme::Dark);
    }

    #[test]
    fn accepted_cancel_wins_over_concurrent_resolution() {
        let factory = Arc::new(MockSdkFactory::new("instance_A"));
        let provider = create_test_provider(
            &Arc::new(MockSecretSource::new("secret_123")),
            &factory,
            Arc::new(MockThemeSource::new(ColorScheme::Light)),
            ProviderOptions::new("pk_test_X"),
        );
        let observer = Arc::new(RecordingObserver::new());
        provider.inner.lock_observers().push((ObserverId(99), observer.clone()));

        assert!(provider.inner.publish(&AcquisitionState::Loading));
        assert!(provider.cancel());

        // The instance resolved just as the cancel arrived.
        let instance: InstanceHandle = factory.instance();
        assert!(provider.inner.publish(&AcquisitionState::Ready(instance)));

        assert!(matches!(
            provider.status(),
            AcquisitionState::Failed(AcquisitionError::Cancelled)
        ));
        assert_eq!(observer.labels(), vec!["loading", "failed"]);
        assert!(!provider.cancel());
    }

    #[tokio::test]
    async fn unsubscribed_observer_misses_later_transitions() {
        let provider = create_test_provider(
            &Arc::new(MockSecretSource::new("secret_123")),
            &Arc::new(MockSdkFactory::new("instance_A")),
            Arc::new(MockThemeSource::new(ColorScheme::Light)),
            ProviderOptions::new("pk_test_X"),
        );
        let observer = Arc::new(RecordingObserver::new());
        let id = provider.subscribe(observer.clone());
        assert!(provider.unsubscribe(id));
        assert!(!provider.unsubscribe(id));

        provider.wait_ready().await.unwrap();
        assert_eq!(observer.labels(), vec!["loading"]);
        assert_eq!(provider.observer_count(), 0);
    }

    #[test]
    fn missing_runtime_is_reported_as_failure() {
        let secret = Arc::new(MockSecretSource::new("secret_123"));
        let provider = create_test_provider(
            &secret,
            &Arc::new(MockSdkFactory::new("instance_A")),
            Arc::new(MockThemeSource::new(ColorScheme::Light)),
            ProviderOptions::new("pk_test_X"),
        );

        provider.subscribe(Arc::new(RecordingObserver::new()));
        assert!(matches!(
            provider.status(),
            AcquisitionState::Failed(AcquisitionError::Runtime(_))
        ));
        assert_eq!(secret.calls(), 0);
    }
}
