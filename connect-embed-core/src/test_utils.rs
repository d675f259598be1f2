//! Test helper module
//!
//! Provides mock collaborators and convenient test factory methods.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;

use crate::error::{SdkInitError, SecretFetchError};
use crate::services::{AsyncInstanceProvider, ProviderOptions};
use crate::traits::{
    EmbeddedInstance, InstanceHandle, SdkFactory, SecretSource, StateObserver, ThemeSource,
    Widget, WidgetHandle,
};
use crate::types::{
    AcquisitionState, Appearance, ClientSecret, ColorScheme, SdkInitParams, WidgetId, WidgetKind,
};

// ===== MockSecretSource =====

pub struct MockSecretSource {
    secret: String,
    calls: AtomicUsize,
    /// Errors returned (in order) before falling back to `secret`
    errors: Mutex<VecDeque<SecretFetchError>>,
    /// If Some, every fetch waits for a permit
    gate: Option<Arc<Notify>>,
}

impl MockSecretSource {
    pub fn new(secret: &str) -> Self {
        Self {
            secret: secret.to_string(),
            calls: AtomicUsize::new(0),
            errors: Mutex::new(VecDeque::new()),
            gate: None,
        }
    }

    /// Source whose fetch blocks until the returned `Notify` is signalled
    pub fn gated(secret: &str) -> (Self, Arc<Notify>) {
        let gate = Arc::new(Notify::new());
        let mut source = Self::new(secret);
        source.gate = Some(Arc::clone(&gate));
        (source, gate)
    }

    pub fn push_error(&self, err: SecretFetchError) {
        self.errors.lock().unwrap().push_back(err);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SecretSource for MockSecretSource {
    async fn fetch_secret(&self) -> Result<ClientSecret, SecretFetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        let next_error = self.errors.lock().unwrap().pop_front();
        match next_error {
            Some(err) => Err(err),
            None => Ok(ClientSecret::new(self.secret.clone())),
        }
    }
}

// ===== MockSdkFactory =====

pub struct MockSdkFactory {
    instance: Arc<MockInstance>,
    error: Option<SdkInitError>,
    calls: AtomicUsize,
    params: Mutex<Vec<SdkInitParams>>,
    /// If Some, every initialization waits for a permit
    gate: Option<Arc<Notify>>,
}

impl MockSdkFactory {
    pub fn new(instance_name: &str) -> Self {
        Self {
            instance: Arc::new(MockInstance::new(instance_name)),
            error: None,
            calls: AtomicUsize::new(0),
            params: Mutex::new(Vec::new()),
            gate: None,
        }
    }

    /// Factory whose initialization blocks until the returned `Notify` is signalled
    pub fn gated(instance_name: &str) -> (Self, Arc<Notify>) {
        let gate = Arc::new(Notify::new());
        let mut factory = Self::new(instance_name);
        factory.gate = Some(Arc::clone(&gate));
        (factory, gate)
    }

    pub fn failing(err: SdkInitError) -> Self {
        let mut factory = Self::new("unused");
        factory.error = Some(err);
        factory
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_params(&self) -> Option<SdkInitParams> {
        self.params.lock().unwrap().last().cloned()
    }

    pub fn instance(&self) -> Arc<MockInstance> {
        Arc::clone(&self.instance)
    }
}

#[async_trait]
impl SdkFactory for MockSdkFactory {
    async fn initialize(&self, params: SdkInitParams) -> Result<InstanceHandle, SdkInitError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.params.lock().unwrap().push(params);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        if let Some(ref err) = self.error {
            return Err(err.clone());
        }
        let instance: InstanceHandle = self.instance.clone();
        Ok(instance)
    }
}

// ===== MockInstance / MockWidget =====

pub struct MockInstance {
    name: String,
    next_widget_id: AtomicU64,
    created: Mutex<Vec<WidgetKind>>,
    appearances: Mutex<Vec<Appearance>>,
}

impl MockInstance {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            next_widget_id: AtomicU64::new(1),
            created: Mutex::new(Vec::new()),
            appearances: Mutex::new(Vec::new()),
        }
    }

    pub fn created(&self) -> Vec<WidgetKind> {
        self.created.lock().unwrap().clone()
    }

    pub fn appearances(&self) -> Vec<Appearance> {
        self.appearances.lock().unwrap().clone()
    }
}

impl EmbeddedInstance for MockInstance {
    fn create(&self, kind: WidgetKind) -> WidgetHandle {
        let id = WidgetId(self.next_widget_id.fetch_add(1, Ordering::SeqCst));
        self.created.lock().unwrap().push(kind);
        Arc::new(MockWidget::new(id, kind))
    }

    fn update_appearance(&self, appearance: &Appearance) {
        self.appearances.lock().unwrap().push(appearance.clone());
    }

    fn description(&self) -> String {
        self.name.clone()
    }
}

pub struct MockWidget {
    id: WidgetId,
    kind: WidgetKind,
}

impl MockWidget {
    pub fn new(id: WidgetId, kind: WidgetKind) -> Self {
        Self { id, kind }
    }
}

impl Widget for MockWidget {
    fn id(&self) -> WidgetId {
        self.id
    }

    fn kind(&self) -> WidgetKind {
        self.kind
    }
}

// ===== MockThemeSource =====

pub struct MockThemeSource {
    scheme: Mutex<ColorScheme>,
}

impl MockThemeSource {
    pub fn new(scheme: ColorScheme) -> Self {
        Self {
            scheme: Mutex::new(scheme),
        }
    }

    pub fn set(&self, scheme: ColorScheme) {
        *self.scheme.lock().unwrap() = scheme;
    }
}

impl ThemeSource for MockThemeSource {
    fn color_scheme(&self) -> ColorScheme {
        *self.scheme.lock().unwrap()
    }
}

// ===== RecordingObserver =====

pub struct RecordingObserver {
    labels: Mutex<Vec<&'static str>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self {
            labels: Mutex::new(Vec::new()),
        }
    }

    pub fn labels(&self) -> Vec<&'static str> {
        self.labels.lock().unwrap().clone()
    }
}

impl StateObserver for RecordingObserver {
    fn on_transition(&self, state: &AcquisitionState) {
        self.labels.lock().unwrap().push(state.label());
    }
}

// ===== Factories =====

/// Provider wired to the given mocks
pub fn create_test_provider(
    secret_source: &Arc<MockSecretSource>,
    sdk_factory: &Arc<MockSdkFactory>,
    theme_source: Arc<MockThemeSource>,
    options: ProviderOptions,
) -> AsyncInstanceProvider {
    AsyncInstanceProvider::new(
        secret_source.clone(),
        sdk_factory.clone(),
        theme_source,
        options,
    )
}
