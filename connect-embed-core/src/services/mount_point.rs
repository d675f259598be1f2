//! Managed mount point
//!
//! Keeps one container bound to one vendor widget. The binding follows the
//! provider: it completes as soon as the instance is ready and is recreated
//! whenever the container or the widget kind changes.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use super::{AsyncInstanceProvider, ObserverId};
use crate::traits::{ContainerHandle, InstanceHandle, StateObserver, WidgetHandle};
use crate::types::{AcquisitionState, ContainerId, MountState, RenderView, WidgetKind};

/// Mount point for a single vendor widget
///
/// Dropping the mount point detaches its widget and unsubscribes it from the
/// provider.
pub struct ManagedMountPoint {
    inner: Arc<MountInner>,
    observer_id: ObserverId,
}

struct MountInner {
    provider: AsyncInstanceProvider,
    slot: Mutex<BindingSlot>,
    /// Copy of `slot.state`; readable while the slot is locked, so vendor and
    /// container callbacks may call `state()` and `view()`
    state: Mutex<MountState>,
}

struct BindingSlot {
    state: MountState,
    container: Option<ContainerHandle>,
    kind: Option<WidgetKind>,
    mounted: Option<MountedWidget>,
}

struct MountedWidget {
    container: ContainerHandle,
    widget: WidgetHandle,
}

/// Forwards provider transitions; outlived mount points are ignored
struct MountObserver {
    inner: Weak<MountInner>,
}

impl StateObserver for MountObserver {
    fn on_transition(&self, state: &AcquisitionState) {
        if let Some(inner) = self.inner.upgrade() {
            inner.on_transition(state);
        }
    }
}

impl ManagedMountPoint {
    /// Create a mount point and subscribe it to `provider`
    #[must_use]
    pub fn new(provider: &AsyncInstanceProvider) -> Self {
        let inner = Arc::new(MountInner {
            provider: provider.clone(),
            slot: Mutex::new(BindingSlot {
                state: MountState::Unbound,
                container: None,
                kind: None,
                mounted: None,
            }),
            state: Mutex::new(MountState::Unbound),
        });
        let observer_id = provider.subscribe(Arc::new(MountObserver {
            inner: Arc::downgrade(&inner),
        }));

        Self { inner, observer_id }
    }

    /// Bind `container` to a widget of `kind`.
    ///
    /// Mounts immediately when the provider is ready, otherwise remembers the
    /// binding until it is. Repeated calls leave exactly one widget attached.
    pub fn bind(&self, container: ContainerHandle, kind: WidgetKind) -> MountState {
        let mut slot = self.inner.lock_slot();
        slot.container = Some(container);
        slot.kind = Some(kind);
        slot.sync(&self.inner.provider.status());
        self.inner.store_state(slot.state)
    }

    /// Switch the widget kind, remounting on the bound container
    pub fn set_kind(&self, kind: WidgetKind) -> MountState {
        let mut slot = self.inner.lock_slot();
        if slot.kind == Some(kind) && slot.state == MountState::Mounted {
            return slot.state;
        }
        slot.kind = Some(kind);
        if slot.container.is_some() {
            slot.sync(&self.inner.provider.status());
        }
        self.inner.store_state(slot.state)
    }

    /// Detach the widget and forget the container (container destroyed).
    ///
    /// Returns whether a widget was detached.
    pub fn unbind(&self) -> bool {
        let mut slot = self.inner.lock_slot();
        let detached = slot.detach();
        slot.container = None;
        if slot.state != MountState::Failed {
            slot.state = MountState::Unbound;
        }
        self.inner.store_state(slot.state);
        detached
    }

    pub fn state(&self) -> MountState {
        self.inner.load_state()
    }

    pub fn kind(&self) -> Option<WidgetKind> {
        self.inner.lock_slot().kind
    }

    /// Id of the bound container
    pub fn container_id(&self) -> Option<ContainerId> {
        self.inner
            .lock_slot()
            .container
            .as_ref()
            .map(|container| container.id())
    }

    /// Widget currently attached, if any
    pub fn mounted_widget(&self) -> Option<WidgetHandle> {
        self.inner
            .lock_slot()
            .mounted
            .as_ref()
            .map(|mounted| Arc::clone(&mounted.widget))
    }

    /// What the embedding UI should display
    pub fn view(&self) -> RenderView {
        let status = self.inner.provider.status();
        let state = self.inner.load_state();
        match status {
            AcquisitionState::Failed(e) => RenderView::Error(e.to_string()),
            AcquisitionState::Ready(_) if state == MountState::Mounted => RenderView::Content,
            _ => RenderView::Loading,
        }
    }
}

impl Drop for ManagedMountPoint {
    fn drop(&mut self) {
        self.unbind();
        self.inner.provider.unsubscribe(self.observer_id);
    }
}

impl MountInner {
    fn lock_slot(&self) -> MutexGuard<'_, BindingSlot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn load_state(&self) -> MountState {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn store_state(&self, state: MountState) -> MountState {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = state;
        state
    }

    fn on_transition(&self, state: &AcquisitionState) {
        let mut slot = self.lock_slot();
        if slot.state == MountState::AwaitingProvider {
            slot.sync(state);
            self.store_state(slot.state);
        }
    }
}

impl BindingSlot {
    /// Bring the binding in line with the provider status
    fn sync(&mut self, status: &AcquisitionState) {
        if self.state == MountState::Failed {
            return;
        }
        match status {
            AcquisitionState::Ready(instance) => self.mount(instance),
            AcquisitionState::Failed(e) => {
                log::debug!("Mount point cannot attach, provider failed: {e}");
                self.detach();
                self.state = MountState::Failed;
            }
            AcquisitionState::Idle | AcquisitionState::Loading => {
                self.state = MountState::AwaitingProvider;
            }
        }
    }

    /// Clear the container, then attach a freshly created widget
    fn mount(&mut self, instance: &InstanceHandle) {
        let (Some(container), Some(kind)) = (self.container.clone(), self.kind) else {
            return;
        };

        self.detach();
        container.clear();
        let widget = instance.create(kind);
        container.append(&widget);
        log::debug!(
            "Mounted {kind} {} into container {}",
            widget.id(),
            container.id()
        );

        self.mounted = Some(MountedWidget { container, widget });
        self.state = MountState::Mounted;
    }

    fn detach(&mut self) -> bool {
        let Some(previous) = self.mounted.take() else {
            return false;
        };
        previous.container.remove(previous.widget.id());
        log::debug!(
            "Detached {} from container {}",
            previous.widget.id(),
            previous.container.id()
        );
        true
    }
}
