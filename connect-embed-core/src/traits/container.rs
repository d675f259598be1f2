//! Container host abstraction Trait

use std::sync::{Arc, PoisonError, RwLock};

use super::WidgetHandle;
use crate::types::{ContainerId, WidgetId};

/// Shared handle to a container owned by the embedding UI
pub type ContainerHandle = Arc<dyn Container>;

/// Container Trait
///
/// A UI node supplied (and eventually destroyed) by the embedding layer.
/// The core attaches widgets to it but never creates containers.
pub trait Container: Send + Sync {
    /// Identity; a different id means the UI replaced the node
    fn id(&self) -> ContainerId;

    /// Remove every child
    fn clear(&self);

    /// Append `widget` as the last child
    ///
    /// Same re-entrancy rule as `EmbeddedInstance::create`: only
    /// `state`/`view` of the mounting mount point may be called from here.
    fn append(&self, widget: &WidgetHandle);

    /// Remove the child with `widget` id, if present
    fn remove(&self, widget: WidgetId);

    /// Ids of the current children, in order
    fn children(&self) -> Vec<WidgetId>;
}

/// In-memory container
///
/// Default implementation for headless hosts and tests. Identities are
/// random UUIDs unless given explicitly.
#[derive(Clone)]
pub struct InMemoryContainer {
    id: ContainerId,
    children: Arc<RwLock<Vec<WidgetHandle>>>,
}

impl InMemoryContainer {
    /// Create a new container with a random id
    #[must_use]
    pub fn new() -> Self {
        Self::with_id(ContainerId::new(uuid::Uuid::new_v4().to_string()))
    }

    #[must_use]
    pub fn with_id(id: ContainerId) -> Self {
        Self {
            id,
            children: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Wrap into a shareable handle
    #[must_use]
    pub fn handle(&self) -> ContainerHandle {
        Arc::new(self.clone())
    }

    /// Widget handles currently attached
    #[must_use]
    pub fn widgets(&self) -> Vec<WidgetHandle> {
        self.children
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Default for InMemoryContainer {
    fn default() -> Self {
        Self::new()
    }
}

impl Container for InMemoryContainer {
    fn id(&self) -> ContainerId {
        self.id.clone()
    }

    fn clear(&self) {
        self.children
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    fn append(&self, widget: &WidgetHandle) {
        self.children
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Arc::clone(widget));
    }

    fn remove(&self, widget: WidgetId) {
        self.children
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|w| w.id() != widget);
    }

    fn children(&self) -> Vec<WidgetId> {
        self.children
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|w| w.id())
            .collect()
    }
}
