//! Vendor instance and widget Traits

use std::sync::Arc;

use crate::types::{Appearance, WidgetId, WidgetKind};

/// Shared handle to the initialized SDK instance
pub type InstanceHandle = Arc<dyn EmbeddedInstance>;

/// Handle to a vendor-rendered widget
pub type WidgetHandle = Arc<dyn Widget>;

/// Initialized vendor SDK instance
///
/// Owned by the `AsyncInstanceProvider`; consumers only ever see shared
/// references and never dispose it.
pub trait EmbeddedInstance: Send + Sync {
    /// Create a new, unattached widget of `kind`
    ///
    /// Called with the mount point's binding locked: it may read
    /// `ManagedMountPoint::state`/`view` but must not bind, unbind or change
    /// the kind of that mount point.
    fn create(&self, kind: WidgetKind) -> WidgetHandle;

    /// Apply a new appearance to the instance and every widget it created
    fn update_appearance(&self, appearance: &Appearance);

    /// Human-readable description used in `Debug` output
    fn description(&self) -> String {
        "EmbeddedInstance".to_string()
    }
}

/// Vendor-rendered widget
pub trait Widget: Send + Sync {
    fn id(&self) -> WidgetId;

    fn kind(&self) -> WidgetKind;
}
