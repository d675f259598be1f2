//! Mount point state types

use serde::{Deserialize, Serialize};

/// Lifecycle state of a `ManagedMountPoint`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum MountState {
    /// No container bound
    Unbound,
    /// Container bound, waiting for the provider to become ready
    AwaitingProvider,
    /// Widget attached to the bound container
    Mounted,
    /// Provider failed; terminal
    Failed,
}

/// What the embedding UI should show in place of the widget.
///
/// Exactly one of these is visible at a time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", content = "message", rename_all = "camelCase")]
pub enum RenderView {
    Loading,
    Error(String),
    Content,
}
