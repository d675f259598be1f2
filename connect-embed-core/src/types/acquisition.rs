//! Acquisition state types

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::AcquisitionError;
use crate::traits::InstanceHandle;

/// Status of the single SDK instance acquisition.
///
/// Moves `Idle → Loading → Ready | Failed` and never leaves a terminal state.
#[derive(Clone)]
pub enum AcquisitionState {
    /// Nobody has subscribed yet
    Idle,
    /// Secret fetch or SDK initialization in flight
    Loading,
    /// Instance is available to every consumer
    Ready(InstanceHandle),
    /// Acquisition failed; no automatic recovery
    Failed(AcquisitionError),
}

impl AcquisitionState {
    /// `Ready` or `Failed`.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Ready(_) | Self::Failed(_))
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    #[must_use]
    pub fn instance(&self) -> Option<&InstanceHandle> {
        match self {
            Self::Ready(instance) => Some(instance),
            _ => None,
        }
    }

    #[must_use]
    pub fn error(&self) -> Option<&AcquisitionError> {
        match self {
            Self::Failed(e) => Some(e),
            _ => None,
        }
    }

    /// Short lowercase name, used in logs.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Loading => "loading",
            Self::Ready(_) => "ready",
            Self::Failed(_) => "failed",
        }
    }

    /// Whether both states hold the same instance (or are the same non-ready variant).
    #[must_use]
    pub fn same_as(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Idle, Self::Idle) | (Self::Loading, Self::Loading) => true,
            (Self::Ready(a), Self::Ready(b)) => Arc::ptr_eq(a, b),
            (Self::Failed(a), Self::Failed(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Debug for AcquisitionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => f.write_str("Idle"),
            Self::Loading => f.write_str("Loading"),
            Self::Ready(instance) => f
                .debug_tuple("Ready")
                .field(&instance.description())
                .finish(),
            Self::Failed(e) => f.debug_tuple("Failed").field(e).finish(),
        }
    }
}

/// Acquisition diagnostics
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct AcquisitionStats {
    /// Number of attempts started (1 unless the retry policy kicked in)
    pub attempts: u32,
    /// When the `Idle → Loading` transition happened
    #[serde(rename = "startedAt", skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    /// When the terminal state was published
    #[serde(rename = "settledAt", skip_serializing_if = "Option::is_none")]
    pub settled_at: Option<DateTime<Utc>>,
}
