//! Acquisition state observer Trait

use crate::types::AcquisitionState;

/// Receives every published acquisition transition.
///
/// Called synchronously from the acquisition task after the new state is
/// visible through `AsyncInstanceProvider::status`. Implementations must not
/// block.
pub trait StateObserver: Send + Sync {
    fn on_transition(&self, state: &AcquisitionState);
}
