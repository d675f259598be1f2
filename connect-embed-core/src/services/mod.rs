//! Business logic service layer

mod instance_provider;
mod mount_point;

pub use instance_provider::{AsyncInstanceProvider, ObserverId, ProviderOptions};
pub use mount_point::ManagedMountPoint;
