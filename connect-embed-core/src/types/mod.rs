//! Type definition module

mod acquisition;
mod appearance;
mod mount;
mod retry;
mod secret;
mod widget;

pub use acquisition::{AcquisitionState, AcquisitionStats};
pub use appearance::{Appearance, AppearanceConfig, ColorScheme};
pub use mount::{MountState, RenderView};
pub use retry::RetryPolicy;
pub use secret::{ClientSecret, SdkInitParams};
pub use widget::{ContainerId, WidgetId, WidgetKind};
