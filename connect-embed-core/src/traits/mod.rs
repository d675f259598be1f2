//! Collaborator abstraction trait definition

mod container;
mod instance;
mod observer;
mod sdk_factory;
mod secret_source;
mod theme_source;

pub use container::{Container, ContainerHandle, InMemoryContainer};
pub use instance::{EmbeddedInstance, InstanceHandle, Widget, WidgetHandle};
pub use observer::StateObserver;
pub use sdk_factory::SdkFactory;
pub use secret_source::SecretSource;
pub use theme_source::{StaticThemeSource, ThemeSource};
