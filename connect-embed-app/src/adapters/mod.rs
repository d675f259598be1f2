//! Platform adapters for the embedded Connect collaborators.

mod http_secret_source;
mod watch_theme_source;

pub use http_secret_source::HttpSecretSource;
pub use watch_theme_source::{ThemeController, WatchThemeSource};
