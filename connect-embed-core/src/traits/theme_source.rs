//! Theme source abstraction Trait

use crate::types::ColorScheme;

/// Theme source Trait
///
/// Samples the UI color scheme (e.g. the OS dark-mode preference).
pub trait ThemeSource: Send + Sync {
    fn color_scheme(&self) -> ColorScheme;
}

/// Theme source that always reports the same scheme
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticThemeSource {
    scheme: ColorScheme,
}

impl StaticThemeSource {
    #[must_use]
    pub fn new(scheme: ColorScheme) -> Self {
        Self { scheme }
    }
}

impl ThemeSource for StaticThemeSource {
    fn color_scheme(&self) -> ColorScheme {
        self.scheme
    }
}
