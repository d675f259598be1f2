//! Watch-channel theme source.
//!
//! The embedding UI owns a `ThemeController` and reports OS color-scheme
//! changes through it; the provider samples the `WatchThemeSource` side.

use tokio::sync::watch;

use connect_embed_core::traits::ThemeSource;
use connect_embed_core::types::ColorScheme;

/// Reading side of the color-scheme channel
#[derive(Clone)]
pub struct WatchThemeSource {
    rx: watch::Receiver<ColorScheme>,
}

/// Writing side of the color-scheme channel
#[derive(Clone)]
pub struct ThemeController {
    tx: watch::Sender<ColorScheme>,
}

impl WatchThemeSource {
    /// Create a linked source/controller pair
    #[must_use]
    pub fn channel(initial: ColorScheme) -> (Self, ThemeController) {
        let (tx, rx) = watch::channel(initial);
        (Self { rx }, ThemeController { tx })
    }
}

impl ThemeSource for WatchThemeSource {
    fn color_scheme(&self) -> ColorScheme {
        *self.rx.borrow()
    }
}

impl ThemeController {
    /// Publish a new scheme. Returns `false` if it did not change.
    pub fn set(&self, scheme: ColorScheme) -> bool {
        self.tx.send_if_modified(|current| {
            if *current == scheme {
                return false;
            }
            *current = scheme;
            true
        })
    }

    pub fn current(&self) -> ColorScheme {
        *self.tx.borrow()
    }

    /// Receiver notified on every change
    pub fn subscribe(&self) -> watch::Receiver<ColorScheme> {
        self.tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_follows_controller() {
        let (source, controller) = WatchThemeSource::channel(ColorScheme::Light);
        assert_eq!(source.color_scheme(), ColorScheme::Light);

        assert!(controller.set(ColorScheme::Dark));
        assert_eq!(source.color_scheme(), ColorScheme::Dark);
        assert_eq!(controller.current(), ColorScheme::Dark);
    }

    #[test]
    fn unchanged_scheme_is_not_republished() {
        let (_source, controller) = WatchThemeSource::channel(ColorScheme::Dark);
        let rx = controller.subscribe();
        assert!(!controller.set(ColorScheme::Dark));
        assert!(!rx.has_changed().unwrap());
    }
}
