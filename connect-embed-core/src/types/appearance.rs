//! Appearance derivation
//!
//! The vendor SDK is themed through a flat map of appearance variables. The
//! map is derived from the UI color scheme every time it is needed, so a
//! scheme change can be pushed to a live instance without re-acquiring it.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// UI color scheme
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ColorScheme {
    #[default]
    Light,
    Dark,
}

impl ColorScheme {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }
}

impl fmt::Display for ColorScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColorScheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            other => Err(format!("unknown color scheme: {other}")),
        }
    }
}

/// Appearance handed to the vendor SDK
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Appearance {
    /// Scheme the variables were derived from
    pub scheme: ColorScheme,
    /// Vendor appearance variables (`colorPrimary`, `colorBackground`, ...)
    pub variables: BTreeMap<String, String>,
}

impl Appearance {
    #[must_use]
    pub fn variable(&self, name: &str) -> Option<&str> {
        self.variables.get(name).map(String::as_str)
    }
}

/// Palettes and overrides used to derive an [`Appearance`]
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AppearanceConfig {
    /// Scheme assumed when no theme signal is available
    pub default_scheme: ColorScheme,
    /// Applied on top of the built-in light palette
    pub light_overrides: BTreeMap<String, String>,
    /// Applied on top of the built-in dark palette
    pub dark_overrides: BTreeMap<String, String>,
}

const LIGHT_PALETTE: &[(&str, &str)] = &[
    ("colorPrimary", "#635bff"),
    ("colorBackground", "#ffffff"),
    ("colorText", "#1a1b25"),
    ("colorSecondaryText", "#5c6370"),
    ("colorBorder", "#e3e8ee"),
    ("colorDanger", "#df1b41"),
    ("buttonSecondaryColorBackground", "#f6f8fa"),
    ("fontFamily", "Inter, system-ui, sans-serif"),
    ("borderRadius", "8px"),
];

const DARK_PALETTE: &[(&str, &str)] = &[
    ("colorPrimary", "#a5a1ff"),
    ("colorBackground", "#14151a"),
    ("colorText", "#f5f6f8"),
    ("colorSecondaryText", "#a3acb9"),
    ("colorBorder", "#2f3140"),
    ("colorDanger", "#ff6b81"),
    ("buttonSecondaryColorBackground", "#1f2029"),
    ("fontFamily", "Inter, system-ui, sans-serif"),
    ("borderRadius", "8px"),
];

impl AppearanceConfig {
    /// Built-in palette for `scheme` with the matching overrides applied.
    #[must_use]
    pub fn resolve(&self, scheme: ColorScheme) -> Appearance {
        let (palette, overrides) = match scheme {
            ColorScheme::Light => (LIGHT_PALETTE, &self.light_overrides),
            ColorScheme::Dark => (DARK_PALETTE, &self.dark_overrides),
        };

        let mut variables: BTreeMap<String, String> = palette
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        for (k, v) in overrides {
            variables.insert(k.clone(), v.clone());
        }

        Appearance { scheme, variables }
    }
}
