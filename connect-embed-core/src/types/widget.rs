//! Widget and container identity types

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Vendor sub-widget selected by a mount point
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum WidgetKind {
    AccountOnboarding,
    AccountManagement,
    NotificationBanner,
    Balances,
    Payments,
    PaymentDetails,
    Payouts,
    PayoutsList,
    Disputes,
    Documents,
    Reports,
    TaxSettings,
}

impl WidgetKind {
    /// All kinds, in dashboard menu order
    pub const ALL: [Self; 12] = [
        Self::AccountOnboarding,
        Self::AccountManagement,
        Self::NotificationBanner,
        Self::Balances,
        Self::Payments,
        Self::PaymentDetails,
        Self::Payouts,
        Self::PayoutsList,
        Self::Disputes,
        Self::Documents,
        Self::Reports,
        Self::TaxSettings,
    ];

    /// Tag understood by the vendor SDK's `create` call.
    #[must_use]
    pub fn tag(self) -> &'static str {
        match self {
            Self::AccountOnboarding => "account-onboarding",
            Self::AccountManagement => "account-management",
            Self::NotificationBanner => "notification-banner",
            Self::Balances => "balances",
            Self::Payments => "payments",
            Self::PaymentDetails => "payment-details",
            Self::Payouts => "payouts",
            Self::PayoutsList => "payouts-list",
            Self::Disputes => "disputes",
            Self::Documents => "documents",
            Self::Reports => "reports",
            Self::TaxSettings => "tax-settings",
        }
    }
}

impl fmt::Display for WidgetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for WidgetKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.tag() == s)
            .ok_or_else(|| format!("unknown widget kind: {s}"))
    }
}

/// Identity of a vendor widget
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WidgetId(pub u64);

impl fmt::Display for WidgetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "widget#{}", self.0)
    }
}

/// Identity of a container handle; a new identity means the UI replaced the node
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ContainerId(pub String);

impl ContainerId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
