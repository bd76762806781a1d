//! Order status enum.

use serde::{Deserialize, Serialize};

/// Order lifecycle status as reported by the backend.
///
/// The backend has emitted these as lowercase, capitalized, and
/// SCREAMING_SNAKE strings across versions, so parsing is case-insensitive.
/// Unknown or missing statuses default to [`OrderStatus::Processing`] so the
/// view layer always has something sensible to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum OrderStatus {
    Pending,
    #[default]
    Processing,
    Confirmed,
    Shipped,
    Delivered,
    Cancelled,
    Refunded,
}

impl OrderStatus {
    /// Parse a status string leniently.
    ///
    /// Returns `None` for unrecognized values; the normalizer turns that
    /// into the default rather than failing.
    #[must_use]
    pub fn parse_lenient(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "processing" | "in_progress" | "in progress" => Some(Self::Processing),
            "confirmed" => Some(Self::Confirmed),
            "shipped" | "in_transit" | "in transit" => Some(Self::Shipped),
            "delivered" | "completed" | "complete" => Some(Self::Delivered),
            "cancelled" | "canceled" => Some(Self::Cancelled),
            "refunded" => Some(Self::Refunded),
            _ => None,
        }
    }

    /// Display label used by every UI surface (e.g. `"Processing"`).
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Processing => "Processing",
            Self::Confirmed => "Confirmed",
            Self::Shipped => "Shipped",
            Self::Delivered => "Delivered",
            Self::Cancelled => "Cancelled",
            Self::Refunded => "Refunded",
        }
    }
}

impl core::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.label())
    }
}
