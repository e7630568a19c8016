//! Price quote data returned by the pricing service.
//!
//! A [`PriceQuote`] compares what the customer pays for the next period today with what they
//! would pay after the booking. Both sides are [`PriceSpec`]s made of per-feature line items.

use std::{cmp::Ordering, fmt, str::FromStr};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{BookingError, Result};

/// Category of billable item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureType {
    /// User accounts (seats).
    Users,
    /// Storage capacity in GB.
    Storage,
    /// Email alias addresses.
    EmailAliases,
}

impl FeatureType {
    /// All feature types, in wire order.
    pub const ALL: [Self; 3] = [Self::Users, Self::Storage, Self::EmailAliases];

    /// Returns the snake case name used in configuration and fixtures.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Users => "users",
            Self::Storage => "storage",
            Self::EmailAliases => "email_aliases",
        }
    }
}

impl fmt::Display for FeatureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeatureType {
    type Err = BookingError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "users" => Ok(Self::Users),
            "storage" => Ok(Self::Storage),
            "email_aliases" | "aliases" => Ok(Self::EmailAliases),
            other => Err(BookingError::InvalidFeatureType(other.to_owned())),
        }
    }
}

/// Billing interval of a price.
///
/// Serialized as the billing service's interval codes: `"1"` (monthly) and `"12"` (yearly).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum PaymentInterval {
    /// Billed every month.
    Monthly,
    /// Billed every twelve months.
    Yearly,
}

impl PaymentInterval {
    /// Returns the wire code for this interval.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Monthly => "1",
            Self::Yearly => "12",
        }
    }

    /// Parses a wire code.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::InvalidPaymentInterval`] for anything but `"1"` or `"12"`.
    pub fn from_code(code: &str) -> Result<Self> {
        match code.trim() {
            "1" => Ok(Self::Monthly),
            "12" => Ok(Self::Yearly),
            other => Err(BookingError::InvalidPaymentInterval(other.to_owned())),
        }
    }

    /// Returns true for yearly billing.
    #[must_use]
    pub const fn is_yearly(&self) -> bool {
        matches!(self, Self::Yearly)
    }
}

impl TryFrom<String> for PaymentInterval {
    type Error = BookingError;

    fn try_from(code: String) -> Result<Self> {
        Self::from_code(&code)
    }
}

impl From<PaymentInterval> for String {
    fn from(interval: PaymentInterval) -> Self {
        interval.code().to_owned()
    }
}

/// Single line item of a [`PriceSpec`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceItem {
    /// Feature this item bills for.
    pub feature_type: FeatureType,
    /// Booked amount, or package count for tiered features.
    pub count: u64,
    /// Price of this item per payment interval.
    pub price: Decimal,
    /// Whether the feature is billed at one flat price instead of per package.
    pub single_type: bool,
}

/// Price of a customer's bookings for one billing period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceSpec {
    /// Whether prices include taxes (gross) or not (net).
    pub tax_included: bool,
    /// Billing interval.
    pub payment_interval: PaymentInterval,
    /// Line items, at most one per feature type.
    #[serde(default)]
    pub items: Vec<PriceItem>,
}

impl PriceSpec {
    /// Returns the line item for a feature type, if any.
    #[must_use]
    pub fn item(&self, feature_type: FeatureType) -> Option<&PriceItem> {
        self.items.iter().find(|item| item.feature_type == feature_type)
    }

    /// Returns the price billed for a feature type, or zero if it has no line item.
    #[must_use]
    pub fn price_for(&self, feature_type: FeatureType) -> Decimal {
        self.item(feature_type).map_or(Decimal::ZERO, |item| item.price)
    }

    /// Returns whether a feature type is billed at a single flat price.
    ///
    /// Without a line item only [`FeatureType::Users`] counts as single-price: a first user
    /// booking has no item yet because its current price is zero.
    #[must_use]
    pub fn is_single_price_type(&self, feature_type: FeatureType) -> bool {
        self.item(feature_type)
            .map_or(feature_type == FeatureType::Users, |item| item.single_type)
    }
}

/// Result of a pricing calculation for a requested booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceQuote {
    /// What the next period costs without the booking.
    pub current_price_next_period: PriceSpec,
    /// What the next period costs with the booking.
    pub future_price_next_period: PriceSpec,
    /// Amount charged immediately for the rest of the current period, if any.
    #[serde(default)]
    pub current_period_added_price: Option<Decimal>,
    /// End of the current billing period.
    pub period_end_date: DateTime<Utc>,
}

impl PriceQuote {
    /// Compares the future price of a feature against its current price.
    ///
    /// [`Ordering::Greater`] means the booking costs more, [`Ordering::Less`] means it saves money.
    #[must_use]
    pub fn compare(&self, feature_type: FeatureType) -> Ordering {
        let current = self.current_price_next_period.price_for(feature_type);
        let future = self.future_price_next_period.price_for(feature_type);
        future.cmp(&current)
    }

    /// Returns the price difference (future minus current) for a feature.
    #[must_use]
    pub fn price_delta(&self, feature_type: FeatureType) -> Decimal {
        self.future_price_next_period.price_for(feature_type)
            - self.current_price_next_period.price_for(feature_type)
    }

    /// Returns the immediate charge for the current period when it is positive.
    #[must_use]
    pub fn positive_added_price(&self) -> Option<Decimal> {
        self.current_period_added_price.filter(|price| *price > Decimal::ZERO)
    }
}

/// Looks up the line item for a feature type.
#[must_use]
pub fn price_item(spec: &PriceSpec, feature_type: FeatureType) -> Option<&PriceItem> {
    spec.item(feature_type)
}

/// Returns the price contribution of a feature type, zero if absent.
#[must_use]
pub fn price_for_feature(spec: &PriceSpec, feature_type: FeatureType) -> Decimal {
    spec.price_for(feature_type)
}
