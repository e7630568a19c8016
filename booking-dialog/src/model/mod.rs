//! Domain records exchanged with the billing and pricing services.

pub mod account;
pub mod pricing;


use serde::{Deserialize, Serialize};

pub use account::{Account, AccountingInfo, Customer, CustomerInfo, PaymentMethod};
pub use pricing::{
    FeatureType, PaymentInterval, PriceItem, PriceQuote, PriceSpec, price_for_feature, price_item,
};

/// Booking the user asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingRequest {
    /// Feature being booked.
    pub feature_type: FeatureType,
    /// Users to add (positive) or remove (negative), or the total package amount for storage and
    /// alias packages.
    pub count: i64,
    /// Amount included for free with storage and alias packages.
    pub free_amount: u32,
}

impl BookingRequest {
    /// Creates a new booking request.
    #[must_use]
    pub const fn new(feature_type: FeatureType, count: i64, free_amount: u32) -> Self {
        Self { feature_type, count, free_amount }
    }

    /// Amount shown to the user for tiered features: never below the free amount.
    #[must_use]
    pub fn visible_amount(&self) -> i64 {
        self.count.max(i64::from(self.free_amount))
    }
}
