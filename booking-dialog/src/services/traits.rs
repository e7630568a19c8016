//! Service traits the dialog depends on.
//!
//! The dialog owns no billing data. It loads everything through these traits, which the host
//! application implements on top of its session and API clients.

use async_trait::async_trait;

use crate::{
    error::Result,
    model::{Account, AccountingInfo, Customer, CustomerInfo, FeatureType, PriceQuote},
};

/// Access to the logged-in session.
pub trait SessionService: Send + Sync {
    /// Returns the account of the logged-in user.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::NotLoggedIn`](crate::BookingError::NotLoggedIn) without a session.
    fn logged_in_user(&self) -> Result<Account>;
}

/// Loads the customer records behind an account.
///
/// Each step needs the record returned by the previous one, so callers await them in order.
#[async_trait]
pub trait BillingDirectory: Send + Sync {
    /// Loads the customer of an account.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::CustomerLoad`](crate::BookingError::CustomerLoad) on failure.
    async fn load_customer(&self, account: &Account) -> Result<Customer>;

    /// Loads the customer info of a customer.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::CustomerInfoLoad`](crate::BookingError::CustomerInfoLoad) on
    /// failure.
    async fn load_customer_info(&self, customer: &Customer) -> Result<CustomerInfo>;

    /// Loads the accounting info of a customer info.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::AccountingInfoLoad`](crate::BookingError::AccountingInfoLoad) on
    /// failure.
    async fn load_accounting_info(&self, customer_info: &CustomerInfo) -> Result<AccountingInfo>;
}

/// Computes price quotes for bookings.
#[async_trait]
pub trait PricingService: Send + Sync {
    /// Returns the price quote for booking `count` of `feature_type`.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::QuoteUnavailable`](crate::BookingError::QuoteUnavailable) or
    /// [`BookingError::PricingError`](crate::BookingError::PricingError) on failure.
    async fn quote(&self, feature_type: FeatureType, count: i64) -> Result<PriceQuote>;
}
