//! Error types for the booking dialog.
//!
//! All errors implement the standard [`std::error::Error`] trait via [`thiserror::Error`].
//!
//! # Error Categories
//!
//! - **Upstream Errors** ([`BookingError::CustomerLoad`], [`BookingError::QuoteUnavailable`],
//!   ...): failures reported by the billing or pricing services, propagated out of
//!   [`PurchaseConfirmationViewModel::open`](crate::dialog::PurchaseConfirmationViewModel::open)
//! - **Flow Errors** ([`BookingError::Superseded`], [`BookingError::NoPendingDecision`]):
//!   misuse of the open/accept/cancel gate
//! - **Parse Errors** ([`BookingError::InvalidFeatureType`], ...): unknown wire codes
//! - **Configuration Errors** ([`BookingError::ConfigError`]): invalid TOML or settings
//!
//! # Examples
//!
//! ```
//! use booking_dialog::error::{BookingError, Result};
//!
//! fn parse_count(raw: &str) -> Result<i64> {
//!     raw.parse().map_err(|_| BookingError::ConfigError(format!("invalid count: {raw}")))
//! }
//!
//! assert!(parse_count("12").is_ok());
//! assert!(parse_count("twelve").is_err());
//! ```

use thiserror::Error;

/// Result type alias for booking dialog operations.
///
/// All fallible functions in this crate return this type.
pub type Result<T> = std::result::Result<T, BookingError>;

/// Errors that can occur while preparing or confirming a booking.
///
/// # Error Recovery
///
/// - **Upstream errors**: show a generic error to the user; the billing services own retries
/// - **Superseded**: nothing to do, a newer dialog flow has taken over
/// - **No pending decision**: the view called accept/cancel while the dialog was hidden; gate the
///   buttons on [`visible`](crate::dialog::PurchaseConfirmationViewModel::visible)
/// - **Parse and configuration errors**: fix the input data
#[must_use = "errors should be handled, propagated, or explicitly panicked"]
#[derive(Debug, Error)]
pub enum BookingError {
    /// No user is logged in, so there is no account to book for.
    #[error("No user is logged in")]
    NotLoggedIn,

    /// Loading the customer record failed.
    #[error("Failed to load customer: {0}")]
    CustomerLoad(String),

    /// Loading the customer info record failed.
    #[error("Failed to load customer info: {0}")]
    CustomerInfoLoad(String),

    /// Loading the accounting info failed.
    ///
    /// The accounting info carries the payment method shown in the dialog.
    #[error("Failed to load accounting info: {0}")]
    AccountingInfoLoad(String),

    /// The pricing service has no quote for the requested booking.
    #[error("No price quote available: {0}")]
    QuoteUnavailable(String),

    /// The pricing service failed while computing a quote.
    #[error("Price calculation failed: {0}")]
    PricingError(String),

    /// The flow was replaced by a newer call to `open`.
    ///
    /// The dialog only tracks one booking at a time. Opening it again while an earlier flow is
    /// loading or waiting for the user resolves the earlier flow with this error.
    #[error("Booking flow was superseded by a newer request")]
    Superseded,

    /// `accept` or `cancel` was called while no decision was pending.
    ///
    /// # Examples
    ///
    /// ```
    /// use booking_dialog::error::BookingError;
    ///
    /// let err = BookingError::NoPendingDecision;
    /// assert!(err.to_string().contains("No booking decision"));
    /// ```
    #[error("No booking decision is pending")]
    NoPendingDecision,

    /// Unknown feature type name.
    #[error("Invalid feature type: {0}")]
    InvalidFeatureType(String),

    /// Unknown payment interval code (expected "1" or "12").
    #[error("Invalid payment interval: {0}")]
    InvalidPaymentInterval(String),

    /// Unknown payment method code.
    #[error("Invalid payment method: {0}")]
    InvalidPaymentMethod(String),

    /// Configuration or fixture could not be loaded or failed validation.
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl BookingError {
    /// Returns true for failures reported by the external billing and pricing services.
    #[must_use]
    pub const fn is_upstream(&self) -> bool {
        matches!(
            self,
            Self::NotLoggedIn
                | Self::CustomerLoad(_)
                | Self::CustomerInfoLoad(_)
                | Self::AccountingInfoLoad(_)
                | Self::QuoteUnavailable(_)
                | Self::PricingError(_)
        )
    }
}
