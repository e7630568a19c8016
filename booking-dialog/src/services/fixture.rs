//! In-memory billing backend loaded from TOML.
//!
//! [`StaticBilling`] implements every service trait from one fixture file. It backs the CLI and
//! the integration tests.
//!
//! # Fixture Format
//!
//! ```toml
//! [account]
//! user_id = "user-1"
//! customer_id = "cust-1"
//!
//! [customer]
//! id = "cust-1"
//! customer_info_id = "info-1"
//!
//! [customer_info]
//! id = "info-1"
//! accounting_info_id = "acc-1"
//!
//! [accounting_info]
//! id = "acc-1"
//! payment_method = "credit_card"
//! payment_method_info = "VISA **** 4242"
//!
//! [[quotes]]
//! feature_type = "storage"
//! count = 500
//! period_end_date = "2026-11-30T00:00:00Z"
//!
//! [quotes.current_price_next_period]
//! tax_included = true
//! payment_interval = "1"
//!
//! [quotes.future_price_next_period]
//! tax_included = true
//! payment_interval = "1"
//! items = [{ feature_type = "storage", count = 5, price = "10.00", single_type = false }]
//! ```

use std::path::Path;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use super::traits::{BillingDirectory, PricingService, SessionService};
use crate::{
    error::{BookingError, Result},
    model::{Account, AccountingInfo, Customer, CustomerInfo, FeatureType, PriceQuote},
};

/// Quote registered for one `(feature_type, count)` pair.
#[derive(Debug, Clone, Deserialize)]
pub struct QuoteFixture {
    /// Feature the quote applies to.
    pub feature_type: FeatureType,
    /// Requested count the quote applies to.
    pub count: i64,
    /// The quote itself.
    #[serde(flatten)]
    pub quote: PriceQuote,
}

/// Billing backend serving fixed records.
#[derive(Debug, Clone, Deserialize)]
pub struct StaticBilling {
    /// Logged-in account; `None` simulates a missing session.
    #[serde(default)]
    pub account: Option<Account>,
    /// Customer record.
    pub customer: Customer,
    /// Customer info record.
    pub customer_info: CustomerInfo,
    /// Accounting info record.
    pub accounting_info: AccountingInfo,
    /// Available quotes.
    #[serde(default)]
    pub quotes: Vec<QuoteFixture>,
}

impl StaticBilling {
    /// Parses and validates a fixture.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::ConfigError`] if the TOML is malformed or the record ids do not
    /// chain together.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let billing: Self = toml::from_str(toml_str)
            .map_err(|e| BookingError::ConfigError(format!("invalid billing fixture: {e}")))?;
        billing.validate()?;
        Ok(billing)
    }

    /// Reads a fixture file.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::ConfigError`] if the file cannot be read or is invalid.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            BookingError::ConfigError(format!("failed to read {}: {e}", path.display()))
        })?;
        Self::from_toml(&content)
    }

    /// Checks that the account, customer and accounting records reference each other.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::ConfigError`] on a broken reference or duplicate quote key.
    pub fn validate(&self) -> Result<()> {
        if let Some(account) = &self.account
            && account.customer_id != self.customer.id
        {
            return Err(BookingError::ConfigError(format!(
                "account references customer '{}' but fixture defines '{}'",
                account.customer_id, self.customer.id
            )));
        }
        if self.customer.customer_info_id != self.customer_info.id {
            return Err(BookingError::ConfigError(format!(
                "customer references customer info '{}' but fixture defines '{}'",
                self.customer.customer_info_id, self.customer_info.id
            )));
        }
        if self.customer_info.accounting_info_id != self.accounting_info.id {
            return Err(BookingError::ConfigError(format!(
                "customer info references accounting info '{}' but fixture defines '{}'",
                self.customer_info.accounting_info_id, self.accounting_info.id
            )));
        }
        for (index, fixture) in self.quotes.iter().enumerate() {
            let duplicate = self.quotes[..index]
                .iter()
                .any(|q| q.feature_type == fixture.feature_type && q.count == fixture.count);
            if duplicate {
                return Err(BookingError::ConfigError(format!(
                    "duplicate quote for {} x {}",
                    fixture.feature_type, fixture.count
                )));
            }
        }
        Ok(())
    }
}

impl SessionService for StaticBilling {
    fn logged_in_user(&self) -> Result<Account> {
        self.account.clone().ok_or(BookingError::NotLoggedIn)
    }
}

#[async_trait]
impl BillingDirectory for StaticBilling {
    async fn load_customer(&self, account: &Account) -> Result<Customer> {
        if account.customer_id != self.customer.id {
            return Err(BookingError::CustomerLoad(format!(
                "unknown customer '{}'",
                account.customer_id
            )));
        }
        debug!(customer_id = %self.customer.id, "serving customer");
        Ok(self.customer.clone())
    }

    async fn load_customer_info(&self, customer: &Customer) -> Result<CustomerInfo> {
        if customer.customer_info_id != self.customer_info.id {
            return Err(BookingError::CustomerInfoLoad(format!(
                "unknown customer info '{}'",
                customer.customer_info_id
            )));
        }
        Ok(self.customer_info.clone())
    }

    async fn load_accounting_info(&self, customer_info: &CustomerInfo) -> Result<AccountingInfo> {
        if customer_info.accounting_info_id != self.accounting_info.id {
            return Err(BookingError::AccountingInfoLoad(format!(
                "unknown accounting info '{}'",
                customer_info.accounting_info_id
            )));
        }
        Ok(self.accounting_info.clone())
    }
}

#[async_trait]
impl PricingService for StaticBilling {
    async fn quote(&self, feature_type: FeatureType, count: i64) -> Result<PriceQuote> {
        self.quotes
            .iter()
            .find(|q| q.feature_type == feature_type && q.count == count)
            .map(|q| q.quote.clone())
            .ok_or_else(|| BookingError::QuoteUnavailable(format!("{feature_type} x {count}")))
    }
}
