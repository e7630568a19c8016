//! Customer and billing account records.
//!
//! These are loaded in a chain: the logged-in [`Account`] points at its [`Customer`], the customer
//! at its [`CustomerInfo`], and the customer info at the [`AccountingInfo`] that carries the
//! payment method.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    error::{BookingError, Result},
    i18n::TextId,
};

/// Logged-in user account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// User identifier.
    pub user_id: String,
    /// Customer the user belongs to.
    pub customer_id: String,
}

/// Customer record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    /// Customer identifier.
    pub id: String,
    /// Reference to the customer info record.
    pub customer_info_id: String,
}

/// Customer info record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerInfo {
    /// Customer info identifier.
    pub id: String,
    /// Registered company name, if any.
    #[serde(default)]
    pub company: Option<String>,
    /// Reference to the accounting info record.
    pub accounting_info_id: String,
}

/// Billing details of a customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountingInfo {
    /// Accounting info identifier.
    pub id: String,
    /// How the customer pays.
    pub payment_method: PaymentMethod,
    /// Free-text description of the payment method (e.g. masked card number).
    #[serde(default)]
    pub payment_method_info: Option<String>,
}

impl AccountingInfo {
    /// Returns the payment method description as stored, unless it is missing or empty.
    #[must_use]
    pub fn payment_method_description(&self) -> Option<&str> {
        self.payment_method_info.as_deref().filter(|info| !info.is_empty())
    }
}

/// Payment method of an accounting info.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Pay by invoice.
    Invoice,
    /// Credit card.
    CreditCard,
    /// SEPA direct debit.
    Sepa,
    /// `PayPal`.
    #[serde(rename = "paypal")]
    PayPal,
    /// Prepaid account balance.
    AccountBalance,
}

impl PaymentMethod {
    /// Returns the billing service's numeric code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Invoice => "0",
            Self::CreditCard => "1",
            Self::Sepa => "2",
            Self::PayPal => "3",
            Self::AccountBalance => "4",
        }
    }

    /// Returns the localization key of the method's display name.
    #[must_use]
    pub const fn name_text_id(&self) -> TextId {
        match self {
            Self::Invoice => TextId::PaymentMethodInvoice,
            Self::CreditCard => TextId::PaymentMethodCreditCard,
            Self::Sepa => TextId::PaymentMethodSepa,
            Self::PayPal => TextId::PaymentMethodPayPal,
            Self::AccountBalance => TextId::PaymentMethodAccountBalance,
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for PaymentMethod {
    type Err = BookingError;

    /// Parses either the numeric code or the snake case name.
    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "0" | "invoice" => Ok(Self::Invoice),
            "1" | "credit_card" => Ok(Self::CreditCard),
            "2" | "sepa" => Ok(Self::Sepa),
            "3" | "paypal" => Ok(Self::PayPal),
            "4" | "account_balance" => Ok(Self::AccountBalance),
            other => Err(BookingError::InvalidPaymentMethod(other.to_owned())),
        }
    }
}
