//! Template catalog keyed by [`TextId`].

use std::{collections::HashMap, fmt, str::FromStr};

use super::Translator;
use crate::error::{BookingError, Result};

macro_rules! text_ids {
    ($($(#[$doc:meta])* $variant:ident => $key:literal, $english:literal;)+) => {
        /// Localization key of a dialog text.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum TextId {
            $($(#[$doc])* $variant,)+
        }

        impl TextId {
            /// Every known key.
            pub const ALL: &'static [Self] = &[$(Self::$variant,)+];

            /// Returns the string key used in translation tables.
            #[must_use]
            pub const fn key(&self) -> &'static str {
                match self {
                    $(Self::$variant => $key,)+
                }
            }

            const fn english(&self) -> &'static str {
                match self {
                    $(Self::$variant => $english,)+
                }
            }
        }
    };
}

text_ids! {
    /// Placeholder shown until the quote is loaded.
    Loading => "loading_msg", "Loading ...";
    /// Unit label for single-price user bookings.
    BookingItemUsers => "bookingItemUsers_label", "Users";
    /// Removing users; `{1}` is the number of accounts.
    CancelUserAccounts => "cancelUserAccounts_label", "Cancel {1} user account(s)";
    /// Storage package prefix.
    StorageCapacity => "storageCapacity_label", "Storage capacity";
    /// Upgrading a user package; `{1}` is the package count.
    PackageUpgradeUserAccounts => "packageUpgradeUserAccounts_label",
        "Upgrade to package with {1} user accounts";
    /// Downgrading a user package; `{1}` is the package count.
    PackageDowngradeUserAccounts => "packageDowngradeUserAccounts_label",
        "Downgrade to package with {1} user accounts";
    /// Unit label for alias packages.
    MailAddressAliases => "mailAddressAliases_label", "Email aliases";
    /// Yearly subscription.
    Yearly => "yearly_label", "Yearly";
    /// Monthly subscription.
    Monthly => "monthly_label", "Monthly";
    /// Suffix of the subscription text.
    AutomaticRenewal => "automaticRenewal_label", "automatic renewal";
    /// End of the current period; `{1}` is the date.
    EndOfSubscriptionPeriod => "endOfSubscriptionPeriod_label", "Subscription period ends on {1}";
    /// Prices include taxes.
    Gross => "gross_label", "incl. taxes";
    /// Prices exclude taxes.
    Net => "net_label", "net";
    /// Yearly price suffix.
    PerYear => "perYear_label", "per year";
    /// Monthly price suffix.
    PerMonth => "perMonth_label", "per month";
    /// Immediate charge; `{1}` is the amount.
    PriceForCurrentAccountingPeriod => "priceForCurrentAccountingPeriod_label",
        "Price for current subscription period: {1}";
    /// Price reduction start; `{1}` is the date.
    PriceChangeValidFrom => "priceChangeValidFrom_label", "Price change valid from {1}";
    /// Submit button when the booking costs more.
    BuyAction => "buy_action", "Buy";
    /// Submit button otherwise.
    OrderAction => "order_action", "Order";
    /// Payment by invoice.
    PaymentMethodInvoice => "paymentMethodInvoice_label", "Invoice";
    /// Payment by credit card.
    PaymentMethodCreditCard => "paymentMethodCreditCard_label", "Credit card";
    /// Payment by SEPA direct debit.
    PaymentMethodSepa => "paymentMethodSepa_label", "SEPA direct debit";
    /// Payment by `PayPal`.
    PaymentMethodPayPal => "paymentMethodPayPal_label", "PayPal";
    /// Payment from account balance.
    PaymentMethodAccountBalance => "paymentMethodAccountBalance_label", "Account balance";
}

impl fmt::Display for TextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for TextId {
    type Err = BookingError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|id| id.key() == s)
            .ok_or_else(|| BookingError::ConfigError(format!("unknown translation key '{s}'")))
    }
}

/// In-memory translation table.
#[derive(Debug, Clone)]
pub struct Catalog {
    templates: HashMap<TextId, String>,
}

impl Catalog {
    /// Creates the built-in English catalog.
    #[must_use]
    pub fn english() -> Self {
        let templates = TextId::ALL.iter().map(|id| (*id, id.english().to_owned())).collect();
        Self { templates }
    }

    /// Creates an empty catalog; every lookup falls back to the raw key.
    #[must_use]
    pub fn empty() -> Self {
        Self { templates: HashMap::new() }
    }

    /// Replaces templates by key.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::ConfigError`] if a key is not a known [`TextId`].
    pub fn with_overrides<'a, I>(mut self, overrides: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a String, &'a String)>,
    {
        for (key, template) in overrides {
            let id = key.parse::<TextId>()?;
            self.templates.insert(id, template.clone());
        }
        Ok(self)
    }

    /// Returns the raw template for a key, if present.
    #[must_use]
    pub fn template(&self, id: TextId) -> Option<&str> {
        self.templates.get(&id).map(String::as_str)
    }
}

impl Translator for Catalog {
    fn translate(&self, id: TextId, substitutions: &[(&str, &str)]) -> String {
        let Some(template) = self.template(id) else {
            return id.key().to_owned();
        };
        substitutions.iter().fold(template.to_owned(), |text, (placeholder, value)| {
            text.replace(placeholder, value)
        })
    }
}
