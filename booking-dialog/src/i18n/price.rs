//! Money formatting.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Deserialize;

use crate::error::{BookingError, Result};

/// Largest number of fraction digits a price may be shown with.
const MAX_DECIMALS: u32 = 4;

/// Where the currency symbol goes relative to the amount.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymbolPosition {
    /// `€12,00`
    Prefix,
    /// `12,00 €`
    #[default]
    Suffix,
}

/// How amounts are rendered.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PriceFormat {
    /// Currency symbol (default: `€`).
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,

    /// Separator between integer and fraction digits (default: `,`).
    #[serde(default = "default_decimal_separator")]
    pub decimal_separator: String,

    /// Position of the currency symbol.
    #[serde(default)]
    pub symbol_position: SymbolPosition,

    /// Number of fraction digits (default: 2).
    #[serde(default = "default_decimals")]
    pub decimals: u32,
}

impl Default for PriceFormat {
    fn default() -> Self {
        Self {
            currency_symbol: default_currency_symbol(),
            decimal_separator: default_decimal_separator(),
            symbol_position: SymbolPosition::default(),
            decimals: default_decimals(),
        }
    }
}

fn default_currency_symbol() -> String {
    "€".to_owned()
}
fn default_decimal_separator() -> String {
    ",".to_owned()
}
fn default_decimals() -> u32 {
    2
}

impl PriceFormat {
    /// Validates the format settings.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::ConfigError`] if the symbol or separator is empty or
    /// `decimals` exceeds 4.
    pub fn validate(&self) -> Result<()> {
        if self.currency_symbol.trim().is_empty() {
            return Err(BookingError::ConfigError("currency_symbol cannot be empty".into()));
        }
        if self.decimal_separator.is_empty() {
            return Err(BookingError::ConfigError("decimal_separator cannot be empty".into()));
        }
        if self.decimals > MAX_DECIMALS {
            return Err(BookingError::ConfigError(format!(
                "decimals must be at most {MAX_DECIMALS}, got {}",
                self.decimals
            )));
        }
        Ok(())
    }

    /// Formats an amount, optionally with the currency symbol.
    ///
    /// Negative amounts keep their minus sign in front of the symbol.
    ///
    /// # Examples
    ///
    /// ```
    /// use booking_dialog::i18n::PriceFormat;
    /// use rust_decimal::Decimal;
    ///
    /// let format = PriceFormat::default();
    /// assert_eq!(format.format(Decimal::new(-2400, 2), true), "-24,00 €");
    /// assert_eq!(format.format(Decimal::new(5, 1), false), "0,50");
    /// ```
    #[must_use]
    pub fn format(&self, amount: Decimal, include_currency: bool) -> String {
        let rounded =
            amount.round_dp_with_strategy(self.decimals, RoundingStrategy::MidpointAwayFromZero);
        let sign = if rounded.is_sign_negative() && !rounded.is_zero() { "-" } else { "" };
        let digits = format!("{:.prec$}", rounded.abs(), prec = self.decimals as usize)
            .replace('.', &self.decimal_separator);

        if !include_currency {
            return format!("{sign}{digits}");
        }
        match self.symbol_position {
            SymbolPosition::Prefix => format!("{sign}{}{digits}", self.currency_symbol),
            SymbolPosition::Suffix => format!("{sign}{digits} {}", self.currency_symbol),
        }
    }
}
