//! Dialog configuration.
//!
//! TOML-deserializable settings for price formatting, date formatting and translation
//! overrides. Every field has a default, so an empty file is a valid configuration.
//!
//! ```toml
//! [price_format]
//! currency_symbol = "€"
//! decimal_separator = ","
//! symbol_position = "suffix"
//!
//! [dates]
//! pattern = "%d.%m.%Y"
//!
//! [translations]
//! buy_action = "Jetzt kaufen"
//! ```

use std::{collections::HashMap, path::Path, sync::Arc};

use serde::Deserialize;

use crate::{
    error::{BookingError, Result},
    i18n::{Catalog, Localizer, PatternDateFormatter, PriceFormat, TextId, dates},
};

/// Root dialog configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DialogConfig {
    /// Money formatting.
    #[serde(default)]
    pub price_format: PriceFormat,

    /// Date formatting.
    #[serde(default)]
    pub dates: DateSettings,

    /// Template overrides keyed by translation key (e.g. `buy_action`).
    #[serde(default)]
    pub translations: HashMap<String, String>,
}

/// Date formatting settings.
#[derive(Debug, Clone, Deserialize)]
pub struct DateSettings {
    /// chrono strftime pattern (default: `%d.%m.%Y`).
    #[serde(default = "default_date_pattern")]
    pub pattern: String,
}

impl Default for DateSettings {
    fn default() -> Self {
        Self { pattern: default_date_pattern() }
    }
}

fn default_date_pattern() -> String {
    dates::DEFAULT_DATE_PATTERN.to_owned()
}

impl DialogConfig {
    /// Parses and validates a TOML configuration.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::ConfigError`] if parsing or validation fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use booking_dialog::config::DialogConfig;
    ///
    /// let config = DialogConfig::from_toml(
    ///     r#"
    ///     [price_format]
    ///     currency_symbol = "CHF"
    ///     "#,
    /// )
    /// .unwrap();
    /// assert_eq!(config.price_format.currency_symbol, "CHF");
    /// assert_eq!(config.dates.pattern, "%d.%m.%Y");
    /// ```
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let config: Self = toml::from_str(toml_str)
            .map_err(|e| BookingError::ConfigError(format!("invalid dialog config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads a configuration file.
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

    /// Validates all settings.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::ConfigError`] for an invalid price format, an invalid date
    /// pattern, or a translation override with an unknown key or empty template.
    pub fn validate(&self) -> Result<()> {
        self.price_format.validate()?;
        dates::validate_pattern(&self.dates.pattern)?;
        for (key, template) in &self.translations {
            key.parse::<TextId>()?;
            if template.trim().is_empty() {
                return Err(BookingError::ConfigError(format!(
                    "translation for '{key}' cannot be empty"
                )));
            }
        }
        Ok(())
    }

    /// Builds the translation catalog: English defaults plus overrides.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::ConfigError`] for an unknown translation key.
    pub fn catalog(&self) -> Result<Catalog> {
        Catalog::english().with_overrides(&self.translations)
    }

    /// Builds the configured date formatter.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::ConfigError`] for an invalid pattern.
    pub fn date_formatter(&self) -> Result<PatternDateFormatter> {
        PatternDateFormatter::new(self.dates.pattern.clone())
    }

    /// Builds the full [`Localizer`].
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::ConfigError`] if any part is invalid.
    pub fn localizer(&self) -> Result<Localizer> {
        Ok(Localizer::new(
            Arc::new(self.catalog()?),
            Arc::new(self.date_formatter()?),
            self.price_format.clone(),
        ))
    }
}
