//! Localization services used to render dialog texts.
//!
//! The dialog never formats user-visible text on its own. It asks a [`Translator`] for
//! templates, a [`DateFormatter`] for dates and a [`PriceFormat`] for amounts. All three are
//! bundled in a [`Localizer`] and injected into the view model, so tests and front ends can swap
//! them freely.
//!
//! # Examples
//!
//! ```
//! use booking_dialog::i18n::{Catalog, TextId, Translator};
//!
//! let catalog = Catalog::english();
//! let text = catalog.translate(TextId::CancelUserAccounts, &[("{1}", "3")]);
//! assert_eq!(text, "Cancel 3 user account(s)");
//! ```

mod catalog;
pub(crate) mod dates;
mod price;

use std::{fmt, sync::Arc};

pub use catalog::{Catalog, TextId};
pub use dates::{DEFAULT_DATE_PATTERN, DateFormatter, PatternDateFormatter};
pub use price::{PriceFormat, SymbolPosition};

/// Looks up localized templates and fills in placeholders.
pub trait Translator: Send + Sync {
    /// Returns the template for `id` with every `(placeholder, value)` pair substituted.
    ///
    /// Implementations fall back to the raw key when no template is known.
    fn translate(&self, id: TextId, substitutions: &[(&str, &str)]) -> String;

    /// Returns the template for `id` without substitutions.
    fn text(&self, id: TextId) -> String {
        self.translate(id, &[])
    }
}

/// Bundle of the localization services a dialog renders with.
#[derive(Clone)]
pub struct Localizer {
    translator: Arc<dyn Translator>,
    dates: Arc<dyn DateFormatter>,
    prices: PriceFormat,
}

impl fmt::Debug for Localizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Localizer").field("prices", &self.prices).finish_non_exhaustive()
    }
}

impl Default for Localizer {
    fn default() -> Self {
        Self::new(
            Arc::new(Catalog::english()),
            Arc::new(PatternDateFormatter::default()),
            PriceFormat::default(),
        )
    }
}

impl Localizer {
    /// Creates a localizer from its parts.
    #[must_use]
    pub fn new(
        translator: Arc<dyn Translator>,
        dates: Arc<dyn DateFormatter>,
        prices: PriceFormat,
    ) -> Self {
        Self { translator, dates, prices }
    }

    /// Returns the translator.
    #[must_use]
    pub fn translator(&self) -> &dyn Translator {
        self.translator.as_ref()
    }

    /// Returns the date formatter.
    #[must_use]
    pub fn dates(&self) -> &dyn DateFormatter {
        self.dates.as_ref()
    }

    /// Returns the price format.
    #[must_use]
    pub const fn prices(&self) -> &PriceFormat {
        &self.prices
    }
}
