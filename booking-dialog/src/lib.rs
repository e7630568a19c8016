//! Booking Dialog: purchase confirmation for subscription changes
//!
//! Before a customer books more users, storage or email aliases (or cancels some), the
//! application shows what the change costs and asks for confirmation. This crate implements
//! the view model behind that dialog, independent of any UI toolkit.
//!
//! # What Does the Dialog Do?
//!
//! - **Loads** the logged-in account, customer records, accounting info and a price quote
//! - **Compares** the price before and after the booking
//! - **Skips** the dialog when the price does not change
//! - **Shows** localized booking, subscription, price and payment texts otherwise
//! - **Waits** for the user to accept or cancel
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │   View / CLI    │  renders texts, calls accept() / cancel()
//! └────────┬────────┘
//!          │ watch_visible(), texts()
//!          │
//! ┌────────▼────────────────────────────────────────┐
//! │      PurchaseConfirmationViewModel              │
//! │  ┌──────────────┐      ┌──────────────────┐    │
//! │  │  open() gate │──────│  Localizer       │    │
//! │  │  (oneshot)   │      │  (texts, dates,  │    │
//! │  │              │      │   prices)        │    │
//! │  └──────────────┘      └──────────────────┘    │
//! └────────┬───────────────────────────────────────┘
//!          │ SessionService, BillingDirectory, PricingService
//!          │
//! ┌────────▼────────┐
//! │ Billing backend │  host application or StaticBilling fixture
//! └─────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use booking_dialog::{
//!     DialogServices, PurchaseConfirmationViewModel, config::DialogConfig, model::FeatureType,
//!     services::StaticBilling,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = DialogConfig::from_file("dialog.toml")?;
//! let billing = Arc::new(StaticBilling::from_file("scenario.toml")?);
//! let dialog = Arc::new(PurchaseConfirmationViewModel::new(
//!     DialogServices::from_backend(billing),
//!     config.localizer()?,
//! ));
//!
//! let flow = tokio::spawn({
//!     let dialog = dialog.clone();
//!     async move { dialog.open(FeatureType::Users, 2, 0).await }
//! });
//!
//! if dialog.watch_visible().wait_for(|shown| *shown).await.is_ok() {
//!     let texts = dialog.texts();
//!     println!("{}: {}", texts.booking, texts.price);
//!     dialog.accept()?;
//! }
//!
//! let confirmed = flow.await??;
//! println!("confirmed: {confirmed}");
//! # Ok(())
//! # }
//! ```
//!
//! # Module Organization
//!
//! - [`dialog`]: the view model, its observables and the text snapshot
//! - [`model`]: accounts, billing records, price specs and quotes
//! - [`services`]: service traits and the TOML-backed [`StaticBilling`](services::StaticBilling)
//! - [`i18n`]: translation catalog, date and price formatting
//! - [`config`]: TOML dialog configuration
//! - [`error`]: error types with recovery guidance
//!
//! # Error Handling
//!
//! All operations return [`Result<T, BookingError>`](error::Result):
//!
//! ```rust
//! use booking_dialog::{BookingError, PurchaseConfirmationViewModel};
//!
//! fn confirm(dialog: &PurchaseConfirmationViewModel) {
//!     match dialog.accept() {
//!         Ok(()) => println!("booking confirmed"),
//!         Err(BookingError::NoPendingDecision) => {
//!             // Dialog was not waiting for the user
//!         }
//!         Err(e) => eprintln!("Other error: {e}"),
//!     }
//! }
//! ```

#![allow(
    clippy::multiple_crate_versions,
    reason = "transitive dependencies from tokio and chrono"
)]

pub mod config;
pub mod dialog;
pub mod error;
pub mod i18n;
pub mod model;
pub mod services;

pub use config::DialogConfig;
pub use dialog::{Decision, DialogServices, DialogTexts, PurchaseConfirmationViewModel};
pub use error::{BookingError, Result};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_reexports() {
        let err: BookingError = BookingError::NoPendingDecision;
        let result: Result<()> = Err(err);
        assert!(matches!(result, Err(BookingError::NoPendingDecision)));

        let dialog = PurchaseConfirmationViewModel::new(
            DialogServices::from_backend(std::sync::Arc::new(
                services::StaticBilling::from_toml(
                    r#"
                    [customer]
                    id = "cust-1"
                    customer_info_id = "info-1"

                    [customer_info]
                    id = "info-1"
                    accounting_info_id = "acc-1"

                    [accounting_info]
                    id = "acc-1"
                    payment_method = "invoice"
                    "#,
                )
                .unwrap(),
            )),
            DialogConfig::default().localizer().unwrap(),
        );
        let texts: DialogTexts = dialog.texts();
        assert!(!texts.loaded);
        assert_ne!(Decision::Accept, Decision::Cancel);
        assert!(matches!(dialog.cancel(), Err(BookingError::NoPendingDecision)));
    }
}
