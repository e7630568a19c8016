//! The purchase confirmation dialog.
//!
//! [`PurchaseConfirmationViewModel`] drives one booking at a time: it loads the billing
//! records and the price quote, decides whether the user has to confirm, and exposes the texts
//! a view renders. [`Observable`] values let the view react to `visible` and `loaded`.

mod observable;
mod texts;
mod view_model;

pub use observable::Observable;
pub use texts::DialogTexts;
pub use view_model::{Decision, DialogServices, PurchaseConfirmationViewModel};
