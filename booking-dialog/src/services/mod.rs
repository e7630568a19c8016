//! External services the dialog loads its data from.

pub mod fixture;
pub mod traits;

pub use fixture::{QuoteFixture, StaticBilling};
pub use traits::{BillingDirectory, PricingService, SessionService};
