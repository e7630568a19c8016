//! Confirms a storage upgrade against an in-memory billing scenario.
//!
//! The example plays both sides: one task awaits `open`, the main task acts as the view and
//! accepts once the dialog becomes visible.
//!
//! # Running this example
//!
//! ```bash
//! RUST_LOG=booking_dialog=debug cargo run --example confirm_booking
//! ```

#![allow(
    clippy::print_stdout,
    clippy::uninlined_format_args,
    reason = "examples are allowed to use println and simple formatting"
)]

use std::sync::Arc;

use booking_dialog::{
    DialogServices, PurchaseConfirmationViewModel, i18n::Localizer, model::FeatureType,
    services::StaticBilling,
};

const SCENARIO: &str = r#"
    [account]
    user_id = "user-1"
    customer_id = "cust-1"

    [customer]
    id = "cust-1"
    customer_info_id = "info-1"

    [customer_info]
    id = "info-1"
    accounting_info_id = "acc-1"

    [accounting_info]
    id = "acc-1"
    payment_method = "sepa"

    [[quotes]]
    feature_type = "storage"
    count = 500
    current_period_added_price = "3.20"
    period_end_date = "2026-11-30T00:00:00Z"

    [quotes.current_price_next_period]
    tax_included = true
    payment_interval = "1"
    items = [{ feature_type = "storage", count = 1, price = "2.00", single_type = false }]

    [quotes.future_price_next_period]
    tax_included = true
    payment_interval = "1"
    items = [{ feature_type = "storage", count = 5, price = "10.00", single_type = false }]
"#;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let billing = Arc::new(StaticBilling::from_toml(SCENARIO)?);
    let dialog = Arc::new(PurchaseConfirmationViewModel::new(
        DialogServices::from_backend(billing),
        Localizer::default(),
    ));

    println!("Before loading: {}", dialog.booking_text());

    let flow = tokio::spawn({
        let dialog = dialog.clone();
        async move { dialog.open(FeatureType::Storage, 500, 10).await }
    });

    dialog.watch_visible().wait_for(|shown| *shown).await?;

    let texts = dialog.texts();
    println!("{}", texts.booking);
    println!("{}", texts.subscription);
    println!("{}", texts.subscription_info);
    println!("{}", texts.price);
    println!("{}", texts.price_info);
    println!("Payment: {}", texts.payment_method_info);
    println!("[ {} ]", texts.submit_button);

    dialog.accept()?;
    let confirmed = flow.await??;
    println!("Booking confirmed: {}", confirmed);
    Ok(())
}
