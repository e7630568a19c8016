//! Text rendering for a loaded booking flow.

use std::cmp::Ordering;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::{
    i18n::{Localizer, TextId},
    model::{AccountingInfo, BookingRequest, FeatureType, PriceQuote},
};

/// Storage amounts from this many GB on are shown in TB.
const TERABYTE_THRESHOLD_GB: i64 = 1000;

/// Borrowed view of a flow whose quote and accounting info are both loaded.
#[derive(Debug, Clone, Copy)]
pub(crate) struct LoadedFlow<'a> {
    pub request: &'a BookingRequest,
    pub quote: &'a PriceQuote,
    pub accounting_info: &'a AccountingInfo,
}

impl LoadedFlow<'_> {
    fn comparison(&self) -> Ordering {
        self.quote.compare(self.request.feature_type)
    }

    pub fn is_buy(&self) -> bool {
        self.comparison() == Ordering::Greater
    }

    pub fn is_unbuy(&self) -> bool {
        self.comparison() == Ordering::Less
    }

    pub fn is_price_change(&self) -> bool {
        self.comparison() != Ordering::Equal
    }

    fn is_single_price_type(&self) -> bool {
        self.quote.future_price_next_period.is_single_price_type(self.request.feature_type)
    }

    pub fn booking_text(&self, l10n: &Localizer) -> String {
        let t = l10n.translator();
        let count = self.request.count;

        if self.is_single_price_type() {
            return if count > 0 {
                format!("{count} {}", t.text(TextId::BookingItemUsers))
            } else {
                let removed = count.unsigned_abs().to_string();
                t.translate(TextId::CancelUserAccounts, &[("{1}", removed.as_str())])
            };
        }

        let feature = self.request.feature_type;
        let package_count =
            self.quote.future_price_next_period.item(feature).map_or(0, |item| item.count);
        let visible_amount = self.request.visible_amount();

        match feature {
            FeatureType::Storage if count < TERABYTE_THRESHOLD_GB => {
                format!("{} {visible_amount} GB", t.text(TextId::StorageCapacity))
            }
            FeatureType::Storage => {
                let terabytes = (Decimal::from(visible_amount)
                    / Decimal::from(TERABYTE_THRESHOLD_GB))
                .normalize();
                format!("{} {terabytes} TB", t.text(TextId::StorageCapacity))
            }
            FeatureType::Users => {
                let id = if count > 0 {
                    TextId::PackageUpgradeUserAccounts
                } else {
                    TextId::PackageDowngradeUserAccounts
                };
                let packages = package_count.to_string();
                t.translate(id, &[("{1}", packages.as_str())])
            }
            FeatureType::EmailAliases => {
                format!("{visible_amount} {}", t.text(TextId::MailAddressAliases))
            }
        }
    }

    pub fn subscription_text(&self, l10n: &Localizer) -> String {
        let t = l10n.translator();
        let period = if self.quote.future_price_next_period.payment_interval.is_yearly() {
            TextId::Yearly
        } else {
            TextId::Monthly
        };
        format!("{}, {}", t.text(period), t.text(TextId::AutomaticRenewal))
    }

    pub fn subscription_info_text(&self, l10n: &Localizer) -> String {
        let date = l10n.dates().format_date(self.quote.period_end_date);
        l10n.translator().translate(TextId::EndOfSubscriptionPeriod, &[("{1}", date.as_str())])
    }

    pub fn price_text(&self, l10n: &Localizer) -> String {
        let t = l10n.translator();
        let future = &self.quote.future_price_next_period;
        let feature = self.request.feature_type;

        let tax = if future.tax_included { TextId::Gross } else { TextId::Net };
        let period =
            if future.payment_interval.is_yearly() { TextId::PerYear } else { TextId::PerMonth };
        let amount = if self.is_single_price_type() {
            self.quote.price_delta(feature)
        } else {
            future.price_for(feature)
        };

        format!("{} {} ({})", l10n.prices().format(amount, true), t.text(period), t.text(tax))
    }

    pub fn price_info_text(&self, l10n: &Localizer) -> String {
        let t = l10n.translator();
        if let Some(added) = self.quote.positive_added_price() {
            let amount = l10n.prices().format(added, true);
            t.translate(TextId::PriceForCurrentAccountingPeriod, &[("{1}", amount.as_str())])
        } else if self.is_unbuy() {
            let date = l10n.dates().format_date(self.quote.period_end_date);
            t.translate(TextId::PriceChangeValidFrom, &[("{1}", date.as_str())])
        } else {
            String::new()
        }
    }

    pub fn payment_method_info_text(&self, l10n: &Localizer) -> String {
        self.accounting_info.payment_method_description().map_or_else(
            || l10n.translator().text(self.accounting_info.payment_method.name_text_id()),
            ToOwned::to_owned,
        )
    }
}

/// Key of the submit button label.
pub(crate) const fn submit_button_text_id(is_buy: bool) -> TextId {
    if is_buy { TextId::BuyAction } else { TextId::OrderAction }
}

/// Snapshot of everything the dialog shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DialogTexts {
    /// Whether the dialog is shown.
    pub visible: bool,
    /// Whether quote and accounting info are loaded.
    pub loaded: bool,
    /// The booking costs more than today.
    pub is_buy: bool,
    /// The booking costs less than today.
    pub is_unbuy: bool,
    /// The price changes at all.
    pub is_price_change: bool,
    /// What is being booked.
    pub booking: String,
    /// Subscription period and renewal.
    pub subscription: String,
    /// End of the current subscription period.
    pub subscription_info: String,
    /// Price (or price change) per period.
    pub price: String,
    /// Immediate charge or the date a reduction applies.
    pub price_info: String,
    /// Payment method shown to the user.
    pub payment_method_info: String,
    /// Translation key of the submit button.
    pub submit_button_text_id: &'static str,
    /// Translated submit button label.
    pub submit_button: String,
}

impl DialogTexts {
    pub(crate) fn render(flow: &LoadedFlow<'_>, l10n: &Localizer, visible: bool) -> Self {
        let is_buy = flow.is_buy();
        let submit = submit_button_text_id(is_buy);
        Self {
            visible,
            loaded: true,
            is_buy,
            is_unbuy: flow.is_unbuy(),
            is_price_change: flow.is_price_change(),
            booking: flow.booking_text(l10n),
            subscription: flow.subscription_text(l10n),
            subscription_info: flow.subscription_info_text(l10n),
            price: flow.price_text(l10n),
            price_info: flow.price_info_text(l10n),
            payment_method_info: flow.payment_method_info_text(l10n),
            submit_button_text_id: submit.key(),
            submit_button: l10n.translator().text(submit),
        }
    }

    pub(crate) fn loading(l10n: &Localizer, visible: bool) -> Self {
        let loading = l10n.translator().text(TextId::Loading);
        let submit = submit_button_text_id(false);
        Self {
            visible,
            loaded: false,
            is_buy: false,
            is_unbuy: false,
            is_price_change: false,
            booking: loading.clone(),
            subscription: loading.clone(),
            subscription_info: loading.clone(),
            price: loading.clone(),
            price_info: loading.clone(),
            payment_method_info: loading,
            submit_button_text_id: submit.key(),
            submit_button: l10n.translator().text(submit),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::model::{PaymentInterval, PaymentMethod, PriceItem, PriceSpec};

    fn item(feature_type: FeatureType, count: u64, price: i64, single_type: bool) -> PriceItem {
        PriceItem { feature_type, count, price: Decimal::new(price, 2), single_type }
    }

    fn spec(interval: PaymentInterval, tax_included: bool, items: Vec<PriceItem>) -> PriceSpec {
        PriceSpec { tax_included, payment_interval: interval, items }
    }

    fn quote(current: PriceSpec, future: PriceSpec, added: Option<i64>) -> PriceQuote {
        PriceQuote {
            current_price_next_period: current,
            future_price_next_period: future,
            current_period_added_price: added.map(|cents| Decimal::new(cents, 2)),
            period_end_date: Utc.with_ymd_and_hms(2026, 11, 30, 0, 0, 0).unwrap(),
        }
    }

    fn accounting(info: Option<&str>) -> AccountingInfo {
        AccountingInfo {
            id: "acc-1".to_owned(),
            payment_method: PaymentMethod::CreditCard,
            payment_method_info: info.map(str::to_owned),
        }
    }

    fn storage_quote(package_count: u64) -> PriceQuote {
        quote(
            spec(PaymentInterval::Monthly, true, vec![item(FeatureType::Storage, 1, 200, false)]),
            spec(
                PaymentInterval::Monthly,
                true,
                vec![item(FeatureType::Storage, package_count, 1000, false)],
            ),
            None,
        )
    }

    // ========================================================================
    // Booking Text
    // ========================================================================

    #[test]
    fn test_storage_in_gigabytes() {
        let request = BookingRequest::new(FeatureType::Storage, 500, 100);
        let quote = storage_quote(5);
        let info = accounting(None);
        let flow = LoadedFlow { request: &request, quote: &quote, accounting_info: &info };

        assert_eq!(flow.booking_text(&Localizer::default()), "Storage capacity 500 GB");
    }

    #[test]
    fn test_storage_shows_free_amount_when_larger() {
        let request = BookingRequest::new(FeatureType::Storage, 0, 10);
        let quote = storage_quote(0);
        let info = accounting(None);
        let flow = LoadedFlow { request: &request, quote: &quote, accounting_info: &info };

        assert_eq!(flow.booking_text(&Localizer::default()), "Storage capacity 10 GB");
    }

    #[test]
    fn test_storage_in_terabytes() {
        let info = accounting(None);
        let quote = storage_quote(20);

        let request = BookingRequest::new(FeatureType::Storage, 2000, 0);
        let flow = LoadedFlow { request: &request, quote: &quote, accounting_info: &info };
        assert_eq!(flow.booking_text(&Localizer::default()), "Storage capacity 2 TB");

        let request = BookingRequest::new(FeatureType::Storage, 2500, 0);
        let flow = LoadedFlow { request: &request, quote: &quote, accounting_info: &info };
        assert_eq!(flow.booking_text(&Localizer::default()), "Storage capacity 2.5 TB");
    }

    #[test]
    fn test_users_added() {
        let request = BookingRequest::new(FeatureType::Users, 2, 0);
        let quote = quote(
            spec(PaymentInterval::Monthly, true, vec![item(FeatureType::Users, 1, 100, true)]),
            spec(PaymentInterval::Monthly, true, vec![item(FeatureType::Users, 3, 300, true)]),
            None,
        );
        let info = accounting(None);
        let flow = LoadedFlow { request: &request, quote: &quote, accounting_info: &info };

        assert_eq!(flow.booking_text(&Localizer::default()), "2 Users");
    }

    #[test]
    fn test_users_removed() {
        let request = BookingRequest::new(FeatureType::Users, -3, 0);
        let quote = quote(
            spec(PaymentInterval::Monthly, true, vec![item(FeatureType::Users, 4, 400, true)]),
            spec(PaymentInterval::Monthly, true, vec![item(FeatureType::Users, 1, 100, true)]),
            None,
        );
        let info = accounting(None);
        let flow = LoadedFlow { request: &request, quote: &quote, accounting_info: &info };

        assert_eq!(flow.booking_text(&Localizer::default()), "Cancel 3 user account(s)");
    }

    #[test]
    fn test_user_packages() {
        let info = accounting(None);
        let quote = quote(
            spec(PaymentInterval::Yearly, true, vec![item(FeatureType::Users, 1, 1000, false)]),
            spec(PaymentInterval::Yearly, true, vec![item(FeatureType::Users, 10, 5000, false)]),
            None,
        );

        let request = BookingRequest::new(FeatureType::Users, 10, 0);
        let flow = LoadedFlow { request: &request, quote: &quote, accounting_info: &info };
        assert_eq!(
            flow.booking_text(&Localizer::default()),
            "Upgrade to package with 10 user accounts"
        );

        let request = BookingRequest::new(FeatureType::Users, -5, 0);
        let flow = LoadedFlow { request: &request, quote: &quote, accounting_info: &info };
        assert_eq!(
            flow.booking_text(&Localizer::default()),
            "Downgrade to package with 10 user accounts"
        );
    }

    #[test]
    fn test_email_aliases() {
        let request = BookingRequest::new(FeatureType::EmailAliases, 20, 5);
        let quote = quote(
            spec(PaymentInterval::Monthly, false, vec![]),
            spec(
                PaymentInterval::Monthly,
                false,
                vec![item(FeatureType::EmailAliases, 1, 100, false)],
            ),
            None,
        );
        let info = accounting(None);
        let flow = LoadedFlow { request: &request, quote: &quote, accounting_info: &info };

        assert_eq!(flow.booking_text(&Localizer::default()), "20 Email aliases");
    }

    // ========================================================================
    // Subscription and Price Texts
    // ========================================================================

    #[test]
    fn test_subscription_text_yearly() {
        let request = BookingRequest::new(FeatureType::Users, 1, 0);
        let quote = quote(
            spec(PaymentInterval::Yearly, true, vec![]),
            spec(PaymentInterval::Yearly, true, vec![item(FeatureType::Users, 1, 1200, true)]),
            None,
        );
        let info = accounting(None);
        let flow = LoadedFlow { request: &request, quote: &quote, accounting_info: &info };
        let l10n = Localizer::default();

        assert!(flow.subscription_text(&l10n).starts_with("Yearly"));
        assert_eq!(flow.subscription_text(&l10n), "Yearly, automatic renewal");
        assert_eq!(flow.subscription_info_text(&l10n), "Subscription period ends on 30.11.2026");
    }

    #[test]
    fn test_price_text_single_price_shows_delta() {
        let request = BookingRequest::new(FeatureType::Users, 1, 0);
        let quote = quote(
            spec(PaymentInterval::Monthly, true, vec![item(FeatureType::Users, 1, 100, true)]),
            spec(PaymentInterval::Monthly, true, vec![item(FeatureType::Users, 2, 340, true)]),
            None,
        );
        let info = accounting(None);
        let flow = LoadedFlow { request: &request, quote: &quote, accounting_info: &info };

        assert_eq!(flow.price_text(&Localizer::default()), "2,40 € per month (incl. taxes)");
    }

    #[test]
    fn test_price_text_tiered_shows_future_price() {
        let request = BookingRequest::new(FeatureType::Storage, 100, 10);
        let quote = quote(
            spec(PaymentInterval::Yearly, false, vec![item(FeatureType::Storage, 1, 1200, false)]),
            spec(PaymentInterval::Yearly, false, vec![item(FeatureType::Storage, 2, 2400, false)]),
            None,
        );
        let info = accounting(None);
        let flow = LoadedFlow { request: &request, quote: &quote, accounting_info: &info };

        assert_eq!(flow.price_text(&Localizer::default()), "24,00 € per year (net)");
    }

    #[test]
    fn test_price_info_text_variants() {
        let info = accounting(None);
        let l10n = Localizer::default();
        let request = BookingRequest::new(FeatureType::Users, 1, 0);

        let charged = quote(
            spec(PaymentInterval::Monthly, true, vec![item(FeatureType::Users, 1, 100, true)]),
            spec(PaymentInterval::Monthly, true, vec![item(FeatureType::Users, 2, 200, true)]),
            Some(55),
        );
        let flow = LoadedFlow { request: &request, quote: &charged, accounting_info: &info };
        assert_eq!(flow.price_info_text(&l10n), "Price for current subscription period: 0,55 €");

        let cheaper = quote(
            spec(PaymentInterval::Monthly, true, vec![item(FeatureType::Users, 2, 200, true)]),
            spec(PaymentInterval::Monthly, true, vec![item(FeatureType::Users, 1, 100, true)]),
            Some(0),
        );
        let flow = LoadedFlow { request: &request, quote: &cheaper, accounting_info: &info };
        assert_eq!(flow.price_info_text(&l10n), "Price change valid from 30.11.2026");

        let pricier = quote(
            spec(PaymentInterval::Monthly, true, vec![item(FeatureType::Users, 1, 100, true)]),
            spec(PaymentInterval::Monthly, true, vec![item(FeatureType::Users, 2, 200, true)]),
            None,
        );
        let flow = LoadedFlow { request: &request, quote: &pricier, accounting_info: &info };
        assert_eq!(flow.price_info_text(&l10n), "");
    }

    #[test]
    fn test_payment_method_info_text() {
        let request = BookingRequest::new(FeatureType::Users, 1, 0);
        let quote = storage_quote(1);
        let l10n = Localizer::default();

        let described = accounting(Some("VISA **** 4242"));
        let flow = LoadedFlow { request: &request, quote: &quote, accounting_info: &described };
        assert_eq!(flow.payment_method_info_text(&l10n), "VISA **** 4242");

        let plain = accounting(None);
        let flow = LoadedFlow { request: &request, quote: &quote, accounting_info: &plain };
        assert_eq!(flow.payment_method_info_text(&l10n), "Credit card");
    }

    #[test]
    fn test_loading_snapshot() {
        let texts = DialogTexts::loading(&Localizer::default(), false);
        assert!(!texts.loaded);
        assert_eq!(texts.booking, "Loading ...");
        assert_eq!(texts.price_info, "Loading ...");
        assert_eq!(texts.submit_button_text_id, "order_action");
    }

    proptest::proptest! {
        #[test]
        fn test_predicates_partition_price_change(
            current_cents in 0i64..10_000,
            future_cents in 0i64..10_000,
            count in -50i64..5000,
            feature in proptest::sample::select(FeatureType::ALL.to_vec()),
        ) {
            let request = BookingRequest::new(feature, count, 0);
            let quote = quote(
                spec(PaymentInterval::Monthly, true, vec![item(feature, 1, current_cents, false)]),
                spec(PaymentInterval::Monthly, true, vec![item(feature, 2, future_cents, false)]),
                None,
            );
            let info = accounting(None);
            let flow = LoadedFlow { request: &request, quote: &quote, accounting_info: &info };

            proptest::prop_assert_eq!(flow.is_price_change(), flow.is_buy() || flow.is_unbuy());
            proptest::prop_assert!(!(flow.is_buy() && flow.is_unbuy()));
            proptest::prop_assert_eq!(flow.is_price_change(), current_cents != future_cents);
        }
    }

    #[test]
    fn test_snapshot_serializes_flat() {
        let json = serde_json::to_value(DialogTexts::loading(&Localizer::default(), true)).unwrap();
        assert_eq!(json["visible"], true);
        assert_eq!(json["booking"], "Loading ...");
        assert_eq!(json["submit_button"], "Order");
    }
}
