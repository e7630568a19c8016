//! Purchase confirmation view model.

use std::{fmt, sync::Arc};

use parking_lot::Mutex;
use rust_decimal::Decimal;
use tokio::sync::{oneshot, watch};
use tracing::{debug, info, instrument, warn};

use super::{
    observable::Observable,
    texts::{self, DialogTexts, LoadedFlow},
};
use crate::{
    error::{BookingError, Result},
    i18n::{Localizer, TextId},
    model::{AccountingInfo, BookingRequest, FeatureType, PriceQuote, PriceSpec, price_for_feature},
    services::{BillingDirectory, PricingService, SessionService},
};

/// Services the view model loads its data from.
#[derive(Clone)]
pub struct DialogServices {
    /// Session lookup.
    pub session: Arc<dyn SessionService>,
    /// Customer and accounting records.
    pub billing: Arc<dyn BillingDirectory>,
    /// Price quotes.
    pub pricing: Arc<dyn PricingService>,
}

impl DialogServices {
    /// Uses one backend for all three services.
    #[must_use]
    pub fn from_backend<B>(backend: Arc<B>) -> Self
    where
        B: SessionService + BillingDirectory + PricingService + 'static,
    {
        Self { session: backend.clone(), billing: backend.clone(), pricing: backend }
    }
}

impl fmt::Debug for DialogServices {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DialogServices").finish_non_exhaustive()
    }
}

/// Answer the user gives in the dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Confirm the booking.
    Accept,
    /// Abort the booking.
    Cancel,
}

#[derive(Debug, Default)]
struct FlowState {
    generation: u64,
    request: Option<BookingRequest>,
    quote: Option<PriceQuote>,
    accounting_info: Option<AccountingInfo>,
    pending: Option<oneshot::Sender<Decision>>,
}

impl FlowState {
    fn loaded(&self) -> Option<LoadedFlow<'_>> {
        Some(LoadedFlow {
            request: self.request.as_ref()?,
            quote: self.quote.as_ref()?,
            accounting_info: self.accounting_info.as_ref()?,
        })
    }
}

/// Loads everything a purchase confirmation needs and gates the booking on the user's answer.
///
/// [`open`](Self::open) resolves `true` without showing anything when the booking does not
/// change the price. Otherwise it makes the dialog visible and resolves once the view calls
/// [`accept`](Self::accept) or [`cancel`](Self::cancel). Share the view model as an
/// `Arc<PurchaseConfirmationViewModel>` between the task awaiting `open` and the view.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
///
/// use booking_dialog::{
///     DialogServices, PurchaseConfirmationViewModel, i18n::Localizer, model::FeatureType,
///     services::StaticBilling,
/// };
///
/// # async fn run() -> booking_dialog::Result<()> {
/// let billing = Arc::new(StaticBilling::from_file("scenario.toml")?);
/// let dialog = Arc::new(PurchaseConfirmationViewModel::new(
///     DialogServices::from_backend(billing),
///     Localizer::default(),
/// ));
///
/// let flow = tokio::spawn({
///     let dialog = dialog.clone();
///     async move { dialog.open(FeatureType::Storage, 500, 10).await }
/// });
///
/// let mut visible = dialog.watch_visible();
/// if visible.wait_for(|shown| *shown).await.is_ok() {
///     println!("{}", dialog.booking_text());
///     dialog.accept()?;
/// }
/// # let _ = flow.await;
/// # Ok(())
/// # }
/// ```
pub struct PurchaseConfirmationViewModel {
    services: DialogServices,
    localizer: Localizer,
    visible: Observable<bool>,
    loaded: Observable<bool>,
    state: Mutex<FlowState>,
}

impl fmt::Debug for PurchaseConfirmationViewModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PurchaseConfirmationViewModel")
            .field("visible", &self.visible.get())
            .field("loaded", &self.loaded.get())
            .finish_non_exhaustive()
    }
}

impl PurchaseConfirmationViewModel {
    /// Creates a hidden, unloaded view model.
    #[must_use]
    pub fn new(services: DialogServices, localizer: Localizer) -> Self {
        Self {
            services,
            localizer,
            visible: Observable::new(false),
            loaded: Observable::new(false),
            state: Mutex::new(FlowState::default()),
        }
    }

    /// Starts a booking flow and resolves with the user's answer.
    ///
    /// Loads the logged-in account, customer, customer info, accounting info and the price
    /// quote, one after another. Returns `Ok(true)` right away when the booking leaves the price
    /// unchanged; otherwise shows the dialog and waits for [`accept`](Self::accept) (`true`) or
    /// [`cancel`](Self::cancel) (`false`).
    ///
    /// A later call to `open` replaces this flow.
    ///
    /// # Errors
    ///
    /// - Any upstream error from the session, billing or pricing services
    /// - [`BookingError::Superseded`] if a newer `open` call replaced this flow
    #[instrument(skip(self))]
    pub async fn open(
        &self,
        feature_type: FeatureType,
        count: i64,
        free_amount: u32,
    ) -> Result<bool> {
        let request = BookingRequest::new(feature_type, count, free_amount);
        let generation = self.begin(request);

        let (quote, accounting_info) = self.load(request).await?;

        let answer = {
            let mut state = self.state.lock();
            if state.generation != generation {
                warn!("flow superseded while loading");
                return Err(BookingError::Superseded);
            }
            state.quote = Some(quote);
            state.accounting_info = Some(accounting_info);
            self.loaded.set(true);

            if !state.loaded().is_some_and(|flow| flow.is_price_change()) {
                info!("price unchanged, proceeding without confirmation");
                return Ok(true);
            }

            let (tx, rx) = oneshot::channel();
            state.pending = Some(tx);
            self.visible.set(true);
            rx
        };

        debug!("awaiting user decision");
        if let Ok(decision) = answer.await {
            info!(?decision, "user decided");
            Ok(decision == Decision::Accept)
        } else {
            warn!("flow superseded while awaiting decision");
            Err(BookingError::Superseded)
        }
    }

    fn begin(&self, request: BookingRequest) -> u64 {
        let mut state = self.state.lock();
        state.generation = state.generation.wrapping_add(1);
        state.request = Some(request);
        state.quote = None;
        state.accounting_info = None;
        self.loaded.set(false);
        self.visible.set(false);
        // Dropping the sender resolves the replaced flow with `Superseded`.
        if state.pending.take().is_some() {
            warn!("replacing flow that awaits a decision");
        }
        state.generation
    }

    async fn load(&self, request: BookingRequest) -> Result<(PriceQuote, AccountingInfo)> {
        let account = self.services.session.logged_in_user()?;
        debug!(user_id = %account.user_id, "account resolved");

        let customer = self.services.billing.load_customer(&account).await?;
        debug!(customer_id = %customer.id, "customer loaded");

        let customer_info = self.services.billing.load_customer_info(&customer).await?;
        debug!(customer_info_id = %customer_info.id, "customer info loaded");

        let accounting_info = self.services.billing.load_accounting_info(&customer_info).await?;
        debug!(payment_method = %accounting_info.payment_method, "accounting info loaded");

        let quote = self.services.pricing.quote(request.feature_type, request.count).await?;
        debug!(period_end = %quote.period_end_date, "price quote loaded");

        Ok((quote, accounting_info))
    }

    /// Confirms the booking and hides the dialog.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::NoPendingDecision`] if no flow is waiting for the user.
    pub fn accept(&self) -> Result<()> {
        self.resolve(Decision::Accept)
    }

    /// Aborts the booking and hides the dialog.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::NoPendingDecision`] if no flow is waiting for the user.
    pub fn cancel(&self) -> Result<()> {
        self.resolve(Decision::Cancel)
    }

    fn resolve(&self, decision: Decision) -> Result<()> {
        let Some(pending) = self.state.lock().pending.take() else {
            warn!(?decision, "no booking decision pending");
            return Err(BookingError::NoPendingDecision);
        };
        self.visible.set(false);
        if pending.send(decision).is_err() {
            debug!(?decision, "open future dropped before the decision arrived");
        }
        Ok(())
    }

    /// Returns whether the dialog is shown.
    #[must_use]
    pub fn visible(&self) -> bool {
        self.visible.get()
    }

    /// Returns whether quote and accounting info are loaded.
    #[must_use]
    pub fn loaded(&self) -> bool {
        self.loaded.get()
    }

    /// Subscribes to visibility changes.
    #[must_use]
    pub fn watch_visible(&self) -> watch::Receiver<bool> {
        self.visible.subscribe()
    }

    /// Subscribes to loaded-state changes.
    #[must_use]
    pub fn watch_loaded(&self) -> watch::Receiver<bool> {
        self.loaded.subscribe()
    }

    /// The booking raises the price.
    #[must_use]
    pub fn is_buy(&self) -> bool {
        self.state.lock().loaded().is_some_and(|flow| flow.is_buy())
    }

    /// The booking lowers the price.
    #[must_use]
    pub fn is_unbuy(&self) -> bool {
        self.state.lock().loaded().is_some_and(|flow| flow.is_unbuy())
    }

    /// The booking changes the price.
    #[must_use]
    pub fn is_price_change(&self) -> bool {
        self.state.lock().loaded().is_some_and(|flow| flow.is_price_change())
    }

    /// Price of the line item for `feature_type`, zero if `spec` has none.
    #[must_use]
    pub fn price_for_feature(spec: &PriceSpec, feature_type: FeatureType) -> Decimal {
        price_for_feature(spec, feature_type)
    }

    /// Whether the requested feature is billed at one flat price in `spec`.
    ///
    /// Without a line item only users count as single-price. False before the first `open`.
    #[must_use]
    pub fn is_single_price_type(&self, spec: &PriceSpec) -> bool {
        self.state
            .lock()
            .request
            .is_some_and(|request| spec.is_single_price_type(request.feature_type))
    }

    fn render(&self, text: impl FnOnce(&LoadedFlow<'_>, &Localizer) -> String) -> String {
        let state = self.state.lock();
        state.loaded().map_or_else(
            || self.localizer.translator().text(TextId::Loading),
            |flow| text(&flow, &self.localizer),
        )
    }

    /// What is being booked, e.g. "Storage capacity 500 GB".
    #[must_use]
    pub fn booking_text(&self) -> String {
        self.render(|flow, l10n| flow.booking_text(l10n))
    }

    /// Subscription period and renewal.
    #[must_use]
    pub fn subscription_text(&self) -> String {
        self.render(|flow, l10n| flow.subscription_text(l10n))
    }

    /// End of the current subscription period.
    #[must_use]
    pub fn subscription_info_text(&self) -> String {
        self.render(|flow, l10n| flow.subscription_info_text(l10n))
    }

    /// Price per period with tax note.
    #[must_use]
    pub fn price_text(&self) -> String {
        self.render(|flow, l10n| flow.price_text(l10n))
    }

    /// Immediate charge, the date a reduction applies, or nothing.
    #[must_use]
    pub fn price_info_text(&self) -> String {
        self.render(|flow, l10n| flow.price_info_text(l10n))
    }

    /// Payment method shown to the user.
    #[must_use]
    pub fn payment_method_info_text(&self) -> String {
        self.render(|flow, l10n| flow.payment_method_info_text(l10n))
    }

    /// Translation key of the submit button.
    #[must_use]
    pub fn submit_button_text_id(&self) -> TextId {
        texts::submit_button_text_id(self.is_buy())
    }

    /// Renders every text and flag in one consistent snapshot.
    #[must_use]
    pub fn texts(&self) -> DialogTexts {
        let visible = self.visible.get();
        let state = self.state.lock();
        state.loaded().map_or_else(
            || DialogTexts::loading(&self.localizer, visible),
            |flow| DialogTexts::render(&flow, &self.localizer, visible),
        )
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use tokio::sync::Notify;

    use super::*;
    use crate::model::{
        Account, Customer, CustomerInfo, PaymentInterval, PaymentMethod, PriceItem,
    };

    struct FakeBackend {
        quote: PriceQuote,
        logged_in: bool,
        gate: Mutex<Option<oneshot::Receiver<()>>>,
        entered: Notify,
        quote_calls: AtomicUsize,
    }

    impl FakeBackend {
        fn new(quote: PriceQuote) -> Self {
            Self {
                quote,
                logged_in: true,
                gate: Mutex::new(None),
                entered: Notify::new(),
                quote_calls: AtomicUsize::new(0),
            }
        }

        /// Makes the first quote call wait until the returned sender fires.
        fn gated(quote: PriceQuote) -> (Self, oneshot::Sender<()>) {
            let backend = Self::new(quote);
            let release = backend.arm_gate();
            (backend, release)
        }

        /// Makes the next quote call wait until the returned sender fires.
        fn arm_gate(&self) -> oneshot::Sender<()> {
            let (tx, rx) = oneshot::channel();
            *self.gate.lock() = Some(rx);
            tx
        }
    }

    impl SessionService for FakeBackend {
        fn logged_in_user(&self) -> Result<Account> {
            if self.logged_in {
                Ok(Account { user_id: "user-1".to_owned(), customer_id: "cust-1".to_owned() })
            } else {
                Err(BookingError::NotLoggedIn)
            }
        }
    }

    #[async_trait]
    impl BillingDirectory for FakeBackend {
        async fn load_customer(&self, account: &Account) -> Result<Customer> {
            Ok(Customer { id: account.customer_id.clone(), customer_info_id: "info-1".to_owned() })
        }

        async fn load_customer_info(&self, customer: &Customer) -> Result<CustomerInfo> {
            Ok(CustomerInfo {
                id: customer.customer_info_id.clone(),
                company: None,
                accounting_info_id: "acc-1".to_owned(),
            })
        }

        async fn load_accounting_info(&self, info: &CustomerInfo) -> Result<AccountingInfo> {
            Ok(AccountingInfo {
                id: info.accounting_info_id.clone(),
                payment_method: PaymentMethod::Sepa,
                payment_method_info: None,
            })
        }
    }

    #[async_trait]
    impl PricingService for FakeBackend {
        async fn quote(&self, _feature_type: FeatureType, _count: i64) -> Result<PriceQuote> {
            self.quote_calls.fetch_add(1, Ordering::SeqCst);
            let gate = self.gate.lock().take();
            self.entered.notify_one();
            if let Some(gate) = gate {
                let _ = gate.await;
            }
            Ok(self.quote.clone())
        }
    }

    fn users_quote(current_cents: i64, future_cents: i64) -> PriceQuote {
        let spec = |count, cents| PriceSpec {
            tax_included: true,
            payment_interval: PaymentInterval::Monthly,
            items: vec![PriceItem {
                feature_type: FeatureType::Users,
                count,
                price: Decimal::new(cents, 2),
                single_type: true,
            }],
        };
        PriceQuote {
            current_price_next_period: spec(1, current_cents),
            future_price_next_period: spec(2, future_cents),
            current_period_added_price: None,
            period_end_date: Utc.with_ymd_and_hms(2026, 11, 30, 0, 0, 0).unwrap(),
        }
    }

    fn view_model(backend: FakeBackend) -> (Arc<FakeBackend>, Arc<PurchaseConfirmationViewModel>) {
        let backend = Arc::new(backend);
        let vm = PurchaseConfirmationViewModel::new(
            DialogServices::from_backend(backend.clone()),
            Localizer::default(),
        );
        (backend, Arc::new(vm))
    }

    async fn wait_visible(vm: &PurchaseConfirmationViewModel) {
        let mut visible = vm.watch_visible();
        visible.wait_for(|shown| *shown).await.unwrap();
    }

    // ========================================================================
    // Initial State
    // ========================================================================

    #[test]
    fn test_initial_state_shows_loading() {
        let (_, vm) = view_model(FakeBackend::new(users_quote(100, 200)));

        assert!(!vm.visible());
        assert!(!vm.loaded());
        assert!(!vm.is_buy());
        assert!(!vm.is_unbuy());
        assert!(!vm.is_price_change());
        for text in [
            vm.booking_text(),
            vm.subscription_text(),
            vm.subscription_info_text(),
            vm.price_text(),
            vm.price_info_text(),
            vm.payment_method_info_text(),
        ] {
            assert_eq!(text, "Loading ...");
        }
        assert_eq!(vm.submit_button_text_id(), TextId::OrderAction);
        assert!(!vm.texts().loaded);
    }

    // ========================================================================
    // Open / Accept / Cancel
    // ========================================================================

    #[tokio::test]
    async fn test_unchanged_price_proceeds_silently() {
        let (_, vm) = view_model(FakeBackend::new(users_quote(100, 100)));

        let proceed = vm.open(FeatureType::Users, 1, 0).await.unwrap();

        assert!(proceed);
        assert!(vm.loaded());
        assert!(!vm.visible());
        assert!(!vm.is_price_change());
    }

    #[tokio::test]
    async fn test_accept_resolves_true() {
        let (_, vm) = view_model(FakeBackend::new(users_quote(100, 200)));

        let flow = tokio::spawn({
            let vm = vm.clone();
            async move { vm.open(FeatureType::Users, 1, 0).await }
        });
        wait_visible(&vm).await;

        assert!(vm.is_buy());
        assert_eq!(vm.submit_button_text_id(), TextId::BuyAction);
        assert_eq!(vm.booking_text(), "1 Users");
        assert_eq!(vm.payment_method_info_text(), "SEPA direct debit");

        vm.accept().unwrap();
        assert!(flow.await.unwrap().unwrap());
        assert!(!vm.visible());
    }

    #[tokio::test]
    async fn test_cancel_resolves_false() {
        let (_, vm) = view_model(FakeBackend::new(users_quote(200, 100)));

        let flow = tokio::spawn({
            let vm = vm.clone();
            async move { vm.open(FeatureType::Users, -1, 0).await }
        });
        wait_visible(&vm).await;

        assert!(vm.is_unbuy());
        assert_eq!(vm.submit_button_text_id(), TextId::OrderAction);

        vm.cancel().unwrap();
        assert!(!flow.await.unwrap().unwrap());
        assert!(!vm.visible());
    }

    #[tokio::test]
    async fn test_decision_without_pending_flow_fails() {
        let (_, vm) = view_model(FakeBackend::new(users_quote(100, 100)));

        assert!(matches!(vm.accept(), Err(BookingError::NoPendingDecision)));
        assert!(matches!(vm.cancel(), Err(BookingError::NoPendingDecision)));

        vm.open(FeatureType::Users, 1, 0).await.unwrap();
        assert!(matches!(vm.accept(), Err(BookingError::NoPendingDecision)));
        assert!(!vm.visible());
    }

    #[tokio::test]
    async fn test_decision_is_delivered_once() {
        let (_, vm) = view_model(FakeBackend::new(users_quote(100, 200)));

        let flow = tokio::spawn({
            let vm = vm.clone();
            async move { vm.open(FeatureType::Users, 1, 0).await }
        });
        wait_visible(&vm).await;

        vm.accept().unwrap();
        assert!(matches!(vm.cancel(), Err(BookingError::NoPendingDecision)));
        assert!(flow.await.unwrap().unwrap());
    }

    #[tokio::test]
    async fn test_upstream_error_propagates() {
        let mut backend = FakeBackend::new(users_quote(100, 200));
        backend.logged_in = false;
        let (backend, vm) = view_model(backend);

        let result = vm.open(FeatureType::Users, 1, 0).await;

        assert!(matches!(result, Err(BookingError::NotLoggedIn)));
        assert!(!vm.loaded());
        assert!(!vm.visible());
        assert_eq!(backend.quote_calls.load(Ordering::SeqCst), 0);
    }

    // ========================================================================
    // Reentrancy
    // ========================================================================

    #[tokio::test]
    async fn test_reopen_supersedes_pending_decision() {
        let (_, vm) = view_model(FakeBackend::new(users_quote(100, 200)));

        let first = tokio::spawn({
            let vm = vm.clone();
            async move { vm.open(FeatureType::Users, 1, 0).await }
        });
        wait_visible(&vm).await;

        let second = tokio::spawn({
            let vm = vm.clone();
            async move { vm.open(FeatureType::Users, 1, 0).await }
        });

        assert!(matches!(first.await.unwrap(), Err(BookingError::Superseded)));

        wait_visible(&vm).await;
        vm.cancel().unwrap();
        assert!(!second.await.unwrap().unwrap());
    }

    #[tokio::test]
    async fn test_stale_load_does_not_overwrite_newer_flow() {
        let (backend, release) = FakeBackend::gated(users_quote(100, 200));
        let (backend, vm) = view_model(backend);

        let first = tokio::spawn({
            let vm = vm.clone();
            async move { vm.open(FeatureType::Users, 1, 0).await }
        });
        backend.entered.notified().await;

        let second = tokio::spawn({
            let vm = vm.clone();
            async move { vm.open(FeatureType::Users, 5, 0).await }
        });
        wait_visible(&vm).await;
        assert_eq!(vm.booking_text(), "5 Users");

        release.send(()).unwrap();
        assert!(matches!(first.await.unwrap(), Err(BookingError::Superseded)));

        assert!(vm.visible());
        assert_eq!(vm.booking_text(), "5 Users");
        vm.accept().unwrap();
        assert!(second.await.unwrap().unwrap());
        assert_eq!(backend.quote_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_reopen_resets_loaded_state() {
        let (backend, vm) = view_model(FakeBackend::new(users_quote(100, 100)));

        assert!(vm.open(FeatureType::Users, 1, 0).await.unwrap());
        assert!(vm.loaded());
        assert_eq!(vm.booking_text(), "1 Users");

        let release = backend.arm_gate();
        let second = tokio::spawn({
            let vm = vm.clone();
            async move { vm.open(FeatureType::Users, 1, 0).await }
        });
        while backend.quote_calls.load(Ordering::SeqCst) < 2 {
            tokio::task::yield_now().await;
        }

        assert!(!vm.loaded());
        assert!(!vm.visible());
        assert_eq!(vm.booking_text(), "Loading ...");
        assert_eq!(vm.price_text(), "Loading ...");

        release.send(()).unwrap();
        assert!(second.await.unwrap().unwrap());
        assert!(vm.loaded());
    }

    // ========================================================================
    // Snapshot
    // ========================================================================

    #[tokio::test]
    async fn test_texts_snapshot() {
        let (_, vm) = view_model(FakeBackend::new(users_quote(100, 250)));

        let flow = tokio::spawn({
            let vm = vm.clone();
            async move { vm.open(FeatureType::Users, 1, 0).await }
        });
        wait_visible(&vm).await;

        let texts = vm.texts();
        assert!(texts.visible);
        assert!(texts.loaded);
        assert!(texts.is_buy && texts.is_price_change && !texts.is_unbuy);
        assert_eq!(texts.price, "1,50 € per month (incl. taxes)");
        assert_eq!(texts.subscription, "Monthly, automatic renewal");
        assert_eq!(texts.submit_button_text_id, "buy_action");
        assert_eq!(texts.submit_button, "Buy");

        vm.accept().unwrap();
        flow.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_single_price_type_uses_requested_feature() {
        let (_, vm) = view_model(FakeBackend::new(users_quote(100, 100)));
        let empty = PriceSpec {
            tax_included: true,
            payment_interval: PaymentInterval::Monthly,
            items: vec![],
        };

        assert!(!vm.is_single_price_type(&empty));

        vm.open(FeatureType::Users, 1, 0).await.unwrap();
        assert!(vm.is_single_price_type(&empty));
        assert_eq!(
            PurchaseConfirmationViewModel::price_for_feature(&empty, FeatureType::Users),
            Decimal::ZERO
        );
    }
}
