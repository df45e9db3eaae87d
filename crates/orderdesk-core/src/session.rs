//! # Order Session
//!
//! Owns the in-progress order and the current wizard step.
//!
//! ## Session Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Session State Operations                             │
//! │                                                                         │
//! │  Wizard Action            Session Method          State Change          │
//! │  ─────────────            ──────────────          ────────────          │
//! │                                                                         │
//! │  Edit customer ──────────► update_customer() ───► order.customer       │
//! │  Pick product ───────────► select_product() ────► order.product        │
//! │  Pick plan ──────────────► select_plan() ───────► order.selected_plan  │
//! │  Edit plan price ────────► override_plan_price()► selected_plan.price  │
//! │  Pick start / duration ──► set_start_date() ────► contract (+end date) │
//! │  Toggle add-on ──────────► toggle_add_on() ─────► add_ons[i].included  │
//! │  Change quantity ────────► set_add_on_quantity()► add_ons[i].quantity  │
//! │  Finalize ───────────────► finalize() ──────────► NewOrderRecord       │
//! │                                                   + reset               │
//! │                                                                         │
//! │  NOTE: every mutation recalculates order.total before returning.        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::calculations::{calculate_order_breakdown_with_tax, order_total, OrderBreakdown};
use crate::catalog::{create_default_order, find_product};
use crate::config::OrderConfig;
use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{AddOn, Contract, Customer, NewOrderRecord, Order, Product};
use crate::validation::{validate_add_on_price, validate_plan_price};
use crate::WIZARD_STEP_COUNT;

/// The wizard's state: one order being built, one step being shown.
///
/// ## Invariants
/// - `current_step` is always within `1..=4`
/// - `order.total` always equals the exact order total (as a native number)
/// - `order.contract.end_date` is always derived from start and duration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSession {
    #[serde(flatten)]
    order: Order,
    current_step: u8,
    #[serde(skip)]
    config: OrderConfig,
}

impl Default for OrderSession {
    fn default() -> Self {
        OrderSession::new(OrderConfig::default())
    }
}

impl OrderSession {
    /// Creates a session on a fresh default order at step 1.
    pub fn new(config: OrderConfig) -> Self {
        let mut session = OrderSession {
            order: create_default_order(),
            current_step: 1,
            config,
        };
        session.apply_defaults();
        session
    }

    /// Restores a persisted session, re-deriving everything derived.
    pub fn restore(order: Order, current_step: u8, config: OrderConfig) -> Self {
        let mut session = OrderSession {
            order,
            current_step: current_step.clamp(1, WIZARD_STEP_COUNT),
            config,
        };
        session.order.contract.refresh_end_date();
        session.recalculate();
        session
    }

    pub fn order(&self) -> &Order {
        &self.order
    }

    pub fn current_step(&self) -> u8 {
        self.current_step
    }

    pub fn config(&self) -> &OrderConfig {
        &self.config
    }

    /// Replaces the configuration; the order is kept.
    pub fn set_config(&mut self, config: OrderConfig) {
        self.config = config;
    }

    /// Back to an empty order at step 1.
    pub fn reset(&mut self) {
        self.order = create_default_order();
        self.current_step = 1;
        self.apply_defaults();
    }

    fn apply_defaults(&mut self) {
        self.order.contract = Contract::new(None, self.config.default_duration_months);
        self.recalculate();
    }

    // -------------------------------------------------------------------------
    // Step 1: Customer
    // -------------------------------------------------------------------------

    pub fn update_customer(&mut self, customer: Customer) {
        self.order.customer = customer;
        self.recalculate();
    }

    // -------------------------------------------------------------------------
    // Step 2: Product & Plan
    // -------------------------------------------------------------------------

    /// Selects a product. A selected plan survives only if the new product
    /// offers a plan with the same id.
    pub fn select_product(&mut self, product: Product) {
        let keep_plan = self
            .order
            .selected_plan
            .as_ref()
            .is_some_and(|plan| product.find_plan(&plan.id).is_some());

        if !keep_plan {
            self.order.selected_plan = None;
        }
        self.order.product = Some(product);
        self.recalculate();
    }

    /// Selects a catalog product by id.
    ///
    /// ## Errors
    /// [`CoreError::ProductNotFound`] when the catalog has no such product; the
    /// current selection is left untouched.
    pub fn select_product_by_id(&mut self, product_id: &str) -> CoreResult<()> {
        let product = find_product(product_id)
            .ok_or_else(|| CoreError::ProductNotFound(product_id.to_string()))?;

        self.select_product(product);
        Ok(())
    }

    /// Selects one of the current product's plans at its catalog price.
    ///
    /// ## Errors
    /// - [`CoreError::NoProductSelected`] before a product is chosen
    /// - [`CoreError::PlanNotFound`] when the product has no such plan
    pub fn select_plan(&mut self, plan_id: &str) -> CoreResult<()> {
        let product = self
            .order
            .product
            .as_ref()
            .ok_or(CoreError::NoProductSelected)?;

        let plan = product
            .find_plan(plan_id)
            .cloned()
            .ok_or_else(|| CoreError::PlanNotFound {
                product_id: product.id.clone(),
                plan_id: plan_id.to_string(),
            })?;

        self.order.selected_plan = Some(plan);
        self.recalculate();
        Ok(())
    }

    /// Overrides the monthly price of the selected plan for this order only.
    pub fn override_plan_price(&mut self, price: Money) -> CoreResult<()> {
        validate_plan_price(price)?;

        let plan = self
            .order
            .selected_plan
            .as_mut()
            .ok_or_else(|| ValidationError::Required {
                field: "plan".to_string(),
            })?;

        plan.price = price;
        self.recalculate();
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Step 3: Contract
    // -------------------------------------------------------------------------

    pub fn set_start_date(&mut self, start_date: Option<NaiveDate>) {
        self.order.contract.start_date = start_date;
        self.order.contract.refresh_end_date();
        self.recalculate();
    }

    /// Sets the contract length. Out-of-range values are kept (and reported
    /// by step validation); a non-positive duration clears the end date.
    pub fn set_duration_months(&mut self, months: i32) {
        self.order.contract.duration_months = months;
        self.order.contract.refresh_end_date();
        self.recalculate();
    }

    // -------------------------------------------------------------------------
    // Step 4: Add-ons
    // -------------------------------------------------------------------------

    fn add_on_mut(&mut self, add_on_id: &str) -> CoreResult<&mut AddOn> {
        self.order
            .add_ons
            .iter_mut()
            .find(|add_on| add_on.id == add_on_id)
            .ok_or_else(|| CoreError::AddOnNotFound(add_on_id.to_string()))
    }

    /// Flips inclusion of an add-on and returns the new state. Including an
    /// add-on with quantity 0 bumps its quantity to 1.
    pub fn toggle_add_on(&mut self, add_on_id: &str) -> CoreResult<bool> {
        let add_on = self.add_on_mut(add_on_id)?;
        add_on.included = !add_on.included;
        if add_on.included && add_on.quantity == 0 {
            add_on.quantity = 1;
        }
        let included = add_on.included;

        self.recalculate();
        Ok(included)
    }

    /// Sets the quantity of an add-on; negative input becomes 0.
    pub fn set_add_on_quantity(&mut self, add_on_id: &str, quantity: i64) -> CoreResult<()> {
        let quantity = u32::try_from(quantity.max(0)).unwrap_or(u32::MAX);
        self.add_on_mut(add_on_id)?.quantity = quantity;
        self.recalculate();
        Ok(())
    }

    /// Overrides the unit price of an add-on for this order only.
    pub fn set_add_on_price(&mut self, add_on_id: &str, price: Money) -> CoreResult<()> {
        validate_add_on_price(price)?;
        self.add_on_mut(add_on_id)?.price = price;
        self.recalculate();
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Navigation
    // -------------------------------------------------------------------------

    /// Jumps to a step in `1..=4`.
    pub fn go_to_step(&mut self, step: u8) -> CoreResult<()> {
        if !(1..=WIZARD_STEP_COUNT).contains(&step) {
            return Err(CoreError::InvalidStep(step));
        }
        self.current_step = step;
        Ok(())
    }

    /// Advances one step, staying on the last one. Returns the new step.
    pub fn next_step(&mut self) -> u8 {
        if self.current_step < WIZARD_STEP_COUNT {
            self.current_step += 1;
        }
        self.current_step
    }

    /// Goes back one step, staying on the first one. Returns the new step.
    pub fn prev_step(&mut self) -> u8 {
        if self.current_step > 1 {
            self.current_step -= 1;
        }
        self.current_step
    }

    // -------------------------------------------------------------------------
    // Totals & Finalization
    // -------------------------------------------------------------------------

    fn recalculate(&mut self) {
        self.order.total = order_total(&self.order).to_number();
    }

    /// Exact monthly total of the current order.
    pub fn total(&self) -> Money {
        order_total(&self.order)
    }

    /// Breakdown at the configured tax rate.
    pub fn breakdown(&self) -> CoreResult<OrderBreakdown> {
        Ok(calculate_order_breakdown_with_tax(
            &self.order,
            self.config.tax_rate_percent,
        )?)
    }

    /// Freezes the order and its breakdown into a history record, then resets
    /// the session for the next order.
    ///
    /// ## Errors
    /// [`CoreError::NoProductSelected`] or a missing-plan validation error
    /// when there is nothing to sell yet. The session is left untouched.
    pub fn finalize(&mut self) -> CoreResult<NewOrderRecord> {
        if self.order.product.is_none() {
            return Err(CoreError::NoProductSelected);
        }
        if self.order.selected_plan.is_none() {
            return Err(ValidationError::Required {
                field: "plan".to_string(),
            }
            .into());
        }

        let breakdown = self.breakdown()?;
        let record = NewOrderRecord {
            id: None,
            created_at: None,
            order: self.order.clone(),
            breakdown: breakdown.summary(),
        };

        self.reset();
        Ok(record)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::sample_products;
    use rust_decimal_macros::dec;

    fn session_with_plan() -> OrderSession {
        let mut session = OrderSession::default();
        session.select_product(find_product("api-gateway").unwrap());
        session.select_plan("gateway-professional").unwrap();
        session
    }

    #[test]
    fn test_new_session() {
        let session = OrderSession::default();
        assert_eq!(session.current_step(), 1);
        assert_eq!(session.order().total, 0.0);
        assert!(session.order().selected_plan.is_none());
        assert_eq!(session.order().contract.duration_months, 12);
    }

    #[test]
    fn test_default_duration_follows_config() {
        let config = OrderConfig {
            default_duration_months: 24,
            ..OrderConfig::default()
        };
        let session = OrderSession::new(config);
        assert_eq!(session.order().contract.duration_months, 24);
    }

    #[test]
    fn test_select_plan_updates_total() {
        let session = session_with_plan();
        assert_eq!(session.order().total, 299.0);
        assert_eq!(session.total(), Money::from_cents(29_900));
    }

    #[test]
    fn test_select_plan_errors() {
        let mut session = OrderSession::default();
        assert!(matches!(
            session.select_plan("gateway-starter"),
            Err(CoreError::NoProductSelected)
        ));

        session.select_product(find_product("api-gateway").unwrap());
        assert!(matches!(
            session.select_plan("analytics-pro"),
            Err(CoreError::PlanNotFound { .. })
        ));
    }

    #[test]
    fn test_select_product_by_id() {
        let mut session = OrderSession::default();
        session.select_product_by_id("api-gateway").unwrap();
        assert_eq!(
            session.order().product.as_ref().map(|p| p.id.as_str()),
            Some("api-gateway")
        );

        session.select_plan("gateway-professional").unwrap();
        let err = session.select_product_by_id("quantum-router").unwrap_err();
        assert!(matches!(err, CoreError::ProductNotFound(ref id) if id == "quantum-router"));
        assert_eq!(err.to_string(), "Product not found: quantum-router");
        assert!(session.order().selected_plan.is_some());
        assert_eq!(session.order().total, 299.0);
    }

    #[test]
    fn test_switching_product_drops_foreign_plan() {
        let mut session = session_with_plan();
        session.select_product(find_product("analytics-suite").unwrap());
        assert!(session.order().selected_plan.is_none());
        assert_eq!(session.order().total, 0.0);
    }

    #[test]
    fn test_override_plan_price() {
        let mut session = session_with_plan();
        session
            .override_plan_price(Money::parse("249.50").unwrap())
            .unwrap();
        assert_eq!(session.order().total, 249.5);

        assert!(session
            .override_plan_price(Money::from_cents(10_000_000))
            .is_err());
        assert_eq!(session.order().total, 249.5);

        let mut empty = OrderSession::default();
        assert!(empty.override_plan_price(Money::from_cents(100)).is_err());
    }

    #[test]
    fn test_contract_dates() {
        let mut session = OrderSession::default();
        let start = NaiveDate::from_ymd_opt(2024, 1, 15);

        session.set_start_date(start);
        assert_eq!(
            session.order().contract.end_date,
            NaiveDate::from_ymd_opt(2025, 1, 15)
        );

        session.set_duration_months(6);
        assert_eq!(
            session.order().contract.end_date,
            NaiveDate::from_ymd_opt(2024, 7, 15)
        );

        session.set_duration_months(0);
        assert!(session.order().contract.end_date.is_none());
    }

    #[test]
    fn test_toggle_add_on_bumps_quantity() {
        let mut session = session_with_plan();

        assert!(session.toggle_add_on("support-hours").unwrap());
        let add_on = &session.order().add_ons[3];
        assert_eq!(add_on.quantity, 1);
        assert_eq!(session.order().total, 449.0);

        assert!(!session.toggle_add_on("support-hours").unwrap());
        assert_eq!(session.order().total, 299.0);

        assert!(matches!(
            session.toggle_add_on("unknown"),
            Err(CoreError::AddOnNotFound(_))
        ));
    }

    #[test]
    fn test_add_on_quantity_and_price() {
        let mut session = session_with_plan();
        session.toggle_add_on("api-calls").unwrap();
        session.set_add_on_quantity("api-calls", 1000).unwrap();
        session.toggle_add_on("storage-gb").unwrap();
        session.set_add_on_quantity("storage-gb", 50).unwrap();
        assert_eq!(session.total().to_fixed(2), "305.00");

        session.set_add_on_quantity("storage-gb", -4).unwrap();
        assert_eq!(session.order().add_ons[1].quantity, 0);
        assert_eq!(session.order().total, 300.0);

        session
            .set_add_on_price("api-calls", Money::parse("0.002").unwrap())
            .unwrap();
        assert_eq!(session.order().total, 301.0);

        assert!(session
            .set_add_on_price("api-calls", Money::from_cents(-1))
            .is_err());
    }

    #[test]
    fn test_navigation_is_bounded() {
        let mut session = OrderSession::default();
        assert_eq!(session.prev_step(), 1);
        assert_eq!(session.next_step(), 2);
        assert_eq!(session.next_step(), 3);
        assert_eq!(session.next_step(), 4);
        assert_eq!(session.next_step(), 4);

        session.go_to_step(2).unwrap();
        assert_eq!(session.current_step(), 2);
        assert!(matches!(session.go_to_step(5), Err(CoreError::InvalidStep(5))));
        assert!(session.go_to_step(0).is_err());
        assert_eq!(session.current_step(), 2);
    }

    #[test]
    fn test_breakdown_uses_configured_tax() {
        let config = OrderConfig {
            tax_rate_percent: dec!(10),
            ..OrderConfig::default()
        };
        let mut session = OrderSession::new(config);
        session.select_product(sample_products().remove(0));
        session.select_plan("gateway-starter").unwrap();

        let breakdown = session.breakdown().unwrap();
        assert_eq!(breakdown.tax.to_fixed(2), "9.90");
        assert_eq!(breakdown.total.to_fixed(2), "108.90");
        assert_eq!(session.order().total, 99.0);
    }

    #[test]
    fn test_finalize_produces_record_and_resets() {
        let mut session = session_with_plan();
        session.toggle_add_on("api-calls").unwrap();
        session.set_add_on_quantity("api-calls", 1000).unwrap();
        session.go_to_step(4).unwrap();

        let record = session.finalize().unwrap();
        assert!(record.id.is_none());
        assert_eq!(record.order.total, 300.0);
        assert_eq!(record.breakdown.subtotal, 300.0);
        assert_eq!(record.breakdown.mrr, 25.0);

        assert_eq!(session.current_step(), 1);
        assert!(session.order().product.is_none());
    }

    #[test]
    fn test_finalize_requires_plan() {
        let mut session = OrderSession::default();
        assert!(matches!(
            session.finalize(),
            Err(CoreError::NoProductSelected)
        ));

        session.select_product(find_product("api-gateway").unwrap());
        assert!(matches!(session.finalize(), Err(CoreError::Validation(_))));
        assert!(session.order().product.is_some());
    }

    #[test]
    fn test_restore_rederives_state() {
        let mut order = session_with_plan().order().clone();
        order.total = 0.0;
        order.contract.start_date = NaiveDate::from_ymd_opt(2024, 3, 1);
        order.contract.end_date = None;

        let session = OrderSession::restore(order, 9, OrderConfig::default());
        assert_eq!(session.current_step(), 4);
        assert_eq!(session.order().total, 299.0);
        assert_eq!(
            session.order().contract.end_date,
            NaiveDate::from_ymd_opt(2025, 3, 1)
        );
    }
}
