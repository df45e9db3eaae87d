//! # Order Calculation Engine
//!
//! Pure functions from an `Order` snapshot to its totals.
//!
//! ## Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  selected_plan.price ──────────────────────────► plan_total             │
//! │                                                     │                   │
//! │  add_ons ─► billable? ─► price × quantity ─► Σ ─► add_ons_total         │
//! │                                                     │                   │
//! │                             subtotal = plan_total + add_ons_total       │
//! │                             tax      = subtotal × rate%                 │
//! │                             total    = subtotal + tax                   │
//! │                             mrr      = total ÷ duration (0 if ≤ 0)      │
//! │                                                                         │
//! │  Everything above is Money. BreakdownSummary is the f64 projection     │
//! │  for the display and history layers.                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The engine borrows the order and never mutates it; a missing plan
//! contributes zero instead of failing.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;
use ts_rs::TS;

use crate::error::MoneyResult;
use crate::money::Money;
use crate::types::{AddOn, Order};

// =============================================================================
// Line Items
// =============================================================================

/// `price × quantity` for a billable add-on, zero otherwise.
///
/// ## Example
/// ```rust
/// use orderdesk_core::calculations::line_item_total;
/// use orderdesk_core::catalog::sample_add_ons;
///
/// let mut api_calls = sample_add_ons().remove(0); // $0.001 per call
/// api_calls.quantity = 1000;
/// assert!(line_item_total(&api_calls).is_zero()); // not included yet
///
/// api_calls.included = true;
/// assert_eq!(line_item_total(&api_calls).to_fixed(2), "1.00");
/// ```
pub fn line_item_total(add_on: &AddOn) -> Money {
    if !add_on.is_billable() {
        return Money::zero();
    }
    add_on.price * add_on.quantity
}

/// Sum of all billable line totals.
pub fn add_ons_total(add_ons: &[AddOn]) -> Money {
    add_ons.iter().map(line_item_total).sum()
}

/// Plan price (zero without a plan) plus add-ons.
pub fn order_total(order: &Order) -> Money {
    plan_total(order) + add_ons_total(&order.add_ons)
}

fn plan_total(order: &Order) -> Money {
    order
        .selected_plan
        .as_ref()
        .map(|plan| plan.price)
        .unwrap_or_default()
}

fn duration_divisor(duration_months: i32) -> Option<NonZeroU32> {
    u32::try_from(duration_months).ok().and_then(NonZeroU32::new)
}

/// Order total spread over the contract: `total ÷ duration_months`.
///
/// A zero or negative duration yields zero, not an error.
pub fn monthly_recurring_revenue(order: &Order) -> Money {
    match duration_divisor(order.contract.duration_months) {
        Some(months) => order_total(order).split(months),
        None => Money::zero(),
    }
}

/// Order total over the whole contract: `total × duration_months`.
pub fn contract_value(order: &Order) -> Money {
    match duration_divisor(order.contract.duration_months) {
        Some(months) => order_total(order) * months.get(),
        None => Money::zero(),
    }
}

// =============================================================================
// Tax & Discounts
// =============================================================================

/// `subtotal × rate_percent / 100`, unrounded.
///
/// ## Example
/// ```rust
/// use orderdesk_core::calculations::calculate_tax;
/// use orderdesk_core::Money;
/// use rust_decimal::Decimal;
///
/// let tax = calculate_tax(Money::from_cents(10_000), Decimal::new(825, 2)).unwrap();
/// assert_eq!(tax.to_fixed(2), "8.25");
/// ```
pub fn calculate_tax(subtotal: Money, rate_percent: Decimal) -> MoneyResult<Money> {
    if rate_percent.is_zero() {
        return Ok(Money::zero());
    }
    subtotal.multiply(rate_percent)?.divide(100)
}

/// Percentage knocked off `original` to reach `discounted`; zero when the
/// original price is zero.
pub fn discount_percentage(original: Money, discounted: Money) -> MoneyResult<Decimal> {
    if original.is_zero() {
        return Ok(Decimal::ZERO);
    }
    let ratio = original.subtract(discounted)?.divide(original)?;
    Ok(ratio.multiply(100)?.as_decimal())
}

// =============================================================================
// Breakdown
// =============================================================================

/// Exact totals of an order. Derived on demand, never stored as source of truth.
///
/// ## Invariants
/// - `subtotal == plan_total + add_ons_total`
/// - `total == subtotal + tax`
/// - `mrr == total ÷ duration_months`, zero when the duration is not positive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OrderBreakdown {
    pub plan_total: Money,
    pub add_ons_total: Money,
    pub subtotal: Money,
    pub tax: Money,
    pub total: Money,
    pub mrr: Money,
}

impl OrderBreakdown {
    /// Native-number projection for display and history.
    pub fn summary(&self) -> BreakdownSummary {
        BreakdownSummary::from(self)
    }
}

/// `OrderBreakdown` as plain numbers (`planTotal: 299`, `mrr: 25`).
///
/// ## Note
/// Boundary type only. Never compute with these fields.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct BreakdownSummary {
    pub plan_total: f64,
    pub add_ons_total: f64,
    pub subtotal: f64,
    pub tax: f64,
    pub total: f64,
    pub mrr: f64,
}

impl From<&OrderBreakdown> for BreakdownSummary {
    fn from(breakdown: &OrderBreakdown) -> Self {
        BreakdownSummary {
            plan_total: breakdown.plan_total.to_number(),
            add_ons_total: breakdown.add_ons_total.to_number(),
            subtotal: breakdown.subtotal.to_number(),
            tax: breakdown.tax.to_number(),
            total: breakdown.total.to_number(),
            mrr: breakdown.mrr.to_number(),
        }
    }
}

/// Breakdown without tax.
pub fn calculate_order_breakdown(order: &Order) -> OrderBreakdown {
    let plan_total = plan_total(order);
    let add_ons_total = add_ons_total(&order.add_ons);
    let subtotal = plan_total + add_ons_total;

    breakdown_from(order, plan_total, add_ons_total, subtotal, Money::zero())
}

/// Breakdown with tax at `tax_rate_percent` (8.25 means 8.25%).
pub fn calculate_order_breakdown_with_tax(
    order: &Order,
    tax_rate_percent: Decimal,
) -> MoneyResult<OrderBreakdown> {
    let plan_total = plan_total(order);
    let add_ons_total = add_ons_total(&order.add_ons);
    let subtotal = plan_total + add_ons_total;
    let tax = calculate_tax(subtotal, tax_rate_percent)?;

    Ok(breakdown_from(order, plan_total, add_ons_total, subtotal, tax))
}

fn breakdown_from(
    order: &Order,
    plan_total: Money,
    add_ons_total: Money,
    subtotal: Money,
    tax: Money,
) -> OrderBreakdown {
    let total = subtotal + tax;
    let mrr = duration_divisor(order.contract.duration_months)
        .map(|months| total.split(months))
        .unwrap_or_default();

    OrderBreakdown {
        plan_total,
        add_ons_total,
        subtotal,
        tax,
        total,
        mrr,
    }
}

// =============================================================================
// Input Predicates
// =============================================================================

/// Finite and not negative.
pub fn is_valid_price(price: f64) -> bool {
    price.is_finite() && price >= 0.0
}

/// A whole number that is not negative.
pub fn is_valid_quantity(quantity: f64) -> bool {
    quantity.is_finite() && quantity >= 0.0 && quantity.fract() == 0.0
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::create_default_order;
    use crate::types::{Contract, Plan};
    use chrono::NaiveDate;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn money(value: &str) -> Money {
        Money::parse(value).unwrap()
    }

    fn add_on(id: &str, price: &str, quantity: u32, included: bool) -> AddOn {
        AddOn {
            id: id.to_string(),
            name: id.to_string(),
            description: String::new(),
            price: money(price),
            quantity,
            included,
        }
    }

    fn plan(price: &str) -> Plan {
        Plan {
            id: "plan-1".to_string(),
            name: "Pro Plan".to_string(),
            price: money(price),
        }
    }

    fn mixed_add_ons() -> Vec<AddOn> {
        vec![
            add_on("api-calls", "0.001", 1000, true),
            add_on("storage-gb", "0.10", 50, true),
            add_on("support-hours", "150", 2, false),
            add_on("custom-integration", "500", 0, true),
        ]
    }

    fn order_with(plan_price: Option<&str>, add_ons: Vec<AddOn>, months: i32) -> Order {
        let mut order = create_default_order();
        order.selected_plan = plan_price.map(plan);
        order.add_ons = add_ons;
        order.contract = Contract::new(NaiveDate::from_ymd_opt(2024, 1, 1), months);
        order
    }

    #[test]
    fn test_add_ons_total_only_counts_billable_items() {
        let add_ons = mixed_add_ons();
        assert_eq!(add_ons_total(&add_ons).to_fixed(2), "6.00");

        let excluded: Vec<_> = add_ons
            .iter()
            .cloned()
            .map(|a| AddOn { included: false, ..a })
            .collect();
        assert!(add_ons_total(&excluded).is_zero());

        let zero_quantity: Vec<_> = add_ons
            .iter()
            .cloned()
            .map(|a| AddOn { quantity: 0, ..a })
            .collect();
        assert!(add_ons_total(&zero_quantity).is_zero());
    }

    #[test]
    fn test_line_item_total() {
        assert_eq!(line_item_total(&add_on("x", "0.10", 50, true)), money("5"));
        assert!(line_item_total(&add_on("x", "150", 2, false)).is_zero());
        assert!(line_item_total(&add_on("x", "500", 0, true)).is_zero());
    }

    #[test]
    fn test_order_total() {
        let add_ons = mixed_add_ons()[..2].to_vec();
        let order = order_with(Some("299"), add_ons.clone(), 12);
        assert_eq!(order_total(&order).to_fixed(2), "305.00");

        let no_plan = order_with(None, add_ons, 12);
        assert_eq!(order_total(&no_plan).to_fixed(2), "6.00");
    }

    #[test]
    fn test_monthly_recurring_revenue() {
        let order = order_with(Some("1200"), Vec::new(), 12);
        assert_eq!(monthly_recurring_revenue(&order).to_fixed(2), "100.00");

        let zero = order_with(Some("1200"), Vec::new(), 0);
        assert!(monthly_recurring_revenue(&zero).is_zero());

        let negative = order_with(Some("1200"), Vec::new(), -6);
        assert!(monthly_recurring_revenue(&negative).is_zero());
    }

    #[test]
    fn test_complete_breakdown() {
        let order = order_with(Some("299"), vec![add_on("api-calls", "0.001", 1000, true)], 12);
        let summary = calculate_order_breakdown(&order).summary();

        assert_eq!(
            summary,
            BreakdownSummary {
                plan_total: 299.0,
                add_ons_total: 1.0,
                subtotal: 300.0,
                tax: 0.0,
                total: 300.0,
                mrr: 25.0,
            }
        );
    }

    #[test]
    fn test_breakdown_with_tax() {
        let order = order_with(Some("100"), Vec::new(), 12);
        let breakdown = calculate_order_breakdown_with_tax(&order, dec!(8.25)).unwrap();

        assert_eq!(breakdown.tax, money("8.25"));
        assert_eq!(breakdown.total, money("108.25"));
        assert_eq!(breakdown.total, breakdown.subtotal + breakdown.tax);
        assert_eq!(breakdown.mrr.to_fixed(2), "9.02");
    }

    #[test]
    fn test_breakdown_without_plan_or_add_ons_is_zero() {
        let breakdown = calculate_order_breakdown(&create_default_order());
        assert_eq!(breakdown, OrderBreakdown::default());
    }

    #[test]
    fn test_contract_value() {
        let order = order_with(None, vec![add_on("api-calls", "0.001", 900, true)], 12);
        assert_eq!(order_total(&order).to_fixed(2), "0.90");
        assert_eq!(contract_value(&order).to_fixed(2), "10.80");

        let open = order_with(Some("99"), Vec::new(), 0);
        assert!(contract_value(&open).is_zero());
    }

    #[test]
    fn test_tax_and_discount() {
        assert!(calculate_tax(money("100"), Decimal::ZERO).unwrap().is_zero());
        assert_eq!(calculate_tax(money("99.99"), dec!(15)).unwrap().to_fixed(2), "15.00");

        assert_eq!(discount_percentage(money("200"), money("150")).unwrap(), dec!(25));
        assert_eq!(discount_percentage(Money::zero(), money("10")).unwrap(), Decimal::ZERO);
    }

    #[test]
    fn test_breakdown_does_not_touch_order() {
        let order = order_with(Some("299"), mixed_add_ons(), 12);
        let before = order.clone();
        let _ = calculate_order_breakdown(&order);
        assert_eq!(order, before);
    }

    #[test]
    fn test_input_predicates() {
        assert!(is_valid_price(0.0));
        assert!(is_valid_price(99.99));
        assert!(is_valid_price(0.001));
        assert!(!is_valid_price(-0.01));
        assert!(!is_valid_price(f64::INFINITY));
        assert!(!is_valid_price(f64::NAN));

        assert!(is_valid_quantity(0.0));
        assert!(is_valid_quantity(100.0));
        assert!(!is_valid_quantity(-1.0));
        assert!(!is_valid_quantity(1.5));
        assert!(!is_valid_quantity(f64::NAN));
    }

    fn arb_add_on() -> impl Strategy<Value = AddOn> {
        (0i64..10_000_000, 0u32..5_000, any::<bool>()).prop_map(|(millis, quantity, included)| {
            AddOn {
                id: "generated".to_string(),
                name: "Generated".to_string(),
                description: String::new(),
                price: Money::from_scaled(millis, 3),
                quantity,
                included,
            }
        })
    }

    proptest! {
        #[test]
        fn prop_breakdown_sums_are_exact(
            plan_cents in prop::option::of(0i64..10_000_000),
            add_ons in prop::collection::vec(arb_add_on(), 0..8),
            months in -3i32..61,
            rate_bps in 0i64..2_000,
        ) {
            let mut order = create_default_order();
            order.selected_plan = plan_cents.map(|cents| Plan {
                id: "p".to_string(),
                name: "P".to_string(),
                price: Money::from_cents(cents),
            });
            order.add_ons = add_ons;
            order.contract = Contract::new(None, months);

            let breakdown =
                calculate_order_breakdown_with_tax(&order, Decimal::new(rate_bps, 2)).unwrap();

            prop_assert_eq!(breakdown.subtotal, breakdown.plan_total + breakdown.add_ons_total);
            prop_assert_eq!(breakdown.total, breakdown.subtotal + breakdown.tax);
            prop_assert_eq!(breakdown.subtotal, order_total(&order));
            if months <= 0 {
                prop_assert!(breakdown.mrr.is_zero());
            }
        }

        #[test]
        fn prop_excluded_items_contribute_nothing(add_ons in prop::collection::vec(arb_add_on(), 0..8)) {
            let excluded: Vec<AddOn> = add_ons
                .into_iter()
                .map(|a| AddOn { included: false, ..a })
                .collect();
            prop_assert!(add_ons_total(&excluded).is_zero());
        }
    }
}
