//! # Domain Types
//!
//! Wire types shared by the wizard frontend, the calculation engine and the
//! order history store.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Customer     │   │    Product      │   │    Contract     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  name           │   │  id, name       │   │  start_date     │       │
//! │  │  pre_populated  │   │  plans: [Plan]  │   │  duration_months│       │
//! │  │  company_address│   │                 │   │  end_date (der.)│       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │  Order = Customer + Product? + Plan? + Contract + [AddOn] + total│   │
//! │  └──────────────────────────────┬──────────────────────────────────┘   │
//! │                                 │ finalize                              │
//! │  ┌──────────────────────────────▼──────────────────────────────────┐   │
//! │  │  OrderRecord = id + created_at + Order + BreakdownSummary       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wire Format
//! Field names are camelCase on the wire. Prices are `Money` and travel as
//! decimal strings; `Order::total` is the native-number projection the
//! frontend displays.

use chrono::{DateTime, Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::calculations::BreakdownSummary;
use crate::money::Money;
use crate::DEFAULT_DURATION_MONTHS;

// =============================================================================
// Customer
// =============================================================================

/// Postal address of the customer's company.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub line1: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line2: Option<String>,
    pub city: String,
    /// Two-letter US state code.
    pub state: String,
    pub zip: String,
}

/// The customer the order is being built for.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub name: String,
    /// When set, the company address is required.
    pub pre_populated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_address: Option<Address>,
}

// =============================================================================
// Catalog
// =============================================================================

/// A pricing plan of a product (monthly price).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    pub id: String,
    pub name: String,
    /// Monthly price; operators may override it per order.
    pub price: Money,
}

/// A sellable product with its plans.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub plans: Vec<Plan>,
}

impl Product {
    /// Looks up one of this product's plans.
    pub fn find_plan(&self, plan_id: &str) -> Option<&Plan> {
        self.plans.iter().find(|plan| plan.id == plan_id)
    }
}

/// An optional line item billed per unit (API calls, GB of storage, hours).
///
/// Only contributes to the total when `included` and `quantity > 0`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct AddOn {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Unit price; may be below one cent.
    pub price: Money,
    pub quantity: u32,
    pub included: bool,
}

impl AddOn {
    /// Whether this add-on takes part in the order total.
    #[inline]
    pub fn is_billable(&self) -> bool {
        self.included && self.quantity > 0
    }
}

// =============================================================================
// Contract
// =============================================================================

/// Contract term of the order.
///
/// `end_date` is derived: start + duration months, absent when either side is
/// missing or the duration is not positive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Contract {
    #[ts(as = "Option<String>")]
    pub start_date: Option<NaiveDate>,
    pub duration_months: i32,
    #[ts(as = "Option<String>")]
    pub end_date: Option<NaiveDate>,
}

impl Contract {
    /// Creates a contract with its end date derived.
    pub fn new(start_date: Option<NaiveDate>, duration_months: i32) -> Self {
        Contract {
            start_date,
            duration_months,
            end_date: end_date_for(start_date, duration_months),
        }
    }

    /// Re-derives `end_date` from the current start date and duration.
    pub fn refresh_end_date(&mut self) {
        self.end_date = end_date_for(self.start_date, self.duration_months);
    }
}

impl Default for Contract {
    fn default() -> Self {
        Contract::new(None, DEFAULT_DURATION_MONTHS)
    }
}

/// Adds whole months, clamping to the last day of shorter months
/// (Jan 31 + 1 month = Feb 28/29).
pub fn end_date_for(start_date: Option<NaiveDate>, duration_months: i32) -> Option<NaiveDate> {
    let start = start_date?;
    let months = u32::try_from(duration_months).ok().filter(|m| *m > 0)?;
    start.checked_add_months(Months::new(months))
}

// =============================================================================
// Order
// =============================================================================

/// The order being assembled by the wizard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub customer: Customer,
    pub product: Option<Product>,
    pub selected_plan: Option<Plan>,
    pub contract: Contract,
    pub add_ons: Vec<AddOn>,
    /// Monthly total as a native number, refreshed after every change.
    pub total: f64,
}

// =============================================================================
// Wizard
// =============================================================================

/// One page of the order wizard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct WizardStep {
    pub id: u8,
    pub title: String,
    pub description: String,
    pub path: String,
    pub completed: bool,
}

/// A choice in the contract duration select. `value == -1` means "custom".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DurationOption {
    pub value: i32,
    pub label: String,
}

// =============================================================================
// Order History
// =============================================================================

/// A finalized order as kept in the order history.
///
/// Snapshot pattern: the order and its breakdown are frozen at finalization,
/// later catalog price changes do not affect stored records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OrderRecord {
    pub id: String,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub order: Order,
    pub breakdown: BreakdownSummary,
}

/// A finalized order on its way into the history store.
///
/// `id` and `created_at` are generated by the store when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrderRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub order: Order,
    pub breakdown: BreakdownSummary,
}

impl NewOrderRecord {
    /// Sets an explicit id instead of a generated one.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Sets an explicit creation timestamp instead of "now".
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// Completes the record with the final id and timestamp.
    pub fn into_record(self, id: String, created_at: DateTime<Utc>) -> OrderRecord {
        OrderRecord {
            id,
            created_at,
            order: self.order,
            breakdown: self.breakdown,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
