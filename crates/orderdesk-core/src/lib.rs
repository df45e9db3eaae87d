//! # orderdesk-core: Pure Business Logic for the Order Wizard
//!
//! This crate holds the exact-decimal money type and the order calculation
//! engine behind the four-step order wizard. It has zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        orderdesk Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Wizard Frontend                              │   │
//! │  │   Customer ──► Product/Plan ──► Contract ──► Review & Finalize  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ wire types (serde + ts-rs)             │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ orderdesk-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────┐ ┌──────────────┐ ┌──────────┐ ┌────────────┐    │   │
//! │  │   │  money   │ │ calculations │ │ session  │ │ validation │    │   │
//! │  │   │  Money   │ │  Breakdown   │ │ Wizard   │ │ step rules │    │   │
//! │  │   │ Operand  │ │  MRR / tax   │ │  state   │ │            │    │   │
//! │  │   └──────────┘ └──────────────┘ └──────────┘ └────────────┘    │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ NewOrderRecord                         │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               orderdesk-db (Order History)                      │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Exact decimal `Money` and its `Operand` conversions
//! - [`format`] - Locale-aware currency, date and text formatting
//! - [`types`] - Order, customer, catalog and history wire types
//! - [`catalog`] - Sample catalog, wizard steps and option lists
//! - [`calculations`] - Order totals, MRR, tax and breakdowns
//! - [`validation`] - Field validators and per-step validation
//! - [`session`] - `OrderSession`, the in-progress order and wizard step
//! - [`config`] - `OrderConfig` (currency, locale, tax rate, duration)
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same order in, same breakdown out
//! 2. **No I/O**: persistence lives in orderdesk-db
//! 3. **Decimal Money**: floats appear only at the display/storage boundary
//! 4. **Explicit Errors**: a bad string or a zero divisor is an error, never zero
//!
//! ## Example Usage
//!
//! ```rust
//! use orderdesk_core::calculations::calculate_order_breakdown;
//! use orderdesk_core::catalog::{create_default_order, sample_products};
//! use orderdesk_core::Money;
//!
//! let mut order = create_default_order();
//! let product = sample_products().remove(0);
//! order.selected_plan = Some(product.plans[1].clone()); // $299.00/month
//! order.product = Some(product);
//!
//! let breakdown = calculate_order_breakdown(&order);
//! assert_eq!(breakdown.total, Money::from_cents(29900));
//! assert_eq!(breakdown.mrr.to_fixed(2), "24.92");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod calculations;
pub mod catalog;
pub mod config;
pub mod error;
pub mod format;
pub mod money;
pub mod session;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use calculations::{BreakdownSummary, OrderBreakdown};
pub use config::OrderConfig;
pub use error::{CoreError, CoreResult, MoneyError, MoneyResult, ValidationError};
pub use format::{Currency, Locale};
pub use money::{Money, Operand};
pub use session::OrderSession;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Number of wizard steps (customer, product, contract, review).
pub const WIZARD_STEP_COUNT: u8 = 4;

/// Contract duration preselected for a new order.
pub const DEFAULT_DURATION_MONTHS: i32 = 12;

/// Shortest contract the wizard accepts.
pub const MIN_DURATION_MONTHS: i32 = 1;

/// Longest contract the wizard accepts (5 years).
pub const MAX_DURATION_MONTHS: i32 = 60;

/// Highest plan price an operator may enter, in cents ($99,999.99).
///
/// ## Business Reason
/// Catches a misplaced decimal point on manual price overrides.
pub const MAX_PLAN_PRICE_CENTS: i64 = 9_999_999;
