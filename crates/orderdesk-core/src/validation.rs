//! # Validation Module
//!
//! Field validators and per-step validation for the order wizard.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Form widgets                                                 │
//! │  ├── Immediate feedback per keystroke                                  │
//! │  └── Uses the boolean predicates (validate_zip, validate_email, ...)   │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Step gate (THIS MODULE)                                      │
//! │  ├── validate_step(step, order, today)                                 │
//! │  └── Blocks "Next" while any field path has an error                   │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Calculation engine                                           │
//! │  └── Excludes non-billable add-ons instead of rejecting them           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use orderdesk_core::validation::{validate_customer_name, validate_zip};
//!
//! validate_customer_name("Acme Corp").unwrap();
//! assert!(validate_zip("12345-6789"));
//! ```

use chrono::NaiveDate;
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::LazyLock;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{Address, AddOn, Contract, Order};
use crate::{MAX_DURATION_MONTHS, MAX_PLAN_PRICE_CENTS, MIN_DURATION_MONTHS};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

static ZIP_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{5}(-[0-9]{4})?$").expect("Invalid ZIP regex pattern"));

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("Invalid email regex pattern")
});

static PHONE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[1-9]?[0-9]{7,15}$").expect("Invalid phone regex pattern"));

fn validate_length(
    field: &str,
    value: &str,
    min: usize,
    max: usize,
    required: bool,
) -> ValidationResult<()> {
    let value = value.trim();
    let len = value.chars().count();

    if len == 0 {
        if required {
            return Err(ValidationError::Required {
                field: field.to_string(),
            });
        }
        return Ok(());
    }

    if len < min {
        return Err(ValidationError::TooShort {
            field: field.to_string(),
            min,
        });
    }

    if len > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(())
}

/// Validates the customer name.
///
/// ## Rules
/// - Must not be empty
/// - Must be between 2 and 100 characters
///
/// ## Example
/// ```rust
/// use orderdesk_core::validation::validate_customer_name;
///
/// assert!(validate_customer_name("Jo").is_ok());
/// assert!(validate_customer_name("J").is_err());
/// assert!(validate_customer_name("").is_err());
/// ```
pub fn validate_customer_name(name: &str) -> ValidationResult<()> {
    validate_length("name", name, 2, 100, true)
}

pub fn validate_address_line1(line1: &str) -> ValidationResult<()> {
    validate_length("address line 1", line1, 5, 100, true)
}

/// Optional second line, at most 100 characters.
pub fn validate_address_line2(line2: Option<&str>) -> ValidationResult<()> {
    validate_length("address line 2", line2.unwrap_or_default(), 0, 100, false)
}

pub fn validate_city(city: &str) -> ValidationResult<()> {
    validate_length("city", city, 2, 50, true)
}

/// Two-letter state code.
pub fn validate_state(state: &str) -> ValidationResult<()> {
    let state = state.trim();

    if state.is_empty() {
        return Err(ValidationError::Required {
            field: "state".to_string(),
        });
    }

    if state.chars().count() != 2 {
        return Err(ValidationError::InvalidFormat {
            field: "state".to_string(),
            reason: "must be 2 characters".to_string(),
        });
    }

    Ok(())
}

/// `12345` or `12345-6789`.
pub fn validate_zip(zip: &str) -> bool {
    ZIP_PATTERN.is_match(zip)
}

fn validate_zip_field(zip: &str) -> ValidationResult<()> {
    if zip.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "ZIP code".to_string(),
        });
    }

    if !validate_zip(zip) {
        return Err(ValidationError::InvalidFormat {
            field: "ZIP code".to_string(),
            reason: "must be in format 12345 or 12345-6789".to_string(),
        });
    }

    Ok(())
}

/// `local@domain.tld` with no whitespace and exactly one `@`.
pub fn validate_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

/// 7 to 15 digits with an optional leading `+` and an optional non-zero
/// leading digit; spaces, dashes and parentheses are ignored.
pub fn validate_phone(phone: &str) -> bool {
    let cleaned: String = phone
        .chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, '-' | '(' | ')'))
        .collect();

    PHONE_PATTERN.is_match(&cleaned)
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a plan price.
///
/// ## Rules
/// - Zero is allowed (free plan)
/// - Must not exceed $99,999.99
///
/// ## Example
/// ```rust
/// use orderdesk_core::validation::validate_plan_price;
/// use orderdesk_core::Money;
///
/// assert!(validate_plan_price(Money::from_cents(29900)).is_ok());
/// assert!(validate_plan_price(Money::zero()).is_ok());
/// assert!(validate_plan_price(Money::from_cents(10_000_000)).is_err());
/// ```
pub fn validate_plan_price(price: Money) -> ValidationResult<()> {
    let max = Money::from_cents(MAX_PLAN_PRICE_CENTS);

    if price.is_negative() || price > max {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: "0".to_string(),
            max: max.to_fixed(2),
        });
    }

    Ok(())
}

/// Unit price of an add-on: any non-negative amount.
pub fn validate_add_on_price(price: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::Negative {
            field: "price".to_string(),
        });
    }

    Ok(())
}

/// Validates a contract duration.
///
/// ## Rules
/// - Whole months between 1 and 60
///
/// ## User Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Contract: Duration                                                     │
/// │                                                                         │
/// │  Select 6 / 12 / 24 / 36 ── or ── "Custom duration" → number input     │
/// │       │                                                                 │
/// │       ▼                                                                 │
/// │  validate_duration_months(n) ← THIS FUNCTION                           │
/// │       │                                                                 │
/// │       ├── n < 1 or n > 60 → "duration must be between 1 and 60"       │
/// │       │                                                                 │
/// │       └── OK → end date derived, MRR recalculated                      │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn validate_duration_months(months: i32) -> ValidationResult<()> {
    if !(MIN_DURATION_MONTHS..=MAX_DURATION_MONTHS).contains(&months) {
        return Err(ValidationError::OutOfRange {
            field: "duration".to_string(),
            min: MIN_DURATION_MONTHS.to_string(),
            max: MAX_DURATION_MONTHS.to_string(),
        });
    }

    Ok(())
}

/// Tax rate as a percentage, 0 to 100.
pub fn validate_tax_rate_percent(rate: Decimal) -> ValidationResult<()> {
    if rate < Decimal::ZERO || rate > Decimal::ONE_HUNDRED {
        return Err(ValidationError::OutOfRange {
            field: "tax rate".to_string(),
            min: "0".to_string(),
            max: "100".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Date Validators
// =============================================================================

/// Start date must be set and not before `today`.
pub fn validate_start_date(start: Option<NaiveDate>, today: NaiveDate) -> ValidationResult<()> {
    let Some(start) = start else {
        return Err(ValidationError::Required {
            field: "start date".to_string(),
        });
    };

    if start < today {
        return Err(ValidationError::InvalidFormat {
            field: "start date".to_string(),
            reason: "cannot be in the past".to_string(),
        });
    }

    Ok(())
}

/// End date must be set and not before the start date.
pub fn validate_end_date(start: Option<NaiveDate>, end: Option<NaiveDate>) -> ValidationResult<()> {
    let Some(end) = end else {
        return Err(ValidationError::Required {
            field: "end date".to_string(),
        });
    };

    if start.is_some_and(|start| end < start) {
        return Err(ValidationError::InvalidFormat {
            field: "end date".to_string(),
            reason: "must be after start date".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// UUID Validators
// =============================================================================

/// Validates a UUID string format.
///
/// ## Example
/// ```rust
/// use orderdesk_core::validation::validate_uuid;
///
/// assert!(validate_uuid("550e8400-e29b-41d4-a716-446655440000").is_ok());
/// assert!(validate_uuid("not-a-uuid").is_err());
/// ```
pub fn validate_uuid(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "id".to_string(),
        });
    }

    uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: "id".to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(())
}

// =============================================================================
// Step Validation
// =============================================================================

/// Outcome of validating one wizard step.
///
/// `errors` maps a field path (`customer.companyAddress.zip`,
/// `addOns[2].price`) to its message. Every failing field is reported, not
/// just the first.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct StepValidation {
    pub valid: bool,
    pub errors: BTreeMap<String, String>,
}

#[derive(Default)]
struct ErrorCollector(BTreeMap<String, String>);

impl ErrorCollector {
    fn check(&mut self, path: impl Into<String>, result: ValidationResult<()>) {
        if let Err(err) = result {
            self.0.insert(path.into(), err.to_string());
        }
    }

    fn finish(self) -> StepValidation {
        StepValidation {
            valid: self.0.is_empty(),
            errors: self.0,
        }
    }
}

/// Validates the fields a wizard step owns.
///
/// | Step | Fields                                        |
/// |------|-----------------------------------------------|
/// | 1    | customer name, company address                |
/// | 2    | product, plan, plan price                     |
/// | 3    | start date, duration, end date                |
/// | 4    | add-on prices and quantities                  |
///
/// ## Errors
/// [`CoreError::InvalidStep`] for a step outside 1..=4.
pub fn validate_step(step: u8, order: &Order, today: NaiveDate) -> CoreResult<StepValidation> {
    let mut errors = ErrorCollector::default();

    match step {
        1 => validate_customer_step(order, &mut errors),
        2 => validate_product_step(order, &mut errors),
        3 => validate_contract_step(&order.contract, today, &mut errors),
        4 => validate_add_ons_step(&order.add_ons, &mut errors),
        other => return Err(CoreError::InvalidStep(other)),
    }

    Ok(errors.finish())
}

fn validate_customer_step(order: &Order, errors: &mut ErrorCollector) {
    let customer = &order.customer;
    errors.check("customer.name", validate_customer_name(&customer.name));

    match &customer.company_address {
        Some(address) => validate_address(address, errors),
        None if customer.pre_populated => errors.check(
            "customer.companyAddress",
            Err(ValidationError::Required {
                field: "address".to_string(),
            }),
        ),
        None => {}
    }
}

fn validate_address(address: &Address, errors: &mut ErrorCollector) {
    const PREFIX: &str = "customer.companyAddress";
    errors.check(format!("{PREFIX}.line1"), validate_address_line1(&address.line1));
    errors.check(
        format!("{PREFIX}.line2"),
        validate_address_line2(address.line2.as_deref()),
    );
    errors.check(format!("{PREFIX}.city"), validate_city(&address.city));
    errors.check(format!("{PREFIX}.state"), validate_state(&address.state));
    errors.check(format!("{PREFIX}.zip"), validate_zip_field(&address.zip));
}

fn validate_product_step(order: &Order, errors: &mut ErrorCollector) {
    if order.product.is_none() {
        errors.check(
            "product",
            Err(ValidationError::Required {
                field: "product".to_string(),
            }),
        );
    }

    match &order.selected_plan {
        Some(plan) => errors.check("selectedPlan.price", validate_plan_price(plan.price)),
        None => errors.check(
            "selectedPlan",
            Err(ValidationError::Required {
                field: "plan".to_string(),
            }),
        ),
    }
}

fn validate_contract_step(contract: &Contract, today: NaiveDate, errors: &mut ErrorCollector) {
    errors.check(
        "contract.startDate",
        validate_start_date(contract.start_date, today),
    );
    errors.check(
        "contract.durationMonths",
        validate_duration_months(contract.duration_months),
    );
    errors.check(
        "contract.endDate",
        validate_end_date(contract.start_date, contract.end_date),
    );
}

fn validate_add_ons_step(add_ons: &[AddOn], errors: &mut ErrorCollector) {
    // Quantities are unsigned whole numbers by type; only prices can be off.
    for (i, add_on) in add_ons.iter().enumerate() {
        errors.check(format!("addOns[{i}].price"), validate_add_on_price(add_on.price));
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
