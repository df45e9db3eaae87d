//! # Money Module
//!
//! Provides the `Money` type for exact decimal monetary values.
//!
//! ## Why Decimal Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In binary floating point:                                              │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  Integer cents are not enough for this domain either:                   │
//! │    API calls are priced at $0.001 per call (sub-cent unit prices)      │
//! │                                                                         │
//! │  OUR SOLUTION: sign + unscaled integer + scale (base 10)               │
//! │    0.1 + 0.2 = 0.3 exactly                                              │
//! │    0.001 × 1000 = 1.000 exactly                                         │
//! │    123.45 ÷ 4 = 30.8625 exactly (× 4 = 123.45 again)                    │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Operands
//! Arithmetic and comparisons accept a `Money`, a numeric string or a native
//! number. Every operand goes through [`Operand::resolve`] before computing.
//!
//! ## Usage
//! ```rust
//! use orderdesk_core::money::Money;
//!
//! let price = Money::parse("0.1").unwrap();
//! let total = price.add(0.2).unwrap();
//! assert_eq!(total.to_fixed(2), "0.30");
//!
//! let share = Money::parse("123.45").unwrap().divide(4).unwrap();
//! assert_eq!(share.to_fixed(2), "30.86");
//! assert_eq!(share.multiply(4).unwrap().to_fixed(2), "123.45");
//! ```

use regex::Regex;
use rust_decimal::prelude::*;
use rust_decimal::RoundingStrategy;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::iter::Sum;
use std::num::NonZeroU32;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};
use std::sync::LazyLock;
use ts_rs::TS;

use crate::error::{MoneyError, MoneyResult};

/// Largest scale (digits after the decimal point) the representation holds.
pub const MAX_SCALE: u32 = 28;

/// Optional sign, digits with an optional fraction, optional exponent.
static DECIMAL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([+-]?)([0-9]+\.?[0-9]*|\.[0-9]+)(?:[eE]([+-]?[0-9]+))?$")
        .expect("Invalid decimal regex pattern")
});

/// Lays significant digits out around the decimal point, without exponent.
///
/// `None` when the zeros needed to place the point would exceed what the
/// representation can hold.
fn positional_text(digits: &str, point: i64) -> Option<String> {
    let max_digits = MAX_SCALE as usize;

    if point <= 0 {
        let leading = usize::try_from(point.unsigned_abs()).ok()?;
        if leading + digits.len() > max_digits {
            return None;
        }
        return Some(format!("0.{}{digits}", "0".repeat(leading)));
    }

    let point = usize::try_from(point).ok()?;
    if point < digits.len() {
        let (whole, fraction) = digits.split_at(point);
        return Some(format!("{whole}.{fraction}"));
    }

    let trailing = point - digits.len();
    (point <= max_digits + 1).then(|| format!("{digits}{}", "0".repeat(trailing)))
}

// =============================================================================
// Operand
// =============================================================================

/// Anything that can take part in Money arithmetic or comparison.
///
/// ## Normalization
/// ```text
/// Money(10.50)  ──┐
/// "10.50"       ──┼──► Operand::resolve() ──► Money ──► compute
/// 10.5_f64      ──┤
/// 10_i64        ──┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Operand<'a> {
    /// Already exact.
    Money(Money),
    /// Numeric string, parsed without rounding.
    Text(&'a str),
    /// Native float, converted through its shortest round-trip string.
    Float(f64),
    /// Native integer, always exact.
    Integer(i64),
}

impl Operand<'_> {
    /// Converts the operand into its exact decimal value.
    pub fn resolve(self) -> MoneyResult<Money> {
        match self {
            Operand::Money(money) => Ok(money),
            Operand::Text(text) => Money::parse(text),
            Operand::Float(value) => Money::from_f64(value),
            Operand::Integer(value) => Ok(Money::from_decimal(Decimal::from(value))),
        }
    }
}

impl From<Money> for Operand<'_> {
    fn from(value: Money) -> Self {
        Operand::Money(value)
    }
}

impl From<&Money> for Operand<'_> {
    fn from(value: &Money) -> Self {
        Operand::Money(*value)
    }
}

impl From<Decimal> for Operand<'_> {
    fn from(value: Decimal) -> Self {
        Operand::Money(Money::from_decimal(value))
    }
}

impl<'a> From<&'a str> for Operand<'a> {
    fn from(value: &'a str) -> Self {
        Operand::Text(value)
    }
}

impl<'a> From<&'a String> for Operand<'a> {
    fn from(value: &'a String) -> Self {
        Operand::Text(value.as_str())
    }
}

impl From<f64> for Operand<'_> {
    fn from(value: f64) -> Self {
        Operand::Float(value)
    }
}

impl From<i64> for Operand<'_> {
    fn from(value: i64) -> Self {
        Operand::Integer(value)
    }
}

impl From<i32> for Operand<'_> {
    fn from(value: i32) -> Self {
        Operand::Integer(i64::from(value))
    }
}

impl From<u32> for Operand<'_> {
    fn from(value: u32) -> Self {
        Operand::Integer(i64::from(value))
    }
}

// =============================================================================
// Money Type
// =============================================================================

/// An exact, immutable decimal amount of money.
///
/// ## Design Decisions
/// - **Decimal (not f64, not cents)**: sub-cent unit prices and exact splits
/// - **Copy**: every operation returns a new value, nothing mutates in place
/// - **Value equality**: `10.5 == 10.50`, regardless of trailing zeros
/// - **Serialized as a string**: JSON numbers would reintroduce binary floats
///
/// ## User Workflow Context
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                    Where Money is Used                                  │
/// │                                                                         │
/// │  Plan.price ────────────────────────────┐                              │
/// │                                         ├──► subtotal ──► total ──► MRR │
/// │  AddOn.price × AddOn.quantity ──► sum ──┘                              │
/// │                                                                         │
/// │  Only format_money() / to_number() leave the decimal world             │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, TS)]
#[ts(export)]
pub struct Money(#[ts(type = "string")] Decimal);

impl Money {
    /// Returns zero money value.
    ///
    /// ## Example
    /// ```rust
    /// use orderdesk_core::money::Money;
    ///
    /// let zero = Money::zero();
    /// assert!(zero.is_zero());
    /// assert_eq!(zero.to_fixed(2), "0.00");
    /// ```
    #[inline]
    pub const fn zero() -> Self {
        Money(Decimal::ZERO)
    }

    /// Wraps an exact decimal.
    pub fn from_decimal(value: Decimal) -> Self {
        let mut value = value;
        // Keep "-0" out of the value space so formatting never shows "-0.00".
        if value.is_zero() {
            value.set_sign_positive(true);
        }
        Money(value)
    }

    /// Creates Money from an integer number of cents.
    ///
    /// ## Example
    /// ```rust
    /// use orderdesk_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(1099).to_string(), "10.99");
    /// ```
    pub fn from_cents(cents: i64) -> Self {
        Money::from_decimal(Decimal::new(cents, 2))
    }

    /// Creates Money from an unscaled integer and a scale: `(1, 3)` is `0.001`.
    ///
    /// # Panics
    /// Panics if `scale` exceeds [`MAX_SCALE`].
    pub fn from_scaled(unscaled: i64, scale: u32) -> Self {
        Money::from_decimal(Decimal::new(unscaled, scale))
    }

    /// Creates Money from any supported operand (Money, string or number).
    ///
    /// ## Example
    /// ```rust
    /// use orderdesk_core::money::Money;
    ///
    /// assert_eq!(Money::from_value("10.99").unwrap().to_number(), 10.99);
    /// assert_eq!(Money::from_value(10).unwrap().to_number(), 10.0);
    /// assert!(Money::from_value("ten").is_err());
    /// ```
    pub fn from_value<'a>(value: impl Into<Operand<'a>>) -> MoneyResult<Self> {
        value.into().resolve()
    }

    /// Parses a numeric string, keeping every digit presented.
    ///
    /// Accepts an optional sign, digits with an optional fraction and an
    /// optional exponent (`"1.5e3"`). Surrounding whitespace is ignored.
    /// Digit separators such as `_` are rejected, and so is any input whose
    /// digits cannot all be held exactly; the parser never rounds and never
    /// substitutes zero.
    ///
    /// ## Example
    /// ```rust
    /// use orderdesk_core::money::Money;
    ///
    /// assert_eq!(Money::parse(".5").unwrap().to_string(), "0.5");
    /// assert!(Money::parse("1_000").is_err());
    /// assert!(Money::parse("0.99999999999999999999999999999").is_err());
    /// ```
    pub fn parse(input: &str) -> MoneyResult<Self> {
        let parse_error = || MoneyError::Parse {
            input: input.to_string(),
        };
        let precision_error = || MoneyError::Precision {
            input: input.to_string(),
        };

        let captures = DECIMAL_PATTERN
            .captures(input.trim())
            .ok_or_else(parse_error)?;
        let negative = &captures[1] == "-";
        let mantissa = &captures[2];
        let (whole, fraction) = mantissa.split_once('.').unwrap_or((mantissa, ""));
        let exponent = match captures.get(3) {
            Some(exponent) => exponent
                .as_str()
                .parse::<i64>()
                .map_err(|_| precision_error())?,
            None => 0,
        };

        // `point` counts the significant digits left of the decimal point.
        let digits = format!("{whole}{fraction}");
        let significant = digits.trim_start_matches('0');
        let leading_zeros = digits.len() - significant.len();
        let point = (whole.len() as i64 - leading_zeros as i64).saturating_add(exponent);
        let significant = significant.trim_end_matches('0');

        if significant.is_empty() {
            return Ok(Money::zero());
        }

        let text = positional_text(significant, point).ok_or_else(precision_error)?;
        let value = Decimal::from_str_exact(&text).map_err(|_| precision_error())?;

        Ok(Money::from_decimal(if negative { -value } else { value }))
    }

    /// Converts a native float through its shortest round-trip decimal string.
    ///
    /// `0.1_f64` becomes exactly `0.1`, not `0.1000000000000000055511151231257827`.
    /// NaN and infinities are rejected.
    pub fn from_f64(value: f64) -> MoneyResult<Self> {
        if !value.is_finite() {
            return Err(MoneyError::NonFinite { value });
        }

        Money::parse(&value.to_string())
    }

    /// Returns the underlying exact decimal.
    #[inline]
    pub const fn as_decimal(self) -> Decimal {
        self.0
    }

    // -------------------------------------------------------------------------
    // Arithmetic
    // -------------------------------------------------------------------------

    /// Adds another amount.
    pub fn add<'a>(self, other: impl Into<Operand<'a>>) -> MoneyResult<Money> {
        let other = other.into().resolve()?;
        self.0
            .checked_add(other.0)
            .map(Money::from_decimal)
            .ok_or(MoneyError::Overflow { operation: "add" })
    }

    /// Subtracts another amount.
    pub fn subtract<'a>(self, other: impl Into<Operand<'a>>) -> MoneyResult<Money> {
        let other = other.into().resolve()?;
        self.0
            .checked_sub(other.0)
            .map(Money::from_decimal)
            .ok_or(MoneyError::Overflow {
                operation: "subtract",
            })
    }

    /// Multiplies by a quantity, rate or another amount.
    ///
    /// ## Example
    /// ```rust
    /// use orderdesk_core::money::Money;
    ///
    /// let price = Money::parse("9.99").unwrap();
    /// assert_eq!(price.multiply(3).unwrap().to_fixed(2), "29.97");
    /// ```
    pub fn multiply<'a>(self, other: impl Into<Operand<'a>>) -> MoneyResult<Money> {
        let other = other.into().resolve()?;
        self.0
            .checked_mul(other.0)
            .map(Money::from_decimal)
            .ok_or(MoneyError::Overflow {
                operation: "multiply",
            })
    }

    /// Divides by a count, rate or another amount.
    ///
    /// The quotient carries up to 28 significant fraction digits, so a later
    /// `round(2)` lands on the correct cent and terminating quotients are exact.
    ///
    /// ## Errors
    /// [`MoneyError::DivisionByZero`] when the divisor is zero. Never returns an
    /// infinite or NaN-like value.
    ///
    /// ## Example
    /// ```rust
    /// use orderdesk_core::money::Money;
    ///
    /// let total = Money::parse("100").unwrap();
    /// assert_eq!(total.divide(3).unwrap().to_fixed(2), "33.33");
    /// assert!(total.divide(0).is_err());
    /// ```
    pub fn divide<'a>(self, other: impl Into<Operand<'a>>) -> MoneyResult<Money> {
        let divisor = other.into().resolve()?;
        if divisor.is_zero() {
            return Err(MoneyError::DivisionByZero {
                dividend: self.to_string(),
            });
        }

        self.0
            .checked_div(divisor.0)
            .map(Money::from_decimal)
            .ok_or(MoneyError::Overflow {
                operation: "divide",
            })
    }

    /// Splits the amount into `parts` equal shares (unrounded).
    ///
    /// The divisor is non-zero by construction, so this cannot fail.
    pub fn split(self, parts: NonZeroU32) -> Money {
        Money::from_decimal(self.0 / Decimal::from(parts.get()))
    }

    /// Rounds to `places` decimal places, ties away from zero (round half up).
    ///
    /// ## Example
    /// ```rust
    /// use orderdesk_core::money::Money;
    ///
    /// assert_eq!(Money::parse("10.999").unwrap().round(2).to_fixed(2), "11.00");
    /// assert_eq!(Money::parse("10.994").unwrap().round(2).to_fixed(2), "10.99");
    /// assert_eq!(Money::parse("-0.125").unwrap().round(2).to_string(), "-0.13");
    /// ```
    pub fn round(self, places: u32) -> Money {
        Money::from_decimal(
            self.0
                .round_dp_with_strategy(places.min(MAX_SCALE), RoundingStrategy::MidpointAwayFromZero),
        )
    }

    /// Returns the absolute value.
    #[inline]
    pub fn abs(self) -> Money {
        Money(self.0.abs())
    }

    // -------------------------------------------------------------------------
    // Comparison
    // -------------------------------------------------------------------------

    /// Compares by mathematical value against any supported operand.
    pub fn compare<'a>(self, other: impl Into<Operand<'a>>) -> MoneyResult<Ordering> {
        let other = other.into().resolve()?;
        Ok(self.0.cmp(&other.0))
    }

    /// `self == other` by value (`10.5` equals `"10.50"`).
    pub fn equals<'a>(self, other: impl Into<Operand<'a>>) -> MoneyResult<bool> {
        Ok(self.compare(other)? == Ordering::Equal)
    }

    /// `self < other`.
    pub fn less_than<'a>(self, other: impl Into<Operand<'a>>) -> MoneyResult<bool> {
        Ok(self.compare(other)? == Ordering::Less)
    }

    /// `self > other`.
    pub fn greater_than<'a>(self, other: impl Into<Operand<'a>>) -> MoneyResult<bool> {
        Ok(self.compare(other)? == Ordering::Greater)
    }

    /// `self <= other`.
    pub fn less_than_or_equal_to<'a>(self, other: impl Into<Operand<'a>>) -> MoneyResult<bool> {
        Ok(self.compare(other)? != Ordering::Greater)
    }

    /// `self >= other`.
    pub fn greater_than_or_equal_to<'a>(
        self,
        other: impl Into<Operand<'a>>,
    ) -> MoneyResult<bool> {
        Ok(self.compare(other)? != Ordering::Less)
    }

    /// Checks if the value is zero.
    #[inline]
    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }

    /// Checks if the value is greater than zero.
    #[inline]
    pub fn is_positive(self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Checks if the value is less than zero.
    #[inline]
    pub fn is_negative(self) -> bool {
        self.0 < Decimal::ZERO
    }

    // -------------------------------------------------------------------------
    // Conversion
    // -------------------------------------------------------------------------

    /// Best-effort conversion to a native float.
    ///
    /// ## Note
    /// For the display/storage boundary only. Never feed the result back into
    /// arithmetic: that reintroduces binary representation error.
    pub fn to_number(self) -> f64 {
        // Shortest decimal string → nearest f64, same as a JS `Number(string)`.
        self.0
            .normalize()
            .to_string()
            .parse::<f64>()
            .unwrap_or(f64::NAN)
    }

    /// Fixed-places string, rounded half up: `0.3` → `"0.30"`, `10.5` → `"11"` at 0.
    ///
    /// ## Example
    /// ```rust
    /// use orderdesk_core::money::Money;
    ///
    /// let value = Money::parse("10.5").unwrap();
    /// assert_eq!(value.to_fixed(2), "10.50");
    /// assert_eq!(value.to_fixed(0), "11");
    /// ```
    pub fn to_fixed(self, places: u32) -> String {
        let places = places.min(MAX_SCALE);
        let mut fixed = self
            .0
            .round_dp_with_strategy(places, RoundingStrategy::MidpointAwayFromZero);
        fixed.rescale(places);
        if fixed.is_zero() {
            fixed.set_sign_positive(true);
        }
        fixed.to_string()
    }

    // -------------------------------------------------------------------------
    // Aggregates
    // -------------------------------------------------------------------------

    /// Sums amounts; the sum of nothing is zero.
    ///
    /// # Panics
    /// Panics if the running total overflows the decimal representation.
    ///
    /// ## Example
    /// ```rust
    /// use orderdesk_core::money::Money;
    ///
    /// let values = [Money::from_cents(1000), Money::from_cents(2050), Money::from_cents(525)];
    /// assert_eq!(Money::sum(values).to_fixed(2), "35.75");
    /// assert!(Money::sum(Vec::new()).is_zero());
    /// ```
    pub fn sum<I>(values: I) -> Money
    where
        I: IntoIterator<Item = Money>,
    {
        values.into_iter().fold(Money::zero(), |acc, value| acc + value)
    }

    /// Largest amount; zero when `values` is empty.
    pub fn max(values: &[Money]) -> Money {
        values.iter().copied().max().unwrap_or_else(Money::zero)
    }

    /// Smallest amount; zero when `values` is empty.
    pub fn min(values: &[Money]) -> Money {
        values.iter().copied().min().unwrap_or_else(Money::zero)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Minimal decimal form without forced trailing zeros: `10.50` prints `10.5`.
///
/// ## Note
/// Use `format::format_money` for anything shown to a customer.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.normalize())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl FromStr for Money {
    type Err = MoneyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Money::parse(s)
    }
}

impl From<Decimal> for Money {
    fn from(value: Decimal) -> Self {
        Money::from_decimal(value)
    }
}

impl TryFrom<f64> for Money {
    type Error = MoneyError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Money::from_f64(value)
    }
}

impl Serialize for Money {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

/// Accepts `"10.50"` as well as native JSON numbers (`10.5`, `299`) so that
/// catalog prices supplied as plain numbers go through the same normalization.
impl<'de> Deserialize<'de> for Money {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Integer(i64),
            Float(f64),
        }

        let operand = match Raw::deserialize(deserializer)? {
            Raw::Text(text) => return Money::parse(&text).map_err(serde::de::Error::custom),
            Raw::Integer(value) => Operand::Integer(value),
            Raw::Float(value) => Operand::Float(value),
        };
        operand.resolve().map_err(serde::de::Error::custom)
    }
}

// The operators below serve totals known to fit, as in the breakdown engine.
// Like the integer operators they panic on overflow; `add`, `subtract` and
// `multiply` are the checked forms returning `MoneyError::Overflow`.

/// # Panics
/// Panics if the sum overflows the decimal representation.
impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money::from_decimal(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

/// # Panics
/// Panics if the difference overflows the decimal representation.
impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money::from_decimal(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        *self = *self - other;
    }
}

impl Neg for Money {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Money::from_decimal(-self.0)
    }
}

/// Multiplication by a line-item quantity.
///
/// # Panics
/// Panics if the product overflows the decimal representation.
impl Mul<u32> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: u32) -> Self {
        Money::from_decimal(self.0 * Decimal::from(qty))
    }
}

/// # Panics
/// Panics if the running total overflows; see [`Money::add`] for the checked form.
impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        Money::sum(iter)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        Money::sum(iter.copied())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
