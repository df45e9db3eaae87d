//! # Display Formatting
//!
//! Everything shown to a user as text goes through here.
//!
//! ## Display Boundary
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   Money (exact) ──► round(precision) ──► to_fixed ──► group + symbol   │
//! │                                                                         │
//! │   1234.56  en-US / USD  ──►  "$1,234.56"                                │
//! │   1234.56  de-DE / EUR  ──►  "1.234,56 €"   (no-break space)            │
//! │   0.001    precision 3  ──►  "$0.001"                                   │
//! │                                                                         │
//! │   The digits never pass through f64, so 0.125 rounds to 0.13            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::{MoneyError, MoneyResult, ValidationError};
use crate::money::Money;

// =============================================================================
// Currency & Locale
// =============================================================================

/// Supported display currencies. Display only: there is no conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Usd,
    Eur,
    Gbp,
    Jpy,
    Cad,
    Aud,
}

impl Currency {
    pub const ALL: [Currency; 6] = [
        Currency::Usd,
        Currency::Eur,
        Currency::Gbp,
        Currency::Jpy,
        Currency::Cad,
        Currency::Aud,
    ];

    /// ISO 4217 code.
    pub const fn code(&self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
            Currency::Gbp => "GBP",
            Currency::Jpy => "JPY",
            Currency::Cad => "CAD",
            Currency::Aud => "AUD",
        }
    }

    pub const fn symbol(&self) -> &'static str {
        match self {
            Currency::Usd => "$",
            Currency::Eur => "€",
            Currency::Gbp => "£",
            Currency::Jpy => "¥",
            Currency::Cad => "CA$",
            Currency::Aud => "A$",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim();
        Currency::ALL
            .into_iter()
            .find(|currency| currency.code().eq_ignore_ascii_case(code))
            .ok_or_else(|| ValidationError::NotAllowed {
                field: "currency".to_string(),
                allowed: Currency::ALL.iter().map(|c| c.code().to_string()).collect(),
            })
    }
}

/// Where the currency symbol goes relative to the digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SymbolPlacement {
    /// `$1,234.56`
    Prefix,
    /// `€ 1.234,56`
    PrefixSpaced,
    /// `1.234,56 €`
    Suffix,
}

/// Supported display locales.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum Locale {
    #[default]
    #[serde(rename = "en-US")]
    EnUs,
    #[serde(rename = "en-GB")]
    EnGb,
    #[serde(rename = "de-DE")]
    DeDe,
    #[serde(rename = "fr-FR")]
    FrFr,
    #[serde(rename = "nl-NL")]
    NlNl,
}

const NO_BREAK_SPACE: char = '\u{a0}';
const NARROW_NO_BREAK_SPACE: char = '\u{202f}';

impl Locale {
    pub const ALL: [Locale; 5] = [
        Locale::EnUs,
        Locale::EnGb,
        Locale::DeDe,
        Locale::FrFr,
        Locale::NlNl,
    ];

    /// BCP 47 tag.
    pub const fn tag(&self) -> &'static str {
        match self {
            Locale::EnUs => "en-US",
            Locale::EnGb => "en-GB",
            Locale::DeDe => "de-DE",
            Locale::FrFr => "fr-FR",
            Locale::NlNl => "nl-NL",
        }
    }

    const fn group_separator(&self) -> char {
        match self {
            Locale::EnUs | Locale::EnGb => ',',
            Locale::DeDe | Locale::NlNl => '.',
            Locale::FrFr => NARROW_NO_BREAK_SPACE,
        }
    }

    const fn decimal_separator(&self) -> char {
        match self {
            Locale::EnUs | Locale::EnGb => '.',
            Locale::DeDe | Locale::FrFr | Locale::NlNl => ',',
        }
    }

    const fn placement(&self) -> SymbolPlacement {
        match self {
            Locale::EnUs | Locale::EnGb => SymbolPlacement::Prefix,
            Locale::NlNl => SymbolPlacement::PrefixSpaced,
            Locale::DeDe | Locale::FrFr => SymbolPlacement::Suffix,
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Locale {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim().replace('_', "-");
        Locale::ALL
            .into_iter()
            .find(|locale| locale.tag().eq_ignore_ascii_case(&tag))
            .ok_or_else(|| ValidationError::NotAllowed {
                field: "locale".to_string(),
                allowed: Locale::ALL.iter().map(|l| l.tag().to_string()).collect(),
            })
    }
}

// =============================================================================
// Currency Formatting
// =============================================================================

/// Formats with exactly two fraction digits.
///
/// ## Example
/// ```rust
/// use orderdesk_core::format::{format_money, Currency, Locale};
/// use orderdesk_core::Money;
///
/// let value = Money::parse("1234.56").unwrap();
/// assert_eq!(format_money(value, Currency::Usd, Locale::EnUs), "$1,234.56");
/// assert_eq!(format_money(value, Currency::Eur, Locale::DeDe), "1.234,56\u{a0}€");
/// ```
pub fn format_money(value: Money, currency: Currency, locale: Locale) -> String {
    format_money_with_precision(value, currency, locale, 2)
}

/// Formats with exactly `precision` fraction digits (per-unit prices use 3).
pub fn format_money_with_precision(
    value: Money,
    currency: Currency,
    locale: Locale,
    precision: u32,
) -> String {
    let rounded = value.round(precision);
    let digits = group_digits(&rounded.abs().to_fixed(precision), locale);
    let sign = if rounded.is_negative() { "-" } else { "" };
    let symbol = currency.symbol();

    match locale.placement() {
        SymbolPlacement::Prefix => format!("{sign}{symbol}{digits}"),
        SymbolPlacement::PrefixSpaced => format!("{symbol}{NO_BREAK_SPACE}{sign}{digits}"),
        SymbolPlacement::Suffix => format!("{sign}{digits}{NO_BREAK_SPACE}{symbol}"),
    }
}

/// Inserts group separators into an unsigned fixed-point string and swaps in
/// the locale's decimal separator.
fn group_digits(fixed: &str, locale: Locale) -> String {
    let (integer, fraction) = match fixed.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (fixed, None),
    };

    let mut grouped = String::with_capacity(fixed.len() + integer.len() / 3);
    for (i, ch) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push(locale.group_separator());
        }
        grouped.push(ch);
    }

    if let Some(fraction) = fraction {
        grouped.push(locale.decimal_separator());
        grouped.push_str(fraction);
    }
    grouped
}

/// USD / en-US with two fraction digits: `"$1,234.56"`.
pub fn format_currency(amount: Money) -> String {
    format_money(amount, Currency::Usd, Locale::EnUs)
}

/// USD / en-US with `precision` fraction digits: `"$1,234.5679"` at 4.
pub fn format_currency_precise(amount: Money, precision: u32) -> String {
    format_money_with_precision(amount, Currency::Usd, Locale::EnUs, precision)
}

/// Per-unit price with three fraction digits: `"$0.001 per API call"`.
pub fn format_per_unit(price: Money, unit: &str) -> String {
    format!("{} per {}", format_currency_precise(price, 3), unit)
}

/// Value for a price input field: plain two-place string, no symbol.
pub fn format_currency_input(amount: Money) -> String {
    amount.to_fixed(2)
}

/// Reads a price typed by a user (`"$1,234.50"` → `1234.50`).
///
/// Strips everything but digits, `.` and `-`, then parses strictly: input
/// with no number left in it is an error, not zero.
pub fn parse_currency_input(input: &str) -> MoneyResult<Money> {
    let cleaned: String = input
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();

    Money::parse(&cleaned).map_err(|err| match err {
        MoneyError::Precision { .. } => MoneyError::Precision {
            input: input.to_string(),
        },
        _ => MoneyError::Parse {
            input: input.to_string(),
        },
    })
}

// =============================================================================
// Dates & Durations
// =============================================================================

/// `Jan 15, 2024`; empty for no date.
pub fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%b %d, %Y").to_string())
        .unwrap_or_default()
}

/// `2024-01-15` for date inputs; empty for no date.
pub fn format_date_input(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

/// `Jan 01, 2024 - Dec 31, 2024`; empty unless both ends are set.
pub fn format_date_range(start: Option<NaiveDate>, end: Option<NaiveDate>) -> String {
    match (start, end) {
        (Some(_), Some(_)) => format!("{} - {}", format_date(start), format_date(end)),
        _ => String::new(),
    }
}

/// Human contract length: `"6 months"`, `"1 year"`, `"2 years, 1 month"`.
pub fn format_duration(months: i32) -> String {
    fn plural(count: i32, unit: &str) -> String {
        if count == 1 {
            format!("1 {unit}")
        } else {
            format!("{count} {unit}s")
        }
    }

    if months < 12 {
        return plural(months, "month");
    }

    let years = plural(months / 12, "year");
    match months % 12 {
        0 => years,
        remaining => format!("{}, {}", years, plural(remaining, "month")),
    }
}

// =============================================================================
// Numbers & Text
// =============================================================================

/// Unit count with en-US grouping: `1000000` → `"1,000,000"`.
pub fn format_quantity(quantity: i64) -> String {
    let grouped = group_digits(&quantity.unsigned_abs().to_string(), Locale::EnUs);
    if quantity < 0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

/// `12.5` at precision 1 → `"12.5%"`.
pub fn format_percentage(value: Decimal, precision: u32) -> String {
    let mut rounded = value.round_dp_with_strategy(precision, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(precision);
    format!("{rounded}%")
}

/// Cuts text to `max_len` characters, ending in `...` when cut.
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() <= max_len {
        return text.to_string();
    }
    let kept: String = text.chars().take(max_len.saturating_sub(3)).collect();
    format!("{kept}...")
}

pub fn format_customer_name(name: &str) -> String {
    name.trim().to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn money(value: &str) -> Money {
        Money::parse(value).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, d)
    }

    #[test]
    fn test_format_currency_usd() {
        assert_eq!(format_currency(Money::zero()), "$0.00");
        assert_eq!(format_currency(money("99.99")), "$99.99");
        assert_eq!(format_currency(money("1234.56")), "$1,234.56");
        assert_eq!(format_currency(money("0.001")), "$0.00");
        assert_eq!(format_currency(money("999999999.99")), "$999,999,999.99");
        assert_eq!(format_currency(money("-1234.5")), "-$1,234.50");
    }

    #[test]
    fn test_format_rounds_through_decimal() {
        // 0.125 is not exact in binary; decimal rounding still lands on .13
        assert_eq!(format_currency(money("0.125")), "$0.13");
        assert_eq!(format_currency(money("30.8625")), "$30.86");
        assert_eq!(format_currency(money("-0.001")), "$0.00");
    }

    #[test]
    fn test_format_other_locales() {
        let value = money("1234.56");
        assert_eq!(
            format_money(value, Currency::Eur, Locale::DeDe),
            "1.234,56\u{a0}€"
        );
        assert_eq!(
            format_money(value, Currency::Eur, Locale::FrFr),
            "1\u{202f}234,56\u{a0}€"
        );
        assert_eq!(
            format_money(value, Currency::Eur, Locale::NlNl),
            "€\u{a0}1.234,56"
        );
        assert_eq!(format_money(value, Currency::Gbp, Locale::EnGb), "£1,234.56");
        assert_eq!(
            format_money(-value, Currency::Eur, Locale::DeDe),
            "-1.234,56\u{a0}€"
        );
    }

    #[test]
    fn test_format_precise() {
        assert_eq!(format_currency_precise(money("0.001"), 3), "$0.001");
        assert_eq!(format_currency_precise(money("99.999"), 3), "$99.999");
        assert_eq!(format_currency_precise(money("1234.56789"), 4), "$1,234.5679");
        assert_eq!(format_currency_precise(money("12"), 0), "$12");
    }

    #[test]
    fn test_format_per_unit() {
        assert_eq!(format_per_unit(money("0.001"), "API call"), "$0.001 per API call");
        assert_eq!(format_per_unit(money("0.10"), "GB"), "$0.100 per GB");
        assert_eq!(format_per_unit(money("150"), "hour"), "$150.000 per hour");
    }

    #[test]
    fn test_currency_input_round_trip() {
        assert_eq!(format_currency_input(money("299")), "299.00");
        assert_eq!(parse_currency_input("$1,234.50").unwrap(), money("1234.5"));
        assert_eq!(parse_currency_input(" 0.001 ").unwrap(), money("0.001"));
        assert_eq!(parse_currency_input("-$5").unwrap(), money("-5"));
    }

    #[test]
    fn test_parse_currency_input_rejects_empty_numbers() {
        assert!(matches!(
            parse_currency_input("abc"),
            Err(MoneyError::Parse { ref input }) if input == "abc"
        ));
        assert!(parse_currency_input("").is_err());
        assert!(parse_currency_input("1.2.3").is_err());
    }

    #[test]
    fn test_currency_and_locale_from_str() {
        assert_eq!("usd".parse::<Currency>().unwrap(), Currency::Usd);
        assert_eq!("EUR".parse::<Currency>().unwrap(), Currency::Eur);
        assert_eq!("de_DE".parse::<Locale>().unwrap(), Locale::DeDe);
        assert_eq!("en-us".parse::<Locale>().unwrap(), Locale::EnUs);

        let err = "XYZ".parse::<Currency>().unwrap_err();
        assert_eq!(err.field(), "currency");
        assert!("xx-XX".parse::<Locale>().is_err());
    }

    #[test]
    fn test_currency_and_locale_wire_names() {
        assert_eq!(serde_json::to_string(&Currency::Eur).unwrap(), "\"EUR\"");
        assert_eq!(serde_json::to_string(&Locale::DeDe).unwrap(), "\"de-DE\"");
    }

    #[test]
    fn test_format_dates() {
        assert_eq!(format_date(date(2024, 1, 15)), "Jan 15, 2024");
        assert_eq!(format_date(None), "");
        assert_eq!(format_date_input(date(2024, 1, 5)), "2024-01-05");
        assert_eq!(
            format_date_range(date(2024, 1, 1), date(2024, 12, 31)),
            "Jan 01, 2024 - Dec 31, 2024"
        );
        assert_eq!(format_date_range(None, None), "");
        assert_eq!(format_date_range(date(2024, 1, 1), None), "");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0), "0 months");
        assert_eq!(format_duration(1), "1 month");
        assert_eq!(format_duration(6), "6 months");
        assert_eq!(format_duration(11), "11 months");
        assert_eq!(format_duration(12), "1 year");
        assert_eq!(format_duration(24), "2 years");
        assert_eq!(format_duration(13), "1 year, 1 month");
        assert_eq!(format_duration(14), "1 year, 2 months");
        assert_eq!(format_duration(25), "2 years, 1 month");
        assert_eq!(format_duration(120), "10 years");
        assert_eq!(format_duration(125), "10 years, 5 months");
    }

    #[test]
    fn test_format_numbers_and_text() {
        assert_eq!(format_quantity(1000), "1,000");
        assert_eq!(format_quantity(999), "999");
        assert_eq!(format_quantity(-1234567), "-1,234,567");

        assert_eq!(format_percentage(dec!(12.5), 1), "12.5%");
        assert_eq!(format_percentage(dec!(33.333), 1), "33.3%");
        assert_eq!(format_percentage(dec!(8.25), 0), "8%");

        assert_eq!(truncate_text("short", 10), "short");
        assert_eq!(truncate_text("Enterprise-grade API", 10), "Enterpr...");

        assert_eq!(format_customer_name("  Jane Doe  "), "Jane Doe");
        assert_eq!(format_customer_name(""), "");
    }
}
