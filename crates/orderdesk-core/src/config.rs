//! # Order Configuration
//!
//! Display currency, locale, tax rate and the default contract length.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`ORDERDESK_*`)
//! 2. Defaults (this file)
//!
//! Read-only after startup; a session copies what it needs.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{CoreError, CoreResult};
use crate::format::{format_money, Currency, Locale};
use crate::money::Money;
use crate::validation::{validate_duration_months, validate_tax_rate_percent};
use crate::DEFAULT_DURATION_MONTHS;

pub const ENV_CURRENCY: &str = "ORDERDESK_CURRENCY";
pub const ENV_LOCALE: &str = "ORDERDESK_LOCALE";
pub const ENV_TAX_RATE: &str = "ORDERDESK_TAX_RATE";
pub const ENV_DEFAULT_DURATION: &str = "ORDERDESK_DEFAULT_DURATION";

/// Order wizard configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderConfig {
    /// Display currency (no conversion is ever performed).
    pub currency: Currency,

    /// Display locale for separators and symbol placement.
    pub locale: Locale,

    /// Tax rate as a percentage, `8.25` = 8.25%. Zero disables tax.
    pub tax_rate_percent: Decimal,

    /// Contract length preselected for new orders.
    pub default_duration_months: i32,
}

impl Default for OrderConfig {
    /// USD, en-US, no tax, 12-month contracts.
    fn default() -> Self {
        OrderConfig {
            currency: Currency::Usd,
            locale: Locale::EnUs,
            tax_rate_percent: Decimal::ZERO,
            default_duration_months: DEFAULT_DURATION_MONTHS,
        }
    }
}

impl OrderConfig {
    /// Creates an OrderConfig from environment variables and defaults.
    ///
    /// ## Environment Variables
    /// - `ORDERDESK_CURRENCY`: ISO code, e.g. `EUR`
    /// - `ORDERDESK_LOCALE`: BCP 47 tag, e.g. `de-DE`
    /// - `ORDERDESK_TAX_RATE`: percentage, e.g. `8.25`
    /// - `ORDERDESK_DEFAULT_DURATION`: months, 1 to 60
    ///
    /// ## Errors
    /// A set but unusable variable is [`CoreError::InvalidConfig`]; it is
    /// never silently replaced by the default.
    pub fn from_env() -> CoreResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`OrderConfig::from_env`] with an injectable variable source.
    pub fn from_lookup<F>(lookup: F) -> CoreResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = OrderConfig::default();

        if let Some(value) = lookup(ENV_CURRENCY) {
            config.currency = parse_setting(ENV_CURRENCY, &value)?;
        }

        if let Some(value) = lookup(ENV_LOCALE) {
            config.locale = parse_setting(ENV_LOCALE, &value)?;
        }

        if let Some(value) = lookup(ENV_TAX_RATE) {
            let rate: Decimal = parse_setting(ENV_TAX_RATE, &value)?;
            validate_tax_rate_percent(rate).map_err(|err| invalid(ENV_TAX_RATE, err))?;
            config.tax_rate_percent = rate;
        }

        if let Some(value) = lookup(ENV_DEFAULT_DURATION) {
            let months: i32 = parse_setting(ENV_DEFAULT_DURATION, &value)?;
            validate_duration_months(months).map_err(|err| invalid(ENV_DEFAULT_DURATION, err))?;
            config.default_duration_months = months;
        }

        Ok(config)
    }

    /// Formats an amount in the configured currency and locale.
    pub fn format_money(&self, amount: Money) -> String {
        format_money(amount, self.currency, self.locale)
    }
}

fn parse_setting<T>(key: &str, value: &str) -> CoreResult<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse::<T>().map_err(|err| invalid(key, err))
}

fn invalid(key: &str, reason: impl std::fmt::Display) -> CoreError {
    CoreError::InvalidConfig {
        key: key.to_string(),
        reason: reason.to_string(),
    }
}
