//! Pricing Fixtures

use decimal_percentage::Percentage;
use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use rusty_money::{
    Money,
    iso::{Currency, EUR, GBP, USD},
};
use serde::Deserialize;

use crate::{config::PricingConfig, fixtures::FixtureError};

/// Pricing Fixture
#[derive(Debug, Deserialize)]
pub struct PricingFixture {
    /// Lamination surcharge per square metre (e.g., "8.00 EUR")
    pub lamination_rate_per_sqm: String,

    /// Smallest billable wallpaper area in square metres (e.g., "0.01")
    pub minimum_area_sqm: String,

    /// Subtotal from which shipping is free (e.g., "100.00 EUR")
    pub free_shipping_threshold: String,

    /// Shipping fee below the threshold (e.g., "10.00 EUR")
    pub flat_shipping_fee: String,

    /// VAT rate (e.g., "23%" or "0.23")
    pub vat_rate: String,
}

impl TryFrom<PricingFixture> for PricingConfig {
    type Error = FixtureError;

    fn try_from(fixture: PricingFixture) -> Result<Self, Self::Error> {
        let lamination_rate_per_sqm = parse_money(&fixture.lamination_rate_per_sqm)?;
        let free_shipping_threshold = parse_money(&fixture.free_shipping_threshold)?;
        let flat_shipping_fee = parse_money(&fixture.flat_shipping_fee)?;

        let currency = lamination_rate_per_sqm.currency();

        for price in [free_shipping_threshold, flat_shipping_fee] {
            if price.currency() != currency {
                return Err(FixtureError::CurrencyMismatch(
                    currency.iso_alpha_code.to_string(),
                    price.currency().iso_alpha_code.to_string(),
                ));
            }
        }

        let minimum_area_sqm = fixture
            .minimum_area_sqm
            .trim()
            .parse::<Decimal>()
            .ok()
            .filter(|area| area.is_sign_positive() && !area.is_zero())
            .ok_or_else(|| FixtureError::InvalidArea(fixture.minimum_area_sqm.clone()))?;

        Ok(PricingConfig {
            currency,
            lamination_rate_per_sqm,
            minimum_area_sqm,
            free_shipping_threshold,
            flat_shipping_fee,
            vat_rate: parse_percentage(&fixture.vat_rate)?,
        })
    }
}

/// Parse a YAML pricing configuration.
///
/// # Errors
///
/// Returns an error if the YAML is malformed or any value is invalid.
pub fn parse_pricing(yaml: &str) -> Result<PricingConfig, FixtureError> {
    let fixture: PricingFixture = serde_norway::from_str(yaml)?;

    fixture.try_into()
}

/// Parse price string (e.g., "2.99 EUR") into minor units and currency
///
/// # Errors
///
/// Returns an error if the string is not in the format "AMOUNT CURRENCY",
/// if the amount cannot be parsed as a decimal, or if the currency code
/// is not recognized.
pub fn parse_price(s: &str) -> Result<(i64, &'static Currency), FixtureError> {
    let parts: Vec<&str> = s.split_whitespace().collect();

    if parts.len() != 2 {
        return Err(FixtureError::InvalidPrice(format!(
            "Expected format 'AMOUNT CURRENCY', got: {s}"
        )));
    }

    let amount = parts
        .first()
        .ok_or_else(|| FixtureError::InvalidPrice(s.to_string()))?
        .parse::<Decimal>()
        .map_err(|_err| FixtureError::InvalidPrice(s.to_string()))?;

    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(FixtureError::InvalidPrice(s.to_string()));
    }

    let minor_units = amount
        .checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|value| {
            value
                .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
                .to_i64()
        })
        .ok_or_else(|| FixtureError::InvalidPrice(s.to_string()))?;

    let currency_code = parts
        .get(1)
        .ok_or_else(|| FixtureError::InvalidPrice(s.to_string()))?;

    let currency = match *currency_code {
        "EUR" => EUR,
        "GBP" => GBP,
        "USD" => USD,
        other => return Err(FixtureError::UnknownCurrency(other.to_string())),
    };

    Ok((minor_units, currency))
}

/// Parse price string straight into [`Money`].
///
/// # Errors
///
/// See [`parse_price`].
pub fn parse_money(s: &str) -> Result<Money<'static, Currency>, FixtureError> {
    let (minor_units, currency) = parse_price(s)?;

    Ok(Money::from_minor(minor_units, currency))
}

/// Parse percentage string (e.g., "23%" or "0.23") into a `Percentage`
///
/// Accepts two formats:
/// - Percentage format: "23%" for 23%
/// - Decimal format: "0.23" for 23%
///
/// # Errors
///
/// Returns an error if the string cannot be parsed or is outside 0-100%.
pub fn parse_percentage(s: &str) -> Result<Percentage, FixtureError> {
    let trimmed = s.trim();

    let parsed = if let Some(percent_str) = trimmed.strip_suffix('%') {
        // "23%" -> 0.23
        percent_str
            .trim()
            .parse::<Decimal>()
            .map(|value| value / Decimal::ONE_HUNDRED)
    } else {
        trimmed.parse::<Decimal>()
    };

    let fraction = parsed.map_err(|_err| FixtureError::InvalidPercentage(s.to_string()))?;

    if fraction.is_sign_negative() || fraction > Decimal::ONE {
        return Err(FixtureError::InvalidPercentage(s.to_string()));
    }

    Ok(Percentage::from(fraction))
}
