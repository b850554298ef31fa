//! Pricing configuration

use decimal_percentage::Percentage;
use rust_decimal::Decimal;
use rusty_money::{
    Money,
    iso::{Currency, EUR},
};

/// Constants used by the pricing engine and the order summary.
#[derive(Debug, Clone, Copy)]
pub struct PricingConfig {
    /// Currency every price in the cart is expressed in.
    pub currency: &'static Currency,

    /// Surcharge per square metre for laminated wallpaper.
    pub lamination_rate_per_sqm: Money<'static, Currency>,

    /// Smallest billable wallpaper area, in square metres.
    pub minimum_area_sqm: Decimal,

    /// Subtotal at or above which shipping is free.
    pub free_shipping_threshold: Money<'static, Currency>,

    /// Shipping fee charged below the free shipping threshold.
    pub flat_shipping_fee: Money<'static, Currency>,

    /// VAT (IVA) rate applied to subtotal plus shipping.
    pub vat_rate: Percentage,
}

impl PricingConfig {
    /// VAT rate as percentage points, e.g. `23` for 23%.
    pub fn vat_points(&self) -> Decimal {
        (self.vat_rate * Decimal::ONE_HUNDRED).normalize()
    }
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            currency: EUR,
            lamination_rate_per_sqm: Money::from_minor(8_00, EUR),
            minimum_area_sqm: Decimal::new(1, 2),
            free_shipping_threshold: Money::from_minor(100_00, EUR),
            flat_shipping_fee: Money::from_minor(10_00, EUR),
            vat_rate: Percentage::from(Decimal::new(23, 2)),
        }
    }
}
