//! Order totals
//!
//! Order summary for the cart page and checkout:
//!
//! ```text
//! subtotal = Σ unit price × quantity
//! shipping = 0 when subtotal ≥ free shipping threshold (or the cart is empty), else flat fee
//! vat      = (subtotal + shipping) × vat rate
//! total    = subtotal + shipping + vat
//! ```
//!
//! Totals are derived, never stored: callers recompute them from the current cart.

use rusty_money::{Money, MoneyError, iso::Currency};
use thiserror::Error;

use crate::{
    config::PricingConfig,
    items::CartLineItem,
    pricing::{PricingError, percent_of_minor},
};

/// Errors that can occur while calculating order totals.
#[derive(Debug, Error, PartialEq)]
pub enum TotalsError {
    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),

    /// A line total or the VAT could not be calculated.
    #[error(transparent)]
    Pricing(#[from] PricingError),
}

/// Derived totals of a cart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrderTotals {
    subtotal: Money<'static, Currency>,
    shipping: Money<'static, Currency>,
    vat: Money<'static, Currency>,
    total: Money<'static, Currency>,
    item_count: usize,
}

impl OrderTotals {
    /// Calculates the totals of the given line items.
    ///
    /// # Errors
    ///
    /// - [`TotalsError::Money`]: an item is priced in a different currency from the configuration.
    /// - [`TotalsError::Pricing`]: an amount does not fit in minor units.
    pub fn calculate(items: &[CartLineItem], config: &PricingConfig) -> Result<Self, TotalsError> {
        let currency = config.currency;

        let subtotal = items.iter().try_fold(
            Money::from_minor(0, currency),
            |acc, item| -> Result<_, TotalsError> { Ok(acc.add(item.line_total()?)?) },
        )?;

        let shipping = if items.is_empty()
            || subtotal.to_minor_units() >= config.free_shipping_threshold.to_minor_units()
        {
            Money::from_minor(0, currency)
        } else {
            config.flat_shipping_fee
        };

        let vat_base = subtotal.add(shipping)?;
        let vat = Money::from_minor(
            percent_of_minor(&config.vat_rate, vat_base.to_minor_units())?,
            currency,
        );

        Ok(Self {
            subtotal,
            shipping,
            vat,
            total: vat_base.add(vat)?,
            item_count: items.len(),
        })
    }

    /// Sum of all line totals.
    pub fn subtotal(&self) -> Money<'static, Currency> {
        self.subtotal
    }

    /// Shipping fee.
    pub fn shipping(&self) -> Money<'static, Currency> {
        self.shipping
    }

    /// VAT charged on subtotal plus shipping.
    pub fn vat(&self) -> Money<'static, Currency> {
        self.vat
    }

    /// Amount to pay.
    pub fn total(&self) -> Money<'static, Currency> {
        self.total
    }

    /// Number of line items the totals were calculated from.
    pub fn item_count(&self) -> usize {
        self.item_count
    }

    /// Whether shipping is free.
    pub fn free_shipping(&self) -> bool {
        self.shipping.to_minor_units() == 0
    }

    /// Whether the order can go to checkout.
    pub fn checkout_enabled(&self) -> bool {
        self.item_count > 0
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::{EUR, GBP};
    use testresult::TestResult;

    use crate::{
        catalog::SizeOption,
        dimensions::Quantity,
        items::{Canvas, LineItemId, LineItemKind},
    };

    use super::*;

    fn priced(minor: i64, quantity: i64) -> CartLineItem {
        let price = Money::from_minor(minor, EUR);

        CartLineItem::new(
            LineItemId::generate(),
            LineItemKind::Canvas(Canvas {
                canvas_image: String::new(),
                canvas_name: "Test".to_string(),
                size: SizeOption::new("custom", 10, 10, price),
            }),
            price,
            Quantity::new(quantity),
        )
    }

    #[test]
    fn below_threshold_pays_shipping() -> TestResult {
        let totals = OrderTotals::calculate(&[priced(80_00, 1)], &PricingConfig::default())?;

        assert_eq!(totals.subtotal(), Money::from_minor(80_00, EUR));
        assert_eq!(totals.shipping(), Money::from_minor(10_00, EUR));
        assert_eq!(totals.vat(), Money::from_minor(20_70, EUR));
        assert_eq!(totals.total(), Money::from_minor(110_70, EUR));
        assert!(!totals.free_shipping());

        Ok(())
    }

    #[test]
    fn above_threshold_ships_free() -> TestResult {
        let totals = OrderTotals::calculate(&[priced(150_00, 1)], &PricingConfig::default())?;

        assert_eq!(totals.shipping(), Money::from_minor(0, EUR));
        assert_eq!(totals.vat(), Money::from_minor(34_50, EUR));
        assert_eq!(totals.total(), Money::from_minor(184_50, EUR));

        Ok(())
    }

    #[test]
    fn threshold_is_inclusive() -> TestResult {
        let totals = OrderTotals::calculate(&[priced(100_00, 1)], &PricingConfig::default())?;

        assert!(totals.free_shipping());
        assert_eq!(totals.total(), Money::from_minor(123_00, EUR));

        Ok(())
    }

    #[test]
    fn one_cent_below_threshold_pays_shipping() -> TestResult {
        let totals = OrderTotals::calculate(&[priced(99_99, 1)], &PricingConfig::default())?;

        assert_eq!(totals.shipping(), Money::from_minor(10_00, EUR));

        Ok(())
    }

    #[test]
    fn quantity_multiplies_unit_price() -> TestResult {
        let totals = OrderTotals::calculate(
            &[priced(25_00, 2), priced(30_00, 1)],
            &PricingConfig::default(),
        )?;

        assert_eq!(totals.subtotal(), Money::from_minor(80_00, EUR));
        assert_eq!(totals.item_count(), 2);

        Ok(())
    }

    #[test]
    fn empty_cart_is_all_zero_and_cannot_check_out() -> TestResult {
        let totals = OrderTotals::calculate(&[], &PricingConfig::default())?;
        let zero = Money::from_minor(0, EUR);

        assert_eq!(totals.subtotal(), zero);
        assert_eq!(totals.shipping(), zero);
        assert_eq!(totals.vat(), zero);
        assert_eq!(totals.total(), zero);
        assert!(!totals.checkout_enabled());

        Ok(())
    }

    #[test]
    fn foreign_currency_items_are_rejected() {
        let price = Money::from_minor(10_00, GBP);
        let item = CartLineItem::new(
            LineItemId::generate(),
            LineItemKind::Canvas(Canvas {
                canvas_image: String::new(),
                canvas_name: "Test".to_string(),
                size: SizeOption::new("custom", 10, 10, price),
            }),
            price,
            Quantity::ONE,
        );

        let result = OrderTotals::calculate(&[item], &PricingConfig::default());

        assert!(matches!(result, Err(TotalsError::Money(_))));
    }
}
