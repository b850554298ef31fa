//! Pricing
//!
//! The pricing engine turns a product configuration into a unit price.
//!
//! Wallpaper is priced by area: `max(minimum, width × height)` square metres at the texture's price
//! per square metre, plus the lamination rate per square metre when laminated. Canvas is priced
//! by size: the unit price is the base price of the chosen size, fixed when the canvas is added.
//!
//! Every price is rounded once, to the cent, half away from zero.

use decimal_percentage::Percentage;
use rust_decimal::{
    Decimal, RoundingStrategy,
    prelude::{FromPrimitive, ToPrimitive},
};
use rusty_money::{Money, iso::Currency};
use thiserror::Error;
use tracing::debug;

use crate::{
    catalog::SizeTable,
    config::PricingConfig,
    dimensions::{Dimension, Quantity},
    items::{
        Canvas, CanvasSelection, CartLineItem, LineItemId, LineItemKind, LineItemPatch, Wallpaper,
        WallpaperSelection,
    },
};

/// Number of minor-unit digits of every supported currency.
const MINOR_UNIT_DIGITS: u32 = 2;

/// Errors that can occur while pricing a line item.
#[derive(Debug, Error, PartialEq)]
pub enum PricingError {
    /// A price is in a different currency from the cart (price currency, cart currency).
    #[error("price is in {0}, but the cart uses {1}")]
    CurrencyMismatch(&'static str, &'static str),

    /// The canvas size is not in the size table.
    #[error("unknown canvas size: {0}")]
    UnknownSize(String),

    /// A field was set on an item that does not have it.
    #[error("{field} does not apply to {kind} items")]
    FieldNotApplicable {
        /// Stored name of the field.
        field: &'static str,

        /// Type of the item.
        kind: &'static str,
    },

    /// A calculation does not fit in minor units.
    #[error("price calculation overflowed")]
    Overflow,
}

/// Billable wallpaper area in square metres, never below `minimum`.
///
/// # Errors
///
/// Returns [`PricingError::Overflow`] if the product of the dimensions overflows.
pub fn wallpaper_area(
    width: Dimension,
    height: Dimension,
    minimum: Decimal,
) -> Result<Decimal, PricingError> {
    let area = width
        .value()
        .checked_mul(height.value())
        .ok_or(PricingError::Overflow)?;

    Ok(area.max(minimum))
}

/// Unit price of a wallpaper covering `area` square metres.
///
/// # Errors
///
/// - [`PricingError::CurrencyMismatch`]: the rate and price are in different currencies.
/// - [`PricingError::Overflow`]: the price does not fit in minor units.
pub fn wallpaper_total(
    price_per_sqm: Money<'static, Currency>,
    area: Decimal,
    lamination: bool,
    lamination_rate_per_sqm: Money<'static, Currency>,
) -> Result<Money<'static, Currency>, PricingError> {
    let currency = price_per_sqm.currency();

    let mut rate_minor = price_per_sqm.to_minor_units();

    if lamination {
        ensure_currency(&lamination_rate_per_sqm, currency)?;

        rate_minor = rate_minor
            .checked_add(lamination_rate_per_sqm.to_minor_units())
            .ok_or(PricingError::Overflow)?;
    }

    let minor = Decimal::from(rate_minor)
        .checked_mul(area)
        .ok_or(PricingError::Overflow)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or(PricingError::Overflow)?;

    Ok(Money::from_minor(minor, currency))
}

/// Applies a percentage to an amount in minor units, rounding half away from zero.
///
/// # Errors
///
/// Returns [`PricingError::Overflow`] if the result cannot be represented.
pub fn percent_of_minor(percent: &Percentage, minor: i64) -> Result<i64, PricingError> {
    let minor = Decimal::from_i64(minor).ok_or(PricingError::Overflow)?;

    ((*percent) * Decimal::ONE) // decimal_percentage doesn't expose the underlying Decimal
        .checked_mul(minor)
        .ok_or(PricingError::Overflow)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or(PricingError::Overflow)
}

/// Decimal amount of money, e.g. `25.00`.
pub fn decimal_amount(money: &Money<'_, Currency>) -> Decimal {
    Decimal::new(money.to_minor_units(), MINOR_UNIT_DIGITS)
}

/// Money from a decimal amount, rounded to the cent.
///
/// # Errors
///
/// Returns [`PricingError::Overflow`] if the amount does not fit in minor units.
pub fn money_from_decimal(
    amount: Decimal,
    currency: &'static Currency,
) -> Result<Money<'static, Currency>, PricingError> {
    let minor = amount
        .checked_mul(Decimal::ONE_HUNDRED)
        .ok_or(PricingError::Overflow)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or(PricingError::Overflow)?;

    Ok(Money::from_minor(minor, currency))
}

fn ensure_currency(
    money: &Money<'_, Currency>,
    currency: &'static Currency,
) -> Result<(), PricingError> {
    if money.currency() == currency {
        Ok(())
    } else {
        Err(PricingError::CurrencyMismatch(
            money.currency().iso_alpha_code,
            currency.iso_alpha_code,
        ))
    }
}

/// Prices line items against a pricing configuration and a size table.
#[derive(Debug, Clone)]
pub struct PricingEngine {
    config: PricingConfig,
    sizes: SizeTable,
}

impl PricingEngine {
    /// Creates a new engine.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::CurrencyMismatch`] if the size table is priced in a different
    /// currency from the configuration.
    pub fn new(config: PricingConfig, sizes: SizeTable) -> Result<Self, PricingError> {
        match sizes.currency() {
            Some(currency) if currency != config.currency => {
                return Err(PricingError::CurrencyMismatch(
                    currency.iso_alpha_code,
                    config.currency.iso_alpha_code,
                ));
            }
            _ => {}
        }

        Ok(Self { config, sizes })
    }

    /// Pricing configuration.
    pub fn config(&self) -> &PricingConfig {
        &self.config
    }

    /// Canvas size table.
    pub fn sizes(&self) -> &SizeTable {
        &self.sizes
    }

    /// Prices a wallpaper chosen on the product page as a new line item.
    ///
    /// # Errors
    ///
    /// - [`PricingError::CurrencyMismatch`]: the texture is priced in another currency.
    /// - [`PricingError::Overflow`]: the price does not fit in minor units.
    pub fn wallpaper(&self, selection: WallpaperSelection) -> Result<CartLineItem, PricingError> {
        ensure_currency(&selection.price_per_sqm, self.config.currency)?;

        let wallpaper = Wallpaper {
            texture_image: selection.texture_image,
            texture_name: selection.texture_name,
            category: selection.category,
            price_per_sqm: selection.price_per_sqm,
            width_m: selection.width_m,
            height_m: selection.height_m,
            area: Decimal::ZERO,
            finish: selection.finish,
            lamination: selection.lamination,
            adhesive_type: selection.adhesive_type,
        };

        let mut item = CartLineItem::new(
            LineItemId::generate(),
            LineItemKind::Wallpaper(wallpaper),
            Money::from_minor(0, self.config.currency),
            Quantity::ONE,
        );

        self.reprice(&mut item)?;

        Ok(item)
    }

    /// Prices a canvas chosen on the product page as a new line item.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::UnknownSize`] if the size label is not in the size table.
    pub fn canvas(&self, selection: CanvasSelection) -> Result<CartLineItem, PricingError> {
        let size = self
            .sizes
            .get(&selection.size_label)
            .cloned()
            .ok_or(PricingError::UnknownSize(selection.size_label))?;

        let preco_total = size.base_price();

        Ok(CartLineItem::new(
            LineItemId::generate(),
            LineItemKind::Canvas(Canvas {
                canvas_image: selection.canvas_image,
                canvas_name: selection.canvas_name,
                size,
            }),
            preco_total,
            Quantity::ONE,
        ))
    }

    /// Recomputes the derived fields of a line item.
    ///
    /// Wallpaper gets a fresh area and unit price. Canvas keeps the base price of the size it was
    /// added with. Repricing an unchanged item leaves it unchanged.
    ///
    /// # Errors
    ///
    /// - [`PricingError::CurrencyMismatch`]: the item is priced in another currency.
    /// - [`PricingError::Overflow`]: the price does not fit in minor units.
    pub fn reprice(&self, item: &mut CartLineItem) -> Result<(), PricingError> {
        let preco_total = match item.kind_mut() {
            LineItemKind::Wallpaper(wallpaper) => {
                ensure_currency(&wallpaper.price_per_sqm, self.config.currency)?;

                wallpaper.area = wallpaper_area(
                    wallpaper.width_m,
                    wallpaper.height_m,
                    self.config.minimum_area_sqm,
                )?;

                wallpaper_total(
                    wallpaper.price_per_sqm,
                    wallpaper.area,
                    wallpaper.lamination,
                    self.config.lamination_rate_per_sqm,
                )?
            }
            LineItemKind::Canvas(canvas) => {
                let base_price = canvas.size.base_price();

                ensure_currency(&base_price, self.config.currency)?;

                base_price
            }
        };

        item.set_preco_total(preco_total);

        debug!(id = %item.id(), preco_total = %decimal_amount(&preco_total), "repriced line item");

        Ok(())
    }

    /// Returns a copy of `item` with `patch` applied and its price recomputed.
    ///
    /// Only the given item is affected. On error the original item is untouched.
    ///
    /// # Errors
    ///
    /// - [`PricingError::FieldNotApplicable`]: the patch sets a field the item does not have.
    /// - [`PricingError::UnknownSize`]: the new canvas size is not in the size table.
    /// - [`PricingError::CurrencyMismatch`]: the new price is in another currency.
    /// - [`PricingError::Overflow`]: the price does not fit in minor units.
    pub fn apply(
        &self,
        item: &CartLineItem,
        patch: &LineItemPatch,
    ) -> Result<CartLineItem, PricingError> {
        let mut updated = item.clone();

        match updated.kind_mut() {
            LineItemKind::Wallpaper(wallpaper) => {
                if let Some(field) = patch.canvas_field() {
                    return Err(PricingError::FieldNotApplicable {
                        field,
                        kind: "wallpaper",
                    });
                }

                if let Some(price_per_sqm) = patch.price_per_sqm {
                    ensure_currency(&price_per_sqm, self.config.currency)?;
                    wallpaper.price_per_sqm = price_per_sqm;
                }

                if let Some(width_m) = patch.width_m {
                    wallpaper.width_m = width_m;
                }

                if let Some(height_m) = patch.height_m {
                    wallpaper.height_m = height_m;
                }

                if let Some(lamination) = patch.lamination {
                    wallpaper.lamination = lamination;
                }

                if let Some(finish) = patch.finish {
                    wallpaper.finish = finish;
                }

                if let Some(adhesive_type) = patch.adhesive_type {
                    wallpaper.adhesive_type = adhesive_type;
                }
            }
            LineItemKind::Canvas(canvas) => {
                if let Some(field) = patch.wallpaper_field() {
                    return Err(PricingError::FieldNotApplicable {
                        field,
                        kind: "canvas",
                    });
                }

                if let Some(label) = &patch.size_label {
                    canvas.size = self
                        .sizes
                        .get(label)
                        .cloned()
                        .ok_or_else(|| PricingError::UnknownSize(label.clone()))?;
                }
            }
        }

        if let Some(quantity) = patch.quantity {
            updated.set_quantity(quantity);
        }

        self.reprice(&mut updated)?;

        Ok(updated)
    }
}

impl Default for PricingEngine {
    fn default() -> Self {
        Self {
            config: PricingConfig::default(),
            sizes: SizeTable::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::{EUR, GBP};
    use testresult::TestResult;

    use crate::{
        catalog::SizeOption,
        items::{AdhesiveType, Finish},
    };

    use super::*;

    fn dim(value: &str) -> Dimension {
        Dimension::coerce(value)
    }

    fn selection(width: &str, height: &str, lamination: bool) -> WallpaperSelection {
        WallpaperSelection {
            texture_image: "/textures/marble.jpg".to_string(),
            texture_name: "Marble".to_string(),
            category: "stone".to_string(),
            price_per_sqm: Money::from_minor(25_00, EUR),
            width_m: dim(width),
            height_m: dim(height),
            finish: Finish::Glossy,
            lamination,
            adhesive_type: AdhesiveType::WithAdhesive,
        }
    }

    fn wallpaper_of(item: &CartLineItem) -> Result<&Wallpaper, &'static str> {
        match item.kind() {
            LineItemKind::Wallpaper(wallpaper) => Ok(wallpaper),
            LineItemKind::Canvas(_) => Err("expected wallpaper"),
        }
    }

    #[test]
    fn area_is_width_times_height() -> TestResult {
        let area = wallpaper_area(dim("2.5"), dim("1.2"), Decimal::new(1, 2))?;

        assert_eq!(area, Decimal::new(3, 0));

        Ok(())
    }

    #[test]
    fn area_is_floored_for_zero_dimensions() -> TestResult {
        let minimum = Decimal::new(1, 2);

        assert_eq!(wallpaper_area(Dimension::ZERO, dim("3"), minimum)?, minimum);
        assert_eq!(
            wallpaper_area(Dimension::ZERO, Dimension::ZERO, minimum)?,
            minimum
        );

        Ok(())
    }

    #[test]
    fn wallpaper_without_lamination() -> TestResult {
        let item = PricingEngine::default().wallpaper(selection("2.5", "1.2", false))?;

        assert_eq!(item.preco_total(), Money::from_minor(75_00, EUR));
        assert_eq!(wallpaper_of(&item)?.area(), Decimal::new(3, 0));
        assert_eq!(item.quantity(), Quantity::ONE);

        Ok(())
    }

    #[test]
    fn wallpaper_with_lamination_adds_rate_per_sqm() -> TestResult {
        let item = PricingEngine::default().wallpaper(selection("2.5", "1.2", true))?;

        // 25.00 × 3 + 8.00 × 3
        assert_eq!(item.preco_total(), Money::from_minor(99_00, EUR));

        Ok(())
    }

    #[test]
    fn blank_dimensions_price_the_minimum_area() -> TestResult {
        let item = PricingEngine::default().wallpaper(selection("", "", true))?;

        // (25.00 + 8.00) × 0.01
        assert_eq!(item.preco_total(), Money::from_minor(33, EUR));
        assert_eq!(wallpaper_of(&item)?.area(), Decimal::new(1, 2));

        Ok(())
    }

    #[test]
    fn fractional_prices_round_half_away_from_zero() -> TestResult {
        // 12.35 × 0.5 = 6.175
        let total = wallpaper_total(
            Money::from_minor(12_35, EUR),
            Decimal::new(5, 1),
            false,
            Money::from_minor(8_00, EUR),
        )?;

        assert_eq!(total, Money::from_minor(6_18, EUR));

        Ok(())
    }

    #[test]
    fn wallpaper_rejects_foreign_currency() {
        let mut foreign = selection("1", "1", false);
        foreign.price_per_sqm = Money::from_minor(25_00, GBP);

        let result = PricingEngine::default().wallpaper(foreign);

        assert_eq!(result, Err(PricingError::CurrencyMismatch("GBP", "EUR")));
    }

    #[test]
    fn canvas_price_is_the_size_base_price() -> TestResult {
        let engine = PricingEngine::default();

        for size in engine.sizes().iter() {
            let item = engine.canvas(CanvasSelection {
                canvas_image: "/canvas/harbour.jpg".to_string(),
                canvas_name: "Harbour".to_string(),
                size_label: size.size().to_string(),
            })?;

            assert_eq!(item.preco_total(), size.base_price());
        }

        Ok(())
    }

    #[test]
    fn canvas_rejects_unknown_size() {
        let result = PricingEngine::default().canvas(CanvasSelection {
            canvas_image: String::new(),
            canvas_name: "Harbour".to_string(),
            size_label: "1x1".to_string(),
        });

        assert_eq!(result, Err(PricingError::UnknownSize("1x1".to_string())));
    }

    #[test]
    fn reprice_is_idempotent() -> TestResult {
        let engine = PricingEngine::default();
        let mut item = engine.wallpaper(selection("3,3", "2,7", true))?;
        let before = item.clone();

        engine.reprice(&mut item)?;
        engine.reprice(&mut item)?;

        assert_eq!(item, before);

        Ok(())
    }

    #[test]
    fn apply_recomputes_area_and_price() -> TestResult {
        let engine = PricingEngine::default();
        let item = engine.wallpaper(selection("1", "1", false))?;

        let updated = engine.apply(
            &item,
            &LineItemPatch {
                width_m: Some(dim("2")),
                lamination: Some(true),
                ..LineItemPatch::default()
            },
        )?;

        assert_eq!(wallpaper_of(&updated)?.area(), Decimal::new(2, 0));
        assert_eq!(updated.preco_total(), Money::from_minor(66_00, EUR));
        assert_eq!(updated.id(), item.id());

        Ok(())
    }

    #[test]
    fn apply_rejects_canvas_fields_on_wallpaper() -> TestResult {
        let engine = PricingEngine::default();
        let item = engine.wallpaper(selection("1", "1", false))?;

        let result = engine.apply(
            &item,
            &LineItemPatch {
                size_label: Some("50x70".to_string()),
                ..LineItemPatch::default()
            },
        );

        assert_eq!(
            result,
            Err(PricingError::FieldNotApplicable {
                field: "sizeLabel",
                kind: "wallpaper",
            })
        );

        Ok(())
    }

    #[test]
    fn apply_changes_canvas_size() -> TestResult {
        let engine = PricingEngine::default();
        let item = engine.canvas(CanvasSelection {
            canvas_image: String::new(),
            canvas_name: "Harbour".to_string(),
            size_label: "30x40".to_string(),
        })?;

        let updated = engine.apply(
            &item,
            &LineItemPatch {
                size_label: Some("100x150".to_string()),
                ..LineItemPatch::default()
            },
        )?;

        assert_eq!(updated.preco_total(), Money::from_minor(150_00, EUR));

        Ok(())
    }

    #[test]
    fn engine_rejects_sizes_in_another_currency() -> TestResult {
        let sizes = SizeTable::new([SizeOption::new(
            "30x40",
            30,
            40,
            Money::from_minor(25_00, GBP),
        )])?;

        let result = PricingEngine::new(PricingConfig::default(), sizes);

        assert!(matches!(
            result,
            Err(PricingError::CurrencyMismatch("GBP", "EUR"))
        ));

        Ok(())
    }

    #[test]
    fn percent_of_minor_rounds_half_away_from_zero() -> TestResult {
        let rate = Percentage::from(Decimal::new(23, 2));

        assert_eq!(percent_of_minor(&rate, 9_000)?, 2_070);
        assert_eq!(percent_of_minor(&rate, 50)?, 12); // 11.5

        Ok(())
    }

    #[test]
    fn decimal_round_trip() -> TestResult {
        let money = money_from_decimal(Decimal::new(110_70, 2), EUR)?;

        assert_eq!(money, Money::from_minor(110_70, EUR));
        assert_eq!(decimal_amount(&money), Decimal::new(110_70, 2));

        Ok(())
    }
}
