//! Items
//!
//! Cart line items. A line item is one configured product: a wallpaper cut to size or a canvas
//! print of a catalog size. Line items are created and repriced by the
//! [`PricingEngine`](crate::pricing::PricingEngine), which keeps `preco_total` in step with the
//! fields it is derived from.

use std::{fmt, str::FromStr};

use decimal_percentage::Percentage;
use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use thiserror::Error;
use uuid::Uuid;

use crate::{
    catalog::SizeOption,
    dimensions::{Dimension, Quantity},
    pricing::{PricingError, percent_of_minor},
};

pub mod patch;

pub use patch::LineItemPatch;

/// Error parsing a product option from text.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown {option}: {value}")]
pub struct ParseOptionError {
    option: &'static str,
    value: String,
}

/// Client-generated identifier of a line item.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LineItemId(String);

impl LineItemId {
    /// Generates a fresh, unique identifier.
    pub fn generate() -> Self {
        LineItemId(Uuid::now_v7().to_string())
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for LineItemId {
    fn from(value: String) -> Self {
        LineItemId(value)
    }
}

impl From<&str> for LineItemId {
    fn from(value: &str) -> Self {
        LineItemId(value.to_string())
    }
}

impl fmt::Display for LineItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Wallpaper print finish. Has no effect on price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Finish {
    /// Glossy finish.
    Glossy,

    /// Matte finish.
    #[default]
    Matte,
}

impl Finish {
    /// Stored name of the finish.
    pub fn as_str(self) -> &'static str {
        match self {
            Finish::Glossy => "glossy",
            Finish::Matte => "matte",
        }
    }
}

impl FromStr for Finish {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "glossy" => Ok(Finish::Glossy),
            "matte" => Ok(Finish::Matte),
            other => Err(ParseOptionError {
                option: "finish",
                value: other.to_string(),
            }),
        }
    }
}

/// Wallpaper backing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AdhesiveType {
    /// Self-adhesive backing.
    #[default]
    WithAdhesive,

    /// Plain backing, applied with paste.
    WithoutAdhesive,
}

impl AdhesiveType {
    /// Stored name of the adhesive type.
    pub fn as_str(self) -> &'static str {
        match self {
            AdhesiveType::WithAdhesive => "with-adhesive",
            AdhesiveType::WithoutAdhesive => "without-adhesive",
        }
    }
}

impl FromStr for AdhesiveType {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "with-adhesive" => Ok(AdhesiveType::WithAdhesive),
            "without-adhesive" => Ok(AdhesiveType::WithoutAdhesive),
            other => Err(ParseOptionError {
                option: "adhesive type",
                value: other.to_string(),
            }),
        }
    }
}

/// A wallpaper cut to the customer's wall.
#[derive(Debug, Clone, PartialEq)]
pub struct Wallpaper {
    pub(crate) texture_image: String,
    pub(crate) texture_name: String,
    pub(crate) category: String,
    pub(crate) price_per_sqm: Money<'static, Currency>,
    pub(crate) width_m: Dimension,
    pub(crate) height_m: Dimension,
    pub(crate) area: Decimal,
    pub(crate) finish: Finish,
    pub(crate) lamination: bool,
    pub(crate) adhesive_type: AdhesiveType,
}

impl Wallpaper {
    /// Texture image URL.
    pub fn texture_image(&self) -> &str {
        &self.texture_image
    }

    /// Texture display name.
    pub fn texture_name(&self) -> &str {
        &self.texture_name
    }

    /// Catalog category of the texture.
    pub fn category(&self) -> &str {
        &self.category
    }

    /// Price per square metre.
    pub fn price_per_sqm(&self) -> Money<'static, Currency> {
        self.price_per_sqm
    }

    /// Width in metres.
    pub fn width_m(&self) -> Dimension {
        self.width_m
    }

    /// Height in metres.
    pub fn height_m(&self) -> Dimension {
        self.height_m
    }

    /// Billable area in square metres.
    pub fn area(&self) -> Decimal {
        self.area
    }

    /// Print finish.
    pub fn finish(&self) -> Finish {
        self.finish
    }

    /// Whether the protective lamination is included.
    pub fn lamination(&self) -> bool {
        self.lamination
    }

    /// Backing type.
    pub fn adhesive_type(&self) -> AdhesiveType {
        self.adhesive_type
    }
}

/// A canvas print of a catalog size.
#[derive(Debug, Clone, PartialEq)]
pub struct Canvas {
    pub(crate) canvas_image: String,
    pub(crate) canvas_name: String,
    pub(crate) size: SizeOption,
}

impl Canvas {
    /// Canvas image URL.
    pub fn canvas_image(&self) -> &str {
        &self.canvas_image
    }

    /// Canvas display name.
    pub fn canvas_name(&self) -> &str {
        &self.canvas_name
    }

    /// Size chosen when the canvas was added. Dimensions are informational only.
    pub fn size(&self) -> &SizeOption {
        &self.size
    }
}

/// Product configuration of a line item.
#[derive(Debug, Clone, PartialEq)]
pub enum LineItemKind {
    /// Wallpaper priced by area.
    Wallpaper(Wallpaper),

    /// Canvas priced by size.
    Canvas(Canvas),
}

impl LineItemKind {
    /// Stored type tag.
    pub fn type_name(&self) -> &'static str {
        match self {
            LineItemKind::Wallpaper(_) => "wallpaper",
            LineItemKind::Canvas(_) => "canvas",
        }
    }
}

/// A configured product in the cart.
#[derive(Debug, Clone, PartialEq)]
pub struct CartLineItem {
    id: LineItemId,
    kind: LineItemKind,
    preco_total: Money<'static, Currency>,
    quantity: Quantity,
}

impl CartLineItem {
    pub(crate) fn new(
        id: LineItemId,
        kind: LineItemKind,
        preco_total: Money<'static, Currency>,
        quantity: Quantity,
    ) -> Self {
        Self {
            id,
            kind,
            preco_total,
            quantity,
        }
    }

    /// Identifier of the line item.
    pub fn id(&self) -> &LineItemId {
        &self.id
    }

    /// Product configuration.
    pub fn kind(&self) -> &LineItemKind {
        &self.kind
    }

    /// Price of a single unit, always in step with the configuration.
    pub fn preco_total(&self) -> Money<'static, Currency> {
        self.preco_total
    }

    /// Number of units.
    pub fn quantity(&self) -> Quantity {
        self.quantity
    }

    /// Display name of the product.
    pub fn name(&self) -> &str {
        match &self.kind {
            LineItemKind::Wallpaper(wallpaper) => &wallpaper.texture_name,
            LineItemKind::Canvas(canvas) => &canvas.canvas_name,
        }
    }

    /// Unit price multiplied by quantity.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::Overflow`] if the result does not fit in minor units.
    pub fn line_total(&self) -> Result<Money<'static, Currency>, PricingError> {
        let minor = self
            .preco_total
            .to_minor_units()
            .checked_mul(i64::from(self.quantity.get()))
            .ok_or(PricingError::Overflow)?;

        Ok(Money::from_minor(minor, self.preco_total.currency()))
    }

    /// VAT-inclusive unit price shown next to canvas items.
    ///
    /// Informational only: VAT is charged once, on the order totals.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::Overflow`] if the VAT cannot be represented in minor units.
    pub fn canvas_price_with_vat(
        &self,
        vat_rate: &Percentage,
    ) -> Result<Option<Money<'static, Currency>>, PricingError> {
        if !matches!(self.kind, LineItemKind::Canvas(_)) {
            return Ok(None);
        }

        let unit = self.preco_total.to_minor_units();
        let with_vat = unit
            .checked_add(percent_of_minor(vat_rate, unit)?)
            .ok_or(PricingError::Overflow)?;

        Ok(Some(Money::from_minor(with_vat, self.preco_total.currency())))
    }

    pub(crate) fn kind_mut(&mut self) -> &mut LineItemKind {
        &mut self.kind
    }

    pub(crate) fn set_preco_total(&mut self, preco_total: Money<'static, Currency>) {
        self.preco_total = preco_total;
    }

    pub(crate) fn set_quantity(&mut self, quantity: Quantity) {
        self.quantity = quantity;
    }
}

/// Wallpaper configuration chosen on the product page.
#[derive(Debug, Clone, PartialEq)]
pub struct WallpaperSelection {
    /// Texture image URL.
    pub texture_image: String,

    /// Texture display name.
    pub texture_name: String,

    /// Catalog category of the texture.
    pub category: String,

    /// Price per square metre of the texture.
    pub price_per_sqm: Money<'static, Currency>,

    /// Wall width in metres.
    pub width_m: Dimension,

    /// Wall height in metres.
    pub height_m: Dimension,

    /// Print finish.
    pub finish: Finish,

    /// Whether to add the protective lamination.
    pub lamination: bool,

    /// Backing type.
    pub adhesive_type: AdhesiveType,
}

/// Canvas configuration chosen on the product page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanvasSelection {
    /// Canvas image URL.
    pub canvas_image: String,

    /// Canvas display name.
    pub canvas_name: String,

    /// Size label from the size table.
    pub size_label: String,
}
