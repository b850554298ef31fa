//! Stored cart format
//!
//! The cart is stored as a JSON array of camelCase objects tagged by `type`:
//!
//! ```json
//! [
//!   {"id": "…", "type": "wallpaper", "precoTotal": 99.0, "quantity": 1, "textureImage": "…",
//!    "textureName": "Marble", "category": "stone", "pricePerSqm": 25.0, "widthM": 2.5,
//!    "heightM": 1.2, "area": 3.0, "finish": "glossy", "lamination": true,
//!    "adhesiveType": "with-adhesive"},
//!   {"id": "…", "type": "canvas", "precoTotal": 50.0, "quantity": 2, "canvasImage": "…",
//!    "canvasName": "Harbour", "sizeLabel": "50x70", "widthCm": 50, "heightCm": 70,
//!    "basePrice": 50.0}
//! ]
//! ```
//!
//! Items written by older versions may lack fields. Decoding fills them in:
//!
//! - `quantity` falls back to the legacy `quantidade`, then to 1. Values below 1 clamp to 1.
//! - `widthM` and `heightM` default to 0, so the area floors at the minimum.
//! - `adhesiveType` defaults to `with-adhesive` and `finish` to `matte`.
//! - A missing `id` gets a fresh one.
//! - Numbers may be stored as text. A blank or unreadable number counts as missing.
//!
//! Wallpaper items are always repriced, so a stale `precoTotal` never survives a load. Canvas items
//! keep the price they were added at.

use std::{fmt::Display, str::FromStr};

use rust_decimal::{Decimal, prelude::ToPrimitive};
use rusty_money::{Money, iso::Currency};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::{
    cart::Cart,
    catalog::{SizeOption, SizeTable},
    dimensions::{Dimension, Quantity},
    items::{Canvas, CartLineItem, LineItemId, LineItemKind, Wallpaper},
    pricing::{PricingEngine, PricingError, decimal_amount, money_from_decimal},
};

/// Errors raised while encoding or decoding a stored cart.
#[derive(Debug, Error)]
pub enum CodecError {
    /// Wrapped JSON error.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// The item has no `type` and none can be inferred from its fields.
    #[error("stored item has no type")]
    MissingType,

    /// The item has an unknown `type`.
    #[error("unknown stored item type: {0}")]
    UnknownType(String),

    /// A field required to price the item is missing.
    #[error("stored {kind} item is missing {field}")]
    MissingField {
        /// Type of the item.
        kind: &'static str,

        /// Stored name of the field.
        field: &'static str,
    },

    /// A stored amount is negative.
    #[error("stored {field} must not be negative: {value}")]
    NegativeAmount {
        /// Stored name of the field.
        field: &'static str,

        /// Stored value.
        value: Decimal,
    },

    /// The item could not be priced.
    #[error(transparent)]
    Pricing(#[from] PricingError),
}

/// Identifier as found in storage. Older carts used numeric ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
enum StoredId {
    Text(String),
    Number(serde_json::Number),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StoredType {
    Wallpaper,
    Canvas,
}

/// One line item as found in storage, every field optional.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredLineItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<StoredId>,

    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    kind: Option<String>,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "rust_decimal::serde::float_option::serialize",
        deserialize_with = "lenient_decimal"
    )]
    preco_total: Option<Decimal>,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_integer"
    )]
    quantity: Option<i64>,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_integer"
    )]
    quantidade: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    texture_image: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    texture_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    category: Option<String>,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "rust_decimal::serde::float_option::serialize",
        deserialize_with = "lenient_decimal"
    )]
    price_per_sqm: Option<Decimal>,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "rust_decimal::serde::float_option::serialize",
        deserialize_with = "lenient_decimal"
    )]
    width_m: Option<Decimal>,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "rust_decimal::serde::float_option::serialize",
        deserialize_with = "lenient_decimal"
    )]
    height_m: Option<Decimal>,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "rust_decimal::serde::float_option::serialize",
        deserialize_with = "lenient_decimal"
    )]
    area: Option<Decimal>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    finish: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    lamination: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    adhesive_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    canvas_image: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    canvas_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    size_label: Option<String>,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_integer"
    )]
    width_cm: Option<u32>,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_integer"
    )]
    height_cm: Option<u32>,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "rust_decimal::serde::float_option::serialize",
        deserialize_with = "lenient_decimal"
    )]
    base_price: Option<Decimal>,
}

impl StoredLineItem {
    fn stored_type(&self) -> Result<StoredType, CodecError> {
        match self.kind.as_deref() {
            Some("wallpaper") => Ok(StoredType::Wallpaper),
            Some("canvas") => Ok(StoredType::Canvas),
            Some(other) => Err(CodecError::UnknownType(other.to_string())),
            None if self.size_label.is_some() || self.canvas_name.is_some() => {
                Ok(StoredType::Canvas)
            }
            None if self.price_per_sqm.is_some() || self.texture_name.is_some() => {
                Ok(StoredType::Wallpaper)
            }
            None => Err(CodecError::MissingType),
        }
    }

    fn into_line_item(mut self, engine: &PricingEngine) -> Result<CartLineItem, CodecError> {
        let stored_type = self.stored_type()?;
        let currency = engine.config().currency;

        let id = match self.id.take() {
            Some(StoredId::Text(id)) if !id.trim().is_empty() => LineItemId::from(id),
            Some(StoredId::Number(id)) => LineItemId::from(id.to_string()),
            _ => LineItemId::generate(),
        };

        let quantity = self
            .quantity
            .or(self.quantidade)
            .map_or(Quantity::ONE, Quantity::new);

        let kind = match stored_type {
            StoredType::Wallpaper => LineItemKind::Wallpaper(self.into_wallpaper(currency)?),
            StoredType::Canvas => LineItemKind::Canvas(self.into_canvas(engine.sizes(), currency)?),
        };

        let mut item = CartLineItem::new(id, kind, Money::from_minor(0, currency), quantity);

        engine.reprice(&mut item)?;

        Ok(item)
    }

    fn into_wallpaper(self, currency: &'static Currency) -> Result<Wallpaper, CodecError> {
        let price_per_sqm = self.price_per_sqm.ok_or(CodecError::MissingField {
            kind: "wallpaper",
            field: "pricePerSqm",
        })?;

        Ok(Wallpaper {
            texture_image: self.texture_image.unwrap_or_default(),
            texture_name: self.texture_name.unwrap_or_default(),
            category: self.category.unwrap_or_default(),
            price_per_sqm: stored_money("pricePerSqm", price_per_sqm, currency)?,
            width_m: stored_dimension(self.width_m),
            height_m: stored_dimension(self.height_m),
            area: self.area.unwrap_or_default(),
            finish: stored_option(self.finish.as_deref()),
            lamination: self.lamination.unwrap_or(false),
            adhesive_type: stored_option(self.adhesive_type.as_deref()),
        })
    }

    fn into_canvas(
        self,
        sizes: &SizeTable,
        currency: &'static Currency,
    ) -> Result<Canvas, CodecError> {
        let label = self.size_label.ok_or(CodecError::MissingField {
            kind: "canvas",
            field: "sizeLabel",
        })?;

        let catalog = sizes.get(&label);

        let base_price = match (self.base_price, self.preco_total) {
            (Some(amount), _) => stored_money("basePrice", amount, currency)?,
            (None, Some(amount)) => stored_money("precoTotal", amount, currency)?,
            (None, None) => catalog
                .map(SizeOption::base_price)
                .ok_or_else(|| PricingError::UnknownSize(label.clone()))?,
        };

        let width_cm = self
            .width_cm
            .or_else(|| catalog.map(SizeOption::width_cm))
            .unwrap_or_default();
        let height_cm = self
            .height_cm
            .or_else(|| catalog.map(SizeOption::height_cm))
            .unwrap_or_default();

        Ok(Canvas {
            canvas_image: self.canvas_image.unwrap_or_default(),
            canvas_name: self.canvas_name.unwrap_or_default(),
            size: SizeOption::new(label, width_cm, height_cm, base_price),
        })
    }
}

impl From<&CartLineItem> for StoredLineItem {
    fn from(item: &CartLineItem) -> Self {
        let mut stored = StoredLineItem {
            id: Some(StoredId::Text(item.id().to_string())),
            kind: Some(item.kind().type_name().to_string()),
            preco_total: Some(decimal_amount(&item.preco_total())),
            quantity: Some(i64::from(item.quantity().get())),
            ..StoredLineItem::default()
        };

        match item.kind() {
            LineItemKind::Wallpaper(wallpaper) => {
                stored.texture_image = Some(wallpaper.texture_image.clone());
                stored.texture_name = Some(wallpaper.texture_name.clone());
                stored.category = Some(wallpaper.category.clone());
                stored.price_per_sqm = Some(decimal_amount(&wallpaper.price_per_sqm));
                stored.width_m = Some(wallpaper.width_m.value());
                stored.height_m = Some(wallpaper.height_m.value());
                stored.area = Some(wallpaper.area);
                stored.finish = Some(wallpaper.finish.as_str().to_string());
                stored.lamination = Some(wallpaper.lamination);
                stored.adhesive_type = Some(wallpaper.adhesive_type.as_str().to_string());
            }
            LineItemKind::Canvas(canvas) => {
                stored.canvas_image = Some(canvas.canvas_image.clone());
                stored.canvas_name = Some(canvas.canvas_name.clone());
                stored.size_label = Some(canvas.size.size().to_string());
                stored.width_cm = Some(canvas.size.width_cm());
                stored.height_cm = Some(canvas.size.height_cm());
                stored.base_price = Some(decimal_amount(&canvas.size.base_price()));
            }
        }

        stored
    }
}

fn stored_money(
    field: &'static str,
    amount: Decimal,
    currency: &'static Currency,
) -> Result<Money<'static, Currency>, CodecError> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(CodecError::NegativeAmount {
            field,
            value: amount,
        });
    }

    Ok(money_from_decimal(amount, currency)?)
}

fn stored_dimension(value: Option<Decimal>) -> Dimension {
    value
        .and_then(|value| Dimension::new(value).ok())
        .unwrap_or(Dimension::ZERO)
}

fn stored_option<T>(value: Option<&str>) -> T
where
    T: FromStr + Default,
    T::Err: Display,
{
    value.map_or_else(T::default, |value| {
        value.parse().unwrap_or_else(|err| {
            debug!(%err, "using default for unknown stored option");

            T::default()
        })
    })
}

/// Reads a stored number, also accepting numeric text with a point or comma decimal.
///
/// Blank or non-numeric values read as absent, so the field falls back to its default instead of
/// the whole item being dropped.
fn lenient_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;

    Ok(value.as_ref().and_then(stored_decimal))
}

/// Reads a stored whole number, leniently as [`lenient_decimal`]. Fractions read as absent.
fn lenient_integer<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: TryFrom<i64>,
{
    let value = lenient_decimal(deserializer)?;

    Ok(value
        .filter(|value| value.fract().is_zero())
        .as_ref()
        .and_then(ToPrimitive::to_i64)
        .and_then(|value| T::try_from(value).ok()))
}

fn stored_decimal(value: &Value) -> Option<Decimal> {
    let text = match value {
        Value::Number(number) => number.to_string(),
        Value::String(text) => text.trim().replace(',', "."),
        _ => String::new(),
    };

    let parsed = Decimal::from_str(&text)
        .or_else(|_err| Decimal::from_scientific(&text))
        .ok();

    if parsed.is_none() {
        debug!(%value, "ignoring unreadable stored number");
    }

    parsed
}

/// Encodes a cart as a JSON blob.
///
/// # Errors
///
/// Returns [`CodecError::Json`] if the cart cannot be serialized.
pub fn encode(cart: &Cart) -> Result<String, CodecError> {
    let stored: Vec<StoredLineItem> = cart.iter().map(StoredLineItem::from).collect();

    Ok(serde_json::to_string(&stored)?)
}

/// Decodes a single stored line item, filling in missing fields and repricing it.
///
/// # Errors
///
/// Returns a [`CodecError`] if the item cannot be decoded or priced.
pub fn decode_item(value: Value, engine: &PricingEngine) -> Result<CartLineItem, CodecError> {
    let stored: StoredLineItem = serde_json::from_value(value)?;

    stored.into_line_item(engine)
}

/// Decodes a JSON blob into a cart.
///
/// Never fails: a blob that is not a JSON array yields an empty cart, and items that cannot be
/// decoded are dropped. Both cases are logged.
pub fn decode(blob: &str, engine: &PricingEngine) -> Cart {
    let values = match serde_json::from_str::<Vec<Value>>(blob) {
        Ok(values) => values,
        Err(err) => {
            warn!(%err, "stored cart is corrupt, starting with an empty cart");

            return Cart::new();
        }
    };

    let items: Vec<CartLineItem> = values
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| match decode_item(value, engine) {
            Ok(item) => Some(item),
            Err(err) => {
                warn!(index, %err, "dropping stored line item");

                None
            }
        })
        .collect();

    Cart::with_items(items)
}
