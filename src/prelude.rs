//! Realce prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{Cart, CartError},
    catalog::{CatalogError, SizeOption, SizeTable},
    config::PricingConfig,
    dimensions::{Dimension, Quantity, ValidationError},
    fixtures::{Fixture, FixtureError},
    items::{
        AdhesiveType, Canvas, CanvasSelection, CartLineItem, Finish, LineItemId, LineItemKind,
        LineItemPatch, ParseOptionError, Wallpaper, WallpaperSelection,
    },
    pricing::{PricingEngine, PricingError},
    receipt::{Receipt, ReceiptError},
    store::{
        CartStorage, CartStore, CodecError, FileStorage, MemoryStorage, StorageError, StoreError,
    },
    totals::{OrderTotals, TotalsError},
};
