//! Line item patches

use rusty_money::{Money, iso::Currency};

use crate::{
    dimensions::{Dimension, Quantity},
    items::{AdhesiveType, Finish},
};

/// New values for some fields of a line item, as edited on the cart page.
///
/// Fields left as `None` keep their current value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LineItemPatch {
    /// New wallpaper width.
    pub width_m: Option<Dimension>,

    /// New wallpaper height.
    pub height_m: Option<Dimension>,

    /// Add or drop the wallpaper lamination.
    pub lamination: Option<bool>,

    /// New wallpaper price per square metre.
    pub price_per_sqm: Option<Money<'static, Currency>>,

    /// New wallpaper finish.
    pub finish: Option<Finish>,

    /// New wallpaper backing.
    pub adhesive_type: Option<AdhesiveType>,

    /// New canvas size label.
    pub size_label: Option<String>,

    /// New quantity.
    pub quantity: Option<Quantity>,
}

impl LineItemPatch {
    /// Whether the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        *self == LineItemPatch::default()
    }

    /// Whether the patch changes a field the unit price depends on.
    pub fn touches_pricing(&self) -> bool {
        self.width_m.is_some()
            || self.height_m.is_some()
            || self.lamination.is_some()
            || self.price_per_sqm.is_some()
            || self.size_label.is_some()
    }

    /// Whether the patch sets any wallpaper-only field.
    pub(crate) fn wallpaper_field(&self) -> Option<&'static str> {
        [
            ("widthM", self.width_m.is_some()),
            ("heightM", self.height_m.is_some()),
            ("lamination", self.lamination.is_some()),
            ("pricePerSqm", self.price_per_sqm.is_some()),
            ("finish", self.finish.is_some()),
            ("adhesiveType", self.adhesive_type.is_some()),
        ]
        .into_iter()
        .find_map(|(field, set)| set.then_some(field))
    }

    /// Whether the patch sets any canvas-only field.
    pub(crate) fn canvas_field(&self) -> Option<&'static str> {
        self.size_label.as_ref().map(|_| "sizeLabel")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_patch_is_empty() {
        assert!(LineItemPatch::default().is_empty());
        assert!(!LineItemPatch::default().touches_pricing());
    }

    #[test]
    fn quantity_and_finish_do_not_touch_pricing() {
        let patch = LineItemPatch {
            quantity: Some(Quantity::new(2)),
            finish: Some(Finish::Glossy),
            ..LineItemPatch::default()
        };

        assert!(!patch.is_empty());
        assert!(!patch.touches_pricing());
    }

    #[test]
    fn dimensions_touch_pricing() {
        let patch = LineItemPatch {
            height_m: Some(Dimension::ZERO),
            ..LineItemPatch::default()
        };

        assert!(patch.touches_pricing());
        assert_eq!(patch.wallpaper_field(), Some("heightM"));
        assert_eq!(patch.canvas_field(), None);
    }

    #[test]
    fn size_label_is_a_canvas_field() {
        let patch = LineItemPatch {
            size_label: Some("50x70".to_string()),
            ..LineItemPatch::default()
        };

        assert_eq!(patch.canvas_field(), Some("sizeLabel"));
        assert_eq!(patch.wallpaper_field(), None);
    }
}
