//! Cart editing and order totals through the cart store.

use rusty_money::{Money, iso::EUR};
use testresult::TestResult;

use realce::prelude::*;

fn wallpaper(width: &str, height: &str, price_minor: i64) -> WallpaperSelection {
    WallpaperSelection {
        texture_image: "/textures/concrete.jpg".to_string(),
        texture_name: "Concrete".to_string(),
        category: "industrial".to_string(),
        price_per_sqm: Money::from_minor(price_minor, EUR),
        width_m: Dimension::coerce(width),
        height_m: Dimension::coerce(height),
        finish: Finish::Glossy,
        lamination: false,
        adhesive_type: AdhesiveType::WithoutAdhesive,
    }
}

fn canvas(size: &str) -> CanvasSelection {
    CanvasSelection {
        canvas_image: "/canvas/dunes.jpg".to_string(),
        canvas_name: "Dunes".to_string(),
        size_label: size.to_string(),
    }
}

fn store() -> CartStore<MemoryStorage> {
    CartStore::open(MemoryStorage::new(), PricingEngine::default())
}

#[test]
fn empty_cart_has_zero_totals_and_disables_checkout() -> TestResult {
    let store = store();
    let totals = store.totals()?;

    assert_eq!(totals.subtotal(), Money::from_minor(0, EUR));
    assert_eq!(totals.shipping(), Money::from_minor(0, EUR));
    assert_eq!(totals.vat(), Money::from_minor(0, EUR));
    assert_eq!(totals.total(), Money::from_minor(0, EUR));
    assert_eq!(totals.item_count(), 0);
    assert!(!totals.checkout_enabled());

    Ok(())
}

#[test]
fn shipping_is_charged_below_the_threshold() -> TestResult {
    let mut store = store();

    // 4 m² at 20.00
    store.add_wallpaper(wallpaper("2", "2", 20_00))?;

    let totals = store.totals()?;

    assert_eq!(totals.subtotal(), Money::from_minor(80_00, EUR));
    assert_eq!(totals.shipping(), Money::from_minor(10_00, EUR));
    assert_eq!(totals.vat(), Money::from_minor(20_70, EUR));
    assert_eq!(totals.total(), Money::from_minor(110_70, EUR));
    assert!(totals.checkout_enabled());

    Ok(())
}

#[test]
fn shipping_is_free_from_the_threshold_inclusive() -> TestResult {
    let mut store = store();

    let id = store.add_canvas(canvas("50x70"))?;
    store.set_quantity(&id, 2)?;

    let at_threshold = store.totals()?;

    assert_eq!(at_threshold.subtotal(), Money::from_minor(100_00, EUR));
    assert!(at_threshold.free_shipping());
    assert_eq!(at_threshold.total(), Money::from_minor(123_00, EUR));

    store.add_canvas(canvas("50x70"))?;

    let above = store.totals()?;

    assert_eq!(above.subtotal(), Money::from_minor(150_00, EUR));
    assert_eq!(above.shipping(), Money::from_minor(0, EUR));
    assert_eq!(above.vat(), Money::from_minor(34_50, EUR));
    assert_eq!(above.total(), Money::from_minor(184_50, EUR));

    Ok(())
}

#[test]
fn quantity_never_drops_below_one() -> TestResult {
    let mut store = store();
    let id = store.add_canvas(canvas("30x40"))?;

    assert_eq!(store.decrement(&id)?, Quantity::ONE);
    assert_eq!(store.set_quantity(&id, 0)?, Quantity::ONE);
    assert_eq!(store.set_quantity(&id, -7)?, Quantity::ONE);
    assert_eq!(store.increment(&id)?, Quantity::new(2));
    assert_eq!(store.decrement(&id)?, Quantity::ONE);

    Ok(())
}

#[test]
fn updating_one_item_leaves_the_others_alone() -> TestResult {
    let mut store = store();

    let first = store.add_wallpaper(wallpaper("2", "2", 20_00))?;
    let second = store.add_wallpaper(wallpaper("2", "2", 20_00))?;

    let patch = LineItemPatch {
        width_m: Some(Dimension::coerce("3")),
        lamination: Some(true),
        ..LineItemPatch::default()
    };

    store.update(&first, &patch)?;

    let updated = store.cart().get(&first).map(CartLineItem::preco_total);
    let untouched = store.cart().get(&second).map(CartLineItem::preco_total);

    // 6 m² × (20.00 + 8.00)
    assert_eq!(updated, Some(Money::from_minor(168_00, EUR)));
    assert_eq!(untouched, Some(Money::from_minor(80_00, EUR)));
    assert_eq!(store.totals()?.subtotal(), Money::from_minor(248_00, EUR));

    Ok(())
}

#[test]
fn canvas_fields_cannot_be_set_on_wallpaper() -> TestResult {
    let mut store = store();
    let id = store.add_wallpaper(wallpaper("1", "1", 20_00))?;

    let patch = LineItemPatch {
        size_label: Some("50x70".to_string()),
        ..LineItemPatch::default()
    };

    let result = store.update(&id, &patch);

    assert!(matches!(
        result,
        Err(StoreError::Cart(CartError::Pricing(
            PricingError::FieldNotApplicable { .. }
        )))
    ));

    let price = store.cart().get(&id).map(CartLineItem::preco_total);

    assert_eq!(price, Some(Money::from_minor(20_00, EUR)));

    Ok(())
}

#[test]
fn operations_on_missing_items_fail() {
    let mut store = store();
    let missing = LineItemId::from("missing");

    assert!(matches!(
        store.increment(&missing),
        Err(StoreError::Cart(CartError::ItemNotFound(_)))
    ));
    assert!(matches!(store.remove(&missing), Ok(None)));
}

#[test]
fn clear_empties_the_cart() -> TestResult {
    let mut store = store();

    store.add_canvas(canvas("70x100"))?;
    store.add_wallpaper(wallpaper("1", "2", 20_00))?;
    store.clear()?;

    assert!(store.cart().is_empty());
    assert!(!store.totals()?.checkout_enabled());
    assert_eq!(store.storage().blob(), None);

    Ok(())
}
