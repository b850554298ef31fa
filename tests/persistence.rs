//! Cart persistence through a JSON file.

use std::fs;

use rusty_money::{Money, iso::EUR};
use tempfile::tempdir;
use testresult::TestResult;

use realce::{prelude::*, store::codec};

fn wallpaper() -> WallpaperSelection {
    WallpaperSelection {
        texture_image: "/textures/terrazzo.jpg".to_string(),
        texture_name: "Terrazzo".to_string(),
        category: "stone".to_string(),
        price_per_sqm: Money::from_minor(31_25, EUR),
        width_m: Dimension::coerce("2,4"),
        height_m: Dimension::coerce("2.65"),
        finish: Finish::Glossy,
        lamination: true,
        adhesive_type: AdhesiveType::WithAdhesive,
    }
}

fn canvas() -> CanvasSelection {
    CanvasSelection {
        canvas_image: "/canvas/alfama.jpg".to_string(),
        canvas_name: "Alfama".to_string(),
        size_label: "60x90".to_string(),
    }
}

#[test]
fn reopened_store_restores_items_and_totals() -> TestResult {
    let dir = tempdir()?;
    let path = dir.path().join("state/cart.json");

    let mut store = CartStore::open(FileStorage::new(&path), PricingEngine::default());

    store.add_wallpaper(wallpaper())?;
    let canvas_id = store.add_canvas(canvas())?;
    store.set_quantity(&canvas_id, 3)?;

    let reopened = CartStore::open(FileStorage::new(&path), PricingEngine::default());

    assert_eq!(reopened.cart(), store.cart());
    assert_eq!(reopened.totals()?, store.totals()?);

    Ok(())
}

#[test]
fn stored_blob_uses_storefront_field_names() -> TestResult {
    let dir = tempdir()?;
    let path = dir.path().join("cart.json");

    let mut store = CartStore::open(FileStorage::new(&path), PricingEngine::default());
    store.add_canvas(canvas())?;

    let blob = fs::read_to_string(&path)?;

    let fields = [
        r#""type":"canvas""#,
        r#""precoTotal""#,
        r#""sizeLabel":"60x90""#,
        r#""quantity":1"#,
    ];

    for field in fields {
        assert!(blob.contains(field), "{field} missing from {blob}");
    }

    Ok(())
}

#[test]
fn legacy_and_partial_items_are_defaulted_on_load() -> TestResult {
    let dir = tempdir()?;
    let path = dir.path().join("cart.json");

    fs::write(
        &path,
        r#"[
            {"id": 7, "type": "wallpaper", "textureName": "Old", "pricePerSqm": 20,
             "widthM": 2, "heightM": 2, "precoTotal": 1, "quantidade": 2},
            {"type": "canvas", "canvasName": "Lisbon", "sizeLabel": "30x40"},
            {"type": "sticker"}
        ]"#,
    )?;

    let store = CartStore::open(FileStorage::new(&path), PricingEngine::default());
    let items = store.cart().items();

    let [wallpaper, canvas] = items else {
        panic!("expected two decoded items, got {}", items.len());
    };

    assert_eq!(wallpaper.id().as_str(), "7");
    assert_eq!(wallpaper.quantity(), Quantity::new(2));
    assert_eq!(wallpaper.preco_total(), Money::from_minor(80_00, EUR));

    assert_eq!(canvas.quantity(), Quantity::ONE);
    assert_eq!(canvas.preco_total(), Money::from_minor(25_00, EUR));
    assert!(!canvas.id().as_str().is_empty());

    // 2 × 80.00 + 25.00
    assert_eq!(store.totals()?.subtotal(), Money::from_minor(185_00, EUR));

    Ok(())
}

#[test]
fn corrupt_file_loads_as_empty_cart() -> TestResult {
    let dir = tempdir()?;
    let path = dir.path().join("cart.json");

    fs::write(&path, "{not json")?;

    let mut store = CartStore::open(FileStorage::new(&path), PricingEngine::default());

    assert!(store.cart().is_empty());

    store.add_canvas(canvas())?;

    let decoded = codec::decode(&fs::read_to_string(&path)?, &PricingEngine::default());

    assert_eq!(decoded.len(), 1);

    Ok(())
}

#[test]
fn clearing_removes_the_file() -> TestResult {
    let dir = tempdir()?;
    let path = dir.path().join("cart.json");

    let mut store = CartStore::open(FileStorage::new(&path), PricingEngine::default());

    store.add_canvas(canvas())?;
    assert!(path.exists());

    store.clear()?;

    assert!(!path.exists());
    assert!(store.load().is_empty());

    Ok(())
}
