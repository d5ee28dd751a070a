//! Integration test for a full cart session over a file-backed store.
//!
//! A guest browses the menu, builds a cart with repeated and configured
//! items, adjusts quantities, and comes back in a later session to find the
//! cart exactly as they left it:
//!
//! 1. Tapsilog x1 added twice merges into one line of quantity 2.
//! 2. Halo-Halo (Large) with a double Leche Flan topping is a distinct line
//!    from a plain Halo-Halo; the add-on multiset is part of identity.
//! 3. A catalog price change after the first insertion does not reprice the
//!    line already in the cart.
//! 4. Setting a quantity to zero removes the line.
//! 5. A second cart rehydrated from the same directory sees the same lines.

use testresult::TestResult;

use campfire::prelude::*;

fn tapsilog() -> MenuItem {
    MenuItem {
        id: "tapsilog".into(),
        name: "Tapsilog".into(),
        description: "Beef tapa, garlic rice, egg".into(),
        base_price: 150_00,
        category: "breakfast".into(),
        available: true,
        popular: true,
        variations: Vec::new(),
        add_ons: Vec::new(),
        discount: None,
    }
}

fn halo_halo() -> MenuItem {
    MenuItem {
        id: "halo-halo".into(),
        name: "Halo-Halo".into(),
        description: "Shaved ice with everything".into(),
        base_price: 120_00,
        category: "desserts".into(),
        available: true,
        popular: false,
        variations: vec![Variation {
            id: "large".into(),
            name: "Large".into(),
            price: 30_00,
        }],
        add_ons: vec![AddOn {
            id: "leche-flan".into(),
            name: "Leche Flan".into(),
            price: 25_00,
            category: "toppings".into(),
        }],
        discount: None,
    }
}

#[test]
fn cart_session_merges_configures_and_survives_restart() -> TestResult {
    let dir = tempfile::tempdir()?;

    let mut cart = Cart::with_storage(Box::new(JsonFileStorage::new(dir.path())));
    assert!(cart.is_empty());

    // Same configuration twice merges into one line.
    let tapsilog_key = cart.add(&tapsilog(), 1, None, &[]);
    cart.add(&tapsilog(), 1, None, &[]);
    assert_eq!(cart.len(), 1);
    assert_eq!(cart.get(&tapsilog_key).map(|line| line.quantity), Some(2));

    // A configured Halo-Halo is its own line; 120 + 30 + 2 x 25 = 200.
    let halo = halo_halo();
    let flan = halo.add_ons[0].clone();
    let configured_key = cart.add(
        &halo,
        1,
        Some(halo.variations[0].clone()),
        &[flan.clone(), flan],
    );
    let plain_key = cart.add(&halo, 1, None, &[]);

    assert_ne!(configured_key, plain_key);
    assert_eq!(cart.len(), 3);
    assert_eq!(
        cart.get(&configured_key).map(|line| line.unit_price),
        Some(200_00)
    );

    // Repricing the catalog does not touch the captured line.
    let mut repriced = tapsilog();
    repriced.base_price = 175_00;
    cart.add(&repriced, 1, None, &[]);
    assert_eq!(cart.get(&tapsilog_key).map(|line| line.quantity), Some(3));
    assert_eq!(
        cart.get(&tapsilog_key).map(|line| line.unit_price),
        Some(150_00)
    );

    // 3 x 150 + 200 + 120 = 770.
    assert_eq!(cart.total_price(), 770_00);
    assert_eq!(cart.total_items(), 5);

    // Zero removes; the other lines stay.
    cart.update_quantity(&plain_key, 0);
    assert_eq!(cart.len(), 2);

    // A later session over the same directory sees the same cart.
    let restored = Cart::with_storage(Box::new(JsonFileStorage::new(dir.path())));
    assert_eq!(restored.len(), 2);
    assert_eq!(restored.total_price(), 650_00);
    assert_eq!(
        restored.get(&configured_key).map(|line| line.unit_price),
        Some(200_00)
    );

    Ok(())
}

#[test]
fn clearing_the_cart_persists_the_empty_state() -> TestResult {
    let dir = tempfile::tempdir()?;

    let mut cart = Cart::with_storage(Box::new(JsonFileStorage::new(dir.path())));
    cart.add(&tapsilog(), 2, None, &[]);
    cart.clear();

    let restored = Cart::with_storage(Box::new(JsonFileStorage::new(dir.path())));
    assert!(restored.is_empty());

    Ok(())
}
