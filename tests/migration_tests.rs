//! The guest-to-server migration pass at login: complete transfers,
//! partial transfers and the empty-cart short-circuit.

mod common;

use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{
    carrito_item_json, mount_carrito, mount_login, mount_producto, producto_json, shop_against,
    usuario_json,
};
use leopardo_client::cart::{CartMode, MigrationOutcome};
use leopardo_client::storage::{KeyValueStorage, CART_STORAGE_KEY};

async fn seed_guest_cart(shop: &leopardo_client::Leopardo) {
    let ctx = shop.context();
    let mut cart = ctx.cart.lock().await;
    cart.add(5, Some("42".to_string()), 2).await.unwrap();
    cart.add(7, None, 1).await.unwrap();
}

async fn mount_catalog(server: &MockServer) {
    mount_producto(
        server,
        &producto_json(5, "Bota Cuero", 100000.0, None, &[("42", 10)]),
    )
    .await;
    mount_producto(server, &producto_json(7, "Correa Clásica", 45000.0, None, &[])).await;
}

#[tokio::test]
async fn full_migration_clears_guest_storage_and_reloads() {
    let server = MockServer::start().await;
    mount_catalog(&server).await;
    mount_login(&server, &usuario_json(1, "Ana", false)).await;
    Mock::given(method("POST"))
        .and(path("/carrito"))
        .respond_with(ResponseTemplate::new(201).set_body_json(carrito_item_json(
            90, 5, "Bota Cuero", Some("42"), 2, 100000.0,
        )))
        .expect(2)
        .mount(&server)
        .await;
    mount_carrito(
        &server,
        vec![
            carrito_item_json(90, 5, "Bota Cuero", Some("42"), 2, 100000.0),
            carrito_item_json(91, 7, "Correa Clásica", None, 1, 45000.0),
        ],
        245000.0,
    )
    .await;

    let (shop, storage, notifier) = shop_against(&server);
    seed_guest_cart(&shop).await;
    assert!(storage.get(CART_STORAGE_KEY).is_some());

    let (user, outcome) = shop.login("ana@example.com", "secreta").await.unwrap();
    assert_eq!(user.nombre, "Ana");
    assert_eq!(outcome, MigrationOutcome::Complete { migrated: 2 });
    assert!(outcome.is_complete());

    // Guest copy is gone; the engine now displays the server cart.
    assert!(storage.get(CART_STORAGE_KEY).is_none());
    let ctx = shop.context();
    let cart = ctx.cart.lock().await;
    assert_eq!(cart.mode(), CartMode::Authenticated);
    assert_eq!(cart.cart().items.len(), 2);
    assert_eq!(cart.total(), 245000.0);
    assert!(notifier.contains("se transfirió"));
}

#[tokio::test]
async fn partial_migration_is_reported_distinctly() {
    let server = MockServer::start().await;
    mount_catalog(&server).await;
    mount_login(&server, &usuario_json(1, "Ana", false)).await;
    // Producto 5 transfers; producto 7 is out of stock server-side.
    Mock::given(method("POST"))
        .and(path("/carrito"))
        .and(body_partial_json(json!({ "producto_id": 5 })))
        .respond_with(ResponseTemplate::new(201).set_body_json(carrito_item_json(
            90, 5, "Bota Cuero", Some("42"), 2, 100000.0,
        )))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/carrito"))
        .and(body_partial_json(json!({ "producto_id": 7 })))
        .respond_with(
            ResponseTemplate::new(422)
                .set_body_json(json!({ "error": "Producto agotado" })),
        )
        .expect(1)
        .mount(&server)
        .await;
    mount_carrito(
        &server,
        vec![carrito_item_json(90, 5, "Bota Cuero", Some("42"), 2, 100000.0)],
        200000.0,
    )
    .await;

    let (shop, storage, notifier) = shop_against(&server);
    seed_guest_cart(&shop).await;

    let (_user, outcome) = shop.login("ana@example.com", "secreta").await.unwrap();
    match &outcome {
        MigrationOutcome::Partial { migrated, failed } => {
            assert_eq!(*migrated, 1);
            assert_eq!(failed.len(), 1);
            assert_eq!(failed[0].producto_id, 7);
            assert_eq!(failed[0].reason, "Producto agotado");
        }
        other => panic!("expected a partial outcome, got {:?}", other),
    }
    assert!(!outcome.is_complete());

    // Storage is cleared regardless; the migrated item is visible.
    assert!(storage.get(CART_STORAGE_KEY).is_none());
    let ctx = shop.context();
    let cart = ctx.cart.lock().await;
    assert_eq!(cart.cart().items.len(), 1);
    assert_eq!(cart.cart().items[0].producto_id, 5);
    assert!(notifier.contains("1 de 2"));
}

#[tokio::test]
async fn empty_guest_cart_short_circuits_migration() {
    let server = MockServer::start().await;
    mount_login(&server, &usuario_json(1, "Ana", false)).await;
    // The short-circuit must not issue a single add request.
    Mock::given(method("POST"))
        .and(path("/carrito"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;
    mount_carrito(&server, vec![], 0.0).await;

    let (shop, _storage, _notifier) = shop_against(&server);
    let (_user, outcome) = shop.login("ana@example.com", "secreta").await.unwrap();
    assert_eq!(outcome, MigrationOutcome::Skipped);

    server.verify().await;
}

#[tokio::test]
async fn relogin_does_not_migrate_twice() {
    let server = MockServer::start().await;
    mount_catalog(&server).await;
    mount_login(&server, &usuario_json(1, "Ana", false)).await;
    // Exactly one transfer for the single guest item across both logins.
    Mock::given(method("POST"))
        .and(path("/carrito"))
        .respond_with(ResponseTemplate::new(201).set_body_json(carrito_item_json(
            90, 7, "Correa Clásica", None, 1, 45000.0,
        )))
        .expect(1)
        .mount(&server)
        .await;
    mount_carrito(
        &server,
        vec![carrito_item_json(90, 7, "Correa Clásica", None, 1, 45000.0)],
        45000.0,
    )
    .await;

    let (shop, _storage, _notifier) = shop_against(&server);
    {
        let ctx = shop.context();
        let mut cart = ctx.cart.lock().await;
        cart.add(7, None, 1).await.unwrap();
    }

    let (_, first) = shop.login("ana@example.com", "secreta").await.unwrap();
    assert_eq!(first, MigrationOutcome::Complete { migrated: 1 });

    let (_, second) = shop.login("ana@example.com", "secreta").await.unwrap();
    assert_eq!(second, MigrationOutcome::Skipped);

    server.verify().await;
}
