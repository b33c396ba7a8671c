#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use leopardo_client::config::ClientOptions;
use leopardo_client::notify::{Level, Notifier};
use leopardo_client::storage::MemoryStorage;
use leopardo_client::Leopardo;

/// Captures every notification so tests can assert on what the user was
/// told.
#[derive(Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<(Level, String)>>,
}

impl RecordingNotifier {
    pub fn messages(&self) -> Vec<(Level, String)> {
        self.messages.lock().unwrap().clone()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.messages
            .lock()
            .unwrap()
            .iter()
            .any(|(_, msg)| msg.contains(needle))
    }

    pub fn last_level(&self) -> Option<Level> {
        self.messages.lock().unwrap().last().map(|(level, _)| *level)
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, level: Level, message: &str) {
        self.messages
            .lock()
            .unwrap()
            .push((level, message.to_string()));
    }
}

/// A client wired against a mock server, with inspectable storage and
/// notifications.
pub fn shop_against(
    server: &MockServer,
) -> (Leopardo, Arc<MemoryStorage>, Arc<RecordingNotifier>) {
    let storage = Arc::new(MemoryStorage::new());
    let (shop, notifier) = shop_over(server, storage.clone());
    (shop, storage, notifier)
}

/// Like [`shop_against`], but over pre-seeded storage; models an app
/// restart that picks up a previous run's snapshots.
pub fn shop_over(
    server: &MockServer,
    storage: Arc<MemoryStorage>,
) -> (Leopardo, Arc<RecordingNotifier>) {
    let notifier = Arc::new(RecordingNotifier::default());
    let shop = Leopardo::with_options(
        &server.uri(),
        ClientOptions::default(),
        storage,
        notifier.clone(),
    )
    .expect("client against mock server");
    (shop, notifier)
}

pub fn producto_json(
    id: i64,
    nombre: &str,
    precio: f64,
    promo: Option<f64>,
    tallas: &[(&str, i64)],
) -> serde_json::Value {
    json!({
        "id": id,
        "nombre": nombre,
        "precio": precio,
        "precio_promocional": promo,
        "stock": if tallas.is_empty() { json!(25) } else { json!(null) },
        "tallas": tallas
            .iter()
            .map(|(talla, stock)| json!({ "talla": talla, "stock": stock }))
            .collect::<Vec<_>>(),
    })
}

pub fn usuario_json(id: i64, nombre: &str, es_admin: bool) -> serde_json::Value {
    json!({
        "id": id,
        "nombre": nombre,
        "email": format!("{}@example.com", nombre.to_lowercase()),
        "es_admin": es_admin,
    })
}

/// Mount `GET /productos/{id}` returning the given product record
pub async fn mount_producto(server: &MockServer, body: &serde_json::Value) {
    let id = body["id"].as_i64().expect("product id");
    Mock::given(method("GET"))
        .and(path(format!("/productos/{}", id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// Mount `POST /auth/login` answering with the given user
pub async fn mount_login(server: &MockServer, user: &serde_json::Value) {
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "user": user })))
        .mount(server)
        .await;
}

/// Mount `GET /carrito` answering with the given items and totals
pub async fn mount_carrito(server: &MockServer, items: Vec<serde_json::Value>, total: f64) {
    let cantidad: u64 = items
        .iter()
        .map(|i| i["cantidad"].as_u64().unwrap_or(0))
        .sum();
    Mock::given(method("GET"))
        .and(path("/carrito"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": items,
            "total": total,
            "cantidad_items": cantidad,
        })))
        .mount(server)
        .await;
}

pub fn carrito_item_json(
    id: i64,
    producto_id: i64,
    nombre: &str,
    talla: Option<&str>,
    cantidad: u32,
    precio_unitario: f64,
) -> serde_json::Value {
    json!({
        "id": id,
        "producto_id": producto_id,
        "nombre": nombre,
        "talla": talla,
        "cantidad": cantidad,
        "precio_unitario": precio_unitario,
        "stock_disponible": 10,
    })
}
