//! Checkout via WhatsApp: the order is rendered as a text message and the
//! buyer is handed a prefilled `wa.me` link to the store's number.

use crate::cart::Cart;
use crate::error::Error;
use crate::util::format_currency;

/// Buyer details collected on the checkout form
#[derive(Debug, Clone, Default)]
pub struct CheckoutInfo {
    pub nombre: String,
    pub telefono: Option<String>,
    pub direccion: Option<String>,
    pub nota: Option<String>,
}

/// Render the order message sent to the store. Rejects an empty cart and a
/// blank buyer name before any formatting.
pub fn order_message(cart: &Cart, info: &CheckoutInfo) -> Result<String, Error> {
    if cart.is_empty() {
        return Err(Error::validation("El carrito está vacío"));
    }
    if info.nombre.trim().is_empty() {
        return Err(Error::validation("El nombre es obligatorio"));
    }

    let mut msg = String::from("¡Hola! Quiero hacer este pedido:\n");
    for item in &cart.items {
        let talla = match &item.talla {
            Some(t) => format!(" (talla {})", t),
            None => String::new(),
        };
        msg.push_str(&format!(
            "- {}{} x{}: {}\n",
            item.nombre,
            talla,
            item.cantidad,
            format_currency(item.subtotal())
        ));
    }
    msg.push_str(&format!("Total: {}\n", format_currency(cart.total)));
    msg.push_str(&format!("Nombre: {}\n", info.nombre.trim()));
    if let Some(telefono) = info.telefono.as_deref().filter(|t| !t.trim().is_empty()) {
        msg.push_str(&format!("Teléfono: {}\n", telefono.trim()));
    }
    if let Some(direccion) = info.direccion.as_deref().filter(|d| !d.trim().is_empty()) {
        msg.push_str(&format!("Dirección: {}\n", direccion.trim()));
    }
    if let Some(nota) = info.nota.as_deref().filter(|n| !n.trim().is_empty()) {
        msg.push_str(&format!("Nota: {}\n", nota.trim()));
    }
    Ok(msg)
}

/// Build the `wa.me` deep link carrying a prefilled message
pub fn whatsapp_link(store_phone: &str, message: &str) -> String {
    format!(
        "https://wa.me/{}?text={}",
        store_phone.trim_start_matches('+'),
        urlencoding::encode(message)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::CartItem;

    fn cart() -> Cart {
        let mut cart = Cart {
            items: vec![
                CartItem {
                    id: "1".to_string(),
                    producto_id: 10,
                    nombre: "Bota Cuero".to_string(),
                    talla: Some("41".to_string()),
                    cantidad: 2,
                    precio_unitario: 150000.0,
                    stock_disponible: None,
                },
                CartItem {
                    id: "2".to_string(),
                    producto_id: 11,
                    nombre: "Correa Clásica".to_string(),
                    talla: None,
                    cantidad: 1,
                    precio_unitario: 45000.0,
                    stock_disponible: None,
                },
            ],
            total: 0.0,
            cantidad: 0,
        };
        cart.recalculate();
        cart
    }

    #[test]
    fn message_lists_items_and_total() {
        let info = CheckoutInfo {
            nombre: "Ana Gómez".to_string(),
            telefono: Some("3001234567".to_string()),
            ..Default::default()
        };
        let msg = order_message(&cart(), &info).unwrap();
        assert!(msg.contains("Bota Cuero (talla 41) x2: $ 300.000"));
        assert!(msg.contains("Correa Clásica x1: $ 45.000"));
        assert!(msg.contains("Total: $ 345.000"));
        assert!(msg.contains("Nombre: Ana Gómez"));
        assert!(msg.contains("Teléfono: 3001234567"));
        assert!(!msg.contains("Dirección"));
    }

    #[test]
    fn empty_cart_is_rejected() {
        let info = CheckoutInfo { nombre: "Ana".to_string(), ..Default::default() };
        assert!(matches!(
            order_message(&Cart::default(), &info),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn blank_name_is_rejected() {
        let info = CheckoutInfo { nombre: "   ".to_string(), ..Default::default() };
        assert!(matches!(order_message(&cart(), &info), Err(Error::Validation(_))));
    }

    #[test]
    fn link_percent_encodes_the_message() {
        let link = whatsapp_link("+573001234567", "pedido: 2 botas\ntotal $ 10");
        assert!(link.starts_with("https://wa.me/573001234567?text="));
        assert!(!link.contains(' '));
        assert!(!link.contains('\n'));
        assert!(link.contains("%20"));
    }
}
