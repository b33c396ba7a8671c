//! The page contract and the storefront's built-in pages.
//!
//! Each page is a small unit implementing two functions: `render` produces
//! the page markup as a pure function of the route parameters, and `init`
//! wires the page up after the swap (data loads, cart refresh). `init`
//! failures bubble to the router, which falls back to the not-found page
//! rather than leaving half-initialized content up.

use async_trait::async_trait;

use crate::error::Error;
use crate::router::RouteParams;
use crate::util::escape_html;
use crate::AppContext;

/// A routable page
#[async_trait]
pub trait Page: Send + Sync {
    /// Generate the page markup from the route parameters
    fn render(&self, params: &RouteParams) -> Result<String, Error>;

    /// Wire the page after its markup is in place. Pages that display the
    /// cart badge refresh the cart here; the default does nothing.
    async fn init(&self, _ctx: &AppContext, _params: &RouteParams) -> Result<(), Error> {
        Ok(())
    }
}

/// Refresh the cart so the header badge is current on the new page. Load
/// never fails (it falls back to an empty cart), so neither does this.
async fn refresh_cart(ctx: &AppContext) {
    ctx.cart.lock().await.load().await;
}

/// Landing page
pub struct HomePage;

#[async_trait]
impl Page for HomePage {
    fn render(&self, _params: &RouteParams) -> Result<String, Error> {
        Ok(concat!(
            "<section id=\"inicio\">",
            "<h1>Calzado Leopardo</h1>",
            "<div id=\"destacados\" class=\"grilla-productos\"></div>",
            "</section>"
        )
        .to_string())
    }

    async fn init(&self, ctx: &AppContext, _params: &RouteParams) -> Result<(), Error> {
        refresh_cart(ctx).await;
        Ok(())
    }
}

/// Catalog listing
pub struct ProductListPage;

#[async_trait]
impl Page for ProductListPage {
    fn render(&self, _params: &RouteParams) -> Result<String, Error> {
        Ok(concat!(
            "<section id=\"catalogo\">",
            "<aside id=\"filtros\"></aside>",
            "<div id=\"lista-productos\" class=\"grilla-productos\"></div>",
            "<nav id=\"paginacion\"></nav>",
            "</section>"
        )
        .to_string())
    }

    async fn init(&self, ctx: &AppContext, _params: &RouteParams) -> Result<(), Error> {
        refresh_cart(ctx).await;
        let products = ctx.api.fetch_products().await?;
        let categories = ctx.api.fetch_categories().await?;
        log::debug!(
            "catalog ready: {} productos, {} categorías",
            products.len(),
            categories.len()
        );
        Ok(())
    }
}

/// Single product view
pub struct ProductDetailPage;

#[async_trait]
impl Page for ProductDetailPage {
    fn render(&self, params: &RouteParams) -> Result<String, Error> {
        let id = params
            .get("id")
            .ok_or_else(|| Error::validation("Falta el producto"))?;
        Ok(format!(
            "<section id=\"producto\" data-producto-id=\"{}\">\
             <div id=\"detalle-producto\"></div>\
             <div id=\"selector-talla\"></div>\
             </section>",
            escape_html(id)
        ))
    }

    async fn init(&self, ctx: &AppContext, params: &RouteParams) -> Result<(), Error> {
        refresh_cart(ctx).await;
        let id: i64 = params
            .get("id")
            .and_then(|raw| raw.parse().ok())
            .ok_or_else(|| Error::validation("Producto inválido"))?;
        let product = ctx.api.fetch_product(id).await?;
        log::debug!("producto {} listo: {}", product.id, product.nombre);
        Ok(())
    }
}

/// Cart page
pub struct CartPage;

#[async_trait]
impl Page for CartPage {
    fn render(&self, _params: &RouteParams) -> Result<String, Error> {
        Ok(concat!(
            "<section id=\"carrito\">",
            "<h1>Tu carrito</h1>",
            "<div id=\"items-carrito\"></div>",
            "<div id=\"resumen-carrito\"></div>",
            "<button id=\"btn-whatsapp\">Pedir por WhatsApp</button>",
            "</section>"
        )
        .to_string())
    }

    async fn init(&self, ctx: &AppContext, _params: &RouteParams) -> Result<(), Error> {
        refresh_cart(ctx).await;
        Ok(())
    }
}

/// Login / register page
pub struct LoginPage;

#[async_trait]
impl Page for LoginPage {
    fn render(&self, _params: &RouteParams) -> Result<String, Error> {
        Ok(concat!(
            "<section id=\"acceso\">",
            "<form id=\"form-login\"></form>",
            "<form id=\"form-registro\" hidden></form>",
            "</section>"
        )
        .to_string())
    }
}

/// Admin panel shell. The initializer enforces the admin role so the
/// router falls back for anyone else; the data grids load on demand.
pub struct AdminPage;

#[async_trait]
impl Page for AdminPage {
    fn render(&self, _params: &RouteParams) -> Result<String, Error> {
        Ok(concat!(
            "<section id=\"admin\">",
            "<nav id=\"admin-tabs\"></nav>",
            "<div id=\"admin-contenido\"></div>",
            "</section>"
        )
        .to_string())
    }

    async fn init(&self, ctx: &AppContext, _params: &RouteParams) -> Result<(), Error> {
        match ctx.auth.current_user() {
            None => Err(Error::NotAuthenticated),
            Some(user) if !user.es_admin => Err(Error::Forbidden),
            Some(_) => Ok(()),
        }
    }
}

/// Fallback page for unmatched paths and failed pages
pub struct NotFoundPage;

#[async_trait]
impl Page for NotFoundPage {
    fn render(&self, _params: &RouteParams) -> Result<String, Error> {
        Ok(concat!(
            "<section id=\"no-encontrado\">",
            "<h1>Página no encontrada</h1>",
            "<a href=\"/\">Volver al inicio</a>",
            "</section>"
        )
        .to_string())
    }
}
