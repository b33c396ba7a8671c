//! In-app navigation: a fixed route table of path patterns, a navigate
//! lifecycle that swaps page markup atomically, and link interception so
//! internal clicks keep the cart and session state alive.

pub mod pages;

pub use pages::Page;

use std::collections::HashMap;
use std::sync::Arc;

use crate::router::pages::NotFoundPage;
use crate::AppContext;

/// Named parameters bound during route matching
pub type RouteParams = HashMap<String, String>;

/// Where the router is in the navigation lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouterState {
    /// Nothing navigated yet
    Idle,
    /// Matching the path against the route table
    Resolving,
    /// Generating and swapping page content
    Rendering,
    /// The page is live
    Ready,
    /// No pattern matched, or the page fell back
    NotFound,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Static(String),
    Param(String),
}

/// A path pattern: static segments plus `:name` parameter segments.
/// Matching is whole-path only; a path with a different segment count
/// never matches.
#[derive(Debug, Clone)]
pub struct Pattern {
    raw: String,
    segments: Vec<Segment>,
}

impl Pattern {
    pub fn parse(pattern: &str) -> Self {
        let segments = pattern
            .split('/')
            .filter(|s| !s.is_empty())
            .map(|s| match s.strip_prefix(':') {
                Some(name) => Segment::Param(name.to_string()),
                None => Segment::Static(s.to_string()),
            })
            .collect();
        Self {
            raw: pattern.to_string(),
            segments,
        }
    }

    /// The pattern as it was declared
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Match a path, binding parameter segments by name
    pub fn matches(&self, path: &str) -> Option<RouteParams> {
        let parts: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        if parts.len() != self.segments.len() {
            return None;
        }
        let mut params = RouteParams::new();
        for (segment, part) in self.segments.iter().zip(&parts) {
            match segment {
                Segment::Static(expected) if expected == part => {}
                Segment::Static(_) => return None,
                Segment::Param(name) => {
                    params.insert(name.clone(), (*part).to_string());
                }
            }
        }
        Some(params)
    }
}

struct Route {
    pattern: Pattern,
    page: Arc<dyn Page>,
}

/// The client-side page router
pub struct Router {
    ctx: Arc<AppContext>,
    routes: Vec<Route>,
    not_found: Arc<dyn Page>,
    state: RouterState,
    history: Vec<String>,
    current_path: String,
    current_params: RouteParams,
    current_markup: String,
}

impl Router {
    pub fn new(ctx: Arc<AppContext>) -> Self {
        Self {
            ctx,
            routes: Vec::new(),
            not_found: Arc::new(NotFoundPage),
            state: RouterState::Idle,
            history: Vec::new(),
            current_path: String::new(),
            current_params: RouteParams::new(),
            current_markup: String::new(),
        }
    }

    /// Register a route. Patterns are tried in declaration order; the
    /// first match wins.
    pub fn route(mut self, pattern: &str, page: Arc<dyn Page>) -> Self {
        self.routes.push(Route {
            pattern: Pattern::parse(pattern),
            page,
        });
        self
    }

    /// Replace the fallback page rendered on a miss or a page failure
    pub fn not_found_page(mut self, page: Arc<dyn Page>) -> Self {
        self.not_found = page;
        self
    }

    /// Navigate to a path: push a history entry, resolve it against the
    /// table, swap in the generated markup and run the page initializer.
    /// Never leaves the document half-swapped: content changes only after
    /// a successful render, and any generator or initializer failure lands
    /// on the fallback page.
    pub async fn navigate(&mut self, path: &str) {
        self.state = RouterState::Resolving;
        self.history.push(path.to_string());
        self.current_path = path.to_string();

        // Query parameters never take part in matching.
        let route_path = path.split_once('?').map(|(p, _)| p).unwrap_or(path);
        let matched = self.routes.iter().find_map(|route| {
            route
                .pattern
                .matches(route_path)
                .map(|params| (route.page.clone(), params))
        });

        let (page, params) = match matched {
            Some(found) => found,
            None => {
                self.render_fallback(RouteParams::new()).await;
                return;
            }
        };

        self.state = RouterState::Rendering;
        let markup = match page.render(&params) {
            Ok(markup) => markup,
            Err(err) => {
                log::warn!("render of {} failed: {}", path, err);
                self.render_fallback(params).await;
                return;
            }
        };

        self.current_markup = markup;
        self.current_params = params.clone();

        // Request failures inside init have already been reported through
        // the notifier by the API client; the router's job is the fallback.
        if let Err(err) = page.init(&self.ctx, &params).await {
            log::warn!("init of {} failed: {}", path, err);
            self.render_fallback(params).await;
            return;
        }

        self.state = RouterState::Ready;
    }

    async fn render_fallback(&mut self, params: RouteParams) {
        self.current_markup = self
            .not_found
            .render(&params)
            .unwrap_or_else(|_| "<h1>404</h1>".to_string());
        let _ = self.not_found.init(&self.ctx, &params).await;
        self.current_params = params;
        self.state = RouterState::NotFound;
    }

    /// Intercept a clicked link: internal paths become a `navigate` call
    /// and report true; external links, anchors and non-http schemes are
    /// left to the host and report false.
    pub async fn handle_link(&mut self, href: &str) -> bool {
        if !is_internal(href) {
            return false;
        }
        self.navigate(href).await;
        true
    }

    /// Navigate back through the router's own history. Reports false when
    /// there is nowhere to go back to.
    pub async fn back(&mut self) -> bool {
        if self.history.len() < 2 {
            return false;
        }
        self.history.pop();
        match self.history.pop() {
            // navigate re-pushes the entry.
            Some(previous) => {
                self.navigate(&previous).await;
                true
            }
            None => false,
        }
    }

    pub fn state(&self) -> RouterState {
        self.state
    }

    pub fn current_path(&self) -> &str {
        &self.current_path
    }

    pub fn current_params(&self) -> &RouteParams {
        &self.current_params
    }

    pub fn current_markup(&self) -> &str {
        &self.current_markup
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }
}

fn is_internal(href: &str) -> bool {
    if href.is_empty() || href.starts_with('#') {
        return false;
    }
    if href.contains("://") || href.starts_with("mailto:") || href.starts_with("tel:") {
        return false;
    }
    href.starts_with('/')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_and_param_segments() {
        let pattern = Pattern::parse("/productos/:id");
        let params = pattern.matches("/productos/42").unwrap();
        assert_eq!(params.get("id").map(String::as_str), Some("42"));
        assert!(pattern.matches("/productos").is_none());
        assert!(pattern.matches("/productos/42/extra").is_none());
        assert!(pattern.matches("/categorias/42").is_none());
    }

    #[test]
    fn root_pattern_matches_root_only() {
        let pattern = Pattern::parse("/");
        assert!(pattern.matches("/").is_some());
        assert!(pattern.matches("/productos").is_none());
    }

    #[test]
    fn trailing_slash_is_ignored() {
        let pattern = Pattern::parse("/productos");
        assert!(pattern.matches("/productos/").is_some());
    }

    #[test]
    fn internal_link_detection() {
        assert!(is_internal("/productos/3"));
        assert!(is_internal("/carrito?desde=menu"));
        assert!(!is_internal("https://wa.me/573001234567"));
        assert!(!is_internal("mailto:ventas@leopardo.co"));
        assert!(!is_internal("#arriba"));
        assert!(!is_internal(""));
        assert!(!is_internal("productos/relativo"));
    }
}
