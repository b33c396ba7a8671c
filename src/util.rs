//! Small pure helpers shared across the client: currency formatting,
//! discount math, HTML escaping, query-string parsing and input debouncing.

use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Format a peso amount for display: `$ 1.234.567`.
///
/// Amounts are rounded to whole pesos and grouped with dots, the way the
/// store prints prices everywhere.
pub fn format_currency(value: f64) -> String {
    let negative = value < 0.0;
    let rounded = value.abs().round() as u64;
    let digits = rounded.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    if negative {
        format!("-$ {}", grouped)
    } else {
        format!("$ {}", grouped)
    }
}

/// Rounded discount percentage when the promotional price is set and lower
/// than the regular price, `None` otherwise.
pub fn discount_percent(precio: f64, precio_promocional: Option<f64>) -> Option<u8> {
    let promo = precio_promocional?;
    if precio <= 0.0 || promo <= 0.0 || promo >= precio {
        return None;
    }
    Some(((1.0 - promo / precio) * 100.0).round() as u8)
}

/// Escape text for interpolation into markup.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Parse query parameters out of a URL, a `?`-prefixed query, or a bare
/// `a=b&c=d` string. Keys and values are percent-decoded; pairs with an
/// empty key are dropped.
pub fn parse_query(input: &str) -> HashMap<String, String> {
    let query = match input.split_once('?') {
        Some((_, q)) => q,
        // A bare path has no parameters to offer.
        None if !input.contains('=') => return HashMap::new(),
        None => input,
    };

    let mut params = HashMap::new();
    for pair in query.split('&') {
        if pair.is_empty() {
            continue;
        }
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        let key = decode_component(key);
        if key.is_empty() {
            continue;
        }
        params.insert(key, decode_component(value));
    }
    params
}

fn decode_component(raw: &str) -> String {
    urlencoding::decode(raw)
        .map(|c| c.into_owned())
        .unwrap_or_else(|_| raw.to_string())
}

/// Interval gate for repeated UI triggers (search-as-you-type, double
/// submits). `should_fire` answers true at most once per interval.
#[derive(Debug)]
pub struct Debouncer {
    interval: Duration,
    last: Option<Instant>,
}

impl Debouncer {
    pub fn new(interval: Duration) -> Self {
        Self { interval, last: None }
    }

    /// Whether the caller may act now. Records the firing time on true.
    pub fn should_fire(&mut self) -> bool {
        let now = Instant::now();
        match self.last {
            Some(prev) if now.duration_since(prev) < self.interval => false,
            _ => {
                self.last = Some(now);
                true
            }
        }
    }

    /// Forget the last firing so the next call fires immediately.
    pub fn reset(&mut self) {
        self.last = None;
    }
}
