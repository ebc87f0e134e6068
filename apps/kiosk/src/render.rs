//! # Rendering
//!
//! Turns a [`SessionView`] into output lines. Text mode draws a screen for
//! a person; JSON mode writes one object per line for a display process.
//!
//! ## Text Layout
//! ```text
//! ==== Corner Market ====
//! [ad] Weekly Specials: Save up to 30% on fresh produce
//!   Organic Bananas              Produce   2 x $2.99     $5.98
//!   Fresh Milk 1L                Dairy     1 x $4.99     $4.99
//! ------------------------------------------------------------
//!   Items: 3                                 Subtotal   $10.97
//!                                            Tax (10%)   $1.10
//!                                            Total      $12.07
//! ! Product not found: 999999
//! * Added: Fresh Milk 1L
//! Recommended: 1) iPhone 15 Pro Max $1299.99 (92%)  ...
//! [Pay available: /pay]
//! ```

use checkout_core::{Product, SessionView, TaxRate};
use serde_json::json;

use crate::config::{KioskConfig, RenderMode};
use crate::error::KioskResult;

const RULE_WIDTH: usize = 60;

/// Renders views according to the configured mode.
#[derive(Debug, Clone)]
pub struct Renderer {
    mode: RenderMode,
    config: KioskConfig,
}

impl Renderer {
    pub fn new(config: &KioskConfig) -> Self {
        Renderer {
            mode: config.render,
            config: config.clone(),
        }
    }

    pub fn mode(&self) -> RenderMode {
        self.mode
    }

    pub fn view(&self, view: &SessionView) -> KioskResult<String> {
        match self.mode {
            RenderMode::Text => Ok(self.view_text(view)),
            RenderMode::Json => Ok(serde_json::to_string(&json!({
                "type": "view",
                "view": view,
            }))?),
        }
    }

    /// Search dialog results.
    pub fn matches(&self, query: &str, products: &[Product]) -> KioskResult<String> {
        match self.mode {
            RenderMode::Text => Ok(self.matches_text(query, products)),
            RenderMode::Json => Ok(serde_json::to_string(&json!({
                "type": "matches",
                "query": query,
                "products": products,
            }))?),
        }
    }

    fn view_text(&self, view: &SessionView) -> String {
        let money = |cents: i64| self.config.format_currency(cents);
        let mut out = Vec::new();

        out.push(format!("==== {} ====", self.config.store_name));

        if let Some(ad) = &view.ad {
            out.push(format!("[ad] {}: {}", ad.title, ad.description));
        }

        if view.cart.lines.is_empty() {
            out.push("  Cart is empty. Scan an item to begin.".to_string());
        }
        for line in &view.cart.lines {
            out.push(format!(
                "  {:<28} {:<9} {} x {:<9} {:>9}",
                line.name,
                line.category,
                line.quantity,
                money(line.unit_price_cents),
                money(line.line_total_cents),
            ));
        }

        out.push("-".repeat(RULE_WIDTH));
        out.push(format!(
            "  Items: {:<33} {:<10} {:>9}",
            view.cart.total_quantity,
            "Subtotal",
            money(view.cart.subtotal_cents)
        ));
        out.push(format!(
            "  {:<40} {:<10} {:>9}",
            "",
            format!("Tax ({})", TaxRate::from_bps(view.cart.tax_rate_bps)),
            money(view.cart.tax_cents)
        ));
        out.push(format!(
            "  {:<40} {:<10} {:>9}",
            "",
            "Total",
            money(view.cart.total_cents)
        ));

        if let Some(error) = &view.error {
            out.push(format!("! {}", error));
        }
        for toast in &view.notifications {
            out.push(format!("* {}", toast.message));
        }

        if !view.recommendations.is_empty() {
            let recs: Vec<String> = view
                .recommendations
                .iter()
                .enumerate()
                .map(|(i, r)| {
                    format!("{}) {} {} ({}%)", i + 1, r.name, money(r.price_cents), r.confidence)
                })
                .collect();
            out.push(format!("Recommended: {}", recs.join("  ")));
        }

        if view.can_proceed_to_payment {
            out.push("[Pay available: /pay]".to_string());
        }

        out.join("\n")
    }

    fn matches_text(&self, query: &str, products: &[Product]) -> String {
        if products.is_empty() {
            return format!("No products match '{}'", query);
        }

        let mut out = vec![format!("Matches for '{}':", query)];
        for product in products {
            out.push(format!(
                "  {:<8} {:<28} {:>9}",
                product.id,
                product.name,
                self.config.format_currency(product.price_cents)
            ));
        }
        out.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use checkout_core::{Catalog, CheckoutSession, MemoryCatalog, SessionConfig};
    use std::time::Instant;

    fn session_with_milk() -> CheckoutSession<MemoryCatalog> {
        let mut session = CheckoutSession::new(MemoryCatalog::seeded(), SessionConfig::default());
        let milk = session.catalog().find_product("milk").unwrap();
        session.add_item(&milk.id, Instant::now()).unwrap();
        session
    }

    #[test]
    fn test_empty_cart_text() {
        let session = CheckoutSession::new(MemoryCatalog::seeded(), SessionConfig::default());
        let text = Renderer::new(&KioskConfig::default())
            .view(&session.view())
            .unwrap();

        assert!(text.starts_with("==== Self Checkout ===="));
        assert!(text.contains("Cart is empty"));
        assert!(text.contains("Tax (10%)"));
        assert!(!text.contains("/pay"));
    }

    #[test]
    fn test_text_shows_lines_and_toasts() {
        let session = session_with_milk();
        let view = session.view();
        let text = Renderer::new(&KioskConfig::default()).view(&view).unwrap();

        let line = &view.cart.lines[0];
        assert!(text.contains(&line.name));
        assert!(text.contains(&format!("* Added: {}", line.name)));
        assert!(text.contains("[Pay available: /pay]"));
        assert!(text.contains("Recommended: 1)"));
    }

    #[test]
    fn test_json_view_is_one_line() {
        let mut config = KioskConfig::default();
        config.render = RenderMode::Json;
        let session = session_with_milk();

        let out = Renderer::new(&config).view(&session.view()).unwrap();
        assert!(!out.contains('\n'));

        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["type"], "view");
        assert_eq!(value["view"]["cart"]["itemCount"], 1);
        assert_eq!(value["view"]["canProceedToPayment"], true);
    }

    #[test]
    fn test_matches() {
        let renderer = Renderer::new(&KioskConfig::default());
        assert_eq!(
            renderer.matches("zzz", &[]).unwrap(),
            "No products match 'zzz'"
        );

        let products = MemoryCatalog::seeded().matching("milk");
        let text = renderer.matches("milk", &products).unwrap();
        assert!(text.starts_with("Matches for 'milk':"));
        assert_eq!(text.lines().count(), products.len() + 1);
    }
}
