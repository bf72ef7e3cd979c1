//! Mock product catalog
//!
//! Loads on a tokio task with simulated latency and reports back through the
//! event channel, so the frame loop keeps animating while it waits.

use std::time::Duration;

use serde::Serialize;
use tokio::sync::mpsc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::event::CatalogResult;

/// Filter chip labels, in display order
pub const CATEGORIES: [&str; 5] = ["Shoes", "Bags", "Jackets", "Knitwear", "Accessories"];

const CATALOG_ID_BASE: u128 = 0x7669_7472_696e_6500_0000_0000_0000_0000;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub category: String,
    pub price_cents: u32,
    pub rating: f32,
}

impl Product {
    fn new(seq: u128, name: &str, category: &str, price_cents: u32, rating: f32) -> Self {
        Self {
            // Stable across reloads so favorites and cart survive them
            id: Uuid::from_u128(CATALOG_ID_BASE + seq),
            name: name.to_string(),
            category: category.to_string(),
            price_cents,
            rating,
        }
    }

    /// "$1,234.50" style price label
    pub fn price_label(&self) -> String {
        let dollars = self.price_cents / 100;
        let cents = self.price_cents % 100;
        let digits = dollars.to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, c) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(c);
        }
        format!("${}.{:02}", grouped, cents)
    }
}

const SAMPLE: [(&str, &str, u32, f32); 14] = [
    ("Canvas Low Sneaker", "Shoes", 8900, 4.5),
    ("Suede Chelsea Boot", "Shoes", 18900, 4.7),
    ("Trail Runner", "Shoes", 12900, 4.2),
    ("Leather Tote", "Bags", 24500, 4.8),
    ("Waxed Weekender", "Bags", 31000, 4.6),
    ("Sling Pouch", "Bags", 5400, 4.1),
    ("Quilted Liner Jacket", "Jackets", 16800, 4.4),
    ("Chore Coat", "Jackets", 21000, 4.6),
    ("Rain Shell", "Jackets", 13500, 4.0),
    ("Merino Crewneck", "Knitwear", 9800, 4.7),
    ("Fisherman Cardigan", "Knitwear", 14200, 4.5),
    ("Ribbed Beanie", "Accessories", 2800, 4.3),
    ("Leather Belt", "Accessories", 6500, 4.6),
    ("Cashmere Scarf", "Accessories", 125000, 4.9),
];

pub fn sample_products() -> Vec<Product> {
    SAMPLE
        .iter()
        .enumerate()
        .map(|(i, (name, category, price, rating))| {
            Product::new(i as u128, name, category, *price, *rating)
        })
        .collect()
}

/// Load the catalog after `latency`
pub async fn load_catalog(latency: Duration) -> Vec<Product> {
    tokio::time::sleep(latency).await;
    sample_products()
}

/// Spawn a background load tagged with `generation`
///
/// The receiver compares generations so a slow load started before a reload
/// cannot overwrite the newer result.
pub fn spawn_catalog_load(
    latency: Duration,
    generation: u64,
    tx: mpsc::UnboundedSender<CatalogResult>,
) {
    debug!(generation, latency_ms = latency.as_millis() as u64, "Catalog load started");
    tokio::spawn(async move {
        let products = load_catalog(latency).await;
        info!(generation, count = products.len(), "Catalog loaded");
        // The receiver is gone once the app has quit
        let _ = tx.send(CatalogResult::Loaded {
            generation,
            products,
        });
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_label() {
        let mut p = Product::new(0, "x", "Bags", 8900, 4.0);
        assert_eq!(p.price_label(), "$89.00");
        p.price_cents = 125_005;
        assert_eq!(p.price_label(), "$1,250.05");
        p.price_cents = 7;
        assert_eq!(p.price_label(), "$0.07");
    }

    #[test]
    fn test_every_product_has_a_category_chip() {
        for p in sample_products() {
            assert!(CATEGORIES.contains(&p.category.as_str()), "{}", p.category);
        }
    }

    #[test]
    fn test_ids_are_stable_across_loads() {
        let first: Vec<_> = sample_products().into_iter().map(|p| p.id).collect();
        let second: Vec<_> = sample_products().into_iter().map(|p| p.id).collect();
        assert_eq!(first, second);
        let mut unique = first.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), first.len());
    }

    #[tokio::test(start_paused = true)]
    async fn test_load_arrives_after_latency() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        spawn_catalog_load(Duration::from_millis(400), 3, tx);

        tokio::time::sleep(Duration::from_millis(399)).await;
        assert!(rx.try_recv().is_err());

        tokio::time::sleep(Duration::from_millis(2)).await;
        match rx.recv().await {
            Some(CatalogResult::Loaded {
                generation,
                products,
            }) => {
                assert_eq!(generation, 3);
                assert_eq!(products.len(), sample_products().len());
            }
            None => panic!("catalog channel closed"),
        }
    }
}
