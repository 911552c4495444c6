#[cfg(test)]
#[path = "product_test.rs"]
mod tests;

use serde_derive::Deserialize;
use serde_derive::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub sku: String,
    pub generations: u32,
    pub price_cents: u32,
    #[serde(default)]
    pub discount_percent: Option<u32>,
    #[serde(default)]
    pub popular: bool,
}

impl Product {
    /// The hardcoded credit pack catalog.
    pub fn catalog() -> Vec<Product> {
        return vec![
            Product {
                sku: "future_hn_pack_3".to_string(),
                generations: 3,
                price_cents: 799,
                discount_percent: None,
                popular: true,
            },
            Product {
                sku: "future_hn_pack_10".to_string(),
                generations: 10,
                price_cents: 1999,
                discount_percent: Some(25),
                popular: false,
            },
        ];
    }

    pub fn find(sku: &str) -> Option<Product> {
        return Product::catalog().into_iter().find(|e| return e.sku == sku);
    }

    pub fn price(&self) -> String {
        return format_currency(self.price_cents);
    }

    pub fn price_per_generation(&self) -> String {
        if self.generations == 0 {
            return format_currency(self.price_cents);
        }

        let per_unit = (self.price_cents as f64 / self.generations as f64).round() as u32;
        return format_currency(per_unit);
    }
}

pub fn format_currency(cents: u32) -> String {
    return format!("${}.{:02}", cents / 100, cents % 100);
}
