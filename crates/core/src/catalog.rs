//! The fixed product catalog orders draw from.

use serde::Serialize;

use crate::retail::{MoneyCents, ProductId};

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct Product {
    pub product_id: ProductId,
    pub name: &'static str,
    pub category: &'static str,
    pub price_cents: MoneyCents,
}

const fn product(
    product_id: ProductId,
    name: &'static str,
    category: &'static str,
    price_cents: MoneyCents,
) -> Product {
    Product { product_id, name, category, price_cents }
}

pub const CATALOG: [Product; 10] = [
    product(1001, "Powder Skis", "Skis", 79_999),
    product(1002, "All-Mountain Skis", "Skis", 64_999),
    product(1003, "Freestyle Snowboard", "Snowboards", 54_999),
    product(1004, "Freeride Snowboard", "Snowboards", 69_999),
    product(1005, "Ski Boots", "Boots", 44_999),
    product(1006, "Snowboard Boots", "Boots", 34_999),
    product(1007, "Ski Poles", "Accessories", 7_999),
    product(1008, "Ski Goggles", "Accessories", 14_999),
    product(1009, "Snowboard Bindings", "Accessories", 24_999),
    product(1010, "Ski Helmet", "Accessories", 17_999),
];

pub fn find(product_id: ProductId) -> Option<&'static Product> {
    CATALOG.iter().find(|p| p.product_id == product_id)
}
