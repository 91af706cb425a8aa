use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::ToRow;

pub type CustomerId = u64;
pub type OrderId = u64;
pub type OrderItemId = u64;
pub type ProductId = u32;

pub type MoneyCents = i64;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum OrderStatus {
    Pending,
    Processing,
    Shipped,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::Pending,
        OrderStatus::Processing,
        OrderStatus::Shipped,
        OrderStatus::Completed,
        OrderStatus::Cancelled,
    ];
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct Order {
    pub order_id: OrderId,
    pub customer_id: CustomerId,
    pub order_date: DateTime<Utc>,
    pub order_status: OrderStatus,
    #[serde(with = "dollars")]
    pub total_amount: MoneyCents,
    pub discount_percent: u8,
    #[serde(with = "dollars")]
    pub shipping_cost: MoneyCents,
}

impl ToRow for Order {}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct OrderItem {
    pub order_item_id: OrderItemId,
    pub order_id: OrderId,
    pub product_id: ProductId,
    pub product_name: String,
    pub product_category: String,
    pub quantity: u32,
    #[serde(with = "dollars")]
    pub unit_price: MoneyCents,
    #[serde(with = "dollars")]
    pub line_total: MoneyCents,
}

impl OrderItem {
    pub fn line_total_cents(unit_price: MoneyCents, quantity: u32) -> MoneyCents {
        unit_price.saturating_mul(quantity as i64)
    }
}

impl ToRow for OrderItem {}

/// Order total after the percentage discount, plus shipping.
pub fn order_total_cents(
    items: &[OrderItem],
    discount_percent: u8,
    shipping: MoneyCents,
) -> MoneyCents {
    let subtotal: MoneyCents = items.iter().map(|item| item.line_total).sum();
    let discounted = (subtotal as f64) * (1.0 - f64::from(discount_percent) / 100.0);
    (discounted.round() as MoneyCents).saturating_add(shipping)
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct Customer {
    pub customer_id: CustomerId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub registration_date: NaiveDate,
    pub customer_segment: String,
}

impl ToRow for Customer {}

/// Cents on the Rust side, decimal dollars in rows.
mod dollars {
    use serde::{Deserialize, Deserializer, Serializer};

    use super::MoneyCents;

    pub fn serialize<S: Serializer>(cents: &MoneyCents, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(*cents as f64 / 100.0)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<MoneyCents, D::Error> {
        let dollars = f64::deserialize(deserializer)?;
        Ok((dollars * 100.0).round() as MoneyCents)
    }
}
