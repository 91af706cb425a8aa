//! Synthetic order and customer generation.
//!
//! Generators are generic over their random source so tests can run them
//! from a seeded [`StdRng`]; production callers use [`OrderGenerator::from_entropy`].

use std::ops::RangeInclusive;

use chrono::{DateTime, Duration, SubsecRound, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use of_core::catalog::CATALOG;
use of_core::retail::{
    order_total_cents, CustomerId, MoneyCents, Order, OrderId, OrderItem, OrderItemId, OrderStatus,
};

pub mod customers;

pub use customers::CustomerGenerator;

const DISCOUNT_PERCENTS: [u8; 5] = [0, 5, 10, 15, 20];
const SHIPPING_CENTS: [MoneyCents; 4] = [0, 599, 999, 1_499];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GeneratorConfig {
    pub min_items_per_order: usize,
    pub max_items_per_order: usize,
    pub max_quantity: u32,
    pub order_window_days: i64,
    /// Fixed seed for reproducible fills; each instance offsets it by its index.
    pub seed: Option<u64>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            min_items_per_order: 1,
            max_items_per_order: 5,
            max_quantity: 3,
            order_window_days: 365,
            seed: None,
        }
    }
}

impl GeneratorConfig {
    /// Item count bounds, never admitting an empty order.
    pub fn item_bounds(&self) -> RangeInclusive<usize> {
        let min = self.min_items_per_order.max(1);
        min..=self.max_items_per_order.max(min)
    }
}

pub struct OrderGenerator<R> {
    cfg: GeneratorConfig,
    rng: R,
    reference: DateTime<Utc>,
}

impl OrderGenerator<StdRng> {
    pub fn from_entropy(cfg: GeneratorConfig) -> Self {
        Self::new(cfg, StdRng::from_os_rng())
    }

    /// Seeded from `cfg.seed` when set, otherwise from the OS.
    pub fn for_instance(cfg: GeneratorConfig, instance: usize) -> Self {
        match cfg.seed {
            Some(seed) => {
                let rng = StdRng::seed_from_u64(seed.wrapping_add(instance as u64));
                Self::new(cfg, rng)
            }
            None => Self::from_entropy(cfg),
        }
    }
}

impl<R: Rng> OrderGenerator<R> {
    pub fn new(cfg: GeneratorConfig, rng: R) -> Self {
        Self {
            cfg,
            rng,
            reference: Utc::now().trunc_subsecs(0),
        }
    }

    /// Order dates fall in the window ending at `reference`.
    pub fn with_reference_time(mut self, reference: DateTime<Utc>) -> Self {
        self.reference = reference;
        self
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.cfg
    }

    pub fn random_customer_id(&mut self, max_customer_id: CustomerId) -> CustomerId {
        self.random_customer_id_in_range(1..=max_customer_id.max(1))
    }

    pub fn random_customer_id_in_range(
        &mut self,
        customers: RangeInclusive<CustomerId>,
    ) -> CustomerId {
        self.rng.random_range(customers)
    }

    pub fn random_item_count(&mut self) -> usize {
        let bounds = self.cfg.item_bounds();
        self.rng.random_range(bounds)
    }

    /// Items `first_item_id..first_item_id + count`, all owned by `order_id`.
    pub fn generate_order_items(
        &mut self,
        order_id: OrderId,
        first_item_id: OrderItemId,
        count: usize,
    ) -> Vec<OrderItem> {
        (0..count as u64)
            .map(|offset| {
                let product = &CATALOG[self.rng.random_range(0..CATALOG.len())];
                let quantity = self.rng.random_range(1..=self.cfg.max_quantity.max(1));
                OrderItem {
                    order_item_id: first_item_id + offset,
                    order_id,
                    product_id: product.product_id,
                    product_name: product.name.to_string(),
                    product_category: product.category.to_string(),
                    quantity,
                    unit_price: product.price_cents,
                    line_total: OrderItem::line_total_cents(product.price_cents, quantity),
                }
            })
            .collect()
    }

    /// The order header for `items`; its total is derived from their line totals.
    pub fn generate_order(
        &mut self,
        customer_id: CustomerId,
        order_id: OrderId,
        items: &[OrderItem],
    ) -> Order {
        let window_secs = self.cfg.order_window_days.max(1) * 24 * 60 * 60;
        let order_date = self.reference - Duration::seconds(self.rng.random_range(0..window_secs));
        let order_status = OrderStatus::ALL[self.rng.random_range(0..OrderStatus::ALL.len())];
        let discount_percent = DISCOUNT_PERCENTS[self.rng.random_range(0..DISCOUNT_PERCENTS.len())];
        let shipping_cost = SHIPPING_CENTS[self.rng.random_range(0..SHIPPING_CENTS.len())];

        Order {
            order_id,
            customer_id,
            order_date,
            order_status,
            total_amount: order_total_cents(items, discount_percent, shipping_cost),
            discount_percent,
            shipping_cost,
        }
    }

    pub fn generate(
        &mut self,
        customer_id: CustomerId,
        order_id: OrderId,
        first_item_id: OrderItemId,
        item_count: usize,
    ) -> (Order, Vec<OrderItem>) {
        let items = self.generate_order_items(order_id, first_item_id, item_count);
        let order = self.generate_order(customer_id, order_id, &items);
        (order, items)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use chrono::TimeZone;
    use of_core::catalog;

    use super::*;

    fn seeded(seed: u64) -> OrderGenerator<StdRng> {
        OrderGenerator::new(GeneratorConfig::default(), StdRng::seed_from_u64(seed))
            .with_reference_time(Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap())
    }

    #[test]
    fn items_reference_their_order() {
        let mut generator = seeded(7);
        for order_id in 1..200 {
            let count = generator.random_item_count();
            assert!((1..=5).contains(&count));

            let first = order_id * 10;
            let (order, items) = generator.generate(3, order_id, first, count);
            assert_eq!(order.order_id, order_id);
            assert_eq!(items.len(), count);
            for (offset, item) in items.iter().enumerate() {
                assert_eq!(item.order_id, order_id);
                assert_eq!(item.order_item_id, first + offset as u64);
            }
        }
    }

    #[test]
    fn items_come_from_catalog() {
        let mut generator = seeded(11);
        for item in generator.generate_order_items(1, 1, 500) {
            let product = catalog::find(item.product_id).expect("catalog product");
            assert_eq!(item.product_name, product.name);
            assert_eq!(item.unit_price, product.price_cents);
            assert!((1..=3).contains(&item.quantity));
            assert_eq!(item.line_total, item.unit_price * i64::from(item.quantity));
        }
    }

    #[test]
    fn order_fields_stay_in_domain() {
        let reference = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let mut generator = seeded(3);
        let mut statuses = HashSet::new();
        for order_id in 1..=1_000 {
            let items = generator.generate_order_items(order_id, order_id, 2);
            let order = generator.generate_order(42, order_id, &items);
            statuses.insert(order.order_status);
            assert!(DISCOUNT_PERCENTS.contains(&order.discount_percent));
            assert!(SHIPPING_CENTS.contains(&order.shipping_cost));
            assert!(order.order_date <= reference);
            assert!(order.order_date > reference - Duration::days(365));
            assert_eq!(
                order.total_amount,
                order_total_cents(&items, order.discount_percent, order.shipping_cost)
            );
        }
        assert_eq!(statuses.len(), OrderStatus::ALL.len());
    }

    #[test]
    fn customer_ids_stay_in_range() {
        let mut generator = seeded(5);
        let mut seen = HashSet::new();
        for _ in 0..2_000 {
            let id = generator.random_customer_id_in_range(34..=66);
            assert!((34..=66).contains(&id));
            seen.insert(id);
        }
        assert_eq!(seen.len(), 33);
        assert_eq!(generator.random_customer_id(1), 1);
    }

    #[test]
    fn same_seed_same_records() {
        let a = seeded(99).generate(1, 1, 1, 4);
        let b = seeded(99).generate(1, 1, 1, 4);
        assert_eq!(a, b);
    }

    #[test]
    fn item_bounds_never_allow_empty_orders() {
        let cfg = GeneratorConfig {
            min_items_per_order: 0,
            max_items_per_order: 0,
            ..Default::default()
        };
        assert_eq!(cfg.item_bounds(), 1..=1);
    }
}
