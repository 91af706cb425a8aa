//! Splitting a fill across parallel instances.

use std::fmt;
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::retail::CustomerId;
use crate::CoreError;

/// Work assigned to one parallel instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Partition {
    pub index: usize,
    pub customer_start: CustomerId,
    pub customer_end: CustomerId,
    pub orders: u64,
}

impl Partition {
    pub fn customers(&self) -> RangeInclusive<CustomerId> {
        self.customer_start..=self.customer_end
    }

    pub fn customer_count(&self) -> u64 {
        self.customer_end - self.customer_start + 1
    }
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "instance {}: {} orders, customer IDs {}-{}",
            self.index, self.orders, self.customer_start, self.customer_end
        )
    }
}

/// Splits `total_orders` and customers `1..=max_customer_id` into `partitions`
/// disjoint shares. Both divisions are even; the last partition takes the
/// remainder of each.
pub fn plan_partitions(
    total_orders: u64,
    partitions: usize,
    max_customer_id: CustomerId,
) -> Result<Vec<Partition>, CoreError> {
    if partitions == 0 {
        return Err(CoreError::NoPartitions);
    }
    let n = partitions as u64;
    if max_customer_id < n {
        return Err(CoreError::TooFewCustomers {
            customers: max_customer_id,
            partitions,
        });
    }

    let orders_per_instance = total_orders / n;
    let customer_range_size = max_customer_id / n;

    let plan = (0..partitions)
        .map(|index| {
            let i = index as u64;
            let last = index == partitions - 1;
            Partition {
                index,
                customer_start: i * customer_range_size + 1,
                customer_end: if last { max_customer_id } else { (i + 1) * customer_range_size },
                orders: if last {
                    total_orders - orders_per_instance * i
                } else {
                    orders_per_instance
                },
            }
        })
        .collect();
    Ok(plan)
}
