use chrono::{Duration, NaiveDate};
use rand::Rng;

use of_core::retail::{Customer, CustomerId};

const FIRST_NAMES: [&str; 8] =
    ["Avery", "Blake", "Casey", "Devon", "Emery", "Finley", "Harper", "Jordan"];
const LAST_NAMES: [&str; 8] =
    ["Nguyen", "Patel", "Garcia", "Smith", "Kim", "Okafor", "Rossi", "Larsen"];
const CITIES: [(&str, &str); 10] = [
    ("San Francisco", "CA"),
    ("New York", "NY"),
    ("Austin", "TX"),
    ("Miami", "FL"),
    ("Seattle", "WA"),
    ("Denver", "CO"),
    ("Portland", "OR"),
    ("Salt Lake City", "UT"),
    ("Las Vegas", "NV"),
    ("Phoenix", "AZ"),
];
const SEGMENTS: [&str; 4] = ["Premium", "Standard", "Budget", "VIP"];

pub struct CustomerGenerator<R> {
    rng: R,
    registration_start: NaiveDate,
}

impl<R: Rng> CustomerGenerator<R> {
    pub fn new(rng: R, registration_start: NaiveDate) -> Self {
        Self { rng, registration_start }
    }

    pub fn generate(&mut self, customer_id: CustomerId) -> Customer {
        let first_name = FIRST_NAMES[self.rng.random_range(0..FIRST_NAMES.len())];
        let last_name = LAST_NAMES[self.rng.random_range(0..LAST_NAMES.len())];
        let (city, state) = CITIES[self.rng.random_range(0..CITIES.len())];
        let registered_after = Duration::days(self.rng.random_range(0..730));
        let segment = SEGMENTS[self.rng.random_range(0..SEGMENTS.len())];

        Customer {
            customer_id,
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            email: format!(
                "{}.{}{}@example.com",
                first_name.to_lowercase(),
                last_name.to_lowercase(),
                customer_id
            ),
            phone: format!("555-{:04}", customer_id % 10_000),
            address: format!("{} Main St", self.rng.random_range(1..10_000u32)),
            city: city.to_string(),
            state: state.to_string(),
            zip_code: format!("{:05}", self.rng.random_range(10_000..100_000u32)),
            registration_date: self.registration_start + registered_after,
            customer_segment: segment.to_string(),
        }
    }

    /// Customers with consecutive IDs starting at `first_id`.
    pub fn generate_batch(&mut self, first_id: CustomerId, count: u64) -> Vec<Customer> {
        (first_id..first_id + count).map(|id| self.generate(id)).collect()
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn batch_ids_are_consecutive() {
        let start = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
        let mut generator = CustomerGenerator::new(StdRng::seed_from_u64(1), start);
        let customers = generator.generate_batch(101, 25);
        let ids: Vec<_> = customers.iter().map(|c| c.customer_id).collect();
        assert_eq!(ids, (101..126).collect::<Vec<_>>());
        for c in &customers {
            assert!(c.email.ends_with("@example.com"));
            assert!(c.registration_date >= start);
            assert_eq!(c.zip_code.len(), 5);
        }
    }
}
