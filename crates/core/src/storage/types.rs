use serde::{Deserialize, Serialize};

/// Order statistics grouped by shop and by customer. Averages are `0.0`
/// when the corresponding group count is zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceStatistics {
    pub total_number_of_shops: u64,
    pub average_number_of_orders_per_shop: f64,
    pub total_number_of_customers: u64,
    pub average_number_of_orders_per_customer: f64,
}

impl ServiceStatistics {
    /// Builds statistics from per-shop and per-customer order counts.
    pub fn from_counts(orders_per_shop: &[u64], orders_per_customer: &[u64]) -> Self {
        Self {
            total_number_of_shops: orders_per_shop.len() as u64,
            average_number_of_orders_per_shop: average(orders_per_shop),
            total_number_of_customers: orders_per_customer.len() as u64,
            average_number_of_orders_per_customer: average(orders_per_customer),
        }
    }
}

fn average(counts: &[u64]) -> f64 {
    if counts.is_empty() {
        return 0.0;
    }
    counts.iter().sum::<u64>() as f64 / counts.len() as f64
}
