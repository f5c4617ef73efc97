use crate::model::OrderRecord;
use chrono::NaiveDateTime;
use std::collections::HashMap;

/// Aggregated order history of one customer.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomerLifecycle {
    pub customer_id: String,
    pub region: String,
    pub last_order: NaiveDateTime,
    pub order_count: usize,
    pub revenue: f64,
}

/// Groups orders by customer, keeping groups in first-seen order.
/// The region is the one carried by the customer's first record.
pub fn build_lifecycle_data(orders: &[&OrderRecord]) -> Vec<CustomerLifecycle> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut grouped: Vec<CustomerLifecycle> = Vec::new();

    for order in orders {
        let slot = *index.entry(order.customer_id.as_str()).or_insert_with(|| {
            grouped.push(CustomerLifecycle {
                customer_id: order.customer_id.clone(),
                region: order.region.clone(),
                last_order: order.date,
                order_count: 0,
                revenue: 0.0,
            });
            grouped.len() - 1
        });

        let entry = &mut grouped[slot];
        entry.order_count += 1;
        entry.revenue += order.revenue;

        if order.date > entry.last_order {
            entry.last_order = order.date;
        }
    }

    grouped
}
