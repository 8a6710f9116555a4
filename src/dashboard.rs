//! Summary figures for the console's landing page, computed from the local snapshots.

use crate::model::{Order, OrderStatus, Product};
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardStats {
    pub total_products: usize,
    pub total_orders: usize,
    pub paid_orders: usize,
    /// Sum of the amounts of paid orders.
    pub paid_revenue: Decimal,
    /// Order count for every status, in lifecycle order.
    pub orders_by_status: Vec<(OrderStatus, usize)>,
}

impl DashboardStats {
    pub fn from_snapshots(products: &[Product], orders: &[Order]) -> Self {
        let paid: Vec<&Order> = orders.iter().filter(|order| order.payment).collect();
        Self {
            total_products: products.len(),
            total_orders: orders.len(),
            paid_orders: paid.len(),
            paid_revenue: paid.iter().map(|order| order.amount).sum(),
            orders_by_status: OrderStatus::ALL
                .into_iter()
                .map(|status| {
                    let count = orders.iter().filter(|order| order.status == status).count();
                    (status, count)
                })
                .collect(),
        }
    }

    pub fn count(&self, status: OrderStatus) -> usize {
        self.orders_by_status
            .iter()
            .find(|(s, _)| *s == status)
            .map_or(0, |(_, count)| *count)
    }
}
