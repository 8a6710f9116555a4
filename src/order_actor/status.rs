//! Order lifecycle transitions.
//!
//! `Placed → Packing → Shipped → OutForDelivery → Delivered`
//!
//! While an order is not yet delivered, any status may be selected, including going back a
//! step. The backend remains the source of truth and may still refuse the change.
//! `Delivered` is terminal.

use crate::model::{Order, OrderStatus};
use crate::order_actor::OrderError;

impl OrderStatus {
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        !self.is_terminal() || *self == next
    }
}

/// Returns a copy of `order` moved to `next`. The input is left untouched.
pub fn apply_transition(order: &Order, next: OrderStatus) -> Result<Order, OrderError> {
    if !order.status.can_transition_to(next) {
        return Err(OrderError::InvalidTransition {
            id: order.id.to_string(),
            from: order.status,
            to: next,
        });
    }
    Ok(Order {
        status: next,
        ..order.clone()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Address, OrderId, OrderItem};
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;

    fn order(status: OrderStatus) -> Order {
        Order {
            id: OrderId::from("o1"),
            items: vec![OrderItem {
                product_name: "Shirt".into(),
                quantity: 1,
                size: "M".into(),
            }],
            address: Address {
                first_name: "Grace".into(),
                last_name: "Hopper".into(),
                street: "1 Navy Rd".into(),
                city: "Arlington".into(),
                state: "VA".into(),
                country: "US".into(),
                zip_code: "22201".into(),
                phone: "555".into(),
            },
            amount: dec!(20),
            payment_method: "Stripe".into(),
            payment: true,
            date: Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap(),
            status,
        }
    }

    #[test]
    fn transition_changes_only_the_status() {
        let before = order(OrderStatus::Placed);
        let copy = before.clone();

        let after = apply_transition(&before, OrderStatus::Shipped).unwrap();

        assert_eq!(before, copy);
        assert_eq!(after.status, OrderStatus::Shipped);
        assert_eq!(
            Order {
                status: OrderStatus::Placed,
                ..after
            },
            before
        );
    }

    #[test]
    fn non_terminal_states_may_move_anywhere() {
        for from in OrderStatus::ALL.into_iter().filter(|s| !s.is_terminal()) {
            for to in OrderStatus::ALL {
                assert!(
                    apply_transition(&order(from), to).is_ok(),
                    "{from} -> {to} should be allowed"
                );
            }
        }
    }

    #[test]
    fn delivered_is_terminal() {
        let delivered = order(OrderStatus::Delivered);

        let err = apply_transition(&delivered, OrderStatus::Packing).unwrap_err();
        assert_eq!(
            err,
            OrderError::InvalidTransition {
                id: "o1".into(),
                from: OrderStatus::Delivered,
                to: OrderStatus::Packing,
            }
        );

        // Re-selecting the current terminal status is a no-op
        let same = apply_transition(&delivered, OrderStatus::Delivered).unwrap();
        assert_eq!(same, delivered);
    }
}
