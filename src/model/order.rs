use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use std::str::FromStr;

/// Server-assigned identifier for Orders.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OrderId(pub String);

impl From<&str> for OrderId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for OrderId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Fulfilment stage of an order.
///
/// Serialized with the labels the backend and the reports use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    #[serde(rename = "Order Placed")]
    Placed,
    Packing,
    Shipped,
    #[serde(rename = "Out for delivery")]
    OutForDelivery,
    Delivered,
}

impl OrderStatus {
    /// Every status, in fulfilment order.
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::Placed,
        OrderStatus::Packing,
        OrderStatus::Shipped,
        OrderStatus::OutForDelivery,
        OrderStatus::Delivered,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            OrderStatus::Placed => "Order Placed",
            OrderStatus::Packing => "Packing",
            OrderStatus::Shipped => "Shipped",
            OrderStatus::OutForDelivery => "Out for delivery",
            OrderStatus::Delivered => "Delivered",
        }
    }

    /// A terminal status admits no further change.
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered)
    }
}

impl Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    /// Accepts the display label or a dashed form such as `out-for-delivery`, ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize_label(s);
        OrderStatus::ALL
            .into_iter()
            .find(|status| {
                normalize_label(status.label()) == wanted
                    || normalize_label(&format!("{status:?}")) == wanted
            })
            .ok_or_else(|| format!("unknown order status: {s:?}"))
    }
}

fn normalize_label(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_name: String,
    pub quantity: u32,
    pub size: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub first_name: String,
    pub last_name: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub zip_code: String,
    pub phone: String,
}

impl Address {
    /// `first last`
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// `street, city, state, country`
    pub fn one_line(&self) -> String {
        format!(
            "{}, {}, {}, {}",
            self.street, self.city, self.state, self.country
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub items: Vec<OrderItem>,
    pub address: Address,
    pub amount: Decimal,
    pub payment_method: String,
    pub payment: bool,
    pub date: DateTime<Utc>,
    pub status: OrderStatus,
}

impl Order {
    /// `name x qty` for every line item, joined with `", "`.
    pub fn items_summary(&self) -> String {
        self.items
            .iter()
            .map(|item| format!("{} x {}", item.product_name, item.quantity))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Checks the invariants every order from the backend must satisfy.
    pub fn validate(&self) -> Result<(), String> {
        if self.items.is_empty() {
            return Err(format!("order {} has no items", self.id));
        }
        if let Some(item) = self.items.iter().find(|item| item.quantity == 0) {
            return Err(format!(
                "order {} has zero quantity for {}",
                self.id, item.product_name
            ));
        }
        let address = &self.address;
        let required = [
            ("firstName", &address.first_name),
            ("lastName", &address.last_name),
            ("street", &address.street),
            ("city", &address.city),
            ("state", &address.state),
            ("country", &address.country),
            ("zipCode", &address.zip_code),
            ("phone", &address.phone),
        ];
        if let Some((field, _)) = required.iter().find(|(_, value)| value.trim().is_empty()) {
            return Err(format!("order {} has an empty address {}", self.id, field));
        }
        if self.amount.is_sign_negative() {
            return Err(format!("order {} has a negative amount", self.id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn sample_order() -> Order {
        Order {
            id: OrderId::from("o1"),
            items: vec![
                OrderItem {
                    product_name: "Shirt".into(),
                    quantity: 2,
                    size: "M".into(),
                },
                OrderItem {
                    product_name: "Cap".into(),
                    quantity: 1,
                    size: "S".into(),
                },
            ],
            address: Address {
                first_name: "Ada".into(),
                last_name: "Lovelace".into(),
                street: "12 Analytical Way".into(),
                city: "London".into(),
                state: "Greater London".into(),
                country: "UK".into(),
                zip_code: "N1".into(),
                phone: "0100".into(),
            },
            amount: dec!(55),
            payment_method: "COD".into(),
            payment: false,
            date: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
            status: OrderStatus::Placed,
        }
    }

    #[test]
    fn status_labels_match_wire_format() {
        let json = serde_json::to_string(&OrderStatus::OutForDelivery).unwrap();
        assert_eq!(json, r#""Out for delivery""#);
        let parsed: OrderStatus = serde_json::from_str(r#""Order Placed""#).unwrap();
        assert_eq!(parsed, OrderStatus::Placed);
    }

    #[test]
    fn status_parses_labels_and_dashed_names() {
        assert_eq!("Out for delivery".parse::<OrderStatus>(), Ok(OrderStatus::OutForDelivery));
        assert_eq!("out-for-delivery".parse::<OrderStatus>(), Ok(OrderStatus::OutForDelivery));
        assert_eq!("placed".parse::<OrderStatus>(), Ok(OrderStatus::Placed));
        assert_eq!("shipped".parse::<OrderStatus>(), Ok(OrderStatus::Shipped));
        assert!("lost".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn summaries_use_report_formats() {
        let order = sample_order();
        assert_eq!(order.items_summary(), "Shirt x 2, Cap x 1");
        assert_eq!(order.address.full_name(), "Ada Lovelace");
        assert_eq!(
            order.address.one_line(),
            "12 Analytical Way, London, Greater London, UK"
        );
    }

    #[test]
    fn validate_rejects_empty_items_and_zero_quantity() {
        let mut order = sample_order();
        assert!(order.validate().is_ok());

        order.items[0].quantity = 0;
        assert!(order.validate().unwrap_err().contains("zero quantity"));

        order.items.clear();
        assert!(order.validate().unwrap_err().contains("no items"));
    }

    #[test]
    fn validate_rejects_blank_address_fields() {
        let mut order = sample_order();
        order.address.city = "  ".into();
        assert!(order.validate().unwrap_err().contains("city"));

        let mut order = sample_order();
        order.address.zip_code = String::new();
        assert!(order.validate().unwrap_err().contains("zipCode"));

        let mut order = sample_order();
        order.address.phone = "  ".into();
        assert!(order.validate().unwrap_err().contains("phone"));
    }
}
