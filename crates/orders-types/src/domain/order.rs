use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Order status. The set is open: callers may move an order to any non-blank value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct OrderStatus(String);

impl OrderStatus {
    pub const PENDING: &'static str = "pending";

    pub fn pending() -> Self {
        Self(Self::PENDING.to_string())
    }

    pub fn parse(status: impl Into<String>) -> anyhow::Result<Self> {
        let status = status.into();
        let trimmed = status.trim();
        if trimmed.is_empty() {
            anyhow::bail!("status required");
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One requested line of a new order, as sent by the caller.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LineRequest {
    pub product_id: String,
    pub quantity: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrderItem {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: String,
    pub quantity: i64,
    /// Unit price captured from the catalog when the order was placed.
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
}

impl OrderItem {
    pub fn new(order_id: Uuid, product_id: String, quantity: i64, price: Decimal) -> Self {
        Self {
            id: Uuid::new_v4(),
            order_id,
            product_id,
            quantity,
            price,
        }
    }

    /// `price * quantity`, or `None` on decimal overflow.
    pub fn line_total(&self) -> Option<Decimal> {
        line_total(self.price, self.quantity)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Order {
    pub id: Uuid,
    pub user_id: String,
    pub status: OrderStatus,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// A fresh order in the `pending` state.
    pub fn pending(user_id: String, total: Decimal) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            status: OrderStatus::pending(),
            total,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn update_status(&mut self, status: OrderStatus) {
        self.status = status;
        self.updated_at = Utc::now();
    }
}

pub fn line_total(price: Decimal, quantity: i64) -> Option<Decimal> {
    price.checked_mul(Decimal::from(quantity))
}

/// Rejects requests that must never reach an external service.
pub fn validate_order_request(user_id: &str, lines: &[LineRequest]) -> anyhow::Result<()> {
    if user_id.trim().is_empty() {
        anyhow::bail!("user_id required");
    }
    if lines.is_empty() {
        anyhow::bail!("items empty");
    }
    for line in lines {
        if line.product_id.trim().is_empty() {
            anyhow::bail!("product_id required");
        }
        if line.quantity <= 0 {
            anyhow::bail!("quantity must be > 0");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(product_id: &str, quantity: i64) -> LineRequest {
        LineRequest {
            product_id: product_id.into(),
            quantity,
        }
    }

    #[test]
    fn pending_order_defaults() {
        let order = Order::pending("u1".into(), Decimal::from(300));
        assert_eq!(order.status.as_str(), "pending");
        assert_eq!(order.created_at, order.updated_at);
        assert_eq!(order.total, Decimal::from(300));
    }

    #[test]
    fn request_validation() {
        assert!(validate_order_request("u1", &[line("p1", 1)]).is_ok());
        assert!(validate_order_request("", &[line("p1", 1)]).is_err());
        assert!(validate_order_request("  ", &[line("p1", 1)]).is_err());
        assert!(validate_order_request("u1", &[]).is_err());
        assert!(validate_order_request("u1", &[line("p1", 1), line("p2", 0)]).is_err());
        assert!(validate_order_request("u1", &[line("p1", -2)]).is_err());
        assert!(validate_order_request("u1", &[line("", 1)]).is_err());
    }

    #[test]
    fn status_parse_rejects_blank_but_accepts_any_value() {
        assert!(OrderStatus::parse("").is_err());
        assert!(OrderStatus::parse("   ").is_err());
        assert_eq!(OrderStatus::parse("paid").unwrap().as_str(), "paid");
        assert_eq!(
            OrderStatus::parse("awaiting-courier").unwrap().to_string(),
            "awaiting-courier"
        );
    }

    #[test]
    fn status_serializes_as_plain_string() {
        let json = serde_json::to_string(&OrderStatus::pending()).unwrap();
        assert_eq!(json, "\"pending\"");
    }

    #[test]
    fn money_serializes_as_json_numbers() {
        let order = Order::pending("u1".into(), Decimal::new(4498, 2));
        let value = serde_json::to_value(&order).unwrap();
        assert!(value["total"].is_number());
        assert_eq!(value["total"].as_f64(), Some(44.98));

        let item = OrderItem::new(order.id, "p1".into(), 2, Decimal::from(100));
        let value = serde_json::to_value(&item).unwrap();
        assert!(value["price"].is_number());

        let back: Order = serde_json::from_value(serde_json::to_value(&order).unwrap()).unwrap();
        assert_eq!(back.total, order.total);
    }

    #[test]
    fn line_total_is_exact() {
        let item = OrderItem::new(Uuid::new_v4(), "p1".into(), 3, Decimal::new(1999, 2));
        assert_eq!(item.line_total(), Some(Decimal::new(5997, 2)));
        assert_eq!(line_total(Decimal::MAX, 2), None);
    }

    #[test]
    fn update_status_mutates_timestamp() {
        let mut order = Order::pending("u1".into(), Decimal::from(10));
        let before = order.updated_at;
        std::thread::sleep(std::time::Duration::from_millis(2));
        order.update_status(OrderStatus::parse("paid").unwrap());
        assert_eq!(order.status.as_str(), "paid");
        assert!(order.updated_at > before);
        assert_eq!(order.total, Decimal::from(10));
    }
}
