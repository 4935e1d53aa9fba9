//! Order documents.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{OrderId, OrderStatus, PaymentMethod, PaymentStatus, ProductId, UserId};

/// Customer contact and delivery fields captured at checkout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerInfo {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// A single order line, frozen from authoritative product data at order
/// time. Never a live reference back to the product document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    pub product_id: ProductId,
    pub name: String,
    pub unit_price: Decimal,
    pub quantity: u32,
    /// `unit_price * quantity`, computed once at order time.
    pub subtotal: Decimal,
}

impl OrderItem {
    /// Build a line item, computing the subtotal.
    #[must_use]
    pub fn new(product_id: ProductId, name: String, unit_price: Decimal, quantity: u32) -> Self {
        let subtotal = unit_price * Decimal::from(quantity);
        Self {
            product_id,
            name,
            unit_price,
            quantity,
            subtotal,
        }
    }
}

/// An order document as read from the `orders` collection.
///
/// Immutable after creation except for `status` and timestamps, which
/// only the admin dashboard touches.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    #[serde(default)]
    pub id: OrderId,
    pub user_id: UserId,
    pub customer: CustomerInfo,
    pub items: Vec<OrderItem>,
    pub total_amount: Decimal,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default)]
    pub payment_status: PaymentStatus,
    #[serde(default)]
    pub payment_method: PaymentMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Payload for creating an order; the store assigns id and timestamps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewOrder {
    pub user_id: UserId,
    pub customer: CustomerInfo,
    pub items: Vec<OrderItem>,
    pub total_amount: Decimal,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub payment_method: PaymentMethod,
}

impl NewOrder {
    /// Build a pending cash-on-delivery order from line items.
    ///
    /// The total is the exact sum of line-item subtotals; the invariant
    /// that `total_amount == Σ subtotal` holds by construction.
    #[must_use]
    pub fn pending(user_id: UserId, customer: CustomerInfo, items: Vec<OrderItem>) -> Self {
        let total_amount = items.iter().map(|item| item.subtotal).sum();
        Self {
            user_id,
            customer,
            items,
            total_amount,
            status: OrderStatus::Pending,
            payment_status: PaymentStatus::Pending,
            payment_method: PaymentMethod::CashOnDelivery,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn customer() -> CustomerInfo {
        CustomerInfo {
            name: "Jamie".to_string(),
            email: "jamie@example.com".to_string(),
            phone: "09123456789".to_string(),
            address: "1 Yarn St".to_string(),
            city: "Loomtown".to_string(),
            notes: None,
        }
    }

    #[test]
    fn test_item_subtotal() {
        let item = OrderItem::new(ProductId::new("p1"), "Sock A".into(), Decimal::new(50, 0), 2);
        assert_eq!(item.subtotal, Decimal::new(100, 0));
    }

    #[test]
    fn test_pending_order_total_is_sum_of_subtotals() {
        let items = vec![
            OrderItem::new(ProductId::new("p1"), "Sock A".into(), Decimal::new(50, 0), 2),
            OrderItem::new(ProductId::new("p2"), "Sock B".into(), Decimal::new(125, 1), 4),
        ];
        let order = NewOrder::pending(UserId::new("u1"), customer(), items);

        assert_eq!(order.total_amount, Decimal::new(150, 0));
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.payment_status, PaymentStatus::Pending);
        assert_eq!(order.payment_method, PaymentMethod::CashOnDelivery);
    }

    #[test]
    fn test_order_deserialize_defaults_status() {
        let json = serde_json::json!({
            "id": "o1",
            "user_id": "u1",
            "customer": customer(),
            "items": [],
            "total_amount": "0",
        });
        let order: Order = serde_json::from_value(json).unwrap();
        assert_eq!(order.status, OrderStatus::Pending);
    }
}
