//! Product documents.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::ProductId;
use crate::types::coerce;

/// A product document as read from the `products` collection.
///
/// Price and stock are coerced to numeric types at the read boundary and
/// default to zero when absent or malformed; a zero price or stock hides
/// the product from the catalog but does not delete it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    #[serde(default)]
    pub id: ProductId,
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "coerce::decimal")]
    pub price: Decimal,
    #[serde(default, deserialize_with = "coerce::stock")]
    pub stock: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Primary image reference (URL or storage key).
    #[serde(default)]
    pub image: String,
    /// Additional image references beyond the primary one.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Product {
    /// Whether the product should appear in the public catalog.
    ///
    /// Products with non-positive stock or price are hidden for display
    /// purposes only, never deleted.
    #[must_use]
    pub fn is_sellable(&self) -> bool {
        self.stock > 0 && self.price > Decimal::ZERO
    }
}

/// Payload for creating a product; the store assigns id and timestamps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub price: Decimal,
    pub stock: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default)]
    pub image: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Partial update for a product; only present fields are written.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_lenient_read() {
        // A document written by an older client: price as string, no stock
        let json = r#"{"id": "p1", "name": "Wool Crew", "price": "12.50"}"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.price, Decimal::new(1250, 2));
        assert_eq!(product.stock, 0);
        assert!(!product.is_sellable());
    }

    #[test]
    fn test_sellable() {
        let json = r#"{"id": "p1", "name": "Wool Crew", "price": 12.5, "stock": 3}"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert!(product.is_sellable());
    }

    #[test]
    fn test_zero_price_hidden() {
        let json = r#"{"id": "p1", "name": "Wool Crew", "price": 0, "stock": 3}"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert!(!product.is_sellable());
    }

    #[test]
    fn test_patch_serializes_only_present_fields() {
        let patch = ProductPatch {
            stock: Some(8),
            ..ProductPatch::default()
        };
        let json = serde_json::to_value(&patch).unwrap();
        assert_eq!(json, serde_json::json!({"stock": 8}));
    }
}
