//! Client-local shopping state.
//!
//! The cart and wishlist belong to the browser session, not the server:
//! entries hold a snapshot of the product as it looked at add time, and
//! nothing here talks to the document store. Stock is checked only at
//! checkout, against authoritative data.

pub mod repository;

pub use repository::{CartRepository, CartStoreError, SessionCartRepository};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use sockshop_core::types::coerce;
use sockshop_core::{Product, ProductId};

/// A product as captured at add-to-cart time.
///
/// Deliberately lenient on read: entries round-trip through the session
/// store unvalidated, and a malformed price or stock coerces to zero and
/// propagates until checkout validation rejects it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProductSnapshot {
    #[serde(default)]
    pub id: ProductId,
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "coerce::decimal")]
    pub price: Decimal,
    #[serde(default, deserialize_with = "coerce::stock")]
    pub stock: u32,
    #[serde(default)]
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl From<&Product> for ProductSnapshot {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            price: product.price,
            stock: product.stock,
            image: product.image.clone(),
            category: product.category.clone(),
        }
    }
}

/// One cart line: a product snapshot plus a quantity.
///
/// Quantity is always >= 1; an entry that would reach 0 is removed from
/// the cart instead of being kept around.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CartEntry {
    pub product: ProductSnapshot,
    pub quantity: u32,
}

impl CartEntry {
    /// Price contribution of this line.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.product.price * Decimal::from(self.quantity)
    }
}

/// The cart: an ordered list of entries, keyed by product id.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct Cart {
    entries: Vec<CartEntry>,
}

impl Cart {
    /// Add one unit of a product.
    ///
    /// If an entry for this product already exists its quantity goes up
    /// by 1; otherwise a new entry is appended with quantity 1. No stock
    /// check happens here - stock is checked only at checkout.
    pub fn add(&mut self, product: ProductSnapshot) {
        if let Some(entry) = self
            .entries
            .iter_mut()
            .find(|entry| entry.product.id == product.id)
        {
            entry.quantity = entry.quantity.saturating_add(1);
        } else {
            self.entries.push(CartEntry {
                product,
                quantity: 1,
            });
        }
    }

    /// Drop the entry for a product; no-op if absent.
    pub fn remove(&mut self, product_id: &ProductId) {
        self.entries
            .retain(|entry| entry.product.id != *product_id);
    }

    /// Replace an entry's quantity verbatim.
    ///
    /// A quantity <= 0 behaves as [`Cart::remove`]. No upper bound is
    /// enforced against stock here.
    pub fn update_quantity(&mut self, product_id: &ProductId, quantity: i64) {
        if quantity <= 0 {
            self.remove(product_id);
            return;
        }

        if let Some(entry) = self
            .entries
            .iter_mut()
            .find(|entry| entry.product.id == *product_id)
        {
            entry.quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        }
    }

    /// Sum of unit price x quantity over all entries.
    ///
    /// Recomputed on every call so it always reflects current entries.
    #[must_use]
    pub fn total_price(&self) -> Decimal {
        self.entries.iter().map(CartEntry::line_total).sum()
    }

    /// Total number of units across all entries.
    #[must_use]
    pub fn total_quantity(&self) -> u32 {
        self.entries
            .iter()
            .fold(0, |sum, entry| sum.saturating_add(entry.quantity))
    }

    /// Empty the cart (used after successful order placement).
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// The entries, in insertion order.
    #[must_use]
    pub fn entries(&self) -> &[CartEntry] {
        &self.entries
    }
}

/// The wishlist: set-like membership by product id.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct Wishlist {
    items: Vec<ProductSnapshot>,
}

impl Wishlist {
    /// Add a product; adding an existing member is a no-op.
    pub fn add(&mut self, product: ProductSnapshot) {
        if !self.items.iter().any(|item| item.id == product.id) {
            self.items.push(product);
        }
    }

    /// Remove a product; no-op if absent.
    pub fn remove(&mut self, product_id: &ProductId) {
        self.items.retain(|item| item.id != *product_id);
    }

    #[must_use]
    pub fn contains(&self, product_id: &ProductId) -> bool {
        self.items.iter().any(|item| item.id == *product_id)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn items(&self) -> &[ProductSnapshot] {
        &self.items
    }
}
