//! Durable storage for the cart and wishlist.
//!
//! The two lists are stored as named, string-serialized entries in the
//! per-browser durable store: read on first touch, overwritten on every
//! mutation. The trait keeps the mechanism swappable (session store
//! here, an in-memory map in tests).

use thiserror::Error;
use tower_sessions::Session;

use crate::cart::{Cart, Wishlist};
use crate::session::keys;

/// Errors from loading or saving shopping state.
#[derive(Debug, Error)]
pub enum CartStoreError {
    /// The session store failed.
    #[error("session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Serializing a list failed.
    #[error("serialize error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Load/save seam for the cart and wishlist.
pub trait CartRepository {
    /// Load the cart; absent or unreadable state loads as empty.
    fn load_cart(&self) -> impl Future<Output = Result<Cart, CartStoreError>> + Send;

    /// Persist the full cart, replacing the stored entry.
    fn save_cart(&self, cart: &Cart) -> impl Future<Output = Result<(), CartStoreError>> + Send;

    /// Load the wishlist; absent or unreadable state loads as empty.
    fn load_wishlist(&self) -> impl Future<Output = Result<Wishlist, CartStoreError>> + Send;

    /// Persist the full wishlist, replacing the stored entry.
    fn save_wishlist(
        &self,
        wishlist: &Wishlist,
    ) -> impl Future<Output = Result<(), CartStoreError>> + Send;
}

/// Session-backed repository: the shipped implementation.
///
/// Lists are stored as JSON strings under fixed keys, mirroring how a
/// browser would keep them in its local key-value storage.
pub struct SessionCartRepository {
    session: Session,
}

impl SessionCartRepository {
    #[must_use]
    pub const fn new(session: Session) -> Self {
        Self { session }
    }

    async fn load_list<T: Default + serde::de::DeserializeOwned>(
        &self,
        key: &str,
    ) -> Result<T, CartStoreError> {
        let raw: Option<String> = self.session.get(key).await?;
        // Stored data is not validated here: field-level garbage coerces
        // leniently in the entry types and propagates to checkout. Only a
        // payload that isn't a list at all falls back to empty.
        Ok(raw
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default())
    }

    async fn save_list<T: serde::Serialize>(
        &self,
        key: &str,
        list: &T,
    ) -> Result<(), CartStoreError> {
        let raw = serde_json::to_string(list)?;
        self.session.insert(key, raw).await?;
        Ok(())
    }
}

impl CartRepository for SessionCartRepository {
    async fn load_cart(&self) -> Result<Cart, CartStoreError> {
        self.load_list(keys::CART).await
    }

    async fn save_cart(&self, cart: &Cart) -> Result<(), CartStoreError> {
        self.save_list(keys::CART, cart).await
    }

    async fn load_wishlist(&self) -> Result<Wishlist, CartStoreError> {
        self.load_list(keys::WISHLIST).await
    }

    async fn save_wishlist(&self, wishlist: &Wishlist) -> Result<(), CartStoreError> {
        self.save_list(keys::WISHLIST, wishlist).await
    }
}

#[cfg(test)]
pub mod testing {
    //! In-memory repository for unit tests.

    use std::sync::Mutex;

    use super::*;

    /// Repository backed by two mutexed slots.
    #[derive(Default)]
    pub struct MemoryCartRepository {
        cart: Mutex<Option<String>>,
        wishlist: Mutex<Option<String>>,
    }

    impl MemoryCartRepository {
        /// Seed the stored cart payload verbatim (may be malformed).
        pub fn with_raw_cart(raw: &str) -> Self {
            let repo = Self::default();
            *repo.cart.lock().expect("lock") = Some(raw.to_string());
            repo
        }
    }

    impl CartRepository for MemoryCartRepository {
        async fn load_cart(&self) -> Result<Cart, CartStoreError> {
            let raw = self.cart.lock().expect("lock").clone();
            Ok(raw
                .and_then(|raw| serde_json::from_str(&raw).ok())
                .unwrap_or_default())
        }

        async fn save_cart(&self, cart: &Cart) -> Result<(), CartStoreError> {
            *self.cart.lock().expect("lock") = Some(serde_json::to_string(cart)?);
            Ok(())
        }

        async fn load_wishlist(&self) -> Result<Wishlist, CartStoreError> {
            let raw = self.wishlist.lock().expect("lock").clone();
            Ok(raw
                .and_then(|raw| serde_json::from_str(&raw).ok())
                .unwrap_or_default())
        }

        async fn save_wishlist(&self, wishlist: &Wishlist) -> Result<(), CartStoreError> {
            *self.wishlist.lock().expect("lock") = Some(serde_json::to_string(wishlist)?);
            Ok(())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use sockshop_core::ProductId;

    use super::testing::MemoryCartRepository;
    use super::*;
    use crate::cart::ProductSnapshot;

    #[tokio::test]
    async fn test_round_trip() {
        let repo = MemoryCartRepository::default();

        let mut cart = repo.load_cart().await.unwrap();
        assert!(cart.is_empty());

        cart.add(ProductSnapshot {
            id: ProductId::new("p1"),
            name: "Sock".into(),
            price: Decimal::new(50, 0),
            stock: 3,
            image: String::new(),
            category: None,
        });
        repo.save_cart(&cart).await.unwrap();

        let reloaded = repo.load_cart().await.unwrap();
        assert_eq!(reloaded, cart);
    }

    #[tokio::test]
    async fn test_unreadable_payload_loads_empty() {
        let repo = MemoryCartRepository::with_raw_cart("{{{not json");
        let cart = repo.load_cart().await.unwrap();
        assert!(cart.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_fields_survive_load() {
        // Price garbage coerces to zero but the entry itself survives,
        // so checkout sees it and rejects it there.
        let repo = MemoryCartRepository::with_raw_cart(
            r#"[{"product": {"id": "p1", "name": "Sock", "price": null}, "quantity": 2}]"#,
        );
        let cart = repo.load_cart().await.unwrap();
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.entries()[0].product.price, Decimal::ZERO);
    }
}
