//! Client for the hosted document store.
//!
//! # Architecture
//!
//! - The store is the source of truth for products, orders, users, and
//!   contact messages - NO local sync, direct API calls
//! - Documents live in named collections behind a JSON/REST API
//! - The store assigns document identifiers and timestamps on write
//!
//! # API surface
//!
//! ```text
//! GET    /v1/{collection}/{id}        - Fetch one document
//! GET    /v1/{collection}?...         - List (order_by, limit, equality filters)
//! POST   /v1/{collection}             - Create (server assigns id)
//! PUT    /v1/{collection}/{id}        - Create or replace with a known id
//! PATCH  /v1/{collection}/{id}        - Merge fields into a document
//! DELETE /v1/{collection}/{id}        - Delete a document
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use sockshop_storefront::docstore::DocStoreClient;
//!
//! let client = DocStoreClient::new(&config.docstore);
//!
//! let product = client.get_product(&product_id).await?;
//! let order = client.create_order(&new_order).await?;
//! ```

mod client;

pub use client::{DocStoreClient, ListQuery};

use thiserror::Error;

use sockshop_core::ProductId;

/// Errors that can occur when talking to the document store.
#[derive(Debug, Error)]
pub enum DocStoreError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The store rejected the request.
    #[error("Document store error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Document not found in its collection.
    #[error("Not found: {collection}/{id}")]
    NotFound { collection: String, id: String },

    /// Rate limited by the store.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),
}

impl DocStoreError {
    /// Whether this error means the document does not exist.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Build a not-found error for a product.
    #[must_use]
    pub fn product_not_found(id: &ProductId) -> Self {
        Self::NotFound {
            collection: "products".to_string(),
            id: id.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DocStoreError::NotFound {
            collection: "products".to_string(),
            id: "p-123".to_string(),
        };
        assert_eq!(err.to_string(), "Not found: products/p-123");

        let err = DocStoreError::Api {
            status: 503,
            message: "maintenance".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Document store error (HTTP 503): maintenance"
        );
    }

    #[test]
    fn test_is_not_found() {
        assert!(DocStoreError::product_not_found(&ProductId::new("p1")).is_not_found());
        assert!(
            !DocStoreError::Api {
                status: 500,
                message: String::new()
            }
            .is_not_found()
        );
    }

    #[test]
    fn test_rate_limited_display() {
        let err = DocStoreError::RateLimited(30);
        assert_eq!(err.to_string(), "Rate limited, retry after 30 seconds");
    }
}
