//! Privileged document store client for admin.
//!
//! Same JSON/REST protocol as the storefront's client, but with the
//! privileged API key and the full mutation surface: product CRUD, order
//! status changes, and unfiltered listings of users and contacts. The
//! storefront key can't delete anything; this one can.

use std::sync::Arc;

use reqwest::{Method, StatusCode};
use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::instrument;

use sockshop_core::model::collections;
use sockshop_core::{
    ContactMessage, NewProduct, Order, OrderId, OrderStatus, Product, ProductId, ProductPatch,
    UserProfile,
};

use crate::config::AdminConfig;

/// Header carrying the API key.
const API_KEY_HEADER: &str = "X-Api-Key";

/// Listing cap for admin views; the dashboard always re-fetches in full,
/// so this bounds how much "full" is.
const ADMIN_LIST_LIMIT: u32 = 500;

/// Errors from the privileged store client.
#[derive(Debug, Error)]
pub enum StoreError {
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
}

impl StoreError {
    /// Whether this error means the document does not exist.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

#[derive(Debug, serde::Deserialize)]
struct ListResponse<T> {
    #[serde(default = "Vec::new")]
    documents: Vec<T>,
}

/// Privileged client for the hosted document store.
#[derive(Clone)]
pub struct AdminStoreClient {
    inner: Arc<AdminStoreClientInner>,
}

struct AdminStoreClientInner {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl AdminStoreClient {
    /// Create a new privileged store client.
    #[must_use]
    pub fn new(config: &AdminConfig) -> Self {
        Self {
            inner: Arc::new(AdminStoreClientInner {
                client: reqwest::Client::new(),
                base_url: config.docstore_url.trim_end_matches('/').to_string(),
                api_key: config.docstore_api_key.expose_secret().to_string(),
            }),
        }
    }

    async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        collection: &str,
        id: Option<&str>,
        query: &[(&str, String)],
        body: Option<serde_json::Value>,
    ) -> Result<T, StoreError> {
        let url = match id {
            Some(id) => format!("{}/v1/{collection}/{id}", self.inner.base_url),
            None => format!("{}/v1/{collection}", self.inner.base_url),
        };

        let mut request = self
            .inner
            .client
            .request(method, &url)
            .header(API_KEY_HEADER, &self.inner.api_key)
            .query(query);
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Err(StoreError::NotFound {
                collection: collection.to_string(),
                id: id.unwrap_or("?").to_string(),
            });
        }

        let response_text = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %response_text.chars().take(500).collect::<String>(),
                "Document store returned non-success status"
            );
            return Err(StoreError::Api {
                status: status.as_u16(),
                message: response_text.chars().take(200).collect(),
            });
        }

        // 204 No Content (deletes) decodes as null
        if response_text.is_empty() {
            return serde_json::from_str("null").map_err(StoreError::Parse);
        }

        serde_json::from_str(&response_text).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %response_text.chars().take(500).collect::<String>(),
                "Failed to parse document store response"
            );
            StoreError::Parse(e)
        })
    }

    async fn list_all<T: DeserializeOwned>(&self, collection: &str) -> Result<Vec<T>, StoreError> {
        let query = [
            ("order_by", "-created_at".to_string()),
            ("limit", ADMIN_LIST_LIMIT.to_string()),
        ];
        let response: ListResponse<T> = self
            .request(Method::GET, collection, None, &query, None)
            .await?;
        Ok(response.documents)
    }

    async fn patch<T: DeserializeOwned>(
        &self,
        collection: &str,
        id: &str,
        body: &impl Serialize,
    ) -> Result<T, StoreError> {
        self.request(
            Method::PATCH,
            collection,
            Some(id),
            &[],
            Some(serde_json::to_value(body)?),
        )
        .await
    }

    // =========================================================================
    // Products
    // =========================================================================

    /// All products, including ones hidden from the public catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn list_products(&self) -> Result<Vec<Product>, StoreError> {
        self.list_all(collections::PRODUCTS).await
    }

    /// Create a product.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, product), fields(name = %product.name))]
    pub async fn create_product(&self, product: &NewProduct) -> Result<Product, StoreError> {
        self.request(
            Method::POST,
            collections::PRODUCTS,
            None,
            &[],
            Some(serde_json::to_value(product)?),
        )
        .await
    }

    /// Merge a patch into a product.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the product does not exist.
    #[instrument(skip(self, patch), fields(id = %id))]
    pub async fn update_product(
        &self,
        id: &ProductId,
        patch: &ProductPatch,
    ) -> Result<Product, StoreError> {
        self.patch(collections::PRODUCTS, id.as_str(), patch).await
    }

    /// Delete a product.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the product does not exist.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn delete_product(&self, id: &ProductId) -> Result<(), StoreError> {
        let (): () = self
            .request(
                Method::DELETE,
                collections::PRODUCTS,
                Some(id.as_str()),
                &[],
                None,
            )
            .await?;
        Ok(())
    }

    // =========================================================================
    // Orders
    // =========================================================================

    /// All orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn list_orders(&self) -> Result<Vec<Order>, StoreError> {
        self.list_all(collections::ORDERS).await
    }

    /// One order with its line items.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the order does not exist.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn get_order(&self, id: &OrderId) -> Result<Order, StoreError> {
        self.request(Method::GET, collections::ORDERS, Some(id.as_str()), &[], None)
            .await
    }

    /// Move an order through its lifecycle.
    ///
    /// Orders are otherwise immutable after creation; status (and the
    /// server-maintained `updated_at`) is the only thing this touches.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the order does not exist.
    #[instrument(skip(self), fields(id = %id, status = %status))]
    pub async fn update_order_status(
        &self,
        id: &OrderId,
        status: OrderStatus,
    ) -> Result<Order, StoreError> {
        self.patch(
            collections::ORDERS,
            id.as_str(),
            &serde_json::json!({ "status": status }),
        )
        .await
    }

    // =========================================================================
    // Users & Contacts (read-only from admin)
    // =========================================================================

    /// All user profiles.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn list_users(&self) -> Result<Vec<UserProfile>, StoreError> {
        self.list_all(collections::USERS).await
    }

    /// All contact messages.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn list_contacts(&self) -> Result<Vec<ContactMessage>, StoreError> {
        self.list_all(collections::CONTACTS).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::SecretString;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn config_for(server: &MockServer) -> AdminConfig {
        AdminConfig {
            database_url: SecretString::from("postgres://localhost/test"),
            host: "127.0.0.1".parse().unwrap(),
            port: 3001,
            base_url: "http://localhost:3001".to_string(),
            session_secret: SecretString::from("x".repeat(32)),
            allowed_emails: vec![sockshop_core::Email::parse("boss@sockshop.example").unwrap()],
            docstore_url: server.uri(),
            docstore_api_key: SecretString::from("admin-key"),
            auth_service_url: "http://localhost:9091".to_string(),
            auth_service_api_key: SecretString::from("auth-key"),
            sentry_dsn: None,
            sentry_environment: None,
        }
    }

    #[tokio::test]
    async fn test_update_order_status_patches_status_field() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/v1/orders/o1"))
            .and(header(API_KEY_HEADER, "admin-key"))
            .and(body_json(serde_json::json!({"status": "shipped"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "o1",
                "user_id": "u1",
                "customer": {
                    "name": "Jamie", "email": "jamie@example.com", "phone": "09123456789",
                    "address": "1 Yarn St", "city": "Loomtown",
                },
                "items": [],
                "total_amount": "0",
                "status": "shipped",
            })))
            .mount(&server)
            .await;

        let client = AdminStoreClient::new(&config_for(&server));
        let order = client
            .update_order_status(&OrderId::new("o1"), OrderStatus::Shipped)
            .await
            .unwrap();
        assert_eq!(order.status, OrderStatus::Shipped);
    }

    #[tokio::test]
    async fn test_delete_product_handles_empty_body() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/v1/products/p1"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let client = AdminStoreClient::new(&config_for(&server));
        client.delete_product(&ProductId::new("p1")).await.unwrap();
    }

    #[tokio::test]
    async fn test_delete_missing_product_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/v1/products/gone"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = AdminStoreClient::new(&config_for(&server));
        let err = client
            .delete_product(&ProductId::new("gone"))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }
}
