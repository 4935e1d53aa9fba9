//! Document store client implementation.
//!
//! Thin `reqwest` wrapper; every response is read as text first so parse
//! failures can log a truncated body for diagnostics.

use std::sync::Arc;

use reqwest::{Method, StatusCode};
use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::instrument;

use sockshop_core::model::collections;
use sockshop_core::{
    ContactMessage, NewContactMessage, NewOrder, Order, OrderId, Product, ProductId, ProductPatch,
    UserId, UserProfile,
};

use crate::config::DocStoreConfig;
use crate::docstore::DocStoreError;

/// Header carrying the API key.
const API_KEY_HEADER: &str = "X-Api-Key";

/// Query options for list requests.
#[derive(Debug, Clone, Default)]
pub struct ListQuery {
    /// Sort field; prefix with `-` for descending (e.g. `-created_at`).
    pub order_by: Option<String>,
    /// Maximum number of documents to return.
    pub limit: Option<u32>,
    /// Equality filters, applied as `field=value` query parameters.
    pub filters: Vec<(String, String)>,
}

impl ListQuery {
    /// Newest documents first.
    #[must_use]
    pub fn newest_first() -> Self {
        Self {
            order_by: Some("-created_at".to_string()),
            ..Self::default()
        }
    }

    /// Cap the number of returned documents.
    #[must_use]
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Add an equality filter.
    #[must_use]
    pub fn with_filter(mut self, field: &str, value: impl Into<String>) -> Self {
        self.filters.push((field.to_string(), value.into()));
        self
    }

    fn into_params(self) -> Vec<(String, String)> {
        let mut params = Vec::new();
        if let Some(order_by) = self.order_by {
            params.push(("order_by".to_string(), order_by));
        }
        if let Some(limit) = self.limit {
            params.push(("limit".to_string(), limit.to_string()));
        }
        params.extend(self.filters);
        params
    }
}

/// List response envelope.
#[derive(Debug, serde::Deserialize)]
struct ListResponse<T> {
    #[serde(default = "Vec::new")]
    documents: Vec<T>,
}

/// Client for the hosted document store.
///
/// Cheaply cloneable; all clones share one connection pool.
#[derive(Clone)]
pub struct DocStoreClient {
    inner: Arc<DocStoreClientInner>,
}

struct DocStoreClientInner {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl DocStoreClient {
    /// Create a new document store client.
    #[must_use]
    pub fn new(config: &DocStoreConfig) -> Self {
        Self {
            inner: Arc::new(DocStoreClientInner {
                client: reqwest::Client::new(),
                base_url: config.base_url.trim_end_matches('/').to_string(),
                api_key: config.api_key.expose_secret().to_string(),
            }),
        }
    }

    fn url(&self, collection: &str, id: Option<&str>) -> String {
        match id {
            Some(id) => format!("{}/v1/{collection}/{id}", self.inner.base_url),
            None => format!("{}/v1/{collection}", self.inner.base_url),
        }
    }

    /// Execute a request and decode the JSON response body.
    async fn execute<T: DeserializeOwned>(
        &self,
        method: Method,
        url: String,
        query: &[(String, String)],
        body: Option<serde_json::Value>,
        collection: &str,
        id: Option<&str>,
    ) -> Result<T, DocStoreError> {
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

        // Check for rate limiting
        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(DocStoreError::RateLimited(retry_after));
        }

        if status == StatusCode::NOT_FOUND {
            return Err(DocStoreError::NotFound {
                collection: collection.to_string(),
                id: id.unwrap_or("?").to_string(),
            });
        }

        // Read body as text first for better error diagnostics
        let response_text = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %response_text.chars().take(500).collect::<String>(),
                "Document store returned non-success status"
            );
            return Err(DocStoreError::Api {
                status: status.as_u16(),
                message: extract_error_message(&response_text),
            });
        }

        match serde_json::from_str(&response_text) {
            Ok(value) => Ok(value),
            Err(e) => {
                tracing::error!(
                    error = %e,
                    body = %response_text.chars().take(500).collect::<String>(),
                    "Failed to parse document store response"
                );
                Err(DocStoreError::Parse(e))
            }
        }
    }

    // =========================================================================
    // Generic Document Operations
    // =========================================================================

    /// Fetch one document by id.
    ///
    /// # Errors
    ///
    /// Returns `DocStoreError::NotFound` if the document does not exist.
    pub async fn get_doc<T: DeserializeOwned>(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<T, DocStoreError> {
        self.execute(
            Method::GET,
            self.url(collection, Some(id)),
            &[],
            None,
            collection,
            Some(id),
        )
        .await
    }

    /// List documents in a collection.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is malformed.
    pub async fn list_docs<T: DeserializeOwned>(
        &self,
        collection: &str,
        query: ListQuery,
    ) -> Result<Vec<T>, DocStoreError> {
        let response: ListResponse<T> = self
            .execute(
                Method::GET,
                self.url(collection, None),
                &query.into_params(),
                None,
                collection,
                None,
            )
            .await?;
        Ok(response.documents)
    }

    /// Create a document; the store assigns the id and timestamps.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn create_doc<T: DeserializeOwned>(
        &self,
        collection: &str,
        body: &impl Serialize,
    ) -> Result<T, DocStoreError> {
        self.execute(
            Method::POST,
            self.url(collection, None),
            &[],
            Some(serde_json::to_value(body)?),
            collection,
            None,
        )
        .await
    }

    /// Create or replace a document with a caller-chosen id.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn put_doc<T: DeserializeOwned>(
        &self,
        collection: &str,
        id: &str,
        body: &impl Serialize,
    ) -> Result<T, DocStoreError> {
        self.execute(
            Method::PUT,
            self.url(collection, Some(id)),
            &[],
            Some(serde_json::to_value(body)?),
            collection,
            Some(id),
        )
        .await
    }

    /// Merge fields into an existing document.
    ///
    /// # Errors
    ///
    /// Returns `DocStoreError::NotFound` if the document does not exist.
    pub async fn patch_doc<T: DeserializeOwned>(
        &self,
        collection: &str,
        id: &str,
        body: &impl Serialize,
    ) -> Result<T, DocStoreError> {
        self.execute(
            Method::PATCH,
            self.url(collection, Some(id)),
            &[],
            Some(serde_json::to_value(body)?),
            collection,
            Some(id),
        )
        .await
    }

    // =========================================================================
    // Products
    // =========================================================================

    /// Fetch one product by id.
    ///
    /// # Errors
    ///
    /// Returns `DocStoreError::NotFound` if the product does not exist.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn get_product(&self, id: &ProductId) -> Result<Product, DocStoreError> {
        self.get_doc(collections::PRODUCTS, id.as_str()).await
    }

    /// List products, newest first, optionally filtered by category.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn list_products(
        &self,
        limit: u32,
        category: Option<&str>,
    ) -> Result<Vec<Product>, DocStoreError> {
        let mut query = ListQuery::newest_first().with_limit(limit);
        if let Some(category) = category {
            query = query.with_filter("category", category);
        }
        self.list_docs(collections::PRODUCTS, query).await
    }

    /// Overwrite a product's stock count.
    ///
    /// # Errors
    ///
    /// Returns `DocStoreError::NotFound` if the product does not exist.
    #[instrument(skip(self), fields(id = %id, stock))]
    pub async fn set_product_stock(
        &self,
        id: &ProductId,
        stock: u32,
    ) -> Result<Product, DocStoreError> {
        let patch = ProductPatch {
            stock: Some(stock),
            ..ProductPatch::default()
        };
        self.patch_doc(collections::PRODUCTS, id.as_str(), &patch)
            .await
    }

    // =========================================================================
    // Orders
    // =========================================================================

    /// Persist a new order; the store assigns the id and timestamps.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, order), fields(user_id = %order.user_id))]
    pub async fn create_order(&self, order: &NewOrder) -> Result<Order, DocStoreError> {
        self.create_doc(collections::ORDERS, order).await
    }

    /// Fetch one order by id.
    ///
    /// # Errors
    ///
    /// Returns `DocStoreError::NotFound` if the order does not exist.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn get_order(&self, id: &OrderId) -> Result<Order, DocStoreError> {
        self.get_doc(collections::ORDERS, id.as_str()).await
    }

    /// List a user's orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn list_orders_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<Order>, DocStoreError> {
        let query = ListQuery::newest_first().with_filter("user_id", user_id.as_str());
        self.list_docs(collections::ORDERS, query).await
    }

    // =========================================================================
    // Users & Contacts
    // =========================================================================

    /// Create or replace the profile document for an auth identity.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, profile), fields(id = %profile.id))]
    pub async fn put_user_profile(&self, profile: &UserProfile) -> Result<UserProfile, DocStoreError> {
        self.put_doc(collections::USERS, profile.id.as_str(), profile)
            .await
    }

    /// Submit a contact message.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, message), fields(email = %message.email))]
    pub async fn create_contact(
        &self,
        message: &NewContactMessage,
    ) -> Result<ContactMessage, DocStoreError> {
        self.create_doc(collections::CONTACTS, message).await
    }
}

/// Pull a human-readable message out of an error body.
///
/// Accepts `{"error": {"message": "..."}}`, `{"error": "..."}`, or falls
/// back to the (truncated) raw body.
fn extract_error_message(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(message) = value
            .get("error")
            .and_then(|e| e.get("message"))
            .and_then(|m| m.as_str())
        {
            return message.to_string();
        }
        if let Some(message) = value.get("error").and_then(|e| e.as_str()) {
            return message.to_string();
        }
    }
    body.chars().take(200).collect()
}
