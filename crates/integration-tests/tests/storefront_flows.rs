//! Integration tests for the public storefront flows.
//!
//! These tests require:
//! - A running `PostgreSQL` database with the session table migrated
//! - The storefront server running (cargo run -p sockshop-storefront)
//! - Document store and auth service endpoints in the environment
//!
//! Run with: cargo test -p sockshop-integration-tests -- --ignored

use reqwest::StatusCode;
use serde_json::{Value, json};

use sockshop_integration_tests::{session_client, storefront_base_url, unique_email};

#[tokio::test]
#[ignore = "Requires running storefront server and hosted services"]
async fn test_health() {
    let client = session_client();
    let resp = client
        .get(format!("{}/health", storefront_base_url()))
        .send()
        .await
        .expect("Failed to reach storefront");

    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires running storefront server and hosted services"]
async fn test_catalog_hides_unsellable_products() {
    let client = session_client();
    let resp = client
        .get(format!("{}/products", storefront_base_url()))
        .send()
        .await
        .expect("Failed to fetch catalog");

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse catalog");
    let products = body["products"].as_array().expect("products array");

    for product in products {
        assert!(product["stock"].as_u64().unwrap_or(0) > 0, "sold-out product in catalog");
    }
}

#[tokio::test]
#[ignore = "Requires running storefront server and hosted services"]
async fn test_cart_round_trip_in_one_session() {
    let client = session_client();
    let base_url = storefront_base_url();

    // Pick a product off the catalog
    let catalog: Value = client
        .get(format!("{base_url}/products"))
        .send()
        .await
        .expect("Failed to fetch catalog")
        .json()
        .await
        .expect("Failed to parse catalog");
    let Some(product) = catalog["products"].as_array().and_then(|list| list.first()) else {
        // Empty store: nothing to exercise
        return;
    };
    let product_id = product["id"].as_str().expect("product id");

    // Add it twice: one entry, quantity 2
    for _ in 0..2 {
        let resp = client
            .post(format!("{base_url}/cart/add"))
            .json(&json!({"product_id": product_id}))
            .send()
            .await
            .expect("Failed to add to cart");
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let cart: Value = client
        .get(format!("{base_url}/cart"))
        .send()
        .await
        .expect("Failed to fetch cart")
        .json()
        .await
        .expect("Failed to parse cart");
    assert_eq!(cart["items"].as_array().map(Vec::len), Some(1));
    assert_eq!(cart["total_quantity"], 2);

    // Quantity 0 removes the entry
    let cart: Value = client
        .post(format!("{base_url}/cart/update"))
        .json(&json!({"product_id": product_id, "quantity": 0}))
        .send()
        .await
        .expect("Failed to update cart")
        .json()
        .await
        .expect("Failed to parse cart");
    assert_eq!(cart["items"].as_array().map(Vec::len), Some(0));
}

#[tokio::test]
#[ignore = "Requires running storefront server and hosted services"]
async fn test_checkout_requires_authentication() {
    let client = session_client();
    let resp = client
        .post(format!("{}/checkout", storefront_base_url()))
        .json(&json!({
            "name": "Jamie",
            "email": "jamie@sockshop.example",
            "phone": "09123456789",
            "address": "1 Yarn St",
            "city": "Loomtown",
        }))
        .send()
        .await
        .expect("Failed to reach checkout");

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires running storefront server and hosted services"]
async fn test_register_then_checkout_empty_cart_fails_validation() {
    let client = session_client();
    let base_url = storefront_base_url();

    let resp = client
        .post(format!("{base_url}/auth/register"))
        .json(&json!({
            "email": unique_email("buyer"),
            "password": "a-long-enough-password",
        }))
        .send()
        .await
        .expect("Failed to register");
    assert_eq!(resp.status(), StatusCode::CREATED);

    // Signed in, but the cart is empty: checkout must block locally
    let resp = client
        .post(format!("{base_url}/checkout"))
        .json(&json!({
            "name": "Jamie",
            "email": "jamie@sockshop.example",
            "phone": "09123456789",
            "address": "1 Yarn St",
            "city": "Loomtown",
        }))
        .send()
        .await
        .expect("Failed to reach checkout");
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body: Value = resp.json().await.expect("Failed to parse error");
    assert!(body["fields"]["cart"].is_string());
}

#[tokio::test]
#[ignore = "Requires running storefront server and hosted services"]
async fn test_contact_validation() {
    let client = session_client();
    let resp = client
        .post(format!("{}/contact", storefront_base_url()))
        .json(&json!({
            "name": "Jamie",
            "email": "not-an-email",
            "phone": "123",
            "comment": "Hello",
        }))
        .send()
        .await
        .expect("Failed to reach contact");

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}
