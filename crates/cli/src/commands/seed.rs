//! Catalog seeding.
//!
//! Pushes a small starter sock catalog into the `products` collection
//! through the privileged admin client. Safe to re-run: the store
//! assigns fresh ids, so re-seeding duplicates rather than overwrites -
//! meant for empty development stores.

use rust_decimal::Decimal;

use sockshop_admin::config::AdminConfig;
use sockshop_admin::docstore::AdminStoreClient;
use sockshop_core::NewProduct;

/// Errors from the seed command.
#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("config error: {0}")]
    Config(#[from] sockshop_admin::config::ConfigError),
    #[error("store error: {0}")]
    Store(#[from] sockshop_admin::docstore::StoreError),
}

/// Seed the document store with the starter catalog.
///
/// # Errors
///
/// Returns an error if configuration is incomplete or a create fails.
pub async fn run() -> Result<(), SeedError> {
    let config = AdminConfig::from_env()?;
    let client = AdminStoreClient::new(&config);

    let fixtures = starter_catalog();
    let total = fixtures.len();

    for product in fixtures {
        let created = client.create_product(&product).await?;
        tracing::info!(id = %created.id, name = %created.name, "seeded product");
    }

    tracing::info!(total, "catalog seeded");
    Ok(())
}

/// The starter catalog: enough variety to exercise categories, multiple
/// images, and a sold-out (hidden) product.
fn starter_catalog() -> Vec<NewProduct> {
    vec![
        NewProduct {
            name: "Wool Crew Sock".to_string(),
            price: Decimal::new(1250, 2),
            stock: 40,
            category: Some("wool".to_string()),
            image: "https://img.sockshop.example/wool-crew.jpg".to_string(),
            images: vec![
                "https://img.sockshop.example/wool-crew-side.jpg".to_string(),
                "https://img.sockshop.example/wool-crew-heel.jpg".to_string(),
            ],
            description: Some("Mid-weight merino crew for everyday wear.".to_string()),
        },
        NewProduct {
            name: "Cotton Ankle Sock".to_string(),
            price: Decimal::new(750, 2),
            stock: 120,
            category: Some("cotton".to_string()),
            image: "https://img.sockshop.example/cotton-ankle.jpg".to_string(),
            images: Vec::new(),
            description: Some("Light ankle sock, three-pack staple.".to_string()),
        },
        NewProduct {
            name: "Hiking Boot Sock".to_string(),
            price: Decimal::new(1890, 2),
            stock: 25,
            category: Some("outdoor".to_string()),
            image: "https://img.sockshop.example/hiking-boot.jpg".to_string(),
            images: vec!["https://img.sockshop.example/hiking-boot-cuff.jpg".to_string()],
            description: Some("Cushioned boot sock with reinforced heel.".to_string()),
        },
        NewProduct {
            name: "Striped Dress Sock".to_string(),
            price: Decimal::new(990, 2),
            stock: 0, // sold out: hidden from the catalog, visible in admin
            category: Some("dress".to_string()),
            image: "https://img.sockshop.example/striped-dress.jpg".to_string(),
            images: Vec::new(),
            description: None,
        },
    ]
}
