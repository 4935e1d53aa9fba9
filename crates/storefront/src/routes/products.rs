//! Catalog route handlers.
//!
//! Read-only projections of the `products` collection. The list hides
//! products that can't currently be sold (zero price or stock); they
//! stay in the store untouched.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use sockshop_core::{Product, ProductId};

use crate::error::Result;
use crate::state::AppState;

/// Minimum number of images the detail gallery presents, so a
/// multi-thumbnail UI always has something to render.
const MIN_GALLERY_LEN: usize = 3;

/// Catalog list query parameters.
#[derive(Debug, Deserialize)]
pub struct CatalogQuery {
    pub category: Option<String>,
}

/// Catalog list response.
#[derive(Debug, Serialize)]
pub struct CatalogResponse {
    pub products: Vec<Product>,
}

/// Product detail response.
#[derive(Debug, Serialize)]
pub struct ProductDetailResponse {
    pub product: Product,
    /// Display image sequence: primary plus extras, empties dropped,
    /// padded with repeats of the primary.
    pub gallery: Vec<String>,
}

/// List sellable products, newest first.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<CatalogQuery>,
) -> Result<Json<CatalogResponse>> {
    let products = state
        .docstore()
        .list_products(
            state.config().catalog_page_size,
            query.category.as_deref(),
        )
        .await?;

    // Hidden, not deleted: unsellable products stay in the collection
    let products = products
        .into_iter()
        .filter(Product::is_sellable)
        .collect();

    Ok(Json(CatalogResponse { products }))
}

/// Show one product with its display gallery.
#[instrument(skip(state), fields(id = %id))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<ProductDetailResponse>> {
    let product = state.docstore().get_product(&id).await?;
    let gallery = build_gallery(&product);

    Ok(Json(ProductDetailResponse { product, gallery }))
}

/// Synthesize the display image sequence for a product.
///
/// Primary image first, then the additional images with empty entries
/// dropped. When there are no usable additional images the primary is
/// repeated so the sequence reaches [`MIN_GALLERY_LEN`]. A product with
/// no images at all yields an empty sequence.
fn build_gallery(product: &Product) -> Vec<String> {
    let mut gallery = Vec::new();

    if !product.image.is_empty() {
        gallery.push(product.image.clone());
    }

    for image in &product.images {
        if !image.is_empty() && !gallery.contains(image) {
            gallery.push(image.clone());
        }
    }

    if gallery.len() == 1 {
        while gallery.len() < MIN_GALLERY_LEN {
            gallery.push(product.image.clone());
        }
    }

    gallery
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn product(image: &str, images: &[&str]) -> Product {
        serde_json::from_value(serde_json::json!({
            "id": "p1",
            "name": "Wool Crew",
            "price": 12,
            "stock": 5,
            "image": image,
            "images": images,
        }))
        .unwrap()
    }

    #[test]
    fn test_gallery_primary_plus_extras() {
        let gallery = build_gallery(&product("a.jpg", &["b.jpg", "c.jpg"]));
        assert_eq!(gallery, vec!["a.jpg", "b.jpg", "c.jpg"]);
    }

    #[test]
    fn test_gallery_drops_empty_and_duplicate_entries() {
        let gallery = build_gallery(&product("a.jpg", &["", "b.jpg", "a.jpg"]));
        assert_eq!(gallery, vec!["a.jpg", "b.jpg"]);
    }

    #[test]
    fn test_gallery_pads_with_primary_when_no_extras() {
        let gallery = build_gallery(&product("a.jpg", &[]));
        assert_eq!(gallery, vec!["a.jpg", "a.jpg", "a.jpg"]);
    }

    #[test]
    fn test_gallery_pads_when_extras_all_empty() {
        let gallery = build_gallery(&product("a.jpg", &["", ""]));
        assert_eq!(gallery, vec!["a.jpg", "a.jpg", "a.jpg"]);
    }

    #[test]
    fn test_gallery_empty_product_yields_empty_sequence() {
        let gallery = build_gallery(&product("", &[]));
        assert!(gallery.is_empty());
    }
}
