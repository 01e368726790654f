use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;

use crate::catalog::{filter_products, ProductFilter};
use crate::entities::category::{self, Entity as CategoryEntity};
use crate::entities::product::{self, Entity as ProductEntity};

pub fn product_router(db: Arc<DatabaseConnection>) -> Router {
    Router::new()
        .route("/product", get(get_products))
        .route("/product/:id", get(get_product))
        .layer(Extension(db))
}

async fn get_products(
    Query(filter): Query<ProductFilter>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> impl IntoResponse {
    let result = ProductEntity::find()
        .filter(product::Column::IsActive.eq(true))
        .order_by_desc(product::Column::CreatedAt)
        .find_also_related(CategoryEntity)
        .all(&*db)
        .await;

    match result {
        Ok(rows) => {
            let response: Vec<PublicProductResponse> = filter_products(rows, &filter)
                .into_iter()
                .map(|(prod, cat)| PublicProductResponse::new(prod, cat))
                .collect();
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "error": "Internal server error."
            })),
        )
            .into_response(),
    }
}

async fn get_product(
    Path(id): Path<i32>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> impl IntoResponse {
    let result = ProductEntity::find_by_id(id)
        .filter(product::Column::IsActive.eq(true))
        .find_also_related(CategoryEntity)
        .one(&*db)
        .await;

    match result {
        Ok(Some((prod, cat))) => {
            (StatusCode::OK, Json(PublicProductResponse::new(prod, cat))).into_response()
        }
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": format!("No product with {} id was found.", id)
            })),
        )
            .into_response(),
        Err(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "error": "Internal server error."
            })),
        )
            .into_response(),
    }
}

#[derive(Serialize)]
struct PublicProductResponse {
    id: i32,
    name: String,
    description: String,
    price: f32,
    sku: String,
    stock_quantity: i32,
    image_url: Option<String>,
    category_id: Option<i32>,
    category_name: Option<String>,
}

impl PublicProductResponse {
    fn new(value: product::Model, cat: Option<category::Model>) -> PublicProductResponse {
        PublicProductResponse {
            id: value.id,
            name: value.name,
            description: value.description,
            price: value.price,
            sku: value.sku,
            stock_quantity: value.stock_quantity,
            image_url: value.image_url,
            category_id: value.category_id,
            category_name: cat.map(|c| c.name),
        }
    }
}
