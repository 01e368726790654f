use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait, QueryOrder, Set, TransactionTrait,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use crate::entities::product::{self, Entity as ProductEntity};

pub fn admin_product_router(db: Arc<DatabaseConnection>) -> Router {
    Router::new()
        .route("/product", get(get_products).post(create_product))
        .route(
            "/product/:id",
            axum::routing::put(update_product).delete(delete_product),
        )
        .layer(Extension(db))
}

/// Unlike the public listing, inactive rows are visible here.
async fn get_products(Extension(db): Extension<Arc<DatabaseConnection>>) -> impl IntoResponse {
    match ProductEntity::find()
        .order_by_desc(product::Column::CreatedAt)
        .all(&*db)
        .await
    {
        Ok(products) => (StatusCode::OK, Json(products)).into_response(),
        Err(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "error": "Internal server error."
            })),
        )
            .into_response(),
    }
}

async fn create_product(
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Json(payload): Json<CreateProduct>,
) -> impl IntoResponse {
    let txn = match db.begin().await {
        Ok(txn) => txn,
        Err(_) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "Internal server error"
                })),
            )
                .into_response();
        }
    };

    let new_product = product::ActiveModel {
        name: Set(payload.name),
        description: Set(payload.description),
        price: Set(payload.price),
        sku: Set(payload.sku),
        stock_quantity: Set(payload.stock_quantity),
        image_url: Set(payload.image_url),
        category_id: Set(payload.category_id),
        is_active: Set(payload.is_active.unwrap_or(true)),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };

    match ProductEntity::insert(new_product).exec(&txn).await {
        Ok(result) => {
            let id = result.last_insert_id;
            match txn.commit().await {
                Ok(_) => match ProductEntity::find_by_id(id).one(&*db).await {
                    Ok(Some(created)) => (StatusCode::CREATED, Json(created)).into_response(),
                    _ => (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        Json(json!({
                            "error": "Internal server error"
                        })),
                    )
                        .into_response(),
                },
                Err(_) => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "error": "Internal server error"
                    })),
                )
                    .into_response(),
            }
        }
        Err(_) => {
            let _ = txn.rollback().await;
            (
                StatusCode::CONFLICT,
                Json(json!({
                    "error": "Sku already exists"
                })),
            )
                .into_response()
        }
    }
}

async fn update_product(
    Path(id): Path<i32>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Json(payload): Json<UpdateProduct>,
) -> impl IntoResponse {
    let txn = match db.begin().await {
        Ok(txn) => txn,
        Err(_) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "Internal server error"
                })),
            )
                .into_response();
        }
    };

    match ProductEntity::find_by_id(id).one(&txn).await {
        Ok(Some(model)) => {
            let mut model: product::ActiveModel = model.into();

            if let Some(name) = payload.name {
                if !name.is_empty() {
                    model.name = Set(name);
                }
            }
            if let Some(description) = payload.description {
                model.description = Set(description);
            }
            if let Some(price) = payload.price {
                model.price = Set(price);
            }
            if let Some(sku) = payload.sku {
                if !sku.is_empty() {
                    model.sku = Set(sku);
                }
            }
            if let Some(stock_quantity) = payload.stock_quantity {
                model.stock_quantity = Set(stock_quantity);
            }
            if let Some(image_url) = payload.image_url {
                model.image_url = Set(Some(image_url));
            }
            if let Some(category_id) = payload.category_id {
                model.category_id = Set(Some(category_id));
            }
            if let Some(is_active) = payload.is_active {
                model.is_active = Set(is_active);
            }

            let result: Result<product::Model, DbErr> = model.update(&txn).await;

            match result {
                Ok(updated) => match txn.commit().await {
                    Ok(_) => (StatusCode::OK, Json(updated)).into_response(),
                    Err(_) => (
                        StatusCode::CONFLICT,
                        Json(json!({
                            "error": "Sku unique constraint failed"
                        })),
                    )
                        .into_response(),
                },
                Err(_) => {
                    let _ = txn.rollback().await;
                    (
                        StatusCode::BAD_REQUEST,
                        Json(json!({
                            "error": "Failed to patch this resource"
                        })),
                    )
                        .into_response()
                }
            }
        }
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": format!("No related entry with {} id was found.", id)
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

async fn delete_product(
    Path(id): Path<i32>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> impl IntoResponse {
    let txn = match db.begin().await {
        Ok(txn) => txn,
        Err(_) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "Internal server error"
                })),
            )
                .into_response();
        }
    };

    match ProductEntity::find_by_id(id).one(&txn).await {
        Ok(Some(entry)) => {
            let entry: product::ActiveModel = entry.into();
            match entry.delete(&txn).await {
                Ok(_) => {
                    let _ = txn.commit().await;
                    (
                        StatusCode::OK,
                        Json(json!({
                            "message": "Resource deleted successfully"
                        })),
                    )
                        .into_response()
                }
                Err(_) => {
                    let _ = txn.rollback().await;
                    (
                        StatusCode::BAD_REQUEST,
                        Json(json!({
                            "error": "Failed to delete this resource"
                        })),
                    )
                        .into_response()
                }
            }
        }
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": format!("No related entry with {} id was found.", id)
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

#[derive(Deserialize, Debug)]
struct CreateProduct {
    name: String,
    description: String,
    price: f32,
    sku: String,
    stock_quantity: i32,
    image_url: Option<String>,
    category_id: Option<i32>,
    is_active: Option<bool>,
}

#[derive(Deserialize, Debug)]
struct UpdateProduct {
    name: Option<String>,
    description: Option<String>,
    price: Option<f32>,
    sku: Option<String>,
    stock_quantity: Option<i32>,
    image_url: Option<String>,
    category_id: Option<i32>,
    is_active: Option<bool>,
}
