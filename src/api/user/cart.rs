use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch},
    Json, Router,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

use crate::entities::{cart, cart::Entity as CartEntity, product, product::Entity as ProductEntity};
use crate::middleware::auth::Claims;
use crate::pricing;

pub fn cart_router(db: Arc<DatabaseConnection>) -> Router {
    Router::new()
        .route("/cart", get(get_cart).post(add_product).delete(clear_cart))
        .route("/cart/:id", patch(patch_entry).delete(remove_product))
        .layer(Extension(db))
}

/// Every response carries the full re-read item list plus a recomputed
/// total, so clients replace their state instead of merging.
async fn cart_snapshot<C: ConnectionTrait>(conn: &C, user_id: i32) -> Result<CartResponse, DbErr> {
    let rows = CartEntity::find()
        .filter(cart::Column::UserId.eq(user_id))
        .find_also_related(ProductEntity)
        .all(conn)
        .await?;

    let total = pricing::cart_total(
        rows.iter()
            .map(|(entry, prod)| (prod.as_ref().map(|p| p.price), entry.quantity)),
    );

    let items = rows
        .into_iter()
        .map(|(entry, prod)| CartEntryResponse::new(entry, prod))
        .collect();

    Ok(CartResponse { items, total })
}

async fn get_cart(
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Extension(claims): Extension<Claims>,
) -> impl IntoResponse {
    match cart_snapshot(&*db, claims.user_id).await {
        Ok(snapshot) => (StatusCode::OK, Json(snapshot)).into_response(),
        Err(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "error": "Internal server error."
            })),
        )
            .into_response(),
    }
}

async fn add_product(
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<AddProduct>,
) -> impl IntoResponse {
    let user_id = claims.user_id;

    if payload.quantity == 0 {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "Quantity should be greater than 0"
            })),
        )
            .into_response();
    }

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

    match ProductEntity::find_by_id(payload.product_id)
        .filter(product::Column::IsActive.eq(true))
        .one(&txn)
        .await
    {
        Ok(Some(_)) => {}
        Ok(None) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "error": format!("No product with {} id was found", payload.product_id)
                })),
            )
                .into_response();
        }
        Err(_) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "Internal server error."
                })),
            )
                .into_response();
        }
    }

    // Adding a product already in the cart bumps its quantity instead of
    // creating a second row.
    let existing = CartEntity::find()
        .filter(cart::Column::ProductId.eq(payload.product_id))
        .filter(cart::Column::UserId.eq(user_id))
        .one(&txn)
        .await;

    let write = match existing {
        Ok(Some(entry)) => {
            let current = entry.quantity;
            let mut entry: cart::ActiveModel = entry.into();
            entry.quantity = Set(current.saturating_add(payload.quantity));
            entry.update(&txn).await.map(|_| ())
        }
        Ok(None) => {
            let new_entry = cart::ActiveModel {
                user_id: Set(user_id),
                product_id: Set(payload.product_id),
                quantity: Set(payload.quantity),
                ..Default::default()
            };
            CartEntity::insert(new_entry).exec(&txn).await.map(|_| ())
        }
        Err(_) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "Internal server error."
                })),
            )
                .into_response();
        }
    };

    match write {
        Ok(_) => respond_with_snapshot(txn, user_id, StatusCode::CREATED).await,
        Err(_) => {
            let _ = txn.rollback().await;
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "Internal server error"
                })),
            )
                .into_response()
        }
    }
}

async fn patch_entry(
    Path(id): Path<i32>,
    Extension(claims): Extension<Claims>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Json(payload): Json<PatchCart>,
) -> impl IntoResponse {
    let user_id = claims.user_id;
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

    match CartEntity::find_by_id(id)
        .filter(cart::Column::UserId.eq(user_id))
        .one(&txn)
        .await
    {
        Ok(Some(entry)) => {
            let entry: cart::ActiveModel = entry.into();

            // Zero quantity degrades to removal.
            let result: Result<(), DbErr> = match payload.quantity {
                0 => entry.delete(&txn).await.map(|_| ()),
                quantity => {
                    let mut entry = entry;
                    entry.quantity = Set(quantity);
                    entry.update(&txn).await.map(|_| ())
                }
            };

            match result {
                Ok(_) => respond_with_snapshot(txn, user_id, StatusCode::OK).await,
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

async fn remove_product(
    Path(id): Path<i32>,
    Extension(claims): Extension<Claims>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> impl IntoResponse {
    let user_id = claims.user_id;
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

    match CartEntity::find_by_id(id)
        .filter(cart::Column::UserId.eq(user_id))
        .one(&txn)
        .await
    {
        Ok(Some(entry)) => {
            let entry: cart::ActiveModel = entry.into();
            match entry.delete(&txn).await {
                Ok(_) => respond_with_snapshot(txn, user_id, StatusCode::OK).await,
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

async fn clear_cart(
    Extension(claims): Extension<Claims>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> impl IntoResponse {
    let user_id = claims.user_id;
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

    match CartEntity::delete_many()
        .filter(cart::Column::UserId.eq(user_id))
        .exec(&txn)
        .await
    {
        Ok(_) => respond_with_snapshot(txn, user_id, StatusCode::OK).await,
        Err(_) => {
            let _ = txn.rollback().await;
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "Internal server error"
                })),
            )
                .into_response()
        }
    }
}

async fn respond_with_snapshot(
    txn: sea_orm::DatabaseTransaction,
    user_id: i32,
    status: StatusCode,
) -> axum::response::Response {
    let snapshot = match cart_snapshot(&txn, user_id).await {
        Ok(snapshot) => snapshot,
        Err(_) => {
            let _ = txn.rollback().await;
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "Internal server error"
                })),
            )
                .into_response();
        }
    };

    match txn.commit().await {
        Ok(_) => (status, Json(snapshot)).into_response(),
        Err(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "error": "Internal server error"
            })),
        )
            .into_response(),
    }
}

#[derive(Serialize)]
struct CartResponse {
    items: Vec<CartEntryResponse>,
    total: f32,
}

#[derive(Serialize)]
struct CartEntryResponse {
    id: i32,
    product_id: i32,
    quantity: u32,
    product: Option<CartProduct>,
}

/// Denormalized product snapshot carried on each line for display.
#[derive(Serialize)]
struct CartProduct {
    id: i32,
    name: String,
    price: f32,
    image_url: Option<String>,
    stock_quantity: i32,
}

impl CartEntryResponse {
    fn new(entry: cart::Model, prod: Option<product::Model>) -> CartEntryResponse {
        CartEntryResponse {
            id: entry.id,
            product_id: entry.product_id,
            quantity: entry.quantity,
            product: prod.map(|p| CartProduct {
                id: p.id,
                name: p.name,
                price: p.price,
                image_url: p.image_url,
                stock_quantity: p.stock_quantity,
            }),
        }
    }
}

#[derive(Deserialize, Debug)]
struct AddProduct {
    product_id: i32,
    quantity: u32,
}

#[derive(Deserialize)]
struct PatchCart {
    quantity: u32,
}
