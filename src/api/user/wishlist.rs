use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

use crate::entities::{
    product, product::Entity as ProductEntity, wishlist, wishlist::Entity as WishlistEntity,
};
use crate::middleware::auth::Claims;

pub fn wishlist_router(db: Arc<DatabaseConnection>) -> Router {
    Router::new()
        .route("/wishlist", get(get_wishlist).post(add_to_wishlist))
        .route("/wishlist/:product_id", axum::routing::delete(remove_from_wishlist))
        .route("/wishlist/check/:product_id", get(check_wishlist))
        .layer(Extension(db))
}

async fn get_wishlist(
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Extension(claims): Extension<Claims>,
) -> impl IntoResponse {
    match WishlistEntity::find()
        .filter(wishlist::Column::UserId.eq(claims.user_id))
        .find_also_related(ProductEntity)
        .all(&*db)
        .await
    {
        Ok(rows) => {
            let response: Vec<WishlistEntryResponse> = rows
                .into_iter()
                .map(|(entry, prod)| WishlistEntryResponse::new(entry, prod))
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

async fn add_to_wishlist(
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<AddToWishlist>,
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

    match WishlistEntity::find()
        .filter(wishlist::Column::UserId.eq(user_id))
        .filter(wishlist::Column::ProductId.eq(payload.product_id))
        .one(&txn)
        .await
    {
        Ok(Some(_)) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "error": "Item already in wishlist"
                })),
            )
                .into_response();
        }
        Ok(None) => {}
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

    let new_entry = wishlist::ActiveModel {
        user_id: Set(user_id),
        product_id: Set(payload.product_id),
        ..Default::default()
    };

    match WishlistEntity::insert(new_entry).exec(&txn).await {
        Ok(_) => match txn.commit().await {
            Ok(_) => (
                StatusCode::CREATED,
                Json(json!({
                    "message": "Added successfully"
                })),
            )
                .into_response(),
            Err(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "Internal server error"
                })),
            )
                .into_response(),
        },
        // The pair carries a unique index, so a lost race lands here.
        Err(_) => {
            let _ = txn.rollback().await;
            (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "error": "Item already in wishlist"
                })),
            )
                .into_response()
        }
    }
}

/// Removal is keyed by product id, mirroring how clients track membership.
async fn remove_from_wishlist(
    Path(product_id): Path<i32>,
    Extension(claims): Extension<Claims>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> impl IntoResponse {
    match WishlistEntity::find()
        .filter(wishlist::Column::UserId.eq(claims.user_id))
        .filter(wishlist::Column::ProductId.eq(product_id))
        .one(&*db)
        .await
    {
        Ok(Some(entry)) => match entry.delete(&*db).await {
            Ok(_) => (
                StatusCode::OK,
                Json(json!({
                    "message": "Resource deleted successfully"
                })),
            )
                .into_response(),
            Err(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "Internal server error"
                })),
            )
                .into_response(),
        },
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": format!("No wishlist entry for product {} was found.", product_id)
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

async fn check_wishlist(
    Path(product_id): Path<i32>,
    Extension(claims): Extension<Claims>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> impl IntoResponse {
    match WishlistEntity::find()
        .filter(wishlist::Column::UserId.eq(claims.user_id))
        .filter(wishlist::Column::ProductId.eq(product_id))
        .one(&*db)
        .await
    {
        Ok(entry) => (StatusCode::OK, Json(entry.is_some())).into_response(),
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
struct AddToWishlist {
    product_id: i32,
}

#[derive(Serialize)]
struct WishlistEntryResponse {
    id: i32,
    product_id: i32,
    product: Option<product::Model>,
}

impl WishlistEntryResponse {
    fn new(entry: wishlist::Model, prod: Option<product::Model>) -> WishlistEntryResponse {
        WishlistEntryResponse {
            id: entry.id,
            product_id: entry.product_id,
            product: prod,
        }
    }
}
