use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch},
    Json, Router,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use crate::api::user::order::OrderResponse;
use crate::entities::{
    audit, order, order::Entity as OrderEntity, order_item,
    order_item::Entity as OrderItemEntity,
};
use crate::middleware::auth::Claims;

pub fn admin_order_router(db: Arc<DatabaseConnection>) -> Router {
    Router::new()
        .route("/order", get(get_all_orders))
        .route("/order/:id/status", patch(patch_status))
        .layer(Extension(db))
}

async fn get_all_orders(Extension(db): Extension<Arc<DatabaseConnection>>) -> impl IntoResponse {
    match OrderEntity::find()
        .order_by_desc(order::Column::CreatedAt)
        .find_with_related(OrderItemEntity)
        .all(&*db)
        .await
    {
        Ok(rows) => {
            let response: Vec<OrderResponse> = rows
                .into_iter()
                .map(|(placed_order, items)| OrderResponse::new(placed_order, items))
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

/// Status transitions leave an audit trail naming the actor.
async fn patch_status(
    Path(id): Path<i32>,
    Extension(claims): Extension<Claims>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Json(payload): Json<PatchStatus>,
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

    match OrderEntity::find_by_id(id).one(&txn).await {
        Ok(Some(model)) => {
            let old_status = model.status;
            let mut model: order::ActiveModel = model.into();
            model.status = Set(payload.status);

            let updated = match model.update(&txn).await {
                Ok(updated) => updated,
                Err(_) => {
                    let _ = txn.rollback().await;
                    return (
                        StatusCode::BAD_REQUEST,
                        Json(json!({
                            "error": "Failed to patch this resource"
                        })),
                    )
                        .into_response();
                }
            };

            let audit_entry = audit::ActiveModel {
                actor_id: Set(Some(claims.user_id)),
                action: Set("update_order_status".to_string()),
                details: Set(Some(format!(
                    "Order {} status changed from {} to {}",
                    id, old_status, updated.status
                ))),
                timestamp: Set(chrono::Utc::now()),
                ..Default::default()
            };

            if audit::Entity::insert(audit_entry).exec(&txn).await.is_err() {
                let _ = txn.rollback().await;
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "error": "Internal server error"
                    })),
                )
                    .into_response();
            }

            let items = match OrderItemEntity::find()
                .filter(order_item::Column::OrderId.eq(id))
                .all(&txn)
                .await
            {
                Ok(items) => items,
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
                Ok(_) => (StatusCode::OK, Json(OrderResponse::new(updated, items))).into_response(),
                Err(_) => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "error": "Internal server error"
                    })),
                )
                    .into_response(),
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
struct PatchStatus {
    status: order::Status,
}
