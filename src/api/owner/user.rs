use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::patch,
    Json, Router,
};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set, TransactionTrait};
use serde_json::json;
use std::sync::Arc;

use crate::api::user::profile::ProfileResponse;
use crate::entities::{
    audit,
    user::{self, Entity as UserEntity, Role},
};
use crate::middleware::auth::Claims;

pub fn owner_user_router(db: Arc<DatabaseConnection>) -> Router {
    Router::new()
        .route("/user/:id/promote", patch(promote_user))
        .layer(Extension(db))
}

async fn promote_user(
    Path(id): Path<i32>,
    Extension(claims): Extension<Claims>,
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

    match UserEntity::find_by_id(id).one(&txn).await {
        Ok(Some(model)) => {
            if model.role == Role::Owner {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(json!({
                        "error": "Owner role cannot be changed"
                    })),
                )
                    .into_response();
            }

            let mut model: user::ActiveModel = model.into();
            model.role = Set(Role::Management);

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
                action: Set("promote_user".to_string()),
                details: Set(Some(format!("User {} promoted to management", id))),
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

            match txn.commit().await {
                Ok(_) => (StatusCode::OK, Json(ProfileResponse::new(updated))).into_response(),
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
