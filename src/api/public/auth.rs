use axum::{
    extract::Extension,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set, TransactionTrait};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use validator::Validate;

use crate::entities::user::{self, hash_password, Entity as UserEntity, Role};
use crate::middleware::auth::{decode_claims, generate_token_pair, TokenKind};

pub fn auth_router(db: Arc<DatabaseConnection>) -> Router {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
        .layer(Extension(db))
}

async fn register(
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Json(payload): Json<RegisterPayload>,
) -> impl IntoResponse {
    if let Err(errors) = payload.validate() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": errors.to_string()
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

    match UserEntity::find()
        .filter(user::Column::Email.eq(&*payload.email))
        .one(&txn)
        .await
    {
        Ok(Some(_)) => {
            return (
                StatusCode::CONFLICT,
                Json(json!({
                    "error": "Email already registered"
                })),
            )
                .into_response();
        }
        Ok(None) => {}
        Err(_) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "Internal server error"
                })),
            )
                .into_response();
        }
    }

    let password = match hash_password(&payload.password) {
        Ok(password) => password,
        Err(_) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "An internal server error occured"
                })),
            )
                .into_response();
        }
    };

    // Registering with the configured owner address claims the owner role.
    let role = match std::env::var("OWNER_EMAIL") {
        Ok(owner_email) if owner_email == payload.email => Role::Owner,
        _ => Role::Customer,
    };

    let new_user = user::ActiveModel {
        email: Set(payload.email),
        password: Set(password),
        full_name: Set(payload.full_name),
        role: Set(role),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };

    match UserEntity::insert(new_user).exec(&txn).await {
        Ok(_) => match txn.commit().await {
            Ok(_) => (
                StatusCode::CREATED,
                Json(json!({
                    "message": "User registered successfully"
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
        Err(err) => {
            tracing::error!(error = %err, "Failed to insert user");
            let _ = txn.rollback().await;
            (
                StatusCode::CONFLICT,
                Json(json!({
                    "error": "Email already registered"
                })),
            )
                .into_response()
        }
    }
}

async fn login(
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Json(payload): Json<LoginPayload>,
) -> impl IntoResponse {
    let result = UserEntity::find()
        .filter(user::Column::Email.eq(&*payload.email))
        .one(&*db)
        .await;

    match result {
        Ok(Some(model)) => match model.check_hash(&payload.password) {
            Ok(()) => match generate_token_pair(model.id, model.role) {
                Ok((access_token, refresh_token)) => (
                    StatusCode::OK,
                    Json(json!({
                        "access_token": access_token,
                        "refresh_token": refresh_token
                    })),
                ),
                Err(_) => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "error": "Internal server error"
                    })),
                ),
            },
            Err(_) => (
                StatusCode::UNAUTHORIZED,
                Json(json!({
                    "error": "Invalid email or password"
                })),
            ),
        },
        Ok(None) => (
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "error": "Invalid email or password"
            })),
        ),
        Err(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "error": "An internal server error occured"
            })),
        ),
    }
}

/// Trades a refresh token for a fresh pair. The role is re-read from the
/// user row, so a promotion or demotion takes effect on the next refresh.
async fn refresh(
    Extension(db): Extension<Arc<DatabaseConnection>>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let token = match headers
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
    {
        Some(token) => token,
        None => {
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({
                    "error": "Missing refresh token"
                })),
            );
        }
    };

    let claims = match decode_claims(token, TokenKind::Refresh) {
        Ok(claims) => claims,
        Err(_) => {
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({
                    "error": "Invalid refresh token"
                })),
            );
        }
    };

    match UserEntity::find_by_id(claims.user_id).one(&*db).await {
        Ok(Some(model)) => match generate_token_pair(model.id, model.role) {
            Ok((access_token, refresh_token)) => (
                StatusCode::OK,
                Json(json!({
                    "access_token": access_token,
                    "refresh_token": refresh_token
                })),
            ),
            Err(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "Internal server error"
                })),
            ),
        },
        Ok(None) => (
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "error": "Invalid refresh token"
            })),
        ),
        Err(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "error": "Internal server error"
            })),
        ),
    }
}

#[derive(Deserialize, Validate, Clone, Debug)]
struct RegisterPayload {
    #[validate(email)]
    email: String,
    #[validate(length(min = 8))]
    password: String,
    #[validate(length(min = 1))]
    full_name: String,
}

#[derive(Deserialize, Clone, Debug)]
struct LoginPayload {
    email: String,
    password: String,
}
