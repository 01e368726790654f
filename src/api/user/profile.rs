use axum::{
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

use crate::entities::user::{self, Entity as UserEntity, Role};
use crate::middleware::auth::Claims;

pub fn profile_router(db: Arc<DatabaseConnection>) -> Router {
    Router::new()
        .route("/profile", get(get_profile).patch(patch_profile))
        .layer(Extension(db))
}

async fn get_profile(
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Extension(claims): Extension<Claims>,
) -> impl IntoResponse {
    match UserEntity::find_by_id(claims.user_id).one(&*db).await {
        Ok(Some(model)) => (StatusCode::OK, Json(ProfileResponse::new(model))).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "User not found"
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

async fn patch_profile(
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<PatchProfile>,
) -> impl IntoResponse {
    let model = match UserEntity::find_by_id(claims.user_id).one(&*db).await {
        Ok(Some(model)) => model,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(json!({
                    "error": "User not found"
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
    };

    let mut model: user::ActiveModel = model.into();

    if let Some(full_name) = payload.full_name {
        if !full_name.is_empty() {
            model.full_name = Set(full_name);
        }
    }
    if let Some(phone) = payload.phone {
        model.phone = Set(Some(phone));
    }
    if let Some(address) = payload.address {
        model.address = Set(Some(address));
    }
    if let Some(city) = payload.city {
        model.city = Set(Some(city));
    }
    if let Some(country) = payload.country {
        model.country = Set(Some(country));
    }
    if let Some(postal_code) = payload.postal_code {
        model.postal_code = Set(Some(postal_code));
    }

    match model.update(&*db).await {
        Ok(updated) => (StatusCode::OK, Json(ProfileResponse::new(updated))).into_response(),
        Err(_) => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "Failed to patch this resource"
            })),
        )
            .into_response(),
    }
}

#[derive(Deserialize, Debug)]
struct PatchProfile {
    full_name: Option<String>,
    phone: Option<String>,
    address: Option<String>,
    city: Option<String>,
    country: Option<String>,
    postal_code: Option<String>,
}

#[derive(Serialize)]
pub struct ProfileResponse {
    pub id: i32,
    pub email: String,
    pub full_name: String,
    pub role: Role,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub postal_code: Option<String>,
    pub created_at: sea_orm::prelude::DateTimeUtc,
}

impl ProfileResponse {
    pub fn new(value: user::Model) -> ProfileResponse {
        ProfileResponse {
            id: value.id,
            email: value.email,
            full_name: value.full_name,
            role: value.role,
            phone: value.phone,
            address: value.address,
            city: value.city,
            country: value.country,
            postal_code: value.postal_code,
            created_at: value.created_at,
        }
    }
}
