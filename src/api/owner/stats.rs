use axum::{
    extract::Extension, http::StatusCode, response::IntoResponse, routing::get, Json, Router,
};
use sea_orm::{DatabaseConnection, EntityTrait, PaginatorTrait, QueryOrder, QuerySelect};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;

use crate::entities::{
    order, order::Entity as OrderEntity, product::Entity as ProductEntity,
    user::Entity as UserEntity,
};
use crate::pricing;

pub fn stats_router(db: Arc<DatabaseConnection>) -> Router {
    Router::new()
        .route("/stats", get(dashboard))
        .layer(Extension(db))
}

async fn dashboard(Extension(db): Extension<Arc<DatabaseConnection>>) -> impl IntoResponse {
    let orders = match OrderEntity::find().all(&*db).await {
        Ok(orders) => orders,
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

    let total_orders = orders.len() as u64;
    let total_revenue: f32 = orders.iter().map(|o| o.total_amount).sum();
    let subtotal_sum: f32 = orders.iter().map(|o| o.subtotal).sum();
    let total_profit = pricing::profit(total_revenue, subtotal_sum);

    let total_users = match UserEntity::find().count(&*db).await {
        Ok(count) => count,
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

    let total_products = match ProductEntity::find().count(&*db).await {
        Ok(count) => count,
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

    let recent_orders = match OrderEntity::find()
        .order_by_desc(order::Column::CreatedAt)
        .limit(10)
        .all(&*db)
        .await
    {
        Ok(recent) => recent,
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

    let response = DashboardStats {
        total_orders,
        total_revenue,
        total_profit,
        total_users,
        total_products,
        recent_orders,
    };

    (StatusCode::OK, Json(response)).into_response()
}

#[derive(Serialize)]
struct DashboardStats {
    total_orders: u64,
    total_revenue: f32,
    total_profit: f32,
    total_users: u64,
    total_products: u64,
    recent_orders: Vec<order::Model>,
}
