use axum::{
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

use crate::entities::{
    cart, cart::Entity as CartEntity, order, order::Entity as OrderEntity, order_item,
    order_item::Entity as OrderItemEntity, product, product::Entity as ProductEntity,
};
use crate::middleware::auth::Claims;
use crate::pricing;

pub fn order_router(db: Arc<DatabaseConnection>) -> Router {
    Router::new()
        .route("/order", post(place_order).get(my_orders))
        .layer(Extension(db))
}

/// Checkout is all-or-nothing: stock checks, price snapshots, stock
/// decrement and cart clearing happen in one transaction.
async fn place_order(
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<PlaceOrder>,
) -> impl IntoResponse {
    let user_id = claims.user_id;

    if payload.items.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "Order must contain at least one item"
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

    // Duplicate lines for one product are merged, so the stock check sees
    // the aggregate quantity and the decrement happens once.
    let mut wanted: Vec<(i32, u32)> = Vec::with_capacity(payload.items.len());
    for item in &payload.items {
        if item.quantity == 0 {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "error": "Quantity should be greater than 0"
                })),
            )
                .into_response();
        }
        match wanted.iter_mut().find(|(id, _)| *id == item.product_id) {
            Some((_, quantity)) => *quantity = quantity.saturating_add(item.quantity),
            None => wanted.push((item.product_id, item.quantity)),
        }
    }

    let mut subtotal = 0.0f32;
    let mut lines: Vec<(product::Model, u32)> = Vec::with_capacity(wanted.len());

    for (product_id, quantity) in wanted {
        let prod = match ProductEntity::find_by_id(product_id)
            .filter(product::Column::IsActive.eq(true))
            .one(&txn)
            .await
        {
            Ok(Some(prod)) => prod,
            Ok(None) => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(json!({
                        "error": format!("No product with {} id was found", product_id)
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

        if (prod.stock_quantity as u32) < quantity {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "error": format!("Insufficient stock for {}", prod.name)
                })),
            )
                .into_response();
        }

        subtotal += pricing::line_total(Some(prod.price), quantity);
        lines.push((prod, quantity));
    }

    let tax = subtotal * pricing::TAX_RATE;
    let shipping_cost = 0.0f32;
    let total_amount = pricing::with_tax(subtotal) + shipping_cost;

    let new_order = order::ActiveModel {
        user_id: Set(user_id),
        status: Set(order::Status::Pending),
        subtotal: Set(subtotal),
        tax: Set(tax),
        shipping_cost: Set(shipping_cost),
        total_amount: Set(total_amount),
        shipping_address: Set(payload.shipping_address),
        delivery_notes: Set(payload.delivery_notes),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };

    let order_id = match OrderEntity::insert(new_order).exec(&txn).await {
        Ok(result) => result.last_insert_id,
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

    for (prod, quantity) in lines {
        let snapshot_price = prod.price;
        let remaining = prod.stock_quantity - quantity as i32;

        let new_item = order_item::ActiveModel {
            order_id: Set(order_id),
            product_id: Set(prod.id),
            quantity: Set(quantity),
            price_at_purchase: Set(snapshot_price),
            ..Default::default()
        };

        if OrderItemEntity::insert(new_item).exec(&txn).await.is_err() {
            let _ = txn.rollback().await;
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "Internal server error"
                })),
            )
                .into_response();
        }

        let mut prod: product::ActiveModel = prod.into();
        prod.stock_quantity = Set(remaining);
        if prod.update(&txn).await.is_err() {
            let _ = txn.rollback().await;
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "Internal server error"
                })),
            )
                .into_response();
        }
    }

    // A placed order empties the cart.
    if CartEntity::delete_many()
        .filter(cart::Column::UserId.eq(user_id))
        .exec(&txn)
        .await
        .is_err()
    {
        let _ = txn.rollback().await;
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "error": "Internal server error"
            })),
        )
            .into_response();
    }

    let placed = match OrderEntity::find_by_id(order_id)
        .find_with_related(OrderItemEntity)
        .all(&txn)
        .await
    {
        Ok(mut rows) if !rows.is_empty() => rows.remove(0),
        _ => {
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
        Ok(_) => {
            let (placed_order, items) = placed;
            (
                StatusCode::CREATED,
                Json(OrderResponse::new(placed_order, items)),
            )
                .into_response()
        }
        Err(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "error": "Internal server error"
            })),
        )
            .into_response(),
    }
}

async fn my_orders(
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Extension(claims): Extension<Claims>,
) -> impl IntoResponse {
    match OrderEntity::find()
        .filter(order::Column::UserId.eq(claims.user_id))
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

#[derive(Deserialize, Debug)]
struct PlaceOrder {
    items: Vec<OrderLine>,
    shipping_address: String,
    delivery_notes: Option<String>,
}

#[derive(Deserialize, Debug)]
struct OrderLine {
    product_id: i32,
    quantity: u32,
}

#[derive(Serialize)]
pub struct OrderResponse {
    pub id: i32,
    pub user_id: i32,
    pub status: order::Status,
    pub subtotal: f32,
    pub tax: f32,
    pub shipping_cost: f32,
    pub total_amount: f32,
    pub shipping_address: String,
    pub delivery_notes: Option<String>,
    pub created_at: sea_orm::prelude::DateTimeUtc,
    pub items: Vec<order_item::Model>,
}

impl OrderResponse {
    pub fn new(value: order::Model, items: Vec<order_item::Model>) -> OrderResponse {
        OrderResponse {
            id: value.id,
            user_id: value.user_id,
            status: value.status,
            subtotal: value.subtotal,
            tax: value.tax,
            shipping_cost: value.shipping_cost,
            total_amount: value.total_amount,
            shipping_address: value.shipping_address,
            delivery_notes: value.delivery_notes,
            created_at: value.created_at,
            items,
        }
    }
}
