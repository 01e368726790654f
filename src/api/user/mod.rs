pub mod cart;
pub mod order;
pub mod profile;
pub mod wishlist;

use axum::{middleware::from_fn_with_state, Router};
use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::middleware::auth::{auth_middleware, AuthState};
use cart::cart_router;
use order::order_router;
use profile::profile_router;
use wishlist::wishlist_router;

/// Routes gated on session presence only; any role may use them.
pub fn user_api_router(db: Arc<DatabaseConnection>) -> Router {
    Router::new()
        .merge(cart_router(db.clone()))
        .merge(order_router(db.clone()))
        .merge(wishlist_router(db.clone()))
        .merge(profile_router(db.clone()))
        .layer(from_fn_with_state(
            AuthState {
                db: db.clone(),
                role: None,
            },
            auth_middleware,
        ))
}
