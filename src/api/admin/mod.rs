pub mod category;
pub mod order;
pub mod product;
pub mod user;

use axum::{middleware::from_fn_with_state, Router};
use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::entities::user::Role;
use crate::middleware::auth::{auth_middleware, AuthState};

use category::admin_category_router;
use order::admin_order_router;
use product::admin_product_router;
use user::admin_user_router;

/// Management tier. An owner token passes as well, since owner supersedes
/// every role requirement.
pub fn admin_api_router(db: Arc<DatabaseConnection>) -> Router {
    Router::new()
        .merge(admin_category_router(db.clone()))
        .merge(admin_product_router(db.clone()))
        .merge(admin_order_router(db.clone()))
        .merge(admin_user_router(db.clone()))
        .layer(from_fn_with_state(
            AuthState {
                db: db.clone(),
                role: Some(Role::Management),
            },
            auth_middleware,
        ))
}
