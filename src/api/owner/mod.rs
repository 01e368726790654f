pub mod stats;
pub mod user;

use axum::{middleware::from_fn_with_state, Router};
use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::entities::user::Role;
use crate::middleware::auth::{auth_middleware, AuthState};

use stats::stats_router;
use user::owner_user_router;

pub fn owner_api_router(db: Arc<DatabaseConnection>) -> Router {
    Router::new()
        .merge(stats_router(db.clone()))
        .merge(owner_user_router(db.clone()))
        .layer(from_fn_with_state(
            AuthState {
                db: db.clone(),
                role: Some(Role::Owner),
            },
            auth_middleware,
        ))
}
