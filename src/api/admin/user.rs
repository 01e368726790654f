use axum::{
    extract::{Extension, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, EntityTrait, FromQueryResult, QueryFilter,
    QueryOrder, QuerySelect,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

use crate::entities::user::{self, Entity as UserEntity, Role};

pub fn admin_user_router(db: Arc<DatabaseConnection>) -> Router {
    Router::new()
        .route("/user", get(get_users))
        .layer(Extension(db))
}

async fn get_users(
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Query(query): Query<UsersQuery>,
) -> impl IntoResponse {
    let mut user_finder = UserEntity::find();

    if let Some(role) = query.role {
        user_finder = user_finder.filter(user::Column::Role.eq(role));
    }

    if let Some(term) = query.query {
        let mut condition = Condition::any()
            .add(user::Column::Email.contains(term.clone()))
            .add(user::Column::FullName.contains(term.clone()));
        if let Some(id) = term.parse::<i32>().ok() {
            condition = condition.add(user::Column::Id.eq(id));
        }
        user_finder = user_finder.filter(condition);
    }

    // Never ship the password column, even to admins.
    let users: Result<Vec<AdminUserResponse>, _> = user_finder
        .order_by_asc(user::Column::Id)
        .select_only()
        .column_as(user::Column::Id, "id")
        .column_as(user::Column::Email, "email")
        .column_as(user::Column::FullName, "full_name")
        .column_as(user::Column::Role, "role")
        .into_model::<AdminUserResponse>()
        .all(&*db)
        .await;

    match users {
        Ok(users) => Json(users).into_response(),
        Err(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "error": "Internal server error"
            })),
        )
            .into_response(),
    }
}

#[derive(Serialize, FromQueryResult)]
struct AdminUserResponse {
    id: i32,
    email: String,
    full_name: String,
    role: Role,
}

#[derive(Deserialize)]
struct UsersQuery {
    query: Option<String>,
    role: Option<Role>,
}
