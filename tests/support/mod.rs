#![allow(dead_code)]

use sea_orm::{ConnectOptions, Database, DatabaseConnection, EntityTrait, Set};
use std::sync::Arc;

use surgistore::entities::{self, category, product, user};

pub const TEST_PASSWORD: &str = "Secret15!";

pub struct TestApp {
    pub base_url: String,
    pub client: reqwest::Client,
}

/// Spawns the full router on an ephemeral port, backed by a fresh in-memory
/// sqlite database. The pool is capped at one connection so every query sees
/// the same memory database.
pub async fn spawn_app() -> TestApp {
    std::env::set_var("SECRET", "test-secret");

    let mut options = ConnectOptions::new("sqlite::memory:".to_owned());
    options.max_connections(1);

    let db = Database::connect(options)
        .await
        .expect("Failed to open in-memory database");
    entities::setup_schema(&db).await;
    seed(&db).await;

    let app = surgistore::create_api_router(Arc::new(db));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Failed to read local addr");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Test server error");
    });

    TestApp {
        base_url: format!("http://{}", addr),
        client: reqwest::Client::new(),
    }
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn login(&self, email: &str) -> String {
        let response = self
            .client
            .post(self.url("/api/auth/login"))
            .json(&serde_json::json!({
                "email": email,
                "password": TEST_PASSWORD
            }))
            .send()
            .await
            .expect("Failed to send login request");

        assert_eq!(response.status(), reqwest::StatusCode::OK);

        let body = response
            .json::<serde_json::Value>()
            .await
            .expect("Failed to parse login response JSON");

        body["access_token"]
            .as_str()
            .expect("Token not found in login response")
            .to_string()
    }
}

async fn seed(db: &DatabaseConnection) {
    let password = user::hash_password(TEST_PASSWORD).expect("Failed to hash test password");

    let users = [
        (1, "owner@test.dev", "Owner One", user::Role::Owner),
        (2, "manager@test.dev", "Manager One", user::Role::Management),
        (3, "customer@test.dev", "Customer One", user::Role::Customer),
    ]
    .map(|(id, email, full_name, role)| user::ActiveModel {
        id: Set(id),
        email: Set(email.to_string()),
        password: Set(password.clone()),
        full_name: Set(full_name.to_string()),
        role: Set(role),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    });

    user::Entity::insert_many(users)
        .exec(db)
        .await
        .expect("Failed to seed users");

    let categories = [(1, "dental"), (2, "orthopedic")].map(|(id, name)| category::ActiveModel {
        id: Set(id),
        name: Set(name.to_string()),
        description: Set(None),
        ..Default::default()
    });

    category::Entity::insert_many(categories)
        .exec(db)
        .await
        .expect("Failed to seed categories");

    // created_at descends with id so the public listing (newest first)
    // returns products in id order.
    let now = chrono::Utc::now();
    let products = [
        (1, "Dental Probe", 10.00f32, "DP-100", 50, Some(1), true),
        (2, "Dental Mirror", 5.50, "DM-200", 40, Some(1), true),
        (3, "Bone Saw", 120.00, "BS-300", 10, Some(2), true),
        (4, "Scalpel Handle", 15.00, "SH-400", 5, Some(2), true),
        (5, "Suture Kit", 25.00, "SK-500", 8, None, true),
        (6, "Retired Clamp", 9.99, "RC-600", 0, Some(1), false),
    ]
    .map(
        |(id, name, price, sku, stock, category_id, is_active)| product::ActiveModel {
            id: Set(id),
            name: Set(name.to_string()),
            description: Set(format!("{} for export", name)),
            price: Set(price),
            sku: Set(sku.to_string()),
            stock_quantity: Set(stock),
            image_url: Set(None),
            category_id: Set(category_id),
            is_active: Set(is_active),
            created_at: Set(now - chrono::Duration::minutes(id as i64)),
            ..Default::default()
        },
    );

    product::Entity::insert_many(products)
        .exec(db)
        .await
        .expect("Failed to seed products");
}
