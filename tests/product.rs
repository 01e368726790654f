use reqwest::StatusCode;
use serde_json::json;

mod support;

#[tokio::test]
async fn test_public_listing_hides_inactive_products() {
    let app = support::spawn_app().await;

    let response = app
        .client
        .get(app.url("/api/product"))
        .send()
        .await
        .expect("Failed to send product request");

    assert_eq!(response.status(), StatusCode::OK);

    let body = response
        .json::<serde_json::Value>()
        .await
        .expect("Failed to parse product response JSON");

    let products = body.as_array().expect("Expected an array");
    assert_eq!(products.len(), 5);
    assert!(products
        .iter()
        .all(|p| p["name"].as_str() != Some("Retired Clamp")));
}

#[tokio::test]
async fn test_category_filter_preserves_order() {
    let app = support::spawn_app().await;

    let response = app
        .client
        .get(app.url("/api/product?category=dental&min=0&max=10000&search="))
        .send()
        .await
        .expect("Failed to send product request");

    assert_eq!(response.status(), StatusCode::OK);

    let body = response
        .json::<serde_json::Value>()
        .await
        .expect("Failed to parse product response JSON");

    let products = body.as_array().expect("Expected an array");
    assert_eq!(products.len(), 2);
    assert_eq!(products[0]["name"].as_str(), Some("Dental Probe"));
    assert_eq!(products[1]["name"].as_str(), Some("Dental Mirror"));
    assert_eq!(products[0]["category_name"].as_str(), Some("dental"));
}

#[tokio::test]
async fn test_search_is_case_insensitive() {
    let app = support::spawn_app().await;

    let response = app
        .client
        .get(app.url("/api/product?search=dEnTaL"))
        .send()
        .await
        .expect("Failed to send product request");

    let body = response
        .json::<serde_json::Value>()
        .await
        .expect("Failed to parse product response JSON");

    assert_eq!(body.as_array().expect("Expected an array").len(), 2);
}

#[tokio::test]
async fn test_price_range_is_inclusive() {
    let app = support::spawn_app().await;

    // 10.00, 15.00 and 25.00 fall inside [10, 25]; both bounds included.
    let response = app
        .client
        .get(app.url("/api/product?min=10&max=25"))
        .send()
        .await
        .expect("Failed to send product request");

    let body = response
        .json::<serde_json::Value>()
        .await
        .expect("Failed to parse product response JSON");

    let products = body.as_array().expect("Expected an array");
    assert_eq!(products.len(), 3);
    assert_eq!(products[0]["price"].as_f64(), Some(10.0));
}

#[tokio::test]
async fn test_get_product_by_id() {
    let app = support::spawn_app().await;

    let response = app
        .client
        .get(app.url("/api/product/3"))
        .send()
        .await
        .expect("Failed to send product request");

    assert_eq!(response.status(), StatusCode::OK);

    let body = response
        .json::<serde_json::Value>()
        .await
        .expect("Failed to parse product response JSON");

    assert_eq!(body["name"].as_str(), Some("Bone Saw"));
    assert_eq!(body["category_name"].as_str(), Some("orthopedic"));

    // Inactive products are invisible to the public surface.
    let inactive = app
        .client
        .get(app.url("/api/product/6"))
        .send()
        .await
        .expect("Failed to send product request");

    assert_eq!(inactive.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_admin_product_crud_requires_management_role() {
    let app = support::spawn_app().await;
    let customer = app.login("customer@test.dev").await;
    let manager = app.login("manager@test.dev").await;

    let payload = json!({
        "name": "Forceps",
        "description": "Stainless forceps",
        "price": 12.5,
        "sku": "FC-700",
        "stock_quantity": 30,
        "category_id": 2
    });

    let denied = app
        .client
        .post(app.url("/api/admin/product"))
        .bearer_auth(&customer)
        .json(&payload)
        .send()
        .await
        .expect("Failed to send create request");

    assert_eq!(denied.status(), StatusCode::FORBIDDEN);

    let created = app
        .client
        .post(app.url("/api/admin/product"))
        .bearer_auth(&manager)
        .json(&payload)
        .send()
        .await
        .expect("Failed to send create request");

    assert_eq!(created.status(), StatusCode::CREATED);

    let created_body = created
        .json::<serde_json::Value>()
        .await
        .expect("Failed to parse create response JSON");
    let id = created_body["id"].as_i64().expect("Missing product id");

    let updated = app
        .client
        .put(app.url(&format!("/api/admin/product/{}", id)))
        .bearer_auth(&manager)
        .json(&json!({ "price": 13.75, "is_active": false }))
        .send()
        .await
        .expect("Failed to send update request");

    assert_eq!(updated.status(), StatusCode::OK);

    let updated_body = updated
        .json::<serde_json::Value>()
        .await
        .expect("Failed to parse update response JSON");
    assert_eq!(updated_body["price"].as_f64(), Some(13.75));
    assert_eq!(updated_body["is_active"].as_bool(), Some(false));

    let deleted = app
        .client
        .delete(app.url(&format!("/api/admin/product/{}", id)))
        .bearer_auth(&manager)
        .send()
        .await
        .expect("Failed to send delete request");

    assert_eq!(deleted.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_owner_token_satisfies_management_requirement() {
    let app = support::spawn_app().await;
    let owner = app.login("owner@test.dev").await;

    let response = app
        .client
        .get(app.url("/api/admin/product"))
        .bearer_auth(&owner)
        .send()
        .await
        .expect("Failed to send admin product request");

    assert_eq!(response.status(), StatusCode::OK);

    // The admin listing exposes inactive rows too.
    let body = response
        .json::<serde_json::Value>()
        .await
        .expect("Failed to parse admin product response JSON");
    assert_eq!(body.as_array().expect("Expected an array").len(), 6);
}

#[tokio::test]
async fn test_admin_routes_reject_missing_token() {
    let app = support::spawn_app().await;

    let response = app
        .client
        .get(app.url("/api/admin/product"))
        .send()
        .await
        .expect("Failed to send admin product request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_admin_category_create_and_delete() {
    let app = support::spawn_app().await;
    let manager = app.login("manager@test.dev").await;

    let created = app
        .client
        .post(app.url("/api/admin/category"))
        .bearer_auth(&manager)
        .json(&json!({ "name": "sutures", "description": "Suture material" }))
        .send()
        .await
        .expect("Failed to send create request");

    assert_eq!(created.status(), StatusCode::CREATED);

    let duplicate = app
        .client
        .post(app.url("/api/admin/category"))
        .bearer_auth(&manager)
        .json(&json!({ "name": "sutures" }))
        .send()
        .await
        .expect("Failed to send create request");

    assert_eq!(duplicate.status(), StatusCode::CONFLICT);

    let body = created
        .json::<serde_json::Value>()
        .await
        .expect("Failed to parse create response JSON");
    let id = body["id"].as_i64().expect("Missing category id");

    let deleted = app
        .client
        .delete(app.url(&format!("/api/admin/category/{}", id)))
        .bearer_auth(&manager)
        .send()
        .await
        .expect("Failed to send delete request");

    assert_eq!(deleted.status(), StatusCode::OK);

    let listed = app
        .client
        .get(app.url("/api/category"))
        .send()
        .await
        .expect("Failed to send category request");

    let categories = listed
        .json::<serde_json::Value>()
        .await
        .expect("Failed to parse category response JSON");
    assert!(categories
        .as_array()
        .expect("Expected an array")
        .iter()
        .all(|c| c["name"].as_str() != Some("sutures")));
}
