use reqwest::StatusCode;
use serde_json::json;

mod support;

#[tokio::test]
async fn test_wishlist_round_trip() {
    let app = support::spawn_app().await;
    let token = app.login("customer@test.dev").await;

    let added = app
        .client
        .post(app.url("/api/wishlist"))
        .bearer_auth(&token)
        .json(&json!({ "product_id": 3 }))
        .send()
        .await
        .expect("Failed to send add request");

    assert_eq!(added.status(), StatusCode::CREATED);

    // The backend enforces pair uniqueness.
    let duplicate = app
        .client
        .post(app.url("/api/wishlist"))
        .bearer_auth(&token)
        .json(&json!({ "product_id": 3 }))
        .send()
        .await
        .expect("Failed to send add request");

    assert_eq!(duplicate.status(), StatusCode::BAD_REQUEST);

    let checked = app
        .client
        .get(app.url("/api/wishlist/check/3"))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send check request")
        .json::<bool>()
        .await
        .expect("Failed to parse check response");

    assert!(checked);

    let listed = app
        .client
        .get(app.url("/api/wishlist"))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send list request")
        .json::<serde_json::Value>()
        .await
        .expect("Failed to parse wishlist JSON");

    let entries = listed.as_array().expect("Expected an array");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["product"]["name"].as_str(), Some("Bone Saw"));

    let removed = app
        .client
        .delete(app.url("/api/wishlist/3"))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send remove request");

    assert_eq!(removed.status(), StatusCode::OK);

    let checked = app
        .client
        .get(app.url("/api/wishlist/check/3"))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send check request")
        .json::<bool>()
        .await
        .expect("Failed to parse check response");

    assert!(!checked);

    let missing = app
        .client
        .delete(app.url("/api/wishlist/3"))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send remove request");

    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_wishlist_rejects_unknown_product() {
    let app = support::spawn_app().await;
    let token = app.login("customer@test.dev").await;

    let response = app
        .client
        .post(app.url("/api/wishlist"))
        .bearer_auth(&token)
        .json(&json!({ "product_id": 999 }))
        .send()
        .await
        .expect("Failed to send add request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
