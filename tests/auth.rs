use reqwest::StatusCode;
use serde_json::json;

mod support;

#[tokio::test]
async fn test_register_and_login() {
    let app = support::spawn_app().await;

    let register_response = app
        .client
        .post(app.url("/api/auth/register"))
        .json(&json!({
            "email": "new.customer@test.dev",
            "password": "Longenough1!",
            "full_name": "New Customer"
        }))
        .send()
        .await
        .expect("Failed to send register request");

    assert_eq!(register_response.status(), StatusCode::CREATED);

    let login_response = app
        .client
        .post(app.url("/api/auth/login"))
        .json(&json!({
            "email": "new.customer@test.dev",
            "password": "Longenough1!"
        }))
        .send()
        .await
        .expect("Failed to send login request");

    assert_eq!(login_response.status(), StatusCode::OK);

    let body = login_response
        .json::<serde_json::Value>()
        .await
        .expect("Failed to parse login response JSON");

    let access = body["access_token"].as_str().expect("Missing access token");
    assert!(body["refresh_token"].as_str().is_some());

    // A fresh registration lands in the customer role.
    let profile_response = app
        .client
        .get(app.url("/api/profile"))
        .bearer_auth(access)
        .send()
        .await
        .expect("Failed to send profile request");

    assert_eq!(profile_response.status(), StatusCode::OK);

    let profile = profile_response
        .json::<serde_json::Value>()
        .await
        .expect("Failed to parse profile response JSON");

    assert_eq!(profile["role"].as_str(), Some("customer"));
    assert_eq!(profile["full_name"].as_str(), Some("New Customer"));
}

#[tokio::test]
async fn test_register_duplicate_email_conflicts() {
    let app = support::spawn_app().await;

    let response = app
        .client
        .post(app.url("/api/auth/register"))
        .json(&json!({
            "email": "customer@test.dev",
            "password": "Longenough1!",
            "full_name": "Copycat"
        }))
        .send()
        .await
        .expect("Failed to send register request");

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_register_rejects_invalid_payload() {
    let app = support::spawn_app().await;

    let response = app
        .client
        .post(app.url("/api/auth/register"))
        .json(&json!({
            "email": "not-an-email",
            "password": "Longenough1!",
            "full_name": "Bad Email"
        }))
        .send()
        .await
        .expect("Failed to send register request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let short_password = app
        .client
        .post(app.url("/api/auth/register"))
        .json(&json!({
            "email": "short@test.dev",
            "password": "short",
            "full_name": "Short Password"
        }))
        .send()
        .await
        .expect("Failed to send register request");

    assert_eq!(short_password.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_with_wrong_password_fails() {
    let app = support::spawn_app().await;

    let response = app
        .client
        .post(app.url("/api/auth/login"))
        .json(&json!({
            "email": "customer@test.dev",
            "password": "WrongPassword1!"
        }))
        .send()
        .await
        .expect("Failed to send login request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_refresh_rotates_token_pair() {
    let app = support::spawn_app().await;

    let login_response = app
        .client
        .post(app.url("/api/auth/login"))
        .json(&json!({
            "email": "customer@test.dev",
            "password": support::TEST_PASSWORD
        }))
        .send()
        .await
        .expect("Failed to send login request");

    let body = login_response
        .json::<serde_json::Value>()
        .await
        .expect("Failed to parse login response JSON");

    let access = body["access_token"].as_str().expect("Missing access token");
    let refresh = body["refresh_token"]
        .as_str()
        .expect("Missing refresh token");

    let refresh_response = app
        .client
        .post(app.url("/api/auth/refresh"))
        .bearer_auth(refresh)
        .send()
        .await
        .expect("Failed to send refresh request");

    assert_eq!(refresh_response.status(), StatusCode::OK);

    let refreshed = refresh_response
        .json::<serde_json::Value>()
        .await
        .expect("Failed to parse refresh response JSON");

    assert!(refreshed["access_token"].as_str().is_some());
    assert!(refreshed["refresh_token"].as_str().is_some());

    // An access token must not be accepted as a refresh credential.
    let wrong_kind = app
        .client
        .post(app.url("/api/auth/refresh"))
        .bearer_auth(access)
        .send()
        .await
        .expect("Failed to send refresh request");

    assert_eq!(wrong_kind.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_patch_profile_updates_contact_fields() {
    let app = support::spawn_app().await;
    let token = app.login("customer@test.dev").await;

    let response = app
        .client
        .patch(app.url("/api/profile"))
        .bearer_auth(&token)
        .json(&json!({
            "phone": "+49 30 1234567",
            "city": "Berlin"
        }))
        .send()
        .await
        .expect("Failed to send profile patch request");

    assert_eq!(response.status(), StatusCode::OK);

    let profile = response
        .json::<serde_json::Value>()
        .await
        .expect("Failed to parse profile response JSON");

    assert_eq!(profile["phone"].as_str(), Some("+49 30 1234567"));
    assert_eq!(profile["city"].as_str(), Some("Berlin"));
    assert_eq!(profile["full_name"].as_str(), Some("Customer One"));
}
