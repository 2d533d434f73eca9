use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

use super::accounts;
use super::health;
use super::profiles;
use super::state::AppState;

/// Create the full router with application state
pub fn create_router_with_state(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        .route("/live", get(health::live_check))
        .nest("/accounts", accounts::create_accounts_router())
        .nest("/profiles", profiles::create_profiles_router())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request, StatusCode};
    use chrono::{Months, Utc};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::config::AccountsConfig;

    fn app() -> Router {
        let state = crate::create_in_memory_state(&AccountsConfig::default()).unwrap();
        create_router_with_state(state)
    }

    async fn send(
        app: &Router,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);

        let body = match body {
            Some(value) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };

        let response = app
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };

        (status, value)
    }

    fn date_of_birth(years_ago: u32) -> String {
        Utc::now()
            .date_naive()
            .checked_sub_months(Months::new(years_ago * 12))
            .unwrap()
            .to_string()
    }

    async fn register(app: &Router, username: &str) -> (StatusCode, Value) {
        send(
            app,
            Method::POST,
            "/accounts",
            Some(json!({
                "username": username,
                "password": "s3cure-harvest",
                "date_of_birth": date_of_birth(30),
            })),
        )
        .await
    }

    async fn create_profile(app: &Router, account: &str, is_public: bool) -> (StatusCode, Value) {
        send(
            app,
            Method::POST,
            "/profiles",
            Some(json!({
                "account": account,
                "first_name": "normal",
                "last_name": "user",
                "email": format!("{}@test.dev", account),
                "phone": "+18044448888",
                "is_public": is_public,
            })),
        )
        .await
    }

    #[tokio::test]
    async fn test_health_endpoints() {
        let app = app();

        let (status, body) = send(&app, Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");

        let (status, body) = send(&app, Method::GET, "/ready", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["checks"].as_array().unwrap().len(), 2);

        let (status, _) = send(&app, Method::GET, "/live", None).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_register_and_get_account() {
        let app = app();

        let (status, body) = register(&app, "Grow Master").await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["username"], "grow_master");
        assert_eq!(body["url"], "/accounts/grow_master/");
        assert_eq!(body["status"], "active");
        assert_eq!(body["is_of_age"], true);
        assert!(body.get("password_hash").is_none());

        let (status, body) = send(&app, Method::GET, "/accounts/grow_master", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["is_staff"], false);

        let (status, body) = send(&app, Method::GET, "/accounts", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 1);
    }

    #[tokio::test]
    async fn test_advertised_urls_resolve() {
        let app = app();

        let (_, account) = register(&app, "growmaster").await;
        let url = account["url"].as_str().unwrap();
        let (status, body) = send(&app, Method::GET, url, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["username"], "growmaster");

        let (_, profile) = create_profile(&app, "growmaster", true).await;
        let url = profile["url"].as_str().unwrap();
        let (status, body) = send(&app, Method::GET, url, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["email"], "growmaster@test.dev");
    }

    #[tokio::test]
    async fn test_account_lookup_ignores_case() {
        let app = app();
        register(&app, "growmaster").await;

        let (status, body) = send(&app, Method::GET, "/accounts/GrowMaster", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["username"], "growmaster");
    }

    #[tokio::test]
    async fn test_register_errors() {
        let app = app();

        let (status, body) = register(&app, "normie").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["type"], "invalid_request_error");
        assert_eq!(body["error"]["param"], "username");
        assert_eq!(body["error"]["code"], "invalid_username");
        assert!(
            body["error"]["message"]
                .as_str()
                .unwrap()
                .contains("usernames must be between 8 and 20 characters long")
        );

        register(&app, "growmaster").await;
        let (status, body) = register(&app, "growmaster").await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"]["type"], "conflict_error");

        let (status, body) = send(
            &app,
            Method::POST,
            "/accounts",
            Some(json!({ "username": "growmaster" })),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"]["code"], "json_parse_error");
    }

    #[tokio::test]
    async fn test_underage_signup_rejected() {
        let app = app();

        let (status, body) = send(
            &app,
            Method::POST,
            "/accounts",
            Some(json!({
                "username": "youngster",
                "password": "s3cure-harvest",
                "date_of_birth": date_of_birth(16),
            })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(
            body["error"]["message"]
                .as_str()
                .unwrap()
                .contains("does not meet the current birth year")
        );
    }

    #[tokio::test]
    async fn test_change_password() {
        let app = app();
        register(&app, "growmaster").await;

        let (status, _) = send(
            &app,
            Method::PUT,
            "/accounts/growmaster/password",
            Some(json!({
                "current_password": "wrong-one",
                "new_password": "n3w-harvest-season",
            })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(
            &app,
            Method::PUT,
            "/accounts/growmaster/password",
            Some(json!({
                "current_password": "s3cure-harvest",
                "new_password": "n3w-harvest-season",
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_age_verification() {
        let app = app();
        register(&app, "growmaster").await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/accounts/growmaster/age-verification",
            Some(json!({ "date_of_birth": date_of_birth(10) })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["param"], "date_of_birth");

        let (status, _) = send(
            &app,
            Method::POST,
            "/accounts/nobody_here/age-verification",
            Some(json!({ "date_of_birth": date_of_birth(30) })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_profile_flow() {
        let app = app();

        let (status, _) = create_profile(&app, "growmaster", true).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        register(&app, "growmaster").await;
        let (status, body) = create_profile(&app, "growmaster", true).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["url"], "/profiles/growmaster/");
        assert_eq!(body["full_name"], "Normal User");
        assert_eq!(body["short_name"], "N User");

        let (status, body) = send(&app, Method::GET, "/profiles/growmaster", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["email"], "growmaster@test.dev");

        let (status, body) = send(&app, Method::GET, "/profiles", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 1);
    }

    #[tokio::test]
    async fn test_private_profile_is_hidden() {
        let app = app();
        register(&app, "growmaster").await;
        create_profile(&app, "growmaster", false).await;

        let (status, _) = send(&app, Method::GET, "/profiles/growmaster", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (_, body) = send(&app, Method::GET, "/profiles", None).await;
        assert_eq!(body["total"], 0);

        let (status, body) = send(
            &app,
            Method::PUT,
            "/profiles/growmaster",
            Some(json!({
                "first_name": "Grow",
                "last_name": "Master",
                "email": "grow@test.dev",
                "is_public": true,
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["is_public"], true);

        let (status, _) = send(&app, Method::GET, "/profiles/growmaster", None).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_delete_account_cascades() {
        let app = app();
        register(&app, "growmaster").await;
        create_profile(&app, "growmaster", true).await;

        let (status, _) = send(&app, Method::DELETE, "/accounts/growmaster", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = send(&app, Method::GET, "/profiles/growmaster", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(&app, Method::DELETE, "/accounts/growmaster", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
