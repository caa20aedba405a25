//! Integration tests for the auth crate
//! Drive the router end to end against an in-memory user repository.

#[cfg(test)]
mod support {
    use std::sync::{Arc, Mutex};

    use chrono::Utc;

    use crate::domain::entity::user::{NewUser, User};
    use crate::domain::repository::UserRepository;
    use crate::domain::value_object::UserId;
    use crate::error::{AuthError, AuthResult};

    #[derive(Clone, Default)]
    pub struct MemoryUsers {
        rows: Arc<Mutex<Vec<(User, Option<String>)>>>,
    }

    impl MemoryUsers {
        pub fn len(&self) -> usize {
            self.rows.lock().unwrap().len()
        }

        fn insert(&self, user: &NewUser) -> User {
            let row = user.clone().into_user(UserId::new(), Utc::now());
            self.rows
                .lock()
                .unwrap()
                .push((row.clone(), user.password_hash.clone()));
            row
        }

        fn find(&self, pred: impl Fn(&User) -> bool) -> Option<(User, Option<String>)> {
            self.rows
                .lock()
                .unwrap()
                .iter()
                .find(|(user, _)| pred(user))
                .cloned()
        }
    }

    impl UserRepository for MemoryUsers {
        async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>> {
            Ok(self.find(|u| &u.id == user_id).map(|(u, _)| u))
        }

        async fn find_by_account_identifier(
            &self,
            account_identifier: &str,
        ) -> AuthResult<Option<User>> {
            Ok(self
                .find(|u| u.account_identifier == account_identifier)
                .map(|(u, _)| u))
        }

        async fn find_password_hash(&self, user_id: &UserId) -> AuthResult<Option<String>> {
            Ok(self.find(|u| &u.id == user_id).and_then(|(_, hash)| hash))
        }

        async fn get_or_create(&self, user: &NewUser) -> AuthResult<User> {
            match self.find(|u| u.account_identifier == user.account_identifier) {
                Some((existing, _)) => Ok(existing),
                None => Ok(self.insert(user)),
            }
        }

        async fn create(&self, user: &NewUser) -> AuthResult<User> {
            if self
                .find(|u| u.account_identifier == user.account_identifier)
                .is_some()
            {
                return Err(AuthError::UserExists);
            }
            Ok(self.insert(user))
        }
    }
}

#[cfg(test)]
mod router_tests {
    use std::sync::Arc;

    use axum::Router;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::support::MemoryUsers;
    use crate::application::config::AuthConfig;
    use crate::application::test_credentials::TEST_USER_IDENTIFIER;
    use crate::application::token_service::TokenService;
    use crate::domain::value_object::{UserId, role::Role};
    use crate::presentation::router::auth_router_generic;

    const PROVIDER_SECRET: &str = "provider-secret";
    const WORKER_SECRET: &str = "worker-secret";

    fn config() -> AuthConfig {
        AuthConfig {
            signing_secret: b"router-test-secret".to_vec(),
            provider_secret: PROVIDER_SECRET.to_string(),
            worker_secret: WORKER_SECRET.to_string(),
            admin_emails: vec!["root@example.com".to_string()],
            ..Default::default()
        }
    }

    fn app(users: MemoryUsers) -> (Router, Arc<TokenService>) {
        let config = config();
        let tokens = Arc::new(TokenService::from_config(&config));
        (
            auth_router_generic(users, tokens.clone(), Arc::new(config)),
            tokens,
        )
    }

    fn post(uri: &str, authorization: Option<&str>, body: Value) -> Request<Body> {
        let mut builder = Request::post(uri).header(header::CONTENT_TYPE, "application/json");
        if let Some(value) = authorization {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn provider_body(email: &str) -> Value {
        json!({ "id": "oauth-42", "name": "Ada", "email": email, "image": "ada.png" })
    }

    #[tokio::test]
    async fn test_provider_login_creates_then_reuses_user() {
        let users = MemoryUsers::default();
        let (app, tokens) = app(users.clone());

        let first = app
            .clone()
            .oneshot(post(
                "/v1/create_or_login_user",
                Some(PROVIDER_SECRET),
                provider_body("ada@example.com"),
            ))
            .await
            .unwrap();
        assert_eq!(first.status(), StatusCode::OK);
        let first = json_body(first).await;

        let second = app
            .oneshot(post(
                "/v1/create_or_login_user",
                Some(PROVIDER_SECRET),
                provider_body("ada@example.com"),
            ))
            .await
            .unwrap();
        let second = json_body(second).await;

        assert_eq!(users.len(), 1);
        assert_eq!(first["id"], second["id"]);
        assert_eq!(first["name"], "Ada");
        assert_eq!(first["image"], "ada.png");

        let claims = tokens.validate(first["token"].as_str().unwrap()).unwrap();
        assert_eq!(claims.role, Role::Standard);
        assert_eq!(claims.id.to_string(), first["id"].as_str().unwrap());
    }

    #[tokio::test]
    async fn test_provider_login_admin_email() {
        let (app, tokens) = app(MemoryUsers::default());

        let response = app
            .oneshot(post(
                "/v1/create_or_login_user",
                Some(PROVIDER_SECRET),
                provider_body("root@example.com"),
            ))
            .await
            .unwrap();
        let body = json_body(response).await;

        let claims = tokens.validate(body["token"].as_str().unwrap()).unwrap();
        assert_eq!(claims.role, Role::Admin);
    }

    #[tokio::test]
    async fn test_provider_login_rejects_bad_secret() {
        let users = MemoryUsers::default();
        let (app, _) = app(users.clone());

        let wrong = app
            .clone()
            .oneshot(post(
                "/v1/create_or_login_user",
                Some("guess"),
                provider_body("ada@example.com"),
            ))
            .await
            .unwrap();
        assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);

        let missing = app
            .oneshot(post(
                "/v1/create_or_login_user",
                None,
                provider_body("ada@example.com"),
            ))
            .await
            .unwrap();
        assert_eq!(missing.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(users.len(), 0);
    }

    #[tokio::test]
    async fn test_provider_login_rejects_repeated_header() {
        let (app, _) = app(MemoryUsers::default());

        let request = Request::post("/v1/create_or_login_user")
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::AUTHORIZATION, PROVIDER_SECRET)
            .header(header::AUTHORIZATION, PROVIDER_SECRET)
            .body(Body::from(provider_body("ada@example.com").to_string()))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_worker_login() {
        let (app, tokens) = app(MemoryUsers::default());

        let response = app
            .clone()
            .oneshot(post("/v1/login_judge", Some(WORKER_SECRET), json!({})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;

        let claims = tokens.validate(body["token"].as_str().unwrap()).unwrap();
        assert_eq!(claims.id, UserId::nil());
        assert_eq!(claims.role, Role::Worker);

        // the provider secret is not a worker secret
        let response = app
            .oneshot(post("/v1/login_judge", Some(PROVIDER_SECRET), json!({})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_basic_register_and_login() {
        let (app, tokens) = app(MemoryUsers::default());
        let credentials =
            json!({ "name": "Bob", "email": "Bob@Example.com", "password": "correct horse" });

        let response = app
            .clone()
            .oneshot(post("/v1/basic_register", None, credentials.clone()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let registered = json_body(response).await;
        assert_eq!(registered["email"], "bob@example.com");

        let response = app
            .clone()
            .oneshot(post("/v1/basic_register", None, credentials))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert_eq!(json_body(response).await["code"], "USER_EXISTS");

        let response = app
            .oneshot(post(
                "/v1/basic_login",
                None,
                json!({ "email": "bob@example.com", "password": "correct horse" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;

        assert_eq!(body["id"], registered["id"]);
        let claims = tokens.validate(body["token"].as_str().unwrap()).unwrap();
        assert_eq!(claims.role, Role::Standard);
    }

    #[tokio::test]
    async fn test_basic_login_failures_look_alike() {
        let (app, _) = app(MemoryUsers::default());

        app.clone()
            .oneshot(post(
                "/v1/basic_register",
                None,
                json!({ "email": "eve@example.com", "password": "password123" }),
            ))
            .await
            .unwrap();

        let wrong_password = app
            .clone()
            .oneshot(post(
                "/v1/basic_login",
                None,
                json!({ "email": "eve@example.com", "password": "password124" }),
            ))
            .await
            .unwrap();
        let unknown_user = app
            .oneshot(post(
                "/v1/basic_login",
                None,
                json!({ "email": "nobody@example.com", "password": "password123" }),
            ))
            .await
            .unwrap();

        assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(unknown_user.status(), StatusCode::UNAUTHORIZED);

        let wrong_password = json_body(wrong_password).await;
        let unknown_user = json_body(unknown_user).await;
        assert_eq!(wrong_password, unknown_user);
        assert_eq!(wrong_password["code"], "INVALID_CREDENTIALS");
    }

    #[tokio::test]
    async fn test_basic_register_validates_input() {
        let (app, _) = app(MemoryUsers::default());

        let bad_email = app
            .clone()
            .oneshot(post(
                "/v1/basic_register",
                None,
                json!({ "email": "not-an-email", "password": "password123" }),
            ))
            .await
            .unwrap();
        assert_eq!(bad_email.status(), StatusCode::BAD_REQUEST);

        let short_password = app
            .oneshot(post(
                "/v1/basic_register",
                None,
                json!({ "email": "short@example.com", "password": "short" }),
            ))
            .await
            .unwrap();
        assert_eq!(short_password.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_malformed_body_is_structured_error() {
        let (app, _) = app(MemoryUsers::default());

        let request = Request::post("/v1/basic_login")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{\"email\":"))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["code"], "INVALID_ARGUMENT");

        let response = app
            .oneshot(post(
                "/v1/basic_register",
                None,
                json!({ "email": "x@example.com" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["code"], "INVALID_ARGUMENT");
    }

    #[tokio::test]
    async fn test_user_creds_only_routed_with_auth_disabled() {
        let (app, _) = app(MemoryUsers::default());
        let response = app
            .oneshot(post("/v1/auth_test/user_creds", None, json!({})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let users = MemoryUsers::default();
        let config = AuthConfig {
            auth_disabled: true,
            ..config()
        };
        let tokens = Arc::new(TokenService::from_config(&config));
        let app = auth_router_generic(users.clone(), tokens.clone(), Arc::new(config));

        let first = app
            .clone()
            .oneshot(post("/v1/auth_test/user_creds", None, json!({})))
            .await
            .unwrap();
        assert_eq!(first.status(), StatusCode::OK);
        let first = json_body(first).await;
        assert_eq!(first["name"], TEST_USER_IDENTIFIER);

        let claims = tokens.validate(first["token"].as_str().unwrap()).unwrap();
        assert_eq!(claims.role, Role::Standard);
        assert_eq!(claims.id.to_string(), first["id"].as_str().unwrap());

        let second = app
            .oneshot(post("/v1/auth_test/user_creds", None, json!({})))
            .await
            .unwrap();
        assert_eq!(json_body(second).await["id"], first["id"]);
        assert_eq!(users.len(), 1);
    }
}

#[cfg(test)]
mod middleware_tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use axum::routing::get;
    use axum::{Extension, Router, middleware};
    use tower::ServiceExt;

    use crate::application::token_service::TokenService;
    use crate::domain::entity::claims::Claims;
    use crate::domain::value_object::{UserId, role::Role};
    use crate::presentation::middleware::{AuthGate, at_least_worker, require_auth};

    async fn whoami(Extension(claims): Extension<Claims>) -> String {
        format!("{}:{}", claims.id, claims.role)
    }

    fn guarded(gate: AuthGate) -> Router {
        Router::new()
            .route("/whoami", get(whoami))
            .layer(middleware::from_fn_with_state(gate, require_auth))
    }

    fn request(authorization: Option<&str>) -> Request<Body> {
        let mut builder = Request::get("/whoami");
        if let Some(value) = authorization {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_claims_reach_handler() {
        let tokens = Arc::new(TokenService::new(b"layer-secret", None));
        let id = UserId::new();
        let token = tokens.issue(id, Role::Worker).unwrap();
        let app = guarded(AuthGate::new(tokens, false).with_predicate(at_least_worker));

        let response = app
            .oneshot(request(Some(&format!("Bearer {token}"))))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(body, format!("{id}:worker").as_bytes());
    }

    #[tokio::test]
    async fn test_rejections_are_unauthorized() {
        let tokens = Arc::new(TokenService::new(b"layer-secret", None));
        let standard = tokens.issue(UserId::new(), Role::Standard).unwrap();
        let app = guarded(AuthGate::new(tokens, false).with_predicate(at_least_worker));

        for authorization in [None, Some("garbage"), Some(standard.as_str())] {
            let response = app.clone().oneshot(request(authorization)).await.unwrap();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        }
    }

    #[tokio::test]
    async fn test_kill_switch_attaches_development_claims() {
        let tokens = Arc::new(TokenService::new(b"layer-secret", None));
        let app = guarded(AuthGate::new(tokens, true).with_predicate(at_least_worker));

        let response = app.oneshot(request(None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(body, format!("{}:admin", UserId::nil()).as_bytes());
    }
}
