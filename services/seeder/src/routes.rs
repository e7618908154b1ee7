//! Seeder service routes

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, Method, StatusCode},
    middleware,
    response::IntoResponse,
    routing::{any, get},
};
use serde::Serialize;
use serde_json::json;
use tracing::{error, info};

use crate::{
    auth, cors,
    error::{SeedError, UserSeedError},
    models::{Collection, User},
    seed::{self, Scenario, SeedPlan},
    state::AppState,
    upsert::{Upserter, WriteMode},
};

/// Response of the multi-entity seed
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedResponse {
    pub ok: bool,
    pub seeded: bool,
    pub actor_uid: String,
}

/// Response of the single-user seed
#[derive(Debug, Serialize)]
pub struct UserSeedResponse {
    pub ok: bool,
    pub path: String,
    pub data: User,
}

/// Create the router for the seeder service
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/seed_nyc_demo", any(seed_nyc_demo))
        .route("/seed_user_doc", any(seed_user_doc))
        .layer(middleware::from_fn(cors::cors_middleware))
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let backend = state.store.backend();
    match state.store.health_check().await {
        Ok(true) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "service": "seeder-service",
                "store": backend,
            })),
        ),
        Ok(false) | Err(_) => {
            error!("Document store health check failed for {}", backend);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "unavailable",
                    "service": "seeder-service",
                    "store": backend,
                })),
            )
        }
    }
}

/// Seed the NYC demo: users, questions, a waiting room, a live room with
/// its game session, and every user as a paid participant of both rooms
pub async fn seed_nyc_demo(
    State(state): State<AppState>,
    method: Method,
    headers: HeaderMap,
) -> Result<Json<SeedResponse>, SeedError> {
    if method != Method::POST {
        return Err(SeedError::MethodNotAllowed);
    }

    let actor = auth::authenticate(&headers, state.identity.as_ref()).await?;

    let plan = SeedPlan::for_scenarios(&Scenario::ALL, &state.demo_keys, state.clock.now());
    plan.validate().map_err(|e| {
        error!("Refusing to seed inconsistent plan: {}", e);
        SeedError::from(e)
    })?;

    let report = Upserter::new(state.store.as_ref())
        .apply(&plan)
        .await
        .map_err(|e| {
            error!("seed_nyc_demo failed: {}", e);
            e
        })?;

    info!(
        "NYC demo seeded by {} ({} created, {} skipped): {}",
        actor.uid,
        report.total_created(),
        report.total_skipped(),
        report
    );

    Ok(Json(SeedResponse {
        ok: true,
        seeded: true,
        actor_uid: actor.uid,
    }))
}

/// Merge the fixed seed profile into `users/{uid}` for an existing account
pub async fn seed_user_doc(
    State(state): State<AppState>,
) -> Result<Json<UserSeedResponse>, UserSeedError> {
    let uid = state.demo_keys.seed_account_uid.as_str();

    let exists = state.identity.account_exists(uid).await.map_err(|e| {
        error!("Failed to look up account {}: {}", uid, e);
        SeedError::IdentityUnavailable(e.to_string())
    })?;
    if !exists {
        return Err(SeedError::AccountNotFound(uid.to_string()).into());
    }

    let data = seed::seed_profile(uid, state.clock.now());
    let document = serde_json::to_value(&data).map_err(common::error::StoreError::from)?;

    Upserter::new(state.store.as_ref())
        .upsert(Collection::Users, uid, &document, WriteMode::Merge)
        .await
        .map_err(|e| {
            error!("seed_user_doc failed: {}", e);
            e
        })?;

    info!("Seed profile merged into users/{}", uid);

    Ok(Json(UserSeedResponse {
        ok: true,
        path: format!("{}/{}", Collection::Users, uid),
        data,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        fixtures::{DEFAULT_SEED_ACCOUNT_UID, DemoKeys},
        identity::tests::{TEST_SECRET, sign, test_provider},
        state::Clock,
    };
    use async_trait::async_trait;
    use axum::{
        body::Body,
        http::{Request, header},
    };
    use chrono::{TimeZone, Utc};
    use common::{
        error::{StoreError, StoreResult},
        store::{DocumentStore, MemoryDocumentStore, SetOptions},
    };
    use http_body_util::BodyExt;
    use serde_json::Value;
    use std::collections::HashSet;
    use std::sync::Arc;
    use tower::ServiceExt;

    struct TestApp {
        store: MemoryDocumentStore,
        router: Router,
    }

    fn app_with(
        store: Arc<dyn DocumentStore>,
        memory: MemoryDocumentStore,
        clock: Clock,
    ) -> TestApp {
        let state = AppState {
            store,
            identity: Arc::new(test_provider(&[DEFAULT_SEED_ACCOUNT_UID])),
            demo_keys: Arc::new(DemoKeys::default()),
            clock,
        };
        TestApp {
            store: memory,
            router: create_router(state),
        }
    }

    fn app() -> TestApp {
        let memory = MemoryDocumentStore::new();
        app_with(Arc::new(memory.clone()), memory, Clock::System)
    }

    async fn send(router: &Router, request: Request<Body>) -> (StatusCode, HeaderMap, Vec<u8>) {
        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.into_body().collect().await.unwrap().to_bytes().to_vec();
        (status, headers, body)
    }

    fn json_body(body: &[u8]) -> Value {
        serde_json::from_slice(body).unwrap()
    }

    fn seed_request(method: Method, authorization: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri("/seed_nyc_demo");
        if let Some(value) = authorization {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        builder.body(Body::empty()).unwrap()
    }

    fn valid_auth() -> String {
        format!("Bearer {}", sign("admin-uid", 600, TEST_SECRET))
    }

    fn assert_cors(headers: &HeaderMap) {
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert_eq!(
            headers[header::ACCESS_CONTROL_ALLOW_METHODS],
            "GET, POST, OPTIONS"
        );
        assert_eq!(
            headers[header::ACCESS_CONTROL_ALLOW_HEADERS],
            "Content-Type, Authorization"
        );
    }

    #[tokio::test]
    async fn test_seed_creates_both_scenarios() {
        let app = app();
        let auth = valid_auth();

        let (status, headers, body) =
            send(&app.router, seed_request(Method::POST, Some(&auth))).await;

        assert_eq!(status, StatusCode::OK);
        assert_cors(&headers);
        assert_eq!(
            json_body(&body),
            json!({"ok": true, "seeded": true, "actorUid": "admin-uid"})
        );

        let store = &app.store;
        assert_eq!(store.count("users").await, 6);
        assert_eq!(store.count("questions").await, 8);
        assert_eq!(store.count("rooms").await, 2);
        assert_eq!(store.count("gameSessions").await, 1);
        assert_eq!(store.count("roomParticipants").await, 12);

        let rooms = store.documents("rooms").await;
        let statuses: HashSet<&str> = rooms
            .iter()
            .map(|(_, room)| room["status"].as_str().unwrap())
            .collect();
        assert_eq!(statuses, HashSet::from(["waiting", "inProgress"]));

        let (_, session) = &store.documents("gameSessions").await[0];
        assert_eq!(session["gameState"], "question");
        assert_eq!(session["currentQuestionIndex"], 0);
        assert_eq!(session["roomId"], "nyc_mixer_live");

        assert!(
            store
                .documents("roomParticipants")
                .await
                .iter()
                .all(|(_, p)| p["status"] == "paid")
        );
    }

    #[tokio::test]
    async fn test_seed_is_idempotent() {
        let app = app();
        let auth = valid_auth();

        let (status, _, _) = send(&app.router, seed_request(Method::POST, Some(&auth))).await;
        assert_eq!(status, StatusCode::OK);
        let after_first = app.store.snapshot().await;
        let writes_after_first = app.store.stats().writes;

        let (status, _, _) = send(&app.router, seed_request(Method::POST, Some(&auth))).await;
        assert_eq!(status, StatusCode::OK);

        assert_eq!(app.store.snapshot().await, after_first);
        assert_eq!(app.store.stats().writes, writes_after_first);
    }

    #[tokio::test]
    async fn test_seeded_references_resolve() {
        let app = app();
        let auth = valid_auth();
        send(&app.router, seed_request(Method::POST, Some(&auth))).await;

        let store = &app.store;
        for (_, room) in store.documents("rooms").await {
            let host = room["hostId"].as_str().unwrap();
            assert!(store.get("users", host).await.unwrap().is_some());
            for question in room["questionIds"].as_array().unwrap() {
                let question = question.as_str().unwrap();
                assert!(store.get("questions", question).await.unwrap().is_some());
            }
        }
        for (_, session) in store.documents("gameSessions").await {
            let room = store
                .get("rooms", session["roomId"].as_str().unwrap())
                .await
                .unwrap()
                .unwrap();
            assert_eq!(room["status"], "inProgress");
        }
        for (id, participant) in store.documents("roomParticipants").await {
            let room_id = participant["roomId"].as_str().unwrap();
            let user_id = participant["userId"].as_str().unwrap();
            assert_eq!(id, format!("{}:{}", room_id, user_id));
            assert!(store.get("rooms", room_id).await.unwrap().is_some());
            assert!(store.get("users", user_id).await.unwrap().is_some());
        }
    }

    #[tokio::test]
    async fn test_seed_does_not_overwrite_existing_records() {
        let app = app();
        app.store
            .set(
                "users",
                "u_nyc_lena",
                &json!({"id": "u_nyc_lena", "username": "Lena (edited)"}),
                SetOptions::replace(),
            )
            .await
            .unwrap();

        let auth = valid_auth();
        let (status, _, _) = send(&app.router, seed_request(Method::POST, Some(&auth))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            app.store.get("users", "u_nyc_lena").await.unwrap(),
            Some(json!({"id": "u_nyc_lena", "username": "Lena (edited)"}))
        );
        assert_eq!(app.store.count("users").await, 6);
    }

    #[tokio::test]
    async fn test_no_session_for_room_that_is_not_in_progress() {
        let app = app();
        app.store
            .set(
                "rooms",
                "nyc_mixer_live",
                &json!({"id": "nyc_mixer_live", "status": "completed"}),
                SetOptions::replace(),
            )
            .await
            .unwrap();

        let auth = valid_auth();
        let (status, _, _) = send(&app.router, seed_request(Method::POST, Some(&auth))).await;

        assert_eq!(status, StatusCode::OK);
        let room = app.store.get("rooms", "nyc_mixer_live").await.unwrap().unwrap();
        assert_eq!(room["status"], "completed");
        assert_eq!(app.store.count("gameSessions").await, 0);
    }

    #[tokio::test]
    async fn test_missing_bearer_token() {
        let app = app();

        let (status, headers, body) = send(&app.router, seed_request(Method::POST, None)).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_cors(&headers);
        assert_eq!(json_body(&body), json!({"error": "Missing bearer token"}));
        assert_eq!(app.store.total().await, 0);
    }

    #[tokio::test]
    async fn test_invalid_bearer_token() {
        let app = app();

        let (status, _, body) =
            send(&app.router, seed_request(Method::POST, Some("Bearer garbage"))).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        let body = json_body(&body);
        assert_eq!(body, json!({"error": "Invalid token"}));
        assert!(!body.to_string().contains("garbage"));
        assert_eq!(app.store.total().await, 0);
    }

    #[tokio::test]
    async fn test_wrong_method() {
        let app = app();
        let auth = valid_auth();

        let (status, headers, body) =
            send(&app.router, seed_request(Method::GET, Some(&auth))).await;

        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_cors(&headers);
        assert_eq!(json_body(&body), json!({"error": "Method not allowed"}));
        assert_eq!(app.store.total().await, 0);
    }

    #[tokio::test]
    async fn test_preflight_on_both_endpoints() {
        let app = app();

        for uri in ["/seed_nyc_demo", "/seed_user_doc"] {
            let request = Request::builder()
                .method(Method::OPTIONS)
                .uri(uri)
                .body(Body::empty())
                .unwrap();
            let (status, headers, body) = send(&app.router, request).await;

            assert_eq!(status, StatusCode::NO_CONTENT);
            assert_cors(&headers);
            assert!(body.is_empty());
        }

        assert_eq!(app.store.total().await, 0);
        assert_eq!(app.store.stats().reads, 0);
    }

    fn user_doc_request(method: Method) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri("/seed_user_doc")
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn test_seed_user_doc_merges() {
        let memory = MemoryDocumentStore::new();
        let now = Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap();
        let app = app_with(Arc::new(memory.clone()), memory, Clock::Fixed(now));

        app.store
            .set(
                "users",
                DEFAULT_SEED_ACCOUNT_UID,
                &json!({"id": DEFAULT_SEED_ACCOUNT_UID, "username": "stale", "bio": "old bio"}),
                SetOptions::replace(),
            )
            .await
            .unwrap();

        let (status, headers, first) = send(&app.router, user_doc_request(Method::POST)).await;
        assert_eq!(status, StatusCode::OK);
        assert_cors(&headers);

        let first = json_body(&first);
        assert_eq!(first["ok"], true);
        assert_eq!(first["path"], format!("users/{}", DEFAULT_SEED_ACCOUNT_UID));
        assert_eq!(first["data"]["username"], "citygirl");
        assert_eq!(first["data"]["email"], "seed@demo.local");
        assert!(first["data"]["bio"].is_null());

        let stored = app.store.get("users", DEFAULT_SEED_ACCOUNT_UID).await.unwrap();
        assert_eq!(stored.as_ref(), Some(&first["data"]));

        // No method check on this endpoint
        let (status, _, second) = send(&app.router, user_doc_request(Method::GET)).await;
        assert_eq!(status, StatusCode::OK);
        let second = json_body(&second);
        assert_eq!(second["data"], first["data"]);

        let stored = app.store.get("users", DEFAULT_SEED_ACCOUNT_UID).await.unwrap();
        assert_eq!(stored.as_ref(), Some(&second["data"]));
        assert_eq!(app.store.count("users").await, 1);
    }

    #[tokio::test]
    async fn test_seed_user_doc_requires_account() {
        let memory = MemoryDocumentStore::new();
        let state = AppState {
            store: Arc::new(memory.clone()),
            identity: Arc::new(test_provider(&[])),
            demo_keys: Arc::new(DemoKeys::default()),
            clock: Clock::System,
        };
        let router = create_router(state);

        let (status, headers, body) = send(&router, user_doc_request(Method::POST)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_cors(&headers);
        assert_eq!(
            json_body(&body),
            json!({
                "ok": false,
                "error": format!("Auth user not found for UID {}", DEFAULT_SEED_ACCOUNT_UID),
            })
        );
        assert_eq!(memory.total().await, 0);
    }

    /// Store that fails every call after `healthy_writes` successful writes
    struct FlakyStore {
        inner: MemoryDocumentStore,
        healthy_writes: usize,
    }

    #[async_trait]
    impl DocumentStore for FlakyStore {
        fn backend(&self) -> &'static str {
            "flaky"
        }

        async fn get(&self, collection: &str, id: &str) -> StoreResult<Option<Value>> {
            self.inner.get(collection, id).await
        }

        async fn set(
            &self,
            collection: &str,
            id: &str,
            document: &Value,
            options: SetOptions,
        ) -> StoreResult<()> {
            if self.inner.stats().writes >= self.healthy_writes {
                return Err(StoreError::Connection("connection reset".to_string()));
            }
            self.inner.set(collection, id, document, options).await
        }

        async fn health_check(&self) -> StoreResult<bool> {
            Ok(false)
        }
    }

    #[tokio::test]
    async fn test_store_failure_halts_and_rerun_completes() {
        let memory = MemoryDocumentStore::new();
        let flaky = FlakyStore {
            inner: memory.clone(),
            healthy_writes: 10,
        };
        let failing = app_with(Arc::new(flaky), memory.clone(), Clock::System);
        let auth = valid_auth();

        let (status, headers, body) =
            send(&failing.router, seed_request(Method::POST, Some(&auth))).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_cors(&headers);
        assert_eq!(
            json_body(&body),
            json!({"error": "Store connection error: connection reset"})
        );
        // Earlier writes stay in place
        assert_eq!(memory.total().await, 10);
        assert_eq!(memory.count("users").await, 6);

        let healthy = app_with(Arc::new(memory.clone()), memory.clone(), Clock::System);
        let (status, _, _) = send(&healthy.router, seed_request(Method::POST, Some(&auth))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(memory.total().await, 29);
    }

    #[tokio::test]
    async fn test_seed_user_doc_store_failure() {
        let memory = MemoryDocumentStore::new();
        let flaky = FlakyStore {
            inner: memory.clone(),
            healthy_writes: 0,
        };
        let app = app_with(Arc::new(flaky), memory, Clock::System);

        let (status, _, body) = send(&app.router, user_doc_request(Method::POST)).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            json_body(&body),
            json!({"ok": false, "error": "Store connection error: connection reset"})
        );
    }

    #[tokio::test]
    async fn test_health_check() {
        let app = app();
        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let (status, _, body) = send(&app.router, request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            json_body(&body),
            json!({"status": "ok", "service": "seeder-service", "store": "memory"})
        );

        let memory = MemoryDocumentStore::new();
        let flaky = FlakyStore {
            inner: memory.clone(),
            healthy_writes: 0,
        };
        let unhealthy = app_with(Arc::new(flaky), memory, Clock::System);
        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let (status, _, _) = send(&unhealthy.router, request).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }
}
