//! API route handlers.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use std::sync::Arc;
use tracing::error;

use crate::services::{ResultsService, RunnersService, ServiceError};
use crate::types::{ErrorResponse, HealthResponse, RaceResult, Runner};

/// Application state shared across handlers.
pub struct AppState {
    pub runners: RunnersService,
    pub results: ResultsService,
}

/// Error type for API handlers.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.into(),
        }
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: msg.into(),
        }
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: msg.into(),
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::InvalidInput(msg) => Self::bad_request(msg),
            ServiceError::NotFound(msg) => Self::not_found(msg),
            ServiceError::Internal(msg) => {
                error!("Data integrity error: {}", msg);
                Self::internal(msg)
            }
            ServiceError::Store(e) => {
                error!("Database error: {:#}", e);
                Self::internal(format!("{:#}", e))
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorResponse {
            error: self.status.to_string(),
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

/// Build the API router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(
            "/runner",
            post(create_runner).put(update_runner).get(get_runners),
        )
        .route("/runner/{id}", get(get_runner).delete(delete_runner))
        .route("/result", post(create_result))
        .route("/result/{id}", delete(delete_result))
        .with_state(state)
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

pub async fn create_runner(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Runner>, JsonRejection>,
) -> Result<Json<Runner>, ApiError> {
    let Json(runner) = payload?;
    Ok(Json(state.runners.create_runner(runner)?))
}

pub async fn update_runner(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Runner>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Json(runner) = payload?;
    state.runners.update_runner(runner)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_runner(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.runners.delete_runner(&id)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn get_runner(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Runner>, ApiError> {
    Ok(Json(state.runners.get_runner(&id)?))
}

pub async fn get_runners(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Runner>>, ApiError> {
    Ok(Json(state.runners.get_runners()?))
}

pub async fn create_result(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RaceResult>, JsonRejection>,
) -> Result<Json<RaceResult>, ApiError> {
    let Json(result) = payload?;
    Ok(Json(state.results.create_result(result)?))
}

pub async fn delete_result(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.results.delete_result(&id)?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::FixedClock;
    use crate::storage::Database;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request};
    use serde::de::DeserializeOwned;
    use serde_json::json;
    use tower::util::ServiceExt;

    fn test_app() -> Router {
        let db = Arc::new(Database::in_memory().unwrap());
        let state = Arc::new(AppState {
            runners: RunnersService::new(db.clone()),
            results: ResultsService::new(db, Arc::new(FixedClock(2024))),
        });
        router(state)
    }

    fn json_request(method: Method, uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn empty_request(method: Method, uri: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    async fn send(app: &Router, req: Request<Body>) -> Response {
        app.clone().oneshot(req).await.unwrap()
    }

    async fn read_json<T: DeserializeOwned>(resp: Response) -> T {
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn create_test_runner(app: &Router) -> Runner {
        let resp = send(
            app,
            json_request(Method::POST, "/runner", json!({"name": "Runner One"})),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        read_json(resp).await
    }

    async fn post_result(app: &Router, body: serde_json::Value) -> Response {
        send(app, json_request(Method::POST, "/result", body)).await
    }

    async fn fetch_runner(app: &Router, id: &str) -> Runner {
        let resp = send(app, empty_request(Method::GET, &format!("/runner/{}", id))).await;
        assert_eq!(resp.status(), StatusCode::OK);
        read_json(resp).await
    }

    #[tokio::test]
    async fn test_health() {
        let app = test_app();
        let resp = send(&app, empty_request(Method::GET, "/health")).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: serde_json::Value = read_json(resp).await;
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_best_time_scenario_over_http() {
        let app = test_app();
        let runner = create_test_runner(&app).await;

        let resp = post_result(
            &app,
            json!({"runner_id": runner.id, "race_result": "01:30:00",
                   "location": "Boston", "position": 5, "year": 2024}),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let r = fetch_runner(&app, &runner.id).await;
        assert_eq!(r.personal_best, "01:30:00");
        assert_eq!(r.season_best, "01:30:00");

        let resp = post_result(
            &app,
            json!({"runner_id": runner.id, "race_result": "01:25:00",
                   "location": "NYC", "position": 3, "year": 2024}),
        )
        .await;
        let nyc: RaceResult = read_json(resp).await;
        assert_eq!(nyc.location, "NYC");

        let resp = post_result(
            &app,
            json!({"runner_id": runner.id, "race_result": "01:40:00",
                   "location": "Chicago", "position": 10, "year": 2023}),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);

        let r = fetch_runner(&app, &runner.id).await;
        assert_eq!(r.personal_best, "01:25:00");
        assert_eq!(r.season_best, "01:25:00");
        assert_eq!(r.results.len(), 3);

        let resp = send(
            &app,
            empty_request(Method::DELETE, &format!("/result/{}", nyc.id)),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);

        let r = fetch_runner(&app, &runner.id).await;
        assert_eq!(r.personal_best, "01:30:00");
        assert_eq!(r.season_best, "01:30:00");
        assert_eq!(r.results.len(), 2);
    }

    #[tokio::test]
    async fn test_empty_race_result_is_bad_request() {
        let app = test_app();
        let runner = create_test_runner(&app).await;

        let resp = post_result(
            &app,
            json!({"runner_id": runner.id, "race_result": "",
                   "location": "Boston", "position": 5, "year": 2024}),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: ErrorResponse = read_json(resp).await;
        assert_eq!(body.message, "Invalid race result");

        let r = fetch_runner(&app, &runner.id).await;
        assert!(r.results.is_empty());
        assert!(r.personal_best.is_empty());
    }

    #[tokio::test]
    async fn test_result_for_unknown_runner_is_not_found() {
        let app = test_app();
        let resp = post_result(
            &app,
            json!({"runner_id": "ghost", "race_result": "01:30:00",
                   "location": "Boston", "position": 5, "year": 2024}),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_malformed_json_is_bad_request() {
        let app = test_app();
        let req = Request::builder()
            .method(Method::POST)
            .uri("/result")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let resp = send(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_runner_crud() {
        let app = test_app();
        let runner = create_test_runner(&app).await;

        let resp = send(
            &app,
            json_request(
                Method::PUT,
                "/runner",
                json!({"id": runner.id, "name": "Renamed", "country": "NOR"}),
            ),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
        assert_eq!(fetch_runner(&app, &runner.id).await.name, "Renamed");

        let resp = send(&app, empty_request(Method::GET, "/runner")).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let all: Vec<Runner> = read_json(resp).await;
        assert_eq!(all.len(), 1);

        let resp = send(
            &app,
            empty_request(Method::DELETE, &format!("/runner/{}", runner.id)),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
        assert!(!fetch_runner(&app, &runner.id).await.is_active);
    }

    #[tokio::test]
    async fn test_missing_runner_and_result() {
        let app = test_app();

        let resp = send(&app, empty_request(Method::GET, "/runner/nope")).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: ErrorResponse = read_json(resp).await;
        assert_eq!(body.error, "404 Not Found");
        assert_eq!(body.message, "Runner not found");

        let resp = send(&app, empty_request(Method::DELETE, "/result/nope")).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_service_error_status_mapping() {
        let cases = [
            (ServiceError::invalid("x"), StatusCode::BAD_REQUEST),
            (ServiceError::not_found("x"), StatusCode::NOT_FOUND),
            (
                ServiceError::Internal("x".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                ServiceError::Store(anyhow::anyhow!("disk full")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status, status);
        }
    }
}
