//! Router configuration for the API.
//!
//! Centralizes route registration, the OpenAPI document and the middleware
//! stack.

use std::time::Duration;

use axum::{Router, middleware};
use tower_http::{compression::CompressionLayer, timeout::TimeoutLayer};
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::ApiDoc;
use crate::api::handlers;
use crate::api::middleware::{logging_middleware, request_id_middleware};
use crate::config::ServerConfig;
use crate::state::AppState;

pub const SWAGGER_UI_PATH: &str = "/swagger-ui";
pub const OPENAPI_JSON_PATH: &str = "/api-docs/openapi.json";

/// Creates the main application router with all routes and middleware.
///
/// # Middleware Order
/// Layers run outermost first:
/// 1. Request ID - generates/propagates request IDs
/// 2. Logging - logs requests with their request ID
/// 3. Compression
/// 4. Timeout - bounded by `server.request_timeout` seconds
///
/// # Routes
/// - `/employees`, `/employees/{id}` - Employee CRUD
/// - `/health`, `/health/ready`, `/health/live` - Health checks
/// - `/swagger-ui` - Swagger UI over `/api-docs/openapi.json`
pub fn create_router(state: AppState, server: &ServerConfig) -> Router {
    let (router, openapi) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .merge(handlers::employees::employee_routes())
        .merge(handlers::health::health_routes())
        .split_for_parts();

    router
        .merge(SwaggerUi::new(SWAGGER_UI_PATH).url(OPENAPI_JSON_PATH, openapi))
        .layer(TimeoutLayer::new(Duration::from_secs(server.request_timeout)))
        .layer(CompressionLayer::new())
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    fn app() -> Router {
        create_router(AppState::in_memory(), &ServerConfig::default())
    }

    #[tokio::test]
    async fn test_openapi_document_lists_employee_paths() {
        let response = app()
            .oneshot(Request::get(OPENAPI_JSON_PATH).body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let doc: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert!(doc["paths"]["/employees"].is_object());
        assert!(doc["paths"]["/employees/{id}"]["put"].is_object());
        assert!(doc["paths"]["/health"].is_object());
    }

    #[tokio::test]
    async fn test_unknown_route_is_not_found() {
        let response = app()
            .oneshot(Request::get("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_responses_carry_request_id() {
        let response = app()
            .oneshot(Request::get("/health/live").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert!(
            response
                .headers()
                .contains_key(crate::api::middleware::REQUEST_ID_HEADER)
        );
    }
}
