use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

use crate::{
    handlers::{
        health::{healthz, livez, readyz},
        page::render_page,
        static_files::serve_static,
    },
    state::AppState,
};

/// Create the application router with all routes and middleware.
///
/// Every document path goes through the SSR handler; the bundle's own
/// router decides what the URL renders to.
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/livez", get(livez))
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .route("/dist/{*filename}", get(serve_static))
        .fallback(render_page)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
    };
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    async fn body_string(response: axum::response::Response) -> String {
        let body = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(body.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_livez_is_always_up() {
        let app = create_app(AppState::default());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/livez")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_healthz_without_pool_is_unavailable() {
        let app = create_app(AppState::default());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/healthz")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body = body_string(response).await;
        assert!(body.contains("render pool not initialized"));
    }

    #[tokio::test]
    async fn test_readyz_without_pool_is_unavailable() {
        let app = create_app(AppState::default());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/readyz")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body = body_string(response).await;
        assert!(body.contains("\"healthy\":false"));
    }

    #[tokio::test]
    async fn test_page_without_pool_serves_fallback() {
        let app = create_app(AppState::default());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/some/route")
                    .header(header::USER_AGENT, "Mozilla/5.0 (X11; Linux x86_64)")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_string(response).await;
        assert!(body.contains(r#"<div id="root""#));
        assert!(body.contains("/dist/client.js"));
        assert!(body.contains("Unable to render"));
    }

    #[tokio::test]
    async fn test_missing_asset_is_not_found() {
        let app = create_app(AppState::default());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/dist/no-such-bundle.js")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
