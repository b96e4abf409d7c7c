//! Streaming SSR page handler.
//!
//! Classifies the requester, submits the render, and streams the
//! style-injected document back. When the render cannot produce a
//! document, the client-side fallback page ships the bundle and lets the
//! browser render instead.

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, StatusCode, Uri},
    response::{Html, IntoResponse, Response},
};
use tokio_stream::StreamExt;

use inkstream_core::{ready_path, RenderConfig};
use inkstream_ssr::{respond, sanitize_error, RenderError};

use crate::state::AppState;

/// SSR handler for every document request.
pub async fn render_page(
    State(state): State<AppState>,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    let user_agent = headers
        .get(header::USER_AGENT)
        .and_then(|value| value.to_str().ok());
    let path = ready_path(user_agent, state.prerender);

    let Some(pool) = state.pool.clone() else {
        tracing::error!("render pool not initialized");
        return Html(fallback_html(
            "Rendering not available",
            &state.client_bundle_url,
            uri.path(),
        ))
        .into_response();
    };

    let config = match RenderConfig::new(serde_json::json!({
        "url": uri.to_string(),
        "clientBundleUrl": state.client_bundle_url,
        "prerender": state.prerender,
    })) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "failed to create render config");
            return Html(fallback_html(
                &sanitize_error(&RenderError::Core(e)),
                &state.client_bundle_url,
                uri.path(),
            ))
            .into_response();
        }
    };

    let handle = match pool.render_stream(config).await {
        Ok(handle) => handle,
        Err(RenderError::Overloaded { retry_after_secs }) => {
            return (
                StatusCode::SERVICE_UNAVAILABLE,
                [("Retry-After", retry_after_secs.to_string())],
                Html(fallback_html(
                    &sanitize_error(&RenderError::Overloaded { retry_after_secs }),
                    &state.client_bundle_url,
                    uri.path(),
                )),
            )
                .into_response();
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to submit render");
            return Html(fallback_html(
                &sanitize_error(&e),
                &state.client_bundle_url,
                uri.path(),
            ))
            .into_response();
        }
    };

    match respond(handle, path, state.timings).await {
        Ok(response) => {
            let stream = response.body.map(Ok::<_, std::convert::Infallible>);
            Response::builder()
                .status(
                    StatusCode::from_u16(response.status)
                        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
                )
                .header(header::CONTENT_TYPE, "text/html; charset=utf-8")
                .body(Body::from_stream(stream))
                .unwrap()
        }
        Err(e) => {
            tracing::error!(error = %e, "render failed before commit");
            Html(fallback_html(
                &sanitize_error(&e),
                &state.client_bundle_url,
                uri.path(),
            ))
            .into_response()
        }
    }
}

/// Generate the client-side fallback page.
///
/// Served when no server-rendered document can be produced: shows the
/// error with a retry button and hands the client bundle the data it needs
/// to render in the browser instead.
fn fallback_html(error: &str, client_bundle_url: &str, url: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <title>inkstream</title>
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <style>
        .error-container {{
            display: flex;
            flex-direction: column;
            align-items: center;
            justify-content: center;
            min-height: 100vh;
            padding: 2rem;
            text-align: center;
        }}
        .error-message {{ color: #dc2626; margin-bottom: 1rem; }}
        .retry-button {{
            padding: 0.75rem 1.5rem;
            background: #3b82f6;
            color: white;
            border: none;
            border-radius: 0.5rem;
            cursor: pointer;
        }}
    </style>
</head>
<body>
    <div class="error-container" id="error">
        <h1>Unable to render this page</h1>
        <p class="error-message">{error}</p>
        <button class="retry-button" onclick="location.reload()">Retry</button>
    </div>
    <!-- Fallback: try client-side render -->
    <div id="root" style="display:none"></div>
    <script>
        window.__INKSTREAM_DATA__ = {{
            url: "{url}",
            clientBundleUrl: "{client_bundle_url}"
        }};
    </script>
    <script type="module" src="{client_bundle_url}"></script>
    <script>
        // If the client bundle takes over, hide the error and show the app
        window.addEventListener('load', () => {{
            if (window.__INKSTREAM_HYDRATED__) {{
                document.getElementById('error').style.display = 'none';
                document.getElementById('root').style.display = 'block';
            }}
        }});
    </script>
</body>
</html>"#
    )
}
