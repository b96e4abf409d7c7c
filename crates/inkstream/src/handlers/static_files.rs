//! Static file serving handler for JavaScript/CSS assets.

use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, Response, StatusCode},
    response::IntoResponse,
};
use std::fs;

use crate::state::AppState;

/// Serve static files from the configured assets directory.
pub async fn serve_static(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> impl IntoResponse {
    // Reject anything trying to step out of the assets directory
    if filename.contains("..") {
        return not_found();
    }

    let file_path = state.assets_dir.join(&filename);

    match fs::read(&file_path) {
        Ok(contents) => {
            let content_type = if filename.ends_with(".js") {
                "application/javascript; charset=utf-8"
            } else if filename.ends_with(".css") {
                "text/css; charset=utf-8"
            } else if filename.ends_with(".map") {
                "application/json"
            } else {
                "application/octet-stream"
            };

            // Hashed filenames never change content; cache them hard
            let is_hashed = filename.contains('-') && !filename.ends_with(".map");
            let cache_control = if is_hashed {
                "public, max-age=31536000, immutable"
            } else {
                "public, max-age=3600"
            };

            Response::builder()
                .status(StatusCode::OK)
                .header(header::CONTENT_TYPE, content_type)
                .header(header::CACHE_CONTROL, cache_control)
                .body(Body::from(contents))
                .unwrap()
        }
        Err(_) => not_found(),
    }
}

fn not_found() -> Response<Body> {
    Response::builder()
        .status(StatusCode::NOT_FOUND)
        .body(Body::from("Not found"))
        .unwrap()
}
