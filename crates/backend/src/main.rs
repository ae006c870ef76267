mod routing;

use std::path::Path;
use std::sync::Arc;

use axum::http::HeaderValue;
use axum::response::Html;
use axum::routing::{get, post};
use axum::Router;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use routing::RoutingState;

const CACHE_1DAY: &str = "public, max-age=86400, must-revalidate";
const CACHE_IMMUTABLE: &str = "public, max-age=31536000, immutable";

/// Build a cache-controlled static file router.
///
/// Separated so tests can exercise the caching layer with arbitrary directories.
fn cached_static_router(dir: &Path, cache_header: &'static str) -> Router {
    let layer = SetResponseHeaderLayer::overriding(
        axum::http::header::CACHE_CONTROL,
        HeaderValue::from_static(cache_header),
    );
    Router::new()
        .fallback_service(ServeDir::new(dir))
        .layer(layer)
}

/// Build the full application router.
fn build_app(routing: Arc<RoutingState>) -> Router {
    // Static file routers are stateless — merge them before adding app state
    let static_files = Router::new()
        .nest(
            "/dist",
            cached_static_router(Path::new("dist"), CACHE_IMMUTABLE),
        )
        .nest(
            "/assets",
            cached_static_router(Path::new("dist/assets"), CACHE_1DAY),
        );

    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/api/route", post(routing::route_handler))
        .route("/", get(serve_index))
        .with_state(routing)
        .merge(static_files)
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let routing = Arc::new(RoutingState::from_env());
    let app = build_app(routing);

    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let addr = format!("0.0.0.0:{}", port);
    info!("server listening on http://localhost:{}", port);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("failed to bind listen address");
    axum::serve(listener, app).await.expect("server error");
}

async fn serve_index() -> Html<String> {
    // Try to serve the built frontend, fall back to a plain message
    match std::fs::read_to_string("dist/index.html") {
        Ok(html) => Html(html),
        Err(_) => Html(
            r#"<!DOCTYPE html>
<html>
<head><title>LeakWatch</title></head>
<body>
<h1>LeakWatch</h1>
<p>Frontend not built yet. The route API lives at <code>POST /api/route</code>.</p>
</body>
</html>"#
                .to_string(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    /// Build a test app that serves files from the given temp directories.
    fn test_app(dist_dir: &Path, dist_assets_dir: &Path) -> Router {
        let routing = Arc::new(RoutingState::new("http://127.0.0.1:1".to_string()));
        Router::new()
            .route("/health", get(|| async { "OK" }))
            .route("/api/route", post(routing::route_handler))
            .with_state(routing)
            .nest("/dist", cached_static_router(dist_dir, CACHE_IMMUTABLE))
            .nest("/assets", cached_static_router(dist_assets_dir, CACHE_1DAY))
    }

    /// Create a temp dir with a test file and return the dir path.
    fn temp_dir_with_file(file_name: &str, content: &str) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(file_name), content).unwrap();
        dir
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let dist = temp_dir_with_file("index.html", "<html></html>");
        let assets = temp_dir_with_file("main.css", "body{}");
        let app = test_app(dist.path(), assets.path());

        let resp = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_dist_bundles_have_immutable_cache() {
        let dist = temp_dir_with_file("app-abc123.js", "bundle()");
        let assets = temp_dir_with_file("main.css", "body{}");
        let app = test_app(dist.path(), assets.path());

        let resp = app
            .oneshot(
                Request::builder()
                    .uri("/dist/app-abc123.js")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers().get("cache-control").unwrap(),
            "public, max-age=31536000, immutable"
        );
    }

    #[tokio::test]
    async fn test_asset_files_have_1day_cache() {
        let dist = temp_dir_with_file("index.html", "<html></html>");
        let assets = temp_dir_with_file("main.css", "body{}");
        let app = test_app(dist.path(), assets.path());

        let resp = app
            .oneshot(
                Request::builder()
                    .uri("/assets/main.css")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers().get("cache-control").unwrap(),
            "public, max-age=86400, must-revalidate"
        );
    }

    #[tokio::test]
    async fn test_missing_static_file_returns_404() {
        let dist = temp_dir_with_file("index.html", "<html></html>");
        let assets = temp_dir_with_file("main.css", "");
        let app = test_app(dist.path(), assets.path());

        let resp = app
            .oneshot(
                Request::builder()
                    .uri("/dist/nonexistent.js")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_route_endpoint_rejects_get() {
        let dist = temp_dir_with_file("index.html", "<html></html>");
        let assets = temp_dir_with_file("main.css", "");
        let app = test_app(dist.path(), assets.path());

        let resp = app
            .oneshot(
                Request::builder()
                    .uri("/api/route")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_route_endpoint_maps_provider_failure_to_502() {
        let dist = temp_dir_with_file("index.html", "<html></html>");
        let assets = temp_dir_with_file("main.css", "");
        // The test state points at an unroutable address, so the proxy call
        // fails immediately.
        let app = test_app(dist.path(), assets.path());

        let body = r#"{"origin":{"lat":13.06,"lng":80.25},"destination":{"lat":13.0,"lng":80.2}}"#;
        let resp = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/route")
                    .header("content-type", "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn test_route_endpoint_rejects_out_of_range_coordinates() {
        let dist = temp_dir_with_file("index.html", "<html></html>");
        let assets = temp_dir_with_file("main.css", "");
        let app = test_app(dist.path(), assets.path());

        let body = r#"{"origin":{"lat":113.0,"lng":80.25},"destination":{"lat":13.0,"lng":80.2}}"#;
        let resp = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/route")
                    .header("content-type", "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();
        // LatLng validation fails during deserialization.
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
