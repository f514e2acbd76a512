use crate::config::{RunMode, ServerConfig};
use crate::error::Result;
use anyhow::Context as _;
use axum::http::StatusCode;
use axum::{response::IntoResponse, routing::get, Json, Router};
use bookinv_app::{rest_api::api_router, state::AppState};
use futures::FutureExt;
use http::{header, HeaderValue, Method};
use serde::Serialize;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::{debug, info};

pub const API_BASE_PATH: &str = "/api";

pub async fn run(args: ServerConfig) -> Result<()> {
    let state = build_state(&args).await?;
    run_with_state(args, state).await
}

pub async fn run_with_state(args: ServerConfig, state: AppState) -> Result<()> {
    let shutdown = tokio::signal::ctrl_c().map(|_| ());
    run_graceful_with_state(args, state, shutdown).await
}

pub async fn run_graceful_with_state<S>(
    args: ServerConfig,
    state: AppState,
    shutdown_signal: S,
) -> Result<()>
where
    S: std::future::Future<Output = ()> + Send + 'static,
{
    let mut app = main_router(state);

    if let Some(cors) = cors_layer(&args)? {
        app = app.layer(cors);
    }
    let app = app.layer(TraceLayer::new_for_http());

    let ip: std::net::IpAddr = args.listen_address.parse()?;
    let addr = std::net::SocketAddr::from((ip, args.port));
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(
        "Listening on {} in {:?} mode",
        listener.local_addr()?,
        args.mode
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    info!("Server stopped");
    Ok(())
}

pub fn cors_layer(args: &ServerConfig) -> Result<Option<CorsLayer>> {
    if args.no_cors {
        return Ok(None);
    }
    let layer = match args.mode {
        RunMode::Development => CorsLayer::very_permissive(),
        RunMode::Production => {
            let origins = args
                .cors_origins
                .iter()
                .map(|o| {
                    o.trim()
                        .parse::<HeaderValue>()
                        .with_context(|| format!("Invalid CORS origin {o}"))
                })
                .collect::<Result<Vec<_>>>()?;
            debug!("Allowed CORS origins: {:?}", origins);
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
                .allow_headers([header::CONTENT_TYPE])
        }
    };
    Ok(Some(layer))
}

pub fn main_router(state: AppState) -> Router<()> {
    let api = api_router().route("/health", get(health));
    Router::new().nest(API_BASE_PATH, api).with_state(state)
}

/// Health answer: `ok` for monitoring, `success` and `message` in the API envelope style
#[derive(Serialize)]
struct Health {
    success: bool,
    ok: bool,
    message: &'static str,
}

async fn health() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(Health {
            success: true,
            ok: true,
            message: "API is running",
        }),
    )
}

pub async fn build_state(config: &ServerConfig) -> Result<AppState> {
    let data_dir = config.backend.data_dir();
    if !data_dir.is_dir() {
        tokio::fs::create_dir_all(&data_dir).await?;
        info!("Created data directory {}", data_dir.display());
    }

    let pool = bookinv_dal::new_pool(&config.database_url()).await?;
    Ok(AppState::new(pool))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Parser as _;
    use axum::body::Body;
    use http::Request;
    use tower::ServiceExt as _;

    fn config(args: &[&str]) -> ServerConfig {
        let mut all = vec!["bookinv-server", "--data-dir", "/tmp/bookinv-cors-test"];
        all.extend_from_slice(args);
        ServerConfig::try_parse_from(all).unwrap()
    }

    async fn preflight(args: &[&str], origin: &str) -> Option<HeaderValue> {
        let cors = cors_layer(&config(args)).unwrap().unwrap();
        let app = Router::new().route("/api/health", get(health)).layer(cors);
        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri("/api/health")
            .header(header::ORIGIN, origin)
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .cloned()
    }

    #[tokio::test]
    async fn test_cors_production() {
        let args = ["--mode", "production", "--cors-origin", "https://books.example.com"];
        let allowed = preflight(&args, "https://books.example.com").await;
        assert_eq!(allowed.unwrap(), "https://books.example.com");
        assert!(preflight(&args, "https://evil.example.com").await.is_none());
    }

    #[tokio::test]
    async fn test_cors_development() {
        let allowed = preflight(&[], "http://localhost:3000").await;
        assert_eq!(allowed.unwrap(), "http://localhost:3000");
    }

    #[test]
    fn test_no_cors() {
        assert!(cors_layer(&config(&["--no-cors"])).unwrap().is_none());
    }
}
