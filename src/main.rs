mod routes;
mod models;
mod form;
mod gemini;

use routes::AppState;
use std::net::SocketAddr;
use tracing_subscriber::{fmt, EnvFilter};
use std::sync::Arc;
use tower_http::cors::{CorsLayer, Any};

use crate::gemini::GeminiClient;

#[tokio::main]
async fn main() {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    // Init tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();

    let api_key = std::env::var("GEMINI_API_KEY").unwrap_or_else(|_| "DEMO_KEY".into());
    tracing::info!("Using API key: {}...", key_preview(&api_key));
    let state = AppState {
        sessions: Arc::default(),
        gemini: Arc::new(GeminiClient::new(api_key)),
    };

    let app = routes::router(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        );

    let port: u16 = std::env::var("PORT").ok().and_then(|v| v.parse().ok()).unwrap_or(8080);
    let addr = SocketAddr::from(([0,0,0,0], port));
    tracing::info!(%addr, "Starting server");
    axum::serve(tokio::net::TcpListener::bind(addr).await.unwrap(), app).await.unwrap();
}

// Char-boundary-safe truncation for logging the key prefix
fn key_preview(key: &str) -> String {
    key.chars().take(10).collect()
}
