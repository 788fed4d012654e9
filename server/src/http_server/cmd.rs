use std::net::SocketAddr;

use axum::{
    http::{header, HeaderValue, Method},
    Router,
};
use color_eyre::eyre::Context;
use tokio::net::TcpListener;
use tower_cookies::CookieManagerLayer;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use super::{routes, trace::Tracer};
use crate::{AppConfig, AppState};

const DEFAULT_PORT: &str = "3000";

pub(crate) async fn serve() -> crate::Result<()> {
    let app_state = AppState::from_env().await?;

    run_server(app(app_state)).await
}

/// The full router with every layer the listener serves.
pub(crate) fn app(state: AppState) -> Router {
    let cors = cors_layer(&state.app);

    routes::make_router()
        .with_state(state)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(Tracer)
                .on_response(Tracer),
        )
        .layer(CookieManagerLayer::new())
        .layer(cors)
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .allow_credentials(true)
}

async fn run_server(app: Router) -> crate::Result<()> {
    let port = std::env::var("PORT").unwrap_or_else(|_| DEFAULT_PORT.to_string());
    let port: u16 = port.parse().wrap_err("PORT must be a number")?;
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    info!("Starting server on port {}", port);
    let listener = TcpListener::bind(&addr)
        .await
        .wrap_err("Failed to open port")?;

    let addr = listener.local_addr()?;
    info!("Listening on {}", addr);

    axum::serve(listener, app)
        .await
        .wrap_err("Failed to run server")
}
