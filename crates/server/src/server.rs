use axum::{
    Router,
    extract::{MatchedPath, Request},
    http::{HeaderValue, Method, header},
    routing::{get, put},
};
use chrono_tz::Tz;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use std::{sync::Arc, time::Instant};

use crate::{expenses, health, stats};
use engine::Engine;

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
    /// Zone in which calendar months are evaluated for statistics.
    pub timezone: Tz,
    pub started_at: Instant,
}

/// Knobs of the HTTP surface that come from configuration.
#[derive(Clone, Debug)]
pub struct ServerOptions {
    /// Origins allowed to call the API from a browser. `*` allows any origin
    /// (without credentials).
    pub cors_origins: Vec<String>,
    pub timezone: Tz,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            cors_origins: vec!["http://localhost:3000".to_string()],
            timezone: Tz::UTC,
        }
    }
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    if origins.iter().any(|origin| origin.trim() == "*") {
        return layer.allow_origin(AllowOrigin::any());
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin.trim()) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("ignoring invalid CORS origin {origin:?}");
                None
            }
        })
        .collect();

    layer
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
}

fn add_tracing_layer(router: Router<ServerState>) -> Router<ServerState> {
    let tracing_layer = TraceLayer::new_for_http()
        .make_span_with(|req: &Request| {
            let method = req.method();
            let uri = req.uri();

            let matched_path = req
                .extensions()
                .get::<MatchedPath>()
                .map(|matched_path| matched_path.as_str());

            tracing::debug_span!("request", %method, %uri, matched_path)
        })
        // Store failures are logged where they are mapped to a response.
        .on_failure(());

    router.layer(tracing_layer)
}

/// Build the full API router.
pub fn router(engine: Engine, options: ServerOptions) -> Router {
    let state = ServerState {
        engine: Arc::new(engine),
        timezone: options.timezone,
        started_at: Instant::now(),
    };

    let routes = Router::new()
        .route("/expenses", get(expenses::list).post(expenses::create))
        .route("/expenses/summary", get(expenses::summary))
        .route("/expenses/stats", get(stats::get_stats))
        .route("/expenses/date-range", get(expenses::list_by_date_range))
        .route(
            "/expenses/category/{category}",
            get(expenses::list_by_category),
        )
        .route(
            "/expenses/{id}",
            put(expenses::update).delete(expenses::delete),
        )
        .route("/health", get(health::health))
        .layer(cors_layer(&options.cors_origins));

    add_tracing_layer(routes).with_state(state)
}

pub async fn run_with_listener(
    engine: Engine,
    options: ServerOptions,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, router(engine, options))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Shutting down..."),
        Err(err) => {
            tracing::error!("failed to listen for shutdown signal: {err}");
            std::future::pending::<()>().await;
        }
    }
}
