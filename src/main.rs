use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use screening_backend::{
    config::{get_config, init_config},
    middleware::{cors::cors_layer, rate_limit},
    routes, AppState,
};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("LOG_FORMAT").map(|v| v == "json").unwrap_or(false);

    if json {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    init_config()?;
    let config = get_config();

    let app_state = AppState::new(config)?;

    let base_routes = Router::new()
        .route("/", get(routes::health::root))
        .route("/health", get(routes::health::health));

    let llm_api = Router::new()
        .route(
            "/generate-questions",
            post(routes::screening::generate_questions),
        )
        .route(
            "/submit-screening",
            post(routes::screening::submit_screening),
        )
        .route(
            "/assess-task-quality",
            post(routes::quality::assess_task_quality),
        )
        .layer(axum::middleware::from_fn_with_state(
            rate_limit::RateLimiter::new(config.llm_rps),
            rate_limit::rps_middleware,
        ));

    let app = base_routes
        .merge(llm_api)
        .with_state(app_state)
        .layer(cors_layer(&config.allowed_origins))
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(1024 * 1024));

    let addr: SocketAddr = config.server_address.parse()?;
    info!("Server listening on {}", addr);
    info!(model = %config.llm_model, base_url = %config.llm_base_url, "Using LLM provider");
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
