//! Contract Protocol Server
//!
//! Reviews supply contracts from the supplier's side. A `.docx` contract is
//! uploaded from the browser, clauses that shift risk onto the supplier are
//! sent to an LLM advisor for a counter-proposal, and the answers are returned
//! both as text and as a Word protocol of disagreements.
//!
//! ## Endpoints
//!
//! - `GET /` upload page, backed by the wasm client under `/pkg`
//! - `POST /upload` multipart upload, one part named `contract`
//! - `GET /download/:filename` generated protocol
//! - `GET /health`

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use clap::Parser;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{info, warn, Level};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod advisor;
mod api;
mod error;
mod pipeline;
mod storage;

use advisor::{ClauseAdvisor, GigaChatAdvisor, GigaChatConfig};
use api::{handle_download, handle_health, handle_index, handle_upload};
use storage::Storage;

/// Environment variable holding the GigaChat authorization key
const CREDENTIALS_ENV: &str = "GIGACHAT_CLIENT_SECRET";

/// Command-line arguments for the protocol server
#[derive(Parser, Debug)]
#[command(name = "protocol-server")]
#[command(about = "Supply contract review server producing protocols of disagreements")]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value = "5000")]
    port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Directory for uploaded contracts
    #[arg(long, default_value = "uploads")]
    upload_dir: PathBuf,

    /// Directory for generated protocols
    #[arg(long, default_value = "output")]
    output_dir: PathBuf,

    /// Directory with the wasm-pack output of the browser client
    #[arg(long, default_value = "apps/protocol-web/wasm/pkg")]
    pkg_dir: PathBuf,

    /// Maximum upload size in bytes
    #[arg(long, default_value = "16777216")]
    max_upload_bytes: usize,

    /// GigaChat API scope
    #[arg(long, default_value = advisor::DEFAULT_SCOPE)]
    gigachat_scope: String,

    /// GigaChat OAuth endpoint
    #[arg(long, default_value = advisor::DEFAULT_AUTH_URL)]
    gigachat_auth_url: String,

    /// GigaChat API base URL
    #[arg(long, default_value = advisor::DEFAULT_API_URL)]
    gigachat_api_url: String,

    /// GigaChat model name
    #[arg(long, default_value = advisor::DEFAULT_MODEL)]
    gigachat_model: String,

    /// Advisor request timeout in seconds
    #[arg(long, default_value = "60")]
    advisor_timeout_secs: u64,

    /// Skip TLS certificate verification for the advisor
    /// (the GigaChat endpoints use the Russian national CA)
    #[arg(long)]
    accept_invalid_certs: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<Storage>,
    pub advisor: Arc<dyn ClauseAdvisor>,
}

/// Assemble the router; shared by `main` and the HTTP tests.
pub fn build_router(state: AppState, pkg_dir: PathBuf, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/", get(handle_index))
        .route("/health", get(handle_health))
        .route("/upload", post(handle_upload))
        .route("/download/:filename", get(handle_download))
        .nest_service("/pkg", ServeDir::new(pkg_dir))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting protocol server on {}:{}", args.host, args.port);

    let credentials = std::env::var(CREDENTIALS_ENV)
        .ok()
        .filter(|value| !value.trim().is_empty());

    let advisor = GigaChatAdvisor::new(GigaChatConfig {
        credentials,
        scope: args.gigachat_scope,
        auth_url: args.gigachat_auth_url,
        api_url: args.gigachat_api_url,
        model: args.gigachat_model,
        accept_invalid_certs: args.accept_invalid_certs,
        timeout: Duration::from_secs(args.advisor_timeout_secs),
    })?;
    if !advisor.is_configured() {
        warn!("{} is not set; clause analysis will find nothing", CREDENTIALS_ENV);
    }

    let storage = Storage::open(&args.upload_dir, &args.output_dir)?;
    info!(
        "Uploads: {}, protocols: {}",
        storage.upload_dir().display(),
        storage.output_dir().display()
    );

    // Create shared state
    let state = AppState {
        storage: Arc::new(storage),
        advisor: Arc::new(advisor),
    };

    // Configure CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = build_router(state, args.pkg_dir, args.max_upload_bytes)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("Server listening on http://{}", addr);
    info!("Upload limit: {} bytes", args.max_upload_bytes);

    axum::serve(listener, app).await?;

    Ok(())
}
