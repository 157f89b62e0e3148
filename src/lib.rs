// MediLens — Core Library
// AI lab report and vitals analysis with deterministic fallbacks

pub mod error;
pub mod handlers;
pub mod models;
pub mod services;
pub mod settings;

use std::any::Any;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};

use crate::error::ApiError;
use crate::handlers::{analyze, suggest, system};
use crate::services::gemini::{GeminiClient, GeminiError};
use crate::settings::AppSettings;

/// Shared, read-only state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<AppSettings>,
    /// `None` when no Gemini key is configured; every analysis then uses the mock path
    pub gemini: Option<GeminiClient>,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(settings: AppSettings) -> Result<Self, GeminiError> {
        let gemini = GeminiClient::from_settings(&settings)?;
        Ok(Self {
            settings: Arc::new(settings),
            gemini,
            started_at: Instant::now(),
        })
    }
}

/// Build the HTTP router
pub fn router(state: AppState) -> Router {
    // Room for the other multipart fields on top of the file itself
    let body_limit = state.settings.max_upload_bytes().saturating_add(1024 * 1024);

    Router::new()
        .route("/", get(system::root))
        .route("/health", get(system::health))
        .route("/api/analyze", post(analyze::analyze_report))
        .route("/api/analyze-vitals", post(analyze::analyze_vitals))
        .route("/api/suggest-prescription", post(suggest::suggest_prescription))
        .route("/api/suggest-lab-tests", post(suggest::suggest_lab_tests))
        .route("/api/generate-followup", post(suggest::generate_follow_up))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(cors_layer(&state.settings))
        .with_state(state)
}

fn cors_layer(settings: &AppSettings) -> CorsLayer {
    let origins: Vec<HeaderValue> = settings
        .allowed_origins
        .iter()
        .filter(|origin| {
            // A wildcard cannot be combined with credentials
            if origin.as_str() == "*" {
                log::warn!("Ignoring wildcard CORS origin; list explicit origins instead");
                return false;
            }
            true
        })
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                log::warn!("Ignoring invalid CORS origin {:?}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "handler panicked".to_string()
    };
    ApiError::Internal(message).into_response()
}

/// Start the MediLens API server
pub async fn run() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let settings = AppSettings::load().context("Failed to load settings")?;
    let state = AppState::new(settings).context("Failed to initialize Gemini client")?;

    match &state.gemini {
        Some(client) => log::info!("Gemini configured — model {}", client.model()),
        None => log::warn!("GEMINI_API_KEY not set — serving mock analyses"),
    }

    let listener = TcpListener::bind((state.settings.host.as_str(), state.settings.port))
        .await
        .with_context(|| {
            format!(
                "Failed to bind {}:{}",
                state.settings.host, state.settings.port
            )
        })?;
    log::info!("MediLens API listening on {}", listener.local_addr()?);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    log::info!("MediLens API stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {}", e);
    }
}
