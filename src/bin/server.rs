//! REST API server for card scheme detection.
//!
//! # Usage
//!
//! ```bash
//! # Start server (fetches the dictionary on start-up)
//! cardscheme-server
//!
//! # With custom port and dictionary
//! CARD_SCHEME_URL=http://localhost:8000/cards-dictionary.json cardscheme-server --port 8080
//!
//! # Fetch settings (flags or CARD_SCHEME_TIMEOUT_MS / CARD_SCHEME_ATTEMPTS)
//! cardscheme-server --timeout-ms 2000 --attempts 5
//! ```
//!
//! # Swagger UI
//!
//! Visit http://localhost:3000/swagger-ui/ for interactive API documentation.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::State,
    http::{header, Method, StatusCode},
    response::Json,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::{OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

use card_scheme::fetch::{DictionaryClient, FetchConfig};
use card_scheme::rule::parse_validation_rules_with;
use card_scheme::{RuleCache, SchemeRule};

// ============================================================================
// OpenAPI Documentation
// ============================================================================

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Card Scheme API",
        version = "0.1.0",
        description = "Card scheme detection from a BIN rule dictionary, with Luhn checksum validation.",
        license(name = "MIT"),
        contact(name = "API Support")
    ),
    tags(
        (name = "Detection", description = "Scheme detection and checksum"),
        (name = "Rules", description = "Rule grammar utilities"),
        (name = "System", description = "Health and dictionary management")
    ),
    paths(detect_card, parse_rules, reload_dictionary, health),
    components(schemas(
        DetectRequest,
        DetectResponse,
        SchemeSummary,
        ParseRequest,
        ParseResponse,
        ReloadResponse,
        HealthResponse,
    ))
)]
struct ApiDoc;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Deserialize, ToSchema)]
#[schema(example = json!({"card_number": "4111111111111111"}))]
struct DetectRequest {
    /// Card number, digits only.
    card_number: String,
}

#[derive(Serialize, ToSchema)]
struct SchemeSummary {
    /// Scheme key, e.g. "visa"
    id: String,
    /// Display name
    name: String,
    /// Icon reference from the dictionary
    icon: String,
}

impl From<&SchemeRule> for SchemeSummary {
    fn from(s: &SchemeRule) -> Self {
        Self {
            id: s.id.clone(),
            name: s.name.clone(),
            icon: s.icon.clone(),
        }
    }
}

#[derive(Serialize, ToSchema)]
#[schema(example = json!({
    "checksum_valid": true,
    "scheme": {"id": "visa", "name": "Visa", "icon": "visa.svg"},
    "acceptable": true
}))]
struct DetectResponse {
    /// Whether the number passed the Luhn checksum
    checksum_valid: bool,
    /// Detected scheme, absent when no scheme matched
    #[serde(skip_serializing_if = "Option::is_none")]
    scheme: Option<SchemeSummary>,
    /// Checksum valid and scheme detected (or no rules loaded)
    acceptable: bool,
    /// Whether a rule dictionary is loaded
    rules_loaded: bool,
    /// Error message if the input was rejected
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Deserialize, ToSchema)]
#[schema(example = json!({"rules": "4,40-49,2221-2720"}))]
struct ParseRequest {
    /// Comma-separated rule tokens
    rules: String,
}

#[derive(Serialize, ToSchema)]
struct ParseResponse {
    /// Parsed rules, e.g. {"type": "interval", "value": {"min": 40, "max": 49}}
    #[schema(value_type = Vec<Object>)]
    rules: Vec<card_scheme::ValidationRule>,
    /// Literals of tokens that were dropped
    dropped: Vec<String>,
}

#[derive(Serialize, ToSchema)]
struct ReloadResponse {
    /// Number of schemes now loaded
    schemes: usize,
}

#[derive(Serialize, ToSchema)]
struct HealthResponse {
    /// Service status
    status: String,
    /// API version
    version: String,
    /// Number of schemes loaded, zero before the first successful fetch
    schemes: usize,
}

// ============================================================================
// State
// ============================================================================

#[derive(Clone)]
struct AppState {
    client: Arc<DictionaryClient>,
    cache: &'static RuleCache,
}

// ============================================================================
// Handlers
// ============================================================================

/// Detect the scheme of a card number and check its checksum
#[utoipa::path(
    post,
    path = "/detect",
    request_body = DetectRequest,
    responses(
        (status = 200, description = "Detection result", body = DetectResponse)
    ),
    tag = "Detection"
)]
async fn detect_card(
    State(state): State<AppState>,
    Json(req): Json<DetectRequest>,
) -> Json<DetectResponse> {
    let rules = state.cache.get().unwrap_or_else(|| Arc::from(Vec::new()));
    Json(detect_response(&req.card_number, &rules))
}

/// Builds the detection result from a single rule snapshot.
fn detect_response(card_number: &str, rules: &[SchemeRule]) -> DetectResponse {
    let rules_loaded = !rules.is_empty();

    match card_scheme::assess(card_number, rules) {
        Ok(assessment) => DetectResponse {
            checksum_valid: assessment.checksum_valid,
            acceptable: assessment.is_acceptable(rules_loaded),
            scheme: assessment.scheme.as_ref().map(SchemeSummary::from),
            rules_loaded,
            error: None,
        },
        Err(e) => DetectResponse {
            checksum_valid: false,
            scheme: None,
            acceptable: false,
            rules_loaded,
            error: Some(e.to_string()),
        },
    }
}

/// Parse a rule list
#[utoipa::path(
    post,
    path = "/rules/parse",
    request_body = ParseRequest,
    responses(
        (status = 200, description = "Parsed rules", body = ParseResponse)
    ),
    tag = "Rules"
)]
async fn parse_rules(Json(req): Json<ParseRequest>) -> Json<ParseResponse> {
    let mut dropped = Vec::new();
    let rules = parse_validation_rules_with(&req.rules, |e| dropped.push(e.literal().to_string()));
    Json(ParseResponse { rules, dropped })
}

/// Re-fetch the dictionary and replace the loaded rules
#[utoipa::path(
    post,
    path = "/dictionary/reload",
    responses(
        (status = 200, description = "Dictionary reloaded", body = ReloadResponse),
        (status = 502, description = "Dictionary fetch failed")
    ),
    tag = "System"
)]
async fn reload_dictionary(
    State(state): State<AppState>,
) -> Result<Json<ReloadResponse>, (StatusCode, String)> {
    let rules = state
        .cache
        .reload_with(&state.client)
        .await
        .map_err(|e| (StatusCode::BAD_GATEWAY, e.to_string()))?;

    Ok(Json(ReloadResponse {
        schemes: rules.len(),
    }))
}

/// Health check
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    ),
    tag = "System"
)]
async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        schemes: state.cache.get().map_or(0, |r| r.len()),
    })
}

// ============================================================================
// Configuration
// ============================================================================

fn arg_value(args: &[String], name: &str) -> Option<String> {
    args.iter().skip_while(|a| *a != name).nth(1).cloned()
}

fn env_value<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}

/// Reads a setting from its command-line flag, falling back to the environment.
fn setting<T: std::str::FromStr>(args: &[String], flag: &str, key: &str) -> Option<T> {
    arg_value(args, flag)
        .and_then(|v| v.parse().ok())
        .or_else(|| env_value(key))
}

fn fetch_config(args: &[String]) -> FetchConfig {
    let mut config = FetchConfig::default();
    if let Some(url) = setting::<String>(args, "--url", "CARD_SCHEME_URL") {
        config = config.with_url(url);
    }
    if let Some(ms) = setting::<u64>(args, "--timeout-ms", "CARD_SCHEME_TIMEOUT_MS") {
        config = config.with_timeout(Duration::from_millis(ms));
    }
    if let Some(attempts) = setting::<u32>(args, "--attempts", "CARD_SCHEME_ATTEMPTS") {
        config = config.with_max_attempts(attempts);
    }
    config
}

// ============================================================================
// Main
// ============================================================================

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args: Vec<String> = std::env::args().collect();
    let port: u16 = setting(&args, "--port", "PORT").unwrap_or(3000);

    let state = AppState {
        client: Arc::new(DictionaryClient::new(fetch_config(&args))?),
        cache: RuleCache::global(),
    };

    if let Err(e) = state.cache.load_with(&state.client).await {
        tracing::error!(error = %e, "starting without scheme rules");
    }

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .allow_origin(Any);

    let app = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/detect", post(detect_card))
        .route("/rules/parse", post(parse_rules))
        .route("/dictionary/reload", post(reload_dictionary))
        .route("/health", get(health))
        .with_state(state)
        .layer(cors)
        .layer(tower_http::trace::TraceLayer::new_for_http());

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Starting server on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}:{}/swagger-ui/", "localhost", port);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
