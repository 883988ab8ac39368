//! Web API module for FuzzyLab.
//!
//! This module provides a REST API over session documents, enabling a
//! web-based frontend to edit variables, terms and rules and to run
//! inference.
//!
//! # Endpoints
//!
//! - `GET /health` - Health check
//! - `GET /api/session` - Derive a session id for the calling client
//!
//! All of the following live under `/api/sessions/{session}`:
//!
//! - `GET /document` / `PUT /document` - Read or replace the whole document
//! - `POST /terms` - Create a term
//! - `GET /terms/{variable}/{term}` / `PUT /terms/{variable}/{term}` - Read or modify a term
//! - `DELETE /terms/{term}` - Delete a term
//! - `GET /variables/{kind}/{variable}/membership` - Sampled term curves
//! - `POST /rules` - Create a rule
//! - `DELETE /rules/{rule_id}` - Delete a rule
//! - `DELETE /output` - Remove the output variable and its rules
//! - `POST /infer` - Run inference
//! - `GET /export?scope=` / `POST /import` - Export or import a document
//! - `GET /report` - System summary

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::config::Config;
use crate::engine::{InferenceRequest, InferenceResponse, MembershipCurve};
use crate::error::FisError;
use crate::models::{
    Antecedent, ClearedOutput, DefuzzMethod, Domain, FunctionType, OpenSide, Rule, TermRecord,
    TermSpec, VariableKind,
};
use crate::services::{
    session_id_for_client, CatalogService, DocumentStore, ExportBundle, ExportScope,
    SystemReport, TermView,
};

// ============================================================================
// Application State
// ============================================================================

/// Shared application state for the web API.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    config: Arc<Config>,
    /// Session-scoped catalog operations
    catalog: Arc<CatalogService>,
}

impl AppState {
    /// Creates a new application state.
    #[must_use]
    pub fn new(config: Config) -> Self {
        let store = DocumentStore::new(config.paths.sessions_dir.clone());
        let catalog = CatalogService::new(store, config.engine);
        Self {
            config: Arc::new(config),
            catalog: Arc::new(catalog),
        }
    }

    /// Returns the application configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Current health status (e.g., "healthy").
    pub status: String,
    /// Application version.
    pub version: String,
}

/// Session id derived for the calling client.
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    /// Session id to use in `/api/sessions/{session}` routes.
    pub session: String,
}

/// Body of `POST /terms`.
#[derive(Debug, Deserialize)]
pub struct CreateTermRequest {
    /// Whether the term belongs to an input or the output variable.
    pub kind: VariableKind,
    /// Term fields.
    #[serde(flatten)]
    pub spec: TermSpec,
}

/// Body of `PUT /terms/{variable}/{term}`.
#[derive(Debug, Deserialize)]
pub struct ModifyTermRequest {
    /// Domain of the variable.
    pub domain: Domain,
    /// Membership-function family.
    pub function_type: FunctionType,
    /// New term name; defaults to the current one.
    #[serde(default)]
    pub term_name: Option<String>,
    /// Numeric parameters.
    #[serde(default)]
    pub params: BTreeMap<String, f64>,
    /// Open side of `*-open` families.
    #[serde(default)]
    pub open_type: Option<OpenSide>,
    /// Defuzzification method (output terms only).
    #[serde(default)]
    pub defuzzy_type: Option<DefuzzMethod>,
}

/// Response of term mutations.
#[derive(Debug, Serialize)]
pub struct TermResponse {
    /// Owning variable.
    pub variable_name: String,
    /// The stored term.
    pub term: TermRecord,
}

/// Body of `POST /rules`.
#[derive(Debug, Deserialize)]
pub struct CreateRuleRequest {
    /// Antecedent clauses, ANDed.
    pub inputs: Vec<Antecedent>,
    /// Consequent variable.
    pub output_variable: String,
    /// Consequent term.
    pub output_term: String,
}

/// Response of `POST /rules`.
#[derive(Debug, Serialize)]
pub struct CreateRuleResponse {
    /// Id of the new rule.
    pub rule_id: usize,
}

/// Response of `DELETE /rules/{rule_id}`.
#[derive(Debug, Serialize)]
pub struct DeleteRuleResponse {
    /// Id the rule had.
    pub rule_id: usize,
    /// The removed rule.
    pub rule: Rule,
}

/// Response of the membership curve endpoint.
#[derive(Debug, Serialize)]
pub struct MembershipResponse {
    /// Variable name.
    pub variable: String,
    /// Variable kind.
    pub kind: VariableKind,
    /// One curve per term.
    pub curves: Vec<MembershipCurve>,
}

/// Query parameters for export.
#[derive(Debug, Deserialize)]
pub struct ExportQuery {
    /// Which part of the document to export.
    #[serde(default)]
    pub scope: ExportScope,
}

/// Response of `POST /import`.
#[derive(Debug, Serialize)]
pub struct ImportResponse {
    /// Number of imported variables.
    pub variables: usize,
    /// Number of imported rules.
    pub rules: usize,
}

/// API error response.
#[derive(Debug, Serialize)]
pub struct ApiError {
    /// Error message.
    pub error: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
        }
    }

    fn with_details(error: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: Some(details.into()),
        }
    }
}

type ApiResult<T> = Result<T, (StatusCode, Json<ApiError>)>;

/// HTTP status for each error kind.
#[must_use]
pub fn status_for(err: &FisError) -> StatusCode {
    match err {
        FisError::Validation(_) => StatusCode::BAD_REQUEST,
        FisError::NotFound(_) => StatusCode::NOT_FOUND,
        FisError::Consistency(_) => StatusCode::CONFLICT,
        FisError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn api_error(err: FisError) -> (StatusCode, Json<ApiError>) {
    let status = status_for(&err);
    let body = match &err {
        FisError::Storage(message) => {
            warn!("Storage failure: {}", message);
            ApiError::with_details("Failed to access session document", message.clone())
        }
        other => ApiError::new(other.to_string()),
    };
    (status, Json(body))
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /health - Health check endpoint.
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// GET /api/session - Derive a stable session id from the client's headers.
async fn client_session(headers: HeaderMap) -> Json<SessionResponse> {
    let header_value = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string()
    };
    let user_agent = header_value(header::USER_AGENT.as_str());
    let remote = headers
        .get("x-forwarded-for")
        .or_else(|| headers.get(header::HOST))
        .and_then(|v| v.to_str().ok())
        .unwrap_or("local")
        .to_string();

    Json(SessionResponse {
        session: session_id_for_client(&user_agent, &remote),
    })
}

/// GET /document - Whole session document.
async fn get_document(
    State(state): State<AppState>,
    Path(session): Path<String>,
) -> ApiResult<Json<Value>> {
    state.catalog.document(&session).map(Json).map_err(api_error)
}

/// PUT /document - Replace the whole session document.
async fn put_document(
    State(state): State<AppState>,
    Path(session): Path<String>,
    Json(document): Json<Value>,
) -> ApiResult<Json<Value>> {
    let catalog = state
        .catalog
        .replace_document(&session, document)
        .map_err(api_error)?;
    Ok(Json(catalog.to_document()))
}

/// POST /terms - Create a term.
async fn create_term(
    State(state): State<AppState>,
    Path(session): Path<String>,
    Json(request): Json<CreateTermRequest>,
) -> ApiResult<(StatusCode, Json<TermResponse>)> {
    let term = state
        .catalog
        .create_term(&session, request.kind, &request.spec)
        .map_err(api_error)?;
    Ok((
        StatusCode::CREATED,
        Json(TermResponse {
            variable_name: request.spec.variable_name,
            term: TermRecord::from(&term),
        }),
    ))
}

/// GET /terms/{variable}/{term} - Read a term.
async fn get_term(
    State(state): State<AppState>,
    Path((session, variable, term)): Path<(String, String, String)>,
) -> ApiResult<Json<TermView>> {
    state
        .catalog
        .get_term(&session, &variable, &term)
        .map(Json)
        .map_err(api_error)
}

/// PUT /terms/{variable}/{term} - Modify a term.
async fn modify_term(
    State(state): State<AppState>,
    Path((session, variable, term)): Path<(String, String, String)>,
    Json(request): Json<ModifyTermRequest>,
) -> ApiResult<Json<TermResponse>> {
    let spec = TermSpec {
        variable_name: variable.clone(),
        domain: request.domain,
        function_type: request.function_type,
        term_name: request.term_name.unwrap_or_else(|| term.clone()),
        params: request.params,
        open_type: request.open_type,
        defuzzy_type: request.defuzzy_type,
    };
    let updated = state
        .catalog
        .modify_term(&session, &term, &spec)
        .map_err(api_error)?;
    Ok(Json(TermResponse {
        variable_name: variable,
        term: TermRecord::from(&updated),
    }))
}

/// DELETE /terms/{term} - Delete the first term with this name.
async fn delete_term(
    State(state): State<AppState>,
    Path((session, term)): Path<(String, String)>,
) -> ApiResult<Json<TermResponse>> {
    let (variable_name, removed) = state
        .catalog
        .delete_term(&session, &term)
        .map_err(api_error)?;
    Ok(Json(TermResponse {
        variable_name,
        term: TermRecord::from(&removed),
    }))
}

/// GET /variables/{kind}/{variable}/membership - Sampled term curves.
async fn membership(
    State(state): State<AppState>,
    Path((session, kind, variable)): Path<(String, String, String)>,
) -> ApiResult<Json<MembershipResponse>> {
    let kind: VariableKind = kind.parse().map_err(api_error)?;
    let curves = state
        .catalog
        .membership_curves(&session, kind, &variable)
        .map_err(api_error)?;
    Ok(Json(MembershipResponse {
        variable,
        kind,
        curves,
    }))
}

/// POST /rules - Create a rule.
async fn create_rule(
    State(state): State<AppState>,
    Path(session): Path<String>,
    Json(request): Json<CreateRuleRequest>,
) -> ApiResult<(StatusCode, Json<CreateRuleResponse>)> {
    let rule_id = state
        .catalog
        .create_rule(
            &session,
            request.inputs,
            &request.output_variable,
            &request.output_term,
        )
        .map_err(api_error)?;
    Ok((StatusCode::CREATED, Json(CreateRuleResponse { rule_id })))
}

/// DELETE /rules/{rule_id} - Delete a rule.
async fn delete_rule(
    State(state): State<AppState>,
    Path((session, rule_id)): Path<(String, usize)>,
) -> ApiResult<Json<DeleteRuleResponse>> {
    let rule = state
        .catalog
        .delete_rule(&session, rule_id)
        .map_err(api_error)?;
    Ok(Json(DeleteRuleResponse { rule_id, rule }))
}

/// DELETE /output - Remove the output variable and its rules.
async fn clear_output(
    State(state): State<AppState>,
    Path(session): Path<String>,
) -> ApiResult<Json<ClearedOutput>> {
    state
        .catalog
        .clear_output(&session)
        .map(Json)
        .map_err(api_error)
}

/// POST /infer - Run inference.
async fn infer(
    State(state): State<AppState>,
    Path(session): Path<String>,
    Json(request): Json<InferenceRequest>,
) -> ApiResult<Json<InferenceResponse>> {
    state
        .catalog
        .infer(&session, &request)
        .map(Json)
        .map_err(api_error)
}

/// GET /export - Export the document or a subset of it.
async fn export_document(
    State(state): State<AppState>,
    Path(session): Path<String>,
    Query(query): Query<ExportQuery>,
) -> ApiResult<Json<ExportBundle>> {
    state
        .catalog
        .export(&session, query.scope)
        .map(Json)
        .map_err(api_error)
}

/// POST /import - Replace the document with an uploaded one.
async fn import_document(
    State(state): State<AppState>,
    Path(session): Path<String>,
    Json(document): Json<Value>,
) -> ApiResult<Json<ImportResponse>> {
    let catalog = state
        .catalog
        .import(&session, document)
        .map_err(api_error)?;
    Ok(Json(ImportResponse {
        variables: catalog.variables.len(),
        rules: catalog.rules.len(),
    }))
}

/// GET /report - System summary.
async fn report(
    State(state): State<AppState>,
    Path(session): Path<String>,
) -> ApiResult<Json<SystemReport>> {
    state
        .catalog
        .report(&session)
        .map(Json)
        .map_err(api_error)
}

// ============================================================================
// Router
// ============================================================================

/// Creates the API router.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration - allow all origins. The server is meant to run
    // locally next to the frontend.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let session_routes = Router::new()
        .route("/document", get(get_document).put(put_document))
        .route("/terms", post(create_term))
        .route("/terms/{variable}/{term}", get(get_term).put(modify_term))
        .route("/terms/{term}", delete(delete_term))
        .route("/variables/{kind}/{variable}/membership", get(membership))
        .route("/rules", post(create_rule))
        .route("/rules/{rule_id}", delete(delete_rule))
        .route("/output", delete(clear_output))
        .route("/infer", post(infer))
        .route("/export", get(export_document))
        .route("/import", post(import_document))
        .route("/report", get(report));

    Router::new()
        // Health check
        .route("/health", get(health_check))
        .route("/api/session", get(client_session))
        .nest("/api/sessions/{session}", session_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Runs the web server.
///
/// # Arguments
///
/// * `config` - Application configuration
/// * `addr` - Socket address to bind to
///
/// # Errors
///
/// Returns an error if the server fails to start.
pub async fn run_server(config: Config, addr: SocketAddr) -> anyhow::Result<()> {
    info!(
        "Serving sessions from {}",
        config.paths.sessions_dir.display()
    );
    let state = AppState::new(config);
    let app = create_router(state);

    info!("Starting FuzzyLab web server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
