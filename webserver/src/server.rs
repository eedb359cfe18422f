//! Main server implementation
//!
//! `EditorServer` wires the store service into an axum router and runs
//! the HTTP loop. All routes are stateless request/response over the
//! injected `EditorStore`.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Router,
    extract::{Path, Query, State},
    http::HeaderValue,
    response::Json,
    routing::{get, post},
};
use serde_json::{Value, json};
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::{error, info, warn};

use crate::error::{WebServerError, WebServerResult};
use crate::state::ServerState;
use crate::traits::EditorStore;
use crate::types::{EinDetail, ListQuery, Pagination, SaveBody, SaveResponse};

/// Main server struct, generic over the store service.
pub struct EditorServer<S>
where
    S: EditorStore,
{
    state: Arc<ServerState>,
    store: Arc<S>,
    cors_origin: Option<String>,
}

impl<S: EditorStore> Clone for EditorServer<S> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
            store: self.store.clone(),
            cors_origin: self.cors_origin.clone(),
        }
    }
}

impl<S> EditorServer<S>
where
    S: EditorStore + 'static,
{
    pub fn new(state: ServerState, store: S) -> Self {
        Self {
            state: Arc::new(state),
            store: Arc::new(store),
            cors_origin: None,
        }
    }

    /// Restrict CORS to one origin. `"*"` or `None` allows any.
    pub fn with_cors_origin(mut self, origin: Option<String>) -> Self {
        self.cors_origin = origin;
        self
    }

    pub fn state(&self) -> &Arc<ServerState> {
        &self.state
    }

    /// Build the axum router with all routes.
    pub fn build_router(&self) -> Router {
        Router::new()
            .route("/eins", get(list_eins::<S>))
            .route("/ein/:ein", get(get_ein::<S>))
            .route("/ein/:ein/save", post(save_ein::<S>))
            .route("/stats", get(get_stats::<S>))
            .route("/health", get(health_check::<S>))
            .route("/api", get(api_info::<S>))
            .layer(ServiceBuilder::new().layer(self.cors_layer()).into_inner())
            .with_state(self.clone())
    }

    /// Start the HTTP server and serve until ctrl-c.
    pub async fn run(&self, addr: SocketAddr) -> WebServerResult<()> {
        let router = self.build_router();

        let listener = tokio::net::TcpListener::bind(addr).await.map_err(|e| {
            WebServerError::ServerStartup(format!("failed to bind {addr}: {e}"))
        })?;

        info!("🌐 EIN names editor listening on http://{addr}");

        let server_task = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, router).await {
                error!("server error: {e}");
            }
        });

        tokio::select! {
            _ = server_task => {
                info!("HTTP server task completed");
            },
            _ = tokio::signal::ctrl_c() => {
                info!("received shutdown signal");
                self.state.set_running(false);
            }
        }

        Ok(())
    }

    fn cors_layer(&self) -> CorsLayer {
        match self.cors_origin.as_deref() {
            Some(origin) if origin != "*" => match origin.parse::<HeaderValue>() {
                Ok(value) => CorsLayer::new()
                    .allow_origin(AllowOrigin::exact(value))
                    .allow_methods(Any)
                    .allow_headers(Any),
                Err(_) => {
                    warn!("invalid CORS origin '{origin}', allowing all");
                    CorsLayer::permissive()
                }
            },
            _ => CorsLayer::permissive(),
        }
    }
}

// HTTP Handlers

/// GET /eins — paginated EIN list with edit status.
async fn list_eins<S>(
    State(server): State<EditorServer<S>>,
    Query(query): Query<ListQuery>,
) -> Json<Value>
where
    S: EditorStore + 'static,
{
    let page = query.page.max(1);
    let page_size = query.page_size.max(1);

    let (items, total_count) = server.store.list_page(page, page_size).await;
    let pagination = Pagination::new(page, page_size, total_count);

    Json(json!({
        "items": items,
        "pagination": pagination
    }))
}

/// GET /ein/:ein — full record detail.
async fn get_ein<S>(
    State(server): State<EditorServer<S>>,
    Path(ein): Path<u64>,
) -> Result<Json<EinDetail>, WebServerError>
where
    S: EditorStore + 'static,
{
    let detail = server.store.fetch(ein).await?;
    Ok(Json(detail))
}

/// POST /ein/:ein/save — apply one edit request.
async fn save_ein<S>(
    State(server): State<EditorServer<S>>,
    Path(ein): Path<u64>,
    Json(body): Json<SaveBody>,
) -> Result<Json<SaveResponse>, WebServerError>
where
    S: EditorStore + 'static,
{
    let outcome = server.store.save(ein, body.into_request()).await?;

    let mut message_parts = vec!["Changes saved".to_string()];
    if outcome.transferred > 0 {
        message_parts.push(format!(
            "{} name(s) transferred to existing EIN(s)",
            outcome.transferred
        ));
    }
    if outcome.newly_mapped > 0 {
        message_parts.push(format!(
            "{} name(s) mapped to non-existent EIN(s)",
            outcome.newly_mapped
        ));
    }

    info!(
        "💾 saved EIN {ein}: {} names, {} marked, {} transferred",
        outcome.total_names, outcome.marked_count, outcome.transferred
    );

    Ok(Json(SaveResponse {
        message: format!("{}.", message_parts.join(". ")),
        total_names: outcome.total_names,
        marked_count: outcome.marked_count,
        new_name: outcome.canonical,
        mappings_count: outcome.mappings_count,
        transferred_count: outcome.transferred,
        completion_status: outcome.completion_status,
    }))
}

/// GET /stats — aggregate statistics.
async fn get_stats<S>(State(server): State<EditorServer<S>>) -> Json<store::StoreStats>
where
    S: EditorStore + 'static,
{
    Json(server.store.stats().await)
}

/// GET /health — health probe for monitoring.
async fn health_check<S>(State(server): State<EditorServer<S>>) -> Json<Value>
where
    S: EditorStore + 'static,
{
    let records_loaded = server.store.record_count().await;
    let status = if records_loaded > 0 { "healthy" } else { "degraded" };

    Json(json!({
        "status": status,
        "server_time": chrono::Utc::now().timestamp(),
        "records_loaded": records_loaded,
        "working_file_exists": server.state.working_file_exists(),
        "source_file_exists": server.state.source_file_exists(),
        "uptime_seconds": server.state.uptime_seconds()
    }))
}

/// GET /api — service information.
async fn api_info<S>(State(server): State<EditorServer<S>>) -> Json<Value>
where
    S: EditorStore + 'static,
{
    let records_loaded = server.store.record_count().await;

    Json(json!({
        "message": "EIN Names Editor API",
        "version": env!("CARGO_PKG_VERSION"),
        "records_loaded": records_loaded,
        "source_file": server.state.source_file.display().to_string(),
        "working_file": server.state.working_file.display().to_string()
    }))
}
