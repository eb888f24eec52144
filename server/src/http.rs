use std::{
    net::{IpAddr, SocketAddr},
    sync::Arc,
};

use anyhow::Context;
use async_graphql::http::GraphiQLSource;
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::{
    Json, Router,
    body::Bytes,
    extract::{DefaultBodyLimit, Path, Query, State},
    http::{self, HeaderName, HeaderValue, Method, StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use chrono::Utc;
use platform_db::{LocalObjectStore, SeaStore, objects::MAX_UPLOAD_BYTES};
use platform_store::{ObjectStore, StoreError};
use products_calendar::EventStore;
use products_directory::{
    Branch, Department, DirectoryStore, FilterCriteria, OnboardingStatus, Selector, UnknownLabel,
};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::{
    commands::directory_export,
    config::AppConfig,
    graphql::{GraphqlData, HubSchema, build_schema},
    prefs::PrefsStore,
};

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub schema: HubSchema,
    pub data: GraphqlData,
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Wire the stores and schema over one shared connection.
    pub async fn new(config: Arc<AppConfig>, db: DatabaseConnection) -> anyhow::Result<Self> {
        let store = Arc::new(SeaStore::new(db.clone()));
        let directory: Arc<dyn DirectoryStore> = store.clone();
        let events: Arc<dyn EventStore> = store;
        let objects: Arc<dyn ObjectStore> = Arc::new(LocalObjectStore::new(
            config.storage_dir.clone(),
            config.public_base_url.clone(),
        ));
        let prefs = Arc::new(PrefsStore::open(&config.prefs_path).await?);
        let data = GraphqlData {
            directory,
            events,
            objects,
            prefs,
            export_slug: config.export_slug.clone(),
        };
        Ok(Self {
            db,
            schema: build_schema(data.clone()),
            data,
            config,
        })
    }
}

#[derive(Clone, Debug)]
pub struct ServeConfig {
    addr: SocketAddr,
}

impl ServeConfig {
    pub fn new(host: IpAddr, port: u16) -> Self {
        Self {
            addr: SocketAddr::from((host, port)),
        }
    }
}

pub async fn serve(config: ServeConfig, state: AppState) -> anyhow::Result<()> {
    let router = build_router(state);
    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.addr))?;

    info!(%config.addr, "hub server listening");
    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;
    Ok(())
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed = origins
        .iter()
        .filter_map(|origin| origin.parse::<HeaderValue>().ok())
        .collect::<Vec<_>>();
    let allow_origin = if allowed.is_empty() {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(allowed)
    };
    CorsLayer::new()
        .allow_headers([http::header::CONTENT_TYPE])
        .allow_methods([Method::POST, Method::GET])
        .allow_origin(allow_origin)
        .expose_headers([header::CONTENT_DISPOSITION])
}

pub fn build_router(state: AppState) -> Router {
    let request_id = MakeRequestUuid;
    let header_name = HeaderName::from_static("x-request-id");
    let files = ServeDir::new(&state.config.storage_dir);
    Router::new()
        .route("/health", get(health_handler))
        .route("/graphql", post(graphql_handler))
        .route("/graphiql", get(graphiql_handler))
        .route("/directory/export.csv", get(export_handler))
        .route(
            "/teammates/{id}/headshot",
            post(headshot_handler).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .nest_service("/files", files)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(header_name.clone(), request_id))
                .layer(PropagateRequestIdLayer::new(header_name))
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(&state.config.cors_allowed_origins)),
        )
        .with_state(state)
}

async fn graphql_handler(State(state): State<AppState>, request: GraphQLRequest) -> GraphQLResponse {
    state.schema.execute(request.into_inner()).await.into()
}

async fn graphiql_handler() -> Html<String> {
    Html(GraphiQLSource::build().endpoint("/graphql").finish())
}

async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    let db_ok = state.db.ping().await.is_ok();
    let status = if db_ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (
        status,
        Json(HealthResponse {
            ok: db_ok,
            db_ok,
            version: env!("CARGO_PKG_VERSION"),
        }),
    )
}

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    db_ok: bool,
    version: &'static str,
}

/// Query string of the CSV download. Selectors take display labels, with
/// `All` or an empty value meaning unconstrained.
#[derive(Debug, Default, Deserialize)]
pub struct ExportQuery {
    #[serde(default)]
    search: String,
    #[serde(default)]
    department: String,
    #[serde(default)]
    branch: String,
    #[serde(default)]
    status: String,
}

impl ExportQuery {
    fn criteria(&self) -> Result<FilterCriteria, UnknownLabel> {
        Ok(FilterCriteria {
            search: self.search.trim().to_string(),
            department: Selector::<Department>::parse(&self.department)?,
            branch: Selector::<Branch>::parse(&self.branch)?,
            onboarding_status: Selector::<OnboardingStatus>::parse(&self.status)?,
        })
    }
}

async fn export_handler(
    State(state): State<AppState>,
    Query(query): Query<ExportQuery>,
) -> HttpResult<Response> {
    let criteria = query
        .criteria()
        .map_err(|err| HttpError::new(StatusCode::BAD_REQUEST, &err.to_string()))?;
    let export = directory_export(
        state.data.directory.as_ref(),
        &criteria,
        &state.config.export_slug,
        Utc::now().date_naive(),
    )
    .await?;
    info!(filename = %export.filename, "directory exported");
    Ok((
        [
            (header::CONTENT_TYPE, export.mime.to_string()),
            (header::CONTENT_DISPOSITION, export.content_disposition()),
        ],
        export.body,
    )
        .into_response())
}

#[derive(Debug, Deserialize)]
pub struct UploadQuery {
    filename: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct HeadshotResponse {
    headshot_url: String,
}

/// Store a new headshot, point the teammate at it, then drop the old file.
async fn headshot_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<UploadQuery>,
    body: Bytes,
) -> HttpResult<Json<HeadshotResponse>> {
    let previous = state
        .data
        .directory
        .get_profile(id)
        .await?
        .teammate
        .headshot_url;
    let objects = &state.data.objects;
    let url = objects
        .upload(body.to_vec(), &query.filename, Some(id))
        .await?;
    if let Err(err) = state.data.directory.set_headshot(id, Some(url.clone())).await {
        if let Err(cleanup) = objects.delete(&url).await {
            warn!(%id, error = %cleanup, "orphaned headshot upload");
        }
        return Err(err.into());
    }
    if let Some(old) = previous.filter(|old| *old != url) {
        if let Err(err) = objects.delete(&old).await {
            warn!(%id, error = %err, "previous headshot not removed");
        }
    }
    Ok(Json(HeadshotResponse { headshot_url: url }))
}

type HttpResult<T> = Result<T, HttpError>;

#[derive(Debug)]
struct HttpError {
    status: StatusCode,
    message: String,
}

impl HttpError {
    fn new(status: StatusCode, msg: &str) -> Self {
        Self {
            status,
            message: msg.to_string(),
        }
    }
}

impl From<StoreError> for HttpError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => Self::new(StatusCode::NOT_FOUND, "Teammate not found"),
            StoreError::InvalidInput(message) => Self::new(StatusCode::BAD_REQUEST, &message),
            other => {
                error!(error = %other, "request failed");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "internal server error")
            }
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        (self.status, self.message).into_response()
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(error = %err, "CTRL+C handler unavailable");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                error!(error = %err, "SIGTERM handler unavailable");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    ctrl_c.await;

    #[cfg(unix)]
    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    };
    info!("shutdown signal received");
}
