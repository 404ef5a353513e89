use std::{
    net::{IpAddr, SocketAddr},
    sync::Arc,
};

use anyhow::Context;
use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderName, HeaderValue, Method, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use platform_api::{ApiError, ApiResult};
use platform_db::DbPool;
use products_hr::{
    Compensation, CompensationInput, Employee, HrModule, NewEmployee, ReportingStructure,
    Upserted,
};
use sea_orm::{ConnectionTrait, Statement};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::{debug, info};

use crate::config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub hr: HrModule,
    pub config: Arc<AppConfig>,
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

    info!(%config.addr, "hr server listening");
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
        .allow_headers([header::CONTENT_TYPE])
        .allow_methods([Method::GET, Method::POST, Method::PUT])
        .expose_headers([header::LOCATION])
        .allow_origin(allow_origin)
}

pub fn build_router(state: AppState) -> Router {
    let request_id = MakeRequestUuid;
    let header_name = HeaderName::from_static("x-request-id");
    Router::new()
        .route("/health", get(health_handler))
        .route(
            "/api/compensation/{id}",
            get(get_compensation).put(put_compensation),
        )
        .route("/api/reportingStructure/{id}", get(get_reporting_structure))
        .route("/api/employee", post(create_employee))
        .route("/api/employee/{id}", get(get_employee).put(replace_employee))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(header_name.clone(), request_id))
                .layer(PropagateRequestIdLayer::new(header_name))
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(&state.config.cors_allowed_origins)),
        )
        .with_state(state)
}

fn created<T: Serialize>(location: String, body: T) -> ApiResult<Response> {
    let location = HeaderValue::try_from(location)
        .map_err(|err| ApiError::internal(anyhow::Error::new(err)))?;
    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(body)).into_response())
}

async fn put_compensation(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<CompensationInput>,
) -> ApiResult<Response> {
    debug!(employee_id = %id, "compensation put received");
    let compensation = input.for_employee(&id)?;
    let outcome = state
        .hr
        .compensation()
        .upsert(compensation)
        .await?
        .ok_or(ApiError::NotFound)?;
    match outcome {
        Upserted::Created(stored) => {
            created(format!("/api/compensation/{}", stored.employee_id), stored)
        }
        Upserted::Replaced(_) => Ok(StatusCode::NO_CONTENT.into_response()),
    }
}

async fn get_compensation(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Compensation>> {
    debug!(employee_id = %id, "compensation get received");
    state
        .hr
        .compensation()
        .get_by_id(&id)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound)
}

async fn get_reporting_structure(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ReportingStructure>> {
    debug!(employee_id = %id, "reporting structure requested");
    state
        .hr
        .reporting()
        .get_by_id(&id)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound)
}

async fn create_employee(
    State(state): State<AppState>,
    Json(body): Json<NewEmployee>,
) -> ApiResult<Response> {
    let employee = state.hr.employees().create(body).await?;
    created(format!("/api/employee/{}", employee.employee_id), employee)
}

async fn get_employee(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Employee>> {
    state
        .hr
        .employees()
        .get_by_id(&id)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound)
}

async fn replace_employee(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<NewEmployee>,
) -> ApiResult<Json<Employee>> {
    state
        .hr
        .employees()
        .replace(&id, body)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound)
}

async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    let db_ok = state
        .pool
        .execute(Statement::from_string(
            state.pool.get_database_backend(),
            "SELECT 1".to_string(),
        ))
        .await
        .is_ok();
    Json(HealthResponse {
        ok: db_ok,
        db_ok,
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HealthResponse {
    ok: bool,
    db_ok: bool,
    version: &'static str,
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for ctrl-c");
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
                tracing::error!(error = %err, "failed to install SIGTERM handler");
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
