use axum::{
    Router,
    extract::{Path as AxumPath, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use igw_core::{
    CoreConfig, ErrorKind, IgwError, InferenceRequest, InferenceRequestService, PriorityClass,
    RequestId, SubmissionOutcome, config::job_name_max_len_from_env_value,
    constants::DEFAULT_STORAGE_ROOT,
};

/// Application state shared across REST handlers.
#[derive(Clone)]
struct AppState {
    service: InferenceRequestService,
}

#[derive(Serialize)]
struct HealthRes {
    ok: bool,
    message: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AcceptedRes {
    inference_request_id: RequestId,
    #[serde(rename = "transactionID")]
    transaction_id: String,
    priority_class: PriorityClass,
}

#[derive(Serialize)]
struct RejectedRes {
    details: String,
}

/// Main entry point for the inference gateway intake server.
///
/// # Environment Variables
/// - `IGW_REST_ADDR`: REST server address (default: "0.0.0.0:3000")
/// - `IGW_STORAGE_ROOT`: root of per-request working storage (default: "payloads")
/// - `IGW_JOB_NAME_MAX_LEN`: job-name length cap (default: 63, at most 253)
///
/// # Errors
/// Returns an error if configuration is invalid, the address cannot be bound, or the server
/// fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive("igw=info".parse()?))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr = std::env::var("IGW_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());
    let storage_root =
        std::env::var("IGW_STORAGE_ROOT").unwrap_or_else(|_| DEFAULT_STORAGE_ROOT.into());
    let job_name_max_len =
        job_name_max_len_from_env_value(std::env::var("IGW_JOB_NAME_MAX_LEN").ok())?;

    let cfg = Arc::new(CoreConfig::new(PathBuf::from(storage_root), job_name_max_len)?);

    tracing::info!("++ Starting IGW REST on {}", addr);

    let app = Router::new()
        .route("/health", get(health))
        .route("/inference", post(submit_inference))
        .route("/inference/:id", get(read_inference).delete(release_inference))
        .layer(CorsLayer::permissive())
        .with_state(AppState {
            service: InferenceRequestService::new(cfg),
        });

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Health check endpoint.
async fn health(State(_state): State<AppState>) -> Json<HealthRes> {
    Json(HealthRes {
        ok: true,
        message: "IGW is alive".into(),
    })
}

/// Validate an inference request and register it when valid.
///
/// # Returns
/// * `200` with the generated request id and priority class
/// * `400` with the space-joined validation messages, or the schema mismatch
/// * `409` if the request id is already registered
async fn submit_inference(State(state): State<AppState>, body: String) -> Response {
    match state.service.submit_json(&body) {
        Ok(SubmissionOutcome::Accepted { record, .. }) => {
            let request = record.request();
            Json(AcceptedRes {
                inference_request_id: request.request_id(),
                transaction_id: request.transaction_id.clone(),
                priority_class: request.priority_class(),
            })
            .into_response()
        }
        Ok(SubmissionOutcome::Rejected(report)) => (
            StatusCode::BAD_REQUEST,
            Json(RejectedRes {
                details: report.details(),
            }),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

/// Return the current snapshot of a registered request.
async fn read_inference(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<String>,
) -> Result<Json<InferenceRequest>, Response> {
    let request_id = RequestId::parse(&id).map_err(error_response)?;
    let record = state
        .service
        .arena()
        .find(&request_id)
        .map_err(error_response)?;
    Ok(Json(record.snapshot()))
}

/// Unregister a finished request and return its final snapshot for archival.
async fn release_inference(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<String>,
) -> Result<Json<InferenceRequest>, Response> {
    let request_id = RequestId::parse(&id).map_err(error_response)?;
    let archived = state.service.release(&request_id).map_err(error_response)?;
    Ok(Json(archived))
}

fn error_response(e: IgwError) -> Response {
    let status = match e.kind() {
        ErrorKind::Input => StatusCode::BAD_REQUEST,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::ConfigurationConflict => StatusCode::CONFLICT,
        ErrorKind::PreconditionViolation => StatusCode::UNPROCESSABLE_ENTITY,
    };
    if status == StatusCode::BAD_REQUEST {
        tracing::warn!("Rejected inference request: {}", e);
    } else {
        tracing::error!("Inference request error: {:?}", e);
    }
    (
        status,
        Json(RejectedRes {
            details: e.to_string(),
        }),
    )
        .into_response()
}
