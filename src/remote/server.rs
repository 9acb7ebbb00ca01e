use std::{net::SocketAddr, sync::Arc};

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tokio::net::TcpListener;
use tracing::{error, info};

use super::protocol::{ErrorBody, HEALTH_PATH, HealthBody, PREDICT_PATH, PredictRequest};
use crate::providers::PipelineProvider;
use crate::service::{ErrorKind, InferenceService, ServiceError};

/// Build the HTTP routes for a shared service.
///
/// The service should already be loaded; requests arriving otherwise are
/// answered with `503` and a `not_loaded` body.
pub fn router<P>(service: Arc<InferenceService<P>>) -> Router
where
    P: PipelineProvider + 'static,
{
    Router::new()
        .route(HEALTH_PATH, get(health::<P>))
        .route(PREDICT_PATH, post(predict::<P>))
        .with_state(service)
}

/// Serve `service` on `addr` until the process is stopped.
///
/// # Errors
///
/// Returns an I/O error if the listener cannot be bound or the server fails.
pub async fn serve<P>(service: Arc<InferenceService<P>>, addr: SocketAddr) -> std::io::Result<()>
where
    P: PipelineProvider + 'static,
{
    let listener = TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, task = %service.task(), "serving predictions");
    axum::serve(listener, router(service)).await
}

async fn health<P>(State(service): State<Arc<InferenceService<P>>>) -> Json<HealthBody>
where
    P: PipelineProvider + 'static,
{
    Json(HealthBody {
        loaded: service.is_loaded(),
        task: service.task(),
    })
}

async fn predict<P>(
    State(service): State<Arc<InferenceService<P>>>,
    Json(request): Json<PredictRequest>,
) -> Response
where
    P: PipelineProvider + 'static,
{
    let outcome = tokio::task::spawn_blocking(move || service.predict(&request.text)).await;
    match outcome {
        Ok(Ok(result)) => Json(result).into_response(),
        Ok(Err(err)) => (status_for(&err), Json(ErrorBody::from(&err))).into_response(),
        Err(join) => {
            error!(error = %join, "prediction task aborted");
            let body = ErrorBody {
                kind: ErrorKind::InferenceFailure,
                message: join.to_string(),
            };
            (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
        }
    }
}

fn status_for(err: &ServiceError) -> StatusCode {
    match err.kind() {
        ErrorKind::NotLoaded | ErrorKind::ProviderUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorKind::InferenceFailure => StatusCode::UNPROCESSABLE_ENTITY,
    }
}
