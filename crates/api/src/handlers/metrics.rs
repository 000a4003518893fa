use crate::{errors::ApiError, state::AppState};
use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};
use tracing::{debug, instrument};

#[instrument(skip(state), name = "api_get_metrics")]
pub async fn get_metrics(State(state): State<AppState>) -> Result<Response, ApiError> {
    let body = state.render_metrics.execute()?;
    debug!(bytes = body.len(), "Rendered metrics");

    Ok((
        [(header::CONTENT_TYPE, state.render_metrics.content_type())],
        body,
    )
        .into_response())
}
