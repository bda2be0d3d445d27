use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Extension, Json,
};

use crate::{
    error::{AppError, Result},
    models::{patient::PatientForm, session::Session},
    services::predictions as prediction_service,
    state::AppState,
};

/// Runs a prediction for the submitted patient form.
#[axum::debug_handler]
pub async fn submit_prediction(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    payload: std::result::Result<Json<PatientForm>, JsonRejection>,
) -> Result<Response> {
    let Json(form) = payload.map_err(|e| AppError::Validation(e.body_text()))?;

    let record = prediction_service::submit(&state, &session, &form).await?;

    Ok((StatusCode::CREATED, Json(record)).into_response())
}

/// Lists every stored prediction, most recent first.
#[axum::debug_handler]
pub async fn list_predictions(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> Result<Response> {
    let records = prediction_service::history(&state, &session).await?;

    let body = sonic_rs::to_string(&records)
        .map_err(|e| AppError::Internal(format!("Serialization failed: {}", e)))?;

    Ok((StatusCode::OK, [(header::CONTENT_TYPE, "application/json")], body).into_response())
}

/// Downloads the prediction log as CSV.
#[axum::debug_handler]
pub async fn export_predictions(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> Result<Response> {
    let csv = prediction_service::export_csv(&state, &session).await?;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"predictions.csv\"",
            ),
        ],
        csv,
    )
        .into_response())
}
