use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::{FollowUpPlan, LabTestSuggestion, PrescriptionSuggestion, SuggestionRequest};
use crate::services::analysis;
use crate::AppState;

/// Medication suggestions for the doctor workspace
pub async fn suggest_prescription(
    State(state): State<AppState>,
    payload: Result<Json<SuggestionRequest>, JsonRejection>,
) -> Result<Json<PrescriptionSuggestion>, ApiError> {
    let Json(request) = payload?;
    let outcome = analysis::suggest_prescription(state.gemini.as_ref(), &request).await;
    log::info!(
        "[{}] prescription suggestion served by {}",
        Uuid::new_v4(),
        outcome.source()
    );
    Ok(Json(outcome.into_result()))
}

/// Recommended lab tests
pub async fn suggest_lab_tests(
    State(state): State<AppState>,
    payload: Result<Json<SuggestionRequest>, JsonRejection>,
) -> Result<Json<LabTestSuggestion>, ApiError> {
    let Json(request) = payload?;
    let outcome = analysis::suggest_lab_tests(state.gemini.as_ref(), &request).await;
    log::info!(
        "[{}] lab test suggestion served by {}",
        Uuid::new_v4(),
        outcome.source()
    );
    Ok(Json(outcome.into_result()))
}

/// Follow-up schedule
pub async fn generate_follow_up(
    State(state): State<AppState>,
    payload: Result<Json<SuggestionRequest>, JsonRejection>,
) -> Result<Json<FollowUpPlan>, ApiError> {
    let Json(request) = payload?;
    let outcome = analysis::generate_follow_up(state.gemini.as_ref(), &request).await;
    log::info!(
        "[{}] follow-up plan served by {}",
        Uuid::new_v4(),
        outcome.source()
    );
    Ok(Json(outcome.into_result()))
}
