use axum::{
    extract::{
        multipart::MultipartRejection,
        rejection::JsonRejection,
        Multipart, State,
    },
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::{Patient, ReportAnalysis, Vitals, VitalsAnalysis};
use crate::services::analysis::{self, ReportContent};
use crate::services::gemini::Attachment;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct VitalsRequest {
    #[serde(default)]
    pub patient: Patient,
    #[serde(default)]
    pub vitals: Vitals,
}

/// Analyze an uploaded lab report (multipart: file, name, age, gender)
pub async fn analyze_report(
    State(state): State<AppState>,
    upload_form: Result<Multipart, MultipartRejection>,
) -> Result<Json<ReportAnalysis>, ApiError> {
    let mut multipart = upload_form?;
    let request_id = Uuid::new_v4();
    let max_bytes = state.settings.max_upload_bytes();

    let mut upload: Option<(String, Vec<u8>)> = None;
    let mut name = None;
    let mut age = None;
    let mut gender = None;

    while let Some(field) = multipart.next_field().await? {
        let field_name = field.name().unwrap_or_default().to_string();
        match field_name.as_str() {
            "file" => {
                let mime_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let data = field.bytes().await?;
                if data.len() > max_bytes {
                    return Err(ApiError::PayloadTooLarge {
                        max_mb: state.settings.max_upload_mb,
                    });
                }
                upload = Some((mime_type, data.to_vec()));
            }
            "name" => name = Some(field.text().await?),
            "age" => age = Some(field.text().await?),
            "gender" => gender = Some(field.text().await?),
            other => log::debug!("[{}] ignoring form field {:?}", request_id, other),
        }
    }

    let (mime_type, data) = upload.ok_or_else(|| missing("file"))?;
    let patient = Patient::new(
        name.ok_or_else(|| missing("name"))?,
        age.ok_or_else(|| missing("age"))?,
        gender.ok_or_else(|| missing("gender"))?,
    );

    log::info!(
        "[{}] analyzing {} report ({} bytes)",
        request_id,
        mime_type,
        data.len()
    );

    let content = report_content(mime_type, data);
    let outcome = analysis::analyze_report(state.gemini.as_ref(), &patient, &content).await;
    log::info!("[{}] report analysis served by {}", request_id, outcome.source());

    Ok(Json(outcome.into_result()))
}

/// Analyze patient vitals (JSON: {patient, vitals})
pub async fn analyze_vitals(
    State(state): State<AppState>,
    payload: Result<Json<VitalsRequest>, JsonRejection>,
) -> Result<Json<VitalsAnalysis>, ApiError> {
    let Json(request) = payload?;
    let request_id = Uuid::new_v4();

    let outcome =
        analysis::analyze_vitals(state.gemini.as_ref(), &request.patient, &request.vitals).await;
    log::info!(
        "[{}] vitals analysis served by {} (score {})",
        request_id,
        outcome.source(),
        outcome.result().overall_score
    );

    Ok(Json(outcome.into_result()))
}

fn missing(field: &str) -> ApiError {
    ApiError::InvalidInput(format!("Missing form field: {}", field))
}

/// Decide how an upload reaches the model
fn report_content(mime_type: String, data: Vec<u8>) -> ReportContent {
    if data.is_empty() {
        return ReportContent::Empty;
    }
    if mime_type == "application/pdf" || mime_type.starts_with("image/") {
        ReportContent::File(Attachment { mime_type, data })
    } else if mime_type.starts_with("text/") {
        ReportContent::Text(String::from_utf8_lossy(&data).into_owned())
    } else {
        log::warn!("Unsupported report type {}, analyzing patient data only", mime_type);
        ReportContent::Empty
    }
}
