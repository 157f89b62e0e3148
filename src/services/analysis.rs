use std::fmt;

use crate::models::{
    FollowUpPlan, LabTestSuggestion, Patient, PrescriptionSuggestion, ReportAnalysis,
    SuggestionRequest, Vitals, VitalsAnalysis,
};
use crate::services::gemini::{Attachment, GeminiClient};
use crate::services::parser::{self, ModelReply, ParseError};
use crate::services::{mock, prompts, scoring};

/// Why the model path did not produce the result
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackReason {
    NotConfigured,
    Upstream(String),
    NoJson,
    InvalidJson(String),
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FallbackReason::NotConfigured => write!(f, "Gemini API key not configured"),
            FallbackReason::Upstream(e) => write!(f, "{}", e),
            FallbackReason::NoJson => write!(f, "no JSON object in model reply"),
            FallbackReason::InvalidJson(e) => write!(f, "unusable model reply: {}", e),
        }
    }
}

impl From<ParseError> for FallbackReason {
    fn from(err: ParseError) -> Self {
        match err {
            ParseError::NoJson => FallbackReason::NoJson,
            ParseError::InvalidJson(e) => FallbackReason::InvalidJson(e.to_string()),
        }
    }
}

/// Result of an analysis: either the model's parsed reply or the mock substitute
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisOutcome<T> {
    Parsed(T),
    Fallback { result: T, reason: FallbackReason },
}

impl<T> AnalysisOutcome<T> {
    pub fn is_fallback(&self) -> bool {
        matches!(self, AnalysisOutcome::Fallback { .. })
    }

    pub fn result(&self) -> &T {
        match self {
            AnalysisOutcome::Parsed(result) => result,
            AnalysisOutcome::Fallback { result, .. } => result,
        }
    }

    pub fn into_result(self) -> T {
        match self {
            AnalysisOutcome::Parsed(result) => result,
            AnalysisOutcome::Fallback { result, .. } => result,
        }
    }

    /// Short label for logs
    pub fn source(&self) -> String {
        match self {
            AnalysisOutcome::Parsed(_) => "gemini".to_string(),
            AnalysisOutcome::Fallback { reason, .. } => format!("mock ({})", reason),
        }
    }
}

/// Ask the model, parse its reply, or fall back to the mock generator
async fn model_or_fallback<T, F>(
    client: Option<&GeminiClient>,
    prompt: String,
    attachment: Option<&Attachment>,
    fallback: F,
) -> AnalysisOutcome<T>
where
    T: ModelReply,
    F: FnOnce() -> T,
{
    let Some(client) = client else {
        return AnalysisOutcome::Fallback {
            result: fallback(),
            reason: FallbackReason::NotConfigured,
        };
    };

    let reason = match client.generate(&prompt, attachment).await {
        Ok(text) => match parser::parse_reply::<T>(&text) {
            Ok(reply) => return AnalysisOutcome::Parsed(reply),
            Err(e) => {
                log::warn!("Gemini reply could not be parsed: {}", e);
                FallbackReason::from(e)
            }
        },
        Err(e) => {
            log::error!("Gemini API error: {}", e);
            FallbackReason::Upstream(e.to_string())
        }
    };

    AnalysisOutcome::Fallback {
        result: fallback(),
        reason,
    }
}

/// Content of an uploaded lab report as it reaches the model
#[derive(Debug, Clone)]
pub enum ReportContent {
    /// PDF or image, sent inline
    File(Attachment),
    /// Plain-text report, pasted into the prompt
    Text(String),
    Empty,
}

pub async fn analyze_report(
    client: Option<&GeminiClient>,
    patient: &Patient,
    content: &ReportContent,
) -> AnalysisOutcome<ReportAnalysis> {
    let (prompt, attachment) = match content {
        ReportContent::File(file) => (prompts::report_analysis(patient, None), Some(file)),
        ReportContent::Text(text) => (prompts::report_analysis(patient, Some(text)), None),
        ReportContent::Empty => (
            prompts::report_analysis(patient, Some("No report content could be read.")),
            None,
        ),
    };
    model_or_fallback(client, prompt, attachment, || mock::report_analysis(patient)).await
}

pub async fn analyze_vitals(
    client: Option<&GeminiClient>,
    patient: &Patient,
    vitals: &Vitals,
) -> AnalysisOutcome<VitalsAnalysis> {
    let prompt = prompts::vitals_analysis(patient, vitals);
    model_or_fallback(client, prompt, None, || scoring::score_vitals(patient, vitals)).await
}

pub async fn suggest_prescription(
    client: Option<&GeminiClient>,
    request: &SuggestionRequest,
) -> AnalysisOutcome<PrescriptionSuggestion> {
    let prompt = prompts::prescription(request);
    model_or_fallback(client, prompt, None, || mock::prescription(request)).await
}

pub async fn suggest_lab_tests(
    client: Option<&GeminiClient>,
    request: &SuggestionRequest,
) -> AnalysisOutcome<LabTestSuggestion> {
    let prompt = prompts::lab_tests(request);
    model_or_fallback(client, prompt, None, || mock::lab_tests(request)).await
}

pub async fn generate_follow_up(
    client: Option<&GeminiClient>,
    request: &SuggestionRequest,
) -> AnalysisOutcome<FollowUpPlan> {
    let prompt = prompts::follow_up(request);
    model_or_fallback(client, prompt, None, || mock::follow_up(request)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::AppSettings;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn client_replying(server: &MockServer, response: ResponseTemplate) -> GeminiClient {
        Mock::given(method("POST"))
            .respond_with(response)
            .mount(server)
            .await;
        let settings = AppSettings {
            gemini_api_key: Some("test-key".into()),
            gemini_api_base: server.uri(),
            ..AppSettings::default()
        };
        GeminiClient::from_settings(&settings).unwrap().unwrap()
    }

    fn text_reply(text: &str) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "candidates": [{ "content": { "parts": [{ "text": text }] } }]
        }))
    }

    fn patient() -> Patient {
        Patient::new("John Doe", "45", "Male")
    }

    #[tokio::test]
    async fn without_client_the_mock_is_used() {
        let vitals = Vitals {
            systolic: Some(145.0),
            diastolic: Some(95.0),
            ..Default::default()
        };
        let outcome = analyze_vitals(None, &patient(), &vitals).await;
        assert_eq!(
            outcome,
            AnalysisOutcome::Fallback {
                result: scoring::score_vitals(&patient(), &vitals),
                reason: FallbackReason::NotConfigured,
            }
        );
    }

    #[tokio::test]
    async fn parsed_reply_is_returned() {
        let server = MockServer::start().await;
        let client = client_replying(
            &server,
            text_reply(
                r#"Sure! {"metrics": [{"name": "LDL", "value": "160 mg/dL", "status": "Warning"}],
                   "summary": "**High** LDL.", "recommendations": "Diet."}"#,
            ),
        )
        .await;

        let outcome = analyze_report(Some(&client), &patient(), &ReportContent::Empty).await;
        assert!(!outcome.is_fallback());
        assert_eq!(outcome.result().summary, "High LDL.");
        assert_eq!(outcome.source(), "gemini");
    }

    #[tokio::test]
    async fn prose_reply_falls_back_with_no_json() {
        let server = MockServer::start().await;
        let client = client_replying(&server, text_reply("I am unable to help with that.")).await;

        let outcome = analyze_vitals(Some(&client), &patient(), &Vitals::default()).await;
        match outcome {
            AnalysisOutcome::Fallback { result, reason } => {
                assert_eq!(reason, FallbackReason::NoJson);
                assert_eq!(result.overall_score, 100);
            }
            AnalysisOutcome::Parsed(_) => panic!("expected fallback"),
        }
    }

    #[tokio::test]
    async fn upstream_failure_falls_back() {
        let server = MockServer::start().await;
        let client =
            client_replying(&server, ResponseTemplate::new(500).set_body_string("boom")).await;

        let request = SuggestionRequest::default();
        let outcome = suggest_lab_tests(Some(&client), &request).await;
        assert!(matches!(
            outcome,
            AnalysisOutcome::Fallback { reason: FallbackReason::Upstream(_), .. }
        ));
        assert_eq!(outcome.into_result(), mock::lab_tests(&request));
    }

    #[tokio::test]
    async fn wrong_schema_falls_back_with_invalid_json() {
        let server = MockServer::start().await;
        let client = client_replying(&server, text_reply(r#"{"medications": 3}"#)).await;

        let outcome = suggest_prescription(Some(&client), &SuggestionRequest::default()).await;
        assert!(matches!(
            outcome,
            AnalysisOutcome::Fallback { reason: FallbackReason::InvalidJson(_), .. }
        ));
    }
}
