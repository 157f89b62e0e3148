use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use medilens_lib::settings::AppSettings;
use medilens_lib::{router, AppState};
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const BOUNDARY: &str = "medilens-test-boundary";

fn mock_app() -> axum::Router {
    router(AppState::new(AppSettings::default()).unwrap())
}

async fn gemini_app(server: &MockServer, reply: &str) -> axum::Router {
    Mock::given(method("POST"))
        .and(path("/v1beta/models/test-model:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{ "content": { "parts": [{ "text": reply }] } }]
        })))
        .mount(server)
        .await;

    let settings = AppSettings {
        gemini_api_key: Some("test-key".into()),
        gemini_model: "test-model".into(),
        gemini_api_base: server.uri(),
        ..AppSettings::default()
    };
    router(AppState::new(settings).unwrap())
}

async fn send(app: axum::Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn json_post(uri: &str, body: Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn multipart_post(fields: &[(&str, &str)], file: Option<(&str, &[u8])>) -> Request<Body> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                BOUNDARY, name, value
            )
            .as_bytes(),
        );
    }
    if let Some((content_type, data)) = file {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"report\"\r\nContent-Type: {}\r\n\r\n",
                BOUNDARY, content_type
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());

    Request::post("/api/analyze")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

const PATIENT_FIELDS: [(&str, &str); 3] = [("name", "John Doe"), ("age", "45"), ("gender", "Male")];

#[tokio::test]
async fn root_reports_liveness() {
    let (status, body) = send(mock_app(), Request::get("/").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "MediLens API is running" }));
}

#[tokio::test]
async fn health_reports_mock_mode() {
    let (status, body) =
        send(mock_app(), Request::get("/health").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["geminiConfigured"], false);
    assert!(body["model"].is_null());
}

#[tokio::test]
async fn vitals_without_key_use_rule_based_scoring() {
    let request = json!({
        "patient": { "name": "John Doe", "age": "45", "gender": "Male" },
        "vitals": { "systolic": "145", "diastolic": "95", "heartRate": "88" }
    });
    let (status, body) = send(mock_app(), json_post("/api/analyze-vitals", request)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["overallScore"], 80);
    assert_eq!(body["metrics"][0]["name"], "Blood Pressure");
    assert_eq!(body["metrics"][0]["status"], "Critical");
    assert!(body["riskFactors"].as_array().unwrap().len() == 1);
    assert!(body["summary"].as_str().unwrap().contains("John Doe"));
}

#[tokio::test]
async fn vitals_mock_path_is_deterministic() {
    let request = json!({
        "patient": { "name": "Jane", "age": "52", "gender": "Female" },
        "vitals": { "oxygenSaturation": 89, "weight": "95", "height": "170", "diabetes": true }
    });
    let (_, first) = send(mock_app(), json_post("/api/analyze-vitals", request.clone())).await;
    let (_, second) = send(mock_app(), json_post("/api/analyze-vitals", request)).await;
    assert_eq!(first, second);
    assert_eq!(first["overallScore"], 60);
}

#[tokio::test]
async fn malformed_vitals_body_is_rejected_with_error_field() {
    let request = Request::post("/api/analyze-vitals")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = send(mock_app(), request).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn report_without_key_returns_mock_analysis() {
    let request = multipart_post(&PATIENT_FIELDS, Some(("application/pdf", b"%PDF-1.4".as_slice())));
    let (status, body) = send(mock_app(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["metrics"].as_array().unwrap().len(), 5);
    assert!(body["summary"]
        .as_str()
        .unwrap()
        .contains("John Doe's lab reports (Age: 45, Gender: Male)"));
    assert!(body.get("overallScore").is_none());
}

#[tokio::test]
async fn report_missing_field_is_rejected() {
    let request = multipart_post(&PATIENT_FIELDS[..2], Some(("image/png", b"png".as_slice())));
    let (status, body) = send(mock_app(), request).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "Invalid input: Missing form field: gender");
}

#[tokio::test]
async fn non_multipart_report_is_rejected_with_error_field() {
    let request = Request::post("/api/analyze")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"name": "John Doe"}"#))
        .unwrap();
    let (status, body) = send(mock_app(), request).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().starts_with("Invalid upload"));

    let request = Request::post("/api/analyze")
        .header(header::CONTENT_TYPE, "multipart/form-data")
        .body(Body::from("no boundary"))
        .unwrap();
    let (status, body) = send(mock_app(), request).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn oversized_report_is_rejected() {
    let settings = AppSettings {
        max_upload_mb: 1,
        ..AppSettings::default()
    };
    let app = router(AppState::new(settings).unwrap());
    let data = vec![b'x'; 1024 * 1024 + 1];
    let (status, body) = send(app, multipart_post(&PATIENT_FIELDS, Some(("image/png", data.as_slice())))).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert!(body["error"].as_str().unwrap().contains("max 1MB"));
}

#[tokio::test]
async fn huge_upload_limit_still_builds_router() {
    let settings = AppSettings {
        max_upload_mb: usize::MAX,
        ..AppSettings::default()
    };
    let app = router(AppState::new(settings).unwrap());
    let (status, _) = send(app, multipart_post(&PATIENT_FIELDS, Some(("image/png", b"png".as_slice())))).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn gemini_reply_is_parsed_and_cleaned() {
    let server = MockServer::start().await;
    let reply = r#"Here is the analysis:
{"overallScore": 42,
 "metrics": [{"name": "Blood Pressure", "value": "150/95 mmHg", "status": "Critical"}],
 "riskFactors": ["Hypertension"],
 "summary": "**Stage 2** hypertension.",
 "recommendations": "Read [this](http://x) and cut `salt`."}"#;
    let app = gemini_app(&server, reply).await;

    let request = json!({ "patient": { "name": "John" }, "vitals": { "systolic": 150 } });
    let (status, body) = send(app, json_post("/api/analyze-vitals", request)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["overallScore"], 50);
    assert_eq!(body["summary"], "Stage 2 hypertension.");
    assert_eq!(body["recommendations"], "Read this and cut salt.");
    assert_eq!(body["metrics"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn unparsable_gemini_reply_falls_back_to_mock() {
    let server = MockServer::start().await;
    let app = gemini_app(&server, "Sorry, I can't analyze this report.").await;

    let request = multipart_post(&PATIENT_FIELDS, Some(("image/jpeg", b"jpeg-bytes".as_slice())));
    let (status, body) = send(app, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["metrics"][1]["name"], "Cholesterol");
    assert_eq!(body["metrics"][1]["value"], "185 mg/dL");
}

#[tokio::test]
async fn health_reports_configured_model() {
    let server = MockServer::start().await;
    let app = gemini_app(&server, "{}").await;
    let (_, body) = send(app, Request::get("/health").body(Body::empty()).unwrap()).await;
    assert_eq!(body["geminiConfigured"], true);
    assert_eq!(body["model"], "test-model");
}

#[tokio::test]
async fn suggestion_endpoints_serve_mock_plans() {
    let request = json!({
        "patient": { "name": "John Doe", "age": "45", "gender": "Male" },
        "vitals": { "overallScore": 72, "systolic": 145, "diastolic": 95, "heartRate": 88 },
        "labReports": []
    });

    let (status, body) =
        send(mock_app(), json_post("/api/suggest-prescription", request.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["medications"][0]["name"], "Amlodipine");
    assert_eq!(body["medications"][0]["priority"], "High");

    let (status, body) = send(mock_app(), json_post("/api/suggest-lab-tests", request.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["tests"]
        .as_array()
        .unwrap()
        .iter()
        .any(|t| t["name"] == "Basic Metabolic Panel"));

    let (status, body) = send(mock_app(), json_post("/api/generate-followup", request)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["schedule"][0]["timeframe"], "2 weeks");
    assert!(body["monitoring"].is_string());
}

#[tokio::test]
async fn cors_allows_configured_frontend() {
    let request = Request::builder()
        .method("OPTIONS")
        .uri("/api/analyze-vitals")
        .header(header::ORIGIN, "http://localhost:3000")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
        .body(Body::empty())
        .unwrap();
    let response = mock_app().oneshot(request).await.unwrap();

    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "http://localhost:3000"
    );
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_CREDENTIALS],
        "true"
    );
}
