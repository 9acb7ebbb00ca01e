use httpmock::{Method::POST, MockServer};
use rstest::*;
use text_classification::providers::http::{ApiClassifier, ApiClassifierError, ApiPipeline};
use text_classification::{
    ClassificationResult, InferenceService, PipelineProvider, ServiceError, Task, TextClassifier,
};

#[fixture]
fn mock_server() -> MockServer {
    MockServer::start()
}

fn classifier_for(server: &MockServer, api_key: Option<String>) -> ApiClassifier {
    let url = format!("{}/classify", server.base_url());
    ApiPipeline::new(url, api_key)
        .acquire(Task::TextClassification)
        .unwrap_or_else(|e| panic!("acquire failed: {e}"))
}

#[rstest]
#[case(
    "good job",
    ClassificationResult::new("POSITIVE", 0.9998),
    serde_json::json!([[{ "label": "POSITIVE", "score": 0.9998 }, { "label": "NEGATIVE", "score": 0.0002 }]])
)]
#[case(
    "awful",
    ClassificationResult::new("NEGATIVE", 0.97),
    serde_json::json!([{ "label": "POSITIVE", "score": 0.03 }, { "label": "NEGATIVE", "score": 0.97 }])
)]
fn test_success_cases(
    #[case] input: &str,
    #[case] expected: ClassificationResult,
    #[case] mock_json: serde_json::Value,
    mock_server: MockServer,
) {
    mock_server.mock(|when, then| {
        when.method(POST)
            .path("/classify")
            .header("content-type", "application/json")
            .json_body(serde_json::json!({ "inputs": input }));
        then.status(200).json_body(mock_json);
    });
    let classifier = classifier_for(&mock_server, None);
    let result = match classifier.classify(input) {
        Ok(r) => r,
        Err(e) => panic!("classification error: {e:?}"),
    };
    assert_eq!(result, expected);
}

#[rstest]
fn test_bearer_auth_success(mock_server: MockServer) {
    let mock = mock_server.mock(|when, then| {
        when.method(POST)
            .path("/classify")
            .header("authorization", "Bearer secret");
        then.status(200)
            .json_body(serde_json::json!([[{ "label": "POSITIVE", "score": 0.9 }]]));
    });
    let classifier = classifier_for(&mock_server, Some("secret".into()));
    let result = classifier
        .classify("hi")
        .unwrap_or_else(|e| panic!("classification error: {e:?}"));
    assert_eq!(result.label, "POSITIVE");
    mock.assert();
}

#[derive(Clone, Copy)]
enum ExpectedError {
    Request,
    Empty,
    InvalidResponse,
}

#[rstest]
#[case(500, None::<serde_json::Value>, Some(""), ExpectedError::Request)]
#[case(401, None, Some("unauthorised"), ExpectedError::Request)]
#[case(200, Some(serde_json::json!([])), None, ExpectedError::Empty)]
#[case(200, Some(serde_json::json!([[]])), None, ExpectedError::Empty)]
#[case(200, None, Some(r#"[{"label":"POSITIVE","score":"high"}]"#), ExpectedError::InvalidResponse)]
#[case(200, Some(serde_json::json!({ "error": "loading" })), None, ExpectedError::InvalidResponse)]
fn test_error_cases(
    #[case] http_status: u16,
    #[case] response_json: Option<serde_json::Value>,
    #[case] response_body: Option<&str>,
    #[case] expected_error: ExpectedError,
    mock_server: MockServer,
) {
    mock_server.mock(|when, then| {
        when.method(POST).path("/classify");
        match (response_json, response_body) {
            (Some(json), _) => {
                then.status(http_status)
                    .header("content-type", "application/json")
                    .json_body(json);
            }
            (None, Some(body)) => {
                then.status(http_status)
                    .header("content-type", "application/json")
                    .body(body);
            }
            (None, None) => {
                then.status(http_status);
            }
        }
    });
    let classifier = classifier_for(&mock_server, None);
    let Err(err) = classifier.classify("text") else {
        panic!("expected error")
    };
    match expected_error {
        ExpectedError::Request => assert!(matches!(err, ApiClassifierError::Request(_))),
        ExpectedError::Empty => assert_eq!(err, ApiClassifierError::Empty),
        ExpectedError::InvalidResponse => assert_eq!(err, ApiClassifierError::InvalidResponse),
    }
}

#[rstest]
fn endpoint_failure_surfaces_as_inference_failure(mock_server: MockServer) {
    mock_server.mock(|when, then| {
        when.method(POST).path("/classify");
        then.status(503);
    });
    let url = format!("{}/classify", mock_server.base_url());
    let mut service = InferenceService::new(ApiPipeline::new(url, None));
    service
        .load()
        .unwrap_or_else(|e| panic!("load failed: {e}"));
    assert!(matches!(
        service.predict("good job"),
        Err(ServiceError::InferenceFailure(_))
    ));
}

#[test]
fn blank_url_surfaces_as_provider_unavailable() {
    let mut service = InferenceService::new(ApiPipeline::new("", None));
    assert!(matches!(
        service.load(),
        Err(ServiceError::ProviderUnavailable { .. })
    ));
    assert!(!service.is_loaded());
}
