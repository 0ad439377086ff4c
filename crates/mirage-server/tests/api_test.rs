//! End-to-end API tests: the sandbox backend is disabled and no model
//! providers are configured, so both phases run on their deterministic
//! paths.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use mirage_core::MirageConfig;
use mirage_server::{router, AppState};
use mirage_storage::AnalysisStore;
use serde_json::{json, Value};
use tower::ServiceExt;

fn test_app() -> Router {
    let config = MirageConfig::from_toml(
        r#"
        [sandbox]
        backend = "disabled"
        "#,
    )
    .unwrap();
    let store = AnalysisStore::open_in_memory().unwrap();
    router(AppState::new(config, store))
}

async fn request(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    let request = match body {
        Some(value) => builder.body(Body::from(value.to_string())).unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

/// Poll `GET /api/analysis/{id}` until the record is complete.
async fn poll_complete(app: &Router, id: i64) -> Value {
    for _ in 0..200 {
        let (status, body) = request(app, "GET", &format!("/api/analysis/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        if body["status"] == "complete" {
            return body;
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }
    panic!("analysis {id} never completed");
}

#[tokio::test]
async fn health_endpoint_responds() {
    let app = test_app();
    let (status, body) = request(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn analyze_returns_processing_then_completes() {
    let app = test_app();
    let (status, preliminary) = request(
        &app,
        "POST",
        "/api/analyze",
        Some(json!({
            "prompt": "divide a by b",
            "code": "def divide(a,b):\n    return a/b"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(preliminary["status"], "processing");
    assert_eq!(preliminary["language"], "python");
    let id = preliminary["id"].as_i64().unwrap();
    assert!(id > 0);

    // The preliminary record already carries the static finding.
    let patterns: Vec<&str> = preliminary["findings"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["pattern"].as_str().unwrap())
        .collect();
    assert!(patterns.contains(&"missing_corner_case"));

    let complete = poll_complete(&app, id).await;
    assert_eq!(complete["has_bugs"], true);
    // Completion never loses a preliminary pattern.
    let final_patterns: Vec<&str> = complete["findings"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["pattern"].as_str().unwrap())
        .collect();
    for pattern in patterns {
        assert!(final_patterns.contains(&pattern));
    }
    assert!(complete["linguistic_extras"].is_object());
}

#[tokio::test]
async fn clean_code_completes_without_bugs() {
    let app = test_app();
    let (_, preliminary) = request(
        &app,
        "POST",
        "/api/analyze",
        Some(json!({
            "prompt": "add two numbers",
            "code": "def add(a,b):\n    return a+b"
        })),
    )
    .await;
    let id = preliminary["id"].as_i64().unwrap();

    let complete = poll_complete(&app, id).await;
    assert_eq!(complete["has_bugs"], false);
    assert_eq!(complete["overall_severity"], 0);
    assert_eq!(complete["findings"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn syntax_error_yields_single_critical_finding() {
    let app = test_app();
    let (_, preliminary) = request(
        &app,
        "POST",
        "/api/analyze",
        Some(json!({
            "prompt": "add two numbers",
            "code": "def add(a,b)\n    return a+b"
        })),
    )
    .await;
    let findings = preliminary["findings"].as_array().unwrap();
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0]["pattern"], "syntax_error");
    assert!(findings[0]["severity"].as_u64().unwrap() >= 8);
    assert!(findings[0]["location"]
        .as_str()
        .unwrap()
        .contains("Line 1"));
}

#[tokio::test]
async fn empty_prompt_is_rejected() {
    let app = test_app();
    let (status, body) = request(
        &app,
        "POST",
        "/api/analyze",
        Some(json!({ "prompt": "  ", "code": "x = 1" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "INVALID_INPUT");
}

#[tokio::test]
async fn missing_analysis_is_404() {
    let app = test_app();
    let (status, body) = request(&app, "GET", "/api/analysis/9999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn feedback_round_trip() {
    let app = test_app();
    let (_, preliminary) = request(
        &app,
        "POST",
        "/api/analyze",
        Some(json!({ "prompt": "add", "code": "x = 1" })),
    )
    .await;
    let id = preliminary["id"].as_i64().unwrap();

    let (status, body) = request(
        &app,
        "POST",
        "/api/feedback",
        Some(json!({
            "analysis_id": id,
            "rating": 4,
            "comment": "caught the bug",
            "helpful": true
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["feedback_id"].as_i64().unwrap() > 0);

    let (status, body) = request(
        &app,
        "POST",
        "/api/feedback",
        Some(json!({ "analysis_id": id, "rating": 9 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "INVALID_INPUT");
}

#[tokio::test]
async fn history_and_stats_reflect_analyses() {
    let app = test_app();
    for i in 0..3 {
        let (_, preliminary) = request(
            &app,
            "POST",
            "/api/analyze",
            Some(json!({
                "prompt": format!("task {i}"),
                "code": "def divide(a,b):\n    return a/b"
            })),
        )
        .await;
        poll_complete(&app, preliminary["id"].as_i64().unwrap()).await;
    }

    let (status, body) = request(&app, "GET", "/api/history?limit=2", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["analyses"].as_array().unwrap().len(), 2);

    let (status, body) = request(&app, "GET", "/api/stats", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_analyses"], 3);
    assert!(body["pattern_frequency"]
        .as_array()
        .unwrap()
        .iter()
        .any(|p| p["pattern"] == "missing_corner_case"));
}

#[tokio::test]
async fn patterns_catalog_lists_all_ten() {
    let app = test_app();
    let (status, body) = request(&app, "GET", "/api/patterns", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_patterns"], 10);
    let tags: Vec<&str> = body["patterns"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["tag"].as_str().unwrap())
        .collect();
    for expected in [
        "syntax_error",
        "hallucinated_object",
        "incomplete_generation",
        "silly_mistake",
        "wrong_attribute",
        "wrong_input_type",
        "non_prompted_consideration",
        "prompt_biased_code",
        "missing_corner_case",
        "misinterpretation",
    ] {
        assert!(tags.contains(&expected), "missing {expected}");
    }
}

#[tokio::test]
async fn delete_removes_record() {
    let app = test_app();
    let (_, preliminary) = request(
        &app,
        "POST",
        "/api/analyze",
        Some(json!({ "prompt": "add", "code": "x = 1" })),
    )
    .await;
    let id = preliminary["id"].as_i64().unwrap();
    poll_complete(&app, id).await;

    let (status, _) = request(&app, "DELETE", &format!("/api/analysis/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = request(&app, "GET", &format!("/api/analysis/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
