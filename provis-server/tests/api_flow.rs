mod support;

use axum::http::StatusCode;
use serde_json::{Value, json};

use support::{build_test_app, parse_job_id, wait_for_terminal};

const ECHO_TEMPLATE: &str = "#!/bin/sh\necho provisioning {{HOSTNAME_PREFIX}}\n";
const FAILING_TEMPLATE: &str = "#!/bin/sh\necho boom >&2\nexit 1\n";

#[tokio::test]
async fn start_returns_queued_job_without_waiting() {
    let app = build_test_app("#!/bin/sh\nsleep 0.2\n");

    let response = app
        .server
        .post("/api/start")
        .json(&json!({ "text": "abc" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let body: Value = response.json();
    assert_eq!(body["status"], "queued");
    let job_id = parse_job_id(&body);

    // The job is observable immediately, before the script has finished.
    let status = app.server.get(&format!("/api/status/{job_id}")).await;
    assert_eq!(status.status_code(), StatusCode::OK);
    let job: Value = status.json();
    assert!(job["status"] == "queued" || job["status"] == "running");
}

#[tokio::test]
async fn completed_job_appends_instance_and_serves_log() {
    let app = build_test_app(ECHO_TEMPLATE);

    let response = app
        .server
        .post("/api/start")
        .json(&json!({ "text": "abc" }))
        .await;
    let job_id = parse_job_id(&response.json());

    let job = wait_for_terminal(&app.server, &job_id).await;
    assert_eq!(job["status"], "completed");
    assert_eq!(job["exit_code"], 0);

    let instances: Value = app.server.get("/api/instances").await.json();
    let instances = instances.as_array().unwrap();
    assert_eq!(instances.len(), 1);
    assert_eq!(instances[0]["hostname_prefix"], "abc");
    assert_eq!(instances[0]["job_id"], job_id.as_str());

    let log_file = job["log_file"].as_str().unwrap();
    let filename = log_file.rsplit('/').next().unwrap();
    let log = app.server.get(&format!("/logs/{filename}")).await;
    assert_eq!(log.status_code(), StatusCode::OK);
    assert!(log.text().contains("provisioning abc"));
    assert!(log.text().contains("exit code: 0"));
}

#[tokio::test]
async fn failed_job_records_error_and_no_instance() {
    let app = build_test_app(FAILING_TEMPLATE);

    let response = app
        .server
        .post("/api/start")
        .json(&json!({ "text": "abc" }))
        .await;
    let job_id = parse_job_id(&response.json());

    let job = wait_for_terminal(&app.server, &job_id).await;
    assert_eq!(job["status"], "failed");
    assert_eq!(job["exit_code"], 1);
    assert!(job["error"].as_str().unwrap().contains("boom"));

    let instances: Value = app.server.get("/api/instances").await.json();
    assert!(instances.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn empty_text_is_accepted_silently() {
    let app = build_test_app(ECHO_TEMPLATE);

    let response = app.server.post("/api/start").json(&json!({})).await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["status"], "queued");
}

#[tokio::test]
async fn unknown_job_id_is_a_404_with_error_body() {
    let app = build_test_app(ECHO_TEMPLATE);

    let response = app.server.get("/api/status/does-not-exist").await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert_eq!(body["error"], "Job not found");
}

#[tokio::test]
async fn jobs_listing_contains_every_submission() {
    let app = build_test_app(ECHO_TEMPLATE);

    for prefix in ["one", "two"] {
        app.server
            .post("/api/start")
            .json(&json!({ "text": prefix }))
            .await;
    }

    let jobs: Value = app.server.get("/api/jobs").await.json();
    assert_eq!(jobs.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn validate_unused_unreachable_prefix_is_valid() {
    let app = build_test_app(ECHO_TEMPLATE);

    let response = app.server.get("/api/validate/xyz").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["valid"], true);
    assert_eq!(body["hostname"], "xyz.invalid");
}

#[tokio::test]
async fn validate_rejects_cached_prefix() {
    let app = build_test_app(ECHO_TEMPLATE);

    let response = app
        .server
        .post("/api/start")
        .json(&json!({ "text": "taken" }))
        .await;
    let job_id = parse_job_id(&response.json());
    wait_for_terminal(&app.server, &job_id).await;

    // Case-insensitive: a different casing of the same prefix is still taken.
    let body: Value = app.server.get("/api/validate/TAKEN").await.json();
    assert_eq!(body["valid"], false);
    assert_eq!(body["reason"], "cache");
}

#[tokio::test]
async fn ping_reports_offline_for_unresolvable_host() {
    let app = build_test_app(ECHO_TEMPLATE);

    let body: Value = app.server.get("/api/ping/xyz").await.json();
    assert_eq!(body["hostname"], "xyz.invalid");
    assert_eq!(body["reachable"], false);
    assert_eq!(body["status"], "offline");
}

#[tokio::test]
async fn clear_cache_removes_instances_then_reports_nothing_to_clear() {
    let app = build_test_app(ECHO_TEMPLATE);

    let response = app
        .server
        .post("/api/start")
        .json(&json!({ "text": "abc" }))
        .await;
    let job_id = parse_job_id(&response.json());
    wait_for_terminal(&app.server, &job_id).await;

    let cleared = app.server.post("/api/clear-cache").await;
    assert_eq!(cleared.status_code(), StatusCode::OK);
    let body: Value = cleared.json();
    assert_eq!(body["success"], true);

    let instances: Value = app.server.get("/api/instances").await.json();
    assert!(instances.as_array().unwrap().is_empty());

    let again = app.server.post("/api/clear-cache").await;
    assert_eq!(again.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = again.json();
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn log_requests_cannot_escape_the_logs_directory() {
    let app = build_test_app(ECHO_TEMPLATE);

    let response = app.server.get("/logs/..%2Finstances.json").await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);

    let response = app.server.get("/logs/no-such-file.log").await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn health_reports_checks() {
    let app = build_test_app(ECHO_TEMPLATE);

    let response = app.server.get("/health").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["checks"]["logs_dir"]["exists"], true);
}

#[tokio::test]
async fn static_index_is_served_at_root() {
    let app = build_test_app(ECHO_TEMPLATE);

    let response = app.server.get("/").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert!(response.text().contains("Instance Provisioner"));
}
