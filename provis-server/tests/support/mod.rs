use std::sync::Arc;
use std::time::Duration;

use axum_test::TestServer;
use serde_json::Value;
use tempfile::TempDir;
use uuid::Uuid;

use provis_server::{AppState, Config, create_app};

pub struct TestApp {
    pub server: TestServer,
    _tempdir: TempDir,
}

/// Build a server around a throwaway data directory and the given script
/// template body. The domain suffix is `invalid` (RFC 2606) so probes never
/// resolve.
pub fn build_test_app(template_body: &str) -> TestApp {
    let tempdir = TempDir::new().expect("failed to create tempdir");

    let template = tempdir.path().join("provision.sh.tmpl");
    std::fs::write(&template, template_body).expect("failed to write template");

    let public_dir = tempdir.path().join("public");
    std::fs::create_dir_all(&public_dir).expect("failed to create public dir");
    std::fs::write(
        public_dir.join("index.html"),
        "<html><body>Instance Provisioner</body></html>",
    )
    .expect("failed to write index.html");

    let config = Config {
        server_host: "127.0.0.1".to_string(),
        server_port: 0,
        public_dir,
        data_dir: tempdir.path().join("data"),
        script_template: template,
        domain_suffix: "invalid".to_string(),
        ping_timeout_secs: 1,
        cors_allowed_origins: vec![],
        dev_mode: true,
    };
    config.ensure_directories().expect("failed to create data dirs");

    let state = AppState::new(Arc::new(config));
    let server = TestServer::new(create_app(state)).expect("failed to start test server");

    TestApp {
        server,
        _tempdir: tempdir,
    }
}

/// Poll the status endpoint until the job reaches a terminal state.
pub async fn wait_for_terminal(server: &TestServer, job_id: &str) -> Value {
    for _ in 0..200 {
        let response = server.get(&format!("/api/status/{job_id}")).await;
        let job: Value = response.json();
        let status = job["status"].as_str().unwrap_or_default();
        if status == "completed" || status == "failed" {
            return job;
        }
        tokio::time::sleep(Duration::from_millis(25)).await;
    }
    panic!("job {job_id} never reached a terminal state");
}

pub fn parse_job_id(body: &Value) -> String {
    let raw = body["job_id"].as_str().expect("job_id missing");
    // Round-trip through Uuid to confirm the id is well formed.
    Uuid::parse_str(raw).expect("job_id is not a uuid").to_string()
}
