//! End-to-end lifecycle tests against a scripted HTTP server.
//!
//! These drive the public solve surface over real sockets, checking the
//! request bodies the crate actually puts on the wire as well as the
//! normalized outcomes it hands back.

use capmate::config::{ApiConfig, Config, NetworkConfig, PollingConfig};
use capmate::solver::{SolveOutcome, SolveRequest, Solver};
use capmate::tasks::{CaptchaTask, ImageToText};
use capmate::types::TaskStatus;
use serde_json::{json, Value};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Serve scripted responses one connection each, capturing the JSON request
/// bodies as they arrive.
async fn run_script(listener: TcpListener, responses: Vec<String>) -> Vec<Value> {
    let mut bodies = Vec::new();
    for response in responses {
        let (mut stream, _) = listener.accept().await.expect("accept");
        let mut request_buf = vec![0u8; 16384];
        let n = stream.read(&mut request_buf).await.unwrap_or(0);
        let request = String::from_utf8_lossy(&request_buf[..n]).into_owned();
        let body_start = request.find("\r\n\r\n").map(|i| i + 4).unwrap_or(request.len());
        if let Ok(body) = serde_json::from_str::<Value>(&request[body_start..]) {
            bodies.push(body);
        }
        let _ = stream.write_all(response.as_bytes()).await;
    }
    bodies
}

fn http_response(body: &str) -> String {
    format!(
        "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    )
}

fn fast_config(base_url: String) -> Config {
    Config {
        api: ApiConfig {
            base_url,
            client_key: "key-123".into(),
        },
        network: NetworkConfig::default(),
        polling: PollingConfig {
            initial_wait_secs: 0,
            poll_interval_secs: 0,
            max_polls: 30,
        },
    }
}

#[tokio::test]
async fn image_task_solves_after_one_processing_poll() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = tokio::spawn(run_script(
        listener,
        vec![
            http_response(r#"{"errorId":0,"taskId":456}"#),
            http_response(r#"{"errorId":0,"status":"processing"}"#),
            http_response(r#"{"errorId":0,"status":"ready","solution":{"text":"qGphJD"}}"#),
        ],
    ));

    let solver = Solver::new(fast_config(format!("http://{addr}")));
    let task = ImageToText::from_base64("aGk=").numeric(1);
    let outcome = solver
        .solve_request(SolveRequest::from_task(&task).with_initial_wait(Duration::ZERO))
        .await
        .expect("solve");

    let result = outcome.finished().expect("finished");
    assert_eq!(result.status, Some(TaskStatus::Ready));
    assert_eq!(result.solution_field("text"), Some(&json!("qGphJD")));
    assert_eq!(result.task_id, Some(456));

    let bodies = server.await.expect("server");
    assert_eq!(bodies.len(), 3, "one creation plus exactly two polls");

    // Creation request carries the envelope: credential, attribution, task.
    assert_eq!(bodies[0]["clientKey"], "key-123");
    assert!(bodies[0]["softId"].is_number());
    assert_eq!(bodies[0]["task"]["type"], "ImageToTextTask");
    assert_eq!(bodies[0]["task"]["body"], "aGk=");
    assert_eq!(bodies[0]["task"]["numeric"], 1);

    // Both polls reuse the identical query.
    let expected_query = json!({"clientKey": "key-123", "taskId": 456});
    assert_eq!(bodies[1], expected_query);
    assert_eq!(bodies[2], expected_query);
}

#[tokio::test]
async fn rejected_creation_returns_verdict_with_zero_polls() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = tokio::spawn(run_script(
        listener,
        vec![http_response(
            r#"{"errorId":1,"errorCode":"ERROR_KEY_DOES_NOT_EXIST"}"#,
        )],
    ));

    let solver = Solver::new(fast_config(format!("http://{addr}")));
    let outcome = solver
        .solve_request(SolveRequest::new(json!({"type": "ImageToTextTask", "body": "aGk="})))
        .await
        .expect("solve");

    let SolveOutcome::Rejected(created) = outcome else {
        panic!("expected rejection, got: {outcome:?}");
    };
    assert_eq!(created.error_id, 1);
    assert_eq!(created.error_code.as_deref(), Some("ERROR_KEY_DOES_NOT_EXIST"));
    assert_eq!(created.task_id, None);

    let bodies = server.await.expect("server");
    assert_eq!(bodies.len(), 1, "no result requests after a rejection");
}

#[tokio::test]
async fn callback_solves_return_after_creation_alone() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = tokio::spawn(run_script(
        listener,
        vec![http_response(r#"{"errorId":0,"taskId":888}"#)],
    ));

    let solver = Solver::new(fast_config(format!("http://{addr}")));
    let task = ImageToText::from_base64("aGk=");
    let outcome = solver
        .solve_request(
            SolveRequest::from_task(&task)
                .with_initial_wait(Duration::ZERO)
                .with_callback_url("https://example.com/hook"),
        )
        .await
        .expect("solve");

    let SolveOutcome::Deferred(query) = outcome else {
        panic!("expected deferred outcome, got: {outcome:?}");
    };
    assert_eq!(query.task_id, 888);
    assert_eq!(query.client_key, "key-123");

    let bodies = server.await.expect("server");
    assert_eq!(bodies.len(), 1, "callback mode issues only the creation call");
    assert_eq!(bodies[0]["callbackUrl"], "https://example.com/hook");
}

// The typed task surface and the raw-value surface must produce the same
// wire payload for the same logical task.
#[tokio::test]
async fn typed_and_raw_requests_share_a_wire_shape() {
    let task = ImageToText::from_base64("aGk=").comment("one word");
    let typed = task.to_task_value();
    let raw = json!({
        "type": "ImageToTextTask",
        "body": "aGk=",
        "comment": "one word",
    });
    assert_eq!(typed, raw);
}
