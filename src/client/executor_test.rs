// ABOUTME: Tests for the retry loop in DatagenClient using a scripted transport.
// ABOUTME: Runs on paused tokio time so backoff delays are exact.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use tokio::time::Instant;
use tokio_test::{assert_err, assert_ok};

use super::*;
use crate::config::{ClientConfig, MapSource};
use crate::error::{DatagenError, HttpError, TransportError};

type Scripted = Result<TransportResponse, TransportError>;

#[derive(Debug, Clone)]
struct Call {
    url: String,
    api_key: String,
    body: serde_json::Value,
    timeout: Duration,
    at: Instant,
}

/// Replays canned responses in order; repeats the last one once the script runs out.
#[derive(Clone, Default)]
struct ScriptedTransport {
    script: Arc<Mutex<VecDeque<Scripted>>>,
    calls: Arc<Mutex<Vec<Call>>>,
}

impl ScriptedTransport {
    fn new(script: Vec<Scripted>) -> Self {
        Self {
            script: Arc::new(Mutex::new(script.into())),
            calls: Arc::default(),
        }
    }

    fn always(status: u16, body: &str) -> Self {
        Self::new(vec![Ok(TransportResponse::new(status, body))])
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn post_json(
        &self,
        url: &str,
        api_key: &str,
        body: &serde_json::Value,
        timeout: Duration,
    ) -> Result<TransportResponse, TransportError> {
        self.calls.lock().unwrap().push(Call {
            url: url.to_string(),
            api_key: api_key.to_string(),
            body: body.clone(),
            timeout,
            at: Instant::now(),
        });

        let mut script = self.script.lock().unwrap();
        if script.len() > 1 {
            script.pop_front().unwrap()
        } else {
            script.front().expect("empty script").clone()
        }
    }
}

const SUCCESS: &str = r#"{"success":true,"data":{"success":true,"result":[1,2,3]}}"#;

fn config(retries: u32, backoff: Duration) -> ClientConfig {
    ClientConfig::builder()
        .api_key("test_key")
        .base_url("http://gateway.test/")
        .max_retries(retries)
        .backoff_base(backoff)
        .build_with(&MapSource::new())
        .unwrap()
}

fn client(retries: u32, transport: &ScriptedTransport) -> DatagenClient {
    DatagenClient::with_transport(config(retries, Duration::from_millis(500)), transport.clone())
}

fn gaps(calls: &[Call]) -> Vec<Duration> {
    calls.windows(2).map(|w| w[1].at - w[0].at).collect()
}

fn assert_gaps(calls: &[Call], expected: &[u64]) {
    let actual = gaps(calls);
    assert_eq!(actual.len(), expected.len(), "gaps: {:?}", actual);
    for (gap, ms) in actual.iter().zip(expected) {
        let want = Duration::from_millis(*ms);
        assert!(
            *gap >= want && *gap < want + Duration::from_millis(5),
            "expected ~{:?}, got {:?}",
            want,
            gap
        );
    }
}

#[tokio::test(start_paused = true)]
async fn test_success_unwraps_result() {
    let transport = ScriptedTransport::always(200, SUCCESS);
    let result = client(0, &transport)
        .execute("test_tool", json!({"param": "value"}))
        .await;

    assert_eq!(assert_ok!(result), json!([1, 2, 3]));

    let calls = transport.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].url, "http://gateway.test/api/tools/execute");
    assert_eq!(calls[0].api_key, "test_key");
    assert_eq!(calls[0].timeout, Duration::from_secs(30));
    assert_eq!(
        calls[0].body,
        json!({"tool_alias_name": "test_tool", "parameters": {"param": "value"}})
    );
}

#[tokio::test(start_paused = true)]
async fn test_no_retry_by_default() {
    let transport = ScriptedTransport::always(503, "unavailable");
    let err = assert_err!(client(0, &transport).execute("test_tool", json!({})).await);

    assert_eq!(err.status(), Some(503));
    assert_eq!(transport.calls().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_backoff_sequence_then_http_error() {
    let transport = ScriptedTransport::always(503, "unavailable");
    let start = Instant::now();
    let err = assert_err!(client(3, &transport).execute("test_tool", json!({})).await);

    assert!(matches!(err, DatagenError::Http(HttpError::Status { status: 503, .. })));

    let calls = transport.calls();
    assert_eq!(calls.len(), 4);
    assert_gaps(&calls, &[500, 1000, 2000]);
    // No sleep after the final attempt.
    assert!(start.elapsed() < Duration::from_millis(3600));
}

#[tokio::test(start_paused = true)]
async fn test_auth_error_short_circuits_retries() {
    let transport = ScriptedTransport::always(401, "Unauthorized");
    let err = assert_err!(client(3, &transport).execute("test_tool", json!({})).await);

    assert!(err.is_auth());
    assert_eq!(transport.calls().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_tool_failure_not_retried() {
    let transport = ScriptedTransport::always(
        200,
        r#"{"success":true,"data":{"success":false,"error":"boom"}}"#,
    );
    let err = assert_err!(client(3, &transport).execute("test_tool", json!({})).await);

    assert!(err.is_tool_error());
    assert!(err.to_string().contains("boom"));
    assert_eq!(transport.calls().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_malformed_body_not_retried() {
    for body in ["this is not json", r#"{"success":true}"#] {
        let transport = ScriptedTransport::always(200, body);
        let err = assert_err!(client(3, &transport).execute("test_tool", json!({})).await);

        assert!(matches!(err, DatagenError::Http(HttpError::MalformedResponse(_))));
        assert_eq!(transport.calls().len(), 1);
    }
}

#[tokio::test(start_paused = true)]
async fn test_other_client_error_not_retried() {
    let transport = ScriptedTransport::always(404, "no such route");
    let err = assert_err!(client(3, &transport).execute("test_tool", json!({})).await);

    assert_eq!(err.status(), Some(404));
    assert_eq!(transport.calls().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_recovers_after_server_errors() {
    let transport = ScriptedTransport::new(vec![
        Ok(TransportResponse::new(500, "Server Error")),
        Ok(TransportResponse::new(500, "Server Error")),
        Ok(TransportResponse::new(200, SUCCESS)),
    ]);
    let result = client(2, &transport).execute("test_tool", json!({})).await;

    assert_eq!(assert_ok!(result), json!([1, 2, 3]));
    assert_eq!(transport.calls().len(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_network_errors_retried_then_surface_as_http() {
    let transport = ScriptedTransport::new(vec![Err(TransportError::Connect(
        "connection refused".into(),
    ))]);
    let err = assert_err!(client(2, &transport).execute("test_tool", json!({})).await);

    match err {
        DatagenError::Http(HttpError::Network(msg)) => assert!(msg.contains("connection refused")),
        other => panic!("expected network error, got {:?}", other),
    }
    assert_eq!(transport.calls().len(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_unbuildable_request_not_retried() {
    let transport = ScriptedTransport::new(vec![Err(TransportError::Request(
        "builder error".into(),
    ))]);
    let err = assert_err!(client(3, &transport).execute("test_tool", json!({})).await);

    assert!(matches!(err, DatagenError::InvalidConfig(_)));
    assert_eq!(transport.calls().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_rate_limit_then_success() {
    let transport = ScriptedTransport::new(vec![
        Ok(TransportResponse::new(429, "slow down")),
        Ok(TransportResponse::new(200, SUCCESS)),
    ]);
    let result = client(1, &transport).execute("test_tool", json!({})).await;

    assert_ok!(result);
    assert_gaps(&transport.calls(), &[500]);
}

#[tokio::test(start_paused = true)]
async fn test_empty_tool_name_rejected_before_network() {
    let transport = ScriptedTransport::always(200, SUCCESS);
    let err = assert_err!(client(0, &transport).execute("", json!({})).await);

    assert!(matches!(err, DatagenError::InvalidArgument(_)));
    assert!(err.to_string().contains("tool_alias_name is required"));
    assert!(transport.calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_null_parameters_become_empty_object() {
    let transport = ScriptedTransport::always(200, SUCCESS);
    let c = client(0, &transport);
    assert_ok!(c.execute("test_tool", serde_json::Value::Null).await);
    assert_ok!(c.execute_without_params("test_tool").await);

    for call in transport.calls() {
        assert_eq!(call.body["parameters"], json!({}));
    }
}

#[tokio::test(start_paused = true)]
async fn test_non_object_parameters_rejected() {
    let transport = ScriptedTransport::always(200, SUCCESS);
    let err = assert_err!(client(0, &transport).execute("test_tool", json!([1, 2])).await);

    assert!(matches!(err, DatagenError::InvalidArgument(_)));
    assert!(transport.calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_identical_clients_are_independent() {
    let left_transport = ScriptedTransport::always(200, SUCCESS);
    let right_transport = ScriptedTransport::always(200, SUCCESS);
    let left = client(0, &left_transport);
    let right = client(0, &right_transport);

    let calls = (0..8).map(|i| {
        let c = if i % 2 == 0 { left.clone() } else { right.clone() };
        async move { c.execute("test_tool", json!({"i": i})).await }
    });
    let results = futures::future::join_all(calls).await;

    for result in results {
        assert_eq!(assert_ok!(result), json!([1, 2, 3]));
    }

    let left_calls = left_transport.calls();
    let right_calls = right_transport.calls();
    assert_eq!(left_calls.len(), 4);
    assert_eq!(right_calls.len(), 4);
    assert!(left_calls.iter().all(|c| c.body["parameters"]["i"].as_i64().unwrap() % 2 == 0));
    assert!(right_calls.iter().all(|c| c.body["parameters"]["i"].as_i64().unwrap() % 2 == 1));
}

#[test]
fn test_client_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync + Clone>() {}
    assert_send_sync::<DatagenClient>();
}
