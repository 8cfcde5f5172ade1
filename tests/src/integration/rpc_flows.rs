//! Correlation and failure behavior of the call pipeline over a real
//! socket: id routing under concurrency, unmatched and malformed frames,
//! timeouts, and server-reported errors.

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use serde_json::{json, Value};
    use strand_client::{Client, ClientConfig, Error};
    use strand_proto::RequestId;

    use crate::support::server::{MockServer, Reply};
    use crate::support::{call_log, err_response, init_tracing, method_of, ok_response};

    // ===== TEST FIXTURES =====

    async fn connect(server: &MockServer) -> Client {
        Client::connect(ClientConfig::new(server.url()))
            .await
            .expect("connect to mock server")
    }

    // ===== TESTS =====

    #[tokio::test]
    async fn test_request_envelope_carries_id_method_and_params() {
        init_tracing();
        let log = call_log();
        let seen = log.clone();
        let server = MockServer::start(move |request| {
            seen.lock().push((method_of(&request), request.clone()));
            vec![Reply::Now(ok_response(&request, Value::Null))]
        })
        .await;

        let client = connect(&server).await;
        client.use_ns("app", "main").await.expect("use");
        client.invalidate().await.expect("invalidate");

        let entries = log.lock();
        let (method, request) = &entries[0];
        assert_eq!(method, "use");
        assert_eq!(request["params"], json!(["app", "main"]));
        assert!(
            serde_json::from_value::<RequestId>(request["id"].clone()).is_ok(),
            "id should be a uuid string: {:?}",
            request["id"]
        );

        // Every call gets a fresh correlation id
        assert_ne!(entries[0].1["id"], entries[1].1["id"]);
    }

    #[tokio::test]
    async fn test_concurrent_calls_route_by_id() {
        init_tracing();
        const CALLS: u64 = 8;

        let server = MockServer::start(move |request| {
            let table = request["params"][0].as_str().unwrap_or_default().to_string();
            let index: u64 = table.trim_start_matches("queue").parse().unwrap_or(0);
            // Later requests are answered sooner, so arrival order is reversed
            let delay = Duration::from_millis(10 * (CALLS - index));
            vec![Reply::After(
                delay,
                ok_response(&request, json!([{ "table": table }])),
            )]
        })
        .await;

        let client = Arc::new(connect(&server).await);
        let mut workers = Vec::new();
        for index in 0..CALLS {
            let client = client.clone();
            workers.push(tokio::spawn(async move {
                let table = format!("queue{index}");
                let outcome = client.select(table.as_str()).await.expect("select");
                assert_eq!(outcome.value()[0]["table"], json!(table));
            }));
        }
        for worker in workers {
            worker.await.expect("worker panicked");
        }
        assert_eq!(client.pending_count(), 0);
    }

    #[tokio::test]
    async fn test_foreign_and_idless_frames_are_dropped() {
        init_tracing();
        let server = MockServer::start(|request| {
            vec![
                // Unknown correlation id
                Reply::Raw(
                    json!({
                        "id": "00000000-0000-0000-0000-000000000000",
                        "result": "ghost"
                    })
                    .to_string(),
                ),
                // Push-style frame with no id at all
                Reply::Raw(json!({ "result": { "action": "CREATE" } }).to_string()),
                Reply::After(
                    Duration::from_millis(20),
                    ok_response(&request, json!({ "ready": true })),
                ),
            ]
        })
        .await;

        let client = connect(&server).await;
        let outcome = client.info().await.expect("info");
        assert_eq!(outcome.value()["ready"], json!(true));
    }

    #[tokio::test]
    async fn test_malformed_frame_is_skipped() {
        init_tracing();
        let server = MockServer::start(|request| {
            vec![
                Reply::Raw("{ this is not json".into()),
                Reply::After(
                    Duration::from_millis(10),
                    ok_response(&request, json!("intact")),
                ),
            ]
        })
        .await;

        let client = connect(&server).await;
        let outcome = client.info().await.expect("info survives garbage frame");
        assert_eq!(outcome.value(), &json!("intact"));
    }

    #[tokio::test]
    async fn test_timeout_frees_the_slot_and_late_reply_is_dropped() {
        init_tracing();
        let server = MockServer::start(|request| match method_of(&request).as_str() {
            "select" => vec![Reply::After(
                Duration::from_millis(400),
                ok_response(&request, json!([])),
            )],
            _ => vec![Reply::Now(ok_response(&request, json!({ "status": "ok" })))],
        })
        .await;

        let config =
            ClientConfig::new(server.url()).with_request_timeout(Duration::from_millis(100));
        let client = Client::connect(config).await.expect("connect");

        let error = client.select("glacier").await.expect_err("should time out");
        assert!(matches!(error, Error::Timeout { ref method, .. } if method == "select"));
        assert_eq!(client.pending_count(), 0);

        // Let the stale reply arrive; it must not disturb anything
        tokio::time::sleep(Duration::from_millis(400)).await;
        let outcome = client.info().await.expect("info after timeout");
        assert_eq!(outcome.value()["status"], json!("ok"));
        assert_eq!(client.pending_count(), 0);
    }

    #[tokio::test]
    async fn test_protocol_error_carries_code_and_message() {
        init_tracing();
        let server = MockServer::start(|request| {
            vec![Reply::Now(err_response(
                &request,
                -32000,
                "There was a problem with the database: Parse error",
            ))]
        })
        .await;

        let client = connect(&server).await;
        let error = client
            .query("SELEKT * FROM user", ())
            .await
            .expect_err("server rejects the statement");

        match error {
            Error::Protocol { code, message } => {
                assert_eq!(code, -32000);
                assert!(message.contains("Parse error"));
            }
            other => panic!("expected a protocol error, got {other:?}"),
        }
    }
}
