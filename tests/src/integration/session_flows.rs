//! Session lifecycle: authentication, session verbs, live queries,
//! connect-time conveniences, shutdown, and the default handle registry.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::{json, Value};
    use strand_client::{
        clear_default, default_client, set_default, Client, ClientConfig, ConnectionState,
        Credentials, Error,
    };

    use crate::support::server::{MockServer, Reply};
    use crate::support::{call_log, init_tracing, method_of, ok_response, params_of};

    // ===== TEST FIXTURES =====

    async fn connect(server: &MockServer) -> Client {
        Client::connect(ClientConfig::new(server.url()))
            .await
            .expect("connect to mock server")
    }

    // ===== TESTS =====

    #[tokio::test]
    async fn test_scope_signin_returns_a_token() {
        init_tracing();
        let log = call_log();
        let seen = log.clone();
        let server = MockServer::start(move |request| {
            seen.lock().push((method_of(&request), params_of(&request)));
            vec![Reply::Now(ok_response(&request, json!("jwt.header.payload")))]
        })
        .await;

        let client = connect(&server).await;
        let credentials = Credentials::root("bob", "hunter2")
            .with_namespace("app")
            .with_database("main")
            .with_scope("account");
        let auth = client.signin(&credentials).await.expect("signin");

        assert!(auth.has_token());
        assert_eq!(auth.token(), Some("jwt.header.payload"));

        // Credentials travel under their wire keys
        let entries = log.lock();
        let sent = &entries[0].1[0];
        assert_eq!(sent["user"], json!("bob"));
        assert_eq!(sent["pass"], json!("hunter2"));
        assert_eq!(sent["NS"], json!("app"));
        assert_eq!(sent["DB"], json!("main"));
        assert_eq!(sent["SC"], json!("account"));
    }

    #[tokio::test]
    async fn test_root_signin_is_token_less() {
        init_tracing();
        let server = MockServer::start(|request| {
            vec![Reply::Now(ok_response(&request, Value::Null))]
        })
        .await;

        let client = connect(&server).await;
        let auth = client
            .signin(&Credentials::root("root", "root"))
            .await
            .expect("signin");

        assert!(!auth.has_token());
        assert_eq!(auth.into_token(), None);
    }

    #[tokio::test]
    async fn test_signup_returns_a_token_for_the_new_user() {
        init_tracing();
        let server = MockServer::start(|request| {
            vec![Reply::Now(ok_response(&request, json!("fresh.token")))]
        })
        .await;

        let client = connect(&server).await;
        let credentials = Credentials::root("newbie", "pw")
            .with_namespace("app")
            .with_database("main")
            .with_scope("account");
        let auth = client.signup(&credentials).await.expect("signup");
        assert_eq!(auth.token(), Some("fresh.token"));
    }

    #[tokio::test]
    async fn test_session_verbs_use_their_wire_names() {
        init_tracing();
        let log = call_log();
        let seen = log.clone();
        let server = MockServer::start(move |request| {
            seen.lock().push((method_of(&request), params_of(&request)));
            vec![Reply::Now(ok_response(&request, Value::Null))]
        })
        .await;

        let client = connect(&server).await;
        client.use_ns("app", "main").await.expect("use");
        client
            .let_var("team", json!({ "name": "core" }))
            .await
            .expect("let");
        client.authenticate("jwt.header.payload").await.expect("authenticate");
        client.invalidate().await.expect("invalidate");

        let entries = log.lock();
        let calls: Vec<&str> = entries.iter().map(|(method, _)| method.as_str()).collect();
        assert_eq!(calls, ["use", "let", "authenticate", "invalidate"]);

        assert_eq!(entries[0].1, json!(["app", "main"]));
        assert_eq!(entries[1].1, json!(["team", { "name": "core" }]));
        assert_eq!(entries[2].1, json!(["jwt.header.payload"]));
        assert_eq!(entries[3].1, json!([]));
    }

    #[tokio::test]
    async fn test_live_query_start_and_kill() {
        init_tracing();
        let log = call_log();
        let seen = log.clone();
        let server = MockServer::start(move |request| {
            seen.lock().push((method_of(&request), params_of(&request)));
            let result = match method_of(&request).as_str() {
                "live" => json!("d4c9df11-5e83-4dcf-8ixd-live"),
                _ => Value::Null,
            };
            vec![Reply::Now(ok_response(&request, result))]
        })
        .await;

        let client = connect(&server).await;
        let live_id = client.live("user").await.expect("live");
        assert_eq!(live_id, "d4c9df11-5e83-4dcf-8ixd-live");

        client.kill(&live_id).await.expect("kill");

        let entries = log.lock();
        assert_eq!(entries[0].0, "live");
        assert_eq!(entries[0].1, json!(["user"]));
        assert_eq!(entries[1].0, "kill");
        assert_eq!(entries[1].1, json!([live_id]));
    }

    #[tokio::test]
    async fn test_connect_signs_in_and_selects_namespace_when_configured() {
        init_tracing();
        let log = call_log();
        let seen = log.clone();
        let server = MockServer::start(move |request| {
            seen.lock().push((method_of(&request), params_of(&request)));
            vec![Reply::Now(ok_response(&request, Value::Null))]
        })
        .await;

        let config = ClientConfig::new(server.url())
            .with_credentials("root", "secret")
            .with_namespace("app", "main");
        let client = Client::connect(config).await.expect("connect");

        {
            let entries = log.lock();
            let calls: Vec<&str> = entries.iter().map(|(method, _)| method.as_str()).collect();
            assert_eq!(calls, ["signin", "use"]);

            let signin = &entries[0].1[0];
            assert_eq!(signin["user"], json!("root"));
            assert_eq!(signin["pass"], json!("secret"));
            assert_eq!(signin["NS"], json!("app"));
            assert_eq!(signin["DB"], json!("main"));
            assert_eq!(entries[1].1, json!(["app", "main"]));
        }

        // The handle is ready for data calls straight away
        client.info().await.expect("info after connect");
    }

    #[tokio::test]
    async fn test_info_returns_session_details() {
        init_tracing();
        let server = MockServer::start(|request| {
            vec![Reply::Now(ok_response(
                &request,
                json!({ "id": "user:bob", "scope": "account" }),
            ))]
        })
        .await;

        let client = connect(&server).await;
        let outcome = client.info().await.expect("info");
        assert_eq!(outcome.value()["id"], json!("user:bob"));
    }

    #[tokio::test]
    async fn test_close_is_orderly_and_idempotent() {
        init_tracing();
        let server = MockServer::start(|request| {
            vec![Reply::Now(ok_response(&request, Value::Null))]
        })
        .await;

        let client = connect(&server).await;
        client.info().await.expect("info while open");
        assert_eq!(client.state(), ConnectionState::Open);

        client.close().await.expect("first close");
        assert_eq!(client.state(), ConnectionState::Closed);
        client.close().await.expect("second close is a no-op");

        let error = client.info().await.expect_err("closed handle rejects calls");
        assert!(matches!(
            error,
            Error::NotOpen {
                state: ConnectionState::Closed
            }
        ));
    }

    #[tokio::test]
    async fn test_connect_rejects_invalid_configuration_before_dialing() {
        init_tracing();
        let error = Client::connect(ClientConfig::new("http://127.0.0.1:8000/rpc"))
            .await
            .expect_err("not a websocket url");
        assert!(matches!(error, Error::Config(_)));
    }

    #[tokio::test]
    async fn test_connect_reports_unreachable_endpoint() {
        init_tracing();
        let error = Client::connect(ClientConfig::new("ws://127.0.0.1:9/rpc"))
            .await
            .expect_err("nothing listens on the discard port");

        match error {
            Error::Connect { endpoint, .. } => {
                assert_eq!(endpoint, "ws://127.0.0.1:9/rpc");
            }
            other => panic!("expected a connect error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_default_registry_shares_one_handle() {
        init_tracing();
        let server = MockServer::start(|request| {
            vec![Reply::Now(ok_response(&request, Value::Null))]
        })
        .await;

        let client = Arc::new(connect(&server).await);
        assert!(set_default(client.clone()).is_none());

        let shared = default_client().expect("registered handle");
        assert!(Arc::ptr_eq(&shared, &client));
        shared.info().await.expect("call through the registry");

        assert!(clear_default().is_some());
        assert!(default_client().is_none());
    }
}
