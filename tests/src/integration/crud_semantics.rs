//! Record verbs end to end: how payloads come back for single-record
//! and table-wide operations, and how empty write replies surface.

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};
    use serde_json::{json, Value};
    use strand_client::{Client, ClientConfig, Error};
    use strand_proto::Patch;

    use crate::support::server::{MockServer, Reply};
    use crate::support::{call_log, init_tracing, method_of, ok_response};

    // ===== TEST FIXTURES =====

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct User {
        id: String,
        name: String,
    }

    fn bob() -> User {
        User {
            id: "user:bob".into(),
            name: "Bob".into(),
        }
    }

    async fn connect(server: &MockServer) -> Client {
        Client::connect(ClientConfig::new(server.url()))
            .await
            .expect("connect to mock server")
    }

    // ===== TESTS =====

    #[tokio::test]
    async fn test_create_single_record_unwraps_the_row() {
        init_tracing();
        let server = MockServer::start(|request| {
            // The server always answers writes with an array of rows
            let row = request["params"][1].clone();
            vec![Reply::Now(ok_response(&request, json!([row])))]
        })
        .await;

        let client = connect(&server).await;
        let outcome = client.create("user:bob", bob()).await.expect("create");

        // One record targeted, so the single row comes back bare
        assert_eq!(outcome.value()["name"], json!("Bob"));
        let created: User = outcome.take().expect("decode user");
        assert_eq!(created, bob());
    }

    #[tokio::test]
    async fn test_create_empty_reply_surfaces_permission_or_not_found() {
        init_tracing();
        let server = MockServer::start(|request| {
            vec![Reply::Now(ok_response(&request, json!([])))]
        })
        .await;

        let client = connect(&server).await;
        let error = client
            .create("user:bob", bob())
            .await
            .expect_err("empty write reply is an error");

        assert!(
            matches!(error, Error::PermissionOrNotFound { ref target } if target == "user:bob"),
            "got {error:?}"
        );
    }

    #[tokio::test]
    async fn test_select_single_record_found_and_missing() {
        init_tracing();
        let server = MockServer::start(|request| {
            let target = request["params"][0].as_str().unwrap_or_default();
            let rows = if target == "user:bob" {
                json!([{ "id": "user:bob", "name": "Bob" }])
            } else {
                json!([])
            };
            vec![Reply::Now(ok_response(&request, rows))]
        })
        .await;

        let client = connect(&server).await;

        let user: User = client
            .select("user:bob")
            .await
            .expect("select")
            .take()
            .expect("decode");
        assert_eq!(user, bob());

        let error = client.select("user:ghost").await.expect_err("missing row");
        assert!(matches!(error, Error::PermissionOrNotFound { .. }));
    }

    #[tokio::test]
    async fn test_table_select_passes_the_array_through() {
        init_tracing();
        let server = MockServer::start(|request| {
            vec![Reply::Now(ok_response(
                &request,
                json!([
                    { "id": "user:bob", "name": "Bob" },
                    { "id": "user:eve", "name": "Eve" }
                ]),
            ))]
        })
        .await;

        let client = connect(&server).await;
        let outcome = client.select("user").await.expect("select table");

        assert!(outcome.value().is_array());
        let users: Vec<User> = outcome.take().expect("decode all rows");
        assert_eq!(users.len(), 2);
        assert_eq!(users[1].name, "Eve");
    }

    #[tokio::test]
    async fn test_empty_table_select_stays_an_empty_array() {
        init_tracing();
        let server = MockServer::start(|request| {
            vec![Reply::Now(ok_response(&request, json!([])))]
        })
        .await;

        let client = connect(&server).await;
        let outcome = client.select("user").await.expect("select table");

        // No record in the target, so the empty array is a plain result
        assert_eq!(outcome.value(), &json!([]));
        let users: Vec<User> = outcome.take().expect("decode empty");
        assert!(users.is_empty());
    }

    #[tokio::test]
    async fn test_update_table_wide_returns_every_row() {
        init_tracing();
        let server = MockServer::start(|request| {
            let data = &request["params"][1];
            vec![Reply::Now(ok_response(
                &request,
                json!([
                    { "id": "user:bob", "name": data["name"] },
                    { "id": "user:eve", "name": data["name"] }
                ]),
            ))]
        })
        .await;

        let client = connect(&server).await;
        let outcome = client
            .update("user", json!({ "name": "Reset" }))
            .await
            .expect("update table");

        let users: Vec<User> = outcome.take().expect("decode");
        assert_eq!(users.len(), 2);
        assert!(users.iter().all(|user| user.name == "Reset"));
    }

    #[tokio::test]
    async fn test_change_merges_into_the_targeted_record() {
        init_tracing();
        let server = MockServer::start(|request| {
            vec![Reply::Now(ok_response(
                &request,
                json!([{ "id": "user:bob", "name": "Bob", "age": 30 }]),
            ))]
        })
        .await;

        let client = connect(&server).await;
        let outcome = client
            .change("user:bob", json!({ "age": 30 }))
            .await
            .expect("change");

        // Merge keeps existing fields alongside the new one
        assert_eq!(outcome.value()["name"], json!("Bob"));
        assert_eq!(outcome.value()["age"], json!(30));
    }

    #[tokio::test]
    async fn test_modify_sends_patches_in_list_order() {
        init_tracing();
        let log = call_log();
        let seen = log.clone();
        let server = MockServer::start(move |request| {
            seen.lock().push((method_of(&request), request.clone()));
            vec![Reply::Now(ok_response(
                &request,
                json!([{ "id": "user:bob", "name": "Eve" }]),
            ))]
        })
        .await;

        let client = connect(&server).await;
        let patches = vec![
            Patch::add("/tags", json!(["admin"])),
            Patch::replace("/name", json!("Eve")),
            Patch::remove("/legacy"),
        ];
        client.modify("user:bob", &patches).await.expect("modify");

        let entries = log.lock();
        let (method, request) = &entries[0];
        assert_eq!(method, "modify");
        assert_eq!(request["params"][0], json!("user:bob"));
        assert_eq!(
            request["params"][1],
            json!([
                { "op": "add", "path": "/tags", "value": ["admin"] },
                { "op": "replace", "path": "/name", "value": "Eve" },
                { "op": "remove", "path": "/legacy" }
            ])
        );
    }

    #[tokio::test]
    async fn test_delete_discards_the_payload() {
        init_tracing();
        let server = MockServer::start(|request| {
            // Deleted rows are echoed by the server but not surfaced
            vec![Reply::Now(ok_response(
                &request,
                json!([{ "id": "user:bob", "name": "Bob" }]),
            ))]
        })
        .await;

        let client = connect(&server).await;
        let outcome = client.delete("user:bob").await.expect("delete record");
        assert!(outcome.is_null());

        let outcome = client.delete("user").await.expect("delete table");
        assert!(outcome.is_null());
        assert_eq!(outcome.value(), &Value::Null);
    }
}
