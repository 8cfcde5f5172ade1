//! The client handle: connection lifecycle plus every RPC verb.

use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use strand_proto::{Method, Patch, RpcRequest, Target};

use crate::auth::{AuthResponse, Credentials};
use crate::config::ClientConfig;
use crate::decode::decode_payload;
use crate::error::{Error, Result};
use crate::query::result::QueryResults;
use crate::resolve::resolve;
use crate::rpc::ResponseRouter;
use crate::transport::reader::read_loop;
use crate::transport::{connection, ConnectionState, FrameSink, FrameSource, LinkState};

/// Handle to one server connection.
///
/// Cheap to share: every method takes `&self`, and any number of calls may
/// be in flight at once. Dropping the handle aborts the background reader;
/// call [`Client::close`] for an orderly shutdown.
pub struct Client {
    sink: Arc<dyn FrameSink>,
    router: Arc<ResponseRouter>,
    link: Arc<LinkState>,
    config: ClientConfig,
    reader: Mutex<Option<JoinHandle<()>>>,
}

impl Client {
    /// Connect to the configured endpoint and spawn the reader task.
    ///
    /// When the config asks for it, signs in and selects the namespace
    /// before returning, so a successful `connect` yields a handle that is
    /// ready for data operations.
    pub async fn connect(config: ClientConfig) -> Result<Self> {
        config.validate()?;

        let (sink, source) = connection::open(&config.endpoint, config.timeouts.connect)
            .await
            .map_err(|e| Error::Connect {
                endpoint: config.endpoint.clone(),
                message: e.to_string(),
            })?;

        let client = Self::with_transport(Box::new(sink), Box::new(source), config);
        debug!(
            endpoint = %client.config.endpoint,
            version = crate::VERSION,
            "connection established"
        );

        if client.config.auto_signin {
            if let Some(credentials) = client.config.credentials() {
                client.signin(&credentials).await?;
            }
        }
        if client.config.auto_use {
            if let (Some(ns), Some(db)) = (
                client.config.namespace.clone(),
                client.config.database.clone(),
            ) {
                client.use_ns(&ns, &db).await?;
            }
        }

        Ok(client)
    }

    /// Build a client over an already-open transport.
    ///
    /// This is how tests drive the full call pipeline without a server; the
    /// [`crate::transport::channel`] module provides a matching in-memory
    /// transport.
    pub fn with_transport(
        sink: Box<dyn FrameSink>,
        source: Box<dyn FrameSource>,
        config: ClientConfig,
    ) -> Self {
        let sink: Arc<dyn FrameSink> = Arc::from(sink);
        let router = Arc::new(ResponseRouter::new());
        let link = Arc::new(LinkState::new());
        link.set(ConnectionState::Open);

        let reader = tokio::spawn(read_loop(
            source,
            sink.clone(),
            router.clone(),
            link.clone(),
        ));

        Self {
            sink,
            router,
            link,
            config,
            reader: Mutex::new(Some(reader)),
        }
    }

    /// One full request/response round trip.
    async fn call(&self, method: Method, params: Vec<Value>) -> Result<Outcome> {
        let state = self.link.state();
        if state != ConnectionState::Open {
            return Err(Error::NotOpen { state });
        }

        let started = Instant::now();
        let (id, rx) = self.router.register(method)?;
        let request = RpcRequest::with_id(id, method, params);

        let frame = match request.to_frame() {
            Ok(frame) => frame,
            Err(e) => {
                self.router.cancel(&id);
                return Err(Error::Write {
                    message: format!("could not encode request: {e}"),
                });
            }
        };

        if let Err(e) = self.sink.send_text(frame).await {
            // The slot must not outlive the call it belongs to
            self.router.cancel(&id);
            return Err(Error::Write {
                message: e.to_string(),
            });
        }

        debug!(id = %id, method = %method, "sent request");

        let timeout = self.config.timeouts.request;
        match tokio::time::timeout(timeout, rx).await {
            Ok(Ok(response)) => {
                if let Some(server_error) = response.error {
                    return Err(Error::Protocol {
                        code: server_error.code,
                        message: server_error.message,
                    });
                }
                let value = resolve(method, &request.params, response.result)?;
                Ok(Outcome {
                    method,
                    value,
                    elapsed: started.elapsed(),
                })
            }
            // Slot dropped without a response: the reader shut down
            Ok(Err(_)) => match self.link.failure() {
                Some(message) => Err(Error::Read { message }),
                None => Err(Error::Cancelled {
                    method: method.to_string(),
                    reason: "connection closed".into(),
                }),
            },
            Err(_) => {
                self.router.cancel(&id);
                warn!(
                    id = %id,
                    method = %method,
                    timeout_ms = timeout.as_millis(),
                    "request timed out"
                );
                Err(Error::Timeout {
                    method: method.to_string(),
                    waited: timeout,
                })
            }
        }
    }

    /// Orderly shutdown: close frame, reader teardown, abandon in-flight
    /// calls. Safe to call more than once.
    pub async fn close(&self) -> Result<()> {
        if !self.link.begin_close() {
            return Ok(());
        }

        let closed = self.sink.close().await;

        // The reader normally exits when the close handshake completes;
        // abort covers a peer that never answers.
        if let Some(reader) = self.reader.lock().take() {
            reader.abort();
        }

        self.link.set(ConnectionState::Closed);
        let orphaned = self.router.drain();
        if orphaned > 0 {
            debug!(orphaned, "abandoned in-flight calls on close");
        }

        closed.map_err(|e| Error::Close {
            message: e.to_string(),
        })
    }

    // ------------------------------------------------------------------
    // Session verbs
    // ------------------------------------------------------------------

    /// Select the namespace and database for this session.
    pub async fn use_ns(&self, namespace: &str, database: &str) -> Result<()> {
        self.call(Method::Use, vec![json!(namespace), json!(database)])
            .await?;
        Ok(())
    }

    /// Session information for the currently signed-in user.
    pub async fn info(&self) -> Result<Outcome> {
        self.call(Method::Info, vec![]).await
    }

    /// Register a new user.
    pub async fn signup(&self, credentials: &Credentials) -> Result<AuthResponse> {
        let vars = self.encode("signup credentials", credentials)?;
        let outcome = self.call(Method::Signup, vec![vars]).await?;
        Ok(AuthResponse::from_value(outcome.value, outcome.elapsed))
    }

    /// Sign in. Root users get a token-less success; scope users get a
    /// token usable with [`Client::authenticate`].
    pub async fn signin(&self, credentials: &Credentials) -> Result<AuthResponse> {
        let vars = self.encode("signin credentials", credentials)?;
        let outcome = self.call(Method::Signin, vec![vars]).await?;
        Ok(AuthResponse::from_value(outcome.value, outcome.elapsed))
    }

    /// Drop the current session's authentication.
    pub async fn invalidate(&self) -> Result<()> {
        self.call(Method::Invalidate, vec![]).await?;
        Ok(())
    }

    /// Resume a session from a previously issued token.
    pub async fn authenticate(&self, token: &str) -> Result<()> {
        self.call(Method::Authenticate, vec![json!(token)]).await?;
        Ok(())
    }

    /// Start a live query on a table; returns the live query id.
    pub async fn live(&self, table: &str) -> Result<String> {
        let outcome = self.call(Method::Live, vec![json!(table)]).await?;
        outcome.take()
    }

    /// Stop a live query.
    pub async fn kill(&self, live_id: &str) -> Result<()> {
        self.call(Method::Kill, vec![json!(live_id)]).await?;
        Ok(())
    }

    /// Define a session variable usable as `$key` in later statements.
    pub async fn let_var(&self, key: &str, value: impl Serialize) -> Result<()> {
        let value = self.encode("session variable", value)?;
        self.call(Method::Let, vec![json!(key), value]).await?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Query
    // ------------------------------------------------------------------

    /// Run raw statements with named bindings.
    ///
    /// `bindings` serializes to a JSON object; pass `()` for none. Results
    /// arrive per statement, see [`QueryResults`].
    pub async fn query(&self, statement: &str, bindings: impl Serialize) -> Result<QueryResults> {
        let bindings = self.encode("query bindings", bindings)?;
        // The server rejects a missing bindings object
        let bindings = if bindings.is_null() {
            json!({})
        } else {
            bindings
        };

        let outcome = self
            .call(Method::Query, vec![json!(statement), bindings])
            .await?;
        QueryResults::from_value(outcome.value, outcome.elapsed)
    }

    // ------------------------------------------------------------------
    // Data verbs
    // ------------------------------------------------------------------

    /// Read a table or a single record.
    pub async fn select(&self, target: impl Into<Target>) -> Result<Outcome> {
        let target = target.into();
        self.call(Method::Select, vec![json!(target.to_string())])
            .await
    }

    /// Create a record (or records, when targeting a table).
    pub async fn create(&self, target: impl Into<Target>, data: impl Serialize) -> Result<Outcome> {
        let target = target.into();
        let data = self.encode("create data", data)?;
        self.call(Method::Create, vec![json!(target.to_string()), data])
            .await
    }

    /// Replace the content of the targeted records.
    pub async fn update(&self, target: impl Into<Target>, data: impl Serialize) -> Result<Outcome> {
        let target = target.into();
        let data = self.encode("update data", data)?;
        self.call(Method::Update, vec![json!(target.to_string()), data])
            .await
    }

    /// Merge fields into the targeted records, leaving the rest untouched.
    pub async fn change(&self, target: impl Into<Target>, data: impl Serialize) -> Result<Outcome> {
        let target = target.into();
        let data = self.encode("change data", data)?;
        self.call(Method::Change, vec![json!(target.to_string()), data])
            .await
    }

    /// Apply a patch list to the targeted records.
    pub async fn modify(&self, target: impl Into<Target>, patches: &[Patch]) -> Result<Outcome> {
        let target = target.into();
        let patches = self.encode("patch list", patches)?;
        self.call(Method::Modify, vec![json!(target.to_string()), patches])
            .await
    }

    /// Delete a table or a single record. The payload is discarded; success
    /// means the delete went through.
    pub async fn delete(&self, target: impl Into<Target>) -> Result<Outcome> {
        let target = target.into();
        self.call(Method::Delete, vec![json!(target.to_string())])
            .await
    }

    // ------------------------------------------------------------------
    // Introspection
    // ------------------------------------------------------------------

    /// Current connection state.
    pub fn state(&self) -> ConnectionState {
        self.link.state()
    }

    /// Number of calls currently waiting for their response.
    pub fn pending_count(&self) -> usize {
        self.router.pending_count()
    }

    /// The configuration this client was built with.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn encode(&self, what: &str, value: impl Serialize) -> Result<Value> {
        serde_json::to_value(value).map_err(|e| Error::Encode {
            message: format!("{what}: {e}"),
        })
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("endpoint", &self.config.endpoint)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

impl Drop for Client {
    fn drop(&mut self) {
        if let Some(reader) = self.reader.lock().take() {
            reader.abort();
        }
    }
}

/// Resolved result of a single call.
#[derive(Debug, Clone)]
pub struct Outcome {
    method: Method,
    value: Value,
    elapsed: Duration,
}

impl Outcome {
    /// Decode the payload into a concrete type. A single-record payload
    /// decodes directly; see [`crate::decode::decode_payload`] for the
    /// one-element unwrap rule.
    pub fn take<T: DeserializeOwned>(self) -> Result<T> {
        decode_payload(self.value)
    }

    /// The raw payload.
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Consume the outcome, keeping the raw payload.
    pub fn into_value(self) -> Value {
        self.value
    }

    /// True when the payload is JSON null.
    pub fn is_null(&self) -> bool {
        self.value.is_null()
    }

    /// The verb that produced this outcome.
    pub fn method(&self) -> Method {
        self.method
    }

    /// Round-trip time of the call.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }
}
