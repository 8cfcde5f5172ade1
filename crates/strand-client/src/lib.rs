// Allow missing docs for internal items in development
#![allow(missing_docs)]

//! Async client driver for StrandDB over a persistent WebSocket.
//!
//! All RPC verbs share one socket. Each call is tagged with a unique id,
//! parked in a pending registry, and resolved when the background reader
//! task routes the matching response back. Any number of calls may be in
//! flight concurrently.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                          CLIENT                              │
//! ├──────────────────────────────────────────────────────────────┤
//! │  select / create / update / query / signin / ...             │
//! │                       │                                      │
//! │  ┌────────────────────┴───────────────────────┐              │
//! │  │               Call Pipeline                │              │
//! │  │   encode → register id → send → await      │              │
//! │  └────────────────────┬───────────────────────┘              │
//! │                       │                                      │
//! │  ┌────────────────────┴───────────────────────┐              │
//! │  │             Response Router                │              │
//! │  │      (id → oneshot slot, DashMap)          │              │
//! │  └────────────────────┬───────────────────────┘              │
//! │                       │                                      │
//! │  ┌────────────────────┴───────────────────────┐              │
//! │  │              Reader Task                   │              │
//! │  │   one loop per connection, parses frames   │              │
//! │  └────────────────────┬───────────────────────┘              │
//! └───────────────────────┼──────────────────────────────────────┘
//!                         │
//!                    WebSocket
//!                         │
//!                         ▼
//!                     StrandDB
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use strand_client::{Client, ClientConfig, Credentials};
//!
//! let config = ClientConfig::new("ws://127.0.0.1:8000/rpc");
//! let client = Client::connect(config).await?;
//! client.signin(&Credentials::root("root", "root")).await?;
//! client.use_ns("app", "main").await?;
//!
//! let created = client.create("user:tobie", &serde_json::json!({"name": "Tobie"})).await?;
//! ```

#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod auth;
pub mod client;
pub mod config;
pub mod decode;
pub mod error;
pub mod query;
pub mod registry;
pub(crate) mod resolve;
pub mod rpc;
pub mod transport;

// Re-exports for public API
pub use auth::{AuthResponse, Credentials};
pub use decode::decode_payload;
pub use client::{Client, Outcome};
pub use config::{ClientConfig, ConfigError, TimeoutConfig};
pub use error::{Error, Result};
pub use query::builder::{BuiltQuery, OrderDirection, QueryBuilder};
pub use query::operators::Operator;
pub use query::result::{QueryResults, StatementResult};
pub use registry::{clear_default, default_client, set_default};
pub use transport::ConnectionState;

// Wire types callers need when working with raw payloads
pub use strand_proto::{Method, Patch, PatchOp, RecordRef, RpcRequest, RpcResponse, Target};

/// Crate version, reported in logs at connect time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
