//! # StrandDB Driver Test Suite
//!
//! End-to-end flows that exercise the published client against an
//! in-process WebSocket server speaking the StrandDB RPC protocol.
//!
//! ## Structure
//!
//! ```text
//! src/
//! ├── support/        Mock server and response helpers
//! │   └── server.rs   One WebSocket server per test, scripted replies
//! └── integration/
//!     ├── rpc_flows.rs        Correlation, timeouts, protocol errors
//!     ├── crud_semantics.rs   Record verbs and payload shaping
//!     ├── query_flows.rs      Raw and built queries, statement results
//!     └── session_flows.rs    Auth, session verbs, connect and close
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p strand-tests
//! RUST_LOG=strand_client=debug cargo test -p strand-tests -- --nocapture
//! ```

#![allow(dead_code)]

pub mod integration;
pub mod support;
