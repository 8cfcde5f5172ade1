//! # Strand Protocol Crate
//!
//! Wire-level types for the StrandDB RPC protocol. Every frame that crosses
//! the WebSocket is one of the envelopes defined here.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: the driver and the test suite both speak
//!   through these types; nothing re-declares wire shapes elsewhere.
//! - **Opaque payloads**: `params` and `result` stay as `serde_json::Value`
//!   at this layer. Typed decoding happens once, at the driver boundary.
//! - **Drop-safe responses**: a response may arrive without an `id` (server
//!   push frames); the envelope models that instead of failing to parse.

#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod correlation;
pub mod envelope;
pub mod method;
pub mod patch;
pub mod record;

pub use correlation::RequestId;
pub use envelope::{RpcRequest, RpcResponse, ServerError};
pub use method::{Method, UnknownMethod};
pub use patch::{Patch, PatchOp};
pub use record::{RecordRef, Target};
