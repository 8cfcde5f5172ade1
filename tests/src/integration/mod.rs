//! End-to-end flows against the mock server.

pub mod crud_semantics;
pub mod rpc_flows;
pub mod session_flows;
