//! Optional process-wide default client.
//!
//! Connections are explicit handles; nothing in this crate reads a global
//! on its own. Applications with a single connection can park it here once
//! at startup and reach it from anywhere without threading the handle
//! through every call site.

use lazy_static::lazy_static;
use parking_lot::RwLock;
use std::sync::Arc;

use crate::client::Client;

lazy_static! {
    static ref DEFAULT_CLIENT: RwLock<Option<Arc<Client>>> = RwLock::new(None);
}

/// Install `client` as the process-wide default. Returns the previously
/// installed client, if any.
pub fn set_default(client: Arc<Client>) -> Option<Arc<Client>> {
    DEFAULT_CLIENT.write().replace(client)
}

/// The current default client.
pub fn default_client() -> Option<Arc<Client>> {
    DEFAULT_CLIENT.read().clone()
}

/// Remove and return the default client.
pub fn clear_default() -> Option<Arc<Client>> {
    DEFAULT_CLIENT.write().take()
}
