//! Typed decoding of resolved payloads.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{Error, Result};

/// Decode a resolved payload into the caller's type.
///
/// Exactly one convenience applies: when the payload is a one-element
/// array and the direct decode fails, the element itself is tried. That
/// lets callers ask for `User` where the server answered `[User]`. A
/// multi-element array never silently loses rows; asking for a scalar
/// from one is a decode error.
pub fn decode_payload<T: DeserializeOwned>(value: Value) -> Result<T> {
    let unwrapped = match &value {
        Value::Array(items) if items.len() == 1 => Some(items[0].clone()),
        _ => None,
    };

    match serde_json::from_value::<T>(value) {
        Ok(decoded) => Ok(decoded),
        Err(primary) => {
            if let Some(inner) = unwrapped {
                if let Ok(decoded) = serde_json::from_value::<T>(inner) {
                    return Ok(decoded);
                }
            }
            Err(Error::Decode { source: primary })
        }
    }
}
