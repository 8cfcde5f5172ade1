//! Request correlation machinery.

pub mod router;

pub use router::{ResponseRouter, RouterStats};
