//! Debrid provider kinds and the availability payloads they return.
//!
//! The HTTP clients live elsewhere; this module only knows how to read their
//! already-fetched JSON bodies.

mod error;
mod provider;
mod responses;

pub use error::ReconcileError;
pub use provider::ProviderKind;
pub use responses::*;
