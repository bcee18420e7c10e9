//! HTTP surface for availability reconciliation.

pub mod api;
pub mod state;
