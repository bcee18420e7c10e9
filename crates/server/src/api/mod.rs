pub mod cache;
pub mod handlers;
pub mod reconcile;
pub mod routes;

pub use routes::create_router;
