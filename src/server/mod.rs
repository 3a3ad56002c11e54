//! HTTP Server
//!
//! The axum surface over the skill pipeline: generation, validation,
//! templates, and the payment-gated download flow.

pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use routes::build_router;
pub use state::AppState;
