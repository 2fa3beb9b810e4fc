//! Solace API crate - axum HTTP server and route handlers.
//!
//! Exposes registration, login, chat, chat history, speech-to-text and a
//! health check as a JSON REST API.

pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::{create_router, start_server};
pub use state::AppState;
