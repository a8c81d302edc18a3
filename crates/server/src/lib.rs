//! Narration HTTP server
//!
//! Exposes the ahead-of-time preparation pipeline and the shared document
//! builder over HTTP, so content tooling and render-time clients use the
//! same normalization.

pub mod error;
pub mod routes;
pub mod state;

pub use error::ServerError;
pub use routes::create_router;
pub use state::AppState;
