//! HTTP surface: `POST /api/chat` and `GET /api/health`.

mod error;
mod handlers;
mod routes;
mod state;

pub use error::{ApiError, ErrorBody};
pub use handlers::{ChatResponse, HealthResponse, REQUEST_ID_HEADER};
pub use routes::{cors_layer, create_router, serve};
pub use state::AppState;
