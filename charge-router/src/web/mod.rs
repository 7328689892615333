//! Web layer for the charging route engine.
//!
//! Provides HTTP endpoints for ranking stations and planning routes.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
