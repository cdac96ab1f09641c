//! Web layer for the transit itinerary service.
//!
//! Parses and validates query strings, calls the planner and renders JSON.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
