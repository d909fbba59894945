//! HTTP API for driving challenge workflows
//!
//! - POST /challenges - Start a new challenge draft
//! - GET /challenges/:id - Query state, draft and totals
//! - DELETE /challenges/:id - Discard a challenge
//! - PUT /challenges/:id/statements/:index - Set statement text
//! - PUT /challenges/:id/lie - Select the lie
//! - POST /challenges/:id/statements/:index/record - Record a statement
//! - POST /challenges/:id/recording/cancel - Cancel the recording in flight
//! - POST /challenges/:id/preview - Move to preview
//! - POST /challenges/:id/edit - Back to editing
//! - POST /challenges/:id/confirm - Submit
//! - GET /health - Health check

mod handlers;
mod routes;
mod state;

pub use handlers::ErrorResponse;
pub use routes::create_router;
pub use state::{AppState, ChallengeWorkflow};
