//! Play client: talks to the question service and keeps the player's state.
//!
//! Nothing here is persisted; the session lives as long as the process.

pub mod api;
pub mod score;
pub mod session;

pub use api::QuizClient;
pub use score::ScoreState;
pub use session::{Outcome, PlaySession};
