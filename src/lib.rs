// Fixed-depth minimax/alpha-beta chess bot served over HTTP
pub mod api;
pub mod board;
pub mod error;
pub mod game;
pub mod rules;
pub mod search;
pub mod selfplay;

pub use error::{EngineError, Outcome, Result};
