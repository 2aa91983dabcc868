//! # Fish Referee
//!
//! A trusted referee for the board game *Fish*: it runs one complete match
//! between 2–4 opaque player agents, validating every response against the
//! rules, bounding every agent interaction by a wall-clock deadline,
//! disqualifying agents that fail or cheat, and producing a final ranked
//! [`GameResult`](crate::referee::GameResult).
//!
//! It provides:
//! - A pure, immutable game engine (`Board`, `GameState`, lazy `GameTree`)
//!   shared between rule enforcement and search
//! - Deterministic reference strategies (scanning placement, depth-bounded
//!   minimax) and a built-in [`LocalPlayer`](crate::player::LocalPlayer)
//! - The [`Referee`](crate::referee::Referee) orchestrator with per-call
//!   timeouts and fail/cheat classification
//! - A time-bounded [`Observer`](crate::observer::Observer) event stream
//!   with failure isolation
//!
//! Agents are untrusted. A call that errors, panics, returns a malformed
//! value, or misses its deadline disqualifies the agent; the match
//! continues with everyone else. All deadlines come from
//! [`RefereeConfig`](crate::configuration::RefereeConfig) and default to
//! ten seconds.
//!
//! # Usage Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use fish_referee::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = RefereeConfig::new();
//!     let mut referee = Referee::new(config);
//!     referee.add_observer(Arc::new(LoggingObserver));
//!
//!     let players: Vec<Arc<dyn Player>> = vec![
//!         Arc::new(LocalPlayer::new("alice", 2)),
//!         Arc::new(LocalPlayer::new("bob", 2)),
//!     ];
//!     let board = BoardConfig::Uniform {
//!         width: 5,
//!         height: 5,
//!         fish: 2,
//!     };
//!
//!     let result = referee.run_match(players, &board)?;
//!     println!("winners: {:?}", result.winners);
//!     Ok(())
//! }
//! ```
//!
//! # Writing your own agent
//!
//! Implement [`Player`](crate::player::Player): four operations, each
//! invoked by the referee under its timeout. Return positions and actions
//! computed from the snapshots you are handed; the referee validates them,
//! so an illegal answer costs you the match, never corrupts it.
#![warn(missing_docs)]

pub mod board;
pub mod configuration;
pub mod game_state;
pub mod game_tree;
pub mod logger;
pub mod observer;
pub mod player;
pub mod referee;
pub mod strategy;
pub mod timeout;

pub use anyhow;

/// Commonly used types and traits for quick access.
///
/// Import this prelude to get started easily:
/// ```rust
/// use fish_referee::prelude::*;
/// ```
pub mod prelude {
    pub use crate::board::{Board, BoardConfig, Position, Tile};
    pub use crate::configuration::RefereeConfig;
    pub use crate::game_state::{Action, GameState, PlayerColor};
    pub use crate::game_tree::GameTree;
    pub use crate::observer::{GameEvent, LoggingObserver, Observer};
    pub use crate::player::{LocalPlayer, Player};
    pub use crate::referee::{GameResult, MatchSetupError, Referee};
    pub use crate::strategy::{Actor, MinimaxActor, Placer, ScanningPlacer};
}
