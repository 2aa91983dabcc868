//! Observation of a running match.
//!
//! Observers receive the referee's event stream. Deliveries are
//! time-bounded: an observer that overruns its budget (or panics) is
//! dropped for the rest of the match, and its failure never touches match
//! state. Events reach any single surviving observer in emission order.

use tracing::info;

use crate::board::Position;
use crate::game_state::{Action, GameState, PlayerColor};
use crate::referee::GameResult;

/// One entry of the referee's event stream.
#[derive(Debug, Clone)]
pub enum GameEvent {
    /// Snapshot of the game state, sent when the match state is first
    /// created and to observers registering while a match is in progress.
    Register(GameState),
    /// A penguin was placed at the given position.
    PenguinPlacement(Position),
    /// A turn was taken (a move, or an automatic skip).
    TurnAction(Action),
    /// The player with this color was disqualified.
    Disqualify(PlayerColor),
    /// The match is over. Always the last event an observer receives.
    EndOfGame(GameResult),
}

/// A consumer of match events.
pub trait Observer: Send + Sync {
    /// Handle one event. Must return within the configured observer
    /// deadline or the observer is dropped.
    fn on_event(&self, event: &GameEvent);
}

/// The observer the crate ships: forwards every event to the tracing log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingObserver;

impl Observer for LoggingObserver {
    fn on_event(&self, event: &GameEvent) {
        match event {
            GameEvent::Register(state) => {
                info!(players = state.players().len(), "match in progress");
            }
            GameEvent::PenguinPlacement(pos) => info!(%pos, "penguin placed"),
            GameEvent::TurnAction(action) => info!(%action, "turn taken"),
            GameEvent::Disqualify(color) => info!(%color, "player disqualified"),
            GameEvent::EndOfGame(result) => {
                info!(winners = ?result.winners, "match over");
            }
        }
    }
}
