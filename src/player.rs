//! The contract between the referee and external agents.
//!
//! An agent is a bundle of four operations the referee invokes, every one
//! of them under a wall-clock timeout. Agents are untrusted: they may
//! return garbage, error, panic, or never return at all. Implementations
//! must be `Send + Sync` because each call runs on a worker thread the
//! referee abandons at the deadline.

use std::sync::Mutex;

use anyhow::Context;

use crate::board::Position;
use crate::game_state::{Action, GameState, PlayerColor};
use crate::game_tree::GameTree;
use crate::strategy::{Actor, MinimaxActor, Placer, ScanningPlacer};

/// An external agent playing one seat of the match.
///
/// Returning `Err` from any operation counts as a failure, exactly like a
/// timeout or a panic does. `name` is the external handle reported in the
/// match result; it must be a plain accessor and must not block.
pub trait Player: Send + Sync {
    /// The handle this agent is reported under.
    fn name(&self) -> String;

    /// Receive the color assigned for this match.
    fn assign_color(&self, color: PlayerColor) -> anyhow::Result<()>;

    /// Pick a position for the next penguin given the current state.
    fn place_penguin(&self, state: &GameState) -> anyhow::Result<Position>;

    /// Pick a move or skip given the current game tree.
    fn take_turn(&self, tree: &GameTree) -> anyhow::Result<Action>;

    /// One-way notification that this agent has been disqualified.
    fn inform_disqualified(&self);
}

/// In-process reference agent: scanning placement plus depth-bounded
/// minimax turns. Deterministic, so test suites can pin its behavior.
#[derive(Debug)]
pub struct LocalPlayer {
    name: String,
    color: Mutex<Option<PlayerColor>>,
    placer: ScanningPlacer,
    actor: MinimaxActor,
}

impl LocalPlayer {
    /// A local player searching `depth` of its own moves ahead.
    #[must_use]
    pub fn new(name: impl Into<String>, depth: u32) -> Self {
        Self {
            name: name.into(),
            color: Mutex::new(None),
            placer: ScanningPlacer,
            actor: MinimaxActor::new(depth),
        }
    }

    /// The color assigned to this player, once the referee has called
    /// [`Player::assign_color`].
    #[must_use]
    pub fn color(&self) -> Option<PlayerColor> {
        *self.color.lock().expect("poisoned")
    }
}

impl Player for LocalPlayer {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn assign_color(&self, color: PlayerColor) -> anyhow::Result<()> {
        *self.color.lock().expect("poisoned") = Some(color);
        Ok(())
    }

    fn place_penguin(&self, state: &GameState) -> anyhow::Result<Position> {
        self.placer
            .place(state)
            .context("no open tile left to place a penguin on")
    }

    fn take_turn(&self, tree: &GameTree) -> anyhow::Result<Action> {
        self.actor
            .act(tree)
            .context("no legal action at this node")
    }

    fn inform_disqualified(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Board, BoardConfig};

    fn small_state() -> GameState {
        let board = Board::from_config(&BoardConfig::Uniform {
            width: 3,
            height: 3,
            fish: 1,
        })
        .unwrap();
        GameState::new(board, &[PlayerColor::Red, PlayerColor::White]).unwrap()
    }

    #[test]
    fn local_player_remembers_its_color() {
        let player = LocalPlayer::new("alice", 1);
        assert_eq!(player.color(), None);
        player.assign_color(PlayerColor::Brown).unwrap();
        assert_eq!(player.color(), Some(PlayerColor::Brown));
        assert_eq!(player.name(), "alice");
    }

    #[test]
    fn local_player_places_by_scanning() {
        let player = LocalPlayer::new("alice", 1);
        let pos = player.place_penguin(&small_state()).unwrap();
        assert_eq!(pos, Position::new(0, 0));
    }

    #[test]
    fn local_player_acts_on_trees() {
        let state = small_state()
            .place_penguin(PlayerColor::Red, Position::new(0, 0))
            .unwrap()
            .place_penguin(PlayerColor::White, Position::new(0, 2))
            .unwrap();
        let player = LocalPlayer::new("alice", 1);
        let action = player.take_turn(&GameTree::new(state)).unwrap();
        assert!(matches!(action, Action::Move { .. }));
    }

    // The trait stays object safe: the referee stores agents as trait objects.
    #[test]
    fn player_trait_is_object_safe() {
        let boxed: Box<dyn Player> = Box::new(LocalPlayer::new("alice", 1));
        assert_eq!(boxed.name(), "alice");
    }
}
