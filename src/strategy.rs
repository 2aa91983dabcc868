//! Built-in placement and turn strategies.
//!
//! These are deterministic reference implementations: the scanning placer
//! and a depth-bounded minimax actor. Both are pure functions of the state
//! or tree they are handed, which is what lets the test suite pin their
//! output exactly.

use crate::board::Position;
use crate::game_state::{Action, GameState, PlayerColor};
use crate::game_tree::GameTree;

/// Chooses where the next penguin goes.
pub trait Placer {
    /// A position for the next penguin, or `None` if the board is full.
    fn place(&self, state: &GameState) -> Option<Position>;
}

/// Chooses an action in the turn phase.
pub trait Actor {
    /// An action for the current player, or `None` at a terminal node.
    fn act(&self, tree: &GameTree) -> Option<Action>;
}

/// Scans positions in row-major order and takes the first free tile.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScanningPlacer;

impl Placer for ScanningPlacer {
    fn place(&self, state: &GameState) -> Option<Position> {
        state.board().positions().find(|&pos| {
            matches!(state.board().tile(pos), Some(tile) if !tile.is_hole())
                && !state.is_occupied(pos)
        })
    }
}

/// Depth-bounded minimax over the game tree.
///
/// The acting player maximizes its own eventual score; every other seated
/// player minimizes it. Depth counts only the maximizer's moves; opponent
/// plies in between are free. Between equally valued actions the
/// lexicographically smallest `(from, to)` wins, which falls out of the
/// canonical [`Action`] ordering of the tree's children.
#[derive(Debug, Clone, Copy)]
pub struct MinimaxActor {
    depth: u32,
}

impl MinimaxActor {
    /// A minimax actor looking `depth >= 1` of its own moves ahead.
    #[must_use]
    pub fn new(depth: u32) -> Self {
        Self {
            depth: depth.max(1),
        }
    }
}

impl Actor for MinimaxActor {
    fn act(&self, tree: &GameTree) -> Option<Action> {
        let maximizer = tree.state().current_color()?;
        match tree.actions() {
            [] => None,
            [Action::Skip] => Some(Action::Skip),
            _ => {
                let score = tree.state().player(maximizer)?.score();
                let mut best: Option<(Action, u32)> = None;
                for (action, child) in tree.children() {
                    let value = branch_value(&child, maximizer, self.depth - 1, score);
                    // Strictly-greater keeps the first (smallest) action on ties.
                    if best.map_or(true, |(_, b)| value > b) {
                        best = Some((action, value));
                    }
                }
                best.map(|(action, _)| action)
            }
        }
    }
}

/// Value of a branch for `maximizer` with `moves_left` of its own moves
/// still allowed. `fallback` is the score the maximizer held in the parent
/// state, used if it is no longer seated here.
fn branch_value(tree: &GameTree, maximizer: PlayerColor, moves_left: u32, fallback: u32) -> u32 {
    let Some(me) = tree.state().player(maximizer) else {
        return fallback;
    };
    let score = me.score();
    if moves_left == 0 || tree.is_terminal() {
        return score;
    }
    let maximizing = tree.state().current_color() == Some(maximizer);
    let mut best: Option<u32> = None;
    for (action, child) in tree.children() {
        let next_left = if maximizing && matches!(action, Action::Move { .. }) {
            moves_left - 1
        } else {
            moves_left
        };
        let value = branch_value(&child, maximizer, next_left, score);
        best = Some(match best {
            None => value,
            Some(b) if maximizing => b.max(value),
            Some(b) => b.min(value),
        });
    }
    best.unwrap_or(score)
}
