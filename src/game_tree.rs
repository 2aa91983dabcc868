//! Lazy tree of reachable game states.
//!
//! A [`GameTree`] node wraps one [`GameState`] and enumerates the legal
//! actions of the player to move. Only the node's own action list is
//! memoized; child nodes are built on demand, so a depth-bounded search
//! never forces the full tree.

use std::cell::OnceCell;

use crate::game_state::{Action, GameState};

/// One node of the game tree.
///
/// The children follow the turn rules:
/// 1. If the current player has at least one legal move, the children are
///    exactly those moves; no `Skip` is offered.
/// 2. Otherwise, if any other seated player can move, the single child is
///    `Skip`, rotating the turn.
/// 3. Otherwise the node is terminal.
#[derive(Debug, Clone)]
pub struct GameTree {
    state: GameState,
    actions: OnceCell<Vec<Action>>,
}

impl GameTree {
    /// Wrap a state as a tree root. Costs nothing until queried.
    #[must_use]
    pub fn new(state: GameState) -> Self {
        Self {
            state,
            actions: OnceCell::new(),
        }
    }

    /// The state at this node.
    #[must_use]
    pub const fn state(&self) -> &GameState {
        &self.state
    }

    /// The legal actions at this node, sorted ascending, memoized after the
    /// first call.
    #[must_use]
    pub fn actions(&self) -> &[Action] {
        self.actions.get_or_init(|| {
            let moves = self.state.current_player_moves();
            if !moves.is_empty() {
                return moves;
            }
            let other_can_move = self.state.players().iter().any(|p| {
                Some(p.color()) != self.state.current_color()
                    && !self.state.moves_for(p.color()).is_empty()
            });
            if other_can_move {
                vec![Action::Skip]
            } else {
                Vec::new()
            }
        })
    }

    /// True if no action is legal for anyone.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.actions().is_empty()
    }

    /// The child reached by `action`, or `None` if `action` is not a child
    /// of this node. This is the membership test the referee uses to tell a
    /// cheating action from a legal one.
    #[must_use]
    pub fn child(&self, action: Action) -> Option<GameTree> {
        if !self.actions().contains(&action) {
            return None;
        }
        let next = match action {
            Action::Skip => Ok(self.state.rotate_to_next_player()),
            Action::Move { from, to } => self.state.move_penguin(from, to),
            Action::Place(_) => return None,
        };
        match next {
            Ok(state) => Some(GameTree::new(state)),
            // actions() only offers legal transitions; a failure here would
            // be a rules bug, not agent input.
            Err(_) => None,
        }
    }

    /// Iterate the `(action, child)` pairs of this node, building each child
    /// lazily as the iterator advances.
    pub fn children(&self) -> impl Iterator<Item = (Action, GameTree)> + '_ {
        self.actions().iter().filter_map(move |&action| {
            self.child(action).map(|child| (action, child))
        })
    }
}
