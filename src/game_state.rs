//! Immutable game snapshots and the rules that guard them.
//!
//! A [`GameState`] is a value: every legal transition produces a fresh state
//! and leaves the receiver untouched. Rule enforcement lives here so the
//! referee and the minimax search validate actions through the same code.

use std::fmt;

use crate::board::{Board, Position};

/// The four penguin colors, in the fixed order they are assigned to agents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)] // the variants are the color names
pub enum PlayerColor {
    Red,
    White,
    Brown,
    Black,
}

impl PlayerColor {
    /// Assignment order for seating: the first agent gets `Red`, and so on.
    pub const ASSIGNMENT_ORDER: [PlayerColor; 4] = [
        PlayerColor::Red,
        PlayerColor::White,
        PlayerColor::Brown,
        PlayerColor::Black,
    ];
}

impl fmt::Display for PlayerColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PlayerColor::Red => "red",
            PlayerColor::White => "white",
            PlayerColor::Brown => "brown",
            PlayerColor::Black => "black",
        };
        write!(f, "{name}")
    }
}

/// A penguin: a token occupying one tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Penguin {
    /// The tile this penguin stands on.
    pub position: Position,
}

/// One seated player: color, accumulated score, and penguins in the order
/// they were placed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerState {
    color: PlayerColor,
    score: u32,
    penguins: Vec<Penguin>,
}

impl PlayerState {
    fn new(color: PlayerColor) -> Self {
        Self {
            color,
            score: 0,
            penguins: Vec::new(),
        }
    }

    /// This player's color.
    #[must_use]
    pub const fn color(&self) -> PlayerColor {
        self.color
    }

    /// Fish collected so far.
    #[must_use]
    pub const fn score(&self) -> u32 {
        self.score
    }

    /// Penguins in placement order.
    #[must_use]
    pub fn penguins(&self) -> &[Penguin] {
        &self.penguins
    }
}

/// One move in the game.
///
/// The derived ordering is the one the minimax tie-break uses: moves sort
/// lexicographically by `(from.row, from.col, to.row, to.col)` and `Skip`
/// compares greater than every move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Action {
    /// Place a new penguin (placement phase only).
    Place(Position),
    /// Move the penguin at `from` to `to` (turn phase only).
    Move {
        /// Current penguin position.
        from: Position,
        /// Destination tile.
        to: Position,
    },
    /// The current player has no legal move and passes.
    Skip,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Place(pos) => write!(f, "place {pos}"),
            Action::Move { from, to } => write!(f, "move {from}->{to}"),
            Action::Skip => write!(f, "skip"),
        }
    }
}

/// Why a placement or move was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateError {
    /// The named color is not seated in this state.
    UnknownColor(PlayerColor),
    /// A duplicate color was supplied at construction.
    DuplicateColor(PlayerColor),
    /// A state needs at least one player.
    NoPlayers,
    /// The position lies outside the board.
    OutOfBounds(Position),
    /// The target tile is a hole.
    Hole(Position),
    /// Another penguin already occupies the target tile.
    Occupied(Position),
    /// The current player has no penguin at the source position.
    NoPenguinAt(Position),
    /// The destination is not reachable by straight-line movement.
    Unreachable {
        /// Source of the attempted move.
        from: Position,
        /// Destination of the attempted move.
        to: Position,
    },
}

impl fmt::Display for StateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownColor(color) => write!(f, "no player seated with color {color}"),
            Self::DuplicateColor(color) => write!(f, "color {color} seated twice"),
            Self::NoPlayers => write!(f, "a game needs at least one player"),
            Self::OutOfBounds(pos) => write!(f, "position {pos} is off the board"),
            Self::Hole(pos) => write!(f, "tile {pos} is a hole"),
            Self::Occupied(pos) => write!(f, "tile {pos} is occupied by a penguin"),
            Self::NoPenguinAt(pos) => write!(f, "current player has no penguin at {pos}"),
            Self::Unreachable { from, to } => {
                write!(f, "{to} is not reachable from {from} in a straight line")
            }
        }
    }
}

impl std::error::Error for StateError {}

/// An immutable snapshot of a running game: board, seated players in turn
/// order, and the cursor naming whose turn it is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    board: Board,
    players: Vec<PlayerState>,
    current: usize,
}

impl GameState {
    /// Create the pre-placement state with the given seating order.
    ///
    /// # Errors
    ///
    /// Rejects an empty or duplicate color list.
    pub fn new(board: Board, colors: &[PlayerColor]) -> Result<Self, StateError> {
        if colors.is_empty() {
            return Err(StateError::NoPlayers);
        }
        for (i, color) in colors.iter().enumerate() {
            if colors[..i].contains(color) {
                return Err(StateError::DuplicateColor(*color));
            }
        }
        Ok(Self {
            board,
            players: colors.iter().map(|&c| PlayerState::new(c)).collect(),
            current: 0,
        })
    }

    /// The board underlying this snapshot.
    #[must_use]
    pub const fn board(&self) -> &Board {
        &self.board
    }

    /// Seated players in turn order.
    #[must_use]
    pub fn players(&self) -> &[PlayerState] {
        &self.players
    }

    /// The player whose turn it is, if anyone is still seated.
    #[must_use]
    pub fn current_player(&self) -> Option<&PlayerState> {
        self.players.get(self.current)
    }

    /// Color of the player whose turn it is.
    #[must_use]
    pub fn current_color(&self) -> Option<PlayerColor> {
        self.current_player().map(PlayerState::color)
    }

    /// The seated player with the given color.
    #[must_use]
    pub fn player(&self, color: PlayerColor) -> Option<&PlayerState> {
        self.players.iter().find(|p| p.color == color)
    }

    /// True if any penguin of any player stands on `pos`.
    #[must_use]
    pub fn is_occupied(&self, pos: Position) -> bool {
        self.players
            .iter()
            .flat_map(|p| &p.penguins)
            .any(|penguin| penguin.position == pos)
    }

    /// The board with every penguin-occupied tile turned into a hole.
    ///
    /// This is the view movement legality is computed on: penguins block
    /// rays exactly like holes do.
    #[must_use]
    pub fn board_minus_penguins(&self) -> Board {
        self.players
            .iter()
            .flat_map(|p| &p.penguins)
            .fold(self.board.clone(), |board, penguin| {
                board.remove_tile(penguin.position)
            })
    }

    /// Place a new penguin for `color` at `pos`.
    ///
    /// # Errors
    ///
    /// Fails if `color` is not seated, `pos` is out of bounds or a hole, or
    /// any penguin already occupies `pos`.
    pub fn place_penguin(&self, color: PlayerColor, pos: Position) -> Result<Self, StateError> {
        let seat = self
            .players
            .iter()
            .position(|p| p.color == color)
            .ok_or(StateError::UnknownColor(color))?;
        match self.board.tile(pos) {
            None => return Err(StateError::OutOfBounds(pos)),
            Some(tile) if tile.is_hole() => return Err(StateError::Hole(pos)),
            Some(_) => {}
        }
        if self.is_occupied(pos) {
            return Err(StateError::Occupied(pos));
        }
        let mut next = self.clone();
        next.players[seat].penguins.push(Penguin { position: pos });
        Ok(next)
    }

    /// Move the current player's penguin from `from` to `to`.
    ///
    /// On success the mover's score grows by the fish on `from`, the tile at
    /// `from` becomes a hole, the penguin stands on `to`, and the turn
    /// cursor advances.
    ///
    /// # Errors
    ///
    /// Fails if either endpoint is off the board, the current player has no
    /// penguin at `from`, `to` is occupied, or `to` is not reachable from
    /// `from` by straight-line movement with penguins treated as blockers.
    pub fn move_penguin(&self, from: Position, to: Position) -> Result<Self, StateError> {
        if !self.board.contains(from) {
            return Err(StateError::OutOfBounds(from));
        }
        if !self.board.contains(to) {
            return Err(StateError::OutOfBounds(to));
        }
        let seat = self.current;
        let penguin_index = self
            .players
            .get(seat)
            .ok_or(StateError::NoPenguinAt(from))?
            .penguins
            .iter()
            .position(|p| p.position == from)
            .ok_or(StateError::NoPenguinAt(from))?;
        if self.is_occupied(to) {
            return Err(StateError::Occupied(to));
        }
        if !self.board_minus_penguins().reachable_from(from).contains(&to) {
            return Err(StateError::Unreachable { from, to });
        }
        let eaten = self
            .board
            .tile(from)
            .expect("source tile bounds already checked")
            .fish();
        let mut next = self.clone();
        next.players[seat].score += eaten;
        next.players[seat].penguins[penguin_index].position = to;
        next.board = next.board.remove_tile(from);
        next.current = (next.current + 1) % next.players.len();
        Ok(next)
    }

    /// Advance the turn cursor by one seat.
    #[must_use]
    pub fn rotate_to_next_player(&self) -> Self {
        let mut next = self.clone();
        if !next.players.is_empty() {
            next.current = (next.current + 1) % next.players.len();
        }
        next
    }

    /// Drop the current player and its penguins.
    ///
    /// The tiles under the removed penguins stay fish tiles and become
    /// movable-to for everyone else. The cursor ends up on the seat that
    /// followed the removed player.
    #[must_use]
    pub fn remove_current_player(&self) -> Self {
        let mut next = self.clone();
        if next.players.is_empty() {
            return next;
        }
        next.players.remove(next.current);
        if !next.players.is_empty() {
            next.current %= next.players.len();
        } else {
            next.current = 0;
        }
        next
    }

    /// Every legal move for the player with `color`, were it their turn,
    /// sorted in the canonical [`Action`] order.
    #[must_use]
    pub fn moves_for(&self, color: PlayerColor) -> Vec<Action> {
        let Some(player) = self.player(color) else {
            return Vec::new();
        };
        let blocked = self.board_minus_penguins();
        let mut moves: Vec<Action> = player
            .penguins
            .iter()
            .flat_map(|penguin| {
                let from = penguin.position;
                blocked
                    .reachable_from(from)
                    .into_iter()
                    .map(move |to| Action::Move { from, to })
            })
            .collect();
        moves.sort_unstable();
        moves
    }

    /// Legal moves for the player whose turn it is.
    #[must_use]
    pub fn current_player_moves(&self) -> Vec<Action> {
        match self.current_color() {
            Some(color) => self.moves_for(color),
            None => Vec::new(),
        }
    }

    /// True if no seated player has a legal move.
    #[must_use]
    pub fn is_over(&self) -> bool {
        self.players
            .iter()
            .all(|p| self.moves_for(p.color).is_empty())
    }

    /// Check every structural invariant and return the violations found.
    ///
    /// A state produced purely through this module's operations never
    /// violates any of these; a nonempty result indicates a bug.
    #[must_use]
    pub fn check_invariants(&self) -> Vec<InvariantViolation> {
        let mut violations = Vec::new();

        for (i, player) in self.players.iter().enumerate() {
            if self.players[..i].iter().any(|p| p.color == player.color) {
                violations.push(InvariantViolation {
                    message: format!("color {} seated more than once", player.color),
                });
            }
        }

        let mut seen = Vec::new();
        for player in &self.players {
            for penguin in &player.penguins {
                let pos = penguin.position;
                match self.board.tile(pos) {
                    None => violations.push(InvariantViolation {
                        message: format!("{} penguin off the board at {pos}", player.color),
                    }),
                    Some(tile) if tile.is_hole() => violations.push(InvariantViolation {
                        message: format!("{} penguin standing on a hole at {pos}", player.color),
                    }),
                    Some(_) => {}
                }
                if seen.contains(&pos) {
                    violations.push(InvariantViolation {
                        message: format!("two penguins share tile {pos}"),
                    });
                }
                seen.push(pos);
            }
        }

        if !self.players.is_empty() && self.current >= self.players.len() {
            violations.push(InvariantViolation {
                message: format!(
                    "turn cursor {} out of range for {} players",
                    self.current,
                    self.players.len()
                ),
            });
        }

        violations
    }
}

/// A violated [`GameState`] invariant, for diagnostics.
#[derive(Debug, Clone)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub message: String,
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invariant violation: {}", self.message)
    }
}

impl std::error::Error for InvariantViolation {}

/// Panic if any invariant is violated. Debug builds only.
#[cfg(debug_assertions)]
pub(crate) fn assert_invariants(state: &GameState) {
    let violations = state.check_invariants();
    if !violations.is_empty() {
        let messages: Vec<_> = violations.iter().map(|v| v.message.as_str()).collect();
        panic!("game state invariant violations:\n  - {}", messages.join("\n  - "));
    }
}

#[cfg(not(debug_assertions))]
pub(crate) fn assert_invariants(_state: &GameState) {}
