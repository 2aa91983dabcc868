//! The match orchestrator.
//!
//! The referee is the only stateful component. It seats the agents, drives
//! the three game phases, validates every agent response, disqualifies
//! agents that fail or cheat, fans events out to observers, and computes
//! the final ranking. Every outbound call runs under a deadline from
//! [`RefereeConfig`]; an agent that hangs costs the match at most that
//! deadline.

use std::fmt;
use std::sync::Arc;

use tracing::{info, instrument, trace, warn};

use crate::board::{Board, BoardConfig, BoardError};
use crate::configuration::RefereeConfig;
use crate::game_state::{assert_invariants, Action, GameState, PlayerColor};
use crate::game_tree::GameTree;
use crate::observer::{GameEvent, Observer};
use crate::player::Player;
use crate::timeout::call_with_timeout;

/// Each player places `PLACEMENT_BASE - player_count` penguins.
const PLACEMENT_BASE: usize = 6;

/// Final ranking of a match. Every agent that entered the match appears in
/// exactly one of the four lists, identified by its name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameResult {
    /// Seated players tied for the maximum score, in seating order.
    pub winners: Vec<String>,
    /// Seated players below the maximum score, in seating order.
    pub non_winners: Vec<String>,
    /// Agents disqualified for timeouts, errors, or malformed responses,
    /// oldest first.
    pub failed: Vec<String>,
    /// Agents disqualified for well-formed but illegal turn actions,
    /// oldest first.
    pub cheaters: Vec<String>,
}

/// Rejection of a `run_match` call before any agent was contacted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchSetupError {
    /// Fewer than two players.
    TooFewPlayers(usize),
    /// More than four players.
    TooManyPlayers(usize),
    /// The board configuration was invalid.
    Board(BoardError),
    /// The board has too few non-hole tiles for everyone's penguins.
    NotEnoughTiles {
        /// Tiles the placement phase needs.
        required: usize,
        /// Non-hole tiles the configuration yields.
        available: usize,
    },
    /// This referee already ran its match; instances are single-use.
    AlreadyUsed,
}

impl fmt::Display for MatchSetupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooFewPlayers(n) => write!(f, "too few players: {n} (minimum 2)"),
            Self::TooManyPlayers(n) => write!(f, "too many players: {n} (maximum 4)"),
            Self::Board(e) => write!(f, "invalid board configuration: {e}"),
            Self::NotEnoughTiles {
                required,
                available,
            } => write!(
                f,
                "board yields {available} tiles but placement needs {required}"
            ),
            Self::AlreadyUsed => write!(f, "referee instances run exactly one match"),
        }
    }
}

impl std::error::Error for MatchSetupError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Board(e) => Some(e),
            _ => None,
        }
    }
}

/// Why an agent is being removed from the match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Disqualification {
    Fail,
    Cheat,
}

/// One seated agent.
struct Seat {
    color: PlayerColor,
    name: String,
    agent: Arc<dyn Player>,
}

/// Runs one match from seating to final ranking.
pub struct Referee {
    config: RefereeConfig,
    state: Option<GameState>,
    seats: Vec<Seat>,
    failed: Vec<Seat>,
    cheaters: Vec<Seat>,
    observers: Vec<Arc<dyn Observer>>,
    finished: bool,
}

impl Referee {
    /// A fresh referee. One instance runs exactly one match.
    #[must_use]
    pub fn new(config: RefereeConfig) -> Self {
        Self {
            config,
            state: None,
            seats: Vec::new(),
            failed: Vec::new(),
            cheaters: Vec::new(),
            observers: Vec::new(),
            finished: false,
        }
    }

    /// Register an observer. If a match is in progress it immediately
    /// receives a [`GameEvent::Register`] with the current state; an
    /// observer that overruns the delivery deadline is not registered.
    pub fn add_observer(&mut self, observer: Arc<dyn Observer>) {
        if let Some(state) = self.state.clone() {
            if !self.deliver(&observer, &GameEvent::Register(state)) {
                warn!("observer exceeded its delivery budget at registration; dropped");
                return;
            }
        }
        self.observers.push(observer);
    }

    /// Run one complete match and return the final ranking.
    ///
    /// Agents are seated in the order given: the first receives `Red`, the
    /// second `White`, and so on.
    ///
    /// # Errors
    ///
    /// Returns a [`MatchSetupError`] — before any agent is contacted — if
    /// the player count is out of range, the board configuration is invalid
    /// or too small, or this referee already ran a match.
    #[instrument(skip_all, fields(players = players.len()))]
    pub fn run_match(
        &mut self,
        players: Vec<Arc<dyn Player>>,
        board_config: &BoardConfig,
    ) -> Result<GameResult, MatchSetupError> {
        if self.finished {
            return Err(MatchSetupError::AlreadyUsed);
        }
        let count = players.len();
        if count < 2 {
            return Err(MatchSetupError::TooFewPlayers(count));
        }
        if count > 4 {
            return Err(MatchSetupError::TooManyPlayers(count));
        }
        let board = Board::from_config(board_config).map_err(MatchSetupError::Board)?;
        let required = (PLACEMENT_BASE - count) * count;
        let available = board.tile_count();
        if available < required {
            return Err(MatchSetupError::NotEnoughTiles {
                required,
                available,
            });
        }
        self.finished = true;

        self.seats = players
            .into_iter()
            .zip(PlayerColor::ASSIGNMENT_ORDER)
            .map(|(agent, color)| Seat {
                color,
                name: agent.name(),
                agent,
            })
            .collect();
        info!(
            seats = ?self.seats.iter().map(|s| (&s.name, s.color)).collect::<Vec<_>>(),
            "match starting"
        );

        self.assign_colors();
        if !self.seats.is_empty() {
            let colors: Vec<PlayerColor> = self.seats.iter().map(|s| s.color).collect();
            let state =
                GameState::new(board, &colors).expect("seat colors are distinct by construction");
            self.state = Some(state.clone());
            self.emit(GameEvent::Register(state));

            self.run_placement();
            self.run_turns();
        }
        Ok(self.finish())
    }

    /// Phase 1: hand every agent its color, dropping agents that fail.
    fn assign_colors(&mut self) {
        let mut index = 0;
        while index < self.seats.len() {
            let seat = &self.seats[index];
            let agent = Arc::clone(&seat.agent);
            let color = seat.color;
            let accepted = matches!(
                call_with_timeout(self.config.assign_timeout, move || agent
                    .assign_color(color)),
                Some(Ok(()))
            );
            if accepted {
                trace!(%color, name = %seat.name, "color assigned");
                index += 1;
            } else {
                warn!(%color, name = %seat.name, "agent failed color assignment");
                self.disqualify(color, Disqualification::Fail);
            }
        }
    }

    /// Phase 2: collect placements in seating rotation until every seated
    /// player is at quota. The quota is frozen when the phase starts.
    fn run_placement(&mut self) {
        let quota = PLACEMENT_BASE - self.seats.len();
        trace!(quota, "placement phase");
        loop {
            if self.seats.is_empty() {
                return;
            }
            let state = self.state.clone().expect("placement phase requires a state");
            if state
                .players()
                .iter()
                .all(|p| p.penguins().len() >= quota)
            {
                return;
            }
            let color = state.current_color().expect("seats remain, so the cursor is valid");
            let placed = state
                .player(color)
                .expect("cursor names a seated player")
                .penguins()
                .len();
            if placed >= quota {
                self.state = Some(state.rotate_to_next_player());
                continue;
            }

            let agent = Arc::clone(&self.seats[self.seat_index(color)].agent);
            let snapshot = state.clone();
            let response = call_with_timeout(self.config.placement_timeout, move || {
                agent.place_penguin(&snapshot)
            });
            match response {
                Some(Ok(pos)) => match state.place_penguin(color, pos) {
                    Ok(next) => {
                        trace!(%color, %pos, "penguin placed");
                        self.state = Some(next.rotate_to_next_player());
                        self.emit(GameEvent::PenguinPlacement(pos));
                    }
                    Err(err) => {
                        warn!(%color, %err, "rejected placement");
                        self.disqualify(color, Disqualification::Fail);
                    }
                },
                Some(Err(err)) => {
                    warn!(%color, %err, "agent errored during placement");
                    self.disqualify(color, Disqualification::Fail);
                }
                None => {
                    warn!(%color, "agent timed out during placement");
                    self.disqualify(color, Disqualification::Fail);
                }
            }
            if let Some(state) = &self.state {
                assert_invariants(state);
            }
        }
    }

    /// Phase 3: descend the lazy game tree until it is terminal, asking the
    /// current player for each step and rebuilding the tree after every
    /// disqualification.
    fn run_turns(&mut self) {
        let Some(state) = self.state.clone() else {
            return;
        };
        let mut tree = GameTree::new(state);
        while !self.seats.is_empty() && !tree.is_terminal() {
            if matches!(tree.actions(), [Action::Skip]) {
                tree = tree.child(Action::Skip).expect("skip is the only child");
                self.state = Some(tree.state().clone());
                self.emit(GameEvent::TurnAction(Action::Skip));
                continue;
            }
            let color = tree
                .state()
                .current_color()
                .expect("non-terminal tree has a current player");
            let agent = Arc::clone(&self.seats[self.seat_index(color)].agent);
            let snapshot = tree.clone();
            let response =
                call_with_timeout(self.config.turn_timeout, move || agent.take_turn(&snapshot));
            match response {
                Some(Ok(action)) => match tree.child(action) {
                    Some(next) => {
                        trace!(%color, %action, "turn taken");
                        tree = next;
                        self.state = Some(tree.state().clone());
                        self.emit(GameEvent::TurnAction(action));
                    }
                    None => {
                        warn!(%color, %action, "illegal action");
                        self.disqualify(color, Disqualification::Cheat);
                        tree = self.rebuilt_tree();
                    }
                },
                Some(Err(err)) => {
                    warn!(%color, %err, "agent errored during its turn");
                    self.disqualify(color, Disqualification::Fail);
                    tree = self.rebuilt_tree();
                }
                None => {
                    warn!(%color, "agent timed out during its turn");
                    self.disqualify(color, Disqualification::Fail);
                    tree = self.rebuilt_tree();
                }
            }
            assert_invariants(tree.state());
        }
    }

    /// Phase 4: rank the survivors, notify observers, and close out the
    /// match state.
    fn finish(&mut self) -> GameResult {
        let mut winners = Vec::new();
        let mut non_winners = Vec::new();
        if let Some(state) = &self.state {
            if let Some(top) = state.players().iter().map(|p| p.score()).max() {
                for player in state.players() {
                    let name = self.seats[self.seat_index(player.color())].name.clone();
                    if player.score() == top {
                        winners.push(name);
                    } else {
                        non_winners.push(name);
                    }
                }
            }
        }
        let result = GameResult {
            winners,
            non_winners,
            failed: self.failed.iter().map(|s| s.name.clone()).collect(),
            cheaters: self.cheaters.iter().map(|s| s.name.clone()).collect(),
        };
        info!(?result, "match finished");
        self.emit(GameEvent::EndOfGame(result.clone()));
        // The match is no longer in progress: late observer registrations
        // must not receive a Register snapshot.
        self.state = None;
        result
    }

    /// Remove the agent with `color` from the match: unseat it, drop its
    /// penguins from the game state, notify it, and tell the observers.
    fn disqualify(&mut self, color: PlayerColor, kind: Disqualification) {
        let seat = self.seats.remove(self.seat_index(color));
        let agent = Arc::clone(&seat.agent);
        let _ = call_with_timeout(self.config.inform_timeout, move || {
            agent.inform_disqualified();
        });
        match kind {
            Disqualification::Fail => self.failed.push(seat),
            Disqualification::Cheat => self.cheaters.push(seat),
        }
        if let Some(state) = self.state.take() {
            debug_assert_eq!(state.current_color(), Some(color));
            self.state = Some(state.remove_current_player());
        }
        self.emit(GameEvent::Disqualify(color));
    }

    fn rebuilt_tree(&self) -> GameTree {
        GameTree::new(
            self.state
                .clone()
                .expect("turn phase always has a state"),
        )
    }

    fn seat_index(&self, color: PlayerColor) -> usize {
        self.seats
            .iter()
            .position(|s| s.color == color)
            .expect("no seat for a color the game state still holds")
    }

    /// Send one event to every observer, dropping any that overrun the
    /// delivery deadline. Observer failures never affect match state.
    fn emit(&mut self, event: GameEvent) {
        let timeout = self.config.observer_timeout;
        let observers = std::mem::take(&mut self.observers);
        self.observers = observers
            .into_iter()
            .filter(|observer| {
                let obs = Arc::clone(observer);
                let ev = event.clone();
                let survived =
                    call_with_timeout(timeout, move || obs.on_event(&ev)).is_some();
                if !survived {
                    warn!("observer exceeded its delivery budget; dropped");
                }
                survived
            })
            .collect();
    }

    fn deliver(&self, observer: &Arc<dyn Observer>, event: &GameEvent) -> bool {
        let obs = Arc::clone(observer);
        let ev = event.clone();
        call_with_timeout(self.config.observer_timeout, move || obs.on_event(&ev)).is_some()
    }
}
