//! End-to-end matches driven through the public referee API, with scripted
//! misbehaving agents and observers.

use std::sync::Arc;
use std::time::{Duration, Instant};

use fish_referee::prelude::*;

use crate::agents::{
    BadCall, CheatingPlayer, ErroringPlacer, HangingObserver, HangingPlayer, PanickingPlayer,
    RecordingObserver, RecordingPlayer, SulkingCheat, TouchProbe,
};


/// Short deadlines so that hanging-agent scenarios finish quickly.
fn fast_config() -> RefereeConfig {
    RefereeConfig::new().with_all_timeouts(Duration::from_millis(200))
}

fn uniform(width: usize, height: usize) -> BoardConfig {
    BoardConfig::Uniform {
        width,
        height,
        fish: 1,
    }
}

fn positions(penguins: &[fish_referee::game_state::Penguin]) -> Vec<Position> {
    penguins.iter().map(|p| p.position).collect()
}

/// Two scanning players on a 3x3 one-fish board: placements fill the first
/// eight tiles in rotation, a single move to (2,2) ends the game.
#[test]
fn s1_two_scanning_players_on_a_full_board() {
    let p1 = Arc::new(RecordingPlayer::new("p1", 1));
    let p2 = Arc::new(RecordingPlayer::new("p2", 1));
    let observer = Arc::new(RecordingObserver::default());

    let players: Vec<Arc<dyn Player>> = vec![p1.clone(), p2.clone()];
    let mut referee = Referee::new(fast_config());
    referee.add_observer(observer.clone());
    let result = referee.run_match(players, &uniform(3, 3)).unwrap();

    assert!(result.cheaters.is_empty());
    assert!(result.failed.is_empty());
    assert_eq!(result.winners, vec!["p1"]);
    assert_eq!(result.non_winners, vec!["p2"]);

    // Placement alternates through the first eight tiles in row-major order.
    let placements: Vec<Position> = observer
        .events()
        .iter()
        .filter_map(|e| match e {
            GameEvent::PenguinPlacement(pos) => Some(*pos),
            _ => None,
        })
        .collect();
    assert_eq!(
        placements,
        vec![
            Position::new(0, 0),
            Position::new(0, 1),
            Position::new(0, 2),
            Position::new(1, 0),
            Position::new(1, 1),
            Position::new(1, 2),
            Position::new(2, 0),
            Position::new(2, 1),
        ]
    );

    // Each player holds the four tiles it placed, in placement order.
    let seen = p1.last_seen.lock().unwrap().clone().unwrap();
    assert_eq!(
        positions(seen.player(PlayerColor::Red).unwrap().penguins()),
        vec![
            Position::new(0, 0),
            Position::new(0, 2),
            Position::new(1, 1),
            Position::new(2, 0),
        ]
    );
    assert_eq!(
        positions(seen.player(PlayerColor::White).unwrap().penguins()),
        vec![
            Position::new(0, 1),
            Position::new(1, 0),
            Position::new(1, 2),
            Position::new(2, 1),
        ]
    );

    // The single turn: red leaves (0,2) for the only open tile.
    let turns: Vec<Action> = observer
        .events()
        .iter()
        .filter_map(|e| match e {
            GameEvent::TurnAction(action) => Some(*action),
            _ => None,
        })
        .collect();
    assert_eq!(
        turns,
        vec![Action::Move {
            from: Position::new(0, 2),
            to: Position::new(2, 2),
        }]
    );
}

/// An illegal turn action is a cheat: the offender is removed and the other
/// player finishes the game and wins.
#[test]
fn s2_illegal_move_is_classified_as_cheating() {
    let cheat_move = Action::Move {
        from: Position::new(2, 2),
        to: Position::new(0, -1),
    };
    let p1 = Arc::new(CheatingPlayer::new("p1", cheat_move));
    let p2 = Arc::new(LocalPlayer::new("p2", 1));
    let observer = Arc::new(RecordingObserver::default());

    let players: Vec<Arc<dyn Player>> = vec![p1, p2];
    let mut referee = Referee::new(fast_config());
    referee.add_observer(observer.clone());
    let result = referee.run_match(players, &uniform(3, 3)).unwrap();

    assert_eq!(result.cheaters, vec!["p1"]);
    assert!(result.failed.is_empty());
    assert_eq!(result.winners, vec!["p2"]);
    assert!(result.non_winners.is_empty());
    assert!(observer
        .events()
        .iter()
        .any(|e| matches!(e, GameEvent::Disqualify(PlayerColor::Red))));
}

/// A placement hang is a failure, detected within the placement deadline;
/// the others play on with the quota frozen at phase start.
#[test]
fn s3_placement_hang_fails_fast_and_freezes_the_quota() {
    let p1 = Arc::new(RecordingPlayer::new("p1", 1));
    let p2 = Arc::new(HangingPlayer::new("p2", BadCall::Place));
    let p3 = Arc::new(RecordingPlayer::new("p3", 1));

    let players: Vec<Arc<dyn Player>> = vec![p1.clone(), p2, p3.clone()];
    let mut referee = Referee::new(fast_config());
    let start = Instant::now();
    let result = referee.run_match(players, &uniform(5, 5)).unwrap();

    // The hanging worker sleeps 30s; the match must not wait for it.
    assert!(start.elapsed() < Duration::from_secs(10));
    assert_eq!(result.failed, vec!["p2"]);
    assert!(result.cheaters.is_empty());

    // Quota froze at 3 (the phase started with three players), so the two
    // survivors placed three penguins each.
    let seen = p1
        .last_seen
        .lock()
        .unwrap()
        .clone()
        .or_else(|| p3.last_seen.lock().unwrap().clone())
        .expect("at least one survivor took a turn");
    assert_eq!(seen.player(PlayerColor::Red).unwrap().penguins().len(), 3);
    assert_eq!(seen.player(PlayerColor::Brown).unwrap().penguins().len(), 3);
    assert!(seen.player(PlayerColor::White).is_none());
}

/// Exactly enough isolated tiles for everyone's penguins: placement
/// succeeds, nobody can ever move, everyone ties at zero fish.
#[test]
fn s4_no_legal_moves_after_placement() {
    let f = Tile::Fish(1);
    let h = Tile::Hole;
    // Rows 0 and 3 carry fish; rows 1 and 2 are water. No ray connects the
    // two fish rows, so the game is over the moment placement ends.
    let board = BoardConfig::Explicit {
        rows: vec![
            vec![f, f, f, f],
            vec![h, h, h, h],
            vec![h, h, h, h],
            vec![f, f, f, f],
        ],
    };
    let players: Vec<Arc<dyn Player>> = (1..=4)
        .map(|i| Arc::new(LocalPlayer::new(format!("p{i}"), 1)) as Arc<dyn Player>)
        .collect();
    let observer = Arc::new(RecordingObserver::default());

    let mut referee = Referee::new(fast_config());
    referee.add_observer(observer.clone());
    let result = referee.run_match(players, &board).unwrap();

    assert_eq!(result.winners, vec!["p1", "p2", "p3", "p4"]);
    assert!(result.non_winners.is_empty());
    assert!(result.failed.is_empty());
    assert!(result.cheaters.is_empty());
    assert!(observer
        .events()
        .iter()
        .all(|e| !matches!(e, GameEvent::TurnAction(_))));
}

/// A hanging observer is dropped after its first delivery; surviving
/// observers still get the whole stream in order and the result stands.
#[test]
fn s5_hanging_observer_is_isolated() {
    let p1 = Arc::new(LocalPlayer::new("p1", 1));
    let p2 = Arc::new(LocalPlayer::new("p2", 1));
    let hanging = Arc::new(HangingObserver::default());
    let recording = Arc::new(RecordingObserver::default());

    let players: Vec<Arc<dyn Player>> = vec![p1, p2];
    let mut referee = Referee::new(fast_config());
    referee.add_observer(hanging.clone());
    referee.add_observer(recording.clone());
    let result = referee.run_match(players, &uniform(3, 3)).unwrap();

    assert_eq!(result.winners, vec!["p1"]);
    assert_eq!(
        hanging.calls.load(std::sync::atomic::Ordering::SeqCst),
        1,
        "dropped observers receive nothing further"
    );

    let events = recording.events();
    assert!(matches!(events.first(), Some(GameEvent::Register(_))));
    assert!(matches!(events.last(), Some(GameEvent::EndOfGame(_))));
    let placements = events
        .iter()
        .filter(|e| matches!(e, GameEvent::PenguinPlacement(_)))
        .count();
    assert_eq!(placements, 8);
}

/// Player counts outside 2..=4 are rejected before any agent is contacted.
#[test]
fn s6_player_count_is_validated_before_contact() {
    for count in [0, 1, 5, 6] {
        let probes: Vec<Arc<TouchProbe>> =
            (0..count).map(|_| Arc::new(TouchProbe::default())).collect();
        let players: Vec<Arc<dyn Player>> = probes
            .iter()
            .map(|p| Arc::clone(p) as Arc<dyn Player>)
            .collect();

        let mut referee = Referee::new(fast_config());
        let result = referee.run_match(players, &uniform(4, 4));
        match count {
            0 | 1 => assert_eq!(result, Err(MatchSetupError::TooFewPlayers(count))),
            _ => assert_eq!(result, Err(MatchSetupError::TooManyPlayers(count))),
        }
        for probe in &probes {
            assert!(!probe.touched.load(std::sync::atomic::Ordering::SeqCst));
        }
    }
}

/// A hang during color assignment fails that agent within its deadline; the
/// lone survivor still gets a complete (solo) game.
#[test]
fn hanging_color_assignment_fails_fast() {
    let p1 = Arc::new(HangingPlayer::new("p1", BadCall::Assign));
    let p2 = Arc::new(LocalPlayer::new("p2", 1));

    let players: Vec<Arc<dyn Player>> = vec![p1, p2];
    let mut referee = Referee::new(fast_config());
    let start = Instant::now();
    let result = referee.run_match(players, &uniform(4, 4)).unwrap();

    assert!(start.elapsed() < Duration::from_secs(10));
    assert_eq!(result.failed, vec!["p1"]);
    assert_eq!(result.winners, vec!["p2"]);
}

/// A hang during the turn phase fails the hanging agent within its
/// deadline and the match goes on.
#[test]
fn hanging_turn_fails_fast() {
    let p1 = Arc::new(HangingPlayer::new("p1", BadCall::Turn));
    let p2 = Arc::new(LocalPlayer::new("p2", 1));

    let players: Vec<Arc<dyn Player>> = vec![p1, p2];
    let mut referee = Referee::new(fast_config());
    let start = Instant::now();
    let result = referee.run_match(players, &uniform(3, 3)).unwrap();

    assert!(start.elapsed() < Duration::from_secs(10));
    assert_eq!(result.failed, vec!["p1"]);
    assert_eq!(result.winners, vec!["p2"]);
}

/// A panicking agent is indistinguishable from a timeout: classified as
/// failed, match continues.
#[test]
fn panicking_turn_is_a_failure() {
    let p1 = Arc::new(PanickingPlayer::new("p1", BadCall::Turn));
    let p2 = Arc::new(LocalPlayer::new("p2", 1));

    let players: Vec<Arc<dyn Player>> = vec![p1, p2];
    let mut referee = Referee::new(fast_config());
    let result = referee.run_match(players, &uniform(3, 3)).unwrap();

    assert_eq!(result.failed, vec!["p1"]);
    assert!(result.cheaters.is_empty());
    assert_eq!(result.winners, vec!["p2"]);
}

/// An `Err` return from placement is a failure like any other.
#[test]
fn erroring_placement_is_a_failure() {
    let p1 = Arc::new(LocalPlayer::new("p1", 1));
    let p2 = Arc::new(ErroringPlacer::new("p2"));

    let players: Vec<Arc<dyn Player>> = vec![p1, p2];
    let mut referee = Referee::new(fast_config());
    let result = referee.run_match(players, &uniform(4, 4)).unwrap();

    assert_eq!(result.failed, vec!["p2"]);
    assert_eq!(result.winners, vec!["p1"]);
}

/// Hanging inside the disqualification notice delays the match by at most
/// the inform deadline.
#[test]
fn hanging_disqualification_notice_is_bounded() {
    let cheat_move = Action::Move {
        from: Position::new(0, 0),
        to: Position::new(0, 0),
    };
    let p1 = Arc::new(SulkingCheat::new("p1", cheat_move));
    let p2 = Arc::new(LocalPlayer::new("p2", 1));

    let players: Vec<Arc<dyn Player>> = vec![p1, p2];
    let mut referee = Referee::new(fast_config());
    let start = Instant::now();
    let result = referee.run_match(players, &uniform(3, 3)).unwrap();

    assert!(start.elapsed() < Duration::from_secs(10));
    assert_eq!(result.cheaters, vec!["p1"]);
    assert_eq!(result.winners, vec!["p2"]);
}

/// The shipped match logger captures a run's traces in its log file.
#[test]
fn match_logger_records_the_run() {
    let dir = std::env::temp_dir().join("fish-referee-test-logs");
    let log_path = fish_referee::logger::init_match_logger(&dir).unwrap();
    assert!(log_path.starts_with(&dir));

    let p1 = Arc::new(LocalPlayer::new("p1", 1));
    let p2 = Arc::new(LocalPlayer::new("p2", 1));
    let players: Vec<Arc<dyn Player>> = vec![p1, p2];
    let mut referee = Referee::new(fast_config());
    referee.run_match(players, &uniform(3, 3)).unwrap();

    let contents = std::fs::read_to_string(&log_path).unwrap();
    assert!(contents.contains("match finished"), "log was: {contents}");
}

/// All agents failing leaves an empty winners list and a complete failed
/// list.
#[test]
fn all_agents_failing_ends_with_empty_winners() {
    let p1 = Arc::new(HangingPlayer::new("p1", BadCall::Assign));
    let p2 = Arc::new(PanickingPlayer::new("p2", BadCall::Assign));
    let observer = Arc::new(RecordingObserver::default());

    let players: Vec<Arc<dyn Player>> = vec![p1, p2];
    let mut referee = Referee::new(fast_config());
    referee.add_observer(observer.clone());
    let result = referee.run_match(players, &uniform(4, 4)).unwrap();

    assert!(result.winners.is_empty());
    assert!(result.non_winners.is_empty());
    assert_eq!(result.failed, vec!["p1", "p2"]);
    // The match still announces its end.
    assert!(matches!(
        observer.events().last(),
        Some(GameEvent::EndOfGame(_))
    ));
}
