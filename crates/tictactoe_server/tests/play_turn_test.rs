//! End-to-end turn scenarios against the in-memory store.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tictactoe_rules::{
    Board, GameState, GameStatus, INVALID_MOVE_MESSAGE, MoveAgent, Outcome, Player, Position,
    RandomAgent, Square,
};
use tictactoe_server::{MemorySessionStore, SessionStore, TurnRequest, play_turn};

/// Wraps an agent and counts how often it is asked for a move.
struct CountingAgent {
    inner: RandomAgent<ChaCha8Rng>,
    calls: AtomicUsize,
}

impl CountingAgent {
    fn new(seed: u64) -> Self {
        Self {
            inner: RandomAgent::new(ChaCha8Rng::seed_from_u64(seed)),
            calls: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl MoveAgent for CountingAgent {
    fn choose_move(&self, board: &Board) -> Option<Position> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.choose_move(board)
    }

    fn name(&self) -> &str {
        "counting"
    }
}

fn store() -> MemorySessionStore {
    MemorySessionStore::new(Duration::from_secs(600))
}

fn board(cells: [char; 9]) -> Board {
    Board::from_squares(cells.map(|c| match c {
        'X' => Square::Occupied(Player::X),
        'O' => Square::Occupied(Player::O),
        _ => Square::Empty,
    }))
}

#[test]
fn test_center_opening_gets_one_reply() {
    let store = store();
    let agent = CountingAgent::new(1);

    let state = play_turn(&store, "s1", TurnRequest::Move(4), &agent).unwrap();

    let squares = state.board().squares();
    assert_eq!(squares[4], Square::Occupied(Player::X));
    assert_eq!(state.board().count(Player::X), 1);
    assert_eq!(state.board().count(Player::O), 1);
    assert!(!state.is_over());
    assert_eq!(state.current_player(), Player::X);
    assert_eq!(state.message(), "Player X's turn.");
    assert_eq!(agent.calls(), 1);
    assert_eq!(store.load("s1").unwrap(), Some(state));
}

#[test]
fn test_winning_move_skips_agent() {
    let store = store();
    let agent = CountingAgent::new(2);
    let start = GameState::from_board(board(['X', 'X', ' ', 'O', 'O', ' ', ' ', ' ', ' ']));
    store.save("s2", &start).unwrap();

    let state = play_turn(&store, "s2", TurnRequest::Move(2), &agent).unwrap();

    assert!(state.is_over());
    assert_eq!(state.status(), GameStatus::Won(Player::X));
    assert_eq!(state.winner(), Some(Outcome::Winner(Player::X)));
    assert_eq!(state.message(), "Player X wins!");
    assert_eq!(state.board().count(Player::O), 2);
    assert_eq!(agent.calls(), 0);
}

#[test]
fn test_filling_move_draws_and_locks_board() {
    let store = store();
    let agent = CountingAgent::new(3);
    let start = GameState::from_board(board(['X', 'O', 'X', 'X', 'O', 'O', 'O', 'X', ' ']));
    store.save("s3", &start).unwrap();

    let state = play_turn(&store, "s3", TurnRequest::Move(8), &agent).unwrap();
    assert_eq!(state.winner(), Some(Outcome::Draw));
    assert_eq!(state.message(), "It's a draw!");
    assert_eq!(agent.calls(), 0);

    for position in [0, 8, 9] {
        let after = play_turn(&store, "s3", TurnRequest::Move(position), &agent).unwrap();
        assert_eq!(after.board(), state.board());
        assert_eq!(after.status(), GameStatus::Draw);
        assert_eq!(after.message(), INVALID_MOVE_MESSAGE);
    }
    assert_eq!(agent.calls(), 0);
}

#[test]
fn test_reset_from_finished_game() {
    let store = store();
    let agent = CountingAgent::new(4);
    let start = GameState::from_board(board(['X', 'X', ' ', 'O', 'O', ' ', ' ', ' ', ' ']));
    store.save("s4", &start).unwrap();
    play_turn(&store, "s4", TurnRequest::Move(2), &agent).unwrap();

    let state = play_turn(&store, "s4", TurnRequest::Reset, &agent).unwrap();

    assert!(state.board().squares().iter().all(|s| *s == Square::Empty));
    assert_eq!(state.current_player(), Player::X);
    assert!(!state.is_over());
    assert_eq!(state.winner(), None);
    assert_eq!(store.load("s4").unwrap(), Some(GameState::new()));
}

#[test]
fn test_show_leaves_state_untouched() {
    let store = store();
    let agent = CountingAgent::new(5);
    let played = play_turn(&store, "s5", TurnRequest::Move(0), &agent).unwrap();

    let shown = play_turn(&store, "s5", TurnRequest::Show, &agent).unwrap();

    assert_eq!(shown, played);
    assert_eq!(agent.calls(), 1);
}

#[test]
fn test_sessions_are_independent() {
    let store = store();
    let agent = CountingAgent::new(6);
    play_turn(&store, "a", TurnRequest::Move(0), &agent).unwrap();

    let other = play_turn(&store, "b", TurnRequest::Show, &agent).unwrap();

    assert_eq!(other, GameState::new());
}

#[test]
fn test_full_games_finish_within_five_turns() {
    for seed in 0..50 {
        let store = store();
        let agent = RandomAgent::new(ChaCha8Rng::seed_from_u64(seed));
        let human = RandomAgent::new(ChaCha8Rng::seed_from_u64(seed + 1000));
        let mut turns = 0;
        let mut state = play_turn(&store, "g", TurnRequest::Show, &agent).unwrap();
        while !state.is_over() {
            let pos = human.choose_move(state.board()).unwrap();
            state = play_turn(&store, "g", TurnRequest::Move(pos.to_index() as i64), &agent)
                .unwrap();
            turns += 1;
        }
        assert!(turns <= 5, "seed {seed}: {turns} human turns");
        assert!(state.winner().is_some());
    }
}

#[test]
fn test_lost_update_is_last_write_wins() {
    // Two requests read the same snapshot; the later save overwrites the
    // earlier one instead of merging.
    let store = store();
    store.save("race", &GameState::new()).unwrap();

    let mut first = store.load("race").unwrap().unwrap();
    let mut second = store.load("race").unwrap().unwrap();
    tictactoe_rules::apply_move(&mut first, 0, Player::X).unwrap();
    tictactoe_rules::apply_move(&mut second, 8, Player::X).unwrap();
    store.save("race", &first).unwrap();
    store.save("race", &second).unwrap();

    let saved = store.load("race").unwrap().unwrap();
    assert_eq!(saved.board().get(Position::TopLeft), Square::Empty);
    assert_eq!(saved.board().get(Position::BottomRight), Square::Occupied(Player::X));
}

#[test]
fn test_concurrent_turns_leave_a_valid_game() {
    let store: Arc<dyn SessionStore> = Arc::new(store());
    let agent: Arc<dyn MoveAgent> = Arc::new(CountingAgent::new(7));

    let handles: Vec<_> = (0..9)
        .map(|position| {
            let store = Arc::clone(&store);
            let agent = Arc::clone(&agent);
            std::thread::spawn(move || {
                play_turn(store.as_ref(), "busy", TurnRequest::Move(position), agent.as_ref())
                    .unwrap()
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let state = store.load("busy").unwrap().unwrap();
    let x = state.board().count(Player::X);
    let o = state.board().count(Player::O);
    assert!(x == o || x == o + 1, "x={x} o={o}");
    assert!(x >= 1);
}
