//! Seeded random playouts driven through the move processor.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tictactoe_rules::{
    GameState, GameStatus, MoveAgent, Player, RandomAgent, apply_move, check_draw, check_win,
};

fn play_out(seed: u64) -> GameState {
    let agent = RandomAgent::new(ChaCha8Rng::seed_from_u64(seed));
    let mut state = GameState::new();
    while !state.is_over() {
        let pos = agent
            .choose_move(state.board())
            .expect("unfinished game has an empty cell");
        let player = state.current_player();
        apply_move(&mut state, pos.to_index(), player).expect("agent picks legal cells");
    }
    state
}

#[test]
fn test_playouts_keep_mark_balance_and_alternate() {
    for seed in 0..200 {
        let state = play_out(seed);
        let x = state.board().count(Player::X);
        let o = state.board().count(Player::O);
        assert!(x == o || x == o + 1, "seed {seed}: x={x} o={o}");
        assert_eq!(state.history().len(), x + o);
    }
}

#[test]
fn test_playout_outcome_matches_message() {
    for seed in 0..200 {
        let state = play_out(seed);
        let outcome = state.winner().expect("finished game has an outcome");
        assert_eq!(state.message(), outcome.to_string());
        match outcome.winner() {
            Some(player) => assert!(check_win(state.board(), player)),
            None => assert!(outcome.is_draw() && check_draw(state.board())),
        }
    }
}

#[test]
fn test_playout_outcomes_are_consistent() {
    for seed in 0..200 {
        let state = play_out(seed);
        match state.status() {
            GameStatus::Won(player) => {
                assert!(check_win(state.board(), player));
                assert!(!check_win(state.board(), player.opponent()));
                assert_eq!(state.message(), format!("Player {} wins!", player));
            }
            GameStatus::Draw => {
                assert!(check_draw(state.board()));
                assert!(!check_win(state.board(), Player::X));
                assert!(!check_win(state.board(), Player::O));
                assert_eq!(state.message(), "It's a draw!");
            }
            GameStatus::InProgress => panic!("seed {seed}: playout stopped early"),
        }
    }
}

#[test]
fn test_finished_game_serializes() {
    let state = play_out(5);
    let json = serde_json::to_string(&state).expect("serialize");
    let back: GameState = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(back, state);
}
