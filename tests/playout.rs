//! Random playouts: invariants checked after every committed input.

use morris_core::{Board, BoardRecord, Game, Player, Pos, TOKENS_PER_TEAM};
use rand::prelude::*;

const GAMES: usize = 200;
const MAX_INPUTS: usize = 300;

fn assert_invariants(board: &Board) {
    for player in [Player::Cat, Player::Dog] {
        let team = board.team(player);
        let on_board = board.tokens_on_board(player);
        assert!(team.unplaced_tokens() <= TOKENS_PER_TEAM);
        assert!(team.alive_tokens() <= TOKENS_PER_TEAM);
        assert!(on_board <= TOKENS_PER_TEAM - team.unplaced_tokens());
        assert!(on_board <= team.alive_tokens());
    }

    let mut recounted = *board;
    recounted.recount_mills();
    assert_eq!(&recounted, board, "mill counters drifted");

    if let Some(lifted) = board.pending_lift() {
        assert!(board.is_empty(lifted));
    }
}

#[test]
fn test_random_playouts_keep_invariants() {
    let mut rng = rand::rng();
    let mut decided = 0;

    for _ in 0..GAMES {
        let mut game = Game::new();

        for _ in 0..MAX_INPUTS {
            let legal = game.legal_inputs();
            if legal.is_empty() {
                break;
            }

            // A random illegal input must be refused without side effects.
            let probe = Pos(rng.random_range(0..24));
            if !legal.contains(&probe) {
                let before = *game.current();
                let depth = game.history().len();
                assert!(game.apply_input(probe).is_err());
                assert_eq!(game.current(), &before);
                assert_eq!(game.history().len(), depth);
            }

            let pos = legal[rng.random_range(0..legal.len())];
            let before = *game.current();
            game.apply_input(pos).expect("listed input must be accepted");
            assert_invariants(game.current());

            // undo is an exact inverse
            let after = *game.current();
            assert_eq!(game.undo(), &before);
            game.apply_input(pos).expect("replay after undo");
            assert_eq!(game.current(), &after);
        }

        if game.check_victory().is_some() {
            decided += 1;
        }

        let restored = Game::from_records(None, None, game.to_records()).unwrap();
        assert_eq!(restored.history(), game.history());
    }

    assert!(decided > 0, "no random game reached a decision");
}

#[test]
fn test_random_records_roundtrip() {
    let mut rng = rand::rng();
    for _ in 0..50 {
        let mut game = Game::new();
        for _ in 0..60 {
            let legal = game.legal_inputs();
            if legal.is_empty() {
                break;
            }
            game.apply_input(legal[rng.random_range(0..legal.len())])
                .expect("listed input must be accepted");
            let board = *game.current();
            let record = BoardRecord::from(&board);
            let json = serde_json::to_string(&record).unwrap();
            let parsed: BoardRecord = serde_json::from_str(&json).unwrap();
            assert_eq!(parsed, record);
            assert_eq!(Board::try_from(parsed).unwrap(), board);
        }
    }
}
