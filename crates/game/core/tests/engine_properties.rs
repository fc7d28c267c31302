//! Properties checked over long deterministic play-throughs.

use std::collections::HashSet;

use tile_core::{
    Direction, EngineEvent, EngineStatus, GameConfig, GameState, InputSource, MoveCommand,
    MoveContext, Platform, RngStream, SeededPrng, TelemetryEvent, apply_move, detect_game_over,
    has_available_moves,
};

const SEEDS: [&str; 4] = ["seed-alpha-221022", "prop-1", "prop-2", "ünïcode-seed"];

fn context(direction: Direction) -> MoveContext {
    MoveContext::new(
        MoveCommand::new(direction, 0, InputSource::Keyboard),
        Platform::new("properties", InputSource::Keyboard),
    )
    .at(0)
}

/// Plays up to `limit` moves, choosing directions from a separate stream.
fn play<F>(seed: &str, limit: usize, mut check: F)
where
    F: FnMut(&GameState, &tile_core::MoveOutcome, u64),
{
    let mut chooser = SeededPrng::new(format!("{seed}-directions"), 0);
    let mut state = GameState::opening(seed, &GameConfig::default());

    for _ in 0..limit {
        let direction = Direction::ALL[chooser.next_int(4).unwrap()];
        let mut prng = state.prng();
        let before = prng.cursor();
        let outcome = apply_move(&state, &mut prng, &context(direction)).unwrap();
        check(&state, &outcome, prng.cursor() - before);

        state = outcome.next_state;
        if state.status == EngineStatus::GameOver {
            break;
        }
        state.status = EngineStatus::Idle;
    }
}

fn total(state: &GameState) -> u64 {
    state.board.tiles().map(|tile| u64::from(tile.value)).sum()
}

#[test]
fn draws_are_consumed_only_by_spawns() {
    for seed in SEEDS {
        play(seed, 300, |state, outcome, draws| {
            let spawned = outcome
                .events
                .iter()
                .any(|event| matches!(event, EngineEvent::TileSpawned { .. }));
            assert_eq!(draws, if spawned { 2 } else { 0 });
            assert_eq!(outcome.next_state.seed_cursor, state.seed_cursor + draws);
        });
    }
}

#[test]
fn tile_sum_is_conserved_up_to_the_spawn() {
    for seed in SEEDS {
        play(seed, 300, |state, outcome, _| {
            let spawn_value: u64 = outcome
                .events
                .iter()
                .filter_map(|event| match event {
                    EngineEvent::TileSpawned { value, .. } => Some(u64::from(*value)),
                    _ => None,
                })
                .sum();
            assert_eq!(total(&outcome.next_state), total(state) + spawn_value);
            assert_eq!(
                outcome.next_state.score,
                state.score + outcome.score_delta()
            );
        });
    }
}

#[test]
fn no_tile_takes_part_in_two_merges() {
    for seed in SEEDS {
        play(seed, 300, |_, outcome, _| {
            let mut consumed = HashSet::new();
            let mut targets = HashSet::new();
            for event in &outcome.events {
                if let EngineEvent::TileMerged {
                    target_id,
                    consumed_ids,
                    ..
                } = event
                {
                    assert!(consumed.insert(consumed_ids.0.clone()));
                    assert!(consumed.insert(consumed_ids.1.clone()));
                    assert!(!consumed.contains(target_id));
                    assert!(targets.insert(target_id.clone()));
                }
            }
        });
    }
}

#[test]
fn outcome_kind_matches_board_state() {
    for seed in SEEDS {
        play(seed, 500, |state, outcome, _| {
            match outcome.telemetry[0].event {
                TelemetryEvent::MoveCompleted => {
                    assert_eq!(outcome.next_state.move_count, state.move_count + 1);
                    let terminal = detect_game_over(&outcome.next_state.board);
                    assert_eq!(outcome.is_game_over(), terminal);
                }
                TelemetryEvent::MoveRejected => {
                    assert!(has_available_moves(&state.board));
                    assert_eq!(outcome.next_state, *state);
                }
                TelemetryEvent::GameOver => {
                    assert!(detect_game_over(&state.board));
                    assert_eq!(outcome.next_state.board, state.board);
                }
            }
        });
    }
}

#[test]
fn input_state_is_never_modified() {
    play("immutable", 100, |state, outcome, _| {
        let copy = state.clone();
        let mut prng = state.prng();
        let direction = outcome.telemetry[0].direction;
        let _ = apply_move(state, &mut prng, &context(direction)).unwrap();
        assert_eq!(*state, copy);
    });
}
