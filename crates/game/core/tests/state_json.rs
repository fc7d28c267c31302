//! JSON representation of persisted and reported types.

use serde_json::json;
use tile_core::{
    Board, Direction, EngineEvent, EngineStatus, GameConfig, GameState, InputSource, MoveCommand,
    MoveContext, Platform, Position, apply_move,
};

fn played_state() -> GameState {
    let start = GameState::opening("json-seed", &GameConfig::default()).with_session_id("json");
    let context = MoveContext::new(
        MoveCommand::new(Direction::Right, 100, InputSource::Touch),
        Platform::new("serde", InputSource::Touch),
    )
    .at(140);
    let mut state = apply_move(&start, &mut start.prng(), &context)
        .unwrap()
        .next_state;
    state
        .pending_moves
        .push(MoveCommand::new(Direction::Up, 150, InputSource::Keyboard));
    state
}

#[test]
fn game_state_round_trips_in_full() {
    let state = played_state();
    let encoded = serde_json::to_string(&state).unwrap();
    let decoded: GameState = serde_json::from_str(&encoded).unwrap();
    assert_eq!(decoded, state);
}

#[test]
fn wire_shape_uses_camel_case_and_null_cells() {
    let value = serde_json::to_value(played_state()).unwrap();

    assert_eq!(value["status"], json!("animating"));
    assert_eq!(value["moveCount"], json!(1));
    assert_eq!(value["seedCursor"], json!(2));
    assert_eq!(value["sessionId"], json!("json"));
    assert_eq!(value["pendingMoves"][0]["direction"], json!("up"));
    assert_eq!(value["pendingMoves"][0]["requestedAt"], json!(150));
    assert_eq!(value["undoStack"][0]["rngCursor"], json!(0));

    let board = value["board"].as_array().unwrap();
    assert_eq!(board.len(), 4);
    assert!(board.iter().all(|row| row.as_array().unwrap().len() == 4));
    let cells: Vec<_> = board.iter().flat_map(|row| row.as_array().unwrap()).collect();
    assert!(cells.iter().any(|cell| cell.is_null()));
    assert!(cells.iter().any(|cell| cell["isNew"] == json!(true)));
}

#[test]
fn malformed_board_is_rejected_on_decode() {
    let misplaced = json!({
        "board": [
            [{"id": "a", "value": 2, "row": 1, "col": 1, "isNew": false}, null],
            [null, null]
        ],
        "score": 0,
        "bestScore": 0,
        "moveCount": 0,
        "seed": "s",
        "seedCursor": 0,
        "status": "idle"
    });
    assert!(serde_json::from_value::<GameState>(misplaced).is_err());

    let ragged = json!([[null, null], [null]]);
    assert!(serde_json::from_value::<Board>(ragged).is_err());
}

#[test]
fn optional_fields_default_when_absent() {
    let minimal = json!({
        "board": [[null, null], [null, {"id": "b", "value": 4, "row": 1, "col": 1}]],
        "score": 4,
        "bestScore": 8,
        "moveCount": 2,
        "seed": "s",
        "seedCursor": 4,
        "status": "gameOver"
    });
    let state: GameState = serde_json::from_value(minimal).unwrap();
    assert_eq!(state.status, EngineStatus::GameOver);
    assert!(state.pending_moves.is_empty());
    assert!(state.undo_stack.is_empty());
    assert_eq!(state.session_id, None);
    assert_eq!(state.board.get(Position::new(1, 1)).unwrap().value, 4);
}

#[test]
fn events_are_tagged_by_type() {
    let event = EngineEvent::TileMerged {
        target_id: "m".into(),
        consumed_ids: ("a".into(), "b".into()),
        value: 8,
        score_delta: 8,
    };
    assert_eq!(
        serde_json::to_value(&event).unwrap(),
        json!({
            "type": "TileMerged",
            "targetId": "m",
            "consumedIds": ["a", "b"],
            "value": 8,
            "scoreDelta": 8
        })
    );
}

#[test]
fn telemetry_event_names_serialize_dotted() {
    let start = GameState::opening("t", &GameConfig::default());
    let context = MoveContext::new(
        MoveCommand::new(Direction::Down, 0, InputSource::Keyboard),
        Platform::new("serde", InputSource::Keyboard),
    )
    .at(0);
    let outcome = apply_move(&start, &mut start.prng(), &context).unwrap();
    let payload = serde_json::to_value(&outcome.telemetry[0]).unwrap();
    assert_eq!(payload["event"], json!("move.completed"));
    assert_eq!(payload["platform"]["inputMode"], json!("keyboard"));
    assert_eq!(payload["timestamp"], json!("1970-01-01T00:00:00.000Z"));
    assert!(payload.get("deviceCategory").is_none());
}
