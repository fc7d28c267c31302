//! Text formatting for the HUD and status line.

use tile_core::EngineEvent;

/// Formats a score with comma thousands separators.
pub fn format_score(score: u64) -> String {
    let digits = score.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// One-line summary of a resolution's event log.
///
/// Game over and rejection take precedence; otherwise the highest merge is
/// reported, then the spawn.
pub fn describe_events(events: &[EngineEvent]) -> Option<String> {
    if events
        .iter()
        .any(|event| matches!(event, EngineEvent::GameOver { .. }))
    {
        return Some("No moves left".to_string());
    }

    if let Some(EngineEvent::MoveRejected { reason }) = events.first() {
        return Some(reason.clone());
    }

    let merges: Vec<u32> = events
        .iter()
        .filter_map(|event| match event {
            EngineEvent::TileMerged { value, .. } => Some(*value),
            _ => None,
        })
        .collect();
    if let Some(best) = merges.iter().max() {
        return Some(match merges.len() {
            1 => format!("Merged into {best}"),
            count => format!("{count} merges, best {best}"),
        });
    }

    events.iter().find_map(|event| match event {
        EngineEvent::TileSpawned {
            value, position, ..
        } => Some(format!(
            "Spawned {value} at row {}, col {}",
            position.row + 1,
            position.col + 1
        )),
        _ => None,
    })
}
