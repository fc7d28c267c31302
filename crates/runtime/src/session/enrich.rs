//! Gesture metadata attached to engine telemetry.

use tile_core::{DeviceCategory, GestureType, Orientation, TelemetryPayload};

/// Input-layer details captured alongside a move request.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GestureMetadata {
    pub gesture_type: Option<GestureType>,
    /// Milliseconds since the Unix epoch when the gesture began.
    pub started_at: Option<i64>,
    /// Measured input latency; replaces the engine's request-to-resolve figure.
    pub latency_ms: Option<u64>,
    pub device_category: Option<DeviceCategory>,
    pub orientation: Option<Orientation>,
    /// Time the session resumed from the background before this gesture.
    pub resume_at: Option<i64>,
}

impl GestureMetadata {
    pub fn swipe(device_category: DeviceCategory) -> Self {
        Self {
            gesture_type: Some(GestureType::Swipe),
            device_category: Some(device_category),
            ..Self::default()
        }
    }

    pub fn tap(device_category: DeviceCategory) -> Self {
        Self {
            gesture_type: Some(GestureType::Tap),
            device_category: Some(device_category),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_latency(mut self, latency_ms: u64) -> Self {
        self.latency_ms = Some(latency_ms);
        self
    }

    #[must_use]
    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = Some(orientation);
        self
    }
}

/// The most recent gesture that produced a resolved move.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LastGesture {
    pub gesture_type: GestureType,
    pub latency_ms: u64,
    pub completed_at: i64,
}

/// Copies gesture metadata onto every payload of one resolution.
///
/// Payloads are left untouched when there is neither metadata nor a resume
/// stamp. Otherwise the session orientation is used when the gesture did not
/// report one.
pub(crate) fn enrich(
    payloads: &mut [TelemetryPayload],
    metadata: Option<&GestureMetadata>,
    orientation: Orientation,
    resume_at: Option<i64>,
) {
    if metadata.is_none() && resume_at.is_none() {
        return;
    }

    for payload in payloads {
        if let Some(metadata) = metadata {
            payload.latency_ms = metadata.latency_ms.unwrap_or(payload.latency_ms);
            payload.device_category = metadata.device_category.or(payload.device_category);
            payload.gesture_type = metadata.gesture_type.or(payload.gesture_type);
        }
        payload.orientation = Some(
            metadata
                .and_then(|metadata| metadata.orientation)
                .unwrap_or(orientation),
        );
        payload.resume_at = metadata
            .and_then(|metadata| metadata.resume_at)
            .or(resume_at);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tile_core::{Direction, InputSource, Platform, TelemetryEvent, is_mobile_interaction};

    fn payload() -> TelemetryPayload {
        TelemetryPayload {
            session_id: "s".into(),
            move_id: "seed-1-2".into(),
            direction: Direction::Left,
            score_delta: 4,
            board_hash: "b0-0".into(),
            latency_ms: 30,
            seed: "seed".into(),
            seed_cursor: 2,
            platform: Platform::new("agent", InputSource::Touch),
            timestamp: "1970-01-01T00:00:00.000Z".into(),
            event: TelemetryEvent::MoveCompleted,
            device_category: None,
            gesture_type: None,
            orientation: None,
            resume_at: None,
        }
    }

    #[test]
    fn nothing_to_add_leaves_payload_alone() {
        let mut payloads = [payload()];
        enrich(&mut payloads, None, Orientation::Portrait, None);
        assert_eq!(payloads[0], payload());
    }

    #[test]
    fn swipe_metadata_makes_a_mobile_interaction() {
        let metadata = GestureMetadata::swipe(DeviceCategory::Mobile).with_latency(12);
        let mut payloads = [payload()];
        enrich(&mut payloads, Some(&metadata), Orientation::Portrait, None);

        let enriched = &payloads[0];
        assert_eq!(enriched.latency_ms, 12);
        assert_eq!(enriched.orientation, Some(Orientation::Portrait));
        assert!(is_mobile_interaction(enriched));
    }

    #[test]
    fn resume_stamp_alone_sets_orientation_and_resume() {
        let mut payloads = [payload()];
        enrich(&mut payloads, None, Orientation::Landscape, Some(500));

        assert_eq!(payloads[0].resume_at, Some(500));
        assert_eq!(payloads[0].orientation, Some(Orientation::Landscape));
        assert_eq!(payloads[0].latency_ms, 30);
        assert!(!is_mobile_interaction(&payloads[0]));
    }
}
