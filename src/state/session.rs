//! Session update merge

use crate::types::{CanonicalEvent, RaceState, SessionStatus, StateDelta};

pub fn apply(state: &mut RaceState, event: &CanonicalEvent, delta: &mut StateDelta) {
    let Some(patch) = &event.session else { return };
    if patch.is_empty() {
        return;
    }

    // The race webhook carries the track name among session fields; it
    // belongs to the track layout, not the session.
    if let Some(track_name) = &patch.track_name {
        if state.track.name != *track_name {
            state.track.name = track_name.clone();
            delta.track_changed = true;
        }
    }

    let session = &mut state.session;
    let mut session_touched = false;

    if let Some(session_type) = &patch.session_type {
        session.session_type = session_type.clone();
        session_touched = true;
    }
    if let Some(flag_status) = &patch.flag_status {
        session.flag_status = Some(flag_status.clone());
        session_touched = true;
    }
    if let Some(total_time) = &patch.total_time {
        session.total_time = Some(total_time.clone());
        session_touched = true;
    }
    if let Some(total_laps) = patch.total_laps {
        session.total_laps = Some(total_laps);
        session_touched = true;
    }
    if let Some(current_lap) = patch.current_lap {
        session.current_lap = Some(current_lap);
        session_touched = true;
    }

    if let Some(is_running) = patch.is_running {
        if is_running {
            session.status = SessionStatus::Running;
            // Stamped once; repeated running updates never move it.
            if session.session_start.is_none() {
                session.session_start = Some(event.timestamp);
            }
        } else {
            session.status = if session.status == SessionStatus::Running {
                SessionStatus::Finished
            } else {
                SessionStatus::Waiting
            };
        }
        session_touched = true;
    }

    if session_touched {
        delta.session_changed = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{EventKind, SessionPatch};
    use serde_json::Value;

    fn session_event(patch: SessionPatch, timestamp: i64) -> CanonicalEvent {
        let mut event = CanonicalEvent::empty(EventKind::SessionUpdate, timestamp, Value::Null);
        event.session = Some(patch);
        event
    }

    #[test]
    fn test_session_start_stamped_once() {
        let mut state = RaceState::default();
        let mut delta = StateDelta::default();

        let start = SessionPatch {
            is_running: Some(true),
            ..Default::default()
        };
        apply(&mut state, &session_event(start.clone(), 5_000), &mut delta);
        assert_eq!(state.session.session_start, Some(5_000));
        assert_eq!(state.session.status, SessionStatus::Running);

        // A later running update must not move the start stamp.
        apply(&mut state, &session_event(start, 9_000), &mut delta);
        assert_eq!(state.session.session_start, Some(5_000));
    }

    #[test]
    fn test_running_false_finishes_a_running_session() {
        let mut state = RaceState::default();
        let mut delta = StateDelta::default();

        apply(
            &mut state,
            &session_event(
                SessionPatch {
                    is_running: Some(true),
                    ..Default::default()
                },
                1_000,
            ),
            &mut delta,
        );
        apply(
            &mut state,
            &session_event(
                SessionPatch {
                    is_running: Some(false),
                    ..Default::default()
                },
                2_000,
            ),
            &mut delta,
        );

        assert_eq!(state.session.status, SessionStatus::Finished);
    }

    #[test]
    fn test_merge_by_presence_keeps_prior_fields() {
        let mut state = RaceState::default();
        let mut delta = StateDelta::default();

        apply(
            &mut state,
            &session_event(
                SessionPatch {
                    session_type: Some("Race".to_string()),
                    total_laps: Some(20),
                    ..Default::default()
                },
                1_000,
            ),
            &mut delta,
        );
        apply(
            &mut state,
            &session_event(
                SessionPatch {
                    current_lap: Some(3),
                    ..Default::default()
                },
                2_000,
            ),
            &mut delta,
        );

        assert_eq!(state.session.session_type, "Race");
        assert_eq!(state.session.total_laps, Some(20));
        assert_eq!(state.session.current_lap, Some(3));
    }

    #[test]
    fn test_track_name_routes_to_track_layout() {
        let mut state = RaceState::default();
        let mut delta = StateDelta::default();

        apply(
            &mut state,
            &session_event(
                SessionPatch {
                    track_name: Some("Monza Mini".to_string()),
                    ..Default::default()
                },
                1_000,
            ),
            &mut delta,
        );

        assert_eq!(state.track.name, "Monza Mini");
        assert!(delta.track_changed);
        assert!(!delta.session_changed);
    }

    #[test]
    fn test_empty_patch_is_noop() {
        let mut state = RaceState::default();
        let mut delta = StateDelta::default();

        apply(
            &mut state,
            &session_event(SessionPatch::default(), 1_000),
            &mut delta,
        );
        assert!(delta.is_empty());
    }
}
