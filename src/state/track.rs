//! Track layout merge

use crate::types::{CanonicalEvent, RaceState, StateDelta};

pub fn apply(state: &mut RaceState, event: &CanonicalEvent, delta: &mut StateDelta) {
    let Some(patch) = &event.track else { return };

    let track = &mut state.track;
    let mut touched = false;

    if let Some(name) = &patch.name {
        track.name = name.clone();
        touched = true;
    }
    if let Some(length) = patch.length {
        track.length = Some(length);
        touched = true;
    }
    if let Some(sector_count) = patch.sector_count {
        track.sector_count = Some(sector_count);
        touched = true;
    }
    if let Some(layout) = &patch.layout {
        track.layout = Some(layout.clone());
        touched = true;
    }

    if touched {
        delta.track_changed = true;
    }
}
