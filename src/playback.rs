/*!
 * Active cue tracking for a playing video.
 *
 * The host player reports its clock through [`ActiveCueTracker::on_tick`]
 * at whatever cadence it likes. The tracker answers only when the active cue
 * changes, so the host re-highlights a line once rather than on every tick.
 */

use log::trace;

use crate::cue::{Cue, CueIndex, CueSet};

/// Transition of the active cue between two ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveCueChange {
    /// Index active before the tick
    pub previous: Option<usize>,
    /// Index active after the tick
    pub current: Option<usize>,
}

/// Follows the playback clock over one cue set
#[derive(Debug, Clone, Default)]
pub struct ActiveCueTracker {
    index: CueIndex,
    active: Option<usize>,
}

impl ActiveCueTracker {
    pub fn new(cues: CueSet) -> Self {
        Self {
            index: CueIndex::new(cues),
            active: None,
        }
    }

    /// Report the current playback time in seconds.
    ///
    /// Returns a change only when the active index differs from the last tick.
    pub fn on_tick(&mut self, current_time: f64) -> Option<ActiveCueChange> {
        let current = self.index.active_index_at(current_time);
        if current == self.active {
            return None;
        }

        let change = ActiveCueChange {
            previous: self.active,
            current,
        };
        trace!("Active cue {:?} -> {:?} at {:.3}s", change.previous, change.current, current_time);
        self.active = current;
        Some(change)
    }

    /// Start time in seconds of the cue at `index`, for click-to-seek
    pub fn seek_target(&self, index: usize) -> Option<f64> {
        self.index.cue_at(index).map(Cue::start_seconds)
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    pub fn active_cue(&self) -> Option<&Cue> {
        self.active.and_then(|i| self.index.cue_at(i))
    }

    pub fn index(&self) -> &CueIndex {
        &self.index
    }

    /// Forget the active cue; the next tick reports a fresh change
    pub fn reset(&mut self) {
        self.active = None;
    }

    /// Swap in a new cue set, e.g. after a video or language switch
    pub fn replace_index(&mut self, cues: CueSet) {
        self.index = CueIndex::new(cues);
        self.active = None;
    }

    /// Swap in an updated version of the current cue set.
    ///
    /// When the new set holds the same cue ids in the same order (a
    /// translation backfill), the active cue is kept and the next tick at the
    /// same time reports nothing. Any other set is handled like
    /// [`replace_index`](Self::replace_index).
    pub fn replace_cues(&mut self, cues: CueSet) {
        let same_layout = cues.len() == self.index.len()
            && cues
                .iter()
                .zip(self.index.cues().iter())
                .all(|(new, old)| new.id == old.id);

        if same_layout {
            self.index = CueIndex::new(cues);
        } else {
            self.replace_index(cues);
        }
    }
}
