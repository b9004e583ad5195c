/*!
 * Time to cue lookup.
 *
 * `CueIndex` answers "which cue is showing at this playback time" with a
 * binary search over closed `[start, end]` intervals. Queries may jump
 * backwards (seeking), so no state is kept between lookups.
 */

use super::model::{Cue, CueSet};

/// Ordered cue collection supporting time lookups
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CueIndex {
    cues: CueSet,
    /// Largest `end_ms` among cues `0..=i`
    max_end_ms: Vec<u64>,
}

impl CueIndex {
    /// Build an index from a cue set.
    ///
    /// The set is expected to be sorted by start time already; an unsorted
    /// set is stably re-sorted so lookups stay correct.
    pub fn new(cues: CueSet) -> Self {
        let cues = if cues.is_sorted() {
            cues
        } else {
            CueSet::sorted(cues.to_vec())
        };

        let max_end_ms = cues
            .iter()
            .scan(0u64, |max_end, cue| {
                *max_end = (*max_end).max(cue.end_ms);
                Some(*max_end)
            })
            .collect();

        Self { cues, max_end_ms }
    }

    /// Index of the cue active at `current_time` seconds.
    ///
    /// Intervals are closed on both ends. Among the cues containing the time,
    /// the one starting last wins, so at a shared boundary
    /// (`end_ms == next.start_ms`) the later cue is returned. Returns `None`
    /// before the first cue, after the last one, in gaps, and for non-finite
    /// times.
    ///
    /// A binary search finds the last cue starting at or before the time.
    /// From there the lookup walks back only while some earlier cue still
    /// ends at or after the time, which for non-overlapping cues is at most
    /// one step.
    pub fn active_index_at(&self, current_time: f64) -> Option<usize> {
        if self.cues.is_empty() || !current_time.is_finite() {
            return None;
        }

        let started = self
            .cues
            .partition_point(|cue| cue.start_seconds() <= current_time);

        (0..started)
            .rev()
            .take_while(|&i| self.max_end_ms[i] as f64 / 1000.0 >= current_time)
            .find(|&i| self.cues[i].contains(current_time))
    }

    /// Cue active at `current_time` seconds
    pub fn active_cue_at(&self, current_time: f64) -> Option<&Cue> {
        self.active_index_at(current_time).map(|index| &self.cues[index])
    }

    pub fn cue_at(&self, index: usize) -> Option<&Cue> {
        self.cues.get(index)
    }

    /// Position of the cue with the given id
    pub fn position_of(&self, id: i64) -> Option<usize> {
        self.cues.iter().position(|cue| cue.id == id)
    }

    pub fn find_by_id(&self, id: i64) -> Option<&Cue> {
        self.cues.find_by_id(id)
    }

    pub fn cues(&self) -> &CueSet {
        &self.cues
    }

    pub fn len(&self) -> usize {
        self.cues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cues.is_empty()
    }
}

impl From<CueSet> for CueIndex {
    fn from(cues: CueSet) -> Self {
        Self::new(cues)
    }
}
