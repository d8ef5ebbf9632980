//! Labels and the domination bookkeeping shared by both search variants.

use serde::{Deserialize, Serialize};

use crate::history::HistoryIndex;
use crate::types::{is_dominate, State};

use super::SearchStats;

/// Candidate resource state reached at a vertex.
///
/// Only the `dominated` flag ever changes after creation; dominated labels
/// are swept lazily at the start of a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    /// Resource state at the vertex.
    pub state: State,
    /// Tombstone set once another label dominates this one.
    pub dominated: bool,
    /// Node in the history tree describing how the label was reached.
    pub history: HistoryIndex,
}

impl Label {
    /// Create a live label.
    pub fn new(state: State, history: HistoryIndex) -> Self {
        Self {
            state,
            dominated: false,
            history,
        }
    }
}

/// Decide whether `candidate` may join the label sets of a vertex.
///
/// Rejects the candidate when any existing label (tombstoned or not)
/// dominates it. Otherwise tombstones every label the candidate dominates
/// and returns `true`; the caller appends the new label.
pub(crate) fn admit(candidate: &State, sets: &mut [&mut [Label]], stats: &mut SearchStats) -> bool {
    let dominated = sets
        .iter()
        .any(|labels| labels.iter().any(|l| is_dominate(&l.state, candidate)));
    if dominated {
        stats.candidates_dominated += 1;
        return false;
    }

    for labels in sets.iter_mut() {
        for label in labels.iter_mut() {
            if !label.dominated && is_dominate(candidate, &label.state) {
                label.dominated = true;
                stats.labels_tombstoned += 1;
            }
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admit_rejects_dominated_candidate() {
        let mut stats = SearchStats::default();
        let mut existing = vec![Label::new(State::new(1, 1, 5), 1)];
        assert!(!admit(&State::new(2, 1, 5), &mut [existing.as_mut_slice()], &mut stats));
        assert_eq!(stats.candidates_dominated, 1);
        assert!(!existing[0].dominated);
    }

    #[test]
    fn test_admit_rejects_identical_candidate() {
        let mut stats = SearchStats::default();
        let mut existing = vec![Label::new(State::new(1, 1, 5), 1)];
        assert!(!admit(&State::new(1, 1, 5), &mut [existing.as_mut_slice()], &mut stats));
    }

    #[test]
    fn test_admit_tombstones_across_sets() {
        let mut stats = SearchStats::default();
        let mut current = vec![
            Label::new(State::new(5, 5, 0), 1),
            Label::new(State::new(0, 9, 9), 2),
        ];
        let mut next = vec![Label::new(State::new(4, 4, 1), 3)];
        let candidate = State::new(3, 3, 3);

        assert!(admit(&candidate, &mut [next.as_mut_slice(), current.as_mut_slice()], &mut stats));
        assert!(current[0].dominated);
        assert!(!current[1].dominated);
        assert!(next[0].dominated);
        assert_eq!(stats.labels_tombstoned, 2);
    }

    #[test]
    fn test_tombstoned_label_still_rejects() {
        let mut stats = SearchStats::default();
        let mut existing = vec![Label::new(State::new(1, 1, 5), 1)];
        existing[0].dominated = true;
        assert!(!admit(&State::new(1, 2, 5), &mut [existing.as_mut_slice()], &mut stats));
    }
}
