//! Read-only view over the outcome of a suppression pass.
//!
//! Exporters (ROI writers, label rasterisers) consume this view; they are
//! expected to paint winners lowest-ranked first so higher scores end up on
//! top wherever overlaps survive suppression.

pub mod labels;
pub mod world;

use crate::candidate::{Candidate, Candidates, NmsOutcome};
use crate::util::{StarDistError, StarDistResult};

pub use labels::{LabelAllocator, MAX_LABEL_ID};

/// Winners and candidates of one pass.
#[derive(Clone, Copy, Debug)]
pub struct Detections<'a> {
    candidates: &'a Candidates,
    outcome: &'a NmsOutcome,
}

impl<'a> Detections<'a> {
    /// Pairs candidates with an outcome computed over the same list.
    pub fn new(candidates: &'a Candidates, outcome: &'a NmsOutcome) -> StarDistResult<Self> {
        if outcome.num_candidates() != candidates.len() {
            return Err(StarDistError::ShapeMismatch {
                prob: vec![candidates.len()],
                dist: vec![outcome.num_candidates()],
            });
        }
        Ok(Self::from_parts(candidates, outcome))
    }

    pub(crate) fn from_parts(candidates: &'a Candidates, outcome: &'a NmsOutcome) -> Self {
        Self {
            candidates,
            outcome,
        }
    }

    /// Winning candidate indices, best score first.
    pub fn winners(&self) -> &'a [usize] {
        self.outcome.winners()
    }

    /// Full ranking of candidate indices.
    pub fn ranking(&self) -> &'a [usize] {
        self.candidates.ranking()
    }

    /// Number of winners.
    pub fn len(&self) -> usize {
        self.outcome.winners().len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcome.winners().is_empty()
    }

    /// Number of candidates considered.
    pub fn num_candidates(&self) -> usize {
        self.candidates.len()
    }

    /// Candidate by scan index.
    pub fn candidate(&self, index: usize) -> Option<&'a Candidate> {
        self.candidates.get(index)
    }

    pub fn is_suppressed(&self, index: usize) -> bool {
        self.outcome.is_suppressed(index)
    }

    /// Winning candidates, best score first.
    pub fn iter(&self) -> impl Iterator<Item = &'a Candidate> + 'a {
        let items = self.candidates.as_slice();
        self.outcome.winners().iter().map(move |&idx| &items[idx])
    }

    /// Winners in painting order (lowest rank first) with their label IDs.
    ///
    /// The best winner receives the smallest label of this batch.
    pub fn paint_order(&self, labels: &mut LabelAllocator) -> Vec<(u16, &'a Candidate)> {
        let ids = labels.assign(self.len());
        let mut out: Vec<_> = ids.into_iter().zip(self.iter()).collect();
        out.reverse();
        out
    }
}
