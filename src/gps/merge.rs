// src/gps/merge.rs
//! Merging the latest RMC and GGA into one combined fix

use super::{
    data::{CombinedFix, FixDetail, PositionFix, Sentence},
    nmea::decode_sentence,
};
use tracing::{debug, trace};

/// Which halves of the next combined fix are waiting.
///
/// A complete pair is emitted in the same step that completes it, so the
/// machine never rests in a pair-ready state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MergeState {
    #[default]
    Idle,
    RmcPending,
    GgaPending,
}

/// Per-stream merge of RMC and GGA sentences.
///
/// Each stream owns its own merger. A newer sentence of a kind that is
/// already pending replaces it; nothing is buffered beyond one of each.
#[derive(Debug, Clone, Default)]
pub struct FixMerger {
    state: MergeState,
    rmc: Option<PositionFix>,
    gga: Option<FixDetail>,
}

impl FixMerger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> MergeState {
        self.state
    }

    /// Drop any pending halves.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Decode one line and return a combined fix if it completes a pair.
    ///
    /// Lines that fail to decode, or are of another sentence type, leave the
    /// pending state untouched.
    pub fn try_decode_combined(&mut self, line: &str) -> Option<CombinedFix> {
        match decode_sentence(line) {
            Ok(sentence) => self.push(sentence),
            Err(rejection) => {
                debug!("Dropping sentence: {}", rejection);
                None
            }
        }
    }

    /// Feed an already decoded sentence into the merge.
    pub fn push(&mut self, sentence: Sentence) -> Option<CombinedFix> {
        let next = match (self.state, sentence) {
            (MergeState::Idle | MergeState::RmcPending, Sentence::Rmc(rmc)) => {
                self.rmc = Some(rmc);
                MergeState::RmcPending
            }
            (MergeState::Idle | MergeState::GgaPending, Sentence::Gga(gga)) => {
                self.gga = Some(gga);
                MergeState::GgaPending
            }
            (MergeState::GgaPending, Sentence::Rmc(rmc)) => {
                self.rmc = Some(rmc);
                return self.emit();
            }
            (MergeState::RmcPending, Sentence::Gga(gga)) => {
                self.gga = Some(gga);
                return self.emit();
            }
        };

        trace!("Merge state {:?} -> {:?}", self.state, next);
        self.state = next;
        None
    }

    fn emit(&mut self) -> Option<CombinedFix> {
        let combined = match (self.gga.take(), self.rmc.take()) {
            (Some(gga), Some(rmc)) => Some(CombinedFix::new(&gga, &rmc)),
            _ => None,
        };
        self.state = MergeState::Idle;
        combined
    }
}
