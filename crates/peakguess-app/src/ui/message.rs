//! Application messages

use std::sync::Arc;

use peakguess_core::{RoundPlan, StereoBuffer};

/// A fully loaded round: the decoded sample plus the plan it belongs to.
///
/// The samples sit behind an `Arc` that both lanes arm from, so the
/// message stays cheap to clone and the round holds one allocation.
#[derive(Debug, Clone)]
pub struct LoadedRound {
    pub plan: RoundPlan,
    pub samples: Arc<StereoBuffer>,
    pub sample_rate: u32,
}

/// Messages that can be sent to the application
#[derive(Debug, Clone)]
pub enum Message {
    /// Start button clicked
    StartClicked,
    /// Continue button clicked after a result
    ContinueClicked,
    /// A/B toggle clicked
    AbToggled,
    /// Space bar pressed (A/B while guessing, continue after a result)
    SpacePressed,
    /// The user picked a candidate frequency on the chart
    FrequencyPicked(u32),
    /// Background sample load finished for the given round
    RoundLoaded {
        round: u64,
        result: Result<LoadedRound, String>,
    },
}
