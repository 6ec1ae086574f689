//! Guessing game state machine
//!
//! [`GuessSession`] owns the round lifecycle: pick a sample and a target
//! frequency, wait for the audio to load, let the user compare and pick,
//! score, repeat. It is a pure state machine; handling an event returns
//! the [`SessionCommand`]s the app must execute against the player, so
//! every transition is unit-testable without audio.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::TrainerConfig;
use crate::effect::EqEffect;
use crate::scale::CANDIDATE_FREQUENCIES;

/// Where the session is in the round lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionState {
    /// Nothing loaded; waiting for the first start click
    Initial,
    /// A round is being fetched and decoded
    LoadingSamples,
    /// Audio is playing; the user is comparing and picking
    SelectingFrequency,
    /// A guess has been made; showing the result
    FrequencySelected {
        /// Candidate the user picked
        guessed: u32,
        /// Frequency that was actually boosted
        actual: u32,
    },
}

/// Everything the app needs to load one round
#[derive(Debug, Clone)]
pub struct RoundPlan {
    /// Monotonically increasing round token; late results for an old
    /// round are discarded by comparing against the current one.
    pub round: u64,
    /// Sample to fetch for both tracks
    pub sample_url: String,
    /// Boosted frequency (0 = no boost this round)
    pub target_hz: u32,
    /// Effect for the dry track (always inert)
    pub dry: EqEffect,
    /// Effect for the wet track
    pub wet: EqEffect,
}

/// Input events the session reacts to
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// Start button clicked (only valid in `Initial`)
    ClickStart,
    /// Both tracks of a round are armed and ready
    SamplesReady { round: u64 },
    /// Loading a round failed
    LoadFailed { round: u64, error: String },
    /// The user picked a candidate frequency on the chart
    SelectFrequency { hz: u32 },
    /// Continue button clicked after a result
    ClickContinue,
    /// A/B toggle flipped (true = wet/boosted audible)
    ToggleAb { wet_audible: bool },
    /// Space bar: toggles A/B while selecting, continues after a result
    ShortcutKey,
}

/// Side effects the app must execute after handling an event
#[derive(Debug, Clone)]
pub enum SessionCommand {
    /// Fetch, decode, and arm both tracks for this plan
    PrepareRound(RoundPlan),
    /// Publish both track gains
    SetGains { dry: f32, wet: f32 },
    /// Start synchronized playback
    Play,
    /// Stop playback
    StopPlayback,
}

/// The guessing game session
pub struct GuessSession {
    state: InteractionState,
    round: u64,
    target_hz: Option<u32>,
    wet_audible: bool,
    last_error: Option<String>,
    catalog: Vec<String>,
    boost_gain_db: f32,
    boost_q: f32,
    ab_gain: f32,
    rng: StdRng,
}

impl GuessSession {
    pub fn new(config: &TrainerConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Deterministic session for tests
    pub fn with_seed(config: &TrainerConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: &TrainerConfig, rng: StdRng) -> Self {
        Self {
            state: InteractionState::Initial,
            round: 0,
            target_hz: None,
            wet_audible: true,
            last_error: None,
            catalog: config.sample_urls.clone(),
            boost_gain_db: config.boost_gain_db,
            boost_q: config.boost_q,
            ab_gain: config.ab_gain,
            rng,
        }
    }

    pub fn state(&self) -> InteractionState {
        self.state
    }

    /// Token of the round currently loading or playing
    pub fn round(&self) -> u64 {
        self.round
    }

    /// Whether the boosted track is the audible one
    pub fn wet_audible(&self) -> bool {
        self.wet_audible
    }

    /// Error from the most recent failed load, if any
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Handle an event, returning the commands to execute
    pub fn handle(&mut self, event: SessionEvent) -> Vec<SessionCommand> {
        match event {
            SessionEvent::ClickStart => {
                if self.state == InteractionState::Initial {
                    self.start_round()
                } else {
                    Vec::new()
                }
            }

            SessionEvent::SamplesReady { round } => {
                if self.state != InteractionState::LoadingSamples || round != self.round {
                    log::debug!("stale SamplesReady for round {} (current {})", round, self.round);
                    return Vec::new();
                }
                self.state = InteractionState::SelectingFrequency;
                self.wet_audible = true;
                // Round starts with only the boosted track audible, at
                // full gain; the A/B gain applies to later toggles.
                vec![
                    SessionCommand::SetGains { dry: 0.0, wet: 1.0 },
                    SessionCommand::Play,
                ]
            }

            SessionEvent::LoadFailed { round, error } => {
                if self.state != InteractionState::LoadingSamples || round != self.round {
                    return Vec::new();
                }
                log::warn!("round {} failed to load: {}", round, error);
                self.last_error = Some(error);
                self.target_hz = None;
                self.state = InteractionState::Initial;
                Vec::new()
            }

            SessionEvent::SelectFrequency { hz } => {
                if self.state != InteractionState::SelectingFrequency {
                    return Vec::new();
                }
                self.state = InteractionState::FrequencySelected {
                    guessed: hz,
                    actual: self.target_hz.unwrap_or(0),
                };
                vec![SessionCommand::StopPlayback]
            }

            SessionEvent::ClickContinue => {
                if matches!(self.state, InteractionState::FrequencySelected { .. }) {
                    self.start_round()
                } else {
                    Vec::new()
                }
            }

            SessionEvent::ToggleAb { wet_audible } => {
                if self.state != InteractionState::SelectingFrequency {
                    return Vec::new();
                }
                self.wet_audible = wet_audible;
                let (dry, wet) = if wet_audible {
                    (0.0, self.ab_gain)
                } else {
                    (self.ab_gain, 0.0)
                };
                vec![SessionCommand::SetGains { dry, wet }]
            }

            SessionEvent::ShortcutKey => match self.state {
                InteractionState::SelectingFrequency => {
                    let flipped = !self.wet_audible;
                    self.handle(SessionEvent::ToggleAb { wet_audible: flipped })
                }
                InteractionState::FrequencySelected { .. } => self.start_round(),
                _ => Vec::new(),
            },
        }
    }

    fn start_round(&mut self) -> Vec<SessionCommand> {
        if self.catalog.is_empty() {
            log::error!("sample catalog is empty; cannot start a round");
            self.last_error = Some("No samples configured".to_string());
            self.state = InteractionState::Initial;
            return Vec::new();
        }

        self.round += 1;
        self.last_error = None;

        let sample_url = self.catalog[self.rng.gen_range(0..self.catalog.len())].clone();
        let target_hz = CANDIDATE_FREQUENCIES[self.rng.gen_range(0..CANDIDATE_FREQUENCIES.len())];
        self.target_hz = Some(target_hz);
        self.state = InteractionState::LoadingSamples;

        log::info!("round {}: target {} Hz, sample {}", self.round, target_hz, sample_url);

        // A 0 Hz target compiles to a passthrough on the wet track too,
        // which is exactly the no-boost round the candidate list allows.
        let plan = RoundPlan {
            round: self.round,
            sample_url,
            target_hz,
            dry: EqEffect::inert(),
            wet: EqEffect::peaking(target_hz as f32, self.boost_gain_db, self.boost_q),
        };
        vec![SessionCommand::PrepareRound(plan)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> GuessSession {
        GuessSession::with_seed(&TrainerConfig::default(), 7)
    }

    fn take_plan(commands: &[SessionCommand]) -> RoundPlan {
        match commands {
            [SessionCommand::PrepareRound(plan)] => plan.clone(),
            other => panic!("expected a single PrepareRound, got {:?}", other),
        }
    }

    #[test]
    fn test_start_click_plans_a_round() {
        let mut s = session();
        let plan = take_plan(&s.handle(SessionEvent::ClickStart));

        assert_eq!(s.state(), InteractionState::LoadingSamples);
        assert_eq!(plan.round, 1);
        assert!(CANDIDATE_FREQUENCIES.contains(&plan.target_hz));
        assert!(TrainerConfig::default().sample_urls.contains(&plan.sample_url));
        assert!(plan.dry.is_inert());
    }

    #[test]
    fn test_only_start_is_valid_from_initial() {
        let mut s = session();
        assert!(s.handle(SessionEvent::SelectFrequency { hz: 500 }).is_empty());
        assert!(s.handle(SessionEvent::ClickContinue).is_empty());
        assert!(s.handle(SessionEvent::ToggleAb { wet_audible: false }).is_empty());
        assert!(s.handle(SessionEvent::ShortcutKey).is_empty());
        assert_eq!(s.state(), InteractionState::Initial);
    }

    #[test]
    fn test_samples_ready_starts_playback_wet_only() {
        let mut s = session();
        let plan = take_plan(&s.handle(SessionEvent::ClickStart));

        let commands = s.handle(SessionEvent::SamplesReady { round: plan.round });
        assert_eq!(s.state(), InteractionState::SelectingFrequency);
        assert!(s.wet_audible());
        assert!(matches!(
            commands[..],
            [SessionCommand::SetGains { dry, wet }, SessionCommand::Play]
                if dry == 0.0 && wet == 1.0
        ));
    }

    #[test]
    fn test_stale_samples_ready_is_ignored() {
        let mut s = session();
        let plan = take_plan(&s.handle(SessionEvent::ClickStart));

        assert!(s.handle(SessionEvent::SamplesReady { round: plan.round + 1 }).is_empty());
        assert_eq!(s.state(), InteractionState::LoadingSamples);
    }

    #[test]
    fn test_selection_is_ignored_while_loading() {
        let mut s = session();
        s.handle(SessionEvent::ClickStart);
        assert!(s.handle(SessionEvent::SelectFrequency { hz: 2000 }).is_empty());
        assert_eq!(s.state(), InteractionState::LoadingSamples);
    }

    #[test]
    fn test_load_failure_returns_to_initial() {
        let mut s = session();
        let plan = take_plan(&s.handle(SessionEvent::ClickStart));

        let commands = s.handle(SessionEvent::LoadFailed {
            round: plan.round,
            error: "connection refused".to_string(),
        });
        assert!(commands.is_empty());
        assert_eq!(s.state(), InteractionState::Initial);
        assert_eq!(s.last_error(), Some("connection refused"));

        // A fresh start clears the error.
        s.handle(SessionEvent::ClickStart);
        assert_eq!(s.last_error(), None);
    }

    #[test]
    fn test_selecting_stops_playback_and_scores() {
        let mut s = session();
        let plan = take_plan(&s.handle(SessionEvent::ClickStart));
        s.handle(SessionEvent::SamplesReady { round: plan.round });

        let commands = s.handle(SessionEvent::SelectFrequency { hz: 3000 });
        assert!(matches!(commands[..], [SessionCommand::StopPlayback]));
        assert_eq!(
            s.state(),
            InteractionState::FrequencySelected { guessed: 3000, actual: plan.target_hz }
        );
    }

    #[test]
    fn test_ab_toggle_swaps_gains() {
        let mut s = session();
        let plan = take_plan(&s.handle(SessionEvent::ClickStart));
        s.handle(SessionEvent::SamplesReady { round: plan.round });

        let commands = s.handle(SessionEvent::ToggleAb { wet_audible: false });
        assert!(!s.wet_audible());
        assert!(matches!(
            commands[..],
            [SessionCommand::SetGains { dry, wet }] if dry == 0.9 && wet == 0.0
        ));

        let commands = s.handle(SessionEvent::ToggleAb { wet_audible: true });
        assert!(matches!(
            commands[..],
            [SessionCommand::SetGains { dry, wet }] if dry == 0.0 && wet == 0.9
        ));
    }

    #[test]
    fn test_shortcut_toggles_while_selecting() {
        let mut s = session();
        let plan = take_plan(&s.handle(SessionEvent::ClickStart));
        s.handle(SessionEvent::SamplesReady { round: plan.round });
        assert!(s.wet_audible());

        s.handle(SessionEvent::ShortcutKey);
        assert!(!s.wet_audible());
        s.handle(SessionEvent::ShortcutKey);
        assert!(s.wet_audible());
    }

    #[test]
    fn test_continue_and_shortcut_start_next_round() {
        let mut s = session();
        let plan = take_plan(&s.handle(SessionEvent::ClickStart));
        s.handle(SessionEvent::SamplesReady { round: plan.round });
        s.handle(SessionEvent::SelectFrequency { hz: 500 });

        let plan2 = take_plan(&s.handle(SessionEvent::ClickContinue));
        assert_eq!(plan2.round, 2);
        assert_eq!(s.state(), InteractionState::LoadingSamples);

        s.handle(SessionEvent::SamplesReady { round: 2 });
        s.handle(SessionEvent::SelectFrequency { hz: 500 });
        let plan3 = take_plan(&s.handle(SessionEvent::ShortcutKey));
        assert_eq!(plan3.round, 3);
    }

    #[test]
    fn test_late_result_for_abandoned_round_is_discarded() {
        let mut s = session();
        let first = take_plan(&s.handle(SessionEvent::ClickStart));
        s.handle(SessionEvent::LoadFailed { round: first.round, error: "timeout".into() });

        let second = take_plan(&s.handle(SessionEvent::ClickStart));
        assert!(second.round > first.round);

        // The first round's load finally "succeeds" - too late.
        assert!(s.handle(SessionEvent::SamplesReady { round: first.round }).is_empty());
        assert_eq!(s.state(), InteractionState::LoadingSamples);
    }

    #[test]
    fn test_empty_catalog_fails_cleanly() {
        let config = TrainerConfig {
            sample_urls: Vec::new(),
            ..TrainerConfig::default()
        };
        let mut s = GuessSession::with_seed(&config, 1);
        assert!(s.handle(SessionEvent::ClickStart).is_empty());
        assert_eq!(s.state(), InteractionState::Initial);
        assert!(s.last_error().is_some());
    }
}
