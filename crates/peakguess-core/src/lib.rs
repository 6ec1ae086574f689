//! Peakguess core library
//!
//! Audio engine and game logic for the Peakguess ear trainer: a
//! dual-track player that loops the same sample through a dry path and
//! a peaking-boosted wet path, plus the guessing-game state machine and
//! the log-frequency scoring math.
//!
//! The engine follows a strict lock-free split: the UI thread talks to
//! the audio thread only through an SPSC command queue and relaxed
//! atomics, and the audio callback owns all playback state exclusively.

pub mod audio;
pub mod config;
pub mod effect;
pub mod engine;
pub mod game;
pub mod sample;
pub mod scale;
pub mod types;

pub use audio::{AudioError, AudioSystem};
pub use engine::Player;
pub use game::{GuessSession, InteractionState, RoundPlan, SessionCommand, SessionEvent};
pub use sample::{DecodedAudio, PrepareError};
pub use types::{Sample, StereoBuffer, StereoSample, TrackId, DEFAULT_SAMPLE_RATE};
