//! UI-side player handle
//!
//! Wraps the command sender and shared atomics into the API the
//! application talks to: prepare a track, start/stop the pair, set gains.

use std::sync::Arc;

use super::atomics::PlayerAtomics;
use super::command::{CommandSender, PlayerCommand};
use super::track::ArmedSource;
use crate::audio::AudioError;
use crate::effect::EqEffect;
use crate::types::{StereoBuffer, TrackId};

/// Handle for controlling the player from the UI thread
pub struct Player {
    sender: CommandSender,
    atomics: Arc<PlayerAtomics>,
    sample_rate: u32,
}

impl Player {
    pub(crate) fn new(sender: CommandSender, atomics: Arc<PlayerAtomics>, sample_rate: u32) -> Self {
        Self { sender, atomics, sample_rate }
    }

    /// The engine's output sample rate
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Arm a track with decoded audio and an effect.
    ///
    /// The source is armed but not started; starting happens for both
    /// tracks at once via [`Player::play`]. The buffer is taken by `Arc`
    /// so both lanes of a round can share one allocation.
    pub fn prepare(
        &mut self,
        track: TrackId,
        buffer: Arc<StereoBuffer>,
        effect: &EqEffect,
    ) -> Result<(), AudioError> {
        let source = Box::new(ArmedSource::new(buffer, effect, self.sample_rate));
        self.sender
            .send(PlayerCommand::Arm { track, source })
            .map_err(|_| AudioError::CommandQueueFull)
    }

    /// Start synchronized playback of both tracks
    pub fn play(&mut self) {
        if self.sender.send(PlayerCommand::Play).is_err() {
            log::warn!("play dropped: command queue full");
        }
    }

    /// Stop playback and discard the armed sources
    pub fn stop(&mut self) {
        if self.sender.send(PlayerCommand::Stop).is_err() {
            log::warn!("stop dropped: command queue full");
        }
    }

    /// Set a track's gain (takes effect within one audio block)
    ///
    /// The value is stored verbatim; no clamping.
    pub fn set_track_gain(&self, track: TrackId, gain: f32) {
        self.atomics.set_gain(track, gain);
    }

    /// Read back a track's gain exactly as last set
    pub fn track_gain(&self, track: TrackId) -> f32 {
        self.atomics.gain(track)
    }

    /// Whether the graph is currently playing
    pub fn is_playing(&self) -> bool {
        self.atomics.is_playing()
    }

    /// Whether a single track's source is currently playing
    ///
    /// Mirrors the lane state from the audio thread; with the
    /// both-or-neither start this only ever differs from
    /// [`Player::is_playing`] transiently.
    pub fn is_track_playing(&self, track: TrackId) -> bool {
        self.atomics.is_track_playing(track)
    }
}
