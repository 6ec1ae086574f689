//! Lock-free shared state between UI and audio threads
//!
//! Gains flow UI → audio, playback flags flow audio → UI. All accesses
//! are relaxed single-value loads/stores; there is no read-modify-write
//! anywhere, so relaxed ordering is sufficient.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use crate::types::{TrackId, NUM_TRACKS};

/// Shared player state
///
/// Track gains are stored as f32 bit patterns in `AtomicU32`. The UI
/// writes a gain with a single store; the audio thread reads it once per
/// block. Values are stored verbatim, without clamping or normalization.
pub struct PlayerAtomics {
    /// Per-track gain (f32 bits), written by the UI thread
    gains: [AtomicU32; NUM_TRACKS],
    /// Per-track playing mirror, written by the audio thread
    track_playing: [AtomicBool; NUM_TRACKS],
    /// Whether the graph is currently playing, written by the audio thread
    playing: AtomicBool,
}

impl PlayerAtomics {
    pub fn new() -> Self {
        Self {
            gains: [
                AtomicU32::new(1.0_f32.to_bits()),
                AtomicU32::new(1.0_f32.to_bits()),
            ],
            track_playing: [AtomicBool::new(false), AtomicBool::new(false)],
            playing: AtomicBool::new(false),
        }
    }

    /// Get the current gain for a track
    pub fn gain(&self, track: TrackId) -> f32 {
        f32::from_bits(self.gains[track.index()].load(Ordering::Relaxed))
    }

    /// Set the gain for a track (stored exactly as given)
    pub fn set_gain(&self, track: TrackId, gain: f32) {
        self.gains[track.index()].store(gain.to_bits(), Ordering::Relaxed);
    }

    /// Check if the player is currently playing
    pub fn is_playing(&self) -> bool {
        self.playing.load(Ordering::Relaxed)
    }

    /// Check if a single track's source is currently playing
    pub fn is_track_playing(&self, track: TrackId) -> bool {
        self.track_playing[track.index()].load(Ordering::Relaxed)
    }

    /// Update the playing flag (audio thread only)
    pub(crate) fn set_playing(&self, playing: bool) {
        self.playing.store(playing, Ordering::Relaxed);
    }

    /// Update one track's playing mirror (audio thread only)
    pub(crate) fn set_track_playing(&self, track: TrackId, playing: bool) {
        self.track_playing[track.index()].store(playing, Ordering::Relaxed);
    }
}

impl Default for PlayerAtomics {
    fn default() -> Self {
        Self::new()
    }
}
