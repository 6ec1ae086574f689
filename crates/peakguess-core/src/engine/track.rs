//! Track lanes and armed sources
//!
//! A [`TrackLane`] is one playback slot in the graph. Arming installs a
//! decoded buffer plus compiled filter; starting begins looped playback
//! from position zero. A source starts at most once in its lifetime, so
//! the two lanes can never drift out of phase.

use std::sync::Arc;

use crate::effect::{BiquadCoeffs, BiquadState, EqEffect};
use crate::types::{StereoBuffer, StereoSample, TrackId};

/// A decoded source armed for playback
///
/// Holds the shared sample data, the compiled filter for this track, and
/// the playback cursor. Both lanes of a round typically hold `Arc` clones
/// of the same buffer and differ only in their filters.
#[derive(Debug)]
pub struct ArmedSource {
    buffer: Arc<StereoBuffer>,
    coeffs: BiquadCoeffs,
    filter: BiquadState,
    position: usize,
    started: bool,
}

impl ArmedSource {
    /// Build a source from decoded audio and an effect description.
    ///
    /// Coefficients are compiled here, on the UI side, so the audio
    /// thread never computes them.
    pub fn new(buffer: Arc<StereoBuffer>, effect: &EqEffect, sample_rate: u32) -> Self {
        Self {
            buffer,
            coeffs: effect.coefficients(sample_rate),
            filter: BiquadState::default(),
            position: 0,
            started: false,
        }
    }

    /// Whether playback has been started on this source
    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Length of the underlying sample in frames
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    fn start(&mut self) {
        self.started = true;
        self.position = 0;
        self.filter.reset();
    }

    /// Render the next block, adding into `out` through `gain`.
    ///
    /// The source loops via a modulo cursor. The filter always runs, even
    /// at zero gain, so toggling a track back in doesn't produce a
    /// transient from stale filter state.
    fn mix_into(&mut self, out: &mut [StereoSample], gain: f32) {
        if self.buffer.is_empty() {
            return;
        }
        let len = self.buffer.len();
        for frame in out.iter_mut() {
            let src = self.buffer[self.position];
            let (l, r) = self.filter.process(src.left, src.right, &self.coeffs);
            *frame += StereoSample::new(l, r) * gain;
            self.position = (self.position + 1) % len;
        }
    }
}

/// One playback slot in the player graph
pub struct TrackLane {
    id: TrackId,
    source: Option<ArmedSource>,
}

impl TrackLane {
    pub fn new(id: TrackId) -> Self {
        Self { id, source: None }
    }

    pub fn id(&self) -> TrackId {
        self.id
    }

    /// Install a new source, replacing whatever was there
    pub fn arm(&mut self, source: ArmedSource) {
        self.source = Some(source);
    }

    /// Whether this lane holds a source that has not yet been started
    pub fn has_armed(&self) -> bool {
        self.source.as_ref().is_some_and(|s| !s.is_started())
    }

    /// Whether this lane's source is currently playing
    pub fn is_started(&self) -> bool {
        self.source.as_ref().is_some_and(|s| s.is_started())
    }

    /// Start the armed source from position zero
    pub fn start(&mut self) {
        if let Some(source) = self.source.as_mut() {
            source.start();
        }
    }

    /// Drop the source (used sources are never restarted)
    pub fn stop(&mut self) {
        self.source = None;
    }

    /// Mix this lane's output into the block if it is playing
    pub fn process(&mut self, out: &mut [StereoSample], gain: f32) {
        if let Some(source) = self.source.as_mut() {
            if source.is_started() {
                source.mix_into(out, gain);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp_source(len: usize, effect: EqEffect) -> ArmedSource {
        let mut buffer = StereoBuffer::with_capacity(len);
        for i in 0..len {
            buffer.push(StereoSample::mono(i as f32));
        }
        ArmedSource::new(Arc::new(buffer), &effect, 48000)
    }

    #[test]
    fn test_lane_lifecycle() {
        let mut lane = TrackLane::new(TrackId::Dry);
        assert!(!lane.has_armed());
        assert!(!lane.is_started());

        lane.arm(ramp_source(8, EqEffect::inert()));
        assert!(lane.has_armed());

        lane.start();
        assert!(!lane.has_armed());
        assert!(lane.is_started());

        lane.stop();
        assert!(!lane.has_armed());
        assert!(!lane.is_started());
    }

    #[test]
    fn test_unstarted_source_is_silent() {
        let mut lane = TrackLane::new(TrackId::Wet);
        lane.arm(ramp_source(8, EqEffect::inert()));

        let mut out = vec![StereoSample::silence(); 4];
        lane.process(&mut out, 1.0);
        assert!(out.iter().all(|s| s.peak() == 0.0));
    }

    #[test]
    fn test_playback_loops_with_modulo_cursor() {
        let mut lane = TrackLane::new(TrackId::Dry);
        lane.arm(ramp_source(4, EqEffect::inert()));
        lane.start();

        let mut out = vec![StereoSample::silence(); 6];
        lane.process(&mut out, 1.0);

        // 0 1 2 3 then wrap to 0 1
        let expected = [0.0, 1.0, 2.0, 3.0, 0.0, 1.0];
        for (frame, want) in out.iter().zip(expected) {
            assert_eq!(frame.left, want);
        }
    }

    #[test]
    fn test_gain_scales_output() {
        let mut lane = TrackLane::new(TrackId::Dry);
        lane.arm(ramp_source(4, EqEffect::inert()));
        lane.start();

        let mut out = vec![StereoSample::silence(); 2];
        lane.process(&mut out, 0.5);
        assert_eq!(out[1].left, 0.5);
    }

    #[test]
    fn test_zero_gain_still_advances_cursor() {
        let mut lane = TrackLane::new(TrackId::Dry);
        lane.arm(ramp_source(8, EqEffect::inert()));
        lane.start();

        let mut out = vec![StereoSample::silence(); 3];
        lane.process(&mut out, 0.0);
        assert!(out.iter().all(|s| s.peak() == 0.0));

        // The cursor kept moving, so the next block picks up at frame 3.
        let mut out = vec![StereoSample::silence(); 1];
        lane.process(&mut out, 1.0);
        assert_eq!(out[0].left, 3.0);
    }
}
