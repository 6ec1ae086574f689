//! Per-track EQ effects
//!
//! An [`EqEffect`] is a declarative description of the filtering a track
//! should apply. It is built on the UI side and compiled down to biquad
//! coefficients when a source is armed, so the audio thread never computes
//! transcendentals.

mod biquad;

pub use biquad::{BiquadCoeffs, BiquadState};

/// EQ effect applied to a track's source material
///
/// Currently a single peaking filter; a sum type so further curves
/// (shelves, notches) slot in without changing the engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EqEffect {
    /// Single peaking band (RBJ cookbook)
    Peaking {
        /// Center frequency in Hz
        frequency_hz: f32,
        /// Boost/cut in dB
        gain_db: f32,
        /// Filter quality factor
        q: f32,
    },
}

impl EqEffect {
    /// Create a peaking boost/cut
    pub fn peaking(frequency_hz: f32, gain_db: f32, q: f32) -> Self {
        Self::Peaking { frequency_hz, gain_db, q }
    }

    /// The inert effect: a peaking band at 0 Hz with 0 dB gain.
    ///
    /// Used on the dry track so both tracks run identical signal paths.
    pub fn inert() -> Self {
        Self::Peaking { frequency_hz: 0.0, gain_db: 0.0, q: 1.0 }
    }

    /// Whether this effect leaves the signal untouched
    pub fn is_inert(&self) -> bool {
        match self {
            Self::Peaking { frequency_hz, gain_db, .. } => {
                *frequency_hz <= 0.0 || *gain_db == 0.0
            }
        }
    }

    /// Compile to biquad coefficients at the given sample rate
    ///
    /// Inert effects compile to an exact passthrough rather than a
    /// degenerate filter at 0 Hz.
    pub fn coefficients(&self, sample_rate: u32) -> BiquadCoeffs {
        if self.is_inert() {
            return BiquadCoeffs::passthrough();
        }
        match self {
            Self::Peaking { frequency_hz, gain_db, q } => {
                BiquadCoeffs::peaking(*frequency_hz, *gain_db, *q, sample_rate as f32)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inert_effect() {
        assert!(EqEffect::inert().is_inert());
        assert!(EqEffect::peaking(0.0, 10.0, 0.9).is_inert());
        assert!(EqEffect::peaking(1000.0, 0.0, 0.9).is_inert());
        assert!(!EqEffect::peaking(1000.0, 10.0, 0.9).is_inert());
    }

    #[test]
    fn test_inert_compiles_to_passthrough() {
        let coeffs = EqEffect::inert().coefficients(48000);
        let mut state = BiquadState::default();
        let (l, r) = state.process(0.5, -0.25, &coeffs);
        assert_eq!(l, 0.5);
        assert_eq!(r, -0.25);
    }
}
