//! Stereo biquad filter (RBJ cookbook coefficients)

/// Biquad filter state (direct form I, independent per channel)
#[derive(Debug, Clone, Default)]
pub struct BiquadState {
    x1_l: f32, x2_l: f32, y1_l: f32, y2_l: f32,
    x1_r: f32, x2_r: f32, y1_r: f32, y2_r: f32,
}

impl BiquadState {
    /// Process one stereo frame through the filter
    #[inline]
    pub fn process(&mut self, input_l: f32, input_r: f32, coeffs: &BiquadCoeffs) -> (f32, f32) {
        // Left channel
        let out_l = coeffs.b0 * input_l + coeffs.b1 * self.x1_l + coeffs.b2 * self.x2_l
                  - coeffs.a1 * self.y1_l - coeffs.a2 * self.y2_l;
        self.x2_l = self.x1_l;
        self.x1_l = input_l;
        self.y2_l = self.y1_l;
        self.y1_l = out_l;

        // Right channel
        let out_r = coeffs.b0 * input_r + coeffs.b1 * self.x1_r + coeffs.b2 * self.x2_r
                  - coeffs.a1 * self.y1_r - coeffs.a2 * self.y2_r;
        self.x2_r = self.x1_r;
        self.x1_r = input_r;
        self.y2_r = self.y1_r;
        self.y1_r = out_r;

        (out_l, out_r)
    }

    /// Clear the filter history (call before starting a new source)
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Biquad filter coefficients
#[derive(Debug, Clone)]
pub struct BiquadCoeffs {
    b0: f32, b1: f32, b2: f32,
    a1: f32, a2: f32,
}

impl BiquadCoeffs {
    /// Create peaking EQ filter coefficients
    pub fn peaking(freq: f32, gain_db: f32, q: f32, sample_rate: f32) -> Self {
        let a = 10.0_f32.powf(gain_db / 40.0);
        let w0 = 2.0 * std::f32::consts::PI * freq / sample_rate;
        let cos_w0 = w0.cos();
        let sin_w0 = w0.sin();
        let alpha = sin_w0 / (2.0 * q);

        let a0 = 1.0 + alpha / a;
        Self {
            b0: (1.0 + alpha * a) / a0,
            b1: (-2.0 * cos_w0) / a0,
            b2: (1.0 - alpha * a) / a0,
            a1: (-2.0 * cos_w0) / a0,
            a2: (1.0 - alpha / a) / a0,
        }
    }

    /// Passthrough (unity gain, no filtering)
    pub fn passthrough() -> Self {
        Self { b0: 1.0, b1: 0.0, b2: 0.0, a1: 0.0, a2: 0.0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rms(samples: &[f32]) -> f32 {
        (samples.iter().map(|s| s * s).sum::<f32>() / samples.len() as f32).sqrt()
    }

    fn sine(freq: f32, sample_rate: f32, len: usize) -> Vec<f32> {
        (0..len)
            .map(|i| (2.0 * std::f32::consts::PI * freq * i as f32 / sample_rate).sin())
            .collect()
    }

    #[test]
    fn test_passthrough_is_identity() {
        let coeffs = BiquadCoeffs::passthrough();
        let mut state = BiquadState::default();

        let input = sine(440.0, 48000.0, 512);
        for &x in &input {
            let (l, r) = state.process(x, x, &coeffs);
            assert!((l - x).abs() < 1e-6);
            assert!((r - x).abs() < 1e-6);
        }
    }

    #[test]
    fn test_peaking_boosts_center_frequency() {
        let sample_rate = 48000.0;
        let coeffs = BiquadCoeffs::peaking(1000.0, 10.0, 0.9, sample_rate);
        let mut state = BiquadState::default();

        let input = sine(1000.0, sample_rate, 9600);
        let output: Vec<f32> = input
            .iter()
            .map(|&x| state.process(x, x, &coeffs).0)
            .collect();

        // +10 dB at the center frequency is roughly a 3.16x amplitude boost.
        // Skip the first cycle-ish of warmup before measuring.
        let ratio = rms(&output[960..]) / rms(&input[960..]);
        assert!(ratio > 2.5, "expected ~3.16x boost at center, got {}", ratio);
        assert!(ratio < 4.0, "expected ~3.16x boost at center, got {}", ratio);
    }

    #[test]
    fn test_peaking_leaves_distant_frequencies_alone() {
        let sample_rate = 48000.0;
        let coeffs = BiquadCoeffs::peaking(8000.0, 10.0, 0.9, sample_rate);
        let mut state = BiquadState::default();

        // 100 Hz is far outside the boosted band around 8 kHz.
        let input = sine(100.0, sample_rate, 19200);
        let output: Vec<f32> = input
            .iter()
            .map(|&x| state.process(x, x, &coeffs).0)
            .collect();

        let ratio = rms(&output[960..]) / rms(&input[960..]);
        assert!((ratio - 1.0).abs() < 0.1, "expected ~unity far from center, got {}", ratio);
    }

    #[test]
    fn test_reset_clears_history() {
        let coeffs = BiquadCoeffs::peaking(1000.0, 10.0, 0.9, 48000.0);
        let mut state = BiquadState::default();

        for i in 0..64 {
            state.process(i as f32 * 0.01, 0.0, &coeffs);
        }
        state.reset();

        // After reset, silence in produces silence out.
        let (l, r) = state.process(0.0, 0.0, &coeffs);
        assert_eq!(l, 0.0);
        assert_eq!(r, 0.0);
    }
}
