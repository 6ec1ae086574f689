//! Logarithmic frequency scale, candidate snapping, and scoring
//!
//! Pure math shared by the chart widget and the game session. The scale
//! maps frequencies onto a pixel axis the way a log-scaled spectrum
//! analyzer does; guesses snap to a fixed candidate grid and are scored
//! by log-distance from the answer.

/// Frequencies a round can boost, and the grid guesses snap to.
///
/// 0 Hz is a valid *target* (a no-boost round) but is unreachable as a
/// guess: it has no position on the log axis.
pub const CANDIDATE_FREQUENCIES: [u32; 37] = [
    0, 20, 50, 100, 200, 300, 400, 500, 600, 700, 800, 900, 1000, 1500, 2000,
    2500, 3000, 3500, 4000, 4500, 5000, 5500, 6000, 6500, 7000, 7500, 8000,
    8500, 9000, 9500, 10000, 11000, 12000, 13000, 14000, 15000, 16000,
];

/// Axis tick positions for grid lines and labels
pub const TICK_FREQUENCIES: [u32; 10] =
    [20, 50, 100, 200, 500, 1000, 2000, 5000, 10000, 20000];

/// Lower edge of the visible axis in Hz
pub const SCALE_MIN_HZ: f32 = 10.0;

/// Upper edge of the visible axis in Hz
pub const SCALE_MAX_HZ: f32 = 25000.0;

/// Log-scale mapping between frequency and horizontal pixel position
#[derive(Debug, Clone, Copy)]
pub struct FrequencyScale {
    width: f32,
    ln_min: f32,
    ln_max: f32,
}

impl FrequencyScale {
    /// Build a scale spanning [`SCALE_MIN_HZ`, `SCALE_MAX_HZ`] over `width_px`
    pub fn new(width_px: f32) -> Self {
        Self {
            width: width_px,
            ln_min: SCALE_MIN_HZ.ln(),
            ln_max: SCALE_MAX_HZ.ln(),
        }
    }

    /// Width of the axis in pixels
    pub fn width(&self) -> f32 {
        self.width
    }

    /// Pixel position of a frequency.
    ///
    /// Frequencies outside the domain extrapolate (negative or > width);
    /// non-positive frequencies have no logarithm and return `None`.
    pub fn position(&self, frequency_hz: f32) -> Option<f32> {
        if frequency_hz <= 0.0 {
            return None;
        }
        let t = (frequency_hz.ln() - self.ln_min) / (self.ln_max - self.ln_min);
        Some(self.width * t)
    }

    /// The candidate frequency closest to pixel `x`.
    ///
    /// Total and deterministic: every finite `x` maps to some positive
    /// candidate, and ties keep the lower frequency (first in the list).
    pub fn nearest_candidate(&self, x: f32) -> u32 {
        let mut best = 20u32;
        let mut best_distance = f32::INFINITY;
        for &candidate in &CANDIDATE_FREQUENCIES {
            let Some(pos) = self.position(candidate as f32) else {
                continue;
            };
            let distance = (x - pos).abs();
            if distance < best_distance {
                best_distance = distance;
                best = candidate;
            }
        }
        best
    }
}

/// Half-width of the hover confidence band, in Hz.
///
/// Coarse step function: the band widens with frequency, mirroring how
/// much harder precise identification gets toward the top of the range.
pub const fn confidence_interval_hz(frequency_hz: u32) -> u32 {
    if frequency_hz < 1000 {
        200
    } else if frequency_hz < 2000 {
        500
    } else if frequency_hz < 5000 {
        1000
    } else if frequency_hz < 10000 {
        2000
    } else if frequency_hz < 20000 {
        5000
    } else {
        500
    }
}

/// Score a guess against the boosted frequency.
///
/// `100 - |ln(guessed) - ln(actual)| / ln(actual) * 100`, rounded. The
/// score is 100 for an exact hit, falls off with log-distance, and can
/// go negative for wild misses. Degenerate inputs are guarded instead of
/// feeding the logarithm:
/// - `actual == 0` (no-boost round) scores 100 only on an exact 0 guess
/// - `actual == 1` or `guessed == 0` score 0
pub fn accuracy(guessed_hz: u32, actual_hz: u32) -> i32 {
    if actual_hz == 0 {
        return if guessed_hz == 0 { 100 } else { 0 };
    }
    if actual_hz == 1 || guessed_hz == 0 {
        return 0;
    }

    let guessed_ln = (guessed_hz as f64).ln();
    let actual_ln = (actual_hz as f64).ln();
    let error_rate = (guessed_ln - actual_ln).abs() / actual_ln * 100.0;
    (100.0 - error_rate).round() as i32
}
