//! UI widgets for the Peakguess ear trainer
//!
//! Following idiomatic iced patterns:
//!
//! - **State structs**: Pure data owned by the app ([`peakguess_core::InteractionState`])
//! - **Canvas Programs**: Handle custom rendering and event-to-callback translation
//! - **Callback closures**: Widgets translate raw events into app messages

pub mod button_styles;
pub mod chart;
pub mod toggle;

pub use chart::FrequencyChart;
pub use toggle::ab_toggle;

/// Format a frequency for axis labels and result text.
///
/// Kilohertz values collapse to a "k" suffix: 2000 → "2k", 1500 → "1.5k".
pub fn format_frequency(frequency_hz: u32) -> String {
    if frequency_hz >= 1000 {
        let k = frequency_hz as f64 / 1000.0;
        if k.fract() == 0.0 {
            format!("{}k", k as u64)
        } else {
            format!("{}k", k)
        }
    } else {
        frequency_hz.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_frequency() {
        assert_eq!(format_frequency(0), "0");
        assert_eq!(format_frequency(20), "20");
        assert_eq!(format_frequency(500), "500");
        assert_eq!(format_frequency(1000), "1k");
        assert_eq!(format_frequency(1500), "1.5k");
        assert_eq!(format_frequency(2000), "2k");
        assert_eq!(format_frequency(16000), "16k");
    }
}
