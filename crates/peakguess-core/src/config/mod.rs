//! Trainer configuration
//!
//! YAML config in the platform config directory. Missing or broken
//! files silently fall back to defaults so the app always starts.

mod io;

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

pub use io::{load_config, save_config};

/// Audio output preferences
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputSettings {
    /// Output device name; `None` uses the system default
    #[serde(default)]
    pub device: Option<String>,
    /// Buffer size in frames; `None` uses a safe default
    #[serde(default)]
    pub buffer_size: Option<u32>,
    /// Preferred sample rate; `None` targets 48 kHz
    #[serde(default)]
    pub sample_rate: Option<u32>,
}

/// Top-level trainer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainerConfig {
    /// Catalog of sample URLs a round can pick from
    pub sample_urls: Vec<String>,
    /// Wet-track boost in dB
    pub boost_gain_db: f32,
    /// Wet-track filter Q
    pub boost_q: f32,
    /// Gain used for A/B toggling after the round has started
    pub ab_gain: f32,
    /// Audio output preferences
    pub output: OutputSettings,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            sample_urls: default_sample_catalog(),
            boost_gain_db: 10.0,
            boost_q: 0.9,
            ab_gain: 0.9,
            output: OutputSettings::default(),
        }
    }
}

/// Default config file location (e.g. ~/.config/peakguess/config.yaml)
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("peakguess")
        .join("config.yaml")
}

/// Stock sample catalog: short loopable music excerpts with broadband
/// content, hosted as plain WAVs.
fn default_sample_catalog() -> Vec<String> {
    [
        "https://saemple.storage.googleapis.com/samples/710542751189738547/028389564039802015.wav",
        "https://saemple.storage.googleapis.com/samples/456197260834025431/588304601958060462.wav",
        "https://saemple.storage.googleapis.com/samples/364658335828877324/884338350415985227.wav",
        "https://saemple.storage.googleapis.com/samples/236009982688876348/488799548479455593.wav",
        "https://saemple.storage.googleapis.com/samples/2839775813052493327/1764557945516372387.wav",
        "https://saemple.storage.googleapis.com/samples/612767769831785512/928590085350151463.wav",
        "https://saemple.storage.googleapis.com/samples/612767769831785512/086081468412168300.wav",
        "https://saemple.storage.googleapis.com/samples/263335366049086998/190397988066996402.wav",
        "https://saemple.storage.googleapis.com/samples/263335366049086998/566407676913142410.wav",
        "https://saemple.storage.googleapis.com/samples/719929847000902526/730623583282046784.wav",
        "https://saemple.storage.googleapis.com/samples/719929847000902526/899176951140820102.wav",
        "https://saemple.storage.googleapis.com/samples/799158622811995158/368535194317543561.wav",
        "https://saemple.storage.googleapis.com/samples/799158622811995158/630617968201966402.wav",
        "https://saemple.storage.googleapis.com/samples/799158622811995158/993487251695383202.wav",
        "https://saemple.storage.googleapis.com/samples/799158622811995158/084871179120338707.wav",
        "https://saemple.storage.googleapis.com/samples/478066222647321484/249584092551980229.wav",
        "https://saemple.storage.googleapis.com/samples/478066222647321484/925765934229899042.wav",
        "https://saemple.storage.googleapis.com/samples/478066222647321484/061537930000358873.wav",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}
