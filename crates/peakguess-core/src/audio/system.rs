//! CPAL output stream and audio system bootstrap
//!
//! ```text
//! ┌──────────────────┐                     ┌─────────────────────┐
//! │     UI Thread    │───push()───────────►│   Command Queue     │
//! │   (Player)       │                     │  (lock-free SPSC)   │
//! └──────────────────┘                     └──────────┬──────────┘
//!         │                                           │
//!         │ Relaxed atomics (gains)                   │ pop()
//!         ▼                                           ▼
//! ┌──────────────────┐                     ┌─────────────────────┐
//! │  PlayerAtomics   │◄────────────────────│  CPAL Audio Thread  │
//! │   (lock-free)    │     playing flag    │  (owns PlayerGraph) │
//! └──────────────────┘                     └─────────────────────┘
//! ```
//!
//! A single output stream, so the callback state (graph + consumer +
//! scratch buffer) is moved directly into the closure; no mutex anywhere
//! on the audio path.

use std::sync::Arc;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{BufferSize as CpalBufferSize, SampleFormat, Stream, StreamConfig};

use super::error::{AudioError, AudioResult};
use crate::config::OutputSettings;
use crate::engine::{command_channel, CommandSender, Player, PlayerAtomics, PlayerGraph};
use crate::types::{StereoBuffer, DEFAULT_SAMPLE_RATE};

/// Default buffer size in frames when the config doesn't pin one
pub const DEFAULT_BUFFER_SIZE: u32 = 1024;

/// Largest block the callback scratch buffer is pre-allocated for
pub const MAX_BUFFER_SIZE: usize = 8192;

/// A running audio system
///
/// Keeps the output stream alive and owns the UI-side [`Player`] handle.
/// Dropping this stops audio.
pub struct AudioSystem {
    _stream: Stream,
    player: Player,
    sample_rate: u32,
    buffer_size: u32,
}

impl AudioSystem {
    /// Start the output stream and build the player.
    ///
    /// Must be called from a user gesture context on platforms that gate
    /// audio output behind one; the app creates the system lazily on the
    /// first Start click for exactly that reason.
    pub fn start(settings: &OutputSettings) -> AudioResult<Self> {
        let device = match &settings.device {
            Some(name) => find_device_by_name(name)?,
            None => default_output_device()?,
        };

        let device_name = device.name().unwrap_or_else(|_| "Unknown".to_string());
        log::info!("Using audio device: {}", device_name);

        let (supported_config, buffer_size) = get_output_config(&device, settings)?;
        let sample_rate = supported_config.sample_rate().0;

        let stream_config = StreamConfig {
            channels: supported_config.channels(),
            sample_rate: supported_config.sample_rate(),
            buffer_size: CpalBufferSize::Fixed(buffer_size),
        };

        log::info!(
            "Audio config: {} channels, {}Hz, {} frames (~{:.1}ms latency)",
            stream_config.channels,
            sample_rate,
            buffer_size,
            (buffer_size as f32 / sample_rate as f32) * 1000.0
        );

        let atomics = Arc::new(PlayerAtomics::new());
        let (command_tx, command_rx) = command_channel();
        let graph = PlayerGraph::new(atomics.clone());

        let stream = build_output_stream(&device, &stream_config, graph, command_rx)?;
        stream
            .play()
            .map_err(|e| AudioError::StreamPlayError(e.to_string()))?;

        log::info!("Audio stream started");

        Ok(Self {
            _stream: stream,
            player: Player::new(CommandSender::new(command_tx), atomics, sample_rate),
            sample_rate,
            buffer_size,
        })
    }

    /// The UI-side player handle
    pub fn player(&mut self) -> &mut Player {
        &mut self.player
    }

    /// Sample rate of the running stream
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Output latency in milliseconds (one-way)
    pub fn latency_ms(&self) -> f32 {
        (self.buffer_size as f32 / self.sample_rate as f32) * 1000.0
    }
}

fn default_output_device() -> AudioResult<cpal::Device> {
    cpal::default_host()
        .default_output_device()
        .ok_or_else(|| AudioError::NoDefaultDevice("No default output device".to_string()))
}

/// Find a device by name across all available hosts
fn find_device_by_name(name: &str) -> AudioResult<cpal::Device> {
    for host_id in cpal::available_hosts() {
        if let Ok(host) = cpal::host_from_id(host_id) {
            if let Ok(mut devices) = host.output_devices() {
                if let Some(device) =
                    devices.find(|d: &cpal::Device| d.name().ok().as_deref() == Some(name))
                {
                    return Ok(device);
                }
            }
        }
    }
    Err(AudioError::DeviceNotFound(name.to_string()))
}

/// Get the best output configuration for a device
///
/// Returns (SupportedStreamConfig, actual_buffer_size_in_frames)
fn get_output_config(
    device: &cpal::Device,
    settings: &OutputSettings,
) -> AudioResult<(cpal::SupportedStreamConfig, u32)> {
    let supported_configs: Vec<_> = device
        .supported_output_configs()
        .map_err(|e| AudioError::ConfigError(e.to_string()))?
        .collect();

    if supported_configs.is_empty() {
        return Err(AudioError::ConfigError(
            "No supported output configurations".to_string(),
        ));
    }

    // Prefer f32 stereo at the requested rate; default to 48kHz so most
    // sample material needs no resampling.
    let target_sample_rate = settings.sample_rate.unwrap_or(DEFAULT_SAMPLE_RATE);

    let best_config = supported_configs
        .iter()
        .filter(|c| c.sample_format() == SampleFormat::F32)
        .filter(|c| c.channels() >= 2)
        .find(|c| {
            target_sample_rate >= c.min_sample_rate().0
                && target_sample_rate <= c.max_sample_rate().0
        })
        .or_else(|| supported_configs.iter().find(|c| c.channels() >= 2))
        .or_else(|| supported_configs.first())
        .ok_or_else(|| {
            AudioError::ConfigError("No suitable output configuration found".to_string())
        })?;

    let sample_rate = if target_sample_rate >= best_config.min_sample_rate().0
        && target_sample_rate <= best_config.max_sample_rate().0
    {
        cpal::SampleRate(target_sample_rate)
    } else {
        let fallback = best_config.max_sample_rate();
        log::warn!(
            "Audio device doesn't support {}Hz, falling back to {}Hz (samples will be resampled)",
            target_sample_rate,
            fallback.0
        );
        fallback
    };

    let stream_config = best_config.clone().with_sample_rate(sample_rate);

    let buffer_size = settings
        .buffer_size
        .map(|frames| frames.clamp(64, MAX_BUFFER_SIZE as u32))
        .unwrap_or(DEFAULT_BUFFER_SIZE);

    Ok((stream_config, buffer_size))
}

/// Build the output stream; the callback takes ownership of the graph
fn build_output_stream(
    device: &cpal::Device,
    config: &StreamConfig,
    mut graph: PlayerGraph,
    mut command_rx: rtrb::Consumer<crate::engine::PlayerCommand>,
) -> AudioResult<Stream> {
    let channels = config.channels as usize;
    let mut block = StereoBuffer::silence(MAX_BUFFER_SIZE);

    let stream = device
        .build_output_stream(
            config,
            move |data: &mut [f32], _info: &cpal::OutputCallbackInfo| {
                let n_frames = (data.len() / channels).min(MAX_BUFFER_SIZE);

                // Set working buffer length (RT-safe: no allocation)
                block.set_len_from_capacity(n_frames);

                // Apply pending commands, then render
                graph.process_commands(&mut command_rx);
                graph.process(&mut block);

                // Interleave into the device buffer. Stereo devices get the
                // zero-copy [L, R, L, R, ...] view; anything else goes
                // through the per-frame loop with extra channels zeroed.
                if channels == 2 {
                    let interleaved = block.as_interleaved();
                    let n = interleaved.len().min(data.len());
                    data[..n].copy_from_slice(&interleaved[..n]);
                    for ch in data[n..].iter_mut() {
                        *ch = 0.0;
                    }
                } else {
                    let samples = block.as_slice();
                    for (i, frame) in data.chunks_mut(channels).enumerate() {
                        if i < samples.len() {
                            let sample = samples[i];
                            frame[0] = sample.left;
                            if channels > 1 {
                                frame[1] = sample.right;
                            }
                            for ch in frame.iter_mut().skip(2) {
                                *ch = 0.0;
                            }
                        } else {
                            for ch in frame.iter_mut() {
                                *ch = 0.0;
                            }
                        }
                    }
                }
            },
            move |err| {
                log::error!("Audio stream error: {}", err);
            },
            None, // No timeout (blocking)
        )
        .map_err(|e| AudioError::StreamBuildError(e.to_string()))?;

    Ok(stream)
}
