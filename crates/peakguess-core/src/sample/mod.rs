//! Sample acquisition and decoding
//!
//! Fetches sample bytes over HTTP (blocking, via ureq), decodes them
//! in-memory with Symphonia, fans mono out to stereo, and resamples to
//! the engine rate with rubato. Everything here is blocking by design;
//! the app runs it on a blocking task.

use std::io::Read;

use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use thiserror::Error;

use crate::types::StereoBuffer;

/// Errors in the fetch→decode pipeline
#[derive(Error, Debug)]
pub enum PrepareError {
    /// Network failure or non-success HTTP status
    #[error("Failed to fetch sample: {0}")]
    Acquisition(String),

    /// Codec or container failure
    #[error("Failed to decode sample: {0}")]
    Decode(String),
}

/// Decoded audio ready for the engine
#[derive(Debug, Clone)]
pub struct DecodedAudio {
    /// Stereo sample data at `sample_rate`
    pub samples: StereoBuffer,
    /// Rate the samples are at (the engine rate after `load_sample`)
    pub sample_rate: u32,
}

impl DecodedAudio {
    /// Duration in seconds
    pub fn duration_secs(&self) -> f32 {
        self.samples.len() as f32 / self.sample_rate as f32
    }
}

/// Fetch raw sample bytes from a URL (blocking)
pub fn fetch_sample(url: &str) -> Result<Vec<u8>, PrepareError> {
    log::info!("Fetching sample {}", url);

    let response = ureq::get(url)
        .call()
        .map_err(|e| PrepareError::Acquisition(e.to_string()))?;

    let mut bytes = Vec::new();
    response
        .into_reader()
        .read_to_end(&mut bytes)
        .map_err(|e| PrepareError::Acquisition(e.to_string()))?;

    log::debug!("Fetched {} bytes from {}", bytes.len(), url);
    Ok(bytes)
}

/// Decode sample bytes to stereo audio at `target_rate`
///
/// `extension` is a container hint ("wav" for the stock catalog); pass
/// `None` to let the probe figure it out.
pub fn decode_sample(
    bytes: Vec<u8>,
    extension: Option<&str>,
    target_rate: u32,
) -> Result<DecodedAudio, PrepareError> {
    let (interleaved, source_rate, channels) = decode_bytes(bytes, extension)?;
    let (left, right) = split_channels(&interleaved, channels);
    let (left, right) = resample_stereo(left, right, source_rate, target_rate)?;

    Ok(DecodedAudio {
        samples: StereoBuffer::from_channels(&left, &right),
        sample_rate: target_rate,
    })
}

/// Fetch and decode a sample in one call (blocking)
pub fn load_sample(url: &str, target_rate: u32) -> Result<DecodedAudio, PrepareError> {
    let bytes = fetch_sample(url)?;
    let audio = decode_sample(bytes, url_extension(url), target_rate)?;
    log::info!(
        "Loaded sample: {:.2}s at {}Hz",
        audio.duration_secs(),
        audio.sample_rate
    );
    Ok(audio)
}

/// Extension of the URL's path component, if any
fn url_extension(url: &str) -> Option<&str> {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let name = path.rsplit('/').next()?;
    let (_, ext) = name.rsplit_once('.')?;
    (!ext.is_empty()).then_some(ext)
}

/// Decode in-memory bytes to interleaved f32 samples using Symphonia
fn decode_bytes(
    bytes: Vec<u8>,
    extension: Option<&str>,
) -> Result<(Vec<f32>, u32, u16), PrepareError> {
    let mss = MediaSourceStream::new(Box::new(std::io::Cursor::new(bytes)), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = extension {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())
        .map_err(|e| PrepareError::Decode(e.to_string()))?;

    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != symphonia::core::codecs::CODEC_TYPE_NULL)
        .ok_or_else(|| PrepareError::Decode("No audio track found".to_string()))?;

    let track_id = track.id;

    let sample_rate = track
        .codec_params
        .sample_rate
        .ok_or_else(|| PrepareError::Decode("Unknown sample rate".to_string()))?;

    let channels = track
        .codec_params
        .channels
        .map(|c| c.count() as u16)
        .unwrap_or(2);

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| PrepareError::Decode(e.to_string()))?;

    let mut samples: Vec<f32> = Vec::new();
    let mut sample_buf: Option<SampleBuffer<f32>> = None;

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(symphonia::core::errors::Error::IoError(e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(e) => {
                log::warn!("Error reading packet: {}", e);
                break;
            }
        };

        if packet.track_id() != track_id {
            continue;
        }

        match decoder.decode(&packet) {
            Ok(decoded) => {
                if sample_buf.is_none() {
                    let spec = *decoded.spec();
                    let capacity = decoded.capacity() as u64;
                    sample_buf = Some(SampleBuffer::new(capacity, spec));
                }
                if let Some(buf) = sample_buf.as_mut() {
                    buf.copy_interleaved_ref(decoded);
                    samples.extend_from_slice(buf.samples());
                }
            }
            Err(e) => {
                log::warn!("Decode error (skipping packet): {}", e);
            }
        }
    }

    if samples.is_empty() {
        return Err(PrepareError::Decode("Decoded no audio".to_string()));
    }

    Ok((samples, sample_rate, channels))
}

/// Split interleaved samples into left/right, fanning mono out to both
fn split_channels(interleaved: &[f32], channels: u16) -> (Vec<f32>, Vec<f32>) {
    match channels {
        0 | 1 => (interleaved.to_vec(), interleaved.to_vec()),
        n => {
            let n = n as usize;
            let frames = interleaved.len() / n;
            let mut left = Vec::with_capacity(frames);
            let mut right = Vec::with_capacity(frames);
            for frame in interleaved.chunks_exact(n) {
                left.push(frame[0]);
                right.push(frame[1]);
            }
            (left, right)
        }
    }
}

/// Resample both channels to `target_rate` (no-op if rates match)
fn resample_stereo(
    left: Vec<f32>,
    right: Vec<f32>,
    source_rate: u32,
    target_rate: u32,
) -> Result<(Vec<f32>, Vec<f32>), PrepareError> {
    use rubato::{FftFixedIn, Resampler};

    if source_rate == target_rate || left.is_empty() {
        return Ok((left, right));
    }

    log::debug!("Resampling {}Hz -> {}Hz", source_rate, target_rate);

    const CHUNK_SIZE: usize = 1024;
    let mut resampler =
        FftFixedIn::<f32>::new(source_rate as usize, target_rate as usize, CHUNK_SIZE, 2, 2)
            .map_err(|e| PrepareError::Decode(e.to_string()))?;

    let expected = (left.len() as u64 * target_rate as u64 / source_rate as u64) as usize;
    let mut out_left = Vec::with_capacity(expected + CHUNK_SIZE);
    let mut out_right = Vec::with_capacity(expected + CHUNK_SIZE);

    let mut pos = 0;
    while pos < left.len() {
        let frames = resampler.input_frames_next();
        let end = (pos + frames).min(left.len());

        // Pad the tail chunk with silence to the fixed input size
        let mut chunk_l = left[pos..end].to_vec();
        let mut chunk_r = right[pos..end].to_vec();
        chunk_l.resize(frames, 0.0);
        chunk_r.resize(frames, 0.0);

        let output = resampler
            .process(&[chunk_l, chunk_r], None)
            .map_err(|e| PrepareError::Decode(e.to_string()))?;
        out_left.extend_from_slice(&output[0]);
        out_right.extend_from_slice(&output[1]);

        pos = end;
    }

    out_left.truncate(expected);
    out_right.truncate(expected);
    Ok((out_left, out_right))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_extension() {
        assert_eq!(url_extension("https://example.com/a/b.wav"), Some("wav"));
        assert_eq!(url_extension("https://example.com/a/b.wav?x=1"), Some("wav"));
        assert_eq!(url_extension("https://example.com/a/b"), None);
    }

    #[test]
    fn test_split_channels_mono_fans_out() {
        let (l, r) = split_channels(&[0.1, 0.2, 0.3], 1);
        assert_eq!(l, vec![0.1, 0.2, 0.3]);
        assert_eq!(r, vec![0.1, 0.2, 0.3]);
    }

    #[test]
    fn test_split_channels_takes_first_two() {
        // 4-channel interleaved: only channels 0 and 1 survive
        let (l, r) = split_channels(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0], 4);
        assert_eq!(l, vec![1.0, 5.0]);
        assert_eq!(r, vec![2.0, 6.0]);
    }

    #[test]
    fn test_resample_noop_when_rates_match() {
        let left = vec![0.5; 100];
        let right = vec![-0.5; 100];
        let (l, r) = resample_stereo(left.clone(), right.clone(), 48000, 48000).unwrap();
        assert_eq!(l, left);
        assert_eq!(r, right);
    }

    #[test]
    fn test_resample_changes_length_proportionally() {
        let len = 44100;
        let left: Vec<f32> = (0..len)
            .map(|i| (2.0 * std::f32::consts::PI * 440.0 * i as f32 / 44100.0).sin())
            .collect();
        let right = left.clone();

        let (l, r) = resample_stereo(left, right, 44100, 48000).unwrap();
        assert_eq!(l.len(), 48000);
        assert_eq!(r.len(), 48000);
    }

    #[test]
    fn test_decode_wav_roundtrip() {
        // Minimal 16-bit PCM WAV: 4 mono frames at 48kHz
        let frames: [i16; 4] = [0, 16384, -16384, 0];
        let mut bytes = Vec::new();
        bytes.extend_from_slice(b"RIFF");
        bytes.extend_from_slice(&(36u32 + 8).to_le_bytes());
        bytes.extend_from_slice(b"WAVEfmt ");
        bytes.extend_from_slice(&16u32.to_le_bytes());
        bytes.extend_from_slice(&1u16.to_le_bytes()); // PCM
        bytes.extend_from_slice(&1u16.to_le_bytes()); // mono
        bytes.extend_from_slice(&48000u32.to_le_bytes());
        bytes.extend_from_slice(&(48000u32 * 2).to_le_bytes());
        bytes.extend_from_slice(&2u16.to_le_bytes());
        bytes.extend_from_slice(&16u16.to_le_bytes());
        bytes.extend_from_slice(b"data");
        bytes.extend_from_slice(&8u32.to_le_bytes());
        for s in frames {
            bytes.extend_from_slice(&s.to_le_bytes());
        }

        let audio = decode_sample(bytes, Some("wav"), 48000).unwrap();
        assert_eq!(audio.sample_rate, 48000);
        assert_eq!(audio.samples.len(), 4);
        // Mono fans out to both channels
        assert!((audio.samples[1].left - 0.5).abs() < 0.01);
        assert!((audio.samples[1].right - 0.5).abs() < 0.01);
    }

    #[test]
    fn test_decode_garbage_is_an_error() {
        let err = decode_sample(vec![0u8; 64], Some("wav"), 48000).unwrap_err();
        assert!(matches!(err, PrepareError::Decode(_)));
    }
}
