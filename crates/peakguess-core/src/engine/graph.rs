//! The player graph - audio-thread side of the engine
//!
//! Owned exclusively by the audio callback. Drains the command queue at
//! block boundaries, then mixes both track lanes into the output block
//! through their atomically published gains.

use std::sync::Arc;

use super::atomics::PlayerAtomics;
use super::command::PlayerCommand;
use super::track::TrackLane;
use crate::types::{StereoBuffer, TrackId};

/// Audio-thread playback graph: two lanes summed into one output
pub struct PlayerGraph {
    lanes: [TrackLane; 2],
    atomics: Arc<PlayerAtomics>,
}

impl PlayerGraph {
    pub fn new(atomics: Arc<PlayerAtomics>) -> Self {
        Self {
            lanes: TrackId::ALL.map(TrackLane::new),
            atomics,
        }
    }

    /// Drain and apply all pending commands (called once per block)
    pub fn process_commands(&mut self, rx: &mut rtrb::Consumer<PlayerCommand>) {
        while let Ok(cmd) = rx.pop() {
            self.handle_command(cmd);
        }
    }

    fn handle_command(&mut self, cmd: PlayerCommand) {
        match cmd {
            PlayerCommand::Arm { track, source } => {
                self.lanes[track.index()].arm(*source);
            }
            PlayerCommand::Play => {
                // Both-or-neither: a lone armed track never starts, so the
                // lanes stay sample-locked for the whole round.
                if self.lanes.iter().all(|lane| lane.has_armed()) {
                    for lane in &mut self.lanes {
                        lane.start();
                        self.atomics.set_track_playing(lane.id(), true);
                    }
                    self.atomics.set_playing(true);
                } else {
                    log::debug!("play ignored: not all tracks armed");
                }
            }
            PlayerCommand::Stop => {
                for lane in &mut self.lanes {
                    lane.stop();
                    self.atomics.set_track_playing(lane.id(), false);
                }
                self.atomics.set_playing(false);
            }
        }
    }

    /// Render one block into `out`
    pub fn process(&mut self, out: &mut StereoBuffer) {
        out.fill_silence();
        for lane in &mut self.lanes {
            let gain = self.atomics.gain(lane.id());
            lane.process(out.as_mut_slice(), gain);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effect::EqEffect;
    use crate::engine::command::command_channel;
    use crate::engine::track::ArmedSource;
    use crate::types::{StereoSample, TrackId};

    fn constant_source(value: f32, len: usize) -> Box<ArmedSource> {
        let mut buffer = StereoBuffer::with_capacity(len);
        for _ in 0..len {
            buffer.push(StereoSample::mono(value));
        }
        Box::new(ArmedSource::new(
            Arc::new(buffer),
            &EqEffect::inert(),
            48000,
        ))
    }

    fn pump(graph: &mut PlayerGraph, rx: &mut rtrb::Consumer<PlayerCommand>, frames: usize) -> StereoBuffer {
        let mut out = StereoBuffer::silence(frames);
        graph.process_commands(rx);
        graph.process(&mut out);
        out
    }

    #[test]
    fn test_play_requires_both_tracks_armed() {
        let atomics = Arc::new(PlayerAtomics::new());
        let mut graph = PlayerGraph::new(atomics.clone());
        let (mut tx, mut rx) = command_channel();

        tx.push(PlayerCommand::Arm { track: TrackId::Dry, source: constant_source(1.0, 16) }).unwrap();
        tx.push(PlayerCommand::Play).unwrap();
        let out = pump(&mut graph, &mut rx, 4);

        assert!(!atomics.is_playing());
        assert_eq!(out.peak(), 0.0);
    }

    #[test]
    fn test_play_starts_both_tracks_in_same_block() {
        let atomics = Arc::new(PlayerAtomics::new());
        let mut graph = PlayerGraph::new(atomics.clone());
        let (mut tx, mut rx) = command_channel();

        tx.push(PlayerCommand::Arm { track: TrackId::Dry, source: constant_source(0.25, 16) }).unwrap();
        tx.push(PlayerCommand::Arm { track: TrackId::Wet, source: constant_source(0.5, 16) }).unwrap();
        tx.push(PlayerCommand::Play).unwrap();
        let out = pump(&mut graph, &mut rx, 4);

        assert!(atomics.is_playing());
        assert!(atomics.is_track_playing(TrackId::Dry));
        assert!(atomics.is_track_playing(TrackId::Wet));
        // Both lanes at unity gain sum to 0.75 from the first frame.
        assert!((out[0].left - 0.75).abs() < 1e-6);
        assert!((out[3].left - 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_gains_select_audible_track() {
        let atomics = Arc::new(PlayerAtomics::new());
        let mut graph = PlayerGraph::new(atomics.clone());
        let (mut tx, mut rx) = command_channel();

        tx.push(PlayerCommand::Arm { track: TrackId::Dry, source: constant_source(1.0, 16) }).unwrap();
        tx.push(PlayerCommand::Arm { track: TrackId::Wet, source: constant_source(1.0, 16) }).unwrap();
        tx.push(PlayerCommand::Play).unwrap();
        atomics.set_gain(TrackId::Dry, 0.0);
        atomics.set_gain(TrackId::Wet, 0.9);
        let out = pump(&mut graph, &mut rx, 4);

        assert!((out[0].left - 0.9).abs() < 1e-6);
    }

    #[test]
    fn test_stop_is_idempotent_and_drops_sources() {
        let atomics = Arc::new(PlayerAtomics::new());
        let mut graph = PlayerGraph::new(atomics.clone());
        let (mut tx, mut rx) = command_channel();

        tx.push(PlayerCommand::Arm { track: TrackId::Dry, source: constant_source(1.0, 16) }).unwrap();
        tx.push(PlayerCommand::Arm { track: TrackId::Wet, source: constant_source(1.0, 16) }).unwrap();
        tx.push(PlayerCommand::Play).unwrap();
        pump(&mut graph, &mut rx, 4);
        assert!(atomics.is_playing());

        tx.push(PlayerCommand::Stop).unwrap();
        tx.push(PlayerCommand::Stop).unwrap();
        let out = pump(&mut graph, &mut rx, 4);
        assert!(!atomics.is_playing());
        assert!(!atomics.is_track_playing(TrackId::Dry));
        assert!(!atomics.is_track_playing(TrackId::Wet));
        assert_eq!(out.peak(), 0.0);

        // A play after stop must not resurrect the dropped sources.
        tx.push(PlayerCommand::Play).unwrap();
        let out = pump(&mut graph, &mut rx, 4);
        assert!(!atomics.is_playing());
        assert_eq!(out.peak(), 0.0);
    }

    #[test]
    fn test_rearming_replaces_previous_source() {
        let atomics = Arc::new(PlayerAtomics::new());
        let mut graph = PlayerGraph::new(atomics.clone());
        let (mut tx, mut rx) = command_channel();

        tx.push(PlayerCommand::Arm { track: TrackId::Dry, source: constant_source(1.0, 16) }).unwrap();
        tx.push(PlayerCommand::Arm { track: TrackId::Dry, source: constant_source(0.5, 16) }).unwrap();
        tx.push(PlayerCommand::Arm { track: TrackId::Wet, source: constant_source(0.0, 16) }).unwrap();
        tx.push(PlayerCommand::Play).unwrap();
        let out = pump(&mut graph, &mut rx, 2);

        assert!((out[0].left - 0.5).abs() < 1e-6);
    }
}
