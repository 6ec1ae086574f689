//! Lock-free command queue for real-time player control
//!
//! The UI thread sends commands via a lock-free SPSC queue; the audio
//! thread drains them at block boundaries. Neither side ever blocks, so
//! a slow UI frame can't cause an audible dropout and a busy audio
//! callback can't stall the UI.

use super::track::ArmedSource;
use crate::types::TrackId;

/// Commands sent from UI thread to audio thread
///
/// Each variant is an atomic operation on the player graph. Commands are
/// processed at the start of each audio block, so `Play` starts both
/// tracks within the same block with no mid-block state changes.
#[derive(Debug)]
pub enum PlayerCommand {
    /// Install a fully decoded, filtered source on a track.
    ///
    /// The source is boxed because it carries an `Arc` to megabytes of
    /// decoded audio plus filter state; boxing keeps the command enum
    /// pointer-sized for cache-efficient queueing.
    Arm {
        track: TrackId,
        source: Box<ArmedSource>,
    },
    /// Start both tracks from position zero.
    ///
    /// No-op unless both tracks hold an armed, not-yet-started source.
    Play,
    /// Stop playback and drop both sources.
    ///
    /// Idempotent; a source is never restarted after it has played.
    Stop,
}

/// Capacity of the command queue
///
/// A round sends at most a handful of commands (two arms, gains live in
/// atomics, play/stop), so a small queue is plenty.
pub const COMMAND_QUEUE_CAPACITY: usize = 64;

/// Create a new command channel (producer/consumer pair)
///
/// Producer is owned by the UI thread, consumer by the audio thread.
pub fn command_channel() -> (rtrb::Producer<PlayerCommand>, rtrb::Consumer<PlayerCommand>) {
    rtrb::RingBuffer::new(COMMAND_QUEUE_CAPACITY)
}

/// Command sender for the UI thread
pub struct CommandSender {
    producer: rtrb::Producer<PlayerCommand>,
}

impl CommandSender {
    pub(crate) fn new(producer: rtrb::Producer<PlayerCommand>) -> Self {
        Self { producer }
    }

    /// Send a command to the audio thread
    ///
    /// Returns Err with the command if the queue is full (command dropped)
    pub fn send(&mut self, cmd: PlayerCommand) -> Result<(), PlayerCommand> {
        self.producer.push(cmd).map_err(|e| match e {
            rtrb::PushError::Full(value) => value,
        })
    }
}
