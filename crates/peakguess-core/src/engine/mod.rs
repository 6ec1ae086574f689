//! Dual-track playback engine
//!
//! Lock-free architecture:
//! - Commands (arm/play/stop) flow UI → audio via an `rtrb` SPSC queue
//! - Gains and the playing flag live in [`PlayerAtomics`]
//! - The audio callback owns the [`PlayerGraph`] exclusively

mod atomics;
mod command;
mod graph;
mod player;
mod track;

pub use atomics::PlayerAtomics;
pub use command::{command_channel, CommandSender, PlayerCommand, COMMAND_QUEUE_CAPACITY};
pub use graph::PlayerGraph;
pub use player::Player;
pub use track::{ArmedSource, TrackLane};
