//! Audio output backend (CPAL)

mod error;
mod system;

pub use error::{AudioError, AudioResult};
pub use system::{AudioSystem, DEFAULT_BUFFER_SIZE, MAX_BUFFER_SIZE};
