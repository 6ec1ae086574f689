//! UI module for the Peakguess ear trainer
//!
//! Built with iced using a message-passing architecture: the view emits
//! messages, `update` feeds them to the game session, and the session's
//! commands drive the audio player and background sample loads.

pub mod app;
pub mod message;

pub use app::TrainerApp;
pub use message::Message;
