//! Peakguess - peaking-EQ ear trainer
//!
//! This is the main entry point for the GUI application. It:
//! 1. Loads the trainer configuration (sample catalog, boost settings)
//! 2. Launches the iced GUI application
//!
//! The audio output stream is opened lazily on the first Start click so
//! the device is claimed from a user gesture rather than at startup.

mod ui;

use iced::Size;

use peakguess_core::config::{self, TrainerConfig};
use ui::{app::TrainerApp, Message};

fn main() -> iced::Result {
    // Initialize logger - set RUST_LOG=debug for verbose output
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    log::info!("peakguess starting up");

    let config_path = config::default_config_path();
    let config: TrainerConfig = config::load_config(&config_path);
    log::info!(
        "config loaded: {} samples in catalog, boost {:+.1} dB (q {})",
        config.sample_urls.len(),
        config.boost_gain_db,
        config.boost_q,
    );

    iced::application(
        move || (TrainerApp::new(config.clone()), iced::Task::none()),
        update,
        view,
    )
    .subscription(subscription)
    .theme(theme)
    .title("Peakguess")
    .window_size(Size::new(900.0, 540.0))
    .run()
}

/// Update function for iced
fn update(app: &mut TrainerApp, message: Message) -> iced::Task<Message> {
    app.update(message)
}

/// View function for iced
fn view(app: &TrainerApp) -> iced::Element<'_, Message> {
    app.view()
}

/// Subscription function for iced
fn subscription(app: &TrainerApp) -> iced::Subscription<Message> {
    app.subscription()
}

/// Theme function for iced
fn theme(app: &TrainerApp) -> iced::Theme {
    app.theme()
}
