//! Main iced application for the Peakguess ear trainer
//!
//! Owns the game session, the audio system, and the mapping from
//! session commands to player calls and background load tasks.

use std::sync::Arc;

use iced::widget::canvas::Canvas;
use iced::widget::{button, column, container, row, text, Space};
use iced::{keyboard, Center, Element, Fill, Length, Subscription, Task, Theme};

use peakguess_core::config::TrainerConfig;
use peakguess_core::sample::load_sample;
use peakguess_core::{
    AudioSystem, GuessSession, InteractionState, RoundPlan, SessionCommand, SessionEvent, TrackId,
    DEFAULT_SAMPLE_RATE,
};
use peakguess_widgets::button_styles::{press_release_style, ACTIVE_BG};
use peakguess_widgets::{ab_toggle, FrequencyChart};

use super::message::{LoadedRound, Message};

/// Chart height in logical pixels
const CHART_HEIGHT: f32 = 340.0;

/// Application state
pub struct TrainerApp {
    /// Loaded configuration (sample catalog, boost parameters, output)
    config: TrainerConfig,
    /// The guessing game state machine
    session: GuessSession,
    /// Audio system; started lazily on the first Start click so the
    /// stream opens from a user gesture
    audio: Option<AudioSystem>,
    /// Status line shown at the bottom of the window
    status: String,
}

impl TrainerApp {
    pub fn new(config: TrainerConfig) -> Self {
        let session = GuessSession::new(&config);
        Self {
            config,
            session,
            audio: None,
            status: "Press Start to begin".to_string(),
        }
    }

    /// Update application state
    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::StartClicked => {
                if !self.ensure_audio() {
                    return Task::none();
                }
                self.dispatch(SessionEvent::ClickStart)
            }

            Message::ContinueClicked => self.dispatch(SessionEvent::ClickContinue),

            Message::AbToggled => {
                let wet_audible = !self.session.wet_audible();
                self.dispatch(SessionEvent::ToggleAb { wet_audible })
            }

            Message::SpacePressed => self.dispatch(SessionEvent::ShortcutKey),

            Message::FrequencyPicked(hz) => self.dispatch(SessionEvent::SelectFrequency { hz }),

            Message::RoundLoaded { round, result } => {
                if round != self.session.round() {
                    log::debug!("discarding load result for stale round {}", round);
                    return Task::none();
                }
                match result {
                    Ok(loaded) => self.arm_round(loaded),
                    Err(error) => {
                        log::warn!("round {} failed to load: {}", round, error);
                        self.status = format!("Load failed: {}", error);
                        self.dispatch(SessionEvent::LoadFailed { round, error })
                    }
                }
            }
        }
    }

    /// Feed an event to the session and execute the resulting commands
    fn dispatch(&mut self, event: SessionEvent) -> Task<Message> {
        let commands = self.session.handle(event);
        let tasks: Vec<Task<Message>> = commands
            .into_iter()
            .map(|command| self.execute(command))
            .collect();
        Task::batch(tasks)
    }

    /// Execute one session command
    fn execute(&mut self, command: SessionCommand) -> Task<Message> {
        match command {
            SessionCommand::PrepareRound(plan) => {
                self.status = "Loading sample...".to_string();
                self.spawn_load(plan)
            }
            SessionCommand::SetGains { dry, wet } => {
                if let Some(audio) = &mut self.audio {
                    let player = audio.player();
                    player.set_track_gain(TrackId::Dry, dry);
                    player.set_track_gain(TrackId::Wet, wet);
                }
                Task::none()
            }
            SessionCommand::Play => {
                if let Some(audio) = &mut self.audio {
                    audio.player().play();
                    self.status = "Playing - where is the boost?".to_string();
                }
                Task::none()
            }
            SessionCommand::StopPlayback => {
                if let Some(audio) = &mut self.audio {
                    audio.player().stop();
                }
                Task::none()
            }
        }
    }

    /// Fetch and decode the round's sample on a blocking worker
    fn spawn_load(&self, plan: RoundPlan) -> Task<Message> {
        let url = plan.sample_url.clone();
        let rate = self.engine_sample_rate();
        Task::perform(
            async move {
                match tokio::task::spawn_blocking(move || load_sample(&url, rate)).await {
                    Ok(result) => result.map_err(|e| e.to_string()),
                    Err(e) => Err(format!("sample load task failed: {}", e)),
                }
            },
            move |result| Message::RoundLoaded {
                round: plan.round,
                result: result.map(|audio| LoadedRound {
                    plan: plan.clone(),
                    sample_rate: audio.sample_rate,
                    samples: Arc::new(audio.samples),
                }),
            },
        )
    }

    /// Arm both tracks with the loaded sample and tell the session
    fn arm_round(&mut self, loaded: LoadedRound) -> Task<Message> {
        let round = loaded.plan.round;
        let Some(audio) = &mut self.audio else {
            return self.dispatch(SessionEvent::LoadFailed {
                round,
                error: "audio system not running".to_string(),
            });
        };

        let player = audio.player();
        // Both lanes arm from clones of the same Arc; only the filters differ.
        let armed = player
            .prepare(TrackId::Dry, loaded.samples.clone(), &loaded.plan.dry)
            .and_then(|_| player.prepare(TrackId::Wet, loaded.samples.clone(), &loaded.plan.wet));

        match armed {
            Ok(()) => {
                log::info!(
                    "round {} armed: {:.1}s sample, target {} Hz",
                    round,
                    loaded.samples.len() as f32 / loaded.sample_rate.max(1) as f32,
                    loaded.plan.target_hz,
                );
                self.dispatch(SessionEvent::SamplesReady { round })
            }
            Err(e) => self.dispatch(SessionEvent::LoadFailed {
                round,
                error: e.to_string(),
            }),
        }
    }

    /// Start the audio system if it is not running yet
    fn ensure_audio(&mut self) -> bool {
        if self.audio.is_some() {
            return true;
        }
        match AudioSystem::start(&self.config.output) {
            Ok(audio) => {
                log::info!(
                    "audio started: {} Hz, ~{:.1} ms latency",
                    audio.sample_rate(),
                    audio.latency_ms(),
                );
                self.audio = Some(audio);
                true
            }
            Err(e) => {
                log::error!("could not start audio: {}", e);
                self.status = format!("Audio error: {}", e);
                false
            }
        }
    }

    fn engine_sample_rate(&self) -> u32 {
        self.audio
            .as_ref()
            .map(|a| a.sample_rate())
            .unwrap_or(DEFAULT_SAMPLE_RATE)
    }

    /// Space bar shortcut
    pub fn subscription(&self) -> Subscription<Message> {
        keyboard::listen().filter_map(|event| match event {
            keyboard::Event::KeyPressed {
                key: keyboard::Key::Named(keyboard::key::Named::Space),
                ..
            } => Some(Message::SpacePressed),
            _ => None,
        })
    }

    /// Build the view
    pub fn view(&self) -> Element<'_, Message> {
        let header = row![
            text("PEAKGUESS").size(24),
            Space::new().width(Fill),
            text("Find the boosted frequency").size(14),
        ]
        .spacing(20)
        .align_y(Center)
        .padding(10);

        let chart = Canvas::new(FrequencyChart {
            state: self.session.state(),
            on_pick: Message::FrequencyPicked,
        })
        .width(Length::Fill)
        .height(Length::Fixed(CHART_HEIGHT));

        let controls = self.view_controls();

        let status_bar = container(text(&self.status).size(12)).padding(5);

        let content = column![header, chart, controls, status_bar]
            .spacing(10)
            .padding(10);

        container(content).width(Fill).height(Fill).into()
    }

    /// Controls row, dependent on the current round state
    fn view_controls(&self) -> Element<'_, Message> {
        let controls = match self.session.state() {
            InteractionState::Initial => {
                let start = button(text("Start").size(16))
                    .padding([8, 24])
                    .style(|_theme, status| press_release_style(status, ACTIVE_BG))
                    .on_press(Message::StartClicked);
                row![start]
            }

            InteractionState::LoadingSamples => {
                row![text("Loading sample...").size(14)]
            }

            InteractionState::SelectingFrequency => {
                row![
                    ab_toggle(self.session.wet_audible(), true, Message::AbToggled),
                    text("Click the chart where you hear the boost (Space = A/B)").size(12),
                ]
            }

            InteractionState::FrequencySelected { .. } => {
                let next = button(text("Continue").size(16))
                    .padding([8, 24])
                    .style(|_theme, status| press_release_style(status, ACTIVE_BG))
                    .on_press(Message::ContinueClicked);
                row![
                    next,
                    ab_toggle(self.session.wet_audible(), false, Message::AbToggled),
                    text("Space also continues").size(12),
                ]
            }
        };

        controls.spacing(20).align_y(Center).padding(10).into()
    }

    /// Get the theme
    pub fn theme(&self) -> Theme {
        Theme::Dark
    }
}
