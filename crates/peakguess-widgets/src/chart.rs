//! FrequencyChart - the log-frequency guessing canvas
//!
//! Renders the frequency axis with grid columns and tick labels, a hover
//! bar with a confidence band while the user is picking, and the
//! guessed/actual bars once a round is resolved. Clicks are snapped to
//! the nearest candidate frequency and published through a callback
//! closure.

use iced::alignment::{Horizontal, Vertical};
use iced::widget::canvas::{self, Event, Frame, Geometry, Path, Program, Stroke, Text};
use iced::{mouse, Color, Point, Rectangle, Size, Theme};

use peakguess_core::scale::{accuracy, confidence_interval_hz, FrequencyScale, TICK_FREQUENCIES};
use peakguess_core::InteractionState;

use crate::format_frequency;

/// Height reserved for the axis labels below the plot area
const AXIS_HEIGHT: f32 = 25.0;

/// Grid and axis line color
const GRID_COLOR: Color = Color::from_rgb(0.86, 0.86, 0.86);

/// Bar color for the user's pick (blue)
const GUESS_COLOR: Color = Color::from_rgb(0.145, 0.388, 0.922);

/// Bar color for the boosted frequency (green)
const TARGET_COLOR: Color = Color::from_rgb(0.29, 0.87, 0.5);

/// Confidence band fill around the hovered candidate
const BAND_COLOR: Color = Color::from_rgba(0.145, 0.388, 0.922, 0.12);

/// Canvas program for the guessing chart
///
/// Takes a callback closure that turns a snapped candidate frequency
/// into an app message.
pub struct FrequencyChart<Message, PickFn>
where
    PickFn: Fn(u32) -> Message,
{
    pub state: InteractionState,
    pub on_pick: PickFn,
}

impl<Message, PickFn> Program<Message> for FrequencyChart<Message, PickFn>
where
    Message: Clone,
    PickFn: Fn(u32) -> Message,
{
    type State = ();

    fn update(
        &self,
        _interaction: &mut Self::State,
        event: &Event,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> Option<canvas::Action<Message>> {
        match event {
            Event::Mouse(mouse::Event::CursorMoved { .. }) => {
                // The hover bar tracks the cursor, so any movement needs
                // a repaint while a selection is in progress.
                if self.state == InteractionState::SelectingFrequency {
                    return Some(canvas::Action::request_redraw());
                }
                None
            }
            Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left)) => {
                if self.state != InteractionState::SelectingFrequency {
                    return None;
                }
                let position = cursor.position_in(bounds)?;
                let frequency = FrequencyScale::new(bounds.width).nearest_candidate(position.x);
                Some(canvas::Action::publish((self.on_pick)(frequency)))
            }
            _ => None,
        }
    }

    fn mouse_interaction(
        &self,
        _interaction: &Self::State,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> mouse::Interaction {
        if self.state == InteractionState::SelectingFrequency && cursor.is_over(bounds) {
            mouse::Interaction::Crosshair
        } else {
            mouse::Interaction::default()
        }
    }

    fn draw(
        &self,
        _interaction: &Self::State,
        renderer: &iced::Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());
        let plot_height = (bounds.height - AXIS_HEIGHT).max(0.0);
        let scale = FrequencyScale::new(bounds.width);

        draw_grid(&mut frame, &scale, plot_height);

        match self.state {
            InteractionState::SelectingFrequency => {
                if let Some(position) = cursor.position_in(bounds) {
                    draw_hover(&mut frame, &scale, plot_height, position.x);
                }
            }
            InteractionState::FrequencySelected { guessed, actual } => {
                draw_result(&mut frame, &scale, plot_height, guessed, actual);
            }
            InteractionState::Initial | InteractionState::LoadingSamples => {}
        }

        vec![frame.into_geometry()]
    }
}

/// Grid columns at the tick frequencies plus the baseline and labels
fn draw_grid(frame: &mut Frame, scale: &FrequencyScale, plot_height: f32) {
    for &tick in &TICK_FREQUENCIES {
        let Some(x) = scale.position(tick as f32) else {
            continue;
        };

        let line = Path::line(Point::new(x, 0.0), Point::new(x, plot_height));
        frame.stroke(
            &line,
            Stroke::default().with_color(GRID_COLOR).with_width(1.0),
        );

        frame.fill_text(Text {
            content: format_frequency(tick),
            position: Point::new(x, plot_height + AXIS_HEIGHT / 2.0),
            size: 12.0.into(),
            color: GRID_COLOR,
            align_x: Horizontal::Center.into(),
            align_y: Vertical::Center.into(),
            ..Text::default()
        });
    }

    let baseline = Path::line(
        Point::new(0.0, plot_height),
        Point::new(scale.width(), plot_height),
    );
    frame.stroke(
        &baseline,
        Stroke::default().with_color(GRID_COLOR).with_width(2.0),
    );
}

/// Hover bar at the cursor plus the confidence band of the snapped candidate
fn draw_hover(frame: &mut Frame, scale: &FrequencyScale, plot_height: f32, cursor_x: f32) {
    let candidate = scale.nearest_candidate(cursor_x);
    let interval = confidence_interval_hz(candidate);

    let band_lo = candidate.saturating_sub(interval);
    let band_lo_x = scale.position(band_lo as f32).unwrap_or(0.0).max(0.0);
    let band_hi_x = scale
        .position((candidate + interval) as f32)
        .unwrap_or(scale.width())
        .min(scale.width());
    if band_hi_x > band_lo_x {
        frame.fill_rectangle(
            Point::new(band_lo_x, 0.0),
            Size::new(band_hi_x - band_lo_x, plot_height),
            BAND_COLOR,
        );
    }

    frame.fill_rectangle(
        Point::new(cursor_x, 0.0),
        Size::new(2.0, plot_height),
        GUESS_COLOR,
    );
}

/// Result bars and the score overlay
fn draw_result(frame: &mut Frame, scale: &FrequencyScale, plot_height: f32, guessed: u32, actual: u32) {
    if let Some(x) = scale.position(actual as f32) {
        frame.fill_rectangle(Point::new(x, 0.0), Size::new(2.0, plot_height), TARGET_COLOR);
    }
    if let Some(x) = scale.position(guessed as f32) {
        frame.fill_rectangle(Point::new(x, 0.0), Size::new(2.0, plot_height), GUESS_COLOR);
    }

    let center = Point::new(scale.width() / 2.0, plot_height / 2.0 - 24.0);
    let lines = [
        (format!("Selected: {}", format_frequency(guessed)), GUESS_COLOR),
        (format!("Boosted: {}", format_frequency(actual)), TARGET_COLOR),
        (
            format!("Accuracy: {}%", accuracy(guessed, actual)),
            Color::from_rgb(0.9, 0.9, 0.9),
        ),
    ];
    for (i, (content, color)) in lines.into_iter().enumerate() {
        frame.fill_text(Text {
            content,
            position: Point::new(center.x, center.y + i as f32 * 20.0),
            size: 16.0.into(),
            color,
            align_x: Horizontal::Center.into(),
            align_y: Vertical::Center.into(),
            ..Text::default()
        });
    }
}
