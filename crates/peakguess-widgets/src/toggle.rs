//! Dry/wet A/B toggle

use iced::widget::{button, row, text};
use iced::{Center, Element};

use crate::button_styles::{toggle_style, ACTIVE_BG};

/// Build the A/B comparison toggle row.
///
/// Shows which path is audible; pressing it emits `on_toggle`. Outside
/// the guessing phase the button renders but takes no presses.
pub fn ab_toggle<'a, Message: Clone + 'a>(
    wet_audible: bool,
    enabled: bool,
    on_toggle: Message,
) -> Element<'a, Message> {
    let label = if wet_audible { "Boost: ON" } else { "Boost: OFF" };
    let mut toggle = button(text(label).size(14))
        .padding([8, 16])
        .style(move |_theme, status| toggle_style(status, wet_audible, ACTIVE_BG));
    if enabled {
        toggle = toggle.on_press(on_toggle);
    }

    row![text("A/B").size(12), toggle]
        .spacing(10)
        .align_y(Center)
        .into()
}
