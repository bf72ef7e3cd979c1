use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use super::span_rect;
use crate::app::{chip_extent, App};
use crate::theme::Theme;

pub struct ChipRowWidget;

impl ChipRowWidget {
    /// Chips on the first row, the sliding selection pill on the second
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let theme = &app.theme;
        frame.render_widget(
            Paragraph::new("").style(Style::default().bg(Theme::term(theme.bg))),
            area,
        );

        for (i, chip) in app.chips.iter().enumerate() {
            let Some(layout) = app.chip_indicator.layout(i) else {
                continue;
            };
            let offset = layout.measured_offset.unwrap_or_default();
            let extent = chip_extent(chip.label()) as f64;
            let Some(rect) = span_rect(area, 0, offset, extent) else {
                continue;
            };

            let style = chip.style();
            // Border glyphs fade into the chip as it becomes selected
            let edge = Theme::term(theme.border.with_alpha(style.border_width).over(style.background));
            let mut body = Style::default()
                .fg(Theme::term(style.foreground))
                .bg(Theme::term(style.background));
            if style.scale > 1.02 {
                body = body.add_modifier(Modifier::BOLD);
            } else if style.scale < 0.98 {
                body = body.add_modifier(Modifier::DIM);
            }
            let icon = if style.shows_check() { "✓" } else { "+" };

            let line = Line::from(vec![
                Span::styled("▏", body.fg(edge)),
                Span::styled(format!("{} {}", icon, chip.label()), body),
                Span::styled("▕", body.fg(edge)),
            ]);
            frame.render_widget(Paragraph::new(line), rect);
        }

        let pill = app.chip_indicator.style();
        if let Some(rect) = span_rect(area, 1, pill.position, pill.width) {
            let bar = "▀".repeat(rect.width as usize);
            frame.render_widget(
                Paragraph::new(bar).style(Style::default().fg(Theme::term(theme.accent))),
                rect,
            );
        }
    }
}
