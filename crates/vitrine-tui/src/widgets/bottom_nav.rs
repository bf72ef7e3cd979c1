use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use super::span_rect;
use crate::app::{tab_extent, App, TABS};
use crate::theme::Theme;

pub struct BottomNavWidget;

impl BottomNavWidget {
    /// Pill on the first row, tab labels on the second
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let theme = &app.theme;
        frame.render_widget(
            Paragraph::new("").style(Style::default().bg(Theme::term(theme.surface))),
            area,
        );

        let style = app.nav.style();
        if let Some(rect) = span_rect(area, 0, style.indicator.position, style.indicator.width) {
            let bar = "▄".repeat(rect.width as usize);
            frame.render_widget(
                Paragraph::new(bar).style(Style::default().fg(Theme::term(theme.accent))),
                rect,
            );
        }

        let tracker = app.nav.tracker();
        for (i, ((icon, label), tab)) in TABS.iter().zip(&style.tabs).enumerate() {
            let Some(offset) = tracker.layout(i).and_then(|l| l.measured_offset) else {
                continue;
            };
            let Some(rect) = span_rect(area, 1, offset, tab_extent(label) as f64) else {
                continue;
            };

            let label_style = Style::default().fg(theme.faded(theme.fg, tab.label_opacity));
            let mut icon_style = label_style;
            // Lifted icons pick up the accent
            if tab.icon_lift >= 0.5 {
                icon_style = icon_style.fg(Theme::term(theme.accent));
            }
            if tab.icon_scale > 1.07 {
                icon_style = icon_style.add_modifier(Modifier::BOLD);
            }

            let line = Line::from(vec![
                Span::raw(" "),
                Span::styled(*icon, icon_style),
                Span::raw(" "),
                Span::styled(*label, label_style),
            ]);
            frame.render_widget(
                Paragraph::new(line).style(Style::default().bg(Theme::term(theme.surface))),
                rect,
            );
        }
    }
}
