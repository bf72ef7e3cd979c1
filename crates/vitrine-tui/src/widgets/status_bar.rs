use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use unicode_width::UnicodeWidthStr;
use vitrine_core::components::PressableStyle;

use crate::app::App;
use crate::theme::Theme;

pub struct StatusBarWidget;

impl StatusBarWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let theme = &app.theme;
        let bar = Style::default().fg(Theme::term(theme.fg)).bg(Theme::term(theme.surface_alt));

        let status_text = if let Some(msg) = &app.status_message {
            format!(" {}", msg)
        } else {
            let filter = app
                .selected_filter()
                .and_then(|i| app.chips.get(i))
                .map_or("All", |c| c.label());
            format!(
                " {:?} | {} | {} of {} products",
                app.tab(),
                filter,
                app.visible.len(),
                app.products.len()
            )
        };

        let favorite = format!(" ♥ {} ", app.favorites.len());
        let cart = format!(" ◫ {} ", app.cart.len());
        let help_hint = " q:quit h/l:filter j/k:move ⇥:tab f:save a:cart ";
        let used = status_text.width() + favorite.width() + cart.width() + help_hint.width();
        let padding_len = (area.width as usize).saturating_sub(used);

        let line = Line::from(vec![
            Span::styled(status_text, bar),
            Span::styled(" ".repeat(padding_len), bar),
            Span::styled(
                help_hint,
                Style::default()
                    .fg(Theme::term(theme.muted))
                    .bg(Theme::term(theme.surface_alt)),
            ),
            Span::styled(favorite, button_style(app.favorite_button.style(), theme)),
            Span::styled(cart, button_style(app.cart_button.style(), theme)),
        ]);

        frame.render_widget(Paragraph::new(line), area);
    }
}

fn button_style(style: PressableStyle, theme: &Theme) -> Style {
    let mut s = Style::default()
        .fg(Theme::term(style.tint))
        .bg(Theme::term(theme.surface_alt));
    if style.scale > 1.02 {
        s = s.add_modifier(Modifier::BOLD);
    } else if style.scale < 0.98 {
        s = s.add_modifier(Modifier::DIM);
    }
    s
}
