use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::app::{App, Tab, CARD_HEIGHT, CARD_PITCH};
use crate::theme::Theme;

/// Cards this faint are not drawn at all
const MIN_VISIBLE_OPACITY: f64 = 0.02;

pub struct CardListWidget;

impl CardListWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let theme = &app.theme;
        frame.render_widget(
            Paragraph::new("").style(Style::default().bg(Theme::term(theme.bg))),
            area,
        );

        if app.visible.is_empty() {
            Self::render_empty(frame, area, app);
            return;
        }

        let scroll = app.scroll_rows();
        for (i, style) in app.cards.styles().into_iter().enumerate() {
            let (Some(style), Some(product)) = (style, app.product(i)) else {
                continue;
            };
            if style.opacity < MIN_VISIBLE_OPACITY {
                continue;
            }

            let top = i as f64 * CARD_PITCH as f64 - scroll + app.units_to_rows(style.translate_y);
            let Some(rect) = card_rect(area, top, style.scale) else {
                continue;
            };

            let fade = |c| theme.faded(c, style.opacity);
            let focused = i == app.cursor;
            let border = if focused { theme.accent } else { theme.border };
            let mut title = Style::default().fg(fade(theme.fg));
            if focused {
                title = title.add_modifier(Modifier::BOLD);
            }

            let block = Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(fade(border)))
                .title(Span::styled(format!(" {} ", product.name), title))
                .style(Style::default().bg(Theme::term(theme.bg)));
            let inner = block.inner(rect);
            frame.render_widget(block, rect);

            let price = product.price_label();
            let category = &product.category;
            let gap = (inner.width as usize).saturating_sub(category.width() + price.width() + 2);
            let stars = (product.rating.round() as usize).min(5);
            let mut markers = String::new();
            if app.is_favorite(product) {
                markers.push_str(" ♥");
            }
            if app.in_cart(product) {
                markers.push_str(" ◫");
            }

            let lines = vec![
                Line::from(vec![
                    Span::raw(" "),
                    Span::styled(category.as_str(), Style::default().fg(fade(theme.muted))),
                    Span::raw(" ".repeat(gap)),
                    Span::styled(price, Style::default().fg(fade(theme.price))),
                ]),
                Line::from(vec![
                    Span::raw(" "),
                    Span::styled(
                        format!("{}{} {:.1}", "★".repeat(stars), "☆".repeat(5 - stars), product.rating),
                        Style::default().fg(fade(theme.muted)),
                    ),
                    Span::styled(markers, Style::default().fg(fade(theme.favorite))),
                ]),
            ];
            frame.render_widget(Paragraph::new(lines), inner);
        }
    }

    fn render_empty(frame: &mut Frame, area: Rect, app: &App) {
        if area.height == 0 {
            return;
        }
        let message = if app.loading {
            "Loading catalog…"
        } else {
            match app.tab() {
                Tab::Favorites => "No favorites yet. Press f on a product to save it.",
                Tab::Cart => "Your cart is empty.",
                Tab::Profile => "Signed in as guest.",
                Tab::Shop => "No products match this filter.",
            }
        };
        frame.render_widget(
            Paragraph::new(message)
                .alignment(Alignment::Center)
                .style(Style::default().fg(Theme::term(app.theme.muted))),
            Rect::new(area.x, area.y + area.height / 2, area.width, 1),
        );
    }
}

/// Screen rect for a card whose top edge sits `top` rows into the list
///
/// Scale insets the card horizontally; rows outside the list are clipped.
fn card_rect(area: Rect, top: f64, scale: f64) -> Option<Rect> {
    let inset = (((1.0 - scale) * area.width as f64) / 2.0).round().max(0.0) as u16;
    let width = area.width.saturating_sub(inset * 2);
    let top = top.round() as i32;
    let bottom = top + CARD_HEIGHT as i32;
    let visible_top = top.max(0);
    let visible_bottom = bottom.min(area.height as i32);
    if width < 4 || visible_bottom <= visible_top {
        return None;
    }
    Some(Rect::new(
        area.x + inset,
        area.y + visible_top as u16,
        width,
        (visible_bottom - visible_top) as u16,
    ))
}
