mod bottom_nav;
mod card_list;
mod chip_row;
mod status_bar;

pub use bottom_nav::BottomNavWidget;
pub use card_list::CardListWidget;
pub use chip_row::ChipRowWidget;
pub use status_bar::StatusBarWidget;

use ratatui::layout::Rect;

/// One-row rect at a fractional column, clipped to `area`
fn span_rect(area: Rect, row: u16, position: f64, width: f64) -> Option<Rect> {
    if width < 0.5 || row >= area.height {
        return None;
    }
    let start = position.round().max(0.0) as u16;
    let end = (position + width).round().max(0.0) as u16;
    let start = start.min(area.width);
    let end = end.min(area.width);
    if end <= start {
        return None;
    }
    Some(Rect::new(area.x + start, area.y + row, end - start, 1))
}
