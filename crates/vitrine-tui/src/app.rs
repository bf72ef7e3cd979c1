use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tracing::{debug, warn};
use unicode_width::UnicodeWidthStr;
use uuid::Uuid;
use vitrine_core::components::{BottomNav, CardList, FilterChip, Pressable};
use vitrine_core::motion::{
    scroll_channel, IndicatorConfig, OrchestratorBuilder, ScrollPublisher, ScrollState,
    SelectionIndicatorTracker, ValueId,
};
use vitrine_core::{Animated, AppConfig, Orchestrator, SpringConfig};

use crate::catalog::{Product, CATEGORIES};
use crate::event::CatalogResult;
use crate::input::Action;
use crate::theme::Theme;

/// Rows a card occupies including the gap below it
pub const CARD_PITCH: u16 = 5;
/// Rows drawn for a card
pub const CARD_HEIGHT: u16 = 4;
/// Rows above the list (chip row plus indicator)
pub const CHIP_ROWS: u16 = 2;
/// Rows below the list (nav indicator, nav labels, status bar)
pub const FOOTER_ROWS: u16 = 3;
/// Left margin of the chip row
pub const CHIP_MARGIN: u16 = 1;
/// Columns between chips
pub const CHIP_GAP: u16 = 1;

pub const TABS: [(&str, &str); 4] = [
    ("⌂", "Shop"),
    ("♥", "Favorites"),
    ("◫", "Cart"),
    ("☺", "Profile"),
];

/// Bottom navigation tabs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Shop,
    Favorites,
    Cart,
    Profile,
}

impl Tab {
    fn from_index(index: usize) -> Self {
        match index {
            1 => Tab::Favorites,
            2 => Tab::Cart,
            3 => Tab::Profile,
            _ => Tab::Shop,
        }
    }
}

/// Width of a chip drawn as "▏✓ label▕"
pub fn chip_extent(label: &str) -> u16 {
    label.width() as u16 + 4
}

/// Width of a tab drawn as " ⌂ label "
pub fn tab_extent(label: &str) -> u16 {
    label.width() as u16 + 4
}

/// Application state
pub struct App {
    /// Application configuration
    pub config: Arc<AppConfig>,
    pub theme: Theme,
    /// Latest catalog, in load order
    pub products: Vec<Product>,
    /// Indices into `products` shown as cards
    pub visible: Vec<usize>,
    /// Focused card
    pub cursor: usize,
    pub favorites: HashSet<Uuid>,
    pub cart: Vec<Uuid>,
    pub chips: Vec<FilterChip>,
    pub chip_indicator: SelectionIndicatorTracker<usize>,
    pub cards: CardList,
    pub nav: BottomNav,
    pub favorite_button: Pressable,
    pub cart_button: Pressable,
    /// Scroll position in rows, eased toward the cursor
    scroll: Orchestrator<f64>,
    scroll_offset: ValueId,
    publisher: ScrollPublisher,
    /// Rows available to the card list
    pub list_rows: u16,
    pub width: u16,
    /// A catalog load is in flight
    pub loading: bool,
    catalog_generation: u64,
    pending_load: Option<u64>,
    /// Whether the app should quit
    pub should_quit: bool,
    /// Status message
    pub status_message: Option<String>,
    /// Pending key for multi-key sequences (e.g., 'gg')
    pub pending_key: Option<char>,
}

impl App {
    pub fn new(config: Arc<AppConfig>, theme: Theme) -> Result<Self> {
        let motion = &config.motion;
        motion.validate()?;

        let palette = theme.chip_palette();
        let chips = CATEGORIES
            .iter()
            .map(|label| FilterChip::new(*label, palette, motion))
            .collect::<vitrine_core::Result<Vec<_>>>()?;

        let mut chip_indicator = SelectionIndicatorTracker::new(
            "chip-indicator",
            (0..CATEGORIES.len()).collect(),
            IndicatorConfig {
                gap: CHIP_GAP as f64,
                estimated_extent: motion.indicator.estimated_extent,
            },
            motion.selection,
        )?;
        let mut offset = CHIP_MARGIN;
        for (i, label) in CATEGORIES.iter().enumerate() {
            let extent = chip_extent(label);
            chip_indicator.update_layout(i, offset as f64, extent as f64)?;
            offset += extent + CHIP_GAP;
        }

        let labels: Vec<&str> = TABS.iter().map(|(_, label)| *label).collect();
        let mut nav = BottomNav::new(&labels, motion.indicator, motion)?;
        nav.select(0)?;

        let (publisher, reader) = scroll_channel(ScrollState::default());
        let cards = CardList::new(motion, reader)?;

        let mut b = OrchestratorBuilder::new("scroll");
        let scroll_offset = b.value(0.0);
        let scroll = b.build(move |v| v.get(scroll_offset));

        let favorite_button = Pressable::new("favorite", theme.muted, theme.favorite, motion)?;
        let cart_button = Pressable::new("cart", theme.muted, theme.success, motion)?;

        Ok(Self {
            config,
            theme,
            products: Vec::new(),
            visible: Vec::new(),
            cursor: 0,
            favorites: HashSet::new(),
            cart: Vec::new(),
            chips,
            chip_indicator,
            cards,
            nav,
            favorite_button,
            cart_button,
            scroll,
            scroll_offset,
            publisher,
            list_rows: 0,
            width: 0,
            loading: false,
            catalog_generation: 0,
            pending_load: None,
            should_quit: false,
            status_message: None,
            pending_key: None,
        })
    }

    /// Dispatch one input action
    pub fn handle_action(&mut self, action: Action) -> Result<()> {
        if action != Action::PendingG {
            self.clear_pending_key();
        }
        match action {
            Action::Quit => self.should_quit = true,
            Action::MoveDown => self.move_cursor(1),
            Action::MoveUp => self.move_cursor(-1),
            Action::ScrollHalfPageDown => self.move_cursor(self.half_page()),
            Action::ScrollHalfPageUp => self.move_cursor(-self.half_page()),
            Action::JumpToTop => self.set_cursor(0),
            Action::JumpToBottom => self.set_cursor(self.visible.len().saturating_sub(1)),
            Action::PendingG => self.pending_key = Some('g'),
            Action::NextFilter => {
                let next = self
                    .selected_filter()
                    .map_or(0, |i| (i + 1) % self.chips.len());
                self.select_filter(Some(next))?;
            }
            Action::PrevFilter => {
                let len = self.chips.len();
                let prev = self.selected_filter().map_or(len - 1, |i| (i + len - 1) % len);
                self.select_filter(Some(prev))?;
            }
            Action::ClearFilter => self.select_filter(None)?,
            Action::NextTab => {
                self.nav.select_next()?;
                self.refresh_visible()?;
            }
            Action::PrevTab => {
                self.nav.select_prev()?;
                self.refresh_visible()?;
            }
            Action::Press => self.press_focused()?,
            Action::ToggleFavorite => self.toggle_favorite()?,
            Action::AddToCart => self.add_to_cart()?,
            Action::Reload => self.request_reload(),
            Action::ExitMode => self.clear_status(),
            Action::None => {}
        }
        Ok(())
    }

    pub fn selected_filter(&self) -> Option<usize> {
        self.chip_indicator.selected().copied()
    }

    pub fn tab(&self) -> Tab {
        Tab::from_index(self.nav.selected().unwrap_or(0))
    }

    /// Product behind card `index`
    pub fn product(&self, index: usize) -> Option<&Product> {
        self.visible.get(index).and_then(|&i| self.products.get(i))
    }

    pub fn focused_product(&self) -> Option<&Product> {
        self.product(self.cursor)
    }

    pub fn is_favorite(&self, product: &Product) -> bool {
        self.favorites.contains(&product.id)
    }

    pub fn in_cart(&self, product: &Product) -> bool {
        self.cart.contains(&product.id)
    }

    /// Current animated scroll position in rows
    pub fn scroll_rows(&self) -> f64 {
        *self.scroll.snapshot()
    }

    /// Convert parallax units (one `unit` per card) to rows
    pub fn units_to_rows(&self, units: f64) -> f64 {
        units * CARD_PITCH as f64 / self.config.motion.parallax.unit
    }

    fn rows_to_units(&self, rows: f64) -> f64 {
        rows * self.config.motion.parallax.unit / CARD_PITCH as f64
    }

    /// Re-measure after a terminal resize
    pub fn on_resize(&mut self, width: u16, height: u16) -> Result<()> {
        self.width = width;
        self.list_rows = height.saturating_sub(CHIP_ROWS + FOOTER_ROWS);

        let slot = width / TABS.len() as u16;
        for (i, (_, label)) in TABS.iter().enumerate() {
            let extent = tab_extent(label).min(slot);
            let offset = i as u16 * slot + (slot - extent) / 2;
            self.nav.update_layout(i, offset as f64, extent as f64)?;
        }

        self.scroll_to_cursor()?;
        self.publish_scroll();
        Ok(())
    }

    /// Take the generation of a catalog load the host should start
    pub fn take_pending_load(&mut self) -> Option<u64> {
        self.pending_load.take()
    }

    /// Ask the host for a fresh catalog
    pub fn request_reload(&mut self) {
        self.catalog_generation += 1;
        self.pending_load = Some(self.catalog_generation);
        self.loading = true;
        self.set_status("Loading catalog…");
    }

    pub fn on_catalog(&mut self, result: CatalogResult) -> Result<()> {
        match result {
            CatalogResult::Loaded {
                generation,
                products,
            } => {
                if generation != self.catalog_generation {
                    debug!(generation, current = self.catalog_generation, "Dropping stale catalog");
                    return Ok(());
                }
                self.products = products;
                self.loading = false;
                self.clear_status();
                self.refresh_visible()
            }
        }
    }

    fn select_filter(&mut self, next: Option<usize>) -> Result<()> {
        let prev = self.selected_filter();
        if prev == next {
            return Ok(());
        }
        if let Some(i) = prev {
            self.chips[i].set_selected(false)?;
        }
        if let Some(i) = next {
            self.chips[i].set_selected(true)?;
            self.chips[i].tap()?;
        }
        self.chip_indicator.select(next)?;
        self.refresh_visible()
    }

    /// Rebuild the card list for the active tab and filter
    ///
    /// Remounting replays the staggered entry from the first card.
    fn refresh_visible(&mut self) -> Result<()> {
        let category = self.selected_filter().map(|i| CATEGORIES[i]);
        let tab = self.tab();
        self.visible = self
            .products
            .iter()
            .enumerate()
            .filter(|(_, p)| category.map_or(true, |c| p.category == c))
            .filter(|(_, p)| match tab {
                Tab::Shop => true,
                Tab::Favorites => self.favorites.contains(&p.id),
                Tab::Cart => self.cart.contains(&p.id),
                Tab::Profile => false,
            })
            .map(|(i, _)| i)
            .collect();
        debug!(count = self.visible.len(), ?tab, ?category, "Visible products changed");

        self.cards.mount(self.visible.len())?;
        self.cursor = 0;
        self.scroll_to_cursor()?;
        self.sync_buttons()
    }

    fn half_page(&self) -> isize {
        ((self.list_rows / CARD_PITCH / 2).max(1)) as isize
    }

    fn move_cursor(&mut self, delta: isize) {
        let next = (self.cursor as isize + delta).max(0) as usize;
        self.set_cursor(next);
    }

    fn set_cursor(&mut self, index: usize) {
        if self.visible.is_empty() {
            return;
        }
        let index = index.min(self.visible.len() - 1);
        if index == self.cursor {
            return;
        }
        self.cursor = index;
        if let Err(e) = self.scroll_to_cursor().and_then(|_| self.sync_buttons()) {
            warn!("Cursor move failed: {}", e);
        }
    }

    /// Retarget the scroll spring so the focused card is fully visible
    fn scroll_to_cursor(&mut self) -> Result<()> {
        let content = self.visible.len() as f64 * CARD_PITCH as f64;
        let viewport = self.list_rows as f64;
        let max = (content - viewport).max(0.0);

        let top = self.cursor as f64 * CARD_PITCH as f64;
        let bottom = top + CARD_HEIGHT as f64;
        let current = self.scroll.value(self.scroll_offset).map_or(0.0, |v| v.target());
        let target = if top < current {
            top
        } else if bottom > current + viewport {
            bottom - viewport
        } else {
            current
        }
        .clamp(0.0, max);

        self.scroll
            .retarget(self.scroll_offset, target, SpringConfig::critically_damped(260.0))?;
        Ok(())
    }

    fn publish_scroll(&mut self) {
        let content = self.visible.len() as f64 * CARD_PITCH as f64;
        let state = ScrollState::new(
            self.rows_to_units(self.scroll_rows()),
            self.rows_to_units(content),
            self.rows_to_units(self.list_rows as f64),
        );
        self.publisher.publish(state);
    }

    /// Keep the action buttons in step with the focused product
    fn sync_buttons(&mut self) -> Result<()> {
        let (favorite, carted) = match self.focused_product() {
            Some(p) => (self.is_favorite(p), self.in_cart(p)),
            None => (false, false),
        };
        self.favorite_button.set_toggled(favorite)?;
        self.cart_button.set_toggled(carted)?;
        Ok(())
    }

    fn press_focused(&mut self) -> Result<()> {
        let Some(product) = self.focused_product() else {
            return Ok(());
        };
        let status = format!("{} · {}", product.name, product.price_label());
        self.cards.tap(self.cursor)?;
        self.set_status(status);
        Ok(())
    }

    fn toggle_favorite(&mut self) -> Result<()> {
        let Some(product) = self.focused_product() else {
            return Ok(());
        };
        let (id, name) = (product.id, product.name.clone());
        let now_favorite = if self.favorites.remove(&id) {
            false
        } else {
            self.favorites.insert(id);
            true
        };
        self.favorite_button.tap()?;
        self.favorite_button.set_toggled(now_favorite)?;
        self.set_status(if now_favorite {
            format!("Saved {}", name)
        } else {
            format!("Removed {} from favorites", name)
        });
        Ok(())
    }

    fn add_to_cart(&mut self) -> Result<()> {
        let Some(product) = self.focused_product() else {
            return Ok(());
        };
        let (id, name) = (product.id, product.name.clone());
        self.cart_button.tap()?;
        if self.cart.contains(&id) {
            self.set_status(format!("{} is already in the cart", name));
            return Ok(());
        }
        self.cart.push(id);
        self.cart_button.set_toggled(true)?;
        self.set_status(format!("Added {} to cart ({})", name, self.cart.len()));
        Ok(())
    }

    /// Set a status message
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    /// Clear the status message
    pub fn clear_status(&mut self) {
        self.status_message = None;
    }

    /// Clear the pending key
    pub fn clear_pending_key(&mut self) {
        self.pending_key = None;
    }
}

impl Animated for App {
    fn frame(&mut self, dt: Duration) -> bool {
        let mut changed = false;
        // Publish before the cards step so they see this frame's offset
        if self.scroll.frame(dt) {
            self.publish_scroll();
            changed = true;
        }
        changed |= self.cards.frame(dt);
        for chip in &mut self.chips {
            changed |= chip.frame(dt);
        }
        changed |= self.chip_indicator.frame(dt);
        changed |= self.nav.frame(dt);
        changed |= self.favorite_button.frame(dt);
        changed |= self.cart_button.frame(dt);
        changed
    }

    fn is_animating(&self) -> bool {
        self.scroll.is_animating()
            || self.cards.is_animating()
            || self.chips.iter().any(|c| c.is_animating())
            || self.chip_indicator.is_animating()
            || self.nav.is_animating()
            || self.favorite_button.is_animating()
            || self.cart_button.is_animating()
    }

    fn dispose(&mut self) {
        self.scroll.dispose();
        self.cards.dispose();
        for chip in &mut self.chips {
            chip.dispose();
        }
        self.chip_indicator.dispose();
        self.nav.dispose();
        self.favorite_button.dispose();
        self.cart_button.dispose();
    }

    fn is_disposed(&self) -> bool {
        self.cards.is_disposed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;

    const FRAME: Duration = Duration::from_micros(16_667);

    fn app() -> App {
        let mut app = App::new(Arc::new(AppConfig::default()), Theme::default()).unwrap();
        app.on_resize(80, 30).unwrap();
        app.request_reload();
        let generation = app.take_pending_load().unwrap();
        app.on_catalog(CatalogResult::Loaded {
            generation,
            products: catalog::sample_products(),
        })
        .unwrap();
        app
    }

    fn settle(app: &mut App) {
        for _ in 0..600 {
            app.frame(FRAME);
        }
    }

    #[test]
    fn test_catalog_mounts_all_cards() {
        let mut app = app();
        assert!(!app.loading);
        assert_eq!(app.visible.len(), catalog::sample_products().len());
        assert_eq!(app.cards.len(), app.visible.len());
        assert!(app.is_animating());
        settle(&mut app);
        assert!(!app.is_animating());
        assert_eq!(app.cards.style(0).unwrap().opacity, 1.0);
    }

    #[test]
    fn test_stale_catalog_is_dropped() {
        let mut app = app();
        app.request_reload();
        app.request_reload();
        let stale = CatalogResult::Loaded {
            generation: 2,
            products: Vec::new(),
        };
        app.on_catalog(stale).unwrap();
        assert!(app.loading);
        assert_eq!(app.visible.len(), catalog::sample_products().len());
    }

    #[test]
    fn test_filter_cycles_and_moves_indicator() {
        let mut app = app();
        app.handle_action(Action::NextFilter).unwrap();
        assert_eq!(app.selected_filter(), Some(0));
        assert!(app.chips[0].is_selected());
        assert!(app.visible.iter().all(|&i| app.products[i].category == "Shoes"));

        app.handle_action(Action::NextFilter).unwrap();
        assert!(!app.chips[0].is_selected());
        settle(&mut app);
        // "Shoes" chip is 9 wide, starting after the margin
        let expected = (CHIP_MARGIN + chip_extent("Shoes") + CHIP_GAP) as f64;
        assert_eq!(app.chip_indicator.style().position, expected);
        assert_eq!(app.chip_indicator.style().width, chip_extent("Bags") as f64);

        app.handle_action(Action::ClearFilter).unwrap();
        settle(&mut app);
        assert_eq!(app.selected_filter(), None);
        assert_eq!(app.chip_indicator.style().width, 0.0);
        assert_eq!(app.visible.len(), app.products.len());
    }

    #[test]
    fn test_prev_filter_wraps_from_none() {
        let mut app = app();
        app.handle_action(Action::PrevFilter).unwrap();
        assert_eq!(app.selected_filter(), Some(CATEGORIES.len() - 1));
    }

    #[test]
    fn test_cursor_scrolls_list() {
        let mut app = app();
        settle(&mut app);
        app.handle_action(Action::JumpToBottom).unwrap();
        settle(&mut app);
        let content = app.visible.len() as f64 * CARD_PITCH as f64;
        let expected = (content - app.list_rows as f64).min(
            (app.cursor as f64 * CARD_PITCH as f64 + CARD_HEIGHT as f64) - app.list_rows as f64,
        );
        assert!((app.scroll_rows() - expected).abs() < 0.05);

        app.handle_action(Action::PendingG).unwrap();
        assert_eq!(app.pending_key, Some('g'));
        app.handle_action(Action::JumpToTop).unwrap();
        assert_eq!(app.pending_key, None);
        settle(&mut app);
        assert!(app.scroll_rows().abs() < 0.05);
    }

    #[test]
    fn test_favorites_tab_shows_saved_products() {
        let mut app = app();
        app.handle_action(Action::MoveDown).unwrap();
        let saved = app.focused_product().unwrap().id;
        app.handle_action(Action::ToggleFavorite).unwrap();
        assert!(app.favorite_button.is_toggled());

        app.handle_action(Action::NextTab).unwrap();
        assert_eq!(app.tab(), Tab::Favorites);
        assert_eq!(app.visible.len(), 1);
        assert_eq!(app.focused_product().unwrap().id, saved);
    }

    #[test]
    fn test_add_to_cart_once() {
        let mut app = app();
        app.handle_action(Action::AddToCart).unwrap();
        app.handle_action(Action::AddToCart).unwrap();
        assert_eq!(app.cart.len(), 1);
        assert!(app.cart_button.is_toggled());
        app.handle_action(Action::MoveDown).unwrap();
        assert!(!app.cart_button.is_toggled());
    }

    #[test]
    fn test_reload_keeps_favorites() {
        let mut app = app();
        app.handle_action(Action::ToggleFavorite).unwrap();
        app.handle_action(Action::Reload).unwrap();
        let generation = app.take_pending_load().unwrap();
        app.on_catalog(CatalogResult::Loaded {
            generation,
            products: catalog::sample_products(),
        })
        .unwrap();
        assert!(app.favorite_button.is_toggled());
    }

    #[test]
    fn test_profile_tab_is_empty_and_ignores_actions() {
        let mut app = app();
        app.handle_action(Action::PrevTab).unwrap();
        assert_eq!(app.tab(), Tab::Profile);
        assert!(app.visible.is_empty());
        app.handle_action(Action::Press).unwrap();
        app.handle_action(Action::ToggleFavorite).unwrap();
        assert!(app.favorites.is_empty());
    }

    #[test]
    fn test_resize_measures_nav_tabs() {
        let mut app = app();
        app.on_resize(100, 30).unwrap();
        let layout = app.nav.tracker().layout(1).unwrap();
        assert!(layout.is_measured());
        assert_eq!(layout.measured_offset, Some(25.0 + (25.0 - 13.0) / 2.0));
    }

    #[test]
    fn test_dispose_stops_everything() {
        let mut app = app();
        app.dispose();
        assert!(!app.is_animating());
        assert!(!app.frame(FRAME));
    }
}
