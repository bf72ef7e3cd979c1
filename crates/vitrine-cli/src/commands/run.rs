use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};
use tokio::sync::mpsc;
use tracing::info;

use vitrine_core::motion::FrameClock;
use vitrine_core::{Animated, AppConfig};
use vitrine_tui::{
    app::{App, CHIP_ROWS},
    catalog::spawn_catalog_load,
    event::{AppEvent, CatalogResult, EventHandler},
    input::handle_key_event,
    keymap::Keymap,
    load_theme,
    widgets::{BottomNavWidget, CardListWidget, ChipRowWidget, StatusBarWidget},
};

pub async fn run(config: Arc<AppConfig>) -> Result<()> {
    // Create keymap from config
    let keymap = Keymap::from_config(&config.keymap);

    // Load theme from config
    let theme = load_theme(&config.ui.theme);

    // Create app state before touching the terminal so config errors print normally
    let mut app = App::new(config.clone(), theme)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, SetTitle("Vitrine"))?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_loop(&mut terminal, &mut app, &keymap, &config).await;

    // Restore terminal even when the loop failed
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

async fn run_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    keymap: &Keymap,
    config: &AppConfig,
) -> Result<()> {
    let size = terminal.size()?;
    app.on_resize(size.width, size.height)?;

    let event_handler = EventHandler::new(config.ui.tick_rate_ms, config.motion.frame_interval());
    let latency = Duration::from_millis(config.ui.catalog_latency_ms);

    // Create channel for async catalog loads
    let (catalog_tx, mut catalog_rx) = mpsc::unbounded_channel::<CatalogResult>();
    app.request_reload();

    let mut clock = FrameClock::new();
    info!("Storefront started");

    // Main loop
    loop {
        if let Some(generation) = app.take_pending_load() {
            spawn_catalog_load(latency, generation, catalog_tx.clone());
        }

        // Process any completed catalog loads (non-blocking)
        while let Ok(result) = catalog_rx.try_recv() {
            app.on_catalog(result)?;
        }

        app.frame(clock.tick());

        terminal.draw(|frame| draw(frame, app))?;

        let animating = app.is_animating();
        if !animating {
            // The next frame after an idle wait starts from a zero delta
            clock.reset();
        }
        let event = event_handler.next(animating)?;

        if let Some(event) = event {
            match event {
                AppEvent::Key(key) => {
                    let action = handle_key_event(key, app, keymap);
                    app.handle_action(action)?;
                }
                AppEvent::Resize(width, height) => app.on_resize(width, height)?,
                AppEvent::Tick => {}
            }
        }

        if app.should_quit {
            app.dispose();
            info!("Storefront closed");
            break;
        }
    }

    Ok(())
}

fn draw(frame: &mut Frame, app: &App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(CHIP_ROWS), // Filter chips + pill
            Constraint::Min(0),            // Cards
            Constraint::Length(2),         // Bottom navigation
            Constraint::Length(1),         // Status bar
        ])
        .split(frame.area());

    ChipRowWidget::render(frame, rows[0], app);
    CardListWidget::render(frame, rows[1], app);
    BottomNavWidget::render(frame, rows[2], app);
    StatusBarWidget::render(frame, rows[3], app);
}
