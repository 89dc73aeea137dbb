mod audio;
mod config;
mod controller;
mod logging;
mod model;
mod view;

use std::io;
use std::sync::Arc;
use anyhow::Result;
use std::time::Duration;
use tokio::sync::{watch, Mutex};
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use view::AppView;
use audio::AudioBackend;
use controller::AppController;
use model::{AppModel, CatalogClient, ContentState, PlayerController, PlayerSnapshot};

#[tokio::main]
async fn main() -> Result<()> {
    if let Err(e) = logging::init_logging() {
        eprintln!("Warning: Failed to initialize logging: {}", e);
    }

    tracing::info!("=== saavn-rs starting ===");

    let config = config::load_config();
    tracing::debug!(?config, "Configuration loaded");

    let catalog = CatalogClient::new(&config.base_url)?;
    tracing::info!(base_url = %catalog.base_url(), "Catalog client ready");

    let (audio_backend, engine_events) = AudioBackend::start()?;
    tracing::info!(device = AudioBackend::get_device_name(), "Audio backend ready");
    let player = PlayerController::new(Arc::new(audio_backend));
    let player_state = player.subscribe();

    let content = ContentState::new(
        &config.preload_song_query,
        &config.preload_artist_query,
        &config.preload_album_query,
    );
    let model = Arc::new(Mutex::new(AppModel::new(Arc::new(catalog), player.clone(), content)));

    let controller = AppController::new(model.clone(), player, config);
    controller.start_player_event_listener(engine_events);

    let controller_for_preload = controller.clone();
    tokio::spawn(async move {
        controller_for_preload.preload_screens().await;
    });

    tracing::info!("Starting TUI...");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, model, controller, player_state).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!(error = ?err, "Application error");
    }

    tracing::info!("saavn-rs shutting down");
    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    model: Arc<Mutex<AppModel>>,
    controller: AppController,
    mut player_state: watch::Receiver<PlayerSnapshot>,
) -> io::Result<()> {
    loop {
        let snapshot = player_state.borrow_and_update().clone();
        let (ui_state, content_state, should_quit) = {
            let model_guard = model.lock().await;

            // Errors dismiss themselves after a few seconds
            model_guard.auto_clear_old_errors().await;

            (
                model_guard.get_ui_state().await,
                model_guard.get_content_state().await,
                model_guard.should_quit().await,
            )
        };

        if should_quit {
            break;
        }

        terminal.draw(|f| {
            AppView::render(f, &snapshot, &ui_state, &content_state);
        })?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if let Err(e) = controller.handle_key_event(key).await {
                    tracing::warn!(error = %e, "Key handling failed");
                }
            }
        }
    }

    Ok(())
}
