//! Controller module - Application logic and event handling
//!
//! This module contains the application controller that handles user input,
//! coordinates between the model and view, and drives the player.
//! It is organized into submodules by responsibility:
//!
//! - `input`: Key event handling
//! - `playback`: Queue and transport actions
//! - `navigation`: Catalog fetches for screens, details and lyrics
//! - `player_events`: Audio engine event listener

mod input;
mod playback;
mod navigation;
mod player_events;

use std::sync::Arc;
use tokio::sync::Mutex;

use crate::config::AppConfig;
use crate::model::{AppModel, Catalog, CatalogError, PlayerController};

#[derive(Clone)]
pub struct AppController {
    pub(crate) model: Arc<Mutex<AppModel>>,
    pub(crate) player: PlayerController,
    pub(crate) config: Arc<AppConfig>,
}

impl AppController {
    pub fn new(model: Arc<Mutex<AppModel>>, player: PlayerController, config: AppConfig) -> Self {
        Self {
            model,
            player,
            config: Arc::new(config),
        }
    }

    pub(crate) async fn catalog(&self) -> Arc<dyn Catalog> {
        self.model.lock().await.catalog.clone()
    }

    pub(crate) fn format_error(error: &CatalogError) -> String {
        match error {
            CatalogError::Http(e) if e.is_timeout() => {
                "The catalog took too long to answer. Try again.".to_string()
            }
            CatalogError::Http(e) if e.is_connect() => {
                "Cannot reach the catalog. Check your connection.".to_string()
            }
            CatalogError::Status { status: 429, .. } => {
                "Rate limited. Please wait a moment.".to_string()
            }
            CatalogError::Status { status, .. } if *status >= 500 => {
                "The catalog is having trouble right now.".to_string()
            }
            other => format!("Error: {}", other),
        }
    }
}
