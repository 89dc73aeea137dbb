//! Listener for events reported by the audio engine

use tokio::sync::mpsc::UnboundedReceiver;

use crate::audio::EngineEvent;
use super::AppController;

impl AppController {
    pub fn start_player_event_listener(&self, mut events: UnboundedReceiver<EngineEvent>) {
        let controller = self.clone();
        tracing::info!("Starting audio engine event listener");

        tokio::spawn(async move {
            while let Some(event) = events.recv().await {
                if controller.model.lock().await.should_quit().await {
                    tracing::debug!("Engine event listener shutting down");
                    break;
                }
                controller.handle_engine_event(event).await;
            }
        });
    }

    pub(crate) async fn handle_engine_event(&self, event: EngineEvent) {
        match event {
            EngineEvent::Started { url, duration_ms } => {
                tracing::debug!(%url, ?duration_ms, "EngineEvent::Started");
                if let Some(duration_ms) = duration_ms {
                    self.player.on_duration_discovered(&url, duration_ms);
                }
            }
            EngineEvent::Finished { url } => {
                // Track changes are driven by the player clock
                tracing::debug!(%url, "EngineEvent::Finished");
            }
            EngineEvent::Error(message) => {
                tracing::error!(error = %message, "EngineEvent::Error");
                self.model.lock().await.set_error(message).await;
            }
        }
    }
}
