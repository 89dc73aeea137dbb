//! Playback control methods

use crate::model::{SelectedItem, SongInfo};

use super::AppController;

impl AppController {
    pub async fn play_queue(&self, queue: Vec<SongInfo>, start: usize) {
        tracing::info!(len = queue.len(), start, "Starting new queue");
        self.player.set_queue(queue, start);
        self.model.lock().await.sync_player_cursors().await;
    }

    pub async fn toggle_playback(&self) {
        if self.player.snapshot().current.is_none() {
            self.model
                .lock()
                .await
                .set_error("Nothing to play. Pick a song first.".to_string())
                .await;
            return;
        }
        self.player.toggle_play_pause();
    }

    pub fn next_track(&self) {
        tracing::debug!("Skipping to next track");
        self.player.play_next();
    }

    pub fn previous_track(&self) {
        tracing::debug!("Going to previous track");
        self.player.play_previous();
    }

    /// Reload the current track from the start, playing
    pub fn restart_track(&self) {
        match self.player.snapshot().current {
            Some(track) => self.player.play_track(&track),
            None => tracing::debug!("Nothing to restart"),
        }
    }

    pub fn seek_forward(&self) {
        self.player.seek_forward();
    }

    pub fn seek_backward(&self) {
        self.player.seek_backward();
    }

    /// Digit keys jump to that tenth of the track
    pub fn seek_to_tenth(&self, digit: u32) {
        self.player.seek_to_fraction(digit.min(9) as f32 / 10.0);
    }

    pub fn toggle_shuffle(&self) {
        self.player.toggle_shuffle();
        tracing::info!(shuffle = self.player.snapshot().shuffle, "Shuffle toggled");
    }

    pub fn cycle_repeat(&self) {
        self.player.toggle_repeat_mode();
    }

    pub async fn toggle_favorite_selected(&self) {
        let model = self.model.lock().await;
        match model.get_selected_song().await {
            Some(song) => {
                self.player.toggle_favorite(&song);
                model.sync_player_cursors().await;
            }
            None => tracing::debug!("No song selected to favorite"),
        }
    }

    /// `next` queues the song right after the current one instead of appending
    /// it after the upcoming entries
    pub async fn queue_selected(&self, next: bool) {
        let model = self.model.lock().await;
        let Some(song) = model.get_selected_song().await else {
            return;
        };
        let Some(track) = SongInfo::from_song(&song) else {
            model.set_error(format!("\"{}\" has no playable stream", song.name)).await;
            return;
        };

        if next {
            self.player.play_next_track(track);
        } else {
            self.player.add_to_queue(track);
        }
    }

    pub async fn remove_selected_from_queue(&self) {
        let model = self.model.lock().await;
        if let Some(SelectedItem::QueueEntry { index }) = model.get_selected_content_item().await {
            self.player.remove_from_queue(index);
            model.sync_player_cursors().await;
        }
    }

    pub async fn clear_queue(&self) {
        self.player.clear_queue();
        self.model.lock().await.sync_player_cursors().await;
    }
}
