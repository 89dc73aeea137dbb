//! Main application model with state management

use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;

use super::catalog::Song;
use super::catalog_client::Catalog;
use super::content::{step_cursor, ContentState, DetailView};
use super::player::PlayerController;
use super::types::{
    ArtistDetailSection, Screen, SelectedItem, SuggestedSection, Theme, UiState,
};

const ERROR_DISPLAY_SECS: u64 = 5;

/// Main application model containing all state
pub struct AppModel {
    pub catalog: Arc<dyn Catalog>,
    pub player: PlayerController,
    pub ui_state: Arc<Mutex<UiState>>,
    pub content_state: Arc<Mutex<ContentState>>,
    pub should_quit: Arc<Mutex<bool>>,
}

impl AppModel {
    pub fn new(catalog: Arc<dyn Catalog>, player: PlayerController, content: ContentState) -> Self {
        Self {
            catalog,
            player,
            ui_state: Arc::new(Mutex::new(UiState::default())),
            content_state: Arc::new(Mutex::new(content)),
            should_quit: Arc::new(Mutex::new(false)),
        }
    }

    pub async fn should_quit(&self) -> bool {
        *self.should_quit.lock().await
    }

    pub async fn set_should_quit(&self, quit: bool) {
        *self.should_quit.lock().await = quit;
    }

    pub async fn get_ui_state(&self) -> UiState {
        self.ui_state.lock().await.clone()
    }

    pub async fn get_content_state(&self) -> ContentState {
        self.content_state.lock().await.clone()
    }

    // ========================================================================
    // Screens & search input
    // ========================================================================

    pub async fn current_screen(&self) -> Screen {
        self.ui_state.lock().await.screen
    }

    /// Switch tab; detail pages opened from the previous tab are closed
    pub async fn set_screen(&self, screen: Screen) {
        let mut ui = self.ui_state.lock().await;
        if ui.screen == screen {
            return;
        }
        tracing::debug!(from = ?ui.screen, to = ?screen, "Switching screen");
        ui.screen = screen;
        ui.search_focused = false;
        drop(ui);

        self.content_state.lock().await.close_details();
    }

    pub async fn next_screen(&self) {
        let screen = self.current_screen().await.next();
        self.set_screen(screen).await;
    }

    pub async fn prev_screen(&self) {
        let screen = self.current_screen().await.prev();
        self.set_screen(screen).await;
    }

    /// Focus the search box of the current screen, if it has one
    pub async fn focus_search(&self) -> bool {
        let mut ui = self.ui_state.lock().await;
        if !ui.screen.has_search() {
            return false;
        }
        ui.search_focused = true;
        drop(ui);

        self.content_state.lock().await.close_details();
        true
    }

    pub async fn unfocus_search(&self) {
        self.ui_state.lock().await.search_focused = false;
    }

    pub async fn is_search_focused(&self) -> bool {
        self.ui_state.lock().await.search_focused
    }

    pub async fn append_to_search(&self, c: char) {
        let screen = self.current_screen().await;
        let mut content = self.content_state.lock().await;
        if let Some(query) = search_query_mut(&mut content, screen) {
            query.push(c);
        }
    }

    pub async fn backspace_search(&self) {
        let screen = self.current_screen().await;
        let mut content = self.content_state.lock().await;
        if let Some(query) = search_query_mut(&mut content, screen) {
            query.pop();
        }
    }

    pub async fn get_search_query(&self) -> String {
        let screen = self.current_screen().await;
        let content = self.content_state.lock().await;
        match screen {
            Screen::Songs => content.songs.query.clone(),
            Screen::Artists => content.artists.query.clone(),
            Screen::Albums => content.albums.query.clone(),
            _ => String::new(),
        }
    }

    // ========================================================================
    // Errors & popups
    // ========================================================================

    pub async fn set_error(&self, message: String) {
        tracing::warn!(error = %message, "Showing error");
        let mut state = self.ui_state.lock().await;
        state.error_message = Some(message);
        state.error_timestamp = Some(Instant::now());
    }

    pub async fn clear_error(&self) {
        let mut state = self.ui_state.lock().await;
        state.error_message = None;
        state.error_timestamp = None;
    }

    pub async fn has_error(&self) -> bool {
        self.ui_state.lock().await.error_message.is_some()
    }

    pub async fn auto_clear_old_errors(&self) {
        let mut state = self.ui_state.lock().await;
        if let Some(timestamp) = state.error_timestamp {
            if timestamp.elapsed().as_secs() >= ERROR_DISPLAY_SECS {
                state.error_message = None;
                state.error_timestamp = None;
            }
        }
    }

    pub async fn show_help_popup(&self) {
        self.ui_state.lock().await.show_help_popup = true;
    }

    pub async fn hide_help_popup(&self) {
        self.ui_state.lock().await.show_help_popup = false;
    }

    pub async fn is_help_popup_open(&self) -> bool {
        self.ui_state.lock().await.show_help_popup
    }

    pub async fn show_lyrics_popup(&self) {
        self.ui_state.lock().await.show_lyrics = true;
    }

    pub async fn hide_lyrics_popup(&self) {
        self.ui_state.lock().await.show_lyrics = false;
        self.content_state.lock().await.lyrics.text.cancel();
    }

    pub async fn is_lyrics_popup_open(&self) -> bool {
        self.ui_state.lock().await.show_lyrics
    }

    pub async fn scroll_lyrics(&self, down: bool) {
        let mut content = self.content_state.lock().await;
        let lyrics = &mut content.lyrics;
        lyrics.scroll = if down {
            lyrics.scroll.saturating_add(1)
        } else {
            lyrics.scroll.saturating_sub(1)
        };
    }

    pub async fn toggle_theme(&self) -> Theme {
        let mut ui = self.ui_state.lock().await;
        ui.theme = ui.theme.toggle();
        ui.theme
    }

    // ========================================================================
    // Content navigation
    // ========================================================================

    pub async fn navigate_back(&self) -> bool {
        self.content_state.lock().await.navigate_back()
    }

    /// Switch between the sections of the Suggested screen or an artist page
    pub async fn cycle_section(&self, forward: bool) {
        let screen = self.current_screen().await;
        let mut content = self.content_state.lock().await;

        if let Some(DetailView::Artist(artist)) = content.current_detail_mut() {
            artist.section = artist.section.next();
            return;
        }

        if screen == Screen::Suggested {
            let suggested = &mut content.suggested;
            suggested.section = if forward {
                suggested.section.next()
            } else {
                suggested.section.prev()
            };
        }
    }

    pub async fn content_move_up(&self) {
        self.move_cursor(false).await;
    }

    pub async fn content_move_down(&self) {
        self.move_cursor(true).await;
    }

    async fn move_cursor(&self, forward: bool) {
        let screen = self.current_screen().await;
        let snapshot = self.player.snapshot();
        let mut content = self.content_state.lock().await;

        if let Some(detail) = content.current_detail_mut() {
            match detail {
                DetailView::Artist(artist) => artist.move_cursor(forward),
                DetailView::Album(album) => {
                    let len = album.songs().len();
                    step_cursor(&mut album.selected, len, forward);
                }
            }
            return;
        }

        match screen {
            Screen::Suggested => content.suggested.move_cursor(forward),
            Screen::Songs => {
                let songs = &mut content.songs;
                if songs.shows_recent() {
                    step_cursor(&mut songs.recent_selected, songs.recent.len(), forward);
                } else {
                    step_cursor(&mut songs.selected, songs.results.data.len(), forward);
                }
            }
            Screen::Artists => {
                let artists = &mut content.artists;
                step_cursor(&mut artists.selected, artists.results.data.len(), forward);
            }
            Screen::Albums => {
                let albums = &mut content.albums;
                step_cursor(&mut albums.selected, albums.results.data.len(), forward);
            }
            Screen::Favorites => {
                step_cursor(&mut content.favorites_selected, snapshot.favorites.len(), forward);
            }
            Screen::Queue => {
                step_cursor(&mut content.queue_selected, snapshot.queue.len(), forward);
            }
        }
    }

    /// Keep player-backed cursors inside their lists after the player changed
    pub async fn sync_player_cursors(&self) {
        let snapshot = self.player.snapshot();
        self.content_state
            .lock()
            .await
            .clamp_player_cursors(snapshot.queue.len(), snapshot.favorites.len());
    }

    pub async fn get_selected_content_item(&self) -> Option<SelectedItem> {
        let screen = self.current_screen().await;
        let content = self.content_state.lock().await;

        if let Some(detail) = content.current_detail() {
            return match detail {
                DetailView::Artist(artist) => match artist.section {
                    ArtistDetailSection::TopSongs => song_item(artist.top_songs(), artist.song_index),
                    ArtistDetailSection::Albums => artist
                        .top_albums()
                        .get(artist.album_index)
                        .map(|a| SelectedItem::Album { id: a.id.clone() }),
                },
                DetailView::Album(album) => song_item(album.songs(), album.selected),
            };
        }

        match screen {
            Screen::Suggested => {
                let suggested = &content.suggested;
                match suggested.section {
                    SuggestedSection::Trending => {
                        song_item(&suggested.trending.data, suggested.trending_index)
                    }
                    SuggestedSection::Albums => suggested
                        .albums
                        .data
                        .get(suggested.album_index)
                        .map(|a| SelectedItem::Album { id: a.id.clone() }),
                    SuggestedSection::Artists => suggested
                        .artists
                        .data
                        .get(suggested.artist_index)
                        .map(|a| SelectedItem::Artist { id: a.id.clone() }),
                    SuggestedSection::Charts => None,
                }
            }
            Screen::Songs => {
                let songs = &content.songs;
                if songs.shows_recent() {
                    songs
                        .recent
                        .items()
                        .get(songs.recent_selected)
                        .map(|q| SelectedItem::RecentSearch { query: q.clone() })
                } else {
                    song_item(&songs.results.data, songs.selected)
                }
            }
            Screen::Artists => content
                .artists
                .results
                .data
                .get(content.artists.selected)
                .map(|a| SelectedItem::Artist { id: a.id.clone() }),
            Screen::Albums => content
                .albums
                .results
                .data
                .get(content.albums.selected)
                .map(|a| SelectedItem::Album { id: a.id.clone() }),
            Screen::Favorites => {
                let favorites = self.player.snapshot().favorites;
                song_item(&favorites, content.favorites_selected)
            }
            Screen::Queue => {
                let len = self.player.snapshot().queue.len();
                (content.queue_selected < len)
                    .then_some(SelectedItem::QueueEntry { index: content.queue_selected })
            }
        }
    }

    /// The song under the cursor, for favorite/queue actions
    pub async fn get_selected_song(&self) -> Option<Song> {
        match self.get_selected_content_item().await? {
            SelectedItem::Song { songs, index } => songs.get(index).cloned(),
            _ => None,
        }
    }
}

fn song_item(songs: &[Song], index: usize) -> Option<SelectedItem> {
    (index < songs.len()).then(|| SelectedItem::Song { songs: songs.to_vec(), index })
}

fn search_query_mut(content: &mut ContentState, screen: Screen) -> Option<&mut String> {
    match screen {
        Screen::Songs => Some(&mut content.songs.query),
        Screen::Artists => Some(&mut content.artists.query),
        Screen::Albums => Some(&mut content.albums.query),
        _ => None,
    }
}
