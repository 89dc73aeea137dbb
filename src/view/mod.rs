//! View module - UI rendering
//!
//! This module handles all UI rendering for the application using ratatui.
//! It is organized into submodules by component type:
//!
//! - `utils`: Shared utility functions (formatting, palette, scrollable lists)
//! - `layout`: Screen tabs and search box
//! - `content`: Main content area rendering
//! - `progress`: Mini player
//! - `overlays`: Modal overlays (error, help, lyrics)

mod utils;
mod layout;
mod content;
mod progress;
mod overlays;

use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::Style,
    widgets::Block,
    Frame,
};

use crate::model::{ContentState, PlayerSnapshot, UiState};
use utils::Palette;

pub struct AppView;

impl AppView {
    pub fn render(
        frame: &mut Frame,
        snapshot: &PlayerSnapshot,
        ui_state: &UiState,
        content_state: &ContentState,
    ) {
        let palette = Palette::for_theme(ui_state.theme);
        frame.render_widget(
            Block::default().style(Style::default().fg(palette.text).bg(palette.background)),
            frame.area(),
        );

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Tabs + search
                Constraint::Min(0),    // Main content
                Constraint::Length(3), // Mini player
            ])
            .split(frame.area());

        layout::render_top_bar(frame, chunks[0], ui_state, content_state, &palette);
        content::render_main_content(frame, chunks[1], ui_state, content_state, snapshot, &palette);
        progress::render_progress_bar(frame, chunks[2], snapshot, &palette);

        if ui_state.show_lyrics {
            overlays::render_lyrics_popup(frame, &content_state.lyrics, &palette);
        }

        if ui_state.show_help_popup {
            overlays::render_help_popup(frame, &palette);
        }

        // Errors draw last so they are never hidden
        if ui_state.error_message.is_some() {
            overlays::render_error_notification(frame, ui_state, &palette);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};

    use crate::model::{Screen, Song, SongInfo};

    fn draw(snapshot: &PlayerSnapshot, ui_state: &UiState, content_state: &ContentState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal
            .draw(|frame| AppView::render(frame, snapshot, ui_state, content_state))
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn songs_screen_marks_playing_song() {
        let mut content = ContentState::default();
        content.songs.results.data = vec![
            Song { id: "a".into(), name: "Tum Hi Ho".into(), ..Default::default() },
            Song { id: "b".into(), name: "Kesariya".into(), ..Default::default() },
        ];
        let ui = UiState { screen: Screen::Songs, ..Default::default() };
        let snapshot = PlayerSnapshot {
            current: Some(SongInfo {
                title: "Kesariya".into(),
                track_id: Some("b".into()),
                ..Default::default()
            }),
            queue: vec![SongInfo::default()],
            ..Default::default()
        };

        let screen = draw(&snapshot, &ui, &content);
        assert!(screen.contains("Tum Hi Ho"));
        assert!(screen.contains("▶2"));
        assert!(screen.contains("Queue: 1/1"));
    }

    #[test]
    fn error_popup_is_drawn() {
        let ui = UiState { error_message: Some("Cannot reach the catalog".into()), ..Default::default() };
        let screen = draw(&PlayerSnapshot::default(), &ui, &ContentState::default());
        assert!(screen.contains("Error (Esc to dismiss)"));
        assert!(screen.contains("Cannot reach the catalog"));
    }

    #[test]
    fn lyrics_popup_shows_fallback_text() {
        let ui = UiState { show_lyrics: true, ..Default::default() };
        let screen = draw(&PlayerSnapshot::default(), &ui, &ContentState::default());
        assert!(screen.contains("No lyrics available"));
    }
}
