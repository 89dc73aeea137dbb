//! Key event handling

use std::future::Future;

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::model::{Screen, SelectedItem};
use super::AppController;

impl AppController {
    pub async fn handle_key_event(&self, key: KeyEvent) -> Result<()> {
        if key.kind != KeyEventKind::Press {
            return Ok(());
        }

        let model = self.model.lock().await;

        // Handle error message first (blocks all other interactions)
        if model.has_error().await {
            if matches!(key.code, KeyCode::Esc | KeyCode::Enter) {
                model.clear_error().await;
            }
            return Ok(());
        }

        if model.is_help_popup_open().await {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('h') | KeyCode::Char('H')) {
                model.hide_help_popup().await;
            }
            return Ok(());
        }

        if model.is_lyrics_popup_open().await {
            match key.code {
                KeyCode::Esc | KeyCode::Char('y') | KeyCode::Char('Y') => {
                    model.hide_lyrics_popup().await
                }
                KeyCode::Up => model.scroll_lyrics(false).await,
                KeyCode::Down => model.scroll_lyrics(true).await,
                _ => {}
            }
            return Ok(());
        }

        // Typing into the search box
        if model.is_search_focused().await {
            match key.code {
                KeyCode::Enter => {
                    drop(model);
                    self.spawn_task(|controller| async move { controller.submit_search().await });
                }
                KeyCode::Esc => model.unfocus_search().await,
                KeyCode::Backspace => model.backspace_search().await,
                KeyCode::Tab => model.next_screen().await,
                KeyCode::BackTab => model.prev_screen().await,
                KeyCode::Char(c) => {
                    // Ctrl+Q still quits while typing
                    if (c == 'q' || c == 'Q') && key.modifiers.contains(KeyModifiers::CONTROL) {
                        model.set_should_quit(true).await;
                    } else {
                        model.append_to_search(c).await;
                    }
                }
                _ => {}
            }
            return Ok(());
        }

        let screen = model.current_screen().await;

        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                model.set_should_quit(true).await;
            }
            KeyCode::Tab if key.modifiers.contains(KeyModifiers::SHIFT) => {
                model.prev_screen().await;
            }
            KeyCode::Tab => model.next_screen().await,
            KeyCode::BackTab => model.prev_screen().await,
            KeyCode::Char('/') => {
                model.focus_search().await;
            }
            KeyCode::Up => model.content_move_up().await,
            KeyCode::Down => model.content_move_down().await,
            KeyCode::Char('[') => model.cycle_section(false).await,
            KeyCode::Char(']') => model.cycle_section(true).await,
            KeyCode::Enter => {
                let selected = model.get_selected_content_item().await;
                drop(model);
                if let Some(item) = selected {
                    self.spawn_task(|controller| async move {
                        controller.handle_selected_item(item).await
                    });
                }
            }
            KeyCode::Esc | KeyCode::Backspace => {
                model.navigate_back().await;
            }
            // Transport
            KeyCode::Char(' ') => {
                drop(model);
                self.toggle_playback().await;
            }
            KeyCode::Char('n') | KeyCode::Char('N') => self.next_track(),
            KeyCode::Char('p') | KeyCode::Char('P') => self.previous_track(),
            KeyCode::Right => self.seek_forward(),
            KeyCode::Left => self.seek_backward(),
            KeyCode::Home => self.restart_track(),
            KeyCode::Char(c) if c.is_ascii_digit() => {
                if let Some(digit) = c.to_digit(10) {
                    self.seek_to_tenth(digit);
                }
            }
            KeyCode::Char('s') | KeyCode::Char('S') => self.toggle_shuffle(),
            KeyCode::Char('r') | KeyCode::Char('R') => self.cycle_repeat(),
            // Queue & favorites
            KeyCode::Char('f') | KeyCode::Char('F') => {
                drop(model);
                self.toggle_favorite_selected().await;
            }
            KeyCode::Char('a') => {
                drop(model);
                self.queue_selected(false).await;
            }
            KeyCode::Char('A') => {
                drop(model);
                self.queue_selected(true).await;
            }
            KeyCode::Delete | KeyCode::Char('x') | KeyCode::Char('X') => match screen {
                Screen::Queue => {
                    drop(model);
                    self.remove_selected_from_queue().await;
                }
                Screen::Songs => {
                    if let Some(SelectedItem::RecentSearch { query }) =
                        model.get_selected_content_item().await
                    {
                        model.content_state.lock().await.songs.remove_recent(&query);
                    }
                }
                _ => {}
            },
            KeyCode::Char('c') => {
                drop(model);
                self.clear_queue().await;
            }
            KeyCode::Char('C') if screen == Screen::Songs => {
                model.content_state.lock().await.songs.clear_recent();
            }
            // Popups & appearance
            KeyCode::Char('y') | KeyCode::Char('Y') => {
                drop(model);
                self.spawn_task(|controller| async move { controller.show_lyrics().await });
            }
            KeyCode::Char('t') | KeyCode::Char('T') => {
                let theme = model.toggle_theme().await;
                tracing::debug!(?theme, "Theme toggled");
            }
            KeyCode::Char('h') | KeyCode::Char('H') => {
                model.show_help_popup().await;
            }
            _ => {}
        }
        Ok(())
    }

    /// Run a catalog-bound action without blocking the input loop
    fn spawn_task<F, Fut>(&self, task: F)
    where
        F: FnOnce(AppController) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        tokio::spawn(task(self.clone()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::test_support::controller;
    use crate::model::SongInfo;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn track(n: usize) -> SongInfo {
        SongInfo {
            url: format!("https://cdn/{n}.mp4"),
            title: format!("Track {n}"),
            duration_ms: 100_000,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn typing_goes_to_search_box_until_escape() {
        let controller = controller();
        controller.model.lock().await.set_screen(Screen::Songs).await;

        for code in [KeyCode::Char('/'), KeyCode::Char('q'), KeyCode::Char('n')] {
            controller.handle_key_event(press(code)).await.unwrap();
        }
        let model = controller.model.lock().await;
        assert_eq!(model.get_search_query().await, "qn");
        assert!(!model.should_quit().await);
        drop(model);

        controller.handle_key_event(press(KeyCode::Esc)).await.unwrap();
        controller.handle_key_event(press(KeyCode::Char('q'))).await.unwrap();
        assert!(controller.model.lock().await.should_quit().await);
    }

    #[tokio::test]
    async fn transport_keys_drive_player() {
        let controller = controller();
        controller.play_queue(vec![track(0), track(1)], 0).await;

        controller.handle_key_event(press(KeyCode::Char('n'))).await.unwrap();
        assert_eq!(controller.player.snapshot().current_index, 1);

        controller.handle_key_event(press(KeyCode::Char('5'))).await.unwrap();
        assert_eq!(controller.player.snapshot().transport.position_ms, 50_000);

        controller.handle_key_event(press(KeyCode::Left)).await.unwrap();
        assert_eq!(controller.player.snapshot().transport.position_ms, 40_000);

        controller.handle_key_event(press(KeyCode::Char(' '))).await.unwrap();
        assert!(!controller.player.snapshot().transport.is_playing);

        controller.handle_key_event(press(KeyCode::Home)).await.unwrap();
        let snapshot = controller.player.snapshot();
        assert_eq!(snapshot.transport.position_ms, 0);
        assert!(snapshot.transport.is_playing);
        assert_eq!(snapshot.current_index, 1);
        assert_eq!(snapshot.transport.current_title.as_deref(), Some("Track 1"));

        controller.handle_key_event(press(KeyCode::Char(' '))).await.unwrap();
        assert!(!controller.player.snapshot().transport.is_playing);

        controller.handle_key_event(press(KeyCode::Char('c'))).await.unwrap();
        assert!(controller.player.snapshot().queue.is_empty());
    }

    #[tokio::test]
    async fn error_popup_swallows_keys_until_dismissed() {
        let controller = controller();
        controller.model.lock().await.set_error("boom".into()).await;

        controller.handle_key_event(press(KeyCode::Char('q'))).await.unwrap();
        assert!(!controller.model.lock().await.should_quit().await);

        controller.handle_key_event(press(KeyCode::Enter)).await.unwrap();
        assert!(!controller.model.lock().await.has_error().await);
    }

    #[tokio::test]
    async fn recent_searches_can_be_removed_and_cleared() {
        let controller = controller();
        {
            let model = controller.model.lock().await;
            model.set_screen(Screen::Songs).await;
            let mut content = model.content_state.lock().await;
            content.songs.recent.add("one");
            content.songs.recent.add("two");
        }

        controller.handle_key_event(press(KeyCode::Delete)).await.unwrap();
        let recent = controller.model.lock().await.get_content_state().await.songs.recent;
        assert_eq!(recent.items(), ["one"]);

        controller.handle_key_event(press(KeyCode::Char('C'))).await.unwrap();
        let recent = controller.model.lock().await.get_content_state().await.songs.recent;
        assert!(recent.is_empty());
    }
}
