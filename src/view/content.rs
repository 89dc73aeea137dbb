//! Main content area rendering (screens, detail pages, lists)

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    widgets::{Block, Borders, ListItem, Padding, Paragraph},
    Frame,
};

use crate::model::{
    Album, AlbumDetailState, Artist, ArtistDetailSection, ArtistDetailState, Chart, ContentState,
    DetailView, Loadable, PlayerSnapshot, Screen, Song, SongInfo, SuggestedSection, UiState,
};
use super::utils::{
    calculate_num_width, format_duration, render_scrollable_list, song_column_widths,
    truncate_string, Palette,
};

pub fn render_main_content(
    frame: &mut Frame,
    area: Rect,
    ui_state: &UiState,
    content_state: &ContentState,
    snapshot: &PlayerSnapshot,
    palette: &Palette,
) {
    let is_focused = !ui_state.search_focused;
    let view = ListView { palette, snapshot, is_focused };

    if let Some(detail) = content_state.current_detail() {
        match detail {
            DetailView::Artist(artist) => view.artist_detail(frame, area, artist),
            DetailView::Album(album) => view.album_detail(frame, area, album),
        }
        return;
    }

    match ui_state.screen {
        Screen::Suggested => view.suggested(frame, area, content_state),
        Screen::Songs => {
            let songs = &content_state.songs;
            if songs.shows_recent() {
                view.recent_searches(frame, area, songs.recent.items(), songs.recent_selected);
            } else if let Some(message) = status_message(&songs.results, "Searching...", "No songs found") {
                view.status(frame, area, " Songs ", message);
            } else {
                view.songs(frame, area, " Songs ", &songs.results.data, songs.selected, is_focused);
            }
        }
        Screen::Artists => {
            let artists = &content_state.artists;
            match status_message(&artists.results, "Searching...", "No artists found") {
                Some(message) => view.status(frame, area, " Artists ", message),
                None => view.artists(frame, area, " Artists ", &artists.results.data, artists.selected, is_focused),
            }
        }
        Screen::Albums => {
            let albums = &content_state.albums;
            match status_message(&albums.results, "Searching...", "No albums found") {
                Some(message) => view.status(frame, area, " Albums ", message),
                None => view.albums(frame, area, " Albums ", &albums.results.data, albums.selected, is_focused),
            }
        }
        Screen::Favorites => {
            if snapshot.favorites.is_empty() {
                view.status(frame, area, " Favorites ", Status::Empty("No favorites yet. Press F on a song."));
            } else {
                view.songs(frame, area, " Favorites ", &snapshot.favorites, content_state.favorites_selected, is_focused);
            }
        }
        Screen::Queue => view.queue(frame, area, content_state.queue_selected),
    }
}

/// What to draw instead of a list
enum Status<'a> {
    Loading(&'a str),
    Error(&'a str),
    Empty(&'a str),
}

fn status_message<'a, T>(loadable: &'a Loadable<Vec<T>>, loading: &'a str, empty: &'a str) -> Option<Status<'a>> {
    if loadable.is_loading {
        Some(Status::Loading(loading))
    } else if let Some(error) = loadable.error.as_deref() {
        Some(Status::Error(error))
    } else if loadable.data.is_empty() {
        Some(Status::Empty(empty))
    } else {
        None
    }
}

struct ListView<'a> {
    palette: &'a Palette,
    snapshot: &'a PlayerSnapshot,
    is_focused: bool,
}

impl ListView<'_> {
    fn status(&self, frame: &mut Frame, area: Rect, title: &str, status: Status) {
        let (text, color) = match status {
            Status::Loading(text) => (text, self.palette.warning),
            Status::Error(text) => (text, self.palette.error),
            Status::Empty(text) => (text, self.palette.muted),
        };
        let paragraph = Paragraph::new(text.to_string())
            .style(Style::default().fg(color))
            .block(self.palette.panel(title, self.is_focused));
        frame.render_widget(paragraph, area);
    }

    fn songs(&self, frame: &mut Frame, area: Rect, title: &str, songs: &[Song], selected: usize, focused: bool) {
        let content_width = area.width.saturating_sub(4) as usize;
        let items = self.song_items(songs, selected, focused, content_width);
        render_scrollable_list(frame, area, items, selected + 1, self.palette.panel(title, focused));
    }

    fn song_items(&self, songs: &[Song], selected: usize, focused: bool, content_width: usize) -> Vec<ListItem<'static>> {
        let (num_width, title_width, artist_width, duration_width) =
            song_column_widths(content_width, songs.len());
        let playing_id = self.snapshot.current_track_id();

        let mut items = vec![
            ListItem::new(format!(
                " {:<num_width$}   {}   {:<title_width$}   {:<artist_width$}   {:>duration_width$}",
                "#", " ", "Title", "Artist", "Time",
            ))
            .style(self.palette.header_style()),
        ];

        items.extend(songs.iter().enumerate().map(|(i, song)| {
            let is_playing = playing_id == Some(song.id.as_str());
            let style = self.palette.row(i == selected, focused, is_playing);

            let playing_indicator = if is_playing { "▶" } else { " " };
            let fav_indicator = if self.snapshot.is_favorite(&song.id) { "♥" } else { " " };
            let duration = match song.duration_ms() {
                0 => "-".to_string(),
                ms => format_duration(ms),
            };

            ListItem::new(format!(
                "{}{:<num_width$}   {}   {}   {}   {:>duration_width$}",
                playing_indicator,
                i + 1,
                fav_indicator,
                truncate_string(&song.name, title_width),
                truncate_string(&song.artist_names(), artist_width),
                duration,
            ))
            .style(style)
        }));
        items
    }

    fn artists(&self, frame: &mut Frame, area: Rect, title: &str, artists: &[Artist], selected: usize, focused: bool) {
        let num_width = calculate_num_width(artists.len());
        let items: Vec<ListItem> = artists
            .iter()
            .enumerate()
            .map(|(i, artist)| {
                let role = artist.role.as_deref().filter(|r| !r.is_empty());
                let text = match role {
                    Some(role) => format!(" {:<num_width$}   {} ({})", i + 1, artist.name, role),
                    None => format!(" {:<num_width$}   {}", i + 1, artist.name),
                };
                ListItem::new(text).style(self.palette.row(i == selected, focused, false))
            })
            .collect();
        render_scrollable_list(frame, area, items, selected, self.palette.panel(title, focused));
    }

    fn albums(&self, frame: &mut Frame, area: Rect, title: &str, albums: &[Album], selected: usize, focused: bool) {
        let num_width = calculate_num_width(albums.len());
        let year_width = 4;
        let fixed_width = 1 + num_width + 3 + 3 + 3 + year_width;
        let remaining = (area.width.saturating_sub(4) as usize).saturating_sub(fixed_width);
        let name_width = (remaining * 50) / 100;
        let artist_width = remaining.saturating_sub(name_width);

        let mut items = vec![
            ListItem::new(format!(
                " {:<num_width$}   {:<name_width$}   {:<artist_width$}   {:>year_width$}",
                "#", "Album", "Artist", "Year",
            ))
            .style(self.palette.header_style()),
        ];

        items.extend(albums.iter().enumerate().map(|(i, album)| {
            ListItem::new(format!(
                " {:<num_width$}   {}   {}   {:>year_width$}",
                i + 1,
                truncate_string(&album.name, name_width),
                truncate_string(&album.artist_names(), artist_width),
                album.year.as_deref().unwrap_or("-"),
            ))
            .style(self.palette.row(i == selected, focused, false))
        }));

        render_scrollable_list(frame, area, items, selected + 1, self.palette.panel(title, focused));
    }

    fn charts(&self, frame: &mut Frame, area: Rect, charts: &[Chart], selected: usize, focused: bool) {
        let items: Vec<ListItem> = charts
            .iter()
            .enumerate()
            .map(|(i, chart)| {
                let text = match chart.subtitle.as_deref().filter(|s| !s.is_empty()) {
                    Some(subtitle) => format!("{} - {}", chart.title, subtitle),
                    None => chart.title.clone(),
                };
                ListItem::new(text).style(self.palette.row(i == selected, focused, false))
            })
            .collect();
        render_scrollable_list(frame, area, items, selected, self.palette.panel(" Charts ", focused));
    }

    fn recent_searches(&self, frame: &mut Frame, area: Rect, recent: &[String], selected: usize) {
        let items: Vec<ListItem> = recent
            .iter()
            .enumerate()
            .map(|(i, query)| {
                ListItem::new(format!("🕘 {}", query)).style(self.palette.row(i == selected, self.is_focused, false))
            })
            .collect();

        let block = self
            .palette
            .panel(" Recent Searches ", self.is_focused)
            .title_bottom(" Enter: search again | X: remove | C: clear all ");
        render_scrollable_list(frame, area, items, selected, block);
    }

    fn queue(&self, frame: &mut Frame, area: Rect, selected: usize) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Now playing
                Constraint::Min(0),    // Queue
            ])
            .split(area);

        let now_playing = match self.snapshot.current.as_ref() {
            Some(track) => match track.artist.as_deref() {
                Some(artist) => format!("{}  -  {}", track.title, artist),
                None => track.title.clone(),
            },
            None => "No track playing".to_string(),
        };
        let now_playing = Paragraph::new(now_playing)
            .style(Style::default().fg(self.palette.header))
            .block(self.palette.panel(" Now Playing ", false));
        frame.render_widget(now_playing, chunks[0]);

        let queue = &self.snapshot.queue;
        if queue.is_empty() {
            self.status(frame, chunks[1], " Queue ", Status::Empty("Queue is empty"));
            return;
        }

        let content_width = chunks[1].width.saturating_sub(4) as usize;
        let items = self.queue_items(queue, selected, content_width);
        let block = self
            .palette
            .panel(" Queue ", self.is_focused)
            .title_bottom(" Enter: play | X: remove | C: clear ");
        render_scrollable_list(frame, chunks[1], items, selected + 1, block);
    }

    fn queue_items(&self, queue: &[SongInfo], selected: usize, content_width: usize) -> Vec<ListItem<'static>> {
        let (num_width, title_width, artist_width, duration_width) =
            song_column_widths(content_width, queue.len());
        let has_current = self.snapshot.current.is_some();

        let mut items = vec![
            ListItem::new(format!(
                " {:<num_width$}   {}   {:<title_width$}   {:<artist_width$}   {:>duration_width$}",
                "#", " ", "Title", "Artist", "Time",
            ))
            .style(self.palette.header_style()),
        ];

        items.extend(queue.iter().enumerate().map(|(i, track)| {
            let is_current = has_current && i == self.snapshot.current_index;
            let indicator = if is_current { "▶" } else { " " };
            ListItem::new(format!(
                "{}{:<num_width$}   {}   {}   {}   {:>duration_width$}",
                indicator,
                i + 1,
                " ",
                truncate_string(&track.title, title_width),
                truncate_string(track.artist.as_deref().unwrap_or("-"), artist_width),
                format_duration(track.duration_ms),
            ))
            .style(self.palette.row(i == selected, self.is_focused, is_current))
        }));
        items
    }

    fn suggested(&self, frame: &mut Frame, area: Rect, content_state: &ContentState) {
        let suggested = &content_state.suggested;
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(area);
        let top = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(rows[0]);
        let bottom = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(rows[1]);

        let focus = |section: SuggestedSection| self.is_focused && suggested.section == section;

        let section_focused = focus(SuggestedSection::Trending);
        match status_message(&suggested.trending, "Loading...", "Nothing trending") {
            Some(status) => self.status(frame, top[0], " Trending ", status),
            None => self.songs(frame, top[0], " Trending ", &suggested.trending.data, suggested.trending_index, section_focused),
        }

        let section_focused = focus(SuggestedSection::Albums);
        match status_message(&suggested.albums, "Loading...", "No albums") {
            Some(status) => self.status(frame, top[1], " New Albums ", status),
            None => self.albums(frame, top[1], " New Albums ", &suggested.albums.data, suggested.album_index, section_focused),
        }

        let section_focused = focus(SuggestedSection::Artists);
        match status_message(&suggested.artists, "Loading...", "No artists") {
            Some(status) => self.status(frame, bottom[0], " Artists ", status),
            None => self.artists(frame, bottom[0], " Artists ", &suggested.artists.data, suggested.artist_index, section_focused),
        }

        let section_focused = focus(SuggestedSection::Charts);
        match status_message(&suggested.charts, "Loading...", "No charts") {
            Some(status) => self.status(frame, bottom[1], " Charts ", status),
            None => self.charts(frame, bottom[1], &suggested.charts.data, suggested.chart_index, section_focused),
        }
    }

    fn artist_detail(&self, frame: &mut Frame, area: Rect, state: &ArtistDetailState) {
        let Some(detail) = state.detail.data.as_ref() else {
            let status = match state.detail.error.as_deref() {
                Some(error) => Status::Error(error),
                None => Status::Loading("Loading artist..."),
            };
            self.status(frame, area, " Artist ", status);
            return;
        };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Top songs + albums
            ])
            .split(area);

        let verified = if detail.is_verified.unwrap_or(false) { " ✔" } else { "" };
        let followers = detail
            .follower_count
            .as_deref()
            .map(|count| format!(" | {} followers", count))
            .unwrap_or_default();
        let header = Paragraph::new(format!(
            "{}{}{} | [ ]: switch section | Backspace: go back",
            detail.name, verified, followers
        ))
        .style(Style::default().fg(self.palette.header))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .padding(Padding::horizontal(1))
                .border_style(self.palette.border(self.is_focused)),
        );
        frame.render_widget(header, chunks[0]);

        let panes = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(chunks[1]);

        let songs_focused = self.is_focused && state.section == ArtistDetailSection::TopSongs;
        if state.top_songs().is_empty() {
            self.status(frame, panes[0], " Top Songs ", Status::Empty("No songs"));
        } else {
            self.songs(frame, panes[0], " Top Songs ", state.top_songs(), state.song_index, songs_focused);
        }

        let albums_focused = self.is_focused && state.section == ArtistDetailSection::Albums;
        let album_items: Vec<ListItem> = state
            .top_albums()
            .iter()
            .enumerate()
            .map(|(i, album)| {
                let text = match album.year.as_deref() {
                    Some(year) => format!("{} ({})", album.name, year),
                    None => album.name.clone(),
                };
                ListItem::new(text).style(self.palette.row(i == state.album_index, albums_focused, false))
            })
            .collect();
        render_scrollable_list(
            frame,
            panes[1],
            album_items,
            state.album_index,
            self.palette.panel(" Albums ", albums_focused),
        );
    }

    fn album_detail(&self, frame: &mut Frame, area: Rect, state: &AlbumDetailState) {
        let Some(detail) = state.detail.data.as_ref() else {
            let status = match state.detail.error.as_deref() {
                Some(error) => Status::Error(error),
                None => Status::Loading("Loading album..."),
            };
            self.status(frame, area, " Album ", status);
            return;
        };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4), // Header
                Constraint::Min(0),    // Songs
            ])
            .split(area);

        let artists = detail.artists.as_ref().map(|a| a.primary_names()).unwrap_or_default();
        let year = detail.year.as_deref().map(|y| format!(" ({})", y)).unwrap_or_default();
        let header = Paragraph::new(format!(
            "💿 {} by {}{}\n{} songs | Enter: play from selected | Backspace: go back",
            detail.name,
            if artists.is_empty() { "Unknown artist" } else { artists.as_str() },
            year,
            state.songs().len()
        ))
        .style(Style::default().fg(self.palette.header))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .padding(Padding::horizontal(1))
                .border_style(self.palette.border(self.is_focused)),
        );
        frame.render_widget(header, chunks[0]);

        if state.songs().is_empty() {
            self.status(frame, chunks[1], " Songs ", Status::Empty("This album has no songs"));
        } else {
            self.songs(frame, chunks[1], " Songs ", state.songs(), state.selected, self.is_focused);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_prefers_loading_then_error_then_empty() {
        let mut songs: Loadable<Vec<Song>> = Loadable::default();
        assert!(matches!(status_message(&songs, "busy", "none"), Some(Status::Empty("none"))));

        songs.error = Some("boom".into());
        assert!(matches!(status_message(&songs, "busy", "none"), Some(Status::Error("boom"))));

        songs.begin();
        assert!(matches!(status_message(&songs, "busy", "none"), Some(Status::Loading("busy"))));
    }

    #[test]
    fn song_list_has_header_row() {
        let palette = Palette::for_theme(Default::default());
        let snapshot = PlayerSnapshot {
            current: Some(SongInfo { track_id: Some("b".into()), ..Default::default() }),
            ..Default::default()
        };
        let view = ListView { palette: &palette, snapshot: &snapshot, is_focused: true };
        let songs: Vec<Song> = ["a", "b"]
            .iter()
            .map(|id| Song { id: id.to_string(), name: id.to_uppercase(), ..Default::default() })
            .collect();

        let items = view.song_items(&songs, 0, true, 80);
        // header plus one row per song
        assert_eq!(items.len(), 3);
    }
}
