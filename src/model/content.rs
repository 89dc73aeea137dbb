//! Content view state for the browsing screens: search results, suggestions,
//! artist/album details and lyrics.
//!
//! Every remote list lives in a [`Loadable`]. A fetch starts with
//! [`Loadable::begin`], which hands out a [`RequestTicket`]; the result is
//! only applied if that ticket is still the latest one issued for the slot.
//! Older responses arriving late are dropped.

use std::sync::atomic::{AtomicU64, Ordering};

use super::catalog::{Album, AlbumDetail, Artist, ArtistDetail, Chart, HomeFeed, Lyrics, Song};
use super::catalog_client::{CatalogError, CatalogResult};
use super::types::{ArtistDetailSection, SuggestedSection};

pub const MAX_RECENT_SEARCHES: usize = 10;

static NEXT_TICKET: AtomicU64 = AtomicU64::new(1);

/// Identifies one in-flight request
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RequestTicket(u64);

impl RequestTicket {
    fn issue() -> Self {
        Self(NEXT_TICKET.fetch_add(1, Ordering::Relaxed))
    }
}

/// Remote data plus its loading/error flags
#[derive(Clone, Debug, Default)]
pub struct Loadable<T> {
    pub data: T,
    pub is_loading: bool,
    pub error: Option<String>,
    pending: Option<RequestTicket>,
}

impl<T> Loadable<T> {
    /// Start a request, superseding any outstanding one
    pub fn begin(&mut self) -> RequestTicket {
        let ticket = RequestTicket::issue();
        self.pending = Some(ticket);
        self.is_loading = true;
        self.error = None;
        ticket
    }

    pub fn is_current(&self, ticket: RequestTicket) -> bool {
        self.pending == Some(ticket)
    }

    /// Apply a result. Returns false if the ticket was superseded or cancelled.
    pub fn finish(&mut self, ticket: RequestTicket, data: T, error: Option<String>) -> bool {
        if !self.is_current(ticket) {
            tracing::debug!(?ticket, "Discarding stale response");
            return false;
        }
        self.pending = None;
        self.is_loading = false;
        self.data = data;
        self.error = error;
        true
    }

    /// Forget the outstanding request, if any
    pub fn cancel(&mut self) {
        self.pending = None;
        self.is_loading = false;
    }
}

/// Most-recent-first list of successful search queries
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RecentSearches {
    items: Vec<String>,
}

impl RecentSearches {
    pub fn add(&mut self, query: &str) {
        self.items.retain(|q| q != query);
        self.items.insert(0, query.to_string());
        self.items.truncate(MAX_RECENT_SEARCHES);
    }

    pub fn remove(&mut self, query: &str) {
        self.items.retain(|q| q != query);
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Move a list cursor, staying inside `0..len`
pub fn step_cursor(index: &mut usize, len: usize, forward: bool) {
    if forward {
        if *index < len.saturating_sub(1) {
            *index += 1;
        }
    } else if *index > 0 {
        *index -= 1;
    }
}

fn clamp_cursor(index: &mut usize, len: usize) {
    *index = (*index).min(len.saturating_sub(1));
}

// ============================================================================
// Songs
// ============================================================================

#[derive(Clone, Debug, Default)]
pub struct SongsState {
    pub results: Loadable<Vec<Song>>,
    pub recent: RecentSearches,
    /// Text in the search box
    pub query: String,
    pub selected: usize,
    pub recent_selected: usize,
    preload_query: String,
}

impl SongsState {
    pub fn new(preload_query: &str) -> Self {
        Self { preload_query: preload_query.to_string(), ..Default::default() }
    }

    pub fn preload_query(&self) -> &str {
        &self.preload_query
    }

    /// Start a search. A blank query empties the list without a request.
    pub fn begin_search(&mut self, query: &str) -> Option<RequestTicket> {
        if query.trim().is_empty() {
            self.results.cancel();
            self.results.data.clear();
            self.results.error = None;
            self.selected = 0;
            return None;
        }
        Some(self.results.begin())
    }

    pub fn finish_search(
        &mut self,
        ticket: RequestTicket,
        query: &str,
        save_to_recent: bool,
        result: CatalogResult<Vec<Song>>,
    ) {
        let (songs, error) = match result {
            Ok(songs) => (songs, None),
            Err(CatalogError::Unsuccessful { .. }) => (Vec::new(), None),
            Err(e) => (Vec::new(), Some(e.to_string())),
        };

        let succeeded = error.is_none() && !songs.is_empty();
        if !self.results.finish(ticket, songs, error) {
            return;
        }
        self.selected = 0;

        if succeeded && save_to_recent && query != self.preload_query {
            self.recent.add(query);
        }
    }

    /// Recent searches replace the result list while nothing is typed or found
    pub fn shows_recent(&self) -> bool {
        self.query.trim().is_empty()
            && self.results.data.is_empty()
            && !self.results.is_loading
            && !self.recent.is_empty()
    }

    pub fn remove_recent(&mut self, query: &str) {
        self.recent.remove(query);
        clamp_cursor(&mut self.recent_selected, self.recent.len());
    }

    pub fn clear_recent(&mut self) {
        self.recent.clear();
        self.recent_selected = 0;
    }
}

// ============================================================================
// Artists & albums
// ============================================================================

#[derive(Clone, Debug, Default)]
pub struct ArtistsState {
    pub results: Loadable<Vec<Artist>>,
    pub query: String,
    pub selected: usize,
    preload_query: String,
}

impl ArtistsState {
    pub fn new(preload_query: &str) -> Self {
        Self { preload_query: preload_query.to_string(), ..Default::default() }
    }

    /// The query actually sent: a blank query falls back to the top artists
    pub fn effective_query(&self, query: &str) -> String {
        effective_query(query, &self.preload_query)
    }

    pub fn begin_search(&mut self) -> RequestTicket {
        self.results.begin()
    }

    pub fn finish_search(&mut self, ticket: RequestTicket, result: CatalogResult<Vec<Artist>>) {
        let (artists, error) = split_result(result, "Failed to fetch artists");
        if self.results.finish(ticket, artists, error) {
            self.selected = 0;
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct AlbumsState {
    pub results: Loadable<Vec<Album>>,
    pub query: String,
    pub selected: usize,
    preload_query: String,
}

impl AlbumsState {
    pub fn new(preload_query: &str) -> Self {
        Self { preload_query: preload_query.to_string(), ..Default::default() }
    }

    pub fn effective_query(&self, query: &str) -> String {
        effective_query(query, &self.preload_query)
    }

    pub fn begin_search(&mut self) -> RequestTicket {
        self.results.begin()
    }

    pub fn finish_search(&mut self, ticket: RequestTicket, result: CatalogResult<Vec<Album>>) {
        let (albums, error) = split_result(result, "Failed to fetch albums");
        if self.results.finish(ticket, albums, error) {
            self.selected = 0;
        }
    }
}

fn effective_query(query: &str, fallback: &str) -> String {
    let query = query.trim();
    if query.is_empty() { fallback.to_string() } else { query.to_string() }
}

fn split_result<T>(result: CatalogResult<Vec<T>>, unsuccessful: &str) -> (Vec<T>, Option<String>) {
    match result {
        Ok(items) => (items, None),
        Err(CatalogError::Unsuccessful { .. }) => (Vec::new(), Some(unsuccessful.to_string())),
        Err(e) => (Vec::new(), Some(e.to_string())),
    }
}

// ============================================================================
// Suggested
// ============================================================================

/// Landing screen: four independently loaded sections
#[derive(Clone, Debug, Default)]
pub struct SuggestedState {
    pub trending: Loadable<Vec<Song>>,
    pub albums: Loadable<Vec<Album>>,
    pub artists: Loadable<Vec<Artist>>,
    pub charts: Loadable<Vec<Chart>>,
    pub section: SuggestedSection,
    pub trending_index: usize,
    pub album_index: usize,
    pub artist_index: usize,
    pub chart_index: usize,
}

impl SuggestedState {
    pub fn finish_trending(&mut self, ticket: RequestTicket, result: CatalogResult<Vec<Song>>) {
        self.trending.finish(ticket, result.unwrap_or_default(), None);
    }

    pub fn finish_albums(&mut self, ticket: RequestTicket, result: CatalogResult<Vec<Album>>) {
        self.albums.finish(ticket, result.unwrap_or_default(), None);
    }

    pub fn finish_artists(&mut self, ticket: RequestTicket, result: CatalogResult<Vec<Artist>>) {
        self.artists.finish(ticket, result.unwrap_or_default(), None);
    }

    pub fn finish_charts(&mut self, ticket: RequestTicket, result: CatalogResult<HomeFeed>) {
        let charts = result.ok().and_then(|feed| feed.charts).unwrap_or_default();
        self.charts.finish(ticket, charts, None);
    }

    pub fn is_loading(&self) -> bool {
        self.trending.is_loading
            || self.albums.is_loading
            || self.artists.is_loading
            || self.charts.is_loading
    }

    pub fn move_cursor(&mut self, forward: bool) {
        let (index, len) = match self.section {
            SuggestedSection::Trending => (&mut self.trending_index, self.trending.data.len()),
            SuggestedSection::Albums => (&mut self.album_index, self.albums.data.len()),
            SuggestedSection::Artists => (&mut self.artist_index, self.artists.data.len()),
            SuggestedSection::Charts => (&mut self.chart_index, self.charts.data.len()),
        };
        step_cursor(index, len, forward);
    }
}

// ============================================================================
// Details
// ============================================================================

#[derive(Clone, Debug, Default)]
pub struct ArtistDetailState {
    pub id: String,
    pub detail: Loadable<Option<ArtistDetail>>,
    pub section: ArtistDetailSection,
    pub song_index: usize,
    pub album_index: usize,
}

impl ArtistDetailState {
    pub fn top_songs(&self) -> &[Song] {
        self.detail.data.as_ref().and_then(|d| d.top_songs.as_deref()).unwrap_or_default()
    }

    pub fn top_albums(&self) -> &[Album] {
        self.detail.data.as_ref().and_then(|d| d.top_albums.as_deref()).unwrap_or_default()
    }

    pub fn move_cursor(&mut self, forward: bool) {
        match self.section {
            ArtistDetailSection::TopSongs => {
                let len = self.top_songs().len();
                step_cursor(&mut self.song_index, len, forward);
            }
            ArtistDetailSection::Albums => {
                let len = self.top_albums().len();
                step_cursor(&mut self.album_index, len, forward);
            }
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct AlbumDetailState {
    pub id: String,
    pub detail: Loadable<Option<AlbumDetail>>,
    pub selected: usize,
}

impl AlbumDetailState {
    pub fn songs(&self) -> &[Song] {
        self.detail.data.as_ref().and_then(|d| d.songs.as_deref()).unwrap_or_default()
    }
}

/// A detail page pushed over the current tab
#[derive(Clone, Debug)]
pub enum DetailView {
    Artist(ArtistDetailState),
    Album(AlbumDetailState),
}

impl DetailView {
    fn cancel(&mut self) {
        match self {
            DetailView::Artist(state) => state.detail.cancel(),
            DetailView::Album(state) => state.detail.cancel(),
        }
    }
}

fn detail_error(e: CatalogError, what: &str) -> String {
    match e {
        CatalogError::Unsuccessful { .. } | CatalogError::MissingData { .. } => {
            format!("{what} not found")
        }
        e => e.to_string(),
    }
}

// ============================================================================
// Lyrics
// ============================================================================

#[derive(Clone, Debug, Default)]
pub struct LyricsState {
    pub song_id: Option<String>,
    pub title: String,
    pub text: Loadable<Option<String>>,
    pub scroll: u16,
}

impl LyricsState {
    pub const UNAVAILABLE: &'static str = "No lyrics available";

    pub fn begin(&mut self, song_id: &str, title: &str) -> RequestTicket {
        self.song_id = Some(song_id.to_string());
        self.title = title.to_string();
        self.scroll = 0;
        self.text.data = None;
        self.text.begin()
    }

    pub fn finish(&mut self, ticket: RequestTicket, result: CatalogResult<Option<Lyrics>>) {
        let text = result
            .ok()
            .flatten()
            .and_then(|l| l.text().map(str::to_string));
        self.text.finish(ticket, text, None);
    }

    /// What the popup shows
    pub fn display_text(&self) -> &str {
        if self.text.is_loading {
            "Loading lyrics..."
        } else {
            self.text.data.as_deref().unwrap_or(Self::UNAVAILABLE)
        }
    }
}

// ============================================================================
// Content state
// ============================================================================

/// State for the main content area
#[derive(Clone, Debug, Default)]
pub struct ContentState {
    pub songs: SongsState,
    pub artists: ArtistsState,
    pub albums: AlbumsState,
    pub suggested: SuggestedState,
    pub favorites_selected: usize,
    pub queue_selected: usize,
    pub lyrics: LyricsState,
    /// Detail pages opened from the current tab, innermost last
    pub navigation_stack: Vec<DetailView>,
}

impl ContentState {
    pub fn new(song_query: &str, artist_query: &str, album_query: &str) -> Self {
        Self {
            songs: SongsState::new(song_query),
            artists: ArtistsState::new(artist_query),
            albums: AlbumsState::new(album_query),
            ..Default::default()
        }
    }

    pub fn current_detail(&self) -> Option<&DetailView> {
        self.navigation_stack.last()
    }

    pub fn current_detail_mut(&mut self) -> Option<&mut DetailView> {
        self.navigation_stack.last_mut()
    }

    pub fn open_artist(&mut self, id: &str) -> RequestTicket {
        let mut state = ArtistDetailState { id: id.to_string(), ..Default::default() };
        let ticket = state.detail.begin();
        self.navigation_stack.push(DetailView::Artist(state));
        ticket
    }

    pub fn open_album(&mut self, id: &str) -> RequestTicket {
        let mut state = AlbumDetailState { id: id.to_string(), ..Default::default() };
        let ticket = state.detail.begin();
        self.navigation_stack.push(DetailView::Album(state));
        ticket
    }

    pub fn finish_artist(&mut self, ticket: RequestTicket, result: CatalogResult<ArtistDetail>) {
        let target = self.navigation_stack.iter_mut().rev().find_map(|view| match view {
            DetailView::Artist(state) if state.detail.is_current(ticket) => Some(state),
            _ => None,
        });
        if let Some(state) = target {
            match result {
                Ok(detail) => state.detail.finish(ticket, Some(detail), None),
                Err(e) => state.detail.finish(ticket, None, Some(detail_error(e, "Artist"))),
            };
        }
    }

    pub fn finish_album(&mut self, ticket: RequestTicket, result: CatalogResult<AlbumDetail>) {
        let target = self.navigation_stack.iter_mut().rev().find_map(|view| match view {
            DetailView::Album(state) if state.detail.is_current(ticket) => Some(state),
            _ => None,
        });
        if let Some(state) = target {
            match result {
                Ok(detail) => state.detail.finish(ticket, Some(detail), None),
                Err(e) => state.detail.finish(ticket, None, Some(detail_error(e, "Album"))),
            };
        }
    }

    /// Pop the innermost detail page. Its pending fetch is abandoned.
    pub fn navigate_back(&mut self) -> bool {
        match self.navigation_stack.pop() {
            Some(mut view) => {
                view.cancel();
                true
            }
            None => false,
        }
    }

    /// Leaving a tab closes every detail page opened from it
    pub fn close_details(&mut self) {
        while self.navigate_back() {}
    }

    /// Keep the queue/favorites cursors valid after the lists change
    pub fn clamp_player_cursors(&mut self, queue_len: usize, favorites_len: usize) {
        clamp_cursor(&mut self.queue_selected, queue_len);
        clamp_cursor(&mut self.favorites_selected, favorites_len);
    }
}
