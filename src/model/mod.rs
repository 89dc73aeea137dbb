//! Model module - Application state and data types
//!
//! This module contains all the data structures and state management for the application.
//! It is organized into submodules by responsibility:
//!
//! - `types`: Core type definitions (screens, repeat mode, UI state, etc.)
//! - `catalog`: Response types of the catalog API
//! - `catalog_client`: HTTP client for the catalog API
//! - `content`: Per-screen view state with request tracking
//! - `playback`: Track references, transport state and playback commands
//! - `player`: Queue and transport controller
//! - `app_model`: Main application model with state management methods

mod types;
mod catalog;
mod catalog_client;
mod content;
mod playback;
mod player;
mod app_model;

pub use types::{
    ArtistDetailSection, RepeatMode, Screen, SelectedItem, SuggestedSection, Theme, UiState,
};

pub use catalog::{Album, AlbumDetail, Artist, ArtistDetail, Chart, HomeFeed, Lyrics, Song};

pub use catalog_client::{
    Catalog, CatalogClient, CatalogError, CatalogResult, DEFAULT_BASE_URL, DEFAULT_SEARCH_LIMIT,
};

pub use content::{
    AlbumDetailState, AlbumsState, ArtistDetailState, ArtistsState, ContentState, DetailView,
    Loadable, LyricsState, RecentSearches, RequestTicket, SongsState, SuggestedState,
};

pub use playback::{PlaybackCommand, PlaybackSink, PlayerSnapshot, SongInfo, TransportState};

pub use player::PlayerController;

pub use app_model::AppModel;
