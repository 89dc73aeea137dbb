//! Core type definitions for the application

use std::time::Instant;

/// Top-level screens, shown as tabs
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Screen {
    #[default]
    Suggested,
    Songs,
    Artists,
    Albums,
    Favorites,
    Queue,
}

impl Screen {
    pub const ALL: [Screen; 6] = [
        Screen::Suggested,
        Screen::Songs,
        Screen::Artists,
        Screen::Albums,
        Screen::Favorites,
        Screen::Queue,
    ];

    pub fn next(self) -> Self {
        match self {
            Screen::Suggested => Screen::Songs,
            Screen::Songs => Screen::Artists,
            Screen::Artists => Screen::Albums,
            Screen::Albums => Screen::Favorites,
            Screen::Favorites => Screen::Queue,
            Screen::Queue => Screen::Suggested,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Screen::Suggested => Screen::Queue,
            Screen::Songs => Screen::Suggested,
            Screen::Artists => Screen::Songs,
            Screen::Albums => Screen::Artists,
            Screen::Favorites => Screen::Albums,
            Screen::Queue => Screen::Favorites,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Screen::Suggested => "Suggested",
            Screen::Songs => "Songs",
            Screen::Artists => "Artists",
            Screen::Albums => "Albums",
            Screen::Favorites => "Favorites",
            Screen::Queue => "Queue",
        }
    }

    /// Screens that own a search box
    pub fn has_search(self) -> bool {
        matches!(self, Screen::Songs | Screen::Artists | Screen::Albums)
    }
}

/// Repeat mode of the playback queue
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum RepeatMode {
    /// Stop at the end of the queue
    #[default]
    None,
    /// Wrap around to the first entry
    All,
    /// Loop the current track
    One,
}

impl RepeatMode {
    pub fn next(self) -> Self {
        match self {
            RepeatMode::None => RepeatMode::All,
            RepeatMode::All => RepeatMode::One,
            RepeatMode::One => RepeatMode::None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RepeatMode::None => "Repeat: Off",
            RepeatMode::All => "Repeat: All",
            RepeatMode::One => "Repeat: One",
        }
    }
}

/// Which section of the Suggested screen is selected
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SuggestedSection {
    #[default]
    Trending,
    Albums,
    Artists,
    Charts,
}

impl SuggestedSection {
    pub fn next(self) -> Self {
        match self {
            Self::Trending => Self::Albums,
            Self::Albums => Self::Artists,
            Self::Artists => Self::Charts,
            Self::Charts => Self::Trending,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Self::Trending => Self::Charts,
            Self::Albums => Self::Trending,
            Self::Artists => Self::Albums,
            Self::Charts => Self::Artists,
        }
    }
}

/// Which section within artist detail is selected
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ArtistDetailSection {
    #[default]
    TopSongs,
    Albums,
}

impl ArtistDetailSection {
    pub fn next(self) -> Self {
        match self {
            Self::TopSongs => Self::Albums,
            Self::Albums => Self::TopSongs,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn toggle(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }
}

/// Represents a selected item for action handling
#[derive(Clone, Debug)]
pub enum SelectedItem {
    /// A song inside a list; the whole list becomes the queue when played
    Song {
        songs: Vec<crate::model::Song>,
        index: usize,
    },
    Artist { id: String },
    Album { id: String },
    QueueEntry { index: usize },
    RecentSearch { query: String },
}

/// UI state for the application
#[derive(Clone, Default)]
pub struct UiState {
    pub screen: Screen,
    pub search_focused: bool,
    pub error_message: Option<String>,
    pub error_timestamp: Option<Instant>,
    pub show_help_popup: bool,
    pub show_lyrics: bool,
    pub theme: Theme,
}
