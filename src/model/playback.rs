//! Playback-related types shared by the player controller, the audio backend and the UI

use super::catalog::Song;
use super::types::RepeatMode;

/// Minimal playable item, independent of the catalog response it came from
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SongInfo {
    pub url: String,
    pub title: String,
    pub image_url: Option<String>,
    pub duration_ms: u64,
    pub artist: Option<String>,
    pub track_id: Option<String>,
}

impl SongInfo {
    /// Map a catalog song for playback. Songs without a stream URL are not playable.
    pub fn from_song(song: &Song) -> Option<Self> {
        let url = song.stream_url()?;
        Some(Self {
            url: url.to_string(),
            title: song.name.clone(),
            image_url: song.image_url().map(str::to_string),
            duration_ms: song.duration_ms(),
            artist: song.primary_artist().map(str::to_string),
            track_id: Some(song.id.clone()),
        })
    }

    /// Build a queue from a list of songs, skipping the unplayable ones.
    /// Returns the queue and the position of `selected` inside it.
    pub fn queue_from(songs: &[Song], selected: usize) -> (Vec<SongInfo>, usize) {
        let selected_url = songs.get(selected).and_then(Song::stream_url);
        let queue: Vec<SongInfo> = songs.iter().filter_map(SongInfo::from_song).collect();
        let start = selected_url
            .and_then(|url| queue.iter().position(|s| s.url == url))
            .unwrap_or(0);
        (queue, start)
    }
}

/// Play/pause/position state the UI renders
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TransportState {
    pub is_playing: bool,
    pub position_ms: u64,
    pub duration_ms: u64,
    pub current_title: Option<String>,
    pub current_image_url: Option<String>,
}

impl TransportState {
    pub fn progress_ratio(&self) -> f64 {
        if self.duration_ms > 0 {
            (self.position_ms as f64 / self.duration_ms as f64).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

/// Everything the player exposes to subscribers
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PlayerSnapshot {
    pub queue: Vec<SongInfo>,
    pub current_index: usize,
    /// The track last handed to the playback engine
    pub current: Option<SongInfo>,
    pub transport: TransportState,
    pub shuffle: bool,
    pub repeat: RepeatMode,
    pub favorites: Vec<Song>,
}

impl PlayerSnapshot {
    pub fn current_track_id(&self) -> Option<&str> {
        self.current.as_ref().and_then(|t| t.track_id.as_deref())
    }

    pub fn is_favorite(&self, song_id: &str) -> bool {
        self.favorites.iter().any(|s| s.id == song_id)
    }
}

/// Commands understood by the playback collaborator.
/// They are fire-and-forget; no acknowledgement is expected.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PlaybackCommand {
    Load {
        url: String,
        title: String,
        image_url: Option<String>,
    },
    #[allow(dead_code)]
    Play,
    Pause,
    Toggle,
    #[allow(dead_code)]
    Next,
    #[allow(dead_code)]
    Previous,
    SeekAbsolute(u64),
    SeekRelative(i64),
    Stop,
}

/// The external media engine that actually renders audio
pub trait PlaybackSink: Send + Sync {
    fn send(&self, command: PlaybackCommand);
}
