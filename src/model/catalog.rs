//! Catalog data types as returned by the Saavn API.
//!
//! Every endpoint wraps its payload in the same `{ success, data }` envelope.
//! Numeric counters are not consistently typed by the backend (sometimes a
//! JSON number, sometimes a string), so those fields are decoded leniently.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Generic response envelope
#[derive(Clone, Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
}

/// `data` payload of the search endpoints
#[derive(Clone, Debug, Deserialize)]
pub struct SearchPage<T> {
    pub results: Option<Vec<T>>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Image {
    #[serde(default)]
    pub quality: Option<String>,
    pub url: String,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct DownloadUrl {
    #[serde(default)]
    pub quality: Option<String>,
    pub url: String,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Artist {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub image: Option<Vec<Image>>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Artists {
    #[serde(default)]
    pub primary: Option<Vec<Artist>>,
    #[serde(default)]
    pub featured: Option<Vec<Artist>>,
    #[serde(default)]
    pub all: Option<Vec<Artist>>,
}

impl Artists {
    /// Comma separated primary artist names
    pub fn primary_names(&self) -> String {
        self.primary
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(|a| a.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Album {
    pub id: String,
    pub name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub year: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub song_count: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub image: Option<Vec<Image>>,
    #[serde(default)]
    pub artists: Option<Artists>,
}

impl Album {
    pub fn artist_names(&self) -> String {
        self.artists.as_ref().map(Artists::primary_names).unwrap_or_default()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Song {
    pub id: String,
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub year: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    /// Length in seconds
    #[serde(default, deserialize_with = "lenient_u64")]
    pub duration: Option<u64>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub explicit_content: Option<bool>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub play_count: Option<u64>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub has_lyrics: Option<bool>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub album: Option<Album>,
    #[serde(default)]
    pub artists: Option<Artists>,
    #[serde(default)]
    pub image: Option<Vec<Image>>,
    #[serde(default)]
    pub download_url: Option<Vec<DownloadUrl>>,
}

impl Song {
    /// Highest quality stream URL (the API lists qualities in ascending order)
    pub fn stream_url(&self) -> Option<&str> {
        self.download_url
            .as_deref()
            .and_then(|urls| urls.last())
            .map(|d| d.url.as_str())
            .filter(|url| !url.is_empty())
    }

    pub fn image_url(&self) -> Option<&str> {
        largest_image(self.image.as_deref())
    }

    pub fn primary_artist(&self) -> Option<&str> {
        self.artists
            .as_ref()
            .and_then(|a| a.primary.as_deref())
            .and_then(|p| p.first())
            .map(|a| a.name.as_str())
    }

    pub fn artist_names(&self) -> String {
        self.artists.as_ref().map(Artists::primary_names).unwrap_or_default()
    }

    pub fn duration_ms(&self) -> u64 {
        self.duration.unwrap_or(0).saturating_mul(1000)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtistDetail {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub image: Option<Vec<Image>>,
    #[serde(default)]
    pub top_songs: Option<Vec<Song>>,
    #[serde(default)]
    pub top_albums: Option<Vec<Album>>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub follower_count: Option<String>,
    #[serde(default)]
    pub is_verified: Option<bool>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlbumDetail {
    pub id: String,
    pub name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub year: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub song_count: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub image: Option<Vec<Image>>,
    #[serde(default)]
    pub artists: Option<Artists>,
    #[serde(default)]
    pub songs: Option<Vec<Song>>,
}

/// A chart or playlist tile from the home modules
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Chart {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub image: Option<Vec<Image>>,
}

pub type Playlist = Chart;

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Trending {
    #[serde(default)]
    pub songs: Option<Vec<Song>>,
    #[serde(default)]
    pub albums: Option<Vec<Album>>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct HomeFeed {
    #[serde(default)]
    pub albums: Option<Vec<Album>>,
    #[serde(default)]
    pub charts: Option<Vec<Chart>>,
    #[serde(default)]
    pub playlists: Option<Vec<Playlist>>,
    #[serde(default)]
    pub trending: Option<Trending>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Lyrics {
    #[serde(default)]
    pub lyrics: Option<String>,
    #[serde(default)]
    pub snippet: Option<String>,
}

impl Lyrics {
    /// Full text when present, otherwise the snippet
    pub fn text(&self) -> Option<&str> {
        self.lyrics
            .as_deref()
            .or(self.snippet.as_deref())
            .filter(|t| !t.trim().is_empty())
    }
}

fn largest_image(images: Option<&[Image]>) -> Option<&str> {
    images.and_then(|i| i.last()).map(|i| i.url.as_str())
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

fn lenient_u64<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => n.as_u64().or_else(|| n.as_f64().map(|f| f.max(0.0) as u64)),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}
