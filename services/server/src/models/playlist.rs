//! Playlist and track models
//!
//! A track is either a reference into the video catalog or an uploaded
//! audio file; the two variants share the display fields and are
//! discriminated by a `kind` tag in the persisted document.

use serde::{Deserialize, Serialize};

/// Where a track's playable content comes from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TrackSource {
    /// A video in the remote catalog; `video_id` is the stable identifier
    Catalog { video_id: String },
    /// An uploaded audio file served from the blob store
    Upload {
        id: String,
        file_url: String,
        uploaded_at: String,
    },
}

impl TrackSource {
    /// Stable identifier used for deduplication and removal
    pub fn track_id(&self) -> &str {
        match self {
            TrackSource::Catalog { video_id } => video_id,
            TrackSource::Upload { id, .. } => id,
        }
    }
}

/// A single playable entry in a playlist
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    #[serde(flatten)]
    pub source: TrackSource,
    pub title: String,
    pub artist: String,
    pub thumbnail: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view_count: Option<String>,
    /// User rating, 0 (unrated) to 5
    #[serde(default)]
    pub rating: u8,
    /// Insertion timestamp in epoch milliseconds
    #[serde(default)]
    pub added_at: i64,
}

impl Track {
    pub fn track_id(&self) -> &str {
        self.source.track_id()
    }
}

/// Incoming payload for adding a catalog track to a playlist
///
/// The stable identifier is optional at the wire level so its absence can
/// be rejected as a validation error rather than a deserialization failure.
#[derive(Debug, Clone, Deserialize)]
pub struct NewTrack {
    pub video_id: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub artist: String,
    #[serde(default)]
    pub thumbnail: String,
    pub duration: Option<String>,
    pub view_count: Option<String>,
}

/// A named, ordered sequence of tracks owned by one user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Playlist {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub user_id: String,
    pub name: String,
    #[serde(default)]
    pub tracks: Vec<Track>,
}

impl Playlist {
    pub fn contains_track(&self, track_id: &str) -> bool {
        self.tracks.iter().any(|t| t.track_id() == track_id)
    }
}

/// The full ordered set of one owner's playlists, persisted as one unit
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Collection {
    #[serde(default)]
    pub playlists: Vec<Playlist>,
}

/// Sort keys for derived track views
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// Alphabetical by title
    Title,
    /// Highest rating first
    Rating,
    /// Most recently added first
    Added,
}

/// Sort a copy of the tracks; persisted order is never touched
pub fn sorted_tracks(tracks: &[Track], key: SortKey) -> Vec<Track> {
    let mut sorted = tracks.to_vec();
    match key {
        SortKey::Title => sorted.sort_by(|a, b| a.title.to_lowercase().cmp(&b.title.to_lowercase())),
        SortKey::Rating => sorted.sort_by(|a, b| b.rating.cmp(&a.rating)),
        SortKey::Added => sorted.sort_by(|a, b| b.added_at.cmp(&a.added_at)),
    }
    sorted
}

/// Case-insensitive substring filter over title and artist
pub fn filtered_tracks(tracks: &[Track], query: &str) -> Vec<Track> {
    let needle = query.to_lowercase();
    tracks
        .iter()
        .filter(|t| {
            t.title.to_lowercase().contains(&needle) || t.artist.to_lowercase().contains(&needle)
        })
        .cloned()
        .collect()
}
