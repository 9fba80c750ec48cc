//! Playlist service over the document store
//!
//! Every operation is one read-modify-write transaction against the
//! owner's collection document, executed while holding the owner's store
//! guard. Ownership is enforced on every mutation: the authenticated
//! caller is the only admitted writer, and caller-supplied owner tags are
//! always overwritten before persisting.

use chrono::Utc;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use common::{error::StoreError, store::DocumentStore};

use crate::models::{Collection, NewTrack, Playlist, Track, TrackSource};
use crate::storage::{StoredBlob, UploadMeta};

/// Playlist synthesized when an upload arrives and the owner has none
const DEFAULT_PLAYLIST_NAME: &str = "My Playlist";
const DEFAULT_ARTIST: &str = "Unknown Artist";
const DEFAULT_THUMBNAIL: &str = "/uploads/default-music.png";

/// Errors from playlist operations
#[derive(Error, Debug)]
pub enum PlaylistError {
    /// Malformed or missing required input; the whole request is rejected
    #[error("{0}")]
    Validation(String),

    /// No playlist with that id for this owner. Also returned when the id
    /// exists under another owner, so existence is never leaked.
    #[error("Playlist not found")]
    PlaylistNotFound,

    /// The playlist exists but no track carries that identifier
    #[error("Track not found in playlist")]
    TrackNotFound,

    /// The playlist belongs to another user
    #[error("Playlist does not belong to user")]
    NotOwner,

    /// A track with the same stable identifier is already present
    #[error("Track already exists in playlist")]
    Duplicate,

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Playlist service
#[derive(Clone)]
pub struct PlaylistService {
    store: DocumentStore,
}

impl PlaylistService {
    /// Create a new playlist service
    pub fn new(store: DocumentStore) -> Self {
        Self { store }
    }

    /// Load all playlists for an owner
    ///
    /// Playlists persisted without an owner tag are backfilled with the
    /// owner in the returned copy; the healed tag reaches disk on the next
    /// write.
    pub async fn list(&self, owner: &str) -> Result<Collection, PlaylistError> {
        let mut collection: Collection = self.store.load(owner).await?;
        backfill_owner(&mut collection, owner);
        Ok(collection)
    }

    /// Replace the owner's entire collection
    ///
    /// Every playlist must have a non-empty name or the whole batch is
    /// rejected without touching the stored document. Owner tags are
    /// stamped with the authenticated caller, missing ids are assigned,
    /// and ratings are clamped to the 0-5 range.
    pub async fn replace_all(
        &self,
        owner: &str,
        mut playlists: Vec<Playlist>,
    ) -> Result<(), PlaylistError> {
        for playlist in &playlists {
            if playlist.name.trim().is_empty() {
                return Err(PlaylistError::Validation(
                    "Playlist name cannot be empty".to_string(),
                ));
            }
        }

        for playlist in &mut playlists {
            playlist.user_id = owner.to_string();
            if playlist.id.is_empty() {
                playlist.id = Uuid::new_v4().to_string();
            }
            for track in &mut playlist.tracks {
                track.rating = track.rating.min(5);
            }
        }

        let _guard = self.store.acquire(owner).await;
        self.store.save(owner, &Collection { playlists }).await?;

        info!("Replaced playlist collection for user: {}", owner);
        Ok(())
    }

    /// Delete one playlist, cascading to its tracks
    pub async fn delete(&self, owner: &str, playlist_id: &str) -> Result<(), PlaylistError> {
        let _guard = self.store.acquire(owner).await;
        let mut collection: Collection = self.store.load(owner).await?;
        backfill_owner(&mut collection, owner);

        let initial = collection.playlists.len();
        collection
            .playlists
            .retain(|p| p.id != playlist_id || p.user_id != owner);

        if collection.playlists.len() == initial {
            return Err(PlaylistError::PlaylistNotFound);
        }

        self.store.save(owner, &collection).await?;

        info!("Deleted playlist {} for user: {}", playlist_id, owner);
        Ok(())
    }

    /// Append a catalog track to a playlist
    pub async fn add_track(
        &self,
        owner: &str,
        playlist_id: &str,
        new_track: NewTrack,
    ) -> Result<Playlist, PlaylistError> {
        let video_id = new_track
            .video_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| PlaylistError::Validation("Track must have a video id".to_string()))?
            .to_string();

        let _guard = self.store.acquire(owner).await;
        let mut collection: Collection = self.store.load(owner).await?;
        backfill_owner(&mut collection, owner);

        let playlist = collection
            .playlists
            .iter_mut()
            .find(|p| p.id == playlist_id)
            .ok_or(PlaylistError::PlaylistNotFound)?;

        if playlist.user_id != owner {
            return Err(PlaylistError::NotOwner);
        }

        if playlist.contains_track(&video_id) {
            return Err(PlaylistError::Duplicate);
        }

        playlist.tracks.push(Track {
            source: TrackSource::Catalog { video_id },
            title: new_track.title,
            artist: new_track.artist,
            thumbnail: new_track.thumbnail,
            duration: new_track.duration,
            view_count: new_track.view_count,
            rating: 0,
            added_at: Utc::now().timestamp_millis(),
        });

        let updated = playlist.clone();
        self.store.save(owner, &collection).await?;

        info!(
            "Added track to playlist {} for user: {}",
            playlist_id, owner
        );
        Ok(updated)
    }

    /// Remove a track from a playlist by its stable identifier
    pub async fn remove_track(
        &self,
        owner: &str,
        playlist_id: &str,
        track_id: &str,
    ) -> Result<Playlist, PlaylistError> {
        let _guard = self.store.acquire(owner).await;
        let mut collection: Collection = self.store.load(owner).await?;
        backfill_owner(&mut collection, owner);

        let playlist = collection
            .playlists
            .iter_mut()
            .find(|p| p.id == playlist_id)
            .ok_or(PlaylistError::PlaylistNotFound)?;

        if playlist.user_id != owner {
            return Err(PlaylistError::NotOwner);
        }

        let initial = playlist.tracks.len();
        playlist.tracks.retain(|t| t.track_id() != track_id);

        if playlist.tracks.len() == initial {
            return Err(PlaylistError::TrackNotFound);
        }

        let updated = playlist.clone();
        self.store.save(owner, &collection).await?;

        info!(
            "Removed track {} from playlist {} for user: {}",
            track_id, playlist_id, owner
        );
        Ok(updated)
    }

    /// Attach an uploaded blob to a playlist as an upload track
    ///
    /// Synthesizes a default playlist when the owner has none. The target
    /// is the requested playlist when it exists and is owned, else the
    /// first playlist. Uploads carry freshly generated ids, so no
    /// duplicate check applies.
    pub async fn attach_upload(
        &self,
        owner: &str,
        blob: StoredBlob,
        meta: UploadMeta,
    ) -> Result<Track, PlaylistError> {
        let title = meta
            .title
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| title_from_filename(&blob.original_name));

        let track = Track {
            source: TrackSource::Upload {
                id: Uuid::new_v4().to_string(),
                file_url: blob.file_url,
                uploaded_at: Utc::now().to_rfc3339(),
            },
            title,
            artist: meta
                .artist
                .filter(|a| !a.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_ARTIST.to_string()),
            thumbnail: DEFAULT_THUMBNAIL.to_string(),
            duration: Some(meta.duration.unwrap_or_else(|| "0:00".to_string())),
            view_count: Some("0".to_string()),
            rating: 0,
            added_at: Utc::now().timestamp_millis(),
        };

        let _guard = self.store.acquire(owner).await;
        let mut collection: Collection = self.store.load(owner).await?;
        backfill_owner(&mut collection, owner);

        if collection.playlists.is_empty() {
            collection.playlists.push(Playlist {
                id: Uuid::new_v4().to_string(),
                user_id: owner.to_string(),
                name: DEFAULT_PLAYLIST_NAME.to_string(),
                tracks: Vec::new(),
            });
        }

        let target = collection
            .playlists
            .iter()
            .position(|p| meta.playlist_id.as_deref() == Some(p.id.as_str()) && p.user_id == owner)
            .unwrap_or(0);
        collection.playlists[target].tracks.push(track.clone());

        self.store.save(owner, &collection).await?;

        info!("Attached upload to playlist for user: {}", owner);
        Ok(track)
    }
}

/// Stamp the owner onto playlists persisted without an owner tag
fn backfill_owner(collection: &mut Collection, owner: &str) {
    for playlist in &mut collection.playlists {
        if playlist.user_id.is_empty() {
            playlist.user_id = owner.to_string();
        }
    }
}

fn title_from_filename(filename: &str) -> String {
    match filename.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem.to_string(),
        _ => filename.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn service() -> (PlaylistService, tempfile::TempDir) {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let store = DocumentStore::open(dir.path())
            .await
            .expect("Failed to open store");
        (PlaylistService::new(store), dir)
    }

    fn gym_playlist(id: &str, user_id: &str) -> Playlist {
        Playlist {
            id: id.to_string(),
            user_id: user_id.to_string(),
            name: "Gym".to_string(),
            tracks: Vec::new(),
        }
    }

    fn song(video_id: &str) -> NewTrack {
        NewTrack {
            video_id: Some(video_id.to_string()),
            title: "Song".to_string(),
            artist: "Artist".to_string(),
            thumbnail: String::new(),
            duration: Some("3:21".to_string()),
            view_count: Some("1.2K".to_string()),
        }
    }

    fn blob() -> StoredBlob {
        StoredBlob {
            file_url: "/uploads/audio-x.mp3".to_string(),
            original_name: "morning jog.mp3".to_string(),
        }
    }

    #[tokio::test]
    async fn test_list_empty_owner_returns_empty_collection() {
        let (svc, _dir) = service().await;
        let collection = svc.list("alice").await.unwrap();
        assert!(collection.playlists.is_empty());
    }

    #[tokio::test]
    async fn test_add_track_appears_exactly_once_with_fresh_timestamp() {
        let (svc, _dir) = service().await;
        svc.replace_all("alice", vec![gym_playlist("1", "alice")])
            .await
            .unwrap();

        let before = Utc::now().timestamp_millis();
        svc.add_track("alice", "1", song("v9")).await.unwrap();

        let collection = svc.list("alice").await.unwrap();
        let tracks = &collection.playlists[0].tracks;
        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].track_id(), "v9");
        assert!(tracks[0].added_at >= before);
    }

    #[tokio::test]
    async fn test_add_track_duplicate_is_conflict_and_length_unchanged() {
        let (svc, _dir) = service().await;
        svc.replace_all("alice", vec![gym_playlist("1", "alice")])
            .await
            .unwrap();

        svc.add_track("alice", "1", song("v9")).await.unwrap();
        let err = svc.add_track("alice", "1", song("v9")).await.unwrap_err();
        assert!(matches!(err, PlaylistError::Duplicate));

        let collection = svc.list("alice").await.unwrap();
        assert_eq!(collection.playlists[0].tracks.len(), 1);
    }

    #[tokio::test]
    async fn test_add_track_without_video_id_is_validation_error() {
        let (svc, _dir) = service().await;
        svc.replace_all("alice", vec![gym_playlist("1", "alice")])
            .await
            .unwrap();

        let mut track = song("ignored");
        track.video_id = None;
        let err = svc.add_track("alice", "1", track).await.unwrap_err();
        assert!(matches!(err, PlaylistError::Validation(_)));

        let mut track = song("ignored");
        track.video_id = Some("   ".to_string());
        let err = svc.add_track("alice", "1", track).await.unwrap_err();
        assert!(matches!(err, PlaylistError::Validation(_)));
    }

    #[tokio::test]
    async fn test_add_track_to_missing_playlist_is_not_found() {
        let (svc, _dir) = service().await;
        let err = svc.add_track("alice", "1", song("v9")).await.unwrap_err();
        assert!(matches!(err, PlaylistError::PlaylistNotFound));
    }

    /// The full alice scenario: add, duplicate add, remove, remove again.
    #[tokio::test]
    async fn test_add_remove_scenario() {
        let (svc, _dir) = service().await;
        svc.replace_all("alice", vec![gym_playlist("1", "alice")])
            .await
            .unwrap();

        let playlist = svc.add_track("alice", "1", song("v9")).await.unwrap();
        assert_eq!(playlist.tracks.len(), 1);

        let err = svc.add_track("alice", "1", song("v9")).await.unwrap_err();
        assert!(matches!(err, PlaylistError::Duplicate));

        let playlist = svc.remove_track("alice", "1", "v9").await.unwrap();
        assert!(playlist.tracks.is_empty());

        let err = svc.remove_track("alice", "1", "v9").await.unwrap_err();
        assert!(matches!(err, PlaylistError::TrackNotFound));
    }

    #[tokio::test]
    async fn test_replace_all_rejects_blank_name_without_partial_apply() {
        let (svc, _dir) = service().await;
        svc.replace_all("alice", vec![gym_playlist("1", "alice")])
            .await
            .unwrap();

        let batch = vec![gym_playlist("2", "alice"), {
            let mut p = gym_playlist("3", "alice");
            p.name = "   ".to_string();
            p
        }];

        let err = svc.replace_all("alice", batch).await.unwrap_err();
        assert!(matches!(err, PlaylistError::Validation(_)));

        // Prior state is untouched
        let collection = svc.list("alice").await.unwrap();
        assert_eq!(collection.playlists.len(), 1);
        assert_eq!(collection.playlists[0].id, "1");
    }

    #[tokio::test]
    async fn test_replace_all_stamps_owner_and_assigns_ids() {
        let (svc, _dir) = service().await;

        let batch = vec![
            Playlist {
                id: String::new(),
                user_id: "mallory".to_string(),
                name: "Forged".to_string(),
                tracks: Vec::new(),
            },
            gym_playlist("1", "alice"),
        ];

        svc.replace_all("alice", batch).await.unwrap();
        let collection = svc.list("alice").await.unwrap();

        assert_eq!(collection.playlists.len(), 2);
        assert!(!collection.playlists[0].id.is_empty());
        for playlist in &collection.playlists {
            assert_eq!(playlist.user_id, "alice");
        }
    }

    #[tokio::test]
    async fn test_replace_all_clamps_ratings() {
        let (svc, _dir) = service().await;

        let mut playlist = gym_playlist("1", "alice");
        playlist.tracks.push(Track {
            source: TrackSource::Catalog {
                video_id: "v1".to_string(),
            },
            title: "Song".to_string(),
            artist: "Artist".to_string(),
            thumbnail: String::new(),
            duration: None,
            view_count: None,
            rating: 9,
            added_at: 0,
        });

        svc.replace_all("alice", vec![playlist]).await.unwrap();
        let collection = svc.list("alice").await.unwrap();
        assert_eq!(collection.playlists[0].tracks[0].rating, 5);
    }

    #[tokio::test]
    async fn test_replace_all_round_trips_through_list() {
        let (svc, _dir) = service().await;

        let mut playlist = gym_playlist("1", "alice");
        playlist.tracks.push(Track {
            source: TrackSource::Catalog {
                video_id: "v1".to_string(),
            },
            title: "Song".to_string(),
            artist: "Artist".to_string(),
            thumbnail: "https://example.com/t.jpg".to_string(),
            duration: Some("4:13".to_string()),
            view_count: Some("12.3K".to_string()),
            rating: 4,
            added_at: 1700000000000,
        });

        svc.replace_all("alice", vec![playlist.clone()]).await.unwrap();
        let collection = svc.list("alice").await.unwrap();
        assert_eq!(collection.playlists, vec![playlist]);
    }

    /// The bob scenario: deleting another owner's playlist never confirms
    /// its existence, and leaves it untouched.
    #[tokio::test]
    async fn test_delete_never_crosses_owners() {
        let (svc, _dir) = service().await;
        svc.replace_all("alice", vec![gym_playlist("1", "alice")])
            .await
            .unwrap();

        let err = svc.delete("bob", "1").await.unwrap_err();
        assert!(matches!(err, PlaylistError::PlaylistNotFound));

        let collection = svc.list("alice").await.unwrap();
        assert_eq!(collection.playlists.len(), 1);
    }

    #[tokio::test]
    async fn test_delete_missing_playlist_is_not_found() {
        let (svc, _dir) = service().await;
        let err = svc.delete("alice", "nope").await.unwrap_err();
        assert!(matches!(err, PlaylistError::PlaylistNotFound));
    }

    #[tokio::test]
    async fn test_delete_removes_playlist_and_its_tracks() {
        let (svc, _dir) = service().await;
        svc.replace_all("alice", vec![gym_playlist("1", "alice"), gym_playlist("2", "alice")])
            .await
            .unwrap();
        svc.add_track("alice", "1", song("v9")).await.unwrap();

        svc.delete("alice", "1").await.unwrap();

        let collection = svc.list("alice").await.unwrap();
        assert_eq!(collection.playlists.len(), 1);
        assert_eq!(collection.playlists[0].id, "2");
    }

    /// Mutations against a foreign-owned playlist fail and leave stored
    /// state unchanged.
    #[tokio::test]
    async fn test_mutations_against_foreign_playlist_are_forbidden() {
        let (svc, dir) = service().await;

        // A playlist that somehow carries another owner's tag inside
        // bob's document: the owner check still trips.
        let store = DocumentStore::open(dir.path()).await.unwrap();
        store
            .save(
                "bob",
                &Collection {
                    playlists: vec![gym_playlist("1", "alice")],
                },
            )
            .await
            .unwrap();

        let err = svc.add_track("bob", "1", song("v9")).await.unwrap_err();
        assert!(matches!(err, PlaylistError::NotOwner));

        let err = svc.remove_track("bob", "1", "v9").await.unwrap_err();
        assert!(matches!(err, PlaylistError::NotOwner));

        let collection: Collection = store.load("bob").await.unwrap();
        assert!(collection.playlists[0].tracks.is_empty());
    }

    #[tokio::test]
    async fn test_list_backfills_missing_owner_tag() {
        let (svc, dir) = service().await;

        let store = DocumentStore::open(dir.path()).await.unwrap();
        store
            .save(
                "alice",
                &Collection {
                    playlists: vec![Playlist {
                        id: "1".to_string(),
                        user_id: String::new(),
                        name: "Old format".to_string(),
                        tracks: Vec::new(),
                    }],
                },
            )
            .await
            .unwrap();

        let collection = svc.list("alice").await.unwrap();
        assert_eq!(collection.playlists[0].user_id, "alice");

        // A healed playlist is mutable by its owner
        svc.add_track("alice", "1", song("v9")).await.unwrap();
    }

    #[tokio::test]
    async fn test_attach_upload_synthesizes_default_playlist() {
        let (svc, _dir) = service().await;

        let track = svc
            .attach_upload("alice", blob(), UploadMeta::default())
            .await
            .unwrap();

        assert_eq!(track.title, "morning jog");
        assert_eq!(track.artist, "Unknown Artist");
        assert_eq!(track.duration.as_deref(), Some("0:00"));
        assert_eq!(track.rating, 0);
        assert!(matches!(track.source, TrackSource::Upload { .. }));

        let collection = svc.list("alice").await.unwrap();
        assert_eq!(collection.playlists.len(), 1);
        assert_eq!(collection.playlists[0].name, "My Playlist");
        assert_eq!(collection.playlists[0].tracks.len(), 1);
    }

    #[tokio::test]
    async fn test_attach_upload_targets_requested_playlist() {
        let (svc, _dir) = service().await;
        svc.replace_all("alice", vec![gym_playlist("1", "alice"), gym_playlist("2", "alice")])
            .await
            .unwrap();

        let meta = UploadMeta {
            playlist_id: Some("2".to_string()),
            title: Some("Custom title".to_string()),
            artist: Some("Someone".to_string()),
            duration: Some("2:45".to_string()),
        };

        let track = svc.attach_upload("alice", blob(), meta).await.unwrap();
        assert_eq!(track.title, "Custom title");
        assert_eq!(track.artist, "Someone");
        assert_eq!(track.duration.as_deref(), Some("2:45"));

        let collection = svc.list("alice").await.unwrap();
        assert!(collection.playlists[0].tracks.is_empty());
        assert_eq!(collection.playlists[1].tracks.len(), 1);
    }

    #[tokio::test]
    async fn test_attach_upload_falls_back_to_first_playlist() {
        let (svc, _dir) = service().await;
        svc.replace_all("alice", vec![gym_playlist("1", "alice"), gym_playlist("2", "alice")])
            .await
            .unwrap();

        let meta = UploadMeta {
            playlist_id: Some("does-not-exist".to_string()),
            ..UploadMeta::default()
        };

        svc.attach_upload("alice", blob(), meta).await.unwrap();

        let collection = svc.list("alice").await.unwrap();
        assert_eq!(collection.playlists[0].tracks.len(), 1);
        assert!(collection.playlists[1].tracks.is_empty());
    }

    #[tokio::test]
    async fn test_attach_upload_allows_same_file_twice() {
        let (svc, _dir) = service().await;

        svc.attach_upload("alice", blob(), UploadMeta::default())
            .await
            .unwrap();
        svc.attach_upload("alice", blob(), UploadMeta::default())
            .await
            .unwrap();

        let collection = svc.list("alice").await.unwrap();
        assert_eq!(collection.playlists[0].tracks.len(), 2);
    }
}
