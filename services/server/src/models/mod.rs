//! Data models for the Playdeck server

pub mod playlist;
pub mod user;

pub use playlist::{Collection, NewTrack, Playlist, Track, TrackSource};
pub use user::{NewUser, PublicUser, User, UserRegistry};
