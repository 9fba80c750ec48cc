//! Repositories over the document store

pub mod playlist;
pub mod user;

pub use playlist::{PlaylistError, PlaylistService};
pub use user::{UserError, UserRepository};
