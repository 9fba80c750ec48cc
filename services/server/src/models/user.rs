//! User model and related functionality

use serde::{Deserialize, Serialize};

/// Fallback avatar shown when a user registers without an image
pub const DEFAULT_IMAGE_URL: &str = "https://via.placeholder.com/150";

/// User entity as persisted in the user registry document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique, immutable username; also the document-store key for the
    /// user's playlist collection
    pub username: String,
    /// Display name
    pub name: String,
    /// Display image URL
    pub image_url: String,
    /// Argon2 credential hash, opaque to the rest of the service
    pub password_hash: String,
}

impl User {
    /// Projection safe to return to clients
    pub fn public(&self) -> PublicUser {
        PublicUser {
            username: self.username.clone(),
            name: self.name.clone(),
            image_url: self.image_url.clone(),
        }
    }
}

/// User registration payload
#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub name: String,
    pub image_url: Option<String>,
}

/// User projection without credentials
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicUser {
    pub username: String,
    pub name: String,
    pub image_url: String,
}

/// The full user list, persisted as one document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserRegistry {
    pub users: Vec<User>,
}

impl UserRegistry {
    pub fn find(&self, username: &str) -> Option<&User> {
        self.users.iter().find(|u| u.username == username)
    }
}
