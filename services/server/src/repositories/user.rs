//! User repository over the user registry document

use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use thiserror::Error;
use tracing::info;

use common::{error::StoreError, store::DocumentStore};

use crate::models::{NewUser, User, UserRegistry, user::DEFAULT_IMAGE_URL};

/// Key of the user registry document
const USERS_KEY: &str = "users";

/// Errors from user registry operations
#[derive(Error, Debug)]
pub enum UserError {
    /// Registration with a username that is already taken
    #[error("Username \"{0}\" already exists. Please choose a different username.")]
    UsernameTaken(String),

    /// Login with an unknown username or wrong password; the two cases are
    /// deliberately indistinguishable
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// Password hashing failure
    #[error("Failed to process credentials: {0}")]
    Hash(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// User repository
#[derive(Clone)]
pub struct UserRepository {
    store: DocumentStore,
}

impl UserRepository {
    /// Create a new user repository
    pub fn new(store: DocumentStore) -> Self {
        Self { store }
    }

    /// Register a new user
    ///
    /// The check-then-insert runs under the registry guard so two
    /// concurrent registrations cannot claim the same username.
    pub async fn register(&self, new_user: NewUser) -> Result<User, UserError> {
        info!("Registering new user: {}", new_user.username);

        let salt = SaltString::generate(&mut rand::thread_rng());
        let argon2 = Argon2::default();
        let password_hash = argon2
            .hash_password(new_user.password.as_bytes(), &salt)
            .map_err(|e| UserError::Hash(e.to_string()))?
            .to_string();

        let image_url = new_user
            .image_url
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| DEFAULT_IMAGE_URL.to_string());

        let user = User {
            username: new_user.username,
            name: new_user.name,
            image_url,
            password_hash,
        };

        let _guard = self.store.acquire(USERS_KEY).await;
        let mut registry: UserRegistry = self.store.load(USERS_KEY).await?;

        if registry.find(&user.username).is_some() {
            return Err(UserError::UsernameTaken(user.username));
        }

        registry.users.push(user.clone());
        self.store.save(USERS_KEY, &registry).await?;

        info!("User registered successfully: {}", user.username);
        Ok(user)
    }

    /// Verify a username/password pair and return the matching user
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<User, UserError> {
        let registry: UserRegistry = self.store.load(USERS_KEY).await?;

        let user = registry
            .find(username)
            .ok_or(UserError::InvalidCredentials)?;

        let parsed_hash =
            PasswordHash::new(&user.password_hash).map_err(|e| UserError::Hash(e.to_string()))?;

        Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .map_err(|_| UserError::InvalidCredentials)?;

        Ok(user.clone())
    }

    /// Find a user by username
    pub async fn find(&self, username: &str) -> Result<Option<User>, UserError> {
        let registry: UserRegistry = self.store.load(USERS_KEY).await?;
        Ok(registry.find(username).cloned())
    }
}
