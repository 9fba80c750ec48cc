//! Application state shared across handlers

use crate::{
    catalog::CatalogClient,
    jwt::JwtService,
    repositories::{PlaylistService, UserRepository},
    storage::UploadStore,
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub jwt_service: JwtService,
    pub user_repository: UserRepository,
    pub playlist_service: PlaylistService,
    pub catalog_client: CatalogClient,
    pub upload_store: UploadStore,
}
