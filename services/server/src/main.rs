use anyhow::Result;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

mod catalog;
mod error;
mod jwt;
mod middleware;
mod models;
mod repositories;
mod routes;
mod state;
mod storage;
mod validation;

use common::store::{DocumentStore, StoreConfig};
use tokio::net::TcpListener;

use crate::{
    catalog::{CatalogClient, CatalogConfig},
    jwt::{JwtConfig, JwtService},
    repositories::{PlaylistService, UserRepository},
    state::AppState,
    storage::{UploadConfig, UploadStore},
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    info!("Starting Playdeck server");

    // One store for the user registry, one for per-owner playlist
    // collections, mirroring the data/users.json + data/playlists/<user>
    // layout on disk.
    let store_config = StoreConfig::from_env()?;
    let registry_store = DocumentStore::open(&store_config.data_dir).await?;
    let playlist_store = DocumentStore::open(store_config.data_dir.join("playlists")).await?;

    let jwt_service = JwtService::new(JwtConfig::from_env()?);
    let upload_store = UploadStore::open(&UploadConfig::from_env()).await?;
    let catalog_client = CatalogClient::new(CatalogConfig::from_env());

    let user_repository = UserRepository::new(registry_store);
    let playlist_service = PlaylistService::new(playlist_store);

    info!("Playdeck server initialized successfully");

    let app_state = AppState {
        jwt_service,
        user_repository,
        playlist_service,
        catalog_client,
        upload_store,
    };

    // Start the web server
    let app = routes::create_router(app_state);

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3000);

    let listener = TcpListener::bind(("0.0.0.0", port)).await?;
    info!("Playdeck server listening on 0.0.0.0:{}", port);

    axum::serve(listener, app).await?;

    Ok(())
}
