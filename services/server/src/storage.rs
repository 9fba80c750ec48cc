//! Blob store for uploaded audio files
//!
//! Uploaded bytes are written under a generated unique name and exposed to
//! clients through the `/uploads` static route. Type and size constraints
//! are enforced here, before anything touches the disk.

use std::env;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;
use uuid::Uuid;

/// Upload configuration
#[derive(Debug, Clone)]
pub struct UploadConfig {
    /// Directory holding uploaded files
    pub upload_dir: PathBuf,
    /// Maximum accepted file size in bytes
    pub max_bytes: usize,
}

impl UploadConfig {
    /// Create a new UploadConfig from environment variables
    ///
    /// # Environment Variables
    /// - `PLAYDECK_UPLOAD_DIR`: Directory for uploaded files (default: `./uploads`)
    /// - `PLAYDECK_MAX_UPLOAD_BYTES`: Size limit per file (default: 10 MiB)
    pub fn from_env() -> Self {
        let upload_dir = env::var("PLAYDECK_UPLOAD_DIR").unwrap_or_else(|_| "./uploads".to_string());

        let max_bytes = env::var("PLAYDECK_MAX_UPLOAD_BYTES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(10 * 1024 * 1024);

        Self {
            upload_dir: PathBuf::from(upload_dir),
            max_bytes,
        }
    }
}

/// Errors from blob store operations
#[derive(Error, Debug)]
pub enum UploadError {
    #[error("No file uploaded")]
    MissingFile,

    #[error("Only MP3 files are allowed")]
    UnsupportedType,

    #[error("File exceeds the {0} byte upload limit")]
    TooLarge(usize),

    #[error("Upload I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Reference to a stored blob
#[derive(Debug, Clone)]
pub struct StoredBlob {
    /// URL path the blob is served at
    pub file_url: String,
    /// Original filename as supplied by the client
    pub original_name: String,
}

/// Caller-supplied metadata accompanying an upload
#[derive(Debug, Clone, Default)]
pub struct UploadMeta {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub duration: Option<String>,
    pub playlist_id: Option<String>,
}

/// Blob store writing uploads to a local directory
#[derive(Clone)]
pub struct UploadStore {
    dir: PathBuf,
    max_bytes: usize,
}

impl UploadStore {
    /// Open the blob store, creating the upload directory if needed
    pub async fn open(config: &UploadConfig) -> Result<Self, UploadError> {
        tokio::fs::create_dir_all(&config.upload_dir).await?;

        Ok(Self {
            dir: config.upload_dir.clone(),
            max_bytes: config.max_bytes,
        })
    }

    /// Directory uploads are written to
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// Persist uploaded bytes and return a retrievable reference
    pub async fn store(
        &self,
        original_name: &str,
        content_type: &str,
        bytes: &[u8],
    ) -> Result<StoredBlob, UploadError> {
        if content_type != "audio/mpeg" && content_type != "audio/mp3" {
            return Err(UploadError::UnsupportedType);
        }

        if bytes.len() > self.max_bytes {
            return Err(UploadError::TooLarge(self.max_bytes));
        }

        let extension = Path::new(original_name)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("mp3");

        let filename = format!("audio-{}.{}", Uuid::new_v4(), extension);
        tokio::fs::write(self.dir.join(&filename), bytes).await?;

        info!(
            "Stored upload '{}' as {} ({} bytes)",
            original_name,
            filename,
            bytes.len()
        );

        Ok(StoredBlob {
            file_url: format!("/uploads/{}", filename),
            original_name: original_name.to_string(),
        })
    }
}
