use std::sync::Arc;

use qrvault_core::image_store::ImageStore;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: qrvault_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// On-disk store for generated QR rasters under the public directory.
    pub images: Arc<ImageStore>,
}

impl AppState {
    pub fn new(pool: qrvault_db::DbPool, config: ServerConfig) -> Self {
        let images = Arc::new(ImageStore::new(config.public_dir.clone()));
        Self {
            pool,
            config: Arc::new(config),
            images,
        }
    }
}
