//! Application state shared across all handlers.

use std::sync::Arc;

use anyhow::{Context, Result};
use sqlx::PgPool;

use crate::config::Config;
use crate::db;
use crate::file::{FileService, LocalFileStorage};
use crate::services::geocoder::{Geocoder, HttpGeocoder};
use crate::services::token::TokenService;

/// Shared application state.
///
/// Wrapped in Arc internally so Clone is cheap.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// PostgreSQL connection pool.
    db: PgPool,

    /// Geocoding collaborator.
    geocoder: Arc<dyn Geocoder>,

    /// Photo upload service.
    files: Arc<FileService>,

    /// Bearer token service.
    tokens: TokenService,
}

impl AppState {
    /// Create new application state with database connections.
    pub async fn new(config: &Config) -> Result<Self> {
        // Create PostgreSQL pool
        let db = db::create_pool(config)
            .await
            .context("failed to create database pool")?;

        // Run migrations
        db::run_migrations(&db)
            .await
            .context("failed to run migrations")?;

        let geocoder: Arc<dyn Geocoder> = Arc::new(
            HttpGeocoder::new(&config.geocoder_url, config.geocoder_api_key.clone())
                .context("failed to create geocoder")?,
        );

        let storage = Arc::new(LocalFileStorage::new(
            &config.uploads_dir,
            &config.files_url,
        ));
        let files = Arc::new(FileService::new(storage, config.max_upload_size));

        let tokens = TokenService::new(config.jwt_secret.as_bytes(), config.jwt_expiry_secs);

        Ok(Self {
            inner: Arc::new(AppStateInner {
                db,
                geocoder,
                files,
                tokens,
            }),
        })
    }

    /// Get the database pool.
    pub fn db(&self) -> &PgPool {
        &self.inner.db
    }

    /// Get the geocoding collaborator.
    pub fn geocoder(&self) -> &Arc<dyn Geocoder> {
        &self.inner.geocoder
    }

    /// Get the photo upload service.
    pub fn files(&self) -> &Arc<FileService> {
        &self.inner.files
    }

    /// Get the bearer token service.
    pub fn tokens(&self) -> &TokenService {
        &self.inner.tokens
    }

    /// Check if PostgreSQL is healthy.
    pub async fn postgres_healthy(&self) -> bool {
        db::check_health(&self.inner.db).await
    }
}
