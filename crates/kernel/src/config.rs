//! Configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};

/// Application configuration.
///
/// Read once at startup; never mutated.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port (default: 3000).
    pub port: u16,

    /// PostgreSQL connection URL.
    pub database_url: String,

    /// Maximum database connections in pool (default: 10).
    pub database_max_connections: u32,

    /// Path to uploads directory (default: ./public/uploads).
    pub uploads_dir: PathBuf,

    /// Base URL for serving uploaded files (default: /uploads).
    pub files_url: String,

    /// Maximum upload size in bytes (default: 1000000).
    pub max_upload_size: usize,

    /// Secret used to sign bearer tokens (required, >= 32 bytes).
    pub jwt_secret: String,

    /// Bearer token lifetime in seconds (default: 30 days).
    pub jwt_expiry_secs: i64,

    /// Geocoding service base URL.
    pub geocoder_url: String,

    /// Optional geocoding service API key.
    pub geocoder_api_key: Option<String>,

    /// CORS allowed origins (comma-separated, default: "*").
    pub cors_allowed_origins: Vec<String>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .context("PORT must be a valid u16")?;

        let database_url =
            env::var("DATABASE_URL").context("DATABASE_URL environment variable is required")?;

        let database_max_connections = env::var("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "10".to_string())
            .parse()
            .context("DATABASE_MAX_CONNECTIONS must be a valid u32")?;

        let uploads_dir = env::var("UPLOADS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./public/uploads"));

        let files_url = env::var("FILES_URL").unwrap_or_else(|_| "/uploads".to_string());

        let max_upload_size = env::var("MAX_UPLOAD_SIZE")
            .unwrap_or_else(|_| "1000000".to_string())
            .parse()
            .context("MAX_UPLOAD_SIZE must be a valid byte count")?;

        let jwt_secret =
            env::var("JWT_SECRET").context("JWT_SECRET environment variable is required")?;
        if jwt_secret.len() < 32 {
            bail!("JWT_SECRET must be at least 32 bytes");
        }

        let jwt_expiry_secs = env::var("JWT_EXPIRY_SECS")
            .unwrap_or_else(|_| (30 * 86400).to_string())
            .parse()
            .context("JWT_EXPIRY_SECS must be a valid i64")?;

        let geocoder_url = env::var("GEOCODER_URL")
            .unwrap_or_else(|_| "https://nominatim.openstreetmap.org".to_string());

        let geocoder_api_key = env::var("GEOCODER_API_KEY").ok();

        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .map(|v| v.split(',').map(|s| s.trim().to_string()).collect())
            .unwrap_or_else(|_| vec!["*".to_string()]);

        Ok(Self {
            port,
            database_url,
            database_max_connections,
            uploads_dir,
            files_url,
            max_upload_size,
            jwt_secret,
            jwt_expiry_secs,
            geocoder_url,
            geocoder_api_key,
            cors_allowed_origins,
        })
    }
}
