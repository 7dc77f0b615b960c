use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub signing: SigningConfig,

    #[serde(default)]
    pub streaming: StreamingConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Catalog database file.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            db_path: default_db_path(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_db_path() -> PathBuf {
    PathBuf::from("versecast.db")
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SigningConfig {
    /// HMAC key for segment URL signatures.
    #[serde(default)]
    pub key: String,

    /// Key identifier embedded in signed URLs.
    #[serde(default = "default_key_id")]
    pub key_id: String,

    /// CDN base URL signed paths are appended to.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Lifetime of a signed URL in seconds (default: 1 hour).
    #[serde(default = "default_signing_ttl")]
    pub ttl_secs: u64,
}

impl Default for SigningConfig {
    fn default() -> Self {
        Self {
            key: String::new(),
            key_id: default_key_id(),
            base_url: default_base_url(),
            ttl_secs: default_signing_ttl(),
        }
    }
}

fn default_key_id() -> String {
    "versecast".to_string()
}

fn default_base_url() -> String {
    "https://content.versecast.local".to_string()
}

fn default_signing_ttl() -> u64 {
    3600
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StreamingConfig {
    /// Duration assumed for discrete files with no stored duration.
    #[serde(default = "default_fallback_duration")]
    pub fallback_duration_secs: f64,

    /// Lifetime of a cached playlist assembly (default: 6 hours).
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl_secs: u64,

    /// Maximum number of cached playlist assemblies.
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,
}

impl Default for StreamingConfig {
    fn default() -> Self {
        Self {
            fallback_duration_secs: default_fallback_duration(),
            cache_ttl_secs: default_cache_ttl(),
            cache_capacity: default_cache_capacity(),
        }
    }
}

fn default_fallback_duration() -> f64 {
    180.0
}

fn default_cache_ttl() -> u64 {
    6 * 3600
}

fn default_cache_capacity() -> usize {
    512
}
