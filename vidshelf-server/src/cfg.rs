use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use config::Config;

fn default_listen_addr() -> String {
    "127.0.0.1".to_string()
}

fn default_listen_port() -> u16 {
    8080
}

fn default_pool_size() -> usize {
    16
}

fn default_video_extensions() -> Vec<String> {
    ["mp4", "mkv", "webm", "mov", "mp3", "avi", "flv"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_ffmpeg_path() -> PathBuf {
    "ffmpeg".into()
}

fn default_frame_offset() -> std::time::Duration {
    std::time::Duration::from_secs(10)
}

#[derive(serde::Deserialize, Debug, Clone)]
pub struct HttpServerConfig {
    /// Address/interface to listen for TCP connections.
    #[serde(default = "default_listen_addr")]
    pub listen_address: String,

    /// Port to listen for TCP connections.
    #[serde(default = "default_listen_port")]
    pub listen_port: u16,
}

#[derive(serde::Deserialize, Debug, Clone)]
pub struct LibraryConfig {
    /// Folder where newly downloaded videos wait to be checked in.
    pub checkin_path: PathBuf,

    /// Root of the dated `YYYY/MM/DD` folders holding checked-in videos.
    pub media_path: PathBuf,

    /// Root of the `YYYY/MM` folders holding generated thumbnails.
    pub thumbnail_path: PathBuf,

    /// File extensions (without the dot, case-insensitive) considered video files.
    #[serde(default = "default_video_extensions")]
    pub video_extensions: Vec<String>,

    /// The ffmpeg executable used to generate thumbnails.
    #[serde(default = "default_ffmpeg_path")]
    pub ffmpeg_path: PathBuf,

    /// Position of the frame grabbed as thumbnail when the video has no cover image.
    #[serde(with = "humantime_serde", default = "default_frame_offset")]
    pub frame_offset: std::time::Duration,
}

#[derive(serde::Deserialize, Debug, Clone)]
pub struct DbConfig {
    /// The maximum amount of time that the DB thread will wait until the DB is available for its
    /// operation. Sqlite does not allow concurrent reads and writes, and therefore, it might block
    /// until one completes
    #[serde(with = "humantime_serde")]
    pub busy_timeout: std::time::Duration,

    /// The path where the database contents and the log file are stored
    pub runtime_path: PathBuf,

    /// Maximum number of pooled database connections
    #[serde(default = "default_pool_size")]
    pub pool_size: usize,
}

impl DbConfig {
    pub fn db_path(&self) -> PathBuf {
        self.runtime_path.join("videos.db")
    }

    pub fn log_path(&self) -> PathBuf {
        self.runtime_path.join("vidshelf.log")
    }
}

#[derive(serde::Deserialize, Debug, Clone)]
pub struct VidshelfConfig {
    /// Enables debug logging/tracing.
    #[serde(default)]
    pub debug: bool,

    /// HTTP Server configuration
    pub http_config: HttpServerConfig,

    /// Database configuration
    pub db_config: DbConfig,

    /// Check-in and playlist configuration
    pub library_config: LibraryConfig,
}

/// Parses the configuration of vidshelf, returning a VidshelfConfig struct.
/// Uses the given path to read a structured file format (toml, yaml, json, etc).
/// Individual values can be overriden by `VIDSHELF_`-prefixed environment variables.
pub fn get_config(path: &Path) -> Result<VidshelfConfig> {
    let config = Config::builder()
        .add_source(config::File::with_name(
            path.to_str()
                .context("Parsing configuration path as a str")?,
        ))
        .add_source(config::Environment::with_prefix("VIDSHELF").separator("__"))
        .build()
        .context("Building the configuration of vidshelf from file and environment")?;

    config
        .try_deserialize()
        .context("Deserializing the configuration as VidshelfConfig")
}
