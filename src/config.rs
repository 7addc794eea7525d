//! Server configuration
//!
//! Read once from environment variables at startup; nothing reloads at
//! runtime.

use std::env;
use std::path::{Path, PathBuf};

/// Startup configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Listen address, `host:port`
    pub bind_addr: String,
    /// Directory holding the event log
    pub data_dir: PathBuf,
}

impl ServerConfig {
    /// Read configuration from the environment.
    ///
    /// - `TRACKSIDE_ADDR` (default `0.0.0.0:5000`)
    /// - `TRACKSIDE_DATA_DIR` (default `data`, resolved against the
    ///   working directory when relative)
    pub fn from_env() -> Self {
        let bind_addr =
            env::var("TRACKSIDE_ADDR").unwrap_or_else(|_| "0.0.0.0:5000".to_string());

        let data_dir = match env::var("TRACKSIDE_DATA_DIR") {
            Ok(path) => {
                if Path::new(&path).is_absolute() {
                    PathBuf::from(path)
                } else {
                    env::current_dir()
                        .unwrap_or_else(|_| PathBuf::from("."))
                        .join(path)
                }
            }
            Err(_) => PathBuf::from("data"),
        };

        Self {
            bind_addr,
            data_dir,
        }
    }
}
