//! TOML config file loading and creation.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::errors::ConfigError;

// ---------------------------------------------------------------------------
// Schema
// ---------------------------------------------------------------------------

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PadConfig {
    pub server: ServerConfig,
}

/// Configuration for the remote server endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Origin of the server, e.g. "http://192.168.1.50:8080".
    /// `ws`/`wss` schemes are accepted as well.
    pub origin: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            origin: "http://localhost:8080".into(),
        }
    }
}

impl ServerConfig {
    /// Derive the WebSocket endpoint from the configured origin.
    ///
    /// `https` and `wss` origins map to `wss`; `http`, `ws`, and bare
    /// hosts map to `ws`. The event stream always lives at `/ws`.
    pub fn websocket_url(&self) -> String {
        let origin = self.origin.trim().trim_end_matches('/');
        let (scheme, host) = if let Some(host) = origin.strip_prefix("https://") {
            ("wss", host)
        } else if let Some(host) = origin.strip_prefix("wss://") {
            ("wss", host)
        } else if let Some(host) = origin.strip_prefix("http://") {
            ("ws", host)
        } else if let Some(host) = origin.strip_prefix("ws://") {
            ("ws", host)
        } else {
            ("ws", origin)
        };
        format!("{scheme}://{host}/ws")
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Load config from a specific TOML file path.
///
/// Deserializes the file using serde defaults for any missing fields.
/// After loading, the config is validated; if validation fails, a warning
/// is logged and the default config is returned.
pub fn load_from_path(path: &Path) -> Result<PadConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path).map_err(|e| {
        ConfigError::ParseError(format!("failed to read {}: {e}", path.display()))
    })?;

    let config: PadConfig = toml::from_str(&content)
        .map_err(|e| ConfigError::ParseError(format!("failed to parse TOML: {e}")))?;

    // Validate and warn on errors, but still return a usable config
    if let Err(e) = validate(&config) {
        warn!("config validation warning: {e}");
        warn!("falling back to default config");
        return Ok(PadConfig::default());
    }

    info!("loaded config from {}", path.display());
    Ok(config)
}

/// Load config from the platform-specific default path.
///
/// On macOS: `~/Library/Application Support/remotepad/config.toml`
/// On Linux: `~/.config/remotepad/config.toml`
///
/// If the file does not exist, creates a default config file and returns defaults.
pub fn load_default() -> Result<PadConfig, ConfigError> {
    let path = default_config_path()?;

    if !path.exists() {
        info!("no config found at {}, creating default", path.display());
        create_default_config(&path)?;
        return Ok(PadConfig::default());
    }

    load_from_path(&path)
}

/// Get the platform-specific default config file path.
pub fn default_config_path() -> Result<std::path::PathBuf, ConfigError> {
    let config_dir = dirs::config_dir().ok_or_else(|| {
        ConfigError::ParseError("could not determine config directory".into())
    })?;
    Ok(config_dir.join("remotepad").join("config.toml"))
}

/// Create a default TOML config file with documentation comments.
pub fn create_default_config(path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            ConfigError::ParseError(format!(
                "failed to create config directory {}: {e}",
                parent.display()
            ))
        })?;
    }

    let content = default_config_toml();

    std::fs::write(path, content).map_err(|e| {
        ConfigError::ParseError(format!(
            "failed to write default config to {}: {e}",
            path.display()
        ))
    })?;

    info!("created default config at {}", path.display());
    Ok(())
}

/// Generate the default TOML config content with comments.
fn default_config_toml() -> String {
    r##"# remotepad configuration
# Only override what you want to change -- missing fields use defaults.

[server]
# Origin of the remotepad server. https and wss origins connect over
# wss; anything else uses plain ws. The path is always /ws.
origin = "http://localhost:8080"
"##
    .to_string()
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &PadConfig) -> Result<(), ConfigError> {
    let origin = config.server.origin.trim();
    if origin.is_empty() {
        return Err(ConfigError::ValidationError(
            "server.origin must not be empty".into(),
        ));
    }
    if origin.contains(char::is_whitespace) {
        return Err(ConfigError::ValidationError(format!(
            "server.origin contains whitespace: {origin:?}"
        )));
    }
    Ok(())
}
