//! Configuration loading and credential resolution
//!
//! Configuration comes from an optional TOML file. Credentials may also be
//! supplied through environment variables, which take priority over the file.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Environment variable holding the Spotify client ID
pub const ENV_SPOTIFY_CLIENT_ID: &str = "GENREFILL_SPOTIFY_CLIENT_ID";
/// Environment variable holding the Spotify client secret
pub const ENV_SPOTIFY_CLIENT_SECRET: &str = "GENREFILL_SPOTIFY_CLIENT_SECRET";
/// Environment variable holding the Last.fm API key
pub const ENV_LASTFM_API_KEY: &str = "GENREFILL_LASTFM_API_KEY";

/// Top-level TOML configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TomlConfig {
    pub logging: LoggingConfig,
    pub spotify: SpotifyConfig,
    pub lastfm: LastFmConfig,
    pub output: OutputConfig,
    pub pacing: PacingConfig,
    pub http: HttpConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive when RUST_LOG is unset (e.g. "info", "debug")
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Spotify client-credentials pair
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SpotifyConfig {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
}

/// Last.fm API settings
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LastFmConfig {
    pub api_key: Option<String>,
}

/// SQL output settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OutputConfig {
    /// Table targeted by the generated UPDATE statements
    pub table: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            table: "artists".to_string(),
        }
    }
}

/// Delay applied after each artist, selected by the source that answered.
/// All values in milliseconds.
///
/// Unknown keys are rejected so a misspelled delay cannot fall back to its
/// default unnoticed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct PacingConfig {
    pub spotify_ms: u64,
    pub lastfm_ms: u64,
    pub musicbrainz_ms: u64,
    pub scrape_ms: u64,
    pub default_ms: u64,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            spotify_ms: 200,
            lastfm_ms: 300,
            musicbrainz_ms: 1100,
            scrape_ms: 1000,
            default_ms: 100,
        }
    }
}

impl PacingConfig {
    /// Pacing with every delay set to zero
    pub fn none() -> Self {
        Self {
            spotify_ms: 0,
            lastfm_ms: 0,
            musicbrainz_ms: 0,
            scrape_ms: 0,
            default_ms: 0,
        }
    }
}

/// HTTP client settings shared by every source
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct HttpConfig {
    /// User-Agent sent to JSON APIs (MusicBrainz requires a descriptive one)
    pub user_agent: String,
    /// User-Agent sent when fetching HTML pages
    pub browser_user_agent: String,
    /// Per-request deadline for Spotify, Last.fm and scraped pages
    pub api_timeout_secs: u64,
    /// Per-request deadline for MusicBrainz
    pub musicbrainz_timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: format!("GenreFiller/{}", env!("CARGO_PKG_VERSION")),
            browser_user_agent:
                "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36".to_string(),
            api_timeout_secs: 10,
            musicbrainz_timeout_secs: 15,
        }
    }
}

/// Default configuration file location: `<config_dir>/genrefill/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("genrefill").join("config.toml"))
}

/// Load configuration
///
/// An explicit path must exist. Without one, the default location is tried and
/// a missing file yields the default configuration.
pub fn load_toml_config(explicit: Option<&Path>) -> Result<TomlConfig> {
    let path = match explicit {
        Some(path) => {
            if !path.exists() {
                return Err(Error::NotFound(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            path.to_path_buf()
        }
        None => match default_config_path() {
            Some(path) if path.exists() => path,
            _ => {
                debug!("No config file found, using defaults");
                return Ok(TomlConfig::default());
            }
        },
    };

    let content = std::fs::read_to_string(&path)
        .map_err(|e| Error::Config(format!("Read TOML failed: {}", e)))?;
    let config = toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse TOML failed: {}", e)))?;

    info!("Configuration loaded from {}", path.display());
    Ok(config)
}

/// Validate a credential value (non-empty, non-whitespace)
pub fn is_valid_key(key: &str) -> bool {
    !key.trim().is_empty()
}

/// Resolve a credential
///
/// **Priority:** environment variable → TOML value. Blank values are skipped.
pub fn resolve_credential(env_var_name: &str, toml_value: Option<&str>) -> Option<String> {
    if let Ok(value) = std::env::var(env_var_name) {
        if is_valid_key(&value) {
            debug!(env = env_var_name, "Credential loaded from environment variable");
            return Some(value.trim().to_string());
        }
    }

    toml_value
        .filter(|value| is_valid_key(value))
        .map(|value| value.trim().to_string())
}

/// Expand a leading `~` to the home directory
pub fn expand_home(path: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => match dirs::home_dir() {
            Some(home) => home.join(rest),
            None => path.to_path_buf(),
        },
        Err(_) => path.to_path_buf(),
    }
}

/// Default output directory (the user's home directory)
pub fn default_output_dir() -> Result<PathBuf> {
    dirs::home_dir()
        .ok_or_else(|| Error::Config("Could not determine home directory".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_keys_are_invalid() {
        assert!(!is_valid_key(""));
        assert!(!is_valid_key("   "));
        assert!(is_valid_key("abc123"));
    }

    #[test]
    fn test_defaults() {
        let config = TomlConfig::default();
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.output.table, "artists");
        assert_eq!(config.pacing.musicbrainz_ms, 1100);
        assert_eq!(config.http.api_timeout_secs, 10);
        assert_eq!(config.http.musicbrainz_timeout_secs, 15);
        assert!(config.spotify.client_id.is_none());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: TomlConfig = toml::from_str(
            r#"
            [lastfm]
            api_key = "lfm"

            [pacing]
            scrape_ms = 50
            "#,
        )
        .unwrap();

        assert_eq!(config.lastfm.api_key.as_deref(), Some("lfm"));
        assert_eq!(config.pacing.scrape_ms, 50);
        assert_eq!(config.pacing.spotify_ms, 200);
        assert_eq!(config.output.table, "artists");
    }

    #[test]
    fn test_expand_home_leaves_plain_paths() {
        let path = Path::new("/tmp/out");
        assert_eq!(expand_home(path), PathBuf::from("/tmp/out"));
    }

    #[test]
    fn test_expand_home_replaces_tilde() {
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_home(Path::new("~/reports")), home.join("reports"));
            assert_eq!(expand_home(Path::new("~")), home);
        }
    }
}
