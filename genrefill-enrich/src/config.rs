//! Configuration resolution for genrefill-enrich
//!
//! Credentials resolve with ENV → TOML priority. A missing credential is not an
//! error: the sources that need it are skipped for the run.

use genrefill_common::config::{
    is_valid_key, resolve_credential, HttpConfig, PacingConfig, TomlConfig,
    ENV_LASTFM_API_KEY, ENV_SPOTIFY_CLIENT_ID, ENV_SPOTIFY_CLIENT_SECRET,
};
use std::fmt;
use tracing::{info, warn};

/// Spotify client-credentials pair
#[derive(Clone, PartialEq, Eq)]
pub struct SpotifyCredentials {
    pub client_id: String,
    pub client_secret: String,
}

impl fmt::Debug for SpotifyCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpotifyCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

/// Settings for one enrichment run
#[derive(Debug, Clone)]
pub struct EnrichConfig {
    /// Spotify credentials; `None` disables both Spotify sources
    pub spotify: Option<SpotifyCredentials>,
    /// Last.fm API key; `None` disables Last.fm
    pub lastfm_api_key: Option<String>,
    pub http: HttpConfig,
    pub pacing: PacingConfig,
    /// Table named in the generated UPDATE statements
    pub table: String,
}

impl EnrichConfig {
    /// Resolve run settings from the loaded TOML file and the environment
    pub fn resolve(toml_config: &TomlConfig) -> Self {
        let spotify = resolve_spotify_credentials(toml_config);
        let lastfm_api_key = resolve_key_logged(
            "Last.fm API key",
            ENV_LASTFM_API_KEY,
            toml_config.lastfm.api_key.as_deref(),
        );

        if spotify.is_none() {
            warn!(
                "Spotify credentials not configured ({} / {}); Spotify sources disabled",
                ENV_SPOTIFY_CLIENT_ID, ENV_SPOTIFY_CLIENT_SECRET
            );
        }
        if lastfm_api_key.is_none() {
            warn!(
                "Last.fm API key not configured ({}); Last.fm source disabled",
                ENV_LASTFM_API_KEY
            );
        }

        Self {
            spotify,
            lastfm_api_key,
            http: toml_config.http.clone(),
            pacing: toml_config.pacing.clone(),
            table: toml_config.output.table.clone(),
        }
    }

    /// Settings with no credentials and no pacing, for offline runs
    pub fn offline() -> Self {
        Self {
            spotify: None,
            lastfm_api_key: None,
            http: HttpConfig::default(),
            pacing: PacingConfig::none(),
            table: TomlConfig::default().output.table,
        }
    }
}

/// Both halves of the Spotify pair must resolve, each independently
fn resolve_spotify_credentials(toml_config: &TomlConfig) -> Option<SpotifyCredentials> {
    let client_id = resolve_key_logged(
        "Spotify client ID",
        ENV_SPOTIFY_CLIENT_ID,
        toml_config.spotify.client_id.as_deref(),
    )?;
    let client_secret = resolve_key_logged(
        "Spotify client secret",
        ENV_SPOTIFY_CLIENT_SECRET,
        toml_config.spotify.client_secret.as_deref(),
    )?;

    Some(SpotifyCredentials {
        client_id,
        client_secret,
    })
}

/// Resolve one credential, warning when it is set in both places
fn resolve_key_logged(what: &str, env_var: &str, toml_value: Option<&str>) -> Option<String> {
    let in_env = std::env::var(env_var)
        .map(|v| is_valid_key(&v))
        .unwrap_or(false);
    let in_toml = toml_value.map(is_valid_key).unwrap_or(false);

    if in_env && in_toml {
        warn!(
            "{} found in both environment and TOML config. Using environment (highest priority).",
            what
        );
    }

    let resolved = resolve_credential(env_var, toml_value);
    if resolved.is_some() {
        info!(
            "{} loaded from {}",
            what,
            if in_env { "environment variable" } else { "TOML config" }
        );
    }
    resolved
}
