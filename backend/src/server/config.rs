//! Service settings and the derived HTTP server configuration.

use std::path::{Path, PathBuf};

use actix_web::cookie::Key;
use ortho_config::OrthoConfig;
use serde::Deserialize;
use tracing::warn;
use zeroize::Zeroize;

use tenant_customers::inbound::http::state::HttpState;
use tenant_customers::outbound::persistence::DEFAULT_POOL_MAX_SIZE;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_SESSION_KEY_FILE: &str = "/var/run/secrets/session_key";
/// `Key::derive_from` needs at least this much master key material.
const SESSION_KEY_MIN_LEN: usize = 32;

/// Settings loaded from `CUSTOMERS_*` environment variables, CLI flags and
/// configuration files.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "CUSTOMERS")]
pub struct ServiceSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL; without one customers live in memory.
    pub database_url: Option<String>,
    /// Maximum pooled database connections.
    pub pool_max_size: Option<u32>,
    /// Apply embedded migrations before serving; defaults to `true`.
    pub run_migrations: Option<bool>,
    /// File holding the session cookie key material.
    pub session_key_file: Option<PathBuf>,
    /// Fall back to a random session key when the key file is unusable.
    pub session_allow_ephemeral: Option<bool>,
    /// Mark the session cookie `Secure`; defaults to `true`.
    pub cookie_secure: Option<bool>,
    /// Accept the development accounts when a database is configured.
    pub fixture_login: Option<bool>,
}

impl ServiceSettings {
    /// Listen address, falling back to the built-in default.
    pub fn bind_addr(&self) -> &str {
        self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR)
    }

    /// Pool size, falling back to the built-in default.
    pub fn pool_max_size(&self) -> u32 {
        self.pool_max_size.unwrap_or(DEFAULT_POOL_MAX_SIZE)
    }

    /// Whether to apply migrations at startup.
    pub fn run_migrations(&self) -> bool {
        self.run_migrations.unwrap_or(true)
    }

    /// Whether a random session key may replace an unusable key file.
    pub fn session_allow_ephemeral(&self) -> bool {
        self.session_allow_ephemeral.unwrap_or(false)
    }

    /// Whether the session cookie carries the `Secure` flag.
    pub fn cookie_secure(&self) -> bool {
        self.cookie_secure.unwrap_or(true)
    }

    /// Whether the development accounts stay enabled alongside a database.
    pub fn fixture_login(&self) -> bool {
        self.fixture_login.unwrap_or(false)
    }

    /// Path of the session key file.
    pub fn session_key_file(&self) -> PathBuf {
        self.session_key_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SESSION_KEY_FILE))
    }
}

/// Errors raised while loading the session key.
#[derive(Debug, thiserror::Error)]
pub enum SessionKeyError {
    /// The key file could not be read.
    #[error("failed to read session key at {path}: {source}")]
    Read {
        /// Key file path.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The key file holds fewer bytes than a cookie key needs.
    #[error("session key at {path} too short: need >= {min_len} bytes, got {length}")]
    TooShort {
        /// Key file path.
        path: PathBuf,
        /// Bytes found.
        length: usize,
        /// Bytes required.
        min_len: usize,
    },
}

fn read_session_key(path: &Path) -> Result<Key, SessionKeyError> {
    let mut bytes = std::fs::read(path).map_err(|source| SessionKeyError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let length = bytes.len();
    let key = if length < SESSION_KEY_MIN_LEN {
        Err(SessionKeyError::TooShort {
            path: path.to_path_buf(),
            length,
            min_len: SESSION_KEY_MIN_LEN,
        })
    } else {
        Ok(Key::derive_from(&bytes))
    };
    bytes.zeroize();
    key
}

/// Load the session key, generating an ephemeral one when allowed.
///
/// # Errors
///
/// Returns [`SessionKeyError`] when the key file is unusable and ephemeral
/// keys are not allowed.
pub fn load_session_key(settings: &ServiceSettings) -> Result<Key, SessionKeyError> {
    match read_session_key(&settings.session_key_file()) {
        Ok(key) => Ok(key),
        Err(error) if settings.session_allow_ephemeral() => {
            warn!(%error, "using temporary session key; sessions will not survive restarts");
            Ok(Key::generate())
        }
        Err(error) => Err(error),
    }
}

/// Everything the HTTP server needs once settings are resolved.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) bind_addr: String,
    pub(crate) http_state: HttpState,
}

impl ServerConfig {
    /// Bundle the session key, cookie policy, address and handler state.
    #[must_use]
    pub fn new(key: Key, cookie_secure: bool, bind_addr: impl Into<String>, http_state: HttpState) -> Self {
        Self {
            key,
            cookie_secure,
            bind_addr: bind_addr.into(),
            http_state,
        }
    }
}
