//! Layered application configuration.
//!
//! Sources, later ones winning: built-in defaults (`#[serde(default)]` on
//! every section), an optional TOML file, then
//! `ZENITH_*` environment variables with `__` between nested keys
//! (`ZENITH_CACHE__REMOTE_URL`, `ZENITH_TTL__ANILIST_SECS`).

use anyhow::Context;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

const ENV_PREFIX: &str = "ZENITH";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub cache: CacheSettings,
    pub http: HttpSettings,
    pub ttl: TtlSettings,
    pub log: LogSettings,
}

/// Cache backend selection and sweep cadence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    /// Shared cache server; absent means local cache only
    pub remote_url: Option<String>,
    pub sweep_interval_secs: u64,
    pub default_ttl_secs: u64,
    pub remote_timeout_secs: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            remote_url: None,
            sweep_interval_secs: 60,
            default_ttl_secs: 600,
            remote_timeout_secs: 3,
        }
    }
}

impl CacheSettings {
    #[must_use]
    pub const fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }

    #[must_use]
    pub const fn default_ttl(&self) -> Duration {
        Duration::from_secs(self.default_ttl_secs)
    }

    #[must_use]
    pub const fn remote_timeout(&self) -> Duration {
        Duration::from_secs(self.remote_timeout_secs)
    }

    /// The remote URL, ignoring a blank value
    #[must_use]
    pub fn remote_url(&self) -> Option<&str> {
        self.remote_url.as_deref().map(str::trim).filter(|u| !u.is_empty())
    }
}

/// Outbound HTTP settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpSettings {
    pub timeout_secs: u64,
    pub user_agent: String,
    /// Sent as `Referer` on image downloads; blank sends none
    pub image_referer: String,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_secs: 8,
            user_agent: format!("Zenith/{}", env!("CARGO_PKG_VERSION")),
            image_referer: "https://mangafire.to/".to_string(),
        }
    }
}

impl HttpSettings {
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    #[must_use]
    pub fn image_referer(&self) -> Option<&str> {
        Some(self.image_referer.trim()).filter(|r| !r.is_empty())
    }
}

/// Per-namespace cache lifetimes, in seconds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TtlSettings {
    pub popular_secs: u64,
    pub manga_info_secs: u64,
    pub chapters_secs: u64,
    pub anilist_secs: u64,
    pub character_secs: u64,
    pub artwork_secs: u64,
    pub image_secs: u64,
}

impl Default for TtlSettings {
    fn default() -> Self {
        const MINUTE: u64 = 60;
        const HOUR: u64 = 60 * MINUTE;

        Self {
            popular_secs: 10 * MINUTE,
            manga_info_secs: 30 * MINUTE,
            chapters_secs: 30 * MINUTE,
            anilist_secs: 12 * HOUR,
            character_secs: 24 * HOUR,
            artwork_secs: 12 * HOUR,
            image_secs: HOUR,
        }
    }
}

impl TtlSettings {
    #[must_use]
    pub const fn popular(&self) -> Duration {
        Duration::from_secs(self.popular_secs)
    }

    #[must_use]
    pub const fn manga_info(&self) -> Duration {
        Duration::from_secs(self.manga_info_secs)
    }

    #[must_use]
    pub const fn chapters(&self) -> Duration {
        Duration::from_secs(self.chapters_secs)
    }

    #[must_use]
    pub const fn anilist(&self) -> Duration {
        Duration::from_secs(self.anilist_secs)
    }

    #[must_use]
    pub const fn character(&self) -> Duration {
        Duration::from_secs(self.character_secs)
    }

    #[must_use]
    pub const fn artwork(&self) -> Duration {
        Duration::from_secs(self.artwork_secs)
    }

    #[must_use]
    pub const fn image(&self) -> Duration {
        Duration::from_secs(self.image_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// `EnvFilter` directives, overridden by `RUST_LOG`
    pub filter: String,
    pub json: bool,
    /// Also write daily-rotated log files here
    pub directory: Option<PathBuf>,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            filter: "zenith=info".to_string(),
            json: false,
            directory: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from `path` (or [`AppConfig::default_path`]) and the
    /// environment. A missing file is not an error.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let path = path.map(Path::to_path_buf).or_else(Self::default_path);

        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path).format(FileFormat::Toml).required(false));
        }

        builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to read configuration")?
            .try_deserialize()
            .context("Invalid configuration")
    }

    /// `{config dir}/zenith/config.toml`
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("zenith").join("config.toml"))
    }
}
