//! Application configuration types.
//!
//! The top-level [`Config`] struct is deserialized from JSON and carries the
//! server, database and seeding sections. Every section defaults sensibly so
//! a completely empty `{}` file is valid.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::Error;

// ---------------------------------------------------------------------------
// Top-level Config
// ---------------------------------------------------------------------------

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub seed: SeedConfig,
}

impl Config {
    /// Deserialize a `Config` from a JSON string.
    pub fn from_json(json_str: &str) -> Result<Self> {
        serde_json::from_str(json_str)
            .map_err(|e| Error::Validation(format!("config parse error: {e}")))
    }

    /// Load configuration from a file path.
    ///
    /// A missing file yields the defaults; an unreadable or malformed file is
    /// an error so a typo never silently points the service at another
    /// database.
    pub fn load(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(contents) => Self::from_json(&contents).map_err(|e| {
                Error::Validation(format!("{}: {e}", path.display()))
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("No config file at {}; using defaults", path.display());
                Ok(Self::default())
            }
            Err(e) => Err(Error::Io { source: e }),
        }
    }

    /// Return a list of validation warnings (non-fatal issues).
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.server.port == 0 {
            warnings.push("server.port is 0; a random port will be assigned".into());
        }

        if self.database.path.as_os_str().is_empty() {
            warnings.push("database.path is empty".into());
        }

        if self.database.pool_size == 0 {
            warnings.push("database.pool_size is 0; at least 1 connection is used".into());
        }

        if !(4..=31).contains(&self.seed.bcrypt_cost) {
            warnings.push(format!(
                "seed.bcrypt_cost {} is outside 4..=31; the default is used",
                self.seed.bcrypt_cost
            ));
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 8080,
        }
    }
}

/// SQLite store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub path: PathBuf,
    pub pool_size: u32,
    pub connect_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("./data/fastfiction.db"),
            pool_size: 4,
            connect_timeout_secs: 5,
        }
    }
}

/// Fixture seeding settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedConfig {
    /// Seed empty tables when the server starts.
    pub on_startup: bool,
    /// bcrypt cost used to hash fixture credentials.
    pub bcrypt_cost: u32,
}

/// Matches `bcrypt::DEFAULT_COST`; duplicated so this crate stays free of
/// the hashing dependency.
pub const DEFAULT_BCRYPT_COST: u32 = 12;

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            on_startup: true,
            bcrypt_cost: DEFAULT_BCRYPT_COST,
        }
    }
}

impl SeedConfig {
    /// The configured cost if bcrypt accepts it, otherwise the default.
    pub fn effective_bcrypt_cost(&self) -> u32 {
        if (4..=31).contains(&self.bcrypt_cost) {
            self.bcrypt_cost
        } else {
            DEFAULT_BCRYPT_COST
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let cfg = Config::default();
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.database.path, PathBuf::from("./data/fastfiction.db"));
        assert_eq!(cfg.database.pool_size, 4);
        assert!(cfg.seed.on_startup);
        assert!(cfg.validate().is_empty());
    }

    #[test]
    fn parse_json_config() {
        let json = r#"{"server": {"port": 9090}, "database": {"path": "/tmp/x.db"}}"#;
        let cfg = Config::from_json(json).unwrap();
        assert_eq!(cfg.server.port, 9090);
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.database.path, PathBuf::from("/tmp/x.db"));
        assert_eq!(cfg.database.connect_timeout_secs, 5);
    }

    #[test]
    fn parse_empty_json_uses_defaults() {
        let cfg = Config::from_json("{}").unwrap();
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.seed.bcrypt_cost, DEFAULT_BCRYPT_COST);
    }

    #[test]
    fn malformed_json_is_validation_error() {
        let err = Config::from_json("{not json").unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn load_missing_file_uses_defaults() {
        let cfg = Config::load(Path::new("/nonexistent/fastfiction.json")).unwrap();
        assert_eq!(cfg.server.port, 8080);
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fastfiction.json");
        std::fs::write(&path, r#"{"seed": {"on_startup": false}}"#).unwrap();
        let cfg = Config::load(&path).unwrap();
        assert!(!cfg.seed.on_startup);
    }

    #[test]
    fn bad_bcrypt_cost_warns_and_falls_back() {
        let mut cfg = Config::default();
        cfg.seed.bcrypt_cost = 2;
        assert!(cfg.validate().iter().any(|w| w.contains("bcrypt_cost")));
        assert_eq!(cfg.seed.effective_bcrypt_cost(), DEFAULT_BCRYPT_COST);
    }

    #[test]
    fn zero_pool_size_warns() {
        let mut cfg = Config::default();
        cfg.database.pool_size = 0;
        assert!(cfg.validate().iter().any(|w| w.contains("pool_size")));
    }
}
