//! Settings of the `carryover` binary.
//!
//! Read from an optional TOML file (`settings.toml` unless `--config` says
//! otherwise), then from `CARRYOVER__*` environment variables, e.g.
//! `CARRYOVER__APP__LEVEL=debug`.

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::Result;

const DEFAULT_CONFIG_PATH: &str = "settings.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct App {
    /// Log level applied to the binary and the engine.
    pub level: String,
}

impl Default for App {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Database {
    Memory,
    Sqlite(String),
}

impl Default for Database {
    fn default() -> Self {
        Self::Sqlite("carryover.db".to_string())
    }
}

impl Database {
    pub fn url(&self) -> String {
        match self {
            Database::Memory => String::from("sqlite::memory:"),
            Database::Sqlite(path) => format!("sqlite:{path}?mode=rwc"),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub app: App,
    pub database: Database,
}

impl Settings {
    pub fn new(path: Option<&str>) -> Result<Self> {
        let path = path.unwrap_or(DEFAULT_CONFIG_PATH);
        let settings = Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(Environment::with_prefix("CARRYOVER").separator("__"))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_file() {
        let settings = Settings::new(Some("does/not/exist.toml")).unwrap();
        assert_eq!(settings.app.level, "info");
        assert_eq!(settings.database, Database::Sqlite("carryover.db".to_string()));
    }

    #[test]
    fn database_urls() {
        assert_eq!(Database::Memory.url(), "sqlite::memory:");
        assert_eq!(
            Database::Sqlite("data/budget.db".to_string()).url(),
            "sqlite:data/budget.db?mode=rwc"
        );
    }

    #[test]
    fn reads_toml_file() {
        let dir = std::env::temp_dir().join(format!("carryover-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("settings.toml");
        std::fs::write(
            &path,
            "[app]\nlevel = \"debug\"\n\n[database]\nsqlite = \"ledger.db\"\n",
        )
        .unwrap();

        let settings = Settings::new(path.to_str()).unwrap();
        assert_eq!(settings.app.level, "debug");
        assert_eq!(settings.database, Database::Sqlite("ledger.db".to_string()));

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
