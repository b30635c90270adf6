//! Startup settings, read from a properties-style key-value file.
//!
//! ```text
//! # nfl.cfg
//! database = nfl.db
//! script = nfl.sql
//! default_season = 2023
//! player_page_size = 20
//! team_page_size = 10
//! ```

use std::fs;
use std::io;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::error::ConfigError;
use crate::lex::{config_entry, is_config_comment};

pub const DEFAULT_CONFIG_FILE: &str = "nfl.cfg";
pub const DEFAULT_SCRIPT: &str = "nfl.sql";
pub const DEFAULT_SEASON: i64 = 2023;
pub const PLAYER_PAGE_SIZE: NonZeroUsize = nonzero(20);
pub const TEAM_PAGE_SIZE: NonZeroUsize = nonzero(10);

const fn nonzero(n: usize) -> NonZeroUsize {
    match NonZeroUsize::new(n) {
        Some(n) => n,
        None => panic!("page size must be positive"),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub database: PathBuf,
    pub script: PathBuf,
    pub default_season: i64,
    pub player_page_size: NonZeroUsize,
    pub team_page_size: NonZeroUsize,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => ConfigError::NotFound(path.to_path_buf()),
            _ => ConfigError::Unreadable { path: path.to_path_buf(), source: e },
        })?;
        info!("loaded config from {}", path.display());
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let mut database = None;
        let mut script = None;
        let mut default_season = DEFAULT_SEASON;
        let mut player_page_size = PLAYER_PAGE_SIZE;
        let mut team_page_size = TEAM_PAGE_SIZE;

        for (idx, line) in text.lines().enumerate() {
            if line.trim().is_empty() || is_config_comment(line) {
                continue;
            }

            let (key, value) = match config_entry(line) {
                Ok((_, entry)) => entry,
                Err(_) => return Err(ConfigError::Malformed {
                    line: idx + 1,
                    text: line.to_string(),
                }),
            };

            match key {
                "database" => database = Some(PathBuf::from(value)),
                "script" => script = Some(PathBuf::from(value)),
                "default_season" => default_season = number("default_season", value)?,
                "player_page_size" => player_page_size = page_size("player_page_size", value)?,
                "team_page_size" => team_page_size = page_size("team_page_size", value)?,
                other => warn!("ignoring unknown config key '{}'", other),
            }
        }

        Ok(Config {
            database: database
                .filter(|p| !p.as_os_str().is_empty())
                .ok_or(ConfigError::MissingKey("database"))?,
            script: script.unwrap_or_else(|| PathBuf::from(DEFAULT_SCRIPT)),
            default_season,
            player_page_size,
            team_page_size,
        })
    }
}

fn number(key: &'static str, value: &str) -> Result<i64, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidValue { key, value: value.to_string() })
}

fn page_size(key: &'static str, value: &str) -> Result<NonZeroUsize, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidValue { key, value: value.to_string() })
}

#[cfg(test)]
mod test {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_parse_defaults() {
        let c = Config::parse("# settings\n\ndatabase = data/nfl.db\n").unwrap();
        assert_eq!(c, Config {
            database: PathBuf::from("data/nfl.db"),
            script: PathBuf::from(DEFAULT_SCRIPT),
            default_season: 2023,
            player_page_size: PLAYER_PAGE_SIZE,
            team_page_size: TEAM_PAGE_SIZE,
        });
    }

    #[test]
    fn test_parse_overrides() {
        let c = Config::parse("
database: nfl.db
script = seed.sql
default_season = 2022
player_page_size = 25
team_page_size=5
colour = blue
").unwrap();
        assert_eq!(c.script, PathBuf::from("seed.sql"));
        assert_eq!(c.default_season, 2022);
        assert_eq!(c.player_page_size.get(), 25);
        assert_eq!(c.team_page_size.get(), 5);
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            Config::parse("script = x.sql"),
            Err(ConfigError::MissingKey("database"))
        ));
        assert!(matches!(
            Config::parse("database ="),
            Err(ConfigError::MissingKey("database"))
        ));
        assert!(matches!(
            Config::parse("database = a\nteam_page_size = 0"),
            Err(ConfigError::InvalidValue { key: "team_page_size", .. })
        ));
        assert!(matches!(
            Config::parse("database = a\nplayer_page_size = -2"),
            Err(ConfigError::InvalidValue { key: "player_page_size", .. })
        ));
        assert!(matches!(
            Config::parse("database = a\nnot a setting"),
            Err(ConfigError::Malformed { line: 2, .. })
        ));
    }

    #[test]
    fn test_load() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "database = nfl.db").unwrap();
        assert_eq!(Config::load(file.path()).unwrap().database, PathBuf::from("nfl.db"));

        assert!(matches!(
            Config::load(Path::new("/no/such/nfl.cfg")),
            Err(ConfigError::NotFound(_))
        ));
    }
}
