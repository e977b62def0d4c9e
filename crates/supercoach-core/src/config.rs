// Configuration loading and parsing (league.toml, strategy.toml).

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use crate::draft::roster::RosterRequirement;
use crate::draft::state::{DraftConfig, MAX_TEAMS};
use crate::valuation::rating::RatingWeights;
use crate::valuation::vorp::{BaselinePolicy, BaselineSettings, DEFAULT_BASELINE};

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

impl ConfigError {
    fn invalid(field: &str, message: impl Into<String>) -> Self {
        ConfigError::ValidationError {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Top-level assembled Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    pub league: LeagueConfig,
    pub strategy: StrategyConfig,
    pub storage: StorageConfig,
    pub data_paths: DataPaths,
}

impl Config {
    /// The draft engine's view of the league.
    pub fn draft_config(&self) -> DraftConfig {
        self.league.draft_config()
    }
}

// ---------------------------------------------------------------------------
// league.toml structs
// ---------------------------------------------------------------------------

/// Wrapper for the top-level `[league]` table in league.toml.
#[derive(Debug, Clone, Deserialize)]
struct LeagueFile {
    league: LeagueConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LeagueConfig {
    pub name: String,
    pub num_teams: u32,
    pub my_slot: u32,
    pub roster: RosterRequirement,
    /// Display names keyed by team id. TOML keys are strings, so ids are
    /// parsed (and checked) during validation.
    #[serde(default)]
    pub teams: BTreeMap<String, String>,
}

impl LeagueConfig {
    pub fn draft_config(&self) -> DraftConfig {
        DraftConfig {
            num_teams: self.num_teams,
            my_slot: self.my_slot,
            roster: self.roster.clone(),
        }
    }

    /// Team display names keyed by numeric id. Keys that are not valid ids
    /// are rejected by `validate`, so they are simply skipped here.
    pub fn team_names(&self) -> BTreeMap<u32, String> {
        self.teams
            .iter()
            .filter_map(|(id, name)| id.trim().parse::<u32>().ok().map(|id| (id, name.clone())))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// strategy.toml structs
// ---------------------------------------------------------------------------

/// Raw deserialization target for the entire strategy.toml file.
#[derive(Debug, Clone, Deserialize)]
struct StrategyFile {
    #[serde(default = "default_baseline")]
    default_baseline: f64,
    #[serde(default)]
    rating: RatingWeights,
    #[serde(default)]
    baseline: BaselinePolicy,
    #[serde(default)]
    injury: InjuryConfig,
    storage: StorageConfig,
    data: DataPaths,
}

fn default_baseline() -> f64 {
    DEFAULT_BASELINE
}

/// The public strategy config assembled from the strategy.toml sections.
#[derive(Debug, Clone)]
pub struct StrategyConfig {
    pub rating: RatingWeights,
    pub baseline: BaselineSettings,
    pub injury: InjuryConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct InjuryConfig {
    pub enabled: bool,
    pub url: String,
    pub timeout_secs: u64,
}

impl Default for InjuryConfig {
    fn default() -> Self {
        InjuryConfig {
            enabled: false,
            url: String::new(),
            timeout_secs: 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Sqlite,
    Json,
    /// Keep the draft in memory only.
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    #[serde(default)]
    pub path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataPaths {
    pub players: String,
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate configuration from `config/league.toml` and
/// `config/strategy.toml`, relative to the given `base_dir`.
///
/// Does not copy defaults; call `ensure_config_files` first.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let config_dir = base_dir.join("config");

    // --- league.toml (required) ---
    let league_path = config_dir.join("league.toml");
    let league_text = read_file(&league_path)?;
    let league_file: LeagueFile =
        toml::from_str(&league_text).map_err(|e| ConfigError::ParseError {
            path: league_path.clone(),
            source: e,
        })?;

    // --- strategy.toml (required) ---
    let strategy_path = config_dir.join("strategy.toml");
    let strategy_text = read_file(&strategy_path)?;
    let strategy_file: StrategyFile =
        toml::from_str(&strategy_text).map_err(|e| ConfigError::ParseError {
            path: strategy_path.clone(),
            source: e,
        })?;

    let config = Config {
        league: league_file.league,
        strategy: StrategyConfig {
            rating: strategy_file.rating,
            baseline: BaselineSettings {
                policy: strategy_file.baseline,
                default_baseline: strategy_file.default_baseline,
            },
            injury: strategy_file.injury,
        },
        storage: strategy_file.storage,
        data_paths: strategy_file.data,
    };

    validate(&config)?;
    info!(
        "Loaded config for '{}' ({} teams, slot {})",
        config.league.name, config.league.num_teams, config.league.my_slot
    );
    Ok(config)
}

/// Files the assistant reads from `config/`, seeded from `defaults/`.
pub const CONFIG_FILES: [&str; 2] = ["league.toml", "strategy.toml"];

/// Copy whichever of [`CONFIG_FILES`] are missing from `config/` out of
/// `defaults/`. Existing files are never overwritten. Returns the paths
/// that were written.
pub fn ensure_config_files(base_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let defaults_dir = base_dir.join("defaults");
    let config_dir = base_dir.join("config");

    let mut seeded = Vec::new();
    for name in CONFIG_FILES {
        let target = config_dir.join(name);
        if target.is_file() {
            continue;
        }
        let source = defaults_dir.join(name);
        if !source.is_file() {
            return Err(ConfigError::DefaultsCopyError {
                message: format!(
                    "{} is missing and {} has no default to seed it from",
                    target.display(),
                    defaults_dir.display()
                ),
            });
        }
        std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::DefaultsCopyError {
            message: format!("failed to create {}: {e}", config_dir.display()),
        })?;
        std::fs::copy(&source, &target).map_err(|e| ConfigError::DefaultsCopyError {
            message: format!("failed to seed {}: {e}", target.display()),
        })?;
        info!("Seeded {} from defaults", target.display());
        seeded.push(target);
    }
    Ok(seeded)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    let league = &config.league;

    if league.num_teams == 0 || league.num_teams > MAX_TEAMS {
        return Err(ConfigError::invalid(
            "league.num_teams",
            format!("must be between 1 and {MAX_TEAMS}, got {}", league.num_teams),
        ));
    }

    if league.my_slot == 0 || league.my_slot > league.num_teams {
        return Err(ConfigError::invalid(
            "league.my_slot",
            format!("must be between 1 and {}, got {}", league.num_teams, league.my_slot),
        ));
    }

    // Roster limits plus the overall draft size for this team count.
    league
        .draft_config()
        .validate()
        .map_err(|e| ConfigError::invalid("league.roster", e.to_string()))?;

    for id in league.teams.keys() {
        match id.trim().parse::<u32>() {
            Ok(n) if (1..=league.num_teams).contains(&n) => {}
            _ => {
                return Err(ConfigError::invalid(
                    "league.teams",
                    format!("team id `{id}` must be a number between 1 and {}", league.num_teams),
                ));
            }
        }
    }

    let strategy = &config.strategy;
    strategy
        .rating
        .check()
        .map_err(|(field, message)| ConfigError::invalid(field, message))?;

    if !strategy.baseline.default_baseline.is_finite() {
        return Err(ConfigError::invalid(
            "default_baseline",
            format!("must be finite, got {}", strategy.baseline.default_baseline),
        ));
    }

    if let BaselinePolicy::Static { depth } = strategy.baseline.policy {
        if depth == 0 {
            return Err(ConfigError::invalid("baseline.depth", "must be > 0"));
        }
    }

    if strategy.injury.enabled {
        if strategy.injury.timeout_secs == 0 {
            return Err(ConfigError::invalid("injury.timeout_secs", "must be > 0"));
        }
        if strategy.injury.url.trim().is_empty() {
            return Err(ConfigError::invalid(
                "injury.url",
                "must be set when the feed is enabled",
            ));
        }
    }

    if config.storage.backend != StorageBackend::Memory && config.storage.path.trim().is_empty() {
        return Err(ConfigError::invalid(
            "storage.path",
            "must be set for sqlite and json backends",
        ));
    }

    if config.data_paths.players.trim().is_empty() {
        return Err(ConfigError::invalid("data.players", "must not be empty"));
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
