//! Mode catalog: per-mode display data and tunables, with optional JSON overrides.

use std::{env, fs, io::ErrorKind, path::PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::modes::ModeKind;

/// Default location on disk where the engine looks for catalog overrides.
const DEFAULT_CATALOG_PATH: &str = "config/modes.json";
/// Environment variable that overrides [`DEFAULT_CATALOG_PATH`].
const CATALOG_PATH_ENV: &str = "TRIVIA_ENGINE_MODES_PATH";

/// Seconds allotted per question in challenge mode.
pub const CHALLENGE_TIME_PER_QUESTION: u32 = 15;
/// Lives a challenge run starts with.
pub const CHALLENGE_LIVES: u32 = 3;
/// Questions loaded for a challenge level.
pub const CHALLENGE_QUESTIONS: u32 = 20;
/// Total seconds on the shared time attack clock.
pub const TIME_ATTACK_TOTAL_TIME: u32 = 60;
/// Seconds allotted per question in survival mode.
pub const SURVIVAL_TIME_PER_QUESTION: u32 = 10;

/// Immutable descriptive and tunable parameters for one mode.
///
/// Created once per session construction; the state machines never mutate it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameModeConfig {
    /// Display name.
    pub name: String,
    /// Display icon.
    pub icon: String,
    /// Short description shown on the mode selection surface.
    pub description: String,
    /// Feature bullet points shown on the mode selection surface.
    pub features: Vec<String>,
    /// Per-question countdown in seconds, for modes that use one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_per_question: Option<u32>,
    /// Single continuously draining clock in seconds, for modes that use one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_time: Option<u32>,
    /// Size of the lives pool, for modes that use one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_lives: Option<u32>,
    /// Hint to the question loader; not used by the state machines.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub questions_to_load: Option<u32>,
}

impl GameModeConfig {
    /// Built-in challenge mode configuration.
    pub fn challenge() -> Self {
        Self {
            name: "Challenge Mode".into(),
            icon: "🛡️".into(),
            description: "Get as far as you can with 3 lives".into(),
            features: vec![
                "3 lives".into(),
                "15 seconds per question".into(),
                "Watch ads to continue".into(),
            ],
            time_per_question: Some(CHALLENGE_TIME_PER_QUESTION),
            total_time: None,
            initial_lives: Some(CHALLENGE_LIVES),
            questions_to_load: Some(CHALLENGE_QUESTIONS),
        }
    }

    /// Built-in time attack configuration.
    pub fn time_attack() -> Self {
        Self {
            name: "Time Attack".into(),
            icon: "⚡".into(),
            description: "Answer as many questions as possible in 1 minute".into(),
            features: vec![
                "-3 seconds for wrong answers".into(),
                "+3 seconds for 3 correct streak".into(),
                "Beat your high score".into(),
            ],
            time_per_question: None,
            total_time: Some(TIME_ATTACK_TOTAL_TIME),
            initial_lives: None,
            questions_to_load: None,
        }
    }

    /// Built-in survival mode configuration.
    pub fn survival() -> Self {
        Self {
            name: "Survival Mode".into(),
            icon: "🔥".into(),
            description: "Keep going! But 3 wrong answers in a row and you're out".into(),
            features: vec![
                "3 strikes rule".into(),
                "10 seconds per question".into(),
                "Increasing difficulty".into(),
            ],
            time_per_question: Some(SURVIVAL_TIME_PER_QUESTION),
            total_time: None,
            initial_lives: None,
            questions_to_load: None,
        }
    }

    /// Default configuration for `kind`.
    pub fn for_mode(kind: ModeKind) -> Self {
        match kind {
            ModeKind::Challenge => Self::challenge(),
            ModeKind::TimeAttack => Self::time_attack(),
            ModeKind::Survival => Self::survival(),
        }
    }
}

/// Ordered catalog of every selectable mode.
#[derive(Debug, Clone)]
pub struct ModeCatalog {
    modes: IndexMap<ModeKind, GameModeConfig>,
}

impl ModeCatalog {
    /// Load the catalog from disk, falling back to the built-in defaults.
    ///
    /// A missing file is normal; a present but unparsable file logs a
    /// warning and the defaults are used instead.
    pub fn load() -> Self {
        let path = resolve_catalog_path();
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<RawCatalog>(&contents) {
                Ok(raw) => {
                    let catalog = Self::from_raw(raw);
                    info!(
                        path = %path.display(),
                        count = catalog.modes.len(),
                        "loaded mode catalog overrides from config"
                    );
                    catalog
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse mode catalog; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "mode catalog file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read mode catalog; falling back to defaults"
                );
                Self::default()
            }
        }
    }

    /// Merge a parsed override file over the built-in defaults.
    ///
    /// Entries keyed by an unrecognized mode identifier are ignored with a
    /// warning so a stale file cannot take the catalog down.
    fn from_raw(raw: RawCatalog) -> Self {
        let mut catalog = Self::default();
        for (key, config) in raw.modes {
            match key.parse::<ModeKind>() {
                Ok(kind) => {
                    catalog.modes.insert(kind, config);
                }
                Err(_) => {
                    warn!(mode = %key, "unknown mode in catalog file; ignoring entry");
                }
            }
        }
        catalog
    }

    /// Configuration for one mode.
    pub fn get(&self, kind: ModeKind) -> GameModeConfig {
        self.modes
            .get(&kind)
            .cloned()
            .unwrap_or_else(|| GameModeConfig::for_mode(kind))
    }

    /// Iterate the catalog in display order.
    pub fn iter(&self) -> impl Iterator<Item = (ModeKind, &GameModeConfig)> {
        self.modes.iter().map(|(kind, config)| (*kind, config))
    }
}

impl Default for ModeCatalog {
    fn default() -> Self {
        let mut modes = IndexMap::new();
        for kind in ModeKind::ALL {
            modes.insert(kind, GameModeConfig::for_mode(kind));
        }
        Self { modes }
    }
}

#[derive(Debug, Deserialize)]
/// JSON representation of the catalog override file.
struct RawCatalog {
    modes: IndexMap<String, GameModeConfig>,
}

/// Resolve the catalog path taking the environment override into account.
fn resolve_catalog_path() -> PathBuf {
    env::var_os(CATALOG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CATALOG_PATH))
}
