//! Game-mode state machines and the factory that constructs them.
//!
//! Each variant owns only its scoring and counter bookkeeping; question
//! selection, timers, and persistence live in the runner. The set of modes
//! is closed: [`Session`] is a tagged union so callers can match
//! exhaustively on [`ModeKind`] instead of inspecting runtime types.

pub mod challenge;
pub mod session;
pub mod survival;
pub mod time_attack;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use self::challenge::ChallengeMode;
pub use self::session::{GameMode, GameState, GameStatus, QuestionResult};
pub use self::survival::SurvivalMode;
pub use self::time_attack::TimeAttackMode;

use crate::config::GameModeConfig;
use crate::error::UnknownModeError;

/// Discriminant of the closed mode set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ModeKind {
    /// Lives pool with a continue offer.
    Challenge,
    /// Shared draining clock.
    TimeAttack,
    /// Three consecutive strikes.
    Survival,
}

impl ModeKind {
    /// Every mode in catalog display order.
    pub const ALL: [ModeKind; 3] = [ModeKind::Challenge, ModeKind::TimeAttack, ModeKind::Survival];

    /// Wire identifier used by the catalog file and persisted statistics.
    pub fn as_str(&self) -> &'static str {
        match self {
            ModeKind::Challenge => "challenge",
            ModeKind::TimeAttack => "timeAttack",
            ModeKind::Survival => "survival",
        }
    }
}

impl fmt::Display for ModeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModeKind {
    type Err = UnknownModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "challenge" => Ok(ModeKind::Challenge),
            "timeAttack" => Ok(ModeKind::TimeAttack),
            "survival" => Ok(ModeKind::Survival),
            other => Err(UnknownModeError(other.to_owned())),
        }
    }
}

/// A game-mode session, one of the closed set of variants.
///
/// Shared contract operations are available through the [`GameMode`] impl;
/// mode-specific operations (revive, tick, stop) are reached through the
/// `as_*_mut` accessors.
#[derive(Debug, Clone)]
pub enum Session {
    /// Lives-based challenge run.
    Challenge(ChallengeMode),
    /// Shared-clock time attack run.
    TimeAttack(TimeAttackMode),
    /// Three-strikes survival run.
    Survival(SurvivalMode),
}

/// Construct a fresh session for `kind` from the built-in configuration.
///
/// The caller is responsible for invoking
/// [`on_game_start`](GameMode::on_game_start) before driving the session.
pub fn create_game_mode(kind: ModeKind) -> Session {
    create_game_mode_with(kind, GameModeConfig::for_mode(kind))
}

/// Construct a fresh session for `kind` from a custom configuration, e.g.
/// one taken from a loaded [`ModeCatalog`](crate::config::ModeCatalog).
pub fn create_game_mode_with(kind: ModeKind, config: GameModeConfig) -> Session {
    match kind {
        ModeKind::Challenge => Session::Challenge(ChallengeMode::with_config(config)),
        ModeKind::TimeAttack => Session::TimeAttack(TimeAttackMode::with_config(config)),
        ModeKind::Survival => Session::Survival(SurvivalMode::with_config(config)),
    }
}

impl Session {
    fn inner(&self) -> &dyn GameMode {
        match self {
            Session::Challenge(mode) => mode,
            Session::TimeAttack(mode) => mode,
            Session::Survival(mode) => mode,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn GameMode {
        match self {
            Session::Challenge(mode) => mode,
            Session::TimeAttack(mode) => mode,
            Session::Survival(mode) => mode,
        }
    }

    /// Challenge-specific operations, when this is a challenge run.
    pub fn as_challenge_mut(&mut self) -> Option<&mut ChallengeMode> {
        match self {
            Session::Challenge(mode) => Some(mode),
            _ => None,
        }
    }

    /// Time-attack-specific operations (tick, stop), when applicable.
    pub fn as_time_attack_mut(&mut self) -> Option<&mut TimeAttackMode> {
        match self {
            Session::TimeAttack(mode) => Some(mode),
            _ => None,
        }
    }
}

impl GameMode for Session {
    fn kind(&self) -> ModeKind {
        self.inner().kind()
    }

    fn on_game_start(&mut self) {
        self.inner_mut().on_game_start();
    }

    fn on_correct_answer(&mut self, result: &QuestionResult) -> GameState {
        self.inner_mut().on_correct_answer(result)
    }

    fn on_incorrect_answer(&mut self, result: &QuestionResult) -> GameState {
        self.inner_mut().on_incorrect_answer(result)
    }

    fn on_time_up(&mut self) -> GameState {
        self.inner_mut().on_time_up()
    }

    fn game_state(&self) -> GameState {
        self.inner().game_state()
    }

    fn config(&self) -> &GameModeConfig {
        self.inner().config()
    }

    fn status(&self) -> GameStatus {
        self.inner().status()
    }

    fn should_show_timer(&self) -> bool {
        self.inner().should_show_timer()
    }

    fn timer_seconds(&self) -> Option<u32> {
        self.inner().timer_seconds()
    }
}
