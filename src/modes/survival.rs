//! Survival mode: three consecutive misses end the run, no way back.

use std::time::Duration;

use crate::config::GameModeConfig;
use crate::modes::ModeKind;
use crate::modes::session::{GameMode, GameState, GameStatus, QuestionResult, SessionCore};

/// Consecutive wrong answers that end the run.
const STRIKE_LIMIT: u32 = 3;

const STRUCK_OUT_REASON: &str = "3 wrong answers in a row";

/// Strike-based variant: no lives pool and no shared clock. Any correct
/// answer wipes the strike count; the third consecutive miss ends the run
/// unconditionally, with no continue offer.
#[derive(Debug, Clone)]
pub struct SurvivalMode {
    core: SessionCore,
    consecutive_wrong: u32,
}

impl SurvivalMode {
    /// Build a survival session from the built-in configuration.
    pub fn new() -> Self {
        Self::with_config(GameModeConfig::survival())
    }

    /// Build a survival session from a custom configuration.
    pub fn with_config(config: GameModeConfig) -> Self {
        Self {
            core: SessionCore::new(config),
            consecutive_wrong: 0,
        }
    }

    /// Wrong answers in a row since the last correct one.
    pub fn consecutive_wrong(&self) -> u32 {
        self.consecutive_wrong
    }
}

impl Default for SurvivalMode {
    fn default() -> Self {
        Self::new()
    }
}

impl GameMode for SurvivalMode {
    fn kind(&self) -> ModeKind {
        ModeKind::Survival
    }

    fn on_game_start(&mut self) {
        self.consecutive_wrong = 0;
        self.core.reset();
    }

    fn on_correct_answer(&mut self, _result: &QuestionResult) -> GameState {
        if !self.core.is_over() {
            self.consecutive_wrong = 0;
            self.core.record_correct();
        }
        self.core.snapshot()
    }

    fn on_incorrect_answer(&mut self, _result: &QuestionResult) -> GameState {
        if self.core.is_over() {
            return self.core.snapshot();
        }
        self.consecutive_wrong += 1;
        if self.consecutive_wrong >= STRIKE_LIMIT {
            self.core.finish(STRUCK_OUT_REASON, false);
        }
        self.core.snapshot()
    }

    fn on_time_up(&mut self) -> GameState {
        // An expired question counts as a strike.
        let allotted = self.timer_seconds().unwrap_or(0);
        self.on_incorrect_answer(&QuestionResult {
            is_correct: false,
            time_taken: Duration::from_secs(allotted.into()),
        })
    }

    fn game_state(&self) -> GameState {
        self.core.snapshot()
    }

    fn config(&self) -> &GameModeConfig {
        self.core.config()
    }

    fn status(&self) -> GameStatus {
        GameStatus::Survival {
            consecutive_wrong: self.consecutive_wrong,
        }
    }

    fn should_show_timer(&self) -> bool {
        true
    }

    fn timer_seconds(&self) -> Option<u32> {
        self.core.config().time_per_question
    }
}
