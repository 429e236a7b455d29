//! Time attack: one shared clock, per-answer time deltas, and a streak bonus.

use crate::config::{GameModeConfig, TIME_ATTACK_TOTAL_TIME};
use crate::modes::ModeKind;
use crate::modes::session::{GameMode, GameState, GameStatus, QuestionResult, SessionCore};

/// Consecutive correct answers needed to earn the time bonus.
const STREAK_TARGET: u32 = 3;
/// Seconds added to the clock when the streak target is reached.
const STREAK_BONUS_SECS: u32 = 3;
/// Seconds removed from the clock on a wrong answer.
const WRONG_ANSWER_PENALTY_SECS: u32 = 3;

const TIME_UP_REASON: &str = "Time is up!";

/// Shared-clock variant: the session trades lives for seconds. The clock
/// drains once per second via [`tick`](TimeAttackMode::tick) driven by the
/// external runner, while answers apply their own deltas on top. Either
/// path may observe the zero clock first and terminate the run; the other
/// is absorbed by the terminal guard.
#[derive(Debug, Clone)]
pub struct TimeAttackMode {
    core: SessionCore,
    time_remaining: u32,
    correct_streak: u32,
    stopped: bool,
}

impl TimeAttackMode {
    /// Build a time attack session from the built-in configuration.
    pub fn new() -> Self {
        Self::with_config(GameModeConfig::time_attack())
    }

    /// Build a time attack session from a custom configuration.
    pub fn with_config(config: GameModeConfig) -> Self {
        let time_remaining = config.total_time.unwrap_or(TIME_ATTACK_TOTAL_TIME);
        Self {
            core: SessionCore::new(config),
            time_remaining,
            correct_streak: 0,
            stopped: false,
        }
    }

    fn total_time(&self) -> u32 {
        self.core.config().total_time.unwrap_or(TIME_ATTACK_TOTAL_TIME)
    }

    /// Seconds left on the shared clock.
    pub fn time_remaining(&self) -> u32 {
        self.time_remaining
    }

    /// Consecutive correct answers since the last miss or bonus payout.
    pub fn correct_streak(&self) -> u32 {
        self.correct_streak
    }

    /// Advance the shared clock by one second.
    ///
    /// Returns `true` while the run stays alive. Returns `false` without
    /// touching the clock when the session is already stopped or over, and
    /// returns `false` after setting the terminal state when this tick
    /// drains the clock to zero.
    pub fn tick(&mut self) -> bool {
        if self.stopped || self.core.is_over() {
            return false;
        }
        self.time_remaining = self.time_remaining.saturating_sub(1);
        if self.time_remaining == 0 {
            self.core.finish(TIME_UP_REASON, false);
            return false;
        }
        true
    }

    /// Halt the clock. Advisory: used when the runner pauses or tears down.
    pub fn stop(&mut self) {
        self.stopped = true;
    }
}

impl Default for TimeAttackMode {
    fn default() -> Self {
        Self::new()
    }
}

impl GameMode for TimeAttackMode {
    fn kind(&self) -> ModeKind {
        ModeKind::TimeAttack
    }

    fn on_game_start(&mut self) {
        self.time_remaining = self.total_time();
        self.correct_streak = 0;
        self.stopped = false;
        self.core.reset();
    }

    fn on_correct_answer(&mut self, _result: &QuestionResult) -> GameState {
        if self.core.is_over() {
            return self.core.snapshot();
        }
        self.core.record_correct();
        self.correct_streak += 1;
        if self.correct_streak == STREAK_TARGET {
            // Bonus fires once per full streak, then the count starts over.
            self.time_remaining += STREAK_BONUS_SECS;
            self.correct_streak = 0;
        }
        self.core.snapshot()
    }

    fn on_incorrect_answer(&mut self, _result: &QuestionResult) -> GameState {
        if self.core.is_over() {
            return self.core.snapshot();
        }
        self.correct_streak = 0;
        self.time_remaining = self.time_remaining.saturating_sub(WRONG_ANSWER_PENALTY_SECS);
        if self.time_remaining == 0 {
            // The penalty itself may end the run; no tick is needed.
            self.core.finish(TIME_UP_REASON, false);
        }
        self.core.snapshot()
    }

    fn on_time_up(&mut self) -> GameState {
        // Individual questions never expire on their own here; only the
        // shared clock matters.
        self.core.snapshot()
    }

    fn game_state(&self) -> GameState {
        self.core.snapshot()
    }

    fn config(&self) -> &GameModeConfig {
        self.core.config()
    }

    fn status(&self) -> GameStatus {
        GameStatus::TimeAttack {
            time_remaining: self.time_remaining,
            correct_streak: self.correct_streak,
        }
    }

    fn should_show_timer(&self) -> bool {
        // The clock is global; the runner reads it from `status` instead of
        // driving a per-question countdown.
        false
    }

    fn timer_seconds(&self) -> Option<u32> {
        None
    }
}
