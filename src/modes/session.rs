//! Shared contract implemented by every game-mode variant.

use std::time::Duration;

use serde::Serialize;

use crate::config::GameModeConfig;
use crate::modes::ModeKind;

/// Outcome of a single answered question, as computed by the runner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuestionResult {
    /// Whether the selected option was the correct one.
    pub is_correct: bool,
    /// Time the player took to answer.
    pub time_taken: Duration,
}

/// Snapshot of the session-owned scoring state.
///
/// Every accessor and mutating operation returns this by value, so callers
/// can never mutate a session through something it handed out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameState {
    /// Count of correctly answered questions this session.
    pub score: u32,
    /// Terminal flag; once set, further scoring events are absorbed.
    pub is_game_over: bool,
    /// Human-readable cause, set when `is_game_over` transitions to true.
    pub game_over_reason: Option<String>,
    /// True when the ending may be reversed by an external continue offer.
    pub show_continue_option: bool,
}

/// Read-only snapshot of mode-private counters for display purposes.
///
/// Closed union so the runner can match exhaustively instead of inspecting
/// the session's runtime type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    /// Challenge: remaining lives.
    Challenge {
        /// Lives left in the pool.
        lives: u32,
    },
    /// Time attack: shared clock and current streak.
    TimeAttack {
        /// Seconds left on the shared clock.
        time_remaining: u32,
        /// Consecutive correct answers since the last miss or bonus.
        correct_streak: u32,
    },
    /// Survival: consecutive wrong answers.
    Survival {
        /// Wrong answers in a row since the last correct one.
        consecutive_wrong: u32,
    },
}

/// State-machine interface every mode variant implements.
///
/// All methods are synchronous state transitions; a session performs no I/O
/// and owns nothing beyond its own counters. Once a session is game over,
/// the scoring hooks tolerate further calls without touching any state, so
/// a racing UI timer cannot corrupt a finished run.
pub trait GameMode {
    /// Discriminant identifying the concrete variant.
    fn kind(&self) -> ModeKind;

    /// Reset all mutable state to the starting values derived from the
    /// configuration. Idempotent from fresh or finished instances alike.
    fn on_game_start(&mut self);

    /// Apply the mode's success policy, returning the resulting state.
    fn on_correct_answer(&mut self, result: &QuestionResult) -> GameState;

    /// Apply the mode's failure policy, returning the resulting state.
    fn on_incorrect_answer(&mut self, result: &QuestionResult) -> GameState;

    /// Handle an expired per-question countdown. Modes governed by a single
    /// global clock treat this as a no-op; their expiry path is `tick`.
    fn on_time_up(&mut self) -> GameState;

    /// Snapshot of score and terminal fields.
    fn game_state(&self) -> GameState;

    /// Static configuration for this mode.
    fn config(&self) -> &GameModeConfig;

    /// Snapshot of mode-private counters.
    fn status(&self) -> GameStatus;

    /// Whether the runner should render and drive a per-question countdown.
    fn should_show_timer(&self) -> bool;

    /// Duration of the per-question countdown, when one applies.
    fn timer_seconds(&self) -> Option<u32>;
}

/// Scoring state and terminal-guard bookkeeping shared by all variants.
#[derive(Debug, Clone)]
pub(crate) struct SessionCore {
    config: GameModeConfig,
    state: GameState,
}

impl SessionCore {
    pub(crate) fn new(config: GameModeConfig) -> Self {
        Self {
            config,
            state: fresh_state(),
        }
    }

    pub(crate) fn reset(&mut self) {
        self.state = fresh_state();
    }

    pub(crate) fn config(&self) -> &GameModeConfig {
        &self.config
    }

    /// True once the session reached a terminal state.
    pub(crate) fn is_over(&self) -> bool {
        self.state.is_game_over
    }

    pub(crate) fn record_correct(&mut self) {
        self.state.score += 1;
    }

    /// Transition to game over. The reason is set exactly once; a session
    /// already over keeps its original reason.
    pub(crate) fn finish(&mut self, reason: &str, continuable: bool) {
        if self.state.is_game_over {
            return;
        }
        self.state.is_game_over = true;
        self.state.game_over_reason = Some(reason.to_owned());
        self.state.show_continue_option = continuable;
    }

    /// Clear the terminal flags after an external continue action, keeping
    /// the accumulated score.
    pub(crate) fn clear_game_over(&mut self) {
        self.state.is_game_over = false;
        self.state.game_over_reason = None;
        self.state.show_continue_option = false;
    }

    pub(crate) fn snapshot(&self) -> GameState {
        self.state.clone()
    }
}

fn fresh_state() -> GameState {
    GameState {
        score: 0,
        is_game_over: false,
        game_over_reason: None,
        show_continue_option: false,
    }
}
