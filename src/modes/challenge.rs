//! Challenge mode: a fixed pool of lives with an external continue path.

use std::time::Duration;

use crate::config::{CHALLENGE_LIVES, GameModeConfig};
use crate::modes::ModeKind;
use crate::modes::session::{GameMode, GameState, GameStatus, QuestionResult, SessionCore};

const OUT_OF_LIVES_REASON: &str = "No more lives";

/// Lives-based variant: every miss costs a life, and running out ends the
/// run with a continue offer the UI may honor (ad watch or paid currency).
#[derive(Debug, Clone)]
pub struct ChallengeMode {
    core: SessionCore,
    lives: u32,
}

impl ChallengeMode {
    /// Build a challenge session from the built-in configuration.
    pub fn new() -> Self {
        Self::with_config(GameModeConfig::challenge())
    }

    /// Build a challenge session from a custom configuration.
    pub fn with_config(config: GameModeConfig) -> Self {
        let lives = config.initial_lives.unwrap_or(CHALLENGE_LIVES);
        Self {
            core: SessionCore::new(config),
            lives,
        }
    }

    fn initial_lives(&self) -> u32 {
        self.core.config().initial_lives.unwrap_or(CHALLENGE_LIVES)
    }

    /// Remaining lives.
    pub fn lives(&self) -> u32 {
        self.lives
    }

    /// Restore the session to one life after an external continue action.
    ///
    /// The accumulated score is kept; only the terminal flags are cleared.
    /// This is the single transition out of game over short of a restart.
    pub fn revive(&mut self) {
        self.lives = 1;
        self.core.clear_game_over();
    }
}

impl Default for ChallengeMode {
    fn default() -> Self {
        Self::new()
    }
}

impl GameMode for ChallengeMode {
    fn kind(&self) -> ModeKind {
        ModeKind::Challenge
    }

    fn on_game_start(&mut self) {
        self.lives = self.initial_lives();
        self.core.reset();
    }

    fn on_correct_answer(&mut self, _result: &QuestionResult) -> GameState {
        if !self.core.is_over() {
            self.core.record_correct();
        }
        self.core.snapshot()
    }

    fn on_incorrect_answer(&mut self, _result: &QuestionResult) -> GameState {
        if self.core.is_over() {
            return self.core.snapshot();
        }
        self.lives = self.lives.saturating_sub(1);
        if self.lives == 0 {
            self.core.finish(OUT_OF_LIVES_REASON, true);
        }
        self.core.snapshot()
    }

    fn on_time_up(&mut self) -> GameState {
        // An expired question costs a life just like a wrong answer.
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
        GameStatus::Challenge { lives: self.lives }
    }

    fn should_show_timer(&self) -> bool {
        true
    }

    fn timer_seconds(&self) -> Option<u32> {
        self.core.config().time_per_question
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn right() -> QuestionResult {
        QuestionResult {
            is_correct: true,
            time_taken: Duration::from_secs(4),
        }
    }

    fn wrong() -> QuestionResult {
        QuestionResult {
            is_correct: false,
            time_taken: Duration::from_secs(4),
        }
    }

    fn lives_of(mode: &ChallengeMode) -> u32 {
        match mode.status() {
            GameStatus::Challenge { lives } => lives,
            other => panic!("expected challenge status, got {other:?}"),
        }
    }

    #[test]
    fn correct_answers_increment_score_without_touching_lives() {
        let mut mode = ChallengeMode::new();
        mode.on_game_start();

        let state = mode.on_correct_answer(&right());
        assert_eq!(state.score, 1);
        assert!(!state.is_game_over);
        assert_eq!(lives_of(&mode), 3);
    }

    #[test]
    fn exhausting_lives_ends_the_game_with_a_continue_offer() {
        let mut mode = ChallengeMode::new();
        mode.on_game_start();

        mode.on_incorrect_answer(&wrong());
        mode.on_incorrect_answer(&wrong());
        let state = mode.on_incorrect_answer(&wrong());

        assert!(state.is_game_over);
        assert_eq!(state.game_over_reason.as_deref(), Some("No more lives"));
        assert!(state.show_continue_option);
        assert_eq!(lives_of(&mode), 0);
    }

    #[test]
    fn terminal_state_absorbs_further_events() {
        let mut mode = ChallengeMode::new();
        mode.on_game_start();
        mode.on_correct_answer(&right());
        for _ in 0..3 {
            mode.on_incorrect_answer(&wrong());
        }

        // A racing UI timer may still fire after the run ended.
        let after_correct = mode.on_correct_answer(&right());
        let after_wrong = mode.on_incorrect_answer(&wrong());
        let after_time_up = mode.on_time_up();

        for state in [&after_correct, &after_wrong, &after_time_up] {
            assert_eq!(state.score, 1);
            assert!(state.is_game_over);
        }
        assert_eq!(lives_of(&mode), 0);
    }

    #[test]
    fn revive_restores_one_life_and_keeps_the_score() {
        let mut mode = ChallengeMode::new();
        mode.on_game_start();
        mode.on_correct_answer(&right());
        mode.on_correct_answer(&right());
        for _ in 0..3 {
            mode.on_incorrect_answer(&wrong());
        }

        mode.revive();

        let state = mode.game_state();
        assert!(!state.is_game_over);
        assert_eq!(state.game_over_reason, None);
        assert_eq!(state.score, 2);
        assert_eq!(lives_of(&mode), 1);
    }

    #[test]
    fn time_up_costs_a_life() {
        let mut mode = ChallengeMode::new();
        mode.on_game_start();

        let state = mode.on_time_up();
        assert!(!state.is_game_over);
        assert_eq!(lives_of(&mode), 2);
    }

    #[test]
    fn restart_resets_score_lives_and_terminal_flags() {
        let mut mode = ChallengeMode::new();
        mode.on_game_start();
        mode.on_correct_answer(&right());
        for _ in 0..3 {
            mode.on_incorrect_answer(&wrong());
        }

        mode.on_game_start();

        let state = mode.game_state();
        assert_eq!(state.score, 0);
        assert!(!state.is_game_over);
        assert_eq!(state.game_over_reason, None);
        assert!(!state.show_continue_option);
        assert_eq!(lives_of(&mode), 3);
    }

    #[test]
    fn returned_state_is_a_defensive_copy() {
        let mut mode = ChallengeMode::new();
        mode.on_game_start();

        let mut state = mode.game_state();
        state.score = 99;
        state.is_game_over = true;

        let fresh = mode.game_state();
        assert_eq!(fresh.score, 0);
        assert!(!fresh.is_game_over);
    }

    #[test]
    fn timer_is_per_question_at_fifteen_seconds() {
        let mode = ChallengeMode::new();
        assert!(mode.should_show_timer());
        assert_eq!(mode.timer_seconds(), Some(15));
    }
}
