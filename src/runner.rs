//! Quiz runner: drives one session end to end and settles the result.
//!
//! The runner owns what the state machines deliberately do not: question
//! selection, answer grading, the Time Attack clock cadence, and the
//! one-time profile settlement when a run reaches its terminal state.

use std::sync::Arc;
use std::time::Duration;

use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tokio::sync::Mutex;
use tokio::time::interval;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::GameModeConfig;
use crate::error::EngineError;
use crate::modes::{
    GameMode, GameState, GameStatus, ModeKind, QuestionResult, Session, create_game_mode_with,
};
use crate::questions::{QuestionDeck, ShuffledQuestion};
use crate::store::{ModeStats, PlayerProfile, ProfileStore};

/// Flat gold bonus granted on top of the session score at settlement.
const GOLD_COMPLETION_BONUS: u64 = 20;

/// What the runner reports back after each submitted answer.
#[derive(Debug, Clone)]
pub struct AnswerOutcome {
    /// Whether the selected option was correct.
    pub correct: bool,
    /// Index of the correct option, for answer highlighting.
    pub correct_option: usize,
    /// Session state after applying the answer.
    pub state: GameState,
    /// Mode-private counters after applying the answer.
    pub status: GameStatus,
}

/// Drives one session: grades answers, advances the deck, and settles the
/// profile exactly once when the run ends.
///
/// A challenge ending with a continue offer is not settled immediately;
/// the caller either [`revive`](QuizRunner::revive)s the run or
/// [`decline_continue`](QuizRunner::decline_continue)s it.
pub struct QuizRunner {
    id: Uuid,
    kind: ModeKind,
    level: u32,
    session: Session,
    deck: QuestionDeck,
    store: Arc<dyn ProfileStore>,
    profile_id: Uuid,
    settled: bool,
}

impl QuizRunner {
    /// Build a runner for `kind`, starting the session immediately.
    pub fn new(
        kind: ModeKind,
        config: GameModeConfig,
        deck: QuestionDeck,
        store: Arc<dyn ProfileStore>,
        profile_id: Uuid,
    ) -> Self {
        let mut session = create_game_mode_with(kind, config);
        session.on_game_start();
        Self {
            id: Uuid::new_v4(),
            kind,
            level: 1,
            session,
            deck,
            store,
            profile_id,
            settled: false,
        }
    }

    /// Set the challenge level this run plays; completion unlocks the next.
    pub fn with_level(mut self, level: u32) -> Self {
        self.level = level;
        self
    }

    /// Identifier of this run.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Mode being played.
    pub fn kind(&self) -> ModeKind {
        self.kind
    }

    /// The question currently awaiting an answer.
    pub fn current_question(&self) -> Option<&ShuffledQuestion> {
        self.deck.current()
    }

    /// Snapshot of the session scoring state.
    pub fn game_state(&self) -> GameState {
        self.session.game_state()
    }

    /// Snapshot of mode-private counters.
    pub fn status(&self) -> GameStatus {
        self.session.status()
    }

    /// Per-question countdown to drive for the current mode, if any.
    pub fn question_timer(&self) -> Option<u32> {
        if self.session.should_show_timer() {
            self.session.timer_seconds()
        } else {
            None
        }
    }

    /// Whether the run has already been written back to the profile store.
    pub fn is_settled(&self) -> bool {
        self.settled
    }

    /// Submit the selected option for the current question.
    pub async fn submit_answer(
        &mut self,
        selected: usize,
        time_taken: Duration,
    ) -> Result<AnswerOutcome, EngineError> {
        let Some(question) = self.deck.current() else {
            return Err(EngineError::NoActiveQuestion);
        };
        if selected >= question.options.len() {
            return Err(EngineError::OptionOutOfRange {
                id: question.question.id,
                index: selected,
            });
        }

        let correct = question.is_correct(selected);
        let correct_option = question.correct_option;
        let question_id = question.question.id;

        let result = QuestionResult {
            is_correct: correct,
            time_taken,
        };
        let state = if correct {
            self.session.on_correct_answer(&result)
        } else {
            self.session.on_incorrect_answer(&result)
        };
        debug!(
            runner = %self.id,
            question = question_id,
            correct,
            score = state.score,
            "answer applied"
        );

        self.after_event(correct, correct_option, state).await
    }

    /// Route an expired per-question countdown into the session.
    pub async fn question_time_up(&mut self) -> Result<AnswerOutcome, EngineError> {
        let Some(question) = self.deck.current() else {
            return Err(EngineError::NoActiveQuestion);
        };
        let correct_option = question.correct_option;

        let state = self.session.on_time_up();
        self.after_event(false, correct_option, state).await
    }

    /// Apply an external continue action to a challenge run.
    ///
    /// Returns `false` when the session is not a challenge or is not in a
    /// continuable ending.
    pub fn revive(&mut self) -> bool {
        let state = self.session.game_state();
        if !state.is_game_over || !state.show_continue_option {
            return false;
        }
        let Some(challenge) = self.session.as_challenge_mut() else {
            return false;
        };
        challenge.revive();
        // The question that cost the last life is spent; move on.
        self.deck.advance();
        info!(runner = %self.id, score = state.score, "session revived");
        true
    }

    /// Decline the continue offer and settle the run.
    pub async fn decline_continue(&mut self) -> Result<(), EngineError> {
        self.settle(false).await
    }

    /// Halt the Time Attack clock when tearing down the screen.
    pub fn stop_clock(&mut self) {
        if let Some(time_attack) = self.session.as_time_attack_mut() {
            time_attack.stop();
        }
    }

    async fn after_event(
        &mut self,
        correct: bool,
        correct_option: usize,
        state: GameState,
    ) -> Result<AnswerOutcome, EngineError> {
        let outcome = AnswerOutcome {
            correct,
            correct_option,
            state: state.clone(),
            status: self.session.status(),
        };

        if state.is_game_over {
            // Continuable endings wait for the caller's revive/decline
            // decision before the run is written back.
            if !state.show_continue_option {
                self.settle(false).await?;
            }
        } else if self.deck.advance().is_none() {
            // Deck exhausted without a terminal event: the run is complete.
            self.settle(true).await?;
        }

        Ok(outcome)
    }

    /// Write the finished run back to the profile store. Idempotent: only
    /// the first call per run has any effect.
    async fn settle(&mut self, completed: bool) -> Result<(), EngineError> {
        if self.settled {
            return Ok(());
        }
        self.settled = true;

        let state = self.session.game_state();
        let score = state.score;

        let mut profile = self
            .store
            .find_profile(self.profile_id)
            .await?
            .unwrap_or_else(|| PlayerProfile::new(self.profile_id));

        let gold_earned = u64::from(score) + GOLD_COMPLETION_BONUS;
        profile.gold += gold_earned;

        let stats = profile
            .stats
            .entry(self.kind)
            .or_insert_with(ModeStats::default);
        stats.games_played += 1;
        stats.best_score = stats.best_score.max(score);
        stats.total_score += u64::from(score);
        stats.last_played = OffsetDateTime::now_utc().format(&Rfc3339).ok();

        if completed && self.kind == ModeKind::Challenge {
            let next_level = self.level + 1;
            if !profile.unlocked_levels.contains(&next_level) {
                profile.unlocked_levels.push(next_level);
                info!(runner = %self.id, level = next_level, "challenge level unlocked");
            }
        }

        self.store.save_profile(profile).await?;
        info!(
            runner = %self.id,
            mode = %self.kind,
            score,
            gold_earned,
            completed,
            reason = state.game_over_reason.as_deref().unwrap_or("deck completed"),
            "session settled"
        );
        Ok(())
    }
}

/// Drive the shared Time Attack clock, one tick per second, until the clock
/// expires, the run ends, or the clock is stopped.
///
/// The interval cadence is independent of answer timing; whichever of this
/// loop or a wrong-answer penalty observes the zero clock first ends the
/// run, and the session absorbs the loser of that race.
pub async fn drive_clock(runner: Arc<Mutex<QuizRunner>>) {
    let mut ticker = interval(Duration::from_secs(1));
    // The first interval tick completes immediately; skip it.
    ticker.tick().await;
    loop {
        ticker.tick().await;
        let mut guard = runner.lock().await;
        let alive = match guard.session.as_time_attack_mut() {
            Some(time_attack) => time_attack.tick(),
            None => return,
        };
        if !alive {
            if guard.game_state().is_game_over {
                if let Err(err) = guard.settle(false).await {
                    warn!(
                        runner = %guard.id,
                        error = %err,
                        "failed to settle run after clock expiry"
                    );
                }
            }
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::questions::{Difficulty, Question};
    use crate::store::memory::MemoryStore;

    fn deck(count: u32) -> QuestionDeck {
        let bank: Vec<Question> = (1..=count)
            .map(|id| Question {
                id,
                category: "general".into(),
                text: format!("question {id}"),
                options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
                correct_option: 0,
                difficulty: Difficulty::Easy,
            })
            .collect();
        let mut rng = StdRng::seed_from_u64(42);
        QuestionDeck::build(bank, None, &mut rng).unwrap()
    }

    fn runner_for(kind: ModeKind, questions: u32, store: Arc<MemoryStore>) -> (QuizRunner, Uuid) {
        let profile_id = Uuid::new_v4();
        let runner = QuizRunner::new(
            kind,
            GameModeConfig::for_mode(kind),
            deck(questions),
            store,
            profile_id,
        );
        (runner, profile_id)
    }

    fn right_option(runner: &QuizRunner) -> usize {
        runner.current_question().expect("active question").correct_option
    }

    fn wrong_option(runner: &QuizRunner) -> usize {
        let question = runner.current_question().expect("active question");
        (question.correct_option + 1) % question.options.len()
    }

    #[tokio::test]
    async fn survival_strikeout_settles_the_profile() {
        let store = Arc::new(MemoryStore::new());
        let (mut runner, profile_id) = runner_for(ModeKind::Survival, 10, store.clone());

        runner
            .submit_answer(right_option(&runner), Duration::from_secs(2))
            .await
            .unwrap();
        for _ in 0..2 {
            runner
                .submit_answer(wrong_option(&runner), Duration::from_secs(2))
                .await
                .unwrap();
        }
        let outcome = runner
            .submit_answer(wrong_option(&runner), Duration::from_secs(2))
            .await
            .unwrap();

        assert!(outcome.state.is_game_over);
        assert!(runner.is_settled());

        let profile = store.find_profile(profile_id).await.unwrap().unwrap();
        assert_eq!(profile.gold, 21); // score 1 + completion bonus
        let stats = &profile.stats[&ModeKind::Survival];
        assert_eq!(stats.games_played, 1);
        assert_eq!(stats.best_score, 1);
        assert!(stats.last_played.is_some());
    }

    #[tokio::test]
    async fn challenge_defers_settlement_until_the_continue_decision() {
        let store = Arc::new(MemoryStore::new());
        let (mut runner, profile_id) = runner_for(ModeKind::Challenge, 10, store.clone());

        for _ in 0..3 {
            runner
                .submit_answer(wrong_option(&runner), Duration::from_secs(2))
                .await
                .unwrap();
        }

        assert!(runner.game_state().is_game_over);
        assert!(!runner.is_settled());
        assert_eq!(store.find_profile(profile_id).await.unwrap(), None);

        runner.decline_continue().await.unwrap();
        assert!(runner.is_settled());
        let profile = store.find_profile(profile_id).await.unwrap().unwrap();
        assert_eq!(profile.stats[&ModeKind::Challenge].games_played, 1);
    }

    #[tokio::test]
    async fn revive_continues_the_run_on_the_next_question() {
        let store = Arc::new(MemoryStore::new());
        let (mut runner, _) = runner_for(ModeKind::Challenge, 10, store);

        runner
            .submit_answer(right_option(&runner), Duration::from_secs(2))
            .await
            .unwrap();
        for _ in 0..3 {
            runner
                .submit_answer(wrong_option(&runner), Duration::from_secs(2))
                .await
                .unwrap();
        }

        assert!(runner.revive());
        assert!(!runner.game_state().is_game_over);
        assert_eq!(runner.status(), GameStatus::Challenge { lives: 1 });
        assert!(runner.current_question().is_some());

        let outcome = runner
            .submit_answer(right_option(&runner), Duration::from_secs(2))
            .await
            .unwrap();
        assert_eq!(outcome.state.score, 2);
    }

    #[tokio::test]
    async fn revive_is_refused_outside_a_continuable_ending() {
        let store = Arc::new(MemoryStore::new());
        let (mut runner, _) = runner_for(ModeKind::Survival, 10, store.clone());
        assert!(!runner.revive());

        let (mut active, _) = runner_for(ModeKind::Challenge, 10, store);
        assert!(!active.revive());
    }

    #[tokio::test]
    async fn completing_a_challenge_deck_unlocks_the_next_level() {
        let store = Arc::new(MemoryStore::new());
        let profile_id = Uuid::new_v4();
        let mut runner = QuizRunner::new(
            ModeKind::Challenge,
            GameModeConfig::challenge(),
            deck(2),
            store.clone(),
            profile_id,
        )
        .with_level(1);

        runner
            .submit_answer(right_option(&runner), Duration::from_secs(2))
            .await
            .unwrap();
        runner
            .submit_answer(right_option(&runner), Duration::from_secs(2))
            .await
            .unwrap();

        assert!(runner.is_settled());
        let profile = store.find_profile(profile_id).await.unwrap().unwrap();
        assert!(profile.unlocked_levels.contains(&2));
        assert_eq!(profile.gold, 22); // score 2 + completion bonus
    }

    #[tokio::test]
    async fn out_of_range_option_is_rejected_without_touching_state() {
        let store = Arc::new(MemoryStore::new());
        let (mut runner, _) = runner_for(ModeKind::Survival, 5, store);

        let err = runner
            .submit_answer(9, Duration::from_secs(1))
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::OptionOutOfRange { index: 9, .. }));
        assert_eq!(runner.game_state().score, 0);
    }

    #[tokio::test]
    async fn time_up_is_graded_as_a_miss_for_per_question_modes() {
        let store = Arc::new(MemoryStore::new());
        let (mut runner, _) = runner_for(ModeKind::Survival, 5, store);

        let outcome = runner.question_time_up().await.unwrap();
        assert!(!outcome.correct);
        assert_eq!(outcome.status, GameStatus::Survival { consecutive_wrong: 1 });
    }

    #[tokio::test(start_paused = true)]
    async fn clock_expiry_ends_and_settles_a_time_attack_run() {
        let store = Arc::new(MemoryStore::new());
        let (runner, profile_id) = runner_for(ModeKind::TimeAttack, 5, store.clone());
        let runner = Arc::new(Mutex::new(runner));

        let clock = tokio::spawn(drive_clock(Arc::clone(&runner)));
        clock.await.unwrap();

        let guard = runner.lock().await;
        let state = guard.game_state();
        assert!(state.is_game_over);
        assert_eq!(state.game_over_reason.as_deref(), Some("Time is up!"));
        assert!(guard.is_settled());

        let profile = store.find_profile(profile_id).await.unwrap().unwrap();
        assert_eq!(profile.stats[&ModeKind::TimeAttack].games_played, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn stopping_the_clock_leaves_the_run_unsettled() {
        let store = Arc::new(MemoryStore::new());
        let (mut runner, profile_id) = runner_for(ModeKind::TimeAttack, 5, store.clone());
        runner.stop_clock();
        let runner = Arc::new(Mutex::new(runner));

        let clock = tokio::spawn(drive_clock(Arc::clone(&runner)));
        clock.await.unwrap();

        assert!(!runner.lock().await.game_state().is_game_over);
        assert_eq!(store.find_profile(profile_id).await.unwrap(), None);
    }
}
