//! Terminal quiz harness: picks a mode, loads the question bank, and plays it.

use std::sync::Arc;
use std::time::Instant;
use std::{env, fs};

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::Mutex;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use trivia_engine::config::ModeCatalog;
use trivia_engine::modes::{GameStatus, ModeKind};
use trivia_engine::questions::QuestionDeck;
use trivia_engine::runner::{QuizRunner, drive_clock};
use trivia_engine::store::memory::MemoryStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let mode: ModeKind = env::args()
        .nth(1)
        .unwrap_or_else(|| "survival".into())
        .parse()?;

    let bank_path =
        env::var("TRIVIA_QUESTIONS_PATH").unwrap_or_else(|_| "config/questions.json".into());
    let raw = fs::read_to_string(&bank_path)
        .with_context(|| format!("reading question bank at {bank_path}"))?;

    let catalog = ModeCatalog::load();
    let config = catalog.get(mode);
    let limit = config.questions_to_load.map(|count| count as usize);

    let mut rng = rand::rng();
    let deck = QuestionDeck::from_json(&raw, limit, &mut rng)?;
    anyhow::ensure!(!deck.is_empty(), "question bank at {bank_path} is empty");

    let store = Arc::new(MemoryStore::new());
    let profile_id = Uuid::new_v4();
    let runner = Arc::new(Mutex::new(QuizRunner::new(
        mode,
        config,
        deck,
        store,
        profile_id,
    )));

    info!(%mode, "starting quiz");
    if mode == ModeKind::TimeAttack {
        tokio::spawn(drive_clock(Arc::clone(&runner)));
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let prompt = {
            let guard = runner.lock().await;
            if guard.game_state().is_game_over {
                break;
            }
            let Some(question) = guard.current_question() else {
                break;
            };
            let mut prompt = format!("\n[{}] {}\n", status_line(guard.status()), question.question.text);
            for (index, option) in question.options.iter().enumerate() {
                prompt.push_str(&format!("  {}. {option}\n", index + 1));
            }
            if let Some(seconds) = guard.question_timer() {
                prompt.push_str(&format!("({seconds}s to answer)\n"));
            }
            prompt
        };
        println!("{prompt}");

        let started = Instant::now();
        let Some(line) = lines.next_line().await? else {
            break;
        };
        let Ok(choice) = line.trim().parse::<usize>() else {
            println!("enter the number of an option");
            continue;
        };

        let mut guard = runner.lock().await;
        if guard.game_state().is_game_over {
            break;
        }
        match guard
            .submit_answer(choice.saturating_sub(1), started.elapsed())
            .await
        {
            Ok(outcome) => {
                if outcome.correct {
                    println!("Correct!");
                } else {
                    println!("Wrong! The answer was option {}.", outcome.correct_option + 1);
                }
                if outcome.state.is_game_over {
                    if outcome.state.show_continue_option {
                        // No continue surface in the terminal harness.
                        guard.decline_continue().await?;
                    }
                    if let Some(reason) = &outcome.state.game_over_reason {
                        println!("Game over: {reason}");
                    }
                    break;
                }
            }
            Err(err) => println!("{err}"),
        }
    }

    let mut guard = runner.lock().await;
    guard.stop_clock();
    println!("\nFinal score: {}", guard.game_state().score);
    Ok(())
}

fn status_line(status: GameStatus) -> String {
    match status {
        GameStatus::Challenge { lives } => format!("Lives: {lives}"),
        GameStatus::TimeAttack {
            time_remaining,
            correct_streak,
        } => format!("Time: {time_remaining}s, Streak: {correct_streak}"),
        GameStatus::Survival { consecutive_wrong } => {
            format!("Strikes: {consecutive_wrong}/3")
        }
    }
}

/// Configure tracing subscribers so logs include spans by default.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
