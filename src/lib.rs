//! Trivia game engine: mode state machines, question decks, and profile
//! persistence for a quiz application.
//!
//! The core is the closed set of game-mode sessions in [`modes`]. The
//! surrounding modules provide the question source ([`questions`]), the
//! persistence seam ([`store`]), the mode catalog ([`config`]), and the
//! runner that drives a session end to end ([`runner`]).

pub mod config;
pub mod error;
pub mod modes;
pub mod questions;
pub mod runner;
pub mod store;
