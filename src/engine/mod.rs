//! External recommendation engine orchestration.
//!
//! The engine is a long-running external computation (an audio-similarity
//! script over a feature dataset) whose duration and output are both
//! untrusted. This module bounds it:
//!
//! - [`runner::EngineRunner`] supervises one invocation as an isolated unit
//!   of work: fixed argument vector, separate stdout/stderr capture, a hard
//!   wall-clock deadline with a confirmed kill, and a semaphore that caps
//!   how many engine processes run at once.
//! - [`recommender::Recommender`] sanitizes the source title, invokes the
//!   runner, and classifies the informal text output into a recommended
//!   title or one of the engine failure modes.
//!
//! State machine per invocation: launched → running → exactly one of
//! succeeded / timed out / failed / launch error.

pub mod recommender;
pub mod runner;

pub use recommender::Recommender;
pub use runner::{EngineRunner, RunOutcome};
