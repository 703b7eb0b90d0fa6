//! Blocking execution mode for the shared solve lifecycle.
//!
//! The lifecycle itself is written once as async code; this adapter owns a
//! private single-threaded tokio runtime and drives that same engine with
//! `block_on`, so both modes run identical control flow and issue identical
//! request shapes. The calling thread sleeps through the polling waits.

use crate::config::Config;
use crate::error::ApiError;
use crate::solver;
use crate::tasks::CaptchaTask;

pub use crate::solver::{SolveOutcome, SolveRequest};

/// Blocking counterpart of [`solver::Solver`].
///
/// Each call runs one full solve on the embedded runtime; the thread is
/// unavailable until the solve reaches a terminal state. Use the async
/// solver instead when other work should proceed during the waits.
pub struct Solver {
    inner: solver::Solver,
    runtime: tokio::runtime::Runtime,
}

impl Solver {
    /// Build a blocking solver from resolved configuration.
    ///
    /// Fails only if the embedded runtime cannot be created.
    pub fn new(config: Config) -> Result<Self, std::io::Error> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        Ok(Self {
            inner: solver::Solver::new(config),
            runtime,
        })
    }

    /// Build a blocking solver with built-in defaults and the given
    /// credential.
    pub fn from_client_key(client_key: impl Into<String>) -> Result<Self, std::io::Error> {
        Self::new(Config::with_client_key(client_key))
    }

    /// Solve a typed captcha task, blocking until terminal.
    pub fn solve<T: CaptchaTask>(&self, task: &T) -> Result<SolveOutcome, ApiError> {
        self.runtime.block_on(self.inner.solve(task))
    }

    /// Run one full solve lifecycle for a prepared request, blocking until
    /// terminal.
    pub fn solve_request(&self, request: SolveRequest) -> Result<SolveOutcome, ApiError> {
        self.runtime.block_on(self.inner.solve_request(request))
    }
}
