//! Capmate: a client for captcha-solving web services.
//!
//! This crate speaks the `createTask` / `getTaskResult` JSON protocol used
//! by anti-captcha.com and compatible services: it submits a task-type
//! payload, then polls the result endpoint until the task is solved or
//! fails, returning the service's verdict in full. Transient transport
//! failures are retried with bounded backoff; service-reported errors come
//! back as data, never as exceptions to catch.
//!
//! Both an async engine ([`solver::Solver`]) and a blocking adapter
//! ([`blocking::Solver`]) drive the same lifecycle.
//!
//! # Quick start
//!
//! ```no_run
//! use capmate::solver::{SolveOutcome, Solver};
//! use capmate::tasks::ImageToText;
//!
//! # async fn example() -> Result<(), capmate::error::ApiError> {
//! let solver = Solver::from_client_key("your-account-key");
//! let task = ImageToText::from_bytes(&std::fs::read("captcha.png").unwrap());
//! match solver.solve(&task).await? {
//!     SolveOutcome::Finished(result) => {
//!         println!("solved: {:?}", result.solution_field("text"));
//!     }
//!     SolveOutcome::Rejected(created) => {
//!         eprintln!("rejected: {:?}", created.error_code);
//!     }
//!     SolveOutcome::Deferred(query) => {
//!         println!("result will be pushed for task {}", query.task_id);
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod blocking;
pub mod config;
pub mod error;
pub mod solver;
pub mod tasks;
pub mod types;
