//! # Provis Core
//!
//! Core library for the provis provisioning service: job lifecycle tracking,
//! templated script execution, and persistence of successfully provisioned
//! instances.
//!
//! ## Overview
//!
//! - [`registry`]: in-memory job registry shared between request handlers and
//!   background tasks
//! - [`runner`]: renders the provisioning script template and runs it as a
//!   child process, capturing the transcript to a log file
//! - [`orchestrator`]: fire-and-forget job execution with status transitions
//! - [`store`]: append-only JSON-backed record of provisioned instances
//! - [`probe`]: bounded-timeout hostname reachability check
//!
//! Job records live for the process lifetime and are never persisted; only
//! instances that completed with exit code zero are written to disk.

pub mod error;
pub mod job;
pub mod orchestrator;
pub mod probe;
pub mod registry;
pub mod runner;
pub mod store;

pub use error::{ProvisionError, Result};
pub use job::{JobRecord, JobStatus};
pub use orchestrator::JobOrchestrator;
pub use probe::HostnameProber;
pub use registry::JobRegistry;
pub use runner::{ScriptOutcome, ScriptRunner};
pub use store::{InstanceRecord, InstanceStore};
