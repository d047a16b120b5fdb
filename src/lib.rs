#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Projection Core
//!
//! Rust core for execution status projection: converts the raw, loosely
//! structured `task_context` records persisted by workflow workers into
//! canonical, fully validated [`StatusProjection`] snapshots.
//!
//! ## Overview
//!
//! Long-running, multi-step automated workflows persist progress as a
//! `task_context` whose shape has drifted across worker versions: field
//! casing changes, nesting changes, keys go missing. This crate is the
//! transformation pipeline that reconciles those historical shapes,
//! derives a single authoritative status from many independent node
//! states, and guarantees - under adversarial or corrupted input - that it
//! never fails to produce a usable answer, while surfacing degradation
//! through logs and metrics.
//!
//! ## Key Guarantees
//!
//! - **Total availability**: [`StatusTransformer::transform`] never
//!   returns an error; the worst case is a minimal `error`-status
//!   projection with the cause in the logs.
//! - **Closed status enum**: status is a tagged enum at every boundary;
//!   string forms exist only at serialization.
//! - **Invariants by construction**: an idle execution never names a
//!   current task, a running one always does, a completed one reports
//!   exactly 100.0 progress.
//! - **Purity**: stateless across invocations, safe to call concurrently
//!   from unboundedly many threads without locking.
//!
//! ## Module Organization
//!
//! - [`models`] - canonical data model (`StatusProjection` and friends)
//! - [`transformer`] - the five-phase pipeline and its outer boundary
//! - [`telemetry`] - dependency-injected metrics/log observability handle
//! - [`error`] - structured error handling
//! - [`logging`] - tracing subscriber setup for embedding processes
//!
//! ## Quick Start
//!
//! ```rust
//! use projection_core::StatusTransformer;
//! use serde_json::json;
//!
//! let transformer = StatusTransformer::default();
//! let task_context = json!({
//!     "metadata": {"task_id": "ingest", "startedAt": "2026-03-01T10:15:00Z"},
//!     "nodes": {
//!         "fetch": {"status": "completed"},
//!         "parse": {"event_data": {"status": "running"}},
//!     },
//! });
//!
//! let projection = transformer.transform("exec-42", "acme/search", &task_context);
//! assert_eq!(projection.status.to_string(), "running");
//! assert_eq!(projection.customer_id.as_deref(), Some("acme"));
//! ```

pub mod error;
pub mod logging;
pub mod models;
pub mod telemetry;
pub mod transformer;

pub use error::{Result, TransformationError};
pub use models::{ExecutionArtifacts, ExecutionStatus, StatusProjection, TaskTotals};
pub use telemetry::{CallOutcome, Telemetry, TelemetrySnapshot};
pub use transformer::{Degradation, StatusTransformer, TransformRequest};
