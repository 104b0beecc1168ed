//! Core types shared across the crate
//!
//! Currently this is the error vocabulary: [`TrackerError`] for resolution and
//! registration failures, and [`ResetError`] for the aggregate produced by a
//! reset sweep.
//!
//! # Error Model
//!
//! Failures that belong to the tracker itself (a missing dependency, a cycle, a
//! duplicate registration) are strongly typed variants. Failures raised by
//! collaborator code (a component initializer, a reset hook) arrive as
//! [`anyhow::Error`] and are carried through without rewording so the caller sees
//! exactly what the component reported.

pub mod error;

pub use error::{ResetError, ResetFailure, TrackerError};
