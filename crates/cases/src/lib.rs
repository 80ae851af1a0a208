//! Test-case discovery and loading.
//!
//! This crate provides:
//! - Glob expansion of case-directory patterns, failing fast on patterns
//!   that match nothing
//! - YAML case definition loading (`inf.yaml` by default)
//! - Location of the `*.good` / `*.fail` sample pair of each case

pub mod loader;

pub use loader::{resolve_patterns, CaseError, CaseLoader, Result, SampleKind};
