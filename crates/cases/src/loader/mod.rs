//! Case directory loader.
//!
//! A case directory holds one YAML definition file plus exactly one
//! `*.good` and one `*.fail` log sample.

mod core;
mod error;
mod patterns;


pub use self::core::CaseLoader;
pub use self::error::{CaseError, Result, SampleKind};
pub use self::patterns::resolve_patterns;
