pub mod case;
pub mod config;
pub mod detection;
pub mod error;

pub use case::*;
pub use config::EvalConfig;
pub use detection::*;
pub use error::*;
