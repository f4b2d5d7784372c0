// Library surface for headless/integration tests and reuse.
// Keep this lean to avoid coupling to bin-only types in main.rs.
pub mod app_dirs;
pub mod chunk;
pub mod config;
pub mod difficulty;
pub mod error;
pub mod prompt;
pub mod round;
pub mod runtime;
pub mod sprite;
pub mod telemetry;
pub mod tick;

pub use error::{Error, Result};
pub use round::{Round, RoundFactory, RoundOutcome, RoundView};
