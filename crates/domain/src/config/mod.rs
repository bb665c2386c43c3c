//! Configuration module, organized by concern.
//!
//! - `database`: catalog storage tuning
//! - `scanning`: opaque port-scan producer invocation parameters
//! - `verification`: validation pipeline timeouts and concurrency
//! - `rotation`: rotating gateway hot pool and listener
//! - `lifecycle`: periodic re-verify/cleanup sweep
//! - `logging`: log level and format
//! - `root`: `Config` aggregate, `CliOverrides`, load/validate

pub mod database;
pub mod errors;
pub mod lifecycle;
pub mod logging;
pub mod root;
pub mod rotation;
pub mod scanning;
pub mod verification;

pub use database::DatabaseConfig;
pub use errors::ConfigError;
pub use lifecycle::LifecycleConfig;
pub use logging::LoggingConfig;
pub use root::{ensure_parent_dir, CliOverrides, Config};
pub use rotation::{RotationConfig, RotationStrategy};
pub use scanning::ScanningConfig;
pub use verification::VerificationConfig;
