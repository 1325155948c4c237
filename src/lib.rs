// update-verify - Update verification matrix builder
//
// This is the library crate containing the matrix construction logic and data structures.
// The binary crate (main.rs) provides the command line entry point.

pub mod config;
pub mod logging;
pub mod models;
pub mod services;

// Re-export commonly used types for convenience
pub use config::{ConfigLoader, Settings};
pub use models::{
    FullCheckEntry, PatchType, PatcherConfig, QuickCheckEntry, ReleaseConfig, ReleaseRecord,
    VerifyEntry, VerifyMatrix,
};
pub use services::{
    ConfigurationError, MatrixBuilder, MatrixError, Platform, ReleaseMetadataResolver,
    ResolvedRelease,
};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
