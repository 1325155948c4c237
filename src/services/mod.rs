//! Services module - Pure logic for building update-verify matrices.
//!
//! Nothing here touches the filesystem, the network or the environment; every
//! input is an explicit parameter. File loading and writing live in
//! [`crate::config`].
//!
//! # Components
//!
//! - [`ReleaseMetadataResolver`]: Validates the release config and derives the
//!   target version, its candidates directory, server URLs and the historical
//!   versions to verify (newest first, target excluded).
//!
//! - [`MatrixBuilder`]: Walks the historical versions and emits, per version:
//!   - one complete+partial check over every locale when a partial patch exists
//!   - otherwise a complete check over the full-check locales, plus a quick
//!     check listing the remaining locales
//!
//! - [`platforms`], [`paths`], [`version`]: Platform name mapping, staging
//!   server layout and loose version ordering used by the two above.
//!
//! - [`harness`]: Text format consumed by the update-verify harness.
//!
//! # Usage Example
//!
//! ```ignore
//! use update_verify::services::{MatrixBuilder, Platform, ReleaseMetadataResolver};
//!
//! let resolved = ReleaseMetadataResolver::new(&release_config, &patcher_config).resolve()?;
//! let platform = Platform::from_build_name("macosx64")?;
//! let matrix = MatrixBuilder::new(&resolved, &patcher_config.releases, platform, "betatest")
//!     .with_full_check_locales(["de", "en-US", "ru"])
//!     .build()?;
//! ```

pub mod harness;
pub mod matrix_builder;
pub mod paths;
pub mod platforms;
pub mod resolver;
pub mod version;

pub use harness::HarnessFormatError;
pub use matrix_builder::{
    DEFAULT_FULL_CHECK_LOCALES, MatrixBuilder, MatrixError, filter_locale_exceptions,
};
pub use platforms::Platform;
pub use resolver::{ConfigurationError, ReleaseMetadataResolver, ResolvedRelease};
pub use version::LooseVersion;
