//! Data models for update-verify matrix generation.
//!
//! This module contains the input and output structures of a run:
//! - [`ReleaseConfig`]: Product, build number and server identities for the release being shipped
//! - [`PatcherConfig`]: Target version, partial-patch sources and per-version [`ReleaseRecord`]s
//! - [`VerifyMatrix`]: The ordered list of [`VerifyEntry`] checks handed to the harness
//!
//! # Architecture Note
//!
//! The input models are:
//! - **Serializable**: They derive `Serialize`/`Deserialize` for YAML persistence
//! - **Immutable**: Loaded once, then only borrowed by the resolver and builder
//!
//! [`VerifyEntry`] is a tagged enum: a quick check carries no source path, patch
//! types or servers, so nothing downstream has to infer its kind from absent fields.

pub mod matrix;
pub mod patcher;
pub mod release;

pub use matrix::{FullCheckEntry, PatchType, QuickCheckEntry, VerifyEntry, VerifyMatrix};
pub use patcher::{CurrentUpdate, PatcherConfig, ReleaseRecord};
pub use release::{REQUIRED_RELEASE_KEYS, ReleaseConfig};
