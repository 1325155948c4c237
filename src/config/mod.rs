pub mod settings;

pub use settings::Settings;

use crate::models::{PatcherConfig, ReleaseConfig, VerifyMatrix};
use crate::services::harness;
use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::io::BufWriter;

/// Loads the YAML input documents and writes the finished matrix.
///
/// Relative paths are resolved against `base_dir`, the checkout holding the
/// release configs.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    base_dir: Utf8PathBuf,
}

impl ConfigLoader {
    /// Create a new ConfigLoader rooted at `base_dir`.
    pub fn new<P: AsRef<Utf8Path>>(base_dir: P) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    /// Resolve a path against the base directory. Absolute paths are kept.
    pub fn resolve_path(&self, path: &Utf8Path) -> Utf8PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }

    /// Load a release config.
    pub fn load_release_config(&self, path: &Utf8Path) -> Result<ReleaseConfig> {
        let config: ReleaseConfig = self.load_yaml(path, "release config")?;
        Ok(config)
    }

    /// Load a patcher config.
    pub fn load_patcher_config(&self, path: &Utf8Path) -> Result<PatcherConfig> {
        let config: PatcherConfig = self.load_yaml(path, "patcher config")?;
        tracing::info!(
            "Patcher config for {}: {} releases, target {}",
            config.app_name,
            config.releases.len(),
            config.current_update.to.as_deref().unwrap_or("<unset>")
        );
        Ok(config)
    }

    /// Save a release config.
    pub fn save_release_config(&self, config: &ReleaseConfig, path: &Utf8Path) -> Result<()> {
        self.save_yaml(config, path, "release config")
    }

    /// Write a matrix in harness format.
    ///
    /// The text goes to a temporary file next to `output` which is then
    /// renamed into place, so a failed write never leaves a partial file and
    /// never touches an existing `output`. A matrix without entries is
    /// written as an empty file.
    pub fn write_matrix(&self, matrix: &VerifyMatrix, output: &Utf8Path) -> Result<()> {
        let output = self.resolve_path(output);
        if matrix.is_empty() {
            tracing::warn!(
                "No versions to verify for {} on {}, {} will be empty",
                matrix.product,
                matrix.platform,
                output
            );
        }

        if let Some(parent) = output.parent() {
            if !parent.as_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create output directory: {}", parent))?;
            }
        }

        let temp_path = Utf8PathBuf::from(format!("{}.tmp", output));
        let written = fs::File::create(&temp_path)
            .with_context(|| format!("Failed to create {}", temp_path))
            .and_then(|file| {
                harness::write_matrix(matrix, BufWriter::new(file))
                    .with_context(|| format!("Failed to write {}", temp_path))
            })
            .and_then(|()| {
                fs::rename(&temp_path, &output)
                    .with_context(|| format!("Failed to move {} to {}", temp_path, output))
            });

        if let Err(e) = written {
            if temp_path.is_file() {
                let _ = fs::remove_file(&temp_path);
            }
            return Err(e);
        }

        tracing::info!(
            "Wrote {} update verify entries to {}",
            matrix.entries.len(),
            output
        );
        Ok(())
    }

    /// Get the base directory path.
    pub fn base_dir(&self) -> &Utf8Path {
        &self.base_dir
    }

    fn load_yaml<T: DeserializeOwned>(&self, path: &Utf8Path, what: &str) -> Result<T> {
        let path = self.resolve_path(path);
        if !path.exists() {
            anyhow::bail!("{} does not exist: {}", what, path);
        }

        let file_contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}: {}", what, path))?;

        let value = serde_yaml_ng::from_str(&file_contents)
            .with_context(|| format!("Failed to parse {}: {}", what, path))?;

        tracing::info!("Loaded {} from {}", what, path);
        Ok(value)
    }

    fn save_yaml<T: Serialize>(&self, value: &T, path: &Utf8Path, what: &str) -> Result<()> {
        let path = self.resolve_path(path);
        let yaml_string = serde_yaml_ng::to_string(value)
            .with_context(|| format!("Failed to serialize {} to YAML", what))?;

        fs::write(&path, yaml_string)
            .with_context(|| format!("Failed to write {}: {}", what, path))?;

        tracing::info!("Saved {} to {}", what, path);
        Ok(())
    }
}
