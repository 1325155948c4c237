use crate::models::{PatcherConfig, ReleaseConfig};
use crate::services::paths::{self, FTP_ROOT};
use crate::services::version;
use indexmap::IndexSet;
use thiserror::Error;

/// Errors in the supplied release or patcher configuration.
///
/// These are operator input errors and are never retried.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("Required item missing in release config: {0}")]
    MissingField(&'static str),

    #[error("Required items missing in release config: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    #[error("Target version missing from patcher config (current-update.to)")]
    MissingTargetVersion,

    #[error("Unknown build platform: {0}")]
    UnknownPlatform(String),
}

/// Everything about the current release the matrix builder needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRelease {
    pub product_name: String,
    pub app_name: String,
    pub build_number: u32,
    pub aus_server_url: String,
    /// Base URL of the staging server holding the target build.
    pub staging_server: String,
    /// Base URL of the server holding already-shipped builds.
    pub previous_releases_staging_server: String,
    pub target_version: String,
    pub target_display_version: String,
    /// Candidates directory of the target build, relative to the staging server.
    pub candidates_dir: String,
    /// Every other version in the patcher config, newest first.
    pub historical_versions: Vec<String>,
    /// Versions with a partial patch to the target.
    pub partials: IndexSet<String>,
}

/// Derives target release metadata from release and patcher configs.
///
/// Pure: nothing is read from the environment, all inputs are parameters.
pub struct ReleaseMetadataResolver<'a> {
    release_config: &'a ReleaseConfig,
    patcher_config: &'a PatcherConfig,
}

impl<'a> ReleaseMetadataResolver<'a> {
    pub fn new(release_config: &'a ReleaseConfig, patcher_config: &'a PatcherConfig) -> Self {
        Self {
            release_config,
            patcher_config,
        }
    }

    /// Resolve the target release.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::MissingField`] (or `MissingFields` when more
    /// than one is absent) for missing release config keys, and
    /// [`ConfigurationError::MissingTargetVersion`] when the patcher config has
    /// no target version.
    pub fn resolve(&self) -> Result<ResolvedRelease, ConfigurationError> {
        let missing = self.release_config.missing_keys();
        for key in &missing {
            tracing::error!("Required item missing in config: {}", key);
        }
        if missing.len() == 1 {
            return Err(ConfigurationError::MissingField(missing[0]));
        }
        if !missing.is_empty() {
            return Err(ConfigurationError::MissingFields(missing));
        }

        let rc = self.release_config;
        let (Some(product_name), Some(build_number), Some(aus_server_url), Some(staging_host)) = (
            rc.product_name.clone(),
            rc.build_number,
            rc.aus_server_url.clone(),
            rc.staging_server.as_deref(),
        ) else {
            return Err(ConfigurationError::MissingFields(
                crate::models::REQUIRED_RELEASE_KEYS.to_vec(),
            ));
        };

        let target_version = self
            .patcher_config
            .current_update
            .to
            .clone()
            .filter(|to| !to.is_empty())
            .ok_or(ConfigurationError::MissingTargetVersion)?;

        let previous_host = match rc.previous_releases_staging_server.as_deref() {
            Some(host) if !host.is_empty() => host,
            _ => {
                tracing::info!(
                    "previousReleasesStagingServer not set, using stagingServer {}",
                    staging_host
                );
                staging_host
            }
        };

        let target_display_version = self.display_version(&target_version);
        let candidates_dir =
            paths::candidates_dir(&product_name, &target_version, build_number, FTP_ROOT);

        let historical_versions = version::sort_descending(
            self.patcher_config
                .releases
                .keys()
                .filter(|v| **v != target_version)
                .cloned(),
        );

        tracing::info!(
            "Resolved {} {} build{}: {} historical versions, {} partials",
            product_name,
            target_version,
            build_number,
            historical_versions.len(),
            self.patcher_config.current_update.partials.len()
        );

        Ok(ResolvedRelease {
            app_name: self.patcher_config.app_name.clone(),
            staging_server: paths::staging_server_url(staging_host),
            previous_releases_staging_server: paths::staging_server_url(previous_host),
            partials: self.patcher_config.current_update.partials.clone(),
            product_name,
            build_number,
            aus_server_url,
            target_display_version,
            target_version,
            candidates_dir,
            historical_versions,
        })
    }

    /// Display version of a release, falling back to the version key itself.
    pub fn display_version(&self, version: &str) -> String {
        match self
            .patcher_config
            .release(version)
            .and_then(|r| r.extension_version.as_deref())
        {
            Some(display) => display.to_string(),
            None => {
                tracing::warn!(
                    "No extension-version recorded for {}, using the version itself",
                    version
                );
                version.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ReleaseRecord;

    fn release_config() -> ReleaseConfig {
        ReleaseConfig {
            product_name: Some("firefox".to_string()),
            build_number: Some(1),
            aus_server_url: Some("https://aus.example.org".to_string()),
            staging_server: Some("stage.example.org".to_string()),
            previous_releases_staging_server: None,
        }
    }

    fn patcher_config() -> PatcherConfig {
        let mut config = PatcherConfig {
            app_name: "Firefox".to_string(),
            ..Default::default()
        };
        config.current_update.to = Some("10.0".to_string());
        config.current_update.partials.insert("9.0".to_string());
        for v in ["8.0", "10.0", "9.0", "7.0"] {
            config.releases.insert(
                v.to_string(),
                ReleaseRecord {
                    extension_version: Some(format!("{v} display")),
                    ..Default::default()
                },
            );
        }
        config
    }

    #[test]
    fn test_resolve() {
        let rc = release_config();
        let pc = patcher_config();
        let resolved = ReleaseMetadataResolver::new(&rc, &pc).resolve().unwrap();

        assert_eq!(resolved.target_version, "10.0");
        assert_eq!(resolved.target_display_version, "10.0 display");
        assert_eq!(resolved.historical_versions, vec!["9.0", "8.0", "7.0"]);
        assert_eq!(
            resolved.candidates_dir,
            "/firefox/candidates/10.0-candidates/build1/"
        );
        assert_eq!(
            resolved.staging_server,
            "http://stage.example.org/pub/mozilla.org"
        );
        assert_eq!(
            resolved.previous_releases_staging_server,
            resolved.staging_server
        );
    }

    #[test]
    fn test_previous_releases_server_override() {
        let mut rc = release_config();
        rc.previous_releases_staging_server = Some("archive.example.org".to_string());
        let pc = patcher_config();
        let resolved = ReleaseMetadataResolver::new(&rc, &pc).resolve().unwrap();

        assert_eq!(
            resolved.previous_releases_staging_server,
            "http://archive.example.org/pub/mozilla.org"
        );
    }

    #[test]
    fn test_missing_single_field() {
        let mut rc = release_config();
        rc.aus_server_url = None;
        let pc = patcher_config();
        let err = ReleaseMetadataResolver::new(&rc, &pc).resolve().unwrap_err();
        assert_eq!(err, ConfigurationError::MissingField("ausServerUrl"));
    }

    #[test]
    fn test_missing_multiple_fields() {
        let rc = ReleaseConfig::default();
        let pc = patcher_config();
        let err = ReleaseMetadataResolver::new(&rc, &pc).resolve().unwrap_err();
        assert_eq!(
            err,
            ConfigurationError::MissingFields(vec![
                "productName",
                "buildNumber",
                "ausServerUrl",
                "stagingServer"
            ])
        );
    }

    #[test]
    fn test_missing_target_version() {
        let rc = release_config();
        let mut pc = patcher_config();
        pc.current_update.to = None;
        let err = ReleaseMetadataResolver::new(&rc, &pc).resolve().unwrap_err();
        assert_eq!(err, ConfigurationError::MissingTargetVersion);
    }

    #[test]
    fn test_display_version_fallback() {
        let rc = release_config();
        let pc = patcher_config();
        let resolver = ReleaseMetadataResolver::new(&rc, &pc);
        assert_eq!(resolver.display_version("6.0"), "6.0");
    }
}
