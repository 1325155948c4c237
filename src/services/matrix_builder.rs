use crate::models::{
    FullCheckEntry, PatchType, QuickCheckEntry, ReleaseRecord, VerifyEntry, VerifyMatrix,
};
use crate::services::paths::{self, FTP_ROOT};
use crate::services::platforms::Platform;
use crate::services::resolver::ResolvedRelease;
use indexmap::{IndexMap, IndexSet};
use thiserror::Error;

/// Locales fully checked when the caller names none.
pub const DEFAULT_FULL_CHECK_LOCALES: [&str; 3] = ["de", "en-US", "ru"];

/// Errors raised while classifying historical versions
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MatrixError {
    #[error("Version {version} has no build recorded for platform {platform}")]
    MissingPlatformBuild { version: String, platform: String },

    #[error("Version {version} has no release record in the patcher config")]
    MissingRelease { version: String },

    #[error("Every locale of version {version} is excluded on platform {platform}")]
    EmptyLocaleSet { version: String, platform: String },
}

impl MatrixError {
    /// Fatal errors abort the run; the rest skip a single version.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, MatrixError::EmptyLocaleSet { .. })
    }
}

/// Locales of a release shipped on `ftp_platform`, in their recorded order.
///
/// A locale is dropped when `ftp_platform` is listed among its exceptions.
pub fn filter_locale_exceptions(record: &ReleaseRecord, ftp_platform: &str) -> Vec<String> {
    record
        .locales
        .iter()
        .filter(|locale| {
            !record
                .exceptions
                .get(locale.as_str())
                .is_some_and(|platforms| platforms.contains(ftp_platform))
        })
        .cloned()
        .collect()
}

/// Builds the update-verify matrix for one platform.
///
/// Historical versions are visited newest first. A version with a partial
/// patch gets one entry checking every locale for both patch types, with
/// source and destination on the same staging server. Any other version gets
/// a complete-only entry for the full-check locales, downloading the old build
/// from the previous-releases server, followed by a quick-check entry for the
/// remaining locales when there are any.
pub struct MatrixBuilder<'a> {
    resolved: &'a ResolvedRelease,
    releases: &'a IndexMap<String, ReleaseRecord>,
    platform: Platform,
    channel: String,
    full_check_locales: IndexSet<String>,
}

impl<'a> MatrixBuilder<'a> {
    pub fn new(
        resolved: &'a ResolvedRelease,
        releases: &'a IndexMap<String, ReleaseRecord>,
        platform: Platform,
        channel: impl Into<String>,
    ) -> Self {
        Self {
            resolved,
            releases,
            platform,
            channel: channel.into(),
            full_check_locales: DEFAULT_FULL_CHECK_LOCALES
                .iter()
                .map(|l| l.to_string())
                .collect(),
        }
    }

    /// Replace the set of locales that get a full download-and-diff check
    pub fn with_full_check_locales<I, S>(mut self, locales: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.full_check_locales = locales.into_iter().map(Into::into).collect();
        self
    }

    /// Destination path of every check: the target build in its candidates directory.
    pub fn to_path(&self) -> String {
        let r = self.resolved;
        format!(
            "{}{}",
            r.candidates_dir,
            paths::primary_repack_url(&r.product_name, &r.app_name, &r.target_version, &self.platform)
        )
    }

    /// Source path for a historical version, shared by all of its checks.
    pub fn from_path(&self, version: &str) -> String {
        let r = self.resolved;
        format!(
            "{}{}",
            paths::releases_dir(&r.product_name, version, FTP_ROOT),
            paths::primary_repack_url(&r.product_name, &r.app_name, version, &self.platform)
        )
    }

    /// Build the matrix.
    ///
    /// # Errors
    ///
    /// Returns the first fatal [`MatrixError`]. Versions whose locales are all
    /// excluded on this platform are logged and left out.
    pub fn build(&self) -> Result<VerifyMatrix, MatrixError> {
        let mut matrix = VerifyMatrix::new(
            self.resolved.app_name.clone(),
            self.platform.update_platform(),
            self.channel.clone(),
            self.resolved.aus_server_url.clone(),
            self.to_path(),
        );

        for version in &self.resolved.historical_versions {
            if *version == self.resolved.target_version {
                tracing::debug!("Skipping target version {} in history", version);
                continue;
            }

            match self.entries_for_version(version) {
                Ok(entries) => matrix.entries.extend(entries),
                Err(e) if !e.is_fatal() => {
                    tracing::warn!("{}, leaving it out of the matrix", e);
                }
                Err(e) => {
                    tracing::error!("{}", e);
                    return Err(e);
                }
            }
        }

        tracing::info!(
            "Built update verify matrix for {} on {}: {} entries over {} versions",
            matrix.product,
            matrix.platform,
            matrix.entries.len(),
            matrix.releases().len()
        );

        Ok(matrix)
    }

    /// Entries for one historical version, full check first.
    pub fn entries_for_version(&self, version: &str) -> Result<Vec<VerifyEntry>, MatrixError> {
        let record = self
            .releases
            .get(version)
            .ok_or_else(|| MatrixError::MissingRelease {
                version: version.to_string(),
            })?;

        let build_id = record
            .build_id(self.platform.ftp)
            .ok_or_else(|| MatrixError::MissingPlatformBuild {
                version: version.to_string(),
                platform: self.platform.ftp.to_string(),
            })?
            .to_string();

        let locales = filter_locale_exceptions(record, self.platform.ftp);
        if locales.is_empty() {
            return Err(MatrixError::EmptyLocaleSet {
                version: version.to_string(),
                platform: self.platform.ftp.to_string(),
            });
        }

        let release = match record.extension_version.as_deref() {
            Some(display) => display.to_string(),
            None => {
                tracing::warn!(
                    "No extension-version recorded for {}, using the version itself",
                    version
                );
                version.to_string()
            }
        };
        let from_path = self.from_path(version);

        if self.resolved.partials.contains(version) {
            tracing::debug!(
                "{}: partial and complete checks for {} locales",
                version,
                locales.len()
            );
            return Ok(vec![VerifyEntry::Full(FullCheckEntry {
                release,
                build_id,
                locales,
                patch_types: vec![PatchType::Complete, PatchType::Partial],
                from_path,
                ftp_server_from: self.resolved.staging_server.clone(),
                ftp_server_to: self.resolved.staging_server.clone(),
            })]);
        }

        let (full, quick): (Vec<String>, Vec<String>) = locales
            .into_iter()
            .partition(|locale| self.full_check_locales.contains(locale));

        tracing::debug!(
            "{}: complete check for {} locales, quick check for {}",
            version,
            full.len(),
            quick.len()
        );

        let mut entries = vec![VerifyEntry::Full(FullCheckEntry {
            release: release.clone(),
            build_id: build_id.clone(),
            locales: full,
            patch_types: vec![PatchType::Complete],
            from_path,
            ftp_server_from: self.resolved.previous_releases_staging_server.clone(),
            ftp_server_to: self.resolved.staging_server.clone(),
        })];

        if !quick.is_empty() {
            entries.push(VerifyEntry::Quick(QuickCheckEntry {
                release,
                build_id,
                locales: quick,
            }));
        }

        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(build_id: &str, locales: &[&str], exceptions: &[(&str, &str)]) -> ReleaseRecord {
        ReleaseRecord {
            extension_version: None,
            platforms: [("mac".to_string(), build_id.to_string())].into_iter().collect(),
            locales: locales.iter().map(|l| l.to_string()).collect(),
            exceptions: exceptions
                .iter()
                .map(|(locale, platform)| {
                    (
                        locale.to_string(),
                        IndexSet::from([platform.to_string()]),
                    )
                })
                .collect(),
        }
    }

    fn resolved(history: &[&str], partials: &[&str]) -> ResolvedRelease {
        ResolvedRelease {
            product_name: "firefox".to_string(),
            app_name: "Firefox".to_string(),
            build_number: 2,
            aus_server_url: "https://aus.example.org".to_string(),
            staging_server: "http://stage/pub/mozilla.org".to_string(),
            previous_releases_staging_server: "http://archive/pub/mozilla.org".to_string(),
            target_version: "10.0".to_string(),
            target_display_version: "10.0".to_string(),
            candidates_dir: "/firefox/candidates/10.0-candidates/build2/".to_string(),
            historical_versions: history.iter().map(|v| v.to_string()).collect(),
            partials: partials.iter().map(|v| v.to_string()).collect(),
        }
    }

    fn mac() -> Platform {
        Platform::from_build_name("macosx64").unwrap()
    }

    #[test]
    fn test_filter_locale_exceptions() {
        let rec = record("1", &["de", "ja-JP-mac", "ja"], &[("ja", "mac")]);
        assert_eq!(filter_locale_exceptions(&rec, "mac"), vec!["de", "ja-JP-mac"]);
        assert_eq!(
            filter_locale_exceptions(&rec, "win32"),
            vec!["de", "ja-JP-mac", "ja"]
        );
    }

    #[test]
    fn test_partial_version_single_entry() {
        let releases: IndexMap<String, ReleaseRecord> =
            [("9.0".to_string(), record("20111216", &["de", "fr"], &[]))]
                .into_iter()
                .collect();
        let resolved = resolved(&["9.0"], &["9.0"]);
        let builder = MatrixBuilder::new(&resolved, &releases, mac(), "betatest");

        let entries = builder.entries_for_version("9.0").unwrap();
        assert_eq!(entries.len(), 1);
        let VerifyEntry::Full(entry) = &entries[0] else {
            panic!("expected full check");
        };
        assert_eq!(entry.patch_types, vec![PatchType::Complete, PatchType::Partial]);
        assert_eq!(entry.locales, vec!["de", "fr"]);
        assert_eq!(entry.ftp_server_from, entry.ftp_server_to);
        assert_eq!(entry.from_path, "/firefox/releases/9.0/mac/%locale%/Firefox 9.0.dmg");
        assert_eq!(entry.release, "9.0");
    }

    #[test]
    fn test_complete_version_split() {
        let releases: IndexMap<String, ReleaseRecord> = [(
            "7.0".to_string(),
            record("2011", &["de", "en-US", "fr", "it", "ru"], &[]),
        )]
        .into_iter()
        .collect();
        let resolved = resolved(&["7.0"], &[]);
        let builder = MatrixBuilder::new(&resolved, &releases, mac(), "betatest");

        let entries = builder.entries_for_version("7.0").unwrap();
        assert_eq!(entries.len(), 2);
        let VerifyEntry::Full(full) = &entries[0] else {
            panic!("expected full check first");
        };
        assert_eq!(full.locales, vec!["de", "en-US", "ru"]);
        assert_eq!(full.patch_types, vec![PatchType::Complete]);
        assert_eq!(full.ftp_server_from, "http://archive/pub/mozilla.org");
        assert_eq!(full.ftp_server_to, "http://stage/pub/mozilla.org");

        assert_eq!(
            entries[1],
            VerifyEntry::Quick(QuickCheckEntry {
                release: "7.0".to_string(),
                build_id: "2011".to_string(),
                locales: vec!["fr".to_string(), "it".to_string()],
            })
        );
    }

    #[test]
    fn test_missing_platform_build_is_fatal() {
        let mut rec = record("1", &["de"], &[]);
        rec.platforms.clear();
        let releases: IndexMap<String, ReleaseRecord> =
            [("8.0".to_string(), rec)].into_iter().collect();
        let resolved = resolved(&["8.0"], &[]);
        let builder = MatrixBuilder::new(&resolved, &releases, mac(), "betatest");

        let err = builder.build().unwrap_err();
        assert!(err.is_fatal());
        assert_eq!(
            err,
            MatrixError::MissingPlatformBuild {
                version: "8.0".to_string(),
                platform: "mac".to_string()
            }
        );
    }

    #[test]
    fn test_empty_locale_set_is_skipped() {
        let releases: IndexMap<String, ReleaseRecord> = [
            ("9.0".to_string(), record("9", &["ja"], &[("ja", "mac")])),
            ("8.0".to_string(), record("8", &["de"], &[])),
        ]
        .into_iter()
        .collect();
        let resolved = resolved(&["9.0", "8.0"], &[]);
        let builder = MatrixBuilder::new(&resolved, &releases, mac(), "betatest");

        let err = builder.entries_for_version("9.0").unwrap_err();
        assert!(!err.is_fatal());

        let matrix = builder.build().unwrap();
        assert_eq!(matrix.releases(), vec!["8.0"]);
    }

    #[test]
    fn test_custom_full_check_locales() {
        let releases: IndexMap<String, ReleaseRecord> =
            [("8.0".to_string(), record("8", &["de", "fr", "ru"], &[]))]
                .into_iter()
                .collect();
        let resolved = resolved(&["8.0"], &[]);
        let builder = MatrixBuilder::new(&resolved, &releases, mac(), "betatest")
            .with_full_check_locales(["fr"]);

        let entries = builder.entries_for_version("8.0").unwrap();
        assert_eq!(entries[0].locales(), ["fr".to_string()]);
        assert_eq!(entries[1].locales(), ["de".to_string(), "ru".to_string()]);
    }

    #[test]
    fn test_target_version_never_emitted() {
        let releases: IndexMap<String, ReleaseRecord> = [
            ("10.0".to_string(), record("10", &["de"], &[])),
            ("9.0".to_string(), record("9", &["de"], &[])),
        ]
        .into_iter()
        .collect();
        let resolved = resolved(&["10.0", "9.0"], &[]);
        let builder = MatrixBuilder::new(&resolved, &releases, mac(), "betatest");

        let matrix = builder.build().unwrap();
        assert_eq!(matrix.releases(), vec!["9.0"]);
        assert_eq!(
            matrix.to_path,
            "/firefox/candidates/10.0-candidates/build2/mac/%locale%/Firefox 10.0.dmg"
        );
        assert_eq!(matrix.platform, "Darwin_x86_64-gcc3");
    }
}
