use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

/// Patcher configuration describing the update being produced and every
/// release users may be updating from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatcherConfig {
    #[serde(rename = "appName")]
    pub app_name: String,

    #[serde(rename = "current-update")]
    pub current_update: CurrentUpdate,

    /// Release records keyed by version.
    #[serde(rename = "release", default)]
    pub releases: IndexMap<String, ReleaseRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUpdate {
    /// Target version of this update.
    #[serde(default)]
    pub to: Option<String>,

    /// Versions a partial patch was generated from.
    #[serde(default)]
    pub partials: IndexSet<String>,
}

/// One shipped release.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseRecord {
    #[serde(
        rename = "extension-version",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub extension_version: Option<String>,

    /// FTP platform name to build id.
    #[serde(default)]
    pub platforms: IndexMap<String, String>,

    #[serde(default)]
    pub locales: IndexSet<String>,

    /// Locale to the FTP platforms it was not shipped on.
    #[serde(default)]
    pub exceptions: IndexMap<String, IndexSet<String>>,
}

impl PatcherConfig {
    /// Get the release record for a version
    pub fn release(&self, version: &str) -> Option<&ReleaseRecord> {
        self.releases.get(version)
    }

    /// Check if a partial patch was generated from `version`
    pub fn is_partial(&self, version: &str) -> bool {
        self.current_update.partials.contains(version)
    }
}

impl ReleaseRecord {
    /// Get the build id recorded for an FTP platform
    pub fn build_id(&self, ftp_platform: &str) -> Option<&str> {
        self.platforms.get(ftp_platform).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PATCHER_YAML: &str = r#"
appName: Firefox
current-update:
  to: "10.0"
  partials: ["9.0"]
release:
  "9.0":
    extension-version: "9.0"
    platforms:
      mac: "20111216140209"
      win32: "20111216140209"
    locales: [de, en-US, ja-JP-mac]
    exceptions:
      ja-JP-mac: [win32]
  "10.0":
    extension-version: "10.0"
    platforms:
      mac: "20120129021758"
    locales: [de, en-US]
"#;

    #[test]
    fn test_parse_patcher_config() {
        let config: PatcherConfig = serde_yaml_ng::from_str(PATCHER_YAML).unwrap();

        assert_eq!(config.app_name, "Firefox");
        assert_eq!(config.current_update.to.as_deref(), Some("10.0"));
        assert!(config.is_partial("9.0"));
        assert!(!config.is_partial("10.0"));

        let release = config.release("9.0").unwrap();
        assert_eq!(release.build_id("mac"), Some("20111216140209"));
        assert_eq!(release.build_id("linux-i686"), None);
        assert!(release.exceptions["ja-JP-mac"].contains("win32"));
    }

    #[test]
    fn test_locale_order_preserved() {
        let config: PatcherConfig = serde_yaml_ng::from_str(PATCHER_YAML).unwrap();
        let locales: Vec<&str> = config.releases["9.0"]
            .locales
            .iter()
            .map(String::as_str)
            .collect();
        assert_eq!(locales, vec!["de", "en-US", "ja-JP-mac"]);
    }

    #[test]
    fn test_missing_optional_sections_default() {
        let yaml = r#"
appName: Firefox
current-update: {}
"#;
        let config: PatcherConfig = serde_yaml_ng::from_str(yaml).unwrap();
        assert!(config.current_update.to.is_none());
        assert!(config.current_update.partials.is_empty());
        assert!(config.releases.is_empty());
    }
}
