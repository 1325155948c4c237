use serde::{Deserialize, Serialize};

/// Release configuration for the build being shipped.
///
/// Every field is optional at parse time. Required keys are enforced by
/// [`ReleaseMetadataResolver`](crate::services::ReleaseMetadataResolver) so a
/// missing key is reported by name instead of as a YAML parse failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseConfig {
    #[serde(rename = "productName", default)]
    pub product_name: Option<String>,

    #[serde(rename = "buildNumber", default)]
    pub build_number: Option<u32>,

    #[serde(rename = "ausServerUrl", default)]
    pub aus_server_url: Option<String>,

    #[serde(rename = "stagingServer", default)]
    pub staging_server: Option<String>,

    /// Host serving already-shipped builds. Falls back to `stagingServer`.
    #[serde(
        rename = "previousReleasesStagingServer",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub previous_releases_staging_server: Option<String>,
}

/// Keys that must be present in every release config.
pub const REQUIRED_RELEASE_KEYS: [&str; 4] =
    ["productName", "buildNumber", "ausServerUrl", "stagingServer"];

impl ReleaseConfig {
    /// Names of the required keys absent from this config, in declaration order.
    pub fn missing_keys(&self) -> Vec<&'static str> {
        let present = [
            self.product_name.as_deref().is_some_and(|s| !s.is_empty()),
            self.build_number.is_some(),
            self.aus_server_url.as_deref().is_some_and(|s| !s.is_empty()),
            self.staging_server.as_deref().is_some_and(|s| !s.is_empty()),
        ];

        REQUIRED_RELEASE_KEYS
            .iter()
            .zip(present)
            .filter(|(_, present)| !present)
            .map(|(key, _)| *key)
            .collect()
    }
}
