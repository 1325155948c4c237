//! Staging server layout.
//!
//! Shipped builds live under `<product>/releases/<version>/`, release
//! candidates under `<product>/candidates/<version>-candidates/build<N>/`.
//! Artifact paths below a directory carry a `%locale%` placeholder that the
//! harness expands per locale.

use crate::services::platforms::Platform;
use indexmap::IndexMap;

/// Placeholder substituted by the harness for each locale.
pub const LOCALE_PLACEHOLDER: &str = "%locale%";

/// Root used for paths relative to a staging server URL.
pub const FTP_ROOT: &str = "/";

/// Build the base URL of a staging server from its hostname
pub fn staging_server_url(host: &str) -> String {
    format!("http://{}/pub/mozilla.org", host)
}

/// Directory holding a shipped release
pub fn releases_dir(product: &str, version: &str, ftp_root: &str) -> String {
    format!("{}{}/releases/{}/", ftp_root, product, version)
}

/// Directory holding a release candidate build
pub fn candidates_dir(product: &str, version: &str, build_number: u32, ftp_root: &str) -> String {
    format!(
        "{}{}/candidates/{}-candidates/build{}/",
        ftp_root, product, version, build_number
    )
}

/// Options for [`release_repack_urls`].
#[derive(Debug, Clone, Copy, Default)]
pub struct RepackOptions {
    /// Point at signed Windows artifacts rather than the `unsigned/` tree
    pub signed: bool,
    /// Skip secondary artifacts such as the Windows zip
    pub exclude_secondary: bool,
}

/// Localized artifact paths for a version, keyed by generic artifact name.
///
/// The primary artifact (tarball, disk image or installer) is always last for
/// Windows and the only one elsewhere.
pub fn release_repack_urls(
    product: &str,
    brand: &str,
    version: &str,
    platform: &Platform,
    locale: &str,
    options: RepackOptions,
) -> IndexMap<String, String> {
    let mut builds = IndexMap::new();

    if platform.is_linux() {
        builds.insert(
            format!("{}.tar.bz2", product),
            join_path(&[
                platform.ftp,
                locale,
                &format!("{}-{}.tar.bz2", product, version),
            ]),
        );
    } else if platform.is_mac() {
        builds.insert(
            format!("{}.dmg", product),
            join_path(&[platform.ftp, locale, &format!("{} {}.dmg", brand, version)]),
        );
    } else if platform.is_windows() {
        let mut prefix: Vec<&str> = Vec::new();
        if !options.signed {
            prefix.push("unsigned");
        }
        prefix.extend([platform.ftp, locale]);

        if !options.exclude_secondary {
            let zip = format!("{}-{}.zip", product, version);
            let parts: Vec<&str> = prefix.iter().copied().chain([zip.as_str()]).collect();
            builds.insert(format!("{}.zip", product), join_path(&parts));
        }

        let installer = format!("{} Setup {}.exe", brand, version);
        let parts: Vec<&str> = prefix.iter().copied().chain([installer.as_str()]).collect();
        builds.insert(format!("{}.exe", product), join_path(&parts));
    }

    builds
}

/// The installer-style artifact path the harness downloads for a version.
pub fn primary_repack_url(product: &str, brand: &str, version: &str, platform: &Platform) -> String {
    let options = RepackOptions {
        signed: true,
        exclude_secondary: true,
    };
    release_repack_urls(product, brand, version, platform, LOCALE_PLACEHOLDER, options)
        .pop()
        .map(|(_, path)| path)
        .unwrap_or_default()
}

fn join_path(parts: &[&str]) -> String {
    parts
        .iter()
        .map(|p| p.trim_matches('/'))
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn platform(name: &str) -> Platform {
        Platform::from_build_name(name).unwrap()
    }

    #[test]
    fn test_directories() {
        assert_eq!(
            releases_dir("firefox", "9.0", FTP_ROOT),
            "/firefox/releases/9.0/"
        );
        assert_eq!(
            candidates_dir("firefox", "10.0", 3, FTP_ROOT),
            "/firefox/candidates/10.0-candidates/build3/"
        );
        assert_eq!(
            staging_server_url("stage.example.org"),
            "http://stage.example.org/pub/mozilla.org"
        );
    }

    #[test]
    fn test_linux_tarball() {
        let url = primary_repack_url("firefox", "Firefox", "9.0", &platform("linux64"));
        assert_eq!(url, "linux-x86_64/%locale%/firefox-9.0.tar.bz2");
    }

    #[test]
    fn test_mac_dmg_uses_brand() {
        let url = primary_repack_url("firefox", "Firefox", "9.0", &platform("macosx64"));
        assert_eq!(url, "mac/%locale%/Firefox 9.0.dmg");
    }

    #[test]
    fn test_windows_signed_installer_only() {
        let url = primary_repack_url("firefox", "Firefox", "9.0", &platform("win32"));
        assert_eq!(url, "win32/%locale%/Firefox Setup 9.0.exe");
    }

    #[test]
    fn test_windows_unsigned_with_secondary() {
        let urls = release_repack_urls(
            "firefox",
            "Firefox",
            "9.0",
            &platform("win32"),
            "de",
            RepackOptions::default(),
        );
        assert_eq!(urls.len(), 2);
        assert_eq!(urls["firefox.zip"], "unsigned/win32/de/firefox-9.0.zip");
        assert_eq!(urls["firefox.exe"], "unsigned/win32/de/Firefox Setup 9.0.exe");
    }
}
