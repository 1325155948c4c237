//! Build platform name mapping.
//!
//! Build jobs name platforms one way (`macosx64`), the FTP tree another
//! (`mac`) and the update server a third (`Darwin_x86_64-gcc3`). The FTP name
//! keys build ids and locale exceptions in the patcher config; the update name
//! goes into the matrix header.

use crate::services::resolver::ConfigurationError;

/// A build platform with its FTP and update-server names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Platform {
    pub build: &'static str,
    pub ftp: &'static str,
    /// Every update platform alias, oldest first.
    pub update_aliases: &'static [&'static str],
}

const PLATFORMS: &[Platform] = &[
    Platform {
        build: "linux",
        ftp: "linux-i686",
        update_aliases: &["Linux_x86-gcc3"],
    },
    Platform {
        build: "linux64",
        ftp: "linux-x86_64",
        update_aliases: &["Linux_x86_64-gcc3"],
    },
    Platform {
        build: "macosx64",
        ftp: "mac",
        update_aliases: &[
            "Darwin_x86_64-gcc3-u-i386-x86_64",
            "Darwin_x86-gcc3-u-i386-x86_64",
            "Darwin_x86-gcc3",
            "Darwin_x86_64-gcc3",
        ],
    },
    Platform {
        build: "win32",
        ftp: "win32",
        update_aliases: &["WINNT_x86-msvc"],
    },
    Platform {
        build: "win64",
        ftp: "win64",
        update_aliases: &["WINNT_x86_64-msvc"],
    },
];

impl Platform {
    /// Look up a build platform by name
    pub fn from_build_name(name: &str) -> Result<Self, ConfigurationError> {
        PLATFORMS
            .iter()
            .find(|p| p.build == name)
            .copied()
            .ok_or_else(|| ConfigurationError::UnknownPlatform(name.to_string()))
    }

    /// Update platform written to the matrix header (the newest alias).
    pub fn update_platform(&self) -> &'static str {
        self.update_aliases.last().copied().unwrap_or(self.build)
    }

    pub fn is_linux(&self) -> bool {
        self.build.starts_with("linux")
    }

    pub fn is_mac(&self) -> bool {
        self.build.starts_with("macosx")
    }

    pub fn is_windows(&self) -> bool {
        self.build.starts_with("win")
    }

    /// All known build platform names
    pub fn known_build_names() -> impl Iterator<Item = &'static str> {
        PLATFORMS.iter().map(|p| p.build)
    }
}
