use std::fmt;

/// Kind of update package a harness run applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatchType {
    Complete,
    Partial,
}

impl PatchType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PatchType::Complete => "complete",
            PatchType::Partial => "partial",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "complete" => Some(PatchType::Complete),
            "partial" => Some(PatchType::Partial),
            _ => None,
        }
    }
}

impl fmt::Display for PatchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Locales that are downloaded and diffed against the target build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FullCheckEntry {
    pub release: String,
    pub build_id: String,
    pub locales: Vec<String>,
    pub patch_types: Vec<PatchType>,
    /// Source artifact path with a `%locale%` placeholder.
    pub from_path: String,
    pub ftp_server_from: String,
    pub ftp_server_to: String,
}

/// Locales recorded as present without downloading anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuickCheckEntry {
    pub release: String,
    pub build_id: String,
    pub locales: Vec<String>,
}

/// One line of the verification matrix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerifyEntry {
    Full(FullCheckEntry),
    Quick(QuickCheckEntry),
}

impl VerifyEntry {
    pub fn release(&self) -> &str {
        match self {
            VerifyEntry::Full(entry) => &entry.release,
            VerifyEntry::Quick(entry) => &entry.release,
        }
    }

    pub fn build_id(&self) -> &str {
        match self {
            VerifyEntry::Full(entry) => &entry.build_id,
            VerifyEntry::Quick(entry) => &entry.build_id,
        }
    }

    pub fn locales(&self) -> &[String] {
        match self {
            VerifyEntry::Full(entry) => &entry.locales,
            VerifyEntry::Quick(entry) => &entry.locales,
        }
    }

    pub fn is_quick_check(&self) -> bool {
        matches!(self, VerifyEntry::Quick(_))
    }
}

/// Ordered verification entries plus the header shared by all of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyMatrix {
    /// Application name as the update server knows it.
    pub product: String,
    /// Update platform.
    pub platform: String,
    pub channel: String,
    pub aus_server: String,
    /// Target artifact path with a `%locale%` placeholder.
    pub to_path: String,
    pub entries: Vec<VerifyEntry>,
}

impl VerifyMatrix {
    pub fn new(
        product: impl Into<String>,
        platform: impl Into<String>,
        channel: impl Into<String>,
        aus_server: impl Into<String>,
        to_path: impl Into<String>,
    ) -> Self {
        Self {
            product: product.into(),
            platform: platform.into(),
            channel: channel.into(),
            aus_server: aus_server.into(),
            to_path: to_path.into(),
            entries: Vec::new(),
        }
    }

    /// Distinct releases in the order they appear.
    pub fn releases(&self) -> Vec<&str> {
        let mut releases: Vec<&str> = Vec::new();
        for entry in &self.entries {
            if releases.last() != Some(&entry.release()) {
                releases.push(entry.release());
            }
        }
        releases
    }

    /// Entries belonging to a single release
    pub fn entries_for<'a>(&'a self, release: &'a str) -> impl Iterator<Item = &'a VerifyEntry> {
        self.entries.iter().filter(move |e| e.release() == release)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
