//! Update-verify harness config format.
//!
//! One line per matrix entry, each a run of `key="value"` pairs:
//!
//! ```text
//! release="9.0" product="Firefox" platform="WINNT_x86-msvc" build_id="2011" locales="de fr" channel="betatest" patch_types="complete partial" from="/firefox/releases/9.0/win32/%locale%/Firefox Setup 9.0.exe" aus_server="https://aus" ftp_server_from="http://stage" ftp_server_to="http://stage" to="/firefox/candidates/..."
//! release="8.0" product="Firefox" platform="WINNT_x86-msvc" build_id="2011" locales="ja" channel="betatest"
//! ```
//!
//! `product`, `platform` and `channel` repeat on every line; `aus_server` and
//! `to` only appear on the first. Quick-check lines carry no `from`,
//! `patch_types` or server keys.

use crate::models::{FullCheckEntry, PatchType, QuickCheckEntry, VerifyEntry, VerifyMatrix};
use regex::Regex;
use std::io::{self, Write};
use std::sync::LazyLock;
use thiserror::Error;

/// Order keys are written in.
pub const KEY_WRITE_ORDER: [&str; 12] = [
    "release",
    "product",
    "platform",
    "build_id",
    "locales",
    "channel",
    "patch_types",
    "from",
    "aus_server",
    "ftp_server_from",
    "ftp_server_to",
    "to",
];

const FIRST_LINE_ONLY_KEYS: [&str; 2] = ["aus_server", "to"];

static PAIR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"([a-z_]+)="([^"]*)""#).expect("Invalid key/value regex"));

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HarnessFormatError {
    #[error("Line {line}: malformed text {text:?}")]
    Malformed { line: usize, text: String },

    #[error("Line {line}: unknown key {key}")]
    UnknownKey { line: usize, key: String },

    #[error("Line {line}: missing key {key}")]
    MissingKey { line: usize, key: &'static str },

    #[error("Line {line}: unknown patch type {value}")]
    UnknownPatchType { line: usize, value: String },

    #[error("No entries found")]
    Empty,
}

/// Render a matrix as harness config text
pub fn render(matrix: &VerifyMatrix) -> String {
    let mut out = Vec::new();
    // Writing into a Vec cannot fail
    let _ = write_matrix(matrix, &mut out);
    String::from_utf8_lossy(&out).into_owned()
}

/// Write a matrix in harness config format.
///
/// The header keys ride on the entry lines, so a matrix without entries
/// produces no output and does not [`parse`] back.
pub fn write_matrix<W: Write>(matrix: &VerifyMatrix, mut writer: W) -> io::Result<()> {
    for (index, entry) in matrix.entries.iter().enumerate() {
        let first = index == 0;
        let pairs: Vec<String> = KEY_WRITE_ORDER
            .iter()
            .filter(|key| first || !FIRST_LINE_ONLY_KEYS.contains(*key))
            .filter_map(|key| value_for(matrix, entry, key).map(|v| format!("{}=\"{}\"", key, v)))
            .collect();
        writeln!(writer, "{}", pairs.join(" "))?;
    }
    writer.flush()
}

fn value_for(matrix: &VerifyMatrix, entry: &VerifyEntry, key: &str) -> Option<String> {
    let header = match key {
        "product" => Some(matrix.product.clone()),
        "platform" => Some(matrix.platform.clone()),
        "channel" => Some(matrix.channel.clone()),
        "aus_server" => Some(matrix.aus_server.clone()),
        "to" => Some(matrix.to_path.clone()),
        _ => None,
    };
    if header.is_some() {
        return header;
    }

    match (key, entry) {
        ("release", _) => Some(entry.release().to_string()),
        ("build_id", _) => Some(entry.build_id().to_string()),
        ("locales", _) => Some(entry.locales().join(" ")),
        ("patch_types", VerifyEntry::Full(full)) => Some(
            full.patch_types
                .iter()
                .map(PatchType::as_str)
                .collect::<Vec<_>>()
                .join(" "),
        ),
        ("from", VerifyEntry::Full(full)) => Some(full.from_path.clone()),
        ("ftp_server_from", VerifyEntry::Full(full)) => Some(full.ftp_server_from.clone()),
        ("ftp_server_to", VerifyEntry::Full(full)) => Some(full.ftp_server_to.clone()),
        _ => None,
    }
}

/// Parse harness config text back into a matrix.
///
/// Blank lines and lines starting with `#` are ignored.
pub fn parse(text: &str) -> Result<VerifyMatrix, HarnessFormatError> {
    let mut header: Option<VerifyMatrix> = None;
    let mut entries = Vec::new();

    for (index, raw_line) in text.lines().enumerate() {
        let line_no = index + 1;
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let pairs = parse_pairs(line, line_no)?;

        if header.is_none() {
            header = Some(VerifyMatrix::new(
                require(&pairs, "product", line_no)?,
                require(&pairs, "platform", line_no)?,
                require(&pairs, "channel", line_no)?,
                require(&pairs, "aus_server", line_no)?,
                require(&pairs, "to", line_no)?,
            ));
        }

        let release = require(&pairs, "release", line_no)?.to_string();
        let build_id = require(&pairs, "build_id", line_no)?.to_string();
        let locales: Vec<String> = require(&pairs, "locales", line_no)?
            .split_whitespace()
            .map(str::to_string)
            .collect();

        let entry = match lookup(&pairs, "from") {
            Some(from_path) => {
                let patch_types = match lookup(&pairs, "patch_types") {
                    Some(value) => value
                        .split_whitespace()
                        .map(|p| {
                            PatchType::parse(p).ok_or_else(|| HarnessFormatError::UnknownPatchType {
                                line: line_no,
                                value: p.to_string(),
                            })
                        })
                        .collect::<Result<Vec<_>, _>>()?,
                    None => vec![PatchType::Complete],
                };
                VerifyEntry::Full(FullCheckEntry {
                    release,
                    build_id,
                    locales,
                    patch_types,
                    from_path: from_path.to_string(),
                    ftp_server_from: require(&pairs, "ftp_server_from", line_no)?.to_string(),
                    ftp_server_to: require(&pairs, "ftp_server_to", line_no)?.to_string(),
                })
            }
            None => VerifyEntry::Quick(QuickCheckEntry {
                release,
                build_id,
                locales,
            }),
        };
        entries.push(entry);
    }

    let mut matrix = header.ok_or(HarnessFormatError::Empty)?;
    matrix.entries = entries;
    Ok(matrix)
}

fn lookup<'a>(pairs: &[(&'a str, &'a str)], key: &str) -> Option<&'a str> {
    pairs.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}

fn require<'a>(
    pairs: &[(&'a str, &'a str)],
    key: &'static str,
    line: usize,
) -> Result<&'a str, HarnessFormatError> {
    lookup(pairs, key).ok_or(HarnessFormatError::MissingKey { line, key })
}

fn parse_pairs(line: &str, line_no: usize) -> Result<Vec<(&str, &str)>, HarnessFormatError> {
    let mut pairs = Vec::new();
    let mut last_end = 0;

    for caps in PAIR_PATTERN.captures_iter(line) {
        let (Some(whole), Some(key), Some(value)) = (caps.get(0), caps.get(1), caps.get(2)) else {
            continue;
        };
        let gap = &line[last_end..whole.start()];
        if !gap.trim().is_empty() {
            return Err(HarnessFormatError::Malformed {
                line: line_no,
                text: gap.trim().to_string(),
            });
        }
        if !KEY_WRITE_ORDER.contains(&key.as_str()) {
            return Err(HarnessFormatError::UnknownKey {
                line: line_no,
                key: key.as_str().to_string(),
            });
        }
        pairs.push((key.as_str(), value.as_str()));
        last_end = whole.end();
    }

    let rest = line[last_end..].trim();
    if !rest.is_empty() {
        return Err(HarnessFormatError::Malformed {
            line: line_no,
            text: rest.to_string(),
        });
    }

    Ok(pairs)
}
