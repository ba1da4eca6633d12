use regex::Regex;

use crate::error::{Error, Result};
use crate::models::{UpdateType, VersionChange};

/// Recovers the dependency name from a pull request title.
///
/// `Ok(None)` means the title is not a dependency bump at all and the pull
/// request should be skipped. A title that claims to be a bump but yields no
/// name is an error.
pub trait TitleParser: Send + Sync {
    fn extract_library(&self, title: &str) -> Result<Option<String>>;

    /// The `from` and `to` versions, when the title names both.
    fn extract_versions(&self, title: &str) -> Option<VersionChange>;
}

/// Grammar: `"bump" <ws> <name> <terminator>`, case-insensitive, where the
/// name is made of ASCII letters, digits, `-`, `_`, `@` and `/`, and the
/// terminator is one of `,`, ` from` or ` and`.
pub struct DependabotTitleParser {
    pattern: Regex,
    versions: Regex,
}

const BUMP_PATTERN: &str = r"(?i)bump ([-a-zA-Z0-9_@/]*)(,| from| and)";
const VERSIONS_PATTERN: &str = r"[Bb]ump .+ from ([^ ]+) to ([^ ]+)";

impl DependabotTitleParser {
    pub fn new() -> Result<Self> {
        Ok(Self {
            pattern: Regex::new(BUMP_PATTERN)?,
            versions: Regex::new(VERSIONS_PATTERN)?,
        })
    }
}

/// Major when the first component grew, minor when the second did, patch
/// otherwise. Unknown when either of those components is not a number.
pub fn determine_update_type(old_version: &str, new_version: &str) -> UpdateType {
    fn component(version: &str, index: usize) -> Option<u64> {
        version.split('.').nth(index).and_then(|part| part.parse().ok())
    }

    let (Some(old_major), Some(new_major)) = (component(old_version, 0), component(new_version, 0))
    else {
        return UpdateType::Unknown;
    };
    if new_major > old_major {
        return UpdateType::Major;
    }

    match (component(old_version, 1), component(new_version, 1)) {
        (Some(old_minor), Some(new_minor)) if new_minor > old_minor => UpdateType::Minor,
        (Some(_), Some(_)) => UpdateType::Patch,
        _ => UpdateType::Unknown,
    }
}

impl TitleParser for DependabotTitleParser {
    fn extract_library(&self, title: &str) -> Result<Option<String>> {
        // Titles edited by people no longer mention the bump.
        if !(title.contains("Bump") || title.contains("bump")) {
            return Ok(None);
        }

        match self
            .pattern
            .captures(title)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
        {
            Some(name) if !name.is_empty() => Ok(Some(name.to_string())),
            _ => Err(Error::UnparsableTitle(title.to_string())),
        }
    }

    fn extract_versions(&self, title: &str) -> Option<VersionChange> {
        let caps = self.versions.captures(title)?;
        Some(VersionChange {
            old_version: caps.get(1)?.as_str().to_string(),
            new_version: caps.get(2)?.as_str().to_string(),
        })
    }
}
