//! Asterisk version string parsing.
//!
//! Asterisk's numbering mixes several historical conventions: the 1.x series
//! encodes a second-level "major" in MINOR (1.2.40 belongs to the "2"
//! series), certified releases carry a `-certN` suffix, pre-releases carry
//! `-rcN`/`-alphaN`/`-betaN`, and `git`/`git-*` names an unreleased
//! development snapshot. All of that irregularity is localized here: the
//! parser produces one typed value and the rest of the engine only ever
//! looks at the effective major and the release kind.

use super::error::TemplateError;

/// Effective major assigned to git development builds.
///
/// Policy, not placeholder: an unreleased snapshot always receives the
/// newest-version treatment in range comparisons, so it sorts above every
/// released major.
pub const GIT_EFFECTIVE_MAJOR: u32 = 99;

/// Release channel a version string belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseKind {
    Stable,
    ReleaseCandidate,
    Certified,
    Git,
}

/// A parsed, validated Asterisk version identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionId {
    raw: String,
    effective_major: u32,
    release: ReleaseKind,
}

impl VersionId {
    /// Parse a version string such as `22.5.2`, `23.0.0-rc2`, `13.21-cert6`,
    /// `1.2.40`, or `git`.
    ///
    /// # Errors
    ///
    /// `VersionFormat` when the string does not follow the numbering scheme,
    /// `UnsupportedVersion` when it predates the 1.2 series.
    pub fn parse(version: &str) -> Result<Self, TemplateError> {
        if version == "git" || version.starts_with("git-") {
            return Ok(Self {
                raw: version.to_string(),
                effective_major: GIT_EFFECTIVE_MAJOR,
                release: ReleaseKind::Git,
            });
        }

        let (numeric, release) = split_suffix(version)?;

        let mut parts = numeric.split('.');
        let major = parse_component(parts.next(), version)?;
        let minor = parse_component(parts.next(), version)?;
        for extra in parts {
            // Trailing components (patch, 1.6.2.4-style sub-patch) only need
            // to be numeric.
            parse_component(Some(extra), version)?;
        }

        // The 1.x series carries its real major in MINOR.
        let effective_major = if major == 1 { minor } else { major };

        if effective_major < 2 {
            return Err(TemplateError::UnsupportedVersion {
                version: version.to_string(),
                effective_major,
            });
        }

        Ok(Self {
            raw: version.to_string(),
            effective_major,
            release,
        })
    }

    /// The original version string.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The integer driving every version-range decision.
    pub fn effective_major(&self) -> u32 {
        self.effective_major
    }

    pub fn release(&self) -> ReleaseKind {
        self.release
    }

    pub fn is_git(&self) -> bool {
        self.release == ReleaseKind::Git
    }

    /// The `MAJOR.MINOR` prefix, used for the legacy addons mapping.
    pub fn series(&self) -> String {
        let numeric = self
            .raw
            .split_once('-')
            .map(|(head, _)| head)
            .unwrap_or(&self.raw);
        numeric
            .split('.')
            .take(2)
            .collect::<Vec<_>>()
            .join(".")
    }
}

impl std::fmt::Display for VersionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Split off a known release suffix, returning the numeric head.
fn split_suffix(version: &str) -> Result<(&str, ReleaseKind), TemplateError> {
    let Some((head, suffix)) = version.split_once('-') else {
        return Ok((version, ReleaseKind::Stable));
    };

    if suffix.starts_with("cert") {
        Ok((head, ReleaseKind::Certified))
    } else if suffix.starts_with("rc") || suffix.starts_with("alpha") || suffix.starts_with("beta")
    {
        Ok((head, ReleaseKind::ReleaseCandidate))
    } else {
        Err(TemplateError::VersionFormat {
            version: version.to_string(),
        })
    }
}

fn parse_component(part: Option<&str>, version: &str) -> Result<u32, TemplateError> {
    part.filter(|p| !p.is_empty())
        .and_then(|p| p.parse().ok())
        .ok_or_else(|| TemplateError::VersionFormat {
            version: version.to_string(),
        })
}
