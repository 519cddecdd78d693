//! Variant and distribution resolution.
//!
//! The variant is the structural build-feature category a version belongs
//! to. The mapping is a total function over the supported version range:
//! every parseable, supported version lands in exactly one band, with bands
//! closed at the low end and open at the high end.

use super::error::TemplateError;
use super::store::{LayerKind, TemplateStore};
use super::version::VersionId;

/// First effective major with PJSIP/WebRTC/ARI support.
const MODERN_FLOOR: u32 = 12;
/// First effective major of the pre-PJSIP 1.8-11 band.
const ASTERISK10_FLOOR: u32 = 8;

/// Build-feature category for a version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    /// 1.2.x-1.6.x series, needs the companion addons tarball.
    LegacyAddons,
    /// 1.8-11 series, pre-PJSIP.
    Asterisk10,
    /// 12 and newer, PJSIP/WebRTC/ARI.
    Modern,
}

impl Variant {
    /// The tag used as the variant layer key in the template store.
    pub fn as_str(self) -> &'static str {
        match self {
            Variant::LegacyAddons => "legacy-addons",
            Variant::Asterisk10 => "asterisk10",
            Variant::Modern => "modern",
        }
    }
}

impl std::fmt::Display for Variant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Variant for an already-parsed version. Total over supported versions.
pub fn variant_for(version: &VersionId) -> Variant {
    let major = version.effective_major();
    if major >= MODERN_FLOOR {
        Variant::Modern
    } else if major >= ASTERISK10_FLOOR {
        Variant::Asterisk10
    } else {
        // Parsing already rejected anything below the 1.2 series.
        Variant::LegacyAddons
    }
}

/// Resolve a version string to its variant tag.
///
/// # Errors
///
/// `VersionFormat` or `UnsupportedVersion`, from parsing.
pub fn resolve_variant(version: &str) -> Result<Variant, TemplateError> {
    Ok(variant_for(&VersionId::parse(version)?))
}

/// Resolve an (OS name, distribution name) pair to a distribution layer key.
///
/// Pure syntactic validation plus store lookup: the names are case-folded,
/// joined as `<os>-<dist>` (a name already carrying the OS prefix is used
/// as-is), and checked against the store. There is no normalization beyond
/// case-folding and no fallback: a missing distribution layer is a
/// configuration bug and the error names the offending distribution along
/// with the layers that do exist.
pub fn resolve_distribution(
    store: &dyn TemplateStore,
    os_name: &str,
    dist_name: &str,
) -> Result<String, TemplateError> {
    let os_name = os_name.to_lowercase();
    let dist_name = dist_name.to_lowercase();

    let key = if dist_name.starts_with(&format!("{os_name}-")) {
        dist_name.clone()
    } else {
        format!("{os_name}-{dist_name}")
    };

    if store.contains(LayerKind::Distribution, &key) {
        Ok(key)
    } else {
        Err(TemplateError::DistributionNotFound {
            distribution: dist_name,
            available: store.keys(LayerKind::Distribution),
        })
    }
}
