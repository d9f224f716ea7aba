//! Artifact resolution helpers.
//!
//! Pure functions turning release tags and asset listings into
//! [`Artifact`]s and version keys. No I/O happens here; the fallback to the
//! repository's `dist` directory is driven by [`crate::metadata`].

use crate::error::{MetadataError, Result};
use crate::github::Asset;
use regex::Regex;
use std::sync::LazyLock;

/// Marks a package archive
pub const PACKAGE_SUFFIX: &str = ".rpm";

/// Marks a checksum file (`.sha256`, `.sha512`, ...)
pub const CHECKSUM_MARKER: &str = ".sha";

static VERSION_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]+\.[0-9]+\.[0-9]+").expect("version regex is valid"));

/// A downloadable package resolved from a release
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub download_url: String,
    pub package_name: String,
    /// The release tag appears in the URL's leading segment
    pub is_primary: bool,
}

impl Artifact {
    /// Version key for this artifact.
    ///
    /// Primary artifacts use the normalized release tag; others carry their own
    /// version inside the package name.
    pub fn version_key(&self, tag_name: &str) -> Result<String> {
        if self.is_primary {
            Ok(normalize_tag_name(tag_name).to_string())
        } else {
            version_from_package_name(&self.package_name)
        }
    }
}

/// Strip a leading `v` from a tag: `v1.2.3` → `1.2.3`
pub fn normalize_tag_name(tag: &str) -> &str {
    tag.strip_prefix('v').unwrap_or(tag)
}

/// Whether an asset name looks like a package archive (and not its checksum)
pub fn is_package_asset(name: &str) -> bool {
    name.contains(PACKAGE_SUFFIX) && !name.contains(CHECKSUM_MARKER)
}

/// Whether the normalized tag appears in the URL's first `/`-separated segment
pub fn is_primary(url: &str, tag_name: &str) -> bool {
    let leading = url.split('/').next().unwrap_or_default();
    leading.contains(normalize_tag_name(tag_name))
}

/// Final path segment of `url`, cut at the package suffix
pub fn package_name(url: &str) -> String {
    let file_name = url.rsplit('/').next().unwrap_or_default();
    file_name
        .split(PACKAGE_SUFFIX)
        .next()
        .unwrap_or_default()
        .to_string()
}

/// First `X.Y.Z` sequence in a package name
pub fn version_from_package_name(package_name: &str) -> Result<String> {
    VERSION_REGEX
        .find(package_name)
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| MetadataError::VersionNotFound {
            package_name: package_name.to_string(),
        })
}

/// Select package assets and resolve each to an [`Artifact`].
///
/// Some releases ship several packages (e.g. one per supported platform
/// version); each becomes its own artifact.
pub fn parse_artifacts(assets: &[Asset], tag_name: &str) -> Vec<Artifact> {
    assets
        .iter()
        .filter(|asset| is_package_asset(&asset.name))
        .map(|asset| {
            let url = asset.download_url();
            Artifact {
                download_url: url.to_string(),
                package_name: package_name(url),
                is_primary: is_primary(url, tag_name),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_tag_name() {
        assert_eq!(normalize_tag_name("v1.2.3"), "1.2.3");
        assert_eq!(normalize_tag_name("1.2.3"), "1.2.3");
        // only the first character is stripped
        assert_eq!(normalize_tag_name("vv1.0.0"), "v1.0.0");
        assert_eq!(normalize_tag_name(""), "");
    }

    #[test]
    fn test_is_package_asset() {
        assert!(is_package_asset("pkg-1.2.3.rpm"));
        assert!(!is_package_asset("pkg-1.2.3.rpm.sha256"));
        assert!(!is_package_asset("readme.txt"));
    }

    #[test]
    fn test_parse_artifacts_filters_assets() {
        let assets = vec![
            Asset::release("pkg-1.2.3.rpm", "https://example.com/dl/pkg-1.2.3.rpm"),
            Asset::release("pkg-1.2.3.rpm.sha256", "https://example.com/dl/pkg-1.2.3.rpm.sha256"),
            Asset::release("readme.txt", "https://example.com/dl/readme.txt"),
        ];

        let artifacts = parse_artifacts(&assets, "v1.2.3");
        assert_eq!(artifacts.len(), 1);
        assert_eq!(artifacts[0].download_url, "https://example.com/dl/pkg-1.2.3.rpm");
        assert_eq!(artifacts[0].package_name, "pkg-1.2.3");
    }

    #[test]
    fn test_is_primary() {
        assert!(is_primary("1.2.3/pkg-1.2.3-1.noarch.rpm", "1.2.3"));
        assert!(is_primary("1.2.3/pkg-1.2.3-1.noarch.rpm", "v1.2.3"));
        assert!(!is_primary("1.2.2/pkg-1.2.3-1.noarch.rpm", "1.2.3"));
        // absolute URLs lead with the scheme
        assert!(!is_primary("https://github.com/o/r/releases/download/v1.2.3/pkg-1.2.3.rpm", "v1.2.3"));
    }

    #[test]
    fn test_package_name() {
        assert_eq!(
            package_name("https://example.com/a/b/component-2.0.1-1.noarch.rpm"),
            "component-2.0.1-1.noarch"
        );
        assert_eq!(package_name("pkg.rpm"), "pkg");
        assert_eq!(package_name(""), "");
    }

    #[test]
    fn test_version_from_package_name() {
        assert_eq!(
            version_from_package_name("component-2.0.1-1.noarch").unwrap(),
            "2.0.1"
        );
        assert_eq!(
            version_from_package_name("f5-appsvcs-3.36.1-6.noarch").unwrap(),
            "3.36.1"
        );
    }

    #[test]
    fn test_version_from_package_name_missing() {
        let err = version_from_package_name("component-latest").unwrap_err();
        assert!(matches!(err, MetadataError::VersionNotFound { .. }));
        assert!(version_from_package_name("component-1.2").is_err());
    }

    #[test]
    fn test_version_key() {
        let primary = Artifact {
            download_url: "1.4.0/pkg-9.9.9.rpm".to_string(),
            package_name: "pkg-9.9.9".to_string(),
            is_primary: true,
        };
        assert_eq!(primary.version_key("v1.4.0").unwrap(), "1.4.0");

        let secondary = Artifact {
            is_primary: false,
            ..primary
        };
        assert_eq!(secondary.version_key("v1.4.0").unwrap(), "9.9.9");
    }
}
