//! GitHub Releases API client.
//!
//! The generator only needs three read-only endpoints, exposed through the
//! [`ReleaseSource`] trait so resolution logic can run against an in-memory
//! source in tests:
//!
//! - `GET /repos/{repo}/releases`
//! - `GET /repos/{repo}/releases/latest`
//! - `GET /repos/{repo}/contents/dist?ref={tag}`

use crate::error::Result;
use crate::http::{ApiRequest, HttpClient};
use crate::settings::Settings;
use serde::Deserialize;

/// Directory searched when a release carries no package assets
pub const DIST_DIR: &str = "dist";

/// A GitHub release.
#[derive(Debug, Clone, Deserialize)]
pub struct Release {
    /// Tag name (e.g. `"v1.2.0"`).
    pub tag_name: String,
    /// Attached assets.
    #[serde(default)]
    pub assets: Vec<Asset>,
}

/// A release asset or a repository content entry.
///
/// Release assets carry `browser_download_url`; content entries carry
/// `download_url` (null for directories).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Asset {
    pub name: String,
    #[serde(default)]
    pub download_url: Option<String>,
    #[serde(default)]
    pub browser_download_url: Option<String>,
}

impl Asset {
    /// Asset with only a release download URL set
    pub fn release(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            download_url: None,
            browser_download_url: Some(url.into()),
        }
    }

    /// Content entry with only a raw download URL set
    pub fn content(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            download_url: Some(url.into()),
            browser_download_url: None,
        }
    }

    /// Preferred download URL, or an empty string when neither field is set
    pub fn download_url(&self) -> &str {
        self.download_url
            .as_deref()
            .or(self.browser_download_url.as_deref())
            .unwrap_or_default()
    }
}

/// Read access to a repository's releases
#[allow(async_fn_in_trait)]
pub trait ReleaseSource {
    /// All releases, in the order the API returns them
    async fn list_releases(&self, repository: &str) -> Result<Vec<Release>>;

    /// The release GitHub marks as latest
    async fn latest_release(&self, repository: &str) -> Result<Release>;

    /// Entries of the `dist` directory at `tag`
    async fn dist_contents(&self, repository: &str, tag: &str) -> Result<Vec<Asset>>;
}

/// [`ReleaseSource`] backed by the GitHub REST API
#[derive(Clone)]
pub struct GithubClient {
    http: HttpClient,
}

impl GithubClient {
    pub fn new(settings: &Settings) -> Result<Self> {
        Ok(Self {
            http: HttpClient::new(settings)?,
        })
    }
}

impl ReleaseSource for GithubClient {
    async fn list_releases(&self, repository: &str) -> Result<Vec<Release>> {
        let request = ApiRequest::get(format!("/repos/{}/releases", repository));
        self.http.get_json(&request, "a release list").await
    }

    async fn latest_release(&self, repository: &str) -> Result<Release> {
        let request = ApiRequest::get(format!("/repos/{}/releases/latest", repository));
        self.http.get_json(&request, "a release").await
    }

    async fn dist_contents(&self, repository: &str, tag: &str) -> Result<Vec<Asset>> {
        let request = ApiRequest::get(format!("/repos/{}/contents/{}", repository, DIST_DIR))
            .query("ref", tag);
        self.http.get_json(&request, "a directory listing").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_download_url_prefers_content_url() {
        let asset = Asset {
            name: "pkg.rpm".to_string(),
            download_url: Some("https://raw/pkg.rpm".to_string()),
            browser_download_url: Some("https://release/pkg.rpm".to_string()),
        };
        assert_eq!(asset.download_url(), "https://raw/pkg.rpm");
    }

    #[test]
    fn test_download_url_falls_back() {
        let asset = Asset::release("pkg.rpm", "https://release/pkg.rpm");
        assert_eq!(asset.download_url(), "https://release/pkg.rpm");

        let bare = Asset {
            name: "pkg.rpm".to_string(),
            ..Default::default()
        };
        assert_eq!(bare.download_url(), "");
    }

    #[test]
    fn test_deserialize_release() {
        let json = r#"{
            "tag_name": "v1.2.0",
            "draft": false,
            "assets": [
                {"name": "pkg-1.2.0-1.noarch.rpm", "browser_download_url": "https://example/pkg-1.2.0-1.noarch.rpm"}
            ]
        }"#;
        let release: Release = serde_json::from_str(json).unwrap();
        assert_eq!(release.tag_name, "v1.2.0");
        assert_eq!(release.assets.len(), 1);
        assert!(release.assets[0].download_url.is_none());
    }

    #[test]
    fn test_deserialize_directory_entry_with_null_url() {
        let json = r#"[{"name": "nested", "type": "dir", "download_url": null}]"#;
        let entries: Vec<Asset> = serde_json::from_str(json).unwrap();
        assert_eq!(entries[0].download_url(), "");
    }
}
