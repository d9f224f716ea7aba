//! Metadata generation.
//!
//! [`MetadataGenerator`] walks every configured component in turn, resolves
//! the artifacts of each of its releases and assembles a [`MetadataDocument`]:
//!
//! ```json
//! {
//!     "components": {
//!         "as3": {
//!             "endpoints": {"info": {"uri": "/mgmt/shared/appsvcs/info", "methods": ["GET"]}},
//!             "versions": {
//!                 "3.36.1": {
//!                     "downloadUrl": "https://github.com/.../f5-appsvcs-3.36.1-6.noarch.rpm",
//!                     "packageName": "f5-appsvcs-3.36.1-6.noarch",
//!                     "latest": true
//!                 }
//!             },
//!             "componentDependencies": {}
//!         }
//!     }
//! }
//! ```
//!
//! Requests are issued one at a time and any failure aborts the whole run, so
//! the output file is either complete or not written at all.
//!
//! # Examples
//!
//! ```no_run
//! use std::path::Path;
//! use toolchain_metadata::{ComponentConfig, GithubClient, MetadataGenerator, Settings};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::from_env()?;
//!     let config = ComponentConfig::load(Path::new("extension_info.json"))?;
//!     let generator = MetadataGenerator::new(GithubClient::new(&settings)?, config);
//!
//!     let document = generator.generate(true).await?;
//!     println!("{} components", document.components.len());
//!     Ok(())
//! }
//! ```

use crate::artifact::{self, Artifact};
use crate::config::{ComponentConfig, ComponentInfo};
use crate::error::{MetadataError, Result};
use crate::github::{Asset, ReleaseSource};
use crate::settings::OUTPUT_FILE;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// One published version of a component
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionEntry {
    pub download_url: String,
    pub package_name: String,
    pub latest: bool,
}

/// Metadata for one component
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentMetadata {
    pub endpoints: Value,
    pub versions: BTreeMap<String, VersionEntry>,
    pub component_dependencies: Value,
}

/// The generated metadata document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetadataDocument {
    pub components: BTreeMap<String, ComponentMetadata>,
}

impl MetadataDocument {
    /// Pretty-printed JSON with four-space indentation
    pub fn to_pretty_json(&self) -> Result<String> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.serialize(&mut serializer)?;
        // serde_json only ever emits UTF-8
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    /// Write the document to `path`, replacing any existing file
    pub fn write(&self, path: &Path) -> Result<()> {
        let json = self.to_pretty_json()?;
        fs::write(path, json)?;
        Ok(())
    }
}

/// Builds a [`MetadataDocument`] from a [`ReleaseSource`]
pub struct MetadataGenerator<S> {
    source: S,
    config: ComponentConfig,
    output_file: PathBuf,
}

impl<S: ReleaseSource> MetadataGenerator<S> {
    /// Generator writing `metadata.json` in the current working directory
    pub fn new(source: S, config: ComponentConfig) -> Self {
        Self {
            source,
            config,
            output_file: PathBuf::from(OUTPUT_FILE),
        }
    }

    pub fn with_output_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_file = path.into();
        self
    }

    pub fn output_file(&self) -> &Path {
        &self.output_file
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Resolve the artifacts of one release.
    ///
    /// Release assets are searched first. When none qualify, the `dist`
    /// directory of the repository at `tag_name` is searched instead.
    ///
    /// # Errors
    ///
    /// Returns [`MetadataError::EmptyTagName`] for a release without a tag and
    /// [`MetadataError::UnresolvedArtifacts`] if neither location holds a
    /// package.
    pub async fn resolve_artifacts(
        &self,
        repository: &str,
        tag_name: &str,
        assets: &[Asset],
    ) -> Result<Vec<Artifact>> {
        // an empty tag would match every URL and key its artifacts as ""
        if tag_name.is_empty() {
            return Err(MetadataError::EmptyTagName {
                repository: repository.to_string(),
            });
        }

        let mut artifacts = artifact::parse_artifacts(assets, tag_name);

        if artifacts.is_empty() {
            tracing::debug!(
                "No package assets on {} {}, searching dist folder",
                repository,
                tag_name
            );
            let contents = self.source.dist_contents(repository, tag_name).await?;
            artifacts = artifact::parse_artifacts(&contents, tag_name);
        }

        if artifacts.is_empty() {
            return Err(MetadataError::UnresolvedArtifacts {
                repository: repository.to_string(),
                tag: tag_name.to_string(),
            });
        }

        Ok(artifacts)
    }

    /// Map of version key to entry for every release of a component.
    ///
    /// Releases are processed in API order. A later release producing an
    /// existing key replaces the earlier entry.
    pub async fn component_versions(
        &self,
        info: &ComponentInfo,
    ) -> Result<BTreeMap<String, VersionEntry>> {
        let releases = self.source.list_releases(&info.repository).await?;
        let latest_tag_name = self.source.latest_release(&info.repository).await?.tag_name;

        let mut versions = BTreeMap::new();
        for release in &releases {
            tracing::debug!("Resolving {} {}", info.repository, release.tag_name);

            let artifacts = self
                .resolve_artifacts(&info.repository, &release.tag_name, &release.assets)
                .await?;

            for artifact in artifacts {
                let version = artifact.version_key(&release.tag_name)?;
                let entry = VersionEntry {
                    download_url: artifact.download_url,
                    package_name: artifact.package_name,
                    latest: release.tag_name == latest_tag_name,
                };

                if let Some(previous) = versions.insert(version.clone(), entry) {
                    tracing::warn!(
                        "{} version {} listed more than once, replacing {}",
                        info.repository,
                        version,
                        previous.package_name
                    );
                }
            }
        }

        Ok(versions)
    }

    /// Generate metadata for all components, optionally writing it to the
    /// output file. The document is returned either way.
    pub async fn generate(&self, write_file: bool) -> Result<MetadataDocument> {
        let mut document = MetadataDocument::default();

        for (name, info) in self.config.iter() {
            tracing::info!("Generating metadata for {} ({})", name, info.repository);
            let versions = self.component_versions(info).await?;

            document.components.insert(
                name.clone(),
                ComponentMetadata {
                    endpoints: info.endpoints.clone(),
                    versions,
                    component_dependencies: info.component_dependencies.clone(),
                },
            );
        }

        if write_file {
            tracing::info!("Writing metadata file to {}", self.output_file.display());
            document.write(&self.output_file)?;
        }

        Ok(document)
    }
}
