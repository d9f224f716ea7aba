//! Library interface for the runtime-init metadata generator
//!
//! Exposes the generator and its building blocks so the resolution logic can
//! be driven from tests with an in-memory [`ReleaseSource`].

pub mod artifact;
pub mod colors;
pub mod config;
pub mod error;
pub mod github;
pub mod http;
pub mod metadata;
pub mod settings;

// Re-export commonly used types
pub use config::ComponentConfig;
pub use error::{MetadataError, Result};
pub use github::{Asset, GithubClient, Release, ReleaseSource};
pub use metadata::{MetadataDocument, MetadataGenerator, VersionEntry};
pub use settings::Settings;
