use std::path::PathBuf;
use thiserror::Error;

use crate::http::ResponseBody;

#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("Bad request for URL: {url} code: {status} reason: {reason} body: {body}")]
    Request {
        url: String,
        status: u16,
        reason: String,
        body: ResponseBody,
    },

    #[error("Failed to load component config {}: {source}", .path.display())]
    ConfigLoad {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Environment variable {var} is not set")]
    MissingToken { var: &'static str },

    #[error("Unable to resolve artifacts info for {repository} at {tag}")]
    UnresolvedArtifacts { repository: String, tag: String },

    #[error("Release of {repository} has an empty tag name")]
    EmptyTagName { repository: String },

    #[error("No version number found in package name: {package_name}")]
    VersionNotFound { package_name: String },

    #[error("Expected {expected} from {url}, got a non-JSON or empty body")]
    UnexpectedBody { url: String, expected: &'static str },

    #[error("Invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),

    #[error("HTTP transport failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, MetadataError>;
