//! Errors from loading or validating a dependency manifest.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("failed to read manifest {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid manifest")]
    Parse(#[from] toml::de::Error),

    #[error("dependency `{name}`: field `{field}` is empty")]
    EmptyField { name: String, field: &'static str },

    #[error("dependency `{name}`: invalid source URL `{url}`")]
    InvalidUrl {
        name: String,
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("dependency `{name}`: unsupported URL scheme `{scheme}` (expected http, https or file)")]
    UnsupportedScheme { name: String, scheme: String },

    #[error("dependency `{name}`: checksum must be 64 hex characters (SHA-256), got {checksum:?}")]
    InvalidChecksum { name: String, checksum: String },

    #[error("no dependency named `{name}` ({})", .version.as_deref().unwrap_or("any version"))]
    NotFound {
        name: String,
        version: Option<String>,
    },
}
