//! Dependency manifests: which prebuilt archive to fetch and its checksum.
//!
//! A manifest is a TOML file with one `[[dependency]]` table per release.
//! Each table has exactly four keys:
//!
//! ```toml
//! [[dependency]]
//! name = "openssl"
//! version = "1.1.112"
//! source_url = "https://github.com/keeshux/openssl-apple/releases/download/1.1.112/openssl.xcframework.zip"
//! checksum = "9980b23b7f84841dd3f3fa8e9b4773b133cccff680d2ce466f2f61ba159ddeee"
//! ```
//!
//! `checksum` is the SHA-256 of the archive, hex, either case.

mod error;
mod file_name;

pub use error::ManifestError;
pub use file_name::{file_name_from_url, sanitize_file_name};

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// URL schemes the fetcher knows how to download.
pub const SUPPORTED_SCHEMES: [&str; 3] = ["http", "https", "file"];

/// One release of a vendored binary: where to get it and what it must hash to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DependencySpec {
    pub name: String,
    pub version: String,
    pub source_url: String,
    /// SHA-256 of the archive, hex.
    #[serde(rename = "checksum")]
    pub expected_checksum: String,
}

impl DependencySpec {
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        source_url: impl Into<String>,
        expected_checksum: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            source_url: source_url.into(),
            expected_checksum: expected_checksum.into(),
        }
    }

    /// Checks that all fields are present, the URL parses with a supported
    /// scheme, and the checksum is a 64-character hex string.
    pub fn validate(&self) -> Result<(), ManifestError> {
        for (field, value) in [
            ("name", &self.name),
            ("version", &self.version),
            ("source_url", &self.source_url),
            ("checksum", &self.expected_checksum),
        ] {
            if value.trim().is_empty() {
                return Err(ManifestError::EmptyField {
                    name: self.name.clone(),
                    field,
                });
            }
        }

        let url = url::Url::parse(self.source_url.trim()).map_err(|source| {
            ManifestError::InvalidUrl {
                name: self.name.clone(),
                url: self.source_url.clone(),
                source,
            }
        })?;
        if !SUPPORTED_SCHEMES.contains(&url.scheme()) {
            return Err(ManifestError::UnsupportedScheme {
                name: self.name.clone(),
                scheme: url.scheme().to_string(),
            });
        }

        normalize_checksum(&self.expected_checksum).ok_or_else(|| {
            ManifestError::InvalidChecksum {
                name: self.name.clone(),
                checksum: self.expected_checksum.clone(),
            }
        })?;
        Ok(())
    }

    /// File name to store the archive under when the caller gives only a
    /// directory: the URL's last path segment, else `<name>-<version>.bin`.
    pub fn archive_file_name(&self) -> String {
        let from_url = file_name_from_url(self.source_url.trim())
            .map(|s| sanitize_file_name(&s))
            .filter(|s| !s.is_empty());
        match from_url {
            Some(name) => name,
            None => {
                let fallback = sanitize_file_name(&format!("{}-{}.bin", self.name, self.version));
                if fallback.is_empty() {
                    "dependency.bin".to_string()
                } else {
                    fallback
                }
            }
        }
    }
}

/// Trimmed, lowercased SHA-256 hex digest, or `None` if `checksum` is not
/// exactly 64 hex characters.
pub fn normalize_checksum(checksum: &str) -> Option<String> {
    let c = checksum.trim();
    if c.len() == 64 && c.bytes().all(|b| b.is_ascii_hexdigit()) {
        Some(c.to_ascii_lowercase())
    } else {
        None
    }
}

/// All releases declared in a manifest file, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    #[serde(default, rename = "dependency")]
    pub dependencies: Vec<DependencySpec>,
}

impl FromStr for Manifest {
    type Err = ManifestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(toml::from_str(s)?)
    }
}

impl Manifest {
    /// Read and parse a manifest file. Entries are not validated; call
    /// [`Manifest::validate`] or validate the spec you pick.
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let data = fs::read_to_string(path).map_err(|source| ManifestError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        data.parse()
    }

    /// Validate every entry, stopping at the first invalid one.
    pub fn validate(&self) -> Result<(), ManifestError> {
        self.dependencies.iter().try_for_each(DependencySpec::validate)
    }

    /// Entry for `name` at `version`. Without a version, the last release of
    /// `name` in file order wins (manifests list releases oldest first).
    pub fn find(&self, name: &str, version: Option<&str>) -> Result<&DependencySpec, ManifestError> {
        self.dependencies
            .iter()
            .rev()
            .find(|d| d.name == name && version.map_or(true, |v| d.version == v))
            .ok_or_else(|| ManifestError::NotFound {
                name: name.to_string(),
                version: version.map(str::to_string),
            })
    }
}
