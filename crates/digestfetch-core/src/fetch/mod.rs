//! Checksum-verified fetch of a single dependency archive.
//!
//! [`Fetcher::fetch`] downloads `spec.source_url` into `<target>.part`,
//! hashes the bytes with SHA-256 while writing, and only renames the file onto
//! `target` when the digest equals `spec.expected_checksum`. Every call is a
//! fresh acquisition: nothing is cached and a stale file at `target` is
//! removed first, so after any failure `target` does not exist.
//!
//! The fetch never retries; see [`crate::retry`] for a caller-side policy.

mod classify;
mod error;
mod transfer;

pub use classify::{classify_curl_error, classify_http_status};
pub use error::{FetchError, TransportError, TransportErrorKind};

use crate::config::Config;
use crate::control::CancelToken;
use crate::digest::Sha256Stream;
use crate::manifest::DependencySpec;
use crate::storage::{self, StagingFile};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Result of a fetch: the verified archive path, or why there is none.
pub type FetchOutcome = Result<PathBuf, FetchError>;

/// What to do with downloaded bytes whose checksum does not match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MismatchPolicy {
    /// Remove the bytes.
    #[default]
    Delete,
    /// Move them to `<target>.quarantine` for inspection.
    Quarantine,
}

/// Transfer limits and failure handling for a [`Fetcher`].
#[derive(Debug, Clone)]
pub struct FetchOptions {
    pub connect_timeout: Duration,
    /// Upper bound for the whole transfer.
    pub transfer_timeout: Duration,
    /// Abort if fewer than `low_speed_limit` bytes/s arrive for `low_speed_time`.
    pub low_speed_limit: u32,
    pub low_speed_time: Duration,
    pub on_mismatch: MismatchPolicy,
    pub cancel: Option<CancelToken>,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for FetchOptions {
    fn from(cfg: &Config) -> Self {
        Self {
            connect_timeout: Duration::from_secs(cfg.connect_timeout_secs),
            transfer_timeout: Duration::from_secs(cfg.transfer_timeout_secs),
            low_speed_limit: cfg.low_speed_limit_bytes,
            low_speed_time: Duration::from_secs(cfg.low_speed_time_secs),
            on_mismatch: cfg.on_mismatch,
            cancel: None,
        }
    }
}

/// Fetch with default options. See [`Fetcher::fetch`].
pub fn fetch(spec: &DependencySpec, local_target: &Path) -> FetchOutcome {
    Fetcher::default().fetch(spec, local_target)
}

/// Verified downloader. Holds no state between calls; concurrent fetches
/// are independent as long as their targets differ.
#[derive(Debug, Clone, Default)]
pub struct Fetcher {
    options: FetchOptions,
}

impl Fetcher {
    pub fn new(options: FetchOptions) -> Self {
        Self { options }
    }

    /// Attach a cancel token checked throughout the transfer.
    pub fn with_cancel(mut self, token: CancelToken) -> Self {
        self.options.cancel = Some(token);
        self
    }

    pub fn options(&self) -> &FetchOptions {
        &self.options
    }

    fn is_cancelled(&self) -> bool {
        self.options
            .cancel
            .as_ref()
            .is_some_and(CancelToken::is_cancelled)
    }

    /// Download `spec` to `local_target` and verify its SHA-256.
    ///
    /// Success means `local_target` holds bytes whose SHA-256 equals
    /// `spec.expected_checksum` (hex, case-insensitive). On any error
    /// `local_target` does not exist afterwards. Blocks the calling thread.
    pub fn fetch(&self, spec: &DependencySpec, local_target: &Path) -> FetchOutcome {
        spec.validate()?;
        if self.is_cancelled() {
            return Err(FetchError::Cancelled);
        }

        let staged = storage::staging_path(local_target);
        for stale in [local_target, staged.as_path()] {
            if storage::remove_if_exists(stale).map_err(|e| FetchError::io(stale, e))? {
                tracing::debug!(path = %stale.display(), "removed stale file before fetch");
            }
        }

        tracing::info!(
            name = %spec.name,
            version = %spec.version,
            url = %spec.source_url,
            "fetching dependency"
        );

        let mut staging = StagingFile::create(&staged).map_err(|e| FetchError::io(&staged, e))?;
        let mut hasher = Sha256Stream::new();
        let url = spec.source_url.trim();

        let received = match transfer::download(url, &self.options, &mut staging, &mut hasher) {
            Ok(n) => n,
            Err(e) => {
                if let Err(cleanup) = staging.discard() {
                    tracing::warn!(path = %staged.display(), "failed to remove partial download: {}", cleanup);
                }
                match &e {
                    FetchError::Cancelled => tracing::info!(name = %spec.name, "fetch cancelled"),
                    _ => tracing::warn!(name = %spec.name, "fetch failed: {}", e),
                }
                return Err(e);
            }
        };

        let actual = hasher.finish();
        if !actual.matches_hex(&spec.expected_checksum) {
            let expected = spec.expected_checksum.trim().to_ascii_lowercase();
            let actual = actual.to_hex();
            tracing::warn!(
                name = %spec.name,
                %expected,
                %actual,
                bytes = received,
                "checksum mismatch, rejecting download"
            );
            self.reject(staging, local_target);
            return Err(FetchError::ChecksumMismatch { expected, actual });
        }

        staging
            .commit(local_target)
            .map_err(|e| FetchError::io(local_target, e))?;
        tracing::info!(
            name = %spec.name,
            version = %spec.version,
            bytes = received,
            sha256 = %actual,
            path = %local_target.display(),
            "dependency verified"
        );
        Ok(local_target.to_path_buf())
    }

    /// Disposes of unverified bytes. Cleanup failures are logged; the caller
    /// still reports the mismatch.
    fn reject(&self, staging: StagingFile, local_target: &Path) {
        let staged = staging.path().to_path_buf();
        let result = match self.options.on_mismatch {
            MismatchPolicy::Delete => staging.discard(),
            MismatchPolicy::Quarantine => {
                let to = storage::quarantine_path(local_target);
                match staging.quarantine(&to) {
                    Ok(()) => {
                        tracing::info!(path = %to.display(), "quarantined rejected download");
                        Ok(())
                    }
                    Err(e) => {
                        tracing::warn!(path = %to.display(), "failed to quarantine rejected download: {}", e);
                        storage::remove_if_exists(&staged).map(|_| ())
                    }
                }
            }
        };
        if let Err(e) = result {
            tracing::warn!(path = %staged.display(), "failed to remove rejected download: {}", e);
        }
    }
}

/// [`Fetcher::fetch`] on tokio's blocking pool, for async callers.
pub async fn fetch_async(fetcher: Fetcher, spec: DependencySpec, local_target: PathBuf) -> FetchOutcome {
    let joined = tokio::task::spawn_blocking(move || fetcher.fetch(&spec, &local_target)).await;
    match joined {
        Ok(outcome) => outcome,
        Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
        Err(_) => Err(FetchError::Cancelled),
    }
}

/// Version string of the libcurl the fetcher is linked against.
pub fn transport_version() -> String {
    let v = curl::Version::get();
    format!("libcurl {}", v.version())
}
