//! Fetch failure taxonomy.

use crate::manifest::ManifestError;
use std::fmt;
use std::io;
use std::path::PathBuf;

/// What went wrong on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    /// Connect, low-speed or overall transfer timeout.
    Timeout,
    /// Could not reach or keep talking to the server (DNS, refused, reset,
    /// missing `file://` source).
    Connection,
    /// Server answered with a non-2xx status.
    HttpStatus(u32),
    /// Anything else curl reported (TLS, malformed response, ...).
    Other,
}

impl TransportErrorKind {
    /// Whether a caller-side retry has a chance of succeeding.
    pub fn is_transient(self) -> bool {
        match self {
            TransportErrorKind::Timeout | TransportErrorKind::Connection => true,
            TransportErrorKind::HttpStatus(code) => code == 429 || (500..=599).contains(&code),
            TransportErrorKind::Other => false,
        }
    }
}

impl fmt::Display for TransportErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportErrorKind::Timeout => write!(f, "timed out"),
            TransportErrorKind::Connection => write!(f, "connection failed"),
            TransportErrorKind::HttpStatus(code) => write!(f, "HTTP {}", code),
            TransportErrorKind::Other => write!(f, "transfer failed"),
        }
    }
}

/// Transport-level failure for one download. Checksums are never computed
/// for a transfer that ended this way.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{url}: {kind} ({message})")]
pub struct TransportError {
    pub kind: TransportErrorKind,
    pub url: String,
    pub message: String,
}

/// Why a fetch did not produce a verified archive.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The dependency spec itself is unusable; nothing was downloaded.
    #[error("invalid dependency spec")]
    InvalidSpec(#[from] ManifestError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Downloaded bytes do not hash to the expected value. Fatal for this
    /// attempt; the bytes have been deleted or quarantined.
    #[error("checksum mismatch: expected sha256 {expected}, got {actual}")]
    ChecksumMismatch { expected: String, actual: String },

    /// The caller's cancel token fired before or during the transfer.
    #[error("fetch cancelled")]
    Cancelled,

    /// Local filesystem failure while staging or finalizing the archive.
    #[error("I/O error on {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl FetchError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        FetchError::Io {
            path: path.into(),
            source,
        }
    }

    /// Transport kind, if this is a transport failure.
    pub fn transport_kind(&self) -> Option<TransportErrorKind> {
        match self {
            FetchError::Transport(t) => Some(t.kind),
            _ => None,
        }
    }

    /// Only transient transport failures are worth retrying. Checksum
    /// mismatches, cancellation, bad specs and local I/O never are.
    pub fn is_retryable(&self) -> bool {
        self.transport_kind().is_some_and(TransportErrorKind::is_transient)
    }
}
