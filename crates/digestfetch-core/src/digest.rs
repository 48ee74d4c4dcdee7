//! Message digests of raw input bytes (MD5, SHA-256) and their renderings.
//!
//! Every function here is total: any byte sequence, including the empty one,
//! has a digest. Whether an empty input is shown at all is up to the caller.
//!
//! MD5 is cryptographically broken (practical collisions). It is kept only so
//! the hash view can print the familiar MD5 line; never use it for integrity
//! or security decisions. Dependency verification uses SHA-256 exclusively.

use ::base64::engine::general_purpose::STANDARD;
use ::base64::Engine as _;
use ::md5::Md5;
use sha2::{Digest, Sha256};
use std::fmt;

/// Column width for wrapped base64 output (PEM style).
const BASE64_LINE_WIDTH: usize = 64;

/// Hash function a [`DigestResult`] was produced with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DigestAlgorithm {
    /// 128-bit MD5. Broken; display only.
    Md5,
    /// 256-bit SHA-256.
    Sha256,
}

impl DigestAlgorithm {
    /// Length of the raw digest in bytes.
    pub const fn digest_len(self) -> usize {
        match self {
            DigestAlgorithm::Md5 => 16,
            DigestAlgorithm::Sha256 => 32,
        }
    }

    /// Length of the lowercase hex rendering.
    pub const fn hex_len(self) -> usize {
        self.digest_len() * 2
    }
}

impl fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DigestAlgorithm::Md5 => write!(f, "MD5"),
            DigestAlgorithm::Sha256 => write!(f, "SHA-256"),
        }
    }
}

/// A finished digest: the algorithm plus its raw output bytes.
///
/// `Display` renders the lowercase hex form, so `to_string()` and
/// [`DigestResult::to_hex`] agree.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DigestResult {
    algorithm: DigestAlgorithm,
    bytes: Vec<u8>,
}

impl DigestResult {
    fn new(algorithm: DigestAlgorithm, bytes: Vec<u8>) -> Self {
        debug_assert_eq!(bytes.len(), algorithm.digest_len());
        Self { algorithm, bytes }
    }

    pub fn algorithm(&self) -> DigestAlgorithm {
        self.algorithm
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Lowercase hex, `2 * digest_len` characters, no prefix or separators.
    pub fn to_hex(&self) -> String {
        to_hex(&self.bytes)
    }

    /// Case-insensitive comparison against a published hex digest.
    /// Surrounding whitespace in `expected` is ignored.
    pub fn matches_hex(&self, expected: &str) -> bool {
        self.to_hex().eq_ignore_ascii_case(expected.trim())
    }
}

impl fmt::Display for DigestResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// MD5 and SHA-256 of the same input, as computed on every text change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigestPair {
    pub md5: DigestResult,
    pub sha256: DigestResult,
}

/// MD5 of `input`.
///
/// **Broken algorithm.** Kept for display parity only; do not use the result
/// to check integrity or authenticity of anything.
pub fn md5(input: &[u8]) -> DigestResult {
    let out = Md5::digest(input);
    DigestResult::new(DigestAlgorithm::Md5, out.to_vec())
}

/// SHA-256 of `input`.
pub fn sha256(input: &[u8]) -> DigestResult {
    let out = Sha256::digest(input);
    DigestResult::new(DigestAlgorithm::Sha256, out.to_vec())
}

/// Lowercase hex encoding of `raw`.
pub fn to_hex(raw: &[u8]) -> String {
    hex::encode(raw)
}

/// Both digests of the UTF-8 bytes of `text`. No trimming or Unicode
/// normalization is applied: `"a"` and `"a "` hash differently.
pub fn digest_text(text: &str) -> DigestPair {
    let bytes = text.as_bytes();
    DigestPair {
        md5: md5(bytes),
        sha256: sha256(bytes),
    }
}

/// Standard base64 (with padding) of `input`.
///
/// With `wrap_lines`, output is split into 64-column lines, each terminated
/// by `\n`, the layout OpenSSL's base64 filter produces. Empty input yields
/// an empty string either way.
pub fn base64(input: &[u8], wrap_lines: bool) -> String {
    let encoded = STANDARD.encode(input);
    if !wrap_lines || encoded.is_empty() {
        return encoded;
    }
    let mut out = String::with_capacity(encoded.len() + encoded.len() / BASE64_LINE_WIDTH + 1);
    // base64 output is ASCII, so byte chunks are valid char boundaries.
    for line in encoded.as_bytes().chunks(BASE64_LINE_WIDTH) {
        out.push_str(std::str::from_utf8(line).unwrap_or_default());
        out.push('\n');
    }
    out
}

/// Incremental SHA-256 over a byte stream, used by the fetcher to hash a
/// download while it is being written to disk.
pub(crate) struct Sha256Stream {
    hasher: Sha256,
}

impl Sha256Stream {
    pub(crate) fn new() -> Self {
        Self {
            hasher: Sha256::new(),
        }
    }

    pub(crate) fn update(&mut self, chunk: &[u8]) {
        self.hasher.update(chunk);
    }

    pub(crate) fn finish(self) -> DigestResult {
        DigestResult::new(DigestAlgorithm::Sha256, self.hasher.finalize().to_vec())
    }
}
