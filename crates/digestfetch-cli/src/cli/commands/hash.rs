//! `digestfetch hash [TEXT]` – MD5 and SHA-256 of the input.

use anyhow::{Context, Result};
use digestfetch_core::digest;
use serde::Serialize;
use std::io::Read;

#[derive(Debug, Clone, Copy, Default)]
pub struct HashOptions {
    /// Presentation policy carried over from the old app: empty input shows
    /// nothing rather than the empty-message digests.
    pub blank_empty: bool,
    pub base64: bool,
    pub wrap: bool,
    pub json: bool,
}

/// What gets displayed for one input. `None` fields are shown blank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HashReport {
    pub md5: Option<String>,
    pub sha256: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base64: Option<String>,
}

pub fn build_report(input: &[u8], opts: &HashOptions) -> HashReport {
    if input.is_empty() && opts.blank_empty {
        return HashReport {
            md5: None,
            sha256: None,
            base64: None,
        };
    }
    HashReport {
        md5: Some(digest::md5(input).to_hex()),
        sha256: Some(digest::sha256(input).to_hex()),
        base64: opts.base64.then(|| digest::base64(input, opts.wrap)),
    }
}

fn print_report(report: &HashReport) {
    println!("MD5:     {}", report.md5.as_deref().unwrap_or(""));
    println!("SHA-256: {}", report.sha256.as_deref().unwrap_or(""));
    if let Some(b64) = &report.base64 {
        if b64.contains('\n') {
            print!("Base64:\n{}", b64);
        } else {
            println!("Base64:  {}", b64);
        }
    }
}

pub fn run_hash(text: Option<&str>, opts: &HashOptions) -> Result<()> {
    let input = match text {
        Some(t) => t.as_bytes().to_vec(),
        None => {
            let mut buf = Vec::new();
            std::io::stdin()
                .read_to_end(&mut buf)
                .context("read stdin")?;
            buf
        }
    };
    let report = build_report(&input, opts);
    if opts.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}
