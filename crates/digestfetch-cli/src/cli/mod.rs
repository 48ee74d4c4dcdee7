//! CLI for digestfetch.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use digestfetch_core::config::{self, Config};
use std::path::{Path, PathBuf};

use commands::{run_fetch, run_hash, run_info, run_verify_manifest, FetchRequest, HashOptions};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "digestfetch")]
#[command(about = "Hash text with MD5/SHA-256 and fetch checksum-verified dependencies", long_about = None)]
pub struct Cli {
    /// Use this config file instead of ~/.config/digestfetch/config.toml.
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Print MD5 and SHA-256 of the exact input bytes.
    Hash {
        /// Text to hash. Read from stdin (bytes as-is) when omitted.
        text: Option<String>,

        /// Print blank digests for empty input instead of the empty-message digests.
        #[arg(long)]
        blank_empty: bool,

        /// Also print the base64 encoding of the input.
        #[arg(long)]
        base64: bool,

        /// Wrap base64 output at 64 columns.
        #[arg(long, requires = "base64")]
        wrap: bool,

        /// Print a JSON object instead of labelled lines.
        #[arg(long)]
        json: bool,
    },

    /// Download a dependency archive and verify its SHA-256; fails closed.
    Fetch {
        /// Manifest listing dependency releases (defaults to `manifest` from config).
        #[arg(long, value_name = "FILE", conflicts_with = "url")]
        manifest: Option<PathBuf>,

        /// Dependency name (required with a manifest).
        #[arg(long)]
        name: Option<String>,

        /// Release to fetch; the last one listed when omitted.
        #[arg(long = "version", value_name = "VERSION")]
        release: Option<String>,

        /// Fetch this URL directly instead of a manifest entry.
        #[arg(long, requires = "checksum")]
        url: Option<String>,

        /// Expected SHA-256 (hex) for --url.
        #[arg(long, requires = "url")]
        checksum: Option<String>,

        /// Output file, or an existing directory to place the archive in.
        #[arg(long, short = 'o', value_name = "PATH")]
        output: Option<PathBuf>,

        /// Retry transient network failures with backoff (never checksum mismatches).
        #[arg(long)]
        retry: bool,
    },

    /// Validate every entry of a dependency manifest.
    VerifyManifest {
        /// Path to the manifest.
        path: PathBuf,
    },

    /// Show version and backend information.
    Info,
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    let cfg = match path {
        Some(p) => config::load_from(p)?,
        None => config::load_or_init()?,
    };
    tracing::debug!("loaded config: {:?}", cfg);
    Ok(cfg)
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();

        match cli.command {
            CliCommand::Hash {
                text,
                blank_empty,
                base64,
                wrap,
                json,
            } => {
                let opts = HashOptions {
                    blank_empty,
                    base64,
                    wrap,
                    json,
                };
                run_hash(text.as_deref(), &opts)?;
            }
            CliCommand::Fetch {
                manifest,
                name,
                release,
                url,
                checksum,
                output,
                retry,
            } => {
                let cfg = load_config(cli.config.as_deref())?;
                let request = FetchRequest {
                    manifest,
                    name,
                    version: release,
                    url,
                    checksum,
                    output,
                    retry,
                };
                run_fetch(request, &cfg).await?;
            }
            CliCommand::VerifyManifest { path } => run_verify_manifest(&path)?,
            CliCommand::Info => run_info(),
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
