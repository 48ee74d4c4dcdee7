//! `digestfetch fetch` – provision one dependency archive, verified by SHA-256.

use anyhow::{Context, Result};
use digestfetch_core::config::Config;
use digestfetch_core::control::CancelToken;
use digestfetch_core::fetch::{FetchOptions, Fetcher};
use digestfetch_core::manifest::{file_name_from_url, DependencySpec, Manifest};
use digestfetch_core::retry::{fetch_with_retry, RetryPolicy};
use std::path::{Path, PathBuf};

/// Fetch arguments after parsing.
#[derive(Debug, Clone, Default)]
pub struct FetchRequest {
    pub manifest: Option<PathBuf>,
    pub name: Option<String>,
    pub version: Option<String>,
    pub url: Option<String>,
    pub checksum: Option<String>,
    pub output: Option<PathBuf>,
    pub retry: bool,
}

/// Builds the dependency spec from `--url/--checksum`, or looks it up in the
/// manifest (`--manifest` or the config default).
pub fn resolve_spec(req: &FetchRequest, cfg: &Config) -> Result<DependencySpec> {
    if let Some(url) = &req.url {
        let checksum = req
            .checksum
            .as_deref()
            .context("--checksum is required with --url")?;
        let name = req
            .name
            .clone()
            .or_else(|| file_name_from_url(url))
            .unwrap_or_else(|| "dependency".to_string());
        let version = req.version.clone().unwrap_or_else(|| "unversioned".to_string());
        return Ok(DependencySpec::new(name, version, url.as_str(), checksum));
    }

    let manifest_path = req
        .manifest
        .as_deref()
        .or(cfg.manifest.as_deref())
        .context("no manifest given: use --manifest, --url, or set `manifest` in config")?;
    let name = req
        .name
        .as_deref()
        .context("--name is required when fetching from a manifest")?;
    let manifest = Manifest::load(manifest_path)?;
    let spec = manifest.find(name, req.version.as_deref())?;
    Ok(spec.clone())
}

/// `--output` as given, `<dir>/<archive name>` if it is a directory, or the
/// archive name in the current directory when omitted.
pub fn resolve_target(output: Option<&Path>, spec: &DependencySpec) -> Result<PathBuf> {
    match output {
        Some(p) if p.is_dir() => Ok(p.join(spec.archive_file_name())),
        Some(p) => Ok(p.to_path_buf()),
        None => Ok(std::env::current_dir()?.join(spec.archive_file_name())),
    }
}

pub async fn run_fetch(req: FetchRequest, cfg: &Config) -> Result<()> {
    let spec = resolve_spec(&req, cfg)?;
    let target = resolve_target(req.output.as_deref(), &spec)?;

    let token = CancelToken::new();
    let watcher = tokio::spawn({
        let token = token.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("interrupt received, cancelling fetch");
                token.cancel();
            }
        }
    });

    let fetcher = Fetcher::new(FetchOptions::from(cfg)).with_cancel(token);
    let policy = req
        .retry
        .then(|| cfg.retry.as_ref().map(RetryPolicy::from).unwrap_or_default());

    let outcome = tokio::task::spawn_blocking({
        let spec = spec.clone();
        let target = target.clone();
        move || match policy {
            Some(p) => fetch_with_retry(&fetcher, &spec, &target, &p),
            None => fetcher.fetch(&spec, &target),
        }
    })
    .await
    .context("fetch task join")?;
    watcher.abort();

    let path = outcome.with_context(|| format!("fetch {} {}", spec.name, spec.version))?;
    println!(
        "verified {} {} -> {} (sha256 {})",
        spec.name,
        spec.version,
        path.display(),
        spec.expected_checksum.trim().to_ascii_lowercase()
    );
    Ok(())
}
