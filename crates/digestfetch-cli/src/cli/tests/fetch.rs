//! Tests for fetch, verify-manifest and info.

use super::{parse, parse_err};
use crate::cli::commands::{resolve_spec, resolve_target, run_verify_manifest, FetchRequest};
use crate::cli::CliCommand;
use digestfetch_core::config::Config;
use digestfetch_core::manifest::DependencySpec;
use std::path::{Path, PathBuf};

const SHA: &str = "9980b23b7f84841dd3f3fa8e9b4773b133cccff680d2ce466f2f61ba159ddeee";

const MANIFEST: &str = r#"
[[dependency]]
name = "openssl"
version = "1.1.111"
source_url = "https://example.com/1.1.111/openssl.xcframework.zip"
checksum = "0000000000000000000000000000000000000000000000000000000000000000"

[[dependency]]
name = "openssl"
version = "1.1.112"
source_url = "https://github.com/keeshux/openssl-apple/releases/download/1.1.112/openssl.xcframework.zip"
checksum = "9980b23b7f84841dd3f3fa8e9b4773b133cccff680d2ce466f2f61ba159ddeee"
"#;

#[test]
fn cli_parse_fetch_manifest() {
    match parse(&[
        "digestfetch",
        "fetch",
        "--manifest",
        "deps.toml",
        "--name",
        "openssl",
        "--version",
        "1.1.112",
        "-o",
        "/tmp/out.zip",
        "--retry",
    ]) {
        CliCommand::Fetch {
            manifest,
            name,
            release,
            url,
            checksum,
            output,
            retry,
        } => {
            assert_eq!(manifest.as_deref(), Some(Path::new("deps.toml")));
            assert_eq!(name.as_deref(), Some("openssl"));
            assert_eq!(release.as_deref(), Some("1.1.112"));
            assert!(url.is_none() && checksum.is_none());
            assert_eq!(output.as_deref(), Some(Path::new("/tmp/out.zip")));
            assert!(retry);
        }
        _ => panic!("expected Fetch"),
    }
}

#[test]
fn cli_parse_fetch_url() {
    match parse(&[
        "digestfetch",
        "fetch",
        "--url",
        "https://example.com/a.zip",
        "--checksum",
        SHA,
    ]) {
        CliCommand::Fetch {
            url, checksum, retry, ..
        } => {
            assert_eq!(url.as_deref(), Some("https://example.com/a.zip"));
            assert_eq!(checksum.as_deref(), Some(SHA));
            assert!(!retry);
        }
        _ => panic!("expected Fetch"),
    }
}

#[test]
fn cli_parse_fetch_url_requires_checksum() {
    let err = parse_err(&["digestfetch", "fetch", "--url", "https://example.com/a.zip"]);
    assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
}

#[test]
fn cli_parse_fetch_manifest_conflicts_with_url() {
    let err = parse_err(&[
        "digestfetch",
        "fetch",
        "--manifest",
        "deps.toml",
        "--url",
        "https://example.com/a.zip",
        "--checksum",
        SHA,
    ]);
    assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
}

#[test]
fn cli_parse_verify_manifest_and_info() {
    match parse(&["digestfetch", "verify-manifest", "deps.toml"]) {
        CliCommand::VerifyManifest { path } => assert_eq!(path, PathBuf::from("deps.toml")),
        _ => panic!("expected VerifyManifest"),
    }
    assert!(matches!(parse(&["digestfetch", "info"]), CliCommand::Info));
}

#[test]
fn resolve_spec_from_url_defaults() {
    let req = FetchRequest {
        url: Some("https://example.com/dl/openssl.zip".into()),
        checksum: Some(SHA.into()),
        ..FetchRequest::default()
    };
    let spec = resolve_spec(&req, &Config::default()).unwrap();
    assert_eq!(spec.name, "openssl.zip");
    assert_eq!(spec.version, "unversioned");
    assert_eq!(spec.expected_checksum, SHA);
}

#[test]
fn resolve_spec_from_manifest() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("deps.toml");
    std::fs::write(&path, MANIFEST).unwrap();

    let req = FetchRequest {
        manifest: Some(path.clone()),
        name: Some("openssl".into()),
        ..FetchRequest::default()
    };
    assert_eq!(resolve_spec(&req, &Config::default()).unwrap().version, "1.1.112");

    // Manifest path from config, pinned version.
    let cfg = Config {
        manifest: Some(path),
        ..Config::default()
    };
    let req = FetchRequest {
        name: Some("openssl".into()),
        version: Some("1.1.111".into()),
        ..FetchRequest::default()
    };
    assert_eq!(resolve_spec(&req, &cfg).unwrap().version, "1.1.111");
}

#[test]
fn resolve_spec_errors() {
    let err = resolve_spec(&FetchRequest::default(), &Config::default()).unwrap_err();
    assert!(err.to_string().contains("no manifest"));

    let req = FetchRequest {
        manifest: Some("deps.toml".into()),
        ..FetchRequest::default()
    };
    let err = resolve_spec(&req, &Config::default()).unwrap_err();
    assert!(err.to_string().contains("--name"));
}

#[test]
fn resolve_target_variants() {
    let spec = DependencySpec::new(
        "openssl",
        "1.1.112",
        "https://example.com/openssl.xcframework.zip",
        SHA,
    );
    let dir = tempfile::tempdir().unwrap();
    assert_eq!(
        resolve_target(Some(dir.path()), &spec).unwrap(),
        dir.path().join("openssl.xcframework.zip")
    );
    let file = dir.path().join("custom.zip");
    assert_eq!(resolve_target(Some(&file), &spec).unwrap(), file);
    assert!(resolve_target(None, &spec)
        .unwrap()
        .ends_with("openssl.xcframework.zip"));
}

#[test]
fn verify_manifest_counts_invalid_entries() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("deps.toml");
    let broken = MANIFEST.replace(
        "0000000000000000000000000000000000000000000000000000000000000000",
        "abc",
    );
    std::fs::write(&path, broken).unwrap();

    let err = run_verify_manifest(&path).unwrap_err();
    assert!(format!("{:#}", err).contains("1 of 2"), "{:#}", err);

    std::fs::write(&path, MANIFEST).unwrap();
    run_verify_manifest(&path).expect("valid manifest");
}
