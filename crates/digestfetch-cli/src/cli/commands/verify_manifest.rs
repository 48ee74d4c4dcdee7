//! `digestfetch verify-manifest <path>` – check every manifest entry.

use anyhow::Result;
use digestfetch_core::manifest::Manifest;
use std::path::Path;

pub fn run_verify_manifest(path: &Path) -> Result<()> {
    let manifest = Manifest::load(path)?;
    let mut invalid = 0usize;
    for dep in &manifest.dependencies {
        match dep.validate() {
            Ok(()) => println!("ok    {} {}  {}", dep.name, dep.version, dep.source_url),
            Err(e) => {
                invalid += 1;
                println!("FAIL  {} {}: {}", dep.name, dep.version, e);
            }
        }
    }
    if invalid > 0 {
        anyhow::bail!(
            "{} of {} manifest entries are invalid",
            invalid,
            manifest.dependencies.len()
        );
    }
    println!("{} entries valid", manifest.dependencies.len());
    Ok(())
}
