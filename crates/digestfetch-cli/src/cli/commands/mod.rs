//! CLI command handlers, one file per command.

mod fetch;
mod hash;
mod info;
mod verify_manifest;

pub use fetch::{run_fetch, FetchRequest};
pub use hash::{run_hash, HashOptions};
pub use info::run_info;
pub use verify_manifest::run_verify_manifest;

#[cfg(test)]
pub use fetch::{resolve_spec, resolve_target};
#[cfg(test)]
pub use hash::{build_report, HashReport};
