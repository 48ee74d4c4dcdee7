//! `digestfetch info` – version and backends.

use digestfetch_core::{config, fetch};

pub fn run_info() {
    println!("digestfetch {}", env!("CARGO_PKG_VERSION"));
    println!("digests:   SHA-256, MD5 (broken; display only)");
    println!("transport: {}", fetch::transport_version());
    match config::config_file() {
        Ok(p) => println!("config:    {}", p.display()),
        Err(e) => println!("config:    unavailable ({:#})", e),
    }
}
