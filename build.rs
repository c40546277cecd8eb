//! Build script for NutriFit
//!
//! Embeds a per-profile build counter, the cargo profile and a UTC timestamp.

use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Reads the counter kept in `path`, stores the next value and returns it.
/// A missing or unreadable counter restarts at 1.
fn next_build_number(path: &Path) -> io::Result<u64> {
    let next = fs::read_to_string(path)
        .ok()
        .and_then(|s| s.trim().parse::<u64>().ok())
        .map_or(1, |n| n.saturating_add(1));
    fs::write(path, next.to_string())?;
    Ok(next)
}

fn main() -> io::Result<()> {
    println!("cargo:rerun-if-changed=src");
    println!("cargo:rerun-if-changed=Cargo.toml");

    // OUT_DIR survives rebuilds of the same profile and keeps the source tree clean
    let out_dir = PathBuf::from(env::var_os("OUT_DIR").unwrap_or_else(|| ".".into()));
    let build_number = next_build_number(&out_dir.join("nutrifit_build_number"))?;
    let profile = env::var("PROFILE").unwrap_or_else(|_| "unknown".to_string());
    let built_at = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true);

    for (key, value) in [
        ("NUTRIFIT_BUILD_NUMBER", build_number.to_string()),
        ("NUTRIFIT_BUILD_PROFILE", profile),
        ("NUTRIFIT_BUILT_AT", built_at),
    ] {
        println!("cargo:rustc-env={}={}", key, value);
    }
    Ok(())
}
