//! Build information module
//!
//! Identity of the running binary, assembled from values `build.rs` embeds.

use std::fmt;

use serde::Serialize;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Which binary, which build, and when it was compiled
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildInfo {
    pub name: &'static str,
    pub version: &'static str,
    /// Per-profile counter; 0 when built without the build script
    pub build_number: u64,
    pub profile: &'static str,
    pub built_at: &'static str,
}

impl BuildInfo {
    pub fn current() -> Self {
        Self::from_embedded(
            option_env!("NUTRIFIT_BUILD_NUMBER"),
            option_env!("NUTRIFIT_BUILD_PROFILE"),
            option_env!("NUTRIFIT_BUILT_AT"),
        )
    }

    fn from_embedded(
        build_number: Option<&'static str>,
        profile: Option<&'static str>,
        built_at: Option<&'static str>,
    ) -> Self {
        Self {
            name: NAME,
            version: VERSION,
            build_number: build_number.and_then(|n| n.parse().ok()).unwrap_or(0),
            profile: profile.unwrap_or("unknown"),
            built_at: built_at.unwrap_or("unknown"),
        }
    }
}

impl fmt::Display for BuildInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} (build {}, {}, {})",
            self.name, self.version, self.build_number, self.profile, self.built_at
        )
    }
}

/// Print the startup banner to stderr
pub fn print_startup_banner() {
    let info = BuildInfo::current();
    let line = "=".repeat(info.to_string().len() + 4);
    eprintln!("{}", line);
    eprintln!("  NutriFit Nutrition Analyzer");
    eprintln!("  {}", info);
    eprintln!("{}", line);
}
