//! Tracing subscriber setup shared by the binaries.

use tracing_subscriber::{EnvFilter, fmt};

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence. Without it, the binary's own crate and the
/// Parley library crates log at `default_level`, everything else at `warn`.
///
/// Calling this twice is harmless; the second call is ignored.
pub fn setup_logger(bin_name: &str, default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(bin_name, default_level)));

    let _ = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Library crates logged at the binary's default level.
const LIBRARY_TARGETS: [&str; 2] = ["parley_server", "parley_client"];

fn default_directives(bin_name: &str, default_level: &str) -> String {
    // Cargo bin names use hyphens, tracing targets use underscores.
    let bin_target = bin_name.replace('-', "_");
    let mut directives = format!("warn,{bin_target}={default_level}");
    for target in LIBRARY_TARGETS.iter().filter(|target| **target != bin_target) {
        directives.push_str(&format!(",{target}={default_level}"));
    }
    directives
}
