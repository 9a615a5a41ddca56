//! Group chat relay server.
//!
//! Accepts TCP clients, gives each a unique name and relays their messages.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin parley-server -- --host 0.0.0.0 --port 8080
//! ```

use clap::Parser;
use parley_server::ServerConfig;
use parley_shared::logger::setup_logger;

#[derive(Debug, Parser)]
#[command(name = "parley-server", version, about = "Group chat relay server")]
struct Cli {
    #[command(flatten)]
    config: ServerConfig,

    /// Default log level when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), &cli.log_level);

    // Run the server
    if let Err(e) = parley_server::run_server(cli.config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
