//! Terminal chat client.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin parley-client -- 127.0.0.1 8080 alice
//! ```

use clap::Parser;
use parley_client::{ClientConfig, ClientError};
use parley_shared::logger::setup_logger;

#[derive(Debug, Parser)]
#[command(name = "parley-client", version, about = "Terminal client for the Parley relay")]
struct Cli {
    #[command(flatten)]
    config: ClientConfig,

    /// Default log level when RUST_LOG is unset
    #[arg(long, default_value = "warn")]
    log_level: String,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), &cli.log_level);

    match parley_client::run_client(cli.config).await {
        Ok(_) => std::process::exit(0),
        // Already shown to the user
        Err(ClientError::Refused(_)) => std::process::exit(1),
        Err(e) => {
            tracing::error!("Client error: {}", e);
            std::process::exit(1);
        }
    }
}
