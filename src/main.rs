//! mathyd
//!
//! Accepts HMAC-authenticated `PUT /` requests carrying TeX and answers with
//! rendered markup.
//!
//! # Architecture Overview
//!
//! ```text
//!                    ┌───────────────────────────────────────────────────────────┐
//!                    │                          MATHYD                           │
//!                    │                                                           │
//!   PUT / ───────────┼─▶ ┌──────────┐   ┌───────────┐   ┌──────────────┐         │
//!   x-mathyd-hmac-   │   │ security │──▶│  render   │──▶│    render    │         │
//!   sha256: <hex>    │   │integrity │   │  request  │   │  dispatcher  │         │
//!                    │   └──────────┘   └───────────┘   └──────┬───────┘         │
//!                    │                                         │ spawn_blocking  │
//!                    │                                         ▼                 │
//!                    │                                  ┌──────────────┐         │
//!   ◀────────────────┼─── http::response ◀──────────────│ KaTeX engine │         │
//!   {"svg": ...}     │                                  └──────────────┘         │
//!                    │                                                           │
//!                    │  config · observability · resilience · lifecycle          │
//!                    └───────────────────────────────────────────────────────────┘
//! ```

use clap::Parser;
use std::path::PathBuf;

use mathyd::config::load_config;
use mathyd::lifecycle::startup;

#[derive(Parser)]
#[command(name = "mathyd")]
#[command(about = "Authenticated TeX rendering service", long_about = None)]
struct Cli {
    /// Optional TOML configuration file.
    #[arg(short, long, env = "MATHYD_CONFIG")]
    config: Option<PathBuf>,

    /// Port to listen on (overrides MATHYD_PORT).
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = load_config(cli.config.as_deref())?;
    if let Some(port) = cli.port {
        config.listener.port = port;
    }

    startup::run(config).await?;
    Ok(())
}
