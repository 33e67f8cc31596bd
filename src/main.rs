//! fetch-ohlcv - print a summary of recent BTC/USDT candles from OKX

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use okx_ohlcv_example::{example, ClientConfig, OkxClient};

#[derive(Parser, Debug)]
#[command(name = "fetch-ohlcv")]
#[command(about = "Fetch recent BTC/USDT candles from OKX and print the last close", long_about = None)]
#[command(version)]
struct Cli {
    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn setup_logging(verbose: bool) {
    // Filter out noisy external crates
    let level = if verbose { "debug" } else { "info" };
    let filter_str = format!(
        "{},hyper=warn,hyper_util=warn,reqwest=warn,rustls=warn,h2=warn",
        level
    );
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&filter_str));

    // stdout is reserved for the summary line
    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .with_file(true)
        .with_ansi(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    let config = ClientConfig::from_env().context("Failed to load client configuration")?;
    let client = OkxClient::with_config(config).context("Failed to create OKX client")?;

    let stdout = std::io::stdout();
    example::run(&client, &mut stdout.lock()).await
}
