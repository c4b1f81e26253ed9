use clap::Parser;
use heroku_api::config::{API_KEY_ENV, DEFAULT_BASE_URL};
use heroku_api::{ApiConfig, HerokuClient};
use std::sync::Arc;
use std::time::Duration;
use tools::ToolRegistry;

mod mcp;
mod server;
mod tools;

#[derive(Parser)]
#[command(name = "heroku-mcp", about = "Heroku platform tools for MCP clients")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Start the MCP server (stdio transport)
    Serve {
        /// Platform API base URL
        #[arg(long, env = "HEROKU_API_BASE_URL", default_value = DEFAULT_BASE_URL)]
        api_base_url: String,

        /// Per-request HTTP timeout in seconds
        #[arg(long, env = "HEROKU_API_TIMEOUT_SECS", default_value_t = 30)]
        timeout_secs: u64,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // All logging goes to stderr so stdout is reserved for MCP JSON-RPC.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            api_base_url,
            timeout_secs,
        } => {
            let config = match ApiConfig::from_env() {
                Ok(config) => config,
                Err(_) => {
                    eprintln!("Error: {API_KEY_ENV} environment variable is required");
                    eprintln!(
                        "Set it to your Heroku API key (available at https://dashboard.heroku.com/account)"
                    );
                    std::process::exit(1);
                }
            };
            let config = config
                .with_base_url(api_base_url)
                .with_timeout(Duration::from_secs(timeout_secs));

            tracing::info!("Starting heroku-mcp server against {}", config.base_url());
            let client = HerokuClient::new(config)?;
            let registry = ToolRegistry::heroku(Arc::new(client))?;
            server::run(registry).await?;
        }
    }

    Ok(())
}
