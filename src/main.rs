use anyhow::Result;
use clap::{Parser, Subcommand};
use prompt_gallery::gallery::{terminal, GalleryClient};
use prompt_gallery::models::Config;
use prompt_gallery::server;
use std::net::SocketAddr;
use tokio::io::BufReader;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "prompt-gallery")]
#[command(about = "Generate images from text prompts and browse them")]
struct CliArgs {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the proxy endpoint (needs IMAGE_SERVICE_URL).
    Serve {
        /// Address to listen on; overrides BIND_ADDR.
        #[arg(long, value_name = "ADDR")]
        bind: Option<SocketAddr>,
    },
    /// Open the interactive gallery against a running proxy.
    Gallery {
        /// Base URL of the proxy.
        #[arg(long, value_name = "URL", default_value = "http://127.0.0.1:3000")]
        server: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "prompt_gallery=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = CliArgs::parse();

    match args.command {
        Command::Serve { bind } => {
            let mut config = match Config::from_env() {
                Ok(config) => config,
                Err(e) => {
                    error!("Failed to load configuration: {}", e);
                    std::process::exit(1);
                }
            };
            if let Some(bind) = bind {
                config.bind_addr = bind;
            }

            info!("Starting prompt-gallery proxy");
            if let Err(e) = server::run(&config).await {
                error!("Proxy failed: {}", e);
                std::process::exit(1);
            }
        }
        Command::Gallery { server } => {
            let client = GalleryClient::new(server);
            let stdin = BufReader::new(tokio::io::stdin());
            let mut stdout = tokio::io::stdout();

            let gallery = terminal::run(&client, stdin, &mut stdout).await?;
            info!("Gallery closed with {} image(s)", gallery.images().len());
        }
    }

    Ok(())
}
