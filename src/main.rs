//! Wanderfeed - Travel Discovery Feed
//!
//! Runs the location server, prints the feed, or chats with the assistant
//! from the terminal.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use wanderfeed::{
    app::{render, App, Screen},
    assistant::Delivered,
    client::LocationsClient,
    config::FeedConfig,
    feed::Highlighter,
    server::LocationServerBuilder,
};

#[derive(Parser)]
#[command(name = "wanderfeed")]
#[command(author = "Wanderfeed Team")]
#[command(version)]
#[command(about = "Travel discovery feed with a keyword-driven assistant")]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "WANDERFEED_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the location server
    Serve {
        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on
        #[arg(long)]
        port: Option<u16>,

        /// Location dataset (CSV)
        #[arg(long)]
        data: Option<PathBuf>,

        /// Location images directory
        #[arg(long)]
        images: Option<PathBuf>,
    },

    /// Print the feed
    Feed {
        /// Active category: all, food, accommodation, attraction, shopping,
        /// entertainment, transport, or any free-text token
        #[arg(long, default_value = "all")]
        category: String,

        /// Search query
        #[arg(short, long, default_value = "")]
        query: String,

        /// Locations API base URL
        #[arg(long)]
        api_url: Option<String>,
    },

    /// Chat with the travel assistant
    Chat {
        /// Locations API base URL
        #[arg(long)]
        api_url: Option<String>,
    },

    /// Show configuration
    Config {
        /// Show default configuration
        #[arg(long)]
        default: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("wanderfeed={},tower_http=debug", log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = load_config(cli.config)?;

    match cli.command {
        Commands::Serve {
            host,
            port,
            data,
            images,
        } => {
            run_server(config, host, port, data, images).await?;
        }
        Commands::Feed {
            category,
            query,
            api_url,
        } => {
            print_feed(config, &category, &query, api_url).await?;
        }
        Commands::Chat { api_url } => {
            run_chat(config, api_url).await?;
        }
        Commands::Config { default } => {
            show_config(if default { None } else { Some(&config) })?;
        }
    }

    Ok(())
}

/// Explicit path, else the default location if present, else defaults
fn load_config(path: Option<PathBuf>) -> Result<FeedConfig> {
    if let Some(path) = path {
        return Ok(FeedConfig::load(path)?);
    }
    match FeedConfig::default_path() {
        Some(path) if path.exists() => {
            tracing::debug!("Using config at {}", path.display());
            Ok(FeedConfig::load(path)?)
        }
        _ => Ok(FeedConfig::default()),
    }
}

async fn run_server(
    config: FeedConfig,
    host: Option<String>,
    port: Option<u16>,
    data: Option<PathBuf>,
    images: Option<PathBuf>,
) -> Result<()> {
    let mut builder = LocationServerBuilder::new().config(config);
    if let Some(host) = host {
        builder = builder.host(host);
    }
    if let Some(port) = port {
        builder = builder.port(port);
    }
    if let Some(data) = data {
        builder = builder.dataset(data);
    }
    if let Some(images) = images {
        builder = builder.images_dir(images);
    }

    let server = builder.build();
    server.start().await?;

    tracing::info!("Wanderfeed location server is running. Press Ctrl+C to stop.");

    // Wait for shutdown signal
    tokio::signal::ctrl_c().await?;

    tracing::info!("Shutting down...");
    server.stop().await?;

    Ok(())
}

fn client_for(config: &FeedConfig, api_url: Option<String>) -> LocationsClient {
    let mut client_config = config.client.clone();
    if let Some(url) = api_url {
        client_config.api_base_url = url;
    }
    LocationsClient::new(&client_config)
}

async fn print_feed(
    config: FeedConfig,
    category: &str,
    query: &str,
    api_url: Option<String>,
) -> Result<()> {
    let client = client_for(&config, api_url);
    let mut app = App::from_config(&config);
    app.load(&client).await;
    app.set_category(category);
    app.set_search_query(query);

    let screen = app.screen();
    print!("{}", render::render_screen(&screen, query, &Highlighter::ansi()));
    if screen == Screen::Empty {
        println!();
        println!("Categories:");
        print!("{}", render::render_category_tabs(category));
    }
    Ok(())
}

async fn run_chat(config: FeedConfig, api_url: Option<String>) -> Result<()> {
    let client = client_for(&config, api_url);
    let mut app = App::from_config(&config);
    app.load(&client).await;

    if let Screen::Error(message) = app.screen() {
        anyhow::bail!("{}", message);
    }

    app.toggle_assistant();
    println!(
        "{} places loaded. Ask the assistant for food, beaches, shopping, culture or attractions. /quit exits.",
        app.visible().len()
    );

    let stdin = BufReader::new(tokio::io::stdin());
    chat_session(&mut app, stdin, &mut std::io::stdout()).await
}

/// Read chat lines from `input` until `/quit` or end of input, writing the
/// transcript to `out`. A reply still pending at end of input is delivered
/// before returning.
async fn chat_session<R, W>(app: &mut App, input: R, out: &mut W) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = input.lines();
    loop {
        let pending = app.is_reply_pending();
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    if let Some(delivered) = app.wait_for_reply().await {
                        write_reply(app, &delivered, out)?;
                    }
                    break;
                };
                let line = line.trim();
                if line == "/quit" {
                    break;
                }
                match app.send_message(line) {
                    Ok(Some(message)) => writeln!(out, "{}", render::render_message(message))?,
                    Ok(None) => {}
                    Err(e) => writeln!(out, "{}", e)?,
                }
            }
            Some(reply) = app.next_reply(), if pending => {
                if let Some(delivered) = app.deliver(reply) {
                    write_reply(app, &delivered, out)?;
                }
            }
        }
    }

    Ok(())
}

fn write_reply<W: Write>(app: &App, delivered: &Delivered, out: &mut W) -> Result<()> {
    writeln!(out, "{}", render::render_message(&delivered.message))?;
    writeln!(
        out,
        "  category: {} · {} places",
        app.filter().active_category,
        app.visible().len()
    )?;
    Ok(())
}

fn show_config(config: Option<&FeedConfig>) -> Result<()> {
    let config = config.cloned().unwrap_or_default();
    let toml = toml::to_string_pretty(&config)?;
    println!("{}", toml);
    Ok(())
}
