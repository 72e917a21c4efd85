//! superthread-mcp - MCP server exposing Superthread to AI assistants.

use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use superthread_api::SuperthreadClient;
use superthread_core::Config;
use superthread_mcp::{AppState, McpServer, StdioTransport, ToolHandler};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "superthread-mcp")]
#[command(author, version, about = "MCP server for the Superthread API", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP MCP server
    Serve {
        /// Address to bind
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Serve MCP over stdin/stdout using the configured token
    Stdio,

    /// Print the tool catalog as JSON
    Tools,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Set a value (e.g. `server.port 9000`)
    Set { key: String, value: String },

    /// Print a single value
    Get { key: String },

    /// Show the effective configuration with the token masked
    Show,

    /// Print the config file location
    Path,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Stdout carries the protocol in stdio mode.
    let to_stderr = matches!(cli.command, Some(Commands::Stdio));
    init_logging(cli.verbose, cli.json_logs, to_stderr);

    match cli.command {
        Some(Commands::Serve { host, port }) => {
            let mut config = load_config()?;
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            serve(config).await?;
        }
        Some(Commands::Stdio) => {
            let config = load_config()?;
            let token = config
                .token()
                .map(str::to_string)
                .context("stdio mode needs a token: set SUPERTHREAD_TOKEN or superthread.token")?;

            let server = build_server(&config)?;
            let mut transport = StdioTransport::stdio();
            server.run(&mut transport, &token).await?;
        }
        Some(Commands::Tools) => {
            let config = load_config()?;
            let server = build_server(&config)?;
            let tools = server.handler().available_tools();
            println!("{}", serde_json::to_string_pretty(&tools)?);
        }
        Some(Commands::Config { command }) => handle_config(command)?,
        None => {
            println!("superthread-mcp - MCP server for the Superthread API");
            println!("Run with --help for usage information");
        }
    }

    Ok(())
}

fn init_logging(verbose: bool, json: bool, to_stderr: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match (json, to_stderr) {
        (true, true) => builder.json().with_writer(std::io::stderr).init(),
        (true, false) => builder.json().init(),
        (false, true) => builder.with_writer(std::io::stderr).init(),
        (false, false) => builder.init(),
    }
}

fn load_config() -> anyhow::Result<Config> {
    let mut config = Config::load()?;
    config.apply_env()?;
    Ok(config)
}

fn build_server(config: &Config) -> anyhow::Result<McpServer> {
    let client = SuperthreadClient::with_base_url(&config.superthread.base_url)?;
    Ok(McpServer::new(ToolHandler::new(Arc::new(client))))
}

async fn serve(config: Config) -> anyhow::Result<()> {
    let server = build_server(&config)?;
    tracing::info!(
        base_url = %config.superthread.base_url,
        fallback_token = config.token().is_some(),
        "Starting superthread-mcp"
    );

    let state = AppState::new(Arc::new(server))
        .with_fallback_token(config.token().map(str::to_string))
        .with_public_url(config.server.public_url.clone());

    superthread_mcp::http::serve(state, &config.server.host, config.server.port).await?;
    Ok(())
}

fn handle_config(command: ConfigCommands) -> anyhow::Result<()> {
    match command {
        ConfigCommands::Set { key, value } => {
            let mut config = Config::load()?;
            config.set(&key, &value)?;
            config.save()?;
            println!("Set {}", key);
        }
        ConfigCommands::Get { key } => {
            let config = Config::load()?;
            match config.get(&key)? {
                Some(value) => println!("{}", value),
                None => println!("(not set)"),
            }
        }
        ConfigCommands::Show => {
            let config = load_config()?;
            print!("{}", toml::to_string_pretty(&config.masked())?);
        }
        ConfigCommands::Path => {
            println!("{}", Config::config_path()?.display());
        }
    }

    Ok(())
}
