use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::info;
use std::fs;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use toolpick::agent::{Agent, ServerHandle, repl};
use toolpick::cli::{Cli, Commands};
use toolpick::config::Config;
use toolpick::server::{self, ToolServer};
use toolpick::tools::{BuiltinSource, ManifestSource, RegistrySource, ToolSet};

fn setup_logging() -> Result<()> {
    // Create log directory
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("toolpick")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("toolpick.log");

    // Setup env_logger with file output
    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    // Without RUST_LOG everything is let through here and capped later from config
    let mut builder = env_logger::Builder::from_default_env();
    if std::env::var_os("RUST_LOG").is_none() {
        builder.filter_level(log::LevelFilter::Trace);
    }
    builder.target(env_logger::Target::Pipe(target)).init();

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(())
}

fn apply_log_level(cli: &Cli, config: &Config) {
    if std::env::var_os("RUST_LOG").is_some() {
        return;
    }
    let level = if cli.is_verbose() {
        log::LevelFilter::Debug
    } else {
        config
            .log_level
            .as_deref()
            .and_then(|l| l.parse().ok())
            .unwrap_or(log::LevelFilter::Info)
    };
    log::set_max_level(level);
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}

fn bind_addr(host: &str, port: u16) -> Result<SocketAddr> {
    format!("{}:{}", host, port)
        .parse()
        .context(format!("Invalid bind address {}:{}", host, port))
}

async fn run_application(cli: &Cli, config: &Config) -> Result<()> {
    info!("Starting application");

    if cli.is_verbose() {
        println!("{}", "Verbose mode enabled".yellow());
    }

    match &cli.command {
        None | Some(Commands::Chat) => run_chat(config).await,
        Some(command @ Commands::Ask { .. }) => {
            let request = command.request_text().unwrap_or_default();
            run_ask(&request, config).await
        }
        Some(Commands::Serve {
            toolset,
            port,
            host,
            manifest,
        }) => run_serve(*toolset, *port, host, manifest.as_ref()).await,
        Some(Commands::ServeAll { host }) => run_serve_all(host).await,
        Some(Commands::Check) => run_check(config).await,
    }
}

fn build_agent(config: &Config) -> Result<Agent> {
    println!("{}", "Initializing agent...".cyan());
    Agent::from_config(config).context("Failed to initialize agent")
}

async fn print_health(agent: &Agent, config: &Config) {
    println!("Checking MCP servers...");
    for (info, status) in agent.health_check(config.client.health_timeout()).await {
        println!("  {}", repl::render_health(&info, &status));
    }
}

async fn run_chat(config: &Config) -> Result<()> {
    let agent = build_agent(config)?;
    print_health(&agent, config).await;
    println!();

    tokio::select! {
        result = repl::run(&agent) => result.context("Interactive session failed"),
        _ = shutdown_signal() => {
            println!("\nGoodbye!");
            Ok(())
        }
    }
}

async fn run_ask(request: &str, config: &Config) -> Result<()> {
    let agent = build_agent(config)?;
    repl::handle_request(&agent, request).await;
    Ok(())
}

async fn run_serve(toolset: ToolSet, port: Option<u16>, host: &str, manifest: Option<&PathBuf>) -> Result<()> {
    let port = port.unwrap_or_else(|| toolset.default_port());
    let addr = bind_addr(host, port)?;

    let source: Arc<dyn RegistrySource> = match manifest {
        Some(path) => Arc::new(ManifestSource::new(toolset, path)),
        None => Arc::new(BuiltinSource::new(toolset)),
    };
    let tools = source.load().context("Failed to load tools")?.tool_names();

    println!("Starting {} on port {}...", toolset.server_name().cyan(), port);
    println!("Available tools: {}", tools.join(", "));

    server::serve(addr, source, shutdown_signal())
        .await
        .context(format!("{} failed", toolset.server_name()))
}

async fn run_serve_all(host: &str) -> Result<()> {
    let mut servers = Vec::new();
    for toolset in ToolSet::all() {
        let addr = bind_addr(host, toolset.default_port())?;
        let server = ToolServer::spawn(addr, Arc::new(BuiltinSource::new(toolset)))
            .await
            .context(format!("Failed to start {}", toolset.server_name()))?;
        println!("{} listening on {}", toolset.server_name().cyan(), server.addr());
        servers.push(server);
    }

    println!("{}", "Press Ctrl-C to stop".dimmed());
    shutdown_signal().await;

    for server in &mut servers {
        server.shutdown();
    }
    println!("Servers stopped");
    Ok(())
}

async fn run_check(config: &Config) -> Result<()> {
    let mut unreachable = 0;
    for info in &config.servers {
        let handle = ServerHandle::connect(info.clone(), config.client.timeout())
            .context(format!("Failed to create client for {}", info.key))?;
        let status = handle.client.health(config.client.health_timeout()).await;
        if !status.is_connected() {
            unreachable += 1;
        }
        println!("{}", repl::render_health(info, &status));
    }

    if unreachable > 0 {
        eyre::bail!("{} of {} server(s) not reachable", unreachable, config.servers.len());
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Credentials may live in a local .env
    dotenvy::dotenv().ok();

    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging first
    setup_logging().context("Failed to setup logging")?;

    // Load configuration
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    apply_log_level(&cli, &config);

    info!("Starting with config from: {:?}", cli.config);

    // Run the main application logic
    run_application(&cli, &config).await.context("Application failed")?;

    Ok(())
}
