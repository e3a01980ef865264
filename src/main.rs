use clap::Parser;
use std::sync::Arc;

mod api;
mod config;
mod handler;
mod http;
mod logger;
mod server;
mod store;
mod upload;

/// Tournament site admin server
#[derive(Parser, Debug)]
#[command(name = "tourney-admin", version)]
#[command(about = "JSON document and media upload backend for the tournament site", long_about = None)]
struct Cli {
    /// Configuration file (extension optional, missing file means defaults)
    #[arg(short, long, default_value = "config")]
    config: String,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let cfg = config::Config::load_from(&cli.config)?;
    logger::init(&cfg)?;

    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: config::Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;

    let state = Arc::new(config::AppState::new(&cfg));
    state.ensure_storage_ready().await?;

    let listener = server::create_listener(addr, cfg.server.backlog)?;
    logger::log_server_start(&addr, &cfg);

    server::run(listener, state, server::signal::shutdown_signal()).await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_config_flag() {
        assert_eq!(Cli::parse_from(["tourney-admin"]).config, "config");
        assert_eq!(
            Cli::parse_from(["tourney-admin", "-c", "/etc/tourney.toml"]).config,
            "/etc/tourney.toml"
        );
        assert_eq!(
            Cli::parse_from(["tourney-admin", "--config", "site"]).config,
            "site"
        );
    }
}
