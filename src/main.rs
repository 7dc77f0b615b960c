mod cli;

use versecast::{config, server, streaming};

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};

async fn start_server(host: String, port: u16, config_path: Option<&std::path::Path>) -> Result<()> {
    let mut config = config::load_config_or_default(config_path)?;

    // Override host/port from CLI if specified
    config.server.host = host;
    config.server.port = port;

    tracing::info!("Starting versecast server");
    tracing::info!(
        "Server will listen on {}:{}",
        config.server.host,
        config.server.port
    );

    server::start_server(config).await
}

fn migrate(db: Option<std::path::PathBuf>, config_path: Option<&std::path::Path>) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;
    let db_path = db.unwrap_or(config.server.db_path);

    tracing::info!("Initializing database at {:?}", db_path);
    versecast_db::pool::init_pool(&db_path)?;
    println!("Database ready: {}", db_path.display());
    Ok(())
}

fn sign_path(path: &str, config_path: Option<&std::path::Path>) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;
    let signer = streaming::UrlSigner::new(&config.signing);

    match signer.sign(path, &versecast_common::TransactionId::new()) {
        Some(url) => {
            println!("{url}");
            Ok(())
        }
        None => anyhow::bail!("No signing key configured; set [signing].key or run keygen"),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG env var if set, otherwise use defaults based on the
    // verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "versecast=trace,versecast_media=trace,versecast_db=debug,tower_http=debug".to_string()
        } else {
            "versecast=debug,versecast_media=debug,versecast_db=info,tower_http=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .init();

    match cli.command {
        Commands::Start { host, port } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(start_server(host, port, cli.config.as_deref()))
        }
        Commands::Migrate { db } => migrate(db, cli.config.as_deref()),
        Commands::Sign { path } => sign_path(&path, cli.config.as_deref()),
        Commands::Keygen => {
            println!("{}", streaming::generate_signing_key());
            Ok(())
        }
    }
}
