use std::{net::TcpListener, path::PathBuf};

use clap::Parser;

#[derive(clap::Subcommand, Debug, Default)]
enum Command {
    /// Serve the library web interface and API (default)
    #[default]
    Serve,
    /// Check in the files waiting in the check-in folder, then update the playlist
    Checkin,
    /// Add catalogued videos missing from the playlist, generating their thumbnails
    Playlist,
}

#[derive(Parser, Debug)]
#[command(version)]
struct Args {
    /// Path to the vidshelf configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

fn default_config_path() -> PathBuf {
    "/var/lib/vidshelf/config/config.toml".into()
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config =
        vidshelf_server::cfg::get_config(&args.config.unwrap_or_else(default_config_path))?;

    vidshelf_server::telemetry::init_subscriber(config.debug, &config.db_config.log_path())?;
    tracing::info!(build_info = ?vidshelf_server::build_info::get(), "Starting vidshelf");

    match args.command.unwrap_or_default() {
        Command::Serve => {
            let listener = TcpListener::bind(format!(
                "{}:{}",
                config.http_config.listen_address, config.http_config.listen_port
            ))?;
            tracing::info!("Listening on {}", listener.local_addr()?);
            vidshelf_server::run_app(listener, config).await?;
        }
        Command::Checkin => {
            let database = vidshelf_server::open_database(&config).await?;
            let ctx = vidshelf_server::library::LibraryContext::new(config.library_config, database);
            vidshelf_server::library::check_in_and_register(&ctx).await?;
        }
        Command::Playlist => {
            let database = vidshelf_server::open_database(&config).await?;
            let ctx = vidshelf_server::library::LibraryContext::new(config.library_config, database);
            let registered = vidshelf_server::library::playlist::register_playlist(&ctx).await?;
            tracing::info!("Added {} videos to the playlist", registered.len());
        }
    }

    Ok(())
}
