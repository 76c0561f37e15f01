use actix_web::{App, HttpServer, web};
use anyhow::Context;
use tokio::sync::mpsc;

use std::{net::TcpListener, sync::Arc};

use crate::cfg::VidshelfConfig;

pub mod build_info;
pub mod cfg;
pub mod db;
pub mod library;
pub mod telemetry;

mod api;
mod static_files;

/// Opens the catalogue database, applying any pending migrations.
pub async fn open_database(config: &VidshelfConfig) -> anyhow::Result<Arc<db::Database>> {
    let database = db::Database::open(config.db_config.clone())
        .await
        .context("While initializing database")?;
    database
        .apply_pending_migrations()
        .await
        .context("While applying database migrations")?;
    Ok(Arc::new(database))
}

pub async fn run_app(listener: TcpListener, config: VidshelfConfig) -> anyhow::Result<()> {
    let database = open_database(&config).await?;

    let (user_command_sender, user_command_receiver) = mpsc::unbounded_channel();

    let library_ctx =
        library::LibraryContext::new(config.library_config.clone(), Arc::clone(&database));
    let library = library::run_library(library_ctx, user_command_receiver);

    let api_data = web::Data::new(api::ApiData::new(
        Arc::clone(&database),
        user_command_sender,
        config.library_config.thumbnail_path.clone(),
    ));

    let server = HttpServer::new(move || {
        App::new()
            .app_data(api_data.clone())
            .wrap(tracing_actix_web::TracingLogger::default())
            .configure(api::register_handlers)
            .configure(static_files::register_static_files)
    })
    .listen(listener)?
    .run();

    tokio::select! {
        library = library => {
            library?;
            anyhow::bail!("Unexpected library service exit.");
        }
        server = server => {
            server?;
            // the server can exit due to SIGINT. Using join for these 2 futures would not
            // terminate the application because the library service would keep waiting for
            // commands while the server holds the sender
        }
    };

    Ok(())
}
