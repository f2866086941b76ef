use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use std::sync::Arc;

use calendar_backend::config::Config;
use calendar_backend::db::Database;
use calendar_backend::{configure_routes, AppState};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init();

    log::info!("calendar-backend v{}", env!("CARGO_PKG_VERSION"));

    let config = Config::from_env().map_err(std::io::Error::other)?;
    let port = config.port;

    log::info!("Initializing database at {}", config.database_url);
    let db = Database::with_pool_size(&config.database_url, config.database_pool_size)
        .map_err(std::io::Error::other)?;
    let db = Arc::new(db);

    log::info!(
        "Calendar fill: year {}, schedule {}, off-day mode {}",
        config.seed.target_year,
        config.schedule_path.display(),
        config.seed.off_day_mode.as_str()
    );

    let server = HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);

        App::new()
            .app_data(web::Data::new(AppState::new(Arc::clone(&db), config.clone())))
            .wrap(Logger::default())
            .wrap(cors)
            .configure(configure_routes)
    })
    .bind(("0.0.0.0", port))?
    .run();

    log::info!("Listening on http://0.0.0.0:{}", port);

    let server_handle = server.handle();

    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log::error!("Failed to listen for Ctrl+C: {}", e);
            return;
        }
        log::info!("Received Ctrl+C, shutting down...");

        let server_stop = server_handle.stop(true);
        if tokio::time::timeout(std::time::Duration::from_secs(5), server_stop)
            .await
            .is_err()
        {
            log::warn!("Timeout waiting for HTTP server to stop, forcing exit...");
        }

        log::info!("Shutdown complete");
    });

    server.await
}
