use actix_web::{web, App, HttpServer};
use blog_backend::config::db::redacted_url;
use blog_backend::config::AppConfig;
use blog_backend::infra::state::build_state;
use blog_backend::routes;
use blog_backend::state::security_config::SecurityConfig;
use blog_backend::telemetry;
use tracing::{error, info};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    telemetry::init_tracing();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "invalid configuration");
            std::process::exit(1);
        }
    };

    info!(
        host = %config.host,
        port = config.port,
        database = %redacted_url(&config.database_url),
        "starting blog backend"
    );

    let app_state = match build_state()
        .with_db(config.database_url.clone())
        .with_security(SecurityConfig::new(config.token_key.clone()))
        .with_db_timeout(config.db_timeout)
        .build()
        .await
    {
        Ok(state) => state,
        Err(e) => {
            error!(error = %e, "failed to build application state");
            std::process::exit(1);
        }
    };

    info!("database connected and migrated");

    let data = web::Data::new(app_state);
    let server_data = data.clone();
    let global = routes::global_middleware(config.cors.clone());

    // SIGINT/SIGTERM trigger actix's graceful stop; in-flight requests get the grace period
    HttpServer::new(move || {
        App::new()
            .wrap(global.clone())
            .app_data(server_data.clone())
            .configure(routes::configure)
    })
    .shutdown_timeout(config.shutdown_grace_secs)
    .bind((config.host.as_str(), config.port))?
    .run()
    .await?;

    info!("server stopped, closing database");
    if let Some(db) = data.db() {
        if let Err(e) = db.clone().close().await {
            error!(error = %e, "failed to close database");
        }
    }

    Ok(())
}
