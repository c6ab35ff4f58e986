use std::sync::Arc;

use actix_web::{middleware, web, App, HttpServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use runclub::api::{self, AppState};
use runclub::config::Config;
use runclub::create_db_pool;
use runclub::store::PgStore;

#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load()?;
    let pool = create_db_pool(&config)?;
    tracing::info!("Connected to Postgres");

    let state = web::Data::new(AppState::new(
        Arc::new(PgStore::new(pool)),
        config.bcrypt_cost,
    ));

    tracing::info!("Listening on {}", config.bind_addr);
    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(middleware::Logger::default())
            .configure(api::configure)
    })
    .bind(&config.bind_addr)?
    .run()
    .await?;

    Ok(())
}
