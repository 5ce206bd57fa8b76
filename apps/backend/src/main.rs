use actix_web::{web, App, HttpServer};
use scistats::config::db::{db_kind_from_env, db_url, PoolSettings};
use scistats::config::server::ServerConfig;
use scistats::error::AppError;
use scistats::infra::state::build_state;
use scistats::middleware::{RequestTrace, StructuredLogger};
use scistats::routes;
use scistats::state::app_state::AppState;
use tracing::info;

mod telemetry;

async fn build_app_state() -> Result<AppState, AppError> {
    let db_kind = db_kind_from_env()?;
    let url = db_url(db_kind)?;
    let pool = PoolSettings::from_env()?;

    build_state()
        .with_db(db_kind)
        .with_url(url)
        .with_pool_settings(pool)
        .build()
        .await
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    telemetry::init_tracing();

    // Configuration comes from the process environment only.
    let server = match ServerConfig::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("❌ {e}");
            std::process::exit(1);
        }
    };

    let app_state = match build_app_state().await {
        Ok(state) => state,
        Err(e) => {
            eprintln!("❌ Failed to build application state: {e}");
            std::process::exit(1);
        }
    };

    info!(
        host = %server.host,
        port = server.port,
        sources = app_state.sources().len(),
        "starting scistats"
    );

    let data = web::Data::new(app_state);

    HttpServer::new(move || {
        App::new()
            .wrap(StructuredLogger)
            .wrap(RequestTrace)
            .app_data(data.clone())
            .configure(routes::configure)
            .default_service(web::to(routes::unknown_route))
    })
    .bind((server.host.as_str(), server.port))?
    .run()
    .await
}
