use std::env;

use actix_web::middleware::Logger;
use actix_web::{App, HttpServer, web};
use config::Config;
use dotenvy::dotenv;

use course_catalog::db::{establish_connection_pool, run_migrations};
use course_catalog::models::config::ServerConfig;
use course_catalog::repository::DieselRepository;
use course_catalog::routes::{
    configure, json_error_handler, path_error_handler, query_error_handler,
};

fn load_config() -> Result<ServerConfig, config::ConfigError> {
    let app_env = env::var("APP_ENV").unwrap_or_else(|_| "local".into());

    Config::builder()
        .set_default("database_url", "catalog.db")?
        .set_default("address", "127.0.0.1")?
        .set_default("port", 8080)?
        .set_default("run_migrations", true)?
        .add_source(config::File::with_name("config/default").required(false))
        .add_source(config::File::with_name(&format!("config/{app_env}")).required(false))
        .add_source(config::Environment::with_prefix("APP"))
        .build()?
        .try_deserialize()
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let server_config = match load_config() {
        Ok(server_config) => server_config,
        Err(e) => {
            log::error!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    let pool = match establish_connection_pool(&server_config.database_url) {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to establish database connection: {e}");
            std::process::exit(1);
        }
    };

    if server_config.run_migrations {
        if let Err(e) = run_migrations(&pool) {
            log::error!("Failed to run database migrations: {e}");
            std::process::exit(1);
        }
    }

    let repo = web::Data::new(DieselRepository::new(pool));
    let bind_address = (server_config.address.clone(), server_config.port);
    log::info!(
        "Starting course catalog on {}:{}",
        server_config.address,
        server_config.port
    );

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .app_data(web::QueryConfig::default().error_handler(query_error_handler))
            .app_data(web::PathConfig::default().error_handler(path_error_handler))
            .app_data(repo.clone())
            .configure(configure)
    })
    .bind(bind_address)?
    .run()
    .await
}
