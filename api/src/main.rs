use std::sync::Arc;

use actix_web::{web, HttpServer};
use dotenvy::dotenv;
use log::info;

use vt_api::app::create_app;
use vt_api::routes::AppState;
use vt_core::services::registration::RegistrationService;
use vt_core::services::verification::{VerificationConfig, VerificationService};
use vt_infra::database::{
    DatabasePool, MySqlAttemptRepository, MySqlClientRepository, MySqlTokenRepository,
};
use vt_infra::messaging::MessageDispatcher;
use vt_shared::AppConfig;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = AppConfig::from_env();
    info!(
        "Starting Veritel API server ({:?} environment)",
        config.environment
    );

    let pool = DatabasePool::new(config.database.clone())
        .await
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;

    let clients = Arc::new(MySqlClientRepository::new(pool.get_pool().clone()));
    let tokens = Arc::new(MySqlTokenRepository::new(pool.get_pool().clone()));
    let attempts = Arc::new(MySqlAttemptRepository::new(pool.get_pool().clone()));
    let sender = Arc::new(MessageDispatcher::new(config.messaging.clone()));

    let verification = Arc::new(VerificationService::new(
        Arc::clone(&clients),
        Arc::clone(&tokens),
        attempts,
        sender,
        VerificationConfig::from(config.verification.clone()),
    ));
    let registration = Arc::new(RegistrationService::new(clients, tokens));

    let state = web::Data::new(AppState {
        verification,
        registration,
    });

    let bind_address = config.server.bind_address();
    info!("Server listening on {}", bind_address);

    HttpServer::new(move || create_app(state.clone()))
        .bind(&bind_address)?
        .run()
        .await
}
