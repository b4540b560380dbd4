//! Application factory
//!
//! Builds the actix-web application with middleware, routes and the shared
//! state. Generic over the core traits so tests can instantiate it with the
//! in-memory mocks.

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpResponse};

use vt_core::repositories::{AttemptRepository, ClientRepository, TokenRepository};
use vt_core::services::verification::MessageSender;
use vt_shared::types::ErrorBody;

use crate::routes::client;
use crate::routes::AppState;

/// Create and configure the application with all dependencies
pub fn create_app<C, T, A, M>(
    state: web::Data<AppState<C, T, A, M>>,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
>
where
    C: ClientRepository + 'static,
    T: TokenRepository + 'static,
    A: AttemptRepository + 'static,
    M: MessageSender + 'static,
{
    let cors = Cors::default()
        .allow_any_origin()
        .allow_any_method()
        .allow_any_header()
        .max_age(3600);

    App::new()
        .app_data(state)
        .wrap(Logger::default())
        .wrap(cors)
        .route("/health", web::get().to(health_check))
        .service(
            web::scope("/api/v1").service(
                web::scope("/clients")
                    .route("", web::post().to(client::register::<C, T, A, M>))
                    .route("/{id}/token", web::post().to(client::request_token::<C, T, A, M>))
                    .route(
                        "/{id}/verify/{code}",
                        web::get().to(client::verify::<C, T, A, M>),
                    )
                    .route("/{id}/cancel", web::post().to(client::cancel::<C, T, A, M>))
                    .route("/{id}/expire", web::post().to(client::expire::<C, T, A, M>))
                    .route(
                        "/{id}/cooldown/{via}",
                        web::get().to(client::cooldown::<C, T, A, M>),
                    )
                    .route(
                        "/{id}/finalize",
                        web::post().to(client::finalize::<C, T, A, M>),
                    ),
            ),
        )
        .default_service(web::route().to(not_found))
}

/// Health check endpoint handler
async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "veritel-api",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

async fn not_found() -> HttpResponse {
    HttpResponse::NotFound()
        .json(ErrorBody::new("The requested resource was not found").with_code("ERR_NOT_FOUND"))
}
