//! GET /api/v1/clients/{id}/cooldown/{via}

use actix_web::{web, HttpResponse};
use uuid::Uuid;

use vt_core::repositories::{AttemptRepository, ClientRepository, TokenRepository};
use vt_core::services::verification::MessageSender;
use vt_shared::types::ApiResponse;

use crate::handlers::domain_error_response;

use super::AppState;

pub async fn cooldown<C, T, A, M>(
    state: web::Data<AppState<C, T, A, M>>,
    path: web::Path<(Uuid, String)>,
) -> HttpResponse
where
    C: ClientRepository + 'static,
    T: TokenRepository + 'static,
    A: AttemptRepository + 'static,
    M: MessageSender + 'static,
{
    let (client_id, via) = path.into_inner();
    match state.verification.cooldown_status(client_id, &via).await {
        Ok(status) => HttpResponse::Ok().json(ApiResponse::new("Cooldown status", status)),
        Err(error) => domain_error_response(&error),
    }
}
