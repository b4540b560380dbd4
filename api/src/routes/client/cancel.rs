//! POST /api/v1/clients/{id}/cancel

use actix_web::{web, HttpResponse};
use uuid::Uuid;

use vt_core::repositories::{AttemptRepository, ClientRepository, TokenRepository};
use vt_core::services::verification::MessageSender;
use vt_shared::types::ApiResponse;

use crate::handlers::domain_error_response;

use super::AppState;

pub async fn cancel<C, T, A, M>(
    state: web::Data<AppState<C, T, A, M>>,
    path: web::Path<Uuid>,
) -> HttpResponse
where
    C: ClientRepository + 'static,
    T: TokenRepository + 'static,
    A: AttemptRepository + 'static,
    M: MessageSender + 'static,
{
    match state.verification.cancel_token(path.into_inner()).await {
        Ok(()) => {
            HttpResponse::Ok().json(ApiResponse::<()>::message_only("Pending token cancelled"))
        }
        Err(error) => domain_error_response(&error),
    }
}
