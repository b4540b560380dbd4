//! POST /api/v1/clients/{id}/expire

use actix_web::{web, HttpResponse};
use serde_json::json;
use uuid::Uuid;

use vt_core::repositories::{AttemptRepository, ClientRepository, TokenRepository};
use vt_core::services::verification::MessageSender;
use vt_shared::types::ApiResponse;

use crate::handlers::domain_error_response;

use super::AppState;

pub async fn expire<C, T, A, M>(
    state: web::Data<AppState<C, T, A, M>>,
    path: web::Path<Uuid>,
) -> HttpResponse
where
    C: ClientRepository + 'static,
    T: TokenRepository + 'static,
    A: AttemptRepository + 'static,
    M: MessageSender + 'static,
{
    match state.verification.expire_token(path.into_inner()).await {
        Ok(expired) => HttpResponse::Ok().json(ApiResponse::new(
            if expired {
                "Pending token expired"
            } else {
                "No pending token to expire"
            },
            json!({ "expired": expired }),
        )),
        Err(error) => domain_error_response(&error),
    }
}
