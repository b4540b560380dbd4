//! POST /api/v1/clients/{id}/finalize - registration step 4

use actix_web::{web, HttpResponse};
use uuid::Uuid;
use validator::Validate;

use vt_core::repositories::{AttemptRepository, ClientRepository, TokenRepository};
use vt_core::services::verification::MessageSender;
use vt_shared::types::ApiResponse;

use crate::dto::{FinalizeRequest, FinalizedResponse};
use crate::handlers::{domain_error_response, validation_error_response};

use super::AppState;

pub async fn finalize<C, T, A, M>(
    state: web::Data<AppState<C, T, A, M>>,
    path: web::Path<Uuid>,
    request: web::Json<FinalizeRequest>,
) -> HttpResponse
where
    C: ClientRepository + 'static,
    T: TokenRepository + 'static,
    A: AttemptRepository + 'static,
    M: MessageSender + 'static,
{
    if let Err(errors) = request.validate() {
        return validation_error_response(&errors);
    }
    let request = request.into_inner();

    match state
        .registration
        .finalize(
            path.into_inner(),
            &request.correo,
            request.departamento,
            request.provincia,
            request.distrito,
            request.accept,
        )
        .await
    {
        Ok(client) => HttpResponse::Ok().json(ApiResponse::new(
            "Registration completed",
            FinalizedResponse {
                id: client.id,
                completed: client.completed,
            },
        )),
        Err(error) => domain_error_response(&error),
    }
}
