//! POST /api/v1/clients/{id}/token - registration step 2

use actix_web::{web, HttpRequest, HttpResponse};
use uuid::Uuid;
use validator::Validate;

use vt_core::repositories::{AttemptRepository, ClientRepository, TokenRepository};
use vt_core::services::verification::MessageSender;
use vt_shared::types::ApiResponse;

use crate::dto::TokenRequest;
use crate::handlers::{domain_error_response, validation_error_response};

use super::{client_ip, AppState};

pub async fn request_token<C, T, A, M>(
    req: HttpRequest,
    state: web::Data<AppState<C, T, A, M>>,
    path: web::Path<Uuid>,
    request: web::Json<TokenRequest>,
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
    let client_id = path.into_inner();
    let requester_ip = client_ip(&req);

    match state
        .verification
        .request_token(
            client_id,
            &request.celular,
            &request.operador,
            &request.via,
            requester_ip,
        )
        .await
    {
        Ok(result) => HttpResponse::Ok().json(ApiResponse::new("Verification code sent", result)),
        Err(error) => domain_error_response(&error),
    }
}
