//! GET /api/v1/clients/{id}/verify/{code} - registration step 3

use actix_web::{web, HttpRequest, HttpResponse};
use uuid::Uuid;

use vt_core::repositories::{AttemptRepository, ClientRepository, TokenRepository};
use vt_core::services::verification::MessageSender;
use vt_shared::types::ApiResponse;

use crate::dto::VerifiedResponse;
use crate::handlers::domain_error_response;

use super::{client_ip, AppState};

pub async fn verify<C, T, A, M>(
    req: HttpRequest,
    state: web::Data<AppState<C, T, A, M>>,
    path: web::Path<(Uuid, String)>,
) -> HttpResponse
where
    C: ClientRepository + 'static,
    T: TokenRepository + 'static,
    A: AttemptRepository + 'static,
    M: MessageSender + 'static,
{
    let (client_id, code) = path.into_inner();
    let requester_ip = client_ip(&req);

    match state
        .verification
        .verify_token(client_id, &code, requester_ip)
        .await
    {
        Ok(verified) => HttpResponse::Ok().json(ApiResponse::new(
            "Phone number verified",
            VerifiedResponse {
                status: "VALIDATED".to_string(),
                token_id: verified.token_id,
                elapsed_seconds: verified.elapsed_seconds,
            },
        )),
        Err(error) => domain_error_response(&error),
    }
}
