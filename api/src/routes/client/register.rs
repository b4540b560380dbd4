//! POST /api/v1/clients - registration step 1

use actix_web::{web, HttpResponse};
use validator::Validate;

use vt_core::repositories::{AttemptRepository, ClientRepository, TokenRepository};
use vt_core::services::registration::{RegistrationOutcome, RegistrationRequest};
use vt_core::services::verification::MessageSender;
use vt_shared::types::ApiResponse;

use crate::dto::{RegisterRequest, RegisteredResponse};
use crate::handlers::{domain_error_response, validation_error_response};

use super::AppState;

pub async fn register<C, T, A, M>(
    state: web::Data<AppState<C, T, A, M>>,
    request: web::Json<RegisterRequest>,
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

    let outcome = state
        .registration
        .register(RegistrationRequest {
            document_type: request.tipo_documento,
            document: request.documento,
            check_digit: request.dv,
            given_names: request.nombres,
            paternal_surname: request.ap_paterno,
            maternal_surname: request.ap_materno,
        })
        .await;

    match outcome {
        Ok(RegistrationOutcome::Created(client)) => HttpResponse::Created().json(
            ApiResponse::new(
                "Client created",
                RegisteredResponse {
                    id: client.id,
                    resumed: false,
                },
            ),
        ),
        Ok(RegistrationOutcome::Resumed(client)) => HttpResponse::Ok().json(ApiResponse::new(
            "Unfinished registration resumed",
            RegisteredResponse {
                id: client.id,
                resumed: true,
            },
        )),
        Err(error) => domain_error_response(&error),
    }
}
