use actix_web::{error::PayloadError, web, HttpRequest, HttpResponse};

use crate::{
    entities::contact_me::ContactMeForm,
    errors::RelayError,
    utils::get_client_ip::get_client_ip,
    AppState,
};

/// The body is read raw so that an empty or loosely typed payload still
/// reaches the rate limiter and gets the missing-fields answer.
pub async fn submit_contact(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: Result<web::Bytes, actix_web::Error>,
) -> Result<HttpResponse, RelayError> {
    let body = body.map_err(body_rejection)?;
    let form = ContactMeForm::from_body(&body).map_err(|e| {
        tracing::debug!("Rejected contact body: {}", e);
        RelayError::InvalidJson
    })?;

    let client_ip = get_client_ip(&req, state.trust_forwarded_for);

    let response = state.contact_handler
        .submit(&client_ip, form)
        .await?;

    Ok(HttpResponse::Ok().json(response))
}

fn body_rejection(err: actix_web::Error) -> RelayError {
    tracing::debug!("Failed to read contact body: {}", err);
    match err.as_error::<PayloadError>() {
        Some(PayloadError::Overflow) => RelayError::PayloadTooLarge,
        _ => RelayError::InvalidJson,
    }
}

/// Cross-origin negotiation only; the CORS headers come from the app-wide
/// middleware.
pub async fn contact_preflight() -> HttpResponse {
    HttpResponse::Ok().finish()
}

pub async fn method_not_allowed() -> Result<HttpResponse, RelayError> {
    Err(RelayError::MethodNotAllowed)
}
