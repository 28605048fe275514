use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, warn};

use super::credit::CreditLimitService;
use super::directory::ClientDirectory;
use super::domain::{Applicant, ClientId};
use super::repository::UserRepository;
use super::service::{RegistrationError, RegistrationOutcome, UserRegistrationService};

/// Inbound registration payload. Dates use `YYYY-MM-DD`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationRequest {
    pub first_name: String,
    pub surname: String,
    pub email: String,
    pub date_of_birth: NaiveDate,
    pub client_id: ClientId,
}

impl From<RegistrationRequest> for Applicant {
    fn from(request: RegistrationRequest) -> Self {
        Applicant {
            first_name: request.first_name,
            surname: request.surname,
            email: request.email,
            date_of_birth: request.date_of_birth,
            client_id: request.client_id,
        }
    }
}

/// Router builder exposing the registration endpoint.
pub fn registration_router<D, C, R>(service: Arc<UserRegistrationService<D, C, R>>) -> Router
where
    D: ClientDirectory + 'static,
    C: CreditLimitService + 'static,
    R: UserRepository + 'static,
{
    Router::new()
        .route("/api/v1/users", post(register_handler::<D, C, R>))
        .with_state(service)
}

pub(crate) async fn register_handler<D, C, R>(
    State(service): State<Arc<UserRegistrationService<D, C, R>>>,
    payload: Result<axum::Json<RegistrationRequest>, JsonRejection>,
) -> Response
where
    D: ClientDirectory + 'static,
    C: CreditLimitService + 'static,
    R: UserRepository + 'static,
{
    // Malformed payloads are client errors, distinct from a rejected registration.
    let request = match payload {
        Ok(axum::Json(request)) => request,
        Err(rejection) => {
            warn!(error = %rejection.body_text(), "malformed registration payload");
            let payload = json!({ "error": rejection.body_text() });
            return (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response();
        }
    };

    let today = Local::now().date_naive();
    let applicant = Applicant::from(request);

    // The credit lookup blocks on a remote answer.
    let result =
        tokio::task::spawn_blocking(move || service.register(applicant, today)).await;

    match result {
        Ok(Ok(RegistrationOutcome::Registered(user))) => {
            let payload = json!({
                "accepted": true,
                "user": user,
            });
            (StatusCode::CREATED, axum::Json(payload)).into_response()
        }
        Ok(Ok(RegistrationOutcome::Rejected(reason))) => {
            let payload = json!({
                "accepted": false,
                "reason": reason.summary(),
                "rejection": reason,
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        Ok(Err(err @ (RegistrationError::Credit(_) | RegistrationError::Directory(_)))) => {
            error!(error = %err, "registration collaborator failed");
            let payload = json!({ "error": err.to_string() });
            (StatusCode::BAD_GATEWAY, axum::Json(payload)).into_response()
        }
        Ok(Err(err)) => {
            error!(error = %err, "registration could not be stored");
            let payload = json!({ "error": err.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
        Err(join_error) => {
            error!(error = %join_error, "registration task aborted");
            let payload = json!({ "error": "registration task aborted" });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}
