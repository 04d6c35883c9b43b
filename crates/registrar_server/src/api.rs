use crate::state::AppState;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use registrar_core::prelude::*;
use registrar_engine::CreateDefinitionRequest;
use serde_json::json;
use tracing::error;

pub struct ApiError(anyhow::Error);

impl<E> From<E> for ApiError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

fn rejection(status: StatusCode, reason: &str, message: String) -> Response {
    (
        status,
        Json(json!({
            "error": reason,
            "message": message,
        })),
    )
        .into_response()
}

fn internal(reason: &str) -> Response {
    rejection(
        StatusCode::INTERNAL_SERVER_ERROR,
        reasons::INTERNAL,
        reason.to_string(),
    )
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let Some(err) = self.0.downcast_ref::<DefinitionError>() {
            let status = match err {
                DefinitionError::Content(ContentError::NotFound(_)) => StatusCode::NOT_FOUND,
                DefinitionError::Ledger(LedgerError::Rejected(_)) => StatusCode::BAD_GATEWAY,
                _ => match err.kind() {
                    ErrorKind::Validation | ErrorKind::Participant => StatusCode::BAD_REQUEST,
                    ErrorKind::Conflict | ErrorKind::InvariantViolation => StatusCode::CONFLICT,
                    ErrorKind::MalformedContent => StatusCode::UNPROCESSABLE_ENTITY,
                    ErrorKind::Collaborator => {
                        error!("Internal Server DefinitionError: {:?}", self.0);
                        return internal("Asset Definition Error");
                    }
                },
            };
            return rejection(status, err.reason(), err.to_string());
        }

        if let Some(err) = self.0.downcast_ref::<RegistryError>() {
            return match err {
                RegistryError::IllegalTransition { .. } => rejection(
                    StatusCode::CONFLICT,
                    reasons::IDENTIFIER_CONFLICT,
                    err.to_string(),
                ),
                _ => {
                    error!("Internal Server RegistryError: {:?}", self.0);
                    internal("Registry Error")
                }
            };
        }

        error!("Internal Server Error: {:?}", self.0);
        internal("Internal Server Error")
    }
}

#[derive(serde::Deserialize)]
pub struct CreateParams {
    #[serde(default)]
    sync: bool,
}

/// POST /asset-definitions
pub async fn create_definition<S: RegistrarServices>(
    State(state): State<AppState<S>>,
    Query(params): Query<CreateParams>,
    Json(mut request): Json<CreateDefinitionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    request.mode = if params.sync {
        SubmitMode::Sync
    } else {
        SubmitMode::Async
    };

    let id = state.engine().request_definition_creation(request).await?;

    let status = if params.sync {
        StatusCode::OK
    } else {
        StatusCode::ACCEPTED
    };

    Ok((status, Json(json!({ "assetDefinitionID": id }))))
}

#[derive(serde::Deserialize)]
pub struct ListParams {
    #[serde(default)]
    skip: usize,
    #[serde(default = "default_limit")]
    limit: usize,
}

fn default_limit() -> usize {
    100
}

/// GET /asset-definitions
pub async fn list_definitions<S: RegistrarServices>(
    State(state): State<AppState<S>>,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, ApiError> {
    let records = state.engine().list(params.skip, params.limit).await?;
    Ok(Json(records))
}

/// GET /asset-definitions/count
pub async fn count_definitions<S: RegistrarServices>(
    State(state): State<AppState<S>>,
) -> Result<impl IntoResponse, ApiError> {
    let count = state.engine().count().await?;
    Ok(Json(json!({ "count": count })))
}

/// GET /asset-definitions/{id}
pub async fn get_definition<S: RegistrarServices>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let Ok(id) = id.parse::<DefinitionId>() else {
        return Ok(rejection(
            StatusCode::BAD_REQUEST,
            reasons::INVALID_ID,
            format!("Invalid asset definition ID '{id}'"),
        ));
    };

    let res = match state.engine().get(&id).await? {
        Some(record) => Json(record).into_response(),
        None => rejection(
            StatusCode::NOT_FOUND,
            reasons::NOT_FOUND,
            format!("Asset definition {id} not found"),
        ),
    };

    Ok(res)
}
