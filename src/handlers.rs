use crate::cep_client::CepClient;
use crate::errors::{AppError, ResultExt, StorageError};
use crate::models::*;
use crate::storage::PessoaStore;
use crate::views::{to_address_view, to_view, to_view_list};
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::StatusCode,
    response::Redirect,
    Json,
};
use serde_json::json;
use std::sync::Arc;

/// Shared application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    /// Person persistence. Each call checks out its own pooled connection.
    pub store: Arc<dyn PessoaStore>,
    /// Client for the CEP lookup upstream.
    pub cep_client: CepClient,
}

const NOT_FOUND_MSG: &str = "pessoa não encontrada na base";

/// Turns an extractor rejection (malformed JSON, missing query parameter)
/// into the service's JSON error body.
fn rejected(err: impl std::fmt::Display) -> AppError {
    AppError::BadRequest(format!("Requisição inválida: {}", err))
}

/// Failures outside the mapping table of the calling handler.
fn unclassified(err: StorageError) -> AppError {
    match err {
        StorageError::Database(e) => AppError::DatabaseError(e),
        other => AppError::InternalError(other.to_string()),
    }
}

/// GET /
///
/// Redirects to the Swagger UI.
#[utoipa::path(
    get,
    path = "/",
    tag = "Documentação",
    responses((status = 303, description = "Redirect to the documentation UI"))
)]
pub async fn home() -> Redirect {
    Redirect::to("/docs")
}

/// Health check endpoint.
///
/// Returns the service status, version, and health information.
pub async fn health() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": "pessoa-api",
            "version": env!("CARGO_PKG_VERSION")
        })),
    )
}

/// POST /pessoa
///
/// Adds a new person. Fails with 409 when the CPF is already registered.
#[utoipa::path(
    post,
    path = "/pessoa",
    tag = "Pessoa",
    request_body = PessoaRequest,
    responses(
        (status = 200, description = "Person created", body = PessoaView),
        (status = 409, description = "CPF already registered", body = MessageResponse),
        (status = 400, description = "Invalid input or storage failure", body = MessageResponse)
    )
)]
pub async fn create_person(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<PessoaRequest>, JsonRejection>,
) -> Result<Json<PessoaView>, AppError> {
    let Json(request) = payload.map_err(rejected)?;
    let nova = request.validate()?;
    tracing::debug!("Adding pessoa '{}'", nova.nome);

    match state.store.create(&nova).await {
        Ok(pessoa) => {
            tracing::info!("Added pessoa '{}' (cpf {})", pessoa.nome, pessoa.cpf);
            Ok(Json(to_view(&pessoa)))
        }
        Err(StorageError::UniqueViolation) => {
            tracing::warn!("Duplicate cpf while adding pessoa '{}'", nova.nome);
            Err(AppError::Conflict(
                "pessoa de mesmo cpf já salva na base".to_string(),
            ))
        }
        Err(e) => {
            tracing::warn!("Failed to add pessoa '{}': {}", nova.nome, e);
            Err(AppError::BadRequest(
                "Não foi possível salvar novo item".to_string(),
            ))
        }
    }
}

/// GET /pessoas
///
/// Lists every registered person. An empty base is a success.
#[utoipa::path(
    get,
    path = "/pessoas",
    tag = "Pessoa",
    responses((status = 200, description = "All persons", body = PessoasListView))
)]
pub async fn list_persons(
    State(state): State<Arc<AppState>>,
) -> Result<Json<PessoasListView>, AppError> {
    tracing::debug!("Listing pessoas");

    let pessoas = state
        .store
        .list_all()
        .await
        .map_err(unclassified)
        .context("listing pessoas")?;
    tracing::debug!("{} pessoas found", pessoas.len());

    Ok(Json(to_view_list(&pessoas)))
}

/// GET /pessoa?cpf=
///
/// Reads a person by CPF.
#[utoipa::path(
    get,
    path = "/pessoa",
    tag = "Pessoa",
    params(CpfQuery),
    responses(
        (status = 200, description = "Person found", body = PessoaView),
        (status = 404, description = "No person with this CPF", body = MessageResponse)
    )
)]
pub async fn get_person(
    State(state): State<Arc<AppState>>,
    query: Result<Query<CpfQuery>, QueryRejection>,
) -> Result<Json<PessoaView>, AppError> {
    let Query(CpfQuery { cpf }) = query.map_err(rejected)?;
    tracing::debug!("Fetching pessoa with cpf {}", cpf);

    match state.store.find_by_cpf(&cpf).await {
        Ok(pessoa) => {
            tracing::info!("Loaded pessoa '{}'", pessoa.nome);
            Ok(Json(to_view(&pessoa)))
        }
        Err(StorageError::NotFound) => {
            tracing::warn!("No pessoa with cpf {}", cpf);
            Err(AppError::NotFound(NOT_FOUND_MSG.to_string()))
        }
        Err(e) => Err(unclassified(e)).with_context(|| format!("fetching pessoa {}", cpf)),
    }
}

/// PUT /pessoa_atualiza_cpf?cpf=
///
/// Changes only the CPF of a person. The current CPF comes in the query
/// string and the new one in the body.
///
/// A collision with another person's CPF is reported as 404, same as a
/// missing person.
#[utoipa::path(
    put,
    path = "/pessoa_atualiza_cpf",
    tag = "Pessoa",
    params(CpfQuery),
    request_body = CpfUpdateRequest,
    responses(
        (status = 200, description = "CPF changed", body = PessoaView),
        (status = 404, description = "No person with this CPF, or new CPF taken", body = MessageResponse),
        (status = 400, description = "Invalid input or storage failure", body = MessageResponse)
    )
)]
pub async fn update_cpf(
    State(state): State<Arc<AppState>>,
    query: Result<Query<CpfQuery>, QueryRejection>,
    payload: Result<Json<CpfUpdateRequest>, JsonRejection>,
) -> Result<Json<PessoaView>, AppError> {
    let Query(CpfQuery { cpf: old_cpf }) = query.map_err(rejected)?;
    let Json(CpfUpdateRequest { cpf: new_cpf }) = payload.map_err(rejected)?;
    validate_cpf(&new_cpf)?;
    tracing::debug!("Changing cpf {} to {}", old_cpf, new_cpf);

    match state.store.update_cpf(&old_cpf, &new_cpf).await {
        Ok(pessoa) => {
            tracing::info!("Changed cpf of pessoa '{}' to {}", pessoa.nome, pessoa.cpf);
            Ok(Json(to_view(&pessoa)))
        }
        Err(StorageError::NotFound) => {
            tracing::warn!("No pessoa with cpf {}", old_cpf);
            Err(AppError::NotFound(NOT_FOUND_MSG.to_string()))
        }
        Err(StorageError::UniqueViolation) | Err(StorageError::ConstraintViolation(_)) => {
            tracing::warn!("Cannot change cpf {} to {}: already in use", old_cpf, new_cpf);
            Err(AppError::NotFound(
                "Não foi possível alterar o cpf da pessoa. Verifique se o campo cpf está correto."
                    .to_string(),
            ))
        }
        Err(e) => {
            tracing::warn!("Failed to change cpf {}: {}", old_cpf, e);
            Err(AppError::BadRequest("Erro ao atualizar o cpf".to_string()))
        }
    }
}

/// PUT /pessoa_atualiza
///
/// Replaces every field of a person except the CPF, which selects the record.
/// Use `/pessoa_atualiza_cpf` to change the CPF itself.
#[utoipa::path(
    put,
    path = "/pessoa_atualiza",
    tag = "Pessoa",
    request_body = PessoaRequest,
    responses(
        (status = 200, description = "Person updated", body = PessoaView),
        (status = 404, description = "No person with this CPF", body = MessageResponse),
        (status = 400, description = "Invalid input or storage failure", body = MessageResponse)
    )
)]
pub async fn update_person(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<PessoaRequest>, JsonRejection>,
) -> Result<Json<PessoaView>, AppError> {
    let Json(request) = payload.map_err(rejected)?;
    let nova = request.validate()?;
    tracing::debug!("Updating pessoa with cpf {}", nova.cpf);

    match state.store.update_fields(&nova).await {
        Ok(pessoa) => {
            tracing::info!("Updated pessoa '{}' (cpf {})", pessoa.nome, pessoa.cpf);
            Ok(Json(to_view(&pessoa)))
        }
        Err(StorageError::NotFound) => {
            tracing::warn!("No pessoa with cpf {}", nova.cpf);
            Err(AppError::NotFound(NOT_FOUND_MSG.to_string()))
        }
        Err(StorageError::UniqueViolation) | Err(StorageError::ConstraintViolation(_)) => {
            tracing::warn!("Integrity failure updating pessoa {}", nova.cpf);
            Err(AppError::NotFound(
                "Não foi possível alterar os dados da pessoa. Verifique se o campo cpf está correto."
                    .to_string(),
            ))
        }
        Err(e) => {
            tracing::warn!("Failed to update pessoa {}: {}", nova.cpf, e);
            Err(AppError::BadRequest(
                "Erro ao atualizar os dados da pessoa".to_string(),
            ))
        }
    }
}

/// DELETE /pessoa_excluir?cpf=
///
/// Physically removes a person.
#[utoipa::path(
    delete,
    path = "/pessoa_excluir",
    tag = "Pessoa",
    params(CpfQuery),
    responses(
        (status = 200, description = "Person removed", body = MessageResponse),
        (status = 404, description = "No person with this CPF", body = MessageResponse),
        (status = 409, description = "Removal blocked by a constraint", body = MessageResponse),
        (status = 400, description = "Invalid input or storage failure", body = MessageResponse)
    )
)]
pub async fn delete_person(
    State(state): State<Arc<AppState>>,
    query: Result<Query<CpfQuery>, QueryRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    let Query(CpfQuery { cpf }) = query.map_err(rejected)?;
    tracing::debug!("Removing pessoa with cpf {}", cpf);

    match state.store.delete(&cpf).await {
        Ok(()) => {
            tracing::info!("Removed pessoa with cpf {}", cpf);
            Ok(Json(MessageResponse {
                message: format!("pessoa excluída com sucesso: '{}'", cpf),
            }))
        }
        Err(StorageError::NotFound) => {
            tracing::warn!("No pessoa with cpf {}", cpf);
            Err(AppError::NotFound(format!("{}: '{}'", NOT_FOUND_MSG, cpf)))
        }
        Err(StorageError::UniqueViolation) | Err(StorageError::ConstraintViolation(_)) => {
            tracing::warn!("Constraint blocked removal of pessoa {}", cpf);
            Err(AppError::Conflict(
                "Não foi possível excluir a pessoa. Verifique se o campo cpf está correto."
                    .to_string(),
            ))
        }
        Err(e) => {
            tracing::warn!("Failed to remove pessoa {}: {}", cpf, e);
            Err(AppError::BadRequest(format!(
                "Erro ao excluir os dados da pessoa '{}'",
                cpf
            )))
        }
    }
}

/// GET /pessoa_cep?cep=
///
/// Resolves street, district, city and state of a CEP through the external
/// CEP API. Any upstream failure, and any CEP not shaped `XXXXX-XXX` or
/// 8 digits, is reported as 404.
#[utoipa::path(
    get,
    path = "/pessoa_cep",
    tag = "Pessoa",
    params(CepQuery),
    responses(
        (status = 200, description = "Address found", body = EnderecoView),
        (status = 404, description = "No address for this CEP", body = MessageResponse)
    )
)]
pub async fn lookup_address(
    State(state): State<Arc<AppState>>,
    query: Result<Query<CepQuery>, QueryRejection>,
) -> Result<Json<EnderecoView>, AppError> {
    let Query(CepQuery { cep }) = query.map_err(rejected)?;
    // Malformed input never reaches the upstream URL; it is an unknown CEP.
    let cep = validate_cep(&cep).map_err(|e| AppError::UpstreamUnavailable(e.to_string()))?;

    let endereco = state.cep_client.lookup(&cep).await?;

    Ok(Json(to_address_view(endereco)))
}
