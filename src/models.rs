use crate::errors::ValidationError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::sync::OnceLock;
use utoipa::{IntoParams, ToSchema};

/// Column widths of the `pessoa` table.
pub const NOME_MAX_LEN: usize = 60;
pub const CPF_MAX_LEN: usize = 15;
pub const CEP_MAX_LEN: usize = 9;
pub const RUA_MAX_LEN: usize = 20;
pub const BAIRRO_MAX_LEN: usize = 15;
pub const CIDADE_MAX_LEN: usize = 15;
pub const ESTADO_MAX_LEN: usize = 15;

// ============ Database Models ============

/// A registered person, as stored in the `pessoa` table.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Pessoa {
    /// Surrogate key, never exposed through the API.
    #[sqlx(rename = "id_pessoa")]
    pub id: i32,
    pub nome: String,
    /// CPF, the business key. Unique across the table.
    pub cpf: String,
    pub cep: String,
    pub rua: String,
    pub bairro: String,
    pub cidade: String,
    pub estado: String,
}

/// A validated person payload, ready to be inserted or applied as an update.
///
/// On update, `cpf` only selects the record; it is never written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NovaPessoa {
    pub nome: String,
    pub cpf: String,
    pub cep: String,
    pub rua: String,
    pub bairro: String,
    pub cidade: String,
    pub estado: String,
}

// ============ API Request Models ============

/// Body of `POST /pessoa` and `PUT /pessoa_atualiza`.
///
/// Missing fields deserialize as empty strings and are rejected by [`PessoaRequest::validate`].
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(default)]
pub struct PessoaRequest {
    #[schema(example = "Joao da Silva")]
    pub nome: String,
    #[schema(example = "123456789-10")]
    pub cpf: String,
    #[schema(example = "20021-000")]
    pub cep: String,
    #[schema(example = "Rua Alguma coisa")]
    pub rua: String,
    #[schema(example = "Baixo algum")]
    pub bairro: String,
    #[schema(example = "Rio de Janeiro")]
    pub cidade: String,
    #[schema(example = "RJ")]
    pub estado: String,
}

impl PessoaRequest {
    /// Checks presence and column width of every field.
    pub fn validate(self) -> Result<NovaPessoa, ValidationError> {
        check_field("nome", &self.nome, NOME_MAX_LEN)?;
        validate_cpf(&self.cpf)?;
        check_field("cep", &self.cep, CEP_MAX_LEN)?;
        check_field("rua", &self.rua, RUA_MAX_LEN)?;
        check_field("bairro", &self.bairro, BAIRRO_MAX_LEN)?;
        check_field("cidade", &self.cidade, CIDADE_MAX_LEN)?;
        check_field("estado", &self.estado, ESTADO_MAX_LEN)?;

        Ok(NovaPessoa {
            nome: self.nome,
            cpf: self.cpf,
            cep: self.cep,
            rua: self.rua,
            bairro: self.bairro,
            cidade: self.cidade,
            estado: self.estado,
        })
    }
}

/// Query string carrying the CPF of the person to act on.
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CpfQuery {
    /// CPF of the person.
    #[param(example = "111111111-11")]
    pub cpf: String,
}

/// Body of `PUT /pessoa_atualiza_cpf`.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(default)]
pub struct CpfUpdateRequest {
    /// The new CPF.
    #[schema(example = "111111111-11")]
    pub cpf: String,
}

/// Query string of `GET /pessoa_cep`.
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CepQuery {
    /// CEP in the `XXXXX-XXX` format.
    #[param(example = "20021-000")]
    pub cep: String,
}

// ============ API Response Models ============

/// Public representation of a person (no surrogate id).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PessoaView {
    #[schema(example = "Joao da Silva")]
    pub nome: String,
    #[schema(example = "123456789-10")]
    pub cpf: String,
    #[schema(example = "20021-000")]
    pub cep: String,
    #[schema(example = "Rua Alguma coisa")]
    pub rua: String,
    #[schema(example = "Baixo algum")]
    pub bairro: String,
    #[schema(example = "Rio de Janeiro")]
    pub cidade: String,
    #[schema(example = "RJ")]
    pub estado: String,
}

/// Every registered person.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PessoasListView {
    pub pessoas: Vec<PessoaView>,
}

/// Address resolved from a CEP, in the service's own field names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct EnderecoView {
    #[serde(rename = "Rua")]
    #[schema(example = "Rua Alguma coisa")]
    pub rua: String,
    #[serde(rename = "Bairro")]
    #[schema(example = "Bairro CX")]
    pub bairro: String,
    #[serde(rename = "Cidade")]
    #[schema(example = "Rio de Janeiro")]
    pub cidade: String,
    #[serde(rename = "Estado")]
    #[schema(example = "RJ")]
    pub estado: String,
}

/// Confirmation or error message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

// ============ CEP API Models ============

/// Body returned by the CEP upstream. Extra fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiCepResponse {
    pub address: String,
    pub district: String,
    pub city: String,
    pub state: String,
}

// ============ Validation ============

fn check_field(field: &'static str, value: &str, max: usize) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Missing(field));
    }
    if value.chars().count() > max {
        return Err(ValidationError::TooLong { field, max });
    }
    Ok(())
}

/// Applies the CPF field rules on their own (query parameters, identity update).
pub fn validate_cpf(cpf: &str) -> Result<(), ValidationError> {
    check_field("cpf", cpf, CPF_MAX_LEN)
}

fn cep_regex() -> &'static Regex {
    static CEP_REGEX: OnceLock<Regex> = OnceLock::new();
    CEP_REGEX.get_or_init(|| Regex::new(r"^(\d{5})-?(\d{3})$").expect("valid CEP regex"))
}

/// Accepts `XXXXX-XXX` or eight bare digits and returns the hyphenated form.
pub fn validate_cep(cep: &str) -> Result<String, ValidationError> {
    let cep = cep.trim();
    if cep.is_empty() {
        return Err(ValidationError::Missing("cep"));
    }
    let caps = cep_regex()
        .captures(cep)
        .ok_or(ValidationError::Malformed {
            field: "cep",
            expected: "XXXXX-XXX",
        })?;
    Ok(format!("{}-{}", &caps[1], &caps[2]))
}
