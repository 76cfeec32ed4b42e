//! Shared helpers for integration tests: an in-memory `PessoaStore` and a
//! router wired against it.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use pessoa_api::cep_client::CepClient;
use pessoa_api::errors::StorageError;
use pessoa_api::handlers::AppState;
use pessoa_api::models::{NovaPessoa, Pessoa};
use pessoa_api::routes::build_router;
use pessoa_api::storage::PessoaStore;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tower::ServiceExt;

/// How every call of a failing store fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    /// Unclassified database error.
    Database,
    /// An integrity constraint rejects the statement.
    Constraint,
}

/// In-memory store enforcing CPF uniqueness like the `pessoa` table does.
#[derive(Default)]
pub struct InMemoryStore {
    rows: Mutex<Vec<Pessoa>>,
    next_id: Mutex<i32>,
    /// When set, every call fails this way.
    pub failure: Option<Failure>,
}

impl InMemoryStore {
    pub fn failing(failure: Failure) -> Self {
        Self {
            failure: Some(failure),
            ..Default::default()
        }
    }

    pub fn broken() -> Self {
        Self::failing(Failure::Database)
    }

    pub fn constrained() -> Self {
        Self::failing(Failure::Constraint)
    }

    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    fn check(&self) -> Result<(), StorageError> {
        match self.failure {
            None => Ok(()),
            Some(Failure::Database) => Err(StorageError::Database(sqlx::Error::PoolTimedOut)),
            Some(Failure::Constraint) => Err(StorageError::ConstraintViolation(
                "violates foreign key constraint".to_string(),
            )),
        }
    }
}

#[async_trait]
impl PessoaStore for InMemoryStore {
    async fn create(&self, pessoa: &NovaPessoa) -> Result<Pessoa, StorageError> {
        self.check()?;
        let mut rows = self.rows.lock().unwrap();
        if rows.iter().any(|p| p.cpf == pessoa.cpf) {
            return Err(StorageError::UniqueViolation);
        }
        let mut next_id = self.next_id.lock().unwrap();
        *next_id += 1;
        let created = Pessoa {
            id: *next_id,
            nome: pessoa.nome.clone(),
            cpf: pessoa.cpf.clone(),
            cep: pessoa.cep.clone(),
            rua: pessoa.rua.clone(),
            bairro: pessoa.bairro.clone(),
            cidade: pessoa.cidade.clone(),
            estado: pessoa.estado.clone(),
        };
        rows.push(created.clone());
        Ok(created)
    }

    async fn list_all(&self) -> Result<Vec<Pessoa>, StorageError> {
        self.check()?;
        Ok(self.rows.lock().unwrap().clone())
    }

    async fn find_by_cpf(&self, cpf: &str) -> Result<Pessoa, StorageError> {
        self.check()?;
        self.rows
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.cpf == cpf)
            .cloned()
            .ok_or(StorageError::NotFound)
    }

    async fn update_cpf(&self, old_cpf: &str, new_cpf: &str) -> Result<Pessoa, StorageError> {
        self.check()?;
        let mut rows = self.rows.lock().unwrap();
        let idx = rows
            .iter()
            .position(|p| p.cpf == old_cpf)
            .ok_or(StorageError::NotFound)?;
        if rows.iter().enumerate().any(|(i, p)| i != idx && p.cpf == new_cpf) {
            return Err(StorageError::UniqueViolation);
        }
        rows[idx].cpf = new_cpf.to_string();
        Ok(rows[idx].clone())
    }

    async fn update_fields(&self, pessoa: &NovaPessoa) -> Result<Pessoa, StorageError> {
        self.check()?;
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|p| p.cpf == pessoa.cpf)
            .ok_or(StorageError::NotFound)?;
        row.nome = pessoa.nome.clone();
        row.cep = pessoa.cep.clone();
        row.rua = pessoa.rua.clone();
        row.bairro = pessoa.bairro.clone();
        row.cidade = pessoa.cidade.clone();
        row.estado = pessoa.estado.clone();
        Ok(row.clone())
    }

    async fn delete(&self, cpf: &str) -> Result<(), StorageError> {
        self.check()?;
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|p| p.cpf != cpf);
        if rows.len() == before {
            return Err(StorageError::NotFound);
        }
        Ok(())
    }
}

/// Router over the given store, with the CEP client pointed at `cep_base_url`.
pub fn app_with(store: Arc<InMemoryStore>, cep_base_url: &str) -> Router {
    let cep_client = CepClient::new(cep_base_url.to_string(), Duration::from_secs(2))
        .expect("CEP client");
    build_router(Arc::new(AppState { store, cep_client }))
}

/// Router over a fresh empty store. The CEP upstream is unreachable.
pub fn app() -> (Router, Arc<InMemoryStore>) {
    let store = Arc::new(InMemoryStore::default());
    (app_with(store.clone(), "http://127.0.0.1:9"), store)
}

/// Sends one request and returns status plus parsed JSON body (`Null` if empty).
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
    };
    (status, json)
}

pub fn ana() -> serde_json::Value {
    serde_json::json!({
        "nome": "Ana",
        "cpf": "1",
        "cep": "1",
        "rua": "A",
        "bairro": "B",
        "cidade": "C",
        "estado": "D"
    })
}
