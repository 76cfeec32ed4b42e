use crate::errors::StorageError;
use crate::models::{NovaPessoa, Pessoa};
use async_trait::async_trait;
use sqlx::PgPool;

/// Persistence of `Pessoa` records, keyed by CPF.
///
/// Each call runs as one statement on a connection checked out for that call only,
/// so the statement's own outcome decides existence: there is no separate
/// lookup that a concurrent request could invalidate.
#[async_trait]
pub trait PessoaStore: Send + Sync {
    /// Inserts a new record and returns it with its generated id.
    async fn create(&self, pessoa: &NovaPessoa) -> Result<Pessoa, StorageError>;

    /// Every record, in insertion order. Empty is not an error.
    async fn list_all(&self) -> Result<Vec<Pessoa>, StorageError>;

    async fn find_by_cpf(&self, cpf: &str) -> Result<Pessoa, StorageError>;

    /// Changes only the CPF of the record currently stored under `old_cpf`.
    async fn update_cpf(&self, old_cpf: &str, new_cpf: &str) -> Result<Pessoa, StorageError>;

    /// Replaces every field except the CPF of the record stored under `pessoa.cpf`.
    async fn update_fields(&self, pessoa: &NovaPessoa) -> Result<Pessoa, StorageError>;

    async fn delete(&self, cpf: &str) -> Result<(), StorageError>;
}

/// Postgres-backed store over the `pessoa` table.
pub struct PgPessoaStore {
    pool: PgPool,
}

impl PgPessoaStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const PESSOA_COLUMNS: &str = "id_pessoa, nome, cpf, cep, rua, bairro, cidade, estado";

#[async_trait]
impl PessoaStore for PgPessoaStore {
    async fn create(&self, pessoa: &NovaPessoa) -> Result<Pessoa, StorageError> {
        let created = sqlx::query_as::<_, Pessoa>(&format!(
            r#"
            INSERT INTO pessoa (nome, cpf, cep, rua, bairro, cidade, estado)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {}
            "#,
            PESSOA_COLUMNS
        ))
        .bind(&pessoa.nome)
        .bind(&pessoa.cpf)
        .bind(&pessoa.cep)
        .bind(&pessoa.rua)
        .bind(&pessoa.bairro)
        .bind(&pessoa.cidade)
        .bind(&pessoa.estado)
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!("Inserted pessoa id={} cpf={}", created.id, created.cpf);
        Ok(created)
    }

    async fn list_all(&self) -> Result<Vec<Pessoa>, StorageError> {
        let pessoas = sqlx::query_as::<_, Pessoa>(&format!(
            "SELECT {} FROM pessoa ORDER BY id_pessoa",
            PESSOA_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(pessoas)
    }

    async fn find_by_cpf(&self, cpf: &str) -> Result<Pessoa, StorageError> {
        sqlx::query_as::<_, Pessoa>(&format!(
            "SELECT {} FROM pessoa WHERE cpf = $1 LIMIT 1",
            PESSOA_COLUMNS
        ))
        .bind(cpf)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StorageError::NotFound)
    }

    async fn update_cpf(&self, old_cpf: &str, new_cpf: &str) -> Result<Pessoa, StorageError> {
        sqlx::query_as::<_, Pessoa>(&format!(
            "UPDATE pessoa SET cpf = $2 WHERE cpf = $1 RETURNING {}",
            PESSOA_COLUMNS
        ))
        .bind(old_cpf)
        .bind(new_cpf)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StorageError::NotFound)
    }

    async fn update_fields(&self, pessoa: &NovaPessoa) -> Result<Pessoa, StorageError> {
        sqlx::query_as::<_, Pessoa>(&format!(
            r#"
            UPDATE pessoa
            SET nome = $2,
                cep = $3,
                rua = $4,
                bairro = $5,
                cidade = $6,
                estado = $7
            WHERE cpf = $1
            RETURNING {}
            "#,
            PESSOA_COLUMNS
        ))
        .bind(&pessoa.cpf)
        .bind(&pessoa.nome)
        .bind(&pessoa.cep)
        .bind(&pessoa.rua)
        .bind(&pessoa.bairro)
        .bind(&pessoa.cidade)
        .bind(&pessoa.estado)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StorageError::NotFound)
    }

    async fn delete(&self, cpf: &str) -> Result<(), StorageError> {
        let result = sqlx::query("DELETE FROM pessoa WHERE cpf = $1")
            .bind(cpf)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }
        Ok(())
    }
}
