//! Tipos de erro da crate.
//!
//! [`DemandasError`] separa falhas de configuração/esquema (status ou nível de
//! acesso desconhecidos, valores monetários inválidos) das falhas de I/O do
//! binário. Ausências esperadas, como uma ação não configurada, não são erros:
//! voltam como valores sentinela.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DemandasError {
    /// Status fora do registro fixo de [`WorkflowStatus`](crate::workflow::WorkflowStatus).
    #[error("Unknown workflow status: {0}")]
    UnknownStatus(String),

    #[error("Unknown access level: {0}")]
    UnknownAccessLevel(String),

    #[error("Invalid currency amount: {0}")]
    InvalidCurrency(String),

    #[error("Demand code sequence exhausted after {0}")]
    CodeSequenceExhausted(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, DemandasError>;
