//! Entidade mínima de demanda usada pelo quadro e pelo gerador de códigos.
//!
//! Só os campos lidos pelas regras são modelados; o restante do registro
//! armazenado é descartado na desserialização.

use serde::{Deserialize, Serialize};

use super::consolidation::HasWorkflowStatus;
use super::status::WorkflowStatus;

/// A business request moving through the approval pipeline.
///
/// Only the fields the rules look at are modelled; the rest of the stored
/// record is ignored on deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Demanda {
    pub id: String,
    #[serde(default)]
    pub codigo: String,
    pub titulo: String,
    pub empresa: String,
    pub status: WorkflowStatus,
    /// Estimated value in centavos.
    #[serde(default)]
    pub valor_estimado: Option<i64>,
    /// Whether a TI technical review has already been recorded.
    #[serde(default)]
    pub possui_parecer_ti: bool,
}

impl HasWorkflowStatus for Demanda {
    fn workflow_status(&self) -> WorkflowStatus {
        self.status
    }
}
