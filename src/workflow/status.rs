use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DemandasError;

/// Fine-grained status of a demand as stored by the data layer.
///
/// The variant set is closed: every status the pipeline can hold is listed in
/// [`WorkflowStatus::ALL`]. Wire strings keep the stored spelling
/// (`Aguardando_Gerente`, `StandBy`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum WorkflowStatus {
    Backlog,
    Novas,
    #[serde(rename = "Aguardando_Gerente")]
    AguardandoGerente,
    #[serde(rename = "Aprovado_GP")]
    AprovadoGp,
    #[serde(rename = "Aguardando_Validacao_TI")]
    AguardandoValidacaoTi,
    #[serde(rename = "Aguardando_Comite")]
    AguardandoComite,
    #[serde(rename = "Aprovado_Comite")]
    AprovadoComite,
    #[serde(rename = "Alteracao_Escopo")]
    AlteracaoEscopo,
    #[serde(rename = "Em_Progresso")]
    EmProgresso,
    StandBy,
    Bloqueado,
    Concluido,
    Arquivado,
    Recusado,
    Cancelado,
}

impl WorkflowStatus {
    /// Static registry of every known status, in pipeline order.
    pub const ALL: [WorkflowStatus; 15] = [
        WorkflowStatus::Backlog,
        WorkflowStatus::Novas,
        WorkflowStatus::AguardandoGerente,
        WorkflowStatus::AprovadoGp,
        WorkflowStatus::AguardandoValidacaoTi,
        WorkflowStatus::AguardandoComite,
        WorkflowStatus::AprovadoComite,
        WorkflowStatus::AlteracaoEscopo,
        WorkflowStatus::EmProgresso,
        WorkflowStatus::StandBy,
        WorkflowStatus::Bloqueado,
        WorkflowStatus::Concluido,
        WorkflowStatus::Arquivado,
        WorkflowStatus::Recusado,
        WorkflowStatus::Cancelado,
    ];

    /// Stored spelling of the status.
    pub fn as_str(self) -> &'static str {
        match self {
            WorkflowStatus::Backlog => "Backlog",
            WorkflowStatus::Novas => "Novas",
            WorkflowStatus::AguardandoGerente => "Aguardando_Gerente",
            WorkflowStatus::AprovadoGp => "Aprovado_GP",
            WorkflowStatus::AguardandoValidacaoTi => "Aguardando_Validacao_TI",
            WorkflowStatus::AguardandoComite => "Aguardando_Comite",
            WorkflowStatus::AprovadoComite => "Aprovado_Comite",
            WorkflowStatus::AlteracaoEscopo => "Alteracao_Escopo",
            WorkflowStatus::EmProgresso => "Em_Progresso",
            WorkflowStatus::StandBy => "StandBy",
            WorkflowStatus::Bloqueado => "Bloqueado",
            WorkflowStatus::Concluido => "Concluido",
            WorkflowStatus::Arquivado => "Arquivado",
            WorkflowStatus::Recusado => "Recusado",
            WorkflowStatus::Cancelado => "Cancelado",
        }
    }

    /// Rótulo legível para exibição no quadro.
    pub fn label(self) -> &'static str {
        match self {
            WorkflowStatus::Backlog => "Backlog",
            WorkflowStatus::Novas => "Novas",
            WorkflowStatus::AguardandoGerente => "Aguardando Gerente",
            WorkflowStatus::AprovadoGp => "Aprovado pelo GP",
            WorkflowStatus::AguardandoValidacaoTi => "Aguardando Validação de TI",
            WorkflowStatus::AguardandoComite => "Aguardando Comitê",
            WorkflowStatus::AprovadoComite => "Aprovado pelo Comitê",
            WorkflowStatus::AlteracaoEscopo => "Alteração de Escopo",
            WorkflowStatus::EmProgresso => "Em Progresso",
            WorkflowStatus::StandBy => "Stand By",
            WorkflowStatus::Bloqueado => "Bloqueado",
            WorkflowStatus::Concluido => "Concluído",
            WorkflowStatus::Arquivado => "Arquivado",
            WorkflowStatus::Recusado => "Recusado",
            WorkflowStatus::Cancelado => "Cancelado",
        }
    }
}

impl fmt::Display for WorkflowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WorkflowStatus {
    type Err = DemandasError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        WorkflowStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| DemandasError::UnknownStatus(s.to_string()))
    }
}

/// Coarse lifecycle phase; one Kanban column per variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsolidatedStatus {
    Backlog,
    AwaitingApproval,
    Approved,
    InProgress,
    Standby,
    Completed,
    Rejected,
}

impl ConsolidatedStatus {
    /// Column order of the board.
    pub const ALL: [ConsolidatedStatus; 7] = [
        ConsolidatedStatus::Backlog,
        ConsolidatedStatus::AwaitingApproval,
        ConsolidatedStatus::Approved,
        ConsolidatedStatus::InProgress,
        ConsolidatedStatus::Standby,
        ConsolidatedStatus::Completed,
        ConsolidatedStatus::Rejected,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ConsolidatedStatus::Backlog => "backlog",
            ConsolidatedStatus::AwaitingApproval => "awaiting_approval",
            ConsolidatedStatus::Approved => "approved",
            ConsolidatedStatus::InProgress => "in_progress",
            ConsolidatedStatus::Standby => "standby",
            ConsolidatedStatus::Completed => "completed",
            ConsolidatedStatus::Rejected => "rejected",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ConsolidatedStatus::Backlog => "Backlog",
            ConsolidatedStatus::AwaitingApproval => "Aguardando Aprovação",
            ConsolidatedStatus::Approved => "Aprovado",
            ConsolidatedStatus::InProgress => "Em Progresso",
            ConsolidatedStatus::Standby => "Stand By",
            ConsolidatedStatus::Completed => "Concluído",
            ConsolidatedStatus::Rejected => "Recusado",
        }
    }

    /// Cor do cartão no quadro, em hexadecimal.
    pub fn color(self) -> &'static str {
        match self {
            ConsolidatedStatus::Backlog => "#6B7280",
            ConsolidatedStatus::AwaitingApproval => "#F59E0B",
            ConsolidatedStatus::Approved => "#3B82F6",
            ConsolidatedStatus::InProgress => "#8B5CF6",
            ConsolidatedStatus::Standby => "#F97316",
            ConsolidatedStatus::Completed => "#10B981",
            ConsolidatedStatus::Rejected => "#EF4444",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            ConsolidatedStatus::Backlog => "Demanda registrada, ainda não enviada para aprovação",
            ConsolidatedStatus::AwaitingApproval => {
                "Demanda em análise nas etapas de aprovação (Gerente, GP, TI e Comitê)"
            }
            ConsolidatedStatus::Approved => "Demanda aprovada pelo Comitê, aguardando início",
            ConsolidatedStatus::InProgress => "Demanda em execução pela equipe responsável",
            ConsolidatedStatus::Standby => "Demanda pausada ou bloqueada temporariamente",
            ConsolidatedStatus::Completed => "Demanda finalizada ou arquivada",
            ConsolidatedStatus::Rejected => "Demanda recusada ou cancelada",
        }
    }
}

impl fmt::Display for ConsolidatedStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConsolidatedStatus {
    type Err = DemandasError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ConsolidatedStatus::ALL
            .into_iter()
            .find(|bucket| bucket.as_str() == s)
            .ok_or_else(|| DemandasError::UnknownStatus(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_is_complete_and_unique() {
        let mut seen = std::collections::HashSet::new();
        for status in WorkflowStatus::ALL {
            assert!(seen.insert(status.as_str()), "duplicate {status}");
        }
        assert_eq!(seen.len(), 15);
    }

    #[test]
    fn parse_accepts_stored_spelling() {
        for status in WorkflowStatus::ALL {
            assert_eq!(status.as_str().parse::<WorkflowStatus>().unwrap(), status);
        }
    }

    #[test]
    fn parse_rejects_unknown() {
        let err = "Aguardando_Diretoria".parse::<WorkflowStatus>().unwrap_err();
        assert!(matches!(err, DemandasError::UnknownStatus(s) if s == "Aguardando_Diretoria"));
        assert!("em_progresso".parse::<WorkflowStatus>().is_err());
    }

    #[test]
    fn serde_uses_stored_spelling() {
        let json = serde_json::to_string(&WorkflowStatus::AguardandoValidacaoTi).unwrap();
        assert_eq!(json, "\"Aguardando_Validacao_TI\"");
        let back: WorkflowStatus = serde_json::from_str("\"Aprovado_GP\"").unwrap();
        assert_eq!(back, WorkflowStatus::AprovadoGp);
    }

    #[test]
    fn consolidated_serializes_snake_case() {
        let json = serde_json::to_string(&ConsolidatedStatus::AwaitingApproval).unwrap();
        assert_eq!(json, "\"awaiting_approval\"");
        assert_eq!(
            "in_progress".parse::<ConsolidatedStatus>().unwrap(),
            ConsolidatedStatus::InProgress
        );
    }

    #[test]
    fn display_matches_wire() {
        assert_eq!(WorkflowStatus::EmProgresso.to_string(), "Em_Progresso");
        assert_eq!(ConsolidatedStatus::Standby.to_string(), "standby");
    }
}
