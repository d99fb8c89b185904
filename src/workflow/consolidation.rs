//! Consolidação de status: do status fino da demanda para a fase do quadro.
//!
//! O mapeamento [`consolidated_of`] é total sobre [`WorkflowStatus`]; a
//! tabela [`STAGE_COMPLETION`] diz quantas etapas de aprovação já foram
//! vencidas em cada status de aprovação.

use serde::Serialize;
use tracing::debug;

use super::status::{ConsolidatedStatus, WorkflowStatus};
use crate::error::Result;

/// One step of the approval checklist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ApprovalStage {
    pub id: &'static str,
    pub label: &'static str,
    pub completed: bool,
    pub order: u8,
}

/// Approval sequence: gerente → gp → ti → comite.
const STAGES: [(&str, &str); 4] = [
    ("gerente", "Gerente"),
    ("gp", "GP"),
    ("ti", "TI"),
    ("comite", "Comitê"),
];

/// Number of leading stages already completed, per status.
///
/// Statuses missing here complete nothing, even when they sit in the
/// awaiting-approval phase.
pub const STAGE_COMPLETION: &[(WorkflowStatus, usize)] = &[
    (WorkflowStatus::AguardandoGerente, 0),
    (WorkflowStatus::AprovadoGp, 2),
    (WorkflowStatus::AguardandoValidacaoTi, 2),
    (WorkflowStatus::AguardandoComite, 3),
    (WorkflowStatus::AprovadoComite, 4),
];

/// Everything the board needs to render a status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConsolidatedStatusInfo {
    pub status: WorkflowStatus,
    pub consolidated: ConsolidatedStatus,
    pub label: &'static str,
    pub color: &'static str,
    pub description: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approval_stages: Option<Vec<ApprovalStage>>,
}

/// Anything that carries a workflow status (demands, cards, raw statuses).
pub trait HasWorkflowStatus {
    fn workflow_status(&self) -> WorkflowStatus;
}

impl HasWorkflowStatus for WorkflowStatus {
    fn workflow_status(&self) -> WorkflowStatus {
        *self
    }
}

/// Total mapping from fine-grained status to board phase.
pub fn consolidated_of(status: WorkflowStatus) -> ConsolidatedStatus {
    match status {
        WorkflowStatus::Backlog | WorkflowStatus::Novas => ConsolidatedStatus::Backlog,
        WorkflowStatus::AguardandoGerente
        | WorkflowStatus::AprovadoGp
        | WorkflowStatus::AguardandoValidacaoTi
        | WorkflowStatus::AguardandoComite
        | WorkflowStatus::AlteracaoEscopo => ConsolidatedStatus::AwaitingApproval,
        WorkflowStatus::AprovadoComite => ConsolidatedStatus::Approved,
        WorkflowStatus::EmProgresso => ConsolidatedStatus::InProgress,
        WorkflowStatus::StandBy | WorkflowStatus::Bloqueado => ConsolidatedStatus::Standby,
        WorkflowStatus::Concluido | WorkflowStatus::Arquivado => ConsolidatedStatus::Completed,
        WorkflowStatus::Recusado | WorkflowStatus::Cancelado => ConsolidatedStatus::Rejected,
    }
}

/// Builds the render info for a status.
///
/// `approval_stages` is only filled in while the demand awaits approval.
pub fn consolidate(status: WorkflowStatus) -> ConsolidatedStatusInfo {
    let consolidated = consolidated_of(status);
    let approval_stages = (consolidated == ConsolidatedStatus::AwaitingApproval)
        .then(|| approval_stages(status));

    ConsolidatedStatusInfo {
        status,
        consolidated,
        label: consolidated.label(),
        color: consolidated.color(),
        description: consolidated.description(),
        approval_stages,
    }
}

/// Same as [`consolidate`] for a stored status string.
///
/// # Errors
/// Returns [`DemandasError::UnknownStatus`](crate::error::DemandasError::UnknownStatus)
/// when the string is not a registered status; the registry and the stored
/// data have drifted apart.
pub fn consolidate_str(raw: &str) -> Result<ConsolidatedStatusInfo> {
    let status = raw.parse::<WorkflowStatus>()?;
    debug!(status = %status, "consolidating stored status");
    Ok(consolidate(status))
}

/// Approval checklist for a status, looked up in [`STAGE_COMPLETION`].
pub fn approval_stages(status: WorkflowStatus) -> Vec<ApprovalStage> {
    let done = STAGE_COMPLETION
        .iter()
        .find(|(s, _)| *s == status)
        .map(|&(_, n)| n)
        .unwrap_or(0);

    STAGES
        .iter()
        .enumerate()
        .map(|(i, &(id, label))| ApprovalStage {
            id,
            label,
            completed: i < done,
            order: (i + 1) as u8,
        })
        .collect()
}

pub fn is_awaiting_approval(status: WorkflowStatus) -> bool {
    consolidated_of(status) == ConsolidatedStatus::AwaitingApproval
}

/// First incomplete stage, or `None` when every stage is done or the demand
/// is not awaiting approval.
pub fn next_pending_stage(status: WorkflowStatus) -> Option<ApprovalStage> {
    first_pending(&consolidate(status).approval_stages?)
}

/// Percentage of approval stages completed, rounded; 0 outside approval.
pub fn approval_progress_percent(status: WorkflowStatus) -> u8 {
    consolidate(status)
        .approval_stages
        .map_or(0, |stages| progress_of(&stages))
}

fn first_pending(stages: &[ApprovalStage]) -> Option<ApprovalStage> {
    stages
        .iter()
        .filter(|stage| !stage.completed)
        .min_by_key(|stage| stage.order)
        .copied()
}

fn progress_of(stages: &[ApprovalStage]) -> u8 {
    if stages.is_empty() {
        return 0;
    }
    let done = stages.iter().filter(|stage| stage.completed).count();
    ((done as f64 / stages.len() as f64) * 100.0).round() as u8
}

/// Keeps the items whose phase is in `buckets`, preserving order.
pub fn filter_by_consolidated<'a, T: HasWorkflowStatus>(
    items: &'a [T],
    buckets: &[ConsolidatedStatus],
) -> Vec<&'a T> {
    items
        .iter()
        .filter(|item| buckets.contains(&consolidated_of(item.workflow_status())))
        .collect()
}

/// Splits items into the seven board columns, in column order.
///
/// Empty columns are kept so the board always renders every phase.
pub fn group_by_consolidated<T: HasWorkflowStatus>(
    items: &[T],
) -> Vec<(ConsolidatedStatus, Vec<&T>)> {
    ConsolidatedStatus::ALL
        .into_iter()
        .map(|bucket| (bucket, filter_by_consolidated(items, &[bucket])))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn aprovado_gp_has_two_stages_done() {
        let info = consolidate(WorkflowStatus::AprovadoGp);
        assert_eq!(info.consolidated, ConsolidatedStatus::AwaitingApproval);
        let stages = info.approval_stages.unwrap();
        assert!(stages[0].completed);
        assert!(stages[1].completed);
        assert!(!stages[2].completed);
        assert!(!stages[3].completed);
        assert_eq!(approval_progress_percent(WorkflowStatus::AprovadoGp), 50);
        assert_eq!(next_pending_stage(WorkflowStatus::AprovadoGp).unwrap().id, "ti");
    }

    #[test]
    fn concluido_has_no_stages() {
        let info = consolidate(WorkflowStatus::Concluido);
        assert_eq!(info.consolidated, ConsolidatedStatus::Completed);
        assert!(info.approval_stages.is_none());
        assert_eq!(approval_progress_percent(WorkflowStatus::Concluido), 0);
        assert!(next_pending_stage(WorkflowStatus::Concluido).is_none());
    }

    #[test]
    fn stage_order_is_fixed() {
        let stages = approval_stages(WorkflowStatus::AguardandoGerente);
        let ids: Vec<_> = stages.iter().map(|s| s.id).collect();
        assert_eq!(ids, ["gerente", "gp", "ti", "comite"]);
        let orders: Vec<_> = stages.iter().map(|s| s.order).collect();
        assert_eq!(orders, [1, 2, 3, 4]);
        assert!(stages.iter().all(|s| !s.completed));
    }

    #[test]
    fn aguardando_comite_is_three_quarters() {
        assert_eq!(approval_progress_percent(WorkflowStatus::AguardandoComite), 75);
        assert_eq!(
            next_pending_stage(WorkflowStatus::AguardandoComite).unwrap().id,
            "comite"
        );
    }

    #[test]
    fn unlisted_approval_status_completes_nothing() {
        let info = consolidate(WorkflowStatus::AlteracaoEscopo);
        assert_eq!(info.consolidated, ConsolidatedStatus::AwaitingApproval);
        assert!(info.approval_stages.unwrap().iter().all(|s| !s.completed));
        assert_eq!(approval_progress_percent(WorkflowStatus::AlteracaoEscopo), 0);
        assert_eq!(
            next_pending_stage(WorkflowStatus::AlteracaoEscopo).unwrap().id,
            "gerente"
        );
    }

    #[test]
    fn committee_approval_leaves_approval_phase() {
        let info = consolidate(WorkflowStatus::AprovadoComite);
        assert_eq!(info.consolidated, ConsolidatedStatus::Approved);
        assert!(info.approval_stages.is_none());
        assert!(approval_stages(WorkflowStatus::AprovadoComite).iter().all(|s| s.completed));
    }

    #[test]
    fn stage_table_rows_drive_checklist() {
        for &(status, done) in STAGE_COMPLETION {
            let stages = approval_stages(status);
            assert_eq!(stages.len(), 4);
            for (i, stage) in stages.iter().enumerate() {
                assert_eq!(stage.completed, i < done, "{status} stage {}", stage.id);
            }

            let expected_pct = ((done as f64 / 4.0) * 100.0).round() as u8;
            assert_eq!(progress_of(&stages), expected_pct, "{status}");
            let expected_next = STAGES.get(done).map(|&(id, _)| id);
            assert_eq!(first_pending(&stages).map(|s| s.id), expected_next, "{status}");

            if is_awaiting_approval(status) {
                assert_eq!(approval_progress_percent(status), expected_pct, "{status}");
                assert_eq!(
                    next_pending_stage(status).map(|s| s.id),
                    expected_next,
                    "{status}"
                );
            }
        }
    }

    #[test]
    fn validacao_ti_waits_on_ti() {
        let status: WorkflowStatus = "Aguardando_Validacao_TI".parse().unwrap();
        assert_eq!(approval_progress_percent(status), 50);
        assert_eq!(next_pending_stage(status).unwrap().id, "ti");
    }

    #[test]
    fn full_checklist_is_complete() {
        let stages = approval_stages(WorkflowStatus::AprovadoComite);
        assert_eq!(progress_of(&stages), 100);
        assert!(first_pending(&stages).is_none());
        assert_eq!(progress_of(&[]), 0);
    }

    #[test]
    fn first_pending_uses_order_not_position() {
        let mut stages = approval_stages(WorkflowStatus::AguardandoComite);
        stages.reverse();
        assert_eq!(first_pending(&stages).unwrap().id, "comite");
        stages[0].completed = true;
        stages[3].completed = false;
        assert_eq!(first_pending(&stages).unwrap().id, "gerente");
    }

    #[test]
    fn consolidate_str_fails_on_unknown() {
        assert!(consolidate_str("Pendente_Diretoria").is_err());
        let info = consolidate_str("Em_Progresso").unwrap();
        assert_eq!(info.consolidated, ConsolidatedStatus::InProgress);
        assert_eq!(info.label, "Em Progresso");
    }

    #[test]
    fn every_phase_is_reachable() {
        for bucket in ConsolidatedStatus::ALL {
            assert!(
                WorkflowStatus::ALL.iter().any(|s| consolidated_of(*s) == bucket),
                "no status maps to {bucket}"
            );
        }
    }

    #[test]
    fn filter_preserves_order_and_duplicates() {
        let items = [
            WorkflowStatus::EmProgresso,
            WorkflowStatus::Backlog,
            WorkflowStatus::StandBy,
            WorkflowStatus::EmProgresso,
            WorkflowStatus::Novas,
        ];
        let picked = filter_by_consolidated(
            &items,
            &[ConsolidatedStatus::Backlog, ConsolidatedStatus::InProgress],
        );
        assert_eq!(
            picked,
            vec![
                &WorkflowStatus::EmProgresso,
                &WorkflowStatus::Backlog,
                &WorkflowStatus::EmProgresso,
                &WorkflowStatus::Novas,
            ]
        );
        assert!(filter_by_consolidated(&items, &[]).is_empty());
    }

    #[test]
    fn group_keeps_all_columns() {
        let items = [WorkflowStatus::Recusado, WorkflowStatus::Cancelado];
        let board = group_by_consolidated(&items);
        assert_eq!(board.len(), 7);
        assert_eq!(board[0].0, ConsolidatedStatus::Backlog);
        assert!(board[0].1.is_empty());
        assert_eq!(board[6].0, ConsolidatedStatus::Rejected);
        assert_eq!(board[6].1.len(), 2);
    }

    fn any_status() -> impl Strategy<Value = WorkflowStatus> {
        prop::sample::select(WorkflowStatus::ALL.to_vec())
    }

    proptest! {
        #[test]
        fn consolidation_is_deterministic(status in any_status()) {
            prop_assert_eq!(consolidate(status), consolidate(status));
        }

        #[test]
        fn awaiting_matches_bucket(status in any_status()) {
            prop_assert_eq!(
                is_awaiting_approval(status),
                consolidate(status).consolidated == ConsolidatedStatus::AwaitingApproval
            );
        }

        #[test]
        fn progress_bounds(status in any_status()) {
            let pct = approval_progress_percent(status);
            prop_assert!(pct <= 100);
            if !is_awaiting_approval(status) {
                prop_assert_eq!(pct, 0);
            } else {
                prop_assert_eq!(pct == 100, next_pending_stage(status).is_none());
            }
        }
    }
}
