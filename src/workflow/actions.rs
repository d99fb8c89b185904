//! Regras de disponibilidade das ações do quadro Kanban.
//!
//! Cada [`KanbanAction`] tem uma [`ActionRule`] estática em [`RULES`]. O
//! [`ActionPolicy`] avalia a regra contra o status da demanda e contra a
//! existência de um parecer técnico de TI.

use std::fmt;

use serde::Serialize;
use tracing::warn;

use super::status::WorkflowStatus;
use super::status::WorkflowStatus as S;

/// User actions offered on a demand card, in canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum KanbanAction {
    Visualizar,
    Comentar,
    ParecerTecnicoTi,
    AvaliarRisco,
    SolicitarInsumo,
    Aprovar,
    Reprovar,
    Cancelar,
}

impl KanbanAction {
    pub const ALL: [KanbanAction; 8] = [
        KanbanAction::Visualizar,
        KanbanAction::Comentar,
        KanbanAction::ParecerTecnicoTi,
        KanbanAction::AvaliarRisco,
        KanbanAction::SolicitarInsumo,
        KanbanAction::Aprovar,
        KanbanAction::Reprovar,
        KanbanAction::Cancelar,
    ];

    pub fn id(self) -> &'static str {
        match self {
            KanbanAction::Visualizar => "visualizar",
            KanbanAction::Comentar => "comentar",
            KanbanAction::ParecerTecnicoTi => "parecer_tecnico_ti",
            KanbanAction::AvaliarRisco => "avaliar_risco",
            KanbanAction::SolicitarInsumo => "solicitar_insumo",
            KanbanAction::Aprovar => "aprovar",
            KanbanAction::Reprovar => "reprovar",
            KanbanAction::Cancelar => "cancelar",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            KanbanAction::Visualizar => "Visualizar",
            KanbanAction::Comentar => "Comentar",
            KanbanAction::ParecerTecnicoTi => "Parecer Técnico de TI",
            KanbanAction::AvaliarRisco => "Avaliar Risco",
            KanbanAction::SolicitarInsumo => "Solicitar Insumo",
            KanbanAction::Aprovar => "Aprovar",
            KanbanAction::Reprovar => "Reprovar",
            KanbanAction::Cancelar => "Cancelar",
        }
    }

    /// Looks an action up by its id; `None` for ids with no rule.
    pub fn from_id(id: &str) -> Option<Self> {
        KanbanAction::ALL.into_iter().find(|action| action.id() == id)
    }
}

impl fmt::Display for KanbanAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Which statuses an action starts from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllowedStatuses {
    /// Every status except the rule's exclusions.
    All,
    Only(&'static [WorkflowStatus]),
}

/// Static policy record for one action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionRule {
    pub allowed: AllowedStatuses,
    /// Only consulted when `allowed` is [`AllowedStatuses::All`].
    pub excluded: &'static [WorkflowStatus],
    pub requires_justification: bool,
    pub requires_ti_approval: bool,
}

const PRE_APPROVAL: &[WorkflowStatus] = &[
    S::Backlog,
    S::Novas,
    S::AguardandoGerente,
    S::AprovadoGp,
    S::AguardandoValidacaoTi,
    S::AguardandoComite,
    S::AlteracaoEscopo,
];

const CLOSED: &[WorkflowStatus] = &[S::Concluido, S::Recusado, S::Cancelado, S::Arquivado];

/// The action rule table.
pub const RULES: &[(KanbanAction, ActionRule)] = &[
    (
        KanbanAction::Visualizar,
        ActionRule {
            allowed: AllowedStatuses::All,
            excluded: &[],
            requires_justification: false,
            requires_ti_approval: false,
        },
    ),
    (
        KanbanAction::Comentar,
        ActionRule {
            allowed: AllowedStatuses::All,
            excluded: &[S::Cancelado, S::Arquivado],
            requires_justification: false,
            requires_ti_approval: false,
        },
    ),
    (
        KanbanAction::ParecerTecnicoTi,
        ActionRule {
            allowed: AllowedStatuses::Only(&[
                S::Backlog,
                S::Novas,
                S::AguardandoGerente,
                S::AprovadoGp,
                S::AguardandoValidacaoTi,
            ]),
            excluded: &[],
            requires_justification: true,
            requires_ti_approval: false,
        },
    ),
    (
        KanbanAction::AvaliarRisco,
        ActionRule {
            allowed: AllowedStatuses::All,
            excluded: CLOSED,
            requires_justification: false,
            requires_ti_approval: true,
        },
    ),
    (
        KanbanAction::SolicitarInsumo,
        ActionRule {
            allowed: AllowedStatuses::Only(PRE_APPROVAL),
            excluded: &[],
            requires_justification: true,
            requires_ti_approval: false,
        },
    ),
    (
        KanbanAction::Aprovar,
        ActionRule {
            allowed: AllowedStatuses::Only(PRE_APPROVAL),
            excluded: &[],
            requires_justification: false,
            requires_ti_approval: false,
        },
    ),
    (
        KanbanAction::Reprovar,
        ActionRule {
            allowed: AllowedStatuses::All,
            excluded: &[S::EmProgresso, S::Concluido, S::Recusado, S::Cancelado, S::Arquivado],
            requires_justification: true,
            requires_ti_approval: false,
        },
    ),
    (
        KanbanAction::Cancelar,
        ActionRule {
            allowed: AllowedStatuses::All,
            excluded: CLOSED,
            requires_justification: true,
            requires_ti_approval: false,
        },
    ),
];

/// Status as received from outside, after lenient normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NormalizedStatus {
    Known(WorkflowStatus),
    /// Not in the registry; carried through untouched.
    Unmapped(String),
}

impl NormalizedStatus {
    pub fn known(&self) -> Option<WorkflowStatus> {
        match self {
            NormalizedStatus::Known(status) => Some(*status),
            NormalizedStatus::Unmapped(_) => None,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            NormalizedStatus::Known(status) => status.as_str(),
            NormalizedStatus::Unmapped(raw) => raw,
        }
    }

    fn label(&self) -> &str {
        match self {
            NormalizedStatus::Known(status) => status.label(),
            NormalizedStatus::Unmapped(raw) => raw,
        }
    }
}

impl From<WorkflowStatus> for NormalizedStatus {
    fn from(status: WorkflowStatus) -> Self {
        NormalizedStatus::Known(status)
    }
}

impl fmt::Display for NormalizedStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why an action is unavailable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BlockReason {
    ExcludedStatus {
        action: KanbanAction,
        status: String,
    },
    NotInAllowedStatuses {
        action: KanbanAction,
        status: String,
        allowed: Vec<WorkflowStatus>,
    },
    MissingTiApproval {
        action: KanbanAction,
    },
    NotConfigured {
        action_id: String,
    },
}

impl fmt::Display for BlockReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockReason::ExcludedStatus { action, status } => write!(
                f,
                "Ação \"{}\" não é permitida para demandas em \"{status}\"",
                action.label()
            ),
            BlockReason::NotInAllowedStatuses { action, allowed, .. } => {
                let labels: Vec<&str> = allowed.iter().map(|s| s.label()).collect();
                write!(
                    f,
                    "Ação \"{}\" só está disponível nos status: {}",
                    action.label(),
                    labels.join(", ")
                )
            }
            BlockReason::MissingTiApproval { action } => write!(
                f,
                "Ação \"{}\" requer parecer técnico de TI prévio",
                action.label()
            ),
            BlockReason::NotConfigured { action_id } => {
                write!(f, "Ação \"{action_id}\" não configurada")
            }
        }
    }
}

/// Availability of one action, as shown on a card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionAvailability {
    pub action: KanbanAction,
    pub label: &'static str,
    pub allowed: bool,
    pub requires_justification: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Evaluates [`RULES`] for a demand.
pub struct ActionPolicy;

impl ActionPolicy {
    pub fn rule(action: KanbanAction) -> Option<&'static ActionRule> {
        RULES
            .iter()
            .find(|(a, _)| *a == action)
            .map(|(_, rule)| rule)
    }

    /// Checks an action against a status.
    ///
    /// Evaluation order:
    /// - `All` rules allow every status outside `excluded`; `Only` rules
    ///   allow just the listed statuses.
    /// - A rule with `requires_ti_approval` additionally needs `has_ti_approval`.
    pub fn is_allowed(action: KanbanAction, status: WorkflowStatus, has_ti_approval: bool) -> bool {
        Self::check(action, &status.into(), has_ti_approval).is_ok()
    }

    /// `None` when the action is allowed.
    pub fn disabled_reason(
        action: KanbanAction,
        status: WorkflowStatus,
        has_ti_approval: bool,
    ) -> Option<BlockReason> {
        Self::check(action, &status.into(), has_ti_approval).err()
    }

    pub fn requires_justification(action: KanbanAction) -> bool {
        Self::rule(action).is_some_and(|rule| rule.requires_justification)
    }

    /// Allowed actions for a status, in canonical order.
    pub fn list_available(status: WorkflowStatus, has_ti_approval: bool) -> Vec<KanbanAction> {
        KanbanAction::ALL
            .into_iter()
            .filter(|action| Self::is_allowed(*action, status, has_ti_approval))
            .collect()
    }

    /// String-keyed variant for ids and statuses read from stored data.
    ///
    /// Unknown action ids are never allowed; unknown statuses go through
    /// [`normalize_status`].
    pub fn is_allowed_id(action_id: &str, raw_status: &str, has_ti_approval: bool) -> bool {
        Self::disabled_reason_id(action_id, raw_status, has_ti_approval).is_none()
    }

    pub fn disabled_reason_id(
        action_id: &str,
        raw_status: &str,
        has_ti_approval: bool,
    ) -> Option<BlockReason> {
        let Some(action) = KanbanAction::from_id(action_id) else {
            return Some(BlockReason::NotConfigured {
                action_id: action_id.to_string(),
            });
        };
        Self::check(action, &normalize_status(raw_status), has_ti_approval).err()
    }

    /// Every action with its verdict, for rendering a card menu.
    pub fn evaluate_all(status: &NormalizedStatus, has_ti_approval: bool) -> Vec<ActionAvailability> {
        KanbanAction::ALL
            .into_iter()
            .map(|action| {
                let reason = Self::check(action, status, has_ti_approval).err();
                ActionAvailability {
                    action,
                    label: action.label(),
                    allowed: reason.is_none(),
                    requires_justification: Self::requires_justification(action),
                    reason: reason.map(|r| r.to_string()),
                }
            })
            .collect()
    }

    fn check(
        action: KanbanAction,
        status: &NormalizedStatus,
        has_ti_approval: bool,
    ) -> Result<(), BlockReason> {
        let Some(rule) = Self::rule(action) else {
            return Err(BlockReason::NotConfigured {
                action_id: action.id().to_string(),
            });
        };

        match rule.allowed {
            AllowedStatuses::All => {
                if let Some(known) = status.known() {
                    if rule.excluded.contains(&known) {
                        return Err(BlockReason::ExcludedStatus {
                            action,
                            status: status.label().to_string(),
                        });
                    }
                }
            }
            AllowedStatuses::Only(allowed) => {
                let listed = status.known().is_some_and(|known| allowed.contains(&known));
                if !listed {
                    return Err(BlockReason::NotInAllowedStatuses {
                        action,
                        status: status.label().to_string(),
                        allowed: allowed.to_vec(),
                    });
                }
            }
        }

        if rule.requires_ti_approval && !has_ti_approval {
            return Err(BlockReason::MissingTiApproval { action });
        }

        Ok(())
    }
}

/// Maps a stored status string onto the registry.
///
/// Strings outside the registry are passed through as
/// [`NormalizedStatus::Unmapped`] so a card with unexpected data still
/// renders; the miss is logged.
pub fn normalize_status(raw: &str) -> NormalizedStatus {
    match raw.parse::<WorkflowStatus>() {
        Ok(status) => NormalizedStatus::Known(status),
        Err(_) => {
            warn!(status = raw, "unmapped workflow status, passing through unchanged");
            NormalizedStatus::Unmapped(raw.to_string())
        }
    }
}
