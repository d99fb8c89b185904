mod actions;
mod consolidation;
mod demanda;
mod status;

pub use actions::{
    ActionAvailability, ActionPolicy, ActionRule, AllowedStatuses, BlockReason, KanbanAction,
    NormalizedStatus, RULES, normalize_status,
};
pub use consolidation::{
    ApprovalStage, ConsolidatedStatusInfo, HasWorkflowStatus, STAGE_COMPLETION,
    approval_progress_percent, approval_stages, consolidate, consolidate_str, consolidated_of,
    filter_by_consolidated, group_by_consolidated, is_awaiting_approval, next_pending_stage,
};
pub use demanda::Demanda;
pub use status::{ConsolidatedStatus, WorkflowStatus};
