//! Saída de terminal do `demandas`: texto colorido ou JSON.
//!
//! Usa a crate `console` para estilizar as fases do quadro com cores próximas
//! às do cartão. Em modo JSON tudo vai para stdout via `serde_json`, e os logs
//! continuam em stderr.

use console::Style;
use serde::Serialize;

use demandas::access::EmpresaAccess;
use demandas::config::OutputFormat;
use demandas::format::format_brl;
use demandas::workflow::{
    ActionAvailability, ApprovalStage, ConsolidatedStatus, ConsolidatedStatusInfo, Demanda,
    NormalizedStatus, next_pending_stage,
};

/// Status report printed by `demandas status`.
#[derive(Debug, Serialize)]
pub struct StatusReport<'a> {
    #[serde(flatten)]
    pub info: &'a ConsolidatedStatusInfo,
    pub progress_percent: u8,
    pub next_pending_stage: Option<ApprovalStage>,
}

/// One board column printed by `demandas quadro`.
#[derive(Debug, Serialize)]
pub struct BoardColumn<'a> {
    pub fase: ConsolidatedStatus,
    pub label: &'static str,
    pub demandas: Vec<&'a Demanda>,
}

/// Prints command results in the configured format.
pub struct Printer {
    format: OutputFormat,
    green: Style,
    red: Style,
    dim: Style,
    bold: Style,
}

/// Cor de terminal de cada fase.
fn phase_style(fase: ConsolidatedStatus) -> Style {
    match fase {
        ConsolidatedStatus::Backlog => Style::new().dim(),
        ConsolidatedStatus::AwaitingApproval => Style::new().yellow().bold(),
        ConsolidatedStatus::Approved => Style::new().blue().bold(),
        ConsolidatedStatus::InProgress => Style::new().magenta().bold(),
        ConsolidatedStatus::Standby => Style::new().color256(208),
        ConsolidatedStatus::Completed => Style::new().green(),
        ConsolidatedStatus::Rejected => Style::new().red(),
    }
}

impl Printer {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            green: Style::new().green().bold(),
            red: Style::new().red().bold(),
            dim: Style::new().dim(),
            bold: Style::new().bold(),
        }
    }

    fn json<T: Serialize + ?Sized>(&self, value: &T) -> bool {
        if self.format != OutputFormat::Json {
            return false;
        }
        println!("{}", serde_json::to_string_pretty(value).unwrap_or_default());
        true
    }

    pub fn status(&self, report: &StatusReport<'_>) {
        if self.json(report) {
            return;
        }
        print!("{}", self.render_status(report));
    }

    pub fn render_status(&self, report: &StatusReport<'_>) -> String {
        let info = report.info;
        let style = phase_style(info.consolidated);
        let mut out = format!(
            "{} → {} ({})\n  {}\n",
            self.bold.apply_to(info.status.as_str()),
            style.apply_to(info.label),
            info.color,
            self.dim.apply_to(info.description),
        );

        if let Some(stages) = &info.approval_stages {
            out.push_str(&format!("  Aprovação: {}%\n", report.progress_percent));
            for stage in stages {
                let mark = if stage.completed {
                    self.green.apply_to("✓")
                } else {
                    self.dim.apply_to("○")
                };
                out.push_str(&format!("    {mark} {}. {}\n", stage.order, stage.label));
            }
            if let Some(next) = &report.next_pending_stage {
                out.push_str(&format!("  Próxima etapa: {}\n", next.label));
            }
        }
        out
    }

    pub fn actions(&self, status: &NormalizedStatus, actions: &[ActionAvailability]) {
        if self.json(actions) {
            return;
        }
        print!("{}", self.render_actions(status, actions));
    }

    pub fn render_actions(&self, status: &NormalizedStatus, actions: &[ActionAvailability]) -> String {
        let mut out = format!("Ações para {}\n", self.bold.apply_to(status.as_str()));
        for item in actions {
            let justification = if item.requires_justification {
                " (exige justificativa)"
            } else {
                ""
            };
            if item.allowed {
                out.push_str(&format!(
                    "  {} {}{}\n",
                    self.green.apply_to("✓"),
                    item.label,
                    self.dim.apply_to(justification)
                ));
            } else {
                out.push_str(&format!(
                    "  {} {}: {}\n",
                    self.red.apply_to("✗"),
                    item.label,
                    self.dim.apply_to(item.reason.as_deref().unwrap_or_default())
                ));
            }
        }
        out
    }

    pub fn access(&self, access: &EmpresaAccess) {
        if self.json(access) {
            return;
        }
        print!("{}", self.render_access(access));
    }

    pub fn render_access(&self, access: &EmpresaAccess) -> String {
        let mut out = String::new();
        let mut any = false;
        for (empresa, nivel) in access.empresas() {
            any = true;
            out.push_str(&format!("  {} {}\n", self.bold.apply_to(empresa), nivel));
        }
        if !any {
            out.push_str(&format!("  {}\n", self.dim.apply_to("sem acesso a empresas")));
        }
        let reports = if access.can_view_reports() { "sim" } else { "não" };
        out.push_str(&format!("  Relatórios: {reports}\n"));
        out
    }

    pub fn board(&self, columns: &[BoardColumn<'_>]) {
        if self.json(columns) {
            return;
        }
        print!("{}", self.render_board(columns));
    }

    pub fn render_board(&self, columns: &[BoardColumn<'_>]) -> String {
        let mut out = String::new();
        for column in columns {
            let style = phase_style(column.fase);
            out.push_str(&format!(
                "{} ({})\n",
                style.apply_to(column.label),
                column.demandas.len()
            ));
            for demanda in &column.demandas {
                let valor = demanda
                    .valor_estimado
                    .map(format_brl)
                    .unwrap_or_else(|| "-".to_string());
                let pending = next_pending_stage(demanda.status)
                    .map(|stage| format!(" [aguarda {}]", stage.label))
                    .unwrap_or_default();
                out.push_str(&format!(
                    "  {} {} · {} · {}{}\n",
                    self.bold.apply_to(&demanda.codigo),
                    demanda.titulo,
                    demanda.empresa,
                    valor,
                    self.dim.apply_to(pending)
                ));
            }
        }
        out
    }

    /// Prints `text`, or `value` when in JSON mode.
    pub fn value<T: Serialize>(&self, text: &str, value: &T) {
        if self.json(value) {
            return;
        }
        println!("{text}");
    }
}
