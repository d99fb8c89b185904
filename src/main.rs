mod cli;
mod ui;

use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Command};
use demandas::access::{AccessResolver, RawPermissionRow};
use demandas::config::{DemandasConfig, OutputFormat};
use demandas::format::{format_brl, next_demand_code, parse_brl};
use demandas::workflow::{
    ActionPolicy, ConsolidatedStatus, Demanda, approval_progress_percent, consolidate_str,
    group_by_consolidated, next_pending_stage, normalize_status,
};
use ui::{BoardColumn, Printer, StatusReport};

#[derive(Debug, Serialize)]
struct MoedaReport {
    centavos: i64,
    formatado: String,
}

#[derive(Debug, Serialize)]
struct CodigoReport {
    codigo: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => DemandasConfig::load_from(path),
        None => DemandasConfig::load(),
    }
    .context("failed to load configuration")?;

    init_tracing(&config, cli.verbose);

    let format = if cli.json {
        OutputFormat::Json
    } else {
        config.output
    };
    let printer = Printer::new(format);

    match cli.command {
        Command::Status { status } => {
            let info = consolidate_str(&status)?;
            let report = StatusReport {
                info: &info,
                progress_percent: approval_progress_percent(info.status),
                next_pending_stage: next_pending_stage(info.status),
            };
            printer.status(&report);
        }
        Command::Acoes { status, ti } => {
            let normalized = normalize_status(&status);
            let actions = ActionPolicy::evaluate_all(&normalized, ti);
            printer.actions(&normalized, &actions);
        }
        Command::Acesso { file } => {
            let rows: Vec<RawPermissionRow> = read_json(&file)?;
            debug!(rows = rows.len(), "loaded permission rows");
            let access = AccessResolver::resolve_raw(&rows);
            printer.access(&access);
        }
        Command::Quadro { file, fases } => {
            let demandas: Vec<Demanda> = read_json(&file)?;
            let fases: Vec<ConsolidatedStatus> = fases.into_iter().map(Into::into).collect();
            let columns: Vec<BoardColumn<'_>> = group_by_consolidated(&demandas)
                .into_iter()
                .filter(|(fase, _)| fases.is_empty() || fases.contains(fase))
                .map(|(fase, demandas)| BoardColumn {
                    fase,
                    label: fase.label(),
                    demandas,
                })
                .collect();
            printer.board(&columns);
        }
        Command::Moeda { valor } => {
            let centavos = parse_brl(&valor)?;
            let report = MoedaReport {
                centavos,
                formatado: format_brl(centavos),
            };
            printer.value(&report.formatado, &report);
        }
        Command::Codigo { file } => {
            let demandas: Vec<Demanda> = read_json(&file)?;
            let today = chrono::Local::now().date_naive();
            let codigo = next_demand_code(
                &config.codigo_prefixo,
                demandas.iter().map(|d| d.codigo.as_str()),
                today,
            )?;
            printer.value(&codigo, &CodigoReport { codigo: codigo.clone() });
        }
    }

    Ok(())
}

/// Installs the stderr subscriber. `--verbose` forces `debug`.
fn init_tracing(config: &DemandasConfig, verbose: bool) {
    let directive = if verbose {
        "debug"
    } else {
        config.log_level.as_str()
    };
    let filter = EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&contents).with_context(|| format!("failed to parse {}", path.display()))
}
