//! Interface de linha de comando do `demandas` baseada em clap.
//!
//! Define a struct [`Cli`] com subcomandos [`Command`] (status, acoes,
//! acesso, quadro, moeda, codigo) e flags globais (--json, --verbose,
//! --config).

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use demandas::workflow::ConsolidatedStatus;

/// Regras de status, ações e acesso do quadro de demandas.
#[derive(Debug, Parser)]
#[command(name = "demandas", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Imprime o resultado em JSON.
    #[arg(long, global = true, default_value_t = false)]
    pub json: bool,

    /// Habilita logs de depuração.
    #[arg(long, short, global = true, default_value_t = false)]
    pub verbose: bool,

    /// Caminho do arquivo de configuração (padrão: demandas.toml).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

/// Fase do quadro aceita pela CLI, mapeada para [`ConsolidatedStatus`].
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum FaseArg {
    Backlog,
    AwaitingApproval,
    Approved,
    InProgress,
    Standby,
    Completed,
    Rejected,
}

impl From<FaseArg> for ConsolidatedStatus {
    fn from(arg: FaseArg) -> Self {
        match arg {
            FaseArg::Backlog => ConsolidatedStatus::Backlog,
            FaseArg::AwaitingApproval => ConsolidatedStatus::AwaitingApproval,
            FaseArg::Approved => ConsolidatedStatus::Approved,
            FaseArg::InProgress => ConsolidatedStatus::InProgress,
            FaseArg::Standby => ConsolidatedStatus::Standby,
            FaseArg::Completed => ConsolidatedStatus::Completed,
            FaseArg::Rejected => ConsolidatedStatus::Rejected,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Mostra a fase consolidada e as etapas de aprovação de um status.
    Status {
        /// Status armazenado (ex.: Aprovado_GP).
        status: String,
    },

    /// Lista as ações do quadro e por que cada uma está bloqueada.
    Acoes {
        /// Status armazenado da demanda.
        status: String,

        /// A demanda já recebeu parecer técnico de TI.
        #[arg(long, default_value_t = false)]
        ti: bool,
    },

    /// Resolve os níveis de acesso a partir de um JSON de grupos de permissão.
    Acesso {
        /// Arquivo JSON com as linhas de permissão.
        file: PathBuf,
    },

    /// Agrupa demandas nas colunas do quadro, opcionalmente filtrando fases.
    Quadro {
        /// Arquivo JSON com as demandas.
        file: PathBuf,

        /// Fases a manter (pode repetir).
        #[arg(long = "fase", value_enum)]
        fases: Vec<FaseArg>,
    },

    /// Normaliza um valor em reais.
    Moeda {
        /// Valor como "R$ 1.234,56" ou "1234,56".
        #[arg(allow_hyphen_values = true)]
        valor: String,
    },

    /// Gera o próximo código de demanda do ano corrente.
    Codigo {
        /// Arquivo JSON com as demandas existentes.
        file: PathBuf,
    },
}
