//! Níveis de acesso por empresa.
//!
//! O [`AccessResolver`] agrega as linhas de grupos de permissão de um usuário
//! em um [`EmpresaAccess`]: para cada empresa vale o maior nível visto
//! (gerencial > operacional > departamental). Como a agregação é um máximo
//! sobre uma ordem total, a ordem das linhas não altera o resultado.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::DemandasError;

/// Access level within one empresa, ordered by precedence.
///
/// Deserialization goes through [`FromStr`], so it accepts the same spellings.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(try_from = "String")]
pub enum EmpresaAccessLevel {
    #[default]
    #[serde(rename = "none")]
    None,
    #[serde(rename = "departamental")]
    Departmental,
    #[serde(rename = "operacional")]
    Operational,
    #[serde(rename = "gerencial")]
    Managerial,
}

impl EmpresaAccessLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            EmpresaAccessLevel::None => "none",
            EmpresaAccessLevel::Departmental => "departamental",
            EmpresaAccessLevel::Operational => "operacional",
            EmpresaAccessLevel::Managerial => "gerencial",
        }
    }
}

impl fmt::Display for EmpresaAccessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EmpresaAccessLevel {
    type Err = DemandasError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "none" | "nenhum" => Ok(EmpresaAccessLevel::None),
            "departamental" | "departmental" => Ok(EmpresaAccessLevel::Departmental),
            "operacional" | "operational" => Ok(EmpresaAccessLevel::Operational),
            "gerencial" | "managerial" => Ok(EmpresaAccessLevel::Managerial),
            _ => Err(DemandasError::UnknownAccessLevel(s.to_string())),
        }
    }
}

impl TryFrom<String> for EmpresaAccessLevel {
    type Error = DemandasError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// One permission-group grant as fetched for the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionRow {
    pub empresa: String,
    pub nivel: EmpresaAccessLevel,
    #[serde(default)]
    pub visualizar_relatorios: bool,
}

impl PermissionRow {
    pub fn new(empresa: impl Into<String>, nivel: EmpresaAccessLevel) -> Self {
        Self {
            empresa: empresa.into(),
            nivel,
            visualizar_relatorios: false,
        }
    }

    pub fn with_reports(mut self) -> Self {
        self.visualizar_relatorios = true;
        self
    }
}

/// Same row with the level still as stored text.
#[derive(Debug, Clone, Deserialize)]
pub struct RawPermissionRow {
    pub empresa: String,
    pub nivel: String,
    #[serde(default)]
    pub visualizar_relatorios: bool,
}

/// Resolved access of one user across empresas.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EmpresaAccess {
    levels: BTreeMap<String, EmpresaAccessLevel>,
    can_view_reports: bool,
}

impl EmpresaAccess {
    pub fn level(&self, empresa: &str) -> EmpresaAccessLevel {
        self.levels.get(empresa).copied().unwrap_or_default()
    }

    pub fn has_managerial(&self, empresa: &str) -> bool {
        self.level(empresa) >= EmpresaAccessLevel::Managerial
    }

    /// Operacional ou gerencial.
    pub fn has_operational(&self, empresa: &str) -> bool {
        self.level(empresa) >= EmpresaAccessLevel::Operational
    }

    /// Qualquer nível registrado.
    pub fn has_departmental(&self, empresa: &str) -> bool {
        self.level(empresa) >= EmpresaAccessLevel::Departmental
    }

    pub fn can_view_reports(&self) -> bool {
        self.can_view_reports
    }

    /// Empresas with a recorded level, sorted by id.
    pub fn empresas(&self) -> impl Iterator<Item = (&str, EmpresaAccessLevel)> {
        self.levels.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Combines two resolved views with the same precedence rule.
    pub fn merge(mut self, other: EmpresaAccess) -> Self {
        for (empresa, nivel) in other.levels {
            self.grant(empresa, nivel);
        }
        self.can_view_reports |= other.can_view_reports;
        self
    }

    fn grant(&mut self, empresa: String, nivel: EmpresaAccessLevel) {
        if nivel == EmpresaAccessLevel::None {
            return;
        }
        let entry = self.levels.entry(empresa).or_default();
        *entry = (*entry).max(nivel);
    }
}

/// Builds an [`EmpresaAccess`] from permission rows.
pub struct AccessResolver;

impl AccessResolver {
    pub fn resolve<'a, I>(rows: I) -> EmpresaAccess
    where
        I: IntoIterator<Item = &'a PermissionRow>,
    {
        let mut access = EmpresaAccess::default();
        for row in rows {
            access.grant(row.empresa.clone(), row.nivel);
            access.can_view_reports |= row.visualizar_relatorios;
        }
        debug!(
            empresas = access.levels.len(),
            reports = access.can_view_reports,
            "resolved empresa access"
        );
        access
    }

    /// Resolves rows whose level is still text.
    ///
    /// Rows with an unrecognized level grant nothing and are logged; their
    /// report flag still counts.
    pub fn resolve_raw(rows: &[RawPermissionRow]) -> EmpresaAccess {
        let typed: Vec<PermissionRow> = rows
            .iter()
            .map(|raw| {
                let nivel = raw.nivel.parse::<EmpresaAccessLevel>().unwrap_or_else(|_| {
                    warn!(
                        empresa = %raw.empresa,
                        nivel = %raw.nivel,
                        "unknown access level, ignoring grant"
                    );
                    EmpresaAccessLevel::None
                });
                PermissionRow {
                    empresa: raw.empresa.clone(),
                    nivel,
                    visualizar_relatorios: raw.visualizar_relatorios,
                }
            })
            .collect();
        Self::resolve(&typed)
    }
}
