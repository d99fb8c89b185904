//! Regras de classificação e política do quadro de demandas.
//!
//! - [`workflow`]: consolidação de status, etapas de aprovação e disponibilidade
//!   das ações do quadro Kanban.
//! - [`access`]: níveis de acesso por empresa a partir dos grupos de permissão.
//! - [`format`]: valores em reais e códigos de demanda.
//!
//! Todas as funções são puras e síncronas sobre tabelas estáticas; quem chama
//! já buscou os dados no banco.

pub mod access;
pub mod config;
pub mod error;
pub mod format;
pub mod workflow;

pub use error::{DemandasError, Result};
