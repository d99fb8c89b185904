//! Configuração do `demandas` carregada a partir de `demandas.toml`.
//!
//! A struct [`DemandasConfig`] contém os parâmetros da ferramenta de linha de
//! comando. Valores ausentes no arquivo usam defaults. As variáveis de
//! ambiente `DEMANDAS_LOG` e `DEMANDAS_OUTPUT` têm precedência sobre o arquivo.

use std::path::Path;

use serde::Deserialize;

use crate::error::{DemandasError, Result};

/// Nome do arquivo procurado no diretório atual.
pub const DEFAULT_CONFIG_FILE: &str = "demandas.toml";

/// Formato de saída dos subcomandos.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = DemandasError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "text" | "texto" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(DemandasError::Config(format!("unknown output format: {other}"))),
        }
    }
}

/// Configuração de nível superior carregada de `demandas.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct DemandasConfig {
    /// Filtro de log no formato do `EnvFilter` (ex.: "warn", "demandas=debug").
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Formato de saída padrão quando `--json` não é passado.
    #[serde(default)]
    pub output: OutputFormat,

    /// Prefixo dos códigos de demanda gerados.
    #[serde(default = "default_codigo_prefixo")]
    pub codigo_prefixo: String,
}

// Valor padrão para o nível de log: "warn".
fn default_log_level() -> String {
    "warn".to_string()
}

// Valor padrão para o prefixo de código: "DEM".
fn default_codigo_prefixo() -> String {
    "DEM".to_string()
}

impl Default for DemandasConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            output: OutputFormat::default(),
            codigo_prefixo: default_codigo_prefixo(),
        }
    }
}

impl DemandasConfig {
    /// Carrega a configuração de `demandas.toml` no diretório atual.
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new(DEFAULT_CONFIG_FILE))
    }

    /// Carrega a configuração de um caminho explícito.
    /// Usa valores padrão se o arquivo não existir.
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            toml::from_str::<DemandasConfig>(&contents)?
        } else {
            Self::default()
        };

        if config.codigo_prefixo.trim().is_empty() {
            return Err(DemandasError::Config(
                "codigo_prefixo must not be empty".to_string(),
            ));
        }

        // Variáveis de ambiente têm precedência sobre o arquivo.
        config.apply_overrides(
            std::env::var("DEMANDAS_LOG").ok(),
            std::env::var("DEMANDAS_OUTPUT").ok(),
        )?;

        Ok(config)
    }

    /// Aplica os valores vindos do ambiente. Strings vazias são ignoradas.
    fn apply_overrides(&mut self, level: Option<String>, output: Option<String>) -> Result<()> {
        if let Some(level) = level
            && !level.is_empty()
        {
            self.log_level = level;
        }
        if let Some(output) = output
            && !output.is_empty()
        {
            self.output = output.parse()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config_values() {
        let config = DemandasConfig::default();
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.output, OutputFormat::Text);
        assert_eq!(config.codigo_prefixo, "DEM");
    }

    #[test]
    fn deserialize_partial_toml() {
        let toml_str = r#"
            output = "json"
            codigo_prefixo = "ZF"
        "#;
        let config: DemandasConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.output, OutputFormat::Json);
        assert_eq!(config.codigo_prefixo, "ZF");
        assert_eq!(config.log_level, "warn");
    }

    #[test]
    fn load_from_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = DemandasConfig::load_from(&dir.path().join("demandas.toml")).unwrap();
        assert_eq!(config.codigo_prefixo, "DEM");
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "codigo_prefixo = \"KOCH\"").unwrap();
        let config = DemandasConfig::load_from(file.path()).unwrap();
        assert_eq!(config.codigo_prefixo, "KOCH");
    }

    #[test]
    fn load_rejects_empty_prefix() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "codigo_prefixo = \"  \"").unwrap();
        let err = DemandasConfig::load_from(file.path()).unwrap_err();
        assert!(matches!(err, DemandasError::Config(_)));
    }

    #[test]
    fn load_rejects_bad_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "output = [").unwrap();
        assert!(matches!(
            DemandasConfig::load_from(file.path()),
            Err(DemandasError::Toml(_))
        ));
    }

    #[test]
    fn overrides_skip_empty_values() {
        let mut config = DemandasConfig::default();
        config
            .apply_overrides(Some(String::new()), Some(String::new()))
            .unwrap();
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.output, OutputFormat::Text);

        config
            .apply_overrides(Some("demandas=debug".into()), Some("json".into()))
            .unwrap();
        assert_eq!(config.log_level, "demandas=debug");
        assert_eq!(config.output, OutputFormat::Json);
    }

    #[test]
    fn overrides_reject_unknown_output() {
        let mut config = DemandasConfig::default();
        let err = config.apply_overrides(None, Some("yaml".into())).unwrap_err();
        assert!(matches!(err, DemandasError::Config(_)));
    }

    #[test]
    fn output_format_parses() {
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("texto".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
        assert!("yaml".parse::<OutputFormat>().is_err());
    }
}
