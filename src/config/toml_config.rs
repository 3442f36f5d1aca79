use crate::core::uploader::DEFAULT_CHUNK_SIZE;
use crate::core::ConfigProvider;
use crate::domain::model::{ColumnMap, RecordDefaults};
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub source: SourceConfig,
    pub target: TargetConfig,
    #[serde(default)]
    pub import: ImportConfig,
    #[serde(default)]
    pub columns: ColumnMap,
    #[serde(default)]
    pub defaults: RecordDefaults,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetConfig {
    pub url: String,
    pub api_key: String,
    #[serde(default = "default_table")]
    pub table: String,
    #[serde(default = "default_on_conflict")]
    pub on_conflict: String,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    pub chunk_size: usize,
    pub dry_run: bool,
    pub dump_path: Option<String>,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            dry_run: false,
            dump_path: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
    pub json_logs: Option<bool>,
}

fn default_table() -> String {
    "tools".to_string()
}

fn default_on_conflict() -> String {
    "slug".to_string()
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(EtlError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| EtlError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${SUPABASE_KEY})；未設定的保留原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| EtlError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_path("source.path", &self.source.path)?;
        validation::validate_file_extension("source.path", &self.source.path, &["csv"])?;
        validation::validate_positive_number("import.chunk_size", self.import.chunk_size, 1)?;
        validation::validate_range(
            "defaults.setup_time_minutes",
            self.defaults.setup_time_minutes,
            0,
            24 * 60,
        )?;
        validation::validate_non_empty_string("target.table", &self.target.table)?;
        validation::validate_non_empty_string("target.on_conflict", &self.target.on_conflict)?;
        validation::validate_non_empty_string("columns.name", &self.columns.name)?;

        if !self.import.dry_run {
            for (field, value) in [
                ("target.url", &self.target.url),
                ("target.api_key", &self.target.api_key),
            ] {
                if value.contains("${") {
                    return Err(EtlError::MissingConfigError {
                        field: format!("{} (unresolved {})", field, value),
                    });
                }
            }
            validation::validate_url("target.url", &self.target.url)?;
            validation::validate_non_empty_string("target.api_key", &self.target.api_key)?;
        }

        if let Some(dump_path) = &self.import.dump_path {
            validation::validate_path("import.dump_path", dump_path)?;
        }

        Ok(())
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }

    pub fn json_logs(&self) -> bool {
        self.monitoring
            .as_ref()
            .and_then(|m| m.json_logs)
            .unwrap_or(false)
    }
}

impl ConfigProvider for TomlConfig {
    fn input_path(&self) -> &str {
        &self.source.path
    }

    fn table(&self) -> &str {
        &self.target.table
    }

    fn on_conflict(&self) -> &str {
        &self.target.on_conflict
    }

    fn chunk_size(&self) -> usize {
        self.import.chunk_size
    }

    fn columns(&self) -> &ColumnMap {
        &self.columns
    }

    fn defaults(&self) -> RecordDefaults {
        self.defaults
    }

    fn dry_run(&self) -> bool {
        self.import.dry_run
    }

    fn dump_path(&self) -> Option<&str> {
        self.import.dump_path.as_deref()
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
