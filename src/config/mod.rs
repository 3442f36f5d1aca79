pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::core::uploader::DEFAULT_CHUNK_SIZE;
#[cfg(feature = "cli")]
use crate::core::ConfigProvider;
#[cfg(feature = "cli")]
use crate::domain::model::{ColumnMap, RecordDefaults};
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::{self, Validate};
#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "currly-import")]
#[command(about = "Import the Notion AI tools export into the Supabase `tools` table")]
pub struct CliConfig {
    #[arg(long, env = "CURRLY_INPUT", default_value = "currly_data.csv")]
    pub input: String,

    #[arg(long, env = "SUPABASE_URL", default_value = "")]
    pub supabase_url: String,

    #[arg(long, env = "SUPABASE_KEY", hide_env_values = true, default_value = "")]
    pub supabase_key: String,

    #[arg(long, default_value = "tools")]
    pub table: String,

    #[arg(long, default_value = "slug")]
    pub on_conflict: String,

    #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE)]
    pub chunk_size: usize,

    #[arg(long, default_value_t = 15)]
    pub setup_time_minutes: i32,

    #[arg(long, help = "Per-request timeout for upsert calls")]
    pub timeout_seconds: Option<u64>,

    #[arg(long, help = "Transform only, do not call Supabase")]
    pub dry_run: bool,

    #[arg(long, help = "Write the prepared records as JSON to this path")]
    pub dump_path: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log per-phase CPU and memory usage")]
    pub monitor: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub log_json: bool,

    #[arg(skip)]
    pub columns: ColumnMap,
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn input_path(&self) -> &str {
        &self.input
    }

    fn table(&self) -> &str {
        &self.table
    }

    fn on_conflict(&self) -> &str {
        &self.on_conflict
    }

    fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    fn columns(&self) -> &ColumnMap {
        &self.columns
    }

    fn defaults(&self) -> RecordDefaults {
        RecordDefaults {
            setup_time_minutes: self.setup_time_minutes,
            ..RecordDefaults::default()
        }
    }

    fn dry_run(&self) -> bool {
        self.dry_run
    }

    fn dump_path(&self) -> Option<&str> {
        self.dump_path.as_deref()
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_path("input", &self.input)?;
        validation::validate_file_extension("input", &self.input, &["csv"])?;
        validation::validate_positive_number("chunk_size", self.chunk_size, 1)?;
        validation::validate_range("setup_time_minutes", self.setup_time_minutes, 0, 24 * 60)?;
        validation::validate_non_empty_string("table", &self.table)?;
        validation::validate_non_empty_string("on_conflict", &self.on_conflict)?;

        // 乾跑不會連線，所以不需要憑證
        if !self.dry_run {
            validation::validate_url("supabase_url", &self.supabase_url)?;
            validation::validate_non_empty_string("supabase_key", &self.supabase_key)?;
        }

        if let Some(dump_path) = &self.dump_path {
            validation::validate_path("dump_path", dump_path)?;
        }

        Ok(())
    }
}

#[cfg(all(test, feature = "cli"))]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CliConfig {
        let mut argv = vec!["currly-import"];
        argv.extend_from_slice(args);
        CliConfig::parse_from(argv)
    }

    #[test]
    fn test_flags_override_defaults() {
        let config = parse(&[
            "--input",
            "export.csv",
            "--supabase-url",
            "https://abc.supabase.co",
            "--supabase-key",
            "secret",
            "--chunk-size",
            "25",
        ]);

        assert_eq!(config.input_path(), "export.csv");
        assert_eq!(config.chunk_size(), 25);
        assert_eq!(config.table(), "tools");
        assert_eq!(config.on_conflict(), "slug");
        assert_eq!(config.defaults().setup_time_minutes, 15);
        assert!(config.defaults().is_verified);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_requires_credentials_unless_dry_run() {
        let config = parse(&["--supabase-url", "https://abc.supabase.co", "--supabase-key", ""]);
        assert!(config.validate().is_err());

        let config = parse(&["--supabase-url", "", "--supabase-key", "", "--dry-run"]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_zero_chunk_size_and_non_csv() {
        let config = parse(&["--dry-run", "--chunk-size", "0"]);
        assert!(config.validate().is_err());

        let config = parse(&["--dry-run", "--input", "export.xlsx"]);
        assert!(config.validate().is_err());
    }
}
