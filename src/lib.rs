pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::SupabaseClient;
pub use config::{cli::LocalStorage, toml_config::TomlConfig};
pub use crate::core::{
    etl::{EtlEngine, RunOutcome},
    pipeline::ImportPipeline,
};
pub use domain::model::{ImportReport, PricingType, ToolRecord};
pub use utils::error::{EtlError, Result};
