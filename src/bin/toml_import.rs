use anyhow::Context;
use clap::Parser;
use currly_import::core::etl::print_summary;
use currly_import::core::ConfigProvider;
use currly_import::utils::{logger, validation::Validate};
use currly_import::{
    EtlEngine, ImportPipeline, LocalStorage, RunOutcome, SupabaseClient, TomlConfig,
};

#[derive(Parser)]
#[command(name = "toml-import")]
#[command(about = "Run the tools import from a TOML configuration file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "import.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override monitoring setting from config
    #[arg(long)]
    monitor: Option<bool>,

    /// Transform only, regardless of the config file
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let mut config = TomlConfig::from_file(&args.config)
        .with_context(|| format!("failed to load config file '{}'", args.config))?;

    logger::init_logger(args.verbose, config.json_logs());
    tracing::info!("📁 Loaded configuration from: {}", args.config);

    if args.dry_run {
        config.import.dry_run = true;
        tracing::info!("🔧 Dry run forced from command line");
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(e.severity().exit_code().max(1));
    }

    display_config_summary(&config);

    let monitor_enabled = args.monitor.unwrap_or_else(|| config.monitoring_enabled());

    let sink = SupabaseClient::new(&config.target.url, &config.target.api_key)
        .with_timeout(config.target.timeout_seconds);
    let storage = LocalStorage::new(".".to_string());
    let pipeline = ImportPipeline::new(storage, config, sink);
    let engine = EtlEngine::new_with_monitoring(pipeline, monitor_enabled);

    match engine.execute().await {
        Ok(RunOutcome::InputMissing { message }) => {
            println!("❌ {}", message);
            Ok(())
        }
        Ok(RunOutcome::Imported(report)) => {
            print_summary(&report);
            Ok(())
        }
        Err(e) => {
            tracing::error!(
                "❌ Import failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            let exit_code = e.severity().exit_code();
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
            Ok(())
        }
    }
}

fn display_config_summary(config: &TomlConfig) {
    tracing::info!("📋 Import summary:");
    tracing::info!("   Source: {}", config.input_path());
    tracing::info!("   Target: {} ({})", config.target.url, config.table());
    tracing::info!("   Conflict key: {}", config.on_conflict());
    tracing::info!("   Chunk size: {}", config.chunk_size());
    if config.dry_run() {
        tracing::info!("   Mode: dry run");
    }
}
