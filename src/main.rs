use clap::Parser;
use currly_import::core::etl::print_summary;
use currly_import::utils::{logger, validation::Validate};
use currly_import::{
    CliConfig, EtlEngine, ImportPipeline, LocalStorage, RunOutcome, SupabaseClient,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // .env 不存在時忽略
    dotenvy::dotenv().ok();

    let config = CliConfig::parse();

    logger::init_logger(config.verbose, config.log_json);

    tracing::info!("Starting currly-import");
    tracing::debug!(
        "input={} table={} on_conflict={} chunk_size={} dry_run={}",
        config.input,
        config.table,
        config.on_conflict,
        config.chunk_size,
        config.dry_run
    );

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(e.severity().exit_code().max(1));
    }

    let monitor_enabled = config.monitor;
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    println!("🚀 Loading {}...", config.input);

    let sink = SupabaseClient::new(&config.supabase_url, &config.supabase_key)
        .with_timeout(config.timeout_seconds);
    let storage = LocalStorage::new(".".to_string());
    let pipeline = ImportPipeline::new(storage, config, sink);

    let engine = EtlEngine::new_with_monitoring(pipeline, monitor_enabled);

    match engine.execute().await {
        Ok(RunOutcome::InputMissing { message }) => {
            println!("❌ {}", message);
        }
        Ok(RunOutcome::Imported(report)) => {
            print_summary(&report);
            if !report.is_clean() {
                tracing::warn!(
                    "Import finished with {} row failures and {} failed batches",
                    report.row_failures.len(),
                    report.failed_batch_count()
                );
            }
        }
        Err(e) => {
            tracing::error!(
                "❌ Import failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            let exit_code = e.severity().exit_code();
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}
