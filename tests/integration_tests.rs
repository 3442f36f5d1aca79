use currly_import::domain::model::ColumnMap;
use currly_import::{
    CliConfig, EtlEngine, EtlError, ImportPipeline, LocalStorage, PricingType, RunOutcome,
    SupabaseClient, ToolRecord,
};
use httpmock::prelude::*;
use std::fmt::Write as _;
use tempfile::TempDir;

fn cli_config(input: &str, supabase_url: &str) -> CliConfig {
    CliConfig {
        input: input.to_string(),
        supabase_url: supabase_url.to_string(),
        supabase_key: "service-key".to_string(),
        table: "tools".to_string(),
        on_conflict: "slug".to_string(),
        chunk_size: 50,
        setup_time_minutes: 15,
        timeout_seconds: Some(5),
        dry_run: false,
        dump_path: None,
        verbose: false,
        monitor: false,
        log_json: false,
        columns: ColumnMap::default(),
    }
}

fn write_export(dir: &TempDir, rows: usize) {
    let mut csv = String::from("Name,URL,Summary,Tagline,Location,Pricing\n");
    for i in 0..rows {
        writeln!(csv, "Tool {},https://tool{}.io,Summary {},,Remote,Free", i, i, i).unwrap();
    }
    std::fs::write(dir.path().join("tools.csv"), csv).unwrap();
}

fn engine_for(
    dir: &TempDir,
    config: CliConfig,
) -> EtlEngine<ImportPipeline<LocalStorage, CliConfig, SupabaseClient>> {
    let sink = SupabaseClient::new(&config.supabase_url, &config.supabase_key)
        .with_timeout(config.timeout_seconds);
    let storage = LocalStorage::new(dir.path().to_str().unwrap().to_string());
    EtlEngine::new(ImportPipeline::new(storage, config, sink))
}

#[tokio::test]
async fn test_end_to_end_upserts_in_three_chunks() {
    let temp_dir = TempDir::new().unwrap();
    write_export(&temp_dir, 120);

    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/rest/v1/tools")
            .query_param("on_conflict", "slug")
            .header("apikey", "service-key");
        then.status(201);
    });

    let engine = engine_for(&temp_dir, cli_config("tools.csv", &server.base_url()));
    let report = engine.run().await.unwrap();

    api_mock.assert_hits(3);
    let sizes: Vec<usize> = report.load.batches.iter().map(|b| b.len()).collect();
    assert_eq!(sizes, vec![50, 50, 20]);
    assert_eq!(report.rows_read, 120);
    assert_eq!(report.records_uploaded(), 120);
    assert!(report.is_clean());
}

#[tokio::test]
async fn test_failed_middle_chunk_still_attempts_the_rest() {
    let temp_dir = TempDir::new().unwrap();
    write_export(&temp_dir, 120);

    let server = MockServer::start();
    let first = server.mock(|when, then| {
        when.method(POST)
            .path("/rest/v1/tools")
            .body_contains(r#""slug":"tool-0-0""#);
        then.status(201);
    });
    let second = server.mock(|when, then| {
        when.method(POST)
            .path("/rest/v1/tools")
            .body_contains(r#""slug":"tool-50-50""#);
        then.status(500).body(r#"{"message":"boom"}"#);
    });
    let third = server.mock(|when, then| {
        when.method(POST)
            .path("/rest/v1/tools")
            .body_contains(r#""slug":"tool-100-100""#);
        then.status(201);
    });

    let engine = engine_for(&temp_dir, cli_config("tools.csv", &server.base_url()));
    let report = engine.run().await.unwrap();

    first.assert_hits(1);
    second.assert_hits(1);
    third.assert_hits(1);

    assert_eq!(report.failed_batch_count(), 1);
    assert_eq!(report.records_uploaded(), 70);
    let failed = &report.load.batches[1];
    assert_eq!((failed.start, failed.end), (50, 100));
    assert!(failed.error.as_deref().unwrap().contains("500"));
}

#[tokio::test]
async fn test_missing_input_returns_early_without_upload() {
    let temp_dir = TempDir::new().unwrap();

    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(POST).path("/rest/v1/tools");
        then.status(201);
    });

    let engine = engine_for(&temp_dir, cli_config("currly_data.csv", &server.base_url()));
    let err = engine.run().await.unwrap_err();

    assert!(matches!(err, EtlError::InputNotFound { .. }));
    assert_eq!(err.severity().exit_code(), 0);
    api_mock.assert_hits(0);
}

#[tokio::test]
async fn test_missing_input_execute_yields_one_message() {
    let temp_dir = TempDir::new().unwrap();

    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(POST).path("/rest/v1/tools");
        then.status(201);
    });

    let engine = engine_for(&temp_dir, cli_config("currly_data.csv", &server.base_url()));
    let outcome = engine.execute().await.unwrap();

    match outcome {
        RunOutcome::InputMissing { message } => {
            assert_eq!(
                message,
                "Could not find currly_data.csv. Make sure the file is in this folder."
            );
        }
        RunOutcome::Imported(_) => panic!("expected missing input outcome"),
    }
    api_mock.assert_hits(0);
}

#[tokio::test]
async fn test_non_ascii_names_are_uploaded() {
    let temp_dir = TempDir::new().unwrap();
    let csv = "\
Name,URL,Summary,Description,Tagline,Location,Pricing
日本語AI,https://jp.ai,,,,,Free
🚀,https://rocket.io,,,,,Free
 Untitled ,https://nothing.io,,,,,
";
    std::fs::write(temp_dir.path().join("tools.csv"), csv).unwrap();

    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/rest/v1/tools")
            .body_contains(r#""slug":"-ai-0""#)
            .body_contains(r#""slug":"-1""#);
        then.status(201);
    });

    let engine = engine_for(&temp_dir, cli_config("tools.csv", &server.base_url()));
    let report = engine.run().await.unwrap();

    api_mock.assert_hits(1);
    assert_eq!(report.records_prepared, 2);
    assert_eq!(report.records_uploaded(), 2);
    assert_eq!(report.skipped_placeholders, 1);
    assert!(report.row_failures.is_empty());
}

#[tokio::test]
async fn test_dry_run_dump_excludes_untitled_rows() {
    let temp_dir = TempDir::new().unwrap();
    let csv = "\
Name,URL,Summary,Description,Tagline,Location,Pricing
Jasper AI,https://jasper.ai,AI copywriter,,Write faster,Austin,$49/mo
Untitled,https://nothing.io,,,,,
,https://blank.io,,,,,
Sarvam,https://sarvam.ai,,Indic LLMs,,Bengaluru / Bangalore,Contact sales
";
    std::fs::write(temp_dir.path().join("tools.csv"), csv).unwrap();

    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(POST).path("/rest/v1/tools");
        then.status(201);
    });

    let mut config = cli_config("tools.csv", &server.base_url());
    config.dry_run = true;
    config.dump_path = Some("out/prepared.json".to_string());

    let engine = engine_for(&temp_dir, config);
    let report = engine.run().await.unwrap();

    api_mock.assert_hits(0);
    assert!(report.load.dry_run);
    assert_eq!(report.rows_read, 4);
    assert_eq!(report.skipped_placeholders, 2);

    let dumped = std::fs::read(temp_dir.path().join("out/prepared.json")).unwrap();
    let records: Vec<ToolRecord> = serde_json::from_slice(&dumped).unwrap();
    assert_eq!(records.len(), 2);
    assert!(records.iter().all(|r| r.name != "Untitled"));

    assert_eq!(records[0].slug, "jasper--ai-0");
    assert_eq!(records[0].pricing_type, PricingType::Paid);
    assert_eq!(records[0].tagline.as_deref(), Some("Write faster"));
    assert!(!records[0].is_india_based);

    assert_eq!(records[1].slug, "sarvam-3");
    assert_eq!(records[1].description, "Indic LLMs");
    assert_eq!(records[1].pricing_type, PricingType::ContactSales);
    assert!(records[1].is_india_based);
    assert_eq!(records[1].tagline, None);
}
