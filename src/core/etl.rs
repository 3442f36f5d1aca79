use crate::core::{ImportReport, Pipeline};
use crate::utils::error::{EtlError, Result};
use crate::utils::monitor::SystemMonitor;
use chrono::Utc;

/// How a finished run ended. A missing export is an early return, not a failure.
#[derive(Debug)]
pub enum RunOutcome {
    Imported(ImportReport),
    InputMissing { message: String },
}

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    /// Like `run`, but folds a missing input file into `RunOutcome::InputMissing`
    /// so callers print one line and exit cleanly.
    pub async fn execute(&self) -> Result<RunOutcome> {
        match self.run().await {
            Ok(report) => Ok(RunOutcome::Imported(report)),
            Err(e @ EtlError::InputNotFound { .. }) => {
                tracing::debug!("Input missing: {}", e);
                Ok(RunOutcome::InputMissing {
                    message: e.user_friendly_message(),
                })
            }
            Err(e) => Err(e),
        }
    }

    pub async fn run(&self) -> Result<ImportReport> {
        let started_at = Utc::now();
        tracing::info!("🚀 Starting import");

        let extracted = self.pipeline.extract().await?;
        tracing::info!(
            "📊 Found {} rows.",
            extracted.rows.len() + extracted.failures.len()
        );
        self.monitor.log_stats("Extract");

        let transformed = self.pipeline.transform(extracted).await?;
        tracing::info!(
            "📦 Ready to upload {} tools ({} untitled skipped, {} rows failed)",
            transformed.records.len(),
            transformed.skipped_placeholders,
            transformed.failures.len()
        );
        self.monitor.log_stats("Transform");

        let load = self.pipeline.load(&transformed).await?;
        self.monitor.log_stats("Load");
        self.monitor.log_final_stats();

        let report = ImportReport {
            started_at,
            finished_at: Utc::now(),
            rows_read: transformed.rows_read,
            skipped_placeholders: transformed.skipped_placeholders,
            row_failures: transformed.failures,
            records_prepared: transformed.records.len(),
            load,
        };

        tracing::info!(
            "🎉 Import finished: {}/{} records upserted, {} failed batches",
            report.records_uploaded(),
            report.records_prepared,
            report.failed_batch_count()
        );

        Ok(report)
    }
}

/// Operator-facing summary lines. Per-batch results are already logged by the
/// uploader, so only totals appear here.
pub fn summary_lines(report: &ImportReport) -> Vec<String> {
    let mut lines = vec![
        format!("📊 Rows read: {}", report.rows_read),
        format!("⏭️  Untitled rows skipped: {}", report.skipped_placeholders),
    ];
    if !report.row_failures.is_empty() {
        let indices: Vec<String> = report
            .row_failures
            .iter()
            .map(|f| f.index.to_string())
            .collect();
        lines.push(format!("⚠️ Rows failed: {}", indices.join(", ")));
    }

    if report.load.dry_run {
        lines.push(format!(
            "🔍 Dry run: {} records prepared, nothing uploaded",
            report.records_prepared
        ));
        return lines;
    }

    if report.failed_batch_count() > 0 {
        lines.push(format!(
            "⚠️ Failed batches: {} of {}",
            report.failed_batch_count(),
            report.load.batches.len()
        ));
    }
    lines.push(format!(
        "🎉 Import complete: {}/{} records upserted in {}s",
        report.records_uploaded(),
        report.records_prepared,
        (report.finished_at - report.started_at).num_seconds()
    ));
    lines
}

pub fn print_summary(report: &ImportReport) {
    for line in summary_lines(report) {
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ExtractResult, LoadResult, TransformResult};
    use crate::domain::model::{BatchOutcome, RawRow, RowFailure};

    struct StubPipeline {
        missing_input: bool,
        failed_batch: bool,
    }

    #[async_trait::async_trait]
    impl Pipeline for StubPipeline {
        async fn extract(&self) -> Result<ExtractResult> {
            if self.missing_input {
                return Err(EtlError::InputNotFound {
                    path: "currly_data.csv".to_string(),
                });
            }
            Ok(ExtractResult {
                rows: vec![RawRow::new(0).with_field("Name", "Alpha")],
                failures: vec![RowFailure {
                    index: 1,
                    reason: "bad row".to_string(),
                }],
            })
        }

        async fn transform(&self, data: ExtractResult) -> Result<TransformResult> {
            Ok(crate::core::transformer::RowTransformer::default().transform_all(data))
        }

        async fn load(&self, result: &TransformResult) -> Result<LoadResult> {
            let mut batches = vec![BatchOutcome {
                start: 0,
                end: result.records.len(),
                error: None,
            }];
            if self.failed_batch {
                batches.push(BatchOutcome {
                    start: 50,
                    end: 100,
                    error: Some("API returned 500: boom".to_string()),
                });
            }
            Ok(LoadResult {
                batches,
                dry_run: false,
            })
        }
    }

    #[tokio::test]
    async fn test_run_builds_report() {
        let engine = EtlEngine::new(StubPipeline {
            missing_input: false,
            failed_batch: false,
        });

        let report = engine.run().await.unwrap();

        assert_eq!(report.rows_read, 2);
        assert_eq!(report.records_prepared, 1);
        assert_eq!(report.records_uploaded(), 1);
        assert_eq!(report.row_failures.len(), 1);
        assert!(!report.is_clean());
        assert!(report.finished_at >= report.started_at);
    }

    #[tokio::test]
    async fn test_run_propagates_missing_input() {
        let engine = EtlEngine::new(StubPipeline {
            missing_input: true,
            failed_batch: false,
        });

        let err = engine.run().await.unwrap_err();
        assert!(matches!(err, EtlError::InputNotFound { .. }));
    }

    #[tokio::test]
    async fn test_execute_reports_missing_input_as_single_message() {
        let engine = EtlEngine::new(StubPipeline {
            missing_input: true,
            failed_batch: false,
        });

        match engine.execute().await.unwrap() {
            RunOutcome::InputMissing { message } => {
                assert!(message.contains("currly_data.csv"));
                assert!(!message.contains('\n'));
            }
            RunOutcome::Imported(_) => panic!("expected missing input outcome"),
        }
    }

    #[tokio::test]
    async fn test_execute_wraps_successful_report() {
        let engine = EtlEngine::new(StubPipeline {
            missing_input: false,
            failed_batch: false,
        });

        let outcome = engine.execute().await.unwrap();
        assert!(matches!(outcome, RunOutcome::Imported(ref r) if r.records_prepared == 1));
    }

    #[tokio::test]
    async fn test_summary_has_totals_but_no_per_batch_lines() {
        let engine = EtlEngine::new(StubPipeline {
            missing_input: false,
            failed_batch: true,
        });
        let report = engine.run().await.unwrap();

        let lines = summary_lines(&report);

        assert!(lines
            .iter()
            .all(|l| !l.contains("Upserted batch") && !l.contains("Error on batch")));
        assert!(lines.iter().any(|l| l == "⚠️ Failed batches: 1 of 2"));
        assert!(lines.iter().any(|l| l == "⚠️ Rows failed: 1"));
        assert!(lines
            .last()
            .is_some_and(|l| l.starts_with("🎉 Import complete: 1/1")));
    }
}
