use crate::core::loader::CsvLoader;
use crate::core::transformer::RowTransformer;
use crate::core::uploader::BatchUploader;
use crate::core::{
    ConfigProvider, ExtractResult, LoadResult, Pipeline, Storage, TransformResult, UpsertSink,
};
use crate::utils::error::{EtlError, Result};

pub struct ImportPipeline<S: Storage, C: ConfigProvider, U: UpsertSink> {
    storage: S,
    config: C,
    sink: U,
}

impl<S: Storage, C: ConfigProvider, U: UpsertSink> ImportPipeline<S, C, U> {
    pub fn new(storage: S, config: C, sink: U) -> Self {
        Self {
            storage,
            config,
            sink,
        }
    }

    pub fn config(&self) -> &C {
        &self.config
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider, U: UpsertSink> Pipeline for ImportPipeline<S, C, U> {
    async fn extract(&self) -> Result<ExtractResult> {
        let path = self.config.input_path();
        tracing::debug!("Reading input file: {}", path);

        let data = match self.storage.read_file(path).await {
            Ok(data) => data,
            Err(EtlError::IoError(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(EtlError::InputNotFound {
                    path: path.to_string(),
                });
            }
            Err(e) => return Err(e),
        };

        CsvLoader::parse(&data)
    }

    async fn transform(&self, data: ExtractResult) -> Result<TransformResult> {
        let transformer =
            RowTransformer::new(self.config.columns().clone(), self.config.defaults());
        Ok(transformer.transform_all(data))
    }

    async fn load(&self, result: &TransformResult) -> Result<LoadResult> {
        if let Some(dump_path) = self.config.dump_path() {
            let json = serde_json::to_vec_pretty(&result.records)?;
            self.storage.write_file(dump_path, &json).await?;
            tracing::info!("📝 Wrote {} prepared records to {}", result.records.len(), dump_path);
        }

        if self.config.dry_run() {
            tracing::info!("🔍 Dry run: skipping upload of {} records", result.records.len());
            return Ok(LoadResult {
                batches: Vec::new(),
                dry_run: true,
            });
        }

        let uploader = BatchUploader::new(
            &self.sink,
            self.config.table(),
            self.config.on_conflict(),
            self.config.chunk_size(),
        );
        Ok(uploader.upload(&result.records).await)
    }
}
