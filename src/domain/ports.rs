use crate::domain::model::{
    ColumnMap, ExtractResult, LoadResult, RecordDefaults, ToolRecord, TransformResult,
};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn input_path(&self) -> &str;
    fn table(&self) -> &str;
    fn on_conflict(&self) -> &str;
    fn chunk_size(&self) -> usize;
    fn columns(&self) -> &ColumnMap;
    fn defaults(&self) -> RecordDefaults;
    fn dry_run(&self) -> bool;
    fn dump_path(&self) -> Option<&str>;
}

/// A remote table that accepts insert-or-update calls.
#[async_trait]
pub trait UpsertSink: Send + Sync {
    /// One call per chunk; an `Err` means nothing in the chunk is known to have landed.
    async fn upsert(&self, table: &str, records: &[ToolRecord], on_conflict: &str) -> Result<()>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<ExtractResult>;
    async fn transform(&self, data: ExtractResult) -> Result<TransformResult>;
    async fn load(&self, result: &TransformResult) -> Result<LoadResult>;
}
