use crate::domain::model::{BatchOutcome, LoadResult, ToolRecord};
use crate::domain::ports::UpsertSink;

pub const DEFAULT_CHUNK_SIZE: usize = 50;

/// Sends the record buffer to an [`UpsertSink`] one chunk at a time.
///
/// Chunks go out strictly in order. A failed chunk is recorded in the
/// returned [`LoadResult`] and the next chunk is still attempted; nothing is
/// retried.
pub struct BatchUploader<'a, U: UpsertSink> {
    sink: &'a U,
    table: &'a str,
    on_conflict: &'a str,
    chunk_size: usize,
}

impl<'a, U: UpsertSink> BatchUploader<'a, U> {
    pub fn new(sink: &'a U, table: &'a str, on_conflict: &'a str, chunk_size: usize) -> Self {
        Self {
            sink,
            table,
            on_conflict,
            chunk_size: chunk_size.max(1),
        }
    }

    pub async fn upload(&self, records: &[ToolRecord]) -> LoadResult {
        let mut batches = Vec::with_capacity(records.len().div_ceil(self.chunk_size));

        for (n, chunk) in records.chunks(self.chunk_size).enumerate() {
            let start = n * self.chunk_size;
            let end = start + chunk.len();

            let error = match self.sink.upsert(self.table, chunk, self.on_conflict).await {
                Ok(()) => {
                    tracing::info!("   ✅ Upserted batch {} - {}", start, end);
                    None
                }
                Err(e) => {
                    tracing::error!("   ❌ Error on batch {}: {}", start, e);
                    Some(e.to_string())
                }
            };

            batches.push(BatchOutcome { start, end, error });
        }

        LoadResult {
            batches,
            dry_run: false,
        }
    }
}
