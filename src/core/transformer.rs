use crate::core::normalize::{classify_pricing, detect_india, make_slug};
use crate::domain::model::{
    ColumnMap, ExtractResult, RawRow, RecordDefaults, ToolRecord, TransformResult,
};

/// Notion's name for a page nobody titled.
pub const PLACEHOLDER_NAME: &str = "Untitled";

pub struct RowTransformer {
    columns: ColumnMap,
    defaults: RecordDefaults,
}

impl RowTransformer {
    pub fn new(columns: ColumnMap, defaults: RecordDefaults) -> Self {
        Self { columns, defaults }
    }

    /// `None` only for a blank name or the `Untitled` placeholder.
    pub fn transform_row(&self, row: &RawRow) -> Option<ToolRecord> {
        let cols = &self.columns;

        let name = row
            .get(&cols.name)
            .map(str::trim)
            .filter(|name| *name != PLACEHOLDER_NAME)?;

        let summary = row.get(&cols.summary);
        let description = row.get(&cols.description);

        Some(ToolRecord {
            name: name.to_string(),
            slug: make_slug(name, row.index),
            website_url: row.get(&cols.url).unwrap_or_default().trim().to_string(),
            description: summary.or(description).unwrap_or_default().to_string(),
            tagline: row.get(&cols.tagline).map(str::to_string),
            is_india_based: detect_india([row.get(&cols.location), summary, description]),
            pricing_type: classify_pricing(row.get(&cols.pricing)),
            setup_time_minutes: self.defaults.setup_time_minutes,
            is_verified: self.defaults.is_verified,
        })
    }

    /// Runs every decoded row through `transform_row`; rows the loader could
    /// not decode are carried over as failures.
    pub fn transform_all(&self, extracted: ExtractResult) -> TransformResult {
        let ExtractResult { rows, failures } = extracted;

        let mut result = TransformResult {
            rows_read: rows.len() + failures.len(),
            failures,
            ..TransformResult::default()
        };

        for row in &rows {
            match self.transform_row(row) {
                Some(record) => result.records.push(record),
                None => {
                    tracing::debug!("Skipping untitled row {}", row.index);
                    result.skipped_placeholders += 1;
                }
            }
        }

        result
    }
}

impl Default for RowTransformer {
    fn default() -> Self {
        Self::new(ColumnMap::default(), RecordDefaults::default())
    }
}
