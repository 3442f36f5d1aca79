use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One data line of the CSV export, keyed by header name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRow {
    /// 0-based position among data rows, skipped rows included.
    pub index: usize,
    pub fields: HashMap<String, String>,
}

impl RawRow {
    pub fn new(index: usize) -> Self {
        Self {
            index,
            fields: HashMap::new(),
        }
    }

    pub fn with_field(mut self, column: &str, value: &str) -> Self {
        self.fields.insert(column.to_string(), value.to_string());
        self
    }

    /// Blank cells read as absent, the same as a missing column.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields
            .get(column)
            .map(String::as_str)
            .filter(|v| !v.trim().is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PricingType {
    Free,
    Freemium,
    Paid,
    ContactSales,
}

impl PricingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PricingType::Free => "free",
            PricingType::Freemium => "freemium",
            PricingType::Paid => "paid",
            PricingType::ContactSales => "contact_sales",
        }
    }
}

impl std::fmt::Display for PricingType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Source column names in the CSV export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnMap {
    pub name: String,
    pub url: String,
    pub summary: String,
    pub description: String,
    pub tagline: String,
    pub location: String,
    pub pricing: String,
}

impl Default for ColumnMap {
    fn default() -> Self {
        Self {
            name: "Name".to_string(),
            url: "URL".to_string(),
            summary: "Summary".to_string(),
            description: "Description".to_string(),
            tagline: "Tagline".to_string(),
            location: "Location".to_string(),
            pricing: "Pricing".to_string(),
        }
    }
}

/// Values the export has no column for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordDefaults {
    pub setup_time_minutes: i32,
    pub is_verified: bool,
}

impl Default for RecordDefaults {
    fn default() -> Self {
        Self {
            setup_time_minutes: 15,
            is_verified: true,
        }
    }
}

/// A row of the remote `tools` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolRecord {
    pub name: String,
    pub slug: String,
    pub website_url: String,
    pub description: String,
    pub tagline: Option<String>,
    pub is_india_based: bool,
    pub pricing_type: PricingType,
    pub setup_time_minutes: i32,
    pub is_verified: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowFailure {
    pub index: usize,
    pub reason: String,
}

#[derive(Debug, Clone, Default)]
pub struct ExtractResult {
    pub rows: Vec<RawRow>,
    /// Lines the reader could not decode.
    pub failures: Vec<RowFailure>,
}

#[derive(Debug, Clone, Default)]
pub struct TransformResult {
    pub records: Vec<ToolRecord>,
    pub rows_read: usize,
    pub skipped_placeholders: usize,
    pub failures: Vec<RowFailure>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchOutcome {
    /// Buffer offsets, end exclusive.
    pub start: usize,
    pub end: usize,
    pub error: Option<String>,
}

impl BatchOutcome {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LoadResult {
    pub batches: Vec<BatchOutcome>,
    pub dry_run: bool,
}

impl LoadResult {
    pub fn uploaded_records(&self) -> usize {
        self.batches
            .iter()
            .filter(|b| b.is_success())
            .map(BatchOutcome::len)
            .sum()
    }

    pub fn failed_batches(&self) -> impl Iterator<Item = &BatchOutcome> {
        self.batches.iter().filter(|b| !b.is_success())
    }
}

/// Everything a run did, including what it skipped or failed.
#[derive(Debug, Clone, Serialize)]
pub struct ImportReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub rows_read: usize,
    pub skipped_placeholders: usize,
    pub row_failures: Vec<RowFailure>,
    pub records_prepared: usize,
    pub load: LoadResult,
}

impl ImportReport {
    pub fn records_uploaded(&self) -> usize {
        self.load.uploaded_records()
    }

    pub fn failed_batch_count(&self) -> usize {
        self.load.failed_batches().count()
    }

    pub fn is_clean(&self) -> bool {
        self.row_failures.is_empty() && self.failed_batch_count() == 0
    }
}
