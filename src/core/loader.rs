use crate::domain::model::{ExtractResult, RawRow, RowFailure};
use crate::utils::error::Result;
use std::collections::HashMap;

/// Reads a CSV export into header-keyed rows.
pub struct CsvLoader;

impl CsvLoader {
    /// 解析 CSV 內容；單列讀取失敗只記錄，不中斷整體
    pub fn parse(data: &[u8]) -> Result<ExtractResult> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::Headers)
            .from_reader(data);

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').to_string())
            .collect();
        tracing::debug!("CSV headers: {:?}", headers);

        let mut result = ExtractResult::default();

        for (index, record) in reader.records().enumerate() {
            match record {
                Ok(record) => {
                    let fields: HashMap<String, String> = headers
                        .iter()
                        .zip(record.iter())
                        .map(|(h, v)| (h.clone(), v.to_string()))
                        .collect();
                    result.rows.push(RawRow { index, fields });
                }
                Err(e) => {
                    tracing::warn!("⚠️ Could not read row {}: {}", index, e);
                    result.failures.push(RowFailure {
                        index,
                        reason: e.to_string(),
                    });
                }
            }
        }

        Ok(result)
    }
}
