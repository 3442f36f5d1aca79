pub mod etl;
pub mod loader;
pub mod normalize;
pub mod pipeline;
pub mod transformer;
pub mod uploader;

pub use crate::domain::model::{
    ExtractResult, ImportReport, LoadResult, RawRow, ToolRecord, TransformResult,
};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage, UpsertSink};
pub use crate::utils::error::Result;
