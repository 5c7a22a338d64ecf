use std::path::PathBuf;

use thiserror::Error;

use crate::api::ChartId;

pub type ChartResult<T> = Result<T, ChartError>;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("invalid viewport size: width={width}, height={height}")]
    InvalidViewport { width: f64, height: f64 },

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("table is empty")]
    EmptyTable,

    #[error("column `{0}` does not exist")]
    MissingColumn(String),

    #[error("row index {index} is out of bounds for {len} rows")]
    RowOutOfBounds { index: isize, len: usize },

    #[error("`{value}` is not a number")]
    NonNumeric { value: String },

    #[error("hover candidate {id} has no hit radius and no max distance box was given")]
    MissingHitRadius { id: usize },

    #[error("text measurement failed: {0}")]
    TextMeasurement(String),

    #[error("no chart registered with id {0}")]
    UnknownChart(ChartId),

    #[error("failed to read `{path}`: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("drawing backend error: {0}")]
    Backend(String),
}
