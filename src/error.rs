use crate::analysis::error::AnalysisError;
use crate::chart::error::ChartError;
use crate::dataset::error::DatasetError;
use crate::timeline::error::TimelineError;
use crate::types::fetch_range::FetchRangeError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CloudCoverError {
    #[error(transparent)]
    Timeline(#[from] TimelineError),

    #[error(transparent)]
    Dataset(#[from] DatasetError),

    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    #[error(transparent)]
    Chart(#[from] ChartError),

    #[error(transparent)]
    InvalidRange(#[from] FetchRangeError),

    #[error("No API key provided, pass --api-key or set VISUAL_CROSSING_API_KEY")]
    MissingApiKey,

    #[error("Background task failed to complete")]
    TaskJoin(#[from] tokio::task::JoinError),
}
