use crate::analysis::error::AnalysisError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("No observations to plot")]
    NoData,

    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    #[error("Failed to create output directory '{0}'")]
    DirCreation(PathBuf, #[source] std::io::Error),

    // plotters errors are generic over the backend, so only the message is kept
    #[error("Drawing failed: {0}")]
    Render(String),
}

/// Converts a plotters result into a [`ChartError::Render`].
pub(crate) trait RenderResultExt<T> {
    fn or_render_err(self) -> Result<T, ChartError>;
}

impl<T, E: std::fmt::Display> RenderResultExt<T> for Result<T, E> {
    fn or_render_err(self) -> Result<T, ChartError> {
        self.map_err(|e| ChartError::Render(e.to_string()))
    }
}
