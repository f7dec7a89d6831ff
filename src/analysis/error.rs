use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Group '{group}' has {found} observations, at least {required} are needed")]
    InsufficientData {
        group: String,
        found: usize,
        required: usize,
    },

    #[error("Both groups have zero variance, the t statistic is undefined")]
    ZeroVariance,

    #[error("Standard error is not finite ({0}), the samples contain NaN or infinite values")]
    NonFiniteStandardError(f64),

    #[error("Failed to construct Student's t distribution with {df} degrees of freedom: {message}")]
    Distribution { df: f64, message: String },
}
