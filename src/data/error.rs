use thiserror::Error;

/// Validation failures of the metric core.
///
/// Both variants are raised before any computation happens. An empty filter
/// result is *not* an error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MetricError {
    /// Bad generation input: zero length, invalid start date, unknown metric.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Inverted date or value range.
    #[error("invalid filter: {0}")]
    InvalidFilterSpec(String),
}

pub type MetricResult<T> = std::result::Result<T, MetricError>;
