use thiserror::Error;

/// Errors raised by the matrix engine, the network model and the trainers.
///
/// Every variant is raised synchronously at the point of violation. The
/// library never logs or exits on these; the caller decides whether a
/// failure is fatal.
#[derive(Debug, Error)]
pub enum NetError {
    /// Matrix shapes are incompatible for `op`.
    #[error("dimension mismatch in {op}: expected {expected}, got {got}")]
    Dimension {
        op: &'static str,
        expected: String,
        got: String,
    },

    /// Training inputs and targets disagree on the number of samples.
    #[error("row mismatch: {inputs} input rows but {targets} target rows")]
    RowMismatch { inputs: usize, targets: usize },

    /// Row or entry access outside the matrix.
    #[error("index {index} out of bounds (len {len})")]
    Index { index: usize, len: usize },

    /// A gradient step was requested on a training set with no samples.
    #[error("training set is empty")]
    EmptyDataset,

    /// Unknown activation tag or an invalid network layout.
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, NetError>;

impl NetError {
    pub(crate) fn shape(op: &'static str, expected: (usize, usize), got: (usize, usize)) -> Self {
        NetError::Dimension {
            op,
            expected: format!("{}x{}", expected.0, expected.1),
            got: format!("{}x{}", got.0, got.1),
        }
    }
}
