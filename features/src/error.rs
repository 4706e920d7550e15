//! Error types raised by segmentation, extraction, and the pipeline.
use soft_sensing_store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeatureError {
    /// A caller-supplied parameter is unusable for the requested operation.
    #[error("{operation}: {reason}")]
    InvalidArgument {
        operation: &'static str,
        reason: String,
    },

    /// A row's feature columns disagree with the table being assembled.
    #[error("inconsistent feature row: {reason}")]
    Shape { reason: String },

    /// The container rejected a read or an attribute failed to parse.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// An error attributed to one specific test, for batch reporting.
    #[error("test \"{test}\": {source}")]
    Test {
        test: String,
        #[source]
        source: Box<FeatureError>,
    },
}

impl FeatureError {
    pub(crate) fn invalid(operation: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            operation,
            reason: reason.into(),
        }
    }

    pub(crate) fn for_test(self, test: &str) -> Self {
        Self::Test {
            test: test.to_owned(),
            source: Box::new(self),
        }
    }
}
