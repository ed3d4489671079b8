use crate::RequestId;

/// Hard failures raised by the gateway core.
///
/// Content problems in a submitted request are never reported through this type; they are
/// collected into a [`crate::validation::ValidationReport`]. `IgwError` covers misuse of the
/// core (reconfiguring storage, deriving a job name before an algorithm resolves) and input
/// that cannot be read at all.
#[derive(Debug, thiserror::Error)]
pub enum IgwError {
    #[error("storage location is already configured: {existing}")]
    StorageLocationConflict { existing: String },
    #[error("inference request {0} is already registered")]
    DuplicateRequest(RequestId),

    #[error("storage location cannot be empty")]
    BlankStoragePath,
    #[error("no single algorithm resolved from 'inputResources'; cannot derive a job name")]
    AlgorithmNotResolved,

    #[error("unknown inference request: {0}")]
    UnknownRequest(RequestId),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("inference request schema mismatch at {path}: {message}")]
    Schema { path: String, message: String },
    #[error("failed to serialize inference request: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Coarse classification of an [`IgwError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// A value that may only be set once was set again.
    ConfigurationConflict,
    /// The caller invoked an operation whose precondition does not hold.
    PreconditionViolation,
    /// Lookup of a request that the arena does not hold.
    NotFound,
    /// Input that could not be parsed or serialised.
    Input,
}

impl IgwError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            IgwError::StorageLocationConflict { .. } | IgwError::DuplicateRequest(_) => {
                ErrorKind::ConfigurationConflict
            }
            IgwError::BlankStoragePath | IgwError::AlgorithmNotResolved => {
                ErrorKind::PreconditionViolation
            }
            IgwError::UnknownRequest(_) => ErrorKind::NotFound,
            IgwError::InvalidInput(_) | IgwError::Schema { .. } | IgwError::Serialization(_) => {
                ErrorKind::Input
            }
        }
    }
}

pub type IgwResult<T> = std::result::Result<T, IgwError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn misuse_errors_are_classified_apart_from_input_errors() {
        let conflict = IgwError::StorageLocationConflict {
            existing: "/data/a".into(),
        };
        assert_eq!(conflict.kind(), ErrorKind::ConfigurationConflict);
        assert_eq!(IgwError::BlankStoragePath.kind(), ErrorKind::PreconditionViolation);
        assert_eq!(
            IgwError::AlgorithmNotResolved.kind(),
            ErrorKind::PreconditionViolation
        );
        assert_eq!(
            IgwError::InvalidInput("bad".into()).kind(),
            ErrorKind::Input
        );
    }
}
