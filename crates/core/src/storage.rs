//! Working-storage location assignment.
//!
//! A request's storage path is assigned exactly once. Blank paths are always rejected, and a
//! second assignment fails with [`IgwError::StorageLocationConflict`] instead of overwriting.
//! The shared, concurrent form of the same rule lives on [`crate::RequestRecord`].

use crate::{IgwError, IgwResult, InferenceRequest};

/// Reject blank or whitespace-only storage paths.
pub(crate) fn require_storage_path(path: &str) -> IgwResult<()> {
    if path.trim().is_empty() {
        return Err(IgwError::BlankStoragePath);
    }
    Ok(())
}

impl InferenceRequest {
    /// Assign the working-storage path.
    ///
    /// # Errors
    ///
    /// - [`IgwError::BlankStoragePath`] if `path` is blank, regardless of prior state.
    /// - [`IgwError::StorageLocationConflict`] if a path is already set.
    pub fn configure_storage_location(&mut self, path: impl Into<String>) -> IgwResult<()> {
        let path = path.into();
        require_storage_path(&path)?;

        if let Some(existing) = self.storage_path() {
            tracing::warn!(
                request_id = %self.request_id(),
                existing,
                "storage location already configured"
            );
            return Err(IgwError::StorageLocationConflict {
                existing: existing.to_string(),
            });
        }

        self.storage_path = Some(path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_non_blank_path_is_accepted() {
        let mut request = InferenceRequest::new("txn-1");
        request
            .configure_storage_location("/payloads/a")
            .expect("first assignment");
        assert_eq!(request.storage_path(), Some("/payloads/a"));
    }

    #[test]
    fn second_assignment_conflicts_even_with_same_path() {
        let mut request = InferenceRequest::new("txn-1");
        request
            .configure_storage_location("/payloads/a")
            .expect("first assignment");

        let err = request
            .configure_storage_location("/payloads/a")
            .expect_err("same path again");
        assert!(
            matches!(err, IgwError::StorageLocationConflict { ref existing } if existing == "/payloads/a")
        );

        let err = request
            .configure_storage_location("/payloads/b")
            .expect_err("different path");
        assert_eq!(err.kind(), crate::ErrorKind::ConfigurationConflict);
        assert_eq!(request.storage_path(), Some("/payloads/a"));
    }

    #[test]
    fn blank_path_is_rejected_before_and_after_assignment() {
        let mut request = InferenceRequest::new("txn-1");
        assert!(matches!(
            request.configure_storage_location("   "),
            Err(IgwError::BlankStoragePath)
        ));
        assert!(request.storage_path().is_none());

        request
            .configure_storage_location("/payloads/a")
            .expect("assignment");
        assert!(matches!(
            request.configure_storage_location(""),
            Err(IgwError::BlankStoragePath)
        ));
    }

    #[test]
    fn blank_persisted_path_counts_as_unset() {
        let mut request: InferenceRequest = serde_json::from_str(
            r#"{"transactionID": "txn-1", "storagePath": "  "}"#,
        )
        .expect("restore snapshot");
        request
            .configure_storage_location("/payloads/a")
            .expect("blank slot is assignable");
        assert_eq!(request.storage_path(), Some("/payloads/a"));
    }
}
