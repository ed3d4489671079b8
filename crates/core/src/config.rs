//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into core services. Core
//! code never reads process-wide environment variables while handling a request; the binaries
//! read them and hand the parsed values to [`CoreConfig::new`].

use crate::constants::{DEFAULT_JOB_NAME_MAX_LEN, MAX_JOB_NAME_LEN};
use crate::job_name::DnsLabelSanitizer;
use crate::{IgwError, IgwResult, RequestId};
use std::path::{Path, PathBuf};

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    storage_root: PathBuf,
    job_name_max_len: usize,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// # Errors
    ///
    /// Returns [`IgwError::InvalidInput`] if `storage_root` is empty or `job_name_max_len` is
    /// outside `1..=253`.
    pub fn new(storage_root: PathBuf, job_name_max_len: usize) -> IgwResult<Self> {
        if storage_root.as_os_str().is_empty() {
            return Err(IgwError::InvalidInput(
                "storage_root cannot be empty".into(),
            ));
        }

        let job_name_max_len = check_job_name_max_len(job_name_max_len)?;

        Ok(Self {
            storage_root,
            job_name_max_len,
        })
    }

    pub fn storage_root(&self) -> &Path {
        &self.storage_root
    }

    pub fn job_name_max_len(&self) -> usize {
        self.job_name_max_len
    }

    /// Working directory assigned to one request: `<storage_root>/<request id>`.
    pub fn request_storage_dir(&self, request_id: &RequestId) -> PathBuf {
        self.storage_root.join(request_id.to_string())
    }

    /// The job-name sanitiser matching this configuration.
    pub fn job_name_sanitizer(&self) -> DnsLabelSanitizer {
        DnsLabelSanitizer::new(self.job_name_max_len)
    }
}

/// Accept a job-name length cap in `1..=253`.
///
/// # Errors
///
/// Returns [`IgwError::InvalidInput`] for a cap outside that range.
pub fn check_job_name_max_len(job_name_max_len: usize) -> IgwResult<usize> {
    if !(1..=MAX_JOB_NAME_LEN).contains(&job_name_max_len) {
        return Err(IgwError::InvalidInput(format!(
            "job_name_max_len must be between 1 and {MAX_JOB_NAME_LEN}, got {job_name_max_len}"
        )));
    }
    Ok(job_name_max_len)
}

/// Parse the job-name length cap from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns [`DEFAULT_JOB_NAME_MAX_LEN`].
pub fn job_name_max_len_from_env_value(value: Option<String>) -> IgwResult<usize> {
    let value = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());

    match value {
        None => Ok(DEFAULT_JOB_NAME_MAX_LEN),
        Some(v) => v.parse::<usize>().map_err(|e| {
            IgwError::InvalidInput(format!("IGW_JOB_NAME_MAX_LEN is not a number ('{v}'): {e}"))
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_rejects_empty_storage_root() {
        let err = CoreConfig::new(PathBuf::new(), 63).expect_err("should reject empty root");
        assert!(matches!(err, IgwError::InvalidInput(msg) if msg.contains("storage_root")));
    }

    #[test]
    fn new_rejects_out_of_range_job_name_len() {
        assert!(CoreConfig::new(PathBuf::from("/tmp/igw"), 0).is_err());
        assert!(CoreConfig::new(PathBuf::from("/tmp/igw"), 254).is_err());
        assert!(CoreConfig::new(PathBuf::from("/tmp/igw"), 253).is_ok());
    }

    #[test]
    fn check_job_name_max_len_bounds() {
        assert!(check_job_name_max_len(0).is_err());
        assert_eq!(check_job_name_max_len(1).expect("lower bound"), 1);
        assert_eq!(check_job_name_max_len(253).expect("upper bound"), 253);
        assert!(matches!(
            check_job_name_max_len(254),
            Err(IgwError::InvalidInput(msg)) if msg.contains("between 1 and 253")
        ));
    }

    #[test]
    fn request_storage_dir_is_keyed_by_request_id() {
        let cfg = CoreConfig::new(PathBuf::from("/srv/igw"), 63).expect("valid config");
        let id = RequestId::new();
        assert_eq!(
            cfg.request_storage_dir(&id),
            PathBuf::from("/srv/igw").join(id.to_string())
        );
    }

    #[test]
    fn job_name_max_len_defaults_when_unset_or_blank() {
        assert_eq!(
            job_name_max_len_from_env_value(None).expect("default"),
            DEFAULT_JOB_NAME_MAX_LEN
        );
        assert_eq!(
            job_name_max_len_from_env_value(Some("  ".into())).expect("default"),
            DEFAULT_JOB_NAME_MAX_LEN
        );
        assert_eq!(
            job_name_max_len_from_env_value(Some(" 63 ".into())).expect("parsed"),
            63
        );
        assert!(job_name_max_len_from_env_value(Some("sixty".into())).is_err());
    }
}
