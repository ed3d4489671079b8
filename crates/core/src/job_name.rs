//! Job-name derivation.
//!
//! A job name is `<transactionID>-<algorithm name>-<UTC yyyyMMddHHmmss>`, passed through the
//! scheduling platform's naming rules. Those rules belong to the platform, so they sit behind
//! [`JobNameSanitizer`]; [`DnsLabelSanitizer`] implements the usual Kubernetes-style charset.

use crate::constants::{DEFAULT_JOB_NAME_MAX_LEN, JOB_NAME_TIMESTAMP_FORMAT};
use crate::{algorithm, IgwError, IgwResult, InferenceRequest};
use chrono::{DateTime, Utc};

/// Applies the scheduling platform's job-name constraints.
pub trait JobNameSanitizer {
    fn sanitize(&self, raw: &str) -> String;

    /// Sanitise `<prefix>-<suffix>` where `suffix` must survive any length cap.
    fn sanitize_with_suffix(&self, prefix: &str, suffix: &str) -> String {
        self.sanitize(&format!("{prefix}-{suffix}"))
    }
}

/// Lowercase `[a-z0-9-]` names with no leading or trailing `-`, capped at `max_len`.
///
/// Any other character becomes `-`. Names longer than `max_len` keep their start; with
/// [`JobNameSanitizer::sanitize_with_suffix`] the prefix is shortened first and the suffix
/// is only cut when it cannot fit on its own.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DnsLabelSanitizer {
    max_len: usize,
}

impl DnsLabelSanitizer {
    pub fn new(max_len: usize) -> Self {
        Self { max_len }
    }

    pub fn max_len(&self) -> usize {
        self.max_len
    }

    fn label(raw: &str, max_len: usize) -> String {
        let mapped: String = raw
            .chars()
            .map(|c| c.to_ascii_lowercase())
            .map(|c| match c {
                'a'..='z' | '0'..='9' | '-' => c,
                _ => '-',
            })
            .take(max_len)
            .collect();

        mapped.trim_matches('-').to_string()
    }
}

impl Default for DnsLabelSanitizer {
    fn default() -> Self {
        Self::new(DEFAULT_JOB_NAME_MAX_LEN)
    }
}

impl JobNameSanitizer for DnsLabelSanitizer {
    fn sanitize(&self, raw: &str) -> String {
        Self::label(raw, self.max_len)
    }

    fn sanitize_with_suffix(&self, prefix: &str, suffix: &str) -> String {
        let suffix = Self::label(suffix, self.max_len);
        // One character for the joining dash.
        let budget = self.max_len.saturating_sub(suffix.len() + 1);
        let prefix = Self::label(prefix, budget);

        if prefix.is_empty() {
            suffix
        } else if suffix.is_empty() {
            prefix
        } else {
            format!("{prefix}-{suffix}")
        }
    }
}

/// Derive the job name for `request` at time `now`.
///
/// The algorithm must resolve first (see [`crate::algorithm::resolve_algorithm`]). A resolved
/// algorithm without a name contributes an empty segment.
///
/// # Errors
///
/// Returns [`IgwError::AlgorithmNotResolved`] when `inputResources` holds zero or several
/// algorithm references.
pub fn job_name(
    request: &InferenceRequest,
    now: DateTime<Utc>,
    sanitizer: &dyn JobNameSanitizer,
) -> IgwResult<String> {
    let algorithm = algorithm::algorithm(request).ok_or(IgwError::AlgorithmNotResolved)?;
    let algorithm_name = algorithm.name.as_deref().unwrap_or_default();

    let prefix = format!("{}-{}", request.transaction_id, algorithm_name);
    let timestamp = now.format(JOB_NAME_TIMESTAMP_FORMAT).to_string();
    Ok(sanitizer.sanitize_with_suffix(&prefix, &timestamp))
}
