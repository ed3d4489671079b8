//! Intake service: the entry point used by the REST front and the CLI.

use crate::arena::{RequestArena, RequestHandle, RequestRecord};
use crate::validation::{self, ValidationReport};
use crate::{job_name, CoreConfig, IgwError, IgwResult, InferenceRequest, RequestId};
use chrono::{DateTime, Utc};
use std::path::PathBuf;
use std::sync::Arc;

/// Result of submitting a request.
#[derive(Debug)]
pub enum SubmissionOutcome {
    /// The request passed validation and is registered.
    Accepted {
        handle: RequestHandle,
        record: Arc<RequestRecord>,
    },
    /// The request failed validation and was not registered.
    Rejected(ValidationReport),
}

/// Validates submissions and hands accepted requests to the arena.
#[derive(Clone, Debug)]
pub struct InferenceRequestService {
    cfg: Arc<CoreConfig>,
    arena: Arc<RequestArena>,
}

impl InferenceRequestService {
    pub fn new(cfg: Arc<CoreConfig>) -> Self {
        Self {
            cfg,
            arena: Arc::new(RequestArena::new()),
        }
    }

    pub fn arena(&self) -> &Arc<RequestArena> {
        &self.arena
    }

    /// Validate `request` and register it when valid.
    ///
    /// # Errors
    ///
    /// Validation failures are returned as [`SubmissionOutcome::Rejected`], not as errors.
    /// Returns [`crate::IgwError::DuplicateRequest`] if the request id is already registered.
    pub fn submit(&self, mut request: InferenceRequest) -> IgwResult<SubmissionOutcome> {
        let report = validation::validate(&mut request);
        if !report.is_valid() {
            return Ok(SubmissionOutcome::Rejected(report));
        }

        let request_id = request.request_id();
        let handle = self.arena.insert(request)?;
        let record = self.arena.find(&request_id)?;
        Ok(SubmissionOutcome::Accepted { handle, record })
    }

    /// Parse a JSON submission, then [`submit`](Self::submit) it.
    pub fn submit_json(&self, json_text: &str) -> IgwResult<SubmissionOutcome> {
        let request = InferenceRequest::from_submission_json(json_text)?;
        self.submit(request)
    }

    /// Assign the configured working directory, `<storage_root>/<request id>`, to a request.
    ///
    /// # Errors
    ///
    /// Returns [`crate::IgwError::UnknownRequest`] for an unregistered id and
    /// [`crate::IgwError::StorageLocationConflict`] if storage was already assigned.
    pub fn prepare_storage(&self, request_id: &RequestId) -> IgwResult<PathBuf> {
        let record = self.arena.find(request_id)?;
        let dir = self.cfg.request_storage_dir(request_id);
        record.configure_storage_location(dir.to_string_lossy())?;
        Ok(dir)
    }

    /// Derive the job name of a registered request with the configured sanitiser.
    pub fn job_name(&self, request_id: &RequestId, now: DateTime<Utc>) -> IgwResult<String> {
        let record = self.arena.find(request_id)?;
        job_name::job_name(record.request(), now, &self.cfg.job_name_sanitizer())
    }

    /// Unregister a finished request and return its final snapshot for archival.
    ///
    /// # Errors
    ///
    /// Returns [`IgwError::UnknownRequest`] if nothing is registered under `request_id`.
    pub fn release(&self, request_id: &RequestId) -> IgwResult<InferenceRequest> {
        self.arena
            .remove(request_id)
            .map(|record| record.snapshot())
            .ok_or(IgwError::UnknownRequest(*request_id))
    }
}
