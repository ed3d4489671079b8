//! The inference request aggregate and its wire format.
//!
//! Responsibilities:
//! - Define [`InferenceRequest`], the object every other module operates on
//! - Parse caller submissions (caller-owned fields only) with path-aware error reporting
//! - Serialise full snapshots, including the gateway-managed fields, for persistence
//!
//! Notes:
//! - `state` and `status` are independent axes with no enforced transitions; the job pipeline
//!   owns them
//! - The storage path can only be set through
//!   [`InferenceRequest::configure_storage_location`]

use crate::constants::DEFAULT_PRIORITY;
use crate::details::InferenceRequestDetails;
use crate::resources::{ConnectionDetails, RequestInputDataResource, RequestOutputDataResource};
use crate::{algorithm, priority, IgwError, IgwResult, PriorityClass, RequestId};
use serde::{Deserialize, Serialize};

// ============================================================================
// Lifecycle enumerations
// ============================================================================

/// Processing stage of a request.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InferenceRequestState {
    #[default]
    Queued,
    InProcess,
    Completed,
}

/// Outcome of a request.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InferenceRequestStatus {
    #[default]
    Unknown,
    Success,
    Fail,
}

// ============================================================================
// Aggregate
// ============================================================================

/// Data to retrieve for the request.
///
/// `details` is the legacy single-entry form; [`crate::preprocess`] moves it into `inputs`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<InferenceRequestDetails>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inputs: Option<Vec<InferenceRequestDetails>>,
}

/// An inference request submitted by a clinical AI platform.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InferenceRequest {
    #[serde(rename = "inferenceRequestId", default)]
    request_id: RequestId,

    /// Caller-supplied correlation identifier.
    #[serde(rename = "transactionID", default, deserialize_with = "crate::nullable::or_default")]
    pub transaction_id: String,

    #[serde(default = "default_priority")]
    pub priority: u8,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_metadata: Option<InputMetadata>,

    #[serde(default, deserialize_with = "crate::nullable::or_default")]
    pub input_resources: Vec<RequestInputDataResource>,

    #[serde(default, deserialize_with = "crate::nullable::or_default")]
    pub output_resources: Vec<RequestOutputDataResource>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload_id: Option<String>,

    #[serde(default)]
    pub state: InferenceRequestState,

    #[serde(default)]
    pub status: InferenceRequestStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) storage_path: Option<String>,

    #[serde(default)]
    pub try_count: u32,
}

fn default_priority() -> u8 {
    DEFAULT_PRIORITY
}

impl InferenceRequest {
    /// Creates a request with a fresh identifier, default priority, no metadata and no
    /// resources.
    pub fn new(transaction_id: impl Into<String>) -> Self {
        Self {
            request_id: RequestId::new(),
            transaction_id: transaction_id.into(),
            priority: DEFAULT_PRIORITY,
            input_metadata: None,
            input_resources: Vec::new(),
            output_resources: Vec::new(),
            job_id: None,
            payload_id: None,
            state: InferenceRequestState::default(),
            status: InferenceRequestStatus::default(),
            storage_path: None,
            try_count: 0,
        }
    }

    /// Parse a caller submission from JSON.
    ///
    /// Only caller-owned fields are read (`transactionID`, `priority`, `inputMetadata`,
    /// `inputResources`, `outputResources`); gateway-managed fields in the payload are
    /// ignored and start from their defaults. Unknown keys are ignored.
    ///
    /// Content problems (a blank transaction id, missing resources, ...) are *not* errors
    /// here; they are reported by [`crate::validation::validate`].
    ///
    /// # Errors
    ///
    /// Returns [`IgwError::Schema`] naming the failing path (for example
    /// `inputResources[0].interface`) when the JSON does not match the wire schema, such as a
    /// priority outside 0 to 255.
    pub fn from_submission_json(json_text: &str) -> IgwResult<Self> {
        let mut deserializer = serde_json::Deserializer::from_str(json_text);

        let wire = match serde_path_to_error::deserialize::<_, SubmissionWire>(&mut deserializer)
        {
            Ok(parsed) => parsed,
            Err(err) => {
                let path = err.path().to_string();
                let source = err.into_inner();
                let path = if path.is_empty() || path == "." {
                    "<root>".to_string()
                } else {
                    path
                };
                return Err(IgwError::Schema {
                    path,
                    message: source.to_string(),
                });
            }
        };

        let mut request = Self::new(wire.transaction_id);
        request.priority = wire.priority;
        request.input_metadata = wire.input_metadata;
        request.input_resources = wire.input_resources;
        request.output_resources = wire.output_resources;
        Ok(request)
    }

    /// Render the full request, gateway-managed fields included, as JSON.
    pub fn to_json(&self) -> IgwResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Gateway-generated identifier, fixed at construction.
    pub fn request_id(&self) -> RequestId {
        self.request_id
    }

    /// Working-storage path, once configured.
    pub fn storage_path(&self) -> Option<&str> {
        self.storage_path.as_deref().filter(|p| !p.trim().is_empty())
    }

    /// The single algorithm reference, if exactly one is present.
    pub fn algorithm(&self) -> Option<&ConnectionDetails> {
        algorithm::algorithm(self)
    }

    pub fn priority_class(&self) -> PriorityClass {
        priority::priority_class(self)
    }
}

/// Caller-owned subset of the wire format.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SubmissionWire {
    #[serde(rename = "transactionID", default, deserialize_with = "crate::nullable::or_default")]
    transaction_id: String,
    #[serde(default = "default_priority")]
    priority: u8,
    #[serde(default)]
    input_metadata: Option<InputMetadata>,
    #[serde(default, deserialize_with = "crate::nullable::or_default")]
    input_resources: Vec<RequestInputDataResource>,
    #[serde(default, deserialize_with = "crate::nullable::or_default")]
    output_resources: Vec<RequestOutputDataResource>,
}
