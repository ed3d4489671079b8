//! # IGW Core
//!
//! Validation and normalisation of inference requests sent by clinical AI platforms.
//!
//! This crate decides whether a submitted request can become a schedulable unit of work:
//! - Normalising legacy single-entry input metadata ([`preprocess`])
//! - Validating the request and every input metadata entry, collecting all violations
//!   ([`validation`])
//! - Resolving the single algorithm/pipeline reference ([`algorithm`])
//! - Classifying the raw priority ([`priority`]) and deriving the job name ([`job_name`])
//! - Owning registered requests for concurrent downstream workers ([`arena`])
//!
//! **No data handling**: fetching studies, submitting jobs to the platform, and persisting
//! records belong to other services. This crate only reasons about the metadata that
//! describes what to fetch and where results go.

pub mod algorithm;
pub mod arena;
pub mod config;
pub mod constants;
pub mod details;
pub mod error;
pub mod ids;
pub mod job_name;
pub mod preprocess;
pub mod priority;
pub mod request;
pub mod resources;
pub mod service;
pub mod validation;

mod nullable;
mod storage;

pub use algorithm::resolve_algorithm;
pub use arena::{Lifecycle, RequestArena, RequestHandle, RequestRecord};
pub use config::CoreConfig;
pub use details::{
    FhirResource, InferenceRequestDetails, InferenceRequestType, RequestedInstance,
    RequestedSeries, RequestedStudy,
};
pub use error::{ErrorKind, IgwError, IgwResult};
pub use ids::RequestId;
pub use job_name::{DnsLabelSanitizer, JobNameSanitizer};
pub use priority::{classify_priority, PriorityClass};
pub use request::{InferenceRequest, InferenceRequestState, InferenceRequestStatus, InputMetadata};
pub use resources::{
    AuthType, ConnectionDetails, InterfaceKind, RequestInputDataResource,
    RequestOutputDataResource, ResourceDescriptor,
};
pub use service::{InferenceRequestService, SubmissionOutcome};
pub use validation::{validate, ValidationReport};
