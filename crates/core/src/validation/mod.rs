//! Inference request validation.
//!
//! [`validate`] preprocesses the request and then runs every check, collecting all violations
//! instead of stopping at the first. Messages are reported in the order the checks run:
//!
//! 1. `transactionID` is not blank
//! 2. at least one input resource is not the algorithm reference
//! 3. exactly one algorithm reference resolves
//! 4. input metadata holds at least one entry, and every entry is valid for its scheme
//! 5. every DICOMweb and FHIR resource (inputs, then outputs) has a usable connection
//!
//! Validation never returns an error; a failing request produces a [`ValidationReport`] with
//! one or more messages.

mod connection;
mod details;

pub use connection::validate_connection;
pub use details::validate_details;

use crate::constants::{
    ALGORITHM_NOT_RESOLVED, INPUT_RESOURCES, NO_INPUT_METADATA, NO_INPUT_RESOURCES,
    OUTPUT_RESOURCES, TRANSACTION_ID_REQUIRED,
};
use crate::{algorithm, preprocess, InferenceRequest};

/// Ordered list of validation messages for one request.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ValidationReport {
    errors: Vec<String>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// All messages joined with a single space, in discovery order.
    pub fn details(&self) -> String {
        self.errors.join(" ")
    }

    pub(crate) fn push(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }
}

/// Preprocess `request`, then run every check.
pub fn validate(request: &mut InferenceRequest) -> ValidationReport {
    preprocess::preprocess(request);

    let mut report = ValidationReport::default();

    if request.transaction_id.trim().is_empty() {
        report.push(TRANSACTION_ID_REQUIRED);
    }

    if !request.input_resources.iter().any(|r| !r.is_algorithm()) {
        report.push(NO_INPUT_RESOURCES);
    }

    if algorithm::algorithm(request).is_none() {
        report.push(ALGORITHM_NOT_RESOLVED);
    }

    check_input_metadata(request, &mut report);

    for resource in &request.input_resources {
        validate_connection(INPUT_RESOURCES, resource, &mut report);
    }
    for resource in &request.output_resources {
        validate_connection(OUTPUT_RESOURCES, resource, &mut report);
    }

    if report.is_valid() {
        tracing::debug!(
            request_id = %request.request_id(),
            transaction_id = %request.transaction_id,
            "inference request is valid"
        );
    } else {
        tracing::warn!(
            request_id = %request.request_id(),
            transaction_id = %request.transaction_id,
            error_count = report.errors().len(),
            "inference request failed validation"
        );
    }

    report
}

/// Boolean-plus-details form of [`validate`].
pub fn is_valid(request: &mut InferenceRequest) -> (bool, String) {
    let report = validate(request);
    (report.is_valid(), report.details())
}

fn check_input_metadata(request: &InferenceRequest, report: &mut ValidationReport) {
    let Some(metadata) = request.input_metadata.as_ref() else {
        report.push(NO_INPUT_METADATA);
        return;
    };

    let inputs = metadata.inputs.as_deref().unwrap_or_default();
    if metadata.details.is_none() && inputs.is_empty() {
        report.push(NO_INPUT_METADATA);
        return;
    }

    if let Some(details) = metadata.details.as_ref() {
        validate_details(details, report);
    }
    for details in inputs {
        validate_details(details, report);
    }
}
