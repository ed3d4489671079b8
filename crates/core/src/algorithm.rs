//! Resolution of the algorithm/pipeline reference.
//!
//! A request names its pipeline through exactly one input resource with the `Algorithm`
//! interface. Ambiguity is not broken by taking the first match: zero entries and several
//! entries both resolve to `None`, and the validator reports that as a content error.

use crate::resources::{ConnectionDetails, RequestInputDataResource};
use crate::InferenceRequest;

/// Returns the connection details of the only `Algorithm` entry in `resources`.
///
/// Returns `None` when there is no such entry, when there is more than one, or when the single
/// entry carries no connection details.
pub fn resolve_algorithm(resources: &[RequestInputDataResource]) -> Option<&ConnectionDetails> {
    let mut algorithms = resources.iter().filter(|r| r.is_algorithm());

    match (algorithms.next(), algorithms.next()) {
        (Some(only), None) => only.connection_details.as_ref(),
        _ => None,
    }
}

pub fn algorithm(request: &InferenceRequest) -> Option<&ConnectionDetails> {
    resolve_algorithm(&request.input_resources)
}
