//! Normalisation of legacy single-entry input metadata.
//!
//! Older platforms send one entry in `inputMetadata.details`; newer ones send a list in
//! `inputMetadata.inputs`. After [`preprocess`] every entry lives in `inputs`, in submission
//! order, with the legacy entry appended last.

use crate::InferenceRequest;

/// Move the legacy `details` entry into `inputs`.
///
/// Does nothing when `inputMetadata` is absent. A second run finds the legacy slot empty and
/// changes nothing.
pub fn preprocess(request: &mut InferenceRequest) {
    let Some(metadata) = request.input_metadata.as_mut() else {
        return;
    };

    let inputs = metadata.inputs.get_or_insert_with(Vec::new);
    if let Some(details) = metadata.details.take() {
        inputs.push(details);
    }
}
