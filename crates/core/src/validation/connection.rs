//! Connection checks for DICOMweb and FHIR resources.
//!
//! The two interfaces are deliberately checked differently: DICOMweb requires an `authId`
//! whenever an `authType` other than `None` is declared, FHIR does not. Both require an
//! absolute, well-formed URI.

use super::ValidationReport;
use crate::resources::{AuthType, ConnectionDetails, InterfaceKind, ResourceDescriptor};

/// Check the connection of one resource. `source` names the list it came from
/// (`inputResources` or `outputResources`) and appears in auth messages.
///
/// Interfaces other than DICOMweb and FHIR are not checked.
pub fn validate_connection(
    source: &str,
    resource: &ResourceDescriptor,
    report: &mut ValidationReport,
) {
    if !resource.interface.requires_connection_check() {
        return;
    }

    let missing = ConnectionDetails::default();
    let connection = resource.connection_details.as_ref().unwrap_or(&missing);

    if resource.interface == InterfaceKind::DicomWeb
        && connection.auth_type != AuthType::None
        && connection.auth_id.as_deref().map_or(true, |id| id.trim().is_empty())
    {
        report.push(format!(
            "One of the '{source}' has authType of '{}' but does not include a valid value for 'authId'",
            connection.auth_type
        ));
    }

    if !is_well_formed_absolute_uri(&connection.uri) {
        report.push(format!(
            "The provided URI '{}' is not well formed.",
            connection.uri
        ));
    }
}

/// True when `uri` parses and carries both a scheme and an authority.
///
/// `file:` and `urn:` forms have no authority and are rejected.
fn is_well_formed_absolute_uri(uri: &str) -> bool {
    if uri.is_empty() || uri.trim() != uri {
        return false;
    }

    match uri.parse::<hyper::Uri>() {
        Ok(parsed) => parsed.scheme().is_some() && parsed.authority().is_some(),
        Err(_) => false,
    }
}
