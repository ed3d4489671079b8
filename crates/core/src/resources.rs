//! Input and output resource descriptors.
//!
//! A resource descriptor names a protocol family (its *interface*) and, when the interface
//! needs network access, the connection details to reach it. Exactly one input resource must
//! carry the `Algorithm` interface; its connection details identify the pipeline that will
//! process the request (see [`crate::algorithm`]).
//!
//! Interface tags are matched ASCII-case-insensitively. Unknown tags are kept verbatim in
//! [`InterfaceKind::Other`] so they survive a round trip.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Protocol family of a resource descriptor.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum InterfaceKind {
    /// The algorithm/pipeline reference.
    Algorithm,
    /// DICOMweb (QIDO/WADO/STOW) endpoint.
    DicomWeb,
    /// FHIR server.
    Fhir,
    /// DICOM DIMSE association.
    Dimse,
    /// Any other interface tag, kept verbatim.
    Other(String),
}

impl InterfaceKind {
    pub fn as_str(&self) -> &str {
        match self {
            InterfaceKind::Algorithm => "Algorithm",
            InterfaceKind::DicomWeb => "DICOMweb",
            InterfaceKind::Fhir => "FHIR",
            InterfaceKind::Dimse => "DIMSE",
            InterfaceKind::Other(tag) => tag,
        }
    }

    /// True for interfaces whose connection details are checked by the validator.
    pub fn requires_connection_check(&self) -> bool {
        matches!(self, InterfaceKind::DicomWeb | InterfaceKind::Fhir)
    }
}

impl From<String> for InterfaceKind {
    fn from(tag: String) -> Self {
        const KNOWN: [(&str, InterfaceKind); 4] = [
            ("Algorithm", InterfaceKind::Algorithm),
            ("DICOMweb", InterfaceKind::DicomWeb),
            ("FHIR", InterfaceKind::Fhir),
            ("DIMSE", InterfaceKind::Dimse),
        ];

        KNOWN
            .into_iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(&tag))
            .map(|(_, kind)| kind)
            .unwrap_or(InterfaceKind::Other(tag))
    }
}

impl From<InterfaceKind> for String {
    fn from(kind: InterfaceKind) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for InterfaceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Authentication scheme of a connection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AuthType {
    #[default]
    #[serde(alias = "none")]
    None,
    #[serde(alias = "basic")]
    Basic,
    #[serde(alias = "bearer")]
    Bearer,
    #[serde(alias = "token")]
    Token,
}

impl fmt::Display for AuthType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AuthType::None => "None",
            AuthType::Basic => "Basic",
            AuthType::Bearer => "Bearer",
            AuthType::Token => "Token",
        };
        f.write_str(name)
    }
}

/// Endpoint and credentials reference of a resource.
///
/// `name` and `id` are only meaningful on the algorithm reference, where they identify the
/// pipeline. `auth_id` names a credential held by the gateway; the secret itself never travels
/// in a request.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "crate::nullable::or_default")]
    pub uri: String,
    #[serde(default)]
    pub auth_type: AuthType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_id: Option<String>,
}

impl ConnectionDetails {
    /// Connection details for an endpoint at `uri` without authentication.
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            ..Self::default()
        }
    }

    /// Connection details identifying an algorithm/pipeline.
    pub fn algorithm(name: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            id: Some(id.into()),
            ..Self::default()
        }
    }

    pub fn with_auth(mut self, auth_type: AuthType, auth_id: Option<String>) -> Self {
        self.auth_type = auth_type;
        self.auth_id = auth_id;
        self
    }
}

/// One entry of `inputResources` or `outputResources`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceDescriptor {
    pub interface: InterfaceKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_details: Option<ConnectionDetails>,
}

impl ResourceDescriptor {
    pub fn new(interface: InterfaceKind, connection_details: ConnectionDetails) -> Self {
        Self {
            interface,
            connection_details: Some(connection_details),
        }
    }

    pub fn is_algorithm(&self) -> bool {
        self.interface == InterfaceKind::Algorithm
    }
}

/// Entry of `inputResources`.
pub type RequestInputDataResource = ResourceDescriptor;

/// Entry of `outputResources`.
pub type RequestOutputDataResource = ResourceDescriptor;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interface_tags_parse_case_insensitively() {
        let kinds: Vec<InterfaceKind> =
            serde_json::from_str(r#"["Algorithm", "DICOMweb", "dicomweb", "fhir", "DIMSE"]"#)
                .expect("parse interface tags");
        assert_eq!(
            kinds,
            vec![
                InterfaceKind::Algorithm,
                InterfaceKind::DicomWeb,
                InterfaceKind::DicomWeb,
                InterfaceKind::Fhir,
                InterfaceKind::Dimse,
            ]
        );
    }

    #[test]
    fn unknown_interface_tag_is_kept_verbatim() {
        let kind: InterfaceKind = serde_json::from_str("\"HL7v2\"").expect("parse tag");
        assert_eq!(kind, InterfaceKind::Other("HL7v2".into()));
        assert_eq!(serde_json::to_string(&kind).expect("render"), "\"HL7v2\"");
        assert!(!kind.requires_connection_check());
    }

    #[test]
    fn connection_details_default_to_no_auth() {
        let details: ConnectionDetails =
            serde_json::from_str(r#"{"uri": "http://pacs.local/dicomweb"}"#).expect("parse");
        assert_eq!(details.auth_type, AuthType::None);
        assert!(details.auth_id.is_none());
    }

    #[test]
    fn resource_descriptor_reads_camel_case_wire_names() {
        let resource: ResourceDescriptor = serde_json::from_str(
            r#"{
                "interface": "DICOMweb",
                "connectionDetails": {
                    "uri": "http://pacs.local/dicomweb",
                    "authType": "Token",
                    "authId": "pacs-token"
                }
            }"#,
        )
        .expect("parse resource");
        assert_eq!(resource.interface, InterfaceKind::DicomWeb);
        let details = resource.connection_details.expect("connection details");
        assert_eq!(details.auth_type, AuthType::Token);
        assert_eq!(details.auth_id.as_deref(), Some("pacs-token"));
    }
}
