//! Input metadata: what data the request wants retrieved.
//!
//! Each [`InferenceRequestDetails`] entry declares an addressing scheme through its `type` tag
//! and carries the fields that scheme needs. The wire shape is flat (every scheme's fields are
//! optional siblings of `type`); [`crate::validation`] dispatches on the tag and only inspects
//! the fields of that scheme.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Addressing scheme of a detail entry.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum InferenceRequestType {
    /// Study/series/instance UIDs (`DICOM_UID`).
    DicomUid,
    /// All studies of one patient (`DICOM_PATIENT_ID`).
    DicomPatientId,
    /// Studies by accession number (`ACCESSION_NUMBER`).
    AccessionNumber,
    /// FHIR resources by type and id (`FHIR_RESOURCE`).
    FhirResource,
    /// A tag the gateway does not support; kept so the validator can name it.
    Unsupported(String),
}

impl InferenceRequestType {
    pub fn as_str(&self) -> &str {
        match self {
            InferenceRequestType::DicomUid => "DICOM_UID",
            InferenceRequestType::DicomPatientId => "DICOM_PATIENT_ID",
            InferenceRequestType::AccessionNumber => "ACCESSION_NUMBER",
            InferenceRequestType::FhirResource => "FHIR_RESOURCE",
            InferenceRequestType::Unsupported(tag) => tag,
        }
    }
}

impl From<String> for InferenceRequestType {
    fn from(tag: String) -> Self {
        match tag.to_ascii_uppercase().as_str() {
            "DICOM_UID" => InferenceRequestType::DicomUid,
            "DICOM_PATIENT_ID" => InferenceRequestType::DicomPatientId,
            "ACCESSION_NUMBER" => InferenceRequestType::AccessionNumber,
            "FHIR_RESOURCE" => InferenceRequestType::FhirResource,
            _ => InferenceRequestType::Unsupported(tag),
        }
    }
}

impl From<InferenceRequestType> for String {
    fn from(request_type: InferenceRequestType) -> Self {
        request_type.as_str().to_string()
    }
}

impl fmt::Display for InferenceRequestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of `inputMetadata.inputs` (or the legacy `inputMetadata.details`).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InferenceRequestDetails {
    #[serde(rename = "type")]
    pub request_type: InferenceRequestType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub studies: Option<Vec<RequestedStudy>>,
    #[serde(rename = "PatientID", default, skip_serializing_if = "Option::is_none")]
    pub patient_id: Option<String>,
    #[serde(
        rename = "accessionNumber",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub accession_number: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resources: Option<Vec<FhirResource>>,
}

impl InferenceRequestDetails {
    /// An entry of the given scheme with no scheme fields populated.
    pub fn new(request_type: InferenceRequestType) -> Self {
        Self {
            request_type,
            studies: None,
            patient_id: None,
            accession_number: None,
            resources: None,
        }
    }

    pub fn dicom_uid(studies: Vec<RequestedStudy>) -> Self {
        Self {
            studies: Some(studies),
            ..Self::new(InferenceRequestType::DicomUid)
        }
    }

    pub fn patient_id(patient_id: impl Into<String>) -> Self {
        Self {
            patient_id: Some(patient_id.into()),
            ..Self::new(InferenceRequestType::DicomPatientId)
        }
    }

    pub fn accession_numbers(accession_numbers: Vec<String>) -> Self {
        Self {
            accession_number: Some(accession_numbers),
            ..Self::new(InferenceRequestType::AccessionNumber)
        }
    }

    pub fn fhir_resources(resources: Vec<FhirResource>) -> Self {
        Self {
            resources: Some(resources),
            ..Self::new(InferenceRequestType::FhirResource)
        }
    }
}

/// A study requested by UID. Without `series` the whole study is requested.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestedStudy {
    #[serde(rename = "StudyInstanceUID", default, deserialize_with = "crate::nullable::or_default")]
    pub study_instance_uid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub series: Option<Vec<RequestedSeries>>,
}

/// A series requested by UID. Without `instances` the whole series is requested.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestedSeries {
    #[serde(
        rename = "SeriesInstanceUID",
        default,
        deserialize_with = "crate::nullable::or_default"
    )]
    pub series_instance_uid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instances: Option<Vec<RequestedInstance>>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestedInstance {
    #[serde(
        rename = "SOPInstanceUID",
        default,
        deserialize_with = "crate::nullable::blank_entries"
    )]
    pub sop_instance_uid: Vec<String>,
}

/// Reference to a FHIR resource.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FhirResource {
    #[serde(rename = "resourceType", default, deserialize_with = "crate::nullable::or_default")]
    pub resource_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl RequestedStudy {
    pub fn new(study_instance_uid: impl Into<String>) -> Self {
        Self {
            study_instance_uid: study_instance_uid.into(),
            series: None,
        }
    }
}
