//! Per-scheme checks for input metadata entries.

use super::ValidationReport;
use crate::constants::{
    ACCESSION_NUMBER_MISSING, DICOM_UID_WITHOUT_STUDIES, EMPTY_FHIR_RESOURCE_TYPE,
    EMPTY_SERIES_INSTANCE_UID, EMPTY_SOP_INSTANCE_UID, EMPTY_STUDY_INSTANCE_UID,
    FHIR_RESOURCES_MISSING, PATIENT_ID_MISSING,
};
use crate::details::{InferenceRequestDetails, InferenceRequestType, RequestedStudy};

/// Check one entry against the fields its `type` requires.
///
/// Exactly one scheme's checks run; an unsupported tag is itself a violation.
pub fn validate_details(details: &InferenceRequestDetails, report: &mut ValidationReport) {
    match &details.request_type {
        InferenceRequestType::DicomUid => match details.studies.as_deref() {
            Some(studies) if !studies.is_empty() => check_studies(studies, report),
            _ => report.push(DICOM_UID_WITHOUT_STUDIES),
        },
        InferenceRequestType::DicomPatientId => {
            if is_blank(details.patient_id.as_deref()) {
                report.push(PATIENT_ID_MISSING);
            }
        }
        InferenceRequestType::AccessionNumber => {
            if details.accession_number.as_ref().map_or(true, Vec::is_empty) {
                report.push(ACCESSION_NUMBER_MISSING);
            }
        }
        InferenceRequestType::FhirResource => match details.resources.as_deref() {
            Some(resources) if !resources.is_empty() => {
                for resource in resources {
                    if resource.resource_type.trim().is_empty() {
                        report.push(EMPTY_FHIR_RESOURCE_TYPE);
                    }
                }
            }
            _ => report.push(FHIR_RESOURCES_MISSING),
        },
        InferenceRequestType::Unsupported(tag) => {
            report.push(format!("'inputMetadata' does not yet support type '{tag}'."));
        }
    }
}

/// Series and instances are optional at every level; their absence requests the whole parent.
fn check_studies(studies: &[RequestedStudy], report: &mut ValidationReport) {
    for study in studies {
        if study.study_instance_uid.trim().is_empty() {
            report.push(EMPTY_STUDY_INSTANCE_UID);
        }

        for series in study.series.iter().flatten() {
            if series.series_instance_uid.trim().is_empty() {
                report.push(EMPTY_SERIES_INSTANCE_UID);
            }

            for instance in series.instances.iter().flatten() {
                if instance.sop_instance_uid.iter().any(|uid| uid.trim().is_empty()) {
                    report.push(EMPTY_SOP_INSTANCE_UID);
                }
            }
        }
    }
}

fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |v| v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::details::{FhirResource, RequestedInstance, RequestedSeries};

    fn errors_for(details: &InferenceRequestDetails) -> Vec<String> {
        let mut report = ValidationReport::default();
        validate_details(details, &mut report);
        report.errors().to_vec()
    }

    #[test]
    fn dicom_uid_requires_studies() {
        assert_eq!(
            errors_for(&InferenceRequestDetails::new(InferenceRequestType::DicomUid)),
            vec![DICOM_UID_WITHOUT_STUDIES]
        );
        assert_eq!(
            errors_for(&InferenceRequestDetails::dicom_uid(Vec::new())),
            vec![DICOM_UID_WITHOUT_STUDIES]
        );
    }

    #[test]
    fn study_level_request_without_series_is_valid() {
        let details = InferenceRequestDetails::dicom_uid(vec![RequestedStudy::new("1.2.3")]);
        assert!(errors_for(&details).is_empty());
    }

    #[test]
    fn blank_uids_are_reported_at_each_level() {
        let details = InferenceRequestDetails::dicom_uid(vec![RequestedStudy {
            study_instance_uid: " ".into(),
            series: Some(vec![
                RequestedSeries {
                    series_instance_uid: "".into(),
                    instances: None,
                },
                RequestedSeries {
                    series_instance_uid: "1.2.3.4".into(),
                    instances: Some(vec![
                        RequestedInstance {
                            sop_instance_uid: vec!["1.2.3.4.5".into(), "".into()],
                        },
                        RequestedInstance {
                            sop_instance_uid: vec!["1.2.3.4.6".into()],
                        },
                    ]),
                },
            ]),
        }]);

        assert_eq!(
            errors_for(&details),
            vec![
                EMPTY_STUDY_INSTANCE_UID,
                EMPTY_SERIES_INSTANCE_UID,
                EMPTY_SOP_INSTANCE_UID,
            ]
        );
    }

    #[test]
    fn patient_id_must_not_be_blank() {
        assert!(errors_for(&InferenceRequestDetails::patient_id("PID-1")).is_empty());
        assert_eq!(
            errors_for(&InferenceRequestDetails::patient_id("  ")),
            vec![PATIENT_ID_MISSING]
        );
    }

    #[test]
    fn accession_number_list_must_not_be_empty() {
        let details = InferenceRequestDetails::accession_numbers(vec!["A1".into()]);
        assert!(errors_for(&details).is_empty());
        assert_eq!(
            errors_for(&InferenceRequestDetails::accession_numbers(Vec::new())),
            vec![ACCESSION_NUMBER_MISSING]
        );
    }

    #[test]
    fn fhir_resources_require_a_type() {
        assert_eq!(
            errors_for(&InferenceRequestDetails::fhir_resources(Vec::new())),
            vec![FHIR_RESOURCES_MISSING]
        );

        let details = InferenceRequestDetails::fhir_resources(vec![
            FhirResource {
                resource_type: "Patient".into(),
                id: Some("p1".into()),
            },
            FhirResource {
                resource_type: "".into(),
                id: Some("o1".into()),
            },
        ]);
        assert_eq!(errors_for(&details), vec![EMPTY_FHIR_RESOURCE_TYPE]);
    }

    #[test]
    fn checks_do_not_blend_across_schemes() {
        // Studies are ignored for a patient-id entry.
        let mut details = InferenceRequestDetails::patient_id("PID-1");
        details.studies = Some(vec![RequestedStudy::new("")]);
        assert!(errors_for(&details).is_empty());
    }

    #[test]
    fn unsupported_type_is_named_in_the_error() {
        let details =
            InferenceRequestDetails::new(InferenceRequestType::Unsupported("HL7_ORDER".into()));
        assert_eq!(
            errors_for(&details),
            vec!["'inputMetadata' does not yet support type 'HL7_ORDER'."]
        );
    }
}
