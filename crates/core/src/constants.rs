//! Constants used throughout the gateway core.
//!
//! Validation messages are part of the wire contract with submitting platforms and must not be
//! reworded, including the misspelling in [`NO_INPUT_RESOURCES`].

/// Priority assigned when a submission does not carry one.
pub const DEFAULT_PRIORITY: u8 = 128;

/// Longest configurable job-name cap (DNS subdomain length).
pub const MAX_JOB_NAME_LEN: usize = 253;

/// Default cap applied by [`crate::DnsLabelSanitizer`] (DNS label length).
pub const DEFAULT_JOB_NAME_MAX_LEN: usize = 63;

/// UTC timestamp suffix of a job name: year, month, day, hour, minute, second.
pub const JOB_NAME_TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// Default directory for per-request working storage.
pub const DEFAULT_STORAGE_ROOT: &str = "payloads";

/// Wire name of the input resource list, used when naming the source of a connection error.
pub const INPUT_RESOURCES: &str = "inputResources";

/// Wire name of the output resource list.
pub const OUTPUT_RESOURCES: &str = "outputResources";

pub const TRANSACTION_ID_REQUIRED: &str = "'transactionId' is required.";

pub const NO_INPUT_RESOURCES: &str = "No 'intputResources' specified.";

pub const ALGORITHM_NOT_RESOLVED: &str = "No algorithm defined or more than one algorithms defined in 'inputResources'. 'inputResources' must include one algorithm/pipeline for the inference request.";

pub const NO_INPUT_METADATA: &str = "Request has no `inputMetadata` defined. At least one `inputs` or `inputMetadata` required.";

pub const DICOM_UID_WITHOUT_STUDIES: &str =
    "Request type is set to `DICOM_UID` but no `studies` defined.";

pub const EMPTY_STUDY_INSTANCE_UID: &str = "`StudyInstanceUID` cannot be empty.";

pub const EMPTY_SERIES_INSTANCE_UID: &str = "`SeriesInstanceUID` cannot be empty.";

pub const EMPTY_SOP_INSTANCE_UID: &str = "`SOPInstanceUID` cannot be empty.";

pub const PATIENT_ID_MISSING: &str =
    "Request type is set to `DICOM_PATIENT_ID` but `PatientID` is not defined.";

pub const ACCESSION_NUMBER_MISSING: &str =
    "Request type is set to `ACCESSION_NUMBER` but no `accessionNumber` defined.";

pub const FHIR_RESOURCES_MISSING: &str =
    "Request type is set to `FHIR_RESOURCE` but no FHIR `resources` defined.";

pub const EMPTY_FHIR_RESOURCE_TYPE: &str = "A FHIR resource type cannot be empty.";
