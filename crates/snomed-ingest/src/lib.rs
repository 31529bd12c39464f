//! Data ingestion for the SNOMED disease search: the patient-data workbook
//! and the disease codelist.

pub mod codelist;
pub mod error;
pub mod workbook;

pub use codelist::load_codelist;
pub use error::IngestError;
pub use workbook::{
    DICTIONARY_SHEET, ExtractTables, OBSERVATION_SHEET, PATIENT_SHEET, load_workbook,
};
