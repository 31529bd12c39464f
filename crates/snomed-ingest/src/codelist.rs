//! Loading of the disease codelist CSV.

use std::path::Path;

use serde::Deserialize;
use tracing::info;

use snomed_model::{Codelist, CodelistEntry, SnomedConceptId};

use crate::error::IngestError;

const REQUIRED_COLUMNS: [&str; 3] = ["SnomedCTConceptId", "Term", "Disease"];

/// Raw CSV row; converted to [`CodelistEntry`] after validation.
#[derive(Debug, Deserialize)]
struct CodelistRecord {
    #[serde(rename = "SnomedCTConceptId")]
    concept_id: String,
    #[serde(rename = "Term")]
    term: String,
    #[serde(rename = "Disease")]
    disease: String,
    #[serde(rename = "Otherinstructions", default)]
    other_instructions: Option<String>,
    #[serde(rename = "origin", default)]
    origin: Option<String>,
}

/// Load the codelist from a UTF-8 delimited file.
///
/// # Errors
///
/// Fails when the file cannot be read, a required column is absent, or a row
/// carries an empty concept id or disease label.
pub fn load_codelist(path: &Path) -> Result<Codelist, IngestError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .map_err(|error| csv_error(path, &error.to_string()))?;

    let headers = reader
        .headers()
        .map_err(|error| csv_error(path, &error.to_string()))?
        .clone();
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|header| header.trim() == column) {
            return Err(IngestError::MissingCodelistColumn {
                path: path.to_path_buf(),
                column: column.to_string(),
            });
        }
    }

    let mut entries = Vec::new();
    for (idx, record) in reader.deserialize::<CodelistRecord>().enumerate() {
        let row_number = idx + 2;
        let record = record.map_err(|error| csv_error(path, &error.to_string()))?;
        let concept_id = SnomedConceptId::new(record.concept_id)
            .map_err(|error| csv_error(path, &format!("row {row_number}: {error}")))?;
        let disease = record.disease.trim().to_string();
        if disease.is_empty() {
            return Err(csv_error(path, &format!("row {row_number}: empty disease label")));
        }
        entries.push(CodelistEntry {
            concept_id,
            term: non_empty(record.term),
            disease,
            other_instructions: record.other_instructions.and_then(non_empty),
            origin: record.origin.and_then(non_empty),
        });
    }
    info!(path = %path.display(), entries = entries.len(), "loaded disease codelist");
    Ok(Codelist::new(entries))
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn csv_error(path: &Path, message: &str) -> IngestError {
    IngestError::Csv {
        path: path.to_path_buf(),
        message: message.to_string(),
    }
}
