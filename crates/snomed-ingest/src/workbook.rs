//! Loading of the multi-sheet patient-data workbook.
//!
//! The workbook carries three sheets: `Patient`, `Observation`, and
//! `Medical dictionary`. Columns are located by header name on the first row
//! of each sheet. Identifier and code columns are always read as text; Excel
//! cells that store codes numerically are converted losslessly.

use std::io::{Read, Seek};
use std::path::Path;

use calamine::{Data, DataType, Range, Reader, Xlsx, XlsxError, open_workbook};
use chrono::NaiveDate;
use tracing::info;

use snomed_model::{
    Dictionary, DictionaryEntry, MedCodeId, Observation, Observations, Patient, Patients,
    SnomedConceptId,
};

use crate::error::IngestError;

pub const PATIENT_SHEET: &str = "Patient";
pub const OBSERVATION_SHEET: &str = "Observation";
pub const DICTIONARY_SHEET: &str = "Medical dictionary";

/// The three tables carried by a patient-data workbook.
#[derive(Debug, Clone)]
pub struct ExtractTables {
    pub patients: Patients,
    pub observations: Observations,
    pub dictionary: Dictionary,
}

/// Load the `Patient`, `Observation`, and `Medical dictionary` sheets.
///
/// # Errors
///
/// Fails when the file cannot be opened, a sheet or required column is
/// missing, or a cell cannot be interpreted with its declared type.
pub fn load_workbook(path: &Path) -> Result<ExtractTables, IngestError> {
    let mut workbook: Xlsx<_> = open_workbook(path).map_err(|source| IngestError::Workbook {
        path: path.to_path_buf(),
        source,
    })?;
    let patients = parse_patients(&sheet_range(&mut workbook, path, PATIENT_SHEET)?, path)?;
    let observations = parse_observations(
        &sheet_range(&mut workbook, path, OBSERVATION_SHEET)?,
        path,
    )?;
    let dictionary = parse_dictionary(&sheet_range(&mut workbook, path, DICTIONARY_SHEET)?, path)?;
    info!(
        path = %path.display(),
        patients = patients.len(),
        observations = observations.len(),
        dictionary_entries = dictionary.len(),
        "loaded patient-data workbook"
    );
    Ok(ExtractTables {
        patients: Patients::new(patients),
        observations: Observations::new(observations),
        dictionary: Dictionary::new(dictionary),
    })
}

fn sheet_range<R: Read + Seek>(
    workbook: &mut Xlsx<R>,
    path: &Path,
    sheet: &str,
) -> Result<Range<Data>, IngestError> {
    match workbook.worksheet_range(sheet) {
        Ok(range) => Ok(range),
        Err(XlsxError::WorksheetNotFound(_)) => Err(IngestError::MissingSheet {
            path: path.to_path_buf(),
            sheet: sheet.to_string(),
        }),
        Err(source) => Err(IngestError::Workbook {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn parse_patients(range: &Range<Data>, path: &Path) -> Result<Vec<Patient>, IngestError> {
    let mut rows = range.rows();
    let headers = rows.next().unwrap_or(&[]);
    let idx_patid = require_column(headers, path, PATIENT_SHEET, "patid")?;
    let idx_gender = require_column(headers, path, PATIENT_SHEET, "gender")?;
    let idx_yob = require_column(headers, path, PATIENT_SHEET, "yob")?;

    let mut patients = Vec::new();
    for (offset, row) in rows.enumerate() {
        let row_number = offset + 2;
        if row.iter().all(|cell| cell.is_empty()) {
            continue;
        }
        let patid = text_at(row, idx_patid).ok_or_else(|| {
            cell_error(path, PATIENT_SHEET, row_number, "patid", "missing patient identifier")
        })?;
        let yob = date_at(row, idx_yob)
            .map_err(|message| cell_error(path, PATIENT_SHEET, row_number, "yob", &message))?;
        patients.push(Patient {
            patid,
            gender: text_at(row, idx_gender),
            yob,
        });
    }
    Ok(patients)
}

fn parse_observations(range: &Range<Data>, path: &Path) -> Result<Vec<Observation>, IngestError> {
    let mut rows = range.rows();
    let headers = rows.next().unwrap_or(&[]);
    let idx_patid = require_column(headers, path, OBSERVATION_SHEET, "patid")?;
    let idx_medcode = require_column(headers, path, OBSERVATION_SHEET, "medcodeid")?;
    let idx_value = require_column(headers, path, OBSERVATION_SHEET, "value")?;
    let idx_obsdate = require_column(headers, path, OBSERVATION_SHEET, "obsdate")?;

    let mut observations = Vec::new();
    for (offset, row) in rows.enumerate() {
        let row_number = offset + 2;
        if row.iter().all(|cell| cell.is_empty()) {
            continue;
        }
        let patid = text_at(row, idx_patid).ok_or_else(|| {
            cell_error(
                path,
                OBSERVATION_SHEET,
                row_number,
                "patid",
                "missing patient identifier",
            )
        })?;
        let medcodeid = text_at(row, idx_medcode)
            .ok_or(snomed_model::ModelError::InvalidMedCode(String::new()))
            .and_then(MedCodeId::new)
            .map_err(|error| {
                cell_error(
                    path,
                    OBSERVATION_SHEET,
                    row_number,
                    "medcodeid",
                    &error.to_string(),
                )
            })?;
        let obsdate = date_at(row, idx_obsdate).map_err(|message| {
            cell_error(path, OBSERVATION_SHEET, row_number, "obsdate", &message)
        })?;
        observations.push(Observation {
            patid,
            medcodeid,
            value: text_at(row, idx_value),
            obsdate,
        });
    }
    Ok(observations)
}

fn parse_dictionary(range: &Range<Data>, path: &Path) -> Result<Vec<DictionaryEntry>, IngestError> {
    let mut rows = range.rows();
    let headers = rows.next().unwrap_or(&[]);
    let idx_medcode = require_column(headers, path, DICTIONARY_SHEET, "medcodeid")?;
    let idx_term = require_column(headers, path, DICTIONARY_SHEET, "term")?;
    let idx_concept = require_column(headers, path, DICTIONARY_SHEET, "snomedctconceptid")?;
    let idx_description = require_column(headers, path, DICTIONARY_SHEET, "snomedctdescriptionid")?;

    let mut entries = Vec::new();
    for (offset, row) in rows.enumerate() {
        let row_number = offset + 2;
        if row.iter().all(|cell| cell.is_empty()) {
            continue;
        }
        let medcodeid = text_at(row, idx_medcode)
            .ok_or(snomed_model::ModelError::InvalidMedCode(String::new()))
            .and_then(MedCodeId::new)
            .map_err(|error| {
                cell_error(
                    path,
                    DICTIONARY_SHEET,
                    row_number,
                    "medcodeid",
                    &error.to_string(),
                )
            })?;
        let snomedctconceptid = text_at(row, idx_concept)
            .ok_or(snomed_model::ModelError::InvalidConceptId(String::new()))
            .and_then(SnomedConceptId::new)
            .map_err(|error| {
                cell_error(
                    path,
                    DICTIONARY_SHEET,
                    row_number,
                    "snomedctconceptid",
                    &error.to_string(),
                )
            })?;
        entries.push(DictionaryEntry {
            medcodeid,
            term: text_at(row, idx_term),
            snomedctconceptid,
            snomedctdescriptionid: text_at(row, idx_description),
        });
    }
    Ok(entries)
}

fn require_column(
    headers: &[Data],
    path: &Path,
    sheet: &str,
    name: &str,
) -> Result<usize, IngestError> {
    headers
        .iter()
        .position(|cell| cell_text(cell).as_deref() == Some(name))
        .ok_or_else(|| IngestError::MissingColumn {
            path: path.to_path_buf(),
            sheet: sheet.to_string(),
            column: name.to_string(),
        })
}

fn cell_error(path: &Path, sheet: &str, row: usize, column: &str, message: &str) -> IngestError {
    IngestError::Cell {
        path: path.to_path_buf(),
        sheet: sheet.to_string(),
        row,
        column: column.to_string(),
        message: message.to_string(),
    }
}

/// A cell as trimmed text; `None` for empty cells.
///
/// Codes stored numerically by Excel render without a fractional part so they
/// join against their text counterparts.
fn cell_text(cell: &Data) -> Option<String> {
    match cell {
        Data::String(text) => {
            let trimmed = text.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Data::Int(value) => Some(value.to_string()),
        Data::Float(value) if value.fract() == 0.0 => Some(format!("{value:.0}")),
        Data::Float(value) => Some(value.to_string()),
        Data::Bool(value) => Some(value.to_string()),
        Data::DateTimeIso(text) | Data::DurationIso(text) => Some(text.clone()),
        Data::DateTime(_) | Data::Error(_) | Data::Empty => None,
    }
}

fn text_at(row: &[Data], idx: usize) -> Option<String> {
    row.get(idx).and_then(cell_text)
}

/// A cell as a calendar date: native Excel date cells or ISO text. Empty cells
/// are `None`; anything else is an error message for the caller to wrap.
fn date_at(row: &[Data], idx: usize) -> Result<Option<NaiveDate>, String> {
    let Some(cell) = row.get(idx) else {
        return Ok(None);
    };
    if cell.is_empty() {
        return Ok(None);
    }
    if let Some(date) = cell.as_date() {
        return Ok(Some(date));
    }
    if let Some(text) = cell.get_string() {
        let text = text.trim();
        if text.is_empty() {
            return Ok(None);
        }
        for format in ["%Y-%m-%d", "%d/%m/%Y"] {
            if let Ok(date) = NaiveDate::parse_from_str(text, format) {
                return Ok(Some(date));
            }
        }
    }
    Err(format!("cannot interpret {cell:?} as a calendar date"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn range_from(rows: Vec<Vec<Data>>) -> Range<Data> {
        let height = rows.len().max(1) as u32;
        let width = rows.iter().map(Vec::len).max().unwrap_or(1).max(1) as u32;
        let mut range = Range::new((0, 0), (height - 1, width - 1));
        for (r, row) in rows.into_iter().enumerate() {
            for (c, cell) in row.into_iter().enumerate() {
                range.set_value((r as u32, c as u32), cell);
            }
        }
        range
    }

    fn text(value: &str) -> Data {
        Data::String(value.to_string())
    }

    fn path() -> PathBuf {
        PathBuf::from("extract.xlsx")
    }

    #[test]
    fn parses_patient_rows() {
        let range = range_from(vec![
            vec![text("patid"), text("gender"), text("yob")],
            vec![text("4001"), text("F"), text("1962-01-01")],
            vec![text("4002"), Data::Empty, Data::Empty],
        ]);
        let patients = parse_patients(&range, &path()).expect("parse patients");
        assert_eq!(patients.len(), 2);
        assert_eq!(patients[0].patid, "4001");
        assert_eq!(
            patients[0].yob,
            NaiveDate::from_ymd_opt(1962, 1, 1)
        );
        assert_eq!(patients[1].gender, None);
        assert_eq!(patients[1].yob, None);
    }

    #[test]
    fn missing_column_is_fatal() {
        let range = range_from(vec![
            vec![text("patid"), text("gender")],
            vec![text("4001"), text("F")],
        ]);
        let error = parse_patients(&range, &path()).unwrap_err();
        assert!(matches!(
            error,
            IngestError::MissingColumn { column, .. } if column == "yob"
        ));
    }

    #[test]
    fn numeric_code_cells_convert_to_text() {
        let range = range_from(vec![
            vec![
                text("medcodeid"),
                text("term"),
                text("snomedctconceptid"),
                text("snomedctdescriptionid"),
            ],
            vec![
                Data::Float(498521.0),
                text("Asthma"),
                Data::Int(228958009),
                Data::Empty,
            ],
        ]);
        let entries = parse_dictionary(&range, &path()).expect("parse dictionary");
        assert_eq!(entries[0].medcodeid.as_str(), "498521");
        assert_eq!(entries[0].snomedctconceptid.as_str(), "228958009");
        assert_eq!(entries[0].snomedctdescriptionid, None);
    }

    #[test]
    fn empty_code_cell_is_fatal() {
        let range = range_from(vec![
            vec![
                text("medcodeid"),
                text("term"),
                text("snomedctconceptid"),
                text("snomedctdescriptionid"),
            ],
            vec![text("100"), text("Asthma"), Data::Empty, Data::Empty],
        ]);
        let error = parse_dictionary(&range, &path()).unwrap_err();
        assert!(matches!(
            error,
            IngestError::Cell { row: 2, column, .. } if column == "snomedctconceptid"
        ));
    }

    #[test]
    fn bad_date_text_is_fatal() {
        let range = range_from(vec![
            vec![text("patid"), text("gender"), text("yob")],
            vec![text("4001"), text("F"), text("not-a-date")],
        ]);
        let error = parse_patients(&range, &path()).unwrap_err();
        assert!(matches!(
            error,
            IngestError::Cell { row: 2, column, .. } if column == "yob"
        ));
    }

    #[test]
    fn observation_values_stay_raw_text() {
        let range = range_from(vec![
            vec![
                text("patid"),
                text("medcodeid"),
                text("value"),
                text("obsdate"),
            ],
            vec![text("4001"), text("100"), Data::Float(3.5), text("2021-11-17")],
            vec![text("4001"), text("200"), Data::Empty, Data::Empty],
        ]);
        let observations = parse_observations(&range, &path()).expect("parse observations");
        assert_eq!(observations[0].value.as_deref(), Some("3.5"));
        assert_eq!(
            observations[0].obsdate,
            NaiveDate::from_ymd_opt(2021, 11, 17)
        );
        assert_eq!(observations[1].value, None);
    }
}
