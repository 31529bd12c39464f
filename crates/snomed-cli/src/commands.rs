use std::path::Path;
use std::time::Instant;

use anyhow::Result;
use tracing::{debug, info, info_span, warn};

use snomed_core::DiseaseSearch;
use snomed_ingest::{load_codelist, load_workbook};

use crate::cli::{CodesArgs, PatientArgs};
use crate::types::{CodesResult, ScreenResult, SearchResult};
use snomed_cli::config::{SearchConfig, load_config};
use snomed_cli::logging::redact_value;

pub fn run_search(config_dir: &Path, args: &PatientArgs) -> Result<SearchResult> {
    let config = load_config(config_dir)?;
    let span = info_span!("search");
    let _guard = span.enter();

    let search = load_search(&config)?;
    let patient_id = args.patient_id.clone().or_else(|| config.patient.id.clone());
    log_patient(&search, patient_id.as_deref());

    let start = Instant::now();
    let diseases = search.diseases_for_patient(patient_id.as_deref());
    info!(
        diseases = diseases.len(),
        duration_ms = start.elapsed().as_millis(),
        "search complete"
    );
    Ok(SearchResult {
        patient_id,
        diseases,
    })
}

pub fn run_codes(config_dir: &Path, args: &CodesArgs) -> Result<CodesResult> {
    let config = load_config(config_dir)?;
    let codelist = load_codelist(&config.codelist.path)?;
    let entries: Vec<_> = codelist
        .iter()
        .filter(|entry| entry.disease == args.disease)
        .cloned()
        .collect();
    if entries.is_empty() {
        warn!(disease = %args.disease, "disease not present in codelist");
    }
    Ok(CodesResult {
        disease: args.disease.clone(),
        entries,
    })
}

pub fn run_screen(config_dir: &Path, args: &PatientArgs) -> Result<ScreenResult> {
    let config = load_config(config_dir)?;
    let span = info_span!("screen");
    let _guard = span.enter();

    let search = load_search(&config)?;
    let patient_id = args.patient_id.clone().or_else(|| config.patient.id.clone());
    log_patient(&search, patient_id.as_deref());

    let start = Instant::now();
    let outcomes = search.screen_patient(patient_id.as_deref());
    info!(
        rules = outcomes.len(),
        active = outcomes.iter().filter(|outcome| outcome.active).count(),
        duration_ms = start.elapsed().as_millis(),
        "screening complete"
    );
    Ok(ScreenResult {
        patient_id,
        outcomes,
    })
}

fn load_search(config: &SearchConfig) -> Result<DiseaseSearch> {
    let tables = load_workbook(&config.data.workbook)?;
    let codelist = load_codelist(&config.codelist.path)?;
    Ok(DiseaseSearch::new(
        tables.patients,
        tables.observations,
        tables.dictionary,
        codelist,
    ))
}

fn log_patient(search: &DiseaseSearch, patient_id: Option<&str>) {
    match patient_id {
        Some(patid) => match search.patient(patid) {
            Some(patient) => debug!(
                patient_id = redact_value(patid),
                gender = ?patient.gender,
                birth_year = ?patient.birth_year(),
                "patient found in extract"
            ),
            None => warn!(
                patient_id = redact_value(patid),
                "patient not present in extract"
            ),
        },
        None => warn!("no patient identifier supplied"),
    }
}
