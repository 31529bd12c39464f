//! The two-step code resolution: local medical codes to standardized concept
//! codes, and standardized concept codes to disease labels.

use std::collections::BTreeSet;

use tracing::debug;

use snomed_model::{Codelist, Dictionary, Observations, SnomedConceptId};

/// Standardized concept codes for one patient's observations.
///
/// Every observation contributes one concept per matching dictionary row, so
/// duplicates are preserved. Emission follows observation-table order, but
/// callers must not rely on any ordering. An absent or unmatched patient
/// identifier yields an empty result.
pub fn patient_concepts(
    observations: &Observations,
    dictionary: &Dictionary,
    patid: Option<&str>,
) -> Vec<SnomedConceptId> {
    let Some(patid) = patid else {
        return Vec::new();
    };
    let mut concepts = Vec::new();
    for observation in observations.for_patient(patid) {
        concepts.extend(dictionary.concepts_for(&observation.medcodeid).cloned());
    }
    debug!(concepts = concepts.len(), "resolved standardized codes");
    concepts
}

/// Disease labels for a collection of standardized concept codes.
///
/// Emits one label per codelist row whose concept is among `concepts`, in
/// codelist order; labels repeat when several rows share one. Repeated
/// concepts in the input do not repeat labels — matching is set-membership.
pub fn diseases_for_concepts(codelist: &Codelist, concepts: &[SnomedConceptId]) -> Vec<String> {
    let present: BTreeSet<&SnomedConceptId> = concepts.iter().collect();
    codelist
        .iter()
        .filter(|entry| present.contains(&entry.concept_id))
        .map(|entry| entry.disease.clone())
        .collect()
}
