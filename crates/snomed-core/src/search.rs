//! The search façade: the four loaded tables and the operations over them.

use tracing::debug;

use snomed_model::{Codelist, Dictionary, Observations, Patient, Patients, SnomedConceptId};

use crate::resolve::{diseases_for_concepts, patient_concepts};
use crate::rules::builtin_rules;

/// Outcome of evaluating one disease rule for a patient.
#[derive(Debug, Clone)]
pub struct ScreenOutcome {
    pub disease: String,
    pub active: bool,
}

/// The four tables of a run, loaded once and read-only thereafter.
#[derive(Debug, Clone)]
pub struct DiseaseSearch {
    patients: Patients,
    observations: Observations,
    dictionary: Dictionary,
    codelist: Codelist,
}

impl DiseaseSearch {
    pub fn new(
        patients: Patients,
        observations: Observations,
        dictionary: Dictionary,
        codelist: Codelist,
    ) -> Self {
        Self {
            patients,
            observations,
            dictionary,
            codelist,
        }
    }

    pub fn patient(&self, patid: &str) -> Option<&Patient> {
        self.patients.find_by_id(patid)
    }

    /// Standardized concept codes for the patient's recorded events.
    pub fn concepts_for_patient(&self, patid: Option<&str>) -> Vec<SnomedConceptId> {
        patient_concepts(&self.observations, &self.dictionary, patid)
    }

    /// The patient's matched disease labels, one per matching codelist row.
    pub fn diseases_for_patient(&self, patid: Option<&str>) -> Vec<String> {
        let concepts = self.concepts_for_patient(patid);
        diseases_for_concepts(&self.codelist, &concepts)
    }

    /// Concept codes the codelist assigns to `disease`.
    pub fn disease_codes(&self, disease: &str) -> Vec<SnomedConceptId> {
        self.codelist.codes_for_disease(disease)
    }

    /// Evaluate the built-in disease rules against the patient's record.
    pub fn screen_patient(&self, patid: Option<&str>) -> Vec<ScreenOutcome> {
        let record: Vec<_> = match patid {
            Some(patid) => self.observations.for_patient(patid).collect(),
            None => Vec::new(),
        };
        debug!(observations = record.len(), "screening patient record");
        builtin_rules(&self.codelist)
            .into_iter()
            .map(|rule| ScreenOutcome {
                active: rule.is_active(&record, &self.dictionary),
                disease: rule.disease,
            })
            .collect()
    }

    pub fn codelist(&self) -> &Codelist {
        &self.codelist
    }
}
