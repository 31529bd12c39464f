use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::SnomedConceptId;

/// A row in the disease codelist: one concept/disease assignment.
///
/// The codelist is curated externally; one concept may appear under several
/// diseases and one disease spans many concepts. No cardinality is enforced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodelistEntry {
    pub concept_id: SnomedConceptId,
    pub term: Option<String>,
    pub disease: String,
    pub other_instructions: Option<String>,
    pub origin: Option<String>,
}

/// The loaded codelist, indexed by concept id and by disease label.
#[derive(Debug, Clone, Default)]
pub struct Codelist {
    rows: Vec<CodelistEntry>,
    concept_idx: BTreeMap<SnomedConceptId, Vec<usize>>,
    disease_idx: BTreeMap<String, Vec<usize>>,
}

impl Codelist {
    pub fn new(rows: Vec<CodelistEntry>) -> Self {
        let mut concept_idx: BTreeMap<SnomedConceptId, Vec<usize>> = BTreeMap::new();
        let mut disease_idx: BTreeMap<String, Vec<usize>> = BTreeMap::new();
        for (idx, row) in rows.iter().enumerate() {
            concept_idx
                .entry(row.concept_id.clone())
                .or_default()
                .push(idx);
            disease_idx
                .entry(row.disease.clone())
                .or_default()
                .push(idx);
        }
        Self {
            rows,
            concept_idx,
            disease_idx,
        }
    }

    /// Concept ids the codelist assigns to `disease`, in row order.
    pub fn codes_for_disease(&self, disease: &str) -> Vec<SnomedConceptId> {
        self.disease_idx
            .get(disease)
            .map(Vec::as_slice)
            .unwrap_or_default()
            .iter()
            .map(|idx| self.rows[*idx].concept_id.clone())
            .collect()
    }

    /// Rows assigned to `concept`, one per codelist entry.
    pub fn entries_for_concept(&self, concept: &SnomedConceptId) -> impl Iterator<Item = &CodelistEntry> {
        self.concept_idx
            .get(concept)
            .map(Vec::as_slice)
            .unwrap_or_default()
            .iter()
            .map(|idx| &self.rows[*idx])
    }

    /// The distinct disease labels in the codelist, sorted.
    pub fn diseases(&self) -> BTreeSet<&str> {
        self.disease_idx.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CodelistEntry> {
        self.rows.iter()
    }
}
