use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{MedCodeId, SnomedConceptId};

/// A row in the Medical dictionary sheet: one medcode/concept mapping.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DictionaryEntry {
    pub medcodeid: MedCodeId,
    pub term: Option<String>,
    pub snomedctconceptid: SnomedConceptId,
    pub snomedctdescriptionid: Option<String>,
}

/// The medical dictionary, indexed in both directions.
///
/// The source mapping is presumed one-to-one-ish but may contain duplicate
/// rows; these are preserved, so a lookup can yield the same concept more than
/// once.
#[derive(Debug, Clone, Default)]
pub struct Dictionary {
    rows: Vec<DictionaryEntry>,
    medcode_idx: BTreeMap<MedCodeId, Vec<usize>>,
    concept_idx: BTreeMap<SnomedConceptId, Vec<usize>>,
}

impl Dictionary {
    pub fn new(rows: Vec<DictionaryEntry>) -> Self {
        let mut medcode_idx: BTreeMap<MedCodeId, Vec<usize>> = BTreeMap::new();
        let mut concept_idx: BTreeMap<SnomedConceptId, Vec<usize>> = BTreeMap::new();
        for (idx, row) in rows.iter().enumerate() {
            medcode_idx
                .entry(row.medcodeid.clone())
                .or_default()
                .push(idx);
            concept_idx
                .entry(row.snomedctconceptid.clone())
                .or_default()
                .push(idx);
        }
        Self {
            rows,
            medcode_idx,
            concept_idx,
        }
    }

    /// Concept ids mapped to `medcode`, one per dictionary row. Empty when the
    /// code is not in the dictionary.
    pub fn concepts_for(&self, medcode: &MedCodeId) -> impl Iterator<Item = &SnomedConceptId> {
        self.medcode_idx
            .get(medcode)
            .map(Vec::as_slice)
            .unwrap_or_default()
            .iter()
            .map(|idx| &self.rows[*idx].snomedctconceptid)
    }

    /// The reverse direction: medcodes mapped to `concept`.
    pub fn medcodes_for(&self, concept: &SnomedConceptId) -> impl Iterator<Item = &MedCodeId> {
        self.concept_idx
            .get(concept)
            .map(Vec::as_slice)
            .unwrap_or_default()
            .iter()
            .map(|idx| &self.rows[*idx].medcodeid)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DictionaryEntry> {
        self.rows.iter()
    }
}
