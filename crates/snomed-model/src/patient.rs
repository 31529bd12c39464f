use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// A row in the Patient sheet. `patid` identifies the same patient across all
/// tables in an extract.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Patient {
    pub patid: String,
    pub gender: Option<String>,
    pub yob: Option<NaiveDate>,
}

impl Patient {
    pub fn birth_year(&self) -> Option<i32> {
        self.yob.map(|date| date.year())
    }
}

/// The loaded patient table, with an index on `patid`.
#[derive(Debug, Clone, Default)]
pub struct Patients {
    rows: Vec<Patient>,
    patid_idx: BTreeMap<String, usize>,
}

impl Patients {
    pub fn new(rows: Vec<Patient>) -> Self {
        let mut patid_idx = BTreeMap::new();
        for (idx, row) in rows.iter().enumerate() {
            // First row wins for duplicate patids, matching source order.
            patid_idx.entry(row.patid.clone()).or_insert(idx);
        }
        Self { rows, patid_idx }
    }

    pub fn find_by_id(&self, patid: &str) -> Option<&Patient> {
        let idx = self.patid_idx.get(patid)?;
        self.rows.get(*idx)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Patient> {
        self.rows.iter()
    }
}
