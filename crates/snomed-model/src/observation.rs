use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::MedCodeId;

/// A row in the Observation sheet: one recorded clinical event.
///
/// `value` is kept as the raw cell text; numeric interpretation happens on
/// demand because most observations carry no value at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Observation {
    pub patid: String,
    pub medcodeid: MedCodeId,
    pub value: Option<String>,
    pub obsdate: Option<NaiveDate>,
}

impl Observation {
    /// The observation value as a number, when it parses as one.
    pub fn numeric_value(&self) -> Option<f64> {
        self.value.as_deref()?.trim().parse().ok()
    }
}

/// The loaded observation table, with an index from `patid` to row positions.
#[derive(Debug, Clone, Default)]
pub struct Observations {
    rows: Vec<Observation>,
    patid_idx: BTreeMap<String, Vec<usize>>,
}

impl Observations {
    pub fn new(rows: Vec<Observation>) -> Self {
        let mut patid_idx: BTreeMap<String, Vec<usize>> = BTreeMap::new();
        for (idx, row) in rows.iter().enumerate() {
            patid_idx.entry(row.patid.clone()).or_default().push(idx);
        }
        Self { rows, patid_idx }
    }

    /// All observations recorded for `patid`, in source order. Empty for an
    /// unknown patient.
    pub fn for_patient(&self, patid: &str) -> impl Iterator<Item = &Observation> {
        self.patid_idx
            .get(patid)
            .map(Vec::as_slice)
            .unwrap_or_default()
            .iter()
            .map(|idx| &self.rows[*idx])
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Observation> {
        self.rows.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(patid: &str, medcode: &str, value: Option<&str>) -> Observation {
        Observation {
            patid: patid.to_string(),
            medcodeid: MedCodeId::new(medcode).unwrap(),
            value: value.map(str::to_string),
            obsdate: None,
        }
    }

    #[test]
    fn groups_observations_by_patient() {
        let observations = Observations::new(vec![
            obs("4001", "100", None),
            obs("4002", "200", None),
            obs("4001", "300", None),
        ]);
        let codes: Vec<&str> = observations
            .for_patient("4001")
            .map(|o| o.medcodeid.as_str())
            .collect();
        assert_eq!(codes, vec!["100", "300"]);
        assert_eq!(observations.for_patient("missing").count(), 0);
    }

    #[test]
    fn numeric_value_parses_on_demand() {
        assert_eq!(obs("1", "100", Some("12.5")).numeric_value(), Some(12.5));
        assert_eq!(obs("1", "100", Some(" 30 ")).numeric_value(), Some(30.0));
        assert_eq!(obs("1", "100", Some("high")).numeric_value(), None);
        assert_eq!(obs("1", "100", None).numeric_value(), None);
    }
}
