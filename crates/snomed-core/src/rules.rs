//! Disease rules over a patient record.
//!
//! Most diseases are detected by plain code presence. A few combine presence
//! with numeric thresholds on recorded values — alcohol unit counts being the
//! known case — so rules are expressed as a small predicate combinator: a rule
//! is active when any of its predicates holds.

use std::collections::BTreeSet;

use snomed_model::{Codelist, Dictionary, Observation, SnomedConceptId};

/// Concept recording alcohol units consumed per day.
pub const UNITS_PER_DAY_CONCEPT: &str = "228957004";
/// Concept recording alcohol units consumed per week.
pub const UNITS_PER_WEEK_CONCEPT: &str = "228958009";
/// Codelist label for the threshold-bearing alcohol rule.
pub const ALCOHOL_PROBLEM_DISEASE: &str = "Alcohol Problem";

/// Weekly alcohol units above which the alcohol rule fires.
const MIN_WEEKLY_UNITS: f64 = 20.0;
const DAYS_PER_WEEK: f64 = 7.0;

#[derive(Debug, Clone)]
pub enum RulePredicate {
    /// Holds when any observation resolves to a concept in `codes`.
    CodePresent { codes: BTreeSet<SnomedConceptId> },
    /// Holds when an observation resolving to a concept in `codes` carries a
    /// numeric value whose weekly equivalent exceeds the threshold.
    UnitsThreshold {
        codes: BTreeSet<SnomedConceptId>,
        weekly_scale: f64,
        min_weekly_units: f64,
    },
}

impl RulePredicate {
    fn holds(&self, observations: &[&Observation], dictionary: &Dictionary) -> bool {
        match self {
            Self::CodePresent { codes } => observations.iter().any(|observation| {
                dictionary
                    .concepts_for(&observation.medcodeid)
                    .any(|concept| codes.contains(concept))
            }),
            Self::UnitsThreshold {
                codes,
                weekly_scale,
                min_weekly_units,
            } => observations.iter().any(|observation| {
                let matches_code = dictionary
                    .concepts_for(&observation.medcodeid)
                    .any(|concept| codes.contains(concept));
                matches_code
                    && observation
                        .numeric_value()
                        .is_some_and(|value| value * weekly_scale > *min_weekly_units)
            }),
        }
    }
}

/// A named disease rule: active when any predicate holds.
#[derive(Debug, Clone)]
pub struct DiseaseRule {
    pub disease: String,
    predicates: Vec<RulePredicate>,
}

impl DiseaseRule {
    pub fn new(disease: impl Into<String>, predicates: Vec<RulePredicate>) -> Self {
        Self {
            disease: disease.into(),
            predicates,
        }
    }

    /// A rule that fires on plain presence of any of `codes`.
    pub fn code_presence(
        disease: impl Into<String>,
        codes: impl IntoIterator<Item = SnomedConceptId>,
    ) -> Self {
        Self::new(
            disease,
            vec![RulePredicate::CodePresent {
                codes: codes.into_iter().collect(),
            }],
        )
    }

    pub fn is_active(&self, observations: &[&Observation], dictionary: &Dictionary) -> bool {
        self.predicates
            .iter()
            .any(|predicate| predicate.holds(observations, dictionary))
    }
}

/// The alcohol-problems rule.
///
/// The codelist's "Alcohol Problem" concepts split into a plain presence set
/// and the two unit-count concepts, which instead compare recorded values
/// against a weekly threshold (daily counts scaled to weeks).
pub fn alcohol_problems_rule(codelist: &Codelist) -> DiseaseRule {
    let all = codelist.codes_for_disease(ALCOHOL_PROBLEM_DISEASE);
    let unit_concepts = [UNITS_PER_DAY_CONCEPT, UNITS_PER_WEEK_CONCEPT];
    let presence: BTreeSet<SnomedConceptId> = all
        .iter()
        .filter(|concept| !unit_concepts.contains(&concept.as_str()))
        .cloned()
        .collect();
    let day_codes: BTreeSet<SnomedConceptId> = all
        .iter()
        .filter(|concept| concept.as_str() == UNITS_PER_DAY_CONCEPT)
        .cloned()
        .collect();
    let week_codes: BTreeSet<SnomedConceptId> = all
        .iter()
        .filter(|concept| concept.as_str() == UNITS_PER_WEEK_CONCEPT)
        .cloned()
        .collect();
    DiseaseRule::new(
        ALCOHOL_PROBLEM_DISEASE,
        vec![
            RulePredicate::CodePresent { codes: presence },
            RulePredicate::UnitsThreshold {
                codes: day_codes,
                weekly_scale: DAYS_PER_WEEK,
                min_weekly_units: MIN_WEEKLY_UNITS,
            },
            RulePredicate::UnitsThreshold {
                codes: week_codes,
                weekly_scale: 1.0,
                min_weekly_units: MIN_WEEKLY_UNITS,
            },
        ],
    )
}

/// One rule per distinct codelist disease: the alcohol rule where thresholds
/// apply, plain code presence everywhere else.
pub fn builtin_rules(codelist: &Codelist) -> Vec<DiseaseRule> {
    codelist
        .diseases()
        .into_iter()
        .map(|disease| {
            if disease == ALCOHOL_PROBLEM_DISEASE {
                alcohol_problems_rule(codelist)
            } else {
                DiseaseRule::code_presence(disease, codelist.codes_for_disease(disease))
            }
        })
        .collect()
}
