use snomed_core::{DiseaseRule, alcohol_problems_rule, builtin_rules};
use snomed_model::{
    Codelist, CodelistEntry, Dictionary, DictionaryEntry, MedCodeId, Observation, SnomedConceptId,
};

fn obs(medcode: &str, value: Option<&str>) -> Observation {
    Observation {
        patid: "4001".to_string(),
        medcodeid: MedCodeId::new(medcode).unwrap(),
        value: value.map(str::to_string),
        obsdate: None,
    }
}

fn dict_entry(medcode: &str, concept: &str) -> DictionaryEntry {
    DictionaryEntry {
        medcodeid: MedCodeId::new(medcode).unwrap(),
        term: None,
        snomedctconceptid: SnomedConceptId::new(concept).unwrap(),
        snomedctdescriptionid: None,
    }
}

fn codelist_entry(concept: &str, disease: &str) -> CodelistEntry {
    CodelistEntry {
        concept_id: SnomedConceptId::new(concept).unwrap(),
        term: None,
        disease: disease.to_string(),
        other_instructions: None,
        origin: None,
    }
}

/// Codelist with one plain alcohol concept, the two unit-count concepts, and
/// an unrelated disease.
fn alcohol_codelist() -> Codelist {
    Codelist::new(vec![
        codelist_entry("7100", "Alcohol Problem"),
        codelist_entry("228957004", "Alcohol Problem"),
        codelist_entry("228958009", "Alcohol Problem"),
        codelist_entry("7001", "Asthma"),
    ])
}

fn alcohol_dictionary() -> Dictionary {
    Dictionary::new(vec![
        dict_entry("500", "7100"),      // harmful drinking, categorical
        dict_entry("501", "228957004"), // units per day
        dict_entry("502", "228958009"), // units per week
        dict_entry("100", "7001"),
    ])
}

#[test]
fn categorical_code_activates_without_values() {
    let rule = alcohol_problems_rule(&alcohol_codelist());
    let record = [obs("500", None)];
    let refs: Vec<&Observation> = record.iter().collect();
    assert!(rule.is_active(&refs, &alcohol_dictionary()));
}

#[test]
fn daily_units_scale_to_weekly_threshold() {
    let rule = alcohol_problems_rule(&alcohol_codelist());
    let dictionary = alcohol_dictionary();

    // 3 units/day = 21/week, over the threshold of 20.
    let over = [obs("501", Some("3"))];
    let refs: Vec<&Observation> = over.iter().collect();
    assert!(rule.is_active(&refs, &dictionary));

    // 2 units/day = 14/week.
    let under = [obs("501", Some("2"))];
    let refs: Vec<&Observation> = under.iter().collect();
    assert!(!rule.is_active(&refs, &dictionary));
}

#[test]
fn weekly_units_compare_directly() {
    let rule = alcohol_problems_rule(&alcohol_codelist());
    let dictionary = alcohol_dictionary();

    let over = [obs("502", Some("25"))];
    let refs: Vec<&Observation> = over.iter().collect();
    assert!(rule.is_active(&refs, &dictionary));

    // Exactly at the threshold does not fire.
    let at = [obs("502", Some("20"))];
    let refs: Vec<&Observation> = at.iter().collect();
    assert!(!rule.is_active(&refs, &dictionary));
}

#[test]
fn unit_count_code_without_numeric_value_stays_inactive() {
    let rule = alcohol_problems_rule(&alcohol_codelist());
    let record = [obs("502", Some("declined")), obs("501", None)];
    let refs: Vec<&Observation> = record.iter().collect();
    assert!(!rule.is_active(&refs, &alcohol_dictionary()));
}

#[test]
fn unit_count_concepts_do_not_fire_on_presence_alone() {
    // The unit-count concepts are stripped from the presence set; only the
    // threshold predicates may use them.
    let rule = alcohol_problems_rule(&alcohol_codelist());
    let record = [obs("501", Some("0")), obs("502", Some("1"))];
    let refs: Vec<&Observation> = record.iter().collect();
    assert!(!rule.is_active(&refs, &alcohol_dictionary()));
}

#[test]
fn presence_rule_matches_simple_diseases() {
    let rule = DiseaseRule::code_presence(
        "Asthma",
        vec![SnomedConceptId::new("7001").unwrap()],
    );
    let dictionary = alcohol_dictionary();

    let record = [obs("100", None)];
    let refs: Vec<&Observation> = record.iter().collect();
    assert!(rule.is_active(&refs, &dictionary));
    assert!(!rule.is_active(&[], &dictionary));
}

#[test]
fn builtin_rules_cover_every_codelist_disease() {
    let codelist = alcohol_codelist();
    let rules = builtin_rules(&codelist);
    let mut names: Vec<&str> = rules.iter().map(|rule| rule.disease.as_str()).collect();
    names.sort_unstable();
    assert_eq!(names, vec!["Alcohol Problem", "Asthma"]);
}
