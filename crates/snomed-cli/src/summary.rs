use std::fmt::Write as _;

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};

use crate::types::{CodesResult, ScreenResult, SearchResult};

/// The enumerated disease listing for a `search` run.
pub fn render_search(result: &SearchResult) -> String {
    let mut out = String::new();
    match result.patient_id.as_deref() {
        None => {
            out.push_str("No patient identifier supplied; nothing to search.\n");
        }
        Some(patient_id) if result.diseases.is_empty() => {
            let _ = writeln!(
                out,
                "Patient {patient_id} has no diseases matching the codelist."
            );
        }
        Some(patient_id) => {
            let _ = writeln!(out, "Patient {patient_id} has these diseases:");
            for (index, disease) in result.diseases.iter().enumerate() {
                let _ = writeln!(out, "  {}. {disease}", index + 1);
            }
        }
    }
    out
}

pub fn print_search(result: &SearchResult) {
    print!("{}", render_search(result));
}

pub fn print_codes(result: &CodesResult) {
    if result.entries.is_empty() {
        println!("No codelist entries for disease {:?}.", result.disease);
        return;
    }
    println!("Disease: {}", result.disease);
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Concept Id"),
        header_cell("Term"),
        header_cell("Origin"),
    ]);
    apply_table_style(&mut table);
    for entry in &result.entries {
        table.add_row(vec![
            Cell::new(entry.concept_id.as_str()),
            text_cell(entry.term.as_deref()),
            text_cell(entry.origin.as_deref()),
        ]);
    }
    println!("{table}");
}

pub fn print_screen(result: &ScreenResult) {
    let Some(patient_id) = result.patient_id.as_deref() else {
        println!("No patient identifier supplied; nothing to screen.");
        return;
    };
    println!("Patient {patient_id} rule screening:");
    let mut table = Table::new();
    table.set_header(vec![header_cell("Disease"), header_cell("Active")]);
    apply_table_style(&mut table);
    for outcome in &result.outcomes {
        table.add_row(vec![Cell::new(&outcome.disease), active_cell(outcome.active)]);
    }
    println!("{table}");
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(100);
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn text_cell(value: Option<&str>) -> Cell {
    match value {
        Some(text) => Cell::new(text),
        None => dim_cell("-"),
    }
}

fn active_cell(active: bool) -> Cell {
    if active {
        Cell::new("✓")
            .fg(Color::Green)
            .add_attribute(Attribute::Bold)
    } else {
        dim_cell("-")
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_enumerated_diseases() {
        let result = SearchResult {
            patient_id: Some("4001".to_string()),
            diseases: vec!["Alcohol Problem".to_string(), "Asthma".to_string()],
        };
        insta::assert_snapshot!(render_search(&result), @r"
        Patient 4001 has these diseases:
          1. Alcohol Problem
          2. Asthma
        ");
    }

    #[test]
    fn renders_empty_result() {
        let result = SearchResult {
            patient_id: Some("4001".to_string()),
            diseases: Vec::new(),
        };
        insta::assert_snapshot!(render_search(&result), @"Patient 4001 has no diseases matching the codelist.");
    }

    #[test]
    fn renders_missing_patient_id() {
        let result = SearchResult {
            patient_id: None,
            diseases: Vec::new(),
        };
        insta::assert_snapshot!(render_search(&result), @"No patient identifier supplied; nothing to search.");
    }
}
