use snomed_core::ScreenOutcome;
use snomed_model::CodelistEntry;

#[derive(Debug)]
pub struct SearchResult {
    pub patient_id: Option<String>,
    pub diseases: Vec<String>,
}

#[derive(Debug)]
pub struct CodesResult {
    pub disease: String,
    pub entries: Vec<CodelistEntry>,
}

#[derive(Debug)]
pub struct ScreenResult {
    pub patient_id: Option<String>,
    pub outcomes: Vec<ScreenOutcome>,
}
