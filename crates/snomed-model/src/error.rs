use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("invalid medcode id: {0:?}")]
    InvalidMedCode(String),
    #[error("invalid SNOMED CT concept id: {0:?}")]
    InvalidConceptId(String),
}
