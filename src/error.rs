//! Errors raised while loading catalogs, assumption overrides and deal files
//!
//! The projection engine itself never fails; only the file-facing loaders do.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unknown assumption '{0}'")]
    UnknownAssumption(String),

    #[error("unknown rehab unit type '{unit_type}' for item '{id}'")]
    UnknownUnitType { id: String, unit_type: String },
}
