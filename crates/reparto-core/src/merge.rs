//! Offline import/export of the ward document.
//!
//! Export is a pure read; import runs a last-write-wins merge keyed by
//! entity id. Patients carry `lastUpdated` and the newer side wins; ward
//! notes have no update stamp, so an imported note with a known id
//! overwrites the stored one unconditionally. That asymmetry is inherited
//! behavior and kept as-is.

use serde::Deserialize;
use thiserror::Error;

use crate::models::{Patient, WardDocument, WardNote};

/// The import file could not be read at all. Per-entity problems never
/// raise this; they are skipped during the merge instead.
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("invalid import file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Counts of what a merge did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeSummary {
    pub patients_added: usize,
    pub patients_replaced: usize,
    pub patients_kept: usize,
    pub patients_skipped: usize,
    pub notes_added: usize,
    pub notes_replaced: usize,
    pub notes_skipped: usize,
}

/// A parsed import file. Entities stay raw JSON so one undecodable record
/// cannot abort the whole import.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportedDocument {
    #[serde(default)]
    patients: Vec<serde_json::Value>,
    #[serde(default)]
    ward_notes: Vec<serde_json::Value>,
}

/// Parse an import file; failure aborts the import as a whole.
pub fn parse_import(json: &str) -> Result<ImportedDocument, ImportError> {
    Ok(serde_json::from_str(json)?)
}

/// Merge an imported document into the current one, last-write-wins.
/// Existing entities keep their position; new ones append.
pub fn merge_documents(
    current: &WardDocument,
    imported: ImportedDocument,
) -> (WardDocument, MergeSummary) {
    let mut summary = MergeSummary::default();

    let mut patients = current.patients.clone();
    for value in imported.patients {
        let incoming: Patient = match serde_json::from_value(value) {
            Ok(p) => p,
            Err(e) => {
                tracing::warn!(error = %e, "skipping undecodable imported patient");
                summary.patients_skipped += 1;
                continue;
            }
        };
        match patients.iter().position(|p| p.id == incoming.id) {
            Some(idx) => {
                if incoming.last_updated > patients[idx].last_updated {
                    patients[idx] = incoming;
                    summary.patients_replaced += 1;
                } else {
                    summary.patients_kept += 1;
                }
            }
            None => {
                patients.push(incoming);
                summary.patients_added += 1;
            }
        }
    }

    let mut ward_notes = current.ward_notes.clone();
    for value in imported.ward_notes {
        let incoming: WardNote = match serde_json::from_value(value) {
            Ok(n) => n,
            Err(e) => {
                tracing::warn!(error = %e, "skipping undecodable imported ward note");
                summary.notes_skipped += 1;
                continue;
            }
        };
        match ward_notes.iter().position(|n| n.id == incoming.id) {
            Some(idx) => {
                ward_notes[idx] = incoming;
                summary.notes_replaced += 1;
            }
            None => {
                ward_notes.push(incoming);
                summary.notes_added += 1;
            }
        }
    }

    (WardDocument { patients, ward_notes }, summary)
}

/// Serialize the document for download/sharing.
pub fn export_document(doc: &WardDocument) -> serde_json::Result<String> {
    serde_json::to_string_pretty(doc)
}

/// Conventional name of an exported file.
pub fn export_file_name(date: chrono::NaiveDate) -> String {
    format!("backup_registro_medicina_{}.json", date.format("%Y-%m-%d"))
}
