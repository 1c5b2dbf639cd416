//! The persisted ward document.

use serde::{Deserialize, Serialize};

use super::patient::{Patient, PatientStatus};
use super::ward_note::WardNote;

/// The whole persisted state: the single unit of durability, backup,
/// restore, import and export.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WardDocument {
    #[serde(default)]
    pub patients: Vec<Patient>,
    #[serde(default)]
    pub ward_notes: Vec<WardNote>,
}

impl WardDocument {
    /// Patients currently occupying a bed.
    pub fn active_patients(&self) -> Vec<&Patient> {
        self.patients.iter().filter(|p| p.is_active()).collect()
    }

    /// Archive view: patients who have left the ward.
    pub fn discharged_patients(&self) -> Vec<&Patient> {
        self.patients
            .iter()
            .filter(|p| p.status == PatientStatus::Discharged)
            .collect()
    }

    pub fn patient_by_id(&self, id: &str) -> Option<&Patient> {
        self.patients.iter().find(|p| p.id == id)
    }

    /// The active occupant of a bed, if any. Empty bed codes never match.
    pub fn active_patient_in_bed(&self, bed: &str) -> Option<&Patient> {
        if bed.is_empty() {
            return None;
        }
        self.patients
            .iter()
            .find(|p| p.is_active() && p.bed == bed)
    }
}
