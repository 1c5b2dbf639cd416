//! Patient models.

use serde::{Deserialize, Serialize};

/// Triage severity shown on the bed map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Verde,
    Giallo,
    Rosso,
}

/// Admission regime for a stay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdmissionType {
    Ordinario,
    Lungodegenza,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    M,
    F,
}

/// Lifecycle state: active patients occupy a bed, discharged ones are archive-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatientStatus {
    Active,
    Discharged,
}

/// Destination recorded when a patient leaves the ward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DischargeType {
    Domicilio,
    Protetta,
    Trasferimento,
    Decesso,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExamCategory {
    Laboratorio,
    Radiologia,
    Consulenze,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExamStatus {
    DaRichiedere,
    Prenotato,
    Effettuato,
}

/// A clinical to-do/note handed over between shifts, owned by one patient.
///
/// Handovers are never deleted directly; staff only toggle completion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Handover {
    pub id: String,
    pub text: String,
    /// Creation timestamp (epoch milliseconds), immutable.
    pub created_at: i64,
    /// Optional due-time (epoch milliseconds).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_at: Option<i64>,
    /// Older stored documents lack this field; it defaults to open.
    #[serde(default)]
    pub is_completed: bool,
}

impl Handover {
    pub fn new(text: String, scheduled_at: Option<i64>, created_at: i64) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            text,
            created_at,
            scheduled_at,
            is_completed: false,
        }
    }
}

/// An exam or consult requested outside the ward, owned by one patient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalExam {
    pub id: String,
    pub category: ExamCategory,
    pub description: String,
    pub status: ExamStatus,
    /// ISO date (`YYYY-MM-DD`) to surface a dashboard reminder, or none.
    #[serde(default)]
    pub reminder_date: Option<String>,
    /// ISO date (`YYYY-MM-DD`) of the booked appointment, or none.
    #[serde(default)]
    pub appointment_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Creation timestamp (epoch milliseconds), immutable.
    pub created_at: i64,
    /// Set on every field update.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<i64>,
}

/// One hospital bed occupant or discharged record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    /// ISO date (`YYYY-MM-DD`).
    pub date_of_birth: String,
    /// ISO date (`YYYY-MM-DD`).
    pub admission_date: String,
    pub gender: Gender,
    /// Bed code; empty once discharged.
    pub bed: String,
    pub admission_type: AdmissionType,
    pub main_diagnosis: String,
    /// Anamnesi.
    pub history: String,
    pub clinical_notes: String,
    pub severity: Severity,
    pub status: PatientStatus,
    /// Set only on discharge.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discharge_type: Option<DischargeType>,
    /// Creation timestamp (epoch milliseconds), immutable.
    pub created_at: i64,
    /// Bumped on every mutation; always `>= created_at`.
    pub last_updated: i64,
    #[serde(default)]
    pub handovers: Vec<Handover>,
    #[serde(default)]
    pub external_exams: Vec<ExternalExam>,
}

impl Patient {
    pub fn is_active(&self) -> bool {
        self.status == PatientStatus::Active
    }

    /// Display name, surname first as on the bed map.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.last_name, self.first_name)
    }
}
