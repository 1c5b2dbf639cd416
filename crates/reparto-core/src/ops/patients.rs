//! Patient aggregate operations.
//!
//! Pure transformations: every operation takes the current patient list and
//! the acting timestamp, and returns the next list. Persistence and user
//! attribution live in the service layer. Operations addressed by id return
//! `None` when the target does not exist, leaving the caller to decide
//! whether that is an error.

use thiserror::Error;

use crate::models::{
    AdmissionType, DischargeType, ExamCategory, ExamStatus, ExternalExam, Gender, Handover,
    Patient, PatientStatus, Severity,
};

/// Caller-visible rejection of an admission or edit.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("first name is required")]
    MissingFirstName,

    #[error("last name is required")]
    MissingLastName,

    #[error("bed is required")]
    MissingBed,

    #[error("bed {0} is already occupied by an active patient")]
    BedOccupied(String),
}

/// Canonical person-name form: trimmed, first letter uppercase, rest
/// lowercase.
pub fn canonical_name(raw: &str) -> String {
    let trimmed = raw.trim();
    let mut chars = trimmed.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first
            .to_uppercase()
            .chain(chars.as_str().to_lowercase().chars())
            .collect(),
    }
}

/// Input for admitting a patient.
#[derive(Debug, Clone)]
pub struct NewPatient {
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: String,
    pub admission_date: String,
    pub gender: Gender,
    pub bed: String,
    pub admission_type: AdmissionType,
    pub main_diagnosis: String,
    pub history: String,
    pub clinical_notes: String,
    pub severity: Severity,
}

/// Partial edit of a patient record. `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct PatientUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub date_of_birth: Option<String>,
    pub admission_date: Option<String>,
    pub gender: Option<Gender>,
    pub bed: Option<String>,
    pub admission_type: Option<AdmissionType>,
    pub main_diagnosis: Option<String>,
    pub history: Option<String>,
    pub clinical_notes: Option<String>,
    pub severity: Option<Severity>,
}

/// Partial edit of a handover. `scheduled_at: Some(None)` clears the
/// due-time.
#[derive(Debug, Clone, Default)]
pub struct HandoverUpdate {
    pub text: Option<String>,
    pub scheduled_at: Option<Option<i64>>,
    pub is_completed: Option<bool>,
}

/// Input for requesting an external exam or consult.
#[derive(Debug, Clone)]
pub struct NewExternalExam {
    pub category: ExamCategory,
    pub description: String,
    pub status: ExamStatus,
    pub reminder_date: Option<String>,
    pub appointment_date: Option<String>,
    pub notes: Option<String>,
}

/// Partial edit of an external exam. Nested `Some(None)` clears a date or
/// the free-text notes.
#[derive(Debug, Clone, Default)]
pub struct ExamUpdate {
    pub category: Option<ExamCategory>,
    pub description: Option<String>,
    pub status: Option<ExamStatus>,
    pub reminder_date: Option<Option<String>>,
    pub appointment_date: Option<Option<String>>,
    pub notes: Option<Option<String>>,
}

fn active_occupant(patients: &[Patient], bed: &str, excluding: &str) -> Option<usize> {
    if bed.is_empty() {
        return None;
    }
    patients
        .iter()
        .position(|p| p.id != excluding && p.is_active() && p.bed == bed)
}

/// Admit a new patient. Names are canonicalized; blank names or bed are
/// rejected, as is a bed already held by an active patient.
pub fn add_patient(
    patients: &[Patient],
    draft: NewPatient,
    now: i64,
) -> Result<(Vec<Patient>, Patient), ValidationError> {
    let first_name = canonical_name(&draft.first_name);
    let last_name = canonical_name(&draft.last_name);
    let bed = draft.bed.trim().to_string();

    if first_name.is_empty() {
        return Err(ValidationError::MissingFirstName);
    }
    if last_name.is_empty() {
        return Err(ValidationError::MissingLastName);
    }
    if bed.is_empty() {
        return Err(ValidationError::MissingBed);
    }
    if active_occupant(patients, &bed, "").is_some() {
        return Err(ValidationError::BedOccupied(bed));
    }

    let patient = Patient {
        id: uuid::Uuid::new_v4().to_string(),
        first_name,
        last_name,
        date_of_birth: draft.date_of_birth,
        admission_date: draft.admission_date,
        gender: draft.gender,
        bed,
        admission_type: draft.admission_type,
        main_diagnosis: draft.main_diagnosis,
        history: draft.history,
        clinical_notes: draft.clinical_notes,
        severity: draft.severity,
        status: PatientStatus::Active,
        discharge_type: None,
        created_at: now,
        last_updated: now,
        handovers: Vec::new(),
        external_exams: Vec::new(),
    };

    let mut next = patients.to_vec();
    next.push(patient.clone());
    Ok((next, patient))
}

/// Edit a patient record.
///
/// Bed-swap rule: when the target bed is held by another active patient,
/// both records move in the same transformation — the edited patient takes
/// the target bed and the previous occupant takes the edited patient's old
/// bed — so two active patients never share a bed, not even transiently.
pub fn update_patient(
    patients: &[Patient],
    id: &str,
    update: PatientUpdate,
    now: i64,
) -> Result<Option<Vec<Patient>>, ValidationError> {
    let Some(idx) = patients.iter().position(|p| p.id == id) else {
        return Ok(None);
    };

    let mut update = update;
    if let Some(raw) = update.first_name.take() {
        let name = canonical_name(&raw);
        if name.is_empty() {
            return Err(ValidationError::MissingFirstName);
        }
        update.first_name = Some(name);
    }
    if let Some(raw) = update.last_name.take() {
        let name = canonical_name(&raw);
        if name.is_empty() {
            return Err(ValidationError::MissingLastName);
        }
        update.last_name = Some(name);
    }
    if let Some(raw) = update.bed.take() {
        let bed = raw.trim().to_string();
        if bed.is_empty() {
            return Err(ValidationError::MissingBed);
        }
        update.bed = Some(bed);
    }

    let mut next = patients.to_vec();

    // Bed-swap: the previous occupant of the target bed takes this
    // patient's old bed within the same transformation.
    if let Some(target_bed) = update.bed.as_deref() {
        if target_bed != next[idx].bed {
            if let Some(occupant) = active_occupant(&next, target_bed, id) {
                next[occupant].bed = next[idx].bed.clone();
                next[occupant].last_updated = now;
            }
        }
    }

    let patient = &mut next[idx];
    if let Some(v) = update.first_name {
        patient.first_name = v;
    }
    if let Some(v) = update.last_name {
        patient.last_name = v;
    }
    if let Some(v) = update.date_of_birth {
        patient.date_of_birth = v;
    }
    if let Some(v) = update.admission_date {
        patient.admission_date = v;
    }
    if let Some(v) = update.gender {
        patient.gender = v;
    }
    if let Some(v) = update.bed {
        patient.bed = v;
    }
    if let Some(v) = update.admission_type {
        patient.admission_type = v;
    }
    if let Some(v) = update.main_diagnosis {
        patient.main_diagnosis = v;
    }
    if let Some(v) = update.history {
        patient.history = v;
    }
    if let Some(v) = update.clinical_notes {
        patient.clinical_notes = v;
    }
    if let Some(v) = update.severity {
        patient.severity = v;
    }
    patient.last_updated = now;

    Ok(Some(next))
}

/// Discharge a patient: terminal for the active lifecycle. The bed is
/// freed and the destination recorded; the record stays in the archive.
pub fn discharge_patient(
    patients: &[Patient],
    id: &str,
    discharge_type: DischargeType,
    now: i64,
) -> Option<Vec<Patient>> {
    let idx = patients.iter().position(|p| p.id == id)?;
    let mut next = patients.to_vec();
    let patient = &mut next[idx];
    patient.status = PatientStatus::Discharged;
    patient.bed = String::new();
    patient.discharge_type = Some(discharge_type);
    patient.last_updated = now;
    Some(next)
}

/// Append a handover to a patient. The patient's handovers are kept sorted
/// newest-first by creation time; same-millisecond entries keep insertion
/// order.
pub fn add_handover(
    patients: &[Patient],
    patient_id: &str,
    text: &str,
    scheduled_at: Option<i64>,
    now: i64,
) -> Option<Vec<Patient>> {
    let idx = patients.iter().position(|p| p.id == patient_id)?;
    let mut next = patients.to_vec();
    let patient = &mut next[idx];
    patient
        .handovers
        .push(Handover::new(text.to_string(), scheduled_at, now));
    patient
        .handovers
        .sort_by(|a, b| b.created_at.cmp(&a.created_at));
    patient.last_updated = now;
    Some(next)
}

/// Merge fields onto a handover, typically toggling completion.
pub fn update_handover(
    patients: &[Patient],
    patient_id: &str,
    handover_id: &str,
    update: HandoverUpdate,
    now: i64,
) -> Option<Vec<Patient>> {
    let idx = patients.iter().position(|p| p.id == patient_id)?;
    let h_idx = patients[idx]
        .handovers
        .iter()
        .position(|h| h.id == handover_id)?;

    let mut next = patients.to_vec();
    let patient = &mut next[idx];
    let handover = &mut patient.handovers[h_idx];
    if let Some(v) = update.text {
        handover.text = v;
    }
    if let Some(v) = update.scheduled_at {
        handover.scheduled_at = v;
    }
    if let Some(v) = update.is_completed {
        handover.is_completed = v;
    }
    patient.last_updated = now;
    Some(next)
}

/// Record a new external exam request for a patient.
pub fn add_external_exam(
    patients: &[Patient],
    patient_id: &str,
    exam: NewExternalExam,
    now: i64,
) -> Option<Vec<Patient>> {
    let idx = patients.iter().position(|p| p.id == patient_id)?;
    let mut next = patients.to_vec();
    let patient = &mut next[idx];
    patient.external_exams.push(ExternalExam {
        id: uuid::Uuid::new_v4().to_string(),
        category: exam.category,
        description: exam.description,
        status: exam.status,
        reminder_date: exam.reminder_date,
        appointment_date: exam.appointment_date,
        notes: exam.notes,
        created_at: now,
        updated_at: None,
    });
    patient.last_updated = now;
    Some(next)
}

/// Merge fields onto an external exam and stamp its update time.
pub fn update_external_exam(
    patients: &[Patient],
    patient_id: &str,
    exam_id: &str,
    update: ExamUpdate,
    now: i64,
) -> Option<Vec<Patient>> {
    let idx = patients.iter().position(|p| p.id == patient_id)?;
    let e_idx = patients[idx]
        .external_exams
        .iter()
        .position(|e| e.id == exam_id)?;

    let mut next = patients.to_vec();
    let patient = &mut next[idx];
    let exam = &mut patient.external_exams[e_idx];
    if let Some(v) = update.category {
        exam.category = v;
    }
    if let Some(v) = update.description {
        exam.description = v;
    }
    if let Some(v) = update.status {
        exam.status = v;
    }
    if let Some(v) = update.reminder_date {
        exam.reminder_date = v;
    }
    if let Some(v) = update.appointment_date {
        exam.appointment_date = v;
    }
    if let Some(v) = update.notes {
        exam.notes = v;
    }
    exam.updated_at = Some(now);
    patient.last_updated = now;
    Some(next)
}

/// Remove an external exam from a patient.
pub fn delete_external_exam(
    patients: &[Patient],
    patient_id: &str,
    exam_id: &str,
    now: i64,
) -> Option<Vec<Patient>> {
    let idx = patients.iter().position(|p| p.id == patient_id)?;
    patients[idx].external_exams.iter().position(|e| e.id == exam_id)?;

    let mut next = patients.to_vec();
    let patient = &mut next[idx];
    patient.external_exams.retain(|e| e.id != exam_id);
    patient.last_updated = now;
    Some(next)
}
