//! Ward data service: the single owner of the live document.
//!
//! Every mutation funnels through [`WardService::commit`]: serialize once,
//! save the whole document, append a backup entry tagged with the acting
//! user, then advance the in-memory mirror. The two durable sinks fail
//! independently and neither failure stops the in-memory update; the
//! [`CommitOutcome`] reports how each fared.
//!
//! The service is single-writer: all mutations take `&mut self`. A host
//! with real concurrency must put the service behind a mutex, the same way
//! the storage handle would be shared behind `Arc<Mutex<_>>`.

use std::path::Path;

use crate::db::{BackupMeta, Database, DbResult, UNKNOWN_USER};
use crate::merge::{self, ImportError, MergeSummary};
use crate::models::{DischargeType, Patient, WardDocument, WardNote};
use crate::ops::{
    self, ExamUpdate, HandoverUpdate, NewExternalExam, NewPatient, PatientUpdate, ValidationError,
};

/// Durability report for one commit. The in-memory document always
/// advances; these flags say whether the primary write and its backup
/// entry landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommitOutcome {
    pub persisted: bool,
    pub backup_recorded: bool,
}

/// Result of a mutation addressed by id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The target existed and the new document went through the commit path.
    Updated(CommitOutcome),
    /// The target id is unknown; nothing changed and nothing was written.
    NotFound,
}

impl UpdateOutcome {
    pub fn is_updated(&self) -> bool {
        matches!(self, UpdateOutcome::Updated(_))
    }
}

fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Owns the live in-memory mirror of the ward document and is the only
/// component that talks to the storage layer.
pub struct WardService {
    db: Database,
    document: WardDocument,
    last_backup_timestamp: i64,
}

impl WardService {
    pub fn new(db: Database) -> DbResult<Self> {
        let document = db.load_document()?;
        let last_backup_timestamp = db.latest_backup_timestamp()?.unwrap_or(0);
        Ok(Self {
            db,
            document,
            last_backup_timestamp,
        })
    }

    /// Open or create the backing database at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        Self::new(Database::open(path)?)
    }

    /// In-memory service (for testing).
    pub fn open_in_memory() -> DbResult<Self> {
        Self::new(Database::open_in_memory()?)
    }

    /// The live document snapshot.
    pub fn document(&self) -> &WardDocument {
        &self.document
    }

    /// The backing database, for sibling stores like the user roster.
    pub fn db(&self) -> &Database {
        &self.db
    }

    /// Re-read the document from storage; used after import/restore/reset
    /// to resynchronize collaborators.
    pub fn refresh(&mut self) -> DbResult<&WardDocument> {
        self.document = self.db.load_document()?;
        Ok(&self.document)
    }

    /// The single write path. Save failure is logged and swallowed, backup
    /// failure never blocks the save, and the mirror advances regardless.
    pub fn commit(&mut self, next: WardDocument, user: &str) -> CommitOutcome {
        let user = if user.trim().is_empty() { UNKNOWN_USER } else { user };

        let serialized = match serde_json::to_string(&next) {
            Ok(s) => s,
            Err(e) => {
                tracing::error!(error = %e, "failed to serialize ward document");
                self.document = next;
                return CommitOutcome {
                    persisted: false,
                    backup_recorded: false,
                };
            }
        };

        let persisted = match self.db.save_document(&serialized) {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(error = %e, "failed to save ward document");
                false
            }
        };

        // Sequential commits within one millisecond still get unique keys.
        let timestamp = now_millis().max(self.last_backup_timestamp + 1);
        let backup_recorded = match self.db.append_backup(timestamp, user, &serialized) {
            Ok(()) => {
                self.last_backup_timestamp = timestamp;
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to append backup entry");
                false
            }
        };

        self.document = next;
        CommitOutcome {
            persisted,
            backup_recorded,
        }
    }

    fn commit_patients(&mut self, patients: Vec<Patient>, user: &str) -> CommitOutcome {
        let next = WardDocument {
            patients,
            ward_notes: self.document.ward_notes.clone(),
        };
        self.commit(next, user)
    }

    // =========================================================================
    // Patient operations
    // =========================================================================

    pub fn add_patient(
        &mut self,
        draft: NewPatient,
        user: &str,
    ) -> Result<(Patient, CommitOutcome), ValidationError> {
        let (patients, patient) = ops::add_patient(&self.document.patients, draft, now_millis())?;
        let outcome = self.commit_patients(patients, user);
        Ok((patient, outcome))
    }

    pub fn update_patient(
        &mut self,
        id: &str,
        update: PatientUpdate,
        user: &str,
    ) -> Result<UpdateOutcome, ValidationError> {
        match ops::update_patient(&self.document.patients, id, update, now_millis())? {
            Some(patients) => Ok(UpdateOutcome::Updated(self.commit_patients(patients, user))),
            None => Ok(UpdateOutcome::NotFound),
        }
    }

    pub fn discharge_patient(
        &mut self,
        id: &str,
        discharge_type: DischargeType,
        user: &str,
    ) -> UpdateOutcome {
        match ops::discharge_patient(&self.document.patients, id, discharge_type, now_millis()) {
            Some(patients) => UpdateOutcome::Updated(self.commit_patients(patients, user)),
            None => UpdateOutcome::NotFound,
        }
    }

    pub fn add_handover(
        &mut self,
        patient_id: &str,
        text: &str,
        scheduled_at: Option<i64>,
        user: &str,
    ) -> UpdateOutcome {
        match ops::add_handover(
            &self.document.patients,
            patient_id,
            text,
            scheduled_at,
            now_millis(),
        ) {
            Some(patients) => UpdateOutcome::Updated(self.commit_patients(patients, user)),
            None => UpdateOutcome::NotFound,
        }
    }

    pub fn update_handover(
        &mut self,
        patient_id: &str,
        handover_id: &str,
        update: HandoverUpdate,
        user: &str,
    ) -> UpdateOutcome {
        match ops::update_handover(
            &self.document.patients,
            patient_id,
            handover_id,
            update,
            now_millis(),
        ) {
            Some(patients) => UpdateOutcome::Updated(self.commit_patients(patients, user)),
            None => UpdateOutcome::NotFound,
        }
    }

    pub fn add_external_exam(
        &mut self,
        patient_id: &str,
        exam: NewExternalExam,
        user: &str,
    ) -> UpdateOutcome {
        match ops::add_external_exam(&self.document.patients, patient_id, exam, now_millis()) {
            Some(patients) => UpdateOutcome::Updated(self.commit_patients(patients, user)),
            None => UpdateOutcome::NotFound,
        }
    }

    pub fn update_external_exam(
        &mut self,
        patient_id: &str,
        exam_id: &str,
        update: ExamUpdate,
        user: &str,
    ) -> UpdateOutcome {
        match ops::update_external_exam(
            &self.document.patients,
            patient_id,
            exam_id,
            update,
            now_millis(),
        ) {
            Some(patients) => UpdateOutcome::Updated(self.commit_patients(patients, user)),
            None => UpdateOutcome::NotFound,
        }
    }

    pub fn delete_external_exam(
        &mut self,
        patient_id: &str,
        exam_id: &str,
        user: &str,
    ) -> UpdateOutcome {
        match ops::delete_external_exam(&self.document.patients, patient_id, exam_id, now_millis())
        {
            Some(patients) => UpdateOutcome::Updated(self.commit_patients(patients, user)),
            None => UpdateOutcome::NotFound,
        }
    }

    // =========================================================================
    // Ward notes
    // =========================================================================

    /// Returns `None` for whitespace-only text: nothing is added and
    /// nothing is written.
    pub fn add_ward_note(&mut self, text: &str, user: &str) -> Option<(WardNote, CommitOutcome)> {
        let (ward_notes, note) =
            ops::add_ward_note(&self.document.ward_notes, text, now_millis())?;
        let next = WardDocument {
            patients: self.document.patients.clone(),
            ward_notes,
        };
        Some((note, self.commit(next, user)))
    }

    pub fn delete_ward_note(&mut self, note_id: &str, user: &str) -> UpdateOutcome {
        match ops::delete_ward_note(&self.document.ward_notes, note_id) {
            Some(ward_notes) => {
                let next = WardDocument {
                    patients: self.document.patients.clone(),
                    ward_notes,
                };
                UpdateOutcome::Updated(self.commit(next, user))
            }
            None => UpdateOutcome::NotFound,
        }
    }

    // =========================================================================
    // Derived views
    // =========================================================================

    pub fn active_patients(&self) -> Vec<&Patient> {
        self.document.active_patients()
    }

    pub fn discharged_patients(&self) -> Vec<&Patient> {
        self.document.discharged_patients()
    }

    pub fn patient_by_id(&self, id: &str) -> Option<&Patient> {
        self.document.patient_by_id(id)
    }

    // =========================================================================
    // Import / export
    // =========================================================================

    /// Serialized snapshot of the live document, for download/sharing.
    pub fn export_json(&self) -> serde_json::Result<String> {
        merge::export_document(&self.document)
    }

    /// Parse and merge an external document (last-write-wins), then commit
    /// the result tagged with the acting user.
    pub fn import_document(
        &mut self,
        json: &str,
        user: &str,
    ) -> Result<(MergeSummary, CommitOutcome), ImportError> {
        let imported = merge::parse_import(json)?;
        let (merged, summary) = merge::merge_documents(&self.document, imported);
        let outcome = self.commit(merged, user);
        Ok((summary, outcome))
    }

    // =========================================================================
    // Backup history
    // =========================================================================

    pub fn list_backups(&self) -> DbResult<Vec<BackupMeta>> {
        self.db.list_backups()
    }

    /// Newest backup metadata: who saved last, and when.
    pub fn last_save_info(&self) -> DbResult<Option<BackupMeta>> {
        Ok(self.db.list_backups()?.into_iter().next())
    }

    /// Overwrite the live document with the entry at `timestamp`. Returns
    /// `false` (leaving the document untouched) when the entry is missing
    /// or fails its checksum.
    pub fn restore_backup(&mut self, timestamp: i64) -> DbResult<bool> {
        let Some(entry) = self.db.get_backup(timestamp)? else {
            return Ok(false);
        };
        if !entry.verify() {
            tracing::warn!(timestamp, "backup entry failed checksum, refusing restore");
            return Ok(false);
        }
        self.db.save_document(&entry.data)?;
        self.refresh()?;
        Ok(true)
    }

    /// The system's only undo: restore the second-most-recent entry.
    /// Index 0 of the descending list is the state that was just written.
    pub fn undo_last_change(&mut self) -> DbResult<bool> {
        let backups = self.db.list_backups()?;
        match backups.get(1) {
            Some(meta) => self.restore_backup(meta.timestamp),
            None => Ok(false),
        }
    }

    /// Commit the initial empty document through the normal write path.
    /// The backup log is left alone: history survives a reset.
    pub fn reset_document(&mut self, user: &str) -> CommitOutcome {
        self.commit(WardDocument::default(), user)
    }

    /// Explicitly empty the backup log.
    pub fn clear_backups(&self) -> DbResult<()> {
        self.db.clear_backups()
    }
}
