//! Reparto Core Library
//!
//! Local-first patient registry for a hospital ward: bed map state,
//! clinical handovers, external exam tracking and an append-only backup
//! history, all behind a synchronous in-process API.
//!
//! # Architecture
//!
//! ```text
//! UI collaborator ──► WardService operation
//!                          │
//!                 pure aggregate transform (ops)
//!                          │
//!              ┌───────────▼───────────┐
//!              │     single commit     │
//!              │ serialize → save doc  │
//!              │   → append backup     │
//!              └───────────┬───────────┘
//!                          │
//!          ┌───────────────┼───────────────┐
//!          ▼               ▼               ▼
//!     ward_document     backups          mirror
//!     (live state)   (linear history)  (in-memory)
//! ```
//!
//! # Core Principle
//!
//! **Every mutation goes through one commit path**, so the backup log is a
//! full linear history of the document and restoring any entry reproduces
//! the exact state that was committed then. The two durable sinks fail
//! independently and best-effort; the in-memory mirror always advances.
//!
//! # Modules
//!
//! - [`db`]: SQLite storage (live document, backup log, user roster)
//! - [`models`]: Domain types (Patient, Handover, ExternalExam, WardNote)
//! - [`ops`]: Pure aggregate transformations
//! - [`service`]: The ward data service owning the live document
//! - [`merge`]: Offline import/export with last-write-wins merge
//! - [`accounts`]: Staff account management
//! - [`beds`]: Bed roster and occupancy
//! - [`views`]: Day-based dashboard views

pub mod accounts;
pub mod beds;
pub mod db;
pub mod merge;
pub mod models;
pub mod ops;
pub mod service;
pub mod views;

// Re-export commonly used types
pub use accounts::{AccountError, Accounts};
pub use db::{BackupEntry, BackupMeta, Database, DbError, DEFAULT_PASSWORD, UNKNOWN_USER};
pub use merge::{ImportError, MergeSummary};
pub use models::{
    AdmissionType, DischargeType, ExamCategory, ExamStatus, ExternalExam, Gender, Handover,
    Patient, PatientStatus, Severity, WardDocument, WardNote,
};
pub use ops::{
    ExamUpdate, HandoverUpdate, NewExternalExam, NewPatient, PatientUpdate, ValidationError,
};
pub use service::{CommitOutcome, UpdateOutcome, WardService};
