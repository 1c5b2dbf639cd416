//! Day-based dashboard views over the live document.

use chrono::{NaiveDate, TimeZone, Utc};

use crate::models::{ExternalExam, Handover, Patient, WardDocument};

fn millis_on_day(ts: i64, date: NaiveDate) -> bool {
    match Utc.timestamp_millis_opt(ts).single() {
        Some(dt) => dt.date_naive() == date,
        None => false,
    }
}

/// Open handovers of active patients due on `date`.
pub fn handovers_due_on(doc: &WardDocument, date: NaiveDate) -> Vec<(&Patient, &Handover)> {
    doc.patients
        .iter()
        .filter(|p| p.is_active())
        .flat_map(|p| {
            p.handovers
                .iter()
                .filter(move |h| {
                    !h.is_completed
                        && h.scheduled_at
                            .map(|ts| millis_on_day(ts, date))
                            .unwrap_or(false)
                })
                .map(move |h| (p, h))
        })
        .collect()
}

/// Exams of active patients with a reminder or booked appointment on `date`.
pub fn exams_on(doc: &WardDocument, date: NaiveDate) -> Vec<(&Patient, &ExternalExam)> {
    let iso = date.format("%Y-%m-%d").to_string();
    doc.patients
        .iter()
        .filter(|p| p.is_active())
        .flat_map(|p| {
            let iso = iso.clone();
            p.external_exams
                .iter()
                .filter(move |e| {
                    e.reminder_date.as_deref() == Some(iso.as_str())
                        || e.appointment_date.as_deref() == Some(iso.as_str())
                })
                .map(move |e| (p, e))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ExamCategory, ExamStatus};
    use crate::ops::{
        add_external_exam, add_handover, add_patient, update_handover, HandoverUpdate,
        NewExternalExam, NewPatient,
    };
    use crate::models::{AdmissionType, Gender, Severity};

    fn draft(bed: &str) -> NewPatient {
        NewPatient {
            first_name: "anna".into(),
            last_name: "bianchi".into(),
            date_of_birth: "1941-07-02".into(),
            admission_date: "2024-02-01".into(),
            gender: Gender::F,
            bed: bed.into(),
            admission_type: AdmissionType::Ordinario,
            main_diagnosis: "Scompenso".into(),
            history: String::new(),
            clinical_notes: String::new(),
            severity: Severity::Verde,
        }
    }

    fn millis(date: &str, hour: u32) -> i64 {
        let day: NaiveDate = date.parse().unwrap();
        Utc.from_utc_datetime(&day.and_hms_opt(hour, 0, 0).unwrap())
            .timestamp_millis()
    }

    #[test]
    fn test_handovers_due_on_day() {
        let (patients, p) = add_patient(&[], draft("5"), 0).unwrap();
        let due = millis("2024-03-09", 10);
        let other_day = millis("2024-03-10", 10);
        let patients = add_handover(&patients, &p.id, "oggi", Some(due), 1).unwrap();
        let patients = add_handover(&patients, &p.id, "domani", Some(other_day), 2).unwrap();
        let patients = add_handover(&patients, &p.id, "senza scadenza", None, 3).unwrap();
        let doc = WardDocument {
            patients,
            ward_notes: vec![],
        };

        let date: NaiveDate = "2024-03-09".parse().unwrap();
        let result = handovers_due_on(&doc, date);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].1.text, "oggi");
    }

    #[test]
    fn test_completed_handovers_are_not_due() {
        let (patients, p) = add_patient(&[], draft("5"), 0).unwrap();
        let due = millis("2024-03-09", 10);
        let patients = add_handover(&patients, &p.id, "fatta", Some(due), 1).unwrap();
        let handover_id = patients[0].handovers[0].id.clone();
        let patients = update_handover(
            &patients,
            &p.id,
            &handover_id,
            HandoverUpdate {
                is_completed: Some(true),
                ..Default::default()
            },
            2,
        )
        .unwrap();
        let doc = WardDocument {
            patients,
            ward_notes: vec![],
        };

        let date: NaiveDate = "2024-03-09".parse().unwrap();
        assert!(handovers_due_on(&doc, date).is_empty());
    }

    #[test]
    fn test_exams_on_day_by_reminder_or_appointment() {
        let (patients, p) = add_patient(&[], draft("5"), 0).unwrap();
        let patients = add_external_exam(
            &patients,
            &p.id,
            NewExternalExam {
                category: ExamCategory::Laboratorio,
                description: "emocromo".into(),
                status: ExamStatus::DaRichiedere,
                reminder_date: Some("2024-03-09".into()),
                appointment_date: None,
                notes: None,
            },
            1,
        )
        .unwrap();
        let patients = add_external_exam(
            &patients,
            &p.id,
            NewExternalExam {
                category: ExamCategory::Radiologia,
                description: "TC torace".into(),
                status: ExamStatus::Prenotato,
                reminder_date: None,
                appointment_date: Some("2024-03-09".into()),
                notes: None,
            },
            2,
        )
        .unwrap();
        let doc = WardDocument {
            patients,
            ward_notes: vec![],
        };

        let date: NaiveDate = "2024-03-09".parse().unwrap();
        assert_eq!(exams_on(&doc, date).len(), 2);

        let other: NaiveDate = "2024-04-01".parse().unwrap();
        assert!(exams_on(&doc, other).is_empty());
    }
}
