//! The ward's fixed bed roster and occupancy stats.

use crate::models::WardDocument;

/// Men's section.
pub const MEN_BEDS: [&str; 10] = ["1", "2", "3", "4", "5", "6", "7", "8", "9", "10"];

/// Women's section.
pub const WOMEN_BEDS: [&str; 10] = ["11", "12", "13", "14", "15", "16", "17", "18", "19", "20"];

/// Long-stay unit, men's and women's side.
pub const LONG_STAY_BEDS: [&str; 4] = ["LDU1", "LDU2", "LDD1", "LDD2"];

/// Every bed in the ward, in display order.
pub fn all_beds() -> Vec<&'static str> {
    MEN_BEDS
        .iter()
        .chain(WOMEN_BEDS.iter())
        .chain(LONG_STAY_BEDS.iter())
        .copied()
        .collect()
}

/// Occupancy summary for the dashboard header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BedOccupancy {
    pub total: usize,
    pub occupied: usize,
    pub free: usize,
}

/// Roster beds with no active occupant, in display order.
pub fn free_beds(doc: &WardDocument) -> Vec<&'static str> {
    all_beds()
        .into_iter()
        .filter(|bed| doc.active_patient_in_bed(bed).is_none())
        .collect()
}

pub fn occupancy(doc: &WardDocument) -> BedOccupancy {
    let total = all_beds().len();
    let free = free_beds(doc).len();
    BedOccupancy {
        total,
        occupied: total - free,
        free,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::{add_patient, NewPatient};
    use crate::models::{AdmissionType, Gender, Severity};

    fn draft(bed: &str) -> NewPatient {
        NewPatient {
            first_name: "anna".into(),
            last_name: "bianchi".into(),
            date_of_birth: "1941-07-02".into(),
            admission_date: "2024-02-01".into(),
            gender: Gender::F,
            bed: bed.into(),
            admission_type: AdmissionType::Lungodegenza,
            main_diagnosis: "Frattura femore".into(),
            history: String::new(),
            clinical_notes: String::new(),
            severity: Severity::Verde,
        }
    }

    #[test]
    fn test_roster_size() {
        assert_eq!(all_beds().len(), 24);
    }

    #[test]
    fn test_occupancy_counts_active_only() {
        let (patients, _) = add_patient(&[], draft("5"), 0).unwrap();
        let (patients, _) = add_patient(&patients, draft("LDU1"), 1).unwrap();
        let doc = WardDocument {
            patients,
            ward_notes: vec![],
        };

        let stats = occupancy(&doc);
        assert_eq!(stats.occupied, 2);
        assert_eq!(stats.free, 22);

        let free = free_beds(&doc);
        assert!(!free.contains(&"5"));
        assert!(!free.contains(&"LDU1"));
        assert!(free.contains(&"6"));
    }
}
