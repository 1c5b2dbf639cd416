//! Ward-wide note model.

use serde::{Deserialize, Serialize};

/// An urgent announcement for the whole ward, not tied to any patient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WardNote {
    pub id: String,
    pub text: String,
    /// Creation timestamp (epoch milliseconds).
    pub created_at: i64,
}

impl WardNote {
    pub fn new(text: String, created_at: i64) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            text,
            created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_ward_note() {
        let note = WardNote::new("Carrello emergenze da ricontrollare".into(), 99);
        assert_eq!(note.created_at, 99);
        assert_eq!(note.id.len(), 36);
    }

    #[test]
    fn test_wire_format() {
        let note = WardNote {
            id: "n-1".into(),
            text: "ossigeno in esaurimento".into(),
            created_at: 7,
        };
        let json = serde_json::to_value(&note).unwrap();
        assert_eq!(json["createdAt"], 7);
    }
}
