//! Daily traffic record model.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};


/// Visits recorded for a single calendar day.
///
/// `date` is the natural key: there is at most one record per day and the
/// record's id is its date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrafficRecord {
    pub date: String,
    pub visits: i64,
    pub created_at: String,
    pub updated_at: String,
}


impl TrafficRecord {
    /// The record id, which is always the date.
    pub fn id(&self) -> &str {
        &self.date
    }

    /// Parse the date key into a calendar date.
    ///
    /// Returns `None` for rows that somehow hold a malformed date.
    pub fn naive_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.date, "%Y-%m-%d").ok()
    }
}


/// Which branch of a create-or-update was taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Created,
    Updated,
}


#[cfg(test)]
mod tests {
    use super::*;

    fn record(date: &str) -> TrafficRecord {
        TrafficRecord {
            date: date.to_string(),
            visits: 42,
            created_at: "2025-03-01T00:00:00+00:00".to_string(),
            updated_at: "2025-03-01T00:00:00+00:00".to_string(),
        }
    }

    #[test]
    fn test_id_is_date() {
        assert_eq!(record("2025-03-01").id(), "2025-03-01");
    }

    #[test]
    fn test_naive_date() {
        let date = record("2025-03-09").naive_date().unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2025, 3, 9).unwrap());
        assert!(record("not-a-date").naive_date().is_none());
    }

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_value(record("2025-03-01")).unwrap();
        assert_eq!(json["visits"], 42);
        assert!(json.get("createdAt").is_some());
        assert!(json.get("updatedAt").is_some());
        assert!(json.get("created_at").is_none());
    }
}
