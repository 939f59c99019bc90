//! Historical disaster record, as served by the `/disasters/` resource

use std::path::Path;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::Result;

/// One row of disaster history.
///
/// Only the coordinates are required. Fields this client does not know
/// about are kept in `extra` so an update does not drop them.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct DisasterRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Weather parameters the prediction was made with
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disaster_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_confidence: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub possible_deaths: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub infrastructure_loss: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<NaiveDateTime>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DisasterRecord {
    /// Read a record from a JSON file.
    ///
    /// Unreadable files and malformed JSON are both reported as I/O errors.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let record = serde_json::from_str(&text).map_err(std::io::Error::from)?;
        Ok(record)
    }

    /// One-line summary for listings
    #[must_use]
    pub fn summary(&self) -> String {
        let id = self.id.map_or_else(|| "-".to_string(), |id| id.to_string());
        let kind = self.disaster_type.as_deref().unwrap_or("Unknown");
        let place = self
            .location
            .clone()
            .unwrap_or_else(|| format!("{:.4}, {:.4}", self.latitude, self.longitude));
        format!("#{id} {kind} at {place}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RiskMapError;
    use serde_json::json;

    fn temp_record_file(name: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!(
            "riskmap-record-{name}-{}.json",
            std::process::id()
        ));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_from_json_file() {
        let path = temp_record_file(
            "valid",
            r#"{"latitude": 28.6, "longitude": 77.2, "location": "Delhi"}"#,
        );
        let record = DisasterRecord::from_json_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(record.location.as_deref(), Some("Delhi"));
        assert_eq!(record.id, None);
    }

    #[test]
    fn test_from_json_file_errors_are_io() {
        let missing = std::env::temp_dir().join("riskmap-record-does-not-exist.json");
        let err = DisasterRecord::from_json_file(&missing).unwrap_err();
        assert!(matches!(err, RiskMapError::Io { .. }));

        let path = temp_record_file("malformed", "{ not json");
        let err = DisasterRecord::from_json_file(&path).unwrap_err();
        std::fs::remove_file(&path).unwrap();
        assert!(matches!(err, RiskMapError::Io { .. }));
    }

    #[test]
    fn test_deserialize_backend_row() {
        let body = json!({
            "id": 7,
            "latitude": 28.6,
            "longitude": 77.2,
            "location": "Delhi",
            "parameters": { "temp": 25.0 },
            "disaster_type": "Flood",
            "timestamp": "2024-07-01T12:30:00.123456",
            "date": null
        });
        let record: DisasterRecord = serde_json::from_value(body).unwrap();
        assert_eq!(record.id, Some(7));
        assert_eq!(record.disaster_type.as_deref(), Some("Flood"));
        assert!(record.timestamp.is_some());
        assert!(record.extra.contains_key("date"));
        assert_eq!(record.summary(), "#7 Flood at Delhi");
    }

    #[test]
    fn test_serialize_new_record_skips_empty_fields() {
        let record = DisasterRecord {
            latitude: 1.5,
            longitude: -2.5,
            ..Default::default()
        };
        let body = serde_json::to_value(&record).unwrap();
        assert_eq!(body, json!({ "latitude": 1.5, "longitude": -2.5 }));
        assert_eq!(record.summary(), "#- Unknown at 1.5000, -2.5000");
    }
}
