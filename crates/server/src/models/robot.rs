//! Robot records.

use chrono::NaiveDateTime;
use r4c_core::{RobotCode, RobotId, Serial, TIMESTAMP_FORMAT};
use serde::{Serialize, Serializer};

/// An assembled robot. Immutable once stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Robot {
    pub id: RobotId,
    pub serial: Serial,
    pub model: RobotCode,
    pub version: RobotCode,
    /// Assembly time, UTC, second resolution.
    #[serde(serialize_with = "serialize_timestamp")]
    pub created: NaiveDateTime,
}

/// Serialize a timestamp in the same layout the production feed submits it.
fn serialize_timestamp<S: Serializer>(
    value: &NaiveDateTime,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_str(&value.format(TIMESTAMP_FORMAT))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    #[test]
    fn test_robot_serializes_feed_timestamp() {
        let robot = Robot {
            id: RobotId::new(7),
            serial: Serial::parse("R2-D2").unwrap(),
            model: RobotCode::new("R2").unwrap(),
            version: RobotCode::new("D2").unwrap(),
            created: NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(10, 0, 0)
                .unwrap(),
        };

        assert_eq!(
            serde_json::to_value(&robot).unwrap(),
            serde_json::json!({
                "id": 7,
                "serial": "R2-D2",
                "model": "R2",
                "version": "D2",
                "created": "2024-01-01 10:00:00"
            })
        );
    }
}
