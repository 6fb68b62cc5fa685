//! Conversion from TfL DTOs to response rows.
//!
//! The API speaks camelCase and annotates every object with a `$type`
//! key. Rows use PascalCase field names (matching the static tables) and
//! drop the annotations, at every nesting level.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::dataset::Row;

/// Key the TfL API uses for .NET type annotations.
const TYPE_ANNOTATION: &str = "$type";

/// Errors that can occur while flattening a DTO into a row.
#[derive(Debug, thiserror::Error)]
pub enum ConversionError {
    #[error("failed to serialize upstream object: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("expected an object, got {0}")]
    NotAnObject(&'static str),
}

/// Flatten one DTO into a row.
pub fn to_row<T: Serialize>(item: &T) -> Result<Row, ConversionError> {
    match serde_json::to_value(item)? {
        Value::Object(map) => Ok(normalize_object(map)),
        other => Err(ConversionError::NotAnObject(kind(&other))),
    }
}

/// Flatten a sequence of DTOs, preserving order.
pub fn to_rows<T: Serialize>(items: &[T]) -> Result<Vec<Row>, ConversionError> {
    items.iter().map(to_row).collect()
}

/// Rename keys to PascalCase and drop type annotations, recursively.
pub fn normalize(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(normalize_object(map)),
        Value::Array(items) => Value::Array(items.into_iter().map(normalize).collect()),
        other => other,
    }
}

fn normalize_object(map: Map<String, Value>) -> Map<String, Value> {
    map.into_iter()
        .filter(|(key, _)| key != TYPE_ANNOTATION)
        .map(|(key, value)| (pascal_case(&key), normalize(value)))
        .collect()
}

/// `lineId` → `LineId`.
pub fn pascal_case(key: &str) -> String {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tfl::types::{Prediction, RouteSequence};
    use serde_json::json;

    #[test]
    fn pascal_case_uppercases_first_letter_only() {
        assert_eq!(pascal_case("lineId"), "LineId");
        assert_eq!(pascal_case("id"), "Id");
        assert_eq!(pascal_case("Name"), "Name");
        assert_eq!(pascal_case(""), "");
    }

    #[test]
    fn normalize_recurses_and_drops_annotations() {
        let value = json!({
            "$type": "Tfl.Api.Presentation.Entities.Line",
            "routeSections": [
                {"$type": "Tfl.Api.Presentation.Entities.MatchedRoute", "originationName": "Brixton"}
            ],
            "crowding": {"$type": "Crowding", "passengerFlows": []}
        });

        assert_eq!(
            normalize(value),
            json!({
                "RouteSections": [{"OriginationName": "Brixton"}],
                "Crowding": {"PassengerFlows": []}
            })
        );
    }

    #[test]
    fn prediction_row_has_pascal_case_fields() {
        let prediction: Prediction = serde_json::from_value(json!({
            "$type": "Tfl.Api.Presentation.Entities.Prediction",
            "id": "1",
            "lineId": "central",
            "lineName": "Central",
            "naptanId": "940GZZLUOXC",
            "platformName": "Eastbound - Platform 1",
            "towards": "Epping",
            "timeToStation": 120,
            "expectedArrival": "2026-10-14T08:02:00Z",
            "timing": {"$type": "Tfl.Api.Presentation.Entities.PredictionTiming", "countdownServerAdjustment": "00:00:00"}
        }))
        .unwrap();

        let row = to_row(&prediction).unwrap();
        assert_eq!(row["LineId"], "central");
        assert_eq!(row["LineName"], "Central");
        assert_eq!(row["TimeToStation"], 120);
        assert_eq!(row["Towards"], "Epping");
        assert_eq!(row["Timing"], json!({"CountdownServerAdjustment": "00:00:00"}));
        assert!(!row.contains_key("$type"));
        assert!(!row.contains_key("lineId"));
    }

    #[test]
    fn to_rows_preserves_order() {
        let sequences: Vec<RouteSequence> = serde_json::from_value(json!([
            {"lineId": "victoria", "direction": "inbound"},
            {"lineId": "victoria", "direction": "outbound"}
        ]))
        .unwrap();

        let rows = to_rows(&sequences).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["Direction"], "inbound");
        assert_eq!(rows[1]["Direction"], "outbound");
    }

    #[test]
    fn non_objects_are_rejected() {
        let err = to_row(&vec![1, 2]).unwrap_err();
        assert_eq!(err.to_string(), "expected an object, got an array");
    }
}
