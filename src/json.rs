//! TOML to JSON conversion for report output.
//!
//! Formatting metadata is dropped; only the data shape survives. Datetimes
//! become strings, non-finite floats become null.

use serde_json::Value as JsonValue;
use toml_edit::{DocumentMut, Item, Table, Value};

/// Convert a manifest document to a JSON value.
pub fn document_to_json(document: &DocumentMut) -> JsonValue {
    table_to_json(document.as_table())
}

fn table_to_json(table: &Table) -> JsonValue {
    let map: serde_json::Map<String, JsonValue> = table
        .iter()
        .map(|(key, item)| (key.to_string(), item_to_json(item)))
        .collect();
    JsonValue::Object(map)
}

fn item_to_json(item: &Item) -> JsonValue {
    match item {
        Item::None => JsonValue::Null,
        Item::Value(value) => value_to_json(value),
        Item::Table(table) => table_to_json(table),
        Item::ArrayOfTables(tables) => {
            JsonValue::Array(tables.iter().map(table_to_json).collect())
        }
    }
}

fn value_to_json(value: &Value) -> JsonValue {
    match value {
        Value::String(s) => JsonValue::String(s.value().clone()),
        Value::Integer(i) => JsonValue::Number((*i.value()).into()),
        Value::Float(f) => serde_json::Number::from_f64(*f.value())
            .map(JsonValue::Number)
            .unwrap_or(JsonValue::Null),
        Value::Boolean(b) => JsonValue::Bool(*b.value()),
        Value::Datetime(dt) => JsonValue::String(dt.value().to_string()),
        Value::Array(array) => JsonValue::Array(array.iter().map(value_to_json).collect()),
        Value::InlineTable(table) => {
            let map: serde_json::Map<String, JsonValue> = table
                .iter()
                .map(|(key, value)| (key.to_string(), value_to_json(value)))
                .collect();
            JsonValue::Object(map)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn convert(source: &str) -> JsonValue {
        document_to_json(&source.parse().unwrap())
    }

    #[test]
    fn test_scalars() {
        let result = convert("name = \"demo\"\ncount = 3\nratio = 0.5\nactive = true\n");

        assert_eq!(
            result,
            json!({"name": "demo", "count": 3, "ratio": 0.5, "active": true})
        );
    }

    #[test]
    fn test_nested_tables_and_arrays() {
        let result = convert("[tool.demo]\nitems = [1, 2, 3]\ninline = { a = \"b\" }\n");

        assert_eq!(
            result,
            json!({"tool": {"demo": {"items": [1, 2, 3], "inline": {"a": "b"}}}})
        );
    }

    #[test]
    fn test_array_of_tables() {
        let result = convert("[[worker]]\nname = \"a\"\n\n[[worker]]\nname = \"b\"\n");

        assert_eq!(result, json!({"worker": [{"name": "a"}, {"name": "b"}]}));
    }

    #[test]
    fn test_datetime_becomes_string() {
        let result = convert("built = 2024-01-02T03:04:05Z\n");

        assert_eq!(result, json!({"built": "2024-01-02T03:04:05Z"}));
    }
}
