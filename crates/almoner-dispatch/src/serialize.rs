//! Structured data serialization.
//!
//! Handles JSON, YAML, XML, and CSV rendering of listings and reports.
//! XML needs a root element name because listings are sequences; every
//! entry point takes one and the non-XML formats ignore it.

use crate::OutputMode;
use indexmap::IndexSet;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Errors that can occur during serialization.
#[derive(Debug, Error)]
pub enum SerializeError {
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML serialization failed: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("XML serialization failed: {0}")]
    Xml(#[from] quick_xml::DeError),

    #[error("CSV serialization failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV output is not valid UTF-8")]
    CsvEncoding,

    #[error("not a structured output mode")]
    NotStructured,
}

/// Serializes `data` in the given structured mode.
///
/// Returns [`SerializeError::NotStructured`] for [`OutputMode::Text`].
pub fn serialize_structured<T: Serialize>(
    root: &str,
    data: &T,
    mode: OutputMode,
) -> Result<String, SerializeError> {
    match mode {
        OutputMode::Json => to_json(data),
        OutputMode::Yaml => to_yaml(data),
        OutputMode::Xml => to_xml(root, data),
        OutputMode::Csv => serialize_csv(data),
        OutputMode::Text => Err(SerializeError::NotStructured),
    }
}

pub fn to_json<T: Serialize>(data: &T) -> Result<String, SerializeError> {
    Ok(serde_json::to_string_pretty(data)?)
}

pub fn to_yaml<T: Serialize>(data: &T) -> Result<String, SerializeError> {
    Ok(serde_yaml::to_string(data)?)
}

/// Serializes to XML under a `<root>` element.
///
/// Sequences become repeated `<item>` children.
pub fn to_xml<T: Serialize>(root: &str, data: &T) -> Result<String, SerializeError> {
    #[derive(Serialize)]
    struct Items<'a> {
        item: &'a [Value],
    }

    match serde_json::to_value(data)? {
        Value::Array(items) => Ok(quick_xml::se::to_string_with_root(
            root,
            &Items { item: &items },
        )?),
        _ => Ok(quick_xml::se::to_string_with_root(root, data)?),
    }
}

/// Serializes to CSV.
///
/// The data is converted to JSON first, then flattened:
///
/// - array of objects: header row from the union of keys in first-seen order,
///   one row per item, missing keys as empty cells
/// - single object: `key,value` rows
/// - anything else: a single `value` column
///
/// Nested values are written as compact JSON.
pub fn serialize_csv<T: Serialize>(data: &T) -> Result<String, SerializeError> {
    let value = serde_json::to_value(data)?;
    let mut wtr = csv::Writer::from_writer(Vec::new());

    match &value {
        Value::Array(items) => match items.first() {
            Some(Value::Object(_)) => {
                // Rows may omit keys, so the header is every key in first-seen order.
                let headers: IndexSet<&str> = items
                    .iter()
                    .filter_map(Value::as_object)
                    .flat_map(|object| object.keys().map(String::as_str))
                    .collect();
                wtr.write_record(&headers)?;
                for item in items {
                    let row: Vec<String> = headers
                        .iter()
                        .map(|h| item.get(*h).map(cell).unwrap_or_default())
                        .collect();
                    wtr.write_record(&row)?;
                }
            }
            _ => {
                wtr.write_record(["value"])?;
                for item in items {
                    wtr.write_record([cell(item)])?;
                }
            }
        },
        Value::Object(map) => {
            wtr.write_record(["key", "value"])?;
            for (key, v) in map {
                wtr.write_record([key.clone(), cell(v)])?;
            }
        }
        scalar => {
            wtr.write_record(["value"])?;
            wtr.write_record([cell(scalar)])?;
        }
    }

    let bytes = wtr
        .into_inner()
        .map_err(|e| SerializeError::Csv(e.into_error().into()))?;
    String::from_utf8(bytes).map_err(|_| SerializeError::CsvEncoding)
}

fn cell(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
