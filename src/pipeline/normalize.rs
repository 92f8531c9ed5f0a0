use std::collections::HashSet;

use itertools::Itertools;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::Value;
use thiserror::Error;

use super::status::{derive_status, DerivedStatus, EntityKind};
use crate::utils::{self, DisplayFormat, NOT_AVAILABLE};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransformError {
    #[error("expected {expected}, found {found}")]
    Type {
        expected: &'static str,
        found: &'static str,
    },

    #[error("{message}")]
    Invalid { message: String },
}

pub type CustomTransform = fn(&Value) -> Result<String, TransformError>;

#[derive(Clone, Debug)]
pub enum Transform {
    /// Strings, numbers and booleans rendered as-is.
    Text,
    ShortDate,
    Currency,
    /// Tax on a fare, at [`utils::GST_RATE`].
    Gst,
    /// Space-joins the listed keys of a nested object, skipping absent ones.
    Join(&'static [&'static str]),
    /// Exact remapping; unmatched values pass through.
    Remap(&'static [(&'static str, &'static str)]),
    Custom(CustomTransform),
}

#[derive(Clone, Debug)]
pub enum FieldSource {
    /// Dotted path into the raw record, e.g. `vehicleDetails.make`.
    Path(&'static str),
    /// Position of the record in the fetched collection.
    RowIndex,
    Constant(&'static str),
}

#[derive(Clone, Debug)]
pub struct FieldSpec {
    pub column: &'static str,
    pub source: FieldSource,
    pub default: &'static str,
    /// Raw value fed to the transform when the source is missing.
    pub source_default: Option<&'static str>,
    /// Display defaults picked by row position, cycling; overrides `default`.
    pub cycle: Option<&'static [&'static str]>,
    pub transform: Transform,
}

impl FieldSpec {
    pub fn text(column: &'static str, path: &'static str) -> Self {
        Self {
            column,
            source: FieldSource::Path(path),
            default: NOT_AVAILABLE,
            source_default: None,
            cycle: None,
            transform: Transform::Text,
        }
    }

    pub fn with(column: &'static str, path: &'static str, transform: Transform) -> Self {
        Self {
            column,
            source: FieldSource::Path(path),
            default: NOT_AVAILABLE,
            source_default: None,
            cycle: None,
            transform,
        }
    }

    pub fn constant(column: &'static str, value: &'static str) -> Self {
        Self {
            column,
            source: FieldSource::Constant(value),
            default: value,
            source_default: None,
            cycle: None,
            transform: Transform::Text,
        }
    }

    pub fn or(mut self, default: &'static str) -> Self {
        self.default = default;
        self
    }

    pub fn or_source(mut self, raw: &'static str) -> Self {
        self.source_default = Some(raw);
        self
    }

    pub fn or_cycle(mut self, defaults: &'static [&'static str]) -> Self {
        self.cycle = Some(defaults);
        self
    }

    fn default_at(&self, index: usize) -> String {
        match self.cycle {
            Some(values) if !values.is_empty() => values[index % values.len()].to_string(),
            _ => self.default.to_string(),
        }
    }
}

/// Field-spec table for one list view.
#[derive(Clone, Debug)]
pub struct RowSchema {
    pub entity: EntityKind,
    pub id_path: &'static str,
    pub id_prefix: &'static str,
    pub status_path: &'static str,
    pub status_default: &'static str,
    pub fields: Vec<FieldSpec>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Row {
    pub id: String,
    pub display_fields: Vec<(String, String)>,
    pub raw_status: String,
    pub derived_status: DerivedStatus,
}

impl Row {
    pub fn field(&self, column: &str) -> Option<&str> {
        self.display_fields
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value.as_str())
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.display_fields.len() + 3))?;
        map.serialize_entry("id", &self.id)?;
        for (name, value) in self.display_fields.iter() {
            map.serialize_entry(name, value)?;
        }
        map.serialize_entry("rawStatus", &self.raw_status)?;
        map.serialize_entry("derivedStatus", &self.derived_status)?;
        map.end()
    }
}

/// Follows a dotted path; null and blank strings count as missing.
pub fn resolve_path<'a>(record: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = record;
    for segment in path.split('.').filter(|s| !s.is_empty()) {
        current = match current {
            Value::Object(map) => map.get(segment)?,
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    match current {
        Value::Null => None,
        Value::String(s) if s.trim().is_empty() => None,
        other => Some(other),
    }
}

fn number_of(value: &Value) -> Result<f64, TransformError> {
    utils::value_as_f64(value).ok_or(TransformError::Type {
        expected: "number",
        found: utils::json_kind(value),
    })
}

fn text_of(value: &Value) -> Result<String, TransformError> {
    utils::value_as_text(value).ok_or(TransformError::Type {
        expected: "scalar",
        found: utils::json_kind(value),
    })
}

pub fn apply_transform(
    transform: &Transform,
    value: &Value,
    format: &DisplayFormat,
) -> Result<String, TransformError> {
    match transform {
        Transform::Text => text_of(value),
        Transform::ShortDate => {
            let raw = text_of(value)?;
            utils::format_short_date(&raw, &format.date_format)
                .map_err(|message| TransformError::Invalid { message })
        }
        Transform::Currency => Ok(utils::format_currency(
            &format.currency_symbol,
            number_of(value)?,
        )),
        Transform::Gst => Ok(utils::format_gst(
            &format.currency_symbol,
            number_of(value)?,
        )),
        Transform::Join(keys) => {
            let Value::Object(_) = value else {
                return Err(TransformError::Type {
                    expected: "object",
                    found: utils::json_kind(value),
                });
            };
            let joined = keys
                .iter()
                .filter_map(|key| resolve_path(value, key))
                .filter_map(utils::value_as_text)
                .join(" ");
            if joined.is_empty() {
                return Err(TransformError::Invalid {
                    message: format!("none of {keys:?} present"),
                });
            }
            Ok(joined)
        }
        Transform::Remap(table) => {
            let raw = text_of(value)?;
            Ok(table
                .iter()
                .find(|(from, _)| *from == raw)
                .map(|(_, to)| to.to_string())
                .unwrap_or(raw))
        }
        Transform::Custom(f) => f(value),
    }
}

fn field_value(spec: &FieldSpec, record: &Value, index: usize, format: &DisplayFormat) -> String {
    let source = match &spec.source {
        FieldSource::Path(path) => resolve_path(record, path).cloned(),
        FieldSource::RowIndex => Some(Value::from(index)),
        FieldSource::Constant(value) => Some(Value::from(*value)),
    };
    let fallback = spec.source_default.map(Value::from);
    let Some(source) = source.or_else(|| fallback.clone()) else {
        return spec.default_at(index);
    };
    match apply_transform(&spec.transform, &source, format) {
        Ok(v) if !v.trim().is_empty() => v,
        Ok(_) => spec.default_at(index),
        Err(e) => {
            tracing::trace!(column = spec.column, error = %e, "transform failed, using default");
            fallback
                .and_then(|raw| apply_transform(&spec.transform, &raw, format).ok())
                .unwrap_or_else(|| spec.default_at(index))
        }
    }
}

/// Maps one raw record to a row. Never fails: missing or untransformable
/// fields fall back to their configured default.
pub fn normalize_record(
    record: &Value,
    index: usize,
    schema: &RowSchema,
    format: &DisplayFormat,
) -> Row {
    let id = resolve_path(record, schema.id_path)
        .and_then(utils::value_as_text)
        .unwrap_or_else(|| format!("{}-{}", schema.id_prefix, index));
    let display_fields = schema
        .fields
        .iter()
        .map(|spec| {
            (
                spec.column.to_string(),
                field_value(spec, record, index, format),
            )
        })
        .collect();
    let raw_status = resolve_path(record, schema.status_path)
        .and_then(utils::value_as_text)
        .unwrap_or_else(|| schema.status_default.to_string());
    let derived_status = derive_status(schema.entity, &raw_status);
    Row {
        id,
        display_fields,
        raw_status,
        derived_status,
    }
}

/// Normalizes a fetched collection, keeping ids unique and deterministic:
/// a missing id becomes `{prefix}-{index}`, a repeated one `{id}-{index}`.
pub fn normalize_collection(
    records: &[Value],
    schema: &RowSchema,
    format: &DisplayFormat,
) -> Vec<Row> {
    let mut seen: HashSet<String> = HashSet::with_capacity(records.len());
    let mut rows = Vec::with_capacity(records.len());
    for (index, record) in records.iter().enumerate() {
        let mut row = normalize_record(record, index, schema, format);
        if seen.contains(&row.id) {
            let base = format!("{}-{}", row.id, index);
            let mut candidate = base.clone();
            let mut n = 1usize;
            while seen.contains(&candidate) {
                candidate = format!("{base}-{n}");
                n += 1;
            }
            row.id = candidate;
        }
        seen.insert(row.id.clone());
        rows.push(row);
    }
    rows
}
