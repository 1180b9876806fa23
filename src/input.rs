//! Conversion of the loosely typed JSON payload into the report request.
//!
//! The payload is decoded into a [`serde_json::Value`] first and only then
//! validated, so that shape problems (a string where the movement list is
//! expected, a number inside the list) are reported as [`InputError`]s instead
//! of surfacing later as confusing rendering failures.

use serde_json::{Map, Value};
use thiserror::Error;

use crate::error::Result;

/// Key holding the main report title.
pub const TITLE_KEY: &str = "TitReporte1";
/// Key holding the movement list.
pub const MOVEMENTS_KEY: &str = "movimientos";
/// Key holding the trailing totals line.
pub const TOTALS_KEY: &str = "LinTotales";

const ACCOUNT_KEY: &str = "cuenta";
const DESCRIPTION_KEY: &str = "descripcion";
const KIND_KEY: &str = "tipo";

/// Shape errors detected while validating a decoded payload.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum InputError {
    /// The top-level JSON value is not an object.
    #[error("expected a JSON object at the top level, found {found}")]
    NotAnObject {
        /// JSON type that was found instead.
        found: &'static str,
    },

    /// The movement key holds something other than an array.
    #[error("`movimientos` must be an array, found {found}")]
    MovementsNotArray {
        /// JSON type that was found instead.
        found: &'static str,
    },

    /// An entry of the movement array is not an object.
    #[error("`movimientos[{index}]` must be an object, found {found}")]
    MovementNotObject {
        /// Position of the offending entry.
        index: usize,
        /// JSON type that was found instead.
        found: &'static str,
    },

    /// A display field holds a nested array or object.
    #[error("field `{field}`{} must be a string, found {found}", location(.index))]
    InvalidField {
        /// Name of the field.
        field: &'static str,
        /// Movement index when the field belongs to a record.
        index: Option<usize>,
        /// JSON type that was found instead.
        found: &'static str,
    },
}

fn location(index: &Option<usize>) -> String {
    match index {
        Some(index) => format!(" of `{MOVEMENTS_KEY}[{index}]`"),
        None => String::new(),
    }
}

/// One row of the accounting table.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MovementRecord {
    /// Account code.
    pub account: String,
    /// Free-text description.
    pub description: String,
    /// Movement type as shown in the `Tipo` column.
    pub kind: String,
}

impl MovementRecord {
    /// Creates a record from its three display fields.
    pub fn new(
        account: impl Into<String>,
        description: impl Into<String>,
        kind: impl Into<String>,
    ) -> Self {
        Self {
            account: account.into(),
            description: description.into(),
            kind: kind.into(),
        }
    }

    /// Returns the cells in table column order.
    pub fn cells(&self) -> [&str; 3] {
        [&self.account, &self.description, &self.kind]
    }

    fn from_object(index: usize, object: &Map<String, Value>) -> Result<Self, InputError> {
        let field = |name: &'static str| -> Result<String, InputError> {
            Ok(display_string(name, Some(index), object.get(name))?.unwrap_or_default())
        };

        Ok(Self {
            account: field(ACCOUNT_KEY)?,
            description: field(DESCRIPTION_KEY)?,
            kind: field(KIND_KEY)?,
        })
    }
}

/// The validated report request. Built once and never mutated.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReportRequest {
    title: Option<String>,
    totals_line: Option<String>,
    movements: Vec<MovementRecord>,
}

impl ReportRequest {
    /// Creates a request with the given movements and no title or totals.
    pub fn new(movements: impl Into<Vec<MovementRecord>>) -> Self {
        Self {
            movements: movements.into(),
            ..Self::default()
        }
    }

    /// Sets the title and returns the updated request.
    pub fn with_title(mut self, title: impl Into<Option<String>>) -> Self {
        self.title = title.into();
        self
    }

    /// Sets the totals line and returns the updated request.
    pub fn with_totals_line(mut self, totals_line: impl Into<Option<String>>) -> Self {
        self.totals_line = totals_line.into();
        self
    }

    /// Decodes and validates a JSON payload.
    pub fn from_json_str(payload: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(payload)?;
        Ok(Self::from_value(&value)?)
    }

    /// Validates an already decoded payload.
    pub fn from_value(value: &Value) -> Result<Self, InputError> {
        let object = value.as_object().ok_or(InputError::NotAnObject {
            found: json_type(value),
        })?;

        let movements = match object.get(MOVEMENTS_KEY) {
            None => Vec::new(),
            Some(Value::Array(entries)) => entries
                .iter()
                .enumerate()
                .map(|(index, entry)| match entry {
                    Value::Object(record) => MovementRecord::from_object(index, record),
                    other => Err(InputError::MovementNotObject {
                        index,
                        found: json_type(other),
                    }),
                })
                .collect::<Result<Vec<_>, _>>()?,
            Some(other) => {
                return Err(InputError::MovementsNotArray {
                    found: json_type(other),
                })
            }
        };

        Ok(Self {
            title: display_string(TITLE_KEY, None, object.get(TITLE_KEY))?,
            totals_line: display_string(TOTALS_KEY, None, object.get(TOTALS_KEY))?,
            movements,
        })
    }

    /// Returns the report title, if any.
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Returns the totals line, if any.
    pub fn totals_line(&self) -> Option<&str> {
        self.totals_line.as_deref()
    }

    /// Returns the movements in input order.
    pub fn movements(&self) -> &[MovementRecord] {
        &self.movements
    }
}

/// Reads a scalar as display text. `null` and missing keys are both absent.
fn display_string(
    field: &'static str,
    index: Option<usize>,
    value: Option<&Value>,
) -> Result<Option<String>, InputError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(text)) => Ok(Some(text.clone())),
        Some(scalar @ (Value::Number(_) | Value::Bool(_))) => Ok(Some(scalar.to_string())),
        Some(other) => Err(InputError::InvalidField {
            field,
            index,
            found: json_type(other),
        }),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
