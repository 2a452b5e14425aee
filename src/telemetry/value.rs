//! Value - Scalar Topic Values

use std::fmt;

/// A scalar value carried by a telemetry topic
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Boolean(bool),
    Double(f64),
    Integer(i64),
    String(String),
}

impl Value {
    /// NT4 type string used when publishing
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Boolean(_) => "boolean",
            Value::Double(_) => "double",
            Value::Integer(_) => "int",
            Value::String(_) => "string",
        }
    }

    /// NT4 binary type id
    pub fn type_id(&self) -> u8 {
        match self {
            Value::Boolean(_) => 0,
            Value::Double(_) => 1,
            Value::Integer(_) => 2,
            Value::String(_) => 4,
        }
    }

    /// Interpret the value as an integer counter.
    ///
    /// Doubles are truncated and strings parsed, so a counter published by a
    /// differently-typed writer still increments from its last value.
    pub fn as_counter(&self) -> Option<i64> {
        match self {
            Value::Integer(n) => Some(*n),
            Value::Double(d) if d.is_finite() => Some(*d as i64),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Boolean(b) => write!(f, "{b}"),
            Value::Integer(n) => write!(f, "{n}"),
            Value::String(s) => f.write_str(s),
            // keep a fractional digit so doubles never read as integers
            Value::Double(d) if d.is_finite() && d.fract() == 0.0 => write!(f, "{d:.1}"),
            Value::Double(d) => write!(f, "{d}"),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Double(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}
