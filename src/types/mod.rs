use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

pub mod communication;
pub mod constants;

/// Inferred type of a parameter value found in an input file
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    Int,
    Float,
    Bool,
    /// A categorical string value (model switch, method name, ...)
    Option,
}

/// A typed parameter value.
///
/// Serialized untagged so manifests carry plain JSON numbers, booleans and strings.
/// Variant order matters for deserialization: `1` reads back as `Int`, `1.0` as `Float`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl ParamValue {
    /// The type tag this value would be classified as
    pub fn param_type(&self) -> ParamType {
        match self {
            ParamValue::Bool(_) => ParamType::Bool,
            ParamValue::Int(_) => ParamType::Int,
            ParamValue::Float(_) => ParamType::Float,
            ParamValue::Text(_) => ParamType::Option,
        }
    }

    /// Numeric view of the value, if it has one
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ParamValue::Int(v) => Some(*v as f64),
            ParamValue::Float(v) => Some(*v),
            _ => None,
        }
    }
}

/// One modifiable value inside one discovered file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterDescriptor {
    /// Role of the file that owns this parameter
    pub role: String,
    /// Identifier token, e.g. `TipRad` or `PreCone(1)`
    pub name: String,
    /// Zero-based line index in the template file
    pub line_number: usize,
    /// Value as found in the template, never mutated afterwards
    pub original_value: ParamValue,
    pub param_type: ParamType,
    pub description: String,
    /// Physical unit taken from the first parenthesized part of the description
    pub unit: Option<String>,
}

impl ParameterDescriptor {
    /// The `role/name` key used in case manifests and on the command line
    pub fn key(&self) -> String {
        format!("{}/{}", self.role, self.name)
    }
}

/// A discovered file, identified by its role
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedFile {
    pub role: String,
    /// Absolute path of the template file
    pub path: PathBuf,
    /// Parameters extracted from the file, keyed by name
    pub parameters: BTreeMap<String, ParameterDescriptor>,
}

impl ResolvedFile {
    pub fn new(role: String, path: PathBuf) -> Self {
        Self {
            role,
            path,
            parameters: BTreeMap::new(),
        }
    }
}

/// Status of one case during a batch run
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum RunStatus {
    Ready,
    Running,
    Completed,
    Failed,
    /// Exited cleanly but reported warnings
    Warning,
}

impl RunStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, RunStatus::Completed | RunStatus::Failed | RunStatus::Warning)
    }
}

/// Outcome of executing one case
#[derive(Debug, Clone, PartialEq)]
pub struct RunResult {
    pub case_name: String,
    pub status: RunStatus,
    /// Wall-clock time spent in the external process
    pub elapsed: Duration,
    /// Human readable result: "Success", "Error (code N)", or an error message
    pub result: String,
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamType::Int => write!(f, "int"),
            ParamType::Float => write!(f, "float"),
            ParamType::Bool => write!(f, "bool"),
            ParamType::Option => write!(f, "option"),
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Bool(v) => write!(f, "{}", if *v { "True" } else { "False" }),
            ParamValue::Int(v) => write!(f, "{}", v),
            ParamValue::Float(v) => write!(f, "{:.4}", v),
            ParamValue::Text(v) => write!(f, "{}", v),
        }
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunStatus::Ready => write!(f, "Ready"),
            RunStatus::Running => write!(f, "Running"),
            RunStatus::Completed => write!(f, "Completed"),
            RunStatus::Failed => write!(f, "Failed"),
            RunStatus::Warning => write!(f, "Warning"),
        }
    }
}
