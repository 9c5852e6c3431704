use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{ParamType, ParamValue, ParameterDescriptor};
use super::linspace;

#[derive(Debug, Error, PartialEq)]
pub enum SelectionError {
    #[error("{kind} cannot vary {key}, which is of type {param_type}")]
    Incompatible {
        key: String,
        kind: &'static str,
        param_type: ParamType,
    },
    #[error("Invalid selection for {key}: {reason}")]
    Invalid { key: String, reason: String },
    #[error("Unknown parameter: {0}")]
    UnknownParameter(String),
}

/// How one parameter is varied across a study.
///
/// Ranges interpolate linearly over `steps` points including both ends; one step
/// collapses to `start`. Integer ranges are rounded to the nearest integer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SelectionSpec {
    FloatRange { start: f64, end: f64, steps: usize },
    IntRange { start: i64, end: i64, steps: usize },
    IntList { values: Vec<i64> },
    BoolVary,
    BoolFixed { value: bool },
    Options { values: Vec<String> },
}

/// A parameter chosen for variation together with its range or choices
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterSelection {
    pub descriptor: ParameterDescriptor,
    pub spec: SelectionSpec,
}

impl ParameterSelection {
    /// Pairs a descriptor with a spec, rejecting specs of the wrong kind
    pub fn new(descriptor: ParameterDescriptor, spec: SelectionSpec) -> Result<Self, SelectionError> {
        let key = descriptor.key();
        if !spec.accepts(descriptor.param_type) {
            return Err(SelectionError::Incompatible {
                key,
                kind: spec.kind_name(),
                param_type: descriptor.param_type,
            });
        }
        spec.validate().map_err(|reason| SelectionError::Invalid { key, reason })?;
        Ok(Self { descriptor, spec })
    }

    pub fn key(&self) -> String {
        self.descriptor.key()
    }

    /// Values this selection contributes to a grid, never empty
    pub fn grid_values(&self) -> Vec<ParamValue> {
        let values = self.spec.discrete_values();
        if values.is_empty() {
            vec![self.descriptor.original_value.clone()]
        } else {
            values
        }
    }

    /// Value used when this selection does not take part in sampling
    pub fn held_value(&self) -> ParamValue {
        self.spec
            .fixed_value()
            .unwrap_or_else(|| self.descriptor.original_value.clone())
    }
}

impl SelectionSpec {
    pub fn kind_name(&self) -> &'static str {
        match self {
            SelectionSpec::FloatRange { .. } => "float_range",
            SelectionSpec::IntRange { .. } => "int_range",
            SelectionSpec::IntList { .. } => "int_list",
            SelectionSpec::BoolVary => "bool_vary",
            SelectionSpec::BoolFixed { .. } => "bool_fixed",
            SelectionSpec::Options { .. } => "options",
        }
    }

    pub fn accepts(&self, param_type: ParamType) -> bool {
        matches!(
            (self, param_type),
            (SelectionSpec::FloatRange { .. }, ParamType::Float)
                | (SelectionSpec::IntRange { .. }, ParamType::Int)
                | (SelectionSpec::IntList { .. }, ParamType::Int)
                | (SelectionSpec::BoolVary, ParamType::Bool)
                | (SelectionSpec::BoolFixed { .. }, ParamType::Bool)
                | (SelectionSpec::Options { .. }, ParamType::Option)
        )
    }

    pub fn validate(&self) -> Result<(), String> {
        match self {
            SelectionSpec::FloatRange { start, end, steps } => {
                if !start.is_finite() || !end.is_finite() {
                    return Err("range bounds must be finite".to_string());
                }
                if *steps == 0 {
                    return Err("steps must be at least 1".to_string());
                }
            }
            SelectionSpec::IntRange { steps, .. } => {
                if *steps == 0 {
                    return Err("steps must be at least 1".to_string());
                }
            }
            SelectionSpec::IntList { values } if values.is_empty() => {
                return Err("list must not be empty".to_string());
            }
            SelectionSpec::Options { values } if values.is_empty() => {
                return Err("option list must not be empty".to_string());
            }
            _ => {}
        }
        Ok(())
    }

    /// Whether the selection takes part in non-grid sampling
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            SelectionSpec::FloatRange { .. } | SelectionSpec::IntRange { .. } | SelectionSpec::IntList { .. }
        )
    }

    /// The grid option set, in order
    pub fn discrete_values(&self) -> Vec<ParamValue> {
        match self {
            SelectionSpec::FloatRange { start, end, steps } => linspace(*start, *end, *steps)
                .into_iter()
                .map(ParamValue::Float)
                .collect(),
            SelectionSpec::IntRange { start, end, steps } => linspace(*start as f64, *end as f64, *steps)
                .into_iter()
                .map(|v| ParamValue::Int(v.round() as i64))
                .collect(),
            SelectionSpec::IntList { values } => values.iter().copied().map(ParamValue::Int).collect(),
            SelectionSpec::BoolVary => vec![ParamValue::Bool(false), ParamValue::Bool(true)],
            SelectionSpec::BoolFixed { value } => vec![ParamValue::Bool(*value)],
            SelectionSpec::Options { values } => values.iter().cloned().map(ParamValue::Text).collect(),
        }
    }

    /// `(start, end)` of a numeric selection; lists span their smallest to largest member
    pub fn bounds(&self) -> Option<(f64, f64)> {
        match self {
            SelectionSpec::FloatRange { start, end, .. } => Some((*start, *end)),
            SelectionSpec::IntRange { start, end, .. } => Some((*start as f64, *end as f64)),
            SelectionSpec::IntList { values } => {
                let min = values.iter().min()?;
                let max = values.iter().max()?;
                Some((*min as f64, *max as f64))
            }
            _ => None,
        }
    }

    /// Turns a sampled real number into this selection's value type.
    /// Integers round to nearest; lists snap to their nearest member.
    pub fn coerce(&self, sample: f64) -> ParamValue {
        match self {
            SelectionSpec::IntRange { .. } => ParamValue::Int(sample.round() as i64),
            SelectionSpec::IntList { values } => {
                let nearest = values
                    .iter()
                    .copied()
                    .min_by(|a, b| {
                        let da = (*a as f64 - sample).abs();
                        let db = (*b as f64 - sample).abs();
                        da.total_cmp(&db)
                    })
                    .unwrap_or(sample.round() as i64);
                ParamValue::Int(nearest)
            }
            _ => ParamValue::Float(sample),
        }
    }

    /// A single value the selection pins, if it pins one
    pub fn fixed_value(&self) -> Option<ParamValue> {
        match self {
            SelectionSpec::BoolFixed { value } => Some(ParamValue::Bool(*value)),
            SelectionSpec::Options { values } if values.len() == 1 => Some(ParamValue::Text(values[0].clone())),
            _ => None,
        }
    }

    /// A reasonable starting spec for a freshly selected parameter: numeric values
    /// span 80% to 120% of their current value (-1 to 1 around zero), booleans vary,
    /// options keep their current value.
    pub fn default_for(descriptor: &ParameterDescriptor, steps: usize) -> Self {
        let steps = steps.max(1);
        let (low, high) = match descriptor.original_value.as_f64() {
            Some(current) if current.abs() > 1e-9 => {
                let (a, b) = (current * 0.8, current * 1.2);
                (a.min(b), a.max(b))
            }
            _ => (-1.0, 1.0),
        };
        match (&descriptor.param_type, &descriptor.original_value) {
            (ParamType::Float, _) => SelectionSpec::FloatRange { start: low, end: high, steps },
            (ParamType::Int, _) => SelectionSpec::IntRange {
                start: low.round() as i64,
                end: high.round() as i64,
                steps,
            },
            (ParamType::Bool, _) => SelectionSpec::BoolVary,
            (ParamType::Option, ParamValue::Text(current)) => SelectionSpec::Options {
                values: vec![current.clone()],
            },
            (ParamType::Option, other) => SelectionSpec::Options {
                values: vec![other.to_string()],
            },
        }
    }

    /// Parses the command-line form of a spec for a parameter of type `param_type`:
    /// `start:end:steps` for numeric ranges, `a,b,c` for integer or option lists,
    /// `vary` or `true`/`false` for booleans.
    pub fn parse(text: &str, param_type: ParamType) -> Result<Self, String> {
        let text = text.trim();
        if text.is_empty() {
            return Err("empty selection".to_string());
        }

        let spec = match param_type {
            ParamType::Float => {
                if text.contains(',') {
                    return Err("float parameters take start:end:steps".to_string());
                }
                let (start, end, steps) = parse_range(text)?;
                SelectionSpec::FloatRange { start, end, steps }
            }
            ParamType::Int if text.contains(':') => {
                let (start, end, steps) = parse_range(text)?;
                SelectionSpec::IntRange {
                    start: start.round() as i64,
                    end: end.round() as i64,
                    steps,
                }
            }
            ParamType::Int => {
                let values = text
                    .split(',')
                    .map(|item| item.trim().parse::<i64>().map_err(|_| format!("'{}' is not an integer", item.trim())))
                    .collect::<Result<Vec<_>, _>>()?;
                SelectionSpec::IntList { values }
            }
            ParamType::Bool => match text.to_ascii_lowercase().as_str() {
                "vary" | "both" => SelectionSpec::BoolVary,
                "true" => SelectionSpec::BoolFixed { value: true },
                "false" => SelectionSpec::BoolFixed { value: false },
                other => return Err(format!("'{}' is not vary, true or false", other)),
            },
            ParamType::Option => SelectionSpec::Options {
                values: text
                    .split(',')
                    .map(|item| item.trim().to_string())
                    .filter(|item| !item.is_empty())
                    .collect(),
            },
        };

        spec.validate()?;
        Ok(spec)
    }
}

/// `start:end:steps`, or a single number meaning one step
fn parse_range(text: &str) -> Result<(f64, f64, usize), String> {
    let parts: Vec<&str> = text.split(':').map(str::trim).collect();
    let number = |s: &str| s.parse::<f64>().map_err(|_| format!("'{}' is not a number", s));
    match parts.as_slice() {
        [single] => {
            let value = number(single)?;
            Ok((value, value, 1))
        }
        [start, end, steps] => {
            let steps = steps
                .parse::<usize>()
                .map_err(|_| format!("'{}' is not a step count", steps))?;
            Ok((number(start)?, number(end)?, steps))
        }
        _ => Err(format!("'{}' is not start:end:steps", text)),
    }
}
