
use crate::types::{ParamValue, ParameterDescriptor};

/// Descriptor for a parameter of the type implied by `value`
pub(crate) fn descriptor(role: &str, name: &str, value: ParamValue) -> ParameterDescriptor {
    ParameterDescriptor {
        role: role.to_string(),
        name: name.to_string(),
        line_number: 0,
        param_type: value.param_type(),
        original_value: value,
        description: String::new(),
        unit: None,
    }
}
