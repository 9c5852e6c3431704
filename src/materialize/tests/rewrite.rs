use std::fs;

use crate::materialize::{find_target_line, format_value, rewrite_line, rewrite_parameter};
use crate::types::{ParamType, ParamValue, ParameterDescriptor};

fn descriptor(name: &str, line_number: usize, value: ParamValue) -> ParameterDescriptor {
    ParameterDescriptor {
        role: "ElastoDyn".into(),
        name: name.into(),
        line_number,
        param_type: value.param_type(),
        original_value: value,
        description: String::new(),
        unit: None,
    }
}

#[test]
fn test_float_rewrite_preserves_description() {
    let line = "1.500000  TipRad  - Blade tip radius (m)";
    let rewritten = rewrite_line(line, &ParamValue::Float(2.25)).expect("Line has a token");

    assert!(rewritten.ends_with("Blade tip radius (m)"));
    assert_eq!(rewritten, "2.25  TipRad  - Blade tip radius (m)");
    let token = rewritten.split_whitespace().next().expect("Leading token");
    assert_eq!(token.parse::<f64>(), Ok(2.25));
}

#[test]
fn test_bool_rewrite_uses_capitalized_literal() {
    let rewritten = rewrite_line("false   FlapDOF1 - First flapwise blade mode DOF (flag)", &ParamValue::Bool(true))
        .expect("Line has a token");
    assert_eq!(rewritten.split_whitespace().next(), Some("True"));
    assert_eq!(format_value(&ParamValue::Bool(false)), "False");
}

#[test]
fn test_rewrite_keeps_leading_indent() {
    let rewritten = rewrite_line("          3   NumBl  - Number of blades (-)", &ParamValue::Int(2))
        .expect("Line has a token");
    assert_eq!(rewritten, "          2   NumBl  - Number of blades (-)");
    assert_eq!(rewrite_line("   ", &ParamValue::Int(2)), None);
}

#[test]
fn test_float_formatting() {
    assert_eq!(format_value(&ParamValue::Float(63.0)), "63");
    assert_eq!(format_value(&ParamValue::Float(-2.5)), "-2.5");
    assert_eq!(format_value(&ParamValue::Float(0.1234567891)), "0.1234568");
    assert_eq!(format_value(&ParamValue::Float(0.001)), "0.001");
    assert_eq!(format_value(&ParamValue::Float(0.0005)), "5.000000e-04");
    assert_eq!(format_value(&ParamValue::Float(12345.0)), "1.234500e+04");
    assert_eq!(format_value(&ParamValue::Float(0.0)), "0.000000e+00");
    assert_eq!(format_value(&ParamValue::Float(9999.5)), "9999.5");
}

#[test]
fn test_option_formatting() {
    assert_eq!(format_value(&ParamValue::Text("BEMT".into())), "BEMT");
    assert_eq!(format_value(&ParamValue::Text("two words".into())), "\"two words\"");
    assert_eq!(format_value(&ParamValue::Int(-4)), "-4");
}

#[test]
fn test_target_line_falls_back_to_name_search() {
    let lines = vec![
        "! TipRad is mentioned in a comment",
        "------ TipRad section ------",
        "   63.0   TipRad   - Tip radius (m)",
    ];
    // recorded line still names the parameter
    assert_eq!(find_target_line(&lines, &descriptor("TipRad", 2, ParamValue::Float(63.0))), Some(2));
    // recorded line moved: comments and dividers are skipped
    assert_eq!(find_target_line(&lines, &descriptor("TipRad", 0, ParamValue::Float(63.0))), Some(2));
    assert_eq!(find_target_line(&lines, &descriptor("TipRad", 40, ParamValue::Float(63.0))), Some(2));
    // whole words only
    assert_eq!(find_target_line(&lines, &descriptor("Tip", 2, ParamValue::Float(63.0))), None);
}

#[test]
fn test_rewrite_parameter_in_file() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("ElastoDyn.dat");
    fs::write(
        &path,
        "------- ELASTODYN -------\r\n   63.0   TipRad   - Tip radius (m)\r\n  -2.5   PreCone(1) - Cone (deg)\r\n",
    )
    .expect("Failed to write file");

    let tip = descriptor("TipRad", 1, ParamValue::Float(63.0));
    assert!(rewrite_parameter(&path, &tip, &ParamValue::Float(61.5)).expect("Rewrite failed"));
    let cone = descriptor("PreCone(1)", 2, ParamValue::Float(-2.5));
    assert_eq!(cone.param_type, ParamType::Float);
    assert!(rewrite_parameter(&path, &cone, &ParamValue::Float(-3.0)).expect("Rewrite failed"));

    let content = fs::read_to_string(&path).expect("Failed to read file");
    assert_eq!(
        content,
        "------- ELASTODYN -------\r\n   61.5   TipRad   - Tip radius (m)\r\n  -3   PreCone(1) - Cone (deg)\r\n"
    );
}

#[test]
fn test_rewrite_missing_parameter_leaves_file() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("ElastoDyn.dat");
    let original = "   63.0   TipRad   - Tip radius (m)\n";
    fs::write(&path, original).expect("Failed to write file");

    let ghost = descriptor("HubRad", 0, ParamValue::Float(1.5));
    assert!(!rewrite_parameter(&path, &ghost, &ParamValue::Float(2.0)).expect("Rewrite failed"));
    assert_eq!(fs::read_to_string(&path).expect("Failed to read file"), original);
}

#[test]
fn test_rewrite_keeps_undecodable_bytes_on_other_lines() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("ElastoDyn.dat");
    // Latin-1 degree sign in a description
    let mut original = b"  0.0   PreCone(1) - cone angle (\xB0)\n".to_vec();
    original.extend_from_slice(b"   63.0   TipRad   - Tip radius (\xB0 m)\n");
    fs::write(&path, &original).expect("Failed to write file");

    let tip = descriptor("TipRad", 1, ParamValue::Float(63.0));
    assert!(rewrite_parameter(&path, &tip, &ParamValue::Float(40.0)).expect("Rewrite failed"));

    let mut expected = b"  0.0   PreCone(1) - cone angle (\xB0)\n".to_vec();
    expected.extend_from_slice(b"   40   TipRad   - Tip radius (\xB0 m)\n");
    assert_eq!(fs::read(&path).expect("Failed to read file"), expected);
}
