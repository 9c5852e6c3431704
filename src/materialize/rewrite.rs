use lazy_static::lazy_static;
use regex::bytes::Regex;
use std::borrow::Cow;
use std::fs;
use std::io;
use std::path::Path;

use crate::grammar::is_comment_or_divider;
use crate::types::{ParamValue, ParameterDescriptor};

lazy_static! {
    // matches raw bytes, valid UTF-8 or not
    static ref LEADING_TOKEN: Regex = Regex::new(r"(?-u)^\s*(\S+)").unwrap();
}

/// Renders a value the way the simulator's input files write it.
///
/// Floats use up to seven decimals with trailing zeros dropped, switching to
/// six-decimal scientific notation below 0.001 or from 10000 upwards.
pub fn format_value(value: &ParamValue) -> String {
    match value {
        ParamValue::Int(v) => v.to_string(),
        ParamValue::Float(v) => format_float(*v),
        ParamValue::Bool(v) => if *v { "True" } else { "False" }.to_string(),
        ParamValue::Text(v) if v.chars().any(char::is_whitespace) => format!("\"{}\"", v),
        ParamValue::Text(v) => v.clone(),
    }
}

fn format_float(v: f64) -> String {
    if !v.is_finite() {
        return v.to_string();
    }
    let magnitude = v.abs();
    if magnitude < 0.001 || magnitude >= 10000.0 {
        return scientific(v);
    }
    let fixed = format!("{:.7}", v);
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    if trimmed == "-0" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

/// `1.234500e+04` rather than Rust's `1.2345e4`
fn scientific(v: f64) -> String {
    let formatted = format!("{:.6e}", v);
    match formatted.split_once('e') {
        Some((mantissa, exponent)) => {
            let exponent: i32 = exponent.parse().unwrap_or(0);
            let sign = if exponent < 0 { '-' } else { '+' };
            format!("{}e{}{:02}", mantissa, sign, exponent.abs())
        }
        None => formatted,
    }
}

/// Splices the formatted value over the first token of a raw line
fn splice_leading_token(line: &[u8], value: &ParamValue) -> Option<Vec<u8>> {
    let token = LEADING_TOKEN.captures(line)?.get(1)?;
    let formatted = format_value(value);
    let mut rewritten = Vec::with_capacity(line.len() + formatted.len());
    rewritten.extend_from_slice(&line[..token.start()]);
    rewritten.extend_from_slice(formatted.as_bytes());
    rewritten.extend_from_slice(&line[token.end()..]);
    Some(rewritten)
}

/// Replaces the first token of `line` with the formatted value, keeping every
/// byte before and after it. Returns `None` for a line with no token.
pub fn rewrite_line(line: &str, value: &ParamValue) -> Option<String> {
    String::from_utf8(splice_leading_token(line.as_bytes(), value)?).ok()
}

/// Whether a non-comment `line` carries `name` as a whitespace-separated word
fn names_parameter(line: &str, name: &str) -> bool {
    let trimmed = line.trim_start();
    !trimmed.is_empty() && !is_comment_or_divider(trimmed) && trimmed.split_whitespace().any(|word| word == name)
}

/// Line index holding the parameter: the recorded line if it still names the
/// parameter, otherwise the first non-comment line that does.
pub fn find_target_line(lines: &[&str], descriptor: &ParameterDescriptor) -> Option<usize> {
    match lines.get(descriptor.line_number) {
        Some(line) if names_parameter(line, &descriptor.name) => Some(descriptor.line_number),
        _ => lines.iter().position(|line| names_parameter(line, &descriptor.name)),
    }
}

/// Rewrites the parameter's value in the file at `path` in place.
///
/// Returns `Ok(false)` when no line names the parameter; the file is then left
/// untouched. Only the value token changes: other lines, line endings (CRLF
/// included) and bytes that are not valid UTF-8 are written back as read.
pub fn rewrite_parameter(path: &Path, descriptor: &ParameterDescriptor, value: &ParamValue) -> io::Result<bool> {
    let bytes = fs::read(path)?;

    let chunks: Vec<&[u8]> = bytes.split_inclusive(|b| *b == b'\n').collect();
    let bodies: Vec<&[u8]> = chunks
        .iter()
        .map(|&chunk| {
            let end = chunk.len() - chunk.iter().rev().take_while(|&&b| b == b'\r' || b == b'\n').count();
            &chunk[..end]
        })
        .collect();
    let decoded: Vec<Cow<str>> = bodies.iter().map(|body| String::from_utf8_lossy(body)).collect();
    let lines: Vec<&str> = decoded.iter().map(|line| line.as_ref()).collect();

    let Some(target) = find_target_line(&lines, descriptor) else {
        return Ok(false);
    };
    let Some(replacement) = splice_leading_token(bodies[target], value) else {
        return Ok(false);
    };

    let mut output = Vec::with_capacity(bytes.len() + 16);
    for (index, chunk) in chunks.iter().enumerate() {
        if index == target {
            output.extend_from_slice(&replacement);
            output.extend_from_slice(&chunk[bodies[index].len()..]);
        } else {
            output.extend_from_slice(chunk);
        }
    }
    fs::write(path, output)?;
    Ok(true)
}
