//! Two-stage tokenizer for line-oriented simulator input files.
//!
//! Stage one classifies a raw line (parameter, file reference, quoted path, ...).
//! Stage two parses the value token of a parameter line into a typed value.
//! Everything dialect-specific (extensions, keywords, list blocks) lives in a
//! [`Dialect`] table so other input conventions can be added without touching
//! the patterns below.

use regex::Regex;
use lazy_static::lazy_static;
use crate::types::ParamValue;


lazy_static! {
    // "path/to/File.dat"   Keyword   - description
    static ref REFERENCE_PATTERN: Regex =
        Regex::new(r#"^["']([^"']+)["']\s+([A-Za-z_][A-Za-z0-9_()]*)"#).unwrap();
    // "path/to/File.dat"   (anything or nothing after)
    static ref QUOTED_PATH_PATTERN: Regex = Regex::new(r#"^["']([^"']+)["']"#).unwrap();
    // VALUE   Name(1)   - description  |  VALUE  Name  ! description
    static ref PARAMETER_PATTERN: Regex =
        Regex::new(r#"^([^\s!#"]+)\s+([A-Za-z_][A-Za-z0-9_]*(?:\([0-9]+\))?)\s*[-!]"#).unwrap();
    // 3   NumAFfiles
    static ref COUNT_PATTERN: Regex = Regex::new(r"^\s*(\d+)\s+([A-Za-z_][A-Za-z0-9_]*)").unwrap();
    static ref UNIT_PATTERN: Regex = Regex::new(r"\(([^)]+)\)").unwrap();
}

/// A block of keyword-less file paths announced by a count line
#[derive(Debug, Clone, PartialEq)]
pub struct ListBlock {
    /// Keyword of the line holding the number of paths that follow
    pub count_keyword: &'static str,
    /// Roles become `<prefix>_<n>`, 1-based
    pub role_prefix: &'static str,
}

/// Vocabulary of one simulator input convention
#[derive(Debug, Clone, PartialEq)]
pub struct Dialect {
    pub name: &'static str,
    /// Extensions a quoted value must carry to count as a file reference
    pub reference_extensions: &'static [&'static str],
    /// Keywords next to a quoted value that never name a file role
    pub skipped_reference_keywords: &'static [&'static str],
    /// Identifiers that are never parameters
    pub reserved_names: &'static [&'static str],
    /// Value tokens containing these are file names, not parameters
    pub value_file_extensions: &'static [&'static str],
    /// Description words marking a non-numeric value as a categorical option
    pub option_keywords: &'static [&'static str],
    /// Parenthesized description text containing these is not a unit
    pub unit_exclusions: &'static [&'static str],
    pub list_blocks: &'static [ListBlock],
}

/// Stage one result for a single line
#[derive(Debug, Clone, PartialEq)]
pub enum LineKind<'a> {
    Blank,
    /// Comment or section divider
    Comment,
    /// A quoted file name followed by the keyword naming its role
    FileReference { path: &'a str, keyword: &'a str },
    /// A line starting with a quoted string that is not a keyed file reference
    QuotedPath { path: &'a str },
    /// `value name <delimiter> description`
    Parameter { value: &'a str, name: &'a str, description: &'a str },
    Other,
}

impl Default for Dialect {
    fn default() -> Self {
        Self::openfast()
    }
}

impl Dialect {
    /// The OpenFAST input file convention
    pub fn openfast() -> Self {
        Self {
            name: "openfast",
            reference_extensions: &["dat", "txt", "csv", "af", "ipt", "bld", "twr", "in"],
            skipped_reference_keywords: &["true", "false", "default", "none", "unused", "echo"],
            reserved_names: &["true", "false", "default", "unused", "none", "end", "echo"],
            value_file_extensions: &[".dat", ".txt", ".csv"],
            option_keywords: &["option", "method", "model", "type", "switch", "code", "name", "file"],
            unit_exclusions: &["flag", "switch", "quoted", "string", "option"],
            list_blocks: &[ListBlock { count_keyword: "NumAFfiles", role_prefix: "AirfoilFile" }],
        }
    }

    /// Stage one: decide what kind of line this is
    pub fn classify_line<'a>(&self, line: &'a str) -> LineKind<'a> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return LineKind::Blank;
        }
        if is_comment_or_divider(trimmed) {
            return LineKind::Comment;
        }

        if trimmed.starts_with('"') || trimmed.starts_with('\'') {
            if let Some(caps) = REFERENCE_PATTERN.captures(trimmed) {
                let path = caps.get(1).map_or("", |m| m.as_str().trim());
                let keyword = caps.get(2).map_or("", |m| m.as_str());
                if self.has_reference_extension(path) {
                    return LineKind::FileReference { path, keyword };
                }
            }
            if let Some(caps) = QUOTED_PATH_PATTERN.captures(trimmed) {
                let path = caps.get(1).map_or("", |m| m.as_str().trim());
                return LineKind::QuotedPath { path };
            }
            return LineKind::Other;
        }

        if let Some(caps) = PARAMETER_PATTERN.captures(trimmed) {
            let whole = caps.get(0).map_or(0, |m| m.end());
            return LineKind::Parameter {
                value: caps.get(1).map_or("", |m| m.as_str()),
                name: caps.get(2).map_or("", |m| m.as_str()),
                description: trimmed[whole..].trim(),
            };
        }

        LineKind::Other
    }

    /// Recognizes `N <CountKeyword>` lines that open a keyword-less path list
    pub fn list_header(&self, line: &str) -> Option<(usize, &ListBlock)> {
        let caps = COUNT_PATTERN.captures(line)?;
        let keyword = caps.get(2)?.as_str();
        let block = self
            .list_blocks
            .iter()
            .find(|block| block.count_keyword.eq_ignore_ascii_case(keyword))?;
        let count = caps.get(1)?.as_str().parse().ok()?;
        Some((count, block))
    }

    /// Keywords like `true` or `unused` next to a quoted value are not roles
    pub fn is_skipped_reference_keyword(&self, keyword: &str) -> bool {
        self.skipped_reference_keywords
            .iter()
            .any(|k| k.eq_ignore_ascii_case(keyword))
    }

    pub fn is_reserved_name(&self, name: &str) -> bool {
        self.reserved_names.iter().any(|r| r.eq_ignore_ascii_case(name))
    }

    /// Whether a value token is really a file name
    pub fn looks_like_file_value(&self, value: &str) -> bool {
        let lower = value.to_ascii_lowercase();
        self.value_file_extensions.iter().any(|ext| lower.contains(ext))
    }

    fn has_reference_extension(&self, path: &str) -> bool {
        match path.rsplit_once('.') {
            Some((_, ext)) => self
                .reference_extensions
                .iter()
                .any(|known| known.eq_ignore_ascii_case(ext)),
            None => false,
        }
    }

    /// Stage two: type a value token.
    ///
    /// Tried in order: number (int when written without `.`/exponent and integral),
    /// boolean literal, categorical option when the description mentions an option
    /// keyword. Anything else is not a parameter.
    pub fn parse_value(&self, value: &str, description: &str) -> Option<ParamValue> {
        let value = value.trim();
        if value.eq_ignore_ascii_case("default") || value.eq_ignore_ascii_case("\"default\"") {
            return None;
        }

        if let Ok(number) = value.parse::<f64>() {
            let lower = value.to_ascii_lowercase();
            let plain = !lower.contains('.') && !lower.contains('e');
            if plain && number.is_finite() && number == number.trunc() && number.abs() < i64::MAX as f64 {
                return Some(ParamValue::Int(number as i64));
            }
            return Some(ParamValue::Float(number));
        }

        if value.eq_ignore_ascii_case("true") {
            return Some(ParamValue::Bool(true));
        }
        if value.eq_ignore_ascii_case("false") {
            return Some(ParamValue::Bool(false));
        }

        let description = description.to_ascii_lowercase();
        if self.option_keywords.iter().any(|k| description.contains(k)) {
            return Some(ParamValue::Text(value.to_string()));
        }

        None
    }

    /// First parenthesized part of a description, unless it describes a flag or string
    pub fn extract_unit(&self, description: &str) -> Option<String> {
        let caps = UNIT_PATTERN.captures(description)?;
        let unit = caps.get(1)?.as_str().trim();
        let lower = unit.to_ascii_lowercase();
        if unit.is_empty() || self.unit_exclusions.iter().any(|word| lower.contains(word)) {
            return None;
        }
        Some(unit.to_string())
    }
}

/// Comment markers, and `--`/`==` runs used as section dividers.
/// A single leading `-` is a negative value, not a divider.
pub fn is_comment_or_divider(trimmed: &str) -> bool {
    trimmed.starts_with('!')
        || trimmed.starts_with('#')
        || trimmed.starts_with("--")
        || trimmed.starts_with("==")
        || trimmed == "-"
        || trimmed == "="
}
