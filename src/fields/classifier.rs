use once_cell::sync::Lazy;
use regex::Regex;

// @module: Line shape detection and value translatability heuristics

// @const: Scientific notation; a bare trailing exponent marker ("12E") also matches
static SCIENTIFIC_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^[+-]?[0-9]+\.?[0-9]*E[+-]?[0-9]*$").unwrap()
});

// @const: Integer with a single sentinel suffix (estimated / normal flags)
static SENTINEL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^[+-]?[0-9]+[EN]$").unwrap()
});

// @const: Simple fraction such as 3/4
static FRACTION_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9]+/[0-9]+$").unwrap()
});

// @const: Windows drive path prefix such as C:\
static DRIVE_PATH_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z]:\\").unwrap()
});

/// Prefixes of lines that are comments or section headers and never translated
const SKIPPED_LINE_PREFIXES: &[&str] = &["#", "[", "//"];

/// Structural shape of a single trimmed line.
///
/// Separators are tried in a fixed order (`=`, `;`, `": "`) and the first
/// match wins, so a line is never classified twice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineShape<'a> {
    /// Empty, comment or section line
    Skipped,
    /// `key=value`, split on the first `=`
    KeyValue { key: &'a str, value: &'a str },
    /// Semicolon-delimited record, fields untrimmed
    Delimited(Vec<&'a str>),
    /// `key: value`, split on the first `": "`
    ColonValue { key: &'a str, value: &'a str },
    /// Anything else: the whole line is the candidate
    FreeText(&'a str),
}

/// Determine the shape of a line. The line is trimmed first.
pub fn classify_line(line: &str) -> LineShape<'_> {
    let line = line.trim();

    if line.is_empty() || SKIPPED_LINE_PREFIXES.iter().any(|p| line.starts_with(p)) {
        return LineShape::Skipped;
    }

    if let Some((key, value)) = line.split_once('=') {
        return LineShape::KeyValue {
            key: key.trim(),
            value: value.trim(),
        };
    }

    if line.contains(';') {
        return LineShape::Delimited(line.split(';').collect());
    }

    if let Some((key, value)) = line.split_once(": ") {
        return LineShape::ColonValue {
            key: key.trim(),
            value: value.trim(),
        };
    }

    LineShape::FreeText(line)
}

/// Check whether a value is numeric-like and must be left untouched.
///
/// Returns true for empty strings and lone signs, plain integers, decimals
/// (including the European comma form), scientific notation, integers with an
/// `E`/`N` sentinel suffix and simple fractions.
pub fn is_number_or_scientific(text: &str) -> bool {
    let text = text.trim();

    if text.is_empty() || text == "-" || text == "+" {
        return true;
    }

    let unsigned = text
        .strip_prefix('-')
        .or_else(|| text.strip_prefix('+'))
        .unwrap_or(text);
    if !unsigned.is_empty() && unsigned.chars().all(|c| c.is_ascii_digit()) {
        return true;
    }

    if parses_as_decimal(text) || parses_as_decimal(&text.replace(',', ".")) {
        return true;
    }

    SCIENTIFIC_REGEX.is_match(text)
        || SENTINEL_REGEX.is_match(text)
        || FRACTION_REGEX.is_match(text)
}

// Word forms like "inf" or "NaN" parse as floats but are text here
fn parses_as_decimal(text: &str) -> bool {
    text.parse::<f64>().is_ok_and(f64::is_finite)
}

/// True when the text contains at least one ASCII letter
pub fn has_ascii_letter(text: &str) -> bool {
    text.chars().any(|c| c.is_ascii_alphabetic())
}

/// True when the text holds a bracketed token anywhere
pub fn has_brackets(text: &str) -> bool {
    text.contains('[') && text.contains(']')
}

/// True when the text starts with a Windows drive path
pub fn starts_with_drive_path(text: &str) -> bool {
    DRIVE_PATH_REGEX.is_match(text)
}

/// Length in characters, not bytes
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Exclusions shared by every separated value: empty, numeric, too short, bracketed
pub fn is_excluded_value(value: &str) -> bool {
    value.is_empty() || is_number_or_scientific(value) || char_len(value) < 2 || has_brackets(value)
}
