use crate::record::Value;

/// Table cells are cut to this many characters.
pub const MAX_VALUE_LENGTH: usize = 1000;

/// Converts [`Value`]s into display strings.
///
/// * `null`, `true` and `false` are written in lower case.
/// * Numbers and strings are written as they are, without quotes.
/// * Anything else is written as JSON, pretty-printed if configured.
///
/// Afterwards, line breaks are either collapsed into single spaces, or, if
/// inline line breaks are allowed, kept. In the latter case, escaped `\r` and
/// `\n` sequences inside JSON objects are turned back into real line breaks.
///
/// # Examples
///
/// ```
/// use tracing_tabular::formatter::Stringifier;
/// use tracing_tabular::record::Value;
///
/// let single_line = Stringifier::new(false, false);
/// assert_eq!(single_line.stringify(&Value::from("a\r\nb\nc")), "a b c");
/// assert_eq!(single_line.stringify(&Value::Null), "null");
/// assert_eq!(single_line.stringify(&Value::from(vec![1, 2])), "[1,2]");
///
/// let multi_line = Stringifier::new(true, false);
/// assert_eq!(multi_line.stringify(&Value::from("a\nb")), "a\nb");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Stringifier {
    allow_inline_line_breaks: bool,
    pretty_print: bool,
}

impl Stringifier {
    pub const fn new(allow_inline_line_breaks: bool, pretty_print: bool) -> Self {
        Stringifier {
            allow_inline_line_breaks,
            pretty_print,
        }
    }

    /// Converts a value into a string and applies the line break policy.
    pub fn stringify(&self, value: &Value) -> String {
        self.apply_line_breaks(self.convert(value))
    }

    /// Like [`stringify`], and cuts the result to [`MAX_VALUE_LENGTH`]
    /// characters, as done for table cells.
    ///
    /// [`stringify`]: Stringifier::stringify
    pub fn cell(&self, value: &Value) -> String {
        truncate(self.stringify(value), MAX_VALUE_LENGTH)
    }

    /// Applies the line break policy and the length limit to text that is
    /// already a string.
    pub fn cell_text(&self, text: &str) -> String {
        truncate(self.apply_line_breaks(text.to_string()), MAX_VALUE_LENGTH)
    }

    fn convert(&self, value: &Value) -> String {
        match value {
            Value::Null => "null".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Int(i) => i.to_string(),
            Value::Float(f) => f.to_string(),
            Value::Str(s) => s.clone(),
            other => self.to_json(other),
        }
    }

    fn to_json(&self, value: &Value) -> String {
        let json = if self.pretty_print {
            serde_json::to_string_pretty(value)
        } else {
            serde_json::to_string(value)
        };

        json.unwrap_or_else(|_| format!("{:?}", value))
    }

    fn apply_line_breaks(&self, text: String) -> String {
        if !self.allow_inline_line_breaks {
            return text.replace("\r\n", " ").replace(['\r', '\n'], " ");
        }

        if text.starts_with('{') {
            text.replace("\\r", "\r").replace("\\n", "\n")
        } else {
            text
        }
    }
}

/// Turns a key into a row label: underscores become spaces, surrounding
/// whitespace is trimmed and the first letter is capitalized.
///
/// ```
/// assert_eq!(tracing_tabular::formatter::label("request_id"), "Request id");
/// assert_eq!(tracing_tabular::formatter::label(" _ "), "");
/// ```
pub fn label(key: &str) -> String {
    let spaced = key.replace('_', " ");
    let mut chars = spaced.trim().chars();

    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Cuts `text` to at most `max` characters.
pub fn truncate(mut text: String, max: usize) -> String {
    if let Some((index, _)) = text.char_indices().nth(max) {
        text.truncate(index);
    }
    text
}
