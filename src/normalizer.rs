//! Bound arbitrary [`Value`]s into renderable shapes.
//!
//! See [`Normalizer`] for more details.
use crate::record::{Fields, Value};
use chrono::{DateTime, Utc};
use std::fmt::Write;

/// Limits and formats a [`Normalizer`] applies.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NormalizeOptions {
    /// Nesting deeper than this is replaced by a notice.
    pub max_depth: usize,
    /// Sequences and mappings are cut after this many items.
    pub max_items: usize,
    /// The `chrono` strftime pattern used for dates.
    pub date_format: String,
}

/// A type that converts [`Value`]s into a serializable, bounded form before
/// they're rendered.
///
/// # Examples
///
/// This trait is implemented for all `Fn(&Value, &NormalizeOptions) -> Value`
/// types, so a closure can stand in for [`DefaultNormalizer`].
/// ```
/// use tracing_tabular::normalizer::{Normalizer, NormalizeOptions};
/// use tracing_tabular::record::Value;
///
/// let redact = |value: &Value, _: &NormalizeOptions| match value {
///     Value::Str(_) => Value::from("***"),
///     other => other.clone(),
/// };
///
/// let options = NormalizeOptions {
///     max_depth: 9,
///     max_items: 1000,
///     date_format: "%Y".to_string(),
/// };
/// assert_eq!(redact.normalize(&Value::from("secret"), &options), Value::from("***"));
/// ```
pub trait Normalizer {
    /// Normalizes a single value.
    fn normalize(&self, value: &Value, options: &NormalizeOptions) -> Value;

    /// Normalizes the values of a record's extra or context, keeping keys and
    /// order.
    ///
    /// At most `max_items` entries are kept. If there are more, a `"..."`
    /// entry saying how many were dropped is appended, as for nested maps.
    fn normalize_fields(&self, fields: &Fields, options: &NormalizeOptions) -> Fields {
        let mut normalized: Fields = fields
            .iter()
            .take(options.max_items)
            .map(|(key, value)| (key, self.normalize(value, options)))
            .collect();

        if fields.len() > options.max_items {
            normalized.insert("...", over_items(options.max_items, fields.len()));
        }
        normalized
    }
}

impl<F> Normalizer for F
where
    F: Fn(&Value, &NormalizeOptions) -> Value,
{
    #[inline]
    fn normalize(&self, value: &Value, options: &NormalizeOptions) -> Value {
        self(value, options)
    }
}

/// The [`Normalizer`] used unless another one is configured.
///
/// * Nesting beyond [`max_depth`] becomes
///   `"Over N levels deep, aborting normalization"`.
/// * Sequences and mappings keep [`max_items`] entries, followed by a notice
///   `"Over N items (M total), aborting normalization"`, which is keyed by
///   `"..."` in mappings.
/// * Non-finite floats become `"NaN"`, `"INF"` or `"-INF"`.
/// * Dates become strings in [`date_format`].
/// * Objects become a single-entry map from their class to their fields.
/// * Throwables are kept, so that they can be expanded into their chains.
///
/// [`max_depth`]: NormalizeOptions::max_depth
/// [`max_items`]: NormalizeOptions::max_items
/// [`date_format`]: NormalizeOptions::date_format
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultNormalizer;

impl Normalizer for DefaultNormalizer {
    fn normalize(&self, value: &Value, options: &NormalizeOptions) -> Value {
        normalize_at(value, 1, options)
    }
}

fn normalize_at(value: &Value, depth: usize, options: &NormalizeOptions) -> Value {
    if depth > options.max_depth {
        return Value::Str(format!(
            "Over {} levels deep, aborting normalization",
            options.max_depth
        ));
    }

    match value {
        Value::Float(f) if f.is_nan() => Value::from("NaN"),
        Value::Float(f) if f.is_infinite() => {
            Value::from(if f.is_sign_positive() { "INF" } else { "-INF" })
        }
        Value::Seq(items) => {
            let mut normalized: Vec<Value> = items
                .iter()
                .take(options.max_items)
                .map(|item| normalize_at(item, depth + 1, options))
                .collect();

            if items.len() > options.max_items {
                normalized.push(Value::Str(over_items(options.max_items, items.len())));
            }
            Value::Seq(normalized)
        }
        Value::Map(fields) => Value::Map(normalize_map(fields, depth, options)),
        Value::Object { class, fields } => {
            let mut wrapper = Fields::with_capacity(1);
            wrapper.insert(class, normalize_map(fields, depth, options));
            Value::Map(wrapper)
        }
        Value::Time(timestamp) => Value::Str(format_date(timestamp, &options.date_format)),
        other => other.clone(),
    }
}

fn normalize_map(fields: &Fields, depth: usize, options: &NormalizeOptions) -> Fields {
    let mut normalized: Fields = fields
        .iter()
        .take(options.max_items)
        .map(|(key, value)| (key, normalize_at(value, depth + 1, options)))
        .collect();

    if fields.len() > options.max_items {
        normalized.insert("...", over_items(options.max_items, fields.len()));
    }
    normalized
}

/// Formats `timestamp` with a strftime pattern, falling back to RFC 3339 if
/// the pattern can't be parsed.
pub(crate) fn format_date(timestamp: &DateTime<Utc>, format: &str) -> String {
    let mut formatted = String::new();
    match write!(formatted, "{}", timestamp.format(format)) {
        Ok(()) => formatted,
        Err(_) => timestamp.to_rfc3339(),
    }
}

fn over_items(max: usize, total: usize) -> String {
    format!("Over {} items ({} total), aborting normalization", max, total)
}
