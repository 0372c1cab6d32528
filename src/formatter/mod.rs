//! Render [`Record`]s into a message line and a metadata table.
//!
//! See [`TableFormatter`] for more details.
use crate::record::{Fields, Record, Value};

mod error;
pub use error::{CreateError, Error};

mod stringify;
pub use stringify::{label, truncate, Stringifier, MAX_VALUE_LENGTH};

mod template;
pub use template::Template;

mod throwable;

mod table;
pub use table::TableFormatter;

/// Format the message line of a [`Record`].
///
/// By default, the [`TableFormatter`] renders the message line from its
/// [`Template`]. A `LineFormatter` replaces that logic entirely.
///
/// # Examples
///
/// This trait is implemented for all `Fn(&Record) -> String` types.
/// ```
/// use tracing_tabular::config::FormatterConfig;
/// use tracing_tabular::formatter::TableFormatter;
/// use tracing_tabular::record::Record;
///
/// let mut formatter = TableFormatter::new(FormatterConfig::default()).unwrap();
/// formatter.set_line_formatter(|record: &Record| {
///     format!("{} | {}", record.level_name(), record.message())
/// });
///
/// let block = formatter
///     .format(&Record::new(tracing::Level::WARN, "disk almost full"))
///     .unwrap();
/// assert!(block.contains("WARN | disk almost full"));
/// ```
pub trait LineFormatter {
    /// Renders the message line. The line shouldn't contain a trailing line
    /// break.
    fn format_line(&self, record: &Record) -> String;
}

impl<F> LineFormatter for F
where
    F: Fn(&Record) -> String,
{
    #[inline]
    fn format_line(&self, record: &Record) -> String {
        self(record)
    }
}

/// A [`Record`] whose `context` and `extra` went through the normalizer.
#[derive(Clone, Debug)]
pub struct NormalizedRecord<'a> {
    pub record: &'a Record,
    /// The timestamp, in the configured date format.
    pub datetime: String,
    pub context: Fields,
    pub extra: Fields,
}

impl NormalizedRecord<'_> {
    /// Looks up a value by placeholder name.
    ///
    /// Supported names are `message`, `channel`, `level_name`, `datetime`,
    /// `context`, `extra`, and the dotted paths `context.<key>` and
    /// `extra.<key>`.
    pub fn lookup(&self, name: &str) -> Option<Value> {
        let value = match name {
            "message" => Value::from(self.record.message()),
            "channel" => Value::from(self.record.channel_name()),
            "level_name" => Value::from(self.record.level_name()),
            "datetime" => Value::from(self.datetime.as_str()),
            "context" => Value::Map(self.context.clone()),
            "extra" => Value::Map(self.extra.clone()),
            path => {
                let (map, key) = path.split_once('.')?;
                let fields = match map {
                    "context" => &self.context,
                    "extra" => &self.extra,
                    _ => return None,
                };
                fields.get(key)?.clone()
            }
        };

        Some(value)
    }
}
