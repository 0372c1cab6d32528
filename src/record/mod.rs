//! Types describing a single structured log record.
//!
//! A [`Record`] is what the [`TableFormatter`] consumes: a timestamp, a level,
//! a channel, a message, and two free-form [`Fields`] maps, `context` and
//! `extra`. Values in those maps are [`Value`]s, which may carry whole
//! exception chains in the form of [`Throwable`]s.
//!
//! [`TableFormatter`]: crate::formatter::TableFormatter
use chrono::{DateTime, Utc};
use tracing::Level;

mod fields;
pub use fields::Fields;

mod value;
pub use value::Value;

mod throwable;
pub use throwable::{Chain, Throwable};

mod ser;

/// The channel assigned to records built with [`Record::new`].
pub const DEFAULT_CHANNEL: &str = "app";

/// One structured log entry.
///
/// # Examples
///
/// ```
/// use tracing::Level;
/// use tracing_tabular::record::Record;
///
/// let record = Record::new(Level::INFO, "user logged in")
///     .channel("auth")
///     .with_context("user_id", 42)
///     .with_extra("request_id", "4f1c");
///
/// assert_eq!(record.channel_name(), "auth");
/// assert_eq!(record.context().len(), 1);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Record {
    pub(crate) datetime: DateTime<Utc>,
    pub(crate) channel: String,
    pub(crate) level: Level,
    pub(crate) message: String,
    pub(crate) context: Fields,
    pub(crate) extra: Fields,
}

impl Record {
    /// Returns a new record timestamped with the current time, on the
    /// [`DEFAULT_CHANNEL`], with empty `context` and `extra`.
    pub fn new(level: Level, message: impl Into<String>) -> Self {
        Record {
            datetime: Utc::now(),
            channel: DEFAULT_CHANNEL.to_string(),
            level,
            message: message.into(),
            context: Fields::new(),
            extra: Fields::new(),
        }
    }

    /// Sets the channel.
    pub fn channel(mut self, channel: impl Into<String>) -> Self {
        self.channel = channel.into();
        self
    }

    /// Sets the timestamp.
    pub fn at(mut self, datetime: DateTime<Utc>) -> Self {
        self.datetime = datetime;
        self
    }

    /// Adds a key-value pair to the `context` map.
    pub fn with_context(mut self, key: impl ToString, value: impl Into<Value>) -> Self {
        self.context.insert(key, value);
        self
    }

    /// Adds a key-value pair to the `extra` map.
    pub fn with_extra(mut self, key: impl ToString, value: impl Into<Value>) -> Self {
        self.extra.insert(key, value);
        self
    }

    /// Replaces the whole `context` map.
    pub fn context_fields(mut self, context: Fields) -> Self {
        self.context = context;
        self
    }

    /// Replaces the whole `extra` map.
    pub fn extra_fields(mut self, extra: Fields) -> Self {
        self.extra = extra;
        self
    }

    /// Returns the time the record was created at.
    pub fn datetime(&self) -> DateTime<Utc> {
        self.datetime
    }

    pub fn channel_name(&self) -> &str {
        &self.channel
    }

    /// Returns the records [`Level`].
    pub fn level(&self) -> Level {
        self.level
    }

    /// Returns the display name of the records level, e.g. `"INFO"`.
    pub fn level_name(&self) -> &'static str {
        self.level.as_str()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn context(&self) -> &Fields {
        &self.context
    }

    pub fn extra(&self) -> &Fields {
        &self.extra
    }
}
