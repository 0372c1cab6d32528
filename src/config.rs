//! Configuration values for the [`TableFormatter`].
//!
//! A [`FormatterConfig`] can be built with chained setters, or deserialized
//! with `serde` from whatever format the host application uses. Missing
//! fields take their default values.
//!
//! # Examples
//!
//! ```
//! use tracing_tabular::config::FormatterConfig;
//!
//! let config = FormatterConfig::default()
//!     .format("%level_name%: %message%")
//!     .table_style("borderless")
//!     .include_stacktraces(true);
//!
//! assert!(config.allows_inline_line_breaks());
//! ```
//!
//! [`TableFormatter`]: crate::formatter::TableFormatter
use chrono::format::{Item, StrftimeItems};
use serde::Deserialize;
use thiserror::Error;

/// The default message line template.
pub const DEFAULT_FORMAT: &str = "[%datetime%] %channel%.%level_name%: %message%";

/// The default table style name.
pub const DEFAULT_TABLE_STYLE: &str = "box";

/// The default date pattern, e.g. `2021-03-04T05:06:07+00:00`.
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%:z";

pub const DEFAULT_MAX_NORMALIZE_DEPTH: usize = 9;

pub const DEFAULT_MAX_NORMALIZE_ITEM_COUNT: usize = 1000;

/// Widths of the label, sub-label and value columns.
pub const DEFAULT_COLUMN_WIDTHS: [usize; 3] = [20, 20, 100];

/// Configuration of a [`TableFormatter`].
///
/// [`TableFormatter`]: crate::formatter::TableFormatter
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FormatterConfig {
    /// Template of the message line.
    pub format: String,
    /// Name of the table style.
    pub table_style: String,
    /// `chrono` strftime pattern for dates.
    pub date_format: String,
    pub allow_inline_line_breaks: bool,
    pub include_stacktraces: bool,
    pub max_normalize_depth: usize,
    pub max_normalize_item_count: usize,
    /// Pretty-print values that are rendered as JSON.
    #[serde(alias = "pretty_print_json")]
    pub pretty_print: bool,
    pub column_widths: [usize; 3],
}

impl Default for FormatterConfig {
    fn default() -> Self {
        FormatterConfig {
            format: DEFAULT_FORMAT.to_string(),
            table_style: DEFAULT_TABLE_STYLE.to_string(),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            allow_inline_line_breaks: false,
            include_stacktraces: false,
            max_normalize_depth: DEFAULT_MAX_NORMALIZE_DEPTH,
            max_normalize_item_count: DEFAULT_MAX_NORMALIZE_ITEM_COUNT,
            pretty_print: false,
            column_widths: DEFAULT_COLUMN_WIDTHS,
        }
    }
}

/// Error returned when a [`FormatterConfig`] can't be used.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid date format `{0}`")]
    InvalidDateFormat(String),
    #[error("column {0} has a width of zero")]
    ZeroColumnWidth(usize),
}

impl FormatterConfig {
    /// Sets the message line template.
    ///
    /// Every `%name%` token is replaced by the matching record value, see
    /// [`Template`] for the supported names.
    ///
    /// [`Template`]: crate::formatter::Template
    pub fn format(mut self, format: impl Into<String>) -> Self {
        self.format = format.into();
        self
    }

    /// Sets the table style by name.
    ///
    /// The bundled [`TabledTable`] knows `box`, `box-double`, `default`,
    /// `borderless` and `compact`.
    ///
    /// [`TabledTable`]: crate::table::TabledTable
    pub fn table_style(mut self, style: impl Into<String>) -> Self {
        self.table_style = style.into();
        self
    }

    /// Sets the `chrono` strftime pattern for dates.
    pub fn date_format(mut self, date_format: impl Into<String>) -> Self {
        self.date_format = date_format.into();
        self
    }

    pub fn allow_inline_line_breaks(mut self, allow: bool) -> Self {
        self.allow_inline_line_breaks = allow;
        self
    }

    /// Includes stacktraces in exception sections.
    ///
    /// Enabling this also allows inline line breaks.
    pub fn include_stacktraces(mut self, include: bool) -> Self {
        self.include_stacktraces = include;
        self
    }

    pub fn max_normalize_depth(mut self, depth: usize) -> Self {
        self.max_normalize_depth = depth;
        self
    }

    pub fn max_normalize_item_count(mut self, count: usize) -> Self {
        self.max_normalize_item_count = count;
        self
    }

    /// Pretty-prints values that are rendered as JSON.
    pub fn pretty_print(mut self, pretty: bool) -> Self {
        self.pretty_print = pretty;
        self
    }

    pub fn column_widths(mut self, widths: [usize; 3]) -> Self {
        self.column_widths = widths;
        self
    }

    /// Returns whether values keep their line breaks.
    ///
    /// This is always `true` while stacktraces are included.
    pub fn allows_inline_line_breaks(&self) -> bool {
        self.allow_inline_line_breaks || self.include_stacktraces
    }

    /// Returns the width of the rule written above each record: the sum of
    /// the column widths plus room for borders and padding.
    pub fn total_width(&self) -> usize {
        self.column_widths.iter().sum::<usize>() + 10
    }

    /// Checks the values that can't be checked by their types.
    ///
    /// # Errors
    ///
    /// Returns an error if the date format isn't a valid strftime pattern, or
    /// if a column has a width of zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if StrftimeItems::new(&self.date_format).any(|item| matches!(item, Item::Error)) {
            return Err(ConfigError::InvalidDateFormat(self.date_format.clone()));
        }

        match self.column_widths.iter().position(|width| *width == 0) {
            Some(column) => Err(ConfigError::ZeroColumnWidth(column)),
            None => Ok(()),
        }
    }

    /// Enforces that included stacktraces imply inline line breaks.
    pub(crate) fn normalized(mut self) -> Self {
        self.allow_inline_line_breaks = self.allows_inline_line_breaks();
        self
    }
}
