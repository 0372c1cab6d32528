//! The tabular rendering interface used by the [`TableFormatter`].
//!
//! The formatter never draws borders itself. It describes the table row by
//! row to a [`TableSink`], and asks the sink to render it. The crate ships
//! [`TabledTable`], which renders through the [`tabled`] crate.
//!
//! [`TableFormatter`]: crate::formatter::TableFormatter
use thiserror::Error;

mod render;
pub use render::TabledTable;

/// One row of a table.
///
/// A row with fewer cells than the table has columns lets its last cell span
/// the remaining columns, so a single-cell row spans the whole table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Row {
    Cells(Vec<String>),
    /// A horizontal rule between the rows before and after it.
    Separator,
}

impl Row {
    /// Returns a row with a single cell spanning the whole table.
    pub fn header(title: impl Into<String>) -> Self {
        Row::Cells(vec![title.into()])
    }

    pub fn cells<I>(cells: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        Row::Cells(cells.into_iter().map(Into::into).collect())
    }

    /// Returns the cells of the row, or `None` for a separator.
    pub fn as_cells(&self) -> Option<&[String]> {
        match self {
            Row::Cells(cells) => Some(cells),
            Row::Separator => None,
        }
    }
}

/// Error returned by a [`TableSink`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TableError {
    #[error("unknown table style `{0}`")]
    UnknownStyle(String),
    #[error("expected {expected} column widths, found {found}")]
    ColumnCount { expected: usize, found: usize },
    #[error("rendering the table failed: {0}")]
    Render(String),
}

/// A type that collects rows and renders them as a table.
///
/// A sink is reused across records: the [`TableFormatter`] resets its style,
/// widths and rows before describing each record, and clears the rows again
/// after rendering.
///
/// [`TableFormatter`]: crate::formatter::TableFormatter
pub trait TableSink {
    /// Selects a style by name.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::UnknownStyle`] if the sink doesn't know `name`.
    fn set_style(&mut self, name: &str) -> Result<(), TableError>;

    /// Sets the width each column wraps its content at.
    fn set_column_max_widths(&mut self, widths: &[usize]);

    /// Sets the width each column is padded to.
    fn set_column_widths(&mut self, widths: &[usize]);

    /// Replaces all rows.
    fn set_rows(&mut self, rows: Vec<Row>);

    fn add_row(&mut self, row: Row);

    /// Renders the current rows.
    ///
    /// # Errors
    ///
    /// Returns an error if the table can't be laid out.
    fn render(&mut self) -> Result<String, TableError>;
}

impl<T: TableSink + ?Sized> TableSink for Box<T> {
    fn set_style(&mut self, name: &str) -> Result<(), TableError> {
        (**self).set_style(name)
    }

    fn set_column_max_widths(&mut self, widths: &[usize]) {
        (**self).set_column_max_widths(widths)
    }

    fn set_column_widths(&mut self, widths: &[usize]) {
        (**self).set_column_widths(widths)
    }

    fn set_rows(&mut self, rows: Vec<Row>) {
        (**self).set_rows(rows)
    }

    fn add_row(&mut self, row: Row) {
        (**self).add_row(row)
    }

    fn render(&mut self) -> Result<String, TableError> {
        (**self).render()
    }
}
