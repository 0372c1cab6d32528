#![allow(dead_code)]

use std::io;
use std::sync::{Arc, Mutex, PoisonError};
use tracing_subscriber::fmt::MakeWriter;
use tracing_tabular::table::{Row, TableError, TableSink};

/// Everything a [`RecordingTable`] was told, shared with the test.
#[derive(Debug, Default)]
pub struct Recorded {
    pub styles: Vec<String>,
    pub max_widths: Vec<Vec<usize>>,
    pub widths: Vec<Vec<usize>>,
    /// The rows of every rendered table, in order.
    pub tables: Vec<Vec<Row>>,
    /// The rows left in the sink after the last call.
    pub pending: Vec<Row>,
}

/// A [`TableSink`] that remembers its rows instead of drawing them.
///
/// It renders each row on its own line, with cells joined by `" | "` and
/// separators written as `"---"`.
#[derive(Clone, Default)]
pub struct RecordingTable {
    recorded: Arc<Mutex<Recorded>>,
    fail_render: bool,
}

impl RecordingTable {
    pub fn new() -> Self {
        RecordingTable::default()
    }

    /// A table whose rendering always fails.
    pub fn failing() -> Self {
        RecordingTable {
            fail_render: true,
            ..RecordingTable::default()
        }
    }

    pub fn recorded(&self) -> std::sync::MutexGuard<'_, Recorded> {
        self.recorded.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the rows of the `index`th rendered table as cell vectors,
    /// with separators as `None`.
    pub fn table(&self, index: usize) -> Vec<Option<Vec<String>>> {
        self.recorded().tables[index]
            .iter()
            .map(|row| row.as_cells().map(<[String]>::to_vec))
            .collect()
    }
}

impl TableSink for RecordingTable {
    fn set_style(&mut self, name: &str) -> Result<(), TableError> {
        match name {
            "box" | "compact" => {
                self.recorded().styles.push(name.to_string());
                Ok(())
            }
            other => Err(TableError::UnknownStyle(other.to_string())),
        }
    }

    fn set_column_max_widths(&mut self, widths: &[usize]) {
        self.recorded().max_widths.push(widths.to_vec());
    }

    fn set_column_widths(&mut self, widths: &[usize]) {
        self.recorded().widths.push(widths.to_vec());
    }

    fn set_rows(&mut self, rows: Vec<Row>) {
        self.recorded().pending = rows;
    }

    fn add_row(&mut self, row: Row) {
        self.recorded().pending.push(row);
    }

    fn render(&mut self) -> Result<String, TableError> {
        if self.fail_render {
            return Err(TableError::Render("out of ink".to_string()));
        }

        let mut recorded = self.recorded();
        let rows = recorded.pending.clone();
        let rendered = rows
            .iter()
            .map(|row| match row {
                Row::Cells(cells) => cells.join(" | "),
                Row::Separator => "---".to_string(),
            })
            .collect::<Vec<_>>()
            .join("\n");
        recorded.tables.push(rows);

        Ok(rendered)
    }
}

/// A [`MakeWriter`] collecting everything written into memory.
#[derive(Clone, Default)]
pub struct MemoryWriter {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl MemoryWriter {
    pub fn contents(&self) -> String {
        let buf = self.buf.lock().unwrap_or_else(PoisonError::into_inner);
        String::from_utf8_lossy(&buf).into_owned()
    }
}

impl io::Write for MemoryWriter {
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        self.buf
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(bytes);
        Ok(bytes.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for MemoryWriter {
    type Writer = MemoryWriter;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
