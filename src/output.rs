//! Where the [`TableFormatter`] writes a record before handing it back.
//!
//! [`TableFormatter`]: crate::formatter::TableFormatter

/// A line-oriented buffer that is drained once per record.
pub trait OutputSink {
    /// Appends `text` followed by a line break.
    fn write_line(&mut self, text: &str);

    /// Returns everything written since the last call, leaving the sink empty.
    fn fetch_and_clear(&mut self) -> String;
}

/// An [`OutputSink`] backed by a `String`.
#[derive(Clone, Debug, Default)]
pub struct Buffer {
    buf: String,
}

impl Buffer {
    pub fn new() -> Self {
        Buffer {
            buf: String::with_capacity(1024),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }
}

impl OutputSink for Buffer {
    fn write_line(&mut self, text: &str) {
        self.buf.push_str(text);
        self.buf.push('\n');
    }

    fn fetch_and_clear(&mut self) -> String {
        let capacity = self.buf.capacity();
        std::mem::replace(&mut self.buf, String::with_capacity(capacity))
    }
}

impl<T: OutputSink + ?Sized> OutputSink for Box<T> {
    fn write_line(&mut self, text: &str) {
        (**self).write_line(text)
    }

    fn fetch_and_clear(&mut self) -> String {
        (**self).fetch_and_clear()
    }
}
