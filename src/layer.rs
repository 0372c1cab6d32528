//! Format `tracing` events as tables.
//!
//! See [`TableLayer`] for more details.
use crate::fail;
use crate::formatter::TableFormatter;
use crate::record::{Fields, Record, Throwable, Value};
use std::error::Error;
use std::fmt;
use std::io::{self, Write};
use std::sync::{Mutex, PoisonError};
use tracing::field::{Field, Visit};
use tracing::span::{Attributes, Id, Record as SpanRecord};
use tracing::{Event, Metadata, Subscriber};
use tracing_subscriber::fmt::{MakeWriter, TestWriter};
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::registry::LookupSpan;

/// A [`MakeWriter`] that writes to stdout.
///
/// This is functionally the same as using [`std::io::stdout`] as a `MakeWriter`,
/// except it has a named type and can therefore be used in type signatures.
#[derive(Debug)]
pub struct MakeStdout;

impl<'a> MakeWriter<'a> for MakeStdout {
    type Writer = io::Stdout;

    fn make_writer(&self) -> Self::Writer {
        io::stdout()
    }
}

/// A [`Layer`] that renders every event with a [`TableFormatter`].
///
/// Events are converted into [`Record`]s:
/// * the `message` field becomes the message, every other field goes into
///   `context`,
/// * the fields of the enclosing spans go into `extra`, from the root span
///   inwards, so inner spans override outer ones,
/// * the event's target becomes the channel.
///
/// Fields recorded as `&dyn Error` are expanded into their exception chains.
///
/// # Examples
///
/// ```
/// use tracing_subscriber::prelude::*;
/// use tracing_tabular::config::FormatterConfig;
/// use tracing_tabular::formatter::TableFormatter;
/// use tracing_tabular::layer::TableLayer;
///
/// let formatter = TableFormatter::new(FormatterConfig::default()).unwrap();
/// let subscriber = tracing_subscriber::registry().with(TableLayer::new(formatter));
///
/// tracing::subscriber::with_default(subscriber, || {
///     let span = tracing::info_span!("request", request_id = 7);
///     let _guard = span.enter();
///     tracing::info!(user = "ada", "logged in");
/// });
/// ```
pub struct TableLayer<W = MakeStdout> {
    formatter: Mutex<TableFormatter>,
    make_writer: W,
}

impl TableLayer {
    /// Returns a layer that writes to stdout.
    pub fn new(formatter: TableFormatter) -> Self {
        TableLayer {
            formatter: Mutex::new(formatter),
            make_writer: MakeStdout,
        }
    }
}

impl<W> TableLayer<W>
where
    W: 'static + for<'a> MakeWriter<'a>,
{
    /// Set the writer.
    pub fn with_writer<W2>(self, make_writer: W2) -> TableLayer<W2>
    where
        W2: 'static + for<'a> MakeWriter<'a>,
    {
        TableLayer {
            formatter: self.formatter,
            make_writer,
        }
    }

    /// Writes through the test harness, so that output is captured unless
    /// `--nocapture` is passed.
    pub fn with_test_writer(self) -> TableLayer<TestWriter> {
        self.with_writer(TestWriter::default())
    }
}

/// The fields recorded on a span so far.
struct SpanFields(Fields);

struct Visitor {
    message: Option<String>,
    fields: Fields,
    // Callsite of the event or span, stamped onto captured errors.
    file: &'static str,
    line: u32,
}

impl Visitor {
    fn new(metadata: &Metadata<'static>) -> Self {
        Visitor {
            message: None,
            fields: Fields::new(),
            file: metadata.file().unwrap_or_default(),
            line: metadata.line().unwrap_or_default(),
        }
    }

    fn record_value(&mut self, field: &Field, value: Value) {
        self.fields.insert(field.name(), value);
    }
}

impl Visit for Visitor {
    fn record_i64(&mut self, field: &Field, value: i64) {
        self.record_value(field, Value::Int(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.record_value(field, Value::from(value));
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.record_value(field, Value::Float(value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.record_value(field, Value::Bool(value));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        match field.name() {
            "message" if self.message.is_none() => self.message = Some(value.to_string()),
            _ => self.record_value(field, Value::from(value)),
        }
    }

    fn record_error(&mut self, field: &Field, value: &(dyn Error + 'static)) {
        let error = Throwable::from_dyn_error(value).at(self.file, self.line);
        self.record_value(field, Value::Error(error));
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        let value = format!("{:?}", value);
        match field.name() {
            "message" if self.message.is_none() => self.message = Some(value),
            _ => self.record_value(field, Value::Str(value)),
        }
    }
}

impl<W, S> Layer<S> for TableLayer<W>
where
    W: 'static + for<'a> MakeWriter<'a>,
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_new_span(&self, attrs: &Attributes, id: &Id, ctx: Context<S>) {
        let span = ctx.span(id).unwrap_or_else(fail::span_not_in_ctx);

        let mut visitor = Visitor::new(attrs.metadata());
        attrs.record(&mut visitor);
        if let Some(message) = visitor.message {
            visitor.fields.insert("message", message);
        }

        span.extensions_mut().insert(SpanFields(visitor.fields));
    }

    fn on_record(&self, id: &Id, values: &SpanRecord<'_>, ctx: Context<S>) {
        let span = ctx.span(id).unwrap_or_else(fail::span_not_in_ctx);

        let mut visitor = Visitor::new(span.metadata());
        values.record(&mut visitor);
        if let Some(message) = visitor.message {
            visitor.fields.insert("message", message);
        }

        span.extensions_mut()
            .get_mut::<SpanFields>()
            .unwrap_or_else(fail::span_fields_not_in_exts)
            .0
            .extend(visitor.fields);
    }

    fn on_event(&self, event: &Event<'_>, ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let mut visitor = Visitor::new(metadata);
        event.record(&mut visitor);

        let mut extra = Fields::new();
        if let Some(scope) = ctx.event_scope(event) {
            for span in scope.from_root() {
                let extensions = span.extensions();
                let fields = extensions
                    .get::<SpanFields>()
                    .unwrap_or_else(fail::span_fields_not_in_exts);
                extra.extend(fields.0.iter().map(|(key, value)| (key, value.clone())));
            }
        }

        let record = Record::new(*metadata.level(), visitor.message.unwrap_or_default())
            .channel(metadata.target())
            .context_fields(visitor.fields)
            .extra_fields(extra);

        let block = self
            .formatter
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .format(&record)
            .unwrap_or_else(fail::formatting_error);

        // There's nowhere to report a failed write to.
        let _ = self.make_writer.make_writer().write_all(block.as_bytes());
    }
}
