use crate::config::FormatterConfig;
use crate::formatter::throwable::write_chain;
use crate::formatter::{label, Error, LineFormatter, NormalizedRecord, Stringifier, Template};
use crate::normalizer::{self, DefaultNormalizer, NormalizeOptions, Normalizer};
use crate::output::{Buffer, OutputSink};
use crate::record::{Record, Value};
use crate::table::{Row, TableError, TableSink, TabledTable};
use tracing::{debug, trace};

const GENERAL_INFO: &str = "General Info";
const EXTRA: &str = "Extra";
const CONTEXT: &str = "Context";

/// Format records as a message line followed by a table of their metadata.
///
/// Each record is rendered as:
/// * a rule of `=` as wide as the table,
/// * the message line, from the [`Template`] or a [`LineFormatter`],
/// * a blank line,
/// * the table: a "General Info" section with the time and level, then an
///   "Extra" and a "Context" section for the non-empty maps,
/// * a blank line.
///
/// # Examples
///
/// ```
/// use tracing::Level;
/// use tracing_tabular::config::FormatterConfig;
/// use tracing_tabular::formatter::TableFormatter;
/// use tracing_tabular::record::Record;
///
/// let mut formatter = TableFormatter::new(FormatterConfig::default()).unwrap();
/// let record = Record::new(Level::INFO, "user logged in")
///     .channel("auth")
///     .with_context("user_id", 42)
///     .with_extra("ip", "10.0.0.1");
///
/// let block = formatter.format(&record).unwrap();
/// assert!(block.contains("auth.INFO: user logged in"));
/// assert!(block.contains("General Info"));
/// assert!(block.contains("User id"));
/// ```
/// ```log
/// ======================================================================================================================================================
/// [2022-03-24T16:08:17+00:00] auth.INFO: user logged in
///
/// ┌──────────────────────┬──────────────────────┬──────────────────────────────────────────────────────────────────────────────────────────────────────┐
/// │ General Info                                                                                                                                       │
/// │ Time                 │ 2022-03-24T16:08:17+00:00                                                                                                   │
/// │ Level                │ INFO                                                                                                                        │
/// ├──────────────────────┼──────────────────────┼──────────────────────────────────────────────────────────────────────────────────────────────────────┤
/// │ Extra                                                                                                                                              │
/// │ Ip                   │ 10.0.0.1                                                                                                                    │
/// ├──────────────────────┼──────────────────────┼──────────────────────────────────────────────────────────────────────────────────────────────────────┤
/// │ Context                                                                                                                                            │
/// │ User id              │ 42                                                                                                                          │
/// └──────────────────────┴──────────────────────┴──────────────────────────────────────────────────────────────────────────────────────────────────────┘
///
/// ```
///
/// # Sinks
///
/// The table and the output are exclusively owned, and reused for every
/// record. Both are left empty after each call to [`format`], whether it
/// succeeded or not.
///
/// [`format`]: TableFormatter::format
pub struct TableFormatter<T = TabledTable, O = Buffer> {
    config: FormatterConfig,
    template: Template,
    normalizer: Box<dyn Normalizer + Send + Sync>,
    line_formatter: Option<Box<dyn LineFormatter + Send + Sync>>,
    table: T,
    output: O,
}

impl TableFormatter {
    /// Returns a formatter that renders with [`TabledTable`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Create`] if the configuration is invalid, see
    /// [`TableFormatter::with_sinks`].
    pub fn new(config: FormatterConfig) -> Result<Self, Error> {
        TableFormatter::with_sinks(config, TabledTable::new(), Buffer::new())
    }
}

impl<T, O> TableFormatter<T, O>
where
    T: TableSink,
    O: OutputSink,
{
    /// Returns a formatter that describes tables to `table` and writes to
    /// `output`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Create`] if the date format can't be parsed, if a
    /// column width is zero, or if `table` doesn't know the table style.
    pub fn with_sinks(config: FormatterConfig, mut table: T, output: O) -> Result<Self, Error> {
        let config = config.normalized();
        config.validate().map_err(Error::create)?;
        table.set_style(&config.table_style).map_err(Error::create)?;

        debug!(
            style = %config.table_style,
            inline_line_breaks = config.allow_inline_line_breaks,
            stacktraces = config.include_stacktraces,
            "table formatter created"
        );

        Ok(TableFormatter {
            template: Template::new(config.format.as_str()),
            config,
            normalizer: Box::new(DefaultNormalizer),
            line_formatter: None,
            table,
            output,
        })
    }

    /// Replaces the [`DefaultNormalizer`].
    pub fn with_normalizer<N>(mut self, normalizer: N) -> Self
    where
        N: 'static + Normalizer + Send + Sync,
    {
        self.normalizer = Box::new(normalizer);
        self
    }

    /// Renders the message line with `line_formatter` instead of the template.
    pub fn set_line_formatter<F>(&mut self, line_formatter: F) -> &mut Self
    where
        F: 'static + LineFormatter + Send + Sync,
    {
        self.line_formatter = Some(Box::new(line_formatter));
        self
    }

    /// Goes back to rendering the message line with the template.
    pub fn clear_line_formatter(&mut self) -> &mut Self {
        self.line_formatter = None;
        self
    }

    /// Allows values to keep their line breaks.
    ///
    /// Disallowing has no effect while stacktraces are included.
    pub fn allow_inline_line_breaks(&mut self, allow: bool) -> &mut Self {
        self.config.allow_inline_line_breaks = allow || self.config.include_stacktraces;
        trace!(
            inline_line_breaks = self.config.allow_inline_line_breaks,
            "inline line breaks toggled"
        );
        self
    }

    /// Includes a "Trace" row for every throwable.
    ///
    /// Including stacktraces also allows inline line breaks.
    pub fn include_stacktraces(&mut self, include: bool) -> &mut Self {
        self.config.include_stacktraces = include;
        if include {
            self.config.allow_inline_line_breaks = true;
        }
        trace!(stacktraces = include, "stacktraces toggled");
        self
    }

    pub fn config(&self) -> &FormatterConfig {
        &self.config
    }

    /// Renders a single record.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Render`] if the table sink fails to render. Nothing is
    /// returned from a failed call, and the sinks are left empty.
    pub fn format(&mut self, record: &Record) -> Result<String, Error> {
        let stringifier = self.stringifier();
        let normalized = self.normalize(record);

        let line = match &self.line_formatter {
            Some(line_formatter) => line_formatter.format_line(record),
            None => self.template.render(&normalized, &stringifier),
        };

        self.output.write_line(&"=".repeat(self.config.total_width()));
        self.output.write_line(&line);
        self.output.write_line("");

        match self.render_table(&normalized, &stringifier) {
            Ok(table) => {
                self.output.write_line(&table);
                self.output.write_line("");
                Ok(self.output.fetch_and_clear())
            }
            Err(err) => {
                self.output.fetch_and_clear();
                Err(Error::Render(err))
            }
        }
    }

    /// Renders each record in order, concatenating the results.
    ///
    /// # Errors
    ///
    /// Fails on the first record that fails to render.
    pub fn format_batch<'a, I>(&mut self, records: I) -> Result<String, Error>
    where
        I: IntoIterator<Item = &'a Record>,
    {
        records
            .into_iter()
            .try_fold(String::new(), |mut batch, record| {
                batch.push_str(&self.format(record)?);
                Ok(batch)
            })
    }

    fn stringifier(&self) -> Stringifier {
        Stringifier::new(
            self.config.allows_inline_line_breaks(),
            self.config.pretty_print,
        )
    }

    fn normalize<'r>(&self, record: &'r Record) -> NormalizedRecord<'r> {
        let options = NormalizeOptions {
            max_depth: self.config.max_normalize_depth,
            max_items: self.config.max_normalize_item_count,
            date_format: self.config.date_format.clone(),
        };

        NormalizedRecord {
            record,
            datetime: normalizer::format_date(&record.datetime(), &self.config.date_format),
            context: self.normalizer.normalize_fields(record.context(), &options),
            extra: self.normalizer.normalize_fields(record.extra(), &options),
        }
    }

    fn render_table(
        &mut self,
        record: &NormalizedRecord<'_>,
        stringifier: &Stringifier,
    ) -> Result<String, TableError> {
        let widths = self.config.column_widths;
        let include_stacktraces = self.config.include_stacktraces;
        let table = &mut self.table;

        table.set_style(&self.config.table_style)?;
        table.set_column_max_widths(&widths);
        table.set_column_widths(&widths);
        table.set_rows(Vec::new());

        table.add_row(Row::header(GENERAL_INFO));
        table.add_row(Row::cells(["Time", record.datetime.as_str()]));
        table.add_row(Row::cells(["Level", record.record.level_name()]));

        for (title, fields) in [(EXTRA, &record.extra), (CONTEXT, &record.context)] {
            if fields.is_empty() {
                continue;
            }

            table.add_row(Row::Separator);
            table.add_row(Row::header(title));

            for (key, value) in fields.iter() {
                match value {
                    Value::Error(throwable) => write_chain(
                        table,
                        &label(key),
                        throwable,
                        stringifier,
                        include_stacktraces,
                    ),
                    value => write_facts(table, &label(key), value, stringifier),
                }
            }
        }

        let rendered = table.render();
        table.set_rows(Vec::new());
        rendered
    }
}

/// Writes the rows for one key. Sequences get one row per item, with the
/// label only on the first.
///
/// The label is capitalized like any other, so `four => ["abc", "xyz"]`
/// renders `["Four", "abc"]` then `["", "xyz"]`.
fn write_facts<T: TableSink + ?Sized>(
    table: &mut T,
    label: &str,
    value: &Value,
    stringifier: &Stringifier,
) {
    match value {
        Value::Seq(items) if !items.is_empty() => {
            for (index, item) in items.iter().enumerate() {
                let key = if index == 0 { label } else { "" };
                table.add_row(Row::cells([key.to_string(), stringifier.cell(item)]));
            }
        }
        Value::Str(text) => {
            table.add_row(Row::cells([label.to_string(), stringifier.cell_text(text)]));
        }
        value => {
            table.add_row(Row::cells([label.to_string(), stringifier.cell(value)]));
        }
    }
}
