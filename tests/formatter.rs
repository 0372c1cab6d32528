mod common;

use chrono::{DateTime, TimeZone, Utc};
use common::RecordingTable;
use rand::Rng;
use tracing::Level;
use tracing_tabular::config::{ConfigError, FormatterConfig};
use tracing_tabular::fields;
use tracing_tabular::formatter::{CreateError, Error, TableFormatter, MAX_VALUE_LENGTH};
use tracing_tabular::normalizer::NormalizeOptions;
use tracing_tabular::output::Buffer;
use tracing_tabular::record::{Fields, Record, Throwable, Value};
use tracing_tabular::table::TableError;

type Rows = Vec<Option<Vec<String>>>;

fn recording(
    config: FormatterConfig,
) -> Result<(TableFormatter<RecordingTable>, RecordingTable), Error> {
    let table = RecordingTable::new();
    let formatter = TableFormatter::with_sinks(config, table.clone(), Buffer::new())?;
    Ok((formatter, table))
}

fn noon() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2022, 3, 24, 12, 0, 0).unwrap()
}

fn row(cells: &[&str]) -> Option<Vec<String>> {
    Some(cells.iter().map(|cell| cell.to_string()).collect())
}

fn general_info(level: &str) -> Rows {
    vec![
        row(&["General Info"]),
        row(&["Time", "2022-03-24T12:00:00+00:00"]),
        row(&["Level", level]),
    ]
}

#[test]
fn empty_record() -> Result<(), Box<dyn std::error::Error>> {
    let (mut formatter, table) = recording(FormatterConfig::default())?;
    let record = Record::new(Level::INFO, "test message").at(noon());

    let block = formatter.format(&record)?;

    assert_eq!(table.table(0), general_info("INFO"));
    assert_eq!(
        block,
        format!(
            "{}\n[2022-03-24T12:00:00+00:00] app.INFO: test message\n\n\
             General Info\nTime | 2022-03-24T12:00:00+00:00\nLevel | INFO\n\n",
            "=".repeat(150)
        )
    );

    let recorded = table.recorded();
    assert_eq!(recorded.styles.last().map(String::as_str), Some("box"));
    assert_eq!(recorded.widths.last(), Some(&vec![20, 20, 100]));
    assert_eq!(recorded.max_widths.last(), Some(&vec![20, 20, 100]));
    assert!(recorded.pending.is_empty());

    Ok(())
}

#[test]
fn sections_come_in_order() -> Result<(), Box<dyn std::error::Error>> {
    let (mut formatter, table) = recording(FormatterConfig::default())?;
    let record = Record::new(Level::WARN, "m")
        .at(noon())
        .with_context("user_id", 42)
        .with_extra("request_id", "4f1c");

    formatter.format(&record)?;

    let mut expected = general_info("WARN");
    expected.extend([
        None,
        row(&["Extra"]),
        row(&["Request id", "4f1c"]),
        None,
        row(&["Context"]),
        row(&["User id", "42"]),
    ]);
    assert_eq!(table.table(0), expected);

    Ok(())
}

#[test]
fn empty_sections_are_skipped() -> Result<(), Box<dyn std::error::Error>> {
    let (mut formatter, table) = recording(FormatterConfig::default())?;
    formatter.format(&Record::new(Level::INFO, "m").at(noon()).with_context("a", 1))?;

    let mut expected = general_info("INFO");
    expected.extend([None, row(&["Context"]), row(&["A", "1"])]);
    assert_eq!(table.table(0), expected);

    Ok(())
}

#[test]
fn flat_context_round_trips() -> Result<(), Box<dyn std::error::Error>> {
    let (mut formatter, table) = recording(FormatterConfig::default())?;
    let record = Record::new(Level::INFO, "m").at(noon()).context_fields(fields! {
        "user_id" => 42,
        "ip" => "10.0.0.1",
        "ratio" => 0.5,
        "admin" => true,
        "locked" => false,
        "parent" => Value::Null,
        " padded_key_ " => "x",
        0 => "zero",
    });

    formatter.format(&record)?;

    let rows = table.table(0);
    assert_eq!(
        rows[5..].to_vec(),
        vec![
            row(&["User id", "42"]),
            row(&["Ip", "10.0.0.1"]),
            row(&["Ratio", "0.5"]),
            row(&["Admin", "true"]),
            row(&["Locked", "false"]),
            row(&["Parent", "null"]),
            row(&["Padded key", "x"]),
            row(&["0", "zero"]),
        ]
    );

    Ok(())
}

#[test]
fn nested_values_become_json() -> Result<(), Box<dyn std::error::Error>> {
    let (mut formatter, table) = recording(FormatterConfig::default())?;
    let record = Record::new(Level::INFO, "m")
        .at(noon())
        .with_context("user", Value::object("User", fields! { "name" => "ada" }))
        .with_context("path", fields! { "dir" => "/tmp/é" })
        .with_context("since", noon());

    formatter.format(&record)?;

    assert_eq!(
        table.table(0)[5..].to_vec(),
        vec![
            row(&["User", r#"{"User":{"name":"ada"}}"#]),
            row(&["Path", r#"{"dir":"/tmp/é"}"#]),
            row(&["Since", "2022-03-24T12:00:00+00:00"]),
        ]
    );

    Ok(())
}

#[test]
fn normalization_is_bounded() -> Result<(), Box<dyn std::error::Error>> {
    let config = FormatterConfig::default()
        .max_normalize_depth(2)
        .max_normalize_item_count(2);
    let (mut formatter, table) = recording(config)?;
    let record = Record::new(Level::INFO, "m")
        .at(noon())
        .with_context("deep", fields! { "a" => fields! { "b" => 1 } })
        .with_extra("wide", fields! { "a" => 1, "b" => 2, "c" => 3 });

    formatter.format(&record)?;

    let rows = table.table(0);
    assert_eq!(
        rows[5],
        row(&[
            "Wide",
            r#"{"a":1,"b":2,"...":"Over 2 items (3 total), aborting normalization"}"#
        ])
    );
    assert_eq!(
        rows[8],
        row(&[
            "Deep",
            r#"{"a":{"b":"Over 2 levels deep, aborting normalization"}}"#
        ])
    );

    Ok(())
}

#[test]
fn long_sections_are_cut() -> Result<(), Box<dyn std::error::Error>> {
    let (mut formatter, table) =
        recording(FormatterConfig::default().max_normalize_item_count(2))?;
    let context: Fields = (0..5).map(|i| (format!("k{}", i), i)).collect();
    let record = Record::new(Level::INFO, "m")
        .at(noon())
        .context_fields(context);

    formatter.format(&record)?;

    let mut expected = general_info("INFO");
    expected.extend([
        None,
        row(&["Context"]),
        row(&["K0", "0"]),
        row(&["K1", "1"]),
        row(&["...", "Over 2 items (5 total), aborting normalization"]),
    ]);
    assert_eq!(table.table(0), expected);

    Ok(())
}

#[test]
fn custom_normalizer_is_used() -> Result<(), Box<dyn std::error::Error>> {
    let (formatter, table) = recording(FormatterConfig::default())?;
    let mut formatter = formatter.with_normalizer(|value: &Value, _: &NormalizeOptions| match value {
        Value::Str(_) => Value::from("***"),
        other => other.clone(),
    });

    formatter.format(&Record::new(Level::INFO, "m").at(noon()).with_context("password", "hunter2"))?;

    assert_eq!(table.table(0)[5], row(&["Password", "***"]));

    Ok(())
}

#[test]
fn long_values_are_truncated() -> Result<(), Box<dyn std::error::Error>> {
    let (mut formatter, table) = recording(FormatterConfig::default())?;
    let mut rng = rand::thread_rng();

    let mut lengths = vec![0, 999, 1000, 1001, 5000];
    lengths.extend((0..20).map(|_| rng.gen_range(0..3000)));

    for (index, len) in lengths.into_iter().enumerate() {
        let value: String = (0..len)
            .map(|_| if rng.gen_bool(0.5) { 'é' } else { 'x' })
            .collect();

        formatter.format(&Record::new(Level::INFO, "m").with_context("v", value.as_str()))?;

        let rows = table.table(index);
        let cell = &rows[5].as_ref().ok_or("missing row")?[1];
        assert_eq!(cell.chars().count(), len.min(MAX_VALUE_LENGTH));
        assert!(value.starts_with(cell.as_str()));
    }

    Ok(())
}

#[test]
fn line_breaks_follow_the_policy() -> Result<(), Box<dyn std::error::Error>> {
    let record = Record::new(Level::INFO, "first\nsecond")
        .at(noon())
        .with_context("text", "a\r\nb\rc\nd")
        .with_context("map", fields! { "text" => "x\ny" });

    let (mut single_line, table) = recording(FormatterConfig::default())?;
    let block = single_line.format(&record)?;
    assert!(block.contains("app.INFO: first second\n"));
    assert_eq!(
        table.table(0)[5..].to_vec(),
        vec![
            row(&["Text", "a b c d"]),
            row(&["Map", r#"{"text":"x\ny"}"#]),
        ]
    );

    let (mut multi_line, table) =
        recording(FormatterConfig::default().allow_inline_line_breaks(true))?;
    let block = multi_line.format(&record)?;
    assert!(block.contains("app.INFO: first\nsecond\n"));
    assert_eq!(
        table.table(0)[5..].to_vec(),
        vec![
            row(&["Text", "a\r\nb\rc\nd"]),
            row(&["Map", "{\"text\":\"x\ny\"}"]),
        ]
    );

    Ok(())
}

#[test]
fn sequences_get_one_row_per_item() -> Result<(), Box<dyn std::error::Error>> {
    let (mut formatter, table) = recording(FormatterConfig::default())?;
    let record = Record::new(Level::INFO, "m")
        .at(noon())
        .with_context("four", vec!["abc", "xyz"])
        .with_context("nested", vec![vec![1, 2], vec![3]])
        .with_context("none", Vec::<i32>::new());

    formatter.format(&record)?;

    assert_eq!(
        table.table(0)[5..].to_vec(),
        vec![
            row(&["Four", "abc"]),
            row(&["", "xyz"]),
            row(&["Nested", "[1,2]"]),
            row(&["", "[3]"]),
            row(&["None", "[]"]),
        ]
    );

    Ok(())
}

fn three_deep() -> Throwable {
    Throwable::new("HttpError", "request failed")
        .with_code(502)
        .at("src/http.rs", 10)
        .with_trace("#0 http\n#1 main")
        .caused_by(Throwable::new("IoError", "connection reset").at("src/io.rs", 20))
        .caused_by(Throwable::new("OsError", "broken pipe").with_code(32))
}

#[test]
fn exception_chains_are_expanded() -> Result<(), Box<dyn std::error::Error>> {
    let (mut formatter, table) = recording(FormatterConfig::default())?;
    let record = Record::new(Level::ERROR, "m")
        .at(noon())
        .with_context("exception", three_deep());

    formatter.format(&record)?;

    let mut expected = general_info("ERROR");
    expected.extend([
        None,
        row(&["Context"]),
        row(&["Exception", "Throwable", "502"]),
        row(&["", "File", "src/http.rs"]),
        row(&["", "Line", "10"]),
        row(&["", "Message", "request failed"]),
        row(&["", "Type", "HttpError"]),
        None,
        row(&["", "previous Throwable", "0"]),
        row(&["", "File", "src/io.rs"]),
        row(&["", "Line", "20"]),
        row(&["", "Message", "connection reset"]),
        row(&["", "Type", "IoError"]),
        None,
        row(&["", "previous Throwable", "32"]),
        row(&["", "File", ""]),
        row(&["", "Line", "0"]),
        row(&["", "Message", "broken pipe"]),
        row(&["", "Type", "OsError"]),
    ]);
    assert_eq!(table.table(0), expected);

    Ok(())
}

#[test]
fn stacktraces_add_trace_rows() -> Result<(), Box<dyn std::error::Error>> {
    let (mut formatter, table) = recording(FormatterConfig::default())?;
    formatter.include_stacktraces(true);

    formatter.format(&Record::new(Level::ERROR, "m").with_extra("error", three_deep()))?;

    let rows = table.table(0);
    let traces: Vec<_> = rows
        .iter()
        .flatten()
        .filter(|cells| cells.get(1).map(String::as_str) == Some("Trace"))
        .map(|cells| cells[2].as_str())
        .collect();
    assert_eq!(traces, ["#0 http\n#1 main", "", ""]);
    assert_eq!(rows[5], row(&["Error", "Throwable", "502"]));

    Ok(())
}

#[test]
fn errors_from_std_are_captured() -> Result<(), Box<dyn std::error::Error>> {
    let (mut formatter, table) = recording(FormatterConfig::default())?;
    let error = "x".parse::<u8>().map_err(|err| Throwable::from_error(&err)).err();

    formatter.format(&Record::new(Level::ERROR, "m").with_context("cause", error))?;

    let rows = table.table(0);
    let message = rows
        .iter()
        .flatten()
        .find(|cells| cells.get(1).map(String::as_str) == Some("Message"));
    assert_eq!(
        message.map(|cells| cells[2].as_str()),
        Some("invalid digit found in string")
    );

    Ok(())
}

#[test]
fn toggles_are_idempotent() -> Result<(), Box<dyn std::error::Error>> {
    let mut formatter = TableFormatter::new(FormatterConfig::default())?;

    formatter.include_stacktraces(true);
    let once = formatter.config().clone();
    formatter.include_stacktraces(true);
    assert_eq!(formatter.config(), &once);
    assert!(once.allow_inline_line_breaks);

    formatter.allow_inline_line_breaks(false);
    assert!(formatter.config().allow_inline_line_breaks);

    formatter.include_stacktraces(false).allow_inline_line_breaks(false);
    assert!(!formatter.config().allow_inline_line_breaks);
    formatter.allow_inline_line_breaks(false);
    assert!(!formatter.config().allow_inline_line_breaks);

    let stacktraces = TableFormatter::new(FormatterConfig::default().include_stacktraces(true))?;
    assert!(stacktraces.config().allow_inline_line_breaks);

    Ok(())
}

#[test]
fn batches_concatenate() -> Result<(), Box<dyn std::error::Error>> {
    let records = [
        Record::new(Level::INFO, "one").at(noon()).with_context("a", 1),
        Record::new(Level::WARN, "two").at(noon()).with_extra("b", 2),
        Record::new(Level::ERROR, "three").at(noon()).with_context("c", three_deep()),
    ];

    let (mut batch, table) = recording(FormatterConfig::default())?;
    let joined = batch.format_batch(&records)?;

    let (mut single, _) = recording(FormatterConfig::default())?;
    let mut expected = String::new();
    for record in &records {
        expected.push_str(&single.format(record)?);
    }

    assert_eq!(joined, expected);
    assert_eq!(table.recorded().tables.len(), 3);
    assert!(table.recorded().pending.is_empty());
    assert_eq!(batch.format_batch(std::iter::empty())?, "");

    Ok(())
}

#[test]
fn templates_leave_unknown_placeholders() -> Result<(), Box<dyn std::error::Error>> {
    let config = FormatterConfig::default()
        .format("%level_name% %message% %context.user% %extra.nope% %foo% 100%");
    let (mut formatter, _) = recording(config)?;

    let block = formatter.format(&Record::new(Level::DEBUG, "m").with_context("user", "ada"))?;

    assert_eq!(
        block.lines().nth(1),
        Some("DEBUG m ada %extra.nope% %foo% 100%")
    );

    Ok(())
}

#[test]
fn empty_template_renders_empty_line() -> Result<(), Box<dyn std::error::Error>> {
    let (mut formatter, _) = recording(FormatterConfig::default().format(""))?;
    let block = formatter.format(&Record::new(Level::INFO, "m"))?;

    let lines: Vec<_> = block.lines().collect();
    assert_eq!(lines[1], "");
    assert_eq!(lines[2], "");
    assert_eq!(lines[3], "General Info");

    Ok(())
}

#[test]
fn line_formatter_replaces_the_template() -> Result<(), Box<dyn std::error::Error>> {
    let (mut formatter, _) = recording(FormatterConfig::default())?;
    let record = Record::new(Level::INFO, "m").channel("db");

    formatter.set_line_formatter(|record: &Record| format!(">> {}", record.channel_name()));
    assert_eq!(formatter.format(&record)?.lines().nth(1), Some(">> db"));

    formatter.clear_line_formatter();
    assert!(formatter.format(&record)?.lines().nth(1).unwrap_or("").ends_with("db.INFO: m"));

    Ok(())
}

#[test]
fn invalid_configs_fail_creation() {
    let bad_style = TableFormatter::new(FormatterConfig::default().table_style("fancy"));
    assert!(matches!(
        bad_style,
        Err(Error::Create {
            source: CreateError::Table(TableError::UnknownStyle(ref style))
        }) if style == "fancy"
    ));

    let bad_date = TableFormatter::new(FormatterConfig::default().date_format("%Y-%"));
    assert!(matches!(
        bad_date,
        Err(Error::Create {
            source: CreateError::Config(ConfigError::InvalidDateFormat(_))
        })
    ));

    let zero_width = TableFormatter::new(FormatterConfig::default().column_widths([20, 0, 100]));
    match zero_width {
        Err(err) => {
            assert_eq!(err.to_string(), "could not create formatter");
            let source = std::error::Error::source(&err).map(ToString::to_string);
            assert_eq!(source.as_deref(), Some("column 1 has a width of zero"));
        }
        Ok(_) => panic!("a zero column width was accepted"),
    }
}

#[test]
fn render_failures_propagate() {
    let table = RecordingTable::failing();
    let mut formatter = TableFormatter::with_sinks(FormatterConfig::default(), table.clone(), Buffer::new())
        .expect("valid config");

    let result = formatter.format(&Record::new(Level::INFO, "m").with_context("a", 1));

    assert!(matches!(result, Err(Error::Render(TableError::Render(_)))));
    assert!(table.recorded().pending.is_empty());
    assert!(table.recorded().tables.is_empty());
}
