use crate::table::{Row, TableError, TableSink};
use std::str::FromStr;
use tabled::builder::Builder;
use tabled::grid::config::HorizontalLine;
use tabled::settings::object::Cell;
use tabled::settings::themes::Theme;
use tabled::settings::{Span, Style, Width};

/// Border styles known to [`TabledTable`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum BoxStyle {
    /// `┌─┬─┐` single line box drawing.
    Box,
    /// `╔═╦═╗` double line box drawing.
    BoxDouble,
    /// `+-+-+` ASCII borders.
    Default,
    /// No borders, sections separated by `=` rules.
    Borderless,
    /// No borders and no rules.
    Compact,
}

impl FromStr for BoxStyle {
    type Err = TableError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "box" => Ok(BoxStyle::Box),
            "box-double" => Ok(BoxStyle::BoxDouble),
            "default" => Ok(BoxStyle::Default),
            "borderless" => Ok(BoxStyle::Borderless),
            "compact" => Ok(BoxStyle::Compact),
            other => Err(TableError::UnknownStyle(other.to_string())),
        }
    }
}

impl BoxStyle {
    fn theme(self) -> Theme {
        match self {
            BoxStyle::Box => Theme::from_style(Style::modern().remove_horizontal()),
            BoxStyle::BoxDouble => Theme::from_style(Style::extended().remove_horizontal()),
            BoxStyle::Default => Theme::from_style(Style::ascii().remove_horizontal()),
            BoxStyle::Borderless => Theme::from_style(Style::blank()),
            BoxStyle::Compact => Theme::from_style(Style::empty()),
        }
    }

    fn separator(self) -> Option<HorizontalLine<char>> {
        let (main, intersection, left, right) = match self {
            BoxStyle::Box => ('─', '┼', Some('├'), Some('┤')),
            BoxStyle::BoxDouble => ('═', '╬', Some('╠'), Some('╣')),
            BoxStyle::Default => ('-', '+', Some('+'), Some('+')),
            BoxStyle::Borderless => ('=', ' ', None, None),
            BoxStyle::Compact => return None,
        };

        Some(HorizontalLine::new(Some(main), Some(intersection), left, right))
    }
}

/// A [`TableSink`] that renders with [`tabled`].
///
/// Single-cell rows span the whole table; the last cell of a shorter row
/// spans the columns left over. Cells containing line breaks are rendered
/// across several physical lines, leaving the other cells of the row blank
/// below their first line.
///
/// # Examples
///
/// ```
/// use tracing_tabular::table::{Row, TableSink, TabledTable};
///
/// let mut table = TabledTable::new();
/// table.set_style("default").unwrap();
/// table.add_row(Row::header("General Info"));
/// table.add_row(Row::cells(["Level", "INFO"]));
///
/// let rendered = table.render().unwrap();
/// assert!(rendered.contains("General Info"));
/// assert!(rendered.starts_with('+'));
/// ```
#[derive(Clone, Debug)]
pub struct TabledTable {
    style: BoxStyle,
    max_widths: Vec<usize>,
    widths: Vec<usize>,
    rows: Vec<Row>,
}

impl TabledTable {
    /// Returns an empty table in the `box` style.
    pub fn new() -> Self {
        TabledTable {
            style: BoxStyle::Box,
            max_widths: Vec::new(),
            widths: Vec::new(),
            rows: Vec::new(),
        }
    }

    fn columns(&self) -> usize {
        self.rows
            .iter()
            .filter_map(Row::as_cells)
            .map(|cells| cells.len().max(1))
            .chain([self.max_widths.len(), self.widths.len()])
            .max()
            .unwrap_or(0)
    }

    fn check_widths(widths: &[usize], columns: usize) -> Result<(), TableError> {
        if widths.is_empty() || widths.len() == columns {
            Ok(())
        } else {
            Err(TableError::ColumnCount {
                expected: columns,
                found: widths.len(),
            })
        }
    }
}

impl Default for TabledTable {
    fn default() -> Self {
        TabledTable::new()
    }
}

impl TableSink for TabledTable {
    fn set_style(&mut self, name: &str) -> Result<(), TableError> {
        self.style = name.parse()?;
        Ok(())
    }

    fn set_column_max_widths(&mut self, widths: &[usize]) {
        self.max_widths = widths.to_vec();
    }

    fn set_column_widths(&mut self, widths: &[usize]) {
        self.widths = widths.to_vec();
    }

    fn set_rows(&mut self, rows: Vec<Row>) {
        self.rows = rows;
    }

    fn add_row(&mut self, row: Row) {
        self.rows.push(row);
    }

    fn render(&mut self) -> Result<String, TableError> {
        let columns = self.columns();
        Self::check_widths(&self.max_widths, columns)?;
        Self::check_widths(&self.widths, columns)?;

        if columns == 0 {
            return Ok(String::new());
        }

        let mut builder = Builder::default();
        let mut placed = Vec::new();
        let mut separators = Vec::new();
        let mut records = 0;

        for row in self.rows.iter() {
            match row {
                Row::Separator => separators.push(records),
                Row::Cells(cells) => {
                    if cells.len() > columns {
                        return Err(TableError::Render(format!(
                            "row {} has {} cells, the table has {} columns",
                            records,
                            cells.len(),
                            columns
                        )));
                    }

                    let mut record = cells.clone();
                    if record.is_empty() {
                        record.push(String::new());
                    }
                    let last = record.len() - 1;
                    for column in 0..last {
                        placed.push((records, column, 1));
                    }
                    placed.push((records, last, columns - last));
                    record.resize(columns, String::new());

                    builder.push_record(record);
                    records += 1;
                }
            }
        }

        if records == 0 {
            return Ok(String::new());
        }

        let mut table = builder.build();

        let mut theme = self.style.theme();
        for index in separators {
            // Rules before the first or after the last row would replace
            // the outer border.
            if index == 0 || index >= records {
                continue;
            }
            if let Some(line) = self.style.separator() {
                theme.insert_horizontal_line(index, line);
            }
        }
        table.with(theme);

        for (row, column, span) in placed {
            if span > 1 {
                table.modify(Cell::new(row, column), Span::column(span as _));
            }
            if let Some(width) = spanned_width(&self.max_widths, column, span) {
                table.modify(Cell::new(row, column), Width::wrap(width));
            }
            if let Some(width) = spanned_width(&self.widths, column, span) {
                table.modify(Cell::new(row, column), Width::increase(width));
            }
        }

        Ok(table.to_string())
    }
}

/// The width available to a cell starting at `column` and spanning `span`
/// columns, including the padding and borders it swallows.
fn spanned_width(widths: &[usize], column: usize, span: usize) -> Option<usize> {
    if widths.is_empty() {
        return None;
    }
    let covered: usize = widths.iter().skip(column).take(span).sum();
    Some(covered + 3 * (span - 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(style: &str) -> TabledTable {
        let mut table = TabledTable::new();
        table.set_style(style).unwrap();
        table.set_column_max_widths(&[10, 10, 30]);
        table.set_column_widths(&[10, 10, 30]);
        table
    }

    #[test]
    fn unknown_style_is_rejected() {
        let mut table = TabledTable::new();
        assert_eq!(
            table.set_style("fancy"),
            Err(TableError::UnknownStyle("fancy".to_string()))
        );
    }

    #[test]
    fn separators_become_rules() {
        let mut table = table("default");
        table.add_row(Row::header("General Info"));
        table.add_row(Row::cells(["Level", "INFO"]));
        table.add_row(Row::Separator);
        table.add_row(Row::header("Context"));
        table.add_row(Row::cells(["App", "x"]));

        let rendered = table.render().unwrap();
        let rules = rendered.lines().filter(|line| line.starts_with('+')).count();

        // top border, the separator, bottom border
        assert_eq!(rules, 3);
        assert!(rendered.contains("General Info"));
        assert!(rendered.contains("Context"));
    }

    #[test]
    fn multi_line_cells_span_several_lines() {
        let mut table = table("compact");
        table.add_row(Row::cells(["Note", "first\nsecond"]));

        let rendered = table.render().unwrap();
        let lines: Vec<_> = rendered
            .lines()
            .filter(|line| !line.trim().is_empty())
            .collect();

        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("Note") && lines[0].contains("first"));
        assert!(!lines[1].contains("Note") && lines[1].contains("second"));
    }

    #[test]
    fn mismatched_widths_fail_to_render() {
        let mut table = TabledTable::new();
        table.set_column_max_widths(&[10, 10]);
        table.add_row(Row::cells(["a", "b", "c"]));

        assert_eq!(
            table.render(),
            Err(TableError::ColumnCount {
                expected: 3,
                found: 2
            })
        );
    }

    #[test]
    fn spanned_cells_wrap_at_their_full_width() {
        let mut table = table("compact");
        table.add_row(Row::cells(["Time", "2021-03-04T05:06:07+00:00"]));

        let rendered = table.render().unwrap();
        assert!(rendered.contains("2021-03-04T05:06:07+00:00"));
        assert_eq!(spanned_width(&[10, 10, 30], 1, 2), Some(43));
        assert_eq!(spanned_width(&[], 0, 3), None);
    }

    #[test]
    fn empty_table_renders_nothing() {
        assert_eq!(table("box").render(), Ok(String::new()));
    }
}
