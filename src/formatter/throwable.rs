use crate::formatter::Stringifier;
use crate::record::Throwable;
use crate::table::{Row, TableSink};

const FIRST: &str = "Throwable";
const PREVIOUS: &str = "previous Throwable";

/// Writes one group of rows per throwable in the chain, outermost first.
///
/// Rows have three cells: the key label (only on the very first row), the
/// field label, and the value. Groups are separated from each other.
pub(crate) fn write_chain<T: TableSink + ?Sized>(
    table: &mut T,
    label: &str,
    throwable: &Throwable,
    stringifier: &Stringifier,
    include_stacktraces: bool,
) {
    for (index, link) in throwable.chain().enumerate() {
        let (key, title) = match index {
            0 => (label, FIRST),
            _ => {
                table.add_row(Row::Separator);
                ("", PREVIOUS)
            }
        };

        table.add_row(Row::cells([
            key.to_string(),
            title.to_string(),
            link.code().to_string(),
        ]));
        write_field(table, "File", stringifier.cell_text(link.file()));
        write_field(table, "Line", link.line().to_string());
        write_field(table, "Message", stringifier.cell_text(link.message()));
        if include_stacktraces {
            write_field(table, "Trace", stringifier.cell_text(link.trace()));
        }
        write_field(table, "Type", stringifier.cell_text(link.kind()));
    }
}

fn write_field<T: TableSink + ?Sized>(table: &mut T, name: &str, value: String) {
    table.add_row(Row::cells([String::new(), name.to_string(), value]));
}
