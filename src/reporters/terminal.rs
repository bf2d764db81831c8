use comfy_table::{presets::NOTHING, Attribute, Cell, CellAlignment, ContentArrangement, Table};
use std::io::Write;

use crate::error::Result;
use crate::reporters::Reporter;
use crate::types::FameEntry;

/// Aligned plain-text columns. With `styled` the header is bold.
///
/// comfy-table would otherwise decide styling from the process's stdout,
/// not from the writer it is given, so the caller makes that choice.
pub struct TabularReporter {
    pub styled: bool,
}

impl Reporter for TabularReporter {
    fn write(&self, entries: &[FameEntry], out: &mut dyn Write) -> Result<()> {
        let mut table = Table::new();
        if self.styled {
            table.enforce_styling();
        } else {
            table.force_no_tty();
        }
        table
            .load_preset(NOTHING)
            .set_content_arrangement(ContentArrangement::Disabled)
            .set_header(vec![
                Cell::new("Name").add_attribute(Attribute::Bold),
                Cell::new("Lines").add_attribute(Attribute::Bold),
                Cell::new("Commits").add_attribute(Attribute::Bold),
                Cell::new("Files").add_attribute(Attribute::Bold),
            ]);

        for e in entries {
            table.add_row(vec![
                Cell::new(&e.name),
                number_cell(e.lines),
                number_cell(e.commits),
                number_cell(e.files),
            ]);
        }

        // cell padding leaves trailing blanks after the last column
        for line in table.lines().filter(|l| !l.trim().is_empty()) {
            writeln!(out, "{}", line.trim_end())?;
        }
        out.flush()?;
        Ok(())
    }
}

fn number_cell(n: usize) -> Cell {
    Cell::new(n).set_alignment(CellAlignment::Right)
}
