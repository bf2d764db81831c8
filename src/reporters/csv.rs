use std::io::Write;

use crate::error::Result;
use crate::reporters::Reporter;
use crate::types::FameEntry;

pub struct CsvReporter;

impl Reporter for CsvReporter {
    fn write(&self, entries: &[FameEntry], out: &mut dyn Write) -> Result<()> {
        writeln!(out, "Name,Lines,Commits,Files")?;
        for e in entries {
            writeln!(out, "{},{},{},{}", escape(&e.name), e.lines, e.commits, e.files)?;
        }
        out.flush()?;
        Ok(())
    }
}

/// Quotes a field when it holds a separator, a quote or a line break.
fn escape(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
