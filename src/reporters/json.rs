use std::io::Write;

use crate::error::Result;
use crate::reporters::Reporter;
use crate::types::FameEntry;

/// A single JSON array.
pub struct JsonReporter;

impl Reporter for JsonReporter {
    fn write(&self, entries: &[FameEntry], out: &mut dyn Write) -> Result<()> {
        serde_json::to_writer(&mut *out, entries).map_err(std::io::Error::from)?;
        out.write_all(b"\n")?;
        out.flush()?;
        Ok(())
    }
}

/// One JSON object per line.
pub struct JsonLinesReporter;

impl Reporter for JsonLinesReporter {
    fn write(&self, entries: &[FameEntry], out: &mut dyn Write) -> Result<()> {
        for entry in entries {
            serde_json::to_writer(&mut *out, entry).map_err(std::io::Error::from)?;
            out.write_all(b"\n")?;
        }
        out.flush()?;
        Ok(())
    }
}
