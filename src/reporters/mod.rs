pub mod csv;
pub mod json;
pub mod terminal;

use std::io::Write;
use std::str::FromStr;

use crate::error::{FameError, Result};
use crate::types::FameEntry;

/// Renders ranked rows. Rows arrive already ordered; reporters keep that order.
pub trait Reporter {
    fn write(&self, entries: &[FameEntry], out: &mut dyn Write) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Tabular,
    Csv,
    Json,
    JsonLines,
}

impl OutputFormat {
    /// `styled` only affects the tabular format: bold header via ANSI codes.
    pub fn reporter(self, styled: bool) -> Box<dyn Reporter> {
        match self {
            OutputFormat::Tabular   => Box::new(terminal::TabularReporter { styled }),
            OutputFormat::Csv       => Box::new(csv::CsvReporter),
            OutputFormat::Json      => Box::new(json::JsonReporter),
            OutputFormat::JsonLines => Box::new(json::JsonLinesReporter),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = FameError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "tabular"    => Ok(OutputFormat::Tabular),
            "csv"        => Ok(OutputFormat::Csv),
            "json"       => Ok(OutputFormat::Json),
            "json-lines" => Ok(OutputFormat::JsonLines),
            other        => Err(FameError::UnsupportedFormat(other.to_string())),
        }
    }
}

#[cfg(test)]
pub(crate) fn render(format: OutputFormat, entries: &[FameEntry]) -> String {
    let mut buf = Vec::new();
    format.reporter(false).write(entries, &mut buf).expect("writing to a Vec cannot fail");
    String::from_utf8(buf).expect("reporters emit UTF-8")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_names() {
        assert_eq!("tabular".parse::<OutputFormat>().unwrap(), OutputFormat::Tabular);
        assert_eq!("csv".parse::<OutputFormat>().unwrap(), OutputFormat::Csv);
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("json-lines".parse::<OutputFormat>().unwrap(), OutputFormat::JsonLines);
        let err = "html".parse::<OutputFormat>().unwrap_err();
        assert!(err.is_configuration());
        assert!(err.to_string().contains("json-lines"));
    }
}
