//! Field-by-field interactive entry on a terminal.

use std::io::{self, BufRead, Write};

use medi_cardio::form::{self, FORM_FIELDS};
use medi_cardio::PatientRecord;

/// Ask for every form field in column order, starting from `record`.
///
/// An empty line keeps the value shown in parentheses; an invalid entry is
/// explained and asked again.
pub fn prompt_record(
    input: &mut dyn BufRead,
    output: &mut dyn Write,
    mut record: PatientRecord,
) -> io::Result<PatientRecord> {
    writeln!(output, "{}", form::TITLE)?;
    writeln!(output, "{}", form::SUBTITLE)?;
    writeln!(output)?;
    for spec in &FORM_FIELDS {
        loop {
            write!(
                output,
                "{} [{}] ({}): ",
                spec.label,
                spec.domain(),
                record.display_value(spec.feature)
            )?;
            output.flush()?;

            let mut line = String::new();
            if input.read_line(&mut line)? == 0 {
                return Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    format!("input ended before '{}' was entered", spec.feature),
                ));
            }
            let text = line.trim();
            if text.is_empty() {
                break;
            }
            match form::apply_input(&mut record, spec.feature, text) {
                Ok(()) => break,
                Err(e) => writeln!(output, "  {e}")?,
            }
        }
    }
    Ok(record)
}
