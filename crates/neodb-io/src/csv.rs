//! Minimal CSV reading and field escaping
//!
//! Handles double-quoted fields with `""` escapes, quoted newlines and CRLF
//! line endings. Nothing else (no custom delimiters, no comments).

use crate::error::ExtractError;

/// Split `input` into records of fields
///
/// Blank lines are skipped. A line holding only `""` is a record with one
/// empty field.
pub(crate) fn parse_records(input: &str) -> Result<Vec<Vec<String>>, ExtractError> {
    let mut records = Vec::new();
    let mut record = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut quoted = false;
    let mut line = 1;
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => in_quotes = false,
                '\n' => {
                    line += 1;
                    field.push(c);
                }
                _ => field.push(c),
            }
            continue;
        }

        match c {
            '"' if field.is_empty() => {
                in_quotes = true;
                quoted = true;
            }
            ',' => {
                record.push(std::mem::take(&mut field));
                quoted = false;
            }
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' => {
                finish_record(&mut records, &mut record, &mut field, quoted);
                quoted = false;
                line += 1;
            }
            _ => field.push(c),
        }
    }

    if in_quotes {
        return Err(ExtractError::MalformedCsv {
            line,
            reason: "unterminated quoted field".into(),
        });
    }
    finish_record(&mut records, &mut record, &mut field, quoted);

    Ok(records)
}

fn finish_record(
    records: &mut Vec<Vec<String>>,
    record: &mut Vec<String>,
    field: &mut String,
    quoted: bool,
) {
    if record.is_empty() && field.is_empty() && !quoted {
        return;
    }
    record.push(std::mem::take(field));
    records.push(std::mem::take(record));
}

/// Quote a field if it contains a delimiter, quote or newline
pub(crate) fn escape_field(value: &str) -> std::borrow::Cow<'_, str> {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\"")).into()
    } else {
        value.into()
    }
}
