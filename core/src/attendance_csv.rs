//! CSV exchange format for the attendance ledger.
//!
//! Layout: `Student,Attendance(Last<N>),PresentCount,Note`, every field
//! double-quoted, attendance as `P`/`A` tokens joined by `|`, oldest day
//! first. Import matches rows by student name; the `PresentCount` column is
//! informational and ignored on the way back in.

use csv::{QuoteStyle, ReaderBuilder, Terminator, Trim, WriterBuilder};

use crate::error::{LedgerError, LedgerResult};
use crate::model::ledger::{decode_token, encode_token, LedgerEntry};

pub const COLUMN_COUNT: usize = 4;
const TOKEN_SEPARATOR: &str = "|";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvRow {
    pub name: String,
    pub records: Vec<bool>,
    pub note: String,
}

pub fn header(window_days: usize) -> [String; COLUMN_COUNT] {
    [
        "Student".to_string(),
        format!("Attendance(Last{})", window_days),
        "PresentCount".to_string(),
        "Note".to_string(),
    ]
}

pub fn encode_records(records: &[bool]) -> String {
    records
        .iter()
        .map(|r| encode_token(*r))
        .collect::<Vec<_>>()
        .join(TOKEN_SEPARATOR)
}

pub fn decode_records(field: &str) -> Vec<bool> {
    field.split(TOKEN_SEPARATOR).map(decode_token).collect()
}

pub fn encode<'a, I>(window_days: usize, entries: I) -> LedgerResult<String>
where
    I: IntoIterator<Item = (&'a str, &'a LedgerEntry)>,
{
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(header(window_days)).map_err(format_error)?;
    for (name, entry) in entries {
        writer
            .write_record([
                name,
                encode_records(&entry.records).as_str(),
                entry.present_count().to_string().as_str(),
                entry.note.as_str(),
            ])
            .map_err(format_error)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| LedgerError::Format(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| LedgerError::Format(e.to_string()))
}

/// Parses the whole text up front; any structural problem fails the lot.
pub fn decode(text: &str) -> LedgerResult<Vec<CsvRow>> {
    check_quoting(text)?;

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::None)
        .from_reader(text.as_bytes());

    let columns = reader.headers().map_err(format_error)?.len();
    if columns != COLUMN_COUNT {
        return Err(LedgerError::Format(format!(
            "expected {} header columns, found {}",
            COLUMN_COUNT, columns
        )));
    }

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(format_error)?;
        if record.iter().all(|field| field.trim().is_empty()) {
            continue;
        }
        rows.push(CsvRow {
            name: record.get(0).unwrap_or_default().to_string(),
            records: decode_records(record.get(1).unwrap_or_default()),
            note: record.get(3).unwrap_or_default().to_string(),
        });
    }
    Ok(rows)
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum FieldState {
    Start,
    Unquoted,
    Quoted,
    Closed,
}

/// Rows never span lines, so every quoted field must close on its own line
/// and be followed by a separator or the line end. A `"` inside an unquoted
/// field is literal.
fn check_quoting(text: &str) -> LedgerResult<()> {
    for (index, line) in text.lines().enumerate() {
        if !line_quoting_ok(line) {
            return Err(LedgerError::Format(format!(
                "broken quoting on line {}",
                index + 1
            )));
        }
    }
    Ok(())
}

fn line_quoting_ok(line: &str) -> bool {
    let mut state = FieldState::Start;
    let mut chars = line.chars().peekable();
    while let Some(c) = chars.next() {
        state = match (state, c) {
            (FieldState::Quoted, '"') if chars.peek() == Some(&'"') => {
                chars.next();
                FieldState::Quoted
            },
            (FieldState::Quoted, '"') => FieldState::Closed,
            (FieldState::Quoted, _) => FieldState::Quoted,
            (_, ',') => FieldState::Start,
            (FieldState::Start, '"') => FieldState::Quoted,
            (FieldState::Closed, _) => return false,
            _ => FieldState::Unquoted,
        };
    }
    state != FieldState::Quoted
}

fn format_error(err: csv::Error) -> LedgerError {
    LedgerError::Format(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_quotes_every_field() {
        let entry = LedgerEntry {
            records: vec![true, false, true],
            note: "said \"hi\", left".to_string(),
        };
        let text = encode(3, [("Ayaan Khan", &entry)]).unwrap();
        assert_eq!(
            text,
            "\"Student\",\"Attendance(Last3)\",\"PresentCount\",\"Note\"\n\
             \"Ayaan Khan\",\"P|A|P\",\"2\",\"said \"\"hi\"\", left\"\n"
        );
    }

    #[test]
    fn test_decode_handles_quoted_commas_and_doubled_quotes() {
        let text = "Student,Attendance(Last3),PresentCount,Note\n\
                    \"Khan, Ayaan\",\"P|a|p\",\"2\",\"said \"\"hi\"\", left\"\n";
        let rows = decode(text).unwrap();
        assert_eq!(
            rows,
            vec![CsvRow {
                name: "Khan, Ayaan".to_string(),
                records: vec![true, false, true],
                note: "said \"hi\", left".to_string(),
            }]
        );
    }

    #[test]
    fn test_decode_missing_note_and_blank_lines() {
        let text = "Student,Attendance(Last2),PresentCount,Note\r\n\r\nZara Malik,P|P\r\n   \r\n";
        let rows = decode(text).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].note, "");
        assert_eq!(rows[0].records, vec![true, true]);
    }

    #[test]
    fn test_decode_rejects_bad_header() {
        let err = decode("Student,Attendance\n\"A\",\"P\"\n").unwrap_err();
        assert!(matches!(err, LedgerError::Format(_)));

        assert!(matches!(decode("").unwrap_err(), LedgerError::Format(_)));
    }

    #[test]
    fn test_decode_rejects_text_after_closing_quote() {
        let text = "Student,Attendance(Last1),PresentCount,Note\n\"Ayaan Khan,\"P\",1,\n";
        assert!(matches!(decode(text).unwrap_err(), LedgerError::Format(_)));
    }

    #[test]
    fn test_decode_rejects_unclosed_quote_with_even_quote_count() {
        let text = "Student,Attendance(Last1),PresentCount,Note\n\
                    Zara Malik,A,0,ok\n\
                    \"Ayaan Khan,A,0,x\n\
                    Liam Patel,A,0,\n\
                    Noah Williams,A,0,brought 5\" ruler\n";
        assert_eq!(text.matches('"').count() % 2, 0);
        assert!(matches!(decode(text).unwrap_err(), LedgerError::Format(_)));

        let at_end = "Student,Attendance(Last1),PresentCount,Note\n\"Ayaan Khan,A,0,x";
        assert!(matches!(decode(at_end).unwrap_err(), LedgerError::Format(_)));
    }

    #[test]
    fn test_decode_keeps_literal_quote_in_unquoted_field() {
        let text = "Student,Attendance(Last1),PresentCount,Note\n\
                    Noah Williams,P,1,brought 5\" ruler\n";
        let rows = decode(text).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].note, "brought 5\" ruler");
    }
}
