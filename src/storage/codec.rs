//! Conversion between raw table lines and [`Table`] values.
//!
//! ```text
//! fields<TAB>id,name,status
//! 1<TAB>Alice<TAB>active
//! 2<TAB>Bob<TAB>closed
//! ```

use tracing::warn;

use crate::{
    common::error::{Result, StoreError},
    db::table::{FIELDS_MARKER, Header, Row, Table},
    storage::line_store::{is_blank, trim_line},
};

/// How many data rows [`decode`] produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RowLimit {
    #[default]
    All,
    /// Stop after the header line.
    HeaderOnly,
    /// Stop once this many data rows have been decoded.
    AtMost(usize),
}

impl RowLimit {
    fn reached(self, rows: usize) -> bool {
        match self {
            Self::All => false,
            Self::HeaderOnly => true,
            Self::AtMost(max) => rows >= max,
        }
    }
}

/// Parses the header line `fields<TAB>a,b,c`.
///
/// `fields` with nothing after the marker yields an empty header.
pub fn decode_header(line: &str) -> Result<Header> {
    let line = trim_line(line);
    let (marker, rest) = line.split_once('\t').unwrap_or((line, ""));

    if marker != FIELDS_MARKER {
        return Err(StoreError::Format(format!(
            "first line must start with `{FIELDS_MARKER}`, found {line:?}"
        )));
    }

    if rest.is_empty() {
        return Ok(Header::default());
    }

    Header::new(rest.split(','))
}

/// Zips one data line positionally against the header.
fn decode_row(header: &Header, line: &str, line_no: usize) -> Result<Row> {
    let values: Vec<&str> = trim_line(line).split('\t').collect();

    if values.len() < header.len() {
        return Err(StoreError::Format(format!(
            "line {line_no}: expected {} values, found {}",
            header.len(),
            values.len()
        )));
    }
    if values.len() > header.len() {
        warn!(
            line = line_no,
            extra = values.len() - header.len(),
            "ignoring values beyond the declared fields"
        );
    }

    Ok(Row::from_pairs(
        header.fields().iter().map(String::as_str).zip(values),
    ))
}

/// Decodes table lines into a header plus rows.
///
/// Blank lines are skipped and never counted. The first non-blank line must
/// be the header.
pub fn decode<I, S>(lines: I, limit: RowLimit) -> Result<Table>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut lines = lines
        .into_iter()
        .enumerate()
        .filter(|(_, line)| !is_blank(line.as_ref()));

    let Some((_, first)) = lines.next() else {
        return Err(StoreError::Format("missing header line".to_string()));
    };
    let header = decode_header(first.as_ref())?;

    let mut rows = Vec::new();
    for (idx, line) in lines {
        if limit.reached(rows.len()) {
            break;
        }
        rows.push(decode_row(&header, line.as_ref(), idx + 1)?);
    }

    Ok(Table::new(header, rows))
}

/// Encodes one row's values in header order, tab-joined.
///
/// A field the row lacks is written as an empty value.
pub fn encode_row(header: &Header, row: &Row) -> String {
    header
        .fields()
        .iter()
        .map(|field| row.get(field).unwrap_or_default())
        .collect::<Vec<_>>()
        .join("\t")
}

/// Encodes a row like [`encode_row`], failing when the line would read
/// back as blank and so be dropped.
pub fn encode_row_checked(header: &Header, row: &Row) -> Result<String> {
    let line = encode_row(header, row);
    if is_blank(&line) {
        return Err(StoreError::Format(
            "row has only empty or whitespace values".to_string(),
        ));
    }
    Ok(line)
}

/// Encodes a header and rows, newline-joined, without a trailing newline.
pub fn encode_parts(header: &Header, rows: &[Row]) -> String {
    std::iter::once(header.to_line())
        .chain(rows.iter().map(|row| encode_row(header, row)))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn encode(table: &Table) -> String {
    encode_parts(&table.header, &table.rows)
}

/// Fails when a value would break the positional line format.
pub fn check_value(value: &str) -> Result<()> {
    if value.contains(['\t', '\n', '\r']) {
        return Err(StoreError::Format(format!(
            "value {value:?} contains a tab or line break"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn users() -> Table {
        let header = Header::new(["id", "name", "status"]).unwrap();
        let rows = vec![
            Row::from_pairs([("id", "1"), ("name", "Alice"), ("status", "active")]),
            Row::from_pairs([("id", "2"), ("name", "Bob"), ("status", "closed")]),
        ];
        Table::new(header, rows)
    }

    #[test]
    fn test_encode_format() {
        assert_eq!(
            encode(&users()),
            "fields\tid,name,status\n1\tAlice\tactive\n2\tBob\tclosed"
        );
    }

    #[test]
    fn test_round_trip() {
        let table = users();
        let text = encode(&table);
        assert_eq!(decode(text.lines(), RowLimit::All).unwrap(), table);
    }

    #[test]
    fn test_round_trip_with_empty_values() {
        let header = Header::new(["a", "b", "c"]).unwrap();
        let table = Table::new(header, vec![Row::from_pairs([("a", "x"), ("b", ""), ("c", "")])]);

        let text = encode(&table);
        assert_eq!(decode(text.lines(), RowLimit::All).unwrap(), table);
    }

    #[test]
    fn test_blank_lines_skipped() {
        let lines = ["", "fields\tid", "   ", "1", "", "2"];
        let table = decode(lines, RowLimit::All).unwrap();

        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[1].get("id"), Some("2"));
    }

    #[test]
    fn test_row_limits() {
        let lines = ["fields\tid", "1", "2", "3"];

        assert_eq!(decode(lines, RowLimit::HeaderOnly).unwrap().rows.len(), 0);
        assert_eq!(decode(lines, RowLimit::AtMost(2)).unwrap().rows.len(), 2);
        assert_eq!(decode(lines, RowLimit::All).unwrap().rows.len(), 3);
    }

    #[test]
    fn test_missing_header() {
        let result = decode(Vec::<String>::new(), RowLimit::All);
        assert!(matches!(result, Err(StoreError::Format(_))));

        let result = decode(["  ", ""], RowLimit::All);
        assert!(matches!(result, Err(StoreError::Format(_))));
    }

    #[test]
    fn test_malformed_header() {
        let result = decode(["id,name", "1\tAlice"], RowLimit::All);
        assert!(matches!(result, Err(StoreError::Format(_))));
    }

    #[test]
    fn test_empty_header() {
        let table = decode(["fields\t"], RowLimit::All).unwrap();
        assert!(table.header.is_empty());

        let table = decode(["fields"], RowLimit::All).unwrap();
        assert!(table.header.is_empty());
    }

    #[test]
    fn test_short_row_is_format_error() {
        let result = decode(["fields\tid,name,status", "1\tAlice"], RowLimit::All);
        let Err(StoreError::Format(msg)) = result else {
            panic!("expected format error");
        };
        assert!(msg.contains("line 2"));
    }

    #[test]
    fn test_extra_values_ignored() {
        let table = decode(["fields\tid", "1\textra"], RowLimit::All).unwrap();
        assert_eq!(table.rows[0].iter().collect::<Vec<_>>(), vec![("id", "1")]);
    }

    #[test]
    fn test_blank_row_rejected() {
        let header = Header::new(["a", "b", "c"]).unwrap();

        let blank = Row::from_pairs([("a", ""), ("b", " "), ("c", "")]);
        assert!(matches!(
            encode_row_checked(&header, &blank),
            Err(StoreError::Format(_))
        ));

        let sparse = Row::from_pairs([("a", ""), ("b", "x"), ("c", "")]);
        assert_eq!(encode_row_checked(&header, &sparse).unwrap(), "\tx\t");
    }

    #[test]
    fn test_check_value() {
        assert!(check_value("plain value").is_ok());
        assert!(check_value("a\tb").is_err());
        assert!(check_value("a\nb").is_err());
    }
}
