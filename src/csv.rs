// src/csv.rs
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt, mem::take};
use tracing::{debug, warn};

/// Field separator used when splitting sheet lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Delimiter {
    /// Published Google Sheets exports are always comma separated.
    #[default]
    Comma,
    Tab,
    Semicolon,
    /// Pick whichever candidate shows up most often in the header line.
    Auto,
}

impl Delimiter {
    const CANDIDATES: [char; 3] = [',', '\t', ';'];

    /// Resolve to a concrete separator, sniffing `header` for `Auto`.
    pub fn resolve(self, header: &str) -> char {
        match self {
            Delimiter::Comma => ',',
            Delimiter::Tab => '\t',
            Delimiter::Semicolon => ';',
            Delimiter::Auto => detect_delimiter(header),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CsvOptions {
    pub delimiter: Delimiter,
}

/// One parsed data line, keyed by the trimmed header names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    fields: BTreeMap<String, String>,
}

impl Row {
    /// Raw value for `header`, `None` if the sheet has no such column.
    pub fn get(&self, header: &str) -> Option<&str> {
        self.fields.get(header).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl FromIterator<(String, String)> for Row {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

/// A data line dropped because its field count disagreed with the header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapeAnomaly {
    /// 1-based line number in the source text.
    pub line: usize,
    pub expected: usize,
    pub found: usize,
    pub content: String,
}

impl fmt::Display for ShapeAnomaly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "line {}: expected {} fields, found {}: {:?}",
            self.line, self.expected, self.found, self.content
        )
    }
}

/// Result of tokenizing one sheet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedSheet {
    pub headers: Vec<String>,
    pub rows: Vec<Row>,
    pub anomalies: Vec<ShapeAnomaly>,
}

/// Parse comma-separated sheet text.
pub fn parse(text: &str) -> ParsedSheet {
    parse_with(text, CsvOptions::default())
}

/// Parse sheet text into header-keyed rows.
///
/// - the first line is the header, every later non-blank line is data
/// - `\n` and `\r\n` line endings are both accepted
/// - rows whose field count differs from the header are skipped and
///   reported in [`ParsedSheet::anomalies`]
/// - unbalanced quotes are tolerated; whatever was accumulated is kept
pub fn parse_with(text: &str, options: CsvOptions) -> ParsedSheet {
    let mut lines = text.split('\n').map(|l| l.trim_end_matches('\r'));

    let header_line = match lines.next() {
        Some(line) if !line.trim().is_empty() => line,
        _ => {
            debug!("empty sheet text, nothing to parse");
            return ParsedSheet::default();
        }
    };

    let sep = options.delimiter.resolve(header_line);
    let headers = split_fields(strip_line(header_line, sep), sep);
    let mut sheet = ParsedSheet {
        headers,
        ..Default::default()
    };

    for (idx, line) in lines.enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let line = strip_line(line, sep);
        // header is line 1, so the first data line is line 2
        let line_no = idx + 2;
        let values = split_fields(line, sep);

        if values.len() != sheet.headers.len() {
            warn!(
                line = line_no,
                expected = sheet.headers.len(),
                found = values.len(),
                content = line,
                "skipping line with mismatched field count"
            );
            sheet.anomalies.push(ShapeAnomaly {
                line: line_no,
                expected: sheet.headers.len(),
                found: values.len(),
                content: line.to_string(),
            });
            continue;
        }

        sheet
            .rows
            .push(sheet.headers.iter().cloned().zip(values).collect());
    }

    debug!(
        headers = sheet.headers.len(),
        rows = sheet.rows.len(),
        skipped = sheet.anomalies.len(),
        "parsed sheet"
    );
    sheet
}

/// Trim surrounding whitespace except `sep` itself, which may be a tab.
fn strip_line(line: &str, sep: char) -> &str {
    line.trim_matches(|c: char| c.is_whitespace() && c != sep)
}

/// Split one line on `sep`, honouring double quotes and `""` escapes.
/// Every field is trimmed.
fn split_fields(line: &str, sep: char) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' => {
                if in_quotes && chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = !in_quotes;
                }
            }
            c if c == sep && !in_quotes => {
                fields.push(take(&mut field).trim().to_string());
            }
            _ => field.push(ch),
        }
    }
    fields.push(field.trim().to_string());

    fields
}

fn detect_delimiter(header: &str) -> char {
    let mut counts = [0usize; Delimiter::CANDIDATES.len()];
    let mut in_quotes = false;

    for ch in header.chars() {
        if ch == '"' {
            in_quotes = !in_quotes;
        } else if !in_quotes {
            if let Some(i) = Delimiter::CANDIDATES.iter().position(|&c| c == ch) {
                counts[i] += 1;
            }
        }
    }

    // first maximum wins, so comma takes ties
    let mut best = 0;
    for i in 1..counts.len() {
        if counts[i] > counts[best] {
            best = i;
        }
    }
    Delimiter::CANDIDATES[best]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, &str)]) -> Row {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn quoted_comma_stays_in_field() {
        let sheet = parse("id,name,amount,party\n1,\"Citizens, for Progress\",$1.2M,Democratic\n");

        assert_eq!(sheet.headers, vec!["id", "name", "amount", "party"]);
        assert_eq!(
            sheet.rows,
            vec![row(&[
                ("id", "1"),
                ("name", "Citizens, for Progress"),
                ("amount", "$1.2M"),
                ("party", "Democratic"),
            ])]
        );
        assert!(sheet.anomalies.is_empty());
    }

    #[test]
    fn escaped_quote_is_literal() {
        let sheet = parse("text,id\n\"Say \"\"Hi\"\"\",2");
        assert_eq!(sheet.rows.len(), 1);
        assert_eq!(sheet.rows[0].get("text"), Some("Say \"Hi\""));
        assert_eq!(sheet.rows[0].get("id"), Some("2"));
    }

    #[test]
    fn mismatched_row_is_dropped_and_reported() {
        let text = "id,name\n1,Alice\n2,Bob,extra\n3,Carol\n";
        let sheet = parse(text);

        let names: Vec<_> = sheet.rows.iter().filter_map(|r| r.get("name")).collect();
        assert_eq!(names, vec!["Alice", "Carol"]);
        assert_eq!(
            sheet.anomalies,
            vec![ShapeAnomaly {
                line: 3,
                expected: 2,
                found: 3,
                content: "2,Bob,extra".to_string(),
            }]
        );
    }

    #[test]
    fn every_row_has_one_entry_per_header() {
        let text = "a,b,c\r\n1,2,3\r\n\r\n4,,6\r\n7,8\r\n";
        let sheet = parse(text);
        assert_eq!(sheet.rows.len(), 2);
        for r in &sheet.rows {
            assert_eq!(r.len(), 3);
            assert!(r.get("a").is_some() && r.get("b").is_some() && r.get("c").is_some());
        }
    }

    #[test]
    fn crlf_and_blank_lines() {
        let sheet = parse("id,name\r\n\r\n1,Alice\r\n   \r\n2,Bob\r\n");
        assert_eq!(sheet.rows.len(), 2);
        assert_eq!(sheet.rows[1].get("name"), Some("Bob"));
        assert!(sheet.anomalies.is_empty());
    }

    #[test]
    fn trailing_comma_and_whitespace_fields() {
        let sheet = parse("a,b,c\nx,   ,\n");
        assert_eq!(sheet.rows, vec![row(&[("a", "x"), ("b", ""), ("c", "")])]);
    }

    #[test]
    fn headers_are_trimmed() {
        let sheet = parse(" id , name \n1,Alice");
        assert_eq!(sheet.headers, vec!["id", "name"]);
        assert_eq!(sheet.rows[0].get("name"), Some("Alice"));
    }

    #[test]
    fn unbalanced_quote_is_best_effort() {
        let sheet = parse("a,b\n1,\"open, never closed");
        // the quote swallows the comma so only two fields come out
        assert_eq!(sheet.rows.len(), 1);
        assert_eq!(sheet.rows[0].get("b"), Some("open, never closed"));
    }

    #[test]
    fn empty_text_yields_nothing() {
        assert_eq!(parse(""), ParsedSheet::default());
        assert_eq!(parse("\n\n"), ParsedSheet::default());
    }

    #[test]
    fn header_only_yields_no_rows() {
        let sheet = parse("id,name,amount,party\n");
        assert_eq!(sheet.headers.len(), 4);
        assert!(sheet.rows.is_empty());
    }

    #[test]
    fn auto_delimiter_detects_tab_and_semicolon() {
        let opts = CsvOptions {
            delimiter: Delimiter::Auto,
        };
        let tsv = parse_with("id\tname\tparty\n1\tA, B\tGreen", opts);
        assert_eq!(tsv.rows[0].get("name"), Some("A, B"));

        let ssv = parse_with("id;name\n1;Alice", opts);
        assert_eq!(ssv.rows[0].get("name"), Some("Alice"));

        // ties and headerless-looking lines fall back to comma
        assert_eq!(Delimiter::Auto.resolve("single"), ',');
        assert_eq!(Delimiter::Auto.resolve("a,b;c"), ',');
        assert_eq!(Delimiter::Auto.resolve("\"a;b\",c"), ',');
    }

    #[test]
    fn tab_rows_keep_empty_edge_fields() {
        let opts = CsvOptions {
            delimiter: Delimiter::Tab,
        };
        let sheet = parse_with("id\tname\tparty\n1\tAlice\t\n\t\tGreen\r\n", opts);

        assert!(sheet.anomalies.is_empty(), "{:?}", sheet.anomalies);
        assert_eq!(
            sheet.rows,
            vec![
                row(&[("id", "1"), ("name", "Alice"), ("party", "")]),
                row(&[("id", ""), ("name", ""), ("party", "Green")]),
            ]
        );

        let auto = parse_with(
            "id\tname\tparty\n\tBob\t\n",
            CsvOptions {
                delimiter: Delimiter::Auto,
            },
        );
        assert_eq!(auto.rows, vec![row(&[("id", ""), ("name", "Bob"), ("party", "")])]);
    }

    #[test]
    fn reparse_is_deterministic() {
        let text = "id,name\n1,\"x, y\"\n2,z\nbad\n";
        assert_eq!(parse(text), parse(text));
    }
}
