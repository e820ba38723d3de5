//! Minimal CSV/TSV reader producing a cell grid.

use super::Grid;

/// Field separator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Delimiter {
    Comma,
    Tab,
}

impl Delimiter {
    const fn as_char(self) -> char {
        match self {
            Delimiter::Comma => ',',
            Delimiter::Tab => '\t',
        }
    }
}

/// Parse CSV/TSV bytes into rows of trimmed fields.
///
/// Invalid UTF-8 is replaced rather than rejected; a leading byte order mark
/// is dropped. Quoted fields may span lines.
pub(crate) fn read_grid(data: &[u8], delim: Delimiter) -> Grid {
    let text = String::from_utf8_lossy(data);
    let text = text.strip_prefix('\u{feff}').unwrap_or(&text);

    split_csv_records(text, delim.as_char())
        .into_iter()
        .map(|record| {
            record
                .into_iter()
                .map(|field| field.trim().to_string())
                .collect()
        })
        .collect()
}

/// Split CSV text into records, respecting quoted fields.
///
/// A record ends at `\n` or `\r\n` outside quotes. A trailing line break
/// does not open an empty record.
fn split_csv_records(text: &str, sep: char) -> Vec<Vec<String>> {
    let mut records = Vec::new();
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if in_quotes {
            if ch == '"' {
                if chars.peek() == Some(&'"') {
                    // Escaped quote
                    current.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            } else {
                current.push(ch);
            }
        } else if ch == '"' {
            in_quotes = true;
        } else if ch == sep {
            fields.push(std::mem::take(&mut current));
        } else if ch == '\n' || (ch == '\r' && chars.peek() == Some(&'\n')) {
            if ch == '\r' {
                chars.next();
            }
            fields.push(std::mem::take(&mut current));
            records.push(std::mem::take(&mut fields));
        } else {
            current.push(ch);
        }
    }
    if !current.is_empty() || !fields.is_empty() || in_quotes {
        fields.push(current);
        records.push(fields);
    }
    records
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_csv_basic() {
        let grid = read_grid(b"Category,200\nHistory, Who? \n", Delimiter::Comma);
        assert_eq!(grid.len(), 2);
        assert_eq!(grid[0], vec!["Category", "200"]);
        assert_eq!(grid[1], vec!["History", "Who?"]);
    }

    #[test]
    fn test_parse_tsv() {
        let grid = read_grid(b"A\tB\n1\t2", Delimiter::Tab);
        assert_eq!(grid, vec![vec!["A", "B"], vec!["1", "2"]]);
    }

    #[test]
    fn test_quoted_csv() {
        let grid = read_grid(
            b"\"Hello, World\",42\n\"She said \"\"hi\"\"\",0",
            Delimiter::Comma,
        );
        assert_eq!(grid[0][0], "Hello, World");
        assert_eq!(grid[1][0], "She said \"hi\"");
    }

    #[test]
    fn test_bom_and_blank_lines() {
        let grid = read_grid("\u{feff}Category\n\nArt".as_bytes(), Delimiter::Comma);
        assert_eq!(grid[0], vec!["Category"]);
        assert_eq!(grid[1], vec![""]);
        assert_eq!(grid[2], vec!["Art"]);
    }

    #[test]
    fn test_quoted_newline_stays_in_field() {
        let grid = read_grid(
            b"Category,200\nHistory,\"Who wrote\nHamlet?\"\n",
            Delimiter::Comma,
        );
        assert_eq!(
            grid,
            vec![vec!["Category", "200"], vec!["History", "Who wrote\nHamlet?"]]
        );
    }

    #[test]
    fn test_crlf_records() {
        let grid = read_grid(
            b"Category,200\r\nHistory,\"Line one\r\nline two\"\r\nArt,Who?\r\n",
            Delimiter::Comma,
        );
        assert_eq!(grid.len(), 3);
        assert_eq!(grid[1], vec!["History", "Line one\r\nline two"]);
        assert_eq!(grid[2], vec!["Art", "Who?"]);
    }

    #[test]
    fn test_empty_csv() {
        assert!(read_grid(b"", Delimiter::Comma).is_empty());
    }
}
