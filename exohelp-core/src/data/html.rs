//! Minimal HTML table extraction.
//!
//! Pulls the first `<table>` out of a document as a grid of cell texts. Inner
//! markup (links, bold, superscripts) is stripped and common entities are
//! decoded. A row or cell runs until the next row or cell starts, so
//! omitted `</tr>`/`</td>`/`</th>` end tags are tolerated. `colspan` is ignored.

use super::provider::DataError;
use super::schema::SchemaError;
use regex::Regex;
use std::sync::OnceLock;

struct TablePatterns {
    table: Regex,
    row: Regex,
    cell: Regex,
    tag: Regex,
    whitespace: Regex,
}

fn patterns() -> &'static TablePatterns {
    static PATTERNS: OnceLock<TablePatterns> = OnceLock::new();
    PATTERNS.get_or_init(|| TablePatterns {
        table: Regex::new(r"(?is)<table\b[^>]*>(.*?)</table\s*>").expect("valid table regex"),
        row: Regex::new(r"(?i)<tr\b[^>]*>").expect("valid row regex"),
        cell: Regex::new(r"(?i)<t[hd]\b[^>]*>").expect("valid cell regex"),
        tag: Regex::new(r"(?s)<[^>]*>").expect("valid tag regex"),
        whitespace: Regex::new(r"\s+").expect("valid whitespace regex"),
    })
}

/// Extract the first table in `html` as rows of cell text.
///
/// Rows without any cells are skipped.
pub fn extract_first_table(html: &str) -> Result<Vec<Vec<String>>, DataError> {
    let p = patterns();
    let body = p
        .table
        .captures(html)
        .and_then(|c| c.get(1))
        .ok_or(SchemaError::NoTable)?
        .as_str();

    let rows: Vec<Vec<String>> = segments(&p.row, body)
        .into_iter()
        .filter_map(|row| {
            let cells: Vec<String> = segments(&p.cell, row)
                .into_iter()
                .map(|cell| cell_text(p, cell))
                .collect();
            (!cells.is_empty()).then_some(cells)
        })
        .collect();

    if rows.is_empty() {
        return Err(SchemaError::EmptyTable.into());
    }
    Ok(rows)
}

/// Text following each start tag matched by `start`, up to the next one.
fn segments<'a>(start: &Regex, text: &'a str) -> Vec<&'a str> {
    let tags: Vec<_> = start.find_iter(text).collect();
    tags.iter()
        .enumerate()
        .map(|(i, tag)| {
            let end = tags.get(i + 1).map_or(text.len(), |next| next.start());
            &text[tag.end()..end]
        })
        .collect()
}

fn cell_text(p: &TablePatterns, raw: &str) -> String {
    let text = p.tag.replace_all(raw, " ");
    let text = decode_entities(&text);
    p.whitespace.replace_all(&text, " ").trim().to_string()
}

fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&#160;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&deg;", "°")
        .replace("&#176;", "°")
        .replace("&minus;", "-")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_header_and_body_cells() {
        let html = r#"
            <html><body><p>intro</p>
            <TABLE border=1>
              <tr><th></th><th><a href="x">MERCURY</a></th><th>VENUS</th></tr>
              <tr><td align=left><b>Mass</b></td><td>0.0553</td><td>0.815</td></tr>
            </TABLE>
            <table><tr><td>second table</td></tr></table>
            </body></html>"#;
        let grid = extract_first_table(html).unwrap();
        assert_eq!(
            grid,
            vec![
                vec!["".to_string(), "MERCURY".into(), "VENUS".into()],
                vec!["Mass".to_string(), "0.0553".into(), "0.815".into()],
            ]
        );
    }

    #[test]
    fn strips_nested_markup_and_entities() {
        let html = "<table><tr><td>Mean&nbsp;Temperature <sup>(C)</sup></td>\
                    <td>-65&amp;up</td></tr></table>";
        let grid = extract_first_table(html).unwrap();
        assert_eq!(grid[0][0], "Mean Temperature (C)");
        assert_eq!(grid[0][1], "-65&up");
    }

    #[test]
    fn rows_without_cells_are_skipped() {
        let html = "<table><tr></tr><tr><td>1</td></tr></table>";
        let grid = extract_first_table(html).unwrap();
        assert_eq!(grid.len(), 1);
    }

    #[test]
    fn omitted_end_tags_keep_cells_aligned() {
        let html = "<table>\
            <tr><th>\
            <th>EARTH\
            <th>MARS\
            <tr><td>Mass<td>1</td><td>0.107\
            </table>";
        let grid = extract_first_table(html).unwrap();
        assert_eq!(
            grid,
            vec![
                vec!["".to_string(), "EARTH".into(), "MARS".into()],
                vec!["Mass".to_string(), "1".into(), "0.107".into()],
            ]
        );
    }

    #[test]
    fn document_without_table_is_a_schema_error() {
        let err = extract_first_table("<html><body>nothing</body></html>").unwrap_err();
        assert!(matches!(err, DataError::Schema(SchemaError::NoTable)));
    }

    #[test]
    fn empty_table_is_a_schema_error() {
        let err = extract_first_table("<table></table>").unwrap_err();
        assert!(matches!(err, DataError::Schema(SchemaError::EmptyTable)));
    }
}
