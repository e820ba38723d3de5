//! XLSX workbook reader.
//!
//! Reads one worksheet into a cell grid: workbook relationships locate the
//! sheets and the shared string table, `xl/workbook.xml` names the sheets,
//! and the sheet's `<sheetData>` supplies the cells. Styles, formulas and
//! everything else in the package are ignored.

use quick_xml::events::Event;
use quick_xml::Reader;
use std::collections::BTreeMap;
use std::io::{Cursor, Read, Seek};
use std::path::Path;
use tracing::{debug, warn};
use zip::ZipArchive;

use crate::cell_ref::parse_cell_ref;
use crate::error::{DeckError, Result};
use crate::namespaces::{
    is_office_document_relationship, is_shared_strings_relationship, is_worksheet_relationship,
};
use crate::opc::{parse_relationships, rels_path_for, resolve_target};
use crate::xml_helpers::attr_string;

use super::Grid;

const DEFAULT_WORKBOOK: &str = "xl/workbook.xml";

/// Name and relationship ID of a `<sheet>` in `xl/workbook.xml`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SheetInfo {
    pub name: String,
    pub rel_id: String,
}

/// Cell type tag from the `t` attribute of a `<c>` element.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum CellTypeTag {
    Shared,
    Inline,
    Str,
    Bool,
    Error,
    Number,
}

fn parse_cell_type_tag(value: &[u8]) -> CellTypeTag {
    match value {
        b"s" => CellTypeTag::Shared,
        b"b" => CellTypeTag::Bool,
        b"e" => CellTypeTag::Error,
        b"str" => CellTypeTag::Str,
        b"inlineStr" => CellTypeTag::Inline,
        b"n" | b"d" => CellTypeTag::Number,
        other => {
            warn!(tag = %String::from_utf8_lossy(other), "unknown cell type, reading as number");
            CellTypeTag::Number
        }
    }
}

/// Read the named sheet (or the first sheet) of a workbook into a grid.
pub(crate) fn read_grid(path: &Path, data: &[u8], sheet: Option<&str>) -> Result<Grid> {
    let mut archive = ZipArchive::new(Cursor::new(data))
        .map_err(|e| DeckError::source_read(path, format!("not an XLSX workbook: {e}")))?;

    let workbook_path = read_part(&mut archive, "_rels/.rels")?
        .map(|data| parse_relationships(&data))
        .transpose()?
        .and_then(|rels| {
            rels.into_iter()
                .find(|r| is_office_document_relationship(&r.rel_type))
                .map(|r| resolve_target("", &r.target))
        })
        .unwrap_or_else(|| DEFAULT_WORKBOOK.to_string());

    let workbook = read_part(&mut archive, &workbook_path)?
        .ok_or_else(|| DeckError::source_read(path, format!("{workbook_path} is missing")))?;
    let sheets = parse_sheets(&workbook)?;
    let rels = match read_part(&mut archive, &rels_path_for(&workbook_path))? {
        Some(data) => parse_relationships(&data)?,
        None => Vec::new(),
    };

    let chosen = select_sheet(&sheets, sheet).ok_or_else(|| {
        let names: Vec<&str> = sheets.iter().map(|s| s.name.as_str()).collect();
        let reason = match sheet {
            Some(name) => format!("sheet {name:?} not found (available: {})", names.join(", ")),
            None => "workbook has no sheets".to_string(),
        };
        DeckError::source_read(path, reason)
    })?;

    // Fall back to the conventional part name when the relationship is missing
    let sheet_path = rels
        .iter()
        .find(|r| r.id == chosen.rel_id && is_worksheet_relationship(&r.rel_type))
        .map_or_else(
            || {
                let n = sheets.iter().position(|s| s == chosen).unwrap_or(0) + 1;
                format!("xl/worksheets/sheet{n}.xml")
            },
            |r| resolve_target(&workbook_path, &r.target),
        );
    debug!(sheet = %chosen.name, part = %sheet_path, "reading worksheet");

    let shared_strings = match rels
        .iter()
        .find(|r| is_shared_strings_relationship(&r.rel_type))
    {
        Some(rel) => match read_part(&mut archive, &resolve_target(&workbook_path, &rel.target))? {
            Some(data) => parse_shared_strings(&data)?,
            None => Vec::new(),
        },
        None => Vec::new(),
    };

    let sheet_xml = read_part(&mut archive, &sheet_path)?
        .ok_or_else(|| DeckError::source_read(path, format!("{sheet_path} is missing")))?;
    parse_cells(&sheet_xml, &shared_strings)
}

fn read_part<R: Read + Seek>(archive: &mut ZipArchive<R>, name: &str) -> Result<Option<Vec<u8>>> {
    let mut file = match archive.by_name(name) {
        Ok(file) => file,
        Err(zip::result::ZipError::FileNotFound) => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let mut data = Vec::with_capacity(usize::try_from(file.size()).unwrap_or(0));
    file.read_to_end(&mut data)?;
    Ok(Some(data))
}

/// First sheet, or the one named `name` (exact match first, then ASCII
/// case-insensitive).
fn select_sheet<'a>(sheets: &'a [SheetInfo], name: Option<&str>) -> Option<&'a SheetInfo> {
    match name {
        None => sheets.first(),
        Some(name) => sheets
            .iter()
            .find(|s| s.name == name)
            .or_else(|| sheets.iter().find(|s| s.name.eq_ignore_ascii_case(name))),
    }
}

/// Sheet names and relationship IDs from `xl/workbook.xml`, in tab order.
pub(crate) fn parse_sheets(data: &[u8]) -> Result<Vec<SheetInfo>> {
    let mut xml = Reader::from_reader(data);
    xml.trim_text(true);

    let mut sheets = Vec::new();
    let mut buf = Vec::new();

    loop {
        match xml.read_event_into(&mut buf)? {
            Event::Empty(ref e) | Event::Start(ref e) if e.local_name().as_ref() == b"sheet" => {
                if let (Some(name), Some(rel_id)) = (attr_string(e, b"name"), rel_id_of(e)) {
                    sheets.push(SheetInfo { name, rel_id });
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(sheets)
}

/// `<sheet>` carries `sheetId` and the prefixed `r:id`; only the latter is the
/// relationship.
fn rel_id_of(e: &quick_xml::events::BytesStart<'_>) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.as_ref().ends_with(b":id"))
        .and_then(|a| std::str::from_utf8(&a.value).ok().map(ToString::to_string))
}

/// Parse the shared string table. Rich text runs are concatenated; phonetic
/// runs (`rPh`) are skipped.
pub(crate) fn parse_shared_strings(data: &[u8]) -> Result<Vec<String>> {
    let mut xml = Reader::from_reader(data);
    xml.trim_text(false);

    let mut strings = Vec::new();
    let mut buf = Vec::new();
    let mut current = String::new();
    let mut in_si = false;
    let mut in_t = false;
    let mut in_phonetic = false;

    loop {
        match xml.read_event_into(&mut buf)? {
            Event::Start(ref e) => match e.local_name().as_ref() {
                b"si" => {
                    in_si = true;
                    current.clear();
                }
                b"rPh" => in_phonetic = true,
                b"t" if in_si && !in_phonetic => in_t = true,
                _ => {}
            },
            Event::Empty(ref e) if e.local_name().as_ref() == b"si" => strings.push(String::new()),
            Event::Text(ref e) if in_t => current.push_str(&e.unescape()?),
            Event::End(ref e) => match e.local_name().as_ref() {
                b"si" => {
                    in_si = false;
                    strings.push(std::mem::take(&mut current));
                }
                b"rPh" => in_phonetic = false,
                b"t" => in_t = false,
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(strings)
}

/// A cell being read: position, type and the text collected so far.
struct OpenCell {
    row: usize,
    col: usize,
    tag: CellTypeTag,
    text: String,
}

/// Parse `<sheetData>` into a grid of display strings.
///
/// Rows and cells without an `r` attribute continue from the previous one.
/// Only rows that appear in the sheet are returned, in sheet order.
pub(crate) fn parse_cells(data: &[u8], shared_strings: &[String]) -> Result<Grid> {
    let mut xml = Reader::from_reader(data);
    xml.trim_text(false);

    let mut cells: BTreeMap<usize, BTreeMap<usize, String>> = BTreeMap::new();
    let mut buf = Vec::new();
    let mut row = 0_usize;
    let mut next_col = 0_usize;
    let mut seen_row = false;
    let mut cell: Option<OpenCell> = None;
    let mut in_text = false;
    let mut in_phonetic = false;

    loop {
        match xml.read_event_into(&mut buf)? {
            Event::Start(ref e) | Event::Empty(ref e) if e.local_name().as_ref() == b"row" => {
                row = match attr_string(e, b"r").and_then(|r| r.trim().parse::<usize>().ok()) {
                    Some(r) if r > 0 => r - 1,
                    _ if seen_row => row + 1,
                    _ => 0,
                };
                seen_row = true;
                next_col = 0;
            }
            Event::Start(ref e) if e.local_name().as_ref() == b"c" => {
                let (col, at_row) = cell_position(e, row, next_col);
                let tag = attr_string(e, b"t")
                    .map_or(CellTypeTag::Number, |t| parse_cell_type_tag(t.as_bytes()));
                next_col = col + 1;
                cell = Some(OpenCell {
                    row: at_row,
                    col,
                    tag,
                    text: String::new(),
                });
            }
            Event::Empty(ref e) if e.local_name().as_ref() == b"c" => {
                let (col, _) = cell_position(e, row, next_col);
                next_col = col + 1;
            }
            Event::Start(ref e) if cell.is_some() => match e.local_name().as_ref() {
                b"v" | b"t" if !in_phonetic => in_text = true,
                b"rPh" => in_phonetic = true,
                _ => {}
            },
            Event::Text(ref e) if in_text => {
                if let Some(open) = cell.as_mut() {
                    open.text.push_str(&e.unescape()?);
                }
            }
            Event::End(ref e) => match e.local_name().as_ref() {
                b"v" | b"t" => in_text = false,
                b"rPh" => in_phonetic = false,
                b"c" => {
                    if let Some(open) = cell.take() {
                        let value = resolve_value(open.tag, &open.text, shared_strings);
                        if !value.is_empty() {
                            cells.entry(open.row).or_default().insert(open.col, value);
                        }
                    }
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(cells
        .into_values()
        .map(|row| {
            let width = row.keys().next_back().map_or(0, |&c| c + 1);
            let mut dense = vec![String::new(); width];
            for (col, value) in row {
                if let Some(slot) = dense.get_mut(col) {
                    *slot = value;
                }
            }
            dense
        })
        .collect())
}

/// (column, row) of a `<c>`, from its `r` attribute or the running position.
fn cell_position(e: &quick_xml::events::BytesStart<'_>, row: usize, next_col: usize) -> (usize, usize) {
    e.attributes()
        .flatten()
        .find(|a| a.key.as_ref() == b"r")
        .and_then(|a| parse_cell_ref(&a.value))
        .map_or((next_col, row), |(c, r)| (c as usize, r as usize))
}

fn resolve_value(tag: CellTypeTag, raw: &str, shared_strings: &[String]) -> String {
    match tag {
        CellTypeTag::Shared => raw
            .trim()
            .parse::<usize>()
            .ok()
            .and_then(|i| shared_strings.get(i))
            .cloned()
            .unwrap_or_default(),
        CellTypeTag::Bool => {
            if raw.trim() == "1" {
                "TRUE".to_string()
            } else {
                "FALSE".to_string()
            }
        }
        CellTypeTag::Inline | CellTypeTag::Str | CellTypeTag::Error => raw.to_string(),
        CellTypeTag::Number => format_number(raw),
    }
}

/// Render a stored number the way a reader expects to see it: whole values
/// without a fractional part, others as stored.
pub(crate) fn format_number(raw: &str) -> String {
    let raw = raw.trim();
    match raw.parse::<f64>() {
        Ok(n) if n.is_finite() && n.fract().abs() < f64::EPSILON && n.abs() < 1e15 => {
            #[allow(clippy::cast_possible_truncation)]
            let whole = n as i64;
            whole.to_string()
        }
        _ => raw.to_string(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sheets() {
        let xml = br#"<workbook xmlns:r="r"><sheets><sheet name="Quiz" sheetId="1" r:id="rId3"/><sheet name="Notes" sheetId="2" r:id="rId1"/></sheets></workbook>"#;
        let sheets = parse_sheets(xml).unwrap();
        assert_eq!(sheets.len(), 2);
        assert_eq!(sheets[0].name, "Quiz");
        assert_eq!(sheets[0].rel_id, "rId3");
    }

    #[test]
    fn test_select_sheet() {
        let sheets = vec![
            SheetInfo {
                name: "Quiz".into(),
                rel_id: "rId1".into(),
            },
            SheetInfo {
                name: "Round 2".into(),
                rel_id: "rId2".into(),
            },
        ];
        assert_eq!(select_sheet(&sheets, None).unwrap().name, "Quiz");
        assert_eq!(select_sheet(&sheets, Some("round 2")).unwrap().rel_id, "rId2");
        assert!(select_sheet(&sheets, Some("Final")).is_none());
        assert!(select_sheet(&[], None).is_none());
    }

    #[test]
    fn test_shared_strings_rich_and_phonetic() {
        let xml = br#"<sst><si><t>Plain</t></si><si><r><t>Ri</t></r><r><t xml:space="preserve">ch </t></r><rPh><t>skip</t></rPh></si><si/></sst>"#;
        let strings = parse_shared_strings(xml).unwrap();
        assert_eq!(strings, vec!["Plain", "Rich ", ""]);
    }

    #[test]
    fn test_parse_cells_types() {
        let xml = br#"<worksheet><sheetData>
            <row r="1"><c r="A1" t="s"><v>0</v></c><c r="B1"><v>200</v></c><c r="C1"><v>0.5</v></c></row>
            <row r="3"><c r="A3" t="inlineStr"><is><t>Art &amp; Music</t></is></c><c r="C3" t="b"><v>1</v></c><c r="D3" t="e"><v>#N/A</v></c><c r="E3" t="str"><f>A1</f><v>x</v></c></row>
        </sheetData></worksheet>"#;
        let grid = parse_cells(xml, &["Category".to_string()]).unwrap();
        assert_eq!(grid.len(), 2);
        assert_eq!(grid[0], vec!["Category", "200", "0.5"]);
        assert_eq!(grid[1], vec!["Art & Music", "", "TRUE", "#N/A", "x"]);
    }

    #[test]
    fn test_parse_cells_without_refs() {
        let xml = br#"<worksheet><sheetData><row><c t="inlineStr"><is><t>a</t></is></c><c/><c><v>3</v></c></row><row><c><v>4</v></c></row></sheetData></worksheet>"#;
        let grid = parse_cells(xml, &[]).unwrap();
        assert_eq!(grid, vec![vec!["a", "", "3"], vec!["4"]]);
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number("200"), "200");
        assert_eq!(format_number("200.0"), "200");
        assert_eq!(format_number("1E3"), "1000");
        assert_eq!(format_number("0.25"), "0.25");
        assert_eq!(format_number("-7"), "-7");
        assert_eq!(format_number("n/a"), "n/a");
    }
}
