//! Shared helpers for integration tests.
//!
//! - [`XlsxBuilder`] writes small workbooks in memory
//! - [`Pptx`] opens a written presentation and answers questions about its
//!   slides, following the package relationships the way a viewer would
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic,
    clippy::cast_possible_truncation
)]

use quick_xml::events::Event;
use quick_xml::Reader;
use std::collections::{BTreeMap, HashMap};
use std::io::{Cursor, Read, Write};
use std::path::{Path, PathBuf};
use zip::write::FileOptions;
use zip::{ZipArchive, ZipWriter};

// ============================================================================
// Workbook fixtures
// ============================================================================

/// Header row of a default quiz table.
pub const HEADER: [&str; 6] = ["Category", "200", "400", "600", "800", "1000"];

/// A quiz table with one row per category; question text is `"<category> q<points>"`.
pub fn quiz_rows(categories: &[&str]) -> Vec<Vec<String>> {
    let mut rows = vec![HEADER.iter().map(ToString::to_string).collect::<Vec<_>>()];
    for category in categories {
        let mut row = vec![(*category).to_string()];
        row.extend(HEADER[1..].iter().map(|p| format!("{category} q{p}")));
        rows.push(row);
    }
    rows
}

/// Render rows as CSV text, quoting every field.
pub fn to_csv(rows: &[Vec<String>]) -> String {
    rows.iter()
        .map(|row| {
            row.iter()
                .map(|field| format!("\"{}\"", field.replace('"', "\"\"")))
                .collect::<Vec<_>>()
                .join(",")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Builder for minimal XLSX files.
///
/// Numeric-looking cells are written as numbers, everything else through the
/// shared string table.
#[derive(Debug, Default)]
pub struct XlsxBuilder {
    sheets: Vec<(String, Vec<Vec<String>>)>,
}

impl XlsxBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn sheet(mut self, name: &str, rows: Vec<Vec<String>>) -> Self {
        self.sheets.push((name.to_string(), rows));
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut shared: Vec<String> = Vec::new();
        let mut shared_index: HashMap<String, usize> = HashMap::new();
        let mut sheet_xml = Vec::new();

        for (_, rows) in &self.sheets {
            let mut xml = String::from(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>"#,
            );
            for (r, row) in rows.iter().enumerate() {
                xml.push_str(&format!(r#"<row r="{}">"#, r + 1));
                for (c, value) in row.iter().enumerate() {
                    if value.is_empty() {
                        continue;
                    }
                    let cell_ref = format!("{}{}", column_letter(c), r + 1);
                    if value.parse::<f64>().is_ok() {
                        xml.push_str(&format!(r#"<c r="{cell_ref}"><v>{value}</v></c>"#));
                    } else {
                        let next = shared.len();
                        let idx = *shared_index.entry(value.clone()).or_insert_with(|| {
                            shared.push(value.clone());
                            next
                        });
                        xml.push_str(&format!(r#"<c r="{cell_ref}" t="s"><v>{idx}</v></c>"#));
                    }
                }
                xml.push_str("</row>");
            }
            xml.push_str("</sheetData></worksheet>");
            sheet_xml.push(xml);
        }

        let cursor = Cursor::new(Vec::new());
        let mut zip = ZipWriter::new(cursor);
        let options = FileOptions::default().compression_method(zip::CompressionMethod::Deflated);

        let mut content_types = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
<Default Extension="xml" ContentType="application/xml"/>
<Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>
<Override PartName="/xl/sharedStrings.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sharedStrings+xml"/>"#,
        );
        for i in 0..sheet_xml.len() {
            content_types.push_str(&format!(
                r#"<Override PartName="/xl/worksheets/sheet{}.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>"#,
                i + 1
            ));
        }
        content_types.push_str("</Types>");
        zip.start_file("[Content_Types].xml", options).unwrap();
        zip.write_all(content_types.as_bytes()).unwrap();

        zip.start_file("_rels/.rels", options).unwrap();
        zip.write_all(
            br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>
</Relationships>"#,
        )
        .unwrap();

        let mut workbook = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets>"#,
        );
        let mut workbook_rels = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
        );
        for (i, (name, _)) in self.sheets.iter().enumerate() {
            workbook.push_str(&format!(
                r#"<sheet name="{}" sheetId="{}" r:id="rId{}"/>"#,
                escape(name),
                i + 1,
                i + 1
            ));
            workbook_rels.push_str(&format!(
                r#"<Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet{}.xml"/>"#,
                i + 1,
                i + 1
            ));
        }
        workbook.push_str("</sheets></workbook>");
        workbook_rels.push_str(&format!(
            r#"<Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/sharedStrings" Target="sharedStrings.xml"/></Relationships>"#,
            self.sheets.len() + 1
        ));

        zip.start_file("xl/workbook.xml", options).unwrap();
        zip.write_all(workbook.as_bytes()).unwrap();
        zip.start_file("xl/_rels/workbook.xml.rels", options).unwrap();
        zip.write_all(workbook_rels.as_bytes()).unwrap();

        let mut sst = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" count="{0}" uniqueCount="{0}">"#,
            shared.len()
        );
        for s in &shared {
            sst.push_str(&format!("<si><t>{}</t></si>", escape(s)));
        }
        sst.push_str("</sst>");
        zip.start_file("xl/sharedStrings.xml", options).unwrap();
        zip.write_all(sst.as_bytes()).unwrap();

        for (i, xml) in sheet_xml.iter().enumerate() {
            zip.start_file(format!("xl/worksheets/sheet{}.xml", i + 1), options)
                .unwrap();
            zip.write_all(xml.as_bytes()).unwrap();
        }

        zip.finish().unwrap().into_inner()
    }
}

fn column_letter(col: usize) -> String {
    let mut n = col + 1;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push((b'A' + rem as u8) as char);
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect()
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Write `data` to `name` inside `dir`.
pub fn write_file(dir: &Path, name: &str, data: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, data).unwrap();
    path
}

// ============================================================================
// Presentation inspection
// ============================================================================

/// One cell of a slide table: its text and the slide number its link jumps to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellView {
    pub text: String,
    pub link: Option<usize>,
}

/// A written `.pptx`, unpacked.
pub struct Pptx {
    parts: BTreeMap<String, Vec<u8>>,
    /// Slide part names in presentation order
    slides: Vec<String>,
}

impl Pptx {
    pub fn open(path: &Path) -> Self {
        Self::from_bytes(&std::fs::read(path).unwrap())
    }

    pub fn from_bytes(data: &[u8]) -> Self {
        let mut archive = ZipArchive::new(Cursor::new(data)).unwrap();
        let mut parts = BTreeMap::new();
        for i in 0..archive.len() {
            let mut entry = archive.by_index(i).unwrap();
            let mut bytes = Vec::new();
            entry.read_to_end(&mut bytes).unwrap();
            parts.insert(entry.name().to_string(), bytes);
        }

        let rels = relationships(&parts, "ppt/presentation.xml");
        let slides = attribute_values(&parts["ppt/presentation.xml"], "sldId", "r:id")
            .iter()
            .map(|rid| rels[rid].clone())
            .collect();
        Self { parts, slides }
    }

    pub fn part(&self, name: &str) -> Option<&str> {
        self.parts
            .get(name)
            .map(|bytes| std::str::from_utf8(bytes).unwrap())
    }

    pub fn part_names(&self) -> Vec<&str> {
        self.parts.keys().map(String::as_str).collect()
    }

    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    /// Raw XML of slide `number` (1-based).
    pub fn slide_xml(&self, number: usize) -> &str {
        self.part(&self.slides[number - 1]).unwrap()
    }

    /// Slide number of a slide part, if it is one of the presentation's slides.
    fn slide_number(&self, part: &str) -> Option<usize> {
        self.slides.iter().position(|s| s == part).map(|i| i + 1)
    }

    /// Text of every `a:t` on slide `number`, in document order.
    pub fn texts(&self, number: usize) -> Vec<String> {
        let mut reader = Reader::from_reader(self.slide_xml(number).as_bytes());
        reader.trim_text(true);
        let mut buf = Vec::new();
        let mut in_text = false;
        let mut texts = Vec::new();
        loop {
            match reader.read_event_into(&mut buf).unwrap() {
                Event::Start(e) if e.local_name().as_ref() == b"t" => {
                    in_text = true;
                    texts.push(String::new());
                }
                Event::Text(t) if in_text => {
                    if let Some(last) = texts.last_mut() {
                        last.push_str(&t.unescape().unwrap());
                    }
                }
                Event::End(e) if e.local_name().as_ref() == b"t" => in_text = false,
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }
        texts
    }

    /// Slide numbers targeted by the internal jumps on slide `number`, in order.
    pub fn jumps(&self, number: usize) -> Vec<usize> {
        let part = &self.slides[number - 1];
        let rels = relationships(&self.parts, part);
        attribute_values(&self.parts[part], "hlinkClick", "r:id")
            .iter()
            .map(|rid| self.slide_number(&rels[rid]).unwrap())
            .collect()
    }

    /// Table cells on slide `number`, row by row.
    pub fn table(&self, number: usize) -> Vec<Vec<CellView>> {
        let part = &self.slides[number - 1];
        let rels = relationships(&self.parts, part);
        let mut reader = Reader::from_reader(self.parts[part].as_slice());
        reader.trim_text(true);
        let mut buf = Vec::new();
        let mut rows: Vec<Vec<CellView>> = Vec::new();
        let mut in_text = false;

        loop {
            match reader.read_event_into(&mut buf).unwrap() {
                Event::Start(e) => match e.local_name().as_ref() {
                    b"tr" => rows.push(Vec::new()),
                    b"tc" => rows.last_mut().unwrap().push(CellView {
                        text: String::new(),
                        link: None,
                    }),
                    b"t" => in_text = true,
                    _ => {}
                },
                Event::Empty(e) if e.local_name().as_ref() == b"hlinkClick" => {
                    if let Some(cell) = rows.last_mut().and_then(|r| r.last_mut()) {
                        let rid = attribute(&e, "r:id").unwrap();
                        cell.link = self.slide_number(&rels[&rid]);
                    }
                }
                Event::Text(t) if in_text => {
                    if let Some(cell) = rows.last_mut().and_then(|r| r.last_mut()) {
                        cell.text.push_str(&t.unescape().unwrap());
                    }
                }
                Event::End(e) if e.local_name().as_ref() == b"t" => in_text = false,
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }
        rows
    }
}

fn attribute(e: &quick_xml::events::BytesStart<'_>, name: &str) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.as_ref() == name.as_bytes())
        .map(|a| a.unescape_value().unwrap().into_owned())
}

/// Values of `attr` on every element with local name `element`.
fn attribute_values(xml: &[u8], element: &str, attr: &str) -> Vec<String> {
    let mut reader = Reader::from_reader(xml);
    let mut buf = Vec::new();
    let mut values = Vec::new();
    loop {
        match reader.read_event_into(&mut buf).unwrap() {
            Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == element.as_bytes() => {
                if let Some(v) = attribute(&e, attr) {
                    values.push(v);
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }
    values
}

/// Relationship id -> resolved target part for `part`.
fn relationships(parts: &BTreeMap<String, Vec<u8>>, part: &str) -> HashMap<String, String> {
    let (dir, file) = part.rsplit_once('/').unwrap_or(("", part));
    let rels_path = if dir.is_empty() {
        format!("_rels/{file}.rels")
    } else {
        format!("{dir}/_rels/{file}.rels")
    };
    let xml = &parts[&rels_path];
    let ids = attribute_values(xml, "Relationship", "Id");
    let targets = attribute_values(xml, "Relationship", "Target");
    ids.into_iter()
        .zip(targets)
        .map(|(id, target)| (id, resolve(dir, &target)))
        .collect()
}

fn resolve(dir: &str, target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        return absolute.to_string();
    }
    let mut segments: Vec<&str> = dir.split('/').filter(|s| !s.is_empty()).collect();
    for segment in target.split('/') {
        match segment {
            ".." => {
                segments.pop();
            }
            "." | "" => {}
            s => segments.push(s),
        }
    }
    segments.join("/")
}
