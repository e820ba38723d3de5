//! Open Packaging Conventions plumbing shared by the workbook reader and the
//! presentation writer: relationship parts, content types and part names.
//!
//! Part names are kept without the leading `/` (`ppt/slides/slide1.xml`),
//! matching ZIP entry names.

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::Result;
use crate::namespaces::{NS_CONTENT_TYPES, NS_RELATIONSHIPS};
use crate::xml_helpers::{attr_string, xml_escape};

/// One `<Relationship>` entry of a `.rels` part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    pub id: String,
    pub rel_type: String,
    pub target: String,
    pub external: bool,
}

impl Relationship {
    pub fn new(id: impl Into<String>, rel_type: &str, target: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            rel_type: rel_type.to_string(),
            target: target.into(),
            external: false,
        }
    }
}

/// Parse a `.rels` part.
pub fn parse_relationships(data: &[u8]) -> Result<Vec<Relationship>> {
    let mut xml = Reader::from_reader(data);
    xml.trim_text(true);

    let mut rels = Vec::new();
    let mut buf = Vec::new();

    loop {
        match xml.read_event_into(&mut buf)? {
            Event::Empty(ref e) | Event::Start(ref e)
                if e.local_name().as_ref() == b"Relationship" =>
            {
                let id = attr_string(e, b"Id").unwrap_or_default();
                let rel_type = attr_string(e, b"Type").unwrap_or_default();
                let target = attr_string(e, b"Target").unwrap_or_default();
                let external = attr_string(e, b"TargetMode").as_deref() == Some("External");
                if !id.is_empty() && !target.is_empty() {
                    rels.push(Relationship {
                        id,
                        rel_type,
                        target,
                        external,
                    });
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(rels)
}

/// Serialize relationships into a `.rels` part.
pub fn relationships_xml(rels: &[Relationship]) -> String {
    let mut out = String::with_capacity(128 + rels.len() * 160);
    out.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    out.push('\n');
    out.push_str(&format!(r#"<Relationships xmlns="{NS_RELATIONSHIPS}">"#));
    for rel in rels {
        out.push_str(&format!(
            r#"<Relationship Id="{}" Type="{}" Target="{}"{}/>"#,
            xml_escape(&rel.id),
            xml_escape(&rel.rel_type),
            xml_escape(&rel.target),
            if rel.external {
                r#" TargetMode="External""#
            } else {
                ""
            }
        ));
    }
    out.push_str("</Relationships>");
    out
}

/// Smallest `rIdN` not used by `rels`, counting up from `rId1`.
pub fn next_rel_index(rels: &[Relationship]) -> usize {
    rels.iter()
        .filter_map(|r| r.id.strip_prefix("rId")?.parse::<usize>().ok())
        .max()
        .map_or(1, |n| n + 1)
}

/// `[Content_Types].xml` contents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentTypes {
    /// (extension, content type)
    pub defaults: Vec<(String, String)>,
    /// (part name without leading `/`, content type)
    pub overrides: Vec<(String, String)>,
}

impl ContentTypes {
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut xml = Reader::from_reader(data);
        xml.trim_text(true);

        let mut types = Self::default();
        let mut buf = Vec::new();

        loop {
            match xml.read_event_into(&mut buf)? {
                Event::Empty(ref e) | Event::Start(ref e) => match e.local_name().as_ref() {
                    b"Default" => {
                        if let (Some(ext), Some(ct)) =
                            (attr_string(e, b"Extension"), attr_string(e, b"ContentType"))
                        {
                            types.defaults.push((ext, ct));
                        }
                    }
                    b"Override" => {
                        if let (Some(part), Some(ct)) =
                            (attr_string(e, b"PartName"), attr_string(e, b"ContentType"))
                        {
                            types
                                .overrides
                                .push((part.trim_start_matches('/').to_string(), ct));
                        }
                    }
                    _ => {}
                },
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        Ok(types)
    }

    pub fn add_default(&mut self, extension: &str, content_type: &str) {
        if !self
            .defaults
            .iter()
            .any(|(ext, _)| ext.eq_ignore_ascii_case(extension))
        {
            self.defaults
                .push((extension.to_string(), content_type.to_string()));
        }
    }

    pub fn add_override(&mut self, part: &str, content_type: &str) {
        self.overrides.retain(|(p, _)| p != part);
        self.overrides
            .push((part.to_string(), content_type.to_string()));
    }

    pub fn to_xml(&self) -> String {
        let mut out = String::with_capacity(256 + self.overrides.len() * 160);
        out.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        out.push('\n');
        out.push_str(&format!(r#"<Types xmlns="{NS_CONTENT_TYPES}">"#));
        for (ext, ct) in &self.defaults {
            out.push_str(&format!(
                r#"<Default Extension="{}" ContentType="{}"/>"#,
                xml_escape(ext),
                xml_escape(ct)
            ));
        }
        for (part, ct) in &self.overrides {
            out.push_str(&format!(
                r#"<Override PartName="/{}" ContentType="{}"/>"#,
                xml_escape(part),
                xml_escape(ct)
            ));
        }
        out.push_str("</Types>");
        out
    }
}

/// Relationship part name for `part`: `ppt/slides/slide1.xml` →
/// `ppt/slides/_rels/slide1.xml.rels`. The package root maps to `_rels/.rels`.
pub fn rels_path_for(part: &str) -> String {
    match part.rsplit_once('/') {
        Some((dir, name)) => format!("{dir}/_rels/{name}.rels"),
        None if part.is_empty() => "_rels/.rels".to_string(),
        None => format!("_rels/{part}.rels"),
    }
}

/// Resolve a relationship target found in the rels of `source_part` into a
/// part name. Handles absolute targets and `..` segments.
pub fn resolve_target(source_part: &str, target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        return normalize(absolute.split('/'));
    }
    let base = source_part.rsplit_once('/').map_or("", |(dir, _)| dir);
    normalize(base.split('/').chain(target.split('/')))
}

fn normalize<'a>(segments: impl Iterator<Item = &'a str>) -> String {
    let mut parts: Vec<&str> = Vec::new();
    for segment in segments {
        match segment {
            "" | "." => {}
            ".." => {
                parts.pop();
            }
            s => parts.push(s),
        }
    }
    parts.join("/")
}

/// Relationship target from `source_part` to `target_part`, relative when
/// they share a first segment (`ppt/...`), absolute otherwise.
pub fn relative_target(source_part: &str, target_part: &str) -> String {
    let source_dir: Vec<&str> = source_part
        .rsplit_once('/')
        .map_or(Vec::new(), |(dir, _)| dir.split('/').collect());
    let target: Vec<&str> = target_part.split('/').collect();

    let common = source_dir
        .iter()
        .zip(&target)
        .take_while(|(a, b)| a == b)
        .count();
    if common == 0 {
        return format!("/{target_part}");
    }

    let mut out: Vec<&str> = std::iter::repeat("..")
        .take(source_dir.len() - common)
        .collect();
    out.extend(target.iter().skip(common));
    out.join("/")
}
