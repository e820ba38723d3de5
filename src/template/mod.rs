//! Presentation templates.
//!
//! A [`Template`] is an unpacked `.pptx` package with its slides removed: the
//! slide master, layouts, theme and every other part keep their content
//! and written back out next to the generated slides. Templates come from a
//! user `.pptx` file or from the built-in minimal package.

mod builtin;

use quick_xml::events::Event;
use quick_xml::Reader;
use std::collections::{BTreeMap, HashSet};
use std::io::{Cursor, Read};
use std::path::Path;
use tracing::{debug, warn};
use zip::ZipArchive;

use crate::error::{DeckError, Result};
use crate::namespaces::{
    is_notes_slide_relationship, is_office_document_relationship,
    is_slide_layout_relationship, is_slide_master_relationship, is_slide_relationship,
};
use crate::opc::{parse_relationships, rels_path_for, resolve_target, ContentTypes, Relationship};
use crate::types::SlideSize;
use crate::xml_helpers::{attr_i64, attr_string, attr_u32};

/// Placeholder a generated slide can fill, as declared by its layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    /// `type` attribute (`title`, `ctrTitle`, `body`, ...); `None` means an object placeholder
    pub ph_type: Option<String>,
    pub idx: Option<u32>,
}

/// A slide layout of the template's first master.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutInfo {
    /// Part name, e.g. `ppt/slideLayouts/slideLayout2.xml`
    pub path: String,
    /// Layout name from `p:cSld/@name`
    pub name: String,
    pub title: Option<Placeholder>,
    pub body: Option<Placeholder>,
}

/// An unpacked presentation package without slides.
#[derive(Debug, Clone)]
pub struct Template {
    /// Every kept part, keyed by ZIP entry name
    pub(crate) parts: BTreeMap<String, Vec<u8>>,
    pub(crate) presentation_path: String,
    /// Presentation relationships with slide relationships removed
    pub(crate) presentation_rels: Vec<Relationship>,
    /// Content types with overrides for removed parts dropped
    pub(crate) content_types: ContentTypes,
    pub(crate) layouts: Vec<LayoutInfo>,
    pub(crate) slide_size: SlideSize,
}

impl Template {
    /// The built-in template: one master, six standard layouts, a plain theme.
    pub fn builtin() -> Result<Self> {
        Self::from_parts(builtin::parts())
    }

    /// Load a `.pptx` template from disk.
    pub fn from_file(path: &Path) -> Result<Self> {
        let data = std::fs::read(path)
            .map_err(|e| DeckError::Template(format!("{}: {e}", path.display())))?;
        Self::from_bytes(&data)
    }

    /// Load a `.pptx` template from its bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let mut archive = ZipArchive::new(Cursor::new(data))?;
        let mut parts = BTreeMap::new();
        for i in 0..archive.len() {
            let mut entry = archive.by_index(i)?;
            if entry.is_dir() {
                continue;
            }
            let mut bytes = Vec::with_capacity(usize::try_from(entry.size()).unwrap_or(0));
            entry.read_to_end(&mut bytes)?;
            parts.insert(entry.name().to_string(), bytes);
        }
        Self::from_parts(parts)
    }

    fn from_parts(mut parts: BTreeMap<String, Vec<u8>>) -> Result<Self> {
        let root_rels = parse_relationships(required(&parts, "_rels/.rels")?)?;
        let presentation_path = root_rels
            .iter()
            .find(|r| is_office_document_relationship(&r.rel_type))
            .map(|r| resolve_target("", &r.target))
            .ok_or_else(|| DeckError::Template("package has no main document".into()))?;

        let presentation_xml = required(&parts, &presentation_path)?;
        let (master_ids, slide_size) = scan_presentation(presentation_xml)?;

        let all_rels = parse_relationships(required(&parts, &rels_path_for(&presentation_path))?)?;
        let master_path = master_ids
            .iter()
            .find_map(|id| all_rels.iter().find(|r| &r.id == id))
            .or_else(|| all_rels.iter().find(|r| is_slide_master_relationship(&r.rel_type)))
            .map(|r| resolve_target(&presentation_path, &r.target))
            .ok_or_else(|| DeckError::Template("presentation has no slide master".into()))?;

        let layouts = read_layouts(&parts, &master_path)?;
        if layouts.is_empty() {
            return Err(DeckError::Template(format!("{master_path} has no slide layouts")));
        }

        // Drop existing slides and everything only they own
        let mut removed: HashSet<String> = HashSet::new();
        for rel in all_rels.iter().filter(|r| is_slide_relationship(&r.rel_type)) {
            let slide_path = resolve_target(&presentation_path, &rel.target);
            let slide_rels_path = rels_path_for(&slide_path);
            if let Some(data) = parts.get(&slide_rels_path) {
                for slide_rel in parse_relationships(data)? {
                    if is_notes_slide_relationship(&slide_rel.rel_type) {
                        let notes = resolve_target(&slide_path, &slide_rel.target);
                        removed.insert(rels_path_for(&notes));
                        removed.insert(notes);
                    }
                }
            }
            removed.insert(slide_rels_path);
            removed.insert(slide_path);
        }
        if !removed.is_empty() {
            debug!(parts = removed.len(), "dropping template slides");
        }
        parts.retain(|name, _| !removed.contains(name));

        let presentation_rels: Vec<Relationship> = all_rels
            .into_iter()
            .filter(|r| !is_slide_relationship(&r.rel_type))
            .collect();

        let mut content_types = ContentTypes::parse(required(&parts, "[Content_Types].xml")?)?;
        content_types
            .overrides
            .retain(|(part, _)| parts.contains_key(part.as_str()));

        Ok(Self {
            parts,
            presentation_path,
            presentation_rels,
            content_types,
            layouts,
            slide_size,
        })
    }

    /// Layouts of the first slide master, in master order.
    #[must_use]
    pub fn layouts(&self) -> &[LayoutInfo] {
        &self.layouts
    }

    #[must_use]
    pub fn layout(&self, index: usize) -> Option<&LayoutInfo> {
        self.layouts.get(index)
    }

    #[must_use]
    pub fn slide_size(&self) -> SlideSize {
        self.slide_size
    }

    /// Part names of the package, slides excluded.
    pub fn part_names(&self) -> impl Iterator<Item = &str> {
        self.parts.keys().map(String::as_str)
    }
}

fn required<'a>(parts: &'a BTreeMap<String, Vec<u8>>, name: &str) -> Result<&'a [u8]> {
    parts
        .get(name)
        .map(Vec::as_slice)
        .ok_or_else(|| DeckError::Template(format!("missing part {name}")))
}

/// Read master relationship IDs (in list order) and the slide size.
fn scan_presentation(data: &[u8]) -> Result<(Vec<String>, SlideSize)> {
    let mut xml = Reader::from_reader(data);
    xml.trim_text(true);

    let mut master_ids = Vec::new();
    let mut size = SlideSize::default();
    let mut buf = Vec::new();

    loop {
        match xml.read_event_into(&mut buf)? {
            Event::Empty(ref e) | Event::Start(ref e) => match e.local_name().as_ref() {
                b"sldMasterId" => {
                    if let Some(id) = get_rel_id_prefixed(e) {
                        master_ids.push(id);
                    }
                }
                b"sldSz" => {
                    if let (Some(cx), Some(cy)) = (attr_i64(e, b"cx"), attr_i64(e, b"cy")) {
                        size = SlideSize { cx, cy };
                    }
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok((master_ids, size))
}

/// `p:sldMasterId` and `p:sldLayoutId` carry both a numeric `id` and an `r:id`;
/// only the prefixed one is the relationship.
fn get_rel_id_prefixed(e: &quick_xml::events::BytesStart<'_>) -> Option<String> {
    e.attributes()
        .flatten()
        .filter(|attr| attr.key.as_ref().len() > 3 && attr.key.as_ref().ends_with(b":id"))
        .find_map(|attr| std::str::from_utf8(&attr.value).ok().map(ToString::to_string))
}

/// Resolve the layouts of a master in `p:sldLayoutIdLst` order.
fn read_layouts(parts: &BTreeMap<String, Vec<u8>>, master_path: &str) -> Result<Vec<LayoutInfo>> {
    let master_rels = parse_relationships(required(parts, &rels_path_for(master_path))?)?;

    let mut xml = Reader::from_reader(required(parts, master_path)?);
    xml.trim_text(true);
    let mut layout_ids = Vec::new();
    let mut buf = Vec::new();
    loop {
        match xml.read_event_into(&mut buf)? {
            Event::Empty(ref e) | Event::Start(ref e)
                if e.local_name().as_ref() == b"sldLayoutId" =>
            {
                if let Some(id) = get_rel_id_prefixed(e) {
                    layout_ids.push(id);
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    // Masters without an explicit list: fall back to relationship order
    if layout_ids.is_empty() {
        layout_ids = master_rels
            .iter()
            .filter(|r| is_slide_layout_relationship(&r.rel_type))
            .map(|r| r.id.clone())
            .collect();
    }

    let mut layouts = Vec::with_capacity(layout_ids.len());
    for id in &layout_ids {
        let Some(rel) = master_rels.iter().find(|r| &r.id == id) else {
            warn!(id = %id, "slide layout id without relationship");
            continue;
        };
        let path = resolve_target(master_path, &rel.target);
        let data = required(parts, &path)?;
        layouts.push(scan_layout(path, data)?);
    }
    Ok(layouts)
}

/// Find the layout name and the title/body placeholders a slide can fill.
fn scan_layout(path: String, data: &[u8]) -> Result<LayoutInfo> {
    let mut xml = Reader::from_reader(data);
    xml.trim_text(true);

    let mut info = LayoutInfo {
        path,
        name: String::new(),
        title: None,
        body: None,
    };
    let mut buf = Vec::new();

    loop {
        match xml.read_event_into(&mut buf)? {
            Event::Empty(ref e) | Event::Start(ref e) => match e.local_name().as_ref() {
                b"cSld" => info.name = attr_string(e, b"name").unwrap_or_default(),
                b"ph" => {
                    let ph = Placeholder {
                        ph_type: attr_string(e, b"type"),
                        idx: attr_u32(e, b"idx"),
                    };
                    match ph.ph_type.as_deref() {
                        Some("title" | "ctrTitle") if info.title.is_none() => info.title = Some(ph),
                        None | Some("body" | "obj" | "subTitle")
                            if info.body.is_none() && ph.idx.is_some() =>
                        {
                            info.body = Some(ph);
                        }
                        _ => {}
                    }
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(info)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_layouts() {
        let template = Template::builtin().unwrap();
        let names: Vec<&str> = template.layouts().iter().map(|l| l.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "Title Slide",
                "Title and Content",
                "Section Header",
                "Two Content",
                "Comparison",
                "Title Only"
            ]
        );
        let title_slide = template.layout(0).unwrap();
        assert_eq!(title_slide.title.as_ref().unwrap().ph_type.as_deref(), Some("ctrTitle"));
        let content = template.layout(1).unwrap();
        assert_eq!(content.body.as_ref().unwrap().idx, Some(1));
        assert!(template.layout(5).unwrap().body.is_none());
        assert_eq!(template.slide_size(), SlideSize::default());
    }

    #[test]
    fn test_builtin_has_no_slides() {
        let template = Template::builtin().unwrap();
        assert!(template.part_names().all(|p| !p.starts_with("ppt/slides/")));
        assert!(template
            .presentation_rels
            .iter()
            .all(|r| !is_slide_relationship(&r.rel_type)));
    }

    #[test]
    fn test_missing_parts_rejected() {
        let err = Template::from_parts(BTreeMap::new()).unwrap_err();
        assert!(matches!(err, DeckError::Template(_)));
    }

    #[test]
    fn test_rel_id_prefers_prefixed_attribute() {
        let e = quick_xml::events::BytesStart::from_content(
            r#"p:sldLayoutId id="2147483649" r:id="rId3""#,
            13,
        );
        assert_eq!(get_rel_id_prefixed(&e).as_deref(), Some("rId3"));
    }
}
