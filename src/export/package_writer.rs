//! Assemble the output ZIP package.
//!
//! Template parts are written unchanged. Generated slides are added under the
//! presentation's `slides/` directory and registered in the presentation
//! part (`p:sldIdLst`), its relationships and the content types.

use quick_xml::events::Event;
use quick_xml::name::QName;
use quick_xml::Reader;
use std::io::{Cursor, Write};
use zip::write::FileOptions;
use zip::ZipWriter;

use crate::deck::Deck;
use crate::error::{DeckError, Result};
use crate::namespaces::{CT_SLIDE, REL_SLIDE, REL_SLIDE_LAYOUT};
use crate::opc::{next_rel_index, relationships_xml, relative_target, rels_path_for, Relationship};

use super::slide_writer::{link_targets, write_slide_xml, LAYOUT_REL_ID};

/// First `p:sldId/@id`; lower values are reserved.
const FIRST_SLIDE_ID: u32 = 256;

const CONTENT_TYPES: &str = "[Content_Types].xml";

/// Part name of the `n`th (0-based) generated slide.
pub(crate) fn slide_part_name(presentation_path: &str, n: usize) -> String {
    match presentation_path.rsplit_once('/') {
        Some((dir, _)) => format!("{dir}/slides/slide{}.xml", n + 1),
        None => format!("slides/slide{}.xml", n + 1),
    }
}

/// Build the complete `.pptx` file for `deck`.
pub(crate) fn write_package(deck: &Deck) -> Result<Vec<u8>> {
    let template = deck.template();
    let pres_path = template.presentation_path.as_str();
    let pres_rels_path = rels_path_for(pres_path);

    let slide_parts: Vec<String> = (0..deck.slides().len())
        .map(|n| slide_part_name(pres_path, n))
        .collect();

    // Register slides with the presentation
    let mut pres_rels = template.presentation_rels.clone();
    let mut content_types = template.content_types.clone();
    let first = next_rel_index(&pres_rels);
    let mut slide_rel_ids = Vec::with_capacity(slide_parts.len());
    for (n, part) in slide_parts.iter().enumerate() {
        let rid = format!("rId{}", first + n);
        pres_rels.push(Relationship::new(
            rid.clone(),
            REL_SLIDE,
            relative_target(pres_path, part),
        ));
        content_types.add_override(part, CT_SLIDE);
        slide_rel_ids.push(rid);
    }

    let pres_xml = template
        .parts
        .get(pres_path)
        .ok_or_else(|| DeckError::Template(format!("missing part {pres_path}")))?;
    let pres_xml = patch_slide_list(pres_xml, &slide_rel_ids)?;

    let options = FileOptions::default().compression_method(zip::CompressionMethod::Deflated);
    let mut writer = ZipWriter::new(Cursor::new(Vec::with_capacity(64 * 1024)));

    writer.start_file(CONTENT_TYPES, options)?;
    writer.write_all(content_types.to_xml().as_bytes())?;

    for (name, data) in &template.parts {
        let name = name.as_str();
        if name == CONTENT_TYPES {
            continue;
        }
        writer.start_file(name, options)?;
        if name == pres_path {
            writer.write_all(&pres_xml)?;
        } else if name == pres_rels_path {
            writer.write_all(relationships_xml(&pres_rels).as_bytes())?;
        } else {
            writer.write_all(data)?;
        }
    }

    for ((n, slide), part) in deck.slides().iter().enumerate().zip(&slide_parts) {
        let layout = template.layout(slide.layout).ok_or(DeckError::LayoutNotFound {
            index: slide.layout,
            available: template.layouts().len(),
        })?;
        let targets = link_targets(slide);

        let mut rels = vec![Relationship::new(
            LAYOUT_REL_ID,
            REL_SLIDE_LAYOUT,
            relative_target(part, &layout.path),
        )];
        for target in &targets {
            let target_part = slide_parts.get(target.0).ok_or_else(|| {
                DeckError::InvalidTarget(format!("slide {n} links to missing slide {}", target.0))
            })?;
            rels.push(Relationship::new(
                format!("rId{}", rels.len() + 1),
                REL_SLIDE,
                relative_target(part, target_part),
            ));
        }

        writer.start_file(part.as_str(), options)?;
        writer.write_all(write_slide_xml(slide, layout, &targets).as_bytes())?;
        writer.start_file(rels_path_for(part), options)?;
        writer.write_all(relationships_xml(&rels).as_bytes())?;
    }

    let cursor = writer.finish()?;
    Ok(cursor.into_inner())
}

/// Replace the presentation's `sldIdLst` with one entry per relationship ID.
///
/// The rest of the part is copied byte for byte. The new list goes where the
/// schema wants it: just before `sldSz`, or `notesSz` when there is no slide
/// size, using the prefix of the surrounding elements.
pub(crate) fn patch_slide_list(data: &[u8], rel_ids: &[String]) -> Result<Vec<u8>> {
    let mut xml = Reader::from_reader(data);
    let mut buf = Vec::new();
    let mut skip = Vec::new();

    let mut remove: Option<(usize, usize)> = None;
    let mut insert_at: Option<usize> = None;
    let mut prefix: Option<String> = None;

    loop {
        let start = xml.buffer_position();
        match xml.read_event_into(&mut buf)? {
            Event::Start(ref e) if e.local_name().as_ref() == b"sldIdLst" => {
                let end = e.name().as_ref().to_vec();
                xml.read_to_end_into(QName(&end), &mut skip)?;
                remove = Some((start, xml.buffer_position()));
            }
            Event::Empty(ref e) if e.local_name().as_ref() == b"sldIdLst" => {
                remove = Some((start, xml.buffer_position()));
            }
            Event::Start(ref e) | Event::Empty(ref e) => {
                let local = e.local_name();
                if local.as_ref() == b"presentation" {
                    prefix = e
                        .name()
                        .prefix()
                        .map(|p| String::from_utf8_lossy(p.as_ref()).into_owned());
                } else if insert_at.is_none() && matches!(local.as_ref(), b"sldSz" | b"notesSz") {
                    insert_at = Some(start);
                }
            }
            Event::End(ref e) if e.local_name().as_ref() == b"presentation" => {
                if insert_at.is_none() {
                    insert_at = Some(start);
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    let insert_at = insert_at
        .ok_or_else(|| DeckError::Template("presentation part has no root element".into()))?;

    let p = prefix.map(|p| format!("{p}:")).unwrap_or_default();
    let mut list = String::with_capacity(32 + rel_ids.len() * 48);
    if !rel_ids.is_empty() {
        list.push_str(&format!("<{p}sldIdLst>"));
        for (id, rid) in (FIRST_SLIDE_ID..).zip(rel_ids) {
            list.push_str(&format!(r#"<{p}sldId id="{id}" r:id="{rid}"/>"#));
        }
        list.push_str(&format!("</{p}sldIdLst>"));
    }

    let mut out = Vec::with_capacity(data.len() + list.len());
    let copy = |out: &mut Vec<u8>, from: usize, to: usize| {
        out.extend_from_slice(data.get(from..to).unwrap_or_default());
    };
    match remove {
        Some((from, to)) if to <= insert_at => {
            copy(&mut out, 0, from);
            copy(&mut out, to, insert_at);
            out.extend_from_slice(list.as_bytes());
            copy(&mut out, insert_at, data.len());
        }
        Some((from, to)) => {
            copy(&mut out, 0, insert_at);
            out.extend_from_slice(list.as_bytes());
            copy(&mut out, insert_at, from);
            copy(&mut out, to, data.len());
        }
        None => {
            copy(&mut out, 0, insert_at);
            out.extend_from_slice(list.as_bytes());
            copy(&mut out, insert_at, data.len());
        }
    }
    Ok(out)
}
