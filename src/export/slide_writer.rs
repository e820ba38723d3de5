//! Generates slide XML from a [`Slide`].
//!
//! Placeholders are written empty of geometry so they inherit position and
//! formatting from the layout. Internal hyperlinks become `a:hlinkClick`
//! with the `ppaction://hlinksldjump` action and a slide relationship.


use crate::deck::{Paragraph, Shape, Slide, Table};
use crate::namespaces::{NS_DRAWING, NS_DRAWING_TABLE, NS_OFFICE_RELATIONSHIPS, NS_PRESENTATION};
use crate::sink::SlideId;
use crate::template::{LayoutInfo, Placeholder};
use crate::types::Rect;
use crate::xml_helpers::xml_escape;

/// Relationship ID of the layout in every generated slide's rels.
pub(crate) const LAYOUT_REL_ID: &str = "rId1";

/// Distinct link targets of a slide, in order of first appearance.
///
/// The target at position `i` gets relationship ID `rId{i + 2}`.
pub(crate) fn link_targets(slide: &Slide) -> Vec<SlideId> {
    let mut targets: Vec<SlideId> = Vec::new();
    for id in slide.links() {
        if !targets.contains(&id) {
            targets.push(id);
        }
    }
    targets
}

fn link_rel_id(targets: &[SlideId], id: SlideId) -> Option<String> {
    targets
        .iter()
        .position(|t| *t == id)
        .map(|i| format!("rId{}", i + 2))
}

/// Write a complete slide XML string.
pub(crate) fn write_slide_xml(slide: &Slide, layout: &LayoutInfo, targets: &[SlideId]) -> String {
    let mut out = String::with_capacity(4096);
    out.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    out.push('\n');
    out.push_str(&format!(
        r#"<p:sld xmlns:a="{NS_DRAWING}" xmlns:r="{NS_OFFICE_RELATIONSHIPS}" xmlns:p="{NS_PRESENTATION}">"#
    ));
    out.push_str("<p:cSld><p:spTree>");
    out.push_str(concat!(
        r#"<p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>"#,
        r#"<p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/>"#,
        r#"<a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr>"#
    ));

    // cNvPr ids are unique per slide; 1 is the group
    let mut next_id = 2;

    if let Some(ph) = &layout.title {
        write_placeholder(&mut out, next_id, "Title", ph, &slide.title, targets);
        next_id += 1;
    }
    if let Some(ph) = &layout.body {
        write_placeholder(&mut out, next_id, "Content Placeholder", ph, &slide.body, targets);
        next_id += 1;
    }

    for shape in &slide.shapes {
        match shape {
            Shape::TextBox { rect, paragraph } => {
                write_text_box(&mut out, next_id, *rect, paragraph, targets);
            }
            Shape::Table(table) => write_table(&mut out, next_id, table, targets),
        }
        next_id += 1;
    }

    out.push_str("</p:spTree></p:cSld>");
    out.push_str("<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sld>");
    out
}

fn write_placeholder(
    out: &mut String,
    id: usize,
    name: &str,
    ph: &Placeholder,
    paragraph: &Paragraph,
    targets: &[SlideId],
) {
    out.push_str(&format!(
        r#"<p:sp><p:nvSpPr><p:cNvPr id="{id}" name="{name} {}"/>"#,
        id - 1
    ));
    out.push_str(r#"<p:cNvSpPr><a:spLocks noGrp="1"/></p:cNvSpPr><p:nvPr><p:ph"#);
    if let Some(t) = &ph.ph_type {
        out.push_str(&format!(r#" type="{}""#, xml_escape(t)));
    }
    if let Some(idx) = ph.idx {
        out.push_str(&format!(r#" idx="{idx}""#));
    }
    out.push_str("/></p:nvPr></p:nvSpPr><p:spPr/>");
    out.push_str("<p:txBody><a:bodyPr/><a:lstStyle/>");
    write_paragraph(out, paragraph, targets);
    out.push_str("</p:txBody></p:sp>");
}

fn write_xfrm(out: &mut String, ns: &str, rect: Rect) {
    out.push_str(&format!(
        r#"<{ns}:xfrm><a:off x="{}" y="{}"/><a:ext cx="{}" cy="{}"/></{ns}:xfrm>"#,
        rect.x, rect.y, rect.cx, rect.cy
    ));
}

fn write_text_box(
    out: &mut String,
    id: usize,
    rect: Rect,
    paragraph: &Paragraph,
    targets: &[SlideId],
) {
    out.push_str(&format!(
        r#"<p:sp><p:nvSpPr><p:cNvPr id="{id}" name="TextBox {}"/><p:cNvSpPr txBox="1"/><p:nvPr/></p:nvSpPr>"#,
        id - 1
    ));
    out.push_str("<p:spPr>");
    write_xfrm(out, "a", rect);
    out.push_str(r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom><a:noFill/></p:spPr>"#);
    out.push_str(r#"<p:txBody><a:bodyPr wrap="none"><a:spAutoFit/></a:bodyPr><a:lstStyle/>"#);
    write_paragraph(out, paragraph, targets);
    out.push_str("</p:txBody></p:sp>");
}

/// Split `total` EMUs into `parts` integer extents that add back up to `total`.
fn split_extent(total: i64, parts: usize) -> Vec<i64> {
    let n = i64::try_from(parts.max(1)).unwrap_or(1);
    let base = total / n;
    let rest = total - base * n;
    (0..parts)
        .map(|i| if i + 1 == parts { base + rest } else { base })
        .collect()
}

fn write_table(out: &mut String, id: usize, table: &Table, targets: &[SlideId]) {
    out.push_str(&format!(
        r#"<p:graphicFrame><p:nvGraphicFramePr><p:cNvPr id="{id}" name="Table {}"/>"#,
        id - 1
    ));
    out.push_str(concat!(
        r#"<p:cNvGraphicFramePr><a:graphicFrameLocks noGrp="1"/></p:cNvGraphicFramePr>"#,
        "<p:nvPr/></p:nvGraphicFramePr>"
    ));
    write_xfrm(out, "p", table.rect);
    out.push_str(&format!(
        r#"<a:graphic><a:graphicData uri="{NS_DRAWING_TABLE}"><a:tbl>"#
    ));
    out.push_str(&format!(
        r#"<a:tblPr firstRow="1" bandRow="1"><a:tableStyleId>{}</a:tableStyleId></a:tblPr>"#,
        xml_escape(&table.style_id)
    ));

    out.push_str("<a:tblGrid>");
    for w in split_extent(table.rect.cx, table.cols) {
        out.push_str(&format!(r#"<a:gridCol w="{w}"/>"#));
    }
    out.push_str("</a:tblGrid>");

    for (row, h) in split_extent(table.rect.cy, table.rows).into_iter().enumerate() {
        out.push_str(&format!(r#"<a:tr h="{h}">"#));
        for paragraph in table.row(row) {
            out.push_str("<a:tc><a:txBody><a:bodyPr/><a:lstStyle/>");
            write_paragraph(out, paragraph, targets);
            out.push_str("</a:txBody><a:tcPr/></a:tc>");
        }
        out.push_str("</a:tr>");
    }

    out.push_str("</a:tbl></a:graphicData></a:graphic></p:graphicFrame>");
}

fn write_paragraph(out: &mut String, paragraph: &Paragraph, targets: &[SlideId]) {
    out.push_str("<a:p>");
    if paragraph.runs.is_empty() {
        out.push_str(r#"<a:endParaRPr lang="en-US" dirty="0"/>"#);
    }
    for run in &paragraph.runs {
        out.push_str(r#"<a:r><a:rPr lang="en-US""#);
        if let Some(pt) = run.size_pt {
            // Hundredths of a point
            out.push_str(&format!(r#" sz="{}""#, pt.saturating_mul(100)));
        }
        out.push_str(r#" dirty="0""#);
        match run.link.and_then(|id| link_rel_id(targets, id)) {
            Some(rid) => {
                out.push_str(&format!(
                    r#"><a:hlinkClick r:id="{rid}" action="ppaction://hlinksldjump"/></a:rPr>"#
                ));
            }
            None => out.push_str("/>"),
        }
        out.push_str(&format!("<a:t>{}</a:t></a:r>", xml_escape(&run.text)));
    }
    out.push_str("</a:p>");
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::deck::{Deck, TextRun};
    use crate::sink::{PresentationSink, Run, TextTarget};
    use crate::template::Template;
    use crate::types::{Anchor, GridCell};

    fn layout(title: bool, body: bool) -> LayoutInfo {
        LayoutInfo {
            path: "ppt/slideLayouts/slideLayout2.xml".into(),
            name: "Title and Content".into(),
            title: title.then_some(Placeholder {
                ph_type: Some("title".into()),
                idx: None,
            }),
            body: body.then_some(Placeholder {
                ph_type: None,
                idx: Some(1),
            }),
        }
    }

    fn run(text: &str, size_pt: Option<u32>, link: Option<SlideId>) -> TextRun {
        TextRun {
            text: text.into(),
            size_pt,
            link,
        }
    }

    fn slide() -> Slide {
        Slide {
            layout: 1,
            anchor: None,
            title: Paragraph {
                runs: vec![run("History - 100", None, None)],
            },
            body: Paragraph {
                runs: vec![run("Q & A <1>", None, None)],
            },
            shapes: vec![Shape::TextBox {
                rect: Rect::new(6_400_800, 5_943_600, 1_828_800, 914_400),
                paragraph: Paragraph {
                    runs: vec![run("Back", Some(11), Some(SlideId(3)))],
                },
            }],
        }
    }

    #[test]
    fn test_link_targets_are_distinct() {
        let mut s = slide();
        s.title.runs.push(run("again", None, Some(SlideId(3))));
        s.title.runs.push(run("other", None, Some(SlideId(0))));
        assert_eq!(link_targets(&s), vec![SlideId(3), SlideId(0)]);
    }

    #[test]
    fn test_slide_xml_placeholders_and_link() {
        let s = slide();
        let targets = link_targets(&s);
        let xml = write_slide_xml(&s, &layout(true, true), &targets);

        assert!(xml.contains(r#"<p:ph type="title"/>"#));
        assert!(xml.contains(r#"<p:ph idx="1"/>"#));
        assert!(xml.contains("<a:t>Q &amp; A &lt;1&gt;</a:t>"));
        assert!(xml.contains(
            r#"<a:rPr lang="en-US" sz="1100" dirty="0"><a:hlinkClick r:id="rId2" action="ppaction://hlinksldjump"/></a:rPr><a:t>Back</a:t>"#
        ));
        assert!(xml.contains(r#"<a:off x="6400800" y="5943600"/>"#));
    }

    #[test]
    fn test_missing_placeholder_is_skipped() {
        let xml = write_slide_xml(&slide(), &layout(true, false), &[]);
        assert!(!xml.contains("idx="));
        assert!(!xml.contains("hlinkClick"));
    }

    #[test]
    fn test_table_xml() {
        let mut deck = Deck::new(Template::builtin().unwrap());
        let id = deck.add_slide(5, Some(&Anchor::new("MainTable"))).unwrap();
        let shape = deck
            .add_table(id, 2, 6, Rect::new(0, 0, 6001, 1000), "{STYLE}")
            .unwrap();
        deck.push_run(
            TextTarget::Cell(shape, GridCell::new(0, 0)),
            Run::plain("History"),
        )
        .unwrap();
        let s = deck.slide(id).unwrap();
        let xml = write_slide_xml(s, &layout(true, false), &[]);

        assert!(xml.contains(r#"<a:tblPr firstRow="1" bandRow="1"><a:tableStyleId>{STYLE}</a:tableStyleId></a:tblPr>"#));
        assert_eq!(xml.matches("<a:gridCol ").count(), 6);
        assert!(xml.contains(r#"<a:gridCol w="1001"/></a:tblGrid>"#));
        assert_eq!(xml.matches("<a:tr ").count(), 2);
        assert_eq!(xml.matches("<a:tc>").count(), 12);
        assert!(xml.contains("<a:t>History</a:t>"));
    }

    #[test]
    fn test_split_extent() {
        assert_eq!(split_extent(10, 3), vec![3, 3, 4]);
        assert_eq!(split_extent(10, 1), vec![10]);
        assert!(split_extent(10, 0).is_empty());
    }
}
