//! Built-in minimal presentation package.
//!
//! Layout order follows the standard Office master so layout indices in the
//! configuration mean the same thing here and in stock templates:
//! 0 Title Slide, 1 Title and Content, 2 Section Header, 3 Two Content,
//! 4 Comparison, 5 Title Only.

use std::collections::BTreeMap;

use crate::namespaces::{
    CT_PRESENTATION, CT_RELATIONSHIPS, CT_SLIDE_LAYOUT, CT_SLIDE_MASTER, CT_TABLE_STYLES,
    CT_THEME, CT_XML, NS_DRAWING, NS_OFFICE_RELATIONSHIPS, NS_PRESENTATION, REL_OFFICE_DOCUMENT,
    REL_SLIDE_LAYOUT, REL_SLIDE_MASTER, REL_TABLE_STYLES, REL_THEME,
};
use crate::opc::{relationships_xml, ContentTypes, Relationship};
use crate::types::{Rect, SlideSize};

const XML_DECL: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

const MASTER: &str = "ppt/slideMasters/slideMaster1.xml";
const THEME: &str = "ppt/theme/theme1.xml";
const TABLE_STYLES: &str = "ppt/tableStyles.xml";
const PRESENTATION: &str = "ppt/presentation.xml";

/// Placeholder kinds used by the built-in layouts.
#[derive(Clone, Copy)]
enum Ph {
    Title,
    CtrTitle,
    SubTitle,
    Body(u32),
}

struct LayoutSpec {
    name: &'static str,
    layout_type: &'static str,
    placeholders: &'static [(Ph, Option<Rect>)],
}

const HALF_LEFT: Rect = Rect::new(457_200, 1_600_200, 4_038_600, 4_525_963);
const HALF_RIGHT: Rect = Rect::new(4_648_200, 1_600_200, 4_038_600, 4_525_963);

const LAYOUTS: [LayoutSpec; 6] = [
    LayoutSpec {
        name: "Title Slide",
        layout_type: "title",
        placeholders: &[
            (Ph::CtrTitle, Some(Rect::new(685_800, 2_130_425, 7_772_400, 1_470_025))),
            (Ph::SubTitle, Some(Rect::new(1_371_600, 3_886_200, 6_400_800, 1_752_600))),
        ],
    },
    LayoutSpec {
        name: "Title and Content",
        layout_type: "obj",
        placeholders: &[(Ph::Title, None), (Ph::Body(1), None)],
    },
    LayoutSpec {
        name: "Section Header",
        layout_type: "secHead",
        placeholders: &[(Ph::Title, None), (Ph::Body(1), None)],
    },
    LayoutSpec {
        name: "Two Content",
        layout_type: "twoObj",
        placeholders: &[
            (Ph::Title, None),
            (Ph::Body(1), Some(HALF_LEFT)),
            (Ph::Body(2), Some(HALF_RIGHT)),
        ],
    },
    LayoutSpec {
        name: "Comparison",
        layout_type: "twoTxTwoObj",
        placeholders: &[
            (Ph::Title, None),
            (Ph::Body(1), Some(HALF_LEFT)),
            (Ph::Body(2), Some(HALF_RIGHT)),
        ],
    },
    LayoutSpec {
        name: "Title Only",
        layout_type: "titleOnly",
        placeholders: &[(Ph::Title, None)],
    },
];

fn layout_path(index: usize) -> String {
    format!("ppt/slideLayouts/slideLayout{}.xml", index + 1)
}

/// Every part of the built-in package.
pub(super) fn parts() -> BTreeMap<String, Vec<u8>> {
    let mut parts: BTreeMap<String, Vec<u8>> = BTreeMap::new();
    let mut put = |name: &str, xml: String| {
        parts.insert(name.to_string(), xml.into_bytes());
    };

    let mut types = ContentTypes::default();
    types.add_default("rels", CT_RELATIONSHIPS);
    types.add_default("xml", CT_XML);
    types.add_override(PRESENTATION, CT_PRESENTATION);
    types.add_override(MASTER, CT_SLIDE_MASTER);
    for i in 0..LAYOUTS.len() {
        types.add_override(&layout_path(i), CT_SLIDE_LAYOUT);
    }
    types.add_override(THEME, CT_THEME);
    types.add_override(TABLE_STYLES, CT_TABLE_STYLES);
    put("[Content_Types].xml", types.to_xml());

    put(
        "_rels/.rels",
        relationships_xml(&[Relationship::new("rId1", REL_OFFICE_DOCUMENT, PRESENTATION)]),
    );

    put(PRESENTATION, presentation_xml(SlideSize::default()));
    put(
        "ppt/_rels/presentation.xml.rels",
        relationships_xml(&[
            Relationship::new("rId1", REL_SLIDE_MASTER, "slideMasters/slideMaster1.xml"),
            Relationship::new("rId2", REL_THEME, "theme/theme1.xml"),
            Relationship::new("rId3", REL_TABLE_STYLES, "tableStyles.xml"),
        ]),
    );

    put(MASTER, master_xml());
    let mut master_rels: Vec<Relationship> = (0..LAYOUTS.len())
        .map(|i| {
            Relationship::new(
                format!("rId{}", i + 1),
                REL_SLIDE_LAYOUT,
                format!("../slideLayouts/slideLayout{}.xml", i + 1),
            )
        })
        .collect();
    master_rels.push(Relationship::new(
        format!("rId{}", LAYOUTS.len() + 1),
        REL_THEME,
        "../theme/theme1.xml",
    ));
    put("ppt/slideMasters/_rels/slideMaster1.xml.rels", relationships_xml(&master_rels));

    for (i, spec) in LAYOUTS.iter().enumerate() {
        let path = layout_path(i);
        put(&path, layout_xml(spec));
        put(
            &format!("ppt/slideLayouts/_rels/slideLayout{}.xml.rels", i + 1),
            relationships_xml(&[Relationship::new(
                "rId1",
                REL_SLIDE_MASTER,
                "../slideMasters/slideMaster1.xml",
            )]),
        );
    }

    put(THEME, theme_xml());
    put(
        TABLE_STYLES,
        format!(
            r#"{XML_DECL}<a:tblStyleLst xmlns:a="{NS_DRAWING}" def="{{5C22544A-7EE6-4342-B048-85BDC9FD1C3A}}"/>"#
        ),
    );

    parts
}

fn root_attrs() -> String {
    format!(r#"xmlns:a="{NS_DRAWING}" xmlns:r="{NS_OFFICE_RELATIONSHIPS}" xmlns:p="{NS_PRESENTATION}""#)
}

fn presentation_xml(size: SlideSize) -> String {
    format!(
        concat!(
            "{decl}<p:presentation {attrs} saveSubsetFonts=\"1\">",
            "<p:sldMasterIdLst><p:sldMasterId id=\"2147483648\" r:id=\"rId1\"/></p:sldMasterIdLst>",
            "<p:sldSz cx=\"{cx}\" cy=\"{cy}\"/>",
            "<p:notesSz cx=\"{cy}\" cy=\"{cx}\"/>",
            "</p:presentation>"
        ),
        decl = XML_DECL,
        attrs = root_attrs(),
        cx = size.cx,
        cy = size.cy,
    )
}

const GROUP_PROPS: &str = concat!(
    "<p:nvGrpSpPr><p:cNvPr id=\"1\" name=\"\"/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>",
    "<p:grpSpPr><a:xfrm><a:off x=\"0\" y=\"0\"/><a:ext cx=\"0\" cy=\"0\"/>",
    "<a:chOff x=\"0\" y=\"0\"/><a:chExt cx=\"0\" cy=\"0\"/></a:xfrm></p:grpSpPr>"
);

fn placeholder_sp(out: &mut String, id: usize, name: &str, ph: &str, rect: Option<Rect>, text: &str) {
    out.push_str(&format!(
        concat!(
            "<p:sp><p:nvSpPr><p:cNvPr id=\"{id}\" name=\"{name}\"/>",
            "<p:cNvSpPr><a:spLocks noGrp=\"1\"/></p:cNvSpPr><p:nvPr>{ph}</p:nvPr></p:nvSpPr><p:spPr>"
        ),
        id = id,
        name = name,
        ph = ph
    ));
    if let Some(r) = rect {
        out.push_str(&format!(
            "<a:xfrm><a:off x=\"{}\" y=\"{}\"/><a:ext cx=\"{}\" cy=\"{}\"/></a:xfrm>",
            r.x, r.y, r.cx, r.cy
        ));
    }
    out.push_str("</p:spPr><p:txBody><a:bodyPr/><a:lstStyle/><a:p>");
    if text.is_empty() {
        out.push_str("<a:endParaRPr lang=\"en-US\"/>");
    } else {
        out.push_str(&format!("<a:r><a:rPr lang=\"en-US\"/><a:t>{text}</a:t></a:r>"));
    }
    out.push_str("</a:p></p:txBody></p:sp>");
}

fn master_xml() -> String {
    let mut out = String::with_capacity(4096);
    out.push_str(&format!("{XML_DECL}<p:sldMaster {}>", root_attrs()));
    out.push_str("<p:cSld><p:bg><p:bgRef idx=\"1001\"><a:schemeClr val=\"bg1\"/></p:bgRef></p:bg><p:spTree>");
    out.push_str(GROUP_PROPS);
    placeholder_sp(
        &mut out,
        2,
        "Title Placeholder 1",
        "<p:ph type=\"title\"/>",
        Some(Rect::new(457_200, 274_638, 8_229_600, 1_143_000)),
        "Click to edit Master title style",
    );
    placeholder_sp(
        &mut out,
        3,
        "Text Placeholder 2",
        "<p:ph type=\"body\" idx=\"1\"/>",
        Some(Rect::new(457_200, 1_600_200, 8_229_600, 4_525_963)),
        "Click to edit Master text styles",
    );
    out.push_str("</p:spTree></p:cSld>");
    out.push_str(concat!(
        "<p:clrMap bg1=\"lt1\" tx1=\"dk1\" bg2=\"lt2\" tx2=\"dk2\" accent1=\"accent1\" ",
        "accent2=\"accent2\" accent3=\"accent3\" accent4=\"accent4\" accent5=\"accent5\" ",
        "accent6=\"accent6\" hlink=\"hlink\" folHlink=\"folHlink\"/>"
    ));
    out.push_str("<p:sldLayoutIdLst>");
    for i in 0..LAYOUTS.len() {
        out.push_str(&format!(
            "<p:sldLayoutId id=\"{}\" r:id=\"rId{}\"/>",
            2_147_483_649_u64 + i as u64,
            i + 1
        ));
    }
    out.push_str("</p:sldLayoutIdLst>");
    out.push_str(concat!(
        "<p:txStyles>",
        "<p:titleStyle><a:lvl1pPr algn=\"ctr\"><a:defRPr sz=\"4400\" kern=\"1200\">",
        "<a:solidFill><a:schemeClr val=\"tx1\"/></a:solidFill>",
        "<a:latin typeface=\"+mj-lt\"/><a:ea typeface=\"+mj-ea\"/><a:cs typeface=\"+mj-cs\"/>",
        "</a:defRPr></a:lvl1pPr></p:titleStyle>",
        "<p:bodyStyle><a:lvl1pPr marL=\"0\" indent=\"0\" algn=\"ctr\"><a:buNone/>",
        "<a:defRPr sz=\"3200\" kern=\"1200\"><a:solidFill><a:schemeClr val=\"tx1\"/></a:solidFill>",
        "<a:latin typeface=\"+mn-lt\"/><a:ea typeface=\"+mn-ea\"/><a:cs typeface=\"+mn-cs\"/>",
        "</a:defRPr></a:lvl1pPr></p:bodyStyle>",
        "<p:otherStyle><a:defPPr><a:defRPr lang=\"en-US\"/></a:defPPr></p:otherStyle>",
        "</p:txStyles></p:sldMaster>"
    ));
    out
}

fn layout_xml(spec: &LayoutSpec) -> String {
    let mut out = String::with_capacity(2048);
    out.push_str(&format!(
        "{XML_DECL}<p:sldLayout {} type=\"{}\" preserve=\"1\"><p:cSld name=\"{}\"><p:spTree>",
        root_attrs(),
        spec.layout_type,
        spec.name
    ));
    out.push_str(GROUP_PROPS);
    for (n, (ph, rect)) in spec.placeholders.iter().enumerate() {
        let (name, ph_xml) = match ph {
            Ph::Title => ("Title".to_string(), "<p:ph type=\"title\"/>".to_string()),
            Ph::CtrTitle => ("Title".to_string(), "<p:ph type=\"ctrTitle\"/>".to_string()),
            Ph::SubTitle => (
                "Subtitle".to_string(),
                "<p:ph type=\"subTitle\" idx=\"1\"/>".to_string(),
            ),
            Ph::Body(idx) => (
                format!("Content Placeholder {idx}"),
                format!("<p:ph idx=\"{idx}\"/>"),
            ),
        };
        placeholder_sp(&mut out, n + 2, &format!("{name} {}", n + 1), &ph_xml, *rect, "");
    }
    out.push_str("</p:spTree></p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sldLayout>");
    out
}

fn theme_xml() -> String {
    const COLORS: [(&str, &str); 10] = [
        ("dk2", "1F497D"),
        ("lt2", "EEECE1"),
        ("accent1", "4F81BD"),
        ("accent2", "C0504D"),
        ("accent3", "9BBB59"),
        ("accent4", "8064A2"),
        ("accent5", "4BACC6"),
        ("accent6", "F79646"),
        ("hlink", "0000FF"),
        ("folHlink", "800080"),
    ];

    let mut out = String::with_capacity(4096);
    out.push_str(&format!(
        "{XML_DECL}<a:theme xmlns:a=\"{NS_DRAWING}\" name=\"Office Theme\"><a:themeElements>"
    ));
    out.push_str(concat!(
        "<a:clrScheme name=\"Office\">",
        "<a:dk1><a:sysClr val=\"windowText\" lastClr=\"000000\"/></a:dk1>",
        "<a:lt1><a:sysClr val=\"window\" lastClr=\"FFFFFF\"/></a:lt1>"
    ));
    for (name, rgb) in COLORS {
        out.push_str(&format!("<a:{name}><a:srgbClr val=\"{rgb}\"/></a:{name}>"));
    }
    out.push_str("</a:clrScheme>");
    out.push_str("<a:fontScheme name=\"Office\">");
    for font in ["majorFont", "minorFont"] {
        out.push_str(&format!(
            "<a:{font}><a:latin typeface=\"Calibri\"/><a:ea typeface=\"\"/><a:cs typeface=\"\"/></a:{font}>"
        ));
    }
    out.push_str("</a:fontScheme><a:fmtScheme name=\"Office\">");
    let solid = "<a:solidFill><a:schemeClr val=\"phClr\"/></a:solidFill>";
    out.push_str("<a:fillStyleLst>");
    for _ in 0..3 {
        out.push_str(solid);
    }
    out.push_str("</a:fillStyleLst><a:lnStyleLst>");
    for w in [9525, 25400, 38100] {
        out.push_str(&format!("<a:ln w=\"{w}\">{solid}</a:ln>"));
    }
    out.push_str("</a:lnStyleLst><a:effectStyleLst>");
    for _ in 0..3 {
        out.push_str("<a:effectStyle><a:effectLst/></a:effectStyle>");
    }
    out.push_str("</a:effectStyleLst><a:bgFillStyleLst>");
    for _ in 0..3 {
        out.push_str(solid);
    }
    out.push_str("</a:bgFillStyleLst></a:fmtScheme></a:themeElements>");
    out.push_str("<a:objectDefaults/><a:extraClrSchemeLst/></a:theme>");
    out
}
