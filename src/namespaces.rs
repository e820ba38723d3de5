//! XML namespace, relationship type and content type constants.
//!
//! Both the workbook reader and the presentation writer work on OPC packages.
//! Relationship types come in transitional and strict flavours; the `is_*`
//! helpers match on the final path segment so either form is accepted.

// =============================================================================
// Namespaces
// =============================================================================

/// PresentationML main namespace
pub const NS_PRESENTATION: &str = "http://schemas.openxmlformats.org/presentationml/2006/main";

/// DrawingML main namespace
pub const NS_DRAWING: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";

/// DrawingML table graphic data URI
pub const NS_DRAWING_TABLE: &str = "http://schemas.openxmlformats.org/drawingml/2006/table";

/// Office document relationships namespace (`r:` prefix)
pub const NS_OFFICE_RELATIONSHIPS: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

/// Package relationships namespace
pub const NS_RELATIONSHIPS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";

/// Content types namespace
pub const NS_CONTENT_TYPES: &str = "http://schemas.openxmlformats.org/package/2006/content-types";

// =============================================================================
// Relationship types
// =============================================================================

/// Relationship type for the main document part (from root .rels)
pub const REL_OFFICE_DOCUMENT: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";

/// Relationship type for slides
pub const REL_SLIDE: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide";

/// Relationship type for slide layouts
pub const REL_SLIDE_LAYOUT: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout";

/// Relationship type for slide masters
pub const REL_SLIDE_MASTER: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster";

/// Relationship type for theme
pub const REL_THEME: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/theme";

/// Relationship type for table styles
pub const REL_TABLE_STYLES: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/tableStyles";

// =============================================================================
// Content types
// =============================================================================

pub const CT_RELATIONSHIPS: &str = "application/vnd.openxmlformats-package.relationships+xml";
pub const CT_XML: &str = "application/xml";
pub const CT_PRESENTATION: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml";
pub const CT_SLIDE: &str = "application/vnd.openxmlformats-officedocument.presentationml.slide+xml";
pub const CT_SLIDE_LAYOUT: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml";
pub const CT_SLIDE_MASTER: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.slideMaster+xml";
pub const CT_THEME: &str = "application/vnd.openxmlformats-officedocument.theme+xml";
pub const CT_TABLE_STYLES: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.tableStyles+xml";

// =============================================================================
// Helper functions for namespace-aware parsing
// =============================================================================

fn rel_type_is(rel_type: &str, suffix: &str) -> bool {
    rel_type
        .rsplit_once('/')
        .is_some_and(|(_, last)| last == suffix)
}

/// Check if a relationship type is for the main document part.
pub fn is_office_document_relationship(rel_type: &str) -> bool {
    rel_type_is(rel_type, "officeDocument")
}

/// Check if a relationship type is for worksheets.
pub fn is_worksheet_relationship(rel_type: &str) -> bool {
    rel_type_is(rel_type, "worksheet")
}

/// Check if a relationship type is for shared strings.
pub fn is_shared_strings_relationship(rel_type: &str) -> bool {
    rel_type_is(rel_type, "sharedStrings")
}

/// Check if a relationship type is for slides.
pub fn is_slide_relationship(rel_type: &str) -> bool {
    rel_type_is(rel_type, "slide")
}

/// Check if a relationship type is for slide layouts.
pub fn is_slide_layout_relationship(rel_type: &str) -> bool {
    rel_type_is(rel_type, "slideLayout")
}

/// Check if a relationship type is for slide masters.
pub fn is_slide_master_relationship(rel_type: &str) -> bool {
    rel_type_is(rel_type, "slideMaster")
}

/// Check if a relationship type is for notes slides.
pub fn is_notes_slide_relationship(rel_type: &str) -> bool {
    rel_type_is(rel_type, "notesSlide")
}
