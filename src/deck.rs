//! In-memory presentation document.
//!
//! [`Deck`] is the PPTX implementation of [`PresentationSink`]. Slides are
//! kept as a small model (placeholder paragraphs, text boxes, tables) and
//! serialized on [`PresentationSink::save`] by [`crate::export`]. Hyperlinks
//! are resolved to slide handles when the run is pushed, so an unknown
//! anchor fails at the call that introduced it.

use std::collections::HashMap;
use std::io::Write;
use std::path::Path;
use tracing::debug;

use crate::error::{DeckError, Result};
use crate::export;
use crate::sink::{PresentationSink, Run, ShapeId, SlideId, TextTarget};
use crate::template::{LayoutInfo, Template};
use crate::types::{Anchor, GridCell, Rect, SlideSize};

/// A run whose link has been resolved to a slide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRun {
    pub text: String,
    pub size_pt: Option<u32>,
    pub link: Option<SlideId>,
}

/// The first (and only) paragraph of a text frame.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Paragraph {
    pub runs: Vec<TextRun>,
}

impl Paragraph {
    /// Concatenated run text.
    #[must_use]
    pub fn text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }
}

/// A table shape. Cells are stored row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub rect: Rect,
    pub style_id: String,
    pub rows: usize,
    pub cols: usize,
    cells: Vec<Paragraph>,
}

impl Table {
    fn new(rows: usize, cols: usize, rect: Rect, style_id: &str) -> Self {
        Self {
            rect,
            style_id: style_id.to_string(),
            rows,
            cols,
            cells: vec![Paragraph::default(); rows * cols],
        }
    }

    fn offset(&self, cell: GridCell) -> Option<usize> {
        (cell.row < self.rows && cell.column < self.cols).then_some(cell.row * self.cols + cell.column)
    }

    #[must_use]
    pub fn cell(&self, cell: GridCell) -> Option<&Paragraph> {
        self.offset(cell).and_then(|i| self.cells.get(i))
    }

    fn cell_mut(&mut self, cell: GridCell) -> Option<&mut Paragraph> {
        self.offset(cell).and_then(|i| self.cells.get_mut(i))
    }

    /// Cells of one row, left to right.
    pub fn row(&self, row: usize) -> impl Iterator<Item = &Paragraph> {
        (0..self.cols).filter_map(move |column| self.cell(GridCell::new(row, column)))
    }
}

/// A shape added on top of the layout placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shape {
    TextBox { rect: Rect, paragraph: Paragraph },
    Table(Table),
}

/// One slide of the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slide {
    /// Index into the template's layout list
    pub layout: usize,
    pub anchor: Option<Anchor>,
    pub title: Paragraph,
    pub body: Paragraph,
    pub shapes: Vec<Shape>,
}

impl Slide {
    /// The first table on the slide, if any.
    #[must_use]
    pub fn table(&self) -> Option<&Table> {
        self.shapes.iter().find_map(|s| match s {
            Shape::Table(t) => Some(t),
            Shape::TextBox { .. } => None,
        })
    }

    /// Every slide this one links to, in order of appearance.
    pub fn links(&self) -> impl Iterator<Item = SlideId> + '_ {
        let shape_paragraphs = self.shapes.iter().flat_map(|shape| match shape {
            Shape::TextBox { paragraph, .. } => std::slice::from_ref(paragraph).iter(),
            Shape::Table(table) => table.cells.iter(),
        });
        [&self.title, &self.body]
            .into_iter()
            .chain(shape_paragraphs)
            .flat_map(|p| p.runs.iter())
            .filter_map(|r| r.link)
    }
}

/// A presentation under construction on top of a [`Template`].
#[derive(Debug, Clone)]
pub struct Deck {
    template: Template,
    slides: Vec<Slide>,
    anchors: HashMap<Anchor, SlideId>,
}

impl Deck {
    #[must_use]
    pub fn new(template: Template) -> Self {
        Self {
            template,
            slides: Vec::new(),
            anchors: HashMap::new(),
        }
    }

    #[must_use]
    pub fn template(&self) -> &Template {
        &self.template
    }

    #[must_use]
    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    #[must_use]
    pub fn slide(&self, id: SlideId) -> Option<&Slide> {
        self.slides.get(id.0)
    }

    /// The slide registered under `anchor`.
    #[must_use]
    pub fn resolve(&self, anchor: &Anchor) -> Option<SlideId> {
        self.anchors.get(anchor).copied()
    }

    /// Serialize the document into `.pptx` bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        export::write_pptx(self)
    }

    fn slide_mut(&mut self, id: SlideId) -> Result<&mut Slide> {
        self.slides
            .get_mut(id.0)
            .ok_or_else(|| DeckError::InvalidTarget(format!("slide {} does not exist", id.0)))
    }

    fn layout_of(&self, id: SlideId) -> Result<&LayoutInfo> {
        let slide = self
            .slides
            .get(id.0)
            .ok_or_else(|| DeckError::InvalidTarget(format!("slide {} does not exist", id.0)))?;
        self.template
            .layout(slide.layout)
            .ok_or(DeckError::LayoutNotFound {
                index: slide.layout,
                available: self.template.layouts().len(),
            })
    }

    fn paragraph_mut(&mut self, target: TextTarget) -> Result<&mut Paragraph> {
        match target {
            TextTarget::Title(id) => {
                if self.layout_of(id)?.title.is_none() {
                    return Err(DeckError::InvalidTarget(format!(
                        "slide {} layout has no title placeholder",
                        id.0
                    )));
                }
                Ok(&mut self.slide_mut(id)?.title)
            }
            TextTarget::Body(id) => {
                if self.layout_of(id)?.body.is_none() {
                    return Err(DeckError::InvalidTarget(format!(
                        "slide {} layout has no body placeholder",
                        id.0
                    )));
                }
                Ok(&mut self.slide_mut(id)?.body)
            }
            TextTarget::Shape(shape) => match self.shape_mut(shape)? {
                Shape::TextBox { paragraph, .. } => Ok(paragraph),
                Shape::Table(_) => Err(DeckError::InvalidTarget(format!(
                    "shape {} on slide {} is a table",
                    shape.index, shape.slide.0
                ))),
            },
            TextTarget::Cell(shape, cell) => match self.shape_mut(shape)? {
                Shape::Table(table) => {
                    let (rows, cols) = (table.rows, table.cols);
                    table.cell_mut(cell).ok_or_else(|| {
                        DeckError::InvalidTarget(format!(
                            "cell ({}, {}) outside {rows}x{cols} table",
                            cell.row, cell.column
                        ))
                    })
                }
                Shape::TextBox { .. } => Err(DeckError::InvalidTarget(format!(
                    "shape {} on slide {} is not a table",
                    shape.index, shape.slide.0
                ))),
            },
        }
    }

    fn shape_mut(&mut self, shape: ShapeId) -> Result<&mut Shape> {
        self.slide_mut(shape.slide)?
            .shapes
            .get_mut(shape.index)
            .ok_or_else(|| {
                DeckError::InvalidTarget(format!(
                    "shape {} does not exist on slide {}",
                    shape.index, shape.slide.0
                ))
            })
    }

    fn push_shape(&mut self, slide: SlideId, shape: Shape) -> Result<ShapeId> {
        let shapes = &mut self.slide_mut(slide)?.shapes;
        shapes.push(shape);
        Ok(ShapeId {
            slide,
            index: shapes.len() - 1,
        })
    }
}

impl PresentationSink for Deck {
    fn slide_size(&self) -> SlideSize {
        self.template.slide_size()
    }

    fn add_slide(&mut self, layout: usize, anchor: Option<&Anchor>) -> Result<SlideId> {
        if self.template.layout(layout).is_none() {
            return Err(DeckError::LayoutNotFound {
                index: layout,
                available: self.template.layouts().len(),
            });
        }
        let id = SlideId(self.slides.len());
        if let Some(anchor) = anchor {
            if self.anchors.contains_key(anchor) {
                return Err(DeckError::AnchorCollision(anchor.to_string()));
            }
            self.anchors.insert(anchor.clone(), id);
        }
        self.slides.push(Slide {
            layout,
            anchor: anchor.cloned(),
            title: Paragraph::default(),
            body: Paragraph::default(),
            shapes: Vec::new(),
        });
        Ok(id)
    }

    fn add_table(
        &mut self,
        slide: SlideId,
        rows: usize,
        cols: usize,
        rect: Rect,
        style_id: &str,
    ) -> Result<ShapeId> {
        if rows == 0 || cols == 0 {
            return Err(DeckError::InvalidTarget(format!("empty {rows}x{cols} table")));
        }
        self.push_shape(slide, Shape::Table(Table::new(rows, cols, rect, style_id)))
    }

    fn add_text_box(&mut self, slide: SlideId, rect: Rect) -> Result<ShapeId> {
        self.push_shape(
            slide,
            Shape::TextBox {
                rect,
                paragraph: Paragraph::default(),
            },
        )
    }

    fn push_run(&mut self, target: TextTarget, run: Run) -> Result<()> {
        let link = match &run.link {
            Some(anchor) => Some(
                self.resolve(anchor)
                    .ok_or_else(|| DeckError::UnresolvedAnchor(anchor.to_string()))?,
            ),
            None => None,
        };
        self.paragraph_mut(target)?.runs.push(TextRun {
            text: run.text,
            size_pt: run.size_pt,
            link,
        });
        Ok(())
    }

    fn slide_count(&self) -> usize {
        self.slides.len()
    }

    fn save(&self, path: &Path) -> Result<()> {
        let bytes = self.to_bytes()?;
        debug!(bytes = bytes.len(), slides = self.slides.len(), "serialized presentation");

        // Write next to the target and rename so a failed save leaves no partial file
        let dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let mut tmp =
            tempfile::NamedTempFile::new_in(dir).map_err(|e| DeckError::sink_write(path, e))?;
        tmp.write_all(&bytes)
            .and_then(|()| tmp.flush())
            .map_err(|e| DeckError::sink_write(path, e))?;
        tmp.persist(path)
            .map_err(|e| DeckError::sink_write(path, e.error))?;
        Ok(())
    }
}
