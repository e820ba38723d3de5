//! Deck configuration.
//!
//! All fixed identifiers of a run (texts, column names, point values, layout
//! indices, table style) live in one immutable [`DeckConfig`] that is passed
//! explicitly to the planner, the assembler and the weaver.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::error::{DeckError, Result};
use crate::types::{inches, PointColumn, Rect, RoleKind, SlideSize};

/// Table style "No Style, No Grid".
pub const NO_STYLE_NO_GRID: &str = "{2D5ABB26-0587-4C30-8999-92F81FD0307C}";

/// Slide layout indices (into the first slide master's layout list) per slide role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutMap {
    pub title: usize,
    pub category_intro: usize,
    pub grid_table: usize,
    pub question: usize,
}

impl Default for LayoutMap {
    fn default() -> Self {
        // Standard layout order: 0 Title Slide, 1 Title and Content, 5 Title Only
        Self {
            title: 0,
            category_intro: 5,
            grid_table: 5,
            question: 1,
        }
    }
}

impl LayoutMap {
    #[must_use]
    pub fn for_role(&self, role: RoleKind) -> usize {
        match role {
            RoleKind::Title => self.title,
            RoleKind::CategoryIntro => self.category_intro,
            RoleKind::GridTable => self.grid_table,
            RoleKind::Question => self.question,
        }
    }
}

/// Deck configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DeckConfig {
    /// Title of the first slide
    pub title_text: String,
    /// Text of the back link on every question slide
    pub back_text: String,
    /// Header of the category column in the source table
    pub category_column: String,
    /// Point values, left to right; also the headers of the value columns
    pub point_values: [u32; PointColumn::COUNT],
    pub layouts: LayoutMap,
    /// Title (and anchor) of the grid table slide
    pub main_slide_name: String,
    /// Table style GUID applied to the grid table
    pub table_style_id: String,
    /// Font size of the grid slide title, kept tiny so it does not show
    pub hidden_title_size_pt: u32,
    pub back_text_size_pt: u32,
}

impl Default for DeckConfig {
    fn default() -> Self {
        Self {
            title_text: "Quiz".to_string(),
            back_text: "Back".to_string(),
            category_column: "Category".to_string(),
            point_values: [200, 400, 600, 800, 1000],
            layouts: LayoutMap::default(),
            main_slide_name: "MainTable".to_string(),
            table_style_id: NO_STYLE_NO_GRID.to_string(),
            hidden_title_size_pt: 1,
            back_text_size_pt: 11,
        }
    }
}

impl DeckConfig {
    /// Load a configuration from a JSON file; missing fields take defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| DeckError::Config(format!("{}: {e}", path.display())))?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations that would produce ambiguous anchors or headers.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for value in self.point_values {
            if !seen.insert(value) {
                return Err(DeckError::Config(format!(
                    "point value {value} appears more than once"
                )));
            }
        }
        if self.main_slide_name.trim().is_empty() {
            return Err(DeckError::Config("mainSlideName must not be blank".into()));
        }
        // Question slides are named "<category> - <points>"
        if let Some(value) = self
            .point_values
            .iter()
            .find(|v| self.main_slide_name.ends_with(&format!(" - {v}")))
        {
            return Err(DeckError::Config(format!(
                "mainSlideName {:?} can collide with a question slide for {value} points",
                self.main_slide_name
            )));
        }
        if self.category_column.trim().is_empty() {
            return Err(DeckError::Config("categoryColumn must not be blank".into()));
        }
        if self.point_values.iter().any(|v| v.to_string() == self.category_column) {
            return Err(DeckError::Config(
                "categoryColumn collides with a point value header".into(),
            ));
        }
        Ok(())
    }

    /// Display label of a point column.
    #[must_use]
    pub fn points_label(&self, column: PointColumn) -> String {
        self.point_values
            .get(column.index())
            .map(ToString::to_string)
            .unwrap_or_default()
    }

    /// Value column headers, left to right.
    #[must_use]
    pub fn value_headers(&self) -> Vec<String> {
        self.point_values.iter().map(ToString::to_string).collect()
    }

    /// Placement of the grid table: the slide minus a half-inch margin.
    #[must_use]
    pub fn table_rect(&self, size: SlideSize) -> Rect {
        Rect::inset(size, inches(0.5))
    }

    /// Placement of the back link text box on question slides.
    #[must_use]
    pub fn back_button_rect(&self) -> Rect {
        Rect::new(inches(7.0), inches(6.5), inches(2.0), inches(1.0))
    }
}

/// Resolve a possibly relative path against the current directory.
pub fn resolve_path(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}
