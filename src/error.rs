//! Structured error types for quizdeck.
//!
//! Every step of a run (reading the source table, planning, assembling the
//! document, writing the package) reports through [`DeckError`].

use std::path::PathBuf;

/// All errors that can occur while building a quiz deck.
#[derive(Debug, thiserror::Error)]
pub enum DeckError {
    /// The dataset has no data rows.
    #[error("dataset is empty: at least one category row is required")]
    EmptyDataset,

    /// A row does not carry exactly one value per point column.
    #[error("row {row}: expected {expected} value cells, found {found}")]
    MalformedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// A row has no category label.
    #[error("row {row}: category label is blank")]
    BlankCategory { row: usize },

    /// Two rows share a category label, which would produce ambiguous anchors.
    #[error("duplicate category {label:?} in rows {first_row} and {row}")]
    DuplicateCategory {
        label: String,
        first_row: usize,
        row: usize,
    },

    /// The tabular input is missing, unreadable, or not a table.
    #[error("cannot read {}: {reason}", path.display())]
    SourceRead { path: PathBuf, reason: String },

    /// The output path cannot be written for lack of permission.
    #[error("no permission to write {}", path.display())]
    WritePermissionDenied { path: PathBuf },

    /// Serializing or writing the output failed for any other reason.
    #[error("failed to write {}: {source}", path.display())]
    SinkWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The presentation template is unusable.
    #[error("template: {0}")]
    Template(String),

    /// A slide layout index is not present in the template's master.
    #[error("slide layout {index} not found (template has {available})")]
    LayoutNotFound { index: usize, available: usize },

    /// A hyperlink targets an anchor no slide carries.
    #[error("hyperlink target {0:?} does not name any slide")]
    UnresolvedAnchor(String),

    /// Two slides were registered under the same anchor.
    #[error("anchor {0:?} is already taken by another slide")]
    AnchorCollision(String),

    /// A slide, shape or cell handle does not point at something that exists.
    #[error("invalid target: {0}")]
    InvalidTarget(String),

    /// The document does not hold one slide per plan entry.
    #[error("document has {actual} slides, plan expects {expected}")]
    SlideCountMismatch { expected: usize, actual: usize },

    /// Invalid deck configuration.
    #[error("configuration: {0}")]
    Config(String),

    /// XML parsing error from quick-xml.
    #[error("XML parsing: {0}")]
    Xml(#[from] quick_xml::Error),

    /// ZIP archive error.
    #[error("ZIP archive: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// JSON configuration error.
    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, DeckError>;

impl DeckError {
    /// Wrap any failure raised while reading `path` as a [`DeckError::SourceRead`].
    pub(crate) fn source_read(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::SourceRead {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Classify an I/O failure on the output path.
    pub(crate) fn sink_write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::PermissionDenied {
            Self::WritePermissionDenied { path }
        } else {
            Self::SinkWrite { path, source }
        }
    }

    /// True for errors raised by dataset validation, before any document work.
    #[must_use]
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Self::EmptyDataset
                | Self::MalformedRow { .. }
                | Self::BlankCategory { .. }
                | Self::DuplicateCategory { .. }
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use std::io::{Error, ErrorKind};

    #[test]
    fn test_permission_denied_is_distinct() {
        let err = DeckError::sink_write("/out/deck.pptx", Error::from(ErrorKind::PermissionDenied));
        assert!(matches!(err, DeckError::WritePermissionDenied { .. }));
        assert_eq!(err.to_string(), "no permission to write /out/deck.pptx");
    }

    #[test]
    fn test_other_io_failures_keep_source() {
        let err = DeckError::sink_write("/out/deck.pptx", Error::new(ErrorKind::Other, "disk full"));
        match err {
            DeckError::SinkWrite { source, .. } => assert_eq!(source.to_string(), "disk full"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_structural_classification() {
        assert!(DeckError::EmptyDataset.is_structural());
        assert!(DeckError::BlankCategory { row: 0 }.is_structural());
        assert!(!DeckError::UnresolvedAnchor("x".into()).is_structural());
    }
}
