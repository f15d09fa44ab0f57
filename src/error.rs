//! Error types for the glyph mapping pipeline.
//!
//! This module defines all error types that can occur while reading a document,
//! rendering its pages and writing the generated artifacts.

use std::fmt;
use std::path::PathBuf;

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Pipeline stage in which a fatal error occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Opening the source document
    Open,
    /// Layout traversal, glyph report and layout text
    Layout,
    /// Page rasterization
    Rasterize,
    /// OCR over rendered pages
    Ocr,
    /// External metadata extraction
    Metadata,
    /// Span projection from the structured text view
    Project,
    /// Overlay markup generation
    Overlay,
}

impl Stage {
    /// Stable lower-case stage name used in diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            Stage::Open => "open",
            Stage::Layout => "layout",
            Stage::Rasterize => "rasterize",
            Stage::Ocr => "ocr",
            Stage::Metadata => "metadata",
            Stage::Project => "project",
            Stage::Overlay => "overlay",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error types that can occur during document processing.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Source document is missing, corrupt or unreadable
    #[error("Cannot access document {}: {reason}", .path.display())]
    DocumentAccess {
        /// Path of the document
        path: PathBuf,
        /// Underlying cause
        reason: String,
    },

    /// Rasterization backend unavailable or misconfigured
    #[error("Rendering backend error: {0}")]
    RenderingDependency(String),

    /// External tool failed to start or exited with a non-zero status
    #[error("External tool '{tool}' failed: {reason}")]
    Subprocess {
        /// Program that was invoked
        tool: String,
        /// Exit status or launch failure
        reason: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Image encoding error
    #[error("Image error: {0}")]
    Image(String),

    /// Metadata results could not be serialized
    #[error("Metadata error: {0}")]
    Metadata(String),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Fatal error raised inside a pipeline stage
    #[error("Stage '{stage}' failed: {source}")]
    Stage {
        /// Stage that failed
        stage: Stage,
        /// Underlying cause
        source: Box<Error>,
    },
}

impl Error {
    /// Attach the failing stage to an error.
    ///
    /// Errors that already carry a stage are returned unchanged.
    pub fn in_stage(self, stage: Stage) -> Self {
        match self {
            Error::Stage { .. } => self,
            other => Error::Stage {
                stage,
                source: Box::new(other),
            },
        }
    }

    /// Stage recorded on this error, if any.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            Error::Stage { stage, .. } => Some(*stage),
            _ => None,
        }
    }

    /// Whether the run must abort when this error surfaces.
    ///
    /// Subprocess failures are recovered locally with an empty result.
    pub fn is_fatal(&self) -> bool {
        match self {
            Error::Subprocess { .. } => false,
            Error::Stage { source, .. } => source.is_fatal(),
            _ => true,
        }
    }
}

impl From<image::ImageError> for Error {
    fn from(err: image::ImageError) -> Self {
        match err {
            image::ImageError::IoError(io) => Error::Io(io),
            other => Error::Image(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_access_error() {
        let err = Error::DocumentAccess {
            path: PathBuf::from("pdfs/missing.pdf"),
            reason: "file not found".to_string(),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("pdfs/missing.pdf"));
        assert!(msg.contains("file not found"));
    }

    #[test]
    fn test_subprocess_error_is_recoverable() {
        let err = Error::Subprocess {
            tool: "pdftohtml".to_string(),
            reason: "exit status 1".to_string(),
        };
        assert!(!err.is_fatal());
        assert!(format!("{}", err).contains("pdftohtml"));
    }

    #[test]
    fn test_stage_wrapping_names_stage_and_cause() {
        let err = Error::RenderingDependency("libpdfium not found".to_string())
            .in_stage(Stage::Rasterize);
        assert_eq!(err.stage(), Some(Stage::Rasterize));
        assert!(err.is_fatal());

        let msg = format!("{}", err);
        assert!(msg.contains("rasterize"));
        assert!(msg.contains("libpdfium not found"));
    }

    #[test]
    fn test_stage_is_not_wrapped_twice() {
        let err = Error::Config("bad".to_string())
            .in_stage(Stage::Open)
            .in_stage(Stage::Overlay);
        assert_eq!(err.stage(), Some(Stage::Open));
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_error_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Error>();
    }
}
