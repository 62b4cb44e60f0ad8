use std::fmt;

use crate::plugin::PluginId;

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;

/// The part of a code block guarded by a processing capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditTarget {
    Code,
    Metadata,
    Annotations,
}

impl fmt::Display for EditTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EditTarget::Code => "code",
            EditTarget::Metadata => "metadata",
            EditTarget::Annotations => "annotations",
        };
        f.write_str(name)
    }
}

/// Errors raised while building code blocks or running them through the pipeline.
///
/// Every variant is fatal to the `process` call that produced it.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// A processing state record was missing or had the wrong shape.
    #[error("Invalid processing state: expected {expected}, got {actual}")]
    InvalidProcessingState {
        expected: &'static str,
        actual: String,
    },

    /// The phase machine was asked to move past `done`.
    #[error("Cannot advance processing phase past {0}")]
    PhaseOverrun(crate::state::Phase),

    /// A gated edit happened outside the phases that allow it.
    #[error("Cannot edit {target} of a code block in the current processing phase")]
    EditNotPermitted { target: EditTarget },

    /// The block specification was rejected during construction.
    #[error("Invalid code block: {0}")]
    InvalidBlock(String),

    #[error("Line index {index} is out of range (block has {len} lines)")]
    LineOutOfRange { index: usize, len: usize },

    /// A plugin asked for data it stored earlier under a different type.
    #[error("Plugin data of {plugin} in {scope} scope is not a {expected}")]
    PluginDataType {
        plugin: PluginId,
        scope: crate::plugin::PluginDataScope,
        expected: &'static str,
    },

    /// An annotation broke the one-to-one node mapping during line rendering.
    #[error("Annotation '{name}' rendered {actual} nodes, expected {expected}")]
    AnnotationRender {
        name: String,
        expected: usize,
        actual: usize,
    },

    #[error("Annotation '{0}' replaced a line element with a non-element node")]
    AnnotationNotElement(String),

    /// An error raised by a plugin hook, passed through untouched.
    #[error(transparent)]
    Plugin(#[from] anyhow::Error),
}
