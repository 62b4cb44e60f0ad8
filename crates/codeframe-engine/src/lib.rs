//! # codeframe-engine
//!
//! Plugin-driven pipeline that turns code blocks into annotated HTML-like trees.
//!
//! ## Modules
//!
//! - **`engine`**: runs groups of blocks through every phase and hook
//! - **`state`**: per-block phase machine and edit permissions
//! - **`block`**: the mutable code block and its lines
//! - **`annotation`**: line and inline annotations applied at render time
//! - **`plugin`**: plugin definitions, hook contexts and scoped plugin data
//! - **`plugins`**: built-in text markers, frames and line numbers
//! - **`rendering`**: line, block and group tree assembly
//! - **`markdown`**: fenced code block extraction
//! - **`style`**: shared class names and CSS variable naming

pub mod annotation;
pub mod block;
pub mod engine;
pub mod error;
pub mod markdown;
pub mod plugin;
pub mod plugins;
pub mod rendering;
pub mod state;
pub mod style;

// Re-export key types for easier usage
pub use annotation::{Annotation, InlineMarkAnnotation, LineClassAnnotation};
pub use block::{BlockSpec, CodeBlock, CodeLine};
pub use engine::{BlockInput, Engine, EngineConfig, ProcessInput, ProcessOutput, RenderedBlock};
pub use error::{EditTarget, EngineError, Result};
pub use plugin::{HookName, Plugin, PluginDataScope, PluginId};
pub use rendering::ast::{Element, Node, Root};
pub use state::{Phase, ProcessingState};
