//! # Code Blocks
//!
//! [`CodeBlock`] holds the code, language and metadata of one block plus its
//! lines. While the engine processes a block it attaches a
//! [`ProcessingState`]; every mutating method checks the matching capability
//! and fails with [`EngineError::EditNotPermitted`] outside its window.
//! Without an attached state all edits are allowed.

mod line;

use std::rc::Rc;

use serde::{Deserialize, Serialize};

pub use line::CodeLine;

use crate::annotation::Annotation;
use crate::error::{EditTarget, EngineError, Result};
use crate::state::ProcessingState;

/// Plain description of a block, as found in a document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockSpec {
    pub code: String,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub meta: String,
}

impl BlockSpec {
    pub fn new(code: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            language: language.into(),
            meta: String::new(),
        }
    }

    pub fn with_meta(mut self, meta: impl Into<String>) -> Self {
        self.meta = meta.into();
        self
    }
}

#[derive(Debug, Clone)]
pub struct CodeBlock {
    lines: Vec<CodeLine>,
    language: String,
    meta: String,
    state: Option<ProcessingState>,
}

impl CodeBlock {
    /// Builds a block from its spec. `\n` and `\r\n` both end a line.
    pub fn new(spec: BlockSpec) -> Result<Self> {
        validate_language(&spec.language)?;
        let lines = spec
            .code
            .split('\n')
            .map(|line| CodeLine::new(line.strip_suffix('\r').unwrap_or(line)))
            .collect();
        Ok(Self {
            lines,
            language: spec.language,
            meta: spec.meta,
            state: None,
        })
    }

    /// The current code, lines joined with `\n`.
    pub fn code(&self) -> String {
        self.lines
            .iter()
            .map(CodeLine::text)
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn meta(&self) -> &str {
        &self.meta
    }

    pub fn lines(&self) -> &[CodeLine] {
        &self.lines
    }

    pub fn line(&self, index: usize) -> Option<&CodeLine> {
        self.lines.get(index)
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// A copy of the attached processing state, if the block is being processed.
    pub fn state(&self) -> Option<ProcessingState> {
        self.state
    }

    pub(crate) fn set_state(&mut self, state: Option<ProcessingState>) {
        self.state = state;
    }

    pub fn set_language(&mut self, language: impl Into<String>) -> Result<()> {
        self.ensure_allowed(EditTarget::Metadata)?;
        let language = language.into();
        validate_language(&language)?;
        self.language = language;
        Ok(())
    }

    pub fn set_meta(&mut self, meta: impl Into<String>) -> Result<()> {
        self.ensure_allowed(EditTarget::Metadata)?;
        self.meta = meta.into();
        Ok(())
    }

    /// Replaces the text of a line, keeping its annotations.
    pub fn set_line_text(&mut self, index: usize, text: impl Into<String>) -> Result<()> {
        self.ensure_allowed(EditTarget::Code)?;
        let len = self.lines.len();
        let line = self
            .lines
            .get_mut(index)
            .ok_or(EngineError::LineOutOfRange { index, len })?;
        line.set_text(text.into());
        Ok(())
    }

    /// Inserts new lines before `index`; `index == line_count()` appends.
    pub fn insert_lines<I, S>(&mut self, index: usize, texts: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ensure_allowed(EditTarget::Code)?;
        let len = self.lines.len();
        if index > len {
            return Err(EngineError::LineOutOfRange { index, len });
        }
        let new_lines: Vec<CodeLine> = texts.into_iter().map(CodeLine::new).collect();
        self.lines.splice(index..index, new_lines);
        Ok(())
    }

    /// Deletes the lines at the given indices. Nothing is removed if any index is out of range.
    pub fn delete_lines(&mut self, indices: impl IntoIterator<Item = usize>) -> Result<()> {
        self.ensure_allowed(EditTarget::Code)?;
        let len = self.lines.len();
        let mut indices: Vec<usize> = indices.into_iter().collect();
        if let Some(&index) = indices.iter().find(|&&i| i >= len) {
            return Err(EngineError::LineOutOfRange { index, len });
        }
        indices.sort_unstable();
        indices.dedup();
        for index in indices.into_iter().rev() {
            self.lines.remove(index);
        }
        Ok(())
    }

    pub fn add_annotation(
        &mut self,
        line_index: usize,
        annotation: Rc<dyn Annotation>,
    ) -> Result<()> {
        self.ensure_allowed(EditTarget::Annotations)?;
        let len = self.lines.len();
        self.lines
            .get_mut(line_index)
            .ok_or(EngineError::LineOutOfRange {
                index: line_index,
                len,
            })?
            .push_annotation(annotation);
        Ok(())
    }

    /// Detaches an annotation instance from a line. Returns whether it was attached.
    pub fn remove_annotation(
        &mut self,
        line_index: usize,
        annotation: &Rc<dyn Annotation>,
    ) -> Result<bool> {
        self.ensure_allowed(EditTarget::Annotations)?;
        let len = self.lines.len();
        let line = self
            .lines
            .get_mut(line_index)
            .ok_or(EngineError::LineOutOfRange {
                index: line_index,
                len,
            })?;
        Ok(line.remove_annotation(annotation))
    }

    fn ensure_allowed(&self, target: EditTarget) -> Result<()> {
        match self.state {
            Some(state) if !state.allows(target) => Err(EngineError::EditNotPermitted { target }),
            _ => Ok(()),
        }
    }
}

impl TryFrom<BlockSpec> for CodeBlock {
    type Error = EngineError;

    fn try_from(spec: BlockSpec) -> Result<Self> {
        CodeBlock::new(spec)
    }
}

fn validate_language(language: &str) -> Result<()> {
    if language.chars().any(char::is_whitespace) {
        return Err(EngineError::InvalidBlock(format!(
            "language identifier {language:?} must not contain whitespace"
        )));
    }
    Ok(())
}
