//! # Processing State
//!
//! Per-block capability flags and the forward-only phase sequence that flips them.
//!
//! ```text
//! init -> preprocessMetadata -> preprocessCode -> performSyntaxAnalysis
//!      -> postprocessAnalyzedCode -> annotateCode -> postprocessAnnotations
//!      -> lineRendering -> postprocessRenderedBlock -> done
//! ```
//!
//! | phase                     | code | metadata | annotations |
//! |---------------------------|------|----------|-------------|
//! | init                      | yes  | yes      | yes         |
//! | preprocessMetadata        | no   | yes      | yes         |
//! | preprocessCode .. postprocessAnalyzedCode | yes | yes | yes |
//! | annotateCode, postprocessAnnotations      | no  | yes | yes |
//! | lineRendering .. done     | no   | no       | no          |
//!
//! Code is sealed from `annotateCode` on, metadata and annotations from
//! `lineRendering` on. A sealed capability never comes back within one block.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{EditTarget, EngineError, Result};
use crate::plugin::HookName;

const EXPECTED_STATE_SHAPE: &str =
    "ProcessingState { canEditCode: boolean, canEditMetadata: boolean, canEditAnnotations: boolean }";

/// What plugins may currently change on a code block.
///
/// Plugins only ever see copies of this record; the engine owns the original.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessingState {
    can_edit_code: bool,
    can_edit_metadata: bool,
    can_edit_annotations: bool,
}

impl Default for ProcessingState {
    fn default() -> Self {
        Self {
            can_edit_code: true,
            can_edit_metadata: true,
            can_edit_annotations: true,
        }
    }
}

impl ProcessingState {
    pub fn can_edit_code(&self) -> bool {
        self.can_edit_code
    }

    pub fn can_edit_metadata(&self) -> bool {
        self.can_edit_metadata
    }

    pub fn can_edit_annotations(&self) -> bool {
        self.can_edit_annotations
    }

    pub fn allows(&self, target: EditTarget) -> bool {
        match target {
            EditTarget::Code => self.can_edit_code,
            EditTarget::Metadata => self.can_edit_metadata,
            EditTarget::Annotations => self.can_edit_annotations,
        }
    }
}

impl TryFrom<&Value> for ProcessingState {
    type Error = EngineError;

    fn try_from(value: &Value) -> Result<Self> {
        validate_processing_state(Some(value))
    }
}

/// Checks an untyped state record and converts it.
///
/// A missing record, a non-object, or any flag that is absent or not a
/// boolean is a contract fault; nothing is coerced.
pub fn validate_processing_state(value: Option<&Value>) -> Result<ProcessingState> {
    let invalid = || EngineError::InvalidProcessingState {
        expected: EXPECTED_STATE_SHAPE,
        actual: value.map_or_else(|| "nothing".to_string(), Value::to_string),
    };
    // Derived struct deserializers also accept sequences; only objects count.
    match value {
        Some(record @ Value::Object(_)) => {
            ProcessingState::deserialize(record).map_err(|_| invalid())
        }
        _ => Err(invalid()),
    }
}

/// One step in the processing of a single block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Phase {
    Init,
    PreprocessMetadata,
    PreprocessCode,
    PerformSyntaxAnalysis,
    PostprocessAnalyzedCode,
    AnnotateCode,
    PostprocessAnnotations,
    LineRendering,
    PostprocessRenderedBlock,
    Done,
}

impl Phase {
    pub const ALL: [Phase; 10] = [
        Phase::Init,
        Phase::PreprocessMetadata,
        Phase::PreprocessCode,
        Phase::PerformSyntaxAnalysis,
        Phase::PostprocessAnalyzedCode,
        Phase::AnnotateCode,
        Phase::PostprocessAnnotations,
        Phase::LineRendering,
        Phase::PostprocessRenderedBlock,
        Phase::Done,
    ];

    pub fn next(self) -> Option<Phase> {
        let index = Phase::ALL.iter().position(|p| *p == self)?;
        Phase::ALL.get(index + 1).copied()
    }

    /// The hook dispatched while the block is in this phase, if any.
    pub fn hook(self) -> Option<HookName> {
        match self {
            Phase::PreprocessMetadata => Some(HookName::PreprocessMetadata),
            Phase::PreprocessCode => Some(HookName::PreprocessCode),
            Phase::PerformSyntaxAnalysis => Some(HookName::PerformSyntaxAnalysis),
            Phase::PostprocessAnalyzedCode => Some(HookName::PostprocessAnalyzedCode),
            Phase::AnnotateCode => Some(HookName::AnnotateCode),
            Phase::PostprocessAnnotations => Some(HookName::PostprocessAnnotations),
            Phase::LineRendering => Some(HookName::PostprocessRenderedLine),
            Phase::PostprocessRenderedBlock => Some(HookName::PostprocessRenderedBlock),
            Phase::Init | Phase::Done => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Init => "init",
            Phase::PreprocessMetadata => "preprocessMetadata",
            Phase::PreprocessCode => "preprocessCode",
            Phase::PerformSyntaxAnalysis => "performSyntaxAnalysis",
            Phase::PostprocessAnalyzedCode => "postprocessAnalyzedCode",
            Phase::AnnotateCode => "annotateCode",
            Phase::PostprocessAnnotations => "postprocessAnnotations",
            Phase::LineRendering => "lineRendering",
            Phase::PostprocessRenderedBlock => "postprocessRenderedBlock",
            Phase::Done => "done",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Drives one block's [`ProcessingState`] through the phases.
#[derive(Debug, Clone)]
pub struct PhaseMachine {
    phase: Phase,
    state: ProcessingState,
}

impl Default for PhaseMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl PhaseMachine {
    pub fn new() -> Self {
        Self {
            phase: Phase::Init,
            state: ProcessingState::default(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn state(&self) -> ProcessingState {
        self.state
    }

    /// Whether `target` has been switched off for the rest of this block.
    pub fn is_sealed(&self, target: EditTarget) -> bool {
        match target {
            EditTarget::Code => self.phase >= Phase::AnnotateCode,
            EditTarget::Metadata | EditTarget::Annotations => self.phase >= Phase::LineRendering,
        }
    }

    /// Moves to the next phase and applies its capability changes.
    pub fn advance(&mut self) -> Result<Phase> {
        let next = self
            .phase
            .next()
            .ok_or(EngineError::PhaseOverrun(self.phase))?;
        match next {
            Phase::PreprocessMetadata => self.state.can_edit_code = false,
            Phase::PreprocessCode => self.state.can_edit_code = true,
            Phase::AnnotateCode => self.state.can_edit_code = false,
            Phase::LineRendering => {
                self.state.can_edit_metadata = false;
                self.state.can_edit_annotations = false;
            }
            _ => {}
        }
        self.phase = next;
        Ok(next)
    }
}
