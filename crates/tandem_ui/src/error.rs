//! # UI Error Types
//!
//! Caller-contract violations are fatal for the frame they occur in.
//! Collaborator failures (missing textures, fonts) are not: they surface as a
//! rendering gap.

use thiserror::Error;

use crate::id::ElementId;
use crate::tree::NodeKind;

/// Which of the two passes an error was detected in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pass {
    /// Pass 1: leaves report intrinsic sizes, groups aggregate bottom-up.
    Measure,
    /// Pass 2: positions are assigned, render commands recorded, input resolved.
    Place,
}

impl std::fmt::Display for Pass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Measure => f.write_str("measure"),
            Self::Place => f.write_str("place"),
        }
    }
}

/// Caller-contract violations. Any of these aborts the frame.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum UiError {
    /// The declaration returned with groups still open.
    #[error("{open} group(s) left open at the end of the {pass} pass")]
    UnbalancedGroups {
        /// Pass the imbalance was detected in.
        pass: Pass,
        /// Number of groups still open.
        open: usize,
    },

    /// `end_group` was called with no group open.
    #[error("end_group without a matching start_group in the {pass} pass")]
    EndGroupWithoutStart {
        /// Pass the stray call happened in.
        pass: Pass,
    },

    /// A leaf was declared outside of any group.
    #[error("{kind:?} declared outside of any group in the {pass} pass")]
    ElementOutsideGroup {
        /// Pass the element was declared in.
        pass: Pass,
        /// Kind of the offending element.
        kind: NodeKind,
    },

    /// A group-scoped call was made with no group open.
    #[error("{call} requires an open group")]
    NoOpenGroup {
        /// Name of the offending call.
        call: &'static str,
    },

    /// Pass 2 declared a different node than pass 1 at the same position.
    #[error("node {index} differs between passes: measured {measured:?} {measured_id}, placed {placed:?} {placed_id}")]
    StructuralMismatch {
        /// Pre-order index of the node.
        index: usize,
        /// Kind recorded in pass 1.
        measured: NodeKind,
        /// Identity recorded in pass 1.
        measured_id: ElementId,
        /// Kind declared in pass 2.
        placed: NodeKind,
        /// Identity declared in pass 2.
        placed_id: ElementId,
    },

    /// Pass 2 declared a different number of nodes than pass 1.
    #[error("pass 1 declared {measured} node(s), pass 2 declared {placed}")]
    NodeCountMismatch {
        /// Nodes recorded in pass 1.
        measured: usize,
        /// Nodes declared in pass 2.
        placed: usize,
    },

    /// Two interactive elements share an identity in the same frame.
    #[error("interactive identity {0} declared more than once this frame")]
    DuplicateIdentity(ElementId),

    /// A group-scoped setting was issued after the group's first child.
    #[error("{setting} must be called right after start_group, before any child")]
    LateGroupSetting {
        /// Name of the offending call.
        setting: &'static str,
    },

    /// The coordinate system was changed after the first group started.
    #[error("virtual resolution and projection can only change before the first group")]
    ResolutionLocked,

    /// A non-positive or non-finite virtual resolution was requested.
    #[error("invalid virtual resolution: {0}")]
    InvalidResolution(f32),

    /// `end_scroll` / `end_slider` without the matching start on the current group.
    #[error("{call} does not match the composite opened on the current group")]
    MismatchedComposite {
        /// Name of the offending call.
        call: &'static str,
    },
}

/// Failures reported by the render backend or the text shaper.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// The backend has no texture for this handle.
    #[error("texture not found: {0}")]
    MissingTexture(u32),

    /// The shaper has no font with this name.
    #[error("font not found: {0}")]
    MissingFont(String),

    /// Any other collaborator failure.
    #[error("backend failure: {0}")]
    Backend(String),
}

/// Failures loading an [`EngineConfig`](crate::config::EngineConfig).
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// The config file is not valid TOML for this schema.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// The config parsed but holds an unusable value.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Result type for frame-level operations.
pub type UiResult<T> = Result<T, UiError>;
