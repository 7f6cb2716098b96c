//! Errors raised while ingesting OBJ geometry.

use std::io;

use thiserror::Error;

/// Attribute stream a record or index belongs to.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Attribute {
    Position,
    TexCoord,
    Normal,
    Face,
}

impl std::fmt::Display for Attribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Attribute::Position => "position",
            Attribute::TexCoord => "texture coordinate",
            Attribute::Normal => "normal",
            Attribute::Face => "face",
        };
        f.write_str(name)
    }
}

/// Failure of a mesh load. Every variant is terminal for the current load.
#[derive(Debug, Error)]
pub enum ObjError {
    #[error("mesh source '{name}' is unavailable")]
    SourceUnavailable {
        name: String,
        /// 1-based line at which reading failed, `None` if opening failed.
        line: Option<usize>,
        #[source]
        source: io::Error,
    },

    #[error("line {line}: expected 3 position values, parsed {parsed}")]
    MalformedPositionLine { line: usize, parsed: usize },

    #[error("line {line}: expected 2 texture coordinate values, parsed {parsed}")]
    MalformedTexCoordLine { line: usize, parsed: usize },

    #[error("line {line}: expected 3 normal values, parsed {parsed}")]
    MalformedNormalLine { line: usize, parsed: usize },

    #[error("line {line}: expected 9 face indices (3 corners of pos/tex/norm), parsed {parsed}")]
    MalformedFaceLine { line: usize, parsed: usize },

    #[error("line {line}: face references index 0 (indices are 1-based)")]
    ZeroIndex { line: usize },

    #[error(
        "line {line}: position {position} already uses texture coordinate {previous}, \
         redefined as {found}"
    )]
    TexCoordConflict {
        line: usize,
        position: u32,
        previous: u32,
        found: u32,
    },

    #[error("line {line}: position {position} already uses normal {previous}, redefined as {found}")]
    NormalConflict {
        line: usize,
        position: u32,
        previous: u32,
        found: u32,
    },

    #[error("line {line}: {attribute} index {index} out of range (count={len})")]
    IndexOutOfRange {
        line: usize,
        attribute: Attribute,
        index: u32,
        len: usize,
    },

    #[error("source changed between passes: counted {counted} {attribute} records, found {found}")]
    CountMismatch {
        attribute: Attribute,
        counted: usize,
        found: usize,
    },

    #[error("assembler no longer accepts input")]
    AssemblyFailed,
}

/// Fieldless discriminant of [`ObjError`], handy for matching.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ObjErrorKind {
    SourceUnavailable,
    MalformedPositionLine,
    MalformedTexCoordLine,
    MalformedNormalLine,
    MalformedFaceLine,
    ZeroIndex,
    TexCoordConflict,
    NormalConflict,
    IndexOutOfRange,
    CountMismatch,
    AssemblyFailed,
}

impl ObjError {
    pub fn kind(&self) -> ObjErrorKind {
        match self {
            ObjError::SourceUnavailable { .. } => ObjErrorKind::SourceUnavailable,
            ObjError::MalformedPositionLine { .. } => ObjErrorKind::MalformedPositionLine,
            ObjError::MalformedTexCoordLine { .. } => ObjErrorKind::MalformedTexCoordLine,
            ObjError::MalformedNormalLine { .. } => ObjErrorKind::MalformedNormalLine,
            ObjError::MalformedFaceLine { .. } => ObjErrorKind::MalformedFaceLine,
            ObjError::ZeroIndex { .. } => ObjErrorKind::ZeroIndex,
            ObjError::TexCoordConflict { .. } => ObjErrorKind::TexCoordConflict,
            ObjError::NormalConflict { .. } => ObjErrorKind::NormalConflict,
            ObjError::IndexOutOfRange { .. } => ObjErrorKind::IndexOutOfRange,
            ObjError::CountMismatch { .. } => ObjErrorKind::CountMismatch,
            ObjError::AssemblyFailed => ObjErrorKind::AssemblyFailed,
        }
    }

    /// 1-based source line the error points at, if any.
    pub fn line(&self) -> Option<usize> {
        match self {
            ObjError::SourceUnavailable { line, .. } => *line,
            ObjError::MalformedPositionLine { line, .. }
            | ObjError::MalformedTexCoordLine { line, .. }
            | ObjError::MalformedNormalLine { line, .. }
            | ObjError::MalformedFaceLine { line, .. }
            | ObjError::ZeroIndex { line }
            | ObjError::TexCoordConflict { line, .. }
            | ObjError::NormalConflict { line, .. }
            | ObjError::IndexOutOfRange { line, .. } => Some(*line),
            ObjError::CountMismatch { .. } | ObjError::AssemblyFailed => None,
        }
    }
}

pub type ObjResult<T> = Result<T, ObjError>;
