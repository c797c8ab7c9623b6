//! Error types for board mutation, move notation and the interchange formats.
//!
//! Parse failures, illegal moves and I/O failures are kept as distinct
//! types so a caller can tell a malformed input from a rule violation.

use std::fmt;
use std::io;

// ============================================================================
// Moves
// ============================================================================

/// A sub-move that the position does not allow.
///
/// The board is always left as it was before the failing call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveError {
    /// Checked mode only: the die is not 1..=6.
    DieOutOfRange(u8),
    /// The source point holds no chequer of the side to move.
    EmptySource(usize),
    /// Two or more opposing chequers occupy the destination.
    Blocked(usize),
    /// A (from, to) pair that does not move toward home.
    WrongDirection { from: i8, to: i8 },
}

impl fmt::Display for MoveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveError::DieOutOfRange(die) => write!(f, "die value {} is not between 1 and 6", die),
            MoveError::EmptySource(point) => {
                write!(f, "no chequer to move on point {}", point + 1)
            }
            MoveError::Blocked(point) => write!(f, "point {} is blocked", point + 1),
            MoveError::WrongDirection { from, to } => {
                write!(f, "cannot move from {} to {}", from + 1, to + 1)
            }
        }
    }
}

impl std::error::Error for MoveError {}

/// Malformed move notation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseMoveError {
    /// More than eight point numbers.
    TooManyPoints,
    /// A number outside 0..=25.
    InvalidPoint(u32),
    /// A '/' with nothing before it, or two '/' in a row.
    MisplacedSlash,
    /// The text ends with '/'.
    TrailingSlash,
    /// A repeat count "(n)" that is malformed or misplaced.
    InvalidRepeat,
    /// More than four sub-moves.
    TooManyMoves,
    /// A sub-move starting off the board or ending on the bar.
    OffOrBar,
    /// An odd number of points.
    Incomplete,
    /// A character that is not part of the notation.
    UnexpectedChar(char),
}

impl fmt::Display for ParseMoveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseMoveError::TooManyPoints => write!(f, "too many points in move"),
            ParseMoveError::InvalidPoint(n) => write!(f, "invalid point number {}", n),
            ParseMoveError::MisplacedSlash => write!(f, "leading or repeated '/'"),
            ParseMoveError::TrailingSlash => write!(f, "move ends with '/'"),
            ParseMoveError::InvalidRepeat => write!(f, "invalid repeat count"),
            ParseMoveError::TooManyMoves => write!(f, "more than four sub-moves"),
            ParseMoveError::OffOrBar => write!(f, "cannot move from off the board or to the bar"),
            ParseMoveError::Incomplete => write!(f, "incomplete move"),
            ParseMoveError::UnexpectedChar(c) => write!(f, "unexpected character '{}'", c),
        }
    }
}

impl std::error::Error for ParseMoveError {}

// ============================================================================
// Encodings
// ============================================================================

/// Malformed `board:` record. `field` counts fields after the tag, from 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WireError {
    MissingTag,
    MissingField { field: usize },
    InvalidNumber { field: usize, text: String },
    /// Turn, colour, direction or cube is zero.
    ZeroField { field: usize },
    /// Match length not greater than a score.
    ScoreOutOfRange,
    /// Both players on one point, or unequal chequer totals.
    InconsistentBoard,
}

impl fmt::Display for WireError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WireError::MissingTag => write!(f, "record does not start with \"board:\""),
            WireError::MissingField { field } => write!(f, "record truncated at field {}", field),
            WireError::InvalidNumber { field, text } => {
                write!(f, "field {} is not a number: {:?}", field, text)
            }
            WireError::ZeroField { field } => write!(f, "field {} must not be zero", field),
            WireError::ScoreOutOfRange => write!(f, "score is not below the match length"),
            WireError::InconsistentBoard => write!(f, "record describes an impossible board"),
        }
    }
}

impl std::error::Error for WireError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PositionIdError {
    Length { found: usize, expected: usize },
    InvalidChar(char),
    /// Decodes to more chequers than fit on a board.
    Overflow,
    /// Decodes to a position that fails validation.
    Illegal,
}

impl fmt::Display for PositionIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PositionIdError::Length { found, expected } => {
                write!(f, "position string has {} characters, expected {}", found, expected)
            }
            PositionIdError::InvalidChar(c) => write!(f, "invalid position id character '{}'", c),
            PositionIdError::Overflow => write!(f, "position id encodes too many chequers"),
            PositionIdError::Illegal => write!(f, "position id encodes an illegal position"),
        }
    }
}

impl std::error::Error for PositionIdError {}

// ============================================================================
// Files
// ============================================================================

#[derive(Debug)]
pub enum ExportError {
    Io(io::Error),
    /// A recorded move could not be replayed; `ply` counts from 0.
    IllegalMove { ply: usize, source: MoveError },
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportError::Io(e) => write!(f, "write failed: {}", e),
            ExportError::IllegalMove { ply, source } => {
                write!(f, "move {} cannot be replayed: {}", ply + 1, source)
            }
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExportError::Io(e) => Some(e),
            ExportError::IllegalMove { source, .. } => Some(source),
        }
    }
}

impl From<io::Error> for ExportError {
    fn from(e: io::Error) -> Self {
        ExportError::Io(e)
    }
}

#[derive(Debug)]
pub enum ImportError {
    Io(io::Error),
    /// Jellyfish version tag outside 124..=126.
    UnsupportedVersion(i16),
    /// Snowie line with fewer than 40 fields.
    FieldCount(usize),
    InvalidField { field: usize, text: String },
    /// The decoded position fails validation.
    InvalidBoard,
}

impl fmt::Display for ImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportError::Io(e) => write!(f, "read failed: {}", e),
            ImportError::UnsupportedVersion(v) => {
                write!(f, "not a Jellyfish position file (version {})", v)
            }
            ImportError::FieldCount(n) => write!(f, "expected 40 fields, found {}", n),
            ImportError::InvalidField { field, text } => {
                write!(f, "field {} is invalid: {:?}", field, text)
            }
            ImportError::InvalidBoard => write!(f, "file describes an illegal position"),
        }
    }
}

impl std::error::Error for ImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ImportError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for ImportError {
    fn from(e: io::Error) -> Self {
        ImportError::Io(e)
    }
}
